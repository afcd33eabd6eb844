//! CLI tool for gridport - lays out a JSON scene and outputs the snapshot
//!
//! Usage:
//!   gridport_cli <scene.json>              # Output JSON to stdout
//!   gridport_cli <scene.json> -o out.json  # Output JSON to file
//!
//! Set `RUST_LOG=gridport=debug` to trace layout decisions on stderr.

#![allow(clippy::exit)]
#![allow(clippy::indexing_slicing)]

use gridport::scene::{GridSnapshot, Scene};
use std::env;
use std::fs;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gridport_cli <scene.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(args[3].as_str())
    } else {
        None
    };

    if let Err(e) = run(input_path, output_path) {
        eprintln!("Error laying out {input_path}: {e}");
        std::process::exit(1);
    }
}

fn run(input_path: &str, output_path: Option<&str>) -> gridport::Result<()> {
    let scene = Scene::from_path(input_path)?;
    let mut grid = scene.build()?;
    let snapshot = GridSnapshot::capture(&mut grid);
    let json = serde_json::to_string_pretty(&snapshot)?;

    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
