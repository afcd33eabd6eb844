//! Data types for the grid layout core.

mod column;
mod container;
mod options;
mod row;

pub use column::*;
pub use container::*;
pub use options::*;
pub use row::*;
