use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GridError, Result};

/// Default minimum drawn width in pixels.
pub const DEFAULT_MIN_WIDTH: i64 = 30;

/// Default maximum drawn width in pixels.
pub const DEFAULT_MAX_WIDTH: i64 = 9000;

/// Stable handle to a column stored in a [`ColumnArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub usize);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sizing directive of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWidth", into = "RawWidth")]
pub enum WidthSpec {
    /// Fixed width in pixels.
    Pixels(f64),
    /// Percentage of the available width (`"25%"` is `Percent(25.0)`).
    Percent(f64),
    /// Share of the leftover width, weighted by the number of `*` tokens.
    Flex(u32),
    /// Directive that could not be understood. Skipped by the width solver.
    Unrecognized(String),
}

impl Default for WidthSpec {
    fn default() -> Self {
        Self::Flex(1)
    }
}

impl WidthSpec {
    /// Flex weight, if this is a flex directive.
    pub fn flex_weight(&self) -> Option<u32> {
        match self {
            Self::Flex(weight) => Some(*weight),
            _ => None,
        }
    }
}

impl FromStr for WidthSpec {
    type Err = GridError;

    /// Strict parse of a textual width directive.
    ///
    /// Accepts `"40%"`, runs of `*` and plain numbers (pixels).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(percent) = trimmed.strip_suffix('%') {
            return match percent.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Ok(Self::Percent(value)),
                _ => Err(GridError::InvalidWidth(s.to_string())),
            };
        }
        if !trimmed.is_empty() && trimmed.chars().all(|c| c == '*') {
            let weight = u32::try_from(trimmed.len())
                .map_err(|_| GridError::InvalidWidth(s.to_string()))?;
            return Ok(Self::Flex(weight));
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self::Pixels(value)),
            _ => Err(GridError::InvalidWidth(s.to_string())),
        }
    }
}

impl fmt::Display for WidthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}"),
            Self::Percent(pct) => write!(f, "{pct}%"),
            Self::Flex(weight) => {
                for _ in 0..*weight {
                    f.write_str("*")?;
                }
                Ok(())
            }
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Wire form of a width directive: a JSON number or a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawWidth {
    Number(f64),
    Text(String),
}

impl From<RawWidth> for WidthSpec {
    fn from(raw: RawWidth) -> Self {
        match raw {
            RawWidth::Number(px) => Self::Pixels(px),
            RawWidth::Text(text) => text
                .parse()
                .unwrap_or_else(|_| Self::Unrecognized(text)),
        }
    }
}

impl From<WidthSpec> for RawWidth {
    fn from(spec: WidthSpec) -> Self {
        match spec {
            WidthSpec::Pixels(px) => Self::Number(px),
            other => Self::Text(other.to_string()),
        }
    }
}

fn default_min_width() -> i64 {
    DEFAULT_MIN_WIDTH
}

fn default_max_width() -> i64 {
    DEFAULT_MAX_WIDTH
}

fn default_visible() -> bool {
    true
}

/// User-facing column definition, as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub name: String,
    #[serde(default)]
    pub width: WidthSpec,
    #[serde(default = "default_min_width")]
    pub min_width: i64,
    #[serde(default = "default_max_width")]
    pub max_width: i64,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl ColumnDef {
    /// Create a visible column with default bounds.
    pub fn new(name: impl Into<String>, width: WidthSpec) -> Self {
        Self {
            name: name.into(),
            width,
            min_width: DEFAULT_MIN_WIDTH,
            max_width: DEFAULT_MAX_WIDTH,
            visible: true,
        }
    }

    /// Replace the width bounds.
    #[must_use]
    pub fn with_bounds(mut self, min_width: i64, max_width: i64) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    /// Replace the visibility flag.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// A column owned by the grid's arena.
///
/// `drawn_width` is written only by the width solver; every container
/// including this column reads the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: ColumnId,
    name: String,
    width: WidthSpec,
    min_width: i64,
    max_width: i64,
    visible: bool,
    pub(crate) drawn_width: i64,
}

impl Column {
    fn from_def(id: ColumnId, def: ColumnDef) -> Result<Self> {
        if def.min_width < 0 || def.max_width < def.min_width {
            return Err(GridError::InvalidBounds {
                column: def.name,
                min: def.min_width,
                max: def.max_width,
            });
        }
        Ok(Self {
            id,
            name: def.name,
            width: def.width,
            min_width: def.min_width,
            max_width: def.max_width,
            visible: def.visible,
            drawn_width: def.min_width,
        })
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> &WidthSpec {
        &self.width
    }

    pub fn min_width(&self) -> i64 {
        self.min_width
    }

    pub fn max_width(&self) -> i64 {
        self.max_width
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Width in pixels produced by the last solve pass.
    pub fn drawn_width(&self) -> i64 {
        self.drawn_width
    }

    /// Clamp a candidate width into `[min_width, max_width]`.
    pub fn clamp_width(&self, width: i64) -> i64 {
        width.clamp(self.min_width, self.max_width)
    }
}

/// Owner of every column in a grid. Containers refer to columns by [`ColumnId`].
#[derive(Debug, Clone, Default)]
pub struct ColumnArena {
    columns: Vec<Column>,
}

impl ColumnArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, validating its bounds.
    pub fn push(&mut self, def: ColumnDef) -> Result<ColumnId> {
        let id = ColumnId(self.columns.len());
        self.columns.push(Column::from_def(id, def)?);
        Ok(id)
    }

    pub fn get(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.get_mut(id.0)
    }

    /// Look up a column, failing for unknown handles.
    pub fn require(&self, id: ColumnId) -> Result<&Column> {
        self.get(id).ok_or(GridError::UnknownColumn(id.0))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Drawn width of a column, 0 for unknown handles.
    pub fn drawn_width(&self, id: ColumnId) -> i64 {
        self.get(id).map_or(0, Column::drawn_width)
    }

    pub(crate) fn set_visible(&mut self, id: ColumnId, visible: bool) -> Result<()> {
        let column = self.get_mut(id).ok_or(GridError::UnknownColumn(id.0))?;
        column.visible = visible;
        Ok(())
    }

    pub(crate) fn set_width(&mut self, id: ColumnId, width: WidthSpec) -> Result<()> {
        let column = self.get_mut(id).ok_or(GridError::UnknownColumn(id.0))?;
        column.width = width;
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_width_directives() {
        assert_eq!("25%".parse::<WidthSpec>().unwrap(), WidthSpec::Percent(25.0));
        assert_eq!(" 12.5 % ".parse::<WidthSpec>().unwrap(), WidthSpec::Percent(12.5));
        assert_eq!("***".parse::<WidthSpec>().unwrap(), WidthSpec::Flex(3));
        assert_eq!("150".parse::<WidthSpec>().unwrap(), WidthSpec::Pixels(150.0));
        assert!("wide".parse::<WidthSpec>().is_err());
        assert!("*2".parse::<WidthSpec>().is_err());
        assert!("-5%".parse::<WidthSpec>().is_err());
    }

    #[test]
    fn test_deserialize_lenient_width() {
        let def: ColumnDef = serde_json::from_str(r#"{"name":"a","width":"auto-ish"}"#).unwrap();
        assert_eq!(def.width, WidthSpec::Unrecognized("auto-ish".to_string()));
        assert_eq!(def.min_width, DEFAULT_MIN_WIDTH);
        assert_eq!(def.max_width, DEFAULT_MAX_WIDTH);
        assert!(def.visible);

        let def: ColumnDef = serde_json::from_str(r#"{"name":"b","width":120}"#).unwrap();
        assert_eq!(def.width, WidthSpec::Pixels(120.0));

        let def: ColumnDef = serde_json::from_str(r#"{"name":"c"}"#).unwrap();
        assert_eq!(def.width, WidthSpec::Flex(1));
    }

    #[test]
    fn test_serialize_width() {
        assert_eq!(serde_json::to_string(&WidthSpec::Flex(2)).unwrap(), r#""**""#);
        assert_eq!(serde_json::to_string(&WidthSpec::Percent(10.0)).unwrap(), r#""10%""#);
        assert_eq!(serde_json::to_string(&WidthSpec::Pixels(80.0)).unwrap(), "80.0");
    }

    #[test]
    fn test_arena_rejects_bad_bounds() {
        let mut arena = ColumnArena::new();
        let err = arena
            .push(ColumnDef::new("x", WidthSpec::Flex(1)).with_bounds(100, 50))
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidBounds { min: 100, max: 50, .. }));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_new_column_starts_at_min_width() {
        let mut arena = ColumnArena::new();
        let id = arena
            .push(ColumnDef::new("x", WidthSpec::Pixels(10.0)).with_bounds(40, 60))
            .unwrap();
        assert_eq!(arena.drawn_width(id), 40);
        assert_eq!(arena.get(id).unwrap().clamp_width(100), 60);
        assert_eq!(arena.drawn_width(ColumnId(99)), 0);
    }
}
