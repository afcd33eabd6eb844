use serde::{Deserialize, Serialize};
use std::fmt;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 30.0;

/// A row as seen by the layout core: its index in the host's data source and
/// its height. The row's entity stays with the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub index: usize,
    pub height: f64,
}

impl Row {
    pub fn new(index: usize, height: f64) -> Self {
        Self { index, height }
    }

    /// `count` rows of uniform height, indexed from 0.
    pub fn uniform(count: usize, height: f64) -> Vec<Self> {
        (0..count).map(|index| Self::new(index, height)).collect()
    }
}

/// Capability that derives a presentational class for a row.
pub trait RowClassifier {
    fn classify(&self, row: &Row) -> Option<String>;
}

impl<F> RowClassifier for F
where
    F: Fn(&Row) -> Option<String>,
{
    fn classify(&self, row: &Row) -> Option<String> {
        self(row)
    }
}

/// Row class configuration: one class for every row, or computed per row.
pub enum RowClass {
    Fixed(String),
    Computed(Box<dyn RowClassifier>),
}

impl RowClass {
    pub fn computed(classifier: impl RowClassifier + 'static) -> Self {
        Self::Computed(Box::new(classifier))
    }

    pub fn class_for(&self, row: &Row) -> Option<String> {
        match self {
            Self::Fixed(class) => Some(class.clone()),
            Self::Computed(classifier) => classifier.classify(row),
        }
    }
}

impl fmt::Debug for RowClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(class) => f.debug_tuple("Fixed").field(class).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_rows() {
        let rows = Row::uniform(3, 12.0);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].index, 2);
        assert_eq!(rows[2].height, 12.0);
    }

    #[test]
    fn test_row_class_variants() {
        let fixed = RowClass::Fixed("striped".to_string());
        assert_eq!(fixed.class_for(&Row::new(4, 10.0)).as_deref(), Some("striped"));

        let odd = RowClass::computed(|row: &Row| (row.index % 2 == 1).then(|| "odd".to_string()));
        assert_eq!(odd.class_for(&Row::new(1, 10.0)).as_deref(), Some("odd"));
        assert_eq!(odd.class_for(&Row::new(2, 10.0)), None);
    }
}
