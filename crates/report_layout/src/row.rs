//! Report rows and their measured heights

use serde::{Deserialize, Serialize};

/// One renderable unit of report content (an expense, a category total, a student).
///
/// The payload is opaque to the paginator. Only the row's position (used to
/// look up its measured height) and its group key take part in layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row<T> {
    /// Caller data rendered in the row
    pub payload: T,
    /// Rows sharing a group key stay contiguous and share a group heading
    #[serde(default)]
    pub group_key: Option<String>,
}

impl<T> Row<T> {
    /// Create an ungrouped row
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            group_key: None,
        }
    }

    /// Create a row that belongs to a group (e.g. a class or a zone)
    pub fn grouped(payload: T, group_key: impl Into<String>) -> Self {
        Self {
            payload,
            group_key: Some(group_key.into()),
        }
    }

    /// Group key as a borrowed string
    pub fn group(&self) -> Option<&str> {
        self.group_key.as_deref()
    }
}

/// How to estimate the height of a row that has not been measured yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmeasuredRowPolicy {
    /// Reuse the height of the most recently measured row
    #[default]
    LastMeasured,
    /// Use the tallest measured row
    MaxMeasured,
}

/// Lazily measured row heights, indexed by row position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowHeights(Vec<f32>);

impl RowHeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows measured so far
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record the height of the next row
    pub fn push(&mut self, height: f32) {
        self.0.push(height);
    }

    /// Measured height at `index`, if that row has been measured
    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Height to lay out the row at `index` with.
    ///
    /// Falls back to an estimate from the rows measured so far, and to
    /// `fallback` when nothing has been measured.
    pub fn height_for(&self, index: usize, policy: UnmeasuredRowPolicy, fallback: f32) -> f32 {
        if let Some(height) = self.get(index) {
            return height;
        }

        let estimate = match policy {
            UnmeasuredRowPolicy::LastMeasured => self.0.last().copied(),
            UnmeasuredRowPolicy::MaxMeasured => self.0.iter().copied().reduce(f32::max),
        };

        estimate.unwrap_or(fallback)
    }

    /// Multiply every measured height by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self(self.0.iter().map(|h| h * factor).collect())
    }
}

impl From<Vec<f32>> for RowHeights {
    fn from(heights: Vec<f32>) -> Self {
        Self(heights)
    }
}

impl FromIterator<f32> for RowHeights {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
