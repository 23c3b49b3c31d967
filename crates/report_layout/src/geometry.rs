//! Page geometry
//!
//! Heights are in layout pixels (CSS pixels at 96 dpi), the unit the report
//! pages are measured in before rasterization.

use crate::{ReportError, Result, RowHeights, UnmeasuredRowPolicy};
use serde::{Deserialize, Serialize};

/// Margin applied at both the top and the bottom of every page
pub const DEFAULT_MARGINS: f32 = 40.0;
/// Report header (logo, title, date range) before it has been measured
pub const DEFAULT_HEADER_HEIGHT: f32 = 140.0;
/// Page-number footer before it has been measured
pub const DEFAULT_FOOTER_HEIGHT: f32 = 40.0;
/// Repeated column-header row before it has been measured
pub const DEFAULT_TABLE_HEADER_HEIGHT: f32 = 40.0;
/// Trailing totals cards before they have been measured
pub const DEFAULT_SUMMARY_HEIGHT: f32 = 160.0;
/// Data row height used while no row has been measured
pub const DEFAULT_ROW_HEIGHT: f32 = 36.0;

/// Standard page sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// A4 (210mm x 297mm)
    #[default]
    A4,
    /// US Letter (8.5" x 11")
    Letter,
    /// Custom size in layout pixels
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Get the width and height in layout pixels
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (794.0, 1123.0),     // 210mm x 297mm at 96 dpi
            PageSize::Letter => (816.0, 1056.0), // 8.5" x 11" at 96 dpi
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    pub fn height(&self) -> f32 {
        self.dimensions().1
    }
}

/// Fixed and measured heights that decide how many rows fit on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Total page height
    pub page_height: f32,
    /// Margin consumed at the top and again at the bottom of every page
    pub margins: f32,
    /// Per-page report header
    pub header_height: f32,
    /// Per-page footer (page-number line)
    pub footer_height: f32,
    /// Repeated column-header row
    pub table_header_height: f32,
    /// Trailing summary block, only placed on the last content page
    pub summary_height: f32,
    /// Measured row heights, possibly partial or empty
    #[serde(default)]
    pub row_heights: RowHeights,
    /// Row height used while no row has been measured
    pub fallback_row_height: f32,
    /// Estimate for rows past the measured ones
    #[serde(default)]
    pub unmeasured_policy: UnmeasuredRowPolicy,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::fallback(PageSize::A4)
    }
}

impl PageGeometry {
    /// Provisional geometry for the first render pass, built from constants
    pub fn fallback(page_size: PageSize) -> Self {
        Self {
            page_height: page_size.height(),
            margins: DEFAULT_MARGINS,
            header_height: DEFAULT_HEADER_HEIGHT,
            footer_height: DEFAULT_FOOTER_HEIGHT,
            table_header_height: DEFAULT_TABLE_HEADER_HEIGHT,
            summary_height: DEFAULT_SUMMARY_HEIGHT,
            row_heights: RowHeights::new(),
            fallback_row_height: DEFAULT_ROW_HEIGHT,
            unmeasured_policy: UnmeasuredRowPolicy::default(),
        }
    }

    /// Geometry with every reservation set to zero, leaving only the page height
    pub fn bare(page_height: f32) -> Self {
        Self {
            page_height,
            margins: 0.0,
            header_height: 0.0,
            footer_height: 0.0,
            table_header_height: 0.0,
            summary_height: 0.0,
            row_heights: RowHeights::new(),
            fallback_row_height: DEFAULT_ROW_HEIGHT,
            unmeasured_policy: UnmeasuredRowPolicy::default(),
        }
    }

    pub fn with_margins(mut self, margins: f32) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_header_height(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    pub fn with_footer_height(mut self, height: f32) -> Self {
        self.footer_height = height;
        self
    }

    pub fn with_table_header_height(mut self, height: f32) -> Self {
        self.table_header_height = height;
        self
    }

    pub fn with_summary_height(mut self, height: f32) -> Self {
        self.summary_height = height;
        self
    }

    pub fn with_row_heights(mut self, heights: impl Into<RowHeights>) -> Self {
        self.row_heights = heights.into();
        self
    }

    pub fn with_fallback_row_height(mut self, height: f32) -> Self {
        self.fallback_row_height = height;
        self
    }

    pub fn with_unmeasured_policy(mut self, policy: UnmeasuredRowPolicy) -> Self {
        self.unmeasured_policy = policy;
        self
    }

    /// Height left for rows once the fixed page furniture is reserved.
    ///
    /// May be negative for degenerate geometry; the paginator still places
    /// one row per page in that case.
    pub fn available_content_height(&self, include_summary: bool) -> f32 {
        let mut height = self.page_height
            - 2.0 * self.margins
            - self.header_height
            - self.footer_height
            - self.table_header_height;

        if include_summary {
            height -= self.summary_height;
        }

        height
    }

    /// Height to lay out the row at `index` with
    pub fn row_height(&self, index: usize) -> f32 {
        self.row_heights
            .height_for(index, self.unmeasured_policy, self.fallback_row_height)
    }

    /// Check that every height is finite and non-negative.
    ///
    /// Pagination never requires this; it is offered to callers that want to
    /// reject bad measurements before rendering.
    pub fn validate(&self) -> Result<()> {
        let fixed = [
            ("page_height", self.page_height),
            ("margins", self.margins),
            ("header_height", self.header_height),
            ("footer_height", self.footer_height),
            ("table_header_height", self.table_header_height),
            ("summary_height", self.summary_height),
            ("fallback_row_height", self.fallback_row_height),
        ];

        for (name, value) in fixed {
            if !value.is_finite() || value < 0.0 {
                return Err(ReportError::InvalidGeometry(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if let Some((index, value)) = self
            .row_heights
            .as_slice()
            .iter()
            .enumerate()
            .find(|(_, h)| !h.is_finite() || **h < 0.0)
        {
            return Err(ReportError::InvalidGeometry(format!(
                "row {index} has invalid height {value}"
            )));
        }

        if self.available_content_height(false) < 0.0 {
            return Err(ReportError::InvalidGeometry(format!(
                "fixed reservations exceed page height {}",
                self.page_height
            )));
        }

        Ok(())
    }
}
