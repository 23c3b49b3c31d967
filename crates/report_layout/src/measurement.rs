//! Height measurement port and the two-phase layout pipeline
//!
//! Phase 1 paginates with fallback constants so the pages can be rendered.
//! The measurement provider then reports the realized heights of the header,
//! footer, column header, summary block and rows, and phase 2 paginates again
//! with the refined geometry.

use crate::{paginate, PageDescriptor, PageGeometry, PaginateOptions, Row};
use serde::{Deserialize, Serialize};

/// Heights reported by a rendering surface. `None` means "not measured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default)]
    pub header_height: Option<f32>,
    #[serde(default)]
    pub footer_height: Option<f32>,
    #[serde(default)]
    pub table_header_height: Option<f32>,
    #[serde(default)]
    pub summary_height: Option<f32>,
    /// Heights of the rendered rows, in row order
    #[serde(default)]
    pub row_heights: Vec<f32>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was measured
    pub fn is_empty(&self) -> bool {
        self.header_height.is_none()
            && self.footer_height.is_none()
            && self.table_header_height.is_none()
            && self.summary_height.is_none()
            && self.row_heights.is_empty()
    }
}

/// Source of realized element heights (a DOM, a PDF text measurer, a test double)
pub trait MeasurementProvider<T> {
    /// Render `pages` and report the heights observed
    fn measure(&mut self, pages: &[PageDescriptor<T>]) -> Measurements;
}

/// Provider returning a fixed set of measurements regardless of the pages
#[derive(Debug, Clone, Default)]
pub struct FixedMeasurements {
    measurements: Measurements,
    calls: usize,
}

impl FixedMeasurements {
    pub fn new(measurements: Measurements) -> Self {
        Self {
            measurements,
            calls: 0,
        }
    }

    /// Number of times `measure` has been called
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl<T> MeasurementProvider<T> for FixedMeasurements {
    fn measure(&mut self, _pages: &[PageDescriptor<T>]) -> Measurements {
        self.calls += 1;
        self.measurements.clone()
    }
}

fn usable(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl PageGeometry {
    /// Geometry with measured heights replacing the current ones.
    ///
    /// Missing, zero and non-finite measurements keep the current value.
    /// Row heights replace the current list only when some were measured.
    pub fn refine(&self, measurements: &Measurements) -> PageGeometry {
        let mut refined = self.clone();

        if let Some(height) = usable(measurements.header_height) {
            refined.header_height = height;
        }
        if let Some(height) = usable(measurements.footer_height) {
            refined.footer_height = height;
        }
        if let Some(height) = usable(measurements.table_header_height) {
            refined.table_header_height = height;
        }
        if let Some(height) = usable(measurements.summary_height) {
            refined.summary_height = height;
        }
        if !measurements.row_heights.is_empty() {
            refined.row_heights = measurements.row_heights.iter().copied().collect();
        }

        refined
    }
}

/// Result of a two-phase layout
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput<T> {
    /// Geometry after measurement
    pub geometry: PageGeometry,
    /// Pages laid out with the measured geometry
    pub pages: Vec<PageDescriptor<T>>,
}

/// Render-measure-repaginate driver
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPipeline {
    options: PaginateOptions,
}

impl ReportPipeline {
    pub fn new(options: PaginateOptions) -> Self {
        Self { options }
    }

    /// Paginate with `fallback`, measure the provisional pages, and paginate
    /// again with the measured geometry
    pub fn run<T, P>(&self, rows: &[Row<T>], fallback: &PageGeometry, provider: &mut P) -> PipelineOutput<T>
    where
        T: Clone,
        P: MeasurementProvider<T> + ?Sized,
    {
        let provisional = paginate(rows, fallback, self.options);
        let measurements = provider.measure(&provisional);

        if measurements.is_empty() {
            tracing::debug!("no measurements reported, keeping fallback layout");
            return PipelineOutput {
                geometry: fallback.clone(),
                pages: provisional,
            };
        }

        let geometry = fallback.refine(&measurements);
        let pages = paginate(rows, &geometry, self.options);

        tracing::debug!(
            provisional_pages = provisional.len(),
            measured_pages = pages.len(),
            measured_rows = geometry.row_heights.len(),
            "re-paginated with measured geometry"
        );

        PipelineOutput { geometry, pages }
    }
}
