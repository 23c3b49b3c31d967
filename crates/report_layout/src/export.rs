//! Rendering and export of paginated reports
//!
//! Rasterization and PDF assembly live behind [`PageRenderer`]; this module
//! only drives a renderer over the pages and names the exported file.

use crate::{PageDescriptor, ReportError, Result};
use chrono::NaiveDate;

/// Paints a single page. Implementations see one descriptor at a time.
pub trait PageRenderer<T> {
    /// Rendered form of a page (a bitmap, a PDF page, a line of text)
    type Output;

    fn render_page(&mut self, page: &PageDescriptor<T>) -> std::result::Result<Self::Output, String>;
}

/// Render every page in order, stopping at the first failure
pub fn export_pages<T, R>(pages: &[PageDescriptor<T>], renderer: &mut R) -> Result<Vec<R::Output>>
where
    R: PageRenderer<T> + ?Sized,
{
    let mut rendered = Vec::with_capacity(pages.len());

    for page in pages {
        let output = renderer.render_page(page).map_err(|message| {
            tracing::error!(page = page.page_number, "page rendering failed: {}", message);
            ReportError::Render {
                page: page.page_number,
                message,
            }
        })?;
        tracing::trace!(page = page.page_number, total = page.total_pages, "page rendered");
        rendered.push(output);
    }

    tracing::info!(pages = rendered.len(), "report export complete");
    Ok(rendered)
}

const UNSAFE_FILE_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Remove characters that are not allowed in file names on common platforms
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && !UNSAFE_FILE_NAME_CHARS.contains(c))
        .collect()
}

/// File name for an exported report: `{ReportName}_{dateFrom}_to_{dateTo}.pdf`
pub fn export_file_name(report_name: &str, date_from: NaiveDate, date_to: NaiveDate) -> String {
    let name = sanitize_file_name(report_name)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let name = if name.is_empty() { "Report".to_string() } else { name };

    format!(
        "{}_{}_to_{}.pdf",
        name,
        date_from.format("%Y-%m-%d"),
        date_to.format("%Y-%m-%d")
    )
}
