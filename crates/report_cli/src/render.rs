//! Plain-text page renderer

use report_layout::{PageDescriptor, PageRenderer};

/// Renders each page as a short text block: heading, rows, footer
#[derive(Debug, Default)]
pub struct TextRenderer;

impl PageRenderer<String> for TextRenderer {
    type Output = String;

    fn render_page(&mut self, page: &PageDescriptor<String>) -> Result<String, String> {
        let mut out = String::new();

        if let Some(heading) = page.group_heading() {
            out.push_str(&format!("== {heading}\n"));
        }
        for row in &page.records {
            out.push_str(&format!("  {}\n", row.payload));
        }
        if page.show_summary {
            out.push_str("  [summary]\n");
        }
        out.push_str(&format!("-- {}\n", page.page_label()));

        Ok(out)
    }
}
