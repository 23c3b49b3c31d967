//! Page descriptors produced by pagination

use crate::Row;
use serde::{Deserialize, Serialize};

/// Group active on a page, for grouped reports (e.g. students by class)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupContext {
    /// Group key of the rows on this page (`None` for rows without a key)
    pub key: Option<String>,
    /// Whether an earlier page already listed rows of this group
    pub is_continuation: bool,
}

impl GroupContext {
    pub fn new(key: Option<String>, is_continuation: bool) -> Self {
        Self {
            key,
            is_continuation,
        }
    }
}

/// A single output page.
///
/// Every descriptor carries everything needed to render it; a renderer never
/// has to look at sibling pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor<T> {
    /// Rows on this page, in input order (empty only for a summary-only page)
    pub records: Vec<Row<T>>,
    /// Page number (1-based)
    pub page_number: usize,
    /// Number of pages in the run, stamped once pagination completes
    pub total_pages: usize,
    /// Whether the trailing summary block is rendered on this page
    pub show_summary: bool,
    /// Active group, when pagination was grouped
    #[serde(default)]
    pub group_context: Option<GroupContext>,
}

impl<T> PageDescriptor<T> {
    /// Create a page whose total is not known yet
    pub(crate) fn new(
        page_number: usize,
        records: Vec<Row<T>>,
        show_summary: bool,
        group_context: Option<GroupContext>,
    ) -> Self {
        Self {
            records,
            page_number,
            total_pages: 0,
            show_summary,
            group_context,
        }
    }

    /// A page that only carries the summary block
    pub fn is_summary_only(&self) -> bool {
        self.records.is_empty() && self.show_summary
    }

    pub fn is_first(&self) -> bool {
        self.page_number == 1
    }

    pub fn is_last(&self) -> bool {
        self.page_number == self.total_pages
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Footer text, e.g. "Page 2 of 5"
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_number, self.total_pages)
    }

    /// Group heading for the page, with "(continued)" on continuation pages
    pub fn group_heading(&self) -> Option<String> {
        let context = self.group_context.as_ref()?;
        let key = context.key.as_deref().unwrap_or("Ungrouped");
        if context.is_continuation {
            Some(format!("{key} (continued)"))
        } else {
            Some(key.to_string())
        }
    }
}
