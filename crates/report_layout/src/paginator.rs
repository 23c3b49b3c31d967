//! Report Pagination
//!
//! Flows measured report rows onto fixed-size pages with a single forward
//! greedy pass, then stamps the total page count on every page.
//!
//! Key features:
//! - Page capacity derived from [`PageGeometry`] (header, footer, column header
//!   and margins reserved on every page)
//! - Rows taller than a page are placed alone instead of failing
//! - Trailing summary block placed once, after the last row, on a page of its
//!   own when it does not fit next to the last row
//! - Optional grouping: a group change always starts a new page, and pages
//!   after a group's first page are marked as continuations
//!
//! ```text
//! for each row:
//!     if grouped and group changed and page not empty:
//!         break page
//!     if last row:
//!         rows + summary fit      -> place row, summary on this page
//!                                    (checked against the capacity that
//!                                    already excludes the summary)
//!         rows fit                -> place row, then summary-only page
//!         otherwise               -> break page, row + summary on next page
//!     else if row overflows and page not empty:
//!         break page, row starts next page
//!     else:
//!         place row
//! ```

use crate::{GroupContext, PageDescriptor, PageGeometry, PageSize, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pagination options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginateOptions {
    /// Start a new page whenever the group key changes
    #[serde(default)]
    pub grouped: bool,
}

impl PaginateOptions {
    pub fn grouped() -> Self {
        Self { grouped: true }
    }
}

/// Why a page was closed
#[derive(Debug, Clone, Copy)]
enum BreakReason {
    Overflow,
    GroupBoundary,
    LastRow,
    SummaryOnly,
}

/// Page currently being filled, plus the pages already emitted
struct PageFlow<T> {
    pages: Vec<PageDescriptor<T>>,
    buffer: Vec<Row<T>>,
    height: f32,
    grouped: bool,
    /// Group keys that already appeared on an emitted page
    seen_groups: HashSet<Option<String>>,
}

impl<T: Clone> PageFlow<T> {
    fn new(grouped: bool) -> Self {
        Self {
            pages: Vec::new(),
            buffer: Vec::new(),
            height: 0.0,
            grouped,
            seen_groups: HashSet::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Group key of the rows on the current page
    fn active_group(&self) -> Option<&str> {
        self.buffer.first().and_then(Row::group)
    }

    /// Add a row, `height` being the page's cumulative height including it
    fn place(&mut self, row: &Row<T>, height: f32) {
        self.buffer.push(row.clone());
        self.height = height;
    }

    /// Emit the current page and start an empty one
    fn break_page(&mut self, show_summary: bool, reason: BreakReason) {
        let records = std::mem::take(&mut self.buffer);
        let group_context = self.group_context(&records);
        let page_number = self.pages.len() + 1;

        tracing::trace!(
            page = page_number,
            rows = records.len(),
            height = self.height,
            show_summary,
            ?reason,
            "page break"
        );

        self.pages
            .push(PageDescriptor::new(page_number, records, show_summary, group_context));
        self.height = 0.0;
    }

    fn group_context(&mut self, records: &[Row<T>]) -> Option<GroupContext> {
        if !self.grouped {
            return None;
        }

        // Summary-only pages list no group
        let key = records.first()?.group_key.clone();
        let is_continuation = !self.seen_groups.insert(key.clone());
        Some(GroupContext::new(key, is_continuation))
    }

    fn finish(mut self) -> Vec<PageDescriptor<T>> {
        if self.pages.is_empty() && !self.buffer.is_empty() {
            self.break_page(true, BreakReason::LastRow);
        }

        let total_pages = self.pages.len();
        for page in &mut self.pages {
            page.total_pages = total_pages;
        }
        self.pages
    }
}

/// Paginator that flows report rows onto pages
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    /// Page geometry
    geometry: PageGeometry,
    /// Pagination options
    options: PaginateOptions,
}

impl Paginator {
    /// Create a new paginator with the given geometry
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            options: PaginateOptions::default(),
        }
    }

    /// Create a paginator with the fallback A4 geometry
    pub fn a4() -> Self {
        Self::new(PageGeometry::fallback(PageSize::A4))
    }

    pub fn with_options(mut self, options: PaginateOptions) -> Self {
        self.options = options;
        self
    }

    /// Get a reference to the page geometry
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Get a mutable reference to the page geometry
    pub fn geometry_mut(&mut self) -> &mut PageGeometry {
        &mut self.geometry
    }

    pub fn options(&self) -> PaginateOptions {
        self.options
    }

    /// Lay out `rows` onto pages.
    ///
    /// Rows are never reordered or dropped. Each call is an independent
    /// computation, so re-running with refined measurements is always safe.
    pub fn paginate<T: Clone>(&self, rows: &[Row<T>]) -> Vec<PageDescriptor<T>> {
        let span = tracing::debug_span!("paginate", rows = rows.len(), grouped = self.options.grouped);
        let _enter = span.enter();

        let Some(last_index) = rows.len().checked_sub(1) else {
            return Vec::new();
        };

        let capacity = self.geometry.available_content_height(false);
        let capacity_with_summary = self.geometry.available_content_height(true);
        let mut flow = PageFlow::new(self.options.grouped);

        for (index, row) in rows.iter().enumerate() {
            // NaN and negative measurements count as zero height
            let row_height = self.geometry.row_height(index).max(0.0);

            // Group boundary takes precedence over the height check
            if self.options.grouped && !flow.is_empty() && flow.active_group() != row.group() {
                flow.break_page(false, BreakReason::GroupBoundary);
            }

            let new_height = flow.height + row_height;

            if index == last_index {
                if new_height + self.geometry.summary_height <= capacity_with_summary {
                    flow.place(row, new_height);
                    flow.break_page(true, BreakReason::LastRow);
                } else if new_height <= capacity || flow.is_empty() {
                    flow.place(row, new_height);
                    flow.break_page(false, BreakReason::LastRow);
                    flow.break_page(true, BreakReason::SummaryOnly);
                } else {
                    flow.break_page(false, BreakReason::Overflow);
                    flow.place(row, row_height);
                    flow.break_page(true, BreakReason::LastRow);
                }
            } else if new_height > capacity && !flow.is_empty() {
                flow.break_page(false, BreakReason::Overflow);
                flow.place(row, row_height);
            } else {
                flow.place(row, new_height);
            }
        }

        let pages = flow.finish();
        tracing::debug!(pages = pages.len(), capacity, capacity_with_summary, "pagination complete");
        pages
    }
}

/// Lay out `rows` onto pages described by `geometry`
pub fn paginate<T: Clone>(
    rows: &[Row<T>],
    geometry: &PageGeometry,
    options: PaginateOptions,
) -> Vec<PageDescriptor<T>> {
    Paginator::new(geometry.clone()).with_options(options).paginate(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnmeasuredRowPolicy;

    fn rows(count: usize) -> Vec<Row<usize>> {
        (0..count).map(Row::new).collect()
    }

    fn payloads<T: Clone>(page: &PageDescriptor<T>) -> Vec<T> {
        page.records.iter().map(|r| r.payload.clone()).collect()
    }

    #[test]
    fn test_empty_rows_produce_no_pages() {
        let pages = paginate::<usize>(&[], &PageGeometry::default(), PaginateOptions::default());
        assert!(pages.is_empty());
    }

    #[test]
    fn test_last_row_overflow_carries_summary() {
        // Capacity 280 without summary, 200 with it
        let geometry = PageGeometry::bare(280.0)
            .with_summary_height(80.0)
            .with_row_heights(vec![100.0, 100.0, 100.0]);

        let pages = paginate(&rows(3), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 2);
        assert_eq!(payloads(&pages[0]), vec![0, 1]);
        assert!(!pages[0].show_summary);
        assert_eq!(payloads(&pages[1]), vec![2]);
        assert!(pages[1].show_summary);
        assert!(pages.iter().all(|p| p.total_pages == 2));
    }

    #[test]
    fn test_summary_fits_with_last_row() {
        let geometry = PageGeometry::bare(300.0)
            .with_summary_height(50.0)
            .with_row_heights(vec![100.0, 100.0]);

        let pages = paginate(&rows(2), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 1);
        assert_eq!(payloads(&pages[0]), vec![0, 1]);
        assert!(pages[0].show_summary);
        assert_eq!(pages[0].page_label(), "Page 1 of 1");
    }

    #[test]
    fn test_summary_height_counted_against_reduced_capacity() {
        // 100 + 120 = 220 fits the 250 left after the summary, but 220 + 50 does not
        let geometry = PageGeometry::bare(300.0)
            .with_summary_height(50.0)
            .with_row_heights(vec![100.0, 120.0]);

        let pages = paginate(&rows(2), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 2);
        assert_eq!(payloads(&pages[0]), vec![0, 1]);
        assert!(!pages[0].show_summary);
        assert!(pages[1].is_summary_only());
        assert!(pages.iter().all(|p| p.total_pages == 2));
    }

    #[test]
    fn test_single_row_summary_needs_room_twice() {
        // 500 <= 540, yet 500 + 60 > 540: the summary moves to its own page
        let geometry = PageGeometry::bare(600.0)
            .with_summary_height(60.0)
            .with_row_heights(vec![500.0]);

        let pages = paginate(&rows(1), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 2);
        assert_eq!(payloads(&pages[0]), vec![0]);
        assert!(!pages[0].show_summary);
        assert!(pages[1].is_summary_only());
    }

    #[test]
    fn test_single_row_with_room_for_summary() {
        // 300 + 60 <= 540
        let geometry = PageGeometry::bare(600.0)
            .with_summary_height(60.0)
            .with_row_heights(vec![300.0]);

        let pages = paginate(&rows(1), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 1);
        assert!(pages[0].show_summary);
        assert_eq!(pages[0].row_count(), 1);
    }

    #[test]
    fn test_summary_spills_to_own_page() {
        // Capacity 250 without summary, 150 with it
        let geometry = PageGeometry::bare(250.0)
            .with_summary_height(100.0)
            .with_row_heights(vec![100.0, 100.0]);

        let pages = paginate(&rows(2), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 2);
        assert_eq!(payloads(&pages[0]), vec![0, 1]);
        assert!(!pages[0].show_summary);
        assert!(pages[1].is_summary_only());
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].total_pages, 2);
    }

    #[test]
    fn test_oversized_single_row() {
        let geometry = PageGeometry::bare(300.0)
            .with_summary_height(50.0)
            .with_row_heights(vec![500.0]);

        let pages = paginate(&rows(1), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 2);
        assert_eq!(payloads(&pages[0]), vec![0]);
        assert!(!pages[0].show_summary);
        assert!(pages[1].is_summary_only());
    }

    #[test]
    fn test_oversized_row_mid_sequence_sits_alone() {
        let geometry = PageGeometry::bare(300.0).with_row_heights(vec![100.0, 900.0, 100.0, 100.0]);

        let pages = paginate(&rows(4), &geometry, PaginateOptions::default());

        let layout: Vec<Vec<usize>> = pages.iter().map(payloads).collect();
        assert_eq!(layout, vec![vec![0], vec![1], vec![2, 3]]);
        assert!(pages[2].show_summary);
    }

    #[test]
    fn test_negative_capacity_places_one_row_per_page() {
        let geometry = PageGeometry::bare(100.0)
            .with_header_height(300.0)
            .with_row_heights(vec![10.0, 10.0, 10.0]);
        assert!(geometry.available_content_height(false) < 0.0);

        let pages = paginate(&rows(3), &geometry, PaginateOptions::default());

        let layout: Vec<Vec<usize>> = pages.iter().map(payloads).collect();
        assert_eq!(layout, vec![vec![0], vec![1], vec![2]]);
        assert!(pages[2].show_summary);
        assert!(pages.iter().all(|p| p.total_pages == 3));
    }

    #[test]
    fn test_unmeasured_rows_use_last_measured_height() {
        // 40 then 10 measured; rows 2 and 3 are estimated at 10 each
        let geometry = PageGeometry::bare(100.0).with_row_heights(vec![40.0, 10.0]);

        let pages = paginate(&rows(4), &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 1);
        assert_eq!(payloads(&pages[0]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unmeasured_rows_max_policy() {
        // Rows 2 and 3 estimated at 40: 40 + 10 + 40 = 90, the last row overflows
        let geometry = PageGeometry::bare(100.0)
            .with_row_heights(vec![40.0, 10.0])
            .with_unmeasured_policy(UnmeasuredRowPolicy::MaxMeasured);

        let pages = paginate(&rows(4), &geometry, PaginateOptions::default());

        let layout: Vec<Vec<usize>> = pages.iter().map(payloads).collect();
        assert_eq!(layout, vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn test_no_measurements_uses_fallback_row_height() {
        let geometry = PageGeometry::bare(100.0).with_fallback_row_height(30.0);

        let pages = paginate(&rows(4), &geometry, PaginateOptions::default());

        let layout: Vec<Vec<usize>> = pages.iter().map(payloads).collect();
        assert_eq!(layout, vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn test_group_boundary_forces_break_before_overflow() {
        let group_rows = vec![
            Row::grouped("A1", "A"),
            Row::grouped("A2", "A"),
            Row::grouped("B1", "B"),
        ];
        let geometry = PageGeometry::bare(80.0).with_row_heights(vec![50.0, 50.0, 50.0]);

        let pages = paginate(&group_rows, &geometry, PaginateOptions::grouped());

        let layout: Vec<Vec<&str>> = pages.iter().map(payloads).collect();
        assert_eq!(layout, vec![vec!["A1"], vec!["A2"], vec!["B1"]]);

        let contexts: Vec<GroupContext> =
            pages.iter().filter_map(|p| p.group_context.clone()).collect();
        assert_eq!(
            contexts,
            vec![
                GroupContext::new(Some("A".into()), false),
                GroupContext::new(Some("A".into()), true),
                GroupContext::new(Some("B".into()), false),
            ]
        );
        assert_eq!(pages[1].group_heading().as_deref(), Some("A (continued)"));
        assert!(pages[2].show_summary);
    }

    #[test]
    fn test_group_change_breaks_page_with_room_left() {
        let group_rows = vec![
            Row::grouped(1, "Grade 1"),
            Row::grouped(2, "Grade 1"),
            Row::grouped(3, "Grade 2"),
            Row::grouped(4, "Grade 2"),
        ];
        let geometry = PageGeometry::bare(1000.0)
            .with_summary_height(100.0)
            .with_row_heights(vec![50.0; 4]);

        let pages = paginate(&group_rows, &geometry, PaginateOptions::grouped());

        let layout: Vec<Vec<i32>> = pages.iter().map(payloads).collect();
        assert_eq!(layout, vec![vec![1, 2], vec![3, 4]]);
        assert!(!pages[0].show_summary);
        assert!(pages[1].show_summary);
        assert!(pages.iter().all(|p| !p.group_context.as_ref().unwrap().is_continuation));
    }

    #[test]
    fn test_ungrouped_ignores_group_keys() {
        let group_rows = vec![Row::grouped(1, "A"), Row::grouped(2, "B")];
        let geometry = PageGeometry::bare(1000.0);

        let pages = paginate(&group_rows, &geometry, PaginateOptions::default());

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].group_context, None);
    }

    #[test]
    fn test_summary_only_page_has_no_group() {
        let group_rows = vec![Row::grouped(1, "A"), Row::grouped(2, "A")];
        let geometry = PageGeometry::bare(250.0)
            .with_summary_height(100.0)
            .with_row_heights(vec![100.0, 100.0]);

        let pages = paginate(&group_rows, &geometry, PaginateOptions::grouped());

        assert_eq!(pages.len(), 2);
        assert!(pages[1].is_summary_only());
        assert_eq!(pages[1].group_context, None);
        assert_eq!(pages[1].group_heading(), None);
    }

    #[test]
    fn test_repeated_group_is_continuation() {
        // Unsorted input keeps its order; the second run of A continues A
        let group_rows = vec![
            Row::grouped(1, "A"),
            Row::grouped(2, "B"),
            Row::grouped(3, "A"),
        ];
        let geometry = PageGeometry::bare(1000.0);

        let pages = paginate(&group_rows, &geometry, PaginateOptions::grouped());

        let continuation: Vec<bool> = pages
            .iter()
            .map(|p| p.group_context.as_ref().unwrap().is_continuation)
            .collect();
        assert_eq!(continuation, vec![false, false, true]);
    }

    #[test]
    fn test_paginate_is_repeatable() {
        let paginator = Paginator::a4();
        let input = rows(120);

        let first = paginator.paginate(&input);
        let second = paginator.paginate(&input);

        assert_eq!(first, second);
        assert!(first.len() > 1);
    }

    #[test]
    fn test_paginator_a4_capacity() {
        // 1123 - 80 - 140 - 40 - 40 = 823 px per page, 22 fallback rows of 36 px
        let paginator = Paginator::a4();
        assert_eq!(paginator.geometry().available_content_height(false), 823.0);

        let pages = paginator.paginate(&rows(22));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].row_count(), 22);
        assert!(pages[1].is_summary_only());
    }

    #[test]
    fn test_geometry_mut_refines_layout() {
        let mut paginator = Paginator::new(PageGeometry::bare(100.0).with_fallback_row_height(60.0));
        assert_eq!(paginator.paginate(&rows(2)).len(), 2);

        paginator.geometry_mut().row_heights = vec![20.0, 20.0].into();
        assert_eq!(paginator.paginate(&rows(2)).len(), 1);
    }
}
