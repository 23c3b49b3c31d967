//! Report Layout - Pagination of measured report rows onto fixed-size pages
//!
//! This crate takes the rows of a tabular report together with the page
//! geometry (page height, margins, and the measured heights of the header,
//! footer, column header, summary block, and each row) and flows the rows
//! onto pages. The result is a list of self-contained page descriptors that a
//! renderer can paint and export one page at a time.

mod error;
mod export;
mod geometry;
mod measurement;
mod page;
mod paginator;
mod row;
mod settings;

pub use error::*;
pub use export::*;
pub use geometry::*;
pub use measurement::*;
pub use page::*;
pub use paginator::*;
pub use row::*;
pub use settings::*;
