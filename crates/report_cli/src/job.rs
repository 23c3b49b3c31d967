//! Report job files

use chrono::NaiveDate;
use report_layout::{Measurements, Row};
use serde::Deserialize;
use std::path::Path;

/// One line of a report as supplied by the caller
#[derive(Debug, Clone, Deserialize)]
pub struct JobRow {
    pub label: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// A report to paginate: metadata, rows, and optionally measured heights
#[derive(Debug, Clone, Deserialize)]
pub struct ReportJob {
    pub report_name: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default)]
    pub grouped: bool,
    pub rows: Vec<JobRow>,
    #[serde(default)]
    pub measurements: Measurements,
}

impl ReportJob {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Rows in paginator form, carrying the label as payload
    pub fn layout_rows(&self) -> Vec<Row<String>> {
        self.rows
            .iter()
            .map(|row| Row {
                payload: row.label.clone(),
                group_key: row.group.clone(),
            })
            .collect()
    }
}
