//! In-memory snapshot of the most recent history records.

use chrono::NaiveDate;

use crate::record::{HistoryColumn, HistoryRecord};

/// The recent-history working set for one composer run, most recent first.
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    records: Vec<HistoryRecord>,
}

impl HistoryWindow {
    /// Wrap records already ordered most recent first.
    pub fn new(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn most_recent(&self) -> Option<&HistoryRecord> {
        self.records.first()
    }

    /// The `n` most recent records (fewer if the window is shorter).
    pub fn recent(&self, n: usize) -> &[HistoryRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Most recent date on which `value` was selected for `column`.
    pub fn last_used(&self, column: HistoryColumn, value: &str) -> Option<NaiveDate> {
        self.records
            .iter()
            .find(|r| column.value_of(r) == value)
            .map(|r| r.date)
    }
}
