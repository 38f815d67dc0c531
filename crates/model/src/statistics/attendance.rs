use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Attendance totals over an inclusive date range.
#[derive(Debug, Clone, Default)]
pub struct AttendanceSummary {
    pub total_visits: u64,
    pub unique_members: u64,
    /// 0.0 when no member visited in the range.
    pub avg_visits_per_member: f64,
    pub daily: BTreeMap<NaiveDate, u64>,
}
