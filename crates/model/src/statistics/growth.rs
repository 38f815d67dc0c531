use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Member growth over an inclusive date range: joins against expiries, with
/// a monthly breakdown over the union of months seen in either series.
#[derive(Debug, Clone, Default)]
pub struct GrowthReport {
    pub new_members: u64,
    pub expired_members: u64,
    pub net_growth: i64,
    pub monthly: BTreeMap<NaiveDate, MonthGrowth>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthGrowth {
    pub joins: u64,
    pub expires: u64,
}

impl MonthGrowth {
    pub fn net(&self) -> i64 {
        self.joins as i64 - self.expires as i64
    }
}
