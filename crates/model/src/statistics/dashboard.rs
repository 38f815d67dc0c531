use chrono::{NaiveDate, NaiveTime};

/// The at-a-glance numbers the front page shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_members: u64,
    pub active_members: u64,
    pub expired_members: u64,
    pub today_visits: u64,
    /// Most recent visits, date then time-in descending.
    pub recent: Vec<RecentVisit>,
}

#[derive(Debug, Clone)]
pub struct RecentVisit {
    pub member_name: String,
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub time_out: Option<NaiveTime>,
}
