use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use model::attendance::AttendanceSession;
use model::decimal::Decimal;
use model::errors::LedgerError;
use model::member::{Member, MemberStatus, MembershipType};
use model::payment::Payment;
use model::session::Session;
use model::statistics::attendance::AttendanceSummary;
use model::statistics::dashboard::{DashboardStats, RecentVisit};
use model::statistics::growth::{GrowthReport, MonthGrowth};
use model::statistics::membership::{MembershipDistribution, TypeShare};
use model::statistics::month_id;
use model::statistics::revenue::RevenueReport;
use storage::attendance::AttendanceStore;
use storage::member::MemberStore;
use storage::payment::PaymentStore;
use strum::IntoEnumIterator as _;

const RECENT_VISITS: i64 = 10;

/// Read-only aggregations over the other components' records. Loads through
/// the stores and folds in memory; never mutates.
#[derive(Clone)]
pub struct Reports {
    members: Arc<MemberStore>,
    attendance: Arc<AttendanceStore>,
    payments: Arc<PaymentStore>,
}

impl Reports {
    pub(crate) fn new(
        members: MemberStore,
        attendance: AttendanceStore,
        payments: PaymentStore,
    ) -> Self {
        Reports {
            members: Arc::new(members),
            attendance: Arc::new(attendance),
            payments: Arc::new(payments),
        }
    }

    pub async fn attendance_summary(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AttendanceSummary, LedgerError> {
        let sessions = self.attendance.range(session, from, to).await?;
        Ok(attendance_summary(&sessions))
    }

    pub async fn membership_distribution(
        &self,
        session: &mut Session,
    ) -> Result<MembershipDistribution, LedgerError> {
        let members = self.members.all(session).await?;
        Ok(membership_distribution(&members))
    }

    pub async fn revenue(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RevenueReport, LedgerError> {
        let payments = self.payments.paid_in_range(session, from, to).await?;
        Ok(revenue_report(&payments))
    }

    pub async fn growth(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<GrowthReport, LedgerError> {
        let joined = self.members.joined_in_range(session, from, to).await?;
        let expired = self.members.expired_in_range(session, from, to).await?;
        Ok(growth_report(&joined, &expired))
    }

    pub async fn dashboard(
        &self,
        session: &mut Session,
        today: NaiveDate,
    ) -> Result<DashboardStats, LedgerError> {
        let total_members = self.members.count(session).await?;
        let active_members = self
            .members
            .count_by_status(session, MemberStatus::Active)
            .await?;
        let expired_members = self
            .members
            .count_by_status(session, MemberStatus::Expired)
            .await?;
        let today_visits = self.attendance.count_for_date(session, today).await?;

        let mut recent = Vec::new();
        for visit in self.attendance.recent(session, RECENT_VISITS).await? {
            let member_name = self
                .members
                .get(session, visit.member_id)
                .await?
                .map(|member| member.name)
                .unwrap_or_else(|| "Unknown".to_string());
            recent.push(RecentVisit {
                member_name,
                date: visit.date,
                time_in: visit.time_in,
                time_out: visit.time_out,
            });
        }

        Ok(DashboardStats {
            total_members,
            active_members,
            expired_members,
            today_visits,
            recent,
        })
    }
}

fn attendance_summary(sessions: &[AttendanceSession]) -> AttendanceSummary {
    let mut daily = BTreeMap::new();
    let mut visitors = HashSet::new();
    for visit in sessions {
        *daily.entry(visit.date).or_insert(0u64) += 1;
        visitors.insert(visit.member_id);
    }

    let total_visits = sessions.len() as u64;
    let unique_members = visitors.len() as u64;
    AttendanceSummary {
        total_visits,
        unique_members,
        avg_visits_per_member: if unique_members > 0 {
            total_visits as f64 / unique_members as f64
        } else {
            0.0
        },
        daily,
    }
}

fn membership_distribution(members: &[Member]) -> MembershipDistribution {
    let total = members.len() as u64;
    let shares = MembershipType::iter()
        .map(|membership_type| {
            let count = members
                .iter()
                .filter(|member| member.membership_type == membership_type)
                .count() as u64;
            TypeShare {
                membership_type,
                count,
                percentage: if total > 0 {
                    count as f64 * 100.0 / total as f64
                } else {
                    0.0
                },
            }
        })
        .collect();
    MembershipDistribution { total, shares }
}

/// Expects the Paid payments of the range; groups by method and by month.
fn revenue_report(payments: &[Payment]) -> RevenueReport {
    let mut report = RevenueReport::default();
    for payment in payments {
        report.total += payment.amount;
        *report
            .by_method
            .entry(payment.payment_method)
            .or_insert(Decimal::zero()) += payment.amount;
        *report
            .monthly
            .entry(month_id(payment.payment_date))
            .or_insert(Decimal::zero()) += payment.amount;
    }
    report
}

/// Joins and expiries merged over the union of months; a month missing from
/// one series counts zero there.
fn growth_report(joined: &[Member], expired: &[Member]) -> GrowthReport {
    let mut monthly: BTreeMap<NaiveDate, MonthGrowth> = BTreeMap::new();
    for member in joined {
        monthly.entry(month_id(member.join_date)).or_default().joins += 1;
    }
    for member in expired {
        monthly
            .entry(month_id(member.expiry_date))
            .or_default()
            .expires += 1;
    }

    GrowthReport {
        new_members: joined.len() as u64,
        expired_members: expired.len() as u64,
        net_growth: joined.len() as i64 - expired.len() as i64,
        monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use model::member::{Gender, NewMember};
    use model::payment::{PaymentMethod, PaymentStatus};
    use mongodb::bson::oid::ObjectId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn member(membership_type: MembershipType, join: NaiveDate) -> Member {
        Member::new(
            NewMember {
                name: "Jane Roe".to_string(),
                gender: Gender::Female,
                date_of_birth: date(1992, 3, 4),
                phone: "5550100".to_string(),
                email: String::new(),
                address: String::new(),
                membership_type,
                join_date: join,
            },
            join,
        )
    }

    fn visit(member_id: ObjectId, day: NaiveDate) -> AttendanceSession {
        AttendanceSession::open(member_id, day, time(9, 0))
    }

    fn paid(amount: f64, day: NaiveDate, method: PaymentMethod) -> Payment {
        Payment::paid(
            ObjectId::new(),
            Decimal::from(amount),
            day,
            day,
            method,
        )
    }

    #[test]
    fn test_attendance_summary() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let sessions = vec![
            visit(a, date(2024, 1, 10)),
            visit(a, date(2024, 1, 11)),
            visit(b, date(2024, 1, 11)),
        ];

        let summary = attendance_summary(&sessions);
        assert_eq!(summary.total_visits, 3);
        assert_eq!(summary.unique_members, 2);
        assert_eq!(summary.avg_visits_per_member, 1.5);
        assert_eq!(summary.daily[&date(2024, 1, 10)], 1);
        assert_eq!(summary.daily[&date(2024, 1, 11)], 2);
    }

    #[test]
    fn test_attendance_summary_empty() {
        let summary = attendance_summary(&[]);
        assert_eq!(summary.total_visits, 0);
        assert_eq!(summary.unique_members, 0);
        assert_eq!(summary.avg_visits_per_member, 0.0);
        assert!(summary.daily.is_empty());
    }

    #[test]
    fn test_membership_distribution() {
        let members = vec![
            member(MembershipType::Basic, date(2024, 1, 1)),
            member(MembershipType::Basic, date(2024, 1, 2)),
            member(MembershipType::Premium, date(2024, 1, 3)),
            member(MembershipType::Basic, date(2024, 1, 4)),
        ];

        let distribution = membership_distribution(&members);
        assert_eq!(distribution.total, 4);
        assert_eq!(distribution.shares.len(), 3);

        let by_type: BTreeMap<_, _> = distribution
            .shares
            .iter()
            .map(|share| (share.membership_type, (share.count, share.percentage)))
            .collect();
        assert_eq!(by_type[&MembershipType::Basic], (3, 75.0));
        assert_eq!(by_type[&MembershipType::Standard], (0, 0.0));
        assert_eq!(by_type[&MembershipType::Premium], (1, 25.0));
    }

    #[test]
    fn test_membership_distribution_empty() {
        let distribution = membership_distribution(&[]);
        assert_eq!(distribution.total, 0);
        assert!(distribution
            .shares
            .iter()
            .all(|share| share.count == 0 && share.percentage == 0.0));
    }

    #[test]
    fn test_revenue_report() {
        let payments = vec![
            paid(50.0, date(2024, 1, 5), PaymentMethod::Cash),
            paid(30.0, date(2024, 1, 20), PaymentMethod::CreditCard),
            paid(20.0, date(2024, 2, 1), PaymentMethod::Cash),
        ];

        let report = revenue_report(&payments);
        assert_eq!(report.total, Decimal::int(100));
        assert_eq!(report.by_method[&PaymentMethod::Cash], Decimal::int(70));
        assert_eq!(
            report.by_method[&PaymentMethod::CreditCard],
            Decimal::int(30)
        );
        assert_eq!(report.monthly[&date(2024, 1, 1)], Decimal::int(80));
        assert_eq!(report.monthly[&date(2024, 2, 1)], Decimal::int(20));
        // chronological iteration
        let months: Vec<_> = report.monthly.keys().copied().collect();
        assert_eq!(months, vec![date(2024, 1, 1), date(2024, 2, 1)]);
    }

    #[test]
    fn test_revenue_partitions_sum_to_total() {
        let payments = vec![
            paid(10.0, date(2024, 1, 5), PaymentMethod::Cash),
            paid(15.0, date(2024, 2, 5), PaymentMethod::Cash),
            paid(25.0, date(2024, 3, 5), PaymentMethod::Other),
        ];
        for payment in &payments {
            assert_eq!(payment.status, PaymentStatus::Paid);
        }

        let split_at = date(2024, 2, 28);
        let (early, late): (Vec<_>, Vec<_>) = payments
            .iter()
            .cloned()
            .partition(|payment| payment.payment_date <= split_at);
        let total = revenue_report(&payments).total;
        assert_eq!(
            revenue_report(&early).total + revenue_report(&late).total,
            total
        );
        assert_eq!(total, Decimal::int(50));
    }

    #[test]
    fn test_growth_report_merges_month_union() {
        let joined = vec![
            member(MembershipType::Basic, date(2024, 1, 10)),
            member(MembershipType::Basic, date(2024, 3, 2)),
        ];
        let mut lapsed = member(MembershipType::Basic, date(2023, 12, 1));
        lapsed.expiry_date = date(2024, 2, 15);
        lapsed.status = MemberStatus::Expired;
        let expired = vec![lapsed];

        let report = growth_report(&joined, &expired);
        assert_eq!(report.new_members, 2);
        assert_eq!(report.expired_members, 1);
        assert_eq!(report.net_growth, 1);

        let months: Vec<_> = report.monthly.keys().copied().collect();
        assert_eq!(
            months,
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );
        assert_eq!(report.monthly[&date(2024, 1, 1)].net(), 1);
        assert_eq!(
            report.monthly[&date(2024, 2, 1)],
            MonthGrowth { joins: 0, expires: 1 }
        );
        assert_eq!(report.monthly[&date(2024, 2, 1)].net(), -1);
        assert_eq!(report.monthly[&date(2024, 3, 1)].net(), 1);
    }
}
