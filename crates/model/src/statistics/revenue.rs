use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{decimal::Decimal, payment::PaymentMethod};

/// Paid revenue over an inclusive date range. Monthly keys are month ids
/// (first of month), so iteration order is chronological.
#[derive(Debug, Clone, Default)]
pub struct RevenueReport {
    pub total: Decimal,
    pub by_method: BTreeMap<PaymentMethod, Decimal>,
    pub monthly: BTreeMap<NaiveDate, Decimal>,
}
