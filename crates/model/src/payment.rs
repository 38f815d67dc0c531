use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::decimal::Decimal;

/// Immutable once recorded. Recording a payment may ratchet the owning
/// member's expiry date forward to `due_date`, never backward.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub member_id: ObjectId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
}

impl Payment {
    pub fn paid(
        member_id: ObjectId,
        amount: Decimal,
        payment_date: NaiveDate,
        due_date: NaiveDate,
        payment_method: PaymentMethod,
    ) -> Payment {
        Payment {
            id: ObjectId::new(),
            member_id,
            amount,
            payment_date,
            due_date,
            payment_method,
            status: PaymentStatus::Paid,
        }
    }
}

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Credit Card")]
    #[strum(serialize = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    #[strum(serialize = "Debit Card")]
    DebitCard,
    #[serde(rename = "Bank Transfer")]
    #[strum(serialize = "Bank Transfer")]
    BankTransfer,
    Other,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display,
)]
pub enum PaymentStatus {
    Paid,
    Pending,
}
