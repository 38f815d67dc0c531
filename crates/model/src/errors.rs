use bson::oid::ObjectId;
use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Decimal;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Common error: {0}")]
    Eyre(#[from] eyre::Error),
    #[error("{0} is required")]
    RequiredField(&'static str),
    #[error("Payment amount must be positive: {0}")]
    InvalidAmount(Decimal),
    #[error("Member not found: {0}")]
    MemberNotFound(ObjectId),
    #[error("Attendance session not found: {0}")]
    SessionNotFound(ObjectId),
    #[error("Payment not found: {0}")]
    PaymentNotFound(ObjectId),
    #[error("Member already checked in")]
    AlreadyCheckedIn {
        member_id: ObjectId,
        date: NaiveDate,
    },
    #[error("No open session for member")]
    NoOpenSession {
        member_id: ObjectId,
        date: NaiveDate,
    },
    #[error("Mongo error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}
