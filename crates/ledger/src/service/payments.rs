use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use log::info;
use model::decimal::Decimal;
use model::errors::LedgerError;
use model::payment::{Payment, PaymentMethod, PaymentStatus};
use model::session::Session;
use mongodb::bson::oid::ObjectId;
use storage::member::MemberStore;
use storage::payment::{PaymentSearch, PaymentStore};
use tx_macro::tx;

use super::members::Members;

/// Payment records and the revenue queries over them. Recording a payment
/// and extending the member's expiry commit in one transaction.
#[derive(Clone)]
pub struct Payments {
    store: Arc<PaymentStore>,
    member_store: Arc<MemberStore>,
    members: Members,
}

impl Payments {
    pub(crate) fn new(store: PaymentStore, member_store: MemberStore, members: Members) -> Self {
        Payments {
            store: Arc::new(store),
            member_store: Arc::new(member_store),
            members,
        }
    }

    #[tx]
    pub async fn record(
        &self,
        session: &mut Session,
        member_id: ObjectId,
        amount: Decimal,
        payment_date: NaiveDate,
        due_date: NaiveDate,
        method: PaymentMethod,
    ) -> Result<Payment, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let payment = Payment::paid(member_id, amount, payment_date, due_date, method);
        self.store.insert(session, &payment).await?;
        // Fails with MemberNotFound for an unknown member, aborting the
        // transaction so the payment record is not left orphaned.
        let expiry = self
            .members
            .extend_expiry(session, member_id, due_date)
            .await?;
        info!(
            "Recorded payment {} of {} for member {}; expiry now {}",
            payment.id, amount, member_id, expiry
        );
        Ok(payment)
    }

    pub async fn get(&self, session: &mut Session, id: ObjectId) -> Result<Payment, LedgerError> {
        self.store
            .get(session, id)
            .await?
            .ok_or(LedgerError::PaymentNotFound(id))
    }

    /// Search text matches the member name (case-insensitive) or, when it
    /// parses as one, a payment id. Newest payment date first.
    pub async fn find(
        &self,
        session: &mut Session,
        search: Option<&str>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>, LedgerError> {
        let search = match search {
            Some(text) => Some(PaymentSearch {
                member_ids: self.member_store.find_ids_by_name(session, text).await?,
                payment_id: ObjectId::parse_str(text).ok(),
            }),
            None => None,
        };
        Ok(self.store.find(session, search.as_ref(), status).await?)
    }

    pub async fn total_revenue(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let payments = self.store.paid_in_range(session, from, to).await?;
        Ok(payments.iter().map(|payment| payment.amount).sum())
    }

    pub async fn revenue_by_method(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeMap<PaymentMethod, Decimal>, LedgerError> {
        let payments = self.store.paid_in_range(session, from, to).await?;
        let mut by_method = BTreeMap::new();
        for payment in payments {
            *by_method
                .entry(payment.payment_method)
                .or_insert(Decimal::zero()) += payment.amount;
        }
        Ok(by_method)
    }
}
