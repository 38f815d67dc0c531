use std::sync::Arc;

use chrono::NaiveDate;
use eyre::Result;
use futures_util::stream::TryStreamExt;
use log::info;
use model::payment::{Payment, PaymentStatus};
use model::session::Session;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::session::Db;

const COLLECTION: &str = "payments";

/// Resolved search terms for the payment list: member ids matched by name
/// plus the search text parsed as a payment id, if it was one.
#[derive(Debug, Clone, Default)]
pub struct PaymentSearch {
    pub member_ids: Vec<ObjectId>,
    pub payment_id: Option<ObjectId>,
}

#[derive(Clone)]
pub struct PaymentStore {
    pub(crate) payments: Arc<Collection<Payment>>,
}

impl PaymentStore {
    pub(crate) async fn new(db: &Db) -> Result<Self> {
        let payments: Collection<Payment> = db.collection(COLLECTION);
        payments
            .create_index(IndexModel::builder().keys(doc! { "payment_date": -1 }).build())
            .await?;
        Ok(PaymentStore {
            payments: Arc::new(payments),
        })
    }

    pub async fn get(&self, session: &mut Session, id: ObjectId) -> Result<Option<Payment>> {
        Ok(self
            .payments
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    pub async fn insert(&self, session: &mut Session, payment: &Payment) -> Result<()> {
        info!("Inserting payment: {:?}", payment);
        self.payments
            .insert_one(payment)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn find(
        &self,
        session: &mut Session,
        search: Option<&PaymentSearch>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>> {
        let mut query = doc! {};
        if let Some(search) = search {
            let mut terms = vec![doc! { "member_id": { "$in": search.member_ids.clone() } }];
            if let Some(payment_id) = search.payment_id {
                terms.push(doc! { "_id": payment_id });
            }
            query.insert("$or", terms);
        }
        if let Some(status) = status {
            query.insert("status", status.to_string());
        }
        let mut cursor = self
            .payments
            .find(query)
            .sort(doc! { "payment_date": -1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    /// Paid payments with payment date in the inclusive range.
    pub async fn paid_in_range(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Payment>> {
        let mut cursor = self
            .payments
            .find(doc! {
                "status": PaymentStatus::Paid.to_string(),
                "payment_date": {
                    "$gte": from.to_string(),
                    "$lte": to.to_string(),
                }
            })
            .sort(doc! { "payment_date": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn delete_by_member(
        &self,
        session: &mut Session,
        member_id: ObjectId,
    ) -> Result<u64> {
        info!("Deleting payments of member {}", member_id);
        let result = self
            .payments
            .delete_many(doc! { "member_id": member_id })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count)
    }
}
