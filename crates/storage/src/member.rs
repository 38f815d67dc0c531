use std::sync::Arc;

use chrono::NaiveDate;
use eyre::{Error, Result};
use futures_util::stream::TryStreamExt;
use log::info;
use model::member::{Member, MemberStatus};
use model::session::Session;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::session::Db;

const COLLECTION: &str = "members";

#[derive(Clone)]
pub struct MemberStore {
    pub(crate) members: Arc<Collection<Member>>,
}

impl MemberStore {
    pub(crate) async fn new(db: &Db) -> Result<Self> {
        let members: Collection<Member> = db.collection(COLLECTION);
        members
            .create_index(IndexModel::builder().keys(doc! { "name": 1 }).build())
            .await?;
        Ok(MemberStore {
            members: Arc::new(members),
        })
    }

    pub async fn get(&self, session: &mut Session, id: ObjectId) -> Result<Option<Member>> {
        Ok(self
            .members
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    pub async fn insert(&self, session: &mut Session, member: &Member) -> Result<()> {
        info!("Inserting member: {:?}", member);
        self.members
            .insert_one(member)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn replace(&self, session: &mut Session, member: &Member) -> Result<()> {
        info!("Updating member: {:?}", member);
        let result = self
            .members
            .replace_one(doc! { "_id": member.id }, member)
            .session(&mut *session)
            .await?;
        if result.matched_count != 1 {
            return Err(Error::msg("Member not found"));
        }
        Ok(())
    }

    pub async fn set_expiry(
        &self,
        session: &mut Session,
        id: ObjectId,
        expiry_date: NaiveDate,
    ) -> Result<()> {
        info!("Set expiry for member {}: {}", id, expiry_date);
        self.members
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "expiry_date": expiry_date.to_string() } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn set_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        status: MemberStatus,
    ) -> Result<()> {
        info!("Set status for member {}: {}", id, status);
        self.members
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": status.to_string() } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<bool> {
        info!("Deleting member: {}", id);
        let result = self
            .members
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count == 1)
    }

    /// Case-insensitive substring match on name or phone, optional status
    /// equality, name ascending.
    pub async fn find(
        &self,
        session: &mut Session,
        search: Option<&str>,
        status: Option<MemberStatus>,
    ) -> Result<Vec<Member>> {
        let mut query = doc! {};
        if let Some(search) = search {
            query.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": search, "$options": "i" } },
                    doc! { "phone": { "$regex": search, "$options": "i" } },
                ],
            );
        }
        if let Some(status) = status {
            query.insert("status", status.to_string());
        }
        let mut cursor = self
            .members
            .find(query)
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn find_ids_by_name(
        &self,
        session: &mut Session,
        search: &str,
    ) -> Result<Vec<ObjectId>> {
        let members = self.find(session, Some(search), None).await?;
        Ok(members.into_iter().map(|member| member.id).collect())
    }

    pub async fn all(&self, session: &mut Session) -> Result<Vec<Member>> {
        let mut cursor = self
            .members
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn count(&self, session: &mut Session) -> Result<u64> {
        Ok(self
            .members
            .count_documents(doc! {})
            .session(&mut *session)
            .await?)
    }

    pub async fn count_by_status(
        &self,
        session: &mut Session,
        status: MemberStatus,
    ) -> Result<u64> {
        Ok(self
            .members
            .count_documents(doc! { "status": status.to_string() })
            .session(&mut *session)
            .await?)
    }

    pub async fn joined_in_range(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Member>> {
        let mut cursor = self
            .members
            .find(doc! {
                "join_date": {
                    "$gte": from.to_string(),
                    "$lte": to.to_string(),
                }
            })
            .sort(doc! { "join_date": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn expired_in_range(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Member>> {
        let mut cursor = self
            .members
            .find(doc! {
                "status": MemberStatus::Expired.to_string(),
                "expiry_date": {
                    "$gte": from.to_string(),
                    "$lte": to.to_string(),
                }
            })
            .sort(doc! { "expiry_date": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    /// Members still cached as Active whose expiry date has passed.
    pub async fn find_to_expire(
        &self,
        session: &mut Session,
        today: NaiveDate,
    ) -> Result<Vec<Member>> {
        let mut cursor = self
            .members
            .find(doc! {
                "status": MemberStatus::Active.to_string(),
                "expiry_date": { "$lt": today.to_string() },
            })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }
}
