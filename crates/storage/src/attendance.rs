use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use futures_util::stream::TryStreamExt;
use log::info;
use model::attendance::AttendanceSession;
use model::session::Session;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::session::Db;

const COLLECTION: &str = "attendance";

#[derive(Clone)]
pub struct AttendanceStore {
    pub(crate) sessions: Arc<Collection<AttendanceSession>>,
}

impl AttendanceStore {
    pub(crate) async fn new(db: &Db) -> Result<Self> {
        let sessions: Collection<AttendanceSession> = db.collection(COLLECTION);
        sessions
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "member_id": 1, "date": 1 })
                    .build(),
            )
            .await?;
        Ok(AttendanceStore {
            sessions: Arc::new(sessions),
        })
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<AttendanceSession>> {
        Ok(self
            .sessions
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    pub async fn insert(&self, session: &mut Session, record: &AttendanceSession) -> Result<()> {
        info!("Inserting attendance session: {:?}", record);
        self.sessions
            .insert_one(record)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn set_time_out(
        &self,
        session: &mut Session,
        id: ObjectId,
        time_out: NaiveTime,
    ) -> Result<()> {
        info!("Closing attendance session {} at {}", id, time_out);
        self.sessions
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "time_out": time_out.to_string() } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    /// The open session for (member, date) with the latest time-in, if any.
    pub async fn find_open(
        &self,
        session: &mut Session,
        member_id: ObjectId,
        date: NaiveDate,
    ) -> Result<Option<AttendanceSession>> {
        Ok(self
            .sessions
            .find_one(doc! {
                "member_id": member_id,
                "date": date.to_string(),
                "time_out": null,
            })
            .sort(doc! { "time_in": -1 })
            .session(&mut *session)
            .await?)
    }

    pub async fn list_for_date(
        &self,
        session: &mut Session,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceSession>> {
        let mut cursor = self
            .sessions
            .find(doc! { "date": date.to_string() })
            .sort(doc! { "time_in": -1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn list_for_member(
        &self,
        session: &mut Session,
        member_id: ObjectId,
    ) -> Result<Vec<AttendanceSession>> {
        let mut cursor = self
            .sessions
            .find(doc! { "member_id": member_id })
            .sort(doc! { "date": -1, "time_in": -1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn range(
        &self,
        session: &mut Session,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceSession>> {
        let mut cursor = self
            .sessions
            .find(doc! {
                "date": {
                    "$gte": from.to_string(),
                    "$lte": to.to_string(),
                }
            })
            .sort(doc! { "date": 1, "time_in": 1 })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn count_for_date(&self, session: &mut Session, date: NaiveDate) -> Result<u64> {
        Ok(self
            .sessions
            .count_documents(doc! { "date": date.to_string() })
            .session(&mut *session)
            .await?)
    }

    pub async fn recent(&self, session: &mut Session, limit: i64) -> Result<Vec<AttendanceSession>> {
        let mut cursor = self
            .sessions
            .find(doc! {})
            .sort(doc! { "date": -1, "time_in": -1 })
            .limit(limit)
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn delete_by_member(
        &self,
        session: &mut Session,
        member_id: ObjectId,
    ) -> Result<u64> {
        info!("Deleting attendance sessions of member {}", member_id);
        let result = self
            .sessions
            .delete_many(doc! { "member_id": member_id })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count)
    }
}
