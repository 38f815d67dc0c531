use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use log::info;
use model::attendance::AttendanceSession;
use model::errors::LedgerError;
use model::session::Session;
use mongodb::bson::oid::ObjectId;
use storage::attendance::AttendanceStore;
use storage::member::MemberStore;
use tx_macro::tx;

/// Check-in/check-out state machine. Per (member, date) a session goes
/// NoSession -> Open -> Closed; at most one open session at a time, any
/// number of closed ones per day.
#[derive(Clone)]
pub struct Attendance {
    store: Arc<AttendanceStore>,
    members: Arc<MemberStore>,
}

impl Attendance {
    pub(crate) fn new(store: AttendanceStore, members: MemberStore) -> Self {
        Attendance {
            store: Arc::new(store),
            members: Arc::new(members),
        }
    }

    #[tx]
    pub async fn check_in(
        &self,
        session: &mut Session,
        member_id: ObjectId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<AttendanceSession, LedgerError> {
        if self.members.get(session, member_id).await?.is_none() {
            return Err(LedgerError::MemberNotFound(member_id));
        }
        if self.store.find_open(session, member_id, date).await?.is_some() {
            return Err(LedgerError::AlreadyCheckedIn { member_id, date });
        }

        let record = AttendanceSession::open(member_id, date, time);
        self.store.insert(session, &record).await?;
        info!("Member {} checked in at {} {}", member_id, date, time);
        Ok(record)
    }

    /// Closes the most recent open session for (member, date).
    #[tx]
    pub async fn check_out(
        &self,
        session: &mut Session,
        member_id: ObjectId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<AttendanceSession, LedgerError> {
        let mut record = self
            .store
            .find_open(session, member_id, date)
            .await?
            .ok_or(LedgerError::NoOpenSession { member_id, date })?;

        self.store.set_time_out(session, record.id, time).await?;
        record.time_out = Some(time);
        info!("Member {} checked out at {} {}", member_id, date, time);
        Ok(record)
    }

    /// Closes a session addressed by id. A session that is unknown or
    /// already closed is reported as not found; closing twice is rejected,
    /// not idempotent.
    #[tx]
    pub async fn check_out_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
        time: NaiveTime,
    ) -> Result<AttendanceSession, LedgerError> {
        let mut record = self
            .store
            .get(session, id)
            .await?
            .ok_or(LedgerError::SessionNotFound(id))?;
        if !record.is_open() {
            return Err(LedgerError::SessionNotFound(id));
        }

        self.store.set_time_out(session, id, time).await?;
        record.time_out = Some(time);
        info!("Attendance session {} closed at {}", id, time);
        Ok(record)
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<AttendanceSession, LedgerError> {
        self.store
            .get(session, id)
            .await?
            .ok_or(LedgerError::SessionNotFound(id))
    }

    pub async fn list_for_date(
        &self,
        session: &mut Session,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceSession>, LedgerError> {
        Ok(self.store.list_for_date(session, date).await?)
    }

    pub async fn list_for_member(
        &self,
        session: &mut Session,
        member_id: ObjectId,
    ) -> Result<Vec<AttendanceSession>, LedgerError> {
        Ok(self.store.list_for_member(session, member_id).await?)
    }
}
