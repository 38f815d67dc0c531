use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::info;
use model::errors::LedgerError;
use model::member::{sanitize_phone, Member, MemberStatus, MemberUpdate, NewMember};
use model::session::Session;
use mongodb::bson::oid::ObjectId;
use storage::attendance::AttendanceStore;
use storage::member::MemberStore;
use storage::payment::PaymentStore;
use tx_macro::tx;

/// Membership lifecycle: registration, edits, expiry extension, cascade
/// removal. Owns the Member collection; attendance and payment stores are
/// only touched here for the cascade.
#[derive(Clone)]
pub struct Members {
    store: Arc<MemberStore>,
    attendance: Arc<AttendanceStore>,
    payments: Arc<PaymentStore>,
}

impl Members {
    pub(crate) fn new(
        store: MemberStore,
        attendance: AttendanceStore,
        payments: PaymentStore,
    ) -> Self {
        Members {
            store: Arc::new(store),
            attendance: Arc::new(attendance),
            payments: Arc::new(payments),
        }
    }

    #[tx]
    pub async fn register(
        &self,
        session: &mut Session,
        form: NewMember,
    ) -> Result<Member, LedgerError> {
        required("name", &form.name)?;
        required("phone", &form.phone)?;

        let member = Member::new(form, Local::now().date_naive());
        self.store.insert(session, &member).await?;
        info!("Registered member {} ({})", member.name, member.id);
        Ok(member)
    }

    /// Edit-wins policy: a changed membership type or join date recomputes
    /// expiry (overwriting any payment-driven extension), otherwise the
    /// submitted expiry date is stored as-is. Status is taken as given.
    #[tx]
    pub async fn update(
        &self,
        session: &mut Session,
        id: ObjectId,
        update: MemberUpdate,
    ) -> Result<Member, LedgerError> {
        required("name", &update.name)?;
        required("phone", &update.phone)?;

        let current = self
            .store
            .get(session, id)
            .await?
            .ok_or(LedgerError::MemberNotFound(id))?;

        let expiry_date = if update.membership_type != current.membership_type
            || update.join_date != current.join_date
        {
            update.membership_type.expiry_from(update.join_date)
        } else {
            update.expiry_date
        };

        let member = Member {
            id,
            name: update.name,
            gender: update.gender,
            date_of_birth: update.date_of_birth,
            phone: sanitize_phone(&update.phone),
            email: update.email,
            address: update.address,
            membership_type: update.membership_type,
            join_date: update.join_date,
            expiry_date,
            status: update.status,
        };
        self.store.replace(session, &member).await?;
        Ok(member)
    }

    /// Monotonic ratchet: expiry only ever moves forward from a payment.
    /// Returns the expiry date in effect afterwards.
    pub async fn extend_expiry(
        &self,
        session: &mut Session,
        id: ObjectId,
        due_date: NaiveDate,
    ) -> Result<NaiveDate, LedgerError> {
        let member = self
            .store
            .get(session, id)
            .await?
            .ok_or(LedgerError::MemberNotFound(id))?;
        let expiry_date = member.extended_expiry(due_date);
        if expiry_date == member.expiry_date {
            return Ok(expiry_date);
        }
        self.store.set_expiry(session, id, expiry_date).await?;
        info!("Extended member {} expiry to {}", id, expiry_date);
        Ok(expiry_date)
    }

    /// Removes the member together with all attendance and payment records.
    #[tx]
    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<(), LedgerError> {
        if self.store.get(session, id).await?.is_none() {
            return Err(LedgerError::MemberNotFound(id));
        }
        let sessions = self.attendance.delete_by_member(session, id).await?;
        let payments = self.payments.delete_by_member(session, id).await?;
        self.store.delete(session, id).await?;
        info!(
            "Deleted member {} with {} attendance and {} payment records",
            id, sessions, payments
        );
        Ok(())
    }

    pub async fn get(&self, session: &mut Session, id: ObjectId) -> Result<Member, LedgerError> {
        let member = self
            .store
            .get(session, id)
            .await?
            .ok_or(LedgerError::MemberNotFound(id))?;
        Ok(refresh_status(member))
    }

    pub async fn find(
        &self,
        session: &mut Session,
        search: Option<&str>,
        status: Option<MemberStatus>,
    ) -> Result<Vec<Member>, LedgerError> {
        let members = self.store.find(session, search, status).await?;
        Ok(members.into_iter().map(refresh_status).collect())
    }

    /// Persists Active -> Expired transitions for members whose expiry has
    /// passed. Returns the number of transitions.
    #[tx]
    pub async fn refresh_statuses(
        &self,
        session: &mut Session,
        today: NaiveDate,
    ) -> Result<u64, LedgerError> {
        let stale = self.store.find_to_expire(session, today).await?;
        for member in &stale {
            self.store
                .set_status(session, member.id, MemberStatus::Expired)
                .await?;
        }
        Ok(stale.len() as u64)
    }
}

/// The stored status is a display cache; reads hand out the derived value.
fn refresh_status(mut member: Member) -> Member {
    member.status = member.effective_status(Local::now().date_naive());
    member
}

fn required(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        Err(LedgerError::RequiredField(field))
    } else {
        Ok(())
    }
}
