use service::attendance::Attendance;
use service::members::Members;
use service::payments::Payments;
use service::reports::Reports;
use storage::session::Db;
use storage::Storage;

pub mod service;

#[derive(Clone)]
pub struct Ledger {
    pub db: Db,
    pub members: Members,
    pub attendance: Attendance,
    pub payments: Payments,
    pub reports: Reports,
}

impl Ledger {
    pub fn new(storage: Storage) -> Self {
        let members = Members::new(
            storage.members.clone(),
            storage.attendance.clone(),
            storage.payments.clone(),
        );
        let attendance = Attendance::new(storage.attendance.clone(), storage.members.clone());
        let payments = Payments::new(
            storage.payments.clone(),
            storage.members.clone(),
            members.clone(),
        );
        let reports = Reports::new(storage.members, storage.attendance, storage.payments);
        Ledger {
            db: storage.db,
            members,
            attendance,
            payments,
            reports,
        }
    }
}
