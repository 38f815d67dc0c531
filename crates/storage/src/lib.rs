pub mod attendance;
pub mod member;
pub mod payment;
pub mod session;

use attendance::AttendanceStore;
use eyre::Result;
use member::MemberStore;
use payment::PaymentStore;
use session::Db;

const DB_NAME: &str = "gym_management";

#[derive(Clone)]
pub struct Storage {
    pub db: Db,
    pub members: MemberStore,
    pub attendance: AttendanceStore,
    pub payments: PaymentStore,
}

impl Storage {
    pub async fn new(uri: &str) -> Result<Self> {
        let db = Db::new(uri, DB_NAME).await?;
        let members = MemberStore::new(&db).await?;
        let attendance = AttendanceStore::new(&db).await?;
        let payments = PaymentStore::new(&db).await?;

        Ok(Storage {
            db,
            members,
            attendance,
            payments,
        })
    }
}
