use std::time::Duration;

use chrono::Local;
use eyre::{Error, Result};
use ledger::Ledger;
use log::{error, info};
use tokio::time;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub fn start(ledger: Ledger) {
    tokio::spawn(async move {
        let mut interval = time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(err) = sweep(&ledger).await {
                error!("Error in background process: {:#}", err);
            }
        }
    });
}

/// Persists Active -> Expired transitions once the clock has moved past a
/// member's expiry date. Runs in its own transaction, so it never interleaves
/// with a foreground mutation.
async fn sweep(ledger: &Ledger) -> Result<(), Error> {
    let mut session = ledger.db.start_session().await?;
    let today = Local::now().date_naive();
    let expired = ledger
        .members
        .refresh_statuses(&mut session, today)
        .await?;
    if expired > 0 {
        info!("Status sweep marked {} members expired", expired);
    }
    Ok(())
}
