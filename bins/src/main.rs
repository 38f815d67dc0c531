use std::env;

use chrono::Local;
use dotenv::dotenv;
use eyre::Context;
use log::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Err(err) = dotenv() {
        info!("Failed to load .env file: {}", err);
    }
    pretty_env_logger::init();
    color_eyre::install()?;
    info!("connecting to mongo");
    let mongo_url = env::var("MONGO_URL").context("Failed to get MONGO_URL from env")?;
    let storage = storage::Storage::new(&mongo_url)
        .await
        .context("Failed to create storage")?;
    info!("creating ledger");
    let ledger = ledger::Ledger::new(storage);

    bg_process::start(ledger.clone());

    let mut session = ledger.db.start_session().await?;
    let today = Local::now().date_naive();
    let stats = ledger.reports.dashboard(&mut session, today).await?;
    println!(
        "Members: {} total, {} active, {} expired",
        stats.total_members, stats.active_members, stats.expired_members
    );
    println!("Visits today: {}", stats.today_visits);
    for visit in &stats.recent {
        let time_out = visit
            .time_out
            .map(|time| time.to_string())
            .unwrap_or_else(|| "In Progress".to_string());
        println!(
            "{} {} {} - {}",
            visit.date, visit.member_name, visit.time_in, time_out
        );
    }

    info!("Running status sweep until interrupted...");
    tokio::signal::ctrl_c().await?;
    Ok(())
}
