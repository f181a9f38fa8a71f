use std::time::Duration;

use log::*;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::server::ShopEngine;

/// Starts the payment sweep. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// The first pass runs immediately, so orders restored at startup are looked at straight away.
pub fn start_sweep_worker(engine: ShopEngine, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        // A slow bank API must not cause a burst of back-to-back sweeps.
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🕰️ Payment sweep worker started. Running every {}s", interval.as_secs());
        loop {
            timer.tick().await;
            trace!("🕰️ Running payment sweep");
            let report = engine.sweep().await;
            if report.completed + report.expired + report.shortfalls + report.failed > 0 {
                info!("🕰️ {report}");
            }
            if report.failed > 0 {
                error!("🕰️ {} orders could not be checked in this sweep. They will be retried.", report.failed);
            }
        }
    })
}
