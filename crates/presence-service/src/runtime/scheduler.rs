//! Periodic task loops for the sampler and rank computer

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use presence_core::traits::RosterProvider;

use crate::services::{PresenceSampler, RankComputer, ServiceContext, ServiceResult};
use crate::settings::CollectorSettings;

use super::shutdown::Shutdown;

/// Run `task` on a fixed interval until shutdown. A cancelled run ends the
/// loop; any other error is logged and the next tick proceeds.
pub async fn run_every<F, Fut, T>(name: &'static str, period: Duration, mut shutdown: Shutdown, mut task: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ServiceResult<T>>,
{
    let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(task = name, period_ms = period.as_millis() as u64, "Periodic task started");
    loop {
        tokio::select! {
            biased;
            () = shutdown.wait() => break,
            _ = ticker.tick() => {}
        }

        match task().await {
            Ok(_) => {}
            Err(e) if e.is_cancelled() => break,
            Err(e) => error!(task = name, error = %e, "Periodic task failed"),
        }
    }
    info!(task = name, "Periodic task stopped");
}

/// Spawn the presence sampler and rank computer loops
pub fn spawn_collector(
    ctx: ServiceContext,
    roster: Arc<dyn RosterProvider>,
    settings: CollectorSettings,
    shutdown: Shutdown,
) -> Vec<JoinHandle<()>> {
    let settings = Arc::new(settings);

    let sampler = {
        let ctx = ctx.clone();
        let roster = roster.clone();
        let settings = settings.clone();
        let period = settings.sample_interval;
        tokio::spawn(run_every("presence_sampler", period, shutdown.clone(), move || {
            let ctx = ctx.clone();
            let roster = roster.clone();
            let settings = settings.clone();
            async move {
                PresenceSampler::new(&ctx, roster.as_ref(), &settings.sampler)
                    .sweep()
                    .await
            }
        }))
    };

    let rank = {
        let period = settings.rank.interval;
        tokio::spawn(run_every("rank_computer", period, shutdown, move || {
            let ctx = ctx.clone();
            let roster = roster.clone();
            let settings = settings.clone();
            async move {
                RankComputer::new(&ctx, roster.as_ref(), &settings.rank, settings.query)
                    .refresh_all()
                    .await
            }
        }))
    };

    vec![sampler, rank]
}
