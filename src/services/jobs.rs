use std::{future::Future, time::Duration};

use tokio::time::{self, MissedTickBehavior};

use crate::AppState;

use super::{alerts_service, price_service, spike_monitor};

/// Starts the three periodic jobs. They share nothing but the stores and
/// run on their own interval each.
pub fn spawn_jobs(state: AppState) {
    let every = Duration::from_secs(state.settings.job_interval_secs);

    spawn_job("price-fetcher", every, state.clone(), |s| async move {
        price_service::fetch_and_store(&s).await;
    });

    spawn_job("threshold-alerts", every, state.clone(), |s| async move {
        alerts_service::check_alerts(&s).await;
    });

    spawn_job("price-spike", every, state, |s| async move {
        spike_monitor::check_price_increase(&s).await;
    });
}

fn spawn_job<F, Fut>(name: &'static str, every: Duration, state: AppState, job: F)
where
    F: Fn(AppState) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tracing::info!("[{}] scheduled every {}s", name, every.as_secs());

    tokio::spawn(async move {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            tracing::debug!("[{}] tick", name);
            job(state.clone()).await;
        }
    });
}
