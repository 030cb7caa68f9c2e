//! Orphan sweep.
//!
//! Post deletion removes only the post document; like markers and replies
//! under a deleted post linger until this job collects them.

use crate::state::AppState;

use super::Scheduler;

/// Register the recurring orphan sweep on the scheduler.
pub async fn spawn_orphan_sweep(
    scheduler: &Scheduler,
    state: AppState,
) -> Result<(), tokio_cron_scheduler::JobSchedulerError> {
    let schedule = scheduler.config().orphan_sweep_schedule.clone();

    scheduler
        .add_cron(&schedule, move || {
            let state = state.clone();
            async move {
                match state.likes.delete_orphaned().await {
                    Ok(swept) if swept > 0 => {
                        tracing::info!(swept, "Removed orphaned like markers");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "Like marker sweep failed"),
                }

                match state.replies.delete_orphaned().await {
                    Ok(swept) if swept > 0 => {
                        tracing::info!(swept, "Removed orphaned replies");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "Reply sweep failed"),
                }
            }
        })
        .await?;

    Ok(())
}
