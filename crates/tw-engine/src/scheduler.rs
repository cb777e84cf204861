//! Recurring tick loop driving the sweeps.
//!
//! One task owns the controller; browser events and the manual-unload
//! command reach it through a channel, so sweeps and event handling never
//! overlap. A failed tick is logged and the loop simply waits for the next
//! one.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::controller::LifecycleController;
use crate::events::TabEvent;

/// Sweep tick period.
const TICK_PERIOD: Duration = Duration::from_secs(60);
/// The reaper runs every Nth tick (~30 minutes at the default period).
const REAPER_EVERY_TICKS: u64 = 30;

/// Commands accepted by the running engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineCommand {
    /// An inbound browser event to fold into the engine state.
    Event(TabEvent),
    /// Trigger the one-shot manual unload sweep.
    UnloadInactiveTabs,
    /// Stop the loop.
    Shutdown,
}

/// Handle to a running engine loop.
pub struct SchedulerHandle {
    tx: mpsc::Sender<EngineCommand>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub async fn send(&self, command: EngineCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .context("Engine loop is no longer running")
    }

    pub async fn dispatch_event(&self, event: TabEvent) -> Result<()> {
        self.send(EngineCommand::Event(event)).await
    }

    /// The single UI-to-engine message: unload inactive tabs now.
    pub async fn trigger_manual_unload(&self) -> Result<()> {
        self.send(EngineCommand::UnloadInactiveTabs).await
    }

    pub async fn shutdown(self) -> Result<()> {
        // The loop may already be gone; joining is what matters.
        let _ = self.tx.send(EngineCommand::Shutdown).await;
        self.task.await.context("Engine loop panicked")
    }
}

/// Spawn the engine loop with the default one-minute cadence.
pub fn run_scheduler(controller: LifecycleController) -> SchedulerHandle {
    run_scheduler_with_period(controller, TICK_PERIOD)
}

/// Spawn the engine loop with an explicit tick period (tests shrink it).
pub fn run_scheduler_with_period(
    mut controller: LifecycleController,
    tick_period: Duration,
) -> SchedulerHandle {
    let (tx, mut rx) = mpsc::channel::<EngineCommand>(64);

    let task = tokio::spawn(async move {
        let mut tick = tokio::time::interval(tick_period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick fires immediately; consume it so the
        // first sweep happens one full period after startup.
        tick.tick().await;

        let mut tick_count: u64 = 0;
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    tick_count += 1;
                    run_tick(&mut controller, tick_count).await;
                }
                command = rx.recv() => match command {
                    Some(EngineCommand::Event(event)) => controller.handle_event(event),
                    Some(EngineCommand::UnloadInactiveTabs) => {
                        match controller.manual_unload_sweep().await {
                            Ok(report) => {
                                info!(discarded = report.discarded, "Manual unload finished")
                            }
                            Err(err) => warn!(error = %err, "Manual unload failed"),
                        }
                    }
                    Some(EngineCommand::Shutdown) | None => {
                        debug!("Engine loop stopping");
                        break;
                    }
                },
            }
        }
    });

    SchedulerHandle { tx, task }
}

async fn run_tick(controller: &mut LifecycleController, tick_count: u64) {
    if let Err(err) = controller.inactivity_sweep().await {
        warn!(error = %err, "Inactivity sweep failed");
    }
    if let Err(err) = controller.scheduled_unload_sweep().await {
        warn!(error = %err, "Scheduled unload sweep failed");
    }
    if tick_count % REAPER_EVERY_TICKS == 0 {
        if let Err(err) = controller.stale_unload_reaper().await {
            warn!(error = %err, "Stale-unload reaper failed");
        }
    }
}
