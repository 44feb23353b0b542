//! Single-writer event loop.
//!
//! Inbound records and rate ticks are applied one at a time under the state's write lock, so
//! HTTP readers only ever observe state between two complete updates.

use crate::state::DashboardState;
use chrono::Utc;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const INBOUND_QUEUE_DEPTH: usize = 1024;

pub type SharedState = Arc<RwLock<DashboardState>>;

pub fn read_state(state: &SharedState) -> RwLockReadGuard<'_, DashboardState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_state(state: &SharedState) -> RwLockWriteGuard<'_, DashboardState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub enum Inbound {
    Record(Value),
    /// The transport lost and re-established its connection.
    Reconnected,
}

pub fn inbound_channel() -> (mpsc::Sender<Inbound>, mpsc::Receiver<Inbound>) {
    mpsc::channel(INBOUND_QUEUE_DEPTH)
}

pub struct Engine {
    state: SharedState,
    inbound: mpsc::Receiver<Inbound>,
    tick_every: Duration,
}

impl Engine {
    pub fn new(
        state: SharedState,
        inbound: mpsc::Receiver<Inbound>,
        tick_every: Duration,
    ) -> Self {
        Self {
            state,
            inbound,
            tick_every,
        }
    }

    /// Runs until every sender of the inbound channel is dropped.
    pub async fn run(mut self) {
        let mut ticker = interval(self.tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut processed: u64 = 0;

        loop {
            tokio::select! {
                inbound = self.inbound.recv() => match inbound {
                    Some(Inbound::Record(record)) => {
                        let report = write_state(&self.state).ingest(&record, Utc::now());
                        processed += 1;
                        if report.discarded() {
                            debug!(processed, "record discarded");
                        }
                    }
                    Some(Inbound::Reconnected) => {
                        if write_state(&self.state).on_reconnect() {
                            info!("transport reconnected, rate window reset");
                        }
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    let rate = write_state(&self.state).tick(Utc::now());
                    debug!(rate, "rate tick");
                }
            }
        }

        info!(processed, "inbound channel closed, engine stopped");
    }
}
