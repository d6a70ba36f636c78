//! Simulated market feed: random-walk updates around the catalog
//! baselines, batched into the store at a fixed cadence.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use tokio::runtime::Runtime;

use crate::config::{CATALOG, CatalogEntry, SIMULATOR};
use crate::data::{ConnectionPhase, FeedGate, FeedHandle, FeedKind};
use crate::models::AssetUpdate;
use crate::store::SharedStore;
use crate::utils::round_dp;

#[cfg(debug_assertions)]
use crate::config::DF;

pub struct SimulatedFeed {
    gate: Arc<FeedGate>,
}

impl SimulatedFeed {
    pub fn start(store: SharedStore) -> Self {
        Self::with_interval(store, Duration::from_millis(SIMULATOR.tick_ms))
    }

    /// Tick period injectable so tests don't wait 1.5s per batch.
    pub fn with_interval(store: SharedStore, tick: Duration) -> Self {
        let gate = FeedGate::new();
        let loop_gate = Arc::clone(&gate);

        // Dedicated thread owning its own runtime, same shape as the live
        // stream, so dropping the UI never blocks on feed teardown.
        thread::spawn(move || {
            let rt = Runtime::new().expect("failed to create feed runtime");
            rt.block_on(run_tick_loop(store, loop_gate, tick));
        });

        Self { gate }
    }
}

impl FeedHandle for SimulatedFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Simulated
    }

    fn phase(&self) -> ConnectionPhase {
        if self.gate.is_open() {
            ConnectionPhase::Streaming
        } else {
            ConnectionPhase::Idle
        }
    }

    fn stop(&mut self) {
        self.gate.close();
    }
}

impl Drop for SimulatedFeed {
    fn drop(&mut self) {
        self.gate.close();
    }
}

async fn run_tick_loop(store: SharedStore, gate: Arc<FeedGate>, tick: Duration) {
    while gate.is_open() {
        tokio::select! {
            _ = gate.closed() => break,
            _ = tokio::time::sleep(tick) => {}
        }

        let updates = generate_tick_updates();
        let delivered = gate.apply(|| store.lock().unwrap().update_many_assets(&updates));
        if !delivered {
            break;
        }

        #[cfg(debug_assertions)]
        if DF.log_simulator_ticks {
            log::info!("[sim-tick] pushed {} asset updates", updates.len());
        }
    }
}

/// One batch: every catalog entry gets fresh noise around its baseline.
pub(crate) fn generate_tick_updates() -> Vec<(u32, AssetUpdate)> {
    let mut rng = rand::thread_rng();
    CATALOG
        .iter()
        .map(|entry| (entry.id, sample_entry(entry, &mut rng)))
        .collect()
}

fn sample_entry(entry: &CatalogEntry, rng: &mut impl Rng) -> AssetUpdate {
    let price_delta = rng.gen_range(-1.0..1.0) * entry.price * SIMULATOR.price_jitter_pct;
    let price = (entry.price + price_delta).max(SIMULATOR.min_price);

    let volume_delta = rng.gen_range(-1.0..1.0) * entry.volume_24h * SIMULATOR.volume_jitter_pct;
    let volume = (entry.volume_24h + volume_delta).max(SIMULATOR.min_volume);

    AssetUpdate {
        price: Some(round_dp(price, 2)),
        price_change_1h: Some(round_dp(
            entry.change_1h + rng.gen_range(-SIMULATOR.change_1h_jitter..SIMULATOR.change_1h_jitter),
            2,
        )),
        price_change_24h: Some(round_dp(
            entry.change_24h
                + rng.gen_range(-SIMULATOR.change_24h_jitter..SIMULATOR.change_24h_jitter),
            2,
        )),
        price_change_7d: Some(round_dp(
            entry.change_7d + rng.gen_range(-SIMULATOR.change_7d_jitter..SIMULATOR.change_7d_jitter),
            2,
        )),
        volume_24h: Some(volume.trunc()),
        ..AssetUpdate::default()
    }
}
