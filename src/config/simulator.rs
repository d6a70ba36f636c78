/// Tuning for the simulated market feed. Noise amplitudes are relative to
/// the catalog baselines, so simulated prices random-walk around the seed
/// data instead of drifting off.
pub struct SimulatorConfig {
    pub tick_ms: u64,
    /// Price noise as a fraction of the baseline price (±1%).
    pub price_jitter_pct: f64,
    /// Percentage-point noise on the 1h / 24h / 7d change columns.
    pub change_1h_jitter: f64,
    pub change_24h_jitter: f64,
    pub change_7d_jitter: f64,
    /// Volume noise as a fraction of the baseline volume (±2%).
    pub volume_jitter_pct: f64,
    pub min_price: f64,
    pub min_volume: f64,
}

pub const SIMULATOR: SimulatorConfig = SimulatorConfig {
    tick_ms: 1500,
    price_jitter_pct: 0.01,
    change_1h_jitter: 0.1,
    change_24h_jitter: 0.15,
    change_7d_jitter: 0.2,
    volume_jitter_pct: 0.02,
    min_price: 0.01,
    min_volume: 1000.0,
};
