//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Emit verbose logging for live stream connections and ticks.
    pub log_stream_updates: bool,

    /// Emit one line per simulated batch.
    pub log_simulator_ticks: bool,

    /// Log preference load/save activity.
    pub log_preferences: bool,

    /// Log feed mount/unmount transitions.
    pub log_feed_switches: bool,
}

pub const DF: LogFlags = LogFlags {
    log_feed_switches: true,

    log_stream_updates: false,
    log_simulator_ticks: false,
    log_preferences: false,
};
