//! File persistence configuration

/// Where user preferences live and how often they may be written.
pub struct PersistenceConfig {
    /// Path for the saved filter/sort preferences. Only preferences are
    /// ever written here; asset data never round-trips through disk.
    pub prefs_path: &'static str,
    /// Minimum interval between preference writes.
    pub save_throttle_ms: u64,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    prefs_path: ".coin_scope_prefs.json",
    save_throttle_ms: 1000,
};
