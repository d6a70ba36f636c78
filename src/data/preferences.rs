//! Saved user preferences: filters and sorting only. Asset data never
//! round-trips through disk — the type simply has no field for it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::PERSISTENCE;
use crate::models::{FilterState, SortState};

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedPreferences {
    pub filters: FilterState,
    pub sorting: SortState,
}

/// Read saved preferences from the default location. Absent or corrupt
/// state means "no saved preferences"; the UI falls back to its defaults.
pub fn load_preferences() -> Option<SavedPreferences> {
    load_from(Path::new(PERSISTENCE.prefs_path))
}

pub fn load_from(path: &Path) -> Option<SavedPreferences> {
    if !path.exists() {
        return None;
    }
    match read_preferences(path) {
        Ok(prefs) => {
            #[cfg(debug_assertions)]
            if DF.log_preferences {
                log::info!("loaded preferences from {}", path.display());
            }
            Some(prefs)
        }
        Err(e) => {
            log::warn!("ignoring saved preferences at {}: {e:#}", path.display());
            None
        }
    }
}

fn read_preferences(path: &Path) -> Result<SavedPreferences> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).context("malformed preferences payload")
}

/// Write preferences, swallowing failures: a missed save only costs the
/// user their filter state on the next launch.
pub fn save_preferences(prefs: &SavedPreferences) {
    save_to(Path::new(PERSISTENCE.prefs_path), prefs);
}

pub fn save_to(path: &Path, prefs: &SavedPreferences) {
    if let Err(e) = write_preferences(path, prefs) {
        log::warn!("failed to save preferences to {}: {e:#}", path.display());
    }
}

fn write_preferences(path: &Path, prefs: &SavedPreferences) -> Result<()> {
    let payload = serde_json::to_string_pretty(prefs)?;
    fs::write(path, payload).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceChangeFilter, SortColumn, SortDirection};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn test_preferences_round_trip() {
        let path = temp_path("coin_scope_prefs_roundtrip.json");

        let prefs = SavedPreferences {
            filters: FilterState {
                search_term: "btc".to_string(),
                min_price: Some(10.0),
                max_price: None,
                price_change_type: PriceChangeFilter::Gainers,
            },
            sorting: SortState {
                column: SortColumn::Price,
                direction: SortDirection::Ascending,
            },
        };
        save_to(&path, &prefs);

        let loaded = load_from(&path).expect("saved preferences must load");
        assert_eq!(loaded, prefs);

        // The payload holds nothing but filters and sorting.
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<&String> = raw.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["filters", "sorting"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        assert!(load_from(&temp_path("coin_scope_prefs_missing.json")).is_none());
    }

    #[test]
    fn test_corrupt_payload_loads_as_none() {
        let path = temp_path("coin_scope_prefs_corrupt.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_from(&path).is_none());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        // An older payload with extra keys (e.g. a stale "assets" blob)
        // still loads; the unknown parts are simply ignored.
        let path = temp_path("coin_scope_prefs_extra.json");
        fs::write(
            &path,
            r#"{"filters": {"searchTerm": "sol"}, "sorting": {"column": "volume24h", "direction": "desc"}, "assets": []}"#,
        )
        .unwrap();

        let loaded = load_from(&path).expect("payload with extra keys must load");
        assert_eq!(loaded.filters.search_term, "sol");
        assert_eq!(loaded.sorting.column, SortColumn::Volume24h);

        fs::remove_file(&path).unwrap();
    }
}
