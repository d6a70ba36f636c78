//! The asset store: current market data plus the user's filter/sort
//! preferences, behind a small set of synchronous mutation operations.

mod selector;

pub use selector::{ViewCache, compute_view};

use std::sync::{Arc, Mutex};

use crate::config::CATALOG;
use crate::models::{
    Asset, AssetUpdate, FilterState, PriceChangeFilter, SortColumn, SortDirection, SortState,
};
use crate::utils::now_timestamp_ms;

/// Shared handle. The store is mutated from the UI thread and from
/// whichever feed adapter is mounted, always under this lock, so readers
/// never observe a half-applied update.
pub type SharedStore = Arc<Mutex<AssetStore>>;

pub struct AssetStore {
    assets: Vec<Asset>,
    filters: FilterState,
    sorting: SortState,
    /// Bumped on every asset mutation; the view cache keys on it.
    /// Filter/sort changes are compared by value instead.
    revision: u64,
}

impl AssetStore {
    pub fn seeded() -> Self {
        Self::with_preferences(FilterState::default(), SortState::default())
    }

    /// Seed assets from the static catalog. Saved preferences only ever
    /// supply filters and sorting, never asset data.
    pub fn with_preferences(filters: FilterState, sorting: SortState) -> Self {
        let now = now_timestamp_ms();
        Self {
            assets: CATALOG.iter().map(|e| Asset::from_catalog(e, now)).collect(),
            filters,
            sorting,
            revision: 0,
        }
    }

    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::seeded()))
    }

    pub fn shared_with_preferences(filters: FilterState, sorting: SortState) -> SharedStore {
        Arc::new(Mutex::new(Self::with_preferences(filters, sorting)))
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset_by_id(&self, id: u32) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sorting(&self) -> SortState {
        self.sorting
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge a partial update into the asset with this id. Unknown ids are
    /// dropped, not an error.
    pub fn update_asset(&mut self, id: u32, update: AssetUpdate) {
        let now = now_timestamp_ms();
        if let Some(asset) = self.assets.iter_mut().find(|a| a.id == id) {
            asset.apply(&update, now);
            self.revision += 1;
        }
    }

    /// Apply a batch of updates. One revision bump per batch; the caller
    /// holds the store lock for the whole call, so the batch is atomic
    /// from any reader's point of view.
    pub fn update_many_assets(&mut self, updates: &[(u32, AssetUpdate)]) {
        let now = now_timestamp_ms();
        let mut touched = false;
        for (id, update) in updates {
            if let Some(asset) = self.assets.iter_mut().find(|a| a.id == *id) {
                asset.apply(update, now);
                touched = true;
            }
        }
        if touched {
            self.revision += 1;
        }
    }

    pub fn set_search_filter(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
    }

    pub fn set_price_filter(&mut self, min: Option<f64>, max: Option<f64>) {
        self.filters.min_price = min;
        self.filters.max_price = max;
    }

    pub fn set_price_change_filter(&mut self, kind: PriceChangeFilter) {
        self.filters.price_change_type = kind;
    }

    pub fn set_sorting(&mut self, column: SortColumn, direction: SortDirection) {
        self.sorting = SortState { column, direction };
    }

    /// Header click: three-state toggle on the given column.
    pub fn cycle_sort(&mut self, column: SortColumn) {
        self.sorting.cycle(column);
    }

    /// Restore default filters. Sorting is left untouched.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_matches_catalog() {
        let store = AssetStore::seeded();
        assert_eq!(store.assets().len(), CATALOG.len());
        assert_eq!(store.asset_by_id(1).unwrap().symbol, "BTC");
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_update_asset_merges_and_stamps() {
        let mut store = AssetStore::seeded();
        let before = store.asset_by_id(1).unwrap().clone();

        store.update_asset(
            1,
            AssetUpdate {
                price: Some(1000.0),
                ..AssetUpdate::default()
            },
        );

        let after = store.asset_by_id(1).unwrap();
        assert_eq!(after.price, 1000.0);
        assert_eq!(after.volume_24h, before.volume_24h);
        assert!(after.last_updated >= before.last_updated);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = AssetStore::seeded();
        store.update_asset(
            999,
            AssetUpdate {
                price: Some(1.0),
                ..AssetUpdate::default()
            },
        );
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_update_many_bumps_revision_once() {
        let mut store = AssetStore::seeded();
        let batch: Vec<(u32, AssetUpdate)> = vec![
            (
                1,
                AssetUpdate {
                    price: Some(10.0),
                    ..AssetUpdate::default()
                },
            ),
            (
                2,
                AssetUpdate {
                    price: Some(20.0),
                    ..AssetUpdate::default()
                },
            ),
            // Unknown entries inside a batch are skipped like everywhere else.
            (
                999,
                AssetUpdate {
                    price: Some(30.0),
                    ..AssetUpdate::default()
                },
            ),
        ];
        store.update_many_assets(&batch);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.asset_by_id(1).unwrap().price, 10.0);
        assert_eq!(store.asset_by_id(2).unwrap().price, 20.0);
    }

    #[test]
    fn test_reset_filters_is_idempotent_and_keeps_sorting() {
        let mut store = AssetStore::seeded();
        store.set_search_filter("btc");
        store.set_price_filter(Some(1.0), Some(100.0));
        store.set_price_change_filter(PriceChangeFilter::Gainers);
        store.set_sorting(SortColumn::Price, SortDirection::Ascending);

        store.reset_filters();
        let once = store.filters().clone();
        store.reset_filters();

        assert_eq!(&once, store.filters());
        assert_eq!(once, FilterState::default());
        assert_eq!(store.sorting().column, SortColumn::Price);
        assert_eq!(store.sorting().direction, SortDirection::Ascending);
    }
}
