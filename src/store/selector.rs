use std::sync::Arc;

use crate::models::{Asset, FilterState, PriceChangeFilter, SortDirection, SortState};
use crate::store::AssetStore;

/// Pure filter -> sort pipeline over the asset list. Deterministic for a
/// given input; the caller decides when it is worth recomputing.
pub fn compute_view(assets: &[Asset], filters: &FilterState, sorting: SortState) -> Vec<Asset> {
    let needle = filters.search_term.to_lowercase();
    let mut view: Vec<Asset> = assets
        .iter()
        .filter(|a| {
            needle.is_empty()
                || a.name.to_lowercase().contains(&needle)
                || a.symbol.to_lowercase().contains(&needle)
        })
        .filter(|a| filters.min_price.is_none_or(|min| a.price >= min))
        .filter(|a| filters.max_price.is_none_or(|max| a.price <= max))
        .filter(|a| match filters.price_change_type {
            PriceChangeFilter::None => true,
            PriceChangeFilter::Gainers => a.price_change_24h > 0.0,
            PriceChangeFilter::Losers => a.price_change_24h < 0.0,
        })
        .cloned()
        .collect();

    let reverse = match sorting.direction {
        // Unsorted keeps the post-filter (store insertion) order.
        SortDirection::None => return view,
        SortDirection::Ascending => false,
        SortDirection::Descending => true,
    };

    // sort_by is stable: equal keys keep their filtered order, in either
    // direction, because reversing the comparator leaves Equal untouched.
    view.sort_by(|a, b| {
        let ord = sorting.column.compare(a, b);
        if reverse { ord.reverse() } else { ord }
    });
    view
}

/// Explicit memoization over `compute_view`: the list is recomputed only
/// when the store's asset revision, the filters or the sorting actually
/// changed, and the same `Arc` is handed back otherwise.
pub struct ViewCache {
    key: Option<(u64, FilterState, SortState)>,
    cached: Arc<Vec<Asset>>,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self {
            key: None,
            cached: Arc::new(Vec::new()),
        }
    }
}

impl ViewCache {
    pub fn view(&mut self, store: &AssetStore) -> Arc<Vec<Asset>> {
        let key = (store.revision(), store.filters().clone(), store.sorting());
        if self.key.as_ref() != Some(&key) {
            self.cached = Arc::new(compute_view(store.assets(), &key.1, key.2));
            self.key = Some(key);
        }
        Arc::clone(&self.cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetUpdate, SortColumn};

    fn store() -> AssetStore {
        AssetStore::seeded()
    }

    fn ids(view: &[Asset]) -> Vec<u32> {
        view.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_empty_filters_match_all_in_insertion_order() {
        let store = store();
        let sorting = SortState {
            column: SortColumn::Name,
            direction: SortDirection::None,
        };
        let view = compute_view(store.assets(), &FilterState::default(), sorting);
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_search_matches_name_or_symbol_case_insensitive() {
        let store = store();
        let sorting = store.sorting();

        let filters = FilterState {
            search_term: "bit".to_string(),
            ..FilterState::default()
        };
        // "bit" hits Bitcoin by name only.
        assert_eq!(
            ids(&compute_view(store.assets(), &filters, sorting)),
            vec![1]
        );

        let filters = FilterState {
            search_term: "SOL".to_string(),
            ..FilterState::default()
        };
        assert_eq!(
            ids(&compute_view(store.assets(), &filters, sorting)),
            vec![6]
        );
    }

    #[test]
    fn test_all_active_predicates_apply_simultaneously() {
        let store = store();
        let filters = FilterState {
            search_term: String::new(),
            min_price: Some(2.0),
            max_price: Some(200.0),
            price_change_type: PriceChangeFilter::Gainers,
        };
        let sorting = SortState {
            column: SortColumn::MarketCap,
            direction: SortDirection::None,
        };
        let view = compute_view(store.assets(), &filters, sorting);

        assert!(!view.is_empty());
        for asset in &view {
            assert!(asset.price >= 2.0 && asset.price <= 200.0);
            assert!(asset.price_change_24h > 0.0);
            // Subset property: everything in the view exists in the store.
            assert!(store.asset_by_id(asset.id).is_some());
        }
        // BNB (id 5) is in range but a loser; it must be gone.
        assert!(!ids(&view).contains(&5));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let store = store();
        let filters = FilterState {
            min_price: Some(2.0),
            max_price: Some(2.0),
            ..FilterState::default()
        };
        let sorting = SortState {
            column: SortColumn::Price,
            direction: SortDirection::None,
        };
        // XRP sits exactly at 2.0 and must survive both bounds.
        assert_eq!(
            ids(&compute_view(store.assets(), &filters, sorting)),
            vec![4]
        );
    }

    #[test]
    fn test_sort_ascending_descending_by_price() {
        let store = store();
        let filters = FilterState::default();

        let asc = compute_view(
            store.assets(),
            &filters,
            SortState {
                column: SortColumn::Price,
                direction: SortDirection::Ascending,
            },
        );
        let prices: Vec<f64> = asc.iter().map(|a| a.price).collect();
        let mut sorted = prices.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(prices, sorted);

        let desc = compute_view(
            store.assets(),
            &filters,
            SortState {
                column: SortColumn::Price,
                direction: SortDirection::Descending,
            },
        );
        let desc_ids: Vec<u32> = desc.iter().map(|a| a.id).collect();
        let mut asc_ids = ids(&asc);
        asc_ids.reverse();
        assert_eq!(desc_ids, asc_ids);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut store = store();
        // Give three assets an identical price; their insertion order must
        // survive sorting in both directions.
        for id in [2, 4, 5] {
            store.update_asset(
                id,
                AssetUpdate {
                    price: Some(50.0),
                    ..AssetUpdate::default()
                },
            );
        }
        let filters = FilterState {
            min_price: Some(50.0),
            max_price: Some(50.0),
            ..FilterState::default()
        };
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let view = compute_view(
                store.assets(),
                &filters,
                SortState {
                    column: SortColumn::Price,
                    direction,
                },
            );
            assert_eq!(ids(&view), vec![2, 4, 5], "direction {direction:?}");
        }
    }

    #[test]
    fn test_three_header_clicks_restore_original_order() {
        let store = store();
        let unsorted = ids(&compute_view(
            store.assets(),
            &FilterState::default(),
            SortState {
                column: SortColumn::Price,
                direction: SortDirection::None,
            },
        ));

        let mut sorting = SortState::default();
        sorting.cycle(SortColumn::Price);
        sorting.cycle(SortColumn::Price);
        sorting.cycle(SortColumn::Price);
        assert_eq!(sorting.direction, SortDirection::None);

        let cycled = ids(&compute_view(store.assets(), &FilterState::default(), sorting));
        assert_eq!(cycled, unsorted);
    }

    #[test]
    fn test_view_cache_recomputes_only_on_input_change() {
        let mut store = store();
        let mut cache = ViewCache::default();

        let first = cache.view(&store);
        let second = cache.view(&store);
        // Nothing changed: the very same allocation comes back.
        assert!(Arc::ptr_eq(&first, &second));

        store.update_asset(
            1,
            AssetUpdate {
                price: Some(1234.0),
                ..AssetUpdate::default()
            },
        );
        let third = cache.view(&store);
        assert!(!Arc::ptr_eq(&second, &third));

        store.set_search_filter("eth");
        let fourth = cache.view(&store);
        assert!(!Arc::ptr_eq(&third, &fourth));
        assert_eq!(ids(&fourth), vec![2, 3]); // Ethereum + Tether
    }
}
