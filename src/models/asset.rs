use std::collections::VecDeque;

use crate::config::CatalogEntry;

/// Capacity of the rolling price history behind the 7d sparkline column.
pub const PRICE_HISTORY_LEN: usize = 30;

/// One tracked cryptocurrency. `id` and `symbol` are immutable for the
/// lifetime of the asset; the market fields are overwritten in place by
/// whichever feed adapter is mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: u32,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    /// Signed percentage points.
    pub price_change_1h: f64,
    pub price_change_24h: f64,
    pub price_change_7d: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
    /// Epoch ms of the last mutation.
    pub last_updated: i64,
    /// Recent prices, oldest first, bounded at PRICE_HISTORY_LEN.
    pub price_history: VecDeque<f64>,
}

impl Asset {
    pub fn from_catalog(entry: &CatalogEntry, now_ms: i64) -> Self {
        let mut price_history = VecDeque::with_capacity(PRICE_HISTORY_LEN);
        price_history.push_back(entry.price);
        Self {
            id: entry.id,
            name: entry.name.to_string(),
            symbol: entry.symbol.to_string(),
            price: entry.price,
            price_change_1h: entry.change_1h,
            price_change_24h: entry.change_24h,
            price_change_7d: entry.change_7d,
            market_cap: entry.market_cap,
            volume_24h: entry.volume_24h,
            circulating_supply: entry.circulating_supply,
            last_updated: now_ms,
            price_history,
        }
    }

    /// Merge a partial update and stamp the mutation time.
    pub(crate) fn apply(&mut self, update: &AssetUpdate, now_ms: i64) {
        if let Some(price) = update.price {
            self.price = price;
            if self.price_history.len() == PRICE_HISTORY_LEN {
                self.price_history.pop_front();
            }
            self.price_history.push_back(price);
        }
        if let Some(v) = update.price_change_1h {
            self.price_change_1h = v;
        }
        if let Some(v) = update.price_change_24h {
            self.price_change_24h = v;
        }
        if let Some(v) = update.price_change_7d {
            self.price_change_7d = v;
        }
        if let Some(v) = update.market_cap {
            self.market_cap = v;
        }
        if let Some(v) = update.volume_24h {
            self.volume_24h = v;
        }
        if let Some(v) = update.circulating_supply {
            self.circulating_supply = v;
        }
        self.last_updated = now_ms;
    }
}

/// Partial asset update. `None` leaves the field alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssetUpdate {
    pub price: Option<f64>,
    pub price_change_1h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_7d: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CATALOG;

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut asset = Asset::from_catalog(&CATALOG[0], 100);
        let before_24h = asset.price_change_24h;

        asset.apply(
            &AssetUpdate {
                price: Some(1000.0),
                market_cap: Some(19850.0),
                ..AssetUpdate::default()
            },
            200,
        );

        assert_eq!(asset.price, 1000.0);
        assert_eq!(asset.market_cap, 19850.0);
        assert_eq!(asset.price_change_24h, before_24h);
        assert_eq!(asset.last_updated, 200);
    }

    #[test]
    fn test_price_history_is_bounded_and_ordered() {
        let mut asset = Asset::from_catalog(&CATALOG[0], 0);
        for i in 0..(PRICE_HISTORY_LEN * 2) {
            asset.apply(
                &AssetUpdate {
                    price: Some(i as f64),
                    ..AssetUpdate::default()
                },
                i as i64,
            );
        }
        assert_eq!(asset.price_history.len(), PRICE_HISTORY_LEN);
        // Oldest first: the front must be older than the back.
        assert!(asset.price_history.front() < asset.price_history.back());
        assert_eq!(*asset.price_history.back().unwrap(), asset.price);
    }
}
