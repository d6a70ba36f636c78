mod asset;
mod view_prefs;

pub use asset::{Asset, AssetUpdate, PRICE_HISTORY_LEN};
pub use view_prefs::{FilterState, PriceChangeFilter, SortColumn, SortDirection, SortState};
