use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::models::Asset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceChangeFilter {
    #[default]
    None,
    /// Keep assets with a positive 24h change.
    Gainers,
    /// Keep assets with a negative 24h change.
    Losers,
}

/// User filter preferences. Serialized with the dashboard's original field
/// names so the saved payload stays human-readable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub search_term: String,
    /// Inclusive bounds; `None` is unbounded.
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_change_type: PriceChangeFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    Price,
    PriceChange1h,
    PriceChange24h,
    PriceChange7d,
    MarketCap,
    Volume24h,
    CirculatingSupply,
}

impl SortColumn {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Price => "Price",
            Self::PriceChange1h => "1h %",
            Self::PriceChange24h => "24h %",
            Self::PriceChange7d => "7d %",
            Self::MarketCap => "Market Cap",
            Self::Volume24h => "Volume (24h)",
            Self::CirculatingSupply => "Circulating Supply",
        }
    }

    /// Ascending compare on this column. Incomparable floats rank equal so
    /// a stray NaN can never reorder its neighbours.
    pub fn compare(&self, a: &Asset, b: &Asset) -> Ordering {
        let by = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Price => by(a.price, b.price),
            Self::PriceChange1h => by(a.price_change_1h, b.price_change_1h),
            Self::PriceChange24h => by(a.price_change_24h, b.price_change_24h),
            Self::PriceChange7d => by(a.price_change_7d, b.price_change_7d),
            Self::MarketCap => by(a.market_cap, b.market_cap),
            Self::Volume24h => by(a.volume_24h, b.volume_24h),
            Self::CirculatingSupply => by(a.circulating_supply, b.circulating_supply),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// First launch opens on market cap, descending.
    fn default() -> Self {
        Self {
            column: SortColumn::MarketCap,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Header click: the same column cycles none -> desc -> asc -> none,
    /// a different column starts over at descending.
    pub fn cycle(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = match self.direction {
                SortDirection::None => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
                SortDirection::Ascending => SortDirection::None,
            };
        } else {
            self.column = column;
            self.direction = SortDirection::Descending;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycle_on_same_column() {
        let mut sorting = SortState {
            column: SortColumn::Price,
            direction: SortDirection::None,
        };
        sorting.cycle(SortColumn::Price);
        assert_eq!(sorting.direction, SortDirection::Descending);
        sorting.cycle(SortColumn::Price);
        assert_eq!(sorting.direction, SortDirection::Ascending);
        sorting.cycle(SortColumn::Price);
        assert_eq!(sorting.direction, SortDirection::None);
    }

    #[test]
    fn test_sort_cycle_switching_column_starts_descending() {
        let mut sorting = SortState {
            column: SortColumn::Price,
            direction: SortDirection::Ascending,
        };
        sorting.cycle(SortColumn::Volume24h);
        assert_eq!(sorting.column, SortColumn::Volume24h);
        assert_eq!(sorting.direction, SortDirection::Descending);
    }

    #[test]
    fn test_preference_serde_uses_original_field_names() {
        let sorting = SortState {
            column: SortColumn::Price,
            direction: SortDirection::Ascending,
        };
        let json = serde_json::to_value(sorting).unwrap();
        assert_eq!(json["column"], "price");
        assert_eq!(json["direction"], "asc");

        let filters = FilterState {
            search_term: "btc".to_string(),
            ..FilterState::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["searchTerm"], "btc");
        assert_eq!(json["priceChangeType"], "none");
        assert_eq!(json["minPrice"], serde_json::Value::Null);
    }

    #[test]
    fn test_sort_column_serde_round_trip() {
        let json = serde_json::to_string(&SortColumn::MarketCap).unwrap();
        assert_eq!(json, "\"marketCap\"");
        let back: SortColumn = serde_json::from_str("\"priceChange24h\"").unwrap();
        assert_eq!(back, SortColumn::PriceChange24h);
    }
}
