//! The static asset catalog: seed data for the store and the source of
//! circulating supply for market-cap computation. Assets are never added
//! or removed at runtime.

pub struct CatalogEntry {
    pub id: u32,
    pub name: &'static str,
    pub symbol: &'static str,
    pub price: f64,
    pub change_1h: f64,
    pub change_24h: f64,
    pub change_7d: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: 1,
        name: "Bitcoin",
        symbol: "BTC",
        price: 959.48,
        change_1h: 0.43,
        change_24h: 0.93,
        change_7d: 11.11,
        market_cap: 1_861_618_902_186.0,
        volume_24h: 43_874_950_947.0,
        circulating_supply: 19.85,
    },
    CatalogEntry {
        id: 2,
        name: "Ethereum",
        symbol: "ETH",
        price: 182.46,
        change_1h: 0.60,
        change_24h: 3.21,
        change_7d: 13.68,
        market_cap: 217_581_279_327.0,
        volume_24h: 23_547_469_307.0,
        circulating_supply: 120.71,
    },
    CatalogEntry {
        id: 3,
        name: "Tether",
        symbol: "USDT",
        price: 1.00,
        change_1h: 0.00,
        change_24h: 0.00,
        change_7d: 0.04,
        market_cap: 145_320_022_085.0,
        volume_24h: 92_288_882_007.0,
        circulating_supply: 145.27,
    },
    CatalogEntry {
        id: 4,
        name: "XRP",
        symbol: "XRP",
        price: 2.0,
        change_1h: 0.46,
        change_24h: 0.54,
        change_7d: 6.18,
        market_cap: 130_073_814_966.0,
        volume_24h: 5_131_481_491.0,
        circulating_supply: 58.39,
    },
    CatalogEntry {
        id: 5,
        name: "BNB",
        symbol: "BNB",
        price: 6.65,
        change_1h: 0.09,
        change_24h: -1.20,
        change_7d: 3.73,
        market_cap: 85_471_956_947.0,
        volume_24h: 1_874_281_784.0,
        circulating_supply: 140.89,
    },
    CatalogEntry {
        id: 6,
        name: "Solana",
        symbol: "SOL",
        price: 15.50,
        change_1h: 0.21,
        change_24h: 1.32,
        change_7d: 5.67,
        market_cap: 64_283_719_456.0,
        volume_24h: 2_148_392_714.0,
        circulating_supply: 512.23,
    },
];

/// Case-insensitive symbol lookup, the feed adapters' match key.
pub fn find_by_symbol(symbol: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.symbol.eq_ignore_ascii_case(symbol))
}
