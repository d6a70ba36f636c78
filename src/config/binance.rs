/// REST endpoints used for the one-shot snapshot before streaming starts.
pub struct RestConfig {
    pub base_url: &'static str,
    pub timeout_ms: u64,
}

pub struct WsConfig {
    pub combined_base_url: &'static str,
    /// Fixed delay between reconnect attempts. No backoff growth.
    pub reconnect_delay_sec: u64,
}

pub struct BinanceConfig {
    pub rest: RestConfig,
    pub ws: WsConfig,
    /// Quote asset appended to catalog symbols to form exchange pairs,
    /// and stripped again when mapping stream symbols back to the catalog.
    pub quote_asset: &'static str,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    rest: RestConfig {
        base_url: "https://api.binance.com/api/v3",
        timeout_ms: 5000,
    },
    ws: WsConfig {
        combined_base_url: "wss://stream.binance.com:9443/stream?streams=",
        reconnect_delay_sec: 5,
    },
    quote_asset: "USDT",
};
