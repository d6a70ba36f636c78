//! Live Binance feed: a one-shot REST snapshot per symbol, then a single
//! combined websocket stream multiplexing every tracked pair's `@ticker`
//! updates, with a fixed-delay reconnect.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use futures::StreamExt;
use futures::future::join_all;
use rand::Rng;
use serde::Deserialize;
use tokio::runtime::Runtime;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::{BINANCE, CATALOG, CatalogEntry, find_by_symbol};
use crate::data::{ConnectionPhase, FeedGate, FeedHandle, FeedKind};
use crate::models::AssetUpdate;
use crate::store::SharedStore;
use crate::utils::round_dp;

#[cfg(debug_assertions)]
use crate::config::DF;

/// Per-symbol state carried across stream messages, keyed by exchange
/// symbol (e.g. "BTCUSDT"). Owned by the adapter, dies with it.
#[derive(Debug, Clone, Copy, Default)]
struct SymbolSession {
    price: Option<f64>,
    change_1h: Option<f64>,
    change_7d: Option<f64>,
    circulating_supply: f64,
}

type SessionMap = HashMap<String, SymbolSession>;

pub struct LiveFeed {
    gate: Arc<FeedGate>,
    phase: Arc<Mutex<ConnectionPhase>>,
}

impl LiveFeed {
    pub fn start(store: SharedStore) -> Self {
        let gate = FeedGate::new();
        let phase = Arc::new(Mutex::new(ConnectionPhase::Connecting));

        let loop_gate = Arc::clone(&gate);
        let loop_phase = Arc::clone(&phase);
        thread::spawn(move || {
            let rt = Runtime::new().expect("failed to create feed runtime");
            rt.block_on(async move {
                let mut sessions = seed_sessions();
                // 1. PULL: baseline snapshot over REST. Non-fatal on error.
                fetch_initial_snapshot(&store, &loop_gate, &mut sessions).await;
                // 2. PUSH: live updates until the gate closes.
                run_stream_with_reconnect(store, loop_gate, loop_phase, sessions).await;
            });
        });

        Self { gate, phase }
    }
}

impl FeedHandle for LiveFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Live
    }

    fn phase(&self) -> ConnectionPhase {
        if !self.gate.is_open() {
            return ConnectionPhase::Idle;
        }
        *self.phase.lock().unwrap()
    }

    fn stop(&mut self) {
        self.gate.close();
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.gate.close();
    }
}

/// Exchange pair symbols for every catalog entry. The quote asset itself
/// is skipped: there is no USDT/USDT market.
fn tracked_pairs() -> Vec<String> {
    CATALOG
        .iter()
        .filter(|e| !e.symbol.eq_ignore_ascii_case(BINANCE.quote_asset))
        .map(|e| format!("{}{}", e.symbol, BINANCE.quote_asset))
        .collect()
}

/// Strip the quote suffix so "BTCUSDT" matches the catalog's "BTC".
fn base_symbol(stream_symbol: &str) -> &str {
    let quote = BINANCE.quote_asset;
    if stream_symbol.len() > quote.len()
        && stream_symbol[stream_symbol.len() - quote.len()..].eq_ignore_ascii_case(quote)
    {
        &stream_symbol[..stream_symbol.len() - quote.len()]
    } else {
        stream_symbol
    }
}

fn catalog_entry_for(stream_symbol: &str) -> Option<&'static CatalogEntry> {
    find_by_symbol(base_symbol(stream_symbol))
}

/// Supply is known up front from the catalog; everything else fills in as
/// snapshot and stream data arrive.
fn seed_sessions() -> SessionMap {
    tracked_pairs()
        .into_iter()
        .map(|pair| {
            let supply = catalog_entry_for(&pair).map_or(0.0, |e| e.circulating_supply);
            (
                pair,
                SymbolSession {
                    circulating_supply: supply,
                    ..SymbolSession::default()
                },
            )
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    price_change_percent: String,
    quote_volume: String,
}

async fn fetch_initial_snapshot(store: &SharedStore, gate: &FeedGate, sessions: &mut SessionMap) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_millis(BINANCE.rest.timeout_ms))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            log::warn!("snapshot client init failed: {e}");
            return;
        }
    };

    let pairs = tracked_pairs();
    let fetches = pairs.iter().map(|pair| fetch_symbol_snapshot(&client, pair));
    for (pair, result) in pairs.iter().zip(join_all(fetches).await) {
        match result {
            Ok((price, stats)) => apply_snapshot(store, gate, sessions, pair, &price, &stats),
            // Non-fatal: streaming proceeds with whatever landed.
            Err(e) => log::warn!("snapshot fetch failed for {pair}: {e:#}"),
        }
    }
}

async fn fetch_symbol_snapshot(
    client: &reqwest::Client,
    pair: &str,
) -> Result<(TickerPrice, Ticker24h)> {
    let price = client
        .get(format!("{}/ticker/price", BINANCE.rest.base_url))
        .query(&[("symbol", pair)])
        .send()
        .await?
        .error_for_status()?
        .json::<TickerPrice>()
        .await?;

    let stats = client
        .get(format!("{}/ticker/24hr", BINANCE.rest.base_url))
        .query(&[("symbol", pair)])
        .send()
        .await?
        .error_for_status()?
        .json::<Ticker24h>()
        .await?;

    Ok((price, stats))
}

fn apply_snapshot(
    store: &SharedStore,
    gate: &FeedGate,
    sessions: &mut SessionMap,
    pair: &str,
    ticker: &TickerPrice,
    stats: &Ticker24h,
) {
    // Symbols without a catalog entry are silently skipped.
    let Some(entry) = catalog_entry_for(pair) else {
        return;
    };
    let Ok(price) = ticker.price.parse::<f64>() else {
        return;
    };
    let change_24h = stats.price_change_percent.parse::<f64>().unwrap_or(0.0);
    let volume_24h = stats.quote_volume.parse::<f64>().unwrap_or(0.0);

    // The ticker endpoints don't cover the 1h/7d windows; estimate them
    // off the 24h change. Display fluff, not a financial model.
    let mut rng = rand::thread_rng();
    let change_1h = round_dp(change_24h / 24.0 + rng.gen_range(-0.2..0.2), 2);
    let change_7d = round_dp(change_24h * 3.5 + rng.gen_range(-1.0..1.0), 2);
    let market_cap = price * entry.circulating_supply;

    sessions.insert(
        pair.to_string(),
        SymbolSession {
            price: Some(price),
            change_1h: Some(change_1h),
            change_7d: Some(change_7d),
            circulating_supply: entry.circulating_supply,
        },
    );

    let update = AssetUpdate {
        price: Some(price),
        price_change_1h: Some(change_1h),
        price_change_24h: Some(change_24h),
        price_change_7d: Some(change_7d),
        market_cap: Some(market_cap),
        volume_24h: Some(volume_24h),
        circulating_supply: Some(entry.circulating_supply),
    };
    // A snapshot response landing after stop() observes a closed gate.
    gate.apply(|| store.lock().unwrap().update_asset(entry.id, update));
}

fn build_combined_stream_url(pairs: &[String]) -> String {
    let streams: Vec<String> = pairs
        .iter()
        .map(|pair| format!("{}@ticker", pair.to_lowercase()))
        .collect();
    format!("{}{}", BINANCE.ws.combined_base_url, streams.join("/"))
}

async fn run_stream_with_reconnect(
    store: SharedStore,
    gate: Arc<FeedGate>,
    phase: Arc<Mutex<ConnectionPhase>>,
    mut sessions: SessionMap,
) {
    let url = build_combined_stream_url(&tracked_pairs());

    while gate.is_open() {
        *phase.lock().unwrap() = ConnectionPhase::Connecting;

        match run_ticker_stream(&url, &store, &gate, &phase, &mut sessions).await {
            Ok(()) => log::warn!("ticker stream closed, reconnecting..."),
            Err(e) => log::error!("ticker stream failed: {e:#}, reconnecting..."),
        }
        if !gate.is_open() {
            break;
        }

        // Fixed-delay reconnect. The single loop is what bounds us to one
        // pending retry at a time.
        *phase.lock().unwrap() = ConnectionPhase::Reconnecting;
        tokio::select! {
            _ = gate.closed() => break,
            _ = tokio::time::sleep(Duration::from_secs(BINANCE.ws.reconnect_delay_sec)) => {}
        }
    }

    *phase.lock().unwrap() = ConnectionPhase::Idle;
}

async fn run_ticker_stream(
    url: &str,
    store: &SharedStore,
    gate: &Arc<FeedGate>,
    phase: &Mutex<ConnectionPhase>,
    sessions: &mut SessionMap,
) -> Result<()> {
    let (ws_stream, _) = connect_async(url).await?;
    *phase.lock().unwrap() = ConnectionPhase::Streaming;

    let (_write, mut read) = ws_stream.split();

    loop {
        let msg = tokio::select! {
            _ = gate.closed() => return Ok(()),
            msg = read.next() => match msg {
                Some(msg) => msg,
                None => return Ok(()),
            },
        };
        if !gate.is_open() {
            return Ok(());
        }

        match msg {
            Ok(Message::Text(text)) => {
                if let Ok(v) = serde_json::from_str::<serde_json::Value>(&text) {
                    handle_ticker_frame(store, gate, sessions, &v["data"]);
                } else {
                    log::warn!("unparseable ticker frame dropped");
                }
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }
}

/// Apply one `@ticker` payload to the store. Malformed frames and symbols
/// with no catalog entry are dropped without touching anything.
fn handle_ticker_frame(
    store: &SharedStore,
    gate: &FeedGate,
    sessions: &mut SessionMap,
    data: &serde_json::Value,
) {
    let Some(symbol) = data["s"].as_str() else {
        return;
    };
    let Some(last_price) = data["c"].as_str().and_then(|s| s.parse::<f64>().ok()) else {
        return;
    };
    let change_24h = data["P"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let volume_24h = data["q"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let Some(entry) = catalog_entry_for(symbol) else {
        return;
    };

    let session = sessions.entry(symbol.to_string()).or_default();
    let previous_price = session.price.unwrap_or(last_price);
    let ratio = if previous_price > f64::EPSILON {
        (last_price - previous_price) / previous_price
    } else {
        0.0
    };

    // Damped running estimates for the windows the ticker doesn't report;
    // the multipliers just make the columns move visibly with the price.
    let prev_1h = session.change_1h.unwrap_or(0.0);
    let prev_7d = session.change_7d.unwrap_or(change_24h * 3.5);
    let change_1h = round_dp(prev_1h + ratio * 25.0, 2);
    let change_7d = round_dp(prev_7d + ratio * 5.0, 2);
    let market_cap = last_price * session.circulating_supply;

    session.price = Some(last_price);
    session.change_1h = Some(change_1h);
    session.change_7d = Some(change_7d);
    let supply = session.circulating_supply;

    let update = AssetUpdate {
        price: Some(last_price),
        price_change_1h: Some(change_1h),
        price_change_24h: Some(change_24h),
        price_change_7d: Some(change_7d),
        market_cap: Some(market_cap),
        volume_24h: Some(volume_24h),
        circulating_supply: Some(supply),
    };
    gate.apply(|| store.lock().unwrap().update_asset(entry.id, update));

    #[cfg(debug_assertions)]
    if DF.log_stream_updates {
        log::info!("[ticker] {} -> {:.6}", symbol, last_price);
    }
}
