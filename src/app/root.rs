use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{CentralPanel, Context, RichText, TopBottomPanel};

use crate::Cli;
use crate::config::PERSISTENCE;
use crate::data::{self, ConnectionPhase, FeedHandle, FeedKind, SavedPreferences};
use crate::store::{AssetStore, SharedStore, ViewCache};
use crate::ui::{self, PriceRangeInput};
use crate::utils::{format_age, now_timestamp_ms};

#[cfg(debug_assertions)]
use crate::config::DF;

pub struct App {
    store: SharedStore,
    /// The mounted feed. Exactly one at a time; swapped by `switch_feed`.
    feed: Option<Box<dyn FeedHandle>>,
    view_cache: ViewCache,
    price_input: PriceRangeInput,
    /// Last preferences written to disk, for the dirty check.
    last_saved: Option<SavedPreferences>,
    last_save_at: Instant,
}

impl App {
    pub(crate) fn new(_cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        // Saved preferences seed filters and sorting only; assets always
        // come fresh from the catalog.
        let prefs = data::load_preferences().unwrap_or_default();
        let store = AssetStore::shared_with_preferences(prefs.filters.clone(), prefs.sorting);
        let price_input = PriceRangeInput::from_filters(&prefs.filters);

        let kind = if args.live {
            FeedKind::Live
        } else {
            FeedKind::Simulated
        };
        let feed = Some(data::start_feed(kind, Arc::clone(&store)));

        Self {
            store,
            feed,
            view_cache: ViewCache::default(),
            price_input,
            last_saved: Some(prefs),
            last_save_at: Instant::now(),
        }
    }

    fn feed_kind(&self) -> FeedKind {
        self.feed
            .as_ref()
            .map_or(FeedKind::Simulated, |f| f.kind())
    }

    /// Stop the old adapter before mounting the new one. The old gate is
    /// closed by the time `start_feed` runs, so no stale batch can land
    /// after the switch.
    fn switch_feed(&mut self, kind: FeedKind) {
        if self.feed_kind() == kind && self.feed.is_some() {
            return;
        }
        if let Some(mut feed) = self.feed.take() {
            feed.stop();
        }
        #[cfg(debug_assertions)]
        if DF.log_feed_switches {
            log::info!("switching feed to {}", kind.label());
        }
        self.feed = Some(data::start_feed(kind, Arc::clone(&self.store)));
    }

    fn current_preferences(&self) -> SavedPreferences {
        let guard = self.store.lock().unwrap();
        SavedPreferences {
            filters: guard.filters().clone(),
            sorting: guard.sorting(),
        }
    }

    /// Throttled persistence: at most one write per throttle window, and
    /// only when the preferences actually changed.
    fn maybe_save_preferences(&mut self) {
        if self.last_save_at.elapsed() < Duration::from_millis(PERSISTENCE.save_throttle_ms) {
            return;
        }
        let current = self.current_preferences();
        if self.last_saved.as_ref() == Some(&current) {
            return;
        }
        data::save_preferences(&current);
        self.last_saved = Some(current);
        self.last_save_at = Instant::now();
    }

    fn render_top_panel(&mut self, ctx: &Context) {
        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Coin Scope");
                ui.separator();

                let mut use_live = self.feed_kind() == FeedKind::Live;
                if ui.checkbox(&mut use_live, "Use real Binance data").changed() {
                    self.switch_feed(if use_live {
                        FeedKind::Live
                    } else {
                        FeedKind::Simulated
                    });
                }

                if let Some(feed) = &self.feed {
                    if feed.kind() == FeedKind::Live {
                        ui.separator();
                        let status = match feed.phase() {
                            ConnectionPhase::Idle => "idle",
                            ConnectionPhase::Connecting => "connecting...",
                            ConnectionPhase::Streaming => "streaming",
                            ConnectionPhase::Reconnecting => "reconnecting...",
                        };
                        ui.weak(status);
                    }
                }
            });
            ui.add_space(4.0);
        });
    }

    fn render_status_panel(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let source = match self.feed_kind() {
                    FeedKind::Simulated => "real-time (simulated)",
                    FeedKind::Live => "real-time from Binance",
                };
                ui.weak(format!("Data updates in {source}. All prices in USD."));

                let guard = self.store.lock().unwrap();
                let newest = guard.assets().iter().map(|a| a.last_updated).max();
                ui.separator();
                ui.weak(format!("{} assets", guard.assets().len()));
                if let Some(newest) = newest {
                    ui.separator();
                    let age = (now_timestamp_ms() - newest).max(0);
                    ui.weak(format!("updated {} ago", format_age(age)));
                }
            });
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.render_top_panel(ctx);
        self.render_status_panel(ctx);

        CentralPanel::default().show(ctx, |ui| {
            ui::filter_row(ui, &self.store, &mut self.price_input);
            ui.add_space(6.0);
            ui::asset_table(ui, &self.store, &mut self.view_cache);
            if self.feed_kind() == FeedKind::Live {
                ui.add_space(6.0);
                ui.weak(RichText::new("1h/7d figures on the live feed are rough estimates.").small());
            }
        });

        self.maybe_save_preferences();

        // The feeds push in the background; keep repainting so prices move
        // even when the mouse is idle.
        ctx.request_repaint_after(Duration::from_millis(250));
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        // Flush on exit regardless of the throttle window.
        let current = self.current_preferences();
        if self.last_saved.as_ref() != Some(&current) {
            data::save_preferences(&current);
            self.last_saved = Some(current);
        }
    }
}
