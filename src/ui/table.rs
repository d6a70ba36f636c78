use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Line, Plot, PlotPoints};
use strum::IntoEnumIterator;

use crate::models::{Asset, SortColumn, SortDirection, SortState};
use crate::store::{SharedStore, ViewCache};
use crate::ui::format::{format_compact, format_percent, format_usd};

// Tailwind green-500 / red-500, the original dashboard's trend colors.
const COLOR_UP: Color32 = Color32::from_rgb(34, 197, 94);
const COLOR_DOWN: Color32 = Color32::from_rgb(239, 68, 68);

pub fn asset_table(ui: &mut Ui, store: &SharedStore, cache: &mut ViewCache) {
    let (view, sorting) = {
        let guard = store.lock().unwrap();
        (cache.view(&guard), guard.sorting())
    };

    let mut clicked = None;
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(24.0)) // #
        .column(Column::auto().at_least(150.0)) // name + symbol
        .columns(Column::auto().at_least(72.0), 7)
        .column(Column::auto().at_least(110.0)) // sparkline
        .header(24.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for column in SortColumn::iter() {
                header.col(|ui| {
                    let text = format!("{}{}", column.label(), sort_marker(sorting, column));
                    if ui.button(text).clicked() {
                        clicked = Some(column);
                    }
                });
            }
            header.col(|ui| {
                ui.strong("Last 7 Days");
            });
        })
        .body(|mut body| {
            for (index, asset) in view.iter().enumerate() {
                body.row(30.0, |mut row| {
                    row.col(|ui| {
                        ui.weak(format!("{}", index + 1));
                    });
                    row.col(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(asset.name.as_str()).strong());
                            ui.weak(asset.symbol.as_str());
                        });
                    });
                    row.col(|ui| {
                        ui.monospace(format_usd(asset.price));
                    });
                    change_cell(&mut row, asset.price_change_1h);
                    change_cell(&mut row, asset.price_change_24h);
                    change_cell(&mut row, asset.price_change_7d);
                    row.col(|ui| {
                        ui.monospace(format_compact(asset.market_cap));
                    });
                    row.col(|ui| {
                        ui.monospace(format_compact(asset.volume_24h));
                    });
                    row.col(|ui| {
                        ui.monospace(format!(
                            "{:.2} {}",
                            asset.circulating_supply, asset.symbol
                        ));
                    });
                    row.col(|ui| {
                        sparkline(ui, asset);
                    });
                });
            }
        });

    if view.is_empty() {
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            ui.weak("No cryptocurrencies match your filters");
        });
    }

    // Apply the header click after the table borrow ends.
    if let Some(column) = clicked {
        store.lock().unwrap().cycle_sort(column);
    }
}

fn sort_marker(sorting: SortState, column: SortColumn) -> &'static str {
    if sorting.column != column {
        return "";
    }
    match sorting.direction {
        SortDirection::Ascending => " ⌃",
        SortDirection::Descending => " ⌄",
        SortDirection::None => "",
    }
}

fn change_cell(row: &mut egui_extras::TableRow<'_, '_>, value: f64) {
    let color = if value > 0.0 {
        COLOR_UP
    } else if value < 0.0 {
        COLOR_DOWN
    } else {
        Color32::GRAY
    };
    row.col(|ui| {
        ui.label(RichText::new(format_percent(value)).monospace().color(color));
    });
}

/// Tiny 7d trend line from the rolling price history. Green/red follows
/// the 7d change sign, like the original mini chart.
fn sparkline(ui: &mut Ui, asset: &Asset) {
    if asset.price_history.len() < 2 {
        ui.weak("–");
        return;
    }
    let color = if asset.price_change_7d > 0.0 {
        COLOR_UP
    } else {
        COLOR_DOWN
    };
    let points: Vec<[f64; 2]> = asset
        .price_history
        .iter()
        .enumerate()
        .map(|(i, price)| [i as f64, *price])
        .collect();

    Plot::new(("sparkline", asset.id))
        .width(100.0)
        .height(26.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("", PlotPoints::new(points))
                    .color(color)
                    .width(1.5),
            );
        });
}
