use eframe::egui::{TextEdit, Ui};

use crate::models::{FilterState, PriceChangeFilter};
use crate::store::SharedStore;

/// Scratch text for the min/max price boxes. Typing doesn't filter until
/// Apply, matching the original form.
#[derive(Default)]
pub struct PriceRangeInput {
    pub min: String,
    pub max: String,
}

impl PriceRangeInput {
    pub fn from_filters(filters: &FilterState) -> Self {
        Self {
            min: filters.min_price.map(|v| v.to_string()).unwrap_or_default(),
            max: filters.max_price.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    /// Blank or unparseable input means "unbounded".
    fn parse(text: &str) -> Option<f64> {
        text.trim().parse().ok()
    }
}

pub fn filter_row(ui: &mut Ui, store: &SharedStore, input: &mut PriceRangeInput) {
    let filters = store.lock().unwrap().filters().clone();

    ui.horizontal_wrapped(|ui| {
        let mut term = filters.search_term.clone();
        let search = ui.add(
            TextEdit::singleline(&mut term)
                .desired_width(190.0)
                .hint_text("Search by name or symbol..."),
        );
        if search.changed() {
            store.lock().unwrap().set_search_filter(term);
        }

        ui.separator();

        ui.label("Price");
        ui.add(
            TextEdit::singleline(&mut input.min)
                .desired_width(64.0)
                .hint_text("Min"),
        );
        ui.label("to");
        ui.add(
            TextEdit::singleline(&mut input.max)
                .desired_width(64.0)
                .hint_text("Max"),
        );
        if ui.button("Apply").clicked() {
            store.lock().unwrap().set_price_filter(
                PriceRangeInput::parse(&input.min),
                PriceRangeInput::parse(&input.max),
            );
        }

        ui.separator();

        // Clicking the active button toggles the filter back off.
        let gainers = filters.price_change_type == PriceChangeFilter::Gainers;
        if ui.selectable_label(gainers, "Top Gainers").clicked() {
            store.lock().unwrap().set_price_change_filter(if gainers {
                PriceChangeFilter::None
            } else {
                PriceChangeFilter::Gainers
            });
        }
        let losers = filters.price_change_type == PriceChangeFilter::Losers;
        if ui.selectable_label(losers, "Top Losers").clicked() {
            store.lock().unwrap().set_price_change_filter(if losers {
                PriceChangeFilter::None
            } else {
                PriceChangeFilter::Losers
            });
        }

        ui.separator();

        if ui.button("Reset Filters").clicked() {
            store.lock().unwrap().reset_filters();
            *input = PriceRangeInput::default();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_input_parse() {
        assert_eq!(PriceRangeInput::parse(""), None);
        assert_eq!(PriceRangeInput::parse("  "), None);
        assert_eq!(PriceRangeInput::parse("12.5"), Some(12.5));
        assert_eq!(PriceRangeInput::parse(" 100 "), Some(100.0));
        assert_eq!(PriceRangeInput::parse("abc"), None);
    }

    #[test]
    fn test_price_input_reflects_saved_filters() {
        let filters = FilterState {
            min_price: Some(1.5),
            max_price: None,
            ..FilterState::default()
        };
        let input = PriceRangeInput::from_filters(&filters);
        assert_eq!(input.min, "1.5");
        assert_eq!(input.max, "");
    }
}
