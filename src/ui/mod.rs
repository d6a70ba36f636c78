mod filters;
mod format;
mod table;

pub use filters::{PriceRangeInput, filter_row};
pub use format::{format_compact, format_percent, format_usd};
pub use table::asset_table;
