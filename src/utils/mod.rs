mod maths_utils;
mod time_utils;

pub use time_utils::{format_age, now_timestamp_ms};

pub(crate) use maths_utils::round_dp;
