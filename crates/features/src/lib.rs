//! Feature construction for aligning speeches with market returns.
//!
//! The builder derives, stage by stage:
//! - a raw return table with a trailing moving average
//! - a normalized table with deviations from that trend
//! - quantile outlier flags aligned with speech presence
//! - one-hot speaker columns joined on the trading-day key

pub mod builder;
pub mod calendar;
pub mod one_hot;
pub mod quantile;
pub mod returns;

pub use builder::ReturnFeatureBuilder;
pub use calendar::{normalize_bars, shift_flags, speech_presence};
pub use one_hot::one_hot_join;
pub use quantile::{linear_quantile, threshold_flags};
pub use returns::{compute_returns, moving_average, normalize_returns};
