//! Trend discovery and relevance ranking for Vietnamese e-commerce marketing.
//!
//! Fetches trending TikTok topics from a [`TrendSource`], scores each against
//! the shop's product categories with an additive heuristic, filters by a
//! caller-supplied threshold, and ranks survivors by `relevance × growth`.
//! Surviving trends are upserted into a [`TrendIndex`] for later retrieval by
//! the content strategist.

pub mod error;
pub mod index;
pub mod pipeline;
pub mod scorer;
pub mod source;
pub mod types;

pub use error::TrendError;
pub use index::{IndexClient, NullIndex, TrendDocument, TrendIndex};
pub use pipeline::{filter_and_rank, run_trend_scan, ScanOutcome, ScanParams};
pub use scorer::score;
pub use source::{StaticTrendSource, TickerTrendsClient, TimeRange, TrendSource};
pub use types::{RankedTrend, RecommendedAction, RelevanceAnalysis, Trend};
