//! Content strategy and Vietnamese copy generation.
//!
//! Matches ranked trends to catalog products, templates content briefs, and
//! renders platform-specific Vietnamese copy with validation. The language
//! model the original design calls for is an external collaborator; the
//! deterministic templates here are the reference behavior.

pub mod brief;
pub mod copy;
pub mod error;
pub mod hashtags;
pub mod matcher;
pub mod strategist;

pub use brief::{build_brief, ContentBrief, ContentFormat, ScriptOutline, SuccessMetrics};
pub use copy::{
    generate_ab_variants, generate_platform_copy, run_copy_generation, CopyBundle, CopyVariant,
    GeneratedCopy, Platform, PlatformCopy, Tone,
};
pub use error::ContentError;
pub use hashtags::generate_hashtags;
pub use matcher::{CatalogIndex, ProductCatalog};
pub use strategist::run_strategy_session;
