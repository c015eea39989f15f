//! Recommendation Module
//!
//! Recommends movies, music, books and games by matching catalog items
//! against a user's stated preferences.
//!
//! ## Architecture
//!
//! 1. **Catalog** - Typed items grouped by media kind, add-only
//! 2. **Preferences** - Per-kind preference sets and consumption history
//! 3. **Engine** - Score and rank items against a profile
//!
//! ## Algorithm Overview
//!
//! Weighted additive scoring with partial credit:
//! - Genre overlap (2.0 per matching genre)
//! - Preferred year (1.0 exact, optional 0.5 within a window)
//! - Minimum rating met (1.5 once)
//! - Kind attributes (1.5 each): actors, director, artist, author, developer, platforms
//!
//! Items in the user's history always score zero.

pub mod catalog;
pub mod engine;
pub mod item;
pub mod metrics;
pub mod preferences;

pub use catalog::{CatalogStore, DuplicatePolicy};
pub use engine::{MatchBreakdown, MatchReason, MatchScorer, ScoredItem, ScoringWeights};
pub use item::{
    BookDetails, EntertainmentItem, GameDetails, ItemDetails, MediaKind, MovieDetails,
    MusicDetails,
};
pub use preferences::{PreferenceCategory, ProfileRegistry, UserProfile};
