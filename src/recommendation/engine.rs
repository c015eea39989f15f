//! Match Scorer
//!
//! Scores catalog items against a user profile with weighted additive
//! matching: every matching genre, year, rating threshold and kind-specific
//! attribute adds a fixed weight. Consumed items always score zero.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use tracing::debug;

use super::catalog::CatalogStore;
use super::item::{EntertainmentItem, ItemDetails, MediaKind};
use super::metrics::{PerformanceTimer, QualityAnalyzer, RecommendationMetrics};
use super::preferences::{PreferenceCategory, UserProfile};
use crate::error::{Error, Result};

/// Why an item earned part of its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MatchReason {
    /// Item genre is one of the preferred genres
    Genre { genre: String },
    /// Item year is a preferred year
    Year { year: i32 },
    /// Item year lies within the configured window of a preferred year
    NearYear { year: i32, preferred: i32 },
    /// Item rating meets a preferred minimum rating
    RatingThreshold { threshold: f64 },
    Actor { name: String },
    Director { name: String },
    Artist { name: String },
    Author { name: String },
    Developer { name: String },
    Platform { name: String },
}

impl MatchReason {
    /// Short label used for metrics distributions
    pub fn label(&self) -> &'static str {
        match self {
            MatchReason::Genre { .. } => "genre",
            MatchReason::Year { .. } => "year",
            MatchReason::NearYear { .. } => "near_year",
            MatchReason::RatingThreshold { .. } => "rating",
            MatchReason::Actor { .. } => "actor",
            MatchReason::Director { .. } => "director",
            MatchReason::Artist { .. } => "artist",
            MatchReason::Author { .. } => "author",
            MatchReason::Developer { .. } => "developer",
            MatchReason::Platform { .. } => "platform",
        }
    }
}

/// Scoring weights (can be tuned through configuration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Per matching genre
    pub genre: f64,
    /// Exact preferred year
    pub year: f64,
    /// Preferred year within `year_window`
    pub near_year: f64,
    /// Any preferred minimum rating met
    pub rating: f64,
    /// Per matching actor, director, artist, author, developer or platform
    pub attribute: f64,
    /// Years either side of a preferred year that still earn `near_year`; 0 disables
    pub year_window: u32,
    /// Trending popularity lost per year of age
    pub trending_age_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            genre: 2.0,
            year: 1.0,
            near_year: 0.5,
            rating: 1.5,
            attribute: 1.5,
            year_window: 0,
            trending_age_penalty: 0.1,
        }
    }
}

impl ScoringWeights {
    /// Named weights, for validation and logging
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("genre", self.genre),
            ("year", self.year),
            ("near_year", self.near_year),
            ("rating", self.rating),
            ("attribute", self.attribute),
            ("trending_age_penalty", self.trending_age_penalty),
        ]
    }
}

/// Score of one item with the reasons behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub score: f64,
    pub consumed: bool,
    pub reasons: Vec<MatchReason>,
}

/// A ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub id: String,
    pub title: String,
    pub kind: MediaKind,
    pub year: i32,
    pub score: f64,
    pub reasons: Vec<MatchReason>,
}

impl ScoredItem {
    fn new(item: &EntertainmentItem, score: f64, reasons: Vec<MatchReason>) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind(),
            year: item.year,
            score,
            reasons,
        }
    }
}

/// Accumulates score and reasons for a single item
struct Tally<'p> {
    profile: &'p UserProfile,
    kind: MediaKind,
    score: f64,
    reasons: Vec<MatchReason>,
}

impl<'p> Tally<'p> {
    fn prefers(&self, category: PreferenceCategory, value: &str) -> bool {
        self.profile.prefers(self.kind, category, value)
    }

    fn add(&mut self, weight: f64, reason: MatchReason) {
        self.score += weight;
        self.reasons.push(reason);
    }

    /// Credit every distinct value found in the category
    fn credit_each<'v>(
        &mut self,
        category: PreferenceCategory,
        values: impl IntoIterator<Item = &'v String>,
        weight: f64,
        reason: impl Fn(&str) -> MatchReason,
    ) {
        let mut seen = HashSet::new();
        for value in values {
            if seen.insert(value.as_str()) && self.prefers(category, value) {
                self.add(weight, reason(value));
            }
        }
    }

    /// Credit a single value found in the category
    fn credit_one(
        &mut self,
        category: PreferenceCategory,
        value: &str,
        weight: f64,
        reason: impl Fn(&str) -> MatchReason,
    ) {
        if self.prefers(category, value) {
            self.add(weight, reason(value));
        }
    }
}

/// Scores items of one catalog against user profiles
#[derive(Debug, Clone)]
pub struct MatchScorer<'a> {
    catalog: &'a CatalogStore,
    weights: ScoringWeights,
}

impl<'a> MatchScorer<'a> {
    pub fn new(catalog: &'a CatalogStore) -> Self {
        Self {
            catalog,
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_weights(catalog: &'a CatalogStore, weights: ScoringWeights) -> Self {
        Self { catalog, weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Affinity of `item` for `profile`, never negative
    pub fn score(
        &self,
        item: &EntertainmentItem,
        profile: &UserProfile,
        kind: MediaKind,
    ) -> Result<f64> {
        self.explain(item, profile, kind).map(|b| b.score)
    }

    /// Score an item looked up by id
    pub fn score_id(&self, profile: &UserProfile, kind: MediaKind, id: &str) -> Result<f64> {
        let item = self.catalog.get(kind, id).ok_or_else(|| Error::ItemNotFound {
            kind,
            id: id.to_string(),
        })?;
        self.score(item, profile, kind)
    }

    /// Score with the list of matches that produced it
    pub fn explain(
        &self,
        item: &EntertainmentItem,
        profile: &UserProfile,
        kind: MediaKind,
    ) -> Result<MatchBreakdown> {
        if item.kind() != kind {
            return Err(Error::KindMismatch {
                expected: kind,
                found: item.kind(),
            });
        }

        if profile.has_consumed(kind, &item.id) {
            return Ok(MatchBreakdown {
                score: 0.0,
                consumed: true,
                reasons: Vec::new(),
            });
        }

        let w = &self.weights;
        let mut tally = Tally {
            profile,
            kind,
            score: 0.0,
            reasons: Vec::new(),
        };

        // 1. Genre overlap
        tally.credit_each(PreferenceCategory::Genres, &item.genre, w.genre, |g| {
            MatchReason::Genre { genre: g.to_string() }
        });

        // 2. Year
        Self::score_year(&mut tally, item.year, w);

        // 3. Rating threshold
        let best_threshold = profile
            .preferences(kind, PreferenceCategory::Ratings)
            .into_iter()
            .flatten()
            .filter_map(|t| t.parse::<f64>().ok())
            .filter(|&t| t <= item.rating)
            .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.max(t))));
        if let Some(threshold) = best_threshold {
            tally.add(w.rating, MatchReason::RatingThreshold { threshold });
        }

        // 4. Kind-specific attributes
        match &item.details {
            ItemDetails::Movie(movie) => {
                tally.credit_each(PreferenceCategory::Actors, &movie.actors, w.attribute, |a| {
                    MatchReason::Actor { name: a.to_string() }
                });
                tally.credit_one(PreferenceCategory::Directors, &movie.director, w.attribute, |d| {
                    MatchReason::Director { name: d.to_string() }
                });
            }
            ItemDetails::Music(music) => {
                tally.credit_one(PreferenceCategory::Artists, &music.artist, w.attribute, |a| {
                    MatchReason::Artist { name: a.to_string() }
                });
            }
            ItemDetails::Book(book) => {
                tally.credit_one(PreferenceCategory::Authors, &book.author, w.attribute, |a| {
                    MatchReason::Author { name: a.to_string() }
                });
            }
            ItemDetails::Game(game) => {
                tally.credit_one(PreferenceCategory::Developers, &game.developer, w.attribute, |d| {
                    MatchReason::Developer { name: d.to_string() }
                });
                tally.credit_each(PreferenceCategory::Platforms, &game.platforms, w.attribute, |p| {
                    MatchReason::Platform { name: p.to_string() }
                });
            }
        }

        Ok(MatchBreakdown {
            score: tally.score.max(0.0),
            consumed: false,
            reasons: tally.reasons,
        })
    }

    fn score_year(tally: &mut Tally<'_>, year: i32, w: &ScoringWeights) {
        if tally.prefers(PreferenceCategory::Years, &year.to_string()) {
            tally.add(w.year, MatchReason::Year { year });
            return;
        }
        if w.year_window == 0 {
            return;
        }

        let window = i64::from(w.year_window);
        let nearest = tally
            .profile
            .preferences(tally.kind, PreferenceCategory::Years)
            .into_iter()
            .flatten()
            .filter_map(|y| y.parse::<i32>().ok())
            .filter(|&p| (i64::from(p) - i64::from(year)).abs() <= window)
            .min_by_key(|&p| ((i64::from(p) - i64::from(year)).abs(), p));
        if let Some(preferred) = nearest {
            tally.add(w.near_year, MatchReason::NearYear { year, preferred });
        }
    }

    /// Top `count` unconsumed items of a kind, best first
    pub fn recommend(
        &self,
        profile: &UserProfile,
        kind: MediaKind,
        count: usize,
    ) -> Vec<ScoredItem> {
        self.recommend_with_metrics(profile, kind, count).0
    }

    /// Like [`recommend`](Self::recommend), also reporting pass metrics
    pub fn recommend_with_metrics(
        &self,
        profile: &UserProfile,
        kind: MediaKind,
        count: usize,
    ) -> (Vec<ScoredItem>, RecommendationMetrics) {
        let _timer = PerformanceTimer::new("recommend");
        let started = Instant::now();

        let mut metrics = RecommendationMetrics::new(&profile.user_id, kind);
        let mut scored: Vec<ScoredItem> = Vec::new();

        for item in self.catalog.list(kind) {
            metrics.candidates_considered += 1;
            // Shelf items always carry the shelf's kind
            let breakdown = match self.explain(item, profile, kind) {
                Ok(b) => b,
                Err(_) => continue,
            };
            if breakdown.consumed {
                metrics.consumed_excluded += 1;
                continue;
            }
            scored.push(ScoredItem::new(item, breakdown.score, breakdown.reasons));
        }

        // Stable sort keeps catalog order on ties
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(count);

        metrics.record_results(&scored);
        metrics.scoring_duration_us = started.elapsed().as_micros() as u64;

        for issue in QualityAnalyzer::detect_issues(&metrics) {
            debug!("Recommendation quality for {} ({}): {}", profile.user_id, kind, issue);
        }
        debug!(
            "Generated {} {} recommendations for user {} from {} candidates",
            scored.len(),
            kind,
            profile.user_id,
            metrics.candidates_considered
        );

        (scored, metrics)
    }

    /// Recommendations for every media kind
    pub fn recommend_all(
        &self,
        profile: &UserProfile,
        count: usize,
    ) -> BTreeMap<MediaKind, Vec<ScoredItem>> {
        MediaKind::ALL
            .iter()
            .map(|&kind| (kind, self.recommend(profile, kind, count)))
            .collect()
    }

    /// Popular items regardless of profile: high rating, small penalty per year of age
    pub fn trending(&self, kind: MediaKind, count: usize, current_year: i32) -> Vec<ScoredItem> {
        let penalty = self.weights.trending_age_penalty;
        let mut scored: Vec<ScoredItem> = self
            .catalog
            .list(kind)
            .iter()
            .map(|item| {
                // Years span the full i32 range
                let age = (i64::from(current_year) - i64::from(item.year)).max(0) as f64;
                ScoredItem::new(item, item.rating - penalty * age, Vec::new())
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(count);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::item::{BookDetails, GameDetails, MovieDetails, MusicDetails};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn m1() -> EntertainmentItem {
        EntertainmentItem::new(
            "m1",
            "Sample",
            strings(&["Action", "Drama"]),
            2020,
            8.5,
            MovieDetails {
                director: "D".to_string(),
                actors: strings(&["A"]),
                duration: 120,
            },
        )
    }

    fn game(id: &str, platforms: &[&str]) -> EntertainmentItem {
        EntertainmentItem::new(
            id,
            "Game",
            strings(&["Action"]),
            2017,
            9.5,
            GameDetails {
                developer: "Nintendo".to_string(),
                platforms: strings(platforms),
                multiplayer: false,
            },
        )
    }

    fn action_actor_profile() -> UserProfile {
        let mut profile = UserProfile::new("user_1", "John");
        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Genres, "Action")
            .unwrap();
        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Actors, "A")
            .unwrap();
        profile
    }

    #[test]
    fn test_genre_and_actor_match() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let score = scorer.score(&m1(), &action_actor_profile(), MediaKind::Movie).unwrap();
        assert_eq!(score, 3.5);
    }

    #[test]
    fn test_consumed_item_scores_zero() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let mut profile = action_actor_profile();
        profile.add_to_history(MediaKind::Movie, "m1");

        let breakdown = scorer.explain(&m1(), &profile, MediaKind::Movie).unwrap();
        assert_eq!(breakdown.score, 0.0);
        assert!(breakdown.consumed);
        assert!(breakdown.reasons.is_empty());
    }

    #[test]
    fn test_director_adds_attribute_weight() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let mut profile = action_actor_profile();
        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Directors, "D")
            .unwrap();

        let breakdown = scorer.explain(&m1(), &profile, MediaKind::Movie).unwrap();
        assert_eq!(breakdown.score, 5.0);
        assert_eq!(
            breakdown.reasons,
            vec![
                MatchReason::Genre { genre: "Action".to_string() },
                MatchReason::Actor { name: "A".to_string() },
                MatchReason::Director { name: "D".to_string() },
            ]
        );
    }

    #[test]
    fn test_empty_preferences_score_zero() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let profile = UserProfile::new("user_2", "Empty");
        assert_eq!(scorer.score(&m1(), &profile, MediaKind::Movie).unwrap(), 0.0);

        // Preferences for another kind do not leak across
        let mut music_fan = UserProfile::new("user_3", "Music");
        music_fan
            .add_preference(MediaKind::Music, PreferenceCategory::Genres, "Action")
            .unwrap();
        assert_eq!(scorer.score(&m1(), &music_fan, MediaKind::Movie).unwrap(), 0.0);
    }

    #[test]
    fn test_kind_mismatch() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let err = scorer
            .score(&m1(), &action_actor_profile(), MediaKind::Game)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::KindMismatch {
                expected: MediaKind::Game,
                found: MediaKind::Movie
            }
        ));
    }

    #[test]
    fn test_more_matching_genres_never_lower_score() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let mut profile = action_actor_profile();
        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Genres, "Thriller")
            .unwrap();

        let base = scorer.score(&m1(), &profile, MediaKind::Movie).unwrap();
        let mut richer = m1();
        richer.genre.push("Thriller".to_string());
        let more = scorer.score(&richer, &profile, MediaKind::Movie).unwrap();
        assert!(more >= base);
        assert_eq!(more, base + 2.0);

        // Repeated genre labels count once
        richer.genre.push("Thriller".to_string());
        assert_eq!(scorer.score(&richer, &profile, MediaKind::Movie).unwrap(), more);
    }

    #[test]
    fn test_year_exact_match_only_by_default() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let mut profile = UserProfile::new("user_1", "John");
        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Years, 2019)
            .unwrap();
        assert_eq!(scorer.score(&m1(), &profile, MediaKind::Movie).unwrap(), 0.0);

        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Years, 2020)
            .unwrap();
        assert_eq!(scorer.score(&m1(), &profile, MediaKind::Movie).unwrap(), 1.0);
    }

    #[test]
    fn test_year_window_gives_partial_credit() {
        let catalog = CatalogStore::default();
        let weights = ScoringWeights {
            year_window: 5,
            ..Default::default()
        };
        let scorer = MatchScorer::with_weights(&catalog, weights);
        let mut profile = UserProfile::new("user_1", "John");
        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Years, 2016)
            .unwrap();
        profile
            .add_preference(MediaKind::Movie, PreferenceCategory::Years, 2030)
            .unwrap();

        let breakdown = scorer.explain(&m1(), &profile, MediaKind::Movie).unwrap();
        assert_eq!(breakdown.score, 0.5);
        assert_eq!(
            breakdown.reasons,
            vec![MatchReason::NearYear { year: 2020, preferred: 2016 }]
        );
    }

    #[test]
    fn test_rating_threshold_counts_once() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let mut profile = UserProfile::new("user_1", "John");
        for threshold in ["7", "8.5", "9"] {
            profile
                .add_preference(MediaKind::Movie, PreferenceCategory::Ratings, threshold)
                .unwrap();
        }

        let breakdown = scorer.explain(&m1(), &profile, MediaKind::Movie).unwrap();
        assert_eq!(breakdown.score, 1.5);
        assert_eq!(
            breakdown.reasons,
            vec![MatchReason::RatingThreshold { threshold: 8.5 }]
        );

        let mut strict = UserProfile::new("user_2", "Strict");
        strict
            .add_preference(MediaKind::Movie, PreferenceCategory::Ratings, 9.0)
            .unwrap();
        assert_eq!(scorer.score(&m1(), &strict, MediaKind::Movie).unwrap(), 0.0);
    }

    #[test]
    fn test_game_platforms_credit_each_match() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let mut profile = UserProfile::new("user_1", "John");
        profile
            .add_preference(MediaKind::Game, PreferenceCategory::Platforms, "PC")
            .unwrap();
        profile
            .add_preference(MediaKind::Game, PreferenceCategory::Platforms, "Nintendo Switch")
            .unwrap();
        profile
            .add_preference(MediaKind::Game, PreferenceCategory::Developers, "Nintendo")
            .unwrap();

        let item = game("g1", &["Nintendo Switch", "PC", "Xbox"]);
        assert_eq!(scorer.score(&item, &profile, MediaKind::Game).unwrap(), 4.5);
    }

    #[test]
    fn test_music_and_book_attributes() {
        let catalog = CatalogStore::default();
        let scorer = MatchScorer::new(&catalog);
        let mut profile = UserProfile::new("user_1", "John");
        profile
            .add_preference(MediaKind::Music, PreferenceCategory::Artists, "Queen")
            .unwrap();
        profile
            .add_preference(MediaKind::Music, PreferenceCategory::Genres, "Rock")
            .unwrap();
        profile
            .add_preference(MediaKind::Book, PreferenceCategory::Authors, "J.R.R. Tolkien")
            .unwrap();

        let song = EntertainmentItem::new(
            "mu1",
            "Bohemian Rhapsody",
            strings(&["Rock"]),
            1975,
            9.5,
            MusicDetails {
                artist: "Queen".to_string(),
                album: None,
                duration: None,
            },
        );
        assert_eq!(scorer.score(&song, &profile, MediaKind::Music).unwrap(), 3.5);

        let book = EntertainmentItem::new(
            "b3",
            "The Lord of the Rings",
            strings(&["Fantasy", "Adventure"]),
            1954,
            9.3,
            BookDetails {
                author: "J.R.R. Tolkien".to_string(),
                pages: 1178,
                publisher: "Allen & Unwin".to_string(),
            },
        );
        assert_eq!(scorer.score(&book, &profile, MediaKind::Book).unwrap(), 1.5);
    }

    #[test]
    fn test_recommend_orders_stably_and_skips_consumed() {
        let mut catalog = CatalogStore::default();
        catalog.insert(game("g1", &["Wii U"])).unwrap();
        catalog.insert(game("g2", &["PC"])).unwrap();
        catalog.insert(game("g3", &["Mobile"])).unwrap();
        catalog.insert(game("g4", &["PC"])).unwrap();

        let mut profile = UserProfile::new("user_1", "John");
        profile
            .add_preference(MediaKind::Game, PreferenceCategory::Platforms, "PC")
            .unwrap();
        profile.add_to_history(MediaKind::Game, "g2");

        let scorer = MatchScorer::new(&catalog);
        let (recs, metrics) = scorer.recommend_with_metrics(&profile, MediaKind::Game, 3);
        let ids: Vec<_> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["g4", "g1", "g3"]);
        assert_eq!(recs[0].score, 1.5);
        assert_eq!(metrics.candidates_considered, 4);
        assert_eq!(metrics.consumed_excluded, 1);
        assert_eq!(metrics.recommendations_returned, 3);

        assert_eq!(scorer.recommend(&profile, MediaKind::Game, 1).len(), 1);
        assert!(scorer.recommend(&profile, MediaKind::Book, 3).is_empty());
    }

    #[test]
    fn test_recommend_all_covers_every_kind() {
        let mut catalog = CatalogStore::default();
        catalog.insert(m1()).unwrap();
        let scorer = MatchScorer::new(&catalog);
        let all = scorer.recommend_all(&action_actor_profile(), 3);
        assert_eq!(all.len(), 4);
        assert_eq!(all[&MediaKind::Movie][0].score, 3.5);
        assert!(all[&MediaKind::Music].is_empty());
    }

    #[test]
    fn test_score_id_reports_missing_item() {
        let mut catalog = CatalogStore::default();
        catalog.insert(m1()).unwrap();
        let scorer = MatchScorer::new(&catalog);
        let profile = action_actor_profile();
        assert_eq!(scorer.score_id(&profile, MediaKind::Movie, "m1").unwrap(), 3.5);
        assert!(matches!(
            scorer.score_id(&profile, MediaKind::Movie, "m404"),
            Err(Error::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_trending_prefers_recent_high_rated() {
        let mut catalog = CatalogStore::default();
        let mut old_classic = m1();
        old_classic.id = "m_old".to_string();
        old_classic.year = 1972;
        old_classic.rating = 9.2;
        let mut recent = m1();
        recent.id = "m_new".to_string();
        recent.year = 2019;
        recent.rating = 8.6;
        catalog.insert(old_classic).unwrap();
        catalog.insert(recent).unwrap();

        let scorer = MatchScorer::new(&catalog);
        let trending = scorer.trending(MediaKind::Movie, 2, 2020);
        assert_eq!(trending[0].id, "m_new");
        assert!((trending[0].score - 8.5).abs() < 1e-9);
        assert_eq!(trending[1].id, "m_old");
    }

    #[test]
    fn test_trending_handles_extreme_years() {
        let mut catalog = CatalogStore::default();
        let mut ancient = m1();
        ancient.id = "m_min".to_string();
        ancient.year = i32::MIN;
        let mut future = m1();
        future.id = "m_max".to_string();
        future.year = i32::MAX;
        catalog.insert(ancient).unwrap();
        catalog.insert(future).unwrap();

        let scorer = MatchScorer::new(&catalog);
        let trending = scorer.trending(MediaKind::Movie, 2, 2026);
        assert_eq!(trending.len(), 2);
        // Items from the future carry no age penalty
        assert_eq!(trending[0].id, "m_max");
        assert_eq!(trending[0].score, 8.5);
        assert_eq!(trending[1].id, "m_min");
        let expected = 8.5 - 0.1 * (2026.0 - f64::from(i32::MIN));
        assert!((trending[1].score - expected).abs() < 1e-3);
    }
}
