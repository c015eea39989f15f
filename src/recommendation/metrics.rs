//! Recommendation Metrics and Performance Monitoring
//!
//! Per-pass metrics for recommendation quality and timing. Used for
//! debugging why a profile gets the results it does.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::engine::ScoredItem;
use super::item::MediaKind;

/// Metrics for a single recommendation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationMetrics {
    pub user_id: String,
    pub request_id: String,
    pub timestamp: i64,
    pub kind: MediaKind,

    // Performance metrics
    pub scoring_duration_us: u64,

    // Quality metrics
    pub candidates_considered: usize,
    pub consumed_excluded: usize,
    pub recommendations_returned: usize,
    pub avg_score: f64,
    pub zero_score_count: usize,
    pub reason_distribution: BTreeMap<String, usize>, // reason label -> count
}

impl RecommendationMetrics {
    pub fn new(user_id: &str, kind: MediaKind) -> Self {
        Self {
            user_id: user_id.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            kind,
            scoring_duration_us: 0,
            candidates_considered: 0,
            consumed_excluded: 0,
            recommendations_returned: 0,
            avg_score: 0.0,
            zero_score_count: 0,
            reason_distribution: BTreeMap::new(),
        }
    }

    /// Fill the quality fields from the final ranked list
    pub fn record_results(&mut self, results: &[ScoredItem]) {
        self.recommendations_returned = results.len();
        self.zero_score_count = results.iter().filter(|r| r.score == 0.0).count();
        self.avg_score = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
        };

        self.reason_distribution.clear();
        for reason in results.iter().flat_map(|r| &r.reasons) {
            *self
                .reason_distribution
                .entry(reason.label().to_string())
                .or_insert(0) += 1;
        }
    }

    /// Returned items that matched at least one preference
    pub fn matched_count(&self) -> usize {
        self.recommendations_returned - self.zero_score_count
    }
}

/// Performance timer for tracking operation duration
pub struct PerformanceTimer {
    start: Instant,
    label: String,
}

impl PerformanceTimer {
    pub fn new(label: &str) -> Self {
        Self {
            start: Instant::now(),
            label: label.to_string(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn log_if_slow(&self, threshold_ms: u64) {
        let elapsed = self.elapsed_ms();
        if elapsed > threshold_ms {
            tracing::warn!(
                "Slow operation: {} took {}ms (threshold: {}ms)",
                self.label,
                elapsed,
                threshold_ms
            );
        }
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        tracing::debug!("{} completed in {}ms", self.label, elapsed);
    }
}

/// Recommendation quality analyzer
pub struct QualityAnalyzer;

impl QualityAnalyzer {
    /// Share of returned items that matched the profile (0-1, higher is better)
    pub fn personalization_score(matched: usize, total_recommendations: usize) -> f64 {
        if total_recommendations == 0 {
            return 0.0;
        }
        (matched as f64 / total_recommendations as f64).min(1.0)
    }

    /// Detect potential issues with recommendation quality
    pub fn detect_issues(metrics: &RecommendationMetrics) -> Vec<String> {
        let mut issues = Vec::new();

        if metrics.candidates_considered == 0 {
            issues.push(format!("Empty {} catalog", metrics.kind));
            return issues;
        }

        // Everything was already consumed
        if metrics.consumed_excluded == metrics.candidates_considered {
            issues.push("All candidates already consumed".to_string());
        }

        // Nothing matched: profile has no usable preferences for this kind
        if metrics.recommendations_returned > 0 {
            let personalization = Self::personalization_score(
                metrics.matched_count(),
                metrics.recommendations_returned,
            );
            if personalization == 0.0 {
                issues.push("No recommendation matched any preference".to_string());
            } else if personalization < 0.5 {
                issues.push(format!("Low personalization: {:.2}", personalization));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::engine::MatchReason;

    fn scored(id: &str, score: f64, reasons: Vec<MatchReason>) -> ScoredItem {
        ScoredItem {
            id: id.to_string(),
            title: id.to_string(),
            kind: MediaKind::Movie,
            year: 2000,
            score,
            reasons,
        }
    }

    #[test]
    fn test_record_results() {
        let mut metrics = RecommendationMetrics::new("user_1", MediaKind::Movie);
        metrics.record_results(&[
            scored(
                "m1",
                3.5,
                vec![
                    MatchReason::Genre { genre: "Action".to_string() },
                    MatchReason::Actor { name: "A".to_string() },
                ],
            ),
            scored("m2", 2.0, vec![MatchReason::Genre { genre: "Drama".to_string() }]),
            scored("m3", 0.0, vec![]),
        ]);

        assert_eq!(metrics.recommendations_returned, 3);
        assert_eq!(metrics.zero_score_count, 1);
        assert_eq!(metrics.matched_count(), 2);
        assert!((metrics.avg_score - 5.5 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.reason_distribution["genre"], 2);
        assert_eq!(metrics.reason_distribution["actor"], 1);
    }

    #[test]
    fn test_personalization_score() {
        assert_eq!(QualityAnalyzer::personalization_score(3, 3), 1.0);
        assert_eq!(QualityAnalyzer::personalization_score(0, 0), 0.0);
        assert!(QualityAnalyzer::personalization_score(1, 4) < 0.3);
    }

    #[test]
    fn test_detect_issues() {
        let mut metrics = RecommendationMetrics::new("user_1", MediaKind::Book);
        assert!(QualityAnalyzer::detect_issues(&metrics)
            .iter()
            .any(|i| i.contains("Empty book catalog")));

        metrics.candidates_considered = 4;
        metrics.consumed_excluded = 1;
        metrics.record_results(&[scored("b1", 0.0, vec![]), scored("b2", 0.0, vec![])]);
        let issues = QualityAnalyzer::detect_issues(&metrics);
        assert!(issues.iter().any(|i| i.contains("No recommendation matched")));

        metrics.consumed_excluded = 4;
        metrics.record_results(&[]);
        let issues = QualityAnalyzer::detect_issues(&metrics);
        assert!(issues.iter().any(|i| i.contains("already consumed")));
    }
}
