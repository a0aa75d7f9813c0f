use crate::models::Repository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Strategy interface for computing a repository's popularity score.
///
/// Implementations must be pure with respect to `now`: the evaluation
/// instant is passed in by the caller so that every repository in a batch
/// is scored against the same clock reading.
pub trait ScoringStrategy: Send + Sync {
    /// Scores a single repository, returning a new value with the score set.
    fn score(&self, repo: Repository, now: DateTime<Utc>) -> Repository;

    /// Scores a list of repositories in input order.
    fn score_all(&self, repos: Vec<Repository>, now: DateTime<Utc>) -> Vec<Repository> {
        repos.into_iter().map(|repo| self.score(repo, now)).collect()
    }
}

/// Construction parameters for [`StaticThresholdStrategy`].
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Star count at which the stars component saturates to 1.0.
    pub max_stars: u32,
    /// Fork count at which the forks component saturates to 1.0.
    pub max_forks: u32,
    /// Decay constant, in days, for the exponential recency component.
    pub recency_decay_days: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            max_stars: 50_000,
            max_forks: 10_000,
            recency_decay_days: 3,
        }
    }
}

/// Default scoring strategy: normalized stars and forks against static
/// ceilings, plus an exponential recency bonus.
///
/// `score = (stars*0.6 + forks*0.3 + recency*0.1) * 100`, each component
/// clamped to [0, 1], so the result always lands in [0, 100].
pub struct StaticThresholdStrategy {
    max_stars: u32,
    max_forks: u32,
    recency_decay_days: u32,
}

impl StaticThresholdStrategy {
    pub fn new(config: &ScoringConfig) -> Self {
        StaticThresholdStrategy {
            max_stars: config.max_stars,
            max_forks: config.max_forks,
            recency_decay_days: config.recency_decay_days,
        }
    }

    fn normalized(value: u32, max: u32) -> f64 {
        (f64::from(value) / f64::from(max)).min(1.0)
    }

    fn recency(&self, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        // Future timestamps clamp to zero days so the component stays <= 1.0;
        // the divisor clamps to >= 1 day so a zero decay setting cannot
        // produce NaN
        let days_since_update = (now - last_updated).num_days().max(0);
        let decay_days = f64::from(self.recency_decay_days.max(1));
        (-(days_since_update as f64) / decay_days).exp()
    }
}

impl ScoringStrategy for StaticThresholdStrategy {
    fn score(&self, repo: Repository, now: DateTime<Utc>) -> Repository {
        debug!(full_name = %repo.full_name, "Calculating popularity score");
        let stars_score = Self::normalized(repo.stars, self.max_stars);
        let forks_score = Self::normalized(repo.forks, self.max_forks);
        let recency_score = self.recency(repo.last_updated, now);

        let score = (stars_score * 0.6 + forks_score * 0.3 + recency_score * 0.1) * 100.0;
        debug!(
            stars_score,
            forks_score, recency_score, score, "Score details"
        );
        repo.with_score(score)
    }
}

/// Scores repositories with whichever strategy was injected at startup.
#[derive(Clone)]
pub struct ScoringService {
    strategy: Arc<dyn ScoringStrategy>,
}

impl ScoringService {
    pub fn new(strategy: Arc<dyn ScoringStrategy>) -> Self {
        ScoringService { strategy }
    }

    /// Scores a batch, preserving order and length.
    ///
    /// The evaluation instant is captured once per batch so identical
    /// timestamps score identically within it.
    pub fn score_repositories(&self, repos: Vec<Repository>) -> Vec<Repository> {
        let now = Utc::now();
        self.strategy.score_all(repos, now)
    }
}
