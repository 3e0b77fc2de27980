use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel for posts that have never been recommended before.
pub const NEVER_RECOMMENDED: f64 = -1.0;

/// A candidate post as handed over by the ingestion layer.
///
/// Ages are carried as precomputed measures instead of raw timestamps, so
/// scoring stays clock-free and reproducible. Callers holding real
/// timestamps can derive the measures with [`Post::from_timestamps`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub likes: u32,
    pub comments: u32,
    /// Age since creation, in hours.
    pub hours_since_creation: f64,
    /// Days since the post was last recommended; negative means never.
    pub days_since_last_recommendation: f64,
}

impl Post {
    pub fn new(
        id: Uuid,
        likes: u32,
        comments: u32,
        hours_since_creation: f64,
        days_since_last_recommendation: f64,
    ) -> Self {
        Self {
            id,
            likes,
            comments,
            hours_since_creation,
            days_since_last_recommendation,
        }
    }

    /// Derive the age measures from timestamps. Timestamps in the future of
    /// `now` clamp to zero age.
    pub fn from_timestamps(
        id: Uuid,
        likes: u32,
        comments: u32,
        created_at: DateTime<Utc>,
        last_recommended_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let hours_since_creation = (now - created_at).num_seconds().max(0) as f64 / 3600.0;
        let days_since_last_recommendation = match last_recommended_at {
            Some(at) => (now - at).num_seconds().max(0) as f64 / 86_400.0,
            None => NEVER_RECOMMENDED,
        };
        Self::new(
            id,
            likes,
            comments,
            hours_since_creation,
            days_since_last_recommendation,
        )
    }

    /// Age since creation in days, the unit the scoring curves work in.
    pub fn days_since_creation(&self) -> f64 {
        self.hours_since_creation / 24.0
    }

    /// True when the post has never been recommended.
    pub fn never_recommended(&self) -> bool {
        self.days_since_last_recommendation < 0.0
    }
}

/// Additive attribution of a score (or, after normalization, of a draw
/// probability) to the scoring factors. The slots always sum to the value
/// they decompose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub likes: f64,
    pub comments: f64,
    pub freshness: f64,
}

impl ScoreComponents {
    pub fn sum(&self) -> f64 {
        self.likes + self.comments + self.freshness
    }

    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self {
            likes: self.likes * factor,
            comments: self.comments * factor,
            freshness: self.freshness * factor,
        }
    }
}

/// One post in an assembled feed, with its scoring breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub post: Post,
    /// Raw composed score.
    pub score: f64,
    /// Share of the dataset's total score, in [0, 1]. Zero when the dataset
    /// total is not positive.
    pub probability: f64,
    /// Additive breakdown of `probability` by factor.
    pub probability_components: ScoreComponents,
    /// Forgetting multiplier on its own [0, 1] axis, not normalized.
    pub forgetting: f64,
}

/// A fully materialized feed: entries in presentation order plus the page
/// size used to chunk them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    entries: Vec<FeedEntry>,
    page_size: usize,
}

impl Feed {
    pub(crate) fn new(entries: Vec<FeedEntry>, page_size: usize) -> Self {
        Self { entries, page_size }
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FeedEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        let size = self.page_size.max(1);
        (self.entries.len() + size - 1) / size
    }

    /// Pages in presentation order. Every page holds `page_size` entries
    /// except possibly the last.
    pub fn pages(&self) -> impl Iterator<Item = &[FeedEntry]> {
        self.entries.chunks(self.page_size.max(1))
    }
}
