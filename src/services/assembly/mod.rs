// ============================================
// Feed Assembly
// ============================================
//
// Builds the presentation feed: score every post, normalize scores into
// draw probabilities, then fill page after page with weighted draws from
// a bounded candidate pool until every post has been shown once.
//
// Pool policy per page:
// - hot sub-pool: best-scored unseen posts, capped at 2 x page size
// - new sub-pool: youngest unseen posts under the age cutoff that did not
//   make the hot sub-pool, capped at page size
// - the new sub-pool gets `new_ratio` of the page's sampling mass, the
//   hot sub-pool the rest, split inside each sub-pool by rank weights

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{Config, FeedConfig};
use crate::models::{Feed, FeedEntry, Post};
use crate::services::sampling::{rank_weights, WeightedSampler};
use crate::services::scoring::{ScoreEngine, ScoreResult};

/// Hot sub-pool capacity as a multiple of the page size.
const HOT_POOL_FACTOR: usize = 2;

/// Turns scored posts into a paged feed.
pub struct FeedAssembler {
    engine: ScoreEngine,
    feed: FeedConfig,
}

impl FeedAssembler {
    pub fn new(config: Config) -> Self {
        Self {
            engine: ScoreEngine::new(config.scoring),
            feed: config.feed,
        }
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Score-ordered view of the whole dataset, no sampling involved:
    /// every post sorted by descending score with probabilities normalized
    /// over the full input.
    pub fn rank(&self, posts: &[Post]) -> Vec<FeedEntry> {
        let mut entries = self.score_all(posts);
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        entries
    }

    /// Assemble the full feed. Every distinct post appears exactly once;
    /// page order is determined by the injected RNG, so a seeded generator
    /// reproduces the feed bit for bit.
    pub fn assemble<R: Rng + ?Sized>(&self, posts: &[Post], rng: &mut R) -> Feed {
        let page_size = self.feed.page_size;
        let entries = self.score_all(posts);

        // Standing rankings; pools are cut from these per page.
        let mut hot_ranking: Vec<usize> = (0..entries.len()).collect();
        hot_ranking.sort_by(|&a, &b| {
            entries[b]
                .score
                .partial_cmp(&entries[a].score)
                .unwrap_or(Ordering::Equal)
        });

        let mut new_ranking: Vec<usize> = (0..entries.len())
            .filter(|&i| entries[i].post.hours_since_creation < self.feed.fresh_age_cutoff_hours)
            .collect();
        new_ranking.sort_by(|&a, &b| {
            entries[a]
                .post
                .hours_since_creation
                .partial_cmp(&entries[b].post.hours_since_creation)
                .unwrap_or(Ordering::Equal)
        });

        let mut seen: HashSet<Uuid> = HashSet::with_capacity(entries.len());
        let mut output: Vec<FeedEntry> = Vec::with_capacity(entries.len());
        let mut pages = 0usize;

        while output.len() < entries.len() {
            // Cut this page's pool. Sharing `pool_ids` across both cuts
            // keeps the new sub-pool disjoint from the hot one and admits
            // a duplicated id at most once per pool.
            let mut pool_ids: HashSet<Uuid> = HashSet::new();
            let hot_pool = cut_pool(
                &hot_ranking,
                &entries,
                &seen,
                &mut pool_ids,
                HOT_POOL_FACTOR * page_size,
            );
            let new_pool = cut_pool(&new_ranking, &entries, &seen, &mut pool_ids, page_size);

            let mut weights = rank_weights(1.0 - self.feed.new_ratio, hot_pool.len());
            weights.extend(rank_weights(self.feed.new_ratio, new_pool.len()));

            let pool: Vec<usize> = hot_pool.into_iter().chain(new_pool).collect();
            if pool.is_empty() {
                // Whatever is left is duplicated or otherwise unpoolable.
                break;
            }

            let mut sampler = WeightedSampler::from_weights(&weights);
            let mut picked = 0usize;
            while picked < page_size {
                let slot = match sampler.pick(rng) {
                    Some(slot) => slot,
                    None => break,
                };
                let entry = &entries[pool[slot]];
                seen.insert(entry.post.id);
                output.push(entry.clone());
                picked += 1;
            }

            pages += 1;
            debug!(
                page = pages,
                picked,
                shown = output.len(),
                "Feed page drawn"
            );

            if picked == 0 {
                // Pool had members but none carried drawable mass, e.g.
                // new_ratio = 1.0 with only stale posts left. No later
                // pass can do better, so stop.
                break;
            }
        }

        info!(
            input_count = entries.len(),
            output_count = output.len(),
            pages,
            "Feed assembly completed"
        );

        Feed::new(output, page_size)
    }

    /// Score every post and normalize into probabilities over the dataset
    /// total. A non-positive total (empty input, or every post suppressed)
    /// yields zero probabilities rather than dividing by it.
    fn score_all(&self, posts: &[Post]) -> Vec<FeedEntry> {
        let results: Vec<ScoreResult> = posts.iter().map(|post| self.engine.score(post)).collect();
        let total: f64 = results.iter().map(|result| result.score).sum();
        let normalizer = if total > 0.0 { 1.0 / total } else { 0.0 };

        posts
            .iter()
            .zip(results)
            .map(|(post, result)| FeedEntry {
                post: post.clone(),
                score: result.score,
                probability: result.score * normalizer,
                probability_components: result.components.scaled(normalizer),
                forgetting: result.forgetting,
            })
            .collect()
    }
}

/// Walk `ranking` in order and take up to `cap` entries that are neither
/// shown already nor pooled already.
fn cut_pool(
    ranking: &[usize],
    entries: &[FeedEntry],
    seen: &HashSet<Uuid>,
    pool_ids: &mut HashSet<Uuid>,
    cap: usize,
) -> Vec<usize> {
    let mut pool = Vec::with_capacity(cap.min(ranking.len()));
    for &index in ranking {
        if pool.len() >= cap {
            break;
        }
        let id = entries[index].post.id;
        if seen.contains(&id) || !pool_ids.insert(id) {
            continue;
        }
        pool.push(index);
    }
    pool
}
