// ============================================
// Score Engine
// ============================================
//
// Deterministic multi-factor scorer behind the feed assembler.
//
// Factors:
// - Popularity: alpha-weighted blend of likes and comments
// - Freshness: logistic decay over age in days
// - Forgetting: suppression window after a recommendation
//
// Composition is configurable: additive takes the weighted sum of
// popularity and freshness and scales it by forgetting; multiplicative
// takes the straight product of all three factors.

use crate::config::{Composition, ScoringConfig};
use crate::models::{Post, ScoreComponents};
use tracing::debug;

/// Normalizer for raw like/comment counts; around this count a post's
/// popularity term reaches 1.0.
pub const ENGAGEMENT_SCALE: f64 = 10.0;

/// A scored post with its additive factor attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    /// Additive attribution of `score`; slots sum to `score` in both
    /// composition modes.
    pub components: ScoreComponents,
    /// Forgetting multiplier in [0, 1]; 1.0 for never-recommended posts.
    pub forgetting: f64,
}

/// Stateless post scorer. Total for any finite input: range checking is the
/// caller's concern (`ScoringConfig::validate`).
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a single post.
    pub fn score(&self, post: &Post) -> ScoreResult {
        let likes_term = self.likes_term(post);
        let comments_term = self.comments_term(post);
        let freshness = self.freshness(post);
        let forgetting = self.forgetting(post);

        let result = match self.config.composition {
            Composition::Additive => {
                self.compose_additive(likes_term, comments_term, freshness, forgetting)
            }
            Composition::Multiplicative => {
                compose_multiplicative(likes_term, comments_term, freshness, forgetting)
            }
        };

        debug!(
            post_id = %post.id,
            score = result.score,
            forgetting = result.forgetting,
            mode = self.config.composition.as_str(),
            "Post scored"
        );

        result
    }

    /// Popularity factor before outer weighting: alpha-blended likes and
    /// comments on the engagement scale. 10 likes with alpha = 0.5 give 0.5.
    pub fn popularity(&self, post: &Post) -> f64 {
        self.likes_term(post) + self.comments_term(post)
    }

    /// Freshness factor: 1.0 for brand-new posts, exactly 0.5 at
    /// `fresh_days`, decaying towards 0.0 with steepness `decay_rate`.
    pub fn freshness(&self, post: &Post) -> f64 {
        let age_days = post.days_since_creation();
        1.0 / (1.0 + (self.config.decay_rate * (age_days - self.config.fresh_days)).exp())
    }

    /// Forgetting multiplier: 1.0 for never-recommended posts, 0.0 from the
    /// recommendation until `delay_days` have passed, then recovering
    /// towards 1.0 with steepness `recovery_rate`.
    pub fn forgetting(&self, post: &Post) -> f64 {
        if post.never_recommended() {
            return 1.0;
        }
        let days = post.days_since_last_recommendation;
        1.0 - (-self.config.recovery_rate * (days - self.config.delay_days))
            .exp()
            .min(1.0)
    }

    fn likes_term(&self, post: &Post) -> f64 {
        self.config.alpha * (post.likes as f64 / ENGAGEMENT_SCALE)
    }

    fn comments_term(&self, post: &Post) -> f64 {
        (1.0 - self.config.alpha) * (post.comments as f64 / ENGAGEMENT_SCALE)
    }

    fn compose_additive(
        &self,
        likes_term: f64,
        comments_term: f64,
        freshness: f64,
        forgetting: f64,
    ) -> ScoreResult {
        let rate_popularity = self.config.rate_popularity();
        let rate_freshness = self.config.rate_freshness();

        let components = ScoreComponents {
            likes: rate_popularity * likes_term * forgetting,
            comments: rate_popularity * comments_term * forgetting,
            freshness: rate_freshness * freshness * forgetting,
        };

        ScoreResult {
            score: components.sum(),
            components,
            forgetting,
        }
    }
}

/// Product composition, attributed back onto the additive display slots:
/// the score is split between popularity and freshness in proportion to
/// their factor values, and the popularity share is split between likes and
/// comments by their term ratio. Slots still sum to the score.
fn compose_multiplicative(
    likes_term: f64,
    comments_term: f64,
    freshness: f64,
    forgetting: f64,
) -> ScoreResult {
    let popularity = likes_term + comments_term;
    let score = popularity * freshness * forgetting;

    let factor_sum = popularity + freshness;
    let components = if factor_sum > 0.0 {
        let popularity_share = score * (popularity / factor_sum);
        let freshness_share = score * (freshness / factor_sum);
        let (likes, comments) = if popularity > 0.0 {
            (
                popularity_share * (likes_term / popularity),
                popularity_share * (comments_term / popularity),
            )
        } else {
            (0.0, 0.0)
        };
        ScoreComponents {
            likes,
            comments,
            freshness: freshness_share,
        }
    } else {
        ScoreComponents::default()
    };

    ScoreResult {
        score,
        components,
        forgetting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NEVER_RECOMMENDED;
    use uuid::Uuid;

    fn create_test_post(likes: u32, comments: u32, age_days: f64, last_days: f64) -> Post {
        Post::new(Uuid::new_v4(), likes, comments, age_days * 24.0, last_days)
    }

    fn create_engine() -> ScoreEngine {
        ScoreEngine::new(ScoringConfig::default())
    }

    #[test]
    fn test_freshness_is_half_at_fresh_days() {
        let engine = create_engine();
        let post = create_test_post(0, 0, 7.0, NEVER_RECOMMENDED);

        assert!((engine.freshness(&post) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_freshness_decreases_with_age() {
        let engine = create_engine();
        let mut last = f64::INFINITY;

        for age in [0.0, 1.0, 3.0, 7.0, 10.0, 20.0, 50.0] {
            let post = create_test_post(0, 0, age, NEVER_RECOMMENDED);
            let freshness = engine.freshness(&post);
            assert!(freshness < last, "freshness must fall as age grows");
            assert!(freshness > 0.0 && freshness <= 1.0);
            last = freshness;
        }
    }

    #[test]
    fn test_never_recommended_is_never_suppressed() {
        for recovery_rate in [0.1, 0.8, 4.0] {
            for delay_days in [0.0, 7.0, 28.0] {
                let engine = ScoreEngine::new(ScoringConfig {
                    recovery_rate,
                    delay_days,
                    ..ScoringConfig::default()
                });
                let post = create_test_post(10, 10, 1.0, NEVER_RECOMMENDED);
                assert_eq!(engine.forgetting(&post), 1.0);
            }
        }
    }

    #[test]
    fn test_forgetting_suppresses_until_delay_then_recovers() {
        let engine = create_engine();

        // Inside the suppression window the multiplier pins at zero.
        for days in [0.0, 1.0, 3.0, 6.9, 7.0] {
            let post = create_test_post(10, 10, 1.0, days);
            assert_eq!(engine.forgetting(&post), 0.0, "suppressed at {days} days");
        }

        // Past the window it recovers monotonically towards 1.0.
        let mut last = 0.0;
        for days in [7.5, 8.0, 10.0, 14.0, 30.0] {
            let post = create_test_post(10, 10, 1.0, days);
            let forgetting = engine.forgetting(&post);
            assert!(forgetting > last, "forgetting must recover after delay");
            assert!(forgetting < 1.0);
            last = forgetting;
        }

        let post = create_test_post(10, 10, 1.0, 1000.0);
        assert!(engine.forgetting(&post) > 0.999);
    }

    #[test]
    fn test_popularity_blends_likes_and_comments_by_alpha() {
        let engine = ScoreEngine::new(ScoringConfig {
            alpha: 0.8,
            ..ScoringConfig::default()
        });

        let likes_only = create_test_post(10, 0, 0.0, NEVER_RECOMMENDED);
        let comments_only = create_test_post(0, 10, 0.0, NEVER_RECOMMENDED);

        assert!((engine.popularity(&likes_only) - 0.8).abs() < 1e-12);
        assert!((engine.popularity(&comments_only) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_score_increases_with_likes() {
        let engine = create_engine();
        let mut last = -1.0;

        for likes in [0, 5, 10, 20, 50] {
            let post = create_test_post(likes, 5, 2.0, NEVER_RECOMMENDED);
            let score = engine.score(&post).score;
            assert!(score > last, "score must grow with likes");
            last = score;
        }
    }

    #[test]
    fn test_score_falls_with_age_and_rises_with_comments() {
        let engine = create_engine();

        let mut last = f64::INFINITY;
        for age in [0.0, 2.0, 5.0, 9.0, 15.0] {
            let score = engine.score(&create_test_post(10, 10, age, NEVER_RECOMMENDED)).score;
            assert!(score < last, "score must fall as age grows");
            last = score;
        }

        let quiet = engine.score(&create_test_post(10, 2, 3.0, NEVER_RECOMMENDED));
        let lively = engine.score(&create_test_post(10, 9, 3.0, NEVER_RECOMMENDED));
        assert!(lively.score > quiet.score);
    }

    #[test]
    fn test_components_sum_to_score_in_additive_mode() {
        let engine = create_engine();

        for (likes, comments, age, last) in [
            (0, 0, 0.0, NEVER_RECOMMENDED),
            (10, 20, 2.0, NEVER_RECOMMENDED),
            (50, 0, 16.0, 8.0),
            (20, 50, 4.0, 16.0),
        ] {
            let result = engine.score(&create_test_post(likes, comments, age, last));
            assert!(
                (result.components.sum() - result.score).abs() < 1e-12,
                "components must sum to the score"
            );
        }
    }

    #[test]
    fn test_components_sum_to_score_in_multiplicative_mode() {
        let engine = ScoreEngine::new(ScoringConfig {
            composition: Composition::Multiplicative,
            ..ScoringConfig::default()
        });

        for (likes, comments, age, last) in [
            (0, 0, 2.0, NEVER_RECOMMENDED),
            (10, 20, 2.0, NEVER_RECOMMENDED),
            (50, 10, 16.0, 8.5),
            (20, 50, 4.0, 16.0),
        ] {
            let result = engine.score(&create_test_post(likes, comments, age, last));
            let drift = (result.components.sum() - result.score).abs();
            assert!(drift < 1e-9, "components must sum to the score");
        }
    }

    #[test]
    fn test_multiplicative_zeroes_score_without_engagement() {
        let engine = ScoreEngine::new(ScoringConfig {
            composition: Composition::Multiplicative,
            ..ScoringConfig::default()
        });

        let post = create_test_post(0, 0, 1.0, NEVER_RECOMMENDED);
        let result = engine.score(&post);

        assert_eq!(result.score, 0.0);
        assert_eq!(result.components, ScoreComponents::default());
    }

    #[test]
    fn test_additive_keeps_fresh_unengaged_posts_alive() {
        let engine = create_engine();

        let post = create_test_post(0, 0, 1.0, NEVER_RECOMMENDED);
        let result = engine.score(&post);

        assert!(result.score > 0.0);
        assert_eq!(result.components.likes, 0.0);
        assert!(result.components.freshness > 0.0);
    }

    #[test]
    fn test_suppressed_post_scores_zero_in_both_modes() {
        for composition in [Composition::Additive, Composition::Multiplicative] {
            let engine = ScoreEngine::new(ScoringConfig {
                composition,
                ..ScoringConfig::default()
            });

            // Recommended two days ago, still inside the seven-day window.
            let post = create_test_post(50, 50, 2.0, 2.0);
            let result = engine.score(&post);

            assert_eq!(result.score, 0.0);
            assert_eq!(result.forgetting, 0.0);
            assert!((result.components.sum()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_forgetting_rides_along_unnormalized() {
        let engine = create_engine();

        let post = create_test_post(10, 10, 2.0, 10.0);
        let result = engine.score(&post);

        assert!(result.forgetting > 0.0 && result.forgetting < 1.0);
        assert!((result.forgetting - engine.forgetting(&post)).abs() < 1e-12);
    }
}
