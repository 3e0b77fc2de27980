// ============================================
// Scoring Layer
// ============================================
//
// Turns a post's raw signals into one comparable score:
//
//   popularity = alpha * likes/10 + (1 - alpha) * comments/10
//   freshness  = 1 / (1 + e^(decay_rate * (age_days - fresh_days)))
//   forgetting = 0 inside the post-recommendation window, recovering to 1
//
// Additive composition weights popularity against freshness and scales the
// sum by forgetting; multiplicative composition multiplies all three.
// Either way the result decomposes into additive slots that sum back to
// the score, which downstream normalization turns into a probability
// breakdown.

pub mod engine;

pub use engine::{ScoreEngine, ScoreResult, ENGAGEMENT_SCALE};
