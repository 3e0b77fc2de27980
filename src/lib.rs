//! Weighted feed assembly for social-style post ranking.
//!
//! `feedmix` turns a set of posts and a scoring configuration into a paged
//! recommendation feed:
//!
//! - [`ScoreEngine`] scores each post from popularity (likes and comments),
//!   freshness (logistic age decay) and a forgetting multiplier that
//!   suppresses recently recommended posts, in additive or multiplicative
//!   composition, and decomposes the score into per-factor slots.
//! - [`WeightedSampler`] draws candidates without replacement in O(log n)
//!   per draw over a binary-indexed prefix-sum tree.
//! - [`FeedAssembler`] fills page after page from bounded pools that mix
//!   hot (score-ranked) and new (age-ranked) posts, reserving a configured
//!   share of each page's sampling mass for new content, until every post
//!   has been shown exactly once.
//!
//! The crate is synchronous and free of I/O. Randomness is injected, so a
//! seeded generator reproduces a feed bit for bit.
//!
//! # Example
//!
//! ```
//! use feedmix::{Config, FeedAssembler, Post};
//! use uuid::Uuid;
//!
//! let posts = vec![
//!     Post::new(Uuid::new_v4(), 42, 7, 3.0, -1.0),
//!     Post::new(Uuid::new_v4(), 5, 1, 40.0, 2.0),
//! ];
//!
//! let assembler = FeedAssembler::new(Config::default());
//! let feed = assembler.assemble(&posts, &mut rand::thread_rng());
//!
//! assert_eq!(feed.len(), posts.len());
//! ```

pub mod config;
pub mod models;
pub mod services;

pub use config::{Composition, Config, ConfigError, FeedConfig, ScoringConfig};
pub use models::{Feed, FeedEntry, Post, ScoreComponents, NEVER_RECOMMENDED};
pub use services::sampling::rank_weights;
pub use services::{FeedAssembler, PrefixSumTree, ScoreEngine, ScoreResult, WeightedSampler};
