//! soundlaw - simulated historical sound change over feature vectors.
//!
//! Words are parsed from IPA into sequences of phonological feature
//! vectors, evolved generation by generation by selecting and applying the
//! sound-change rule that optimises a scoring metric, and deparsed back to
//! the closest known IPA transcriptions. The same driver runs the process
//! in reverse to search for plausible ancestors.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: the data model (feature vectors, segments, words, rules)
//!   and the read-only tables the engine consumes
//! - `engine`: parsing, deparsing, metrics, and the evolution driver
//!
//! # Example
//!
//! ```rust,no_run
//! use soundlaw::{
//!     engine::{Engine, Optimisation, metrics::PhoneticProduct},
//!     schema::inventory,
//! };
//!
//! let engine = Engine::new(
//!     inventory::segments()?,
//!     inventory::diacritics()?,
//!     inventory::feature_strings()?,
//!     inventory::rules(),
//! )?;
//!
//! let words = vec!["ama".to_string(), "apata".to_string()];
//! let run = engine.run(&words, 5, &[], false, &PhoneticProduct, Optimisation::Minimise)?;
//!
//! println!("evolved: {:?}", run.words);
//! for rule in &run.applied {
//!     println!("applied: {}", rule.name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod schema;

// Re-export commonly used types
pub use engine::{Engine, EngineError, EngineRun, Optimisation, Outcome};
pub use schema::{FeatureVector, RuleDef, Segment, Word};
