//! babel-core — Vocabulary catalog, quiz session, and rank engine.
//!
//! This crate defines the record model, row normalization, the TTL-cached
//! catalog loader, and the quiz session state machine that the rest of
//! babel builds on.

pub mod catalog;
pub mod error;
pub mod model;
pub mod normalize;
pub mod rank;
pub mod seed;
pub mod session;
pub mod speech;
pub mod traits;

pub use catalog::{Catalog, CatalogLoader, SourceWarning};
pub use error::{QuizError, RecordError, SourceError, SpeechError};
pub use model::{RawRow, SourceRecord};
pub use rank::{rank_for, Rank};
pub use session::{Outcome, QuizSession, QuizState, Tier};
