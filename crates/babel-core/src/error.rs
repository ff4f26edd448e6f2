//! Error types for catalog loading and quiz sessions.
//!
//! Source errors are isolated per source during a catalog rebuild and
//! surface as warnings. Quiz errors are returned to the calling layer.

use thiserror::Error;

use crate::catalog::SourceWarning;

/// Errors raised while fetching or normalizing one vocabulary source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Network or transport failure (unreachable host, timeout, non-2xx,
    /// missing local file).
    #[error("source '{source_name}' unavailable: {message}")]
    Unavailable {
        source_name: String,
        message: String,
    },

    /// An expected column is missing or a row is malformed.
    #[error("source '{source_name}' schema mismatch: {message}")]
    SchemaMismatch {
        source_name: String,
        message: String,
    },
}

impl SourceError {
    pub fn unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::Unavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn schema(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::SchemaMismatch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for transport failures, `false` for schema problems.
    pub fn is_transport(&self) -> bool {
        matches!(self, SourceError::Unavailable { .. })
    }

    /// Name of the source that failed.
    pub fn source_name(&self) -> &str {
        match self {
            SourceError::Unavailable { source_name, .. }
            | SourceError::SchemaMismatch { source_name, .. } => source_name,
        }
    }
}

/// A vocabulary record that violates the record invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("distractor {0} is empty")]
    EmptyDistractor(usize),

    #[error("answer '{0}' also appears among the distractors")]
    AnswerInDistractors(String),

    #[error("distractor '{0}' appears more than once")]
    DuplicateDistractor(String),
}

/// Errors returned by quiz session and catalog operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// No language produced any records after a full rebuild.
    #[error("catalog is empty: no source produced any vocabulary ({} source warning(s))", .warnings.len())]
    EmptyCatalog { warnings: Vec<SourceWarning> },

    /// The caller selected a language that is not in the catalog.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// An answer was submitted before any question was drawn.
    #[error("no active question: draw a question before submitting an answer")]
    NoActiveQuestion,
}

/// Errors from the speech synthesis collaborator.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The synthesis service could not be reached.
    #[error("speech service unavailable: {0}")]
    Unavailable(String),

    /// The synthesis service rejected the request.
    #[error("speech service error (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}
