//! Quiz session: learner progress and the question/answer state machine.
//!
//! A session is an explicit value owned by the host. Every operation that
//! needs vocabulary takes the catalog as an argument.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::QuizError;
use crate::model::SourceRecord;
use crate::rank::{rank_for, Rank};

/// Xp awarded for a correct answer.
pub const XP_REWARD: u64 = 10;

/// Daily word cap shown to free-tier learners.
pub const FREE_DAILY_WORD_CAP: u32 = 20;

/// Access level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Paid,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Free => write!(f, "Free"),
            Tier::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "paid" => Ok(Tier::Paid),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// Where the session is in its question/answer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    AwaitingQuestion,
    AwaitingAnswer,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The choice matched. The caller draws the next question when ready.
    Correct { answer: String, xp: u64 },
    /// The choice did not match; progress is unchanged.
    Incorrect,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }
}

/// One learner's quiz progress.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    xp: u64,
    streak: u32,
    tier: Tier,
    selected_language: String,
    current_question: Option<SourceRecord>,
    rng: ChaCha8Rng,
}

impl QuizSession {
    /// Start a session on `language`, or on the first catalog language if
    /// `language` is not available.
    pub fn new(catalog: &Catalog, language: &str) -> Result<Self, QuizError> {
        Self::with_rng(catalog, language, ChaCha8Rng::from_entropy())
    }

    /// Like [`QuizSession::new`] with a deterministic question order.
    pub fn with_seed(catalog: &Catalog, language: &str, seed: u64) -> Result<Self, QuizError> {
        Self::with_rng(catalog, language, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(catalog: &Catalog, language: &str, rng: ChaCha8Rng) -> Result<Self, QuizError> {
        let selected_language = if catalog.contains(language) {
            language.to_string()
        } else {
            let fallback = catalog
                .languages()
                .next()
                .ok_or_else(|| QuizError::EmptyCatalog {
                    warnings: catalog.warnings().to_vec(),
                })?;
            tracing::warn!("language '{language}' not in catalog, starting with {fallback}");
            fallback.to_string()
        };

        Ok(Self {
            id: Uuid::new_v4(),
            xp: 0,
            streak: 1,
            tier: Tier::Free,
            selected_language,
            current_question: None,
            rng,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }

    pub fn selected_language(&self) -> &str {
        &self.selected_language
    }

    pub fn current_question(&self) -> Option<&SourceRecord> {
        self.current_question.as_ref()
    }

    pub fn state(&self) -> QuizState {
        match self.current_question {
            Some(_) => QuizState::AwaitingAnswer,
            None => QuizState::AwaitingQuestion,
        }
    }

    /// Rank for the current xp, recomputed on every call.
    pub fn rank(&self) -> Rank {
        rank_for(self.xp)
    }

    /// Progress toward the next hundred xp, in percent.
    pub fn level_progress(&self) -> u8 {
        (self.xp % 100) as u8
    }

    /// Free-tier sessions have restricted access.
    pub fn is_restricted(&self) -> bool {
        self.tier == Tier::Free
    }

    pub fn daily_word_cap(&self) -> Option<u32> {
        self.is_restricted().then_some(FREE_DAILY_WORD_CAP)
    }

    /// Switch language and draw a question from it.
    ///
    /// Re-selecting the current language while a question is showing is a
    /// no-op, so the question is not reshuffled mid-answer.
    pub fn select_language(&mut self, catalog: &Catalog, name: &str) -> Result<(), QuizError> {
        if !catalog.contains(name) {
            return Err(QuizError::UnknownLanguage(name.to_string()));
        }
        if name == self.selected_language && self.current_question.is_some() {
            return Ok(());
        }

        tracing::debug!(session = %self.id, "language selected: {name}");
        self.selected_language = name.to_string();
        self.next_question(catalog)
    }

    /// Draw a question uniformly at random from the selected language.
    pub fn next_question(&mut self, catalog: &Catalog) -> Result<(), QuizError> {
        let records = catalog
            .records(&self.selected_language)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| QuizError::UnknownLanguage(self.selected_language.clone()))?;

        let index = self.rng.gen_range(0..records.len());
        self.current_question = Some(records[index].clone());
        Ok(())
    }

    /// Check `choice` against the current question's answer.
    ///
    /// A correct answer awards [`XP_REWARD`] but does not advance; the
    /// caller draws the next question after showing feedback.
    pub fn submit_answer(&mut self, choice: &str) -> Result<Outcome, QuizError> {
        let question = self
            .current_question
            .as_ref()
            .ok_or(QuizError::NoActiveQuestion)?;

        if choice != question.answer() {
            return Ok(Outcome::Incorrect);
        }

        self.xp += XP_REWARD;
        tracing::debug!(session = %self.id, xp = self.xp, "correct answer");
        Ok(Outcome::Correct {
            answer: question.answer().to_string(),
            xp: self.xp,
        })
    }
}
