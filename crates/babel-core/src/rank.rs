//! Rank engine: experience points to rank labels.

use std::fmt;

use serde::Serialize;

/// Learner rank, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rank {
    Novice,
    Voyager,
    PrimeSpeaker,
    Polyglot,
    UniversalTranslator,
    GalacticLinguist,
}

/// Upper xp bound (exclusive) for every rank but the last.
const THRESHOLDS: [(u64, Rank); 5] = [
    (100, Rank::Novice),
    (500, Rank::Voyager),
    (1500, Rank::PrimeSpeaker),
    (5000, Rank::Polyglot),
    (10000, Rank::UniversalTranslator),
];

/// Map accumulated xp to a rank.
pub fn rank_for(xp: u64) -> Rank {
    THRESHOLDS
        .iter()
        .find(|(limit, _)| xp < *limit)
        .map(|(_, rank)| *rank)
        .unwrap_or(Rank::GalacticLinguist)
}

impl Rank {
    pub fn label(self) -> &'static str {
        match self {
            Rank::Novice => "Novice",
            Rank::Voyager => "Voyager",
            Rank::PrimeSpeaker => "Prime Speaker",
            Rank::Polyglot => "Polyglot",
            Rank::UniversalTranslator => "Universal Translator",
            Rank::GalacticLinguist => "Galactic Linguist",
        }
    }

    /// Xp at which the next rank starts, or `None` at the top rank.
    pub fn next_threshold(self) -> Option<u64> {
        THRESHOLDS
            .iter()
            .find(|(_, rank)| *rank == self)
            .map(|(limit, _)| *limit)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
