//! Scoring collaborator.
//!
//! The engine hands a finished win to a `Scorer` and stores whatever comes
//! back. It never reads the sheet.

use serde::{Deserialize, Serialize};

use crate::core::{RoundState, Seat, SeatMap};
use crate::round::WinSource;
use crate::rules::WinReport;

/// A won hand, as passed to the scorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub round: RoundState,
    pub winner: Seat,
    pub source: WinSource,
    /// Hand, melds, winning tile and the win attributes.
    pub report: WinReport,
}

/// Result of scoring a hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub fan: u32,
    /// Point change per seat.
    pub points: SeatMap<i64>,
    /// Named patterns that contributed.
    pub patterns: Vec<String>,
}

/// Computes points for a won hand.
pub trait Scorer: Send + Sync {
    fn score(&self, request: &ScoreRequest) -> ScoreSheet;
}

/// Scorer that awards nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullScorer;

impl Scorer for NullScorer {
    fn score(&self, _request: &ScoreRequest) -> ScoreSheet {
        ScoreSheet::default()
    }
}
