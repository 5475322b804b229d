//! Claims, claim options and seat responses.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Seat, Tile};
use crate::rules::{ChiRun, Meld, MeldLegality, WinDetector};

/// Kind of claim, ordered by priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClaimKind {
    Chi = 1,
    Pong = 2,
    ExposedKong = 3,
    Win = 4,
}

impl ClaimKind {
    /// Arbitration rank; higher wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ClaimKind::Chi => "chi",
            ClaimKind::Pong => "pong",
            ClaimKind::ExposedKong => "exposed kong",
            ClaimKind::Win => "win",
        }
    }
}

impl std::fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete claim on a discard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Claim {
    Win,
    ExposedKong,
    Pong,
    /// Chi with the chosen run.
    Chi(ChiRun),
}

impl Claim {
    #[must_use]
    pub const fn kind(&self) -> ClaimKind {
        match self {
            Claim::Win => ClaimKind::Win,
            Claim::ExposedKong => ClaimKind::ExposedKong,
            Claim::Pong => ClaimKind::Pong,
            Claim::Chi(_) => ClaimKind::Chi,
        }
    }

    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.kind().priority()
    }
}

/// A seat's answer to a claim window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Response {
    Pass,
    Claim(Claim),
}

impl Response {
    #[must_use]
    pub fn claim(&self) -> Option<Claim> {
        match self {
            Response::Pass => None,
            Response::Claim(c) => Some(*c),
        }
    }
}

/// Everything one seat may legally claim on a discard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOptions {
    pub win: bool,
    pub exposed_kong: bool,
    pub pong: bool,
    pub chi: SmallVec<[ChiRun; 3]>,
}

impl ClaimOptions {
    /// Evaluate one seat's options against a discard.
    pub fn evaluate(
        legality: &MeldLegality,
        detector: &WinDetector,
        hand: &[Tile],
        melds: &[Meld],
        discard: Tile,
        discarder: Seat,
        claimant: Seat,
    ) -> Self {
        let mut with_discard = hand.to_vec();
        with_discard.push(discard);
        Self {
            win: detector.is_winning(&with_discard, melds.len()),
            exposed_kong: legality.can_exposed_kong(hand, discard, discarder, claimant),
            pong: legality.can_pong(hand, discard),
            chi: legality.chi_options(hand, discard, discarder, claimant),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.win && !self.exposed_kong && !self.pong && self.chi.is_empty()
    }

    /// Whether `claim` is among the options.
    #[must_use]
    pub fn allows(&self, claim: &Claim) -> bool {
        match claim {
            Claim::Win => self.win,
            Claim::ExposedKong => self.exposed_kong,
            Claim::Pong => self.pong,
            Claim::Chi(run) => self.chi.contains(run),
        }
    }

    /// Highest-priority option, taking the first chi run.
    #[must_use]
    pub fn best(&self) -> Option<Claim> {
        if self.win {
            Some(Claim::Win)
        } else if self.exposed_kong {
            Some(Claim::ExposedKong)
        } else if self.pong {
            Some(Claim::Pong)
        } else {
            self.chi.first().copied().map(Claim::Chi)
        }
    }

    /// Every legal claim, best first.
    pub fn claims(&self) -> impl Iterator<Item = Claim> + '_ {
        let fixed = [
            (self.win, Claim::Win),
            (self.exposed_kong, Claim::ExposedKong),
            (self.pong, Claim::Pong),
        ];
        fixed
            .into_iter()
            .filter(|(ok, _)| *ok)
            .map(|(_, c)| c)
            .chain(self.chi.iter().copied().map(Claim::Chi))
    }
}
