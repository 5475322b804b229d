//! Hand rules: melds, claim legality and win detection.
//!
//! Everything here is a pure function of tiles, melds and seats. The round
//! machine is the only caller that mutates state with the answers.

pub mod legality;
pub mod meld;
pub mod win;

pub use legality::{ChiRun, MeldLegality, SelfKong};
pub use meld::{Meld, MeldKind};
pub use win::{SuitPurity, WinAttributes, WinDetector, WinReport, WinShape};
