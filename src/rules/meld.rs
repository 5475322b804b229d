//! Melds: groups a seat has declared.
//!
//! A meld is fixed once formed. The single exception is a pong, which may be
//! upgraded in place to an added kong when its fourth tile arrives.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::{Seat, Tile};

/// How a meld was formed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    Chi,
    Pong,
    ExposedKong,
    AddedKong,
    ConcealedKong,
}

impl MeldKind {
    #[must_use]
    pub const fn is_kong(self) -> bool {
        matches!(self, MeldKind::ExposedKong | MeldKind::AddedKong | MeldKind::ConcealedKong)
    }

    /// Whether this meld breaks a fully concealed hand.
    #[must_use]
    pub const fn is_exposed(self) -> bool {
        !matches!(self, MeldKind::ConcealedKong)
    }
}

impl std::fmt::Display for MeldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MeldKind::Chi => "chi",
            MeldKind::Pong => "pong",
            MeldKind::ExposedKong => "exposed kong",
            MeldKind::AddedKong => "added kong",
            MeldKind::ConcealedKong => "concealed kong",
        };
        f.write_str(name)
    }
}

/// A declared group of three or four tiles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meld {
    kind: MeldKind,
    tiles: SmallVec<[Tile; 4]>,
    /// Seat whose discard completed the meld, if any.
    claimed_from: Option<Seat>,
}

impl Meld {
    /// A run claimed from the previous seat's discard. Tiles are stored sorted.
    #[must_use]
    pub fn chi(mut run: [Tile; 3], from: Seat) -> Self {
        run.sort();
        Self {
            kind: MeldKind::Chi,
            tiles: SmallVec::from_slice(&run),
            claimed_from: Some(from),
        }
    }

    #[must_use]
    pub fn pong(tile: Tile, from: Seat) -> Self {
        Self {
            kind: MeldKind::Pong,
            tiles: smallvec![tile; 3],
            claimed_from: Some(from),
        }
    }

    #[must_use]
    pub fn exposed_kong(tile: Tile, from: Seat) -> Self {
        Self {
            kind: MeldKind::ExposedKong,
            tiles: smallvec![tile; 4],
            claimed_from: Some(from),
        }
    }

    #[must_use]
    pub fn concealed_kong(tile: Tile) -> Self {
        Self {
            kind: MeldKind::ConcealedKong,
            tiles: smallvec![tile; 4],
            claimed_from: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn claimed_from(&self) -> Option<Seat> {
        self.claimed_from
    }

    /// The tile a pong or kong is made of. `None` for a chi.
    #[must_use]
    pub fn set_tile(&self) -> Option<Tile> {
        match self.kind {
            MeldKind::Chi => None,
            _ => self.tiles.first().copied(),
        }
    }

    /// Whether this is a pong of `tile`.
    #[must_use]
    pub fn is_pong_of(&self, tile: Tile) -> bool {
        self.kind == MeldKind::Pong && self.set_tile() == Some(tile)
    }

    /// Upgrade a pong of `tile` to an added kong.
    ///
    /// Returns `false` and leaves the meld alone if it is not a pong of `tile`.
    pub fn upgrade_to_added_kong(&mut self, tile: Tile) -> bool {
        if !self.is_pong_of(tile) {
            return false;
        }
        self.kind = MeldKind::AddedKong;
        self.tiles.push(tile);
        true
    }
}

impl std::fmt::Display for Meld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.kind)?;
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", tile)?;
        }
        f.write_str("]")
    }
}
