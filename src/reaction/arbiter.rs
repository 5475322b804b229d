//! Claim window bookkeeping and resolution.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{EngineError, EngineResult, Seat, SeatMap, Tile};

use super::claim::{Claim, ClaimOptions, Response};

/// The single pending claim window after a discard.
///
/// Options are computed once when the window opens and never recomputed.
/// Seats with no options are answered `Pass` on creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionContext {
    discarder: Seat,
    tile: Tile,
    options: SeatMap<ClaimOptions>,
    responses: SeatMap<Option<Response>>,
}

impl ReactionContext {
    /// Open a window. `options` for the discarder are ignored.
    #[must_use]
    pub fn open(discarder: Seat, tile: Tile, mut options: SeatMap<ClaimOptions>) -> Self {
        options[discarder] = ClaimOptions::default();
        let responses = options.map(|_, opts| opts.is_empty().then_some(Response::Pass));
        Self {
            discarder,
            tile,
            options,
            responses,
        }
    }

    #[must_use]
    pub fn discarder(&self) -> Seat {
        self.discarder
    }

    #[must_use]
    pub fn tile(&self) -> Tile {
        self.tile
    }

    #[must_use]
    pub fn options(&self, seat: Seat) -> &ClaimOptions {
        &self.options[seat]
    }

    #[must_use]
    pub fn response(&self, seat: Seat) -> Option<Response> {
        self.responses.try_get(seat).copied().flatten()
    }

    /// Seats that still owe an answer, nearest the discarder first.
    pub fn pending_seats(&self) -> impl Iterator<Item = Seat> + '_ {
        self.discarder.others().filter(|&s| self.responses[s].is_none())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending_seats().next().is_none()
    }

    /// Record a seat's answer.
    ///
    /// Rejects unknown seats, seats with nothing pending and claims outside
    /// the seat's options. A rejected answer leaves the window unchanged.
    pub fn record(&mut self, seat: Seat, response: Response) -> EngineResult<()> {
        if !seat.is_valid() {
            warn!(seat = %seat, "response from unknown seat");
            return Err(EngineError::out_of_turn(seat, "no such seat"));
        }
        if seat == self.discarder || self.responses[seat].is_some() {
            warn!(seat = %seat, "response with nothing pending");
            return Err(EngineError::out_of_turn(seat, "no claim pending for this seat"));
        }
        if let Response::Claim(claim) = &response {
            if !self.options[seat].allows(claim) {
                warn!(seat = %seat, claim = %claim.kind(), tile = %self.tile, "claim not among options");
                return Err(EngineError::illegal(seat, claim.kind().name(), "not legal on this discard"));
            }
        }
        debug!(seat = %seat, ?response, "claim response");
        self.responses[seat] = Some(response);
        Ok(())
    }
}

/// Picks one claim from a completed window.
pub struct ReactionArbiter;

impl ReactionArbiter {
    /// Highest-priority claim; ties go to the seat nearest the discarder
    /// clockwise. `None` if every seat passed.
    ///
    /// ```
    /// use mahjong_core::core::{Seat, SeatMap};
    /// use mahjong_core::reaction::{Claim, ReactionArbiter};
    ///
    /// let mut responses: SeatMap<Option<Claim>> = SeatMap::with_default();
    /// responses[Seat::new(1)] = Some(Claim::Pong);
    /// responses[Seat::new(3)] = Some(Claim::Win);
    ///
    /// let winner = ReactionArbiter::resolve(Seat::new(0), &responses);
    /// assert_eq!(winner, Some((Seat::new(3), Claim::Win)));
    /// ```
    #[must_use]
    pub fn resolve(discarder: Seat, claims: &SeatMap<Option<Claim>>) -> Option<(Seat, Claim)> {
        discarder
            .others()
            .filter_map(|seat| claims[seat].map(|claim| (seat, claim)))
            .max_by(|(sa, a), (sb, b)| {
                a.priority()
                    .cmp(&b.priority())
                    .then_with(|| sb.distance_from(discarder).cmp(&sa.distance_from(discarder)))
            })
    }

    /// Resolve a window once every seat has answered.
    ///
    /// Returns `None` while answers are outstanding.
    #[must_use]
    pub fn resolve_context(ctx: &ReactionContext) -> Option<Option<(Seat, Claim)>> {
        if !ctx.is_complete() {
            return None;
        }
        let claims = ctx.responses.map(|_, r| r.and_then(|r| r.claim()));
        Some(Self::resolve(ctx.discarder, &claims))
    }
}
