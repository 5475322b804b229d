//! Deferred decisions for automated seats.
//!
//! An automated seat does not discard the moment its turn comes up. A
//! ticket is issued with a due time inside the configured think delay, and
//! the table fires it from `pump` once the clock passes that time. The
//! request is frozen at issue; nothing about legality is recomputed when
//! the ticket fires.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::agents::DiscardRequest;
use crate::core::{EngineError, EngineResult, GameRng, RuleConfig, Seat};

/// Handle for a scheduled decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(pub u64);

/// A decision waiting for its due time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTicket {
    pub id: TicketId,
    pub seat: Seat,
    /// Clock time (ms) at which the decision fires.
    pub due_ms: u64,
    pub request: DiscardRequest,
}

/// Outstanding decision tickets.
#[derive(Clone, Debug, Default)]
pub struct DecisionScheduler {
    pending: FxHashMap<TicketId, DecisionTicket>,
    next_id: u64,
}

impl DecisionScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for `request`, due after a think delay drawn from `rng`.
    pub fn schedule(&mut self, request: DiscardRequest, now_ms: u64, rules: &RuleConfig, rng: &mut GameRng) -> TicketId {
        let (min, max) = rules.think_delay_ms;
        let delay = rng.gen_range_inclusive(min, max);
        let id = TicketId(self.next_id);
        self.next_id += 1;

        debug!(ticket = id.0, seat = %request.seat, delay, "decision scheduled");
        self.pending.insert(
            id,
            DecisionTicket {
                id,
                seat: request.seat,
                due_ms: now_ms.saturating_add(delay),
                request,
            },
        );
        id
    }

    #[must_use]
    pub fn get(&self, id: TicketId) -> Option<&DecisionTicket> {
        self.pending.get(&id)
    }

    /// The pending ticket for `seat`, if any.
    #[must_use]
    pub fn for_seat(&self, seat: Seat) -> Option<&DecisionTicket> {
        self.pending.values().find(|t| t.seat == seat)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time among pending tickets.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.values().map(|t| t.due_ms).min()
    }

    /// Remove and return the earliest ticket due at `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Option<DecisionTicket> {
        let id = self
            .pending
            .values()
            .filter(|t| t.due_ms <= now_ms)
            .min_by_key(|t| (t.due_ms, t.id))
            .map(|t| t.id)?;
        self.pending.remove(&id)
    }

    /// Remove a ticket to answer it. Cancelled or used tickets are stale.
    pub fn redeem(&mut self, id: TicketId) -> EngineResult<DecisionTicket> {
        self.pending
            .remove(&id)
            .ok_or(EngineError::StaleDecision { ticket: id.0 })
    }

    /// Cancel every ticket not belonging to `keep`.
    pub fn retain_seat(&mut self, keep: Option<Seat>) {
        self.pending.retain(|id, ticket| {
            let live = Some(ticket.seat) == keep;
            if !live {
                trace!(ticket = id.0, seat = %ticket.seat, "decision cancelled");
            }
            live
        });
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
