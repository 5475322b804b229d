//! A table: one match of consecutive hands.
//!
//! `Table` owns everything a match needs: the rules, the seeded RNG, seat
//! controls, the current `RoundStateMachine`, the decision scheduler and the
//! collaborators. Nothing is global; two tables never share state.
//!
//! ## Driving a table
//!
//! The table never blocks. `pump(now_ms)` advances the match as far as it
//! can at clock time `now_ms` and reports what it is waiting on: a human
//! seat, open claims, or the due time of the next automated decision.
//!
//! ```
//! use mahjong_core::core::RuleConfig;
//! use mahjong_core::round::SeatControl;
//! use mahjong_core::table::{TableBuilder, TableStatus};
//!
//! let mut table = TableBuilder::new()
//!     .rules(RuleConfig::default().with_final_hand(0, mahjong_core::core::Seat::new(0)))
//!     .all_automated()
//!     .build(7)
//!     .unwrap();
//!
//! let mut now = 0;
//! loop {
//!     match table.pump(now).unwrap() {
//!         TableStatus::Scheduled { due_ms } => now = due_ms,
//!         TableStatus::Finished => break,
//!         other => panic!("automated table waited on {:?}", other),
//!     }
//! }
//! assert!(!table.history().is_empty());
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agents::{DecisionProvider, DiscardRequest, GreedyDiscard, NullScorer, ScoreRequest, ScoreSheet, Scorer};
use crate::core::{
    ConfigError, EngineError, EngineResult, GameRng, GameRngState, RoundState, RuleConfig, Seat, SeatMap, Tile,
};
use crate::reaction::Response;
use crate::round::{
    EventLog, EventSink, MatchProgress, Phase, RoundOutcome, RoundStateMachine, SeatControl, SelfDecision,
};
use crate::wall::{decide_dealer, DealerDraw};

use super::schedule::{DecisionScheduler, DecisionTicket, TicketId};
use super::snapshot::{PublicSnapshot, SeatSnapshot};

// =============================================================================
// Records and status
// =============================================================================

/// A concluded hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: RoundState,
    /// RNG the hand was dealt from. `GameRng::from_state` with
    /// `RoundStateMachine::setup` deals the same hand again.
    pub rng: GameRngState,
    pub outcome: RoundOutcome,
    /// Present for won hands.
    pub score: Option<ScoreSheet>,
}

/// What the table is waiting on after a pump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableStatus {
    /// A human seat must discard or answer its self-turn options.
    AwaitingSeat(Seat),
    /// Human seats that still owe a claim answer.
    AwaitingClaims(Vec<Seat>),
    /// The next automated decision fires at `due_ms`.
    Scheduled { due_ms: u64 },
    /// The final hand has concluded.
    Finished,
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for a [`Table`].
pub struct TableBuilder {
    rules: RuleConfig,
    controls: SeatMap<SeatControl>,
    dealer: Option<Seat>,
    provider: Box<dyn DecisionProvider>,
    scorer: Box<dyn Scorer>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self {
            rules: RuleConfig::default(),
            controls: SeatMap::with_value(SeatControl::Human),
            dealer: None,
            provider: Box::new(GreedyDiscard),
            scorer: Box::new(NullScorer),
        }
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Set how `seat` is played. Unknown seats are ignored.
    pub fn control(mut self, seat: Seat, control: SeatControl) -> Self {
        if !seat.is_valid() {
            warn!(seat = %seat, "control for unknown seat ignored");
            return self;
        }
        self.controls[seat] = control;
        self
    }

    pub fn all_automated(mut self) -> Self {
        self.controls = SeatMap::with_value(SeatControl::Automated);
        self
    }

    /// Fix the first dealer instead of rolling for it.
    pub fn dealer(mut self, seat: Seat) -> Self {
        self.dealer = Some(seat);
        self
    }

    pub fn provider(mut self, provider: impl DecisionProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    pub fn scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Validate the rules and seat the table. No tiles are dealt until the
    /// first pump.
    pub fn build(self, seed: u64) -> Result<Table, ConfigError> {
        self.rules.validate()?;

        let rng = GameRng::new(seed);
        let dealer_draw = match self.dealer {
            Some(_) => None,
            None => Some(decide_dealer(&mut rng.for_context("dice"))),
        };
        let dealer = self
            .dealer
            .or_else(|| dealer_draw.as_ref().map(|d| d.dealer))
            .unwrap_or_default();
        info!(seed, dealer = %dealer, "table seated");

        Ok(Table {
            delay_rng: rng.for_context("delay"),
            round_rng: rng.state(),
            rng,
            rules: self.rules,
            controls: self.controls,
            provider: self.provider,
            scorer: self.scorer,
            dealer_draw,
            round: RoundState::opening(dealer),
            machine: None,
            scheduler: DecisionScheduler::new(),
            log: EventLog::new(),
            sinks: Vec::new(),
            history: Vec::new(),
            finished: false,
        })
    }
}

// =============================================================================
// Table
// =============================================================================

/// One match at one table.
pub struct Table {
    rules: RuleConfig,
    rng: GameRng,
    /// Think delays for the current hand.
    delay_rng: GameRng,
    /// State of the RNG the current hand was dealt from.
    round_rng: GameRngState,
    controls: SeatMap<SeatControl>,
    provider: Box<dyn DecisionProvider>,
    scorer: Box<dyn Scorer>,
    dealer_draw: Option<DealerDraw>,

    round: RoundState,
    machine: Option<RoundStateMachine>,
    scheduler: DecisionScheduler,

    log: EventLog,
    sinks: Vec<Box<dyn EventSink + Send>>,
    history: Vec<RoundRecord>,
    finished: bool,
}

impl Table {
    // === Accessors ===

    #[must_use]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// Counters of the hand in progress, or of the next hand to deal.
    #[must_use]
    pub fn round(&self) -> RoundState {
        self.round
    }

    /// How `seat` is played, or `None` for an unknown seat.
    #[must_use]
    pub fn control(&self, seat: Seat) -> Option<SeatControl> {
        self.controls.try_get(seat).copied()
    }

    /// The roll-off that picked the first dealer, if one was rolled.
    #[must_use]
    pub fn dealer_draw(&self) -> Option<&DealerDraw> {
        self.dealer_draw.as_ref()
    }

    /// The hand in progress.
    #[must_use]
    pub fn machine(&self) -> Option<&RoundStateMachine> {
        self.machine.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.log
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The scheduled decision for `seat`, if any.
    #[must_use]
    pub fn pending_ticket(&self, seat: Seat) -> Option<&DecisionTicket> {
        self.scheduler.for_seat(seat)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<PublicSnapshot> {
        self.machine.as_ref().map(PublicSnapshot::capture)
    }

    #[must_use]
    pub fn seat_snapshot(&self, seat: Seat) -> Option<SeatSnapshot> {
        if !seat.is_valid() {
            return None;
        }
        self.machine.as_ref().map(|m| SeatSnapshot::capture(m, seat))
    }

    /// Forward every future event to `sink`.
    pub fn subscribe(&mut self, sink: impl EventSink + Send + 'static) {
        self.sinks.push(Box::new(sink));
    }

    // === Driving ===

    /// Advance the match as far as possible at clock time `now_ms`.
    pub fn pump(&mut self, now_ms: u64) -> EngineResult<TableStatus> {
        loop {
            if self.finished {
                return Ok(TableStatus::Finished);
            }
            let Some(machine) = self.machine.as_ref() else {
                self.start_round()?;
                continue;
            };

            match machine.phase() {
                Phase::RoundOver(_) => self.finish_round(),
                Phase::AwaitDraw(seat) => {
                    let seat = *seat;
                    self.act(seat, |m| m.draw(seat))?;
                }
                Phase::AwaitSelfReaction(turn) => return Ok(TableStatus::AwaitingSeat(turn.seat)),
                Phase::AwaitClaimReaction(ctx) => {
                    return Ok(TableStatus::AwaitingClaims(ctx.pending_seats().collect()));
                }
                Phase::AwaitDiscard(seat) => {
                    let seat = *seat;
                    if self.controls[seat] == SeatControl::Human {
                        return Ok(TableStatus::AwaitingSeat(seat));
                    }
                    if self.scheduler.for_seat(seat).is_none() {
                        let request = discard_request(machine, seat);
                        self.scheduler
                            .schedule(request, now_ms, &self.rules, &mut self.delay_rng);
                    }
                    match self.scheduler.take_due(now_ms) {
                        Some(ticket) => self.fire(ticket)?,
                        None => {
                            let due_ms = self.scheduler.next_due().unwrap_or(now_ms);
                            return Ok(TableStatus::Scheduled { due_ms });
                        }
                    }
                }
            }
        }
    }

    /// Discard for a human seat.
    pub fn discard(&mut self, seat: Seat, tile: Tile) -> EngineResult<()> {
        self.act(seat, |m| m.discard(seat, tile))
    }

    /// Answer a human seat's self-turn options.
    pub fn decide_self(&mut self, seat: Seat, decision: SelfDecision) -> EngineResult<()> {
        self.act(seat, |m| m.decide_self(seat, decision))
    }

    /// Answer the open claim window for a human seat.
    pub fn respond(&mut self, seat: Seat, response: Response) -> EngineResult<()> {
        self.act(seat, |m| m.respond(seat, response))
    }

    /// Answer a scheduled decision before it fires.
    ///
    /// A cancelled or already answered ticket is rejected as stale. An
    /// unusable `choice` takes the fallback discard.
    pub fn answer(&mut self, ticket: TicketId, choice: Option<Tile>) -> EngineResult<()> {
        let ticket = self.scheduler.redeem(ticket)?;
        self.apply_decision(&ticket, choice)
    }

    // === Internals ===

    fn start_round(&mut self) -> EngineResult<()> {
        let round_rng = self.rng.fork();
        self.round_rng = round_rng.state();
        self.delay_rng = round_rng.for_context("delay");
        let machine = RoundStateMachine::setup(self.rules.clone(), self.round, self.controls.clone(), &round_rng)?;
        self.machine = Some(machine);
        self.flush();
        Ok(())
    }

    fn finish_round(&mut self) {
        let Some(outcome) = self.machine.as_ref().and_then(|m| m.outcome().cloned()) else {
            return;
        };
        self.machine = None;
        self.scheduler.clear();

        let score = match &outcome {
            RoundOutcome::Win { seat, source, report } => Some(self.scorer.score(&ScoreRequest {
                round: self.round,
                winner: *seat,
                source: *source,
                report: report.clone(),
            })),
            _ => None,
        };
        let winner = outcome.winner();
        self.history.push(RoundRecord {
            round: self.round,
            rng: self.round_rng.clone(),
            outcome,
            score,
        });

        match self.round.conclude(winner, &self.rules) {
            MatchProgress::Continue(next) => self.round = next,
            MatchProgress::Finished => self.finished = true,
        }
    }

    fn fire(&mut self, ticket: DecisionTicket) -> EngineResult<()> {
        let started = Instant::now();
        let choice = self.provider.choose_discard(&ticket.request);
        if started.elapsed() > Duration::from_millis(self.rules.decision_timeout_ms) {
            warn!(
                seat = %ticket.seat,
                timeout_ms = self.rules.decision_timeout_ms,
                "decision provider timed out"
            );
            return self.apply_decision(&ticket, None);
        }
        self.apply_decision(&ticket, choice)
    }

    fn apply_decision(&mut self, ticket: &DecisionTicket, choice: Option<Tile>) -> EngineResult<()> {
        let seat = ticket.seat;
        let tile = match choice {
            Some(tile) if ticket.request.accepts(tile) => tile,
            other => {
                let fallback = ticket
                    .request
                    .fallback()
                    .ok_or_else(|| EngineError::out_of_turn(seat, "no tile to discard"))?;
                warn!(seat = %seat, offered = ?other, fallback = %fallback, "unusable decision, discarding fallback");
                fallback
            }
        };
        self.act(seat, |m| m.discard(seat, tile))
    }

    /// Run one machine transition, then publish its events and cancel
    /// tickets the new phase no longer wants.
    fn act(&mut self, seat: Seat, f: impl FnOnce(&mut RoundStateMachine) -> EngineResult<()>) -> EngineResult<()> {
        let machine = self
            .machine
            .as_mut()
            .ok_or_else(|| EngineError::out_of_turn(seat, "no hand in progress"))?;
        let result = f(machine);
        self.flush();
        result
    }

    fn flush(&mut self) {
        let Some(machine) = self.machine.as_mut() else {
            return;
        };
        let awaiting = machine.awaiting_discard();
        for event in machine.drain_events() {
            self.log.publish(&event);
            for sink in &mut self.sinks {
                sink.publish(&event);
            }
        }
        self.scheduler.retain_seat(awaiting);
    }
}

/// Freeze what `seat` may see and do for a discard decision.
fn discard_request(machine: &RoundStateMachine, seat: Seat) -> DiscardRequest {
    let state = machine.state();
    DiscardRequest {
        seat,
        hand: state.hand(seat).to_vec(),
        melds: state.meld_list(seat),
        legal_discards: machine.legal_discards(seat),
        last_drawn: state.last_drawn(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::TableEvent;

    fn drive(table: &mut Table, limit: usize) -> TableStatus {
        let mut now = 0;
        for _ in 0..limit {
            match table.pump(now).unwrap() {
                TableStatus::Scheduled { due_ms } => now = due_ms,
                other => return other,
            }
        }
        panic!("table did not settle within {} pumps", limit);
    }

    #[test]
    fn test_build_rejects_bad_rules() {
        let result = TableBuilder::new()
            .rules(RuleConfig::default().with_think_delay(900, 100))
            .build(1);
        assert!(matches!(result, Err(ConfigError::DelayBounds(_))));
    }

    #[test]
    fn test_rolled_dealer_recorded() {
        let table = TableBuilder::new().build(5).unwrap();
        let draw = table.dealer_draw().unwrap();
        assert_eq!(draw.dealer, table.round().dealer_seat);
        assert!(table.machine().is_none());
    }

    #[test]
    fn test_human_dealer_waits() {
        let mut table = TableBuilder::new().dealer(Seat::new(0)).build(11).unwrap();
        let status = table.pump(0).unwrap();

        assert_eq!(status, TableStatus::AwaitingSeat(Seat::new(0)));
        let machine = table.machine().unwrap();
        assert!(matches!(
            machine.phase(),
            Phase::AwaitDiscard(_) | Phase::AwaitSelfReaction(_)
        ));
        assert!(table.events().events().iter().any(|e| matches!(e, TableEvent::RoundStarted { .. })));
    }

    #[test]
    fn test_unknown_seat_is_refused() {
        let ghost = Seat(4);
        let mut table = TableBuilder::new()
            .control(ghost, SeatControl::Automated)
            .dealer(Seat::new(0))
            .build(11)
            .unwrap();
        assert_eq!(table.control(ghost), None);
        assert!(Seat::all().all(|s| table.control(s) == Some(SeatControl::Human)));

        assert_eq!(table.pump(0).unwrap(), TableStatus::AwaitingSeat(Seat::new(0)));
        assert!(table.respond(ghost, Response::Pass).is_err());
        assert!(table.discard(ghost, Tile::suited(crate::core::Suit::Character, 1)).is_err());
        assert!(table.seat_snapshot(ghost).is_none());
        assert_eq!(table.pump(0).unwrap(), TableStatus::AwaitingSeat(Seat::new(0)));
    }

    #[test]
    fn test_second_answer_is_stale() {
        let mut table = TableBuilder::new()
            .all_automated()
            .dealer(Seat::new(2))
            .build(3)
            .unwrap();
        assert!(matches!(table.pump(0).unwrap(), TableStatus::Scheduled { .. }));

        let id = table.pending_ticket(Seat::new(2)).unwrap().id;
        table.answer(id, None).unwrap();
        assert_eq!(table.answer(id, None), Err(EngineError::StaleDecision { ticket: id.0 }));
    }

    #[test]
    fn test_short_match_finishes() {
        let rules = RuleConfig::default().with_final_hand(0, Seat::new(1));
        let mut table = TableBuilder::new()
            .rules(rules)
            .all_automated()
            .dealer(Seat::new(0))
            .build(21)
            .unwrap();

        assert_eq!(drive(&mut table, 100_000), TableStatus::Finished);
        let last = table.history().last().unwrap();
        assert_eq!(last.round.dealer_seat, Seat::new(1));
        assert!(table.history().iter().all(|r| r.round.wind_round == 0));
    }
}
