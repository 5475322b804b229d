//! The round state machine.
//!
//! Exactly one `Phase` is current. Each public transition checks the phase
//! and the request, and only then mutates; a rejected request leaves the
//! machine untouched. After every transition the 144-tile conservation check
//! runs, and a failure aborts the round.
//!
//! ## Phases
//!
//! ```text
//! AwaitDraw(s) --draw--> AwaitSelfReaction(s) --pass--> AwaitDiscard(s)
//!      |                        |  kong: replacement, stay with s
//!      |                        '--win--> RoundOver
//!      '--(no options)--> AwaitDiscard(s) --discard--> AwaitClaimReaction
//!
//! AwaitClaimReaction --all pass--> AwaitDraw(s+1)
//!                    --pong/chi--> AwaitDiscard(claimant)
//!                    --kong------> replacement, AwaitDiscard(claimant)
//!                    --win-------> RoundOver
//! ```
//!
//! `AwaitSelfReaction` and `AwaitClaimReaction` are the only phases that wait
//! on an outside decision; while either is current the machine is locked.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, error, info, warn};

use crate::core::{EngineError, EngineResult, GameRng, RoundState, RuleConfig, Seat, SeatMap, TableState, Tile};
use crate::reaction::{Claim, ClaimOptions, ReactionArbiter, ReactionContext, Response};
use crate::rules::{Meld, MeldKind, MeldLegality, SelfKong, WinDetector, WinReport};
use crate::wall::{open_index, FlowerExchange, FlowerOutcome, Wall};

use super::events::{DrawEnd, TableEvent};

/// Who makes a seat's decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatControl {
    /// Decisions arrive from outside; the machine pauses for them.
    #[default]
    Human,
    /// Self-turn and claim decisions are made on the spot.
    Automated,
}

/// How the winning tile arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinSource {
    SelfDraw,
    /// Self-draw on the replacement after a kong.
    KongReplacement,
    Discard { from: Seat },
}

/// How a hand ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Win {
        seat: Seat,
        source: WinSource,
        report: WinReport,
    },
    /// The wall ran out.
    Exhausted,
    /// Tile conservation failed.
    Aborted { counted: usize },
}

impl RoundOutcome {
    #[must_use]
    pub fn winner(&self) -> Option<Seat> {
        match self {
            RoundOutcome::Win { seat, .. } => Some(*seat),
            _ => None,
        }
    }
}

/// Options offered to a seat after its own draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfTurn {
    pub seat: Seat,
    /// Present when the hand is complete.
    pub win: Option<WinReport>,
    pub kongs: SmallVec<[SelfKong; 4]>,
}

/// Answer to a self-turn offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfDecision {
    Win,
    Kong(SelfKong),
    Pass,
}

/// Current phase of a hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitDraw(Seat),
    AwaitSelfReaction(SelfTurn),
    AwaitDiscard(Seat),
    AwaitClaimReaction(ReactionContext),
    RoundOver(RoundOutcome),
}

impl Phase {
    /// A decision from outside is pending.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Phase::AwaitSelfReaction(_) | Phase::AwaitClaimReaction(_))
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self, Phase::RoundOver(_))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitDraw(_) => "await-draw",
            Phase::AwaitSelfReaction(_) => "await-self-reaction",
            Phase::AwaitDiscard(_) => "await-discard",
            Phase::AwaitClaimReaction(_) => "await-claim-reaction",
            Phase::RoundOver(_) => "round-over",
        }
    }
}

/// Drives one hand from the dealer's first draw to `RoundOver`.
#[derive(Clone, Debug)]
pub struct RoundStateMachine {
    rules: RuleConfig,
    legality: MeldLegality,
    detector: WinDetector,
    controls: SeatMap<SeatControl>,
    state: TableState,
    phase: Phase,
    /// Events not yet collected by the owner.
    outbox: Vec<TableEvent>,
}

impl RoundStateMachine {
    // === Setup ===

    /// Shuffle, roll for the opening, deal and exchange opening flowers.
    ///
    /// `rng` should be a per-round fork; the wall and dice use their own
    /// context streams of it.
    pub fn setup(
        rules: RuleConfig,
        round: RoundState,
        controls: SeatMap<SeatControl>,
        rng: &GameRng,
    ) -> EngineResult<Self> {
        let mut wall_rng = rng.for_context("wall");
        let mut dice_rng = rng.for_context("dice");

        let mut wall = Wall::shuffled(rules.dead_wall_size, &mut wall_rng);
        let dice = dice_rng.roll_dice();
        let start = open_index(round.dealer_seat, dice.sum(), wall.len());
        let hands = wall.deal(start, &rules);
        info!(round = %round.label(), dice = dice.sum(), open_index = start, "hand dealt");

        let state = TableState::new(round, hands, wall);
        let opening = TableEvent::RoundStarted {
            round,
            dice,
            open_index: start,
        };
        Self::begin(rules, state, controls, vec![opening])
    }

    /// Start a hand from an already dealt state.
    pub fn start(rules: RuleConfig, state: TableState, controls: SeatMap<SeatControl>) -> EngineResult<Self> {
        Self::begin(rules, state, controls, Vec::new())
    }

    fn begin(
        rules: RuleConfig,
        mut state: TableState,
        controls: SeatMap<SeatControl>,
        outbox: Vec<TableEvent>,
    ) -> EngineResult<Self> {
        state.check_conservation()?;
        let dealer = state.round.dealer_seat;
        state.set_active(dealer);
        state.set_last_drawn(None);

        let mut machine = Self {
            legality: MeldLegality::new(&rules),
            detector: WinDetector::new(&rules),
            rules,
            controls,
            state,
            phase: Phase::AwaitDraw(dealer),
            outbox,
        };

        for seat in Seat::all() {
            if machine.exchange_flowers(seat).exhausted {
                machine.finish(RoundOutcome::Exhausted);
                break;
            }
        }
        machine.verify()?;
        Ok(machine)
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn state(&self) -> &TableState {
        &self.state
    }

    #[must_use]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// How `seat` is played, or `None` for an unknown seat.
    #[must_use]
    pub fn control(&self, seat: Seat) -> Option<SeatControl> {
        self.controls.try_get(seat).copied()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.phase.is_locked()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&RoundOutcome> {
        match &self.phase {
            Phase::RoundOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The pending self-turn offer, if any.
    #[must_use]
    pub fn self_turn(&self) -> Option<&SelfTurn> {
        match &self.phase {
            Phase::AwaitSelfReaction(turn) => Some(turn),
            _ => None,
        }
    }

    /// The open claim window, if any.
    #[must_use]
    pub fn claim_window(&self) -> Option<&ReactionContext> {
        match &self.phase {
            Phase::AwaitClaimReaction(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Seat expected to discard next, if the machine is waiting on a discard.
    #[must_use]
    pub fn awaiting_discard(&self) -> Option<Seat> {
        match self.phase {
            Phase::AwaitDiscard(seat) => Some(seat),
            _ => None,
        }
    }

    /// Distinct tiles `seat` may discard, in hand order.
    #[must_use]
    pub fn legal_discards(&self, seat: Seat) -> Vec<Tile> {
        if self.awaiting_discard() != Some(seat) {
            return Vec::new();
        }
        let mut tiles = self.state.hand(seat).to_vec();
        tiles.dedup();
        tiles
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.outbox)
    }

    // === Transitions ===

    /// Draw from the live front for `seat`.
    ///
    /// An empty live wall ends the hand as exhausted and still returns `Ok`.
    pub fn draw(&mut self, seat: Seat) -> EngineResult<()> {
        if self.phase != Phase::AwaitDraw(seat) {
            return Err(self.reject(seat, "not this seat's draw"));
        }

        let tile = match self.state.wall_mut().draw() {
            Ok(tile) => tile,
            Err(EngineError::WallExhausted) => {
                self.finish(RoundOutcome::Exhausted);
                return self.verify();
            }
            Err(err) => return Err(err),
        };
        debug!(seat = %seat, tile = %tile, drawable = self.state.drawable(), "draw");
        self.take_into_hand(seat, tile, DrawEnd::Front);

        let flowers = self.exchange_flowers(seat);
        if flowers.exhausted {
            self.finish(RoundOutcome::Exhausted);
            return self.verify();
        }
        if let Some(kept) = flowers.kept_replacement() {
            self.state.set_last_drawn(Some(kept));
        }
        self.verify()?;

        self.offer_self_turn(seat);
        Ok(())
    }

    /// Answer a self-turn offer.
    pub fn decide_self(&mut self, seat: Seat, decision: SelfDecision) -> EngineResult<()> {
        let turn = match &self.phase {
            Phase::AwaitSelfReaction(turn) if turn.seat == seat => turn.clone(),
            _ => return Err(self.reject(seat, "no self-turn decision pending")),
        };

        match decision {
            SelfDecision::Pass => {
                debug!(seat = %seat, "self-turn pass");
                self.phase = Phase::AwaitDiscard(seat);
                Ok(())
            }
            SelfDecision::Win => {
                let Some(report) = turn.win else {
                    warn!(seat = %seat, "self-draw win on incomplete hand");
                    return Err(EngineError::illegal(seat, "win", "hand is not complete"));
                };
                self.finish(RoundOutcome::Win {
                    seat,
                    source: WinSource::SelfDraw,
                    report,
                });
                self.verify()
            }
            SelfDecision::Kong(kong) => {
                if !turn.kongs.contains(&kong) {
                    warn!(seat = %seat, tile = %kong.tile(), "kong not offered");
                    return Err(EngineError::illegal(seat, "kong", "not among self-turn options"));
                }
                self.apply_self_kong(seat, kong)
            }
        }
    }

    /// Discard `tile` from `seat`'s hand and open the claim window.
    pub fn discard(&mut self, seat: Seat, tile: Tile) -> EngineResult<()> {
        if self.phase != Phase::AwaitDiscard(seat) {
            return Err(self.reject(seat, "not this seat's discard"));
        }
        if !self.state.holds(seat, tile) {
            warn!(seat = %seat, tile = %tile, "discard of tile not held");
            return Err(EngineError::TileNotHeld { seat, tile });
        }

        self.state.remove_from_hand(seat, tile, 1)?;
        self.state.push_discard(seat, tile);
        self.state.set_last_drawn(None);
        self.emit(TableEvent::TileDiscarded { seat, tile });
        debug!(seat = %seat, tile = %tile, "discard");
        self.verify()?;

        // Every seat's options come from this one frozen state.
        let options = SeatMap::new(|claimant| {
            if claimant == seat {
                return ClaimOptions::default();
            }
            let melds = self.state.meld_list(claimant);
            ClaimOptions::evaluate(
                &self.legality,
                &self.detector,
                self.state.hand(claimant),
                &melds,
                tile,
                seat,
                claimant,
            )
        });
        let mut ctx = ReactionContext::open(seat, tile, options);

        for claimant in seat.others() {
            if self.controls[claimant] != SeatControl::Automated || ctx.response(claimant).is_some() {
                continue;
            }
            let response = ctx.options(claimant).best().map_or(Response::Pass, Response::Claim);
            if let Err(err) = ctx.record(claimant, response) {
                warn!(seat = %claimant, %err, "automated claim rejected");
            }
        }

        self.phase = Phase::AwaitClaimReaction(ctx);
        self.try_resolve_claims()
    }

    /// Answer the open claim window for `seat`.
    pub fn respond(&mut self, seat: Seat, response: Response) -> EngineResult<()> {
        if !seat.is_valid() {
            return Err(self.reject(seat, "no such seat"));
        }
        if !matches!(self.phase, Phase::AwaitClaimReaction(_)) {
            return Err(self.reject(seat, "no claim window open"));
        }
        if let Phase::AwaitClaimReaction(ctx) = &mut self.phase {
            ctx.record(seat, response)?;
        }
        self.try_resolve_claims()
    }

    // === Internals ===

    fn reject(&self, seat: Seat, reason: &'static str) -> EngineError {
        warn!(seat = %seat, phase = self.phase.name(), reason, "request rejected");
        EngineError::out_of_turn(seat, reason)
    }

    fn emit(&mut self, event: TableEvent) {
        self.outbox.push(event);
    }

    fn finish(&mut self, outcome: RoundOutcome) {
        match &outcome {
            RoundOutcome::Win { seat, source, .. } => info!(seat = %seat, ?source, "round won"),
            RoundOutcome::Exhausted => info!("round exhausted"),
            RoundOutcome::Aborted { counted } => error!(counted, "round aborted"),
        }
        self.emit(TableEvent::RoundOver {
            outcome: outcome.clone(),
        });
        self.phase = Phase::RoundOver(outcome);
    }

    /// Conservation check; a failure aborts the hand.
    fn verify(&mut self) -> EngineResult<()> {
        if let Err(err) = self.state.check_conservation() {
            error!(%err, "tile conservation failed");
            let counted = self.state.tile_count();
            self.finish(RoundOutcome::Aborted { counted });
            return Err(err);
        }
        Ok(())
    }

    fn take_into_hand(&mut self, seat: Seat, tile: Tile, from: DrawEnd) {
        self.state.add_to_hand(seat, tile);
        self.state.set_last_drawn(Some(tile));
        self.emit(TableEvent::TileDrawn {
            seat,
            tile: Some(tile),
            from,
        });
    }

    fn exchange_flowers(&mut self, seat: Seat) -> FlowerOutcome {
        let (hand, wall) = self.state.hand_and_wall_mut(seat);
        let outcome = FlowerExchange::exchange(seat, hand, wall);
        if outcome.is_empty() {
            return outcome;
        }

        self.state.record_flowers(seat, outcome.exchanged.iter().copied());
        self.emit(TableEvent::FlowersExchanged {
            seat,
            flowers: outcome.exchanged.clone(),
        });
        for &tile in &outcome.replacements {
            self.emit(TableEvent::TileDrawn {
                seat,
                tile: Some(tile),
                from: DrawEnd::Tail,
            });
        }
        outcome
    }

    fn offer_self_turn(&mut self, seat: Seat) {
        let melds = self.state.meld_list(seat);
        let hand = self.state.hand(seat);
        let win = self
            .state
            .last_drawn()
            .and_then(|tile| self.detector.evaluate(hand, &melds, tile, true));
        let kongs = self.legality.self_kong_options(hand, &melds);

        if win.is_none() && kongs.is_empty() {
            self.phase = Phase::AwaitDiscard(seat);
            return;
        }

        match self.controls[seat] {
            SeatControl::Human => {
                debug!(seat = %seat, can_win = win.is_some(), kongs = kongs.len(), "self-turn offered");
                self.phase = Phase::AwaitSelfReaction(SelfTurn { seat, win, kongs });
            }
            SeatControl::Automated => match win {
                Some(report) => self.finish(RoundOutcome::Win {
                    seat,
                    source: WinSource::SelfDraw,
                    report,
                }),
                None => self.phase = Phase::AwaitDiscard(seat),
            },
        }
    }

    fn apply_self_kong(&mut self, seat: Seat, kong: SelfKong) -> EngineResult<()> {
        let meld = match kong {
            SelfKong::Added(tile) => {
                self.state.remove_from_hand(seat, tile, 1)?;
                self.state.upgrade_pong(seat, tile);
                self.state
                    .melds(seat)
                    .iter()
                    .find(|m| m.kind() == MeldKind::AddedKong && m.set_tile() == Some(tile))
                    .cloned()
            }
            SelfKong::Concealed(tile) => {
                self.state.remove_from_hand(seat, tile, 4)?;
                let meld = Meld::concealed_kong(tile);
                self.state.push_meld(seat, meld.clone());
                Some(meld)
            }
        };
        if let Some(meld) = meld {
            debug!(seat = %seat, meld = %meld, "self kong");
            self.emit(TableEvent::MeldFormed { seat, meld: Some(meld) });
        }
        self.replace_after_kong(seat)
    }

    /// Tail replacement after any kong, then the kong-replacement win check.
    fn replace_after_kong(&mut self, seat: Seat) -> EngineResult<()> {
        self.state.set_active(seat);
        let tile = match self.state.wall_mut().draw_replacement() {
            Ok(tile) => tile,
            Err(_) => {
                self.finish(RoundOutcome::Exhausted);
                return self.verify();
            }
        };
        debug!(seat = %seat, tile = %tile, "kong replacement");
        self.take_into_hand(seat, tile, DrawEnd::Tail);

        let flowers = self.exchange_flowers(seat);
        if flowers.exhausted {
            self.finish(RoundOutcome::Exhausted);
            return self.verify();
        }
        if let Some(kept) = flowers.kept_replacement() {
            self.state.set_last_drawn(Some(kept));
        }
        self.verify()?;

        let melds = self.state.meld_list(seat);
        let win = self
            .state
            .last_drawn()
            .and_then(|t| self.detector.evaluate(self.state.hand(seat), &melds, t, true));
        match win {
            Some(report) => self.finish(RoundOutcome::Win {
                seat,
                source: WinSource::KongReplacement,
                report,
            }),
            None => self.phase = Phase::AwaitDiscard(seat),
        }
        Ok(())
    }

    fn try_resolve_claims(&mut self) -> EngineResult<()> {
        let Phase::AwaitClaimReaction(ctx) = &self.phase else {
            return Ok(());
        };
        let Some(resolution) = ReactionArbiter::resolve_context(ctx) else {
            return Ok(());
        };
        let (discarder, tile) = (ctx.discarder(), ctx.tile());

        match resolution {
            None => {
                let next = discarder.next();
                debug!(discarder = %discarder, next = %next, "no claims");
                self.state.set_active(next);
                self.phase = Phase::AwaitDraw(next);
                Ok(())
            }
            Some((claimant, claim)) => self.apply_claim(claimant, claim, discarder, tile),
        }
    }

    fn apply_claim(&mut self, claimant: Seat, claim: Claim, discarder: Seat, tile: Tile) -> EngineResult<()> {
        let kind = claim.kind();
        if self.state.discards(discarder).last() != Some(&tile) {
            warn!(seat = %claimant, tile = %tile, "claimed discard is gone");
            return Err(EngineError::illegal(claimant, kind.name(), "discard no longer available"));
        }
        info!(seat = %claimant, claim = %kind, tile = %tile, from = %discarder, "claim resolved");

        match claim {
            Claim::Win => {
                let mut hand = self.state.hand(claimant).to_vec();
                hand.push(tile);
                hand.sort();
                let melds = self.state.meld_list(claimant);
                let report = self
                    .detector
                    .evaluate(&hand, &melds, tile, false)
                    .ok_or_else(|| EngineError::illegal(claimant, kind.name(), "hand is not complete"))?;

                self.state.take_last_discard(discarder);
                self.state.add_to_hand(claimant, tile);
                self.state.set_active(claimant);
                self.finish(RoundOutcome::Win {
                    seat: claimant,
                    source: WinSource::Discard { from: discarder },
                    report,
                });
                self.verify()
            }
            Claim::ExposedKong => {
                if !self.legality.can_exposed_kong(self.state.hand(claimant), tile, discarder, claimant) {
                    return Err(EngineError::illegal(claimant, kind.name(), "needs exactly three copies"));
                }
                self.state.take_last_discard(discarder);
                self.state.remove_from_hand(claimant, tile, 3)?;
                self.form_meld(claimant, Meld::exposed_kong(tile, discarder));
                self.replace_after_kong(claimant)
            }
            Claim::Pong => {
                if !self.legality.can_pong(self.state.hand(claimant), tile) {
                    return Err(EngineError::illegal(claimant, kind.name(), "needs two copies"));
                }
                self.state.take_last_discard(discarder);
                self.state.remove_from_hand(claimant, tile, 2)?;
                self.form_meld(claimant, Meld::pong(tile, discarder));
                self.phase = Phase::AwaitDiscard(claimant);
                self.verify()
            }
            Claim::Chi(run) => {
                let legal = self
                    .legality
                    .chi_options(self.state.hand(claimant), tile, discarder, claimant)
                    .contains(&run);
                if !legal {
                    return Err(EngineError::illegal(claimant, kind.name(), "run not available"));
                }
                self.state.take_last_discard(discarder);
                for &part in run.iter().filter(|&&t| t != tile) {
                    self.state.remove_from_hand(claimant, part, 1)?;
                }
                self.form_meld(claimant, Meld::chi(run, discarder));
                self.phase = Phase::AwaitDiscard(claimant);
                self.verify()
            }
        }
    }

    fn form_meld(&mut self, seat: Seat, meld: Meld) {
        debug!(seat = %seat, meld = %meld, "meld formed");
        self.state.push_meld(seat, meld.clone());
        self.state.set_active(seat);
        self.state.set_last_drawn(None);
        self.emit(TableEvent::MeldFormed { seat, meld: Some(meld) });
    }
}
