//! Turn-resolution state machine.
//!
//! The `Engine` owns the game state, one agent per seat and the penalty
//! ledger. A turn runs:
//!
//! ```text
//! free:   roll -> move -> resolve landing -> active phase -> end
//! jailed: active phase (jail actions offered) -> end
//! ```
//!
//! A jailed seat that has already served `max_jail_turns` is released at
//! the start of its turn and rolls normally. Being sent to jail during a
//! turn ends it.
//!
//! The active phase queries the acting agent for one action at a time until
//! it ends the turn, is eliminated, or submits something illegal (penalised,
//! and the turn ends). Invariants are audited after every settled action.

use tracing::{debug, info, warn};

use crate::agents::{instantiate, Agent, ModuleResolver};
use crate::board::{self, JAIL_POSITION, TILE_COUNT};
use crate::core::{
    agent_seed, ConfigError, DiceRoll, EngineError, EngineResult, GameConfig, GameState,
    IllegalAction, JailStatus, SeatId, SeatMap, StateView,
};

use super::scoring::GameOutcome;

/// Whether the acting seat keeps control after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnFlow {
    Continue,
    EndTurn,
}

/// The game engine.
pub struct Engine {
    pub(crate) config: GameConfig,
    pub(crate) state: GameState,
    pub(crate) agents: SeatMap<Box<dyn Agent>>,
    pub(crate) penalties: SeatMap<f64>,
    /// The acting seat left jail during the current turn.
    pub(crate) released_this_turn: bool,
}

impl Engine {
    /// Load every seat's agent through the resolver and set up the game.
    ///
    /// Fails before any game state exists if the config is invalid or any
    /// module cannot be loaded.
    pub fn new(config: GameConfig, resolver: &dyn ModuleResolver) -> EngineResult<Self> {
        config.validate()?;

        let mut agents = Vec::with_capacity(config.seat_count());
        for (seat, spec) in SeatId::all(config.seat_count()).zip(&config.seats) {
            let agent = instantiate(resolver, &spec.path, &spec.config)
                .map_err(|source| EngineError::AgentLoad { seat, source })?;
            agents.push(agent);
        }
        Self::with_agents(config, agents)
    }

    /// Set up a game with already-constructed agents, one per seat.
    pub fn with_agents(config: GameConfig, agents: Vec<Box<dyn Agent>>) -> EngineResult<Self> {
        config.validate()?;
        if agents.len() != config.seat_count() {
            return Err(ConfigError::AgentCount {
                expected: config.seat_count(),
                found: agents.len(),
            }
            .into());
        }

        let mut agents = SeatMap::from_vec(agents);
        for (seat, agent) in agents.iter_mut() {
            agent
                .game_start(seat, agent_seed(config.seed, seat))
                .map_err(|source| EngineError::AgentLoad { seat, source })?;
        }

        let state = GameState::new(
            config.game_id,
            config.seat_count(),
            config.seed,
            config.rules.clone(),
        );
        info!(
            game_id = config.game_id,
            seed = config.seed,
            seats = config.seat_count(),
            "game created"
        );

        Ok(Self {
            penalties: SeatMap::with_value(config.seat_count(), 0.0),
            config,
            state,
            agents,
            released_this_turn: false,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state, for hosts that set up positions before play.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn penalties(&self) -> &SeatMap<f64> {
        &self.penalties
    }

    /// Snapshot of the public state.
    #[must_use]
    pub fn view(&self) -> StateView {
        StateView::of(&self.state)
    }

    /// At most one seat remains.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.active_seats().len() <= 1
    }

    // === Game loop ===

    /// Play until one seat remains or the round cap is reached.
    pub fn run(mut self) -> EngineResult<GameOutcome> {
        while !self.is_over() && self.state.turn < self.config.max_turns {
            self.play_round()?;
        }

        let outcome = self.outcome();
        info!(
            game_id = outcome.game_id,
            turns = outcome.turns,
            winner = ?outcome.winner,
            "game over"
        );
        Ok(outcome)
    }

    /// One turn for every active seat, in seat order.
    pub fn play_round(&mut self) -> EngineResult<()> {
        for seat in SeatId::all(self.state.seat_count()) {
            if self.is_over() {
                break;
            }
            if self.state.is_active(seat) {
                self.play_turn(seat)?;
            }
        }
        self.state.turn += 1;
        Ok(())
    }

    /// Play one full turn for a seat.
    pub fn play_turn(&mut self, seat: SeatId) -> EngineResult<()> {
        self.state.acting_seat = seat;
        self.state.player_mut(seat).reset_turn_flags();
        self.state.clear_landing_flags();
        self.released_this_turn = false;

        let max_jail_turns = self.state.rules.max_jail_turns;
        let began_jailed = match self.state.player(seat).jail {
            JailStatus::Jailed { turns_served } if turns_served >= max_jail_turns => {
                debug!(%seat, turns_served, "released after serving");
                self.state.player_mut(seat).jail = JailStatus::Free;
                false
            }
            JailStatus::Jailed { .. } => true,
            JailStatus::Free => false,
        };

        let flow = if began_jailed {
            TurnFlow::Continue
        } else {
            let roll = self.state.rng.roll_dice();
            self.move_by_roll(seat, roll, true)?
        };

        if flow == TurnFlow::Continue {
            self.active_phase(seat)?;
        }

        if began_jailed && !self.released_this_turn {
            let player = self.state.player_mut(seat);
            if let JailStatus::Jailed { turns_served } = player.jail {
                player.jail = JailStatus::Jailed {
                    turns_served: turns_served + 1,
                };
            }
        }

        self.state.check_invariants()
    }

    /// Query the acting agent until the turn ends.
    fn active_phase(&mut self, seat: SeatId) -> EngineResult<()> {
        loop {
            if !self.state.is_active(seat) || self.is_over() {
                return Ok(());
            }

            let view = StateView::of(&self.state);
            let action = match self.agents[seat].take_turn(&view) {
                Ok(action) => action,
                Err(e) => {
                    self.penalize(seat, &IllegalAction::NoAnswer(e.to_string()));
                    return Ok(());
                }
            };

            let flow = self.dispatch(seat, action)?;
            self.state.check_invariants()?;
            if flow == TurnFlow::EndTurn {
                return Ok(());
            }
        }
    }

    // === Movement ===

    /// Move by a dice roll and resolve the landing.
    ///
    /// With `count_doubles`, the roll feeds the consecutive-doubles counter
    /// and the third double jails the player without moving.
    pub(crate) fn move_by_roll(
        &mut self,
        seat: SeatId,
        roll: DiceRoll,
        count_doubles: bool,
    ) -> EngineResult<TurnFlow> {
        debug!(%seat, first = roll.first, second = roll.second, "rolled");

        if count_doubles {
            let doubles_to_jail = self.state.rules.doubles_to_jail;
            let player = self.state.player_mut(seat);
            if roll.is_double() {
                player.consecutive_doubles += 1;
                if player.consecutive_doubles >= doubles_to_jail {
                    debug!(%seat, "too many doubles");
                    self.send_to_jail(seat);
                    return Ok(TurnFlow::EndTurn);
                }
            } else {
                player.consecutive_doubles = 0;
            }
        }

        let position = u32::from(self.state.player(seat).position);
        let target = (position + roll.total()) % u32::from(TILE_COUNT);
        // target < 40
        self.advance_to(seat, target as u8);
        self.resolve_landing(seat, Some(roll), false)?;
        Ok(self.flow_after_move(seat))
    }

    /// Move forward to a position, collecting the Go bonus on wrap.
    pub(crate) fn advance_to(&mut self, seat: SeatId, target: u8) {
        let go_bonus = self.state.rules.go_bonus;
        let player = self.state.player_mut(seat);
        let wrapped = target < player.position;
        player.position = target;
        if wrapped {
            player.cash += i64::from(go_bonus);
            debug!(%seat, go_bonus, "passed Go");
        }
        debug!(%seat, position = target, tile = board::tile_at(target).name, "moved");
    }

    /// Confine a player: jail tile, zero served turns, doubles reset.
    pub(crate) fn send_to_jail(&mut self, seat: SeatId) {
        let player = self.state.player_mut(seat);
        player.position = JAIL_POSITION;
        player.jail = JailStatus::Jailed { turns_served: 0 };
        player.consecutive_doubles = 0;
        debug!(%seat, "sent to jail");
    }

    /// The turn ends if the mover was jailed or eliminated on the way.
    pub(crate) fn flow_after_move(&self, seat: SeatId) -> TurnFlow {
        let player = self.state.player(seat);
        if player.eliminated || player.in_jail() {
            TurnFlow::EndTurn
        } else {
            TurnFlow::Continue
        }
    }

    // === Penalties ===

    /// Record an illegal or malformed response.
    pub(crate) fn penalize(&mut self, seat: SeatId, reason: &IllegalAction) {
        let penalty = self.state.rules.illegal_action_penalty;
        self.penalties[seat] += penalty;
        warn!(%seat, %reason, penalty, total = self.penalties[seat], "illegal action");
    }
}
