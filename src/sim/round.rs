//! Round controller
//!
//! Owns all round state and the three periodic schedules (countdown clock,
//! spawner, difficulty ramp). The host feeds it simulated time with
//! [`Round::advance`] and player input with [`Round::catch_drop`] /
//! [`Round::expire_drop`], then drains [`GameEvent`]s to render.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::{GameEvent, Outcome};
use super::profile::{Difficulty, RoundConfig};
use super::ramp::Knobs;
use super::scoring::Scoreboard;
use super::spawner::{DropId, DropKind, PlayArea, WaterDrop, spawn_drop};
use super::timer::{Interval, Millis, cancel};
use crate::consts::*;
use crate::error::{Error, Result};

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundPhase {
    /// Nothing started yet
    #[default]
    Idle,
    /// Clock running, drops falling
    Running,
    /// Clock expired; waiting for the next start
    Ended,
}

/// Behaviour switches that are not part of a difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundOptions {
    /// Points lost when a good drop falls out uncaught (`None` = no penalty)
    #[serde(default)]
    pub miss_penalty: Option<u32>,
}

/// Which periodic schedule fired, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Clock,
    Spawner,
    Ramp,
}

/// The round state machine
#[derive(Debug, Clone)]
pub struct Round {
    phase: RoundPhase,
    difficulty: Difficulty,
    config: RoundConfig,
    knobs: Knobs,
    scoreboard: Scoreboard,
    time_remaining: u32,
    options: RoundOptions,
    area: PlayArea,
    rng: Pcg32,
    /// Simulated time
    now: Millis,
    clock: Option<Interval>,
    spawner: Option<Interval>,
    ramp: Option<Interval>,
    /// Drops still falling (sorted by id for determinism)
    live: BTreeMap<DropId, WaterDrop>,
    next_drop_id: DropId,
    events: Vec<GameEvent>,
}

impl Round {
    /// Create an idle round controller with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self::with_options(seed, RoundOptions::default())
    }

    pub fn with_options(seed: u64, options: RoundOptions) -> Self {
        let difficulty = Difficulty::default();
        let config = difficulty.config();
        Self {
            phase: RoundPhase::Idle,
            difficulty,
            config,
            knobs: Knobs::from_config(&config),
            scoreboard: Scoreboard::new(),
            time_remaining: config.duration_secs,
            options,
            area: PlayArea::default(),
            rng: Pcg32::seed_from_u64(seed),
            now: 0,
            clock: None,
            spawner: None,
            ramp: None,
            live: BTreeMap::new(),
            next_drop_id: 1,
            events: Vec::new(),
        }
    }

    // === Inbound commands ===

    /// Start a round with a named difficulty preset
    pub fn start(&mut self, profile: &str) -> Result<()> {
        self.ensure_not_running("start")?;
        let difficulty = profile.parse::<Difficulty>()?;
        self.begin(difficulty);
        Ok(())
    }

    /// Start a round with a known difficulty
    pub fn start_with(&mut self, difficulty: Difficulty) -> Result<()> {
        self.ensure_not_running("start")?;
        self.begin(difficulty);
        Ok(())
    }

    /// Instant restart with the same difficulty
    pub fn reset(&mut self) -> Result<()> {
        if self.phase != RoundPhase::Running {
            return Err(self.invalid("reset"));
        }
        self.cancel_schedules();
        log::info!("Round reset ({})", self.difficulty);
        self.phase = RoundPhase::Idle;
        self.begin(self.difficulty);
        Ok(())
    }

    /// Single start button: start when idle/ended, reset while running
    pub fn start_or_reset(&mut self, profile: &str) -> Result<()> {
        if self.phase == RoundPhase::Running {
            self.reset()
        } else {
            self.start(profile)
        }
    }

    /// Player caught a drop
    pub fn catch_drop(&mut self, id: DropId) -> Result<DropKind> {
        if self.phase != RoundPhase::Running {
            return Err(self.invalid("catch a drop"));
        }
        let drop = self.live.remove(&id).ok_or(Error::UnknownDrop(id))?;
        self.change_score(drop.kind.catch_points());
        self.events.push(GameEvent::CatchFeedback { kind: drop.kind });
        Ok(drop.kind)
    }

    /// A drop finished falling without being caught
    pub fn expire_drop(&mut self, id: DropId) -> Result<DropKind> {
        let drop = self.live.remove(&id).ok_or(Error::UnknownDrop(id))?;
        if drop.kind == DropKind::Good && self.phase == RoundPhase::Running {
            self.events.push(GameEvent::DropMissed { id });
            if let Some(penalty) = self.options.miss_penalty {
                let delta = i32::try_from(penalty).unwrap_or(i32::MAX);
                self.change_score(-delta);
            }
        }
        Ok(drop.kind)
    }

    /// Report the play area size so drops spawn fully inside it.
    /// Negative or non-finite sizes count as 0.
    pub fn set_play_area(&mut self, width: f32, height: f32) {
        let usable = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.area = PlayArea {
            width: usable(width),
            height: usable(height),
        };
    }

    pub fn set_options(&mut self, options: RoundOptions) {
        self.options = options;
    }

    /// Advance simulated time, firing every schedule that comes due
    pub fn advance(&mut self, dt_ms: Millis) {
        let until = self.now + dt_ms;
        while let Some((due, which)) = self.next_due(until) {
            self.now = due;
            match which {
                Schedule::Clock => self.on_clock_tick(),
                Schedule::Spawner => self.on_spawn(),
                Schedule::Ramp => self.on_ramp(),
            }
        }
        self.now = until;
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn knobs(&self) -> &Knobs {
        &self.knobs
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn options(&self) -> &RoundOptions {
        &self.options
    }

    pub fn play_area(&self) -> &PlayArea {
        &self.area
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn live_drop(&self, id: DropId) -> Option<&WaterDrop> {
        self.live.get(&id)
    }

    /// Drops still falling, in id order
    pub fn live_drops(&self) -> impl Iterator<Item = &WaterDrop> {
        self.live.values()
    }

    /// When the spawner fires next (None when stopped)
    pub fn next_spawn_at(&self) -> Option<Millis> {
        self.spawner.map(|s| s.next_due())
    }

    // === Transitions ===

    fn begin(&mut self, difficulty: Difficulty) {
        let config = difficulty.config();

        self.difficulty = difficulty;
        self.config = config;
        self.knobs = Knobs::from_config(&config);
        self.scoreboard.clear();
        self.time_remaining = config.duration_secs;
        self.clear_drops();

        self.clock = Some(Interval::new(self.now, CLOCK_PERIOD_MS));
        self.spawner = Some(Interval::new(self.now, self.knobs.spawn_interval_ms));
        self.ramp = Some(Interval::new(self.now, RAMP_PERIOD_MS));
        self.phase = RoundPhase::Running;

        log::info!(
            "Round started: {} ({}s, win at {})",
            difficulty,
            config.duration_secs,
            config.win_score
        );
        self.events.push(GameEvent::RoundStarted { difficulty, config });
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.events.push(GameEvent::TimeChanged {
            seconds_left: self.time_remaining,
        });
    }

    fn end(&mut self) {
        self.cancel_schedules();
        self.phase = RoundPhase::Ended;

        let final_score = self.score();
        let outcome = if final_score >= self.config.win_score {
            Outcome::Won
        } else {
            Outcome::Lost
        };
        log::info!("Round ended: {:?} with {} points", outcome, final_score);

        self.events.push(GameEvent::RoundEnded {
            outcome,
            final_score,
        });
        if outcome == Outcome::Won {
            self.events.push(GameEvent::Celebrate);
        }
    }

    fn cancel_schedules(&mut self) {
        cancel(&mut self.clock);
        cancel(&mut self.spawner);
        cancel(&mut self.ramp);
    }

    fn clear_drops(&mut self) {
        self.live.clear();
        self.events.push(GameEvent::DropsCleared);
    }

    // === Schedule handlers ===

    /// Earliest schedule due by `until`; ties go to the one scheduled first
    fn next_due(&self, until: Millis) -> Option<(Millis, Schedule)> {
        [
            (Schedule::Clock, self.clock),
            (Schedule::Spawner, self.spawner),
            (Schedule::Ramp, self.ramp),
        ]
        .into_iter()
        .filter_map(|(which, slot)| Some((slot?.due_by(until)?, which)))
        .min_by_key(|(due, _)| *due)
    }

    fn on_clock_tick(&mut self) {
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        clock.fire();

        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.events.push(GameEvent::TimeChanged {
            seconds_left: self.time_remaining,
        });
        if self.time_remaining == 0 {
            self.end();
        }
    }

    fn on_spawn(&mut self) {
        let Some(spawner) = self.spawner.as_mut() else {
            return;
        };
        spawner.fire();

        let id = self.next_drop_id;
        self.next_drop_id += 1;
        let drop = spawn_drop(&mut self.rng, id, &self.knobs, &self.area);
        log::trace!("Spawned {:?} drop {} ({}ms)", drop.kind, id, drop.fall_duration_ms);

        self.live.insert(id, drop);
        self.events.push(GameEvent::DropCreated { drop });
    }

    fn on_ramp(&mut self) {
        let Some(ramp) = self.ramp.as_mut() else {
            return;
        };
        ramp.fire();

        self.knobs.escalate();
        // Restart the spawner at the new cadence, counted from now
        if self.spawner.is_some() {
            self.spawner = Some(Interval::new(self.now, self.knobs.spawn_interval_ms));
        }
        log::debug!(
            "Difficulty ramped: spawn {}ms, fall {}ms, bad {:.2}",
            self.knobs.spawn_interval_ms,
            self.knobs.fall_duration_ms,
            self.knobs.bad_probability
        );
        self.events.push(GameEvent::DifficultyRamped { knobs: self.knobs });
    }

    // === Helpers ===

    fn change_score(&mut self, delta: i32) {
        let milestone = self.scoreboard.apply(delta);
        self.events.push(GameEvent::ScoreChanged {
            score: self.score(),
        });
        if let Some(milestone) = milestone {
            log::debug!("Milestone reached: {}", milestone.threshold);
            self.events.push(GameEvent::Milestone {
                message: milestone.message,
            });
        }
    }

    fn ensure_not_running(&self, action: &'static str) -> Result<()> {
        if self.phase == RoundPhase::Running {
            Err(self.invalid(action))
        } else {
            Ok(())
        }
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            action,
            phase: self.phase,
        }
    }

    /// Put a drop of a chosen kind into play (tests only)
    #[cfg(test)]
    pub(crate) fn insert_drop(&mut self, kind: DropKind) -> DropId {
        let id = self.next_drop_id;
        self.next_drop_id += 1;
        self.live.insert(
            id,
            WaterDrop {
                id,
                kind,
                fall_duration_ms: self.knobs.fall_duration_ms,
                x: 0.0,
                size: DROP_SIZE_MIN,
            },
        );
        id
    }
}
