//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only (the host calls `Round::advance`)
//! - Seeded RNG only
//! - Stable iteration order (by drop ID)
//! - No rendering or platform dependencies

pub mod event;
pub mod profile;
pub mod ramp;
pub mod round;
pub mod scoring;
pub mod spawner;
pub mod timer;

pub use event::{GameEvent, Outcome};
pub use profile::{Difficulty, RoundConfig, get_profile};
pub use ramp::Knobs;
pub use round::{Round, RoundOptions, RoundPhase};
pub use scoring::{MILESTONES, MilestoneDef, Scoreboard};
pub use spawner::{DropId, DropKind, PlayArea, WaterDrop, spawn_drop};
pub use timer::{Interval, Millis};
