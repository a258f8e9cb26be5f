//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod problem;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{home_toward, impact_point, rocket_hits_planet};
pub use problem::{Operation, Problem, generate};
pub use schedule::{PhaseToken, ScheduledAction, ScheduledTask, Scheduler};
pub use state::{AnswerOutcome, GameEvent, GamePhase, GameState, Particle, Planet, Rocket};
pub use tick::{TickInput, tick};
