//! Game state and core simulation types
//!
//! Everything the level controller owns lives in [`GameState`]; the renderer
//! and the UI only ever borrow it.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::problem::{Problem, generate};
use super::schedule::{PhaseToken, Scheduler};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the level controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Problem on screen, answer buttons live
    AwaitingAnswer,
    /// Rocket in flight toward the planet
    Launching,
    /// Planet destroyed, particles flying, next problem scheduled
    Exploding,
}

/// Result of clicking an answer button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Rocket launched, level advanced
    Correct,
    /// Nothing changed; caller shows shake feedback
    Wrong,
    /// Input is disabled in the current phase
    Ignored,
}

/// Things that happened during a tick, for audio/HUD/session bookkeeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Idle mode picked an answer on the player's behalf
    Answered { outcome: AnswerOutcome },
    /// Rocket reached the planet
    Impact { point: Vec3 },
    /// A fresh problem is on screen
    ProblemReady { level: u32 },
}

/// The target planet
#[derive(Debug, Clone)]
pub struct Planet {
    pub center: Vec3,
    pub radius: f32,
    /// Spin around the Y axis (radians)
    pub rotation: f32,
    /// Surface tint (0-1 around the colour wheel)
    pub hue: f32,
    pub visible: bool,
}

impl Planet {
    pub fn new(radius: f32, hue: f32) -> Self {
        Self {
            center: PLANET_CENTER,
            radius,
            rotation: 0.0,
            hue,
            visible: true,
        }
    }
}

/// The rocket, present only while launching
#[derive(Debug, Clone)]
pub struct Rocket {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
}

impl Rocket {
    /// Unit heading (straight up while stationary)
    pub fn heading(&self) -> Vec3 {
        let dir = self.vel.normalize_or_zero();
        if dir == Vec3::ZERO { Vec3::Y } else { dir }
    }
}

/// A particle of the explosion burst
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// 0-1, decreases over time; also drives opacity
    pub life: f32,
    pub size: f32,
    /// Palette index (0 = white core, 1 = yellow, 2 = orange, 3 = planet debris)
    pub color: u32,
}

/// Complete level controller state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    rng: Pcg32,
    /// Difficulty counter
    pub level: u32,
    pub phase: GamePhase,
    /// Bumped on every phase change
    pub phase_token: PhaseToken,
    pub problem: Problem,
    /// Answer buttons accept clicks
    pub input_enabled: bool,
    pub planet: Planet,
    pub rocket: Option<Rocket>,
    pub particles: Vec<Particle>,
    pub scheduler: Scheduler,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game state with the given seed, starting at `start_level`
    pub fn new(seed: u64, tuning: Tuning, start_level: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let problem = generate(start_level, &tuning, &mut rng);
        let planet = Planet::new(tuning.planet_radius, rng.random::<f32>());

        Self {
            seed,
            tuning,
            rng,
            level: start_level,
            phase: GamePhase::AwaitingAnswer,
            phase_token: 0,
            problem,
            input_enabled: true,
            planet,
            rocket: None,
            particles: Vec::new(),
            scheduler: Scheduler::new(),
            time_ticks: 0,
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::debug!("Phase {:?} -> {:?} (level {})", self.phase, phase, self.level);
        self.phase = phase;
        self.phase_token += 1;
    }

    /// Handle an answer click
    pub fn select_answer(&mut self, value: i32) -> AnswerOutcome {
        if self.phase != GamePhase::AwaitingAnswer || !self.input_enabled {
            return AnswerOutcome::Ignored;
        }
        if !self.problem.is_correct(value) {
            log::debug!("Wrong answer {} for '{}'", value, self.problem.question);
            return AnswerOutcome::Wrong;
        }

        self.level += 1;
        self.input_enabled = false;
        self.spawn_rocket();
        self.set_phase(GamePhase::Launching);
        AnswerOutcome::Correct
    }

    /// Handle a click on answer button `index` (0 or 1)
    pub fn select_candidate(&mut self, index: usize) -> AnswerOutcome {
        match self.problem.candidates.get(index) {
            Some(&value) => self.select_answer(value),
            None => AnswerOutcome::Ignored,
        }
    }

    /// Jump straight to `level` with a fresh problem, dropping any pending advance
    pub fn load_level(&mut self, level: u32) {
        self.scheduler.cancel();
        self.rocket = None;
        self.particles.clear();
        self.level = level;
        self.next_problem();
        self.set_phase(GamePhase::AwaitingAnswer);
    }

    /// Generate the problem and planet for the current level and re-arm input
    pub(crate) fn next_problem(&mut self) {
        self.problem = generate(self.level, &self.tuning, &mut self.rng);
        let hue = self.rng.random::<f32>();
        self.planet = Planet::new(self.tuning.planet_radius, hue);
        self.input_enabled = true;
    }

    fn spawn_rocket(&mut self) {
        self.rocket = Some(Rocket {
            pos: ROCKET_LAUNCH_POS,
            vel: (self.planet.center - ROCKET_LAUNCH_POS).normalize_or_zero()
                * self.tuning.rocket_start_speed,
            radius: self.tuning.rocket_radius,
        });
    }

    /// Replace rocket and planet with a particle burst at `point`
    pub(crate) fn explode_at(&mut self, point: Vec3) {
        self.rocket = None;
        self.planet.visible = false;
        self.particles.clear();

        let count = (self.tuning.particle_count as usize).min(MAX_PARTICLES);
        for i in 0..count {
            // Uniform direction on the unit sphere
            let z = self.rng.random_range(-1.0f32..=1.0);
            let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
            let r = (1.0 - z * z).max(0.0).sqrt();
            let dir = Vec3::new(r * theta.cos(), r * theta.sin(), z);
            let speed = self.rng.random_range(1.0f32..4.5);

            self.particles.push(Particle {
                pos: point,
                vel: dir * speed,
                life: 1.0,
                size: self.rng.random_range(0.04f32..0.12),
                color: (i % 4) as u32,
            });
        }
    }

    pub(crate) fn enter_exploding(&mut self) {
        self.set_phase(GamePhase::Exploding);
        let delay = self.tuning.explosion_delay_ticks();
        self.scheduler.schedule(
            self.phase_token,
            self.time_ticks,
            delay,
            super::schedule::ScheduledAction::NextLevel,
        );
    }

    pub(crate) fn enter_awaiting(&mut self) {
        self.particles.clear();
        self.next_problem();
        self.set_phase(GamePhase::AwaitingAnswer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(12345, Tuning::default(), 0)
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.phase, GamePhase::AwaitingAnswer);
        assert_eq!(state.level, 0);
        assert!(state.input_enabled);
        assert!(state.planet.visible);
        assert!(state.rocket.is_none());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_correct_answer_launches() {
        let mut state = state();
        let answer = state.problem.answer;

        assert_eq!(state.select_answer(answer), AnswerOutcome::Correct);
        assert_eq!(state.phase, GamePhase::Launching);
        assert_eq!(state.level, 1);
        assert!(!state.input_enabled);
        assert!(state.rocket.is_some());
    }

    #[test]
    fn test_wrong_answer_changes_nothing() {
        let mut state = state();
        let problem = state.problem.clone();
        let token = state.phase_token;
        let decoy = problem.decoy();

        for _ in 0..5 {
            assert_eq!(state.select_answer(decoy), AnswerOutcome::Wrong);
        }
        assert_eq!(state.phase, GamePhase::AwaitingAnswer);
        assert_eq!(state.level, 0);
        assert_eq!(state.problem, problem);
        assert_eq!(state.phase_token, token);
        assert!(state.rocket.is_none());
    }

    #[test]
    fn test_answers_ignored_while_launching() {
        let mut state = state();
        let answer = state.problem.answer;
        state.select_answer(answer);

        assert_eq!(state.select_answer(answer), AnswerOutcome::Ignored);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_select_candidate_by_index() {
        let mut state = state();
        let idx = state
            .problem
            .candidates
            .iter()
            .position(|&c| c == state.problem.answer)
            .unwrap();

        assert_eq!(state.select_candidate(1 - idx), AnswerOutcome::Wrong);
        assert_eq!(state.select_candidate(7), AnswerOutcome::Ignored);
        assert_eq!(state.select_candidate(idx), AnswerOutcome::Correct);
    }

    #[test]
    fn test_explode_replaces_visuals() {
        let mut state = state();
        let answer = state.problem.answer;
        state.select_answer(answer);
        state.explode_at(Vec3::new(0.0, 1.5, 0.0));

        assert!(state.rocket.is_none());
        assert!(!state.planet.visible);
        assert_eq!(state.particles.len(), state.tuning.particle_count as usize);
    }
}
