//! Fixed timestep simulation tick
//!
//! Advances animation and drives the Launching → Exploding → AwaitingAnswer
//! transitions. Answer clicks go through [`GameState::select_answer`] between ticks.

use super::collision::{home_toward, impact_point, rocket_hits_planet};
use super::schedule::ScheduledAction;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Idle/demo mode - answers every problem correctly
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    // Ambient spin
    state.planet.rotation =
        (state.planet.rotation + state.tuning.planet_spin * dt) % std::f32::consts::TAU;

    match state.phase {
        GamePhase::AwaitingAnswer => {
            if input.idle_mode {
                let answer = state.problem.answer;
                let outcome = state.select_answer(answer);
                events.push(GameEvent::Answered { outcome });
            }
        }
        GamePhase::Launching => {
            let Some(rocket) = state.rocket.as_mut() else {
                // Nothing in flight; treat as an immediate hit on the planet centre
                let point = state.planet.center;
                state.explode_at(point);
                state.enter_exploding();
                events.push(GameEvent::Impact { point });
                return events;
            };

            // Physics step and hit test happen together
            let (pos, vel) = home_toward(
                rocket.pos,
                rocket.vel,
                state.planet.center,
                state.tuning.rocket_accel,
                state.tuning.rocket_max_speed,
                dt,
            );
            rocket.pos = pos;
            rocket.vel = vel;

            if rocket_hits_planet(
                rocket.pos,
                rocket.radius,
                state.planet.center,
                state.planet.radius,
            ) {
                let point = impact_point(rocket.pos, state.planet.center, state.planet.radius);
                log::debug!("Impact at {:?} on tick {}", point, state.time_ticks);
                state.explode_at(point);
                state.enter_exploding();
                events.push(GameEvent::Impact { point });
            }
        }
        GamePhase::Exploding => {
            let fade = dt / state.tuning.particle_lifetime;
            for particle in state.particles.iter_mut() {
                particle.pos += particle.vel * dt;
                particle.vel *= 0.97;
                particle.life = (particle.life - fade).max(0.0);
            }
            state.particles.retain(|p| p.life > 0.0);

            if let Some(ScheduledAction::NextLevel) =
                state.scheduler.poll(state.time_ticks, state.phase_token)
            {
                state.enter_awaiting();
                events.push(GameEvent::ProblemReady { level: state.level });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::AnswerOutcome;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Tick until `phase` is reached, returning the number of ticks taken
    fn run_until(state: &mut GameState, phase: GamePhase, limit: u32) -> Option<u32> {
        let input = TickInput::default();
        for i in 1..=limit {
            tick(state, &input, SIM_DT);
            if state.phase == phase {
                return Some(i);
            }
        }
        None
    }

    #[test]
    fn test_awaiting_is_stable_without_input() {
        let mut state = GameState::new(12345, Tuning::default(), 0);
        let problem = state.problem.clone();
        for _ in 0..600 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(events.is_empty());
        }
        assert_eq!(state.phase, GamePhase::AwaitingAnswer);
        assert_eq!(state.problem, problem);
        assert!(state.planet.rotation > 0.0);
    }

    #[test]
    fn test_rocket_reaches_planet() {
        let mut state = GameState::new(12345, Tuning::default(), 0);
        let answer = state.problem.answer;
        assert_eq!(state.select_answer(answer), AnswerOutcome::Correct);

        // A few seconds of flight at most
        let ticks = run_until(&mut state, GamePhase::Exploding, 120 * 5);
        assert!(ticks.is_some(), "rocket never hit the planet");
        assert!(state.rocket.is_none());
        assert!(!state.planet.visible);
        assert!(!state.particles.is_empty());
        assert!(state.scheduler.pending().is_some());
    }

    #[test]
    fn test_explosion_lasts_configured_delay() {
        let mut state = GameState::new(777, Tuning::default(), 0);
        let answer = state.problem.answer;
        state.select_answer(answer);
        run_until(&mut state, GamePhase::Exploding, 600).unwrap();

        let delay = state.tuning.explosion_delay_ticks() as u32;
        let ticks = run_until(&mut state, GamePhase::AwaitingAnswer, 600).unwrap();
        assert_eq!(ticks, delay);
        assert!(state.particles.is_empty());
        assert!(state.planet.visible);
        assert!(state.input_enabled);
    }

    #[test]
    fn test_full_cycle_emits_events() {
        let mut state = GameState::new(5, Tuning::default(), 2);
        let answer = state.problem.answer;
        state.select_answer(answer);

        let mut impacts = 0;
        let mut ready = Vec::new();
        for _ in 0..1200 {
            for event in tick(&mut state, &TickInput::default(), SIM_DT) {
                match event {
                    GameEvent::Answered { .. } => panic!("no idle input was given"),
                    GameEvent::Impact { .. } => impacts += 1,
                    GameEvent::ProblemReady { level } => ready.push(level),
                }
            }
        }
        assert_eq!(impacts, 1);
        assert_eq!(ready, vec![3]);
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_load_level_cancels_pending_advance() {
        let mut state = GameState::new(42, Tuning::default(), 0);
        let answer = state.problem.answer;
        state.select_answer(answer);
        run_until(&mut state, GamePhase::Exploding, 600).unwrap();

        state.load_level(5);
        assert!(state.scheduler.pending().is_none());
        assert_eq!(state.phase, GamePhase::AwaitingAnswer);
        let problem = state.problem.clone();

        // The old explosion timer must not advance or regenerate anything
        for _ in 0..600 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(events.is_empty());
        }
        assert_eq!(state.level, 5);
        assert_eq!(state.problem, problem);
    }

    #[test]
    fn test_idle_mode_plays_itself() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        let input = TickInput { idle_mode: true };
        for _ in 0..120 * 30 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.level >= 3);
    }

    #[test]
    fn test_idle_answer_is_reported() {
        let mut state = GameState::new(8, Tuning::default(), 0);
        let events = tick(&mut state, &TickInput { idle_mode: true }, SIM_DT);
        assert_eq!(
            events,
            vec![GameEvent::Answered {
                outcome: AnswerOutcome::Correct
            }]
        );
        assert_eq!(state.phase, GamePhase::Launching);

        // No second answer while the rocket is in flight
        let events = tick(&mut state, &TickInput { idle_mode: true }, SIM_DT);
        assert!(events.iter().all(|e| !matches!(e, GameEvent::Answered { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999, Tuning::default(), 0);
        let mut b = GameState::new(99999, Tuning::default(), 0);
        let input = TickInput { idle_mode: true };
        for _ in 0..2000 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.level, b.level);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.problem, b.problem);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn full_cycle_increments_level_by_one(seed in any::<u64>(), start in 0u32..20) {
            let mut state = GameState::new(seed, Tuning::default(), start);
            let answer = state.problem.answer;
            prop_assert_eq!(state.select_answer(answer), AnswerOutcome::Correct);
            prop_assert_eq!(state.phase, GamePhase::Launching);

            prop_assert!(run_until(&mut state, GamePhase::Exploding, 600).is_some());
            prop_assert!(run_until(&mut state, GamePhase::AwaitingAnswer, 600).is_some());
            prop_assert_eq!(state.level, start + 1);
            prop_assert!(state.problem.candidates.contains(&state.problem.answer));
        }

        #[test]
        fn wrong_answer_never_changes_phase(
            seed in any::<u64>(),
            start in 0u32..20,
            flight_ticks in 0u32..400,
        ) {
            let mut state = GameState::new(seed, Tuning::default(), start);
            let decoy = state.problem.decoy();
            let problem = state.problem.clone();

            prop_assert_eq!(state.select_answer(decoy), AnswerOutcome::Wrong);
            prop_assert_eq!(state.phase, GamePhase::AwaitingAnswer);
            prop_assert_eq!(state.level, start);
            prop_assert_eq!(&state.problem, &problem);

            // Mid-flight or mid-explosion a wrong click is simply ignored
            let answer = state.problem.answer;
            state.select_answer(answer);
            for _ in 0..flight_ticks {
                tick(&mut state, &TickInput::default(), SIM_DT);
            }
            let phase = state.phase;
            let level = state.level;
            let decoy = state.problem.decoy();
            let outcome = state.select_answer(decoy);
            if phase == GamePhase::AwaitingAnswer {
                prop_assert_eq!(outcome, AnswerOutcome::Wrong);
            } else {
                prop_assert_eq!(outcome, AnswerOutcome::Ignored);
            }
            prop_assert_eq!(state.phase, phase);
            prop_assert_eq!(state.level, level);
        }
    }
}
