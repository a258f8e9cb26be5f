//! GPU-independent view of what should be on screen this frame

use glam::Vec3;

use crate::sim::GameState;

/// Explosion palette (white core, yellow, orange, planet debris)
pub const PARTICLE_PALETTE: [[f32; 3]; 4] = [
    [1.0, 0.95, 0.85],
    [1.0, 0.8, 0.25],
    [1.0, 0.45, 0.1],
    [0.55, 0.45, 0.4],
];

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetVisual {
    pub center: Vec3,
    pub radius: f32,
    pub rotation: f32,
    pub hue: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RocketVisual {
    pub pos: Vec3,
    /// Unit heading
    pub dir: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleVisual {
    pub pos: Vec3,
    pub size: f32,
    pub color: [f32; 3],
    /// Doubles as opacity
    pub life: f32,
}

/// Visuals that exist for the current phase
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    pub planet: Option<PlanetVisual>,
    pub rocket: Option<RocketVisual>,
    pub particles: Vec<ParticleVisual>,
}

impl SceneSnapshot {
    pub fn capture(state: &GameState, max_particles: usize) -> Self {
        let planet = state.planet.visible.then(|| PlanetVisual {
            center: state.planet.center,
            radius: state.planet.radius,
            rotation: state.planet.rotation,
            hue: state.planet.hue,
        });

        let rocket = state.rocket.as_ref().map(|rocket| RocketVisual {
            pos: rocket.pos,
            dir: rocket.heading(),
            radius: rocket.radius,
        });

        let particles = state
            .particles
            .iter()
            .take(max_particles)
            .map(|p| ParticleVisual {
                pos: p.pos,
                size: p.size,
                color: PARTICLE_PALETTE[p.color as usize % PARTICLE_PALETTE.len()],
                life: p.life,
            })
            .collect();

        Self {
            planet,
            rocket,
            particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{GamePhase, TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_awaiting_shows_planet_only() {
        let state = GameState::new(1, Tuning::default(), 0);
        let scene = SceneSnapshot::capture(&state, 128);
        assert!(scene.planet.is_some());
        assert!(scene.rocket.is_none());
        assert!(scene.particles.is_empty());
    }

    #[test]
    fn test_visuals_follow_phases() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        let answer = state.problem.answer;
        state.select_answer(answer);

        let scene = SceneSnapshot::capture(&state, 128);
        assert!(scene.planet.is_some());
        let rocket = scene.rocket.expect("rocket while launching");
        assert!((rocket.dir.length() - 1.0).abs() < 1e-4);

        while state.phase != GamePhase::Exploding {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let scene = SceneSnapshot::capture(&state, 16);
        assert!(scene.planet.is_none());
        assert!(scene.rocket.is_none());
        assert_eq!(scene.particles.len(), 16);
    }
}
