//! Collision detection and flight integration for the rocket
//!
//! Both the planet and the rocket are treated as spheres; the rocket homes in
//! on the planet centre with a capped speed.

use glam::Vec3;

/// Check whether the rocket sphere overlaps the planet sphere
pub fn rocket_hits_planet(
    rocket_pos: Vec3,
    rocket_radius: f32,
    planet_center: Vec3,
    planet_radius: f32,
) -> bool {
    rocket_pos.distance(planet_center) <= rocket_radius + planet_radius
}

/// Point on the planet surface closest to the rocket (impact point)
pub fn impact_point(rocket_pos: Vec3, planet_center: Vec3, planet_radius: f32) -> Vec3 {
    let dir = (rocket_pos - planet_center).normalize_or_zero();
    planet_center + dir * planet_radius
}

/// Steer velocity toward `target` and integrate position by `dt`
///
/// Velocity is rotated fully onto the target direction each step so the rocket
/// always arrives; speed grows by `accel` up to `max_speed`.
pub fn home_toward(
    pos: Vec3,
    vel: Vec3,
    target: Vec3,
    accel: f32,
    max_speed: f32,
    dt: f32,
) -> (Vec3, Vec3) {
    let to_target = target - pos;
    let dir = to_target.normalize_or_zero();
    let speed = (vel.length() + accel * dt).min(max_speed);
    let new_vel = dir * speed;
    // Don't step past the target
    let step = (speed * dt).min(to_target.length());
    (pos + dir * step, new_vel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rocket_planet_overlap() {
        let planet = Vec3::ZERO;
        assert!(!rocket_hits_planet(Vec3::new(3.0, 0.0, 0.0), 0.25, planet, 1.5));
        assert!(rocket_hits_planet(Vec3::new(1.75, 0.0, 0.0), 0.25, planet, 1.5));
        assert!(rocket_hits_planet(Vec3::new(1.0, 0.0, 0.0), 0.25, planet, 1.5));
    }

    #[test]
    fn test_impact_point_on_surface() {
        let p = impact_point(Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO, 1.5);
        assert!((p - Vec3::new(0.0, 1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_homing_speed_is_capped() {
        let (_, vel) = home_toward(
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::ZERO,
            100.0,
            6.0,
            0.5,
        );
        assert!((vel.length() - 6.0).abs() < 1e-5);
        assert!(vel.x > 0.0);
    }

    #[test]
    fn test_homing_does_not_overshoot() {
        let (pos, _) = home_toward(
            Vec3::new(0.1, 0.0, 0.0),
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::ZERO,
            0.0,
            10.0,
            1.0,
        );
        assert!(pos.length() < 1e-5);
    }
}
