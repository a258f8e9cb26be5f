//! Rocket Math - solve arithmetic problems to launch rockets at planets
//!
//! Core modules:
//! - `sim`: Deterministic simulation (problems, level state machine, rocket flight)
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven difficulty bands and timing
//! - `session`: Run scoring
//! - `share`: Share links, Open Graph tags and share payloads
//! - `platform`: Browser DOM and share plumbing (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod share;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Planet sits at the origin, the camera looks at it
    pub const PLANET_CENTER: Vec3 = Vec3::ZERO;
    /// Rocket lifts off from the lower left of the view
    pub const ROCKET_LAUNCH_POS: Vec3 = Vec3::new(-5.0, -3.5, 0.0);

    /// Particle slots in the GPU buffer (shader array size)
    pub const MAX_PARTICLES: usize = 128;
}
