//! Data-driven game balance
//!
//! Difficulty bands, decoy spread, rocket flight and explosion timing live here
//! so they can be tweaked in `assets/tuning.json` without touching the sim.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::sim::Operation;

/// Embedded tuning document shipped with the game
pub const DEFAULT_TUNING_JSON: &str = include_str!("../assets/tuning.json");

/// Largest operand a band may draw (also caps `decoy_max_offset`)
pub const MAX_OPERAND: i32 = 10_000;
/// Largest value a generated problem may reach (sum, product or dividend)
pub const MAX_RESULT: i32 = 1_000_000;

/// Inclusive operand range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: i32,
    pub max: i32,
}

impl OperandRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }
}

/// A contiguous run of levels sharing one operand-generation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBand {
    /// Short id used in share links (`#addition`)
    pub id: String,
    /// Display name for the selection screen and share titles
    pub name: String,
    /// First level this band applies to
    pub min_level: u32,
    pub operation: Operation,
    /// Left operand (quotient for division)
    pub lhs: OperandRange,
    /// Right operand (divisor for division)
    pub rhs: OperandRange,
}

/// Complete game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Bands sorted by ascending `min_level`, first one starting at level 0
    pub bands: Vec<DifficultyBand>,
    /// Largest distance between the decoy and the correct answer
    pub decoy_max_offset: i32,
    /// Delay between impact and the next problem
    pub explosion_delay_ms: u32,
    /// Questions per run before the result screen
    pub questions_per_run: u32,
    pub planet_radius: f32,
    /// Planet spin (radians/sec)
    pub planet_spin: f32,
    pub rocket_radius: f32,
    pub rocket_start_speed: f32,
    /// Homing acceleration toward the planet (units/sec²)
    pub rocket_accel: f32,
    pub rocket_max_speed: f32,
    pub particle_count: u32,
    /// Seconds a particle lives
    pub particle_lifetime: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bands: vec![
                DifficultyBand {
                    id: "addition".to_string(),
                    name: "Addition".to_string(),
                    min_level: 0,
                    operation: Operation::Add,
                    lhs: OperandRange::new(1, 9),
                    rhs: OperandRange::new(1, 9),
                },
                DifficultyBand {
                    id: "subtraction".to_string(),
                    name: "Subtraction".to_string(),
                    min_level: 3,
                    operation: Operation::Sub,
                    lhs: OperandRange::new(1, 9),
                    rhs: OperandRange::new(1, 9),
                },
                DifficultyBand {
                    id: "big-addition".to_string(),
                    name: "Big Addition".to_string(),
                    min_level: 5,
                    operation: Operation::Add,
                    lhs: OperandRange::new(10, 99),
                    rhs: OperandRange::new(1, 9),
                },
                DifficultyBand {
                    id: "multiplication".to_string(),
                    name: "Multiplication".to_string(),
                    min_level: 8,
                    operation: Operation::Mul,
                    lhs: OperandRange::new(2, 9),
                    rhs: OperandRange::new(2, 9),
                },
                DifficultyBand {
                    id: "division".to_string(),
                    name: "Division".to_string(),
                    min_level: 11,
                    operation: Operation::Div,
                    lhs: OperandRange::new(1, 9),
                    rhs: OperandRange::new(2, 9),
                },
            ],
            decoy_max_offset: 5,
            explosion_delay_ms: 1000,
            questions_per_run: 10,
            planet_radius: 1.5,
            planet_spin: 0.35,
            rocket_radius: 0.25,
            rocket_start_speed: 1.0,
            rocket_accel: 9.0,
            rocket_max_speed: 9.0,
            particle_count: 120,
            particle_lifetime: 1.0,
        }
    }
}

/// Why a tuning document was rejected
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning JSON is malformed: {e}"),
            TuningError::Invalid(msg) => write!(f, "tuning is invalid: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate().map_err(TuningError::Invalid)?;
        Ok(tuning)
    }

    /// Load the embedded tuning, falling back to defaults if it is broken
    pub fn load() -> Self {
        match Self::from_json(DEFAULT_TUNING_JSON) {
            Ok(tuning) => {
                log::info!("Loaded tuning with {} difficulty bands", tuning.bands.len());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using built-in tuning");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let Some(first) = self.bands.first() else {
            return Err("at least one difficulty band is required".to_string());
        };
        if first.min_level != 0 {
            return Err("the first band must start at level 0".to_string());
        }
        for pair in self.bands.windows(2) {
            if pair[1].min_level <= pair[0].min_level {
                return Err(format!(
                    "band '{}' must start after band '{}'",
                    pair[1].id, pair[0].id
                ));
            }
        }
        for band in &self.bands {
            if band.id.is_empty() {
                return Err("band id must not be empty".to_string());
            }
            if band.lhs.min > band.lhs.max || band.rhs.min > band.rhs.max {
                return Err(format!("band '{}' has an empty operand range", band.id));
            }
            if band.lhs.min < 0 || band.rhs.min < 0 {
                return Err(format!("band '{}' operands must be non-negative", band.id));
            }
            if band.operation == Operation::Div && band.rhs.min < 1 {
                return Err(format!("band '{}' divisor range must exclude 0", band.id));
            }
            if band.lhs.max > MAX_OPERAND || band.rhs.max > MAX_OPERAND {
                return Err(format!(
                    "band '{}' operands must be <= {MAX_OPERAND}",
                    band.id
                ));
            }
            let largest = match band.operation {
                Operation::Add | Operation::Sub => band.lhs.max.checked_add(band.rhs.max),
                Operation::Mul | Operation::Div => band.lhs.max.checked_mul(band.rhs.max),
            };
            if largest.is_none_or(|n| n > MAX_RESULT) {
                return Err(format!(
                    "band '{}' results must stay <= {MAX_RESULT}",
                    band.id
                ));
            }
        }
        if !(1..=MAX_OPERAND).contains(&self.decoy_max_offset) {
            return Err(format!("decoy_max_offset must be in 1..={MAX_OPERAND}"));
        }
        if self.questions_per_run == 0 {
            return Err("questions_per_run must be > 0".to_string());
        }
        let floats = [
            ("planet_radius", self.planet_radius),
            ("planet_spin", self.planet_spin),
            ("rocket_radius", self.rocket_radius),
            ("rocket_start_speed", self.rocket_start_speed),
            ("rocket_accel", self.rocket_accel),
            ("rocket_max_speed", self.rocket_max_speed),
            ("particle_lifetime", self.particle_lifetime),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} must be finite"));
        }
        if self.planet_radius <= 0.0 || self.rocket_radius <= 0.0 {
            return Err("planet and rocket radii must be > 0".to_string());
        }
        if self.rocket_max_speed <= 0.0 {
            return Err("rocket_max_speed must be > 0".to_string());
        }
        if self.rocket_start_speed < 0.0 || self.rocket_accel < 0.0 {
            return Err("rocket_start_speed and rocket_accel must be >= 0".to_string());
        }
        // A rocket with neither would never leave the pad
        if self.rocket_start_speed == 0.0 && self.rocket_accel == 0.0 {
            return Err("rocket_start_speed or rocket_accel must be > 0".to_string());
        }
        if self.particle_lifetime <= 0.0 {
            return Err("particle_lifetime must be > 0".to_string());
        }
        Ok(())
    }

    /// Band that applies at `level` (last band whose `min_level <= level`)
    pub fn band_for_level(&self, level: u32) -> &DifficultyBand {
        self.bands
            .iter()
            .rev()
            .find(|band| band.min_level <= level)
            .unwrap_or(&self.bands[0])
    }

    pub fn band_by_id(&self, id: &str) -> Option<&DifficultyBand> {
        self.bands.iter().find(|band| band.id == id)
    }

    /// Explosion delay in simulation ticks (at least one)
    pub fn explosion_delay_ticks(&self) -> u64 {
        let tick_ms = crate::consts::SIM_DT as f64 * 1000.0;
        (self.explosion_delay_ms as f64 / tick_ms).round().max(1.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn embedded_tuning_matches_default() {
        let tuning = Tuning::from_json(DEFAULT_TUNING_JSON).expect("embedded tuning parses");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn bands_must_ascend() {
        let mut tuning = Tuning::default();
        tuning.bands[2].min_level = 3;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn first_band_must_start_at_zero() {
        let mut tuning = Tuning::default();
        tuning.bands[0].min_level = 1;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn division_rejects_zero_divisor() {
        let mut tuning = Tuning::default();
        let last = tuning.bands.len() - 1;
        tuning.bands[last].rhs = OperandRange::new(0, 9);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn oversized_operands_are_rejected() {
        let mut tuning = Tuning::default();
        let mul = tuning.bands.iter().position(|b| b.operation == Operation::Mul).unwrap();
        tuning.bands[mul].lhs = OperandRange::new(60_000, 70_000);
        tuning.bands[mul].rhs = OperandRange::new(60_000, 70_000);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn products_past_the_result_limit_are_rejected() {
        let mut tuning = Tuning::default();
        let mul = tuning.bands.iter().position(|b| b.operation == Operation::Mul).unwrap();
        // Each operand is in bounds, the product is not
        tuning.bands[mul].lhs = OperandRange::new(2, MAX_OPERAND);
        tuning.bands[mul].rhs = OperandRange::new(2, MAX_OPERAND);
        assert!(MAX_OPERAND * MAX_OPERAND > MAX_RESULT);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn largest_allowed_band_generates() {
        use crate::sim::generate;
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let mut tuning = Tuning::default();
        let mul = tuning.bands.iter().position(|b| b.operation == Operation::Mul).unwrap();
        tuning.bands[mul].lhs = OperandRange::new(900, 1_000);
        tuning.bands[mul].rhs = OperandRange::new(900, 1_000);
        assert!(tuning.validate().is_ok());

        let level = tuning.bands[mul].min_level;
        let mut rng = Pcg32::seed_from_u64(6);
        for _ in 0..50 {
            let problem = generate(level, &tuning, &mut rng);
            assert!(problem.answer <= MAX_RESULT);
        }
    }

    #[test]
    fn parked_rocket_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.rocket_start_speed = 0.0;
        tuning.rocket_accel = 0.0;
        assert!(tuning.validate().is_err());

        // Either one alone is enough to reach the planet
        tuning.rocket_accel = 2.0;
        assert!(tuning.validate().is_ok());
        tuning.rocket_accel = 0.0;
        tuning.rocket_start_speed = 2.0;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let mut tuning = Tuning::default();
        tuning.planet_spin = f32::NAN;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.rocket_max_speed = f32::INFINITY;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn decoy_offset_is_bounded() {
        let mut tuning = Tuning::default();
        tuning.decoy_max_offset = 0;
        assert!(tuning.validate().is_err());
        tuning.decoy_max_offset = i32::MAX;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn band_lookup_by_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.band_for_level(0).id, "addition");
        assert_eq!(tuning.band_for_level(2).id, "addition");
        assert_eq!(tuning.band_for_level(3).id, "subtraction");
        assert_eq!(tuning.band_for_level(5).id, "big-addition");
        assert_eq!(tuning.band_for_level(500).id, "division");
    }

    #[test]
    fn explosion_delay_in_ticks() {
        // 1000 ms at 120 Hz
        assert_eq!(Tuning::default().explosion_delay_ticks(), 120);
    }
}
