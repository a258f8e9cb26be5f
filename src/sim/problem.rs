//! Arithmetic problem generation
//!
//! Each level gets one problem drawn from the difficulty band covering it.
//! A problem always carries exactly two candidates: the answer and a decoy.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Arithmetic operation for a difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "−",
            Operation::Mul => "×",
            Operation::Div => "÷",
        }
    }

    /// Apply to a pair of operands. Division is only exact on generated problems.
    pub fn apply(&self, lhs: i32, rhs: i32) -> i32 {
        match self {
            Operation::Add => lhs + rhs,
            Operation::Sub => lhs - rhs,
            Operation::Mul => lhs * rhs,
            Operation::Div => lhs / rhs,
        }
    }
}

/// A single question with two candidate answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub operation: Operation,
    pub lhs: i32,
    pub rhs: i32,
    /// Display text, e.g. `3 + 4 = ?`
    pub question: String,
    /// Presentation order of the answer buttons
    pub candidates: [i32; 2],
    pub answer: i32,
}

impl Problem {
    /// Build a problem from explicit operands, rolling a decoy and candidate order
    pub fn with_operands<R: Rng>(
        operation: Operation,
        lhs: i32,
        rhs: i32,
        decoy_max_offset: i32,
        rng: &mut R,
    ) -> Self {
        let answer = operation.apply(lhs, rhs);
        let decoy = roll_decoy(answer, decoy_max_offset, rng);
        let candidates = if rng.random_bool(0.5) {
            [answer, decoy]
        } else {
            [decoy, answer]
        };

        Self {
            operation,
            lhs,
            rhs,
            question: format!("{} {} {} = ?", lhs, operation.symbol(), rhs),
            candidates,
            answer,
        }
    }

    pub fn is_correct(&self, value: i32) -> bool {
        value == self.answer
    }

    /// The candidate that is not the answer
    pub fn decoy(&self) -> i32 {
        if self.candidates[0] == self.answer {
            self.candidates[1]
        } else {
            self.candidates[0]
        }
    }
}

/// Generate the problem for `level` using the band that covers it
pub fn generate<R: Rng>(level: u32, tuning: &Tuning, rng: &mut R) -> Problem {
    let band = tuning.band_for_level(level);
    let a = rng.random_range(band.lhs.as_range());
    let b = rng.random_range(band.rhs.as_range());

    let (lhs, rhs) = match band.operation {
        // Minuend >= subtrahend
        Operation::Sub => (a.max(b), a.min(b)),
        // lhs draws the quotient, so the dividend is an exact multiple
        Operation::Div => (a * b, b),
        Operation::Add | Operation::Mul => (a, b),
    };

    let problem = Problem::with_operands(band.operation, lhs, rhs, tuning.decoy_max_offset, rng);
    log::debug!(
        "Level {} ({}): {} answer={} candidates={:?}",
        level,
        band.id,
        problem.question,
        problem.answer,
        problem.candidates
    );
    problem
}

/// Perturb the answer until the decoy differs from it and stays non-negative
fn roll_decoy<R: Rng>(answer: i32, max_offset: i32, rng: &mut R) -> i32 {
    let max_offset = max_offset.max(1);
    loop {
        let decoy = answer + rng.random_range(-max_offset..=max_offset);
        if decoy != answer && decoy >= 0 {
            return decoy;
        }
    }
}
