//! Run scoring
//!
//! A run is a fixed number of questions. Only problems solved without a wrong
//! guess count toward the score. The session lives in the UI shell, outside
//! [`GameState`](crate::sim::GameState), so wrong guesses never touch the sim.

use crate::sim::AnswerOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Problems solved on the first try
    pub score: u32,
    /// Problems solved so far
    pub answered: u32,
    /// Questions in this run
    pub total: u32,
    missed_current: bool,
}

impl Session {
    pub fn new(total: u32) -> Self {
        Self {
            score: 0,
            answered: 0,
            total,
            missed_current: false,
        }
    }

    /// Record the outcome of an answer click
    pub fn record(&mut self, outcome: AnswerOutcome) {
        match outcome {
            AnswerOutcome::Correct => {
                self.answered += 1;
                if !self.missed_current {
                    self.score += 1;
                }
                self.missed_current = false;
            }
            AnswerOutcome::Wrong => self.missed_current = true,
            AnswerOutcome::Ignored => {}
        }
    }

    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }

    /// 1-based number of the question on screen
    pub fn question_number(&self) -> u32 {
        (self.answered + 1).min(self.total)
    }

    /// `score/total` as shown on the result screen and in share text
    pub fn result_text(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{GameEvent, GameState, TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_first_try_counts() {
        let mut session = Session::new(3);
        session.record(AnswerOutcome::Correct);
        assert_eq!(session.score, 1);
        assert_eq!(session.answered, 1);
    }

    #[test]
    fn test_missed_question_does_not_score() {
        let mut session = Session::new(3);
        session.record(AnswerOutcome::Wrong);
        session.record(AnswerOutcome::Wrong);
        session.record(AnswerOutcome::Correct);
        assert_eq!(session.score, 0);
        assert_eq!(session.answered, 1);

        // Miss flag resets for the next question
        session.record(AnswerOutcome::Correct);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn test_ignored_clicks_are_not_counted() {
        let mut session = Session::new(3);
        session.record(AnswerOutcome::Ignored);
        assert_eq!(session, Session::new(3));
    }

    #[test]
    fn test_completion_and_text() {
        let mut session = Session::new(2);
        assert_eq!(session.question_number(), 1);
        session.record(AnswerOutcome::Correct);
        session.record(AnswerOutcome::Wrong);
        session.record(AnswerOutcome::Correct);
        assert!(session.is_complete());
        assert_eq!(session.question_number(), 2);
        assert_eq!(session.result_text(), "1/2");
    }

    #[test]
    fn test_idle_run_completes_session() {
        let tuning = Tuning::default();
        let mut state = GameState::new(2024, tuning.clone(), 0);
        let mut session = Session::new(tuning.questions_per_run);
        let input = TickInput { idle_mode: true };

        // Generous bound: each question takes well under five seconds
        let limit = 120 * 5 * tuning.questions_per_run;
        let mut ticks = 0;
        while !session.is_complete() && ticks < limit {
            for event in tick(&mut state, &input, SIM_DT) {
                if let GameEvent::Answered { outcome } = event {
                    session.record(outcome);
                }
            }
            ticks += 1;
        }

        assert!(session.is_complete(), "idle run stalled at {}", session.answered);
        assert_eq!(session.answered, tuning.questions_per_run);
        assert_eq!(session.score, tuning.questions_per_run);
        assert_eq!(session.result_text(), "10/10");
    }
}
