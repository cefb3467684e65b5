//! The quiz engine.
//!
//! A submission is scored against the quiz's passing threshold using exact
//! integer comparison:
//!
//! ```text
//! pass  <=>  correct * 100 >= passing_score * total
//! ```
//!
//! The reported score is the floor percentage. Only the first pass of a
//! quiz pays its reward; a failed attempt changes nothing and may be
//! retried.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use krishi_types::{QuestionId, Quiz, QuizAnswers, QuizId, QuizQuestion};

use crate::error::ProgressError;

/// The scored result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    /// Quiz key.
    pub quiz_id: QuizId,
    /// Correctly answered questions.
    pub correct: usize,
    /// Questions in the quiz.
    pub total: usize,
    /// Floor percentage of correct answers.
    pub score: u32,
    /// Whether the threshold was met.
    pub passed: bool,
    /// Coins to credit (non-zero only on the first pass).
    pub reward: u64,
}

/// Count the correct answers in `answers`.
///
/// Unanswered questions and out-of-range options count as wrong.
pub fn count_correct(quiz: &Quiz, answers: &QuizAnswers) -> usize {
    quiz.questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|&chosen| chosen == q.correct_option && chosen < q.options.len()))
        .count()
}

/// Floor percentage of `correct` out of `total`. An empty quiz scores 100.
pub fn score_percent(correct: usize, total: usize) -> u32 {
    let correct = u64::try_from(correct).unwrap_or(u64::MAX);
    let total = u64::try_from(total).unwrap_or(u64::MAX);
    correct
        .saturating_mul(100)
        .checked_div(total)
        .map_or(100, |pct| u32::try_from(pct).unwrap_or(100))
}

/// Exact pass check: `correct * 100 >= passing_score * total`.
pub fn meets_threshold(correct: usize, total: usize, passing_score: u32) -> bool {
    let correct = u128::try_from(correct).unwrap_or(u128::MAX);
    let total = u128::try_from(total).unwrap_or(u128::MAX);
    correct.saturating_mul(100) >= u128::from(passing_score).saturating_mul(total)
}

/// All library quizzes, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizBook {
    quizzes: Vec<Quiz>,
}

impl QuizBook {
    /// Wrap an explicit quiz list.
    pub const fn new(quizzes: Vec<Quiz>) -> Self {
        Self { quizzes }
    }

    /// The two built-in library quizzes.
    pub fn builtin() -> Self {
        Self::new(vec![traditional_farming_quiz(), organic_fertilizer_quiz()])
    }

    /// All quizzes.
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    /// Look up one quiz.
    pub fn get(&self, id: &QuizId) -> Result<&Quiz, ProgressError> {
        self.quizzes
            .iter()
            .find(|q| &q.id == id)
            .ok_or_else(|| ProgressError::UnknownQuiz(id.clone()))
    }

    /// Score a submission and, on the first pass, mark the quiz completed.
    pub fn submit(&mut self, id: &QuizId, answers: &QuizAnswers) -> Result<QuizOutcome, ProgressError> {
        let quiz = self
            .quizzes
            .iter_mut()
            .find(|q| &q.id == id)
            .ok_or_else(|| ProgressError::UnknownQuiz(id.clone()))?;

        let total = quiz.questions.len();
        let correct = count_correct(quiz, answers);
        let score = score_percent(correct, total);
        let passed = meets_threshold(correct, total, quiz.passing_score);

        let reward = if passed && !quiz.completed {
            quiz.completed = true;
            info!(quiz = %id, score, reward = quiz.coin_reward, "quiz passed");
            quiz.coin_reward
        } else {
            debug!(quiz = %id, score, passed, "quiz scored without reward");
            0
        };

        Ok(QuizOutcome {
            quiz_id: id.clone(),
            correct,
            total,
            score,
            passed,
            reward,
        })
    }
}

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

fn question(id: &str, prompt: &str, options: [&str; 4], correct_option: usize, explanation: &str) -> QuizQuestion {
    QuizQuestion {
        id: QuestionId::from(id),
        prompt: prompt.to_owned(),
        options: options.iter().map(|&o| o.to_owned()).collect(),
        correct_option,
        explanation: explanation.to_owned(),
    }
}

fn traditional_farming_quiz() -> Quiz {
    Quiz {
        id: QuizId::from("traditional-farming-quiz"),
        topic_id: "traditional-farming".to_owned(),
        title: "Traditional Farming Methods Quiz".to_owned(),
        questions: vec![
            question(
                "q1",
                "What is the main benefit of crop rotation in traditional farming?",
                [
                    "Faster growth of crops",
                    "Prevents soil nutrient depletion",
                    "Reduces water requirement",
                    "Increases chemical fertilizer efficiency",
                ],
                1,
                "Crop rotation prevents soil nutrient depletion by allowing different crops to use and replenish different nutrients.",
            ),
            question(
                "q2",
                "Which traditional method helps in natural pest control?",
                [
                    "Using more water",
                    "Planting marigold flowers",
                    "Adding more chemical pesticides",
                    "Harvesting crops early",
                ],
                1,
                "Marigold flowers naturally repel many harmful insects and pests when planted around crops.",
            ),
            question(
                "q3",
                "What percentage increase in productivity can mixed cropping provide?",
                ["10-15%", "20-30%", "40-50%", "60-70%"],
                1,
                "Mixed cropping can increase overall farm productivity by 20-30% through better resource utilization.",
            ),
        ],
        passing_score: 70,
        coin_reward: 100,
        completed: false,
    }
}

fn organic_fertilizer_quiz() -> Quiz {
    Quiz {
        id: QuizId::from("organic-fertilizer-quiz"),
        topic_id: "organic-fertilizers".to_owned(),
        title: "Organic Fertilizers Quiz".to_owned(),
        questions: vec![
            question(
                "q1",
                "How long does it take to prepare good compost?",
                ["1-2 months", "3-4 months", "6-8 months", "1 year"],
                1,
                "Good quality compost takes 3-4 months to decompose properly when turned regularly.",
            ),
            question(
                "q2",
                "Which ingredient is NOT used in Panchagavya?",
                ["Cow dung", "Chemical fertilizer", "Cow milk", "Cow ghee"],
                1,
                "Panchagavya is made entirely from cow products - no chemicals are used.",
            ),
            question(
                "q3",
                "Vermicompost is ready in how many days?",
                ["15-30 days", "45-60 days", "90-120 days", "6 months"],
                1,
                "Vermicompost using earthworms is typically ready in 45-60 days.",
            ),
        ],
        passing_score: 75,
        coin_reward: 120,
        completed: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, usize)]) -> QuizAnswers {
        pairs
            .iter()
            .map(|&(q, a)| (QuestionId::from(q), a))
            .collect()
    }

    fn traditional() -> QuizId {
        QuizId::from("traditional-farming-quiz")
    }

    #[test]
    fn all_correct_passes_and_pays_once() {
        let mut book = QuizBook::builtin();
        let all = answers(&[("q1", 1), ("q2", 1), ("q3", 1)]);

        let first = book.submit(&traditional(), &all).unwrap();
        assert!(first.passed);
        assert_eq!(first.score, 100);
        assert_eq!(first.reward, 100);

        let again = book.submit(&traditional(), &all).unwrap();
        assert!(again.passed);
        assert_eq!(again.reward, 0);
    }

    #[test]
    fn two_of_three_fails_seventy_percent() {
        // 2 * 100 = 200 < 70 * 3 = 210.
        let mut book = QuizBook::builtin();
        let outcome = book
            .submit(&traditional(), &answers(&[("q1", 1), ("q2", 1), ("q3", 0)]))
            .unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.score, 66);
        assert_eq!(outcome.reward, 0);
        assert!(!book.get(&traditional()).unwrap().completed);
    }

    #[test]
    fn failed_attempt_can_be_retried() {
        let mut book = QuizBook::builtin();
        book.submit(&traditional(), &answers(&[("q1", 0)])).unwrap();
        let retry = book
            .submit(&traditional(), &answers(&[("q1", 1), ("q2", 1), ("q3", 1)]))
            .unwrap();
        assert_eq!(retry.reward, 100);
    }

    #[test]
    fn exactly_at_threshold_passes_one_below_fails() {
        assert!(meets_threshold(7, 10, 70));
        assert!(!meets_threshold(6, 10, 70));
        assert!(meets_threshold(3, 4, 75));
        assert!(!meets_threshold(2, 3, 70));
    }

    #[test]
    fn unanswered_and_out_of_range_count_as_wrong() {
        let book = QuizBook::builtin();
        let quiz = book.get(&traditional()).unwrap();
        assert_eq!(count_correct(quiz, &answers(&[("q1", 1), ("q2", 9)])), 1);
        assert_eq!(count_correct(quiz, &QuizAnswers::new()), 0);
    }

    #[test]
    fn unknown_quiz_is_reported() {
        let mut book = QuizBook::builtin();
        let err = book
            .submit(&QuizId::from("astronomy"), &QuizAnswers::new())
            .unwrap_err();
        assert_eq!(err, ProgressError::UnknownQuiz(QuizId::from("astronomy")));
    }

    #[test]
    fn score_is_floor_percentage() {
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 66);
        assert_eq!(score_percent(0, 0), 100);
    }

    #[test]
    fn organic_quiz_needs_all_three() {
        // 75% of 3 questions requires 2.25, so 2 correct fails.
        let mut book = QuizBook::builtin();
        let id = QuizId::from("organic-fertilizer-quiz");
        let two = book
            .submit(&id, &answers(&[("q1", 1), ("q2", 1)]))
            .unwrap();
        assert!(!two.passed);
        let three = book
            .submit(&id, &answers(&[("q1", 1), ("q2", 1), ("q3", 1)]))
            .unwrap();
        assert_eq!(three.reward, 120);
    }
}
