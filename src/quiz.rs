//! Quiz scoring against a fixed answer key. Ten points per correct answer or correct step.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Options offered for the application-steps question.
pub const APPLICATION_STEP_OPTIONS: [&str; 8] = [
    "Complete online application",
    "Verify legal status",
    "Apply for a conditional use permit",
    "Go through appeal process",
    "Create host community agreement",
    "Show proof of residency",
    "Go through state process",
    "Register as a business",
];

pub const CORRECT_APPLICATION_STEPS: [&str; 6] = [
    "Complete online application",
    "Apply for a conditional use permit",
    "Go through appeal process",
    "Create host community agreement",
    "Go through state process",
    "Register as a business",
];

/// Normalized (trimmed, lower-cased) spellings accepted for "What state is this data for?".
const ACCEPTED_STATE_ANSWERS: [&str; 3] = ["ma", "massachusetts", "massachussetts"];

pub const EQUITY_BUSINESS_COUNT: u32 = 33;
pub const MINIMUM_AGE: u32 = 21;
pub const QUESTION_COUNT: u32 = 5;
const POINTS_PER_ANSWER: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuizAnswers {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub state: String,
    /// "You can start a cannabis business with your father who works for the city of Boston."
    #[serde(default)]
    pub family_employee_allowed: Option<bool>,
    #[serde(default)]
    pub equity_businesses: Option<u32>,
    #[serde(default)]
    pub minimum_age: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub name: String,
    /// Questions answered fully correctly, out of `question_count`.
    pub correct_answers: u32,
    pub question_count: u32,
    /// 0..=100
    pub score: u32,
}

pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_accepted_state(answer: &str) -> bool {
    ACCEPTED_STATE_ANSWERS.contains(&normalize_answer(answer).as_str())
}

pub fn score_quiz(answers: &QuizAnswers) -> QuizResult {
    let selected: BTreeSet<&str> = answers.steps.iter().map(String::as_str).collect();
    let correct: BTreeSet<&str> = CORRECT_APPLICATION_STEPS.into_iter().collect();

    let step_points = correct.intersection(&selected).count() as u32;
    let mut points = step_points;
    let mut correct_answers = u32::from(selected == correct);

    let single_answers = [
        is_accepted_state(&answers.state),
        answers.family_employee_allowed == Some(false),
        answers.equity_businesses == Some(EQUITY_BUSINESS_COUNT),
        answers
            .minimum_age
            .is_some_and(|age| age == f64::from(MINIMUM_AGE)),
    ];
    for is_correct in single_answers {
        if is_correct {
            points += 1;
            correct_answers += 1;
        }
    }

    QuizResult {
        name: answers.name.clone(),
        correct_answers,
        question_count: QUESTION_COUNT,
        score: points * POINTS_PER_ANSWER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perfect_answers() -> QuizAnswers {
        QuizAnswers {
            name: "Ashlyn".to_string(),
            steps: CORRECT_APPLICATION_STEPS.iter().map(|s| s.to_string()).collect(),
            state: "MA".to_string(),
            family_employee_allowed: Some(false),
            equity_businesses: Some(33),
            minimum_age: Some(21.0),
        }
    }

    #[test]
    fn perfect_quiz_scores_one_hundred() {
        let result = score_quiz(&perfect_answers());
        assert_eq!(result.score, 100);
        assert_eq!(result.correct_answers, 5);
        assert_eq!(result.question_count, 5);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let result = score_quiz(&QuizAnswers::default());
        assert_eq!(result.score, 0);
        assert_eq!(result.correct_answers, 0);
    }

    #[test]
    fn state_variants_are_accepted() {
        for answer in ["MA", "ma", " Massachusetts ", "MASSACHUSSETTS"] {
            assert!(is_accepted_state(answer), "{answer} should be accepted");
        }
        for answer in ["Mass", "NY", ""] {
            assert!(!is_accepted_state(answer), "{answer} should be rejected");
        }
    }

    #[test]
    fn partial_steps_earn_points_but_not_the_question() {
        let answers = QuizAnswers {
            steps: vec![
                "Complete online application".to_string(),
                "Verify legal status".to_string(),
                "Register as a business".to_string(),
            ],
            ..QuizAnswers::default()
        };
        let result = score_quiz(&answers);
        assert_eq!(result.score, 20);
        assert_eq!(result.correct_answers, 0);
    }

    #[test]
    fn extra_wrong_step_loses_only_the_question() {
        let mut answers = perfect_answers();
        answers.steps.push("Show proof of residency".to_string());
        let result = score_quiz(&answers);
        assert_eq!(result.score, 100);
        assert_eq!(result.correct_answers, 4);
    }

    #[test]
    fn step_order_does_not_matter() {
        let mut answers = perfect_answers();
        answers.steps.reverse();
        assert_eq!(score_quiz(&answers).correct_answers, 5);
    }
}
