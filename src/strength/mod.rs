//! Password strength evaluation.
//!
//! Scoring runs in a fixed order:
//!
//! 1. a denylisted password short-circuits to score 0, "very weak";
//! 2. length sets the base score (10 / 20 / 30 / 40);
//! 3. a keyboard, alphabet or digit run costs 20 points, floored at 0;
//! 4. each character class present adds 15;
//! 5. the clamped score is bucketed into a [`Rating`].
//!
//! Feedback is computed independently of the score and lists concrete
//! improvements in a stable order.

mod common;
mod pattern;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use common::CommonPasswordSet;
pub use pattern::{CharClasses, SYMBOLS, has_sequential_pattern};

const CLASS_BONUS: i32 = 15;
const SEQUENCE_PENALTY: i32 = 20;
const MIN_LENGTH: usize = 8;
const RECOMMENDED_LENGTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    #[serde(rename = "very weak")]
    VeryWeak,
    Weak,
    Medium,
    Strong,
    #[serde(rename = "very strong")]
    VeryStrong,
}

impl Rating {
    /// Bucket a non-common score. `VeryWeak` is reserved for denylisted
    /// passwords and is never produced here.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Rating::VeryStrong,
            60.. => Rating::Strong,
            40.. => Rating::Medium,
            _ => Rating::Weak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::VeryWeak => "very weak",
            Rating::Weak => "weak",
            Rating::Medium => "medium",
            Rating::Strong => "strong",
            Rating::VeryStrong => "very strong",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrengthResult {
    pub score: u8,
    pub rating: Rating,
    pub is_common: bool,
    pub has_sequential_pattern: bool,
}

/// One actionable suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    CommonPassword,
    TooShort,
    ConsiderLonger,
    AddLowercase,
    AddUppercase,
    AddDigits,
    AddSymbols,
    AvoidSequences,
    NoImprovementsNeeded,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Feedback::CommonPassword => {
                "This is a commonly used password, choose something unique"
            }
            Feedback::TooShort => "Too short: use at least 8 characters (12+ recommended)",
            Feedback::ConsiderLonger => "Consider making it longer (12+ characters is better)",
            Feedback::AddLowercase => "Add lowercase letters (a-z)",
            Feedback::AddUppercase => "Add uppercase letters (A-Z)",
            Feedback::AddDigits => "Add numbers (0-9)",
            Feedback::AddSymbols => "Add special symbols (!@#$%^&*)",
            Feedback::AvoidSequences => "Avoid sequential characters (abc, 123, qwerty)",
            Feedback::NoImprovementsNeeded => "Strong password, no improvements needed",
        };
        f.write_str(msg)
    }
}

/// Score plus feedback for a single password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub result: StrengthResult,
    pub feedback: Vec<Feedback>,
}

/// Stateless evaluator over a shared, read-only denylist.
#[derive(Debug, Clone, Default)]
pub struct StrengthEvaluator {
    common: Arc<CommonPasswordSet>,
}

impl StrengthEvaluator {
    pub fn new(common: Arc<CommonPasswordSet>) -> Self {
        Self { common }
    }

    pub fn calculate_strength(&self, password: &str) -> StrengthResult {
        if self.common.contains(password) {
            return StrengthResult {
                score: 0,
                rating: Rating::VeryWeak,
                is_common: true,
                has_sequential_pattern: false,
            };
        }

        let mut score = length_score(password.chars().count());

        let has_sequence = has_sequential_pattern(password);
        if has_sequence {
            score = (score - SEQUENCE_PENALTY).max(0);
        }

        score += CharClasses::of(password).count() as i32 * CLASS_BONUS;

        let score = score.clamp(0, 100) as u8;
        StrengthResult {
            score,
            rating: Rating::from_score(score),
            is_common: false,
            has_sequential_pattern: has_sequence,
        }
    }

    pub fn feedback(&self, password: &str) -> Vec<Feedback> {
        if self.common.contains(password) {
            return vec![Feedback::CommonPassword];
        }

        let mut out = Vec::new();

        let length = password.chars().count();
        if length < MIN_LENGTH {
            out.push(Feedback::TooShort);
        } else if length < RECOMMENDED_LENGTH {
            out.push(Feedback::ConsiderLonger);
        }

        let classes = CharClasses::of(password);
        if !classes.lowercase {
            out.push(Feedback::AddLowercase);
        }
        if !classes.uppercase {
            out.push(Feedback::AddUppercase);
        }
        if !classes.digit {
            out.push(Feedback::AddDigits);
        }
        if !classes.symbol {
            out.push(Feedback::AddSymbols);
        }

        if has_sequential_pattern(password) {
            out.push(Feedback::AvoidSequences);
        }

        if out.is_empty() {
            out.push(Feedback::NoImprovementsNeeded);
        }
        out
    }

    pub fn analyze(&self, password: &str) -> Analysis {
        Analysis {
            result: self.calculate_strength(password),
            feedback: self.feedback(password),
        }
    }
}

fn length_score(length: usize) -> i32 {
    match length {
        16.. => 40,
        12..=15 => 30,
        8..=11 => 20,
        _ => 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> StrengthEvaluator {
        StrengthEvaluator::new(Arc::new(CommonPasswordSet::builtin()))
    }

    #[test]
    fn common_password_short_circuits() {
        let r = evaluator().calculate_strength("Password123");
        assert_eq!(
            r,
            StrengthResult {
                score: 0,
                rating: Rating::VeryWeak,
                is_common: true,
                has_sequential_pattern: false,
            }
        );
    }

    #[test]
    fn all_classes_no_sequence_is_very_strong() {
        let r = evaluator().calculate_strength("Tr0ub4dor&3");
        assert_eq!(r.score, 80);
        assert_eq!(r.rating, Rating::VeryStrong);
        assert!(!r.is_common);
        assert!(!r.has_sequential_pattern);
    }

    #[test]
    fn sequence_penalty_floors_before_class_bonus() {
        let r = evaluator().calculate_strength("abcdefgh");
        assert_eq!(r.score, 15);
        assert_eq!(r.rating, Rating::Weak);
        assert!(r.has_sequential_pattern);
    }

    #[test]
    fn short_password_penalty_floors_at_zero() {
        // base 10, -20 floored to 0, +15 lowercase
        let r = evaluator().calculate_strength("xyz");
        assert_eq!(r.score, 15);
        assert!(r.has_sequential_pattern);
    }

    #[test]
    fn empty_password_is_weak_and_does_not_panic() {
        let r = evaluator().calculate_strength("");
        assert_eq!(r.score, 10);
        assert_eq!(r.rating, Rating::Weak);
        assert!(!r.is_common);
        assert!(!r.has_sequential_pattern);
    }

    #[test]
    fn length_brackets() {
        assert_eq!(length_score(7), 10);
        assert_eq!(length_score(8), 20);
        assert_eq!(length_score(11), 20);
        assert_eq!(length_score(12), 30);
        assert_eq!(length_score(15), 30);
        assert_eq!(length_score(16), 40);
    }

    #[test]
    fn long_password_with_all_classes_caps_at_100() {
        let r = evaluator().calculate_strength("Vn7!pQ2#xL9@mR4$");
        assert_eq!(r.score, 100);
        assert_eq!(r.rating, Rating::VeryStrong);
    }

    #[test]
    fn rating_buckets() {
        assert_eq!(Rating::from_score(100), Rating::VeryStrong);
        assert_eq!(Rating::from_score(80), Rating::VeryStrong);
        assert_eq!(Rating::from_score(79), Rating::Strong);
        assert_eq!(Rating::from_score(60), Rating::Strong);
        assert_eq!(Rating::from_score(40), Rating::Medium);
        assert_eq!(Rating::from_score(39), Rating::Weak);
        assert_eq!(Rating::from_score(0), Rating::Weak);
    }

    #[test]
    fn rating_labels_serialize_with_spaces() {
        assert_eq!(serde_json::to_string(&Rating::VeryWeak).unwrap(), "\"very weak\"");
        assert_eq!(serde_json::to_string(&Rating::Medium).unwrap(), "\"medium\"");
        let r: Rating = serde_json::from_str("\"very strong\"").unwrap();
        assert_eq!(r, Rating::VeryStrong);
        assert_eq!(Rating::Strong.to_string(), "strong");
    }

    #[test]
    fn feedback_for_common_password_is_a_single_directive() {
        assert_eq!(evaluator().feedback("letmein"), vec![Feedback::CommonPassword]);
    }

    #[test]
    fn feedback_lists_only_missing_classes() {
        let fb = evaluator().feedback("AAAA1111");
        assert_eq!(
            fb,
            vec![
                Feedback::ConsiderLonger,
                Feedback::AddLowercase,
                Feedback::AddSymbols,
            ]
        );
    }

    #[test]
    fn feedback_order_is_length_classes_then_sequence() {
        let fb = evaluator().feedback("abc");
        assert_eq!(
            fb,
            vec![
                Feedback::TooShort,
                Feedback::AddUppercase,
                Feedback::AddDigits,
                Feedback::AddSymbols,
                Feedback::AvoidSequences,
            ]
        );
    }

    #[test]
    fn feedback_for_strong_password_is_affirmative() {
        assert_eq!(
            evaluator().feedback("Vn7!pQ2#xL9@mR4$"),
            vec![Feedback::NoImprovementsNeeded]
        );
    }

    #[test]
    fn empty_denylist_scores_common_passwords_normally() {
        let ev = StrengthEvaluator::default();
        let r = ev.calculate_strength("password123");
        assert!(!r.is_common);
        assert!(r.has_sequential_pattern);
        assert_eq!(r.score, 30);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let ev = evaluator();
        for pw in ["", "abcdefgh", "Tr0ub4dor&3", "password123", "AAAA1111"] {
            assert_eq!(ev.analyze(pw), ev.analyze(pw));
        }
    }
}
