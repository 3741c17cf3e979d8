/// Symbols that earn the symbol-class bonus.
pub const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Keyboard rows, the alphabet and the digit row. Any three consecutive
/// characters of one of these, forwards or backwards, count as a sequence.
const SEQUENCES: [&str; 5] = [
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
    "abcdefghijklmnopqrstuvwxyz",
    "1234567890",
];

const RUN: usize = 3;

/// Returns `true` if the lowercased password contains a 3-character run
/// from any known sequence, in either direction.
pub fn has_sequential_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();
    if lower.chars().count() < RUN {
        return false;
    }

    SEQUENCES.iter().any(|seq| {
        seq.as_bytes().windows(RUN).any(|w| {
            let forward: String = w.iter().map(|&b| b as char).collect();
            let backward: String = w.iter().rev().map(|&b| b as char).collect();
            lower.contains(&forward) || lower.contains(&backward)
        })
    })
}

/// Which of the four scored character classes a password contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharClasses {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl CharClasses {
    pub fn of(password: &str) -> Self {
        password.chars().fold(Self::default(), |mut acc, c| {
            acc.lowercase |= c.is_ascii_lowercase();
            acc.uppercase |= c.is_ascii_uppercase();
            acc.digit |= c.is_ascii_digit();
            acc.symbol |= SYMBOLS.contains(c);
            acc
        })
    }

    pub fn count(&self) -> u32 {
        [self.lowercase, self.uppercase, self.digit, self.symbol]
            .iter()
            .filter(|present| **present)
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_forward_runs() {
        assert!(has_sequential_pattern("xxabcxx"));
        assert!(has_sequential_pattern("my123pass"));
        assert!(has_sequential_pattern("QWErty"));
        assert!(has_sequential_pattern("zxc"));
        assert!(has_sequential_pattern("890"));
    }

    #[test]
    fn detects_backward_runs() {
        assert!(has_sequential_pattern("cba"));
        assert!(has_sequential_pattern("pass321"));
        assert!(has_sequential_pattern("lkj"));
    }

    #[test]
    fn ignores_non_runs() {
        assert!(!has_sequential_pattern(""));
        assert!(!has_sequential_pattern("ab"));
        assert!(!has_sequential_pattern("Tr0ub4dor&3"));
        assert!(!has_sequential_pattern("acegik"));
        assert!(!has_sequential_pattern("AAAA1111"));
    }

    #[test]
    fn runs_do_not_wrap_around() {
        // "mnb" is zxcvbnm backwards; "mza" crosses two sequences.
        assert!(has_sequential_pattern("mnb"));
        assert!(!has_sequential_pattern("mza"));
        assert!(!has_sequential_pattern("901"));
    }

    #[test]
    fn classes_are_detected_independently() {
        let c = CharClasses::of("aB3!");
        assert!(c.lowercase && c.uppercase && c.digit && c.symbol);
        assert_eq!(c.count(), 4);

        let c = CharClasses::of("AAAA1111");
        assert!(!c.lowercase && c.uppercase && c.digit && !c.symbol);
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn unlisted_punctuation_is_not_a_symbol() {
        assert!(!CharClasses::of("a-b_c~").symbol);
        assert!(CharClasses::of("\"").symbol);
    }

    #[test]
    fn empty_has_no_classes() {
        assert_eq!(CharClasses::of(""), CharClasses::default());
    }
}
