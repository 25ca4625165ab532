//! Query intent detection
//!
//! Greetings and thanks are answered with fixed replies so the expensive
//! knowledge retrieval is never invoked for small talk.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static GREETING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bhello\b",
        r"\bhi\b",
        r"\bhey\b",
        r"\bgood morning\b",
        r"\bgood afternoon\b",
        r"\bgood evening\b",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){}", pattern)).expect("invalid greeting pattern"))
    .collect()
});

static THANKS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\bthank you\b", r"\bthanks\b", r"\bthx\b", r"\bthankyou\b"]
        .iter()
        .map(|pattern| Regex::new(&format!("(?i){}", pattern)).expect("invalid thanks pattern"))
        .collect()
});

pub const GREETING_REPLY: &str = "Hello! How can I assist you about PCCoE today?";
pub const THANKS_REPLY: &str =
    "You're welcome! If you have more questions about PCCoE, feel free to ask.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    Greeting,
    Thanks,
    /// Needs the knowledge retriever.
    Knowledge,
}

impl QueryIntent {
    /// Case-insensitive word-boundary search; surrounding words do not
    /// defeat a match. Greeting is evaluated first, so it wins if the
    /// vocabularies ever overlap.
    pub fn classify(query: &str) -> Self {
        if GREETING_PATTERNS.iter().any(|pattern| pattern.is_match(query)) {
            debug!("Detected greeting intent");
            return Self::Greeting;
        }

        if THANKS_PATTERNS.iter().any(|pattern| pattern.is_match(query)) {
            debug!("Detected thanks intent");
            return Self::Thanks;
        }

        Self::Knowledge
    }

    pub fn canned_reply(self) -> Option<&'static str> {
        match self {
            Self::Greeting => Some(GREETING_REPLY),
            Self::Thanks => Some(THANKS_REPLY),
            Self::Knowledge => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_detection() {
        assert_eq!(QueryIntent::classify("Hello there"), QueryIntent::Greeting);
        assert_eq!(QueryIntent::classify("hey, quick question"), QueryIntent::Greeting);
        assert_eq!(QueryIntent::classify("GOOD MORNING"), QueryIntent::Greeting);
    }

    #[test]
    fn test_thanks_detection() {
        assert_eq!(QueryIntent::classify("thanks!"), QueryIntent::Thanks);
        assert_eq!(QueryIntent::classify("Thank you so much"), QueryIntent::Thanks);
        assert_eq!(QueryIntent::classify("thx"), QueryIntent::Thanks);
        assert_eq!(QueryIntent::classify("thankyou"), QueryIntent::Thanks);
    }

    #[test]
    fn test_greeting_wins_when_both_match() {
        assert_eq!(
            QueryIntent::classify("hi, thanks a lot"),
            QueryIntent::Greeting
        );
    }

    #[test]
    fn test_word_boundaries_are_respected() {
        // "hi" inside "highway" and "history" must not match.
        assert_eq!(
            QueryIntent::classify("is the highway nearby?"),
            QueryIntent::Knowledge
        );
        assert_eq!(
            QueryIntent::classify("tell me the history of the college"),
            QueryIntent::Knowledge
        );
    }

    #[test]
    fn test_knowledge_questions_fall_through() {
        assert_eq!(
            QueryIntent::classify("What programs does the college offer?"),
            QueryIntent::Knowledge
        );
        assert_eq!(QueryIntent::classify(""), QueryIntent::Knowledge);
    }

    #[test]
    fn test_canned_replies() {
        assert_eq!(
            QueryIntent::Greeting.canned_reply(),
            Some(GREETING_REPLY)
        );
        assert_eq!(QueryIntent::Thanks.canned_reply(), Some(THANKS_REPLY));
        assert!(QueryIntent::Knowledge.canned_reply().is_none());
    }
}
