//! Phrase lexicon used by the heuristic classifiers.
//!
//! Phrases are matched on normalized text: lowercase, punctuation turned into
//! spaces, whitespace collapsed, and matched on word boundaries. So
//! `"follow-up call"` matches `"Let's book a follow up call!"`.
//!
//! The lexicon is data, not code: it carries a `version` and can be replaced
//! wholesale from configuration.

use serde::{Deserialize, Serialize};

/// Kind of concrete next step a commitment refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStepKind {
    Scheduling,
    Materials,
    Pilot,
    Introduction,
}

/// Commitment phrases grouped by the next step they promise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitmentPhrases {
    pub kind: NextStepKind,
    pub phrases: Vec<String>,
}

/// Versioned phrase sets for commitment, disinterest, validation requests,
/// closure, and proposal/acknowledgment detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub version: String,
    pub commitment: Vec<CommitmentPhrases>,
    pub disinterest: Vec<String>,
    pub validation_request: Vec<String>,
    pub closure: Vec<String>,
    pub proposal: Vec<String>,
    pub acknowledgment: Vec<String>,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            version: "2024.1".to_string(),
            commitment: vec![
                CommitmentPhrases {
                    kind: NextStepKind::Scheduling,
                    phrases: phrases(&[
                        "schedule a follow-up call",
                        "schedule a call",
                        "schedule a meeting",
                        "follow-up call",
                        "book a call",
                        "book a meeting",
                        "set up a call",
                        "set up a meeting",
                        "send a calendar invite",
                        "calendar invite",
                    ]),
                },
                CommitmentPhrases {
                    kind: NextStepKind::Materials,
                    phrases: phrases(&[
                        "send over the deck",
                        "send the deck",
                        "share the deck",
                        "share materials",
                        "share the materials",
                        "send a proposal",
                        "send the proposal",
                        "share our data room",
                        "send over materials",
                    ]),
                },
                CommitmentPhrases {
                    kind: NextStepKind::Pilot,
                    phrases: phrases(&[
                        "run a pilot",
                        "start a pilot",
                        "launch a pilot",
                        "proof of concept",
                        "paid trial",
                        "pilot program",
                    ]),
                },
                CommitmentPhrases {
                    kind: NextStepKind::Introduction,
                    phrases: phrases(&[
                        "introduce you to",
                        "make an introduction",
                        "make the introduction",
                        "intro to",
                        "connect you with",
                    ]),
                },
            ],
            disinterest: phrases(&[
                "not interested",
                "no longer interested",
                "not a fit",
                "not the right fit",
                "not a good fit",
                "doesn't seem like the right fit",
                "not aligned with our",
                "outside our budget",
                "beyond our budget",
                "incompatible timeline",
                "not investing in this sector",
                "we will pass",
                "we'll pass",
                "pass on this",
            ]),
            validation_request: phrases(&[
                "more information",
                "more detail",
                "more details",
                "technical detail",
                "technical details",
                "references",
                "case studies",
                "clarify the budget",
                "budget breakdown",
                "confirm the timeline",
                "timeline for",
                "validate",
                "due diligence",
            ]),
            closure: phrases(&[
                "looking forward",
                "talk soon",
                "see you then",
                "speak soon",
                "confirmed",
            ]),
            proposal: phrases(&[
                "can we schedule",
                "could we schedule",
                "shall we schedule",
                "let's schedule",
                "schedule a demo",
                "book a demo",
                "set up a demo",
                "arrange a meeting",
                "arrange a call",
                "are you free on",
                "are you available on",
                "would you be open to a",
                "send you a contract",
                "draft a term sheet",
            ]),
            acknowledgment: phrases(&[
                "let's",
                "lets",
                "i will",
                "i'll",
                "we will",
                "we'll",
                "confirm",
                "confirmed",
                "works",
                "sounds good",
                "ok",
                "okay",
                "great",
                "looking forward",
                "see you",
            ]),
        }
    }
}

/// Normalize text for phrase matching.
///
/// Lowercases, maps every character that is not alphanumeric or an
/// apostrophe to a space, collapses whitespace, and pads with one space on
/// each side so that `contains(" phrase ")` is a word-boundary match.
pub fn normalize(text: &str) -> String {
    let cleaned = text
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\'' => '\'',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        })
        .collect::<String>()
        .to_lowercase();
    format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn contains_normalized(normalized_text: &str, phrase: &str) -> bool {
    let needle = normalize(phrase);
    if needle.trim().is_empty() {
        return false;
    }
    normalized_text.contains(&needle)
}

fn count_hits(text: &str, list: &[String]) -> usize {
    let normalized = normalize(text);
    list.iter()
        .filter(|p| contains_normalized(&normalized, p))
        .count()
}

fn any_hit(text: &str, list: &[String]) -> bool {
    count_hits(text, list) > 0
}

impl Lexicon {
    pub fn has_disinterest(&self, text: &str) -> bool {
        any_hit(text, &self.disinterest)
    }

    pub fn disinterest_hits(&self, text: &str) -> usize {
        count_hits(text, &self.disinterest)
    }

    /// Next-step kinds a message commits to (sorted, deduplicated)
    pub fn commitment_kinds(&self, text: &str) -> Vec<NextStepKind> {
        let normalized = normalize(text);
        let mut kinds: Vec<NextStepKind> = self
            .commitment
            .iter()
            .filter(|group| {
                group
                    .phrases
                    .iter()
                    .any(|p| contains_normalized(&normalized, p))
            })
            .map(|group| group.kind)
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub fn has_commitment(&self, text: &str) -> bool {
        !self.commitment_kinds(text).is_empty()
    }

    /// Commitments in a message, at most one per next-step kind
    pub fn commitment_hits(&self, text: &str) -> usize {
        self.commitment_kinds(text).len()
    }

    pub fn requests_validation(&self, text: &str) -> bool {
        any_hit(text, &self.validation_request)
    }

    pub fn validation_hits(&self, text: &str) -> usize {
        count_hits(text, &self.validation_request)
    }

    /// Explicit closing signal: a commitment or a closure phrase
    pub fn has_closing_signal(&self, text: &str) -> bool {
        self.has_commitment(text) || any_hit(text, &self.closure)
    }

    /// Concrete next-step proposal: a commitment phrase or an explicit
    /// request from the proposal list. Bare words like "meet" never qualify.
    pub fn has_proposal(&self, text: &str) -> bool {
        self.has_commitment(text) || any_hit(text, &self.proposal)
    }

    pub fn has_acknowledgment(&self, text: &str) -> bool {
        any_hit(text, &self.acknowledgment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Let's book a Follow-Up call!"), " let's book a follow up call ");
        assert_eq!(normalize("We\u{2019}ll pass."), " we'll pass ");
        assert_eq!(normalize(""), "  ");
    }

    #[test]
    fn test_word_boundary_matching() {
        let lex = Lexicon::default();
        // "ok" must not match inside "look"
        assert!(!lex.has_acknowledgment("I look at the numbers"));
        assert!(lex.has_acknowledgment("OK, that works for me"));
    }

    #[test]
    fn test_disinterest() {
        let lex = Lexicon::default();
        assert!(lex.has_disinterest("Honestly we are not interested at this stage."));
        assert!(lex.has_disinterest("That is outside our budget."));
        assert!(!lex.has_disinterest("We are very interested in your pilot."));
    }

    #[test]
    fn test_commitment_kinds() {
        let lex = Lexicon::default();
        assert_eq!(
            lex.commitment_kinds("Great, let's schedule a follow-up call next week."),
            vec![NextStepKind::Scheduling]
        );
        assert_eq!(
            lex.commitment_kinds("I'll send the deck and we can run a pilot."),
            vec![NextStepKind::Materials, NextStepKind::Pilot]
        );
        assert!(lex.commitment_kinds("Thanks for your time.").is_empty());
    }

    #[test]
    fn test_commitment_hits_one_per_kind() {
        let lex = Lexicon::default();
        // "schedule a follow-up call" also contains "follow-up call"
        assert_eq!(lex.commitment_hits("Let's schedule a follow-up call"), 1);
        assert_eq!(
            lex.commitment_hits("Let's book a call, and I'll send the deck before it."),
            2
        );
        assert_eq!(lex.commitment_hits("Nice to meet you."), 0);
    }

    #[test]
    fn test_proposal_requires_concrete_request() {
        let lex = Lexicon::default();
        assert!(!lex.has_proposal("Hi, nice to meet you."));
        assert!(!lex.has_proposal("Thanks for the call, happy to share more about us."));
        assert!(lex.has_proposal("Could we schedule a demo next week?"));
        assert!(lex.has_proposal("I'll send the deck tonight."));
    }

    #[test]
    fn test_validation_and_closure() {
        let lex = Lexicon::default();
        assert!(lex.requests_validation("Could you share some references first?"));
        assert!(lex.has_closing_signal("Looking forward to it."));
        assert!(!lex.has_closing_signal("What is your burn rate?"));
    }

    #[test]
    fn test_empty_phrase_never_matches() {
        let lex = Lexicon {
            disinterest: vec!["  ".to_string()],
            ..Lexicon::default()
        };
        assert!(!lex.has_disinterest("anything at all"));
    }

    #[test]
    fn test_lexicon_partial_override_keeps_defaults() {
        let lex: Lexicon = serde_json::from_str(r#"{"version": "custom", "disinterest": ["hard no"]}"#).unwrap();
        assert_eq!(lex.version, "custom");
        assert!(lex.has_disinterest("That's a hard no."));
        assert!(lex.has_commitment("Let's book a call"));
    }
}
