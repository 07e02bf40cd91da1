//! Front agent policy: what the front agent may answer on its own, and the
//! contract every turn must satisfy.
//!
//! The allow-list is greetings, chitchat, repeat requests, and collecting the
//! caller's business context. Anything else is delegated to the supervisor,
//! always preceded by exactly one filler utterance.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "hi there",
    "hello there",
    "hey there",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "howdy",
];

const CHITCHAT: &[&str] = &[
    "how are you",
    "how are you doing",
    "how's it going",
    "how is it going",
    "thank you",
    "thank you so much",
    "thanks",
    "thanks a lot",
    "that's helpful",
    "thanks that's helpful",
    "ok",
    "okay",
    "cool",
    "great",
    "bye",
    "goodbye",
    "see you",
];

const REPEAT_REQUESTS: &[&str] = &[
    "repeat",
    "repeat that",
    "please repeat that",
    "can you repeat that",
    "could you repeat that",
    "say that again",
    "can you say that again",
    "could you say that again",
    "come again",
    "pardon",
    "pardon me",
    "sorry what",
    "what did you say",
];

/// How the front agent handles one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Chitchat,
    RepeatRequest,
    CollectingParameters,
    Delegate,
}

impl Intent {
    /// Whether the front agent may answer without delegating.
    pub fn is_allow_listed(self) -> bool {
        !matches!(self, Intent::Delegate)
    }
}

/// Per-session facts the classifier depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyState {
    /// The caller's business context is already on record
    pub business_context_known: bool,
    /// An interest statement waiting for its business context
    pub pending_interest: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtteranceKind {
    /// Said by the front agent on its own authority
    Direct,
    Filler,
    /// The supervisor's answer, read verbatim
    Relay,
    /// Spoken instead of an answer when delegation failed
    Escalation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub kind: UtteranceKind,
    pub text: String,
}

impl Utterance {
    pub fn new(kind: UtteranceKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Everything the front agent did in one turn, in speaking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub intent: Intent,
    pub utterances: Vec<Utterance>,
    pub delegated: bool,
}

impl TurnRecord {
    pub fn fillers(&self) -> usize {
        self.utterances
            .iter()
            .filter(|u| u.kind == UtteranceKind::Filler)
            .count()
    }

    /// The utterances' text, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.utterances.iter().map(|u| u.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("non-allow-listed turn answered without delegating")]
    SkippedDelegation,

    #[error("delegated without a filler utterance")]
    MissingFiller,

    #[error("delegated with {count} filler utterances, expected exactly one")]
    ExtraFillers { count: usize },

    #[error("filler spoken after other utterances")]
    FillerOutOfOrder,

    #[error("filler spoken on a turn that did not delegate")]
    UnexpectedFiller,
}

pub struct FrontAgentPolicy {
    interest: Regex,
    business_context: Regex,
    company: String,
}

impl FrontAgentPolicy {
    pub fn new(company_name: &str) -> Self {
        let interest = Regex::new(
            r"^(i'm|im|i am|we're|were|we are)( just| really)? (wondering|curious|interested|thinking|looking into|exploring)\b|^(i|we)( would|'d)? (like|want) to (know|learn|understand|explore) (how|whether|if|what)\b",
        )
        .unwrap_or_else(|e| panic!("interest pattern: {e}"));
        let business_context = Regex::new(
            r"\b(retail|e-commerce|ecommerce|online store|healthcare|hospital|clinic|bank|banking|finance|financial|insurance|manufacturing|factory|logistics|supply chain|shipping|education|school|university|software|saas|restaurant|hospitality|hotel|real estate|law firm|legal|consulting|agency|industry)\b",
        )
        .unwrap_or_else(|e| panic!("business context pattern: {e}"));

        Self {
            interest,
            business_context,
            company: normalize(company_name),
        }
    }

    /// Classify one user utterance.
    pub fn classify(&self, utterance: &str, state: &PolicyState) -> Intent {
        let text = normalize(utterance);
        // A repeat request never answers the pending industry question
        if REPEAT_REQUESTS.contains(&text.as_str()) {
            return Intent::RepeatRequest;
        }
        if state.pending_interest.is_some() {
            return Intent::Delegate;
        }

        if GREETINGS.contains(&text.as_str()) {
            return Intent::Greeting;
        }
        if CHITCHAT.contains(&text.as_str()) {
            return Intent::Chitchat;
        }

        if !state.business_context_known
            && self.is_open_interest(&text)
            && !self.mentions_business_context(utterance)
        {
            return Intent::CollectingParameters;
        }

        Intent::Delegate
    }

    /// An open statement of interest in AI that is not itself a question
    /// about the company.
    fn is_open_interest(&self, normalized: &str) -> bool {
        if !self.interest.is_match(normalized) {
            return false;
        }
        let about_company = (!self.company.is_empty() && normalized.contains(&self.company))
            || normalized.split(' ').any(|w| matches!(w, "you" | "your" | "yours"));
        !about_company
    }

    /// Whether the utterance names an industry or business domain.
    pub fn mentions_business_context(&self, utterance: &str) -> bool {
        self.business_context.is_match(&normalize(utterance))
    }

    /// Check a finished turn against the front-agent contract.
    pub fn verify(record: &TurnRecord) -> Result<(), PolicyViolation> {
        let fillers = record.fillers();

        if !record.delegated {
            if record.intent == Intent::Delegate {
                return Err(PolicyViolation::SkippedDelegation);
            }
            if fillers > 0 {
                return Err(PolicyViolation::UnexpectedFiller);
            }
            return Ok(());
        }

        match fillers {
            0 => Err(PolicyViolation::MissingFiller),
            1 if record.utterances[0].kind != UtteranceKind::Filler => {
                Err(PolicyViolation::FillerOutOfOrder)
            }
            1 => Ok(()),
            count => Err(PolicyViolation::ExtraFillers { count }),
        }
    }
}

/// Lowercase, drop punctuation other than apostrophes, collapse whitespace.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace('’', "'")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> FrontAgentPolicy {
        FrontAgentPolicy::new("Cocoa AI")
    }

    fn classify(text: &str) -> Intent {
        policy().classify(text, &PolicyState::default())
    }

    #[test]
    fn greetings_and_chitchat_are_allow_listed() {
        assert_eq!(classify("Hi"), Intent::Greeting);
        assert_eq!(classify("Hello there!"), Intent::Greeting);
        assert_eq!(classify("Good morning."), Intent::Greeting);
        assert_eq!(classify("How are you?"), Intent::Chitchat);
        assert_eq!(classify("Thanks, that's helpful!"), Intent::Chitchat);
        assert_eq!(classify("Can you repeat that?"), Intent::RepeatRequest);
        assert_eq!(classify("Pardon?"), Intent::RepeatRequest);
    }

    #[test]
    fn factual_questions_are_delegated() {
        assert_eq!(
            classify("What AI solutions does Cocoa AI offer for customer service?"),
            Intent::Delegate
        );
        assert_eq!(classify("How long does implementation take?"), Intent::Delegate);
        assert_eq!(classify("What's the price?"), Intent::Delegate);
        // A greeting with a question attached is not a bare greeting
        assert_eq!(classify("Hi, what do you sell?"), Intent::Delegate);
    }

    #[test]
    fn open_interest_collects_business_context() {
        assert_eq!(
            classify("I'm wondering how AI could help streamline our customer service"),
            Intent::CollectingParameters
        );
        assert_eq!(
            classify("We're interested in automating our back office"),
            Intent::CollectingParameters
        );
    }

    #[test]
    fn interest_with_industry_goes_straight_to_supervisor() {
        assert_eq!(
            classify("We're a retail business interested in chatbots"),
            Intent::Delegate
        );
        assert_eq!(
            classify("I'm wondering how AI could help our hospital"),
            Intent::Delegate
        );
    }

    #[test]
    fn interest_about_the_company_is_delegated() {
        assert_eq!(
            classify("I'm curious what Cocoa AI does"),
            Intent::Delegate
        );
        assert_eq!(classify("I'm wondering what you offer"), Intent::Delegate);
    }

    #[test]
    fn known_context_skips_collection() {
        let state = PolicyState {
            business_context_known: true,
            pending_interest: None,
        };
        assert_eq!(
            policy().classify("I'm wondering how AI could help with scheduling", &state),
            Intent::Delegate
        );
    }

    #[test]
    fn reply_to_collection_is_always_delegated() {
        let state = PolicyState {
            business_context_known: false,
            pending_interest: Some("customer service".into()),
        };
        assert_eq!(policy().classify("hi", &state), Intent::Delegate);
        assert_eq!(policy().classify("We're in retail", &state), Intent::Delegate);
    }

    #[test]
    fn repeat_request_during_collection_is_answered_directly() {
        let state = PolicyState {
            business_context_known: false,
            pending_interest: Some("customer service".into()),
        };
        assert_eq!(policy().classify("Pardon?", &state), Intent::RepeatRequest);
        assert_eq!(policy().classify("Can you repeat that?", &state), Intent::RepeatRequest);
        assert_eq!(policy().classify("We sell shoes", &state), Intent::Delegate);
    }

    #[test]
    fn only_delegate_leaves_the_allow_list() {
        assert!(Intent::Greeting.is_allow_listed());
        assert!(Intent::CollectingParameters.is_allow_listed());
        assert!(!Intent::Delegate.is_allow_listed());
    }

    fn record(intent: Intent, kinds: &[UtteranceKind], delegated: bool) -> TurnRecord {
        TurnRecord {
            intent,
            utterances: kinds.iter().map(|k| Utterance::new(*k, "x")).collect(),
            delegated,
        }
    }

    #[test]
    fn verify_accepts_well_formed_turns() {
        use UtteranceKind::*;
        assert!(FrontAgentPolicy::verify(&record(Intent::Delegate, &[Filler, Relay], true)).is_ok());
        assert!(FrontAgentPolicy::verify(&record(Intent::Delegate, &[Filler, Escalation], true)).is_ok());
        assert!(FrontAgentPolicy::verify(&record(Intent::Greeting, &[Direct], false)).is_ok());
    }

    #[test]
    fn verify_rejects_contract_breaches() {
        use UtteranceKind::*;
        assert_eq!(
            FrontAgentPolicy::verify(&record(Intent::Delegate, &[Direct], false)),
            Err(PolicyViolation::SkippedDelegation)
        );
        assert_eq!(
            FrontAgentPolicy::verify(&record(Intent::Delegate, &[Relay], true)),
            Err(PolicyViolation::MissingFiller)
        );
        assert_eq!(
            FrontAgentPolicy::verify(&record(Intent::Delegate, &[Filler, Filler, Relay], true)),
            Err(PolicyViolation::ExtraFillers { count: 2 })
        );
        assert_eq!(
            FrontAgentPolicy::verify(&record(Intent::Delegate, &[Relay, Filler], true)),
            Err(PolicyViolation::FillerOutOfOrder)
        );
        assert_eq!(
            FrontAgentPolicy::verify(&record(Intent::Chitchat, &[Filler, Direct], false)),
            Err(PolicyViolation::UnexpectedFiller)
        );
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize("  Hello,   THERE!! "), "hello there");
        assert_eq!(normalize("I’m wondering..."), "i'm wondering");
    }
}
