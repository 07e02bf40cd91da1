//! The front agent turn driver.
//!
//! Answers allow-listed utterances directly and hands everything else to the
//! supervisor through [`SupervisorHandoff`], speaking one filler first and
//! relaying the answer verbatim. The transcript it keeps is the history the
//! supervisor sees.

use avatarline_config::FrontConfig;
use avatarline_core::item::ConversationItem;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::citations;
use crate::delegation::Observer;
use crate::policy::{
    FrontAgentPolicy, Intent, PolicyState, TurnRecord, Utterance, UtteranceKind,
};
use crate::prompts::{self, FILLER_PHRASES};
use crate::supervisor_tool::{SupervisorHandoff, SupervisorToolInput, TOOL_NAME};

pub const ESCALATION_UTTERANCE: &str = "I'm sorry, I'm having trouble getting that information right now. Would you like me to connect you with one of our AI consultants?";
pub const BUSINESS_CONTEXT_QUESTION: &str =
    "That's a great question. What industry is your business in?";
const NOTHING_TO_REPEAT: &str = "Sorry, what would you like me to repeat?";
const SHORT_GREETINGS: &[&str] = &["Hello!", "Hi there!", "Hello again!"];
/// Items kept per transcript; older ones are dropped first.
pub const MAX_TRANSCRIPT_ITEMS: usize = 200;

/// Picks filler phrases at random, never the same one twice in a row.
#[derive(Debug, Default)]
pub struct FillerRotation {
    last: Option<usize>,
}

impl FillerRotation {
    pub fn next_phrase(&mut self) -> &'static str {
        let choices: Vec<usize> = (0..FILLER_PHRASES.len())
            .filter(|i| Some(*i) != self.last)
            .collect();
        let index = choices.choose(&mut rand::rng()).copied().unwrap_or(0);
        self.last = Some(index);
        FILLER_PHRASES[index]
    }
}

pub struct FrontAgent {
    handoff: SupervisorHandoff,
    policy: FrontAgentPolicy,
    introduction: String,
    transcript: Vec<ConversationItem>,
    state: PolicyState,
    fillers: FillerRotation,
    greeted: bool,
    last_answer: Option<String>,
    transcript_limit: usize,
}

impl FrontAgent {
    pub fn new(handoff: SupervisorHandoff, front: &FrontConfig) -> Self {
        Self {
            handoff,
            policy: FrontAgentPolicy::new(&front.company_name),
            introduction: prompts::introduction(front),
            transcript: Vec::new(),
            state: PolicyState::default(),
            fillers: FillerRotation::default(),
            greeted: false,
            last_answer: None,
            transcript_limit: MAX_TRANSCRIPT_ITEMS,
        }
    }

    pub fn transcript(&self) -> &[ConversationItem] {
        &self.transcript
    }

    pub fn state(&self) -> &PolicyState {
        &self.state
    }

    /// Run one turn. `relevant_context` is what to tell the supervisor about
    /// this utterance; the utterance itself is used when absent.
    pub async fn respond(&mut self, utterance: &str, relevant_context: Option<&str>) -> TurnRecord {
        self.respond_observed(utterance, relevant_context, None).await
    }

    pub async fn respond_observed(
        &mut self,
        utterance: &str,
        relevant_context: Option<&str>,
        observer: Option<&Observer<'_>>,
    ) -> TurnRecord {
        self.remember(ConversationItem::user(utterance));
        let intent = self.policy.classify(utterance, &self.state);
        info!(?intent, "Front agent turn");

        let record = match intent {
            Intent::Greeting => {
                let text = if self.greeted {
                    short_greeting()
                } else {
                    self.greeted = true;
                    self.introduction.clone()
                };
                self.direct(intent, text)
            }
            Intent::Chitchat => self.direct(intent, chitchat_reply(utterance)),
            Intent::RepeatRequest => {
                let text = if self.state.pending_interest.is_some() {
                    BUSINESS_CONTEXT_QUESTION.to_string()
                } else {
                    self.last_answer
                        .clone()
                        .unwrap_or_else(|| NOTHING_TO_REPEAT.to_string())
                };
                self.direct(intent, text)
            }
            Intent::CollectingParameters => {
                self.state.pending_interest = Some(utterance.trim().to_string());
                self.direct(intent, BUSINESS_CONTEXT_QUESTION.to_string())
            }
            Intent::Delegate => {
                let context = self.delegation_context(utterance, relevant_context);
                self.delegate(context, observer).await
            }
        };

        debug_assert!(FrontAgentPolicy::verify(&record).is_ok());
        record
    }

    fn delegation_context(&mut self, utterance: &str, relevant_context: Option<&str>) -> String {
        if self.policy.mentions_business_context(utterance) {
            self.state.business_context_known = true;
        }
        match self.state.pending_interest.take() {
            Some(interest) => {
                self.state.business_context_known = true;
                format!("{interest}; business context: {}", utterance.trim())
            }
            None => relevant_context
                .map(str::to_string)
                .unwrap_or_else(|| utterance.trim().to_string()),
        }
    }

    async fn delegate(&mut self, context: String, observer: Option<&Observer<'_>>) -> TurnRecord {
        let mut utterances = Vec::with_capacity(2);

        let filler = self.fillers.next_phrase();
        self.say(&mut utterances, UtteranceKind::Filler, filler.to_string());

        let input = SupervisorToolInput::new(context);
        let call_id = format!("call_{}", uuid::Uuid::new_v4().simple());
        let arguments = serde_json::to_string(&input).unwrap_or_default();
        self.remember(ConversationItem::function_call(&call_id, TOOL_NAME, arguments));

        let output = self.handoff.invoke(&self.transcript, &input, observer).await;
        let output_json = serde_json::to_string(&output).unwrap_or_default();
        self.remember(ConversationItem::function_call_output(&call_id, output_json));

        match output.next_response() {
            Some(answer) => {
                let sources = citations::extract(answer);
                debug!(citations = sources.len(), "Relaying supervisor answer");
                self.last_answer = Some(answer.to_string());
                self.say(&mut utterances, UtteranceKind::Relay, answer.to_string());
            }
            None => {
                self.say(
                    &mut utterances,
                    UtteranceKind::Escalation,
                    ESCALATION_UTTERANCE.to_string(),
                );
            }
        }

        TurnRecord {
            intent: Intent::Delegate,
            utterances,
            delegated: true,
        }
    }

    fn direct(&mut self, intent: Intent, text: String) -> TurnRecord {
        let mut utterances = Vec::with_capacity(1);
        self.say(&mut utterances, UtteranceKind::Direct, text);
        TurnRecord {
            intent,
            utterances,
            delegated: false,
        }
    }

    fn say(&mut self, utterances: &mut Vec<Utterance>, kind: UtteranceKind, text: String) {
        self.remember(ConversationItem::assistant(&text));
        utterances.push(Utterance::new(kind, text));
    }

    fn remember(&mut self, item: ConversationItem) {
        self.transcript.push(item);
        let excess = self.transcript.len().saturating_sub(self.transcript_limit);
        if excess > 0 {
            self.transcript.drain(..excess);
        }
    }
}

fn short_greeting() -> String {
    SHORT_GREETINGS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("Hello!")
        .to_string()
}

fn chitchat_reply(utterance: &str) -> String {
    let text = utterance.to_lowercase();
    let reply = if text.contains("thank") || text.contains("helpful") {
        "You're welcome! Is there anything else I can help you with today?"
    } else if text.contains("how are") || text.contains("how's it") || text.contains("how is it") {
        "I'm doing well, thanks for asking. How can I help you with your AI needs?"
    } else if text.contains("bye") || text.contains("see you") {
        "Thanks for chatting with us. Have a great day!"
    } else {
        "Is there anything else you'd like to know?"
    };
    reply.to_string()
}
