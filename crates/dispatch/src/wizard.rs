//! The question/answer state machine used when an operation needs
//! parameters that were not in the original utterance.
//!
//! A wizard walks its questions in order and never goes back. Candidate
//! answers are fetched lazily when a question is asked, with the parameters
//! accumulated so far, so a later question can depend on an earlier answer.
//! One rejected answer aborts the whole wizard.

use std::collections::BTreeMap;

use async_trait::async_trait;

use stratus_protocol::ResponseItem;

use crate::context::ExecContext;
use crate::error::{DispatchError, Result};

/// Legal answers for a question, produced when the question is asked.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    async fn candidates(
        &self,
        ctx: &ExecContext,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<String>>;
}

/// A fixed candidate list, known at wizard construction time.
pub struct FixedCandidates(pub Vec<String>);

impl FixedCandidates {
    pub fn of(values: &[&str]) -> Self {
        Self(values.iter().map(|v| (*v).to_string()).collect())
    }
}

#[async_trait]
impl CandidateProvider for FixedCandidates {
    async fn candidates(
        &self,
        _ctx: &ExecContext,
        _params: &BTreeMap<String, String>,
    ) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// How an answer is checked against the candidates, and how the candidates
/// show up in the rendered prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerRule {
    /// The answer must equal one of the candidates (case-insensitive); the
    /// prompt lists them.
    OneOf,
    /// Any non-empty answer is accepted; the prompt shows no candidate
    /// list.
    FreeForm,
}

impl AnswerRule {
    /// Accepted value for `answer`, or `None` when rejected. `OneOf`
    /// answers are canonicalized to the matching candidate's spelling.
    fn validate(self, answer: &str, candidates: &[String]) -> Option<String> {
        match self {
            AnswerRule::OneOf => candidates
                .iter()
                .find(|c| c.eq_ignore_ascii_case(answer))
                .cloned(),
            AnswerRule::FreeForm => {
                if answer.is_empty() {
                    None
                } else {
                    Some(answer.to_string())
                }
            }
        }
    }

    fn render(self, prompt: &str, candidates: &[String]) -> String {
        match self {
            AnswerRule::OneOf => format!("{prompt} [{}]", candidates.join(", ")),
            AnswerRule::FreeForm => prompt.to_string(),
        }
    }
}

/// One question: prompt, candidate provider, validation rule and a
/// set-once answer slot.
pub struct Qa {
    prompt: String,
    provider: Box<dyn CandidateProvider>,
    rule: AnswerRule,
    answer: Option<String>,
}

impl Qa {
    pub fn new(prompt: impl Into<String>, rule: AnswerRule, provider: Box<dyn CandidateProvider>) -> Self {
        Self {
            prompt: prompt.into(),
            provider,
            rule,
            answer: None,
        }
    }

    pub fn one_of(prompt: impl Into<String>, provider: Box<dyn CandidateProvider>) -> Self {
        Self::new(prompt, AnswerRule::OneOf, provider)
    }

    pub fn free_form(prompt: impl Into<String>) -> Self {
        Self::new(prompt, AnswerRule::FreeForm, Box::new(FixedCandidates(Vec::new())))
    }
}

/// What the owning operation does once every question is answered.
#[async_trait]
pub trait WizardFinish: Send + Sync {
    async fn finish(
        &self,
        ctx: &ExecContext,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<ResponseItem>>;
}

/// Result of one [`Wizard::advance`] call.
#[derive(Debug, PartialEq)]
pub enum WizardStep {
    /// Ask the user this and wait for their next message.
    Prompt(String),
    /// All questions answered; the operation completed.
    Finished(Vec<ResponseItem>),
    /// An answer was rejected; the wizard is dead.
    Aborted(String),
}

impl WizardStep {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WizardStep::Prompt(_))
    }
}

/// Ordered questions plus the parameter map they fill in.
pub struct Wizard {
    questions: Vec<(String, Qa)>,
    parameters: BTreeMap<String, String>,
    seeds: BTreeMap<String, String>,
    bad_end: String,
    finish: Box<dyn WizardFinish>,
}

impl Wizard {
    pub fn new(
        questions: Vec<(&str, Qa)>,
        bad_end: impl Into<String>,
        finish: Box<dyn WizardFinish>,
    ) -> Self {
        Self {
            questions: questions
                .into_iter()
                .map(|(key, qa)| (key.to_string(), qa))
                .collect(),
            parameters: BTreeMap::new(),
            seeds: BTreeMap::new(),
            bad_end: bad_end.into(),
            finish,
        }
    }

    /// Pre-supplied answers (from wire-token parameters). Consumed exactly
    /// like user input when their question comes up, validation included.
    #[must_use]
    pub fn with_seeds(mut self, seeds: BTreeMap<String, String>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Drive the wizard one step.
    ///
    /// With `input` absent, renders the current question's prompt. With
    /// input present, validates it against the current question; acceptance
    /// stores the answer and moves on (skipping seeded questions in the
    /// same call), rejection kills the wizard.
    pub async fn advance(&mut self, ctx: &ExecContext, input: Option<&str>) -> Result<WizardStep> {
        if ctx.token().is_none() {
            return Err(DispatchError::MissingToken);
        }

        let mut input = input
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        loop {
            let Some((key, qa)) = self
                .questions
                .iter_mut()
                .find(|(_, qa)| qa.answer.is_none())
            else {
                log::debug!("wizard finished with parameters {:?}", self.parameters);
                let items = self.finish.finish(ctx, &self.parameters).await?;
                return Ok(WizardStep::Finished(items));
            };

            let candidates = qa.provider.candidates(ctx, &self.parameters).await?;

            let answer = match self.seeds.remove(key.as_str()).or_else(|| input.take()) {
                Some(answer) => answer,
                None => return Ok(WizardStep::Prompt(qa.rule.render(&qa.prompt, &candidates))),
            };

            match qa.rule.validate(&answer, &candidates) {
                Some(value) => {
                    qa.answer = Some(value.clone());
                    self.parameters.insert(key.clone(), value);
                }
                None => {
                    log::info!("wizard aborted: {answer:?} rejected for {key:?}");
                    return Ok(WizardStep::Aborted(self.bad_end.clone()));
                }
            }
        }
    }
}
