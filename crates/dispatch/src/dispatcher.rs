//! The per-turn routing brain: resume a paused wizard, or classify the
//! utterance and run the operation it names.

use std::sync::Arc;

use stratus_backend::{BackendError, CloudClient};
use stratus_protocol::{OperationToken, ResponseItem, WIRE_PREFIX};
use stratus_resolver::EntityResolver;

use crate::classifier::IntentClassifier;
use crate::context::ExecContext;
use crate::error::{DispatchError, Result};
use crate::operation::{OperationRegistry, Outcome};
use crate::session::SessionStore;
use crate::wizard::{Wizard, WizardStep};

/// Owns the registry, the session store and the collaborator handles; one
/// instance serves every request.
pub struct Dispatcher {
    registry: OperationRegistry,
    classifier: Box<dyn IntentClassifier>,
    sessions: SessionStore,
    client: Arc<CloudClient>,
    resolver: Arc<EntityResolver>,
}

impl Dispatcher {
    pub fn new(
        registry: OperationRegistry,
        classifier: Box<dyn IntentClassifier>,
        sessions: SessionStore,
        client: Arc<CloudClient>,
        resolver: Arc<EntityResolver>,
    ) -> Self {
        Self {
            registry,
            classifier,
            sessions,
            client,
            resolver,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Answer one caller turn.
    ///
    /// Backend API failures come back as normal text replies (the user can
    /// simply retry); `InvalidToken`, a missing wizard token, and
    /// registry/classifier mismatches propagate for the transport layer to
    /// turn into their HTTP statuses.
    pub async fn respond(
        &self,
        utterance: &str,
        token: Option<&str>,
    ) -> Result<Vec<ResponseItem>> {
        match self.try_respond(utterance, token).await {
            Ok(items) => Ok(items),
            Err(DispatchError::Backend(BackendError::Api { message, .. })) => {
                Ok(vec![ResponseItem::text(message)])
            }
            Err(DispatchError::Backend(err @ BackendError::Transport(_)))
            | Err(DispatchError::Backend(err @ BackendError::Decode(_))) => {
                log::error!("backend call failed: {err}");
                Ok(vec![ResponseItem::text(
                    "Sorry, something went wrong while talking to the backend. \
                     Please try again.",
                )])
            }
            Err(err) => Err(err),
        }
    }

    async fn try_respond(&self, utterance: &str, token: Option<&str>) -> Result<Vec<ResponseItem>> {
        // A paused wizard owns the caller's next message outright.
        if let Some(token) = token {
            if let Some(mut wizard) = self.sessions.take(token) {
                log::debug!("resuming wizard for token");
                let ctx = self.context(Some(token), utterance);
                let step = wizard.advance(&ctx, Some(utterance)).await?;
                return Ok(self.settle_wizard(token, wizard, step));
            }
        }

        let reply = self.classifier.classify(utterance).await?;
        if !reply.starts_with(WIRE_PREFIX) {
            // Conversational reply; pass it through untouched.
            return Ok(vec![ResponseItem::text(reply)]);
        }

        let op_token = OperationToken::parse(&reply)?;
        log::info!("dispatching operation {:?}", op_token.name());
        let operation = self.registry.create(&op_token)?;
        let ctx = self.context(token, utterance);

        match operation.execute(&ctx).await? {
            Outcome::Reply(items) => Ok(items),
            Outcome::NeedsInput(mut wizard) => {
                let step = wizard.advance(&ctx, None).await?;
                match token {
                    Some(token) => Ok(self.settle_wizard(token, wizard, step)),
                    // Unreachable in practice: advance() fails fast on a
                    // missing token before producing a step.
                    None => Err(DispatchError::MissingToken),
                }
            }
        }
    }

    /// Store the wizard again when it still wants input; render the step.
    fn settle_wizard(&self, token: &str, wizard: Wizard, step: WizardStep) -> Vec<ResponseItem> {
        match step {
            WizardStep::Prompt(prompt) => {
                self.sessions.put(token, wizard);
                vec![ResponseItem::text(prompt)]
            }
            WizardStep::Finished(items) => items,
            WizardStep::Aborted(message) => vec![ResponseItem::text(message)],
        }
    }

    fn context(&self, token: Option<&str>, utterance: &str) -> ExecContext {
        ExecContext::new(
            Arc::clone(&self.client),
            Arc::clone(&self.resolver),
            token,
            utterance,
        )
    }
}
