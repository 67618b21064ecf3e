//! Request dispatch and the multi-turn conversation engine.
//!
//! The flow per inbound turn: a paused wizard (matched by caller token)
//! consumes the utterance, or the intent classifier maps it to either
//! conversational text or an encoded operation token, which the registry
//! turns into a concrete [`Operation`] to execute against the backend.

mod classifier;
mod context;
mod dispatcher;
mod error;
mod operation;
pub mod operations;
mod session;
mod wizard;

pub use classifier::{HttpClassifier, IntentClassifier};
pub use context::ExecContext;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use operation::{Operation, OperationRegistry, Outcome};
pub use session::SessionStore;
pub use wizard::{
    AnswerRule, CandidateProvider, FixedCandidates, Qa, Wizard, WizardFinish, WizardStep,
};
