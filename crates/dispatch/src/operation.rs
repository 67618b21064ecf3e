//! The operation abstraction and the name -> factory registry.

use std::collections::HashMap;

use async_trait::async_trait;

use stratus_protocol::{OperationToken, ResponseItem};

use crate::context::ExecContext;
use crate::error::{DispatchError, Result};
use crate::operations;
use crate::wizard::Wizard;

/// What executing an operation produced: either a finished reply, or a
/// wizard that still needs input from the user.
pub enum Outcome {
    Reply(Vec<ResponseItem>),
    NeedsInput(Wizard),
}

impl Outcome {
    pub fn text(data: impl Into<String>) -> Self {
        Outcome::Reply(vec![ResponseItem::text(data)])
    }
}

/// A named unit of backend work. Implementations perform exactly one main
/// backend query (resolver flows issue their lookup queries first) and
/// render the result into chat-facing payloads.
#[async_trait]
pub trait Operation: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome>;
}

type Factory = fn(&OperationToken) -> Box<dyn Operation>;

/// Explicit name -> factory map. Dispatch never walks type hierarchies;
/// an operation exists iff it was registered here at startup.
pub struct OperationRegistry {
    factories: HashMap<&'static str, Factory>,
}

impl OperationRegistry {
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// The full production set.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(operations::GET_PROJECTS, |_| {
            Box::new(operations::GetProjects)
        });
        registry.register(operations::GET_SERVICES, |_| {
            Box::new(operations::GetServices)
        });
        registry.register(operations::GET_VMS, |_| Box::new(operations::GetVms));
        registry.register(operations::GET_ORGANISATIONS, |_| {
            Box::new(operations::GetOrganisations)
        });
        registry.register(operations::GET_TOTAL_COSTS, |_| {
            Box::new(operations::GetTotalCosts)
        });
        registry.register(operations::GET_SERVICES_BY_ORGANISATION, |_| {
            Box::new(operations::GetServicesByOrganisation)
        });
        registry.register(operations::GET_PRIVATE_CLOUDS_BY_ORGANISATION, |_| {
            Box::new(operations::GetPrivateCloudsByOrganisation)
        });
        registry.register(operations::GET_VMS_BY_PROJECT_AND_ORGANISATION, |_| {
            Box::new(operations::GetVmsByProjectAndOrganisation)
        });
        registry.register(operations::CREATE_VM, |token| {
            Box::new(operations::CreateVm::from_token(token))
        });
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: Factory) {
        if self.factories.insert(name, factory).is_some() {
            log::warn!("operation {name:?} registered twice; keeping the last");
        }
    }

    /// Instantiate the operation a wire token names.
    pub fn create(&self, token: &OperationToken) -> Result<Box<dyn Operation>> {
        self.factories
            .get(token.name())
            .map(|factory| factory(token))
            .ok_or_else(|| DispatchError::UnknownOperation(token.name().to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_resolves_every_registered_name() {
        let registry = OperationRegistry::standard();
        for name in registry.names() {
            let token = OperationToken::new(name);
            let op = registry.create(&token).expect("factory registered");
            assert_eq!(op.name(), name);
        }
    }

    #[test]
    fn wire_round_trip_preserves_dispatch_identity() {
        let registry = OperationRegistry::standard();
        for name in registry.names() {
            let wire = OperationToken::new(name).to_wire();
            let token = OperationToken::parse(&wire).expect("parses");
            let op = registry.create(&token).expect("resolves");
            assert_eq!(op.name(), name);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let registry = OperationRegistry::standard();
        let err = registry
            .create(&OperationToken::new("get_weather"))
            .err()
            .expect("unknown operation");
        assert!(matches!(err, DispatchError::UnknownOperation(name) if name == "get_weather"));
    }
}
