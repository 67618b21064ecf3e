use std::sync::Arc;

use stratus_backend::CloudClient;
use stratus_resolver::EntityResolver;

/// Everything an operation may touch while executing: the backend client,
/// the name resolver, the caller's credential and the original utterance.
/// Built per request cycle and dropped with it.
#[derive(Clone)]
pub struct ExecContext {
    client: Arc<CloudClient>,
    resolver: Arc<EntityResolver>,
    token: Option<String>,
    original: String,
}

impl ExecContext {
    pub fn new(
        client: Arc<CloudClient>,
        resolver: Arc<EntityResolver>,
        token: Option<&str>,
        original: &str,
    ) -> Self {
        Self {
            client,
            resolver,
            token: token.map(str::to_string),
            original: original.to_string(),
        }
    }

    pub fn client(&self) -> &CloudClient {
        &self.client
    }

    pub fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The utterance as the user typed it, for operations that must read
    /// entity names out of it.
    pub fn original(&self) -> &str {
        &self.original
    }
}
