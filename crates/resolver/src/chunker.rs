use async_trait::async_trait;

/// Linguistic noun-phrase chunking, the first extraction tier.
///
/// The production implementation lives outside this crate: it calls an NLP
/// service that POS-tags the utterance and groups consecutive proper-noun
/// tokens (optionally joined by a conjunction) into phrases. Implementations
/// return an empty list when they find nothing; extraction then falls back
/// to the regex heuristic.
#[async_trait]
pub trait NounPhraseChunker: Send + Sync {
    async fn chunk(&self, utterance: &str) -> Vec<String>;
}

/// Chunker used when no NLP service is configured. Always defers to the
/// regex fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledChunker;

#[async_trait]
impl NounPhraseChunker for DisabledChunker {
    async fn chunk(&self, _utterance: &str) -> Vec<String> {
        Vec::new()
    }
}
