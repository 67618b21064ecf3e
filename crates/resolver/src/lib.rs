//! Fuzzy entity resolution: turning name mentions in free text into known
//! backend entity names.
//!
//! Resolution is two separate steps so each is testable on its own:
//! candidate extraction ([`EntityResolver::extract_candidates`]) pulls
//! phrases that look like proper names out of an utterance, and matching
//! ([`best_match`]) scores those phrases against the names the backend
//! actually knows.

mod chunker;
mod extract;
mod matcher;

pub use chunker::{DisabledChunker, NounPhraseChunker};
pub use extract::{regex_candidates, EntityResolver};
pub use matcher::{best_match, similarity};
