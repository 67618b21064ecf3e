use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunker::{DisabledChunker, NounPhraseChunker};

/// Runs of tokens whose first character is an ASCII uppercase letter or a
/// digit, joined by single spaces. "my organisation Waldur Maie" yields
/// "Waldur Maie"; an all-lowercase utterance yields nothing.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z0-9]\S+(?:\s[A-Z0-9]\S+)*").expect("valid name pattern"));

/// English stop-words stripped before extraction so fillers never glue two
/// unrelated capitalized tokens together.
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now",
];

fn is_stop_word(token: &str) -> bool {
    let lowered = token.to_lowercase();
    STOP_WORDS.contains(&lowered.as_str())
}

/// Pure fallback extractor.
///
/// Lowercases the first character (a sentence-initial capital is not a name
/// mention), strips stop-words, then collects maximal capitalized runs.
pub fn regex_candidates(utterance: &str) -> Vec<String> {
    let mut chars = utterance.chars();
    let decapitalized = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
        None => return Vec::new(),
    };

    let filtered = decapitalized
        .split_whitespace()
        .filter(|token| !is_stop_word(token))
        .collect::<Vec<_>>()
        .join(" ");

    NAME_PATTERN
        .find_iter(&filtered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Candidate phrase extraction with the two-tier fallback: linguistic
/// chunking first, the regex heuristic when chunking finds nothing.
pub struct EntityResolver {
    chunker: Box<dyn NounPhraseChunker>,
}

impl EntityResolver {
    pub fn new(chunker: Box<dyn NounPhraseChunker>) -> Self {
        Self { chunker }
    }

    pub async fn extract_candidates(&self, utterance: &str) -> Vec<String> {
        let chunked = self.chunker.chunk(utterance).await;
        if !chunked.is_empty() {
            log::debug!("chunker extracted {chunked:?} from {utterance:?}");
            return chunked;
        }
        let candidates = regex_candidates(utterance);
        log::debug!("regex fallback extracted {candidates:?} from {utterance:?}");
        candidates
    }
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::new(Box::new(DisabledChunker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_capitalized_run() {
        assert_eq!(
            regex_candidates("my organisation Waldur Maie"),
            vec!["Waldur Maie".to_string()]
        );
    }

    #[test]
    fn lowercase_utterance_yields_nothing() {
        assert!(regex_candidates("organisation waldur maie").is_empty());
    }

    #[test]
    fn sentence_initial_capital_is_not_a_name() {
        assert!(regex_candidates("Show all projects").is_empty());
    }

    #[test]
    fn digit_leading_tokens_are_candidates() {
        assert_eq!(
            regex_candidates("costs for 2nd Cluster"),
            vec!["2nd Cluster".to_string()]
        );
    }

    #[test]
    fn stop_words_do_not_join_runs() {
        // "And" would otherwise merge into the capitalized run.
        assert_eq!(
            regex_candidates("projects in Alpha And Beta"),
            vec!["Alpha Beta".to_string()]
        );
    }

    #[test]
    fn separate_runs_stay_separate() {
        assert_eq!(
            regex_candidates("compare Alpha cluster with Beta cluster"),
            vec!["Alpha".to_string(), "Beta".to_string()]
        );
    }

    #[tokio::test]
    async fn chunker_output_wins_over_regex() {
        struct Fixed;

        #[async_trait::async_trait]
        impl NounPhraseChunker for Fixed {
            async fn chunk(&self, _utterance: &str) -> Vec<String> {
                vec!["Waldur Maie".to_string()]
            }
        }

        let resolver = EntityResolver::new(Box::new(Fixed));
        assert_eq!(
            resolver.extract_candidates("anything at all").await,
            vec!["Waldur Maie".to_string()]
        );
    }

    #[tokio::test]
    async fn disabled_chunker_falls_back_to_regex() {
        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.extract_candidates("show me Waldur Maie").await,
            vec!["Waldur Maie".to_string()]
        );
    }
}
