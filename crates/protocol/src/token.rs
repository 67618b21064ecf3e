//! The `REQUEST~name~k=v` wire format emitted by the intent classifier.

use thiserror::Error;

/// Literal prefix of every encoded operation token.
pub const WIRE_PREFIX: &str = "REQUEST";

/// Separator between wire token segments.
pub const WIRE_SEP: char = '~';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("wire token does not start with {WIRE_PREFIX}: {0:?}")]
    MissingPrefix(String),

    #[error("wire token has no operation name: {0:?}")]
    MissingName(String),

    #[error("malformed wire token segment: {0:?}")]
    Malformed(String),
}

/// Parsed form of an encoded operation token.
///
/// Parameters keep their wire order. A key without a value (`key` or `key=`)
/// parses to `None` and counts as missing; operations use [`missing_keys`]
/// to decide whether they still need input.
///
/// [`missing_keys`]: OperationToken::missing_keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationToken {
    name: String,
    parameters: Vec<(String, Option<String>)>,
}

impl OperationToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.parameters.push((key.into(), value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[(String, Option<String>)] {
        &self.parameters
    }

    /// Value for `key`, if present and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Keys whose value is absent on the wire.
    pub fn missing_keys(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Render back into the `REQUEST~name~k=v` wire form.
    pub fn to_wire(&self) -> String {
        let mut out = format!("{WIRE_PREFIX}{WIRE_SEP}{}", self.name);
        for (key, value) in &self.parameters {
            out.push(WIRE_SEP);
            out.push_str(key);
            out.push('=');
            if let Some(value) = value {
                out.push_str(value);
            }
        }
        out
    }

    /// Parse an encoded operation token.
    pub fn parse(wire: &str) -> Result<Self, TokenError> {
        let trimmed = wire.trim().trim_matches(WIRE_SEP);
        let mut segments = trimmed.split(WIRE_SEP);

        match segments.next() {
            Some(WIRE_PREFIX) => {}
            _ => return Err(TokenError::MissingPrefix(wire.to_string())),
        }

        let name = match segments.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(TokenError::MissingName(wire.to_string())),
        };

        let mut parameters = Vec::new();
        for segment in segments {
            if segment.is_empty() {
                return Err(TokenError::Malformed(wire.to_string()));
            }
            match segment.split_once('=') {
                Some((key, "")) => parameters.push((key.to_string(), None)),
                Some((key, value)) => parameters.push((key.to_string(), Some(value.to_string()))),
                None => parameters.push((segment.to_string(), None)),
            }
        }

        Ok(Self { name, parameters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_bare_operation() {
        let token = OperationToken::parse("REQUEST~get_projects").unwrap();
        assert_eq!(token.name(), "get_projects");
        assert!(token.parameters().is_empty());
    }

    #[test]
    fn parses_parameters_in_order() {
        let token = OperationToken::parse("REQUEST~create_vm~os=debian~project=Web").unwrap();
        assert_eq!(token.get("os"), Some("debian"));
        assert_eq!(token.get("project"), Some("Web"));
        assert_eq!(token.parameters()[0].0, "os");
    }

    #[test]
    fn missing_values_are_recorded() {
        let token = OperationToken::parse("REQUEST~create_vm~os=~project").unwrap();
        assert_eq!(token.get("os"), None);
        assert_eq!(token.missing_keys(), vec!["os", "project"]);
    }

    #[test]
    fn round_trips_through_wire_form() {
        let token = OperationToken::new("create_vm")
            .with_parameter("os", Some("debian".into()))
            .with_parameter("project", None);
        let back = OperationToken::parse(&token.to_wire()).unwrap();
        assert_eq!(token, back);
    }

    #[test]
    fn rejects_foreign_prefix() {
        let err = OperationToken::parse("QUERY~get_projects").unwrap_err();
        assert_eq!(err, TokenError::MissingPrefix("QUERY~get_projects".into()));
    }

    #[test]
    fn rejects_prefix_without_name() {
        assert_eq!(
            OperationToken::parse("REQUEST").unwrap_err(),
            TokenError::MissingName("REQUEST".into())
        );
        assert_eq!(
            OperationToken::parse("REQUEST~~").unwrap_err(),
            TokenError::MissingName("REQUEST~~".into())
        );
    }

    #[test]
    fn tolerates_trailing_separator() {
        let token = OperationToken::parse("REQUEST~get_vms~").unwrap();
        assert_eq!(token.name(), "get_vms");
    }
}
