//! Wire protocol and response envelope shared by the stratus crates.
//!
//! The intent classifier hands the dispatcher an encoded operation token
//! (`REQUEST~name~k=v...`); the dispatcher hands the transport a list of
//! [`ResponseItem`]s. Both shapes live here so the other crates agree on
//! them without depending on each other.

use serde::{Deserialize, Serialize};

mod token;

pub use token::{OperationToken, TokenError, WIRE_PREFIX, WIRE_SEP};

/// One chat-facing reply.
///
/// The HTTP boundary always wraps replies in a JSON array, even when a turn
/// produces a single item, so clients handle single- and multi-message turns
/// uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ResponseItem {
    Text(String),
    Graph(GraphSeries),
}

impl ResponseItem {
    pub fn text(data: impl Into<String>) -> Self {
        ResponseItem::Text(data.into())
    }

    pub fn graph(series: GraphSeries) -> Self {
        ResponseItem::Graph(series)
    }
}

/// Structured series for a cost graph. Rendering is the client's problem;
/// the engine only ships labels and values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSeries {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(rename = "graphID")]
    pub graph_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_item_serializes_with_type_tag() {
        let item = ResponseItem::text("You don't have any projects.");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "text", "data": "You don't have any projects."})
        );
    }

    #[test]
    fn graph_item_serializes_with_graph_id_key() {
        let item = ResponseItem::graph(GraphSeries {
            x: vec!["Jan 2024".into(), "Feb 2024".into()],
            y: vec![10.5, 20.0],
            graph_id: 1,
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "graph");
        assert_eq!(json["data"]["graphID"], 1);
        assert_eq!(json["data"]["x"][0], "Jan 2024");
    }

    #[test]
    fn response_list_round_trips() {
        let items = vec![
            ResponseItem::text("hello"),
            ResponseItem::graph(GraphSeries {
                x: vec![],
                y: vec![],
                graph_id: 1,
            }),
        ];
        let json = serde_json::to_string(&items).unwrap();
        let back: Vec<ResponseItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(items, back);
    }
}
