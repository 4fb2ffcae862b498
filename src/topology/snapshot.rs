use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Agent,
    External,
}

impl NodeKind {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("agent") => Self::Agent,
            Some(_) => Self::External,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::External => "external",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    Internal,
    ExternalOutbound,
    ExternalInbound,
}

impl EdgeDirection {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("external_outbound") => Self::ExternalOutbound,
            Some("external_inbound") => Self::ExternalInbound,
            _ => Self::Internal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::ExternalOutbound => "outbound",
            Self::ExternalInbound => "inbound",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub message_count: u64,
    pub direction: EdgeDirection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TrafficStats {
    #[serde(default, rename = "totalMessages")]
    pub total_messages: u64,
    #[serde(default, rename = "internalMessages")]
    pub internal_messages: u64,
    #[serde(default, rename = "externalOutbound")]
    pub external_outbound: u64,
    #[serde(default, rename = "externalInbound")]
    pub external_inbound: u64,
}

impl TrafficStats {
    pub(super) fn record(&mut self, direction: EdgeDirection, message_count: u64) {
        let slot = match direction {
            EdgeDirection::Internal => &mut self.internal_messages,
            EdgeDirection::ExternalOutbound => &mut self.external_outbound,
            EdgeDirection::ExternalInbound => &mut self.external_inbound,
        };
        *slot = slot.saturating_add(message_count);
        self.total_messages = self.total_messages.saturating_add(message_count);
    }
}

/// One topology snapshot as handed over by the messaging collaborator.
///
/// Decoding never fails on structure: anything that does not look like a node
/// or an edge is skipped, and a document without `nodes`/`edges` is an empty
/// graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub stats: Option<TrafficStats>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    from: String,
    to: String,
    #[serde(default, rename = "messageCount")]
    message_count: Option<f64>,
    #[serde(default)]
    direction: Option<String>,
}

fn message_count(raw: Option<f64>) -> u64 {
    match raw {
        Some(value) if value.is_finite() && value > 0.0 => value.round() as u64,
        _ => 0,
    }
}

fn entries<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> &'a [Value] {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl Snapshot {
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            debug!("snapshot is not a JSON object; treating as empty");
            return Self::default();
        };

        let mut nodes = Vec::new();
        for (position, entry) in entries(object, "nodes").iter().enumerate() {
            match RawNode::deserialize(entry) {
                Ok(raw) => nodes.push(NodeRecord {
                    name: raw.name.unwrap_or_else(|| raw.id.clone()),
                    kind: NodeKind::from_raw(raw.kind.as_deref()),
                    state: raw.state,
                    email: raw.email,
                    id: raw.id,
                }),
                Err(error) => debug!(position, %error, "skipping malformed node entry"),
            }
        }

        let mut edges = Vec::new();
        for (position, entry) in entries(object, "edges").iter().enumerate() {
            match RawEdge::deserialize(entry) {
                Ok(raw) => edges.push(EdgeRecord {
                    from: raw.from,
                    to: raw.to,
                    message_count: message_count(raw.message_count),
                    direction: EdgeDirection::from_raw(raw.direction.as_deref()),
                }),
                Err(error) => debug!(position, %error, "skipping malformed edge entry"),
            }
        }

        let stats = object
            .get("stats")
            .and_then(|stats| TrafficStats::deserialize(stats).ok());

        Self {
            nodes,
            edges,
            stats,
        }
    }
}
