//! Topic parsing and identity keys.
//!
//! Recognised shapes:
//!
//! | Topic | Parsed as |
//! |-------|-----------|
//! | `spBv1.0/<group>/<TYPE>/<edge>` | [`Topic::Sparkplug`], no device |
//! | `spBv1.0/<group>/<TYPE>/<edge>/<device>` | [`Topic::Sparkplug`], with device |
//! | `STATE/<host>` or `spBv1.0/STATE/<host>` | [`Topic::State`] |
//! | `SPARKPLUG_TCK/...` | [`Topic::Control`] |
//! | anything else | [`Topic::Other`] |
//!
//! Parsing is lenient about identifier content and about a D* topic
//! missing its device id: those still parse, so the monitor can record the
//! violation against the right requirement. A node-level kind with a device
//! level is rejected; [`misplaced_device_level`] names it for the monitor.

use std::fmt;

use crate::constants::{CONTROL_TOPIC_PREFIX, NAMESPACE, STATE_TOPIC_LEVEL};
use crate::errors::TckError;

/// Sparkplug message type (third topic level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    NBirth,
    NDeath,
    NData,
    NCmd,
    DBirth,
    DDeath,
    DData,
    DCmd,
}

impl MessageKind {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "NBIRTH" => MessageKind::NBirth,
            "NDEATH" => MessageKind::NDeath,
            "NDATA" => MessageKind::NData,
            "NCMD" => MessageKind::NCmd,
            "DBIRTH" => MessageKind::DBirth,
            "DDEATH" => MessageKind::DDeath,
            "DDATA" => MessageKind::DData,
            "DCMD" => MessageKind::DCmd,
            _ => return None,
        })
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageKind::NBirth => "NBIRTH",
            MessageKind::NDeath => "NDEATH",
            MessageKind::NData => "NDATA",
            MessageKind::NCmd => "NCMD",
            MessageKind::DBirth => "DBIRTH",
            MessageKind::DDeath => "DDEATH",
            MessageKind::DData => "DDATA",
            MessageKind::DCmd => "DCMD",
        }
    }

    /// `true` for the D* kinds, whose topics carry a device id.
    pub const fn is_device(&self) -> bool {
        matches!(
            self,
            MessageKind::DBirth | MessageKind::DDeath | MessageKind::DData | MessageKind::DCmd
        )
    }

    pub const fn is_birth(&self) -> bool {
        matches!(self, MessageKind::NBirth | MessageKind::DBirth)
    }

    pub const fn is_data(&self) -> bool {
        matches!(self, MessageKind::NData | MessageKind::DData)
    }

    pub const fn is_command(&self) -> bool {
        matches!(self, MessageKind::NCmd | MessageKind::DCmd)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an edge node: (group id, edge node id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeNodeKey {
    pub group_id: String,
    pub edge_node_id: String,
}

impl EdgeNodeKey {
    pub fn new(group_id: impl Into<String>, edge_node_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            edge_node_id: edge_node_id.into(),
        }
    }

    pub fn device(&self, device_id: impl Into<String>) -> DeviceKey {
        DeviceKey {
            edge: self.clone(),
            device_id: device_id.into(),
        }
    }
}

impl fmt::Display for EdgeNodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.edge_node_id)
    }
}

/// Identity of a device: its edge node plus device id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceKey {
    pub edge: EdgeNodeKey,
    pub device_id: String,
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.edge, self.device_id)
    }
}

/// A topic in the Sparkplug namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkplugTopic {
    pub group_id: String,
    pub kind: MessageKind,
    pub edge_node_id: String,
    pub device_id: Option<String>,
}

impl SparkplugTopic {
    pub fn node(key: &EdgeNodeKey, kind: MessageKind) -> Self {
        Self {
            group_id: key.group_id.clone(),
            kind,
            edge_node_id: key.edge_node_id.clone(),
            device_id: None,
        }
    }

    pub fn device(key: &DeviceKey, kind: MessageKind) -> Self {
        Self {
            device_id: Some(key.device_id.clone()),
            ..Self::node(&key.edge, kind)
        }
    }

    pub fn edge_key(&self) -> EdgeNodeKey {
        EdgeNodeKey::new(&self.group_id, &self.edge_node_id)
    }

    pub fn device_key(&self) -> Option<DeviceKey> {
        self.device_id.as_ref().map(|d| self.edge_key().device(d))
    }
}

impl fmt::Display for SparkplugTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NAMESPACE}/{}/{}/{}",
            self.group_id, self.kind, self.edge_node_id
        )?;
        if let Some(device) = &self.device_id {
            write!(f, "/{device}")?;
        }
        Ok(())
    }
}

/// A parsed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    Sparkplug(SparkplugTopic),
    State { host_id: String },
    Control(String),
    Other,
}

/// Parse a published or will topic.
///
/// # Errors
///
/// Returns [`TckError::Topic`] when the topic is inside the Sparkplug
/// namespace but has an unknown message type or the wrong number of levels.
pub fn parse(topic: &str) -> Result<Topic, TckError> {
    if topic.starts_with(CONTROL_TOPIC_PREFIX) {
        return Ok(Topic::Control(topic.to_owned()));
    }

    let levels: Vec<&str> = topic.split('/').collect();
    match levels.as_slice() {
        [STATE_TOPIC_LEVEL, host] | [NAMESPACE, STATE_TOPIC_LEVEL, host] => Ok(Topic::State {
            host_id: (*host).to_owned(),
        }),
        [NAMESPACE, rest @ ..] => {
            let (group, kind, edge, device) = match rest {
                [g, k, e] => (g, k, e, None),
                [g, k, e, d] => (g, k, e, Some(*d)),
                _ => {
                    return Err(TckError::Topic(format!(
                        "{topic}: expected 4 or 5 levels, found {}",
                        levels.len()
                    )))
                }
            };
            let kind = MessageKind::parse(kind)
                .ok_or_else(|| TckError::Topic(format!("{topic}: unknown message type {kind}")))?;
            if device.is_some() && !kind.is_device() {
                return Err(TckError::Topic(format!("{topic}: {kind} topics carry no device id")));
            }
            Ok(Topic::Sparkplug(SparkplugTopic {
                group_id: (*group).to_owned(),
                kind,
                edge_node_id: (*edge).to_owned(),
                device_id: device.map(str::to_owned),
            }))
        }
        _ => Ok(Topic::Other),
    }
}

/// Node-level kind of a namespace topic that carries a device level, e.g.
/// `NDATA` for `spBv1.0/G1/NDATA/E1/D1`.
pub fn misplaced_device_level(topic: &str) -> Option<MessageKind> {
    match topic.split('/').collect::<Vec<_>>().as_slice() {
        [NAMESPACE, _, kind, _, _] => MessageKind::parse(kind).filter(|k| !k.is_device()),
        _ => None,
    }
}

/// `true` if `id` is usable as a Sparkplug identifier: non-empty and free
/// of the MQTT reserved characters `+`, `/` and `#`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['+', '/', '#'])
}

/// MQTT topic filter matching with `+` and `#` wildcards.
pub fn filter_matches(filter: &str, topic: &str) -> bool {
    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');
    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Topic of the STATE messages for `host_id`, in the namespace-less form.
pub fn state_topic(host_id: &str) -> String {
    format!("{STATE_TOPIC_LEVEL}/{host_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_node_and_device_topics() {
        let t = parse("spBv1.0/G1/NBIRTH/E1").unwrap();
        assert_eq!(
            t,
            Topic::Sparkplug(SparkplugTopic {
                group_id: "G1".into(),
                kind: MessageKind::NBirth,
                edge_node_id: "E1".into(),
                device_id: None,
            })
        );

        let Topic::Sparkplug(t) = parse("spBv1.0/G1/DDATA/E1/D1").unwrap() else {
            panic!("expected sparkplug topic");
        };
        assert_eq!(t.kind, MessageKind::DData);
        assert_eq!(t.device_key().unwrap().to_string(), "G1/E1/D1");
    }

    #[test]
    fn parses_both_state_forms() {
        for topic in ["STATE/host1", "spBv1.0/STATE/host1"] {
            assert_eq!(
                parse(topic).unwrap(),
                Topic::State {
                    host_id: "host1".into()
                }
            );
        }
    }

    #[test]
    fn control_and_foreign_topics() {
        assert_eq!(
            parse("SPARKPLUG_TCK/TEST_CONTROL").unwrap(),
            Topic::Control("SPARKPLUG_TCK/TEST_CONTROL".into())
        );
        assert_eq!(parse("factory/line1/temp").unwrap(), Topic::Other);
    }

    #[test]
    fn rejects_malformed_namespace_topics() {
        assert!(parse("spBv1.0/G1/NBIRTH").is_err());
        assert!(parse("spBv1.0/G1/NBURP/E1").is_err());
        assert!(parse("spBv1.0/G1/DDATA/E1/D1/extra").is_err());
    }

    #[test]
    fn node_kinds_reject_a_device_level() {
        for topic in ["spBv1.0/G1/NDATA/E1/D1", "spBv1.0/G1/NCMD/E1/D1"] {
            assert!(parse(topic).is_err(), "{topic}");
        }
        assert_eq!(
            misplaced_device_level("spBv1.0/G1/NDATA/E1/D1"),
            Some(MessageKind::NData)
        );
        assert_eq!(misplaced_device_level("spBv1.0/G1/DDATA/E1/D1"), None);
        assert_eq!(misplaced_device_level("spBv1.0/G1/NDATA/E1"), None);
    }

    #[test]
    fn display_round_trips_topic_shape() {
        let key = EdgeNodeKey::new("G1", "E1");
        assert_eq!(
            SparkplugTopic::node(&key, MessageKind::NCmd).to_string(),
            "spBv1.0/G1/NCMD/E1"
        );
        assert_eq!(
            SparkplugTopic::device(&key.device("D1"), MessageKind::DCmd).to_string(),
            "spBv1.0/G1/DCMD/E1/D1"
        );
    }

    #[test]
    fn identifier_validity() {
        assert!(is_valid_id("Edge-1"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("a+b"));
        assert!(!is_valid_id("a#"));
    }

    #[test]
    fn wildcard_filters() {
        assert!(filter_matches("spBv1.0/#", "spBv1.0/G1/NDATA/E1"));
        assert!(filter_matches("STATE/+", "STATE/host1"));
        assert!(filter_matches("spBv1.0/G1/NCMD/E1", "spBv1.0/G1/NCMD/E1"));
        assert!(!filter_matches("STATE/+", "STATE/host1/extra"));
        assert!(!filter_matches("spBv1.0/G2/#", "spBv1.0/G1/NDATA/E1"));
    }
}
