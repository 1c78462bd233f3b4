//! Event builders shared by the conformance tests.

use prost::Message;
use tck_core::constants::{BD_SEQ_METRIC, NAMESPACE, REBIRTH_METRIC};
use tck_core::payload::{metric::Value, DataType, Metric, Payload};
use tck_core::topic::{state_topic, MessageKind};
use tck_core::{
    ConnectEvent, DisconnectEvent, Finding, Monitor, PublishEvent, Qos, Verdict, WillMessage,
};

/// Wall clock used for every event and payload timestamp.
pub const NOW: u64 = 1_700_000_000_000;

pub fn long(name: &str, alias: Option<u64>, value: u64) -> Metric {
    Metric {
        name: Some(name.into()),
        alias,
        timestamp: Some(NOW),
        datatype: Some(DataType::Int64.code()),
        value: Some(Value::LongValue(value)),
        ..Default::default()
    }
}

/// A data metric addressed by alias only.
pub fn by_alias(alias: u64, value: u64) -> Metric {
    Metric {
        name: None,
        ..long("", Some(alias), value)
    }
}

pub fn encode(seq: Option<u64>, metrics: Vec<Metric>) -> Vec<u8> {
    Payload {
        timestamp: Some(NOW),
        seq,
        metrics,
        ..Default::default()
    }
    .encode_to_vec()
}

/// Worst verdict produced for `requirement` by one event.
pub fn finding(findings: &[Finding], requirement: &str) -> Option<Verdict> {
    findings
        .iter()
        .filter(|f| f.requirement == requirement)
        .map(|f| f.verdict)
        .max()
}

pub fn recorded(monitor: &Monitor, requirement: &str) -> Option<Verdict> {
    monitor.verdicts().get(requirement)
}

// ── Edge nodes ──────────────────────────────────────────────────────

pub struct Edge {
    pub client_id: String,
    pub group_id: String,
    pub edge_node_id: String,
}

impl Edge {
    pub fn new(client_id: &str, group_id: &str, edge_node_id: &str) -> Self {
        Self {
            client_id: client_id.into(),
            group_id: group_id.into(),
            edge_node_id: edge_node_id.into(),
        }
    }

    pub fn topic(&self, kind: MessageKind) -> String {
        format!("{NAMESPACE}/{}/{kind}/{}", self.group_id, self.edge_node_id)
    }

    pub fn device_topic(&self, kind: MessageKind, device_id: &str) -> String {
        format!("{}/{device_id}", self.topic(kind))
    }

    /// CONNECT with an NDEATH will carrying `bd_seq`.
    pub fn connect(&self, monitor: &mut Monitor, bd_seq: u64) -> Vec<Finding> {
        let will = WillMessage {
            topic: self.topic(MessageKind::NDeath),
            payload: encode(None, vec![long(BD_SEQ_METRIC, None, bd_seq)]),
            qos: Qos::AtLeastOnce,
            retain: false,
        };
        monitor.on_connect(
            &ConnectEvent {
                client_id: self.client_id.clone(),
                clean_start: true,
                will: Some(will),
            },
            NOW,
        )
    }

    pub fn disconnect(&self, monitor: &mut Monitor) {
        monitor.on_disconnect(&DisconnectEvent {
            client_id: self.client_id.clone(),
            reason: None,
        });
    }

    /// NBIRTH with seq 0, the given bdSeq, the rebirth metric and `metrics`.
    pub fn birth(&self, monitor: &mut Monitor, bd_seq: u64, metrics: Vec<Metric>) -> Vec<Finding> {
        let mut all = vec![
            long(BD_SEQ_METRIC, None, bd_seq),
            Metric::boolean(REBIRTH_METRIC, false, NOW),
        ];
        all.extend(metrics);
        self.publish(monitor, &self.topic(MessageKind::NBirth), encode(Some(0), all))
    }

    pub fn publish(&self, monitor: &mut Monitor, topic: &str, payload: Vec<u8>) -> Vec<Finding> {
        monitor.on_publish(
            &PublishEvent {
                client_id: self.client_id.clone(),
                topic: topic.into(),
                payload,
                qos: Qos::AtMostOnce,
                retain: false,
            },
            NOW,
        )
    }
}

// ── Host applications ───────────────────────────────────────────────

pub fn state_json(online: bool, bd_seq: u8, timestamp: u64) -> Vec<u8> {
    serde_json::json!({ "online": online, "bdSeq": bd_seq, "timestamp": timestamp })
        .to_string()
        .into_bytes()
}

pub fn connect_host(monitor: &mut Monitor, client_id: &str, host_id: &str, bd_seq: u8) -> Vec<Finding> {
    let will = WillMessage {
        topic: state_topic(host_id),
        payload: state_json(false, bd_seq, NOW),
        qos: Qos::AtLeastOnce,
        retain: true,
    };
    monitor.on_connect(
        &ConnectEvent {
            client_id: client_id.into(),
            clean_start: true,
            will: Some(will),
        },
        NOW,
    )
}

pub fn publish_state(
    monitor: &mut Monitor,
    client_id: &str,
    host_id: &str,
    online: bool,
    bd_seq: u8,
    timestamp: u64,
) -> Vec<Finding> {
    monitor.on_publish(
        &PublishEvent {
            client_id: client_id.into(),
            topic: state_topic(host_id),
            payload: state_json(online, bd_seq, timestamp),
            qos: Qos::AtLeastOnce,
            retain: true,
        },
        NOW,
    )
}
