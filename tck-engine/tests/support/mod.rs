//! Engine harness and event builders shared by the engine tests.

#![allow(dead_code)]

use std::sync::Arc;

use prost::Message;
use tck_core::constants::{BD_SEQ_METRIC, NAMESPACE, REBIRTH_METRIC, TEST_CONTROL_TOPIC};
use tck_core::payload::{metric::Value, DataType, Metric, Payload};
use tck_core::topic::{state_topic, MessageKind};
use tck_core::{
    ConnectEvent, DisconnectEvent, PublishEvent, Qos, ResultRecord, SubscribeEvent, WillMessage,
};
use tck_engine::clock::ManualClock;
use tck_engine::{Engine, EngineConfig, EngineHandle, OutboundMessage};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Engine clock and payload timestamps.
pub const NOW: u64 = 1_700_000_000_000;

pub fn params(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn long(name: &str, value: u64) -> Metric {
    Metric {
        name: Some(name.into()),
        timestamp: Some(NOW),
        datatype: Some(DataType::Int64.code()),
        value: Some(Value::LongValue(value)),
        ..Default::default()
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

pub fn state_json(online: bool, bd_seq: u8) -> Vec<u8> {
    serde_json::json!({ "online": online, "bdSeq": bd_seq, "timestamp": NOW })
        .to_string()
        .into_bytes()
}

/// `true` if `message` is an NCMD carrying `Node Control/Rebirth = true`.
pub fn is_rebirth(message: &OutboundMessage, ncmd_topic: &str) -> bool {
    message.topic == ncmd_topic
        && Payload::decode(message.payload.as_slice()).is_ok_and(|p| {
            p.find_metric(REBIRTH_METRIC)
                .and_then(|m| m.boolean_value())
                .unwrap_or(false)
        })
}

// ── Harness ─────────────────────────────────────────────────────────

pub struct Harness {
    pub handle: EngineHandle,
    pub outbound: UnboundedReceiver<OutboundMessage>,
    pub results: UnboundedReceiver<ResultRecord>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn start() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let (outbound_tx, outbound) = mpsc::unbounded_channel();
        let (results_tx, results) = mpsc::unbounded_channel();
        let clock = Arc::new(ManualClock::new(NOW));
        let (handle, _join) = Engine::new(config)
            .with_clock(clock.clone())
            .with_outbound(Arc::new(outbound_tx))
            .with_results(Arc::new(results_tx))
            .spawn();
        Self {
            handle,
            outbound,
            results,
            clock,
        }
    }

    /// Wait until the actor has applied everything sent so far.
    pub async fn sync(&self) {
        self.handle.snapshot().await.unwrap();
    }

    pub fn publish(&self, client_id: &str, topic: &str, payload: Vec<u8>, qos: Qos, retain: bool) {
        self.handle
            .publish(PublishEvent {
                client_id: client_id.into(),
                topic: topic.into(),
                payload,
                qos,
                retain,
            })
            .unwrap();
    }

    pub fn control(&self, command: &str) {
        self.publish(
            "tck",
            TEST_CONTROL_TOPIC,
            command.as_bytes().to_vec(),
            Qos::AtLeastOnce,
            false,
        );
    }

    pub fn subscribe(&self, client_id: &str, filters: &[&str]) {
        self.handle
            .subscribe(SubscribeEvent {
                client_id: client_id.into(),
                topic_filters: params(filters),
            })
            .unwrap();
    }

    pub fn disconnect(&self, client_id: &str) {
        self.handle
            .disconnect(DisconnectEvent {
                client_id: client_id.into(),
                reason: Some("socket closed".into()),
            })
            .unwrap();
    }

    /// CONNECT with a STATE will for `host_id`.
    pub fn connect_host(&self, client_id: &str, host_id: &str) {
        self.handle
            .connect(ConnectEvent {
                client_id: client_id.into(),
                clean_start: true,
                will: Some(WillMessage {
                    topic: state_topic(host_id),
                    payload: state_json(false, 0),
                    qos: Qos::AtLeastOnce,
                    retain: true,
                }),
            })
            .unwrap();
    }

    pub fn publish_state(&self, client_id: &str, host_id: &str, online: bool) {
        self.publish(
            client_id,
            &state_topic(host_id),
            state_json(online, 0),
            Qos::AtLeastOnce,
            true,
        );
    }

    /// Connect, subscribe and declare `host_id` online.
    pub fn host_online(&self, client_id: &str, host_id: &str) {
        self.connect_host(client_id, host_id);
        self.subscribe(client_id, &["spBv1.0/#", state_topic(host_id).as_str()]);
        self.publish_state(client_id, host_id, true);
    }

    pub fn drain_outbound(&mut self) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        while let Ok(message) = self.outbound.try_recv() {
            out.push(message);
        }
        out
    }
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

    /// CONNECT with an NDEATH will carrying bdSeq 0.
    pub fn connect(&self, h: &Harness) {
        h.handle
            .connect(ConnectEvent {
                client_id: self.client_id.clone(),
                clean_start: true,
                will: Some(WillMessage {
                    topic: self.topic(MessageKind::NDeath),
                    payload: encode(None, vec![long(BD_SEQ_METRIC, 0)]),
                    qos: Qos::AtLeastOnce,
                    retain: false,
                }),
            })
            .unwrap();
    }

    /// NBIRTH with seq 0 and bdSeq 0.
    pub fn birth(&self, h: &Harness) {
        let metrics = vec![
            long(BD_SEQ_METRIC, 0),
            Metric::boolean(REBIRTH_METRIC, false, NOW),
            long("Temperature", 20),
        ];
        self.send(h, &self.topic(MessageKind::NBirth), encode(Some(0), metrics));
    }

    pub fn device_birth(&self, h: &Harness, device_id: &str, seq: u64) {
        self.send(
            h,
            &self.device_topic(MessageKind::DBirth, device_id),
            encode(Some(seq), vec![long("Pressure", 1)]),
        );
    }

    pub fn ndata(&self, h: &Harness, seq: u64) {
        self.send(
            h,
            &self.topic(MessageKind::NData),
            encode(Some(seq), vec![long("Temperature", 20 + seq)]),
        );
    }

    pub fn send(&self, h: &Harness, topic: &str, payload: Vec<u8>) {
        h.publish(&self.client_id, topic, payload, Qos::AtMostOnce, false);
    }
}
