//! Edge node session establishment.
//!
//! `AwaitingConnect → AwaitingNodeBirth → AwaitingDeviceBirths → Completed`.
//!
//! The edge connection is recognised by its will: the first CONNECT whose
//! will topic addresses the edge node under test.

use std::collections::BTreeSet;

use tck_core::constants::{BD_SEQ_METRIC, NAMESPACE};
use tck_core::payload::{PayloadDecoder, ProtobufDecoder};
use tck_core::requirements::*;
use tck_core::topic::{self, EdgeNodeKey, MessageKind, SparkplugTopic, Topic};
use tck_core::{ConnectEvent, PublishEvent, Qos, VerdictMap};
use tracing::{debug, info};

use super::registry::{ParamShape, ScenarioParams, ScenarioDescriptor};
use super::{Scenario, ScenarioContext, ScenarioError, ScenarioKind};

const REQUIREMENTS: &[&str] = &[
    PRINCIPLES_PERSISTENCE_CLEAN_SESSION_311,
    PRINCIPLES_BIRTH_CERTIFICATES_ORDER,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_CONNECT,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_TOPIC,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD_BDSEQ,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_QOS,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_WILL_RETAINED,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_NBIRTH_TOPIC,
    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_PHID_WAIT,
    MESSAGE_FLOW_EDGE_NODE_NCMD_SUBSCRIBE,
];

/// Requirements that only apply when devices are listed.
const DEVICE_REQUIREMENTS: &[&str] = &[MESSAGE_FLOW_DEVICE_DCMD_SUBSCRIBE, PAYLOADS_DBIRTH_ORDER];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingConnect,
    AwaitingNodeBirth,
    AwaitingDeviceBirths,
    Completed,
}

#[derive(Debug)]
pub struct EdgeSessionTest {
    host_id: String,
    edge: EdgeNodeKey,
    devices: BTreeSet<String>,
    born: BTreeSet<String>,
    client_id: Option<String>,
    state: State,
    verdicts: VerdictMap,
}

impl EdgeSessionTest {
    pub const DESCRIPTOR: ScenarioDescriptor = ScenarioDescriptor {
        profile: "edge",
        name: "SessionEstablishmentTest",
        shape: ParamShape::AtLeast(&["host_id", "group_id", "edge_node_id"]),
        factory: Self::factory,
    };

    fn factory(params: &ScenarioParams) -> Result<ScenarioKind, ScenarioError> {
        Self::from_params(params).map(ScenarioKind::EdgeSession)
    }

    /// # Errors
    ///
    /// [`ScenarioError::InvalidParam`] for an invalid identifier.
    pub fn from_params(params: &ScenarioParams) -> Result<Self, ScenarioError> {
        let host_id = params.id(0, "host_id")?;
        let group_id = params.id(1, "group_id")?;
        let edge_node_id = params.id(2, "edge_node_id")?;
        let mut devices = BTreeSet::new();
        for index in 3..params.len() {
            devices.insert(params.id(index, "device_id")?);
        }
        Ok(Self {
            host_id,
            edge: EdgeNodeKey::new(group_id, edge_node_id),
            devices,
            born: BTreeSet::new(),
            client_id: None,
            state: State::AwaitingConnect,
            verdicts: VerdictMap::new(),
        })
    }

    fn is_edge_client(&self, client_id: &str) -> bool {
        self.client_id.as_deref() == Some(client_id)
    }

    fn node_topic(&self, kind: MessageKind) -> String {
        SparkplugTopic::node(&self.edge, kind).to_string()
    }

    fn on_edge_connect(&mut self, event: &ConnectEvent, kind: MessageKind) {
        let Some(will) = &event.will else {
            return;
        };
        let v = &mut self.verdicts;
        v.check(PRINCIPLES_PERSISTENCE_CLEAN_SESSION_311, event.clean_start, || {
            format!("{} connected without a clean session", event.client_id)
        });
        v.check(MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE, true, String::new);
        v.check(
            MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_TOPIC,
            kind == MessageKind::NDeath,
            || format!("will topic is {}, expected an NDEATH topic", will.topic),
        );
        v.check(
            MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_QOS,
            will.qos == Qos::AtLeastOnce,
            || format!("NDEATH will has QoS {}", will.qos),
        );
        v.check(
            MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_WILL_RETAINED,
            !will.retain,
            || "NDEATH will is retained".into(),
        );

        match ProtobufDecoder.decode(&will.payload) {
            Ok(payload) => {
                let bd_seq = payload.find_metric(BD_SEQ_METRIC);
                v.check(
                    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD,
                    payload.metrics.len() == 1 && bd_seq.is_some(),
                    || {
                        format!(
                            "NDEATH will must carry only the bdSeq metric, has {} metrics",
                            payload.metrics.len()
                        )
                    },
                );
                v.check(
                    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD_BDSEQ,
                    bd_seq.and_then(|m| m.integer_value()).is_some(),
                    || "NDEATH will has no integer bdSeq metric".into(),
                );
            }
            Err(err) => {
                v.check(
                    MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD,
                    false,
                    || format!("NDEATH will payload: {err}"),
                );
            }
        }
        self.state = State::AwaitingNodeBirth;
    }

    fn on_node_birth(&mut self, ctx: &mut ScenarioContext<'_>, client_id: &str) {
        let registry = ctx.registry();
        let ncmd = self.node_topic(MessageKind::NCmd);
        let v = &mut self.verdicts;
        v.check(MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_CONNECT, true, String::new);
        v.check(MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_NBIRTH_TOPIC, true, String::new);
        v.check(
            MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_PHID_WAIT,
            registry.is_host_online(&self.host_id),
            || format!("NBIRTH published while host {} is offline", self.host_id),
        );
        v.check(PRINCIPLES_BIRTH_CERTIFICATES_ORDER, true, String::new);

        v.check(
            MESSAGE_FLOW_EDGE_NODE_NCMD_SUBSCRIBE,
            registry.is_subscribed(client_id, &ncmd),
            || format!("NBIRTH published before subscribing to {ncmd}"),
        );
        for device in &self.devices {
            let dcmd =
                SparkplugTopic::device(&self.edge.device(device), MessageKind::DCmd).to_string();
            v.check(
                MESSAGE_FLOW_DEVICE_DCMD_SUBSCRIBE,
                registry.is_subscribed(client_id, &dcmd),
                || format!("NBIRTH published before subscribing to {dcmd}"),
            );
        }

        info!(edge = %self.edge, devices = self.devices.len(), "edge node born");
        if self.devices.is_empty() {
            self.complete(ctx);
        } else {
            self.state = State::AwaitingDeviceBirths;
        }
    }

    fn on_device_message(
        &mut self,
        ctx: &mut ScenarioContext<'_>,
        kind: MessageKind,
        device_id: &str,
    ) {
        if !self.devices.contains(device_id) {
            return;
        }
        match kind {
            MessageKind::DBirth => {
                self.verdicts.check(PAYLOADS_DBIRTH_ORDER, true, String::new);
                self.born.insert(device_id.to_owned());
                if self.born.len() == self.devices.len() {
                    self.complete(ctx);
                }
            }
            MessageKind::DData if !self.born.contains(device_id) => {
                self.verdicts.check(PAYLOADS_DBIRTH_ORDER, false, || {
                    format!("DDATA for {device_id} before its DBIRTH")
                });
            }
            _ => {}
        }
    }

    fn complete(&mut self, ctx: &mut ScenarioContext<'_>) {
        self.state = State::Completed;
        ctx.log(format!("{}: edge node {} session established", self.name(), self.edge));
        ctx.request_end();
    }
}

impl Scenario for EdgeSessionTest {
    fn name(&self) -> String {
        format!("{} {}", Self::DESCRIPTOR.profile, Self::DESCRIPTOR.name)
    }

    fn requirements(&self) -> Vec<&'static str> {
        let mut ids = REQUIREMENTS.to_vec();
        if !self.devices.is_empty() {
            ids.extend_from_slice(DEVICE_REQUIREMENTS);
        }
        ids
    }

    fn verdicts(&self) -> &VerdictMap {
        &self.verdicts
    }

    fn on_connect(&mut self, _ctx: &mut ScenarioContext<'_>, event: &ConnectEvent) {
        if self.state != State::AwaitingConnect {
            return;
        }
        let Some(will) = &event.will else {
            return;
        };
        if let Ok(Topic::Sparkplug(t)) = topic::parse(&will.topic) {
            if t.edge_key() == self.edge && t.device_id.is_none() {
                debug!(client_id = %event.client_id, edge = %self.edge, "edge connection");
                self.client_id = Some(event.client_id.clone());
                self.on_edge_connect(event, t.kind);
            }
        }
    }

    fn on_publish(&mut self, ctx: &mut ScenarioContext<'_>, event: &PublishEvent) {
        if !self.is_edge_client(&event.client_id) || self.state == State::Completed {
            return;
        }
        let Ok(Topic::Sparkplug(t)) = topic::parse(&event.topic) else {
            return;
        };

        if self.state == State::AwaitingNodeBirth {
            match t.kind {
                MessageKind::NBirth if t.edge_key() == self.edge => {
                    self.on_node_birth(ctx, &event.client_id);
                }
                MessageKind::NBirth => {
                    self.verdicts.check(
                        MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_NBIRTH_TOPIC,
                        false,
                        || {
                            format!(
                                "NBIRTH on {}, expected {NAMESPACE}/{}/NBIRTH/{}",
                                event.topic, self.edge.group_id, self.edge.edge_node_id
                            )
                        },
                    );
                }
                kind => {
                    self.verdicts.check(PRINCIPLES_BIRTH_CERTIFICATES_ORDER, false, || {
                        format!("{kind} published on {} before NBIRTH", event.topic)
                    });
                }
            }
            return;
        }

        if t.edge_key() != self.edge {
            return;
        }
        if let Some(device_id) = &t.device_id {
            self.on_device_message(ctx, t.kind, device_id);
        }
    }

    fn end(&mut self, ctx: &mut ScenarioContext<'_>) {
        if self.state != State::Completed {
            ctx.log(format!(
                "{}: ended in state {:?} with {}/{} devices born",
                self.name(),
                self.state,
                self.born.len(),
                self.devices.len()
            ));
        }
    }
}
