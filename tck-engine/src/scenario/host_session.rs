//! Host application session establishment.
//!
//! `AwaitingConnect → AwaitingSubscribe → AwaitingBirth → Completed`.

use tck_core::constants::{NAMESPACE, STATE_TOPIC_LEVEL};
use tck_core::payload::StatePayload;
use tck_core::requirements::*;
use tck_core::session::SessionRegistry;
use tck_core::topic::{self, state_topic, Topic};
use tck_core::{ConnectEvent, PublishEvent, Qos, SubscribeEvent, VerdictMap};
use tracing::{debug, info};

use super::registry::{ParamShape, ScenarioParams, ScenarioDescriptor};
use super::{Scenario, ScenarioContext, ScenarioError, ScenarioKind};

const REQUIREMENTS: &[&str] = &[
    MESSAGE_FLOW_PHID_SPARKPLUG_CLEAN_SESSION_311,
    PAYLOADS_STATE_WILL_MESSAGE,
    PAYLOADS_STATE_WILL_MESSAGE_QOS,
    PAYLOADS_STATE_WILL_MESSAGE_RETAIN,
    PAYLOADS_STATE_SUBSCRIBE,
    MESSAGE_FLOW_PHID_SPARKPLUG_SUBSCRIPTION,
    MESSAGE_FLOW_PHID_SPARKPLUG_STATE_PUBLISH,
    HOST_TOPIC_PHID_BIRTH_REQUIRED,
    INTRO_SPARKPLUG_HOST_STATE,
    COMPONENTS_PH_STATE,
];

/// Topic a namespace-wide subscription must match.
const NAMESPACE_TOPIC: &str = "spBv1.0/#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingConnect,
    AwaitingSubscribe,
    AwaitingBirth,
    Completed,
}

#[derive(Debug)]
pub struct HostSessionTest {
    host_id: String,
    client_id: Option<String>,
    state: State,
    verdicts: VerdictMap,
}

impl HostSessionTest {
    pub const DESCRIPTOR: ScenarioDescriptor = ScenarioDescriptor {
        profile: "host",
        name: "SessionEstablishmentTest",
        shape: ParamShape::Exact(&["host_id"]),
        factory: Self::factory,
    };

    fn factory(params: &ScenarioParams) -> Result<ScenarioKind, ScenarioError> {
        Self::from_params(params).map(ScenarioKind::HostSession)
    }

    /// # Errors
    ///
    /// [`ScenarioError::InvalidParam`] for an invalid host id.
    pub fn from_params(params: &ScenarioParams) -> Result<Self, ScenarioError> {
        Ok(Self {
            host_id: params.id(0, "host_id")?,
            client_id: None,
            state: State::AwaitingConnect,
            verdicts: VerdictMap::new(),
        })
    }

    fn is_host_client(&self, client_id: &str) -> bool {
        self.client_id.as_deref() == Some(client_id)
    }

    fn subscribed_to_namespace(&self, registry: &SessionRegistry, client_id: &str) -> bool {
        registry.is_subscribed(client_id, NAMESPACE_TOPIC)
    }

    fn subscribed_to_state(&self, registry: &SessionRegistry, client_id: &str) -> bool {
        registry.is_subscribed(client_id, &state_topic(&self.host_id))
            || registry.is_subscribed(
                client_id,
                &format!("{NAMESPACE}/{STATE_TOPIC_LEVEL}/{}", self.host_id),
            )
    }

    fn on_online(&mut self, ctx: &mut ScenarioContext<'_>, event: &PublishEvent) {
        let registry = ctx.registry();
        let namespace = self.subscribed_to_namespace(registry, &event.client_id);
        let state = self.subscribed_to_state(registry, &event.client_id);
        let v = &mut self.verdicts;
        v.check(MESSAGE_FLOW_PHID_SPARKPLUG_SUBSCRIPTION, namespace && state, || {
            format!(
                "online STATE published before subscribing (namespace: {namespace}, STATE: {state})"
            )
        });
        v.check(PAYLOADS_STATE_SUBSCRIBE, state, || {
            format!("online STATE published before subscribing to {}", state_topic(&self.host_id))
        });
        for id in [
            MESSAGE_FLOW_PHID_SPARKPLUG_STATE_PUBLISH,
            HOST_TOPIC_PHID_BIRTH_REQUIRED,
            INTRO_SPARKPLUG_HOST_STATE,
            COMPONENTS_PH_STATE,
        ] {
            v.check(id, true, String::new);
        }
        info!(host_id = %self.host_id, client_id = %event.client_id, "host application online");
        self.state = State::Completed;
        ctx.log(format!("{}: host {} online", self.name(), self.host_id));
        ctx.request_end();
    }
}

impl Scenario for HostSessionTest {
    fn name(&self) -> String {
        format!("{} {}", Self::DESCRIPTOR.profile, Self::DESCRIPTOR.name)
    }

    fn requirements(&self) -> Vec<&'static str> {
        REQUIREMENTS.to_vec()
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
        match topic::parse(&will.topic) {
            Ok(Topic::State { host_id }) if host_id == self.host_id => {}
            _ => return,
        }
        debug!(client_id = %event.client_id, host_id = %self.host_id, "host connection");
        self.client_id = Some(event.client_id.clone());

        let v = &mut self.verdicts;
        v.check(MESSAGE_FLOW_PHID_SPARKPLUG_CLEAN_SESSION_311, event.clean_start, || {
            format!("{} connected without a clean session", event.client_id)
        });
        v.check(
            PAYLOADS_STATE_WILL_MESSAGE,
            StatePayload::from_json(&will.payload).is_ok_and(|s| s.online == Some(false)),
            || "STATE will payload is not an offline STATE".into(),
        );
        v.check(PAYLOADS_STATE_WILL_MESSAGE_QOS, will.qos == Qos::AtLeastOnce, || {
            format!("STATE will has QoS {}", will.qos)
        });
        v.check(PAYLOADS_STATE_WILL_MESSAGE_RETAIN, will.retain, || {
            "STATE will is not retained".into()
        });
        self.state = State::AwaitingSubscribe;
    }

    fn on_subscribe(&mut self, ctx: &mut ScenarioContext<'_>, event: &SubscribeEvent) {
        if self.state != State::AwaitingSubscribe || !self.is_host_client(&event.client_id) {
            return;
        }
        let registry = ctx.registry();
        if self.subscribed_to_namespace(registry, &event.client_id)
            && self.subscribed_to_state(registry, &event.client_id)
        {
            debug!(client_id = %event.client_id, "host subscriptions complete");
            self.state = State::AwaitingBirth;
        }
    }

    fn on_publish(&mut self, ctx: &mut ScenarioContext<'_>, event: &PublishEvent) {
        if !matches!(self.state, State::AwaitingSubscribe | State::AwaitingBirth)
            || !self.is_host_client(&event.client_id)
        {
            return;
        }
        match topic::parse(&event.topic) {
            Ok(Topic::State { host_id }) if host_id == self.host_id => {}
            _ => return,
        }
        match StatePayload::from_json(&event.payload) {
            Ok(state) if state.online == Some(true) => self.on_online(ctx, event),
            _ => {}
        }
    }

    fn end(&mut self, ctx: &mut ScenarioContext<'_>) {
        if self.state != State::Completed {
            ctx.log(format!("{}: ended in state {:?}", self.name(), self.state));
        }
    }
}
