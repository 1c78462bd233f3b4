//! Host application reorder timeout.
//!
//! Watches the node-wide `seq` of one edge node. A gap opens a reorder
//! window of `reorder_timeout` (T): missing messages arriving within T are
//! a success; arriving between T and 2T they are late; still missing at 2T,
//! the engine publishes a rebirth NCMD itself. Any NCMD rebirth the host
//! sends after T is credited to the host.

use std::collections::BTreeSet;
use std::time::Duration;

use prost::Message;
use tck_core::constants::REBIRTH_METRIC;
use tck_core::payload::{Payload, PayloadDecoder, ProtobufDecoder};
use tck_core::requirements::*;
use tck_core::sequence::{gap, next_seq, to_seq};
use tck_core::topic::{self, EdgeNodeKey, MessageKind, SparkplugTopic, Topic};
use tck_core::{PublishEvent, Qos, VerdictMap};
use tracing::{debug, info, warn};

use super::registry::{ParamShape, ScenarioParams, ScenarioDescriptor};
use super::{
    Scenario, ScenarioContext, ScenarioError, ScenarioKind, TimerAction, TimerToken,
};
use crate::outbound::OutboundMessage;

const REQUIREMENTS: &[&str] = &[
    OPERATIONAL_BEHAVIOR_HOST_REORDERING_PARAM,
    OPERATIONAL_BEHAVIOR_HOST_REORDERING_START,
    OPERATIONAL_BEHAVIOR_HOST_REORDERING_REBIRTH,
    OPERATIONAL_BEHAVIOR_HOST_REORDERING_SUCCESS,
];

/// Fires after T.
pub const REORDER_TIMEOUT: TimerAction = TimerAction(1);
/// Fires after 2T.
pub const REBIRTH_DEADLINE: TimerAction = TimerAction(2);

/// A `seq` at least this far ahead of the expected one (modulo 256) is
/// behind it: a redelivery, not a gap.
const BEHIND_WINDOW: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Tracking `seq`, no gap seen.
    InOrder,
    /// Gap open, within T.
    Reordering,
    /// Gap open, past T.
    TimedOut,
    Completed,
}

#[derive(Debug)]
pub struct MessageOrderingTest {
    host_id: String,
    edge: EdgeNodeKey,
    device_id: String,
    reorder_timeout: Duration,
    expected: Option<u8>,
    missing: BTreeSet<u8>,
    timers: Vec<TimerToken>,
    rebirth_seen: bool,
    state: State,
    verdicts: VerdictMap,
}

impl MessageOrderingTest {
    pub const DESCRIPTOR: ScenarioDescriptor = ScenarioDescriptor {
        profile: "host",
        name: "MessageOrderingTest",
        shape: ParamShape::Exact(&[
            "host_id",
            "group_id",
            "edge_node_id",
            "device_id",
            "reorder_timeout_ms",
        ]),
        factory: Self::factory,
    };

    fn factory(params: &ScenarioParams) -> Result<ScenarioKind, ScenarioError> {
        Self::from_params(params).map(ScenarioKind::MessageOrdering)
    }

    /// # Errors
    ///
    /// [`ScenarioError::InvalidParam`] for an invalid identifier or a
    /// timeout that is not a positive number of milliseconds.
    pub fn from_params(params: &ScenarioParams) -> Result<Self, ScenarioError> {
        let host_id = params.id(0, "host_id")?;
        let group_id = params.id(1, "group_id")?;
        let edge_node_id = params.id(2, "edge_node_id")?;
        let device_id = params.id(3, "device_id")?;
        let timeout_ms = params.positive_u64(4, "reorder_timeout_ms")?;
        Ok(Self {
            host_id,
            edge: EdgeNodeKey::new(group_id, edge_node_id),
            device_id,
            reorder_timeout: Duration::from_millis(timeout_ms),
            expected: None,
            missing: BTreeSet::new(),
            timers: Vec::new(),
            rebirth_seen: false,
            state: State::InOrder,
            verdicts: VerdictMap::new(),
        })
    }

    pub fn reorder_timeout(&self) -> Duration {
        self.reorder_timeout
    }

    fn gap_open(&self) -> bool {
        matches!(self.state, State::Reordering | State::TimedOut)
    }

    fn observe_seq(&mut self, ctx: &mut ScenarioContext<'_>, kind: MessageKind, seq: u8) {
        if kind == MessageKind::NBirth && !self.gap_open() {
            self.expected = Some(next_seq(seq));
            return;
        }
        let Some(expected) = self.expected else {
            // Joined mid-session: adopt the stream.
            self.expected = Some(next_seq(seq));
            return;
        };

        if seq == expected {
            self.expected = Some(next_seq(seq));
        } else if self.missing.remove(&seq) {
            debug!(edge = %self.edge, seq, remaining = self.missing.len(), "missing message arrived");
            if self.missing.is_empty() {
                self.on_gap_filled(ctx);
            }
        } else if gap(expected, seq) >= BEHIND_WINDOW {
            debug!(edge = %self.edge, seq, expected, "duplicate or stale seq ignored");
        } else {
            self.on_gap(ctx, expected, seq);
        }
    }

    fn on_gap(&mut self, ctx: &mut ScenarioContext<'_>, expected: u8, received: u8) {
        let count = gap(expected, received);
        let mut s = expected;
        for _ in 0..count {
            self.missing.insert(s);
            s = next_seq(s);
        }
        self.expected = Some(next_seq(received));
        info!(
            edge = %self.edge,
            expected,
            received,
            missing = count,
            "sequence gap, reorder window opened"
        );

        if self.state == State::InOrder {
            self.verdicts
                .check(OPERATIONAL_BEHAVIOR_HOST_REORDERING_START, true, String::new);
            self.timers.push(ctx.schedule(self.reorder_timeout, REORDER_TIMEOUT));
            self.timers.push(ctx.schedule(self.reorder_timeout * 2, REBIRTH_DEADLINE));
            self.state = State::Reordering;
        }
    }

    fn on_gap_filled(&mut self, ctx: &mut ScenarioContext<'_>) {
        let in_time = self.state == State::Reordering;
        let timeout = self.reorder_timeout;
        self.verdicts
            .check(OPERATIONAL_BEHAVIOR_HOST_REORDERING_SUCCESS, in_time, || {
                format!("missing messages arrived after the reorder timeout of {timeout:?}")
            });
        if self.rebirth_seen {
            self.verdicts
                .check(OPERATIONAL_BEHAVIOR_HOST_REORDERING_REBIRTH, true, String::new);
        }
        for token in self.timers.drain(..) {
            ctx.cancel(token);
        }
        self.complete(ctx, if in_time { "recovered" } else { "recovered late" });
    }

    fn is_rebirth_request(&self, ctx: &ScenarioContext<'_>, event: &PublishEvent) -> bool {
        let owner = ctx
            .registry()
            .host(&self.host_id)
            .and_then(|h| h.owner.as_deref());
        if owner != Some(event.client_id.as_str()) {
            return false;
        }
        ProtobufDecoder.decode(&event.payload).is_ok_and(|p| {
            p.find_metric(REBIRTH_METRIC)
                .and_then(|m| m.boolean_value())
                .unwrap_or(false)
        })
    }

    fn complete(&mut self, ctx: &mut ScenarioContext<'_>, outcome: &str) {
        self.state = State::Completed;
        ctx.log(format!(
            "{}: {} reorder window for {}/{} {outcome}",
            self.name(),
            self.host_id,
            self.edge,
            self.device_id
        ));
        ctx.request_end();
    }

    fn publish_rebirth(&self, ctx: &mut ScenarioContext<'_>) {
        let topic = SparkplugTopic::node(&self.edge, MessageKind::NCmd).to_string();
        let payload = Payload::rebirth_command(ctx.now_ms()).encode_to_vec();
        info!(edge = %self.edge, %topic, "requesting rebirth");
        ctx.publish(OutboundMessage {
            topic,
            payload,
            qos: Qos::AtMostOnce,
            retain: false,
        });
    }
}

impl Scenario for MessageOrderingTest {
    fn name(&self) -> String {
        format!("{} {}", Self::DESCRIPTOR.profile, Self::DESCRIPTOR.name)
    }

    fn requirements(&self) -> Vec<&'static str> {
        REQUIREMENTS.to_vec()
    }

    fn verdicts(&self) -> &VerdictMap {
        &self.verdicts
    }

    fn start(&mut self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        if !ctx.registry().is_host_online(&self.host_id) {
            return Err(ScenarioError::Precondition(format!(
                "host application {} must be online",
                self.host_id
            )));
        }
        self.verdicts
            .check(OPERATIONAL_BEHAVIOR_HOST_REORDERING_PARAM, true, String::new);
        if let Some(edge) = ctx.registry().edge(&self.edge) {
            self.expected = Some(next_seq(edge.seq));
        }
        Ok(())
    }

    fn on_publish(&mut self, ctx: &mut ScenarioContext<'_>, event: &PublishEvent) {
        if self.state == State::Completed {
            return;
        }
        let Ok(Topic::Sparkplug(t)) = topic::parse(&event.topic) else {
            return;
        };
        if t.edge_key() != self.edge {
            return;
        }

        if t.kind == MessageKind::NCmd {
            if self.state == State::TimedOut && self.is_rebirth_request(ctx, event) {
                debug!(client_id = %event.client_id, "host requested rebirth");
                self.rebirth_seen = true;
            }
            return;
        }
        if !carries_seq(t.kind) {
            return;
        }
        let seq = match ProtobufDecoder.decode(&event.payload) {
            Ok(payload) => payload.seq.and_then(to_seq),
            Err(_) => None,
        };
        if let Some(seq) = seq {
            self.observe_seq(ctx, t.kind, seq);
        }
    }

    fn on_timer(
        &mut self,
        ctx: &mut ScenarioContext<'_>,
        action: TimerAction,
    ) -> Result<(), ScenarioError> {
        match action {
            REORDER_TIMEOUT => {
                if self.state == State::Reordering {
                    debug!(edge = %self.edge, missing = ?self.missing, "reorder timeout elapsed");
                    self.state = State::TimedOut;
                }
                Ok(())
            }
            REBIRTH_DEADLINE => {
                if self.state != State::TimedOut {
                    return Ok(());
                }
                self.timers.clear();
                self.publish_rebirth(ctx);
                let missing = self.missing.clone();
                self.verdicts
                    .check(OPERATIONAL_BEHAVIOR_HOST_REORDERING_SUCCESS, false, || {
                        format!("messages {missing:?} never arrived")
                    });
                let host_id = self.host_id.clone();
                self.verdicts.check(
                    OPERATIONAL_BEHAVIOR_HOST_REORDERING_REBIRTH,
                    self.rebirth_seen,
                    || format!("{host_id} sent no rebirth request after the reorder timeout"),
                );
                self.complete(ctx, "expired");
                Ok(())
            }
            TimerAction(other) => Err(ScenarioError::Timer(format!(
                "{}: unknown timer action {other}",
                self.name()
            ))),
        }
    }

    fn end(&mut self, ctx: &mut ScenarioContext<'_>) {
        if self.gap_open() {
            warn!(edge = %self.edge, missing = ?self.missing, "ended with reorder window open");
            ctx.log(format!(
                "{}: ended with {} messages missing",
                self.name(),
                self.missing.len()
            ));
        }
    }
}

/// Message kinds carrying the node-wide `seq`.
fn carries_seq(kind: MessageKind) -> bool {
    matches!(
        kind,
        MessageKind::NBirth
            | MessageKind::NData
            | MessageKind::DBirth
            | MessageKind::DData
            | MessageKind::DDeath
    )
}
