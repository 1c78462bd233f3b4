//! Invariant Monitor.
//!
//! Permanently active observer of the protocol event stream. Every event
//! updates the [`SessionRegistry`] and evaluates the cross-cutting rules:
//! sequence continuity, birth/death correlation, identity uniqueness, host
//! online semantics, metric/alias/template shape.
//!
//! The monitor is synchronous and single-owner. It is driven by one caller
//! (the orchestrator actor), so it holds no locks.
//!
//! # Failure semantics
//!
//! A violated rule is a verdict write keyed by its requirement ID. A
//! payload that does not decode is a FAIL for the requirement that needed
//! it. Nothing here returns an error for bad traffic; each `on_*` call
//! returns the [`Finding`]s it produced for that single event.

mod edge;
mod host;
mod metrics;
mod rules;

use tracing::debug;

use crate::constants::DEFAULT_UTC_WINDOW_MS;
use crate::event::{ConnectEvent, DisconnectEvent, PublishEvent, SubscribeEvent};
use crate::payload::{PayloadDecoder, ProtobufDecoder};
use crate::requirements::TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_NON_ASSOCIATED_MESSAGE_TYPES;
use crate::session::{Eviction, SessionRegistry};
use crate::topic::{self, MessageKind, Topic};
use crate::verdict::{Verdict, VerdictMap};

/// One rule evaluation caused by one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub requirement: &'static str,
    pub verdict: Verdict,
    pub detail: Option<String>,
}

/// Per-event evaluation scratchpad: writes through to the verdict map and
/// keeps the findings of this event.
pub(crate) struct Eval<'a> {
    verdicts: &'a mut VerdictMap,
    findings: Vec<Finding>,
    /// Client id of the event, for log context.
    client_id: &'a str,
}

impl<'a> Eval<'a> {
    fn new(verdicts: &'a mut VerdictMap, client_id: &'a str) -> Self {
        Self {
            verdicts,
            findings: Vec::new(),
            client_id,
        }
    }

    /// Evaluate one rule. Returns `ok` so callers can chain on it.
    pub(crate) fn check(
        &mut self,
        requirement: &'static str,
        ok: bool,
        detail: impl FnOnce() -> String,
    ) -> bool {
        let detail = if ok { None } else { Some(detail()) };
        let verdict = self
            .verdicts
            .check(requirement, ok, || detail.clone().unwrap_or_default());
        if !ok {
            debug!(
                client_id = %self.client_id,
                requirement,
                verdict = %verdict,
                detail = detail.as_deref().unwrap_or(""),
                "rule violated"
            );
        }
        self.findings.push(Finding {
            requirement,
            verdict,
            detail,
        });
        ok
    }

    /// Evaluate the same outcome against several requirements.
    pub(crate) fn check_all(
        &mut self,
        requirements: &[&'static str],
        ok: bool,
        detail: impl Fn() -> String,
    ) -> bool {
        for &requirement in requirements {
            self.check(requirement, ok, &detail);
        }
        ok
    }

    fn finish(self) -> Vec<Finding> {
        self.findings
    }
}

pub struct Monitor {
    registry: SessionRegistry,
    verdicts: VerdictMap,
    decoder: Box<dyn PayloadDecoder>,
    utc_window_ms: u64,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(Box::new(ProtobufDecoder))
    }
}

impl Monitor {
    pub fn new(decoder: Box<dyn PayloadDecoder>) -> Self {
        Self {
            registry: SessionRegistry::new(),
            verdicts: VerdictMap::new(),
            decoder,
            utc_window_ms: DEFAULT_UTC_WINDOW_MS,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn verdicts(&self) -> &VerdictMap {
        &self.verdicts
    }

    /// Start a new verdict namespace. Session state is kept: sessions span
    /// scenario boundaries.
    pub fn reset_verdicts(&mut self) {
        self.verdicts.clear();
    }

    /// Forget sessions and verdicts.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.verdicts.clear();
    }

    pub fn utc_window_ms(&self) -> u64 {
        self.utc_window_ms
    }

    pub fn set_utc_window_ms(&mut self, window_ms: u64) {
        self.utc_window_ms = window_ms;
    }

    /// A client connected. Its will message, if any, is the death
    /// certificate: an NDEATH for edge nodes, a STATE for host applications.
    pub fn on_connect(&mut self, event: &ConnectEvent, now_ms: u64) -> Vec<Finding> {
        let mut eval = Eval::new(&mut self.verdicts, &event.client_id);
        let Some(will) = &event.will else {
            return eval.finish();
        };
        match topic::parse(&will.topic) {
            Ok(Topic::Sparkplug(t)) if t.kind == MessageKind::NDeath && t.device_id.is_none() => {
                edge::on_edge_certificate(
                    &mut self.registry,
                    self.decoder.as_ref(),
                    &mut eval,
                    event,
                    will,
                    t.edge_key(),
                );
            }
            Ok(Topic::State { host_id }) => {
                host::on_host_certificate(&mut self.registry, &mut eval, event, will, &host_id, now_ms);
            }
            _ => {
                debug!(client_id = %event.client_id, topic = %will.topic, "will is not a death certificate");
            }
        }
        eval.finish()
    }

    /// Connection loss: cascade-evict everything the connection owned.
    pub fn on_disconnect(&mut self, event: &DisconnectEvent) -> Eviction {
        let eviction = self.registry.evict_connection(&event.client_id);
        debug!(
            client_id = %event.client_id,
            edges = eviction.edges.len(),
            devices = eviction.devices,
            hosts = eviction.hosts_offline.len(),
            "connection evicted"
        );
        eviction
    }

    pub fn on_subscribe(&mut self, event: &SubscribeEvent) {
        self.registry
            .record_subscriptions(&event.client_id, &event.topic_filters);
    }

    /// A client published. Dispatches on the topic.
    pub fn on_publish(&mut self, event: &PublishEvent, now_ms: u64) -> Vec<Finding> {
        let mut eval = Eval::new(&mut self.verdicts, &event.client_id);
        match topic::parse(&event.topic) {
            Ok(Topic::Sparkplug(t)) => edge::on_sparkplug(
                &mut self.registry,
                self.decoder.as_ref(),
                &mut eval,
                event,
                &t,
                now_ms,
                self.utc_window_ms,
            ),
            Ok(Topic::State { host_id }) => {
                host::on_state(&mut self.registry, &mut eval, event, &host_id)
            }
            Ok(Topic::Control(_)) | Ok(Topic::Other) => {}
            Err(err) => {
                debug!(client_id = %event.client_id, %err, "unrecognised topic");
                if let Some(kind) = topic::misplaced_device_level(&event.topic) {
                    eval.check(
                        TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_NON_ASSOCIATED_MESSAGE_TYPES,
                        false,
                        || format!("{kind} topic {} carries a device id", event.topic),
                    );
                }
            }
        }
        eval.finish()
    }
}
