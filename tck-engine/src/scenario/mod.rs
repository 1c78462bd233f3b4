//! Scenario Engine.
//!
//! A scenario is a state machine that owns a set of requirement IDs and
//! watches the same event stream as the monitor. Exactly one is active at a
//! time. Scenarios never touch the runtime directly: every side effect
//! (timers, outbound publishes, log lines, early termination) is requested
//! through the [`ScenarioContext`] and applied by the orchestrator once the
//! hook returns.
//!
//! Dispatch from the orchestrator goes through [`ScenarioKind`], a closed
//! enum over the built-in scenarios.
//!
//! # Contract
//!
//! - Construction validates parameters ([`registry::ScenarioCatalog`]);
//!   a rejected scenario never becomes active.
//! - `start` may fail on an unmet precondition; the scenario is discarded.
//! - `on_timer` may fail; the orchestrator then ends the scenario early.
//! - Unexpected events are recorded as verdicts, never as errors.

pub mod edge_session;
pub mod host_session;
pub mod message_ordering;
pub mod registry;

use std::time::Duration;

use tck_core::session::SessionRegistry;
use tck_core::{ConnectEvent, DisconnectEvent, PublishEvent, SubscribeEvent, VerdictMap};

use crate::config::EngineConfig;
use crate::outbound::OutboundMessage;

pub use edge_session::EdgeSessionTest;
pub use host_session::HostSessionTest;
pub use message_ordering::MessageOrderingTest;
pub use registry::{ParamShape, ScenarioCatalog, ScenarioParams};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("{scenario}: expected parameters {expected}, got {got}")]
    ParamCount {
        scenario: String,
        expected: String,
        got: usize,
    },

    #[error("invalid parameter {name}={value:?}: {reason}")]
    InvalidParam {
        name: String,
        value: String,
        reason: String,
    },

    #[error("precondition not met: {0}")]
    Precondition(String),

    #[error("unknown scenario {profile} {name}")]
    UnknownScenario { profile: String, name: String },

    #[error("scenario {profile} {name} is already registered")]
    DuplicateScenario { profile: String, name: String },

    #[error("scheduled action failed: {0}")]
    Timer(String),
}

// ── Timers ──────────────────────────────────────────────────────────

/// Handle to a scheduled action, unique per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Scenario-defined tag handed back to `on_timer` when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerAction(pub u32);

// ── Context ─────────────────────────────────────────────────────────

/// Side effect requested by a scenario hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Schedule {
        token: TimerToken,
        delay: Duration,
        action: TimerAction,
    },
    Cancel(TimerToken),
    Publish(OutboundMessage),
    Log(String),
    End,
}

/// What a scenario hook can see and request.
pub struct ScenarioContext<'a> {
    registry: &'a SessionRegistry,
    config: &'a EngineConfig,
    now_ms: u64,
    next_token: &'a mut u64,
    effects: Vec<Effect>,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(
        registry: &'a SessionRegistry,
        config: &'a EngineConfig,
        now_ms: u64,
        next_token: &'a mut u64,
    ) -> Self {
        Self {
            registry,
            config,
            now_ms,
            next_token,
            effects: Vec::new(),
        }
    }

    /// Session state as updated by the monitor for the current event.
    pub fn registry(&self) -> &'a SessionRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `action` after `delay`. The timer is cancelled automatically
    /// when the scenario ends.
    pub fn schedule(&mut self, delay: Duration, action: TimerAction) -> TimerToken {
        *self.next_token += 1;
        let token = TimerToken(*self.next_token);
        self.effects.push(Effect::Schedule {
            token,
            delay,
            action,
        });
        token
    }

    pub fn cancel(&mut self, token: TimerToken) {
        self.effects.push(Effect::Cancel(token));
    }

    pub fn publish(&mut self, message: OutboundMessage) {
        self.effects.push(Effect::Publish(message));
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.effects.push(Effect::Log(line.into()));
    }

    /// Ask the orchestrator to end this scenario once the hook returns.
    pub fn request_end(&mut self) {
        self.effects.push(Effect::End);
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

/// Lifecycle hooks. Every hook except [`Scenario::verdicts`] and
/// [`Scenario::requirements`] has a no-op default.
pub trait Scenario {
    /// Display name, `<profile> <name>`.
    fn name(&self) -> String;

    /// Requirement IDs this scenario owns. Unset ones are reported as
    /// NOT_EXECUTED.
    fn requirements(&self) -> Vec<&'static str>;

    fn verdicts(&self) -> &VerdictMap;

    /// # Errors
    ///
    /// [`ScenarioError::Precondition`] when the scenario cannot run against
    /// the current session state.
    fn start(&mut self, _ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        Ok(())
    }

    fn on_connect(&mut self, _ctx: &mut ScenarioContext<'_>, _event: &ConnectEvent) {}

    fn on_disconnect(&mut self, _ctx: &mut ScenarioContext<'_>, _event: &DisconnectEvent) {}

    fn on_subscribe(&mut self, _ctx: &mut ScenarioContext<'_>, _event: &SubscribeEvent) {}

    fn on_publish(&mut self, _ctx: &mut ScenarioContext<'_>, _event: &PublishEvent) {}

    /// # Errors
    ///
    /// Any error ends the scenario early.
    fn on_timer(
        &mut self,
        _ctx: &mut ScenarioContext<'_>,
        _action: TimerAction,
    ) -> Result<(), ScenarioError> {
        Ok(())
    }

    /// Called once, after all timers are cancelled and before results are
    /// collected. Schedules requested here are ignored.
    fn end(&mut self, _ctx: &mut ScenarioContext<'_>) {}
}

/// The built-in scenarios.
#[derive(Debug)]
pub enum ScenarioKind {
    EdgeSession(EdgeSessionTest),
    HostSession(HostSessionTest),
    MessageOrdering(MessageOrderingTest),
}

macro_rules! dispatch {
    ($kind:expr, $s:ident => $body:expr) => {
        match $kind {
            ScenarioKind::EdgeSession($s) => $body,
            ScenarioKind::HostSession($s) => $body,
            ScenarioKind::MessageOrdering($s) => $body,
        }
    };
}

impl Scenario for ScenarioKind {
    fn name(&self) -> String {
        dispatch!(self, s => s.name())
    }

    fn requirements(&self) -> Vec<&'static str> {
        dispatch!(self, s => s.requirements())
    }

    fn verdicts(&self) -> &VerdictMap {
        dispatch!(self, s => s.verdicts())
    }

    fn start(&mut self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        dispatch!(self, s => s.start(ctx))
    }

    fn on_connect(&mut self, ctx: &mut ScenarioContext<'_>, event: &ConnectEvent) {
        dispatch!(self, s => s.on_connect(ctx, event))
    }

    fn on_disconnect(&mut self, ctx: &mut ScenarioContext<'_>, event: &DisconnectEvent) {
        dispatch!(self, s => s.on_disconnect(ctx, event))
    }

    fn on_subscribe(&mut self, ctx: &mut ScenarioContext<'_>, event: &SubscribeEvent) {
        dispatch!(self, s => s.on_subscribe(ctx, event))
    }

    fn on_publish(&mut self, ctx: &mut ScenarioContext<'_>, event: &PublishEvent) {
        dispatch!(self, s => s.on_publish(ctx, event))
    }

    fn on_timer(
        &mut self,
        ctx: &mut ScenarioContext<'_>,
        action: TimerAction,
    ) -> Result<(), ScenarioError> {
        dispatch!(self, s => s.on_timer(ctx, action))
    }

    fn end(&mut self, ctx: &mut ScenarioContext<'_>) {
        dispatch!(self, s => s.end(ctx))
    }
}
