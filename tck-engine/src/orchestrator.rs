//! Orchestrator actor.
//!
//! A single tokio task owns the [`Monitor`] (and through it the session
//! registry), the scenario catalog and the active [`ScenarioRecord`]. The
//! broker integration talks to it through a cloneable [`EngineHandle`];
//! every call becomes a [`Command`] on an unbounded channel, so events from
//! any number of connection tasks are applied one at a time in arrival
//! order.
//!
//! # Event flow
//!
//! ```text
//! EngineHandle ──Command──▶ actor ──▶ Monitor::on_*      (always)
//!                                 └─▶ Scenario::on_*     (when running)
//!                                        │ effects
//!                                        ▼
//!                    timers · OutboundSink · end → aggregate → ResultsSink
//! ```
//!
//! Publishes on `SPARKPLUG_TCK/*` are control traffic: they are parsed
//! here and reach neither the monitor nor the scenario.
//!
//! # Timers
//!
//! Each scheduled action is a spawned task sleeping until its deadline,
//! which then posts [`Command::Timer`] back through a weak sender. Its
//! abort handle is stored on the record under the [`TimerToken`]; ending
//! the scenario aborts all of them. A timer arriving with a stale run id or
//! an unknown token is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tck_core::constants::{CONTROL_TOPIC_PREFIX, MONITOR_PREFIX};
use tck_core::payload::PayloadDecoder;
use tck_core::{
    aggregate, ConnectEvent, DisconnectEvent, Finding, Monitor, ProtocolEvent, PublishEvent,
    Qos, ResultRecord, SubscribeEvent, Verdict, VerdictMap,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::control::{self, ControlCommand};
use crate::outbound::{OutboundMessage, OutboundSink, ResultsSink, TracingSink};
use crate::scenario::{
    Effect, Scenario, ScenarioCatalog, ScenarioContext, ScenarioError, ScenarioKind,
    ScenarioParams, TimerAction, TimerToken,
};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("engine has stopped")]
    Closed,

    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

// ── Commands ────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum Command {
    Event(ProtocolEvent),
    Start {
        profile: String,
        name: String,
        params: Vec<String>,
        reply: oneshot::Sender<Result<String, ScenarioError>>,
    },
    End {
        reply: oneshot::Sender<Option<ResultRecord>>,
    },
    Timer {
        run_id: u64,
        token: TimerToken,
        action: TimerAction,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Monitor verdicts of the current run.
    pub monitor: VerdictMap,
    /// Display name of the active scenario.
    pub scenario: Option<String>,
    pub edge_nodes: usize,
    pub devices: usize,
    pub utc_window_ms: u64,
}

// ── Scenario record ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Pending,
    Running,
    Ended,
}

/// The active scenario and everything scoped to its run.
#[derive(Debug)]
pub struct ScenarioRecord {
    pub run_id: u64,
    pub profile: String,
    pub name: String,
    pub scenario: ScenarioKind,
    pub lifecycle: Lifecycle,
    timers: HashMap<TimerToken, AbortHandle>,
}

impl ScenarioRecord {
    fn cancel_timers(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

// ── Builder ─────────────────────────────────────────────────────────

pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    outbound: Arc<dyn OutboundSink>,
    results: Arc<dyn ResultsSink>,
    catalog: ScenarioCatalog,
    monitor: Monitor,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let mut monitor = Monitor::default();
        monitor.set_utc_window_ms(config.utc_window_ms);
        Self {
            config,
            clock: Arc::new(SystemClock),
            outbound: Arc::new(TracingSink),
            results: Arc::new(TracingSink),
            catalog: ScenarioCatalog::builtin(),
            monitor,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_outbound(mut self, outbound: Arc<dyn OutboundSink>) -> Self {
        self.outbound = outbound;
        self
    }

    pub fn with_results(mut self, results: Arc<dyn ResultsSink>) -> Self {
        self.results = results;
        self
    }

    pub fn with_catalog(mut self, catalog: ScenarioCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_decoder(mut self, decoder: Box<dyn PayloadDecoder>) -> Self {
        let window = self.monitor.utc_window_ms();
        self.monitor = Monitor::new(decoder);
        self.monitor.set_utc_window_ms(window);
        self
    }

    /// Spawn the actor on the current tokio runtime.
    ///
    /// The actor runs until every [`EngineHandle`] is dropped; an active
    /// scenario is then ended and its result delivered.
    pub fn spawn(self) -> (EngineHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = Actor {
            config: self.config,
            clock: self.clock,
            outbound: self.outbound,
            results: self.results,
            catalog: self.catalog,
            monitor: self.monitor,
            active: None,
            next_run_id: 0,
            next_token: 0,
            self_tx: tx.downgrade(),
            rx,
        };
        let join = tokio::spawn(actor.run());
        (EngineHandle { tx }, join)
    }
}

// ── Handle ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    /// # Errors
    ///
    /// [`EngineError::Closed`] if the actor has stopped.
    pub fn send_event(&self, event: ProtocolEvent) -> Result<(), EngineError> {
        self.tx
            .send(Command::Event(event))
            .map_err(|_| EngineError::Closed)
    }

    /// # Errors
    ///
    /// [`EngineError::Closed`] if the actor has stopped.
    pub fn connect(&self, event: ConnectEvent) -> Result<(), EngineError> {
        self.send_event(ProtocolEvent::Connect(event))
    }

    /// # Errors
    ///
    /// [`EngineError::Closed`] if the actor has stopped.
    pub fn disconnect(&self, event: DisconnectEvent) -> Result<(), EngineError> {
        self.send_event(ProtocolEvent::Disconnect(event))
    }

    /// # Errors
    ///
    /// [`EngineError::Closed`] if the actor has stopped.
    pub fn subscribe(&self, event: SubscribeEvent) -> Result<(), EngineError> {
        self.send_event(ProtocolEvent::Subscribe(event))
    }

    /// # Errors
    ///
    /// [`EngineError::Closed`] if the actor has stopped.
    pub fn publish(&self, event: PublishEvent) -> Result<(), EngineError> {
        self.send_event(ProtocolEvent::Publish(event))
    }

    /// Start a scenario, ending the active one first. Returns the display
    /// name of the started scenario.
    ///
    /// # Errors
    ///
    /// [`EngineError::Scenario`] if the scenario is unknown, its
    /// parameters are rejected or its precondition fails; the engine stays
    /// usable. [`EngineError::Closed`] if the actor has stopped.
    pub async fn start_scenario(
        &self,
        profile: &str,
        name: &str,
        params: Vec<String>,
    ) -> Result<String, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Start {
                profile: profile.to_owned(),
                name: name.to_owned(),
                params,
                reply,
            })
            .map_err(|_| EngineError::Closed)?;
        Ok(rx.await.map_err(|_| EngineError::Closed)??)
    }

    /// End the active scenario and return its result, or `None` if no
    /// scenario was running.
    ///
    /// # Errors
    ///
    /// [`EngineError::Closed`] if the actor has stopped.
    pub async fn end_scenario(&self) -> Result<Option<ResultRecord>, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::End { reply })
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    /// # Errors
    ///
    /// [`EngineError::Closed`] if the actor has stopped.
    pub async fn snapshot(&self) -> Result<Snapshot, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)
    }
}

// ── Actor ───────────────────────────────────────────────────────────

struct Actor {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    outbound: Arc<dyn OutboundSink>,
    results: Arc<dyn ResultsSink>,
    catalog: ScenarioCatalog,
    monitor: Monitor,
    active: Option<ScenarioRecord>,
    next_run_id: u64,
    next_token: u64,
    self_tx: mpsc::WeakUnboundedSender<Command>,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl Actor {
    async fn run(mut self) {
        info!(utc_window_ms = self.config.utc_window_ms, "engine started");
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        if self.active.is_some() {
            self.end_active();
        }
        info!("engine stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Event(event) => self.on_event(event),
            Command::Start {
                profile,
                name,
                params,
                reply,
            } => {
                let result = self.start(profile, name, params);
                let _ = reply.send(result);
            }
            Command::End { reply } => {
                let record = self.end_active();
                let _ = reply.send(record);
            }
            Command::Timer {
                run_id,
                token,
                action,
            } => self.on_timer(run_id, token, action),
            Command::Snapshot { reply } => {
                let registry = self.monitor.registry();
                let _ = reply.send(Snapshot {
                    monitor: self.monitor.verdicts().clone(),
                    scenario: self.active.as_ref().map(|r| r.scenario.name()),
                    edge_nodes: registry.edge_count(),
                    devices: registry.device_count(),
                    utc_window_ms: self.monitor.utc_window_ms(),
                });
            }
        }
    }

    // ── Events ──────────────────────────────────────────────────────────

    fn on_event(&mut self, event: ProtocolEvent) {
        let now_ms = self.clock.now_ms();
        match &event {
            ProtocolEvent::Publish(p) if p.topic.starts_with(CONTROL_TOPIC_PREFIX) => {
                self.on_control(p);
                return;
            }
            ProtocolEvent::Connect(e) => {
                let findings = self.monitor.on_connect(e, now_ms);
                log_findings(&e.client_id, &findings);
            }
            ProtocolEvent::Disconnect(e) => {
                let eviction = self.monitor.on_disconnect(e);
                debug!(
                    client_id = %e.client_id,
                    reason = e.reason.as_deref().unwrap_or(""),
                    edges = eviction.edges.len(),
                    devices = eviction.devices,
                    hosts_offline = eviction.hosts_offline.len(),
                    "connection lost"
                );
            }
            ProtocolEvent::Subscribe(e) => self.monitor.on_subscribe(e),
            ProtocolEvent::Publish(e) => {
                let findings = self.monitor.on_publish(e, now_ms);
                log_findings(&e.client_id, &findings);
            }
        }

        self.drive(|scenario, ctx| match &event {
            ProtocolEvent::Connect(e) => scenario.on_connect(ctx, e),
            ProtocolEvent::Disconnect(e) => scenario.on_disconnect(ctx, e),
            ProtocolEvent::Subscribe(e) => scenario.on_subscribe(ctx, e),
            ProtocolEvent::Publish(e) => scenario.on_publish(ctx, e),
        });
    }

    fn on_control(&mut self, event: &PublishEvent) {
        match control::parse(&event.topic, &event.payload) {
            Ok(Some(ControlCommand::NewTest {
                profile,
                name,
                params,
            })) => {
                // Rejections are already logged and published.
                let _ = self.start(profile, name, params);
            }
            Ok(Some(ControlCommand::EndTest)) => {
                if self.end_active().is_none() {
                    warn!(client_id = %event.client_id, "END_TEST with no active scenario");
                }
            }
            Ok(Some(ControlCommand::UtcWindow(window_ms))) => {
                info!(window_ms, "UTC window updated");
                self.monitor.set_utc_window_ms(window_ms);
                self.config.utc_window_ms = window_ms;
            }
            Ok(Some(ControlCommand::Log(line))) => {
                info!(client_id = %event.client_id, "{line}");
            }
            Ok(None) => {
                debug!(topic = %event.topic, "ignoring control topic");
            }
            Err(err) => {
                warn!(client_id = %event.client_id, topic = %event.topic, %err, "rejected control message");
            }
        }
    }

    /// Run a hook on the running scenario and apply what it requested.
    fn drive<R>(
        &mut self,
        hook: impl FnOnce(&mut ScenarioKind, &mut ScenarioContext<'_>) -> R,
    ) -> Option<R> {
        let record = self.active.as_mut()?;
        if record.lifecycle != Lifecycle::Running {
            return None;
        }
        let mut ctx = ScenarioContext::new(
            self.monitor.registry(),
            &self.config,
            self.clock.now_ms(),
            &mut self.next_token,
        );
        let out = hook(&mut record.scenario, &mut ctx);
        let effects = ctx.into_effects();
        self.apply(effects);
        Some(out)
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        let mut end = false;
        for effect in effects {
            match effect {
                Effect::Schedule {
                    token,
                    delay,
                    action,
                } => self.schedule(token, delay, action),
                Effect::Cancel(token) => {
                    if let Some(handle) = self
                        .active
                        .as_mut()
                        .and_then(|r| r.timers.remove(&token))
                    {
                        handle.abort();
                    }
                }
                Effect::Publish(message) => self.outbound.publish(message),
                Effect::Log(line) => self.publish_log(line),
                Effect::End => end = true,
            }
        }
        if end {
            self.end_active();
        }
    }

    fn publish_log(&self, line: String) {
        info!(log = %line, "scenario log");
        self.outbound.publish(OutboundMessage::text(
            &self.config.log_topic,
            line,
            Qos::AtMostOnce,
        ));
    }

    // ── Timers ──────────────────────────────────────────────────────────

    fn schedule(&mut self, token: TimerToken, delay: Duration, action: TimerAction) {
        let Some(record) = self.active.as_mut() else {
            return;
        };
        if record.lifecycle != Lifecycle::Running {
            return;
        }
        let run_id = record.run_id;
        let deadline = Instant::now() + delay;
        let tx = self.self_tx.clone();
        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::Timer {
                    run_id,
                    token,
                    action,
                });
            }
        });
        debug!(run_id, token = token.0, ?delay, "timer scheduled");
        record.timers.insert(token, task.abort_handle());
    }

    fn on_timer(&mut self, run_id: u64, token: TimerToken, action: TimerAction) {
        let live = self
            .active
            .as_mut()
            .filter(|r| r.run_id == run_id)
            .and_then(|r| r.timers.remove(&token))
            .is_some();
        if !live {
            warn!(run_id, token = token.0, "dropping stale timer");
            return;
        }
        if let Some(Err(err)) = self.drive(|scenario, ctx| scenario.on_timer(ctx, action)) {
            warn!(run_id, %err, "scheduled action failed, ending scenario");
            self.publish_log(format!("scheduled action failed: {err}"));
            self.end_active();
        }
    }

    // ── Scenario lifecycle ──────────────────────────────────────────────

    fn start(
        &mut self,
        profile: String,
        name: String,
        params: Vec<String>,
    ) -> Result<String, ScenarioError> {
        if self.active.is_some() {
            self.end_active();
        }
        self.monitor.reset_verdicts();

        let params = ScenarioParams::from(params);
        let scenario = match self.catalog.create(&profile, &name, &params) {
            Ok(scenario) => scenario,
            Err(err) => return Err(self.reject(&profile, &name, err)),
        };

        self.next_run_id += 1;
        let mut record = ScenarioRecord {
            run_id: self.next_run_id,
            profile,
            name,
            scenario,
            lifecycle: Lifecycle::Pending,
            timers: HashMap::new(),
        };
        let mut ctx = ScenarioContext::new(
            self.monitor.registry(),
            &self.config,
            self.clock.now_ms(),
            &mut self.next_token,
        );
        let started = record.scenario.start(&mut ctx);
        let effects = ctx.into_effects();
        if let Err(err) = started {
            return Err(self.reject(&record.profile, &record.name, err));
        }

        record.lifecycle = Lifecycle::Running;
        let scenario_name = record.scenario.name();
        info!(
            scenario = %scenario_name,
            run_id = record.run_id,
            params = params.len(),
            "scenario started"
        );
        self.active = Some(record);
        self.apply(effects);
        Ok(scenario_name)
    }

    fn reject(&self, profile: &str, name: &str, err: ScenarioError) -> ScenarioError {
        warn!(profile, name, %err, "scenario rejected");
        self.publish_log(format!("{profile} {name} rejected: {err}"));
        err
    }

    /// End the active scenario: cancel its timers, collect and merge
    /// verdicts, report.
    fn end_active(&mut self) -> Option<ResultRecord> {
        let mut record = self.active.take()?;
        record.cancel_timers();
        record.lifecycle = Lifecycle::Ended;

        let mut ctx = ScenarioContext::new(
            self.monitor.registry(),
            &self.config,
            self.clock.now_ms(),
            &mut self.next_token,
        );
        record.scenario.end(&mut ctx);
        for effect in ctx.into_effects() {
            match effect {
                Effect::Publish(message) => self.outbound.publish(message),
                Effect::Log(line) => self.publish_log(line),
                Effect::Schedule { .. } | Effect::Cancel(_) | Effect::End => {}
            }
        }

        let mut verdicts = record.scenario.verdicts().clone();
        for id in record.scenario.requirements() {
            verdicts.declare(id);
        }
        verdicts.merge_prefixed(MONITOR_PREFIX, self.monitor.verdicts());

        let result = aggregate(&record.scenario.name(), verdicts);
        info!(
            scenario = %result.scenario,
            run_id = record.run_id,
            overall = %result.overall_label(),
            requirements = result.verdicts.len(),
            "scenario ended"
        );
        if self.config.publish_results {
            self.outbound.publish(OutboundMessage::text(
                &self.config.results_topic,
                result.to_report(),
                Qos::AtLeastOnce,
            ));
        }
        self.results.deliver(&result);
        Some(result)
    }
}

fn log_findings(client_id: &str, findings: &[Finding]) {
    let failed = findings
        .iter()
        .filter(|f| f.verdict >= Verdict::Maybe)
        .count();
    if failed > 0 {
        debug!(client_id, evaluated = findings.len(), failed, "monitor findings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn actor_stops_when_last_handle_drops() {
        let (handle, join) = Engine::new(EngineConfig::default()).spawn();
        let other = handle.clone();
        drop(handle);
        // A live clone keeps the actor running.
        assert!(other.snapshot().await.is_ok());
        drop(other);
        join.await.unwrap();
    }

    #[tokio::test]
    async fn end_without_scenario_is_none() {
        let (handle, _join) = Engine::new(EngineConfig::default()).spawn();
        assert_eq!(handle.end_scenario().await.unwrap(), None);
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.scenario, None);
        assert!(snapshot.monitor.is_empty());
    }

    #[tokio::test]
    async fn unknown_scenario_rejected() {
        let (handle, _join) = Engine::new(EngineConfig::default()).spawn();
        let err = handle
            .start_scenario("edge", "Nope", vec![])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Scenario(ScenarioError::UnknownScenario { .. })
        ));
    }
}
