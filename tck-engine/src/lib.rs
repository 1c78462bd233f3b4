//! TCK Engine: runtime for the Sparkplug B conformance monitor.
//!
//! Wraps `tck-core`'s [`Monitor`](tck_core::Monitor) in a single-writer
//! tokio actor, adds the scenario engine and its timers, and reports
//! results through pluggable sinks.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `EngineConfig`, JSON loading and validation |
//! | [`clock`] | Wall-clock abstraction (`SystemClock`, `ManualClock`) |
//! | [`control`] | `SPARKPLUG_TCK/*` control-topic commands |
//! | [`outbound`] | Outbound publishes and result delivery |
//! | [`scenario`] | Scenario trait, typed catalog, built-in scenarios |
//! | [`orchestrator`] | Actor, `EngineHandle`, scenario lifecycle |
//! | [`replay`] | Replay of recorded events (`tck-replay`) |

/// Engine configuration.
pub mod config;

/// Clock abstraction.
pub mod clock;

/// Control-topic parsing.
pub mod control;

/// Outbound sinks.
pub mod outbound;

/// Scenario Engine.
pub mod scenario;

/// Orchestrator actor.
pub mod orchestrator;

/// Event replay.
pub mod replay;

pub use config::{ConfigError, EngineConfig};
pub use orchestrator::{Engine, EngineError, EngineHandle, Snapshot};
pub use outbound::{OutboundMessage, OutboundSink, ResultsSink};
pub use scenario::{Scenario, ScenarioCatalog, ScenarioError};
