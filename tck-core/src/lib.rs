//! TCK Core: Sparkplug B conformance monitoring.
//!
//! Pure, synchronous building blocks of the conformance engine: no IO, no
//! clocks, no async runtime. Callers pass the current time in where a rule
//! needs it. The runtime that drives these types (scenario engine,
//! orchestrator actor, timers) lives in `tck-engine`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`constants`] | Namespace, reserved metric names, control topics |
//! | [`errors`] | `TckError` |
//! | [`requirements`] | Requirement catalog (ID, strength, text) |
//! | [`verdict`] | Verdict lattice and requirement → verdict map |
//! | [`sequence`] | `seq` / `bdSeq` arithmetic modulo 256 |
//! | [`topic`] | Topic parsing, identity keys, filter matching |
//! | [`payload`] | Sparkplug B protobuf schema, STATE JSON |
//! | [`event`] | Inbound protocol events |
//! | [`session`] | Session Registry |
//! | [`monitor`] | Invariant Monitor |
//! | [`aggregator`] | Results Aggregator |

/// Protocol constants.
pub mod constants;

/// Error types for tck-core operations.
pub mod errors;

/// Requirement catalog.
pub mod requirements;

/// Verdicts and the requirement-ID → verdict map.
pub mod verdict;

/// Sequence number arithmetic.
pub mod sequence;

/// Topic parsing and identity keys.
pub mod topic;

/// Sparkplug B payload schema and decoders.
pub mod payload;

/// Inbound protocol events.
pub mod event;

/// Session Registry.
pub mod session;

/// Invariant Monitor.
pub mod monitor;

/// Results Aggregator.
pub mod aggregator;

pub use aggregator::{aggregate, ResultRecord};
pub use errors::TckError;
pub use event::{ConnectEvent, DisconnectEvent, ProtocolEvent, PublishEvent, Qos, SubscribeEvent, WillMessage};
pub use monitor::{Finding, Monitor};
pub use verdict::{Verdict, VerdictMap};
