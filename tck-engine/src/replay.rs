//! Event replay from newline-delimited JSON.
//!
//! One protocol event per line:
//!
//! ```text
//! {"at_ms":0,"type":"connect","client_id":"edge-1","will":{"topic":"spBv1.0/G1/NDEATH/E1","payload":"…","qos":1}}
//! {"at_ms":5,"type":"subscribe","client_id":"edge-1","topic_filters":["spBv1.0/G1/NCMD/E1"]}
//! {"at_ms":9,"type":"publish","client_id":"tck","topic":"SPARKPLUG_TCK/TEST_CONTROL","text":"END_TEST"}
//! ```
//!
//! Binary payloads are base64 (`payload`), text payloads are given as
//! `text`. `at_ms` is the offset from the start of the replay; lines must
//! be in non-decreasing offset order. Blank lines and lines starting with
//! `#` are skipped.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use tck_core::{
    ConnectEvent, DisconnectEvent, ProtocolEvent, PublishEvent, Qos, ResultRecord,
    SubscribeEvent, WillMessage,
};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::clock::ManualClock;
use crate::orchestrator::{EngineError, EngineHandle};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("replay io error: {0}")]
    Io(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: bad payload: {message}")]
    Payload { line: usize, message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayLine {
    #[serde(default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: ReplayEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Connect {
        client_id: String,
        #[serde(default = "clean_start_default")]
        clean_start: bool,
        #[serde(default)]
        will: Option<ReplayWill>,
    },
    Disconnect {
        client_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    Subscribe {
        client_id: String,
        topic_filters: Vec<String>,
    },
    Publish {
        client_id: String,
        topic: String,
        #[serde(default)]
        payload: Option<String>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        qos: u8,
        #[serde(default)]
        retain: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayWill {
    pub topic: String,
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub qos: u8,
    #[serde(default)]
    pub retain: bool,
}

fn clean_start_default() -> bool {
    true
}

/// A decoded event and its offset from the start of the replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: ProtocolEvent,
}

fn payload_bytes(
    line: usize,
    payload: Option<&str>,
    text: Option<&str>,
) -> Result<Vec<u8>, ReplayError> {
    match (payload, text) {
        (Some(_), Some(_)) => Err(ReplayError::Payload {
            line,
            message: "both payload and text given".into(),
        }),
        (Some(b64), None) => STANDARD.decode(b64).map_err(|e| ReplayError::Payload {
            line,
            message: e.to_string(),
        }),
        (None, Some(text)) => Ok(text.as_bytes().to_vec()),
        (None, None) => Ok(Vec::new()),
    }
}

fn qos(line: usize, level: u8) -> Result<Qos, ReplayError> {
    Qos::from_level(level).ok_or_else(|| ReplayError::Parse {
        line,
        message: format!("invalid QoS {level}"),
    })
}

impl ReplayLine {
    /// # Errors
    ///
    /// [`ReplayError::Payload`] on bad base64, [`ReplayError::Parse`] on an
    /// invalid QoS. `line` is used for error context only.
    pub fn into_protocol_event(self, line: usize) -> Result<ProtocolEvent, ReplayError> {
        Ok(match self.event {
            ReplayEvent::Connect {
                client_id,
                clean_start,
                will,
            } => {
                let will = match will {
                    Some(w) => Some(WillMessage {
                        payload: payload_bytes(line, w.payload.as_deref(), w.text.as_deref())?,
                        qos: qos(line, w.qos)?,
                        topic: w.topic,
                        retain: w.retain,
                    }),
                    None => None,
                };
                ProtocolEvent::Connect(ConnectEvent {
                    client_id,
                    clean_start,
                    will,
                })
            }
            ReplayEvent::Disconnect { client_id, reason } => {
                ProtocolEvent::Disconnect(DisconnectEvent { client_id, reason })
            }
            ReplayEvent::Subscribe {
                client_id,
                topic_filters,
            } => ProtocolEvent::Subscribe(SubscribeEvent {
                client_id,
                topic_filters,
            }),
            ReplayEvent::Publish {
                client_id,
                topic,
                payload,
                text,
                qos: level,
                retain,
            } => ProtocolEvent::Publish(PublishEvent {
                payload: payload_bytes(line, payload.as_deref(), text.as_deref())?,
                qos: qos(line, level)?,
                client_id,
                topic,
                retain,
            }),
        })
    }
}

/// Parse a whole replay file.
///
/// # Errors
///
/// The first line that fails to parse or decode.
pub fn parse_events(input: &str) -> Result<Vec<TimedEvent>, ReplayError> {
    let mut events = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed: ReplayLine =
            serde_json::from_str(trimmed).map_err(|e| ReplayError::Parse {
                line,
                message: e.to_string(),
            })?;
        let at_ms = parsed.at_ms;
        if let Some(previous) = events.last().map(|e: &TimedEvent| e.at_ms) {
            if at_ms < previous {
                return Err(ReplayError::Parse {
                    line,
                    message: format!("offset {at_ms} ms is before {previous} ms"),
                });
            }
        }
        events.push(TimedEvent {
            at_ms,
            event: parsed.into_protocol_event(line)?,
        });
    }
    Ok(events)
}

/// # Errors
///
/// [`ReplayError::Io`] if the file cannot be read, otherwise as
/// [`parse_events`].
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<TimedEvent>, ReplayError> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)
        .map_err(|e| ReplayError::Io(format!("{}: {e}", path.display())))?;
    parse_events(&input)
}

/// Drives an engine from recorded events.
#[derive(Debug)]
pub struct Replay {
    events: Vec<TimedEvent>,
    clock: Option<(Arc<ManualClock>, u64)>,
}

impl Replay {
    pub fn new(events: Vec<TimedEvent>) -> Self {
        Self {
            events,
            clock: None,
        }
    }

    /// Set `clock` to `epoch_ms + at_ms` before each event is applied, so
    /// the monitor sees recorded time instead of wall-clock time.
    pub fn with_clock(mut self, clock: Arc<ManualClock>, epoch_ms: u64) -> Self {
        self.clock = Some((clock, epoch_ms));
        self
    }

    /// Feed every event at its offset, then end whatever scenario is still
    /// running and return its result.
    ///
    /// # Errors
    ///
    /// [`ReplayError::Engine`] if the engine stops mid-replay.
    pub async fn run(self, handle: &EngineHandle) -> Result<Option<ResultRecord>, ReplayError> {
        let start = Instant::now();
        let total = self.events.len();
        for TimedEvent { at_ms, event } in self.events {
            sleep_until(start + Duration::from_millis(at_ms)).await;
            if let Some((clock, epoch_ms)) = &self.clock {
                clock.set(epoch_ms + at_ms);
            }
            debug!(at_ms, client_id = %event.client_id(), "replaying event");
            handle.send_event(event)?;
            if self.clock.is_some() {
                // Wait for the actor to apply the event before moving the
                // clock again.
                handle.snapshot().await?;
            }
        }
        info!(events = total, "replay finished");
        Ok(handle.end_scenario().await?)
    }
}
