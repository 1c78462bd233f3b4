//! Outbound side of the engine: messages to publish and finished results.
//!
//! The broker integration implements [`OutboundSink`] to put synthetic
//! commands, result reports and log lines on the wire, and [`ResultsSink`]
//! to hand result records to reporting. Unbounded tokio channels implement
//! both so tests and the replay binary can collect what the engine emits.

use tck_core::{Qos, ResultRecord};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// A message the engine asks the host collaborator to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
}

impl OutboundMessage {
    /// UTF-8 text message, not retained.
    pub fn text(topic: impl Into<String>, text: impl Into<String>, qos: Qos) -> Self {
        Self {
            topic: topic.into(),
            payload: text.into().into_bytes(),
            qos,
            retain: false,
        }
    }
}

pub trait OutboundSink: Send + Sync {
    fn publish(&self, message: OutboundMessage);
}

pub trait ResultsSink: Send + Sync {
    fn deliver(&self, record: &ResultRecord);
}

impl OutboundSink for UnboundedSender<OutboundMessage> {
    fn publish(&self, message: OutboundMessage) {
        if let Err(err) = self.send(message) {
            warn!(topic = %err.0.topic, "outbound channel closed, message dropped");
        }
    }
}

impl ResultsSink for UnboundedSender<ResultRecord> {
    fn deliver(&self, record: &ResultRecord) {
        if self.send(record.clone()).is_err() {
            warn!(scenario = %record.scenario, "results channel closed, record dropped");
        }
    }
}

/// Sink that only logs. Default for both roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutboundSink for TracingSink {
    fn publish(&self, message: OutboundMessage) {
        info!(
            topic = %message.topic,
            qos = %message.qos,
            retain = message.retain,
            bytes = message.payload.len(),
            "outbound publish"
        );
    }
}

impl ResultsSink for TracingSink {
    fn deliver(&self, record: &ResultRecord) {
        info!(
            scenario = %record.scenario,
            overall = %record.overall_label(),
            requirements = record.verdicts.len(),
            "scenario result"
        );
    }
}
