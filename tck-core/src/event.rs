//! Protocol events delivered by the broker integration.
//!
//! One variant per inbound notification: connect (with the optional will,
//! which carries the death certificate), disconnect, subscribe and publish.
//! Payloads stay as raw bytes; decoding is the monitor's job so that a
//! decode failure can be attributed to the right requirement.

use std::fmt;

/// MQTT quality of service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qos {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl Qos {
    pub const fn level(self) -> u8 {
        match self {
            Qos::AtMostOnce => 0,
            Qos::AtLeastOnce => 1,
            Qos::ExactlyOnce => 2,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Qos::AtMostOnce),
            1 => Some(Qos::AtLeastOnce),
            2 => Some(Qos::ExactlyOnce),
            _ => None,
        }
    }
}

impl fmt::Display for Qos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Will message registered in a CONNECT packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WillMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectEvent {
    pub client_id: String,
    /// Clean session (3.1.1) / clean start (5.0) flag.
    pub clean_start: bool,
    pub will: Option<WillMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectEvent {
    pub client_id: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeEvent {
    pub client_id: String,
    pub topic_filters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishEvent {
    pub client_id: String,
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
}

/// Any inbound protocol event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    Connect(ConnectEvent),
    Disconnect(DisconnectEvent),
    Subscribe(SubscribeEvent),
    Publish(PublishEvent),
}

impl ProtocolEvent {
    pub fn client_id(&self) -> &str {
        match self {
            ProtocolEvent::Connect(e) => &e.client_id,
            ProtocolEvent::Disconnect(e) => &e.client_id,
            ProtocolEvent::Subscribe(e) => &e.client_id,
            ProtocolEvent::Publish(e) => &e.client_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qos_levels() {
        for level in 0..=2u8 {
            assert_eq!(Qos::from_level(level).map(Qos::level), Some(level));
        }
        assert_eq!(Qos::from_level(3), None);
        assert_eq!(Qos::AtLeastOnce.to_string(), "1");
    }

    #[test]
    fn client_id_of_each_variant() {
        let e = ProtocolEvent::Disconnect(DisconnectEvent {
            client_id: "edge-1".into(),
            reason: None,
        });
        assert_eq!(e.client_id(), "edge-1");
    }
}
