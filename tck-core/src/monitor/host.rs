//! Host application STATE handling: the will registered at CONNECT and the
//! online/offline STATE messages published afterwards.

use tracing::debug;

use super::Eval;
use crate::event::{ConnectEvent, PublishEvent, Qos, WillMessage};
use crate::payload::StatePayload;
use crate::requirements::*;
use crate::sequence::next_seq;
use crate::session::{DeathCertificate, SessionRegistry};

/// STATE will registered at CONNECT: `{online: false, bdSeq, timestamp}`,
/// QoS 1, retained.
pub(super) fn on_host_certificate(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    event: &ConnectEvent,
    will: &WillMessage,
    host_id: &str,
    now_ms: u64,
) {
    eval.check_all(
        &[PAYLOADS_STATE_WILL_MESSAGE, HOST_TOPIC_PHID_DEATH_REQUIRED],
        true,
        String::new,
    );
    eval.check(
        PAYLOADS_STATE_WILL_MESSAGE_QOS,
        will.qos == Qos::AtLeastOnce,
        || format!("STATE will for {host_id} has QoS {}", will.qos),
    );
    eval.check(PAYLOADS_STATE_WILL_MESSAGE_RETAIN, will.retain, || {
        format!("STATE will for {host_id} is not retained")
    });

    let state = match StatePayload::from_json(&will.payload) {
        Ok(state) => state,
        Err(err) => {
            eval.check_all(
                &[PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD, HOST_TOPIC_PHID_DEATH_PAYLOAD],
                false,
                || format!("STATE will for {host_id}: {err}"),
            );
            registry.record_certificate(
                &event.client_id,
                DeathCertificate::Host {
                    host_id: host_id.to_owned(),
                    bd_seq: None,
                    timestamp: None,
                },
            );
            return;
        }
    };

    let last_timestamp = registry.host(host_id).and_then(|h| h.last_timestamp);
    let timestamp_ok = match (state.timestamp_ms(), last_timestamp) {
        (Some(ts), Some(last)) => ts >= last,
        (Some(_), None) => true,
        (None, _) => false,
    };
    eval.check_all(
        &[PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD, HOST_TOPIC_PHID_DEATH_PAYLOAD],
        state.is_well_formed() && state.online == Some(false) && timestamp_ok,
        || {
            format!(
                "STATE will for {host_id} must be {{online:false, bdSeq, timestamp}} \
                 with a timestamp not before {last_timestamp:?}, got {state:?}"
            )
        },
    );

    let bd_seq = state.bd_seq_u8();
    if let Some(bd) = bd_seq {
        if let Some(previous) = registry.last_host_bd_seq(host_id) {
            let expected = next_seq(previous);
            eval.check_all(
                &[
                    PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD_BDSEQ,
                    HOST_TOPIC_PHID_DEATH_PAYLOAD_BDSEQ,
                ],
                bd == expected,
                || format!("{host_id} connected with bdSeq {bd}, expected {expected}"),
            );
        }
        registry.set_host_bd_seq(host_id, bd);
    }

    debug!(client_id = %event.client_id, host_id, ?bd_seq, now_ms, "host death certificate");
    registry.record_certificate(
        &event.client_id,
        DeathCertificate::Host {
            host_id: host_id.to_owned(),
            bd_seq,
            timestamp: state.timestamp_ms(),
        },
    );
}

/// STATE message published by a host application.
pub(super) fn on_state(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    event: &PublishEvent,
    host_id: &str,
) {
    let state = match StatePayload::from_json(&event.payload) {
        Ok(state) => state,
        Err(err) => {
            eval.check(HOST_TOPIC_PHID_BIRTH_PAYLOAD, false, || {
                format!("STATE for {host_id} is not a JSON state payload: {err}")
            });
            return;
        }
    };

    let certificate_bd = match registry.certificate(&event.client_id) {
        Some(DeathCertificate::Host {
            host_id: cert_host,
            bd_seq,
            ..
        }) if cert_host == host_id => *bd_seq,
        _ => None,
    };

    match state.online {
        Some(true) => on_online(registry, eval, event, host_id, &state, certificate_bd),
        Some(false) => on_offline(registry, eval, host_id, &state, certificate_bd),
        None => {
            eval.check(HOST_TOPIC_PHID_BIRTH_PAYLOAD, false, || {
                format!("STATE for {host_id} has no 'online' key")
            });
        }
    }
}

fn on_online(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    event: &PublishEvent,
    host_id: &str,
    state: &StatePayload,
    certificate_bd: Option<u8>,
) {
    eval.check_all(
        &[PAYLOADS_STATE_BIRTH, HOST_TOPIC_PHID_BIRTH_QOS],
        event.qos == Qos::AtLeastOnce,
        || format!("online STATE for {host_id} published with QoS {}", event.qos),
    );
    eval.check_all(
        &[PAYLOADS_STATE_BIRTH, HOST_TOPIC_PHID_BIRTH_RETAIN],
        event.retain,
        || format!("online STATE for {host_id} is not retained"),
    );

    let host = registry.host_entry(host_id);
    let monotonic = match (state.timestamp_ms(), host.last_timestamp) {
        (Some(ts), Some(last)) => ts >= last,
        _ => true,
    };
    let last_timestamp = host.last_timestamp;
    eval.check_all(
        &[PAYLOADS_STATE_BIRTH_PAYLOAD, HOST_TOPIC_PHID_BIRTH_PAYLOAD],
        state.is_well_formed() && monotonic,
        || {
            format!(
                "online STATE for {host_id} must be {{online:true, bdSeq, timestamp}} with a \
                 timestamp not before {last_timestamp:?}, got {state:?}"
            )
        },
    );

    if let (Some(bd), Some(cert_bd)) = (state.bd_seq_u8(), certificate_bd) {
        eval.check(PAYLOADS_STATE_BIRTH_PAYLOAD_BDSEQ, bd == cert_bd, || {
            format!("online STATE bdSeq {bd} does not match STATE will bdSeq {cert_bd}")
        });
    }

    let rival = host
        .owner
        .clone()
        .filter(|owner| host.online && *owner != event.client_id);
    eval.check(
        OPERATIONAL_BEHAVIOR_HOST_APPLICATION_HOST_ID,
        rival.is_none(),
        || {
            format!(
                "{host_id} declared online by {} while {} holds it online",
                event.client_id,
                rival.as_deref().unwrap_or_default()
            )
        },
    );

    host.online = true;
    host.owner = Some(event.client_id.clone());
    if let Some(ts) = state.timestamp_ms() {
        host.last_timestamp = Some(ts);
        host.last_online_timestamp = Some(ts);
    }
    host.bd_seq = state.bd_seq_u8();
}

fn on_offline(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    host_id: &str,
    state: &StatePayload,
    certificate_bd: Option<u8>,
) {
    let host = registry.host_entry(host_id);
    let last_online = host.last_online_timestamp;
    let not_before_online = match (state.timestamp_ms(), last_online) {
        (Some(ts), Some(online)) => ts >= online,
        _ => true,
    };
    eval.check(
        HOST_TOPIC_PHID_DEATH_PAYLOAD,
        state.is_well_formed() && not_before_online,
        || {
            format!(
                "offline STATE for {host_id} must be {{online:false, bdSeq, timestamp}} with a \
                 timestamp not before the online STATE at {last_online:?}, got {state:?}"
            )
        },
    );

    if let Some(expected) = certificate_bd.or(host.bd_seq) {
        let declared = state.bd_seq_u8();
        eval.check(
            HOST_TOPIC_PHID_DEATH_PAYLOAD_BDSEQ,
            declared == Some(expected),
            || format!("offline STATE bdSeq {declared:?} does not match {expected}"),
        );
    }

    host.online = false;
    host.owner = None;
    if let Some(ts) = state.timestamp_ms() {
        host.last_timestamp = Some(ts);
    }
}
