//! Edge node and device traffic: NDEATH certificates at connect time and
//! every message in the Sparkplug namespace.

use tracing::debug;

use super::metrics::{
    check_alias_uniqueness, check_birth_metrics, check_chronology, check_dataset,
    check_metric_addressing, check_templates,
};
use super::rules::{
    change_requirement, declared_metrics_requirement, rules, KindRules, SeqRule,
};
use super::Eval;
use crate::constants::{BD_SEQ_METRIC, REBIRTH_METRIC};
use crate::event::{ConnectEvent, PublishEvent, Qos, WillMessage};
use crate::payload::{DataType, Metric, Payload, PayloadDecoder};
use crate::requirements::*;
use crate::sequence::{next_seq, to_seq};
use crate::session::{DeathCertificate, DeviceSession, EdgeNodeSession, MetricTables, SessionRegistry};
use crate::topic::{is_valid_id, EdgeNodeKey, MessageKind, SparkplugTopic};

/// NDEATH will registered at CONNECT.
pub(super) fn on_edge_certificate(
    registry: &mut SessionRegistry,
    decoder: &dyn PayloadDecoder,
    eval: &mut Eval<'_>,
    event: &ConnectEvent,
    will: &WillMessage,
    key: EdgeNodeKey,
) {
    eval.check(PAYLOADS_NDEATH_WILL_MESSAGE, true, String::new);
    eval.check(
        PAYLOADS_NDEATH_WILL_MESSAGE_QOS,
        will.qos == Qos::AtLeastOnce,
        || format!("NDEATH will for {key} has QoS {}", will.qos),
    );
    eval.check(PAYLOADS_NDEATH_WILL_MESSAGE_RETAIN, !will.retain, || {
        format!("NDEATH will for {key} is retained")
    });

    let bd_seq = match decoder.decode(&will.payload) {
        Ok(payload) => {
            eval.check_all(
                &[PAYLOADS_NDEATH_SEQ, TOPICS_NDEATH_SEQ],
                payload.seq.is_none(),
                || format!("NDEATH will for {key} carries seq {:?}", payload.seq),
            );
            check_death_payload(eval, &payload, &key)
        }
        Err(err) => {
            eval.check(TOPICS_NDEATH_PAYLOAD, false, || {
                format!("NDEATH will for {key}: {err}")
            });
            None
        }
    };

    if let Some(bd) = bd_seq {
        if let Some(previous) = registry.last_edge_bd_seq(&key) {
            eval.check(TOPICS_NBIRTH_BDSEQ_INCREMENT, bd == next_seq(previous), || {
                format!(
                    "{key} connected with bdSeq {bd}, expected {} after {previous}",
                    next_seq(previous)
                )
            });
        }
        registry.set_edge_bd_seq(key.clone(), bd);
    }
    registry.record_certificate(&event.client_id, DeathCertificate::Edge { key, bd_seq });
}

/// An NDEATH payload carries exactly one metric, `bdSeq`. Returns the
/// declared bdSeq when present and in range.
fn check_death_payload(eval: &mut Eval<'_>, payload: &Payload, key: &EdgeNodeKey) -> Option<u8> {
    let bd_seq = bd_seq_of(payload);
    eval.check(
        TOPICS_NDEATH_PAYLOAD,
        payload.metrics.len() == 1 && bd_seq.is_some(),
        || {
            format!(
                "NDEATH for {key} must carry only a bdSeq metric, found {} metrics",
                payload.metrics.len()
            )
        },
    );
    bd_seq
}

fn bd_seq_of(payload: &Payload) -> Option<u8> {
    payload
        .find_metric(BD_SEQ_METRIC)
        .and_then(Metric::integer_value)
        .and_then(to_seq)
}

/// Any publish in the Sparkplug namespace.
pub(super) fn on_sparkplug(
    registry: &mut SessionRegistry,
    decoder: &dyn PayloadDecoder,
    eval: &mut Eval<'_>,
    event: &PublishEvent,
    topic: &SparkplugTopic,
    now_ms: u64,
    utc_window_ms: u64,
) {
    let kind = topic.kind;
    let r = rules(kind);

    if !check_topic_identity(eval, topic) {
        return;
    }

    let payload = match decoder.decode(&event.payload) {
        Ok(payload) => payload,
        Err(err) => {
            eval.check(r.decode, false, || format!("{kind} on {topic}: {err}"));
            return;
        }
    };

    check_envelope(eval, r, kind, event, &payload, now_ms, utc_window_ms);

    match kind {
        MessageKind::NBirth => on_nbirth(registry, eval, event, topic, &payload),
        MessageKind::DBirth => on_dbirth(registry, eval, topic, &payload),
        MessageKind::NData | MessageKind::DData => on_data(registry, eval, topic, &payload),
        MessageKind::NDeath => on_ndeath(registry, eval, event, topic, &payload),
        MessageKind::DDeath => on_ddeath(registry, eval, topic, &payload),
        MessageKind::NCmd | MessageKind::DCmd => on_command(registry, eval, topic, &payload),
    }
}

/// Identifier validity and device id placement. Returns `false` when the
/// message cannot be attributed to a session.
fn check_topic_identity(eval: &mut Eval<'_>, topic: &SparkplugTopic) -> bool {
    eval.check(
        TOPIC_STRUCTURE_NAMESPACE_VALID_GROUP_ID,
        is_valid_id(&topic.group_id),
        || format!("invalid group id {:?}", topic.group_id),
    );
    eval.check(
        TOPIC_STRUCTURE_NAMESPACE_VALID_EDGE_NODE_ID,
        is_valid_id(&topic.edge_node_id),
        || format!("invalid edge node id {:?}", topic.edge_node_id),
    );
    if topic.kind.is_device() {
        let Some(device_id) = &topic.device_id else {
            eval.check(
                TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_ASSOCIATED_MESSAGE_TYPES,
                false,
                || format!("{} topic without device id", topic.kind),
            );
            return false;
        };
        eval.check(
            TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_ASSOCIATED_MESSAGE_TYPES,
            true,
            String::new,
        );
        eval.check(
            TOPIC_STRUCTURE_NAMESPACE_VALID_DEVICE_ID,
            is_valid_id(device_id),
            || format!("invalid device id {device_id:?}"),
        );
    } else {
        eval.check(
            TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_NON_ASSOCIATED_MESSAGE_TYPES,
            topic.device_id.is_none(),
            || format!("{} topic carries a device id", topic.kind),
        );
    }
    true
}

/// MQTT flags, payload timestamp and forbidden sequence numbers.
fn check_envelope(
    eval: &mut Eval<'_>,
    r: &KindRules,
    kind: MessageKind,
    event: &PublishEvent,
    payload: &Payload,
    now_ms: u64,
    utc_window_ms: u64,
) {
    eval.check_all(r.qos, event.qos == Qos::AtMostOnce, || {
        format!("{kind} published with QoS {}", event.qos)
    });
    eval.check_all(r.retain, !event.retain, || format!("{kind} published retained"));

    if let Some(timestamp_req) = r.timestamp {
        if let Some(ts) = payload.timestamp {
            eval.check(timestamp_req, true, String::new);
            eval.check(
                PAYLOADS_TIMESTAMP_IN_UTC,
                ts.abs_diff(now_ms) <= utc_window_ms,
                || format!("{kind} timestamp {ts} is more than {utc_window_ms}ms from {now_ms}"),
            );
        } else {
            eval.check(timestamp_req, false, || format!("{kind} has no timestamp"));
        }
    }

    if let SeqRule::Absent(ids) = &r.seq {
        eval.check_all(ids, payload.seq.is_none(), || {
            format!("{kind} carries seq {:?}", payload.seq)
        });
    }
}

/// Sequence presence and value. `previous` is the edge node's last seq;
/// `None` means this message starts the count. Returns the received seq
/// when it is present and in range, so tracking resumes from it.
fn check_sequence(
    eval: &mut Eval<'_>,
    kind: MessageKind,
    rule: &SeqRule,
    previous: Option<u8>,
    seq: Option<u64>,
) -> Option<u8> {
    let (present, value) = match rule {
        SeqRule::Zero { present, value } | SeqRule::Next { present, value } => (*present, *value),
        SeqRule::Absent(_) => return None,
    };
    let received = seq.and_then(to_seq);
    if !eval.check_all(present, received.is_some(), || {
        format!("{kind} seq {seq:?} missing or out of range")
    }) {
        return None;
    }
    let s = received?;
    match rule {
        SeqRule::Zero { .. } => {
            eval.check_all(value, s == 0, || format!("{kind} seq is {s}, expected 0"));
        }
        _ => {
            if let Some(prev) = previous {
                let expected = next_seq(prev);
                eval.check_all(value, s == expected, || {
                    format!("{kind} seq is {s}, expected {expected} after {prev}")
                });
            }
        }
    }
    Some(s)
}

fn on_nbirth(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    event: &PublishEvent,
    topic: &SparkplugTopic,
    payload: &Payload,
) {
    let kind = MessageKind::NBirth;
    let key = topic.edge_key();

    let conflict = registry
        .edge(&key)
        .filter(|s| s.owner != event.client_id)
        .map(|s| s.owner.clone());
    eval.check_all(
        &[
            TOPIC_STRUCTURE_NAMESPACE_UNIQUE_EDGE_NODE_DESCRIPTOR,
            INTRO_EDGE_NODE_ID_UNIQUENESS,
        ],
        conflict.is_none(),
        || {
            format!(
                "{key} born by {} while {} still holds it",
                event.client_id,
                conflict.as_deref().unwrap_or_default()
            )
        },
    );

    let seq = check_sequence(eval, kind, &rules(kind).seq, None, payload.seq).unwrap_or(0);

    let bd_seq = bd_seq_of(payload);
    eval.check_all(
        &[PAYLOADS_NBIRTH_BDSEQ, TOPICS_NBIRTH_BDSEQ_INCLUDED],
        bd_seq.is_some(),
        || format!("NBIRTH for {key} has no valid bdSeq metric"),
    );
    if let (
        Some(bd),
        Some(DeathCertificate::Edge {
            key: cert_key,
            bd_seq: Some(cert_bd),
        }),
    ) = (bd_seq, registry.certificate(&event.client_id))
    {
        if *cert_key == key {
            let cert_bd = *cert_bd;
            eval.check_all(
                &[TOPICS_NBIRTH_BDSEQ_MATCHING, PAYLOADS_NBIRTH_BDSEQ_REPEAT],
                bd == cert_bd,
                || format!("NBIRTH bdSeq {bd} does not match NDEATH will bdSeq {cert_bd}"),
            );
        }
    }

    let aliases_in_use = payload.metrics.iter().any(|m| m.alias.is_some());
    check_rebirth_metric(eval, payload, aliases_in_use);
    check_birth_metrics(eval, kind, &payload.metrics);
    check_alias_uniqueness(eval, kind, &payload.metrics, |_| false);
    check_chronology(eval, kind, &payload.metrics);

    let mut session = EdgeNodeSession::new(
        event.client_id.clone(),
        bd_seq,
        MetricTables::from_birth(&payload.metrics),
    );
    check_templates(eval, kind, &payload.metrics, &mut session.templates);
    session.seq = seq;

    if registry.install_edge(key.clone(), session).is_some() {
        debug!(edge = %key, client_id = %event.client_id, "edge node reborn");
    }
}

/// `Node Control/Rebirth`: present, Boolean, false, and without an alias.
fn check_rebirth_metric(eval: &mut Eval<'_>, payload: &Payload, aliases_in_use: bool) {
    let Some(rebirth) = payload.find_metric(REBIRTH_METRIC) else {
        eval.check_all(
            &[
                PAYLOADS_NBIRTH_REBIRTH_REQ,
                TOPICS_NBIRTH_REBIRTH_METRIC,
                OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_NAME,
            ],
            false,
            || format!("NBIRTH has no {REBIRTH_METRIC} metric"),
        );
        return;
    };
    eval.check_all(
        &[
            TOPICS_NBIRTH_REBIRTH_METRIC,
            OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_NAME,
        ],
        true,
        String::new,
    );
    eval.check(
        OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_DATATYPE,
        rebirth.data_type() == Some(DataType::Boolean),
        || format!("{REBIRTH_METRIC} datatype is {:?}", rebirth.datatype),
    );
    let is_false = rebirth.boolean_value() == Some(false);
    eval.check_all(
        &[
            OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_VALUE,
            PAYLOADS_NBIRTH_REBIRTH_REQ,
        ],
        is_false,
        || format!("{REBIRTH_METRIC} value is {:?}, expected false", rebirth.value),
    );
    if aliases_in_use {
        eval.check(
            OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_NAME_ALIASES,
            rebirth.alias.is_none(),
            || format!("{REBIRTH_METRIC} has alias {:?}", rebirth.alias),
        );
    }
}

fn on_dbirth(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    topic: &SparkplugTopic,
    payload: &Payload,
) {
    let kind = MessageKind::DBirth;
    let key = topic.edge_key();
    let Some(device_key) = topic.device_key() else {
        return;
    };

    let Some(edge) = registry.edge_mut(&key) else {
        eval.check(MESSAGE_FLOW_DEVICE_BIRTH_PUBLISH_NBIRTH_WAIT, false, || {
            format!("DBIRTH for {device_key} while {key} is not alive")
        });
        return;
    };
    eval.check(MESSAGE_FLOW_DEVICE_BIRTH_PUBLISH_NBIRTH_WAIT, true, String::new);

    if let Some(s) = check_sequence(eval, kind, &rules(kind).seq, Some(edge.seq), payload.seq) {
        edge.seq = s;
    }

    check_birth_metrics(eval, kind, &payload.metrics);
    check_alias_uniqueness(eval, kind, &payload.metrics, |alias| {
        edge.metrics.aliases.contains_key(&alias)
            || edge
                .devices
                .iter()
                .any(|(id, d)| *id != device_key.device_id && d.metrics.aliases.contains_key(&alias))
    });
    check_chronology(eval, kind, &payload.metrics);
    check_templates(eval, kind, &payload.metrics, &mut edge.templates);

    let session = DeviceSession {
        metrics: MetricTables::from_birth(&payload.metrics),
    };
    if let Err(err) = registry.install_device(&device_key, session) {
        debug!(device = %device_key, %err, "device birth not installed");
    }
}

fn on_data(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    topic: &SparkplugTopic,
    payload: &Payload,
) {
    let kind = topic.kind;
    let key = topic.edge_key();
    let device_key = topic.device_key();

    let (order_req, born) = match &device_key {
        Some(dk) => (PAYLOADS_DDATA_ORDER, registry.device(dk).is_some()),
        None => (PAYLOADS_NDATA_ORDER, registry.edge(&key).is_some()),
    };
    eval.check(order_req, born, || format!("{kind} on {topic} before its birth"));
    if !born {
        return;
    }
    let Some(edge) = registry.edge_mut(&key) else {
        return;
    };

    if let Some(s) = check_sequence(eval, kind, &rules(kind).seq, Some(edge.seq), payload.seq) {
        edge.seq = s;
    }

    let tables = match &device_key {
        Some(dk) => match edge.devices.get_mut(&dk.device_id) {
            Some(device) => &mut device.metrics,
            None => return,
        },
        None => &mut edge.metrics,
    };

    let declared_req = declared_metrics_requirement(kind);
    let aliases_in_use = tables.uses_aliases();
    for m in &payload.metrics {
        check_metric_addressing(eval, kind, m, aliases_in_use);
        eval.check(
            PAYLOADS_NAME_BIRTH_DATA_REQUIREMENT,
            m.timestamp.is_some(),
            || format!("{kind} metric {:?}/{:?} has no timestamp", m.name, m.alias),
        );

        let Some(name) = tables.resolve(m).map(str::to_owned) else {
            eval.check(declared_req, false, || {
                format!(
                    "{kind} metric {:?}/{:?} was not declared in the birth",
                    m.name, m.alias
                )
            });
            continue;
        };
        eval.check(declared_req, true, String::new);

        if m.is_current() {
            let changed = tables.observe(&name, &m.value);
            eval.check_all(
                &[PRINCIPLES_RBE_RECOMMENDED, change_requirement(kind)],
                changed,
                || format!("{kind} republished unchanged value of {name}"),
            );
        }
        if let Some(ds) = m.dataset() {
            check_dataset(eval, ds);
        }
    }

    check_chronology(eval, kind, &payload.metrics);
    check_templates(eval, kind, &payload.metrics, &mut edge.templates);
}

fn on_ndeath(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    event: &PublishEvent,
    topic: &SparkplugTopic,
    payload: &Payload,
) {
    let key = topic.edge_key();
    let bd_seq = check_death_payload(eval, payload, &key);

    let Some(session) = registry.edge(&key) else {
        debug!(edge = %key, "NDEATH for an edge node that is not alive");
        return;
    };
    // The will of a connection that has since been replaced belongs to the
    // earlier session, not to the live one.
    if session.owner != event.client_id {
        debug!(
            edge = %key,
            client_id = %event.client_id,
            owner = %session.owner,
            ?bd_seq,
            "NDEATH from a superseded connection"
        );
        return;
    }
    // A death from an earlier session (different bdSeq) must not evict
    // the current one.
    let stale = matches!((bd_seq, session.bd_seq), (Some(a), Some(b)) if a != b);
    let session_bd = session.bd_seq;
    eval.check(PAYLOADS_NDEATH_BDSEQ, !stale, || {
        format!("NDEATH bdSeq {bd_seq:?} does not match NBIRTH bdSeq {session_bd:?}")
    });
    if !stale {
        registry.evict_edge(&key);
    }
}

fn on_ddeath(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    topic: &SparkplugTopic,
    payload: &Payload,
) {
    let kind = MessageKind::DDeath;
    let Some(device_key) = topic.device_key() else {
        return;
    };

    let registered = registry.device(&device_key).is_some();
    eval.check(OPERATIONAL_BEHAVIOR_DEVICE_DDEATH, registered, || {
        format!("DDEATH for {device_key}, which is not registered under a live edge node")
    });

    if let Some(edge) = registry.edge_mut(&device_key.edge) {
        if let Some(s) = check_sequence(eval, kind, &rules(kind).seq, Some(edge.seq), payload.seq)
        {
            edge.seq = s;
        }
    }
    if registered {
        registry.evict_device(&device_key);
    }
}

fn on_command(
    registry: &mut SessionRegistry,
    eval: &mut Eval<'_>,
    topic: &SparkplugTopic,
    payload: &Payload,
) {
    let kind = topic.kind;
    let r = rules(kind);
    eval.check(r.decode, !payload.metrics.is_empty(), || {
        format!("{kind} on {topic} carries no metrics")
    });

    let aliases_in_use = match topic.device_key() {
        Some(dk) => registry.device(&dk).map(|d| d.metrics.uses_aliases()),
        None => registry.edge(&topic.edge_key()).map(|e| e.metrics.uses_aliases()),
    };
    let Some(aliases_in_use) = aliases_in_use else {
        return;
    };
    for m in payload
        .metrics
        .iter()
        .filter(|m| m.name.as_deref() != Some(REBIRTH_METRIC))
    {
        check_metric_addressing(eval, kind, m, aliases_in_use);
    }
}
