//! Per-message-kind rule table.
//!
//! Maps each Sparkplug message kind to the requirement IDs covering its
//! MQTT flags, payload timestamp, sequence number and decodability. The
//! monitor evaluates these uniformly before the kind-specific rules.

use crate::requirements::*;
use crate::topic::MessageKind;

/// How the payload `seq` field is constrained.
pub(crate) enum SeqRule {
    /// Present and equal to zero.
    Zero {
        present: &'static [&'static str],
        value: &'static [&'static str],
    },
    /// Present and one greater (mod 256) than the edge node's previous.
    Next {
        present: &'static [&'static str],
        value: &'static [&'static str],
    },
    /// Must not be present.
    Absent(&'static [&'static str]),
}

pub(crate) struct KindRules {
    /// Requirement charged when the payload does not decode.
    pub decode: &'static str,
    pub seq: SeqRule,
    /// QoS 0 requirements.
    pub qos: &'static [&'static str],
    /// Retain-false requirements.
    pub retain: &'static [&'static str],
    /// Payload timestamp presence.
    pub timestamp: Option<&'static str>,
}

const NBIRTH: KindRules = KindRules {
    decode: TOPICS_NBIRTH_METRICS,
    seq: SeqRule::Zero {
        present: &[PAYLOADS_NBIRTH_SEQ, PAYLOADS_SEQUENCE_NUM_ALWAYS_INCLUDED],
        value: &[TOPICS_NBIRTH_SEQ_NUM, PAYLOADS_SEQUENCE_NUM_ZERO_NBIRTH],
    },
    qos: &[PAYLOADS_NBIRTH_QOS, TOPICS_NBIRTH_MQTT],
    retain: &[PAYLOADS_NBIRTH_RETAIN, TOPICS_NBIRTH_MQTT],
    timestamp: Some(PAYLOADS_NBIRTH_TIMESTAMP),
};

const DBIRTH: KindRules = KindRules {
    decode: TOPICS_DBIRTH_METRICS,
    seq: SeqRule::Next {
        present: &[PAYLOADS_DBIRTH_SEQ, PAYLOADS_SEQUENCE_NUM_ALWAYS_INCLUDED],
        value: &[
            PAYLOADS_DBIRTH_SEQ_INC,
            TOPICS_DBIRTH_SEQ,
            PAYLOADS_SEQUENCE_NUM_INCREMENTING,
        ],
    },
    qos: &[PAYLOADS_DBIRTH_QOS, TOPICS_DBIRTH_MQTT],
    retain: &[PAYLOADS_DBIRTH_RETAIN, TOPICS_DBIRTH_MQTT],
    timestamp: Some(PAYLOADS_DBIRTH_TIMESTAMP),
};

const NDATA: KindRules = KindRules {
    decode: PAYLOADS_NDATA_SEQ,
    seq: SeqRule::Next {
        present: &[PAYLOADS_NDATA_SEQ, PAYLOADS_SEQUENCE_NUM_ALWAYS_INCLUDED],
        value: &[
            PAYLOADS_NDATA_SEQ_INC,
            TOPICS_NDATA_SEQ_NUM,
            PAYLOADS_SEQUENCE_NUM_INCREMENTING,
        ],
    },
    qos: &[PAYLOADS_NDATA_QOS],
    retain: &[PAYLOADS_NDATA_RETAIN],
    timestamp: Some(PAYLOADS_NDATA_TIMESTAMP),
};

const DDATA: KindRules = KindRules {
    decode: PAYLOADS_DDATA_SEQ,
    seq: SeqRule::Next {
        present: &[PAYLOADS_DDATA_SEQ, PAYLOADS_SEQUENCE_NUM_ALWAYS_INCLUDED],
        value: &[
            PAYLOADS_DDATA_SEQ_INC,
            TOPICS_DDATA_SEQ_NUM,
            PAYLOADS_SEQUENCE_NUM_INCREMENTING,
        ],
    },
    qos: &[PAYLOADS_DDATA_QOS],
    retain: &[PAYLOADS_DDATA_RETAIN],
    timestamp: Some(PAYLOADS_DDATA_TIMESTAMP),
};

const NDEATH: KindRules = KindRules {
    decode: TOPICS_NDEATH_PAYLOAD,
    seq: SeqRule::Absent(&[PAYLOADS_NDEATH_SEQ, TOPICS_NDEATH_SEQ]),
    qos: &[],
    retain: &[],
    timestamp: None,
};

const DDEATH: KindRules = KindRules {
    decode: PAYLOADS_DDEATH_SEQ,
    seq: SeqRule::Next {
        present: &[
            PAYLOADS_DDEATH_SEQ,
            PAYLOADS_DDEATH_SEQ_NUMBER,
            PAYLOADS_SEQUENCE_NUM_ALWAYS_INCLUDED,
        ],
        value: &[
            PAYLOADS_DDEATH_SEQ_INC,
            TOPICS_DDEATH_SEQ_NUM,
            PAYLOADS_SEQUENCE_NUM_INCREMENTING,
        ],
    },
    qos: &[TOPICS_DDEATH_MQTT],
    retain: &[TOPICS_DDEATH_MQTT],
    timestamp: Some(PAYLOADS_DDEATH_TIMESTAMP),
};

const NCMD: KindRules = KindRules {
    decode: TOPICS_NCMD_PAYLOAD,
    seq: SeqRule::Absent(&[PAYLOADS_NCMD_SEQ]),
    qos: &[PAYLOADS_NCMD_QOS],
    retain: &[PAYLOADS_NCMD_RETAIN],
    timestamp: Some(PAYLOADS_NCMD_TIMESTAMP),
};

const DCMD: KindRules = KindRules {
    decode: TOPICS_DCMD_PAYLOAD,
    seq: SeqRule::Absent(&[PAYLOADS_DCMD_SEQ]),
    qos: &[PAYLOADS_DCMD_QOS],
    retain: &[PAYLOADS_DCMD_RETAIN],
    timestamp: Some(PAYLOADS_DCMD_TIMESTAMP),
};

pub(crate) fn rules(kind: MessageKind) -> &'static KindRules {
    match kind {
        MessageKind::NBirth => &NBIRTH,
        MessageKind::DBirth => &DBIRTH,
        MessageKind::NData => &NDATA,
        MessageKind::DData => &DDATA,
        MessageKind::NDeath => &NDEATH,
        MessageKind::DDeath => &DDEATH,
        MessageKind::NCmd => &NCMD,
        MessageKind::DCmd => &DCMD,
    }
}

/// Requirement covering metric shape in a birth of this kind.
pub(crate) fn birth_metrics_requirement(kind: MessageKind) -> &'static str {
    if kind.is_device() {
        TOPICS_DBIRTH_METRICS
    } else {
        TOPICS_NBIRTH_METRICS
    }
}

/// Requirement charged when a data metric does not resolve against the
/// birth that declared the metric set.
pub(crate) fn declared_metrics_requirement(kind: MessageKind) -> &'static str {
    if kind.is_device() {
        TOPICS_DBIRTH_METRIC_REQS
    } else {
        TOPICS_NBIRTH_METRIC_REQS
    }
}

/// Chronological-order requirement for non-historical metrics.
pub(crate) fn chronology_requirement(kind: MessageKind) -> &'static str {
    if kind.is_device() {
        OPERATIONAL_BEHAVIOR_DATA_PUBLISH_DBIRTH_ORDER
    } else {
        OPERATIONAL_BEHAVIOR_DATA_PUBLISH_NBIRTH_ORDER
    }
}

/// Report-by-exception recommendation charged for unchanged values.
pub(crate) fn change_requirement(kind: MessageKind) -> &'static str {
    if kind.is_device() {
        OPERATIONAL_BEHAVIOR_DATA_PUBLISH_DBIRTH_CHANGE
    } else {
        OPERATIONAL_BEHAVIOR_DATA_PUBLISH_NBIRTH_CHANGE
    }
}
