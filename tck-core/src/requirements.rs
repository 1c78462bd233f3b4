//! Requirement catalog.
//!
//! Each conformance rule has a stable identifier, a strength and its
//! normative text. Identifiers are the keys of every verdict map and the
//! strings that appear in result reports, so they are spelled exactly as
//! published, including the one identifier that uses underscores.

/// How binding a requirement is.
///
/// A violated `Must` is recorded as FAIL, a violated `Should` as MAYBE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strength {
    Must,
    Should,
}

/// One numbered conformance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub id: &'static str,
    pub strength: Strength,
    pub text: &'static str,
}

// ── Topic namespace and identity ────────────────────────────────────
pub const TOPIC_STRUCTURE_NAMESPACE_UNIQUE_EDGE_NODE_DESCRIPTOR: &str = "topic-structure-namespace-unique-edge-node-descriptor";
pub const INTRO_EDGE_NODE_ID_UNIQUENESS: &str = "intro-edge-node-id-uniqueness";
pub const TOPIC_STRUCTURE_NAMESPACE_VALID_GROUP_ID: &str = "topic-structure-namespace-valid-group-id";
pub const TOPIC_STRUCTURE_NAMESPACE_VALID_EDGE_NODE_ID: &str = "topic-structure-namespace-valid-edge-node-id";
pub const TOPIC_STRUCTURE_NAMESPACE_VALID_DEVICE_ID: &str = "topic-structure-namespace-valid-device-id";
pub const TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_ASSOCIATED_MESSAGE_TYPES: &str = "topic-structure-namespace-device-id-associated-message-types";
pub const TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_NON_ASSOCIATED_MESSAGE_TYPES: &str = "topic-structure-namespace-device-id-non-associated-message-types";

// ── Sequence numbers ────────────────────────────────────────────────
pub const PAYLOADS_SEQUENCE_NUM_ZERO_NBIRTH: &str = "payloads-sequence-num-zero-nbirth";
pub const PAYLOADS_SEQUENCE_NUM_INCREMENTING: &str = "payloads-sequence-num-incrementing";
pub const PAYLOADS_SEQUENCE_NUM_ALWAYS_INCLUDED: &str = "payloads-sequence-num-always-included";

// ── NBIRTH ──────────────────────────────────────────────────────────
pub const PAYLOADS_NBIRTH_SEQ: &str = "payloads-nbirth-seq";
pub const PAYLOADS_NBIRTH_TIMESTAMP: &str = "payloads-nbirth-timestamp";
pub const PAYLOADS_NBIRTH_BDSEQ: &str = "payloads-nbirth-bdseq";
pub const PAYLOADS_NBIRTH_BDSEQ_REPEAT: &str = "payloads-nbirth-bdseq-repeat";
pub const PAYLOADS_NBIRTH_REBIRTH_REQ: &str = "payloads-nbirth-rebirth-req";
pub const PAYLOADS_NBIRTH_QOS: &str = "payloads-nbirth-qos";
pub const PAYLOADS_NBIRTH_RETAIN: &str = "payloads-nbirth-retain";
pub const TOPICS_NBIRTH_SEQ_NUM: &str = "topics-nbirth-seq-num";
pub const TOPICS_NBIRTH_BDSEQ_INCLUDED: &str = "topics-nbirth-bdseq-included";
pub const TOPICS_NBIRTH_BDSEQ_MATCHING: &str = "topics-nbirth-bdseq-matching";
pub const TOPICS_NBIRTH_BDSEQ_INCREMENT: &str = "topics-nbirth-bdseq-increment";
pub const TOPICS_NBIRTH_METRICS: &str = "topics-nbirth-metrics";
pub const TOPICS_NBIRTH_METRIC_REQS: &str = "topics-nbirth-metric-reqs";
pub const TOPICS_NBIRTH_REBIRTH_METRIC: &str = "topics-nbirth-rebirth-metric";
pub const TOPICS_NBIRTH_MQTT: &str = "topics-nbirth-mqtt";

// ── DBIRTH ──────────────────────────────────────────────────────────
pub const MESSAGE_FLOW_DEVICE_BIRTH_PUBLISH_NBIRTH_WAIT: &str = "message-flow-device-birth-publish-nbirth-wait";
pub const PAYLOADS_DBIRTH_SEQ: &str = "payloads-dbirth-seq";
pub const PAYLOADS_DBIRTH_SEQ_INC: &str = "payloads-dbirth-seq-inc";
pub const PAYLOADS_DBIRTH_ORDER: &str = "payloads-dbirth-order";
pub const PAYLOADS_DBIRTH_QOS: &str = "payloads-dbirth-qos";
pub const PAYLOADS_DBIRTH_RETAIN: &str = "payloads-dbirth-retain";
pub const PAYLOADS_DBIRTH_TIMESTAMP: &str = "payloads-dbirth-timestamp";
pub const TOPICS_DBIRTH_SEQ: &str = "topics-dbirth-seq";
pub const TOPICS_DBIRTH_METRICS: &str = "topics-dbirth-metrics";
pub const TOPICS_DBIRTH_METRIC_REQS: &str = "topics-dbirth-metric-reqs";
pub const TOPICS_DBIRTH_MQTT: &str = "topics-dbirth-mqtt";

// ── NDATA / DDATA ───────────────────────────────────────────────────
pub const PAYLOADS_NDATA_SEQ: &str = "payloads-ndata-seq";
pub const PAYLOADS_NDATA_SEQ_INC: &str = "payloads-ndata-seq-inc";
pub const PAYLOADS_NDATA_ORDER: &str = "payloads-ndata-order";
pub const PAYLOADS_NDATA_QOS: &str = "payloads-ndata-qos";
pub const PAYLOADS_NDATA_RETAIN: &str = "payloads-ndata-retain";
pub const PAYLOADS_NDATA_TIMESTAMP: &str = "payloads-ndata-timestamp";
pub const TOPICS_NDATA_SEQ_NUM: &str = "topics-ndata-seq-num";
pub const PAYLOADS_DDATA_SEQ: &str = "payloads-ddata-seq";
pub const PAYLOADS_DDATA_SEQ_INC: &str = "payloads-ddata-seq-inc";
pub const PAYLOADS_DDATA_ORDER: &str = "payloads-ddata-order";
pub const PAYLOADS_DDATA_QOS: &str = "payloads-ddata-qos";
pub const PAYLOADS_DDATA_RETAIN: &str = "payloads-ddata-retain";
pub const PAYLOADS_DDATA_TIMESTAMP: &str = "payloads-ddata-timestamp";
pub const TOPICS_DDATA_SEQ_NUM: &str = "topics-ddata-seq-num";
pub const PRINCIPLES_RBE_RECOMMENDED: &str = "principles-rbe-recommended";
pub const OPERATIONAL_BEHAVIOR_DATA_PUBLISH_NBIRTH_CHANGE: &str = "operational-behavior-data-publish-nbirth-change";
pub const OPERATIONAL_BEHAVIOR_DATA_PUBLISH_DBIRTH_CHANGE: &str = "operational-behavior-data-publish-dbirth-change";
pub const OPERATIONAL_BEHAVIOR_DATA_PUBLISH_NBIRTH_ORDER: &str = "operational-behavior-data-publish-nbirth-order";
pub const OPERATIONAL_BEHAVIOR_DATA_PUBLISH_DBIRTH_ORDER: &str = "operational-behavior-data-publish-dbirth-order";

// ── NDEATH / DDEATH ─────────────────────────────────────────────────
pub const TOPICS_NDEATH_PAYLOAD: &str = "topics-ndeath-payload";
pub const TOPICS_NDEATH_SEQ: &str = "topics-ndeath-seq";
pub const PAYLOADS_NDEATH_SEQ: &str = "payloads-ndeath-seq";
pub const PAYLOADS_NDEATH_BDSEQ: &str = "payloads-ndeath-bdseq";
pub const PAYLOADS_NDEATH_WILL_MESSAGE: &str = "payloads-ndeath-will-message";
pub const PAYLOADS_NDEATH_WILL_MESSAGE_QOS: &str = "payloads-ndeath-will-message-qos";
pub const PAYLOADS_NDEATH_WILL_MESSAGE_RETAIN: &str = "payloads-ndeath-will-message-retain";
pub const PAYLOADS_DDEATH_SEQ: &str = "payloads-ddeath-seq";
pub const PAYLOADS_DDEATH_SEQ_INC: &str = "payloads-ddeath-seq-inc";
pub const PAYLOADS_DDEATH_SEQ_NUMBER: &str = "payloads-ddeath-seq-number";
pub const PAYLOADS_DDEATH_TIMESTAMP: &str = "payloads-ddeath-timestamp";
pub const TOPICS_DDEATH_SEQ_NUM: &str = "topics-ddeath-seq-num";
pub const TOPICS_DDEATH_MQTT: &str = "topics-ddeath-mqtt";
pub const OPERATIONAL_BEHAVIOR_DEVICE_DDEATH: &str = "operational-behavior-device-ddeath";

// ── NCMD / DCMD ─────────────────────────────────────────────────────
pub const PAYLOADS_NCMD_SEQ: &str = "payloads-ncmd-seq";
pub const PAYLOADS_NCMD_TIMESTAMP: &str = "payloads-ncmd-timestamp";
pub const PAYLOADS_NCMD_QOS: &str = "payloads-ncmd-qos";
pub const PAYLOADS_NCMD_RETAIN: &str = "payloads-ncmd-retain";
pub const TOPICS_NCMD_PAYLOAD: &str = "topics-ncmd-payload";
pub const PAYLOADS_DCMD_SEQ: &str = "payloads-dcmd-seq";
pub const PAYLOADS_DCMD_TIMESTAMP: &str = "payloads-dcmd-timestamp";
pub const PAYLOADS_DCMD_QOS: &str = "payloads-dcmd-qos";
pub const PAYLOADS_DCMD_RETAIN: &str = "payloads-dcmd-retain";
pub const TOPICS_DCMD_PAYLOAD: &str = "topics-dcmd-payload";

// ── Metrics and aliases ─────────────────────────────────────────────
pub const PAYLOADS_ALIAS_UNIQUENESS: &str = "payloads-alias-uniqueness";
pub const PAYLOADS_ALIAS_BIRTH_REQUIREMENT: &str = "payloads-alias-birth-requirement";
pub const PAYLOADS_ALIAS_DATA_CMD_REQUIREMENT: &str = "payloads-alias-data-cmd-requirement";
pub const PAYLOADS_NAME_REQUIREMENT: &str = "payloads-name-requirement";
pub const PAYLOADS_NAME_BIRTH_DATA_REQUIREMENT: &str = "payloads-name-birth-data-requirement";
pub const PAYLOADS_METRIC_DATATYPE_REQ: &str = "payloads-metric-datatype-req";
pub const PAYLOADS_METRIC_DATATYPE_VALUE: &str = "payloads-metric-datatype-value";
pub const PAYLOADS_TIMESTAMP_IN_UTC: &str = "payloads_timestamp_in_UTC";
pub const OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_NAME: &str = "operational-behavior-data-commands-rebirth-name";
pub const OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_DATATYPE: &str = "operational-behavior-data-commands-rebirth-datatype";
pub const OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_VALUE: &str = "operational-behavior-data-commands-rebirth-value";
pub const OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_NAME_ALIASES: &str = "operational-behavior-data-commands-rebirth-name-aliases";

// ── Templates and DataSets ──────────────────────────────────────────
pub const PAYLOADS_TEMPLATE_DEFINITION_NBIRTH_ONLY: &str = "payloads-template-definition-nbirth-only";
pub const PAYLOADS_TEMPLATE_DEFINITION_REF: &str = "payloads-template-definition-ref";
pub const PAYLOADS_TEMPLATE_INSTANCE_REF: &str = "payloads-template-instance-ref";
pub const PAYLOADS_TEMPLATE_INSTANCE_MEMBERS: &str = "payloads-template-instance-members";
pub const PAYLOADS_TEMPLATE_INSTANCE_MEMBERS_BIRTH: &str = "payloads-template-instance-members-birth";
pub const PAYLOADS_TEMPLATE_INSTANCE_MEMBERS_DATA: &str = "payloads-template-instance-members-data";
pub const PAYLOADS_TEMPLATE_REF_INSTANCE: &str = "payloads-template-ref-instance";
pub const PAYLOADS_DATASET_COLUMN_SIZE: &str = "payloads-dataset-column-size";
pub const PAYLOADS_DATASET_TYPES_NUM: &str = "payloads-dataset-types-num";

// ── Host application STATE ──────────────────────────────────────────
pub const INTRO_SPARKPLUG_HOST_STATE: &str = "intro-sparkplug-host-state";
pub const COMPONENTS_PH_STATE: &str = "components-ph-state";
pub const OPERATIONAL_BEHAVIOR_HOST_APPLICATION_HOST_ID: &str = "operational-behavior-host-application-host-id";
pub const PAYLOADS_STATE_WILL_MESSAGE: &str = "payloads-state-will-message";
pub const PAYLOADS_STATE_WILL_MESSAGE_QOS: &str = "payloads-state-will-message-qos";
pub const PAYLOADS_STATE_WILL_MESSAGE_RETAIN: &str = "payloads-state-will-message-retain";
pub const PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD: &str = "payloads-state-will-message-payload";
pub const PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD_BDSEQ: &str = "payloads-state-will-message-payload-bdseq";
pub const PAYLOADS_STATE_SUBSCRIBE: &str = "payloads-state-subscribe";
pub const PAYLOADS_STATE_BIRTH: &str = "payloads-state-birth";
pub const PAYLOADS_STATE_BIRTH_PAYLOAD: &str = "payloads-state-birth-payload";
pub const PAYLOADS_STATE_BIRTH_PAYLOAD_BDSEQ: &str = "payloads-state-birth-payload-bdseq";
pub const HOST_TOPIC_PHID_BIRTH_PAYLOAD: &str = "host-topic-phid-birth-payload";
pub const HOST_TOPIC_PHID_BIRTH_QOS: &str = "host-topic-phid-birth-qos";
pub const HOST_TOPIC_PHID_BIRTH_RETAIN: &str = "host-topic-phid-birth-retain";
pub const HOST_TOPIC_PHID_BIRTH_REQUIRED: &str = "host-topic-phid-birth-required";
pub const HOST_TOPIC_PHID_DEATH_PAYLOAD: &str = "host-topic-phid-death-payload";
pub const HOST_TOPIC_PHID_DEATH_PAYLOAD_BDSEQ: &str = "host-topic-phid-death-payload-bdseq";
pub const HOST_TOPIC_PHID_DEATH_REQUIRED: &str = "host-topic-phid-death-required";
pub const MESSAGE_FLOW_PHID_SPARKPLUG_CLEAN_SESSION_311: &str = "message-flow-phid-sparkplug-clean-session-311";
pub const MESSAGE_FLOW_PHID_SPARKPLUG_SUBSCRIPTION: &str = "message-flow-phid-sparkplug-subscription";
pub const MESSAGE_FLOW_PHID_SPARKPLUG_STATE_PUBLISH: &str = "message-flow-phid-sparkplug-state-publish";

// ── Host reorder timeout ────────────────────────────────────────────
pub const OPERATIONAL_BEHAVIOR_HOST_REORDERING_PARAM: &str = "operational-behavior-host-reordering-param";
pub const OPERATIONAL_BEHAVIOR_HOST_REORDERING_START: &str = "operational-behavior-host-reordering-start";
pub const OPERATIONAL_BEHAVIOR_HOST_REORDERING_REBIRTH: &str = "operational-behavior-host-reordering-rebirth";
pub const OPERATIONAL_BEHAVIOR_HOST_REORDERING_SUCCESS: &str = "operational-behavior-host-reordering-success";

// ── Edge node session establishment ─────────────────────────────────
pub const PRINCIPLES_BIRTH_CERTIFICATES_ORDER: &str = "principles-birth-certificates-order";
pub const PRINCIPLES_PERSISTENCE_CLEAN_SESSION_311: &str = "principles-persistence-clean-session-311";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_CONNECT: &str = "message-flow-edge-node-birth-publish-connect";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE: &str = "message-flow-edge-node-birth-publish-will-message";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_TOPIC: &str = "message-flow-edge-node-birth-publish-will-message-topic";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD: &str = "message-flow-edge-node-birth-publish-will-message-payload";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD_BDSEQ: &str = "message-flow-edge-node-birth-publish-will-message-payload-bdSeq";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_QOS: &str = "message-flow-edge-node-birth-publish-will-message-qos";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_WILL_RETAINED: &str = "message-flow-edge-node-birth-publish-will-message-will-retained";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_NBIRTH_TOPIC: &str = "message-flow-edge-node-birth-publish-nbirth-topic";
pub const MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_PHID_WAIT: &str = "message-flow-edge-node-birth-publish-phid-wait";
pub const MESSAGE_FLOW_EDGE_NODE_NCMD_SUBSCRIBE: &str = "message-flow-edge-node-ncmd-subscribe";
pub const MESSAGE_FLOW_DEVICE_DCMD_SUBSCRIBE: &str = "message-flow-device-dcmd-subscribe";

// ── Catalog ─────────────────────────────────────────────────────────

/// Every requirement the monitor and the built-in scenarios evaluate.
pub const CATALOG: &[Requirement] = &[
    // Topic namespace and identity
    Requirement {
        id: TOPIC_STRUCTURE_NAMESPACE_UNIQUE_EDGE_NODE_DESCRIPTOR,
        strength: Strength::Must,
        text: "The group_id combined with the edge_node_id element MUST be unique from any other group_id/edge_node_id assigned in the MQTT infrastructure.",
    },
    Requirement {
        id: INTRO_EDGE_NODE_ID_UNIQUENESS,
        strength: Strength::Must,
        text: "The Edge Node Descriptor MUST be unique within the context of all of other Edge Nodes within the Sparkplug infrastructure.",
    },
    Requirement {
        id: TOPIC_STRUCTURE_NAMESPACE_VALID_GROUP_ID,
        strength: Strength::Must,
        text: "The format of the Group ID MUST be a valid UTF-8 string with the exception of the reserved characters of + (plus), / (forward slash), and # (number sign).",
    },
    Requirement {
        id: TOPIC_STRUCTURE_NAMESPACE_VALID_EDGE_NODE_ID,
        strength: Strength::Must,
        text: "The format of the edge_node_id MUST be a valid UTF-8 string with the exception of the reserved characters of + (plus), / (forward slash), and # (number sign).",
    },
    Requirement {
        id: TOPIC_STRUCTURE_NAMESPACE_VALID_DEVICE_ID,
        strength: Strength::Must,
        text: "The format of the device_id MUST be a valid UTF-8 string except for the reserved characters of + (plus), / (forward slash), and # (number sign).",
    },
    Requirement {
        id: TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_ASSOCIATED_MESSAGE_TYPES,
        strength: Strength::Must,
        text: "The device_id MUST be included with message_type elements DBIRTH, DDEATH, DDATA, and DCMD based topics.",
    },
    Requirement {
        id: TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_NON_ASSOCIATED_MESSAGE_TYPES,
        strength: Strength::Must,
        text: "The device_id MUST NOT be included with message_type elements NBIRTH, NDEATH, NDATA, NCMD, and STATE based topics",
    },
    // Sequence numbers
    Requirement {
        id: PAYLOADS_SEQUENCE_NUM_ZERO_NBIRTH,
        strength: Strength::Must,
        text: "A NBIRTH message MUST always contain a sequence number of zero.",
    },
    Requirement {
        id: PAYLOADS_SEQUENCE_NUM_INCREMENTING,
        strength: Strength::Must,
        text: "All subsequent messages MUST contain a sequence number that is continually increasing by one in each message until a value of 255 is reached. At that point, the sequence number of the following message MUST be zero.",
    },
    Requirement {
        id: PAYLOADS_SEQUENCE_NUM_ALWAYS_INCLUDED,
        strength: Strength::Must,
        text: "A sequence number MUST be included in the payload of every Sparkplug MQTT message except NDEATH messages.",
    },
    // NBIRTH
    Requirement {
        id: PAYLOADS_NBIRTH_SEQ,
        strength: Strength::Must,
        text: "Every NBIRTH message MUST include a sequence number and it MUST have a value between 0 and 255 (inclusive).",
    },
    Requirement {
        id: PAYLOADS_NBIRTH_TIMESTAMP,
        strength: Strength::Must,
        text: "NBIRTH messages MUST include a payload timestamp that denotes the time at which the message was published.",
    },
    Requirement {
        id: PAYLOADS_NBIRTH_BDSEQ,
        strength: Strength::Must,
        text: "Every NBIRTH message MUST include a bdSeq number metric.",
    },
    Requirement {
        id: PAYLOADS_NBIRTH_BDSEQ_REPEAT,
        strength: Strength::Must,
        text: "The bdSeq number value MUST match the bdSeq number value that was sent in the prior MQTT CONNECT packet WILL Message.",
    },
    Requirement {
        id: PAYLOADS_NBIRTH_REBIRTH_REQ,
        strength: Strength::Must,
        text: "Every NBIRTH MUST include a metric with the name 'Node Control/Rebirth' and have a boolean value of false.",
    },
    Requirement {
        id: PAYLOADS_NBIRTH_QOS,
        strength: Strength::Must,
        text: "NBIRTH messages MUST be published with the MQTT QoS set to 0.",
    },
    Requirement {
        id: PAYLOADS_NBIRTH_RETAIN,
        strength: Strength::Must,
        text: "NBIRTH messages MUST be published with the MQTT retain flag set to false.",
    },
    Requirement {
        id: TOPICS_NBIRTH_SEQ_NUM,
        strength: Strength::Must,
        text: "The NBIRTH MUST include a sequence number in the payload and it MUST have a value of 0.",
    },
    Requirement {
        id: TOPICS_NBIRTH_BDSEQ_INCLUDED,
        strength: Strength::Must,
        text: "A bdSeq number as a metric MUST be included in the payload.",
    },
    Requirement {
        id: TOPICS_NBIRTH_BDSEQ_MATCHING,
        strength: Strength::Must,
        text: "This MUST match the bdSeq number provided in the MQTT CONNECT packet's Will Message payload.",
    },
    Requirement {
        id: TOPICS_NBIRTH_BDSEQ_INCREMENT,
        strength: Strength::Must,
        text: "The bdSeq number MUST start at zero and increment by one on every new MQTT CONNECT packet.",
    },
    Requirement {
        id: TOPICS_NBIRTH_METRICS,
        strength: Strength::Must,
        text: "At a minimum each metric MUST include the metric name, datatype, and current value.",
    },
    Requirement {
        id: TOPICS_NBIRTH_METRIC_REQS,
        strength: Strength::Must,
        text: "The NBIRTH MUST include every metric the Edge Node will ever report on.",
    },
    Requirement {
        id: TOPICS_NBIRTH_REBIRTH_METRIC,
        strength: Strength::Must,
        text: "The NBIRTH message MUST include the following metric",
    },
    Requirement {
        id: TOPICS_NBIRTH_MQTT,
        strength: Strength::Must,
        text: "NBIRTH messages MUST be published with MQTT QoS equal to 0 and retain equal to false.",
    },
    // DBIRTH
    Requirement {
        id: MESSAGE_FLOW_DEVICE_BIRTH_PUBLISH_NBIRTH_WAIT,
        strength: Strength::Must,
        text: "The NBIRTH message must have been sent within the current MQTT session prior to a DBIRTH being published.",
    },
    Requirement {
        id: PAYLOADS_DBIRTH_SEQ,
        strength: Strength::Must,
        text: "Every DBIRTH message MUST include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_DBIRTH_SEQ_INC,
        strength: Strength::Must,
        text: "Every DBIRTH message MUST include a sequence number value that is one greater than the previous sequence number sent by the Edge Node. This value MUST never exceed 255. If in the previous sequence number sent by the Edge Node was 255, the next sequence number sent MUST have a value of 0.",
    },
    Requirement {
        id: PAYLOADS_DBIRTH_ORDER,
        strength: Strength::Must,
        text: "All DBIRTH messages sent by an Edge Node MUST be sent immediately after the NBIRTH and before any NDATA or DDATA messages are published by the Edge Node.",
    },
    Requirement {
        id: PAYLOADS_DBIRTH_QOS,
        strength: Strength::Must,
        text: "DBIRTH messages MUST be published with the MQTT QoS set to 0.",
    },
    Requirement {
        id: PAYLOADS_DBIRTH_RETAIN,
        strength: Strength::Must,
        text: "DBIRTH messages MUST be published with the MQTT retain flag set to false.",
    },
    Requirement {
        id: PAYLOADS_DBIRTH_TIMESTAMP,
        strength: Strength::Must,
        text: "DBIRTH messages MUST include a payload timestamp that denotes the time at which the message was published.",
    },
    Requirement {
        id: TOPICS_DBIRTH_SEQ,
        strength: Strength::Must,
        text: "The DBIRTH MUST include a sequence number in the payload and it MUST have a value of one greater than the previous MQTT message from the Edge Node contained unless the previous MQTT message contained a value of 255. In this case the sequence number MUST be 0.",
    },
    Requirement {
        id: TOPICS_DBIRTH_METRICS,
        strength: Strength::Must,
        text: "At a minimum each metric MUST include the following",
    },
    Requirement {
        id: TOPICS_DBIRTH_METRIC_REQS,
        strength: Strength::Must,
        text: "The DBIRTH MUST include every metric the Edge Node will ever report on.",
    },
    Requirement {
        id: TOPICS_DBIRTH_MQTT,
        strength: Strength::Must,
        text: "DBIRTH messages MUST be published with MQTT QoS equal to 0 and retain equal to false.",
    },
    // NDATA / DDATA
    Requirement {
        id: PAYLOADS_NDATA_SEQ,
        strength: Strength::Must,
        text: "Every NDATA message MUST include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_NDATA_SEQ_INC,
        strength: Strength::Must,
        text: "Every NDATA message MUST include a sequence number value that is one greater than the previous sequence number sent by the Edge Node. This value MUST never exceed 255. If in the previous sequence number sent by the Edge Node was 255, the next sequence number sent MUST have a value of 0.",
    },
    Requirement {
        id: PAYLOADS_NDATA_ORDER,
        strength: Strength::Must,
        text: "All NDATA messages sent by an Edge Node MUST NOT be sent until all the NBIRTH and all DBIRTH messages have been published by the Edge Node.",
    },
    Requirement {
        id: PAYLOADS_NDATA_QOS,
        strength: Strength::Must,
        text: "NDATA messages MUST be published with the MQTT QoS set to 0.",
    },
    Requirement {
        id: PAYLOADS_NDATA_RETAIN,
        strength: Strength::Must,
        text: "NDATA messages MUST be published with the MQTT retain flag set to false.",
    },
    Requirement {
        id: PAYLOADS_NDATA_TIMESTAMP,
        strength: Strength::Must,
        text: "NDATA messages MUST include a payload timestamp that denotes the time at which the message was published.",
    },
    Requirement {
        id: TOPICS_NDATA_SEQ_NUM,
        strength: Strength::Must,
        text: "The NDATA MUST include a sequence number in the payload and it MUST have a value of one greater than the previous MQTT message from the Edge Node contained unless the previous MQTT message contained a value of 255. In this case the sequence number MUST be 0.",
    },
    Requirement {
        id: PAYLOADS_DDATA_SEQ,
        strength: Strength::Must,
        text: "Every DDATA message MUST include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_DDATA_SEQ_INC,
        strength: Strength::Must,
        text: "Every DDATA message MUST include a sequence number value that is one greater than the previous sequence number sent by the Edge Node. This value MUST never exceed 255. If in the previous sequence number sent by the Edge Node was 255, the next sequence number sent MUST have a value of 0.",
    },
    Requirement {
        id: PAYLOADS_DDATA_ORDER,
        strength: Strength::Must,
        text: "All DDATA messages sent by an Edge Node MUST NOT be sent until all the NBIRTH and all DBIRTH messages have been published by the Edge Node.",
    },
    Requirement {
        id: PAYLOADS_DDATA_QOS,
        strength: Strength::Must,
        text: "DDATA messages MUST be published with the MQTT QoS set to 0.",
    },
    Requirement {
        id: PAYLOADS_DDATA_RETAIN,
        strength: Strength::Must,
        text: "DDATA messages MUST be published with the MQTT retain flag set to false.",
    },
    Requirement {
        id: PAYLOADS_DDATA_TIMESTAMP,
        strength: Strength::Must,
        text: "DDATA messages MUST include a payload timestamp that denotes the time at which the message was published.",
    },
    Requirement {
        id: TOPICS_DDATA_SEQ_NUM,
        strength: Strength::Must,
        text: "The DDATA MUST include a sequence number in the payload and it MUST have a value of one greater than the previous MQTT message from the Edge Node contained unless the previous MQTT message contained a value of 255. In this case the sequence number MUST be 0.",
    },
    Requirement {
        id: PRINCIPLES_RBE_RECOMMENDED,
        strength: Strength::Should,
        text: "Because of the stateful nature of Sparkplug sessions, data SHOULD NOT be published from Edge Nodes on a periodic basis and instead SHOULD be published using a RBE based approach.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_PUBLISH_NBIRTH_CHANGE,
        strength: Strength::Should,
        text: "NDATA messages SHOULD only be published when Edge Node level metrics change.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_PUBLISH_DBIRTH_CHANGE,
        strength: Strength::Should,
        text: "DDATA messages SHOULD only be published when Device level metrics change.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_PUBLISH_NBIRTH_ORDER,
        strength: Strength::Must,
        text: "For all metrics where is_historical=false, NBIRTH and NDATA messages MUST keep metric values in chronological order in the list of metrics in the payload.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_PUBLISH_DBIRTH_ORDER,
        strength: Strength::Must,
        text: "For all metrics where is_historical=false, DBIRTH and DDATA messages MUST keep metric values in chronological order in the list of metrics in the payload.",
    },
    // NDEATH / DDEATH
    Requirement {
        id: TOPICS_NDEATH_PAYLOAD,
        strength: Strength::Must,
        text: "The NDEATH message contains a very simple payload that MUST only include a single metric, the bdSeq number, so that the NDEATH event can be associated with the NBIRTH.",
    },
    Requirement {
        id: TOPICS_NDEATH_SEQ,
        strength: Strength::Must,
        text: "The NDEATH message MUST NOT include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_NDEATH_SEQ,
        strength: Strength::Must,
        text: "Every NDEATH message MUST NOT include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_NDEATH_BDSEQ,
        strength: Strength::Must,
        text: "The NDEATH message MUST include the same bdSeq number value that will be used in the associated NBIRTH message.",
    },
    Requirement {
        id: PAYLOADS_NDEATH_WILL_MESSAGE,
        strength: Strength::Must,
        text: "An NDEATH message MUST be registered as a Will Message in the MQTT CONNECT packet.",
    },
    Requirement {
        id: PAYLOADS_NDEATH_WILL_MESSAGE_QOS,
        strength: Strength::Must,
        text: "The NDEATH message MUST set the MQTT Will QoS to 1 in the MQTT CONNECT packet.",
    },
    Requirement {
        id: PAYLOADS_NDEATH_WILL_MESSAGE_RETAIN,
        strength: Strength::Must,
        text: "The NDEATH message MUST set the MQTT Will Retained flag to false in the MQTT CONNECT packet.",
    },
    Requirement {
        id: PAYLOADS_DDEATH_SEQ,
        strength: Strength::Must,
        text: "Every DDEATH message MUST include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_DDEATH_SEQ_INC,
        strength: Strength::Must,
        text: "Every DDEATH message MUST include a sequence number value that is one greater than the previous sequence number sent by the Edge Node. This value MUST never exceed 255. If in the previous sequence number sent by the Edge Node was 255, the next sequence number sent MUST have a value of 0.",
    },
    Requirement {
        id: PAYLOADS_DDEATH_SEQ_NUMBER,
        strength: Strength::Must,
        text: "A sequence number MUST be included with the DDEATH messages so the Host Application can ensure order of messages and maintain the state of the data.",
    },
    Requirement {
        id: PAYLOADS_DDEATH_TIMESTAMP,
        strength: Strength::Must,
        text: "DDEATH messages MUST include a payload timestamp that denotes the time at which the message was published.",
    },
    Requirement {
        id: TOPICS_DDEATH_SEQ_NUM,
        strength: Strength::Must,
        text: "The DDEATH MUST include a sequence number in the payload and it MUST have a value of one greater than the previous MQTT message from the Edge Node contained unless the previous MQTT message contained a value of 255. In this case the sequence number MUST be 0.",
    },
    Requirement {
        id: TOPICS_DDEATH_MQTT,
        strength: Strength::Must,
        text: "DDEATH messages MUST be published with MQTT QoS equal to 0 and retain equal to false.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DEVICE_DDEATH,
        strength: Strength::Must,
        text: "If a Sparkplug Edge Node loses connection with an attached Sparkplug Device, it MUST publish a DDEATH message on behalf of the device.",
    },
    // NCMD / DCMD
    Requirement {
        id: PAYLOADS_NCMD_SEQ,
        strength: Strength::Must,
        text: "Every NCMD message MUST NOT include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_NCMD_TIMESTAMP,
        strength: Strength::Must,
        text: "NCMD messages MUST include a payload timestamp that denotes the time at which the message was published.",
    },
    Requirement {
        id: PAYLOADS_NCMD_QOS,
        strength: Strength::Must,
        text: "NCMD messages MUST be published with the MQTT QoS set to 0.",
    },
    Requirement {
        id: PAYLOADS_NCMD_RETAIN,
        strength: Strength::Must,
        text: "NCMD messages MUST be published with the MQTT retain flag set to false.",
    },
    Requirement {
        id: TOPICS_NCMD_PAYLOAD,
        strength: Strength::Must,
        text: "The NCMD MUST include the metrics that need to be written to on the Edge Node.",
    },
    Requirement {
        id: PAYLOADS_DCMD_SEQ,
        strength: Strength::Must,
        text: "Every DCMD message MUST NOT include a sequence number.",
    },
    Requirement {
        id: PAYLOADS_DCMD_TIMESTAMP,
        strength: Strength::Must,
        text: "DCMD messages MUST include a payload timestamp that denotes the time at which the message was published.",
    },
    Requirement {
        id: PAYLOADS_DCMD_QOS,
        strength: Strength::Must,
        text: "DCMD messages MUST be published with the MQTT QoS set to 0.",
    },
    Requirement {
        id: PAYLOADS_DCMD_RETAIN,
        strength: Strength::Must,
        text: "DCMD messages MUST be published with the MQTT retain flag set to false.",
    },
    Requirement {
        id: TOPICS_DCMD_PAYLOAD,
        strength: Strength::Must,
        text: "The DCMD MUST include the metrics that need to be written to on the Device.",
    },
    // Metrics and aliases
    Requirement {
        id: PAYLOADS_ALIAS_UNIQUENESS,
        strength: Strength::Must,
        text: "If supplied in an NBIRTH or DBIRTH it MUST be a unique number across this Edge Node's entire set of metrics.",
    },
    Requirement {
        id: PAYLOADS_ALIAS_BIRTH_REQUIREMENT,
        strength: Strength::Must,
        text: "NBIRTH and DBIRTH messages MUST include both a metric name and alias.",
    },
    Requirement {
        id: PAYLOADS_ALIAS_DATA_CMD_REQUIREMENT,
        strength: Strength::Must,
        text: "NDATA, DDATA, NCMD, and DCMD messages MUST only include an alias and the metric name MUST be excluded.",
    },
    Requirement {
        id: PAYLOADS_NAME_REQUIREMENT,
        strength: Strength::Must,
        text: "The name MUST be included with every metric unless aliases are being used.",
    },
    Requirement {
        id: PAYLOADS_NAME_BIRTH_DATA_REQUIREMENT,
        strength: Strength::Must,
        text: "The timestamp MUST be included with every metric in all NBIRTH, DBIRTH, NDATA, and DDATA messages.",
    },
    Requirement {
        id: PAYLOADS_METRIC_DATATYPE_REQ,
        strength: Strength::Must,
        text: "The datatype MUST be included with each metric definition in NBIRTH and DBIRTH messages.",
    },
    Requirement {
        id: PAYLOADS_METRIC_DATATYPE_VALUE,
        strength: Strength::Must,
        text: "The datatype MUST be one of the enumerated values as shown in the valid Sparkplug Data Types.",
    },
    Requirement {
        id: PAYLOADS_TIMESTAMP_IN_UTC,
        strength: Strength::Must,
        text: "This timestamp MUST be in UTC.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_NAME,
        strength: Strength::Must,
        text: "An NBIRTH message MUST include a metric with a name of 'Node Control/Rebirth'.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_DATATYPE,
        strength: Strength::Must,
        text: "The 'Node Control/Rebirth' metric in the NBIRTH message MUST have a datatype of 'Boolean'.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_VALUE,
        strength: Strength::Must,
        text: "The 'Node Control/Rebirth' metric value in the NBIRTH message MUST have a value of false.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_DATA_COMMANDS_REBIRTH_NAME_ALIASES,
        strength: Strength::Must,
        text: "When aliases are being used by an Edge Node an NBIRTH message MUST NOT include an alias for the 'Node Control/Rebirth' metric.",
    },
    // Templates and DataSets
    Requirement {
        id: PAYLOADS_TEMPLATE_DEFINITION_NBIRTH_ONLY,
        strength: Strength::Must,
        text: "Template Definitions MUST only be included in NBIRTH messages.",
    },
    Requirement {
        id: PAYLOADS_TEMPLATE_DEFINITION_REF,
        strength: Strength::Must,
        text: "A Template Definition MUST omit the template_ref field.",
    },
    Requirement {
        id: PAYLOADS_TEMPLATE_INSTANCE_REF,
        strength: Strength::Must,
        text: "A Template Instance MUST have template_ref set to the type of template definition it is.",
    },
    Requirement {
        id: PAYLOADS_TEMPLATE_INSTANCE_MEMBERS,
        strength: Strength::Must,
        text: "A Template Instance MUST include only members that were included in the corresponding template definition.",
    },
    Requirement {
        id: PAYLOADS_TEMPLATE_INSTANCE_MEMBERS_BIRTH,
        strength: Strength::Must,
        text: "A Template Instance in a NBIRTH or DBIRTH message MUST include all members that were included in the corresponding Template Definition.",
    },
    Requirement {
        id: PAYLOADS_TEMPLATE_INSTANCE_MEMBERS_DATA,
        strength: Strength::Should,
        text: "A Template Instance in a NDATA or DDATA message MAY include only a subset of the members that were included in the corresponding template definition.",
    },
    Requirement {
        id: PAYLOADS_TEMPLATE_REF_INSTANCE,
        strength: Strength::Must,
        text: "This MUST be a UTF-8 string representing a reference to a Template Definition name if this is a Template Instance.",
    },
    Requirement {
        id: PAYLOADS_DATASET_COLUMN_SIZE,
        strength: Strength::Must,
        text: "This MUST be an unsigned 64-bit integer representing the number of columns in this DataSet.",
    },
    Requirement {
        id: PAYLOADS_DATASET_TYPES_NUM,
        strength: Strength::Must,
        text: "The array of types MUST have the same number of elements that the columns array contains.",
    },
    // Host application STATE
    Requirement {
        id: INTRO_SPARKPLUG_HOST_STATE,
        strength: Strength::Must,
        text: "Sparkplug Host Applications MUST publish STATE messages denoting their online and offline status.",
    },
    Requirement {
        id: COMPONENTS_PH_STATE,
        strength: Strength::Must,
        text: "A Sparkplug Host Application MUST utilize the STATE messages to denote whether it is online or offline at any given point in time.",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_HOST_APPLICATION_HOST_ID,
        strength: Strength::Must,
        text: "The host_id MUST be unique to all other Sparkplug Host IDs in the infrastructure.",
    },
    Requirement {
        id: PAYLOADS_STATE_WILL_MESSAGE,
        strength: Strength::Must,
        text: "Sparkplug Host Applications MUST register a Will Message in the MQTT CONNECT packet on the topic 'STATE/[sparkplug_host_id]'.",
    },
    Requirement {
        id: PAYLOADS_STATE_WILL_MESSAGE_QOS,
        strength: Strength::Must,
        text: "The Sparkplug Host Application MUST set the the MQTT Will QoS to 1 in the MQTT CONNECT packet.",
    },
    Requirement {
        id: PAYLOADS_STATE_WILL_MESSAGE_RETAIN,
        strength: Strength::Must,
        text: "The Sparkplug Host Application MUST set the Will Retained flag to true in the MQTT CONNECT packet.",
    },
    Requirement {
        id: PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD,
        strength: Strength::Must,
        text: "The Death Certificate Payload MUST be JSON UTF-8 data. It MUST include three key/value pairs where the one key MUST be 'online' and it's value is a boolean 'false'. Another key MUST be 'bdSeq' and have a numeric value between 0 and 255 (inclusive). The final key MUST be 'timestamp' and the value MUST be a numeric value representing the current UTC time in milliseconds since Epoch.",
    },
    Requirement {
        id: PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD_BDSEQ,
        strength: Strength::Must,
        text: "The Death Certificate's bdSeq number value MUST have a value of one more than the bdSeq number value sent in the prior MQTT CONNECT packet from the Host Application unless the previous value was 255. In this case the new bdSeq number value MUST be 0.",
    },
    Requirement {
        id: PAYLOADS_STATE_SUBSCRIBE,
        strength: Strength::Must,
        text: "After establishing an MQTT connection, the Sparkplug Host Application MUST subscribe on it's own 'STATE/[sparkplug_host_id]' topic.",
    },
    Requirement {
        id: PAYLOADS_STATE_BIRTH,
        strength: Strength::Must,
        text: "After subscribing on it's own STATE/[sparkplug_host_id] topic, the Sparkplug Host Application MUST publish an MQTT message on the topic 'STATE/[sparkplug_host_id]' with a QoS of 1, and the retain flag set to true.",
    },
    Requirement {
        id: PAYLOADS_STATE_BIRTH_PAYLOAD,
        strength: Strength::Must,
        text: "The Birth Certificate Payload MUST be JSON UTF-8 data. It MUST include three key/value pairs where the one key MUST be 'online' and it's value is a boolean 'true'. Another key MUST be 'bdSeq' and have a numeric value between 0 and 255 (inclusive). The final key MUST be 'timestamp' and the value MUST be a numeric value representing the current UTC time in milliseconds since Epoch.",
    },
    Requirement {
        id: PAYLOADS_STATE_BIRTH_PAYLOAD_BDSEQ,
        strength: Strength::Must,
        text: "The bdSeq metric value MUST be be the same value set in the immediately prior MQTT CONNECT packet's Will Message payload.",
    },
    Requirement {
        id: HOST_TOPIC_PHID_BIRTH_PAYLOAD,
        strength: Strength::Must,
        text: "The Birth Certificate Payload MUST be JSON UTF-8 data. It MUST include three key/value pairs where the one key MUST be 'online' and it's value is a boolean 'true'. Another key MUST be 'bdSeq' and have a numeric value between 0 and 255 (inclusive). The final key MUST be 'timestamp' and the value MUST be a numeric value representing the current UTC time in milliseconds since Epoch.",
    },
    Requirement {
        id: HOST_TOPIC_PHID_BIRTH_QOS,
        strength: Strength::Must,
        text: "The MQTT Quality of Service (QoS) MUST be set to 1",
    },
    Requirement {
        id: HOST_TOPIC_PHID_BIRTH_RETAIN,
        strength: Strength::Must,
        text: "The MQTT retain flag for the Birth Certificate MUST be set to TRUE",
    },
    Requirement {
        id: HOST_TOPIC_PHID_BIRTH_REQUIRED,
        strength: Strength::Must,
        text: "The Sparkplug Host Application MUST publish a Sparkplug Host Application BIRTH message to the MQTT Server immediately after successfully subscribing its own STATE/sparkplug_host_application_id topic.",
    },
    Requirement {
        id: HOST_TOPIC_PHID_DEATH_PAYLOAD,
        strength: Strength::Must,
        text: "The Death Certificate Payload MUST be JSON UTF-8 data. It MUST include three key/value pairs where the one key MUST be 'online' and it's value is a boolean 'false'. Another key MUST be 'bdSeq' and have a numeric value between 0 and 255 (inclusive). The final key MUST be 'timestamp' and the value MUST be a numeric value representing the current UTC time in milliseconds since Epoch.",
    },
    Requirement {
        id: HOST_TOPIC_PHID_DEATH_PAYLOAD_BDSEQ,
        strength: Strength::Must,
        text: "The Death Certificate's bdSeq number value MUST have a value of one more than the bdSeq number value sent in the prior MQTT CONNECT packet from the Host Application unless the previous value was 255. In this case the new bdSeq number value MUST be 0.",
    },
    Requirement {
        id: HOST_TOPIC_PHID_DEATH_REQUIRED,
        strength: Strength::Must,
        text: "The Sparkplug Host Application MUST provide a Will message in the MQTT CONNECT packet",
    },
    Requirement {
        id: MESSAGE_FLOW_PHID_SPARKPLUG_CLEAN_SESSION_311,
        strength: Strength::Must,
        text: "The CONNECT Control Packet for all Sparkplug Host Applications when using MQTT 3.1.1 MUST set the MQTT 'Clean Session' flag to true.",
    },
    Requirement {
        id: MESSAGE_FLOW_PHID_SPARKPLUG_SUBSCRIPTION,
        strength: Strength::Must,
        text: "The subscription on the Sparkplug Topic Namespace and the STATE topic MUST be done immediately after successfully establishing the MQTT session and before publishing its own STATE message.",
    },
    Requirement {
        id: MESSAGE_FLOW_PHID_SPARKPLUG_STATE_PUBLISH,
        strength: Strength::Must,
        text: "Once an MQTT Session has been established, the Sparkplug Host Application subscriptions on the Sparkplug Topic Namespace have been established and the STATE topic subscription has been been established, the Sparkplug Host Application MUST publish a new STATE message.",
    },
    // Host reorder timeout
    Requirement {
        id: OPERATIONAL_BEHAVIOR_HOST_REORDERING_PARAM,
        strength: Strength::Should,
        text: "Sparkplug Host Applications SHOULD provide a configurable 'Reorder Timeout' parameter",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_HOST_REORDERING_START,
        strength: Strength::Should,
        text: "If a message arrives with an out of order sequence number, the Host Application SHOULD start a timer denoting the start of the Reorder Timeout window",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_HOST_REORDERING_REBIRTH,
        strength: Strength::Should,
        text: "If the Reorder Timeout elapses and the missing message(s) have not been received, the Sparkplug Host Application SHOULD send an NCMD to the Edge Node with a 'Node Control/Rebirth' request",
    },
    Requirement {
        id: OPERATIONAL_BEHAVIOR_HOST_REORDERING_SUCCESS,
        strength: Strength::Must,
        text: "If the missing messages that triggered the start of the Reorder Timeout timer arrive before the reordering timer elapses, the timer can be terminated and normal operation in the Host Application can continue",
    },
    // Edge node session establishment
    Requirement {
        id: PRINCIPLES_BIRTH_CERTIFICATES_ORDER,
        strength: Strength::Must,
        text: "Birth Certificates MUST be the first MQTT messages published by any Edge Node or any Host Application.",
    },
    Requirement {
        id: PRINCIPLES_PERSISTENCE_CLEAN_SESSION_311,
        strength: Strength::Must,
        text: "If the MQTT client is using MQTT v3.1.1, the Edge Node's MQTT CONNECT packet MUST set the 'Clean Session' flag to true.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_CONNECT,
        strength: Strength::Must,
        text: "Any Edge Node in the MQTT infrastructure MUST establish an MQTT Session prior to publishing NBIRTH and DBIRTH messages.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE,
        strength: Strength::Must,
        text: "When a Sparkplug Edge Node sends its MQTT CONNECT packet, it MUST include a Will Message.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_TOPIC,
        strength: Strength::Must,
        text: "The Edge Node's MQTT Will Message's topic MUST be of the form 'spBv1.0/group_id/NDEATH/edge_node_id' where group_id is the Sparkplug Group ID and the edge_node_id is the Sparkplug Edge Node ID for this Edge Node",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD,
        strength: Strength::Must,
        text: "The Edge Node's MQTT Will Message's payload MUST be a Sparkplug Google Protobuf encoded payload.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_PAYLOAD_BDSEQ,
        strength: Strength::Must,
        text: "The Edge Node's MQTT Will Message's payload MUST include a metric with the name of 'bdSeq', the datatype of INT64, and the value MUST be incremented by one from the value in the previous MQTT CONNECT packet unless the value would be greater than 255. If in the previous NBIRTH a value of 255 was sent, the next MQTT Connect packet Will Message payload bdSeq number value MUST have a value of 0.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_QOS,
        strength: Strength::Must,
        text: "The Edge Node's MQTT Will Message's MQTT QoS MUST be 1.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_WILL_MESSAGE_WILL_RETAINED,
        strength: Strength::Must,
        text: "The Edge Node's MQTT Will Message's retained flag MUST be set to false.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_NBIRTH_TOPIC,
        strength: Strength::Must,
        text: "The Edge Node's NBIRTH MQTT topic MUST be of the form 'spBv1.0/group_id/NBIRTH/edge_node_id' where group_id is the Sparkplug Group ID and the edge_node_id is the Sparkplug Edge Node ID for this Edge Node",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_PHID_WAIT,
        strength: Strength::Must,
        text: "If the Edge Node is configured to wait for a Primary Host Application it MUST verify the Primary Host Application is online via the STATE topic before publishing NBIRTH and DBIRTH messages.",
    },
    Requirement {
        id: MESSAGE_FLOW_EDGE_NODE_NCMD_SUBSCRIBE,
        strength: Strength::Must,
        text: "The MQTT client associated with the Edge Node MUST subscribe to a topic of the form 'spBv1.0/group_id/NCMD/edge_node_id' where group_id is the Sparkplug Group ID and the edge_node_id is the Sparkplug Edge Node ID for this Edge Node. It MUST subscribe on this topic with a QoS of 1.",
    },
    Requirement {
        id: MESSAGE_FLOW_DEVICE_DCMD_SUBSCRIBE,
        strength: Strength::Must,
        text: "If the Device supports writing to outputs, the MQTT client associated with the Device MUST subscribe to a topic of the form 'spBv1.0/group_id/DCMD/edge_node_id/device_id' where group_id is the Sparkplug Group ID the edge_node_id is the Sparkplug Edge Node ID and the device_id is the Sparkplug Device ID for this Device. It MUST subscribe on this topic with a QoS of 1.",
    },
];

/// Look up a requirement by identifier.
pub fn lookup(id: &str) -> Option<&'static Requirement> {
    CATALOG.iter().find(|r| r.id == id)
}

/// Strength of `id`; identifiers outside the catalog are treated as `Must`.
pub fn strength_of(id: &str) -> Strength {
    lookup(id).map(|r| r.strength).unwrap_or(Strength::Must)
}
