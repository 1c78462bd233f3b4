use tck_core::requirements::*;
use tck_core::topic::MessageKind;
use tck_core::{Monitor, Verdict};

use crate::support::*;

#[test]
fn ndata_before_nbirth_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    let findings = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NData),
        encode(Some(1), vec![long("A", None, 1)]),
    );
    assert_eq!(finding(&findings, PAYLOADS_NDATA_ORDER), Some(Verdict::Fail));
}

#[test]
fn dbirth_before_nbirth_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    let findings = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DBirth, "D1"),
        encode(Some(1), vec![long("P", None, 1)]),
    );
    assert_eq!(
        finding(&findings, MESSAGE_FLOW_DEVICE_BIRTH_PUBLISH_NBIRTH_WAIT),
        Some(Verdict::Fail)
    );
    assert_eq!(monitor.registry().device_count(), 0);
}

#[test]
fn ddata_requires_device_birth() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![]);

    let early = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DData, "D1"),
        encode(Some(1), vec![long("P", None, 1)]),
    );
    assert_eq!(finding(&early, PAYLOADS_DDATA_ORDER), Some(Verdict::Fail));

    edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DBirth, "D1"),
        encode(Some(1), vec![long("P", None, 1)]),
    );
    let late = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DData, "D1"),
        encode(Some(2), vec![long("P", None, 2)]),
    );
    assert_eq!(finding(&late, PAYLOADS_DDATA_ORDER), Some(Verdict::Pass));
}

#[test]
fn ddeath_for_unknown_device_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![]);
    let findings = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DDeath, "D9"),
        encode(Some(1), vec![]),
    );
    assert_eq!(finding(&findings, OPERATIONAL_BEHAVIOR_DEVICE_DDEATH), Some(Verdict::Fail));
}

#[test]
fn nbirth_by_second_connection_is_a_conflict() {
    let mut monitor = Monitor::default();
    let first = Edge::new("first", "G1", "E1");
    let second = Edge::new("second", "G1", "E1");
    first.connect(&mut monitor, 0);
    first.birth(&mut monitor, 0, vec![]);

    let findings = second.birth(&mut monitor, 0, vec![]);
    assert_eq!(
        finding(&findings, TOPIC_STRUCTURE_NAMESPACE_UNIQUE_EDGE_NODE_DESCRIPTOR),
        Some(Verdict::Fail)
    );
}

#[test]
fn node_data_on_a_device_topic_is_not_attributed() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![long("A", None, 1)]);

    let findings = edge.publish(
        &mut monitor,
        "spBv1.0/G1/NDATA/E1/D1",
        encode(Some(1), vec![long("A", None, 2)]),
    );
    assert_eq!(
        finding(&findings, TOPIC_STRUCTURE_NAMESPACE_DEVICE_ID_NON_ASSOCIATED_MESSAGE_TYPES),
        Some(Verdict::Fail)
    );
    assert_eq!(finding(&findings, PAYLOADS_DDATA_ORDER), None);
    assert_eq!(monitor.registry().device_count(), 0);

    // The node counter did not move: seq 1 is still next.
    let next = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NData),
        encode(Some(1), vec![long("A", None, 3)]),
    );
    assert_eq!(finding(&next, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));
}
