use tck_core::requirements::*;
use tck_core::topic::MessageKind;
use tck_core::{Monitor, Verdict};

use crate::support::*;

#[test]
fn distinct_aliases_pass() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    let birth = edge.birth(
        &mut monitor,
        0,
        vec![long("A", Some(1), 0), long("B", Some(2), 0)],
    );
    assert_eq!(finding(&birth, PAYLOADS_ALIAS_UNIQUENESS), Some(Verdict::Pass));
    assert_eq!(finding(&birth, PAYLOADS_ALIAS_BIRTH_REQUIREMENT), Some(Verdict::Pass));
}

#[test]
fn duplicate_alias_in_nbirth_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    let birth = edge.birth(
        &mut monitor,
        0,
        vec![long("A", Some(1), 0), long("B", Some(1), 0)],
    );
    assert_eq!(finding(&birth, PAYLOADS_ALIAS_UNIQUENESS), Some(Verdict::Fail));
}

#[test]
fn device_alias_colliding_with_node_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![long("A", Some(1), 0)]);

    let dbirth = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DBirth, "D1"),
        encode(Some(1), vec![long("P", Some(1), 0)]),
    );
    assert_eq!(finding(&dbirth, PAYLOADS_ALIAS_UNIQUENESS), Some(Verdict::Fail));
}

#[test]
fn data_addressed_by_alias_resolves() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![long("A", Some(7), 0)]);

    let ok = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NData),
        encode(Some(1), vec![by_alias(7, 1)]),
    );
    assert_eq!(finding(&ok, PAYLOADS_ALIAS_DATA_CMD_REQUIREMENT), Some(Verdict::Pass));
    assert_eq!(finding(&ok, TOPICS_NBIRTH_METRIC_REQS), Some(Verdict::Pass));

    let named = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NData),
        encode(Some(2), vec![long("A", Some(7), 2)]),
    );
    assert_eq!(finding(&named, PAYLOADS_ALIAS_DATA_CMD_REQUIREMENT), Some(Verdict::Fail));

    let unknown = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NData),
        encode(Some(3), vec![by_alias(8, 3)]),
    );
    assert_eq!(finding(&unknown, TOPICS_NBIRTH_METRIC_REQS), Some(Verdict::Fail));
}
