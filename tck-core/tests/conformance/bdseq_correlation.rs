use tck_core::constants::BD_SEQ_METRIC;
use tck_core::requirements::*;
use tck_core::topic::{EdgeNodeKey, MessageKind};
use tck_core::{Monitor, Verdict};

use crate::support::*;

#[test]
fn nbirth_matches_will_bdseq() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    let connect = edge.connect(&mut monitor, 3);
    assert_eq!(finding(&connect, PAYLOADS_NDEATH_WILL_MESSAGE_QOS), Some(Verdict::Pass));

    let birth = edge.birth(&mut monitor, 3, vec![]);
    assert_eq!(finding(&birth, TOPICS_NBIRTH_BDSEQ_MATCHING), Some(Verdict::Pass));
    assert_eq!(finding(&birth, PAYLOADS_NBIRTH_BDSEQ), Some(Verdict::Pass));
}

#[test]
fn nbirth_with_other_bdseq_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 3);
    let birth = edge.birth(&mut monitor, 4, vec![]);
    assert_eq!(finding(&birth, TOPICS_NBIRTH_BDSEQ_MATCHING), Some(Verdict::Fail));
}

#[test]
fn nbirth_without_certificate_skips_matching() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    let birth = edge.birth(&mut monitor, 9, vec![]);
    assert_eq!(finding(&birth, TOPICS_NBIRTH_BDSEQ_MATCHING), None);
    assert!(monitor.registry().edge(&EdgeNodeKey::new("G1", "E1")).is_some());
}

#[test]
fn reconnect_must_increment_bdseq() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 255);
    edge.birth(&mut monitor, 255, vec![]);
    edge.disconnect(&mut monitor);

    let wrapped = edge.connect(&mut monitor, 0);
    assert_eq!(finding(&wrapped, TOPICS_NBIRTH_BDSEQ_INCREMENT), Some(Verdict::Pass));
    edge.disconnect(&mut monitor);

    let skipped = edge.connect(&mut monitor, 2);
    assert_eq!(finding(&skipped, TOPICS_NBIRTH_BDSEQ_INCREMENT), Some(Verdict::Fail));
}

#[test]
fn ndeath_with_matching_bdseq_evicts() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 1);
    edge.birth(&mut monitor, 1, vec![]);

    let death = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NDeath),
        encode(None, vec![long(BD_SEQ_METRIC, None, 1)]),
    );
    assert_eq!(finding(&death, PAYLOADS_NDEATH_BDSEQ), Some(Verdict::Pass));
    assert_eq!(monitor.registry().edge_count(), 0);
}

#[test]
fn stale_ndeath_does_not_evict() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 1);
    edge.birth(&mut monitor, 1, vec![]);

    let death = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NDeath),
        encode(None, vec![long(BD_SEQ_METRIC, None, 0)]),
    );
    assert_eq!(finding(&death, PAYLOADS_NDEATH_BDSEQ), Some(Verdict::Fail));
    assert_eq!(monitor.registry().edge_count(), 1);
}

#[test]
fn ndeath_from_replaced_connection_is_ignored() {
    let mut monitor = Monitor::default();
    let first = Edge::new("edge-client-1", "G1", "E1");
    let second = Edge::new("edge-client-2", "G1", "E1");
    first.connect(&mut monitor, 0);
    first.birth(&mut monitor, 0, vec![]);
    first.disconnect(&mut monitor);
    second.connect(&mut monitor, 1);
    second.birth(&mut monitor, 1, vec![]);

    // The broker delivers the first connection's will late.
    let death = first.publish(
        &mut monitor,
        &first.topic(MessageKind::NDeath),
        encode(None, vec![long(BD_SEQ_METRIC, None, 0)]),
    );
    assert_eq!(finding(&death, PAYLOADS_NDEATH_BDSEQ), None);
    assert_eq!(recorded(&monitor, PAYLOADS_NDEATH_BDSEQ), None);
    let live = monitor.registry().edge(&EdgeNodeKey::new("G1", "E1")).unwrap();
    assert_eq!(live.owner, "edge-client-2");
    assert_eq!(live.bd_seq, Some(1));
}

#[test]
fn connection_loss_evicts_owned_sessions() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![]);
    edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DBirth, "D1"),
        encode(Some(1), vec![long("Pressure", None, 1)]),
    );
    assert_eq!(monitor.registry().device_count(), 1);

    edge.disconnect(&mut monitor);
    assert_eq!(monitor.registry().edge_count(), 0);
    assert_eq!(monitor.registry().device_count(), 0);
    assert_eq!(monitor.registry().last_edge_bd_seq(&EdgeNodeKey::new("G1", "E1")), Some(0));
}
