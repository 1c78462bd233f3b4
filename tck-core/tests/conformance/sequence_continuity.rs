use tck_core::requirements::*;
use tck_core::topic::MessageKind;
use tck_core::{Monitor, Verdict};

use crate::support::*;

fn born() -> (Monitor, Edge) {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![long("Temperature", None, 20)]);
    (monitor, edge)
}

#[test]
fn consecutive_data_passes() {
    let (mut monitor, edge) = born();
    let topic = edge.topic(MessageKind::NData);
    for seq in 1..=3 {
        let findings = edge.publish(
            &mut monitor,
            &topic,
            encode(Some(seq), vec![long("Temperature", None, 20 + seq)]),
        );
        assert_eq!(finding(&findings, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));
    }
    assert_eq!(recorded(&monitor, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));
}

#[test]
fn gap_fails_on_the_offending_message() {
    let (mut monitor, edge) = born();
    let topic = edge.topic(MessageKind::NData);

    let first = edge.publish(&mut monitor, &topic, encode(Some(1), vec![long("Temperature", None, 21)]));
    assert_eq!(finding(&first, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));

    let skipped = edge.publish(&mut monitor, &topic, encode(Some(3), vec![long("Temperature", None, 22)]));
    assert_eq!(finding(&skipped, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Fail));
    assert_eq!(finding(&skipped, PAYLOADS_SEQUENCE_NUM_INCREMENTING), Some(Verdict::Fail));

    // Tracking resumes from the received value.
    let next = edge.publish(&mut monitor, &topic, encode(Some(4), vec![long("Temperature", None, 23)]));
    assert_eq!(finding(&next, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));
    assert_eq!(recorded(&monitor, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Fail));
}

#[test]
fn seq_wraps_from_255_to_zero() {
    let (mut monitor, edge) = born();
    let topic = edge.topic(MessageKind::NData);
    for seq in 1..=255u64 {
        edge.publish(&mut monitor, &topic, encode(Some(seq), vec![long("Temperature", None, seq)]));
    }
    let wrapped = edge.publish(&mut monitor, &topic, encode(Some(0), vec![long("Temperature", None, 1000)]));
    assert_eq!(finding(&wrapped, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));
    assert_eq!(recorded(&monitor, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));
}

#[test]
fn nbirth_seq_must_be_zero() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    let findings = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NBirth),
        encode(
            Some(5),
            vec![
                long(tck_core::constants::BD_SEQ_METRIC, None, 0),
                tck_core::payload::Metric::boolean(tck_core::constants::REBIRTH_METRIC, false, NOW),
            ],
        ),
    );
    assert_eq!(finding(&findings, PAYLOADS_SEQUENCE_NUM_ZERO_NBIRTH), Some(Verdict::Fail));
}

#[test]
fn device_messages_share_the_node_counter() {
    let (mut monitor, edge) = born();
    let dbirth = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DBirth, "D1"),
        encode(Some(1), vec![long("Pressure", None, 7)]),
    );
    assert_eq!(finding(&dbirth, PAYLOADS_DBIRTH_SEQ_INC), Some(Verdict::Pass));

    let ndata = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NData),
        encode(Some(2), vec![long("Temperature", None, 25)]),
    );
    assert_eq!(finding(&ndata, PAYLOADS_NDATA_SEQ_INC), Some(Verdict::Pass));

    let ddata = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DData, "D1"),
        encode(Some(2), vec![long("Pressure", None, 8)]),
    );
    assert_eq!(finding(&ddata, PAYLOADS_DDATA_SEQ_INC), Some(Verdict::Fail));
}

#[test]
fn commands_must_not_carry_seq() {
    let (mut monitor, edge) = born();
    let findings = edge.publish(
        &mut monitor,
        &edge.topic(MessageKind::NCmd),
        encode(Some(9), vec![long("Temperature", None, 1)]),
    );
    assert_eq!(finding(&findings, PAYLOADS_NCMD_SEQ), Some(Verdict::Fail));
}
