//! Edge node session establishment through the engine.

mod support;

use support::{params, Edge, Harness};
use tck_core::requirements::{
    MESSAGE_FLOW_DEVICE_DCMD_SUBSCRIBE, MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_PHID_WAIT,
    MESSAGE_FLOW_EDGE_NODE_NCMD_SUBSCRIBE, PAYLOADS_DBIRTH_ORDER,
    PRINCIPLES_BIRTH_CERTIFICATES_ORDER,
};
use tck_core::topic::MessageKind;
use tck_core::Verdict;

async fn start(h: &Harness, devices: &[&str]) {
    let mut values = vec!["H1", "G1", "E1"];
    values.extend_from_slice(devices);
    let name = h
        .handle
        .start_scenario("edge", "SessionEstablishmentTest", params(&values))
        .await
        .unwrap();
    assert_eq!(name, "edge SessionEstablishmentTest");
}

#[tokio::test(start_paused = true)]
async fn well_behaved_edge_node_passes() {
    let mut h = Harness::start();
    let edge = Edge::new("edge-1", "G1", "E1");
    h.host_online("host-1", "H1");
    start(&h, &["D1", "D2"]).await;

    edge.connect(&h);
    h.subscribe("edge-1", &["spBv1.0/G1/NCMD/E1", "spBv1.0/G1/DCMD/E1/#"]);
    edge.birth(&h);
    edge.device_birth(&h, "D1", 1);
    edge.device_birth(&h, "D2", 2);
    h.sync().await;

    let record = h.results.try_recv().unwrap();
    assert_eq!(record.scenario, "edge SessionEstablishmentTest");
    assert!(!record.incomplete, "{}", record.to_report());
    for id in [
        PRINCIPLES_BIRTH_CERTIFICATES_ORDER,
        MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_PHID_WAIT,
        MESSAGE_FLOW_EDGE_NODE_NCMD_SUBSCRIBE,
        MESSAGE_FLOW_DEVICE_DCMD_SUBSCRIBE,
        PAYLOADS_DBIRTH_ORDER,
    ] {
        assert_eq!(record.verdicts.get(id), Some(Verdict::Pass), "{id}");
    }
}

#[tokio::test(start_paused = true)]
async fn birth_before_host_and_subscriptions() {
    let mut h = Harness::start();
    let edge = Edge::new("edge-1", "G1", "E1");
    start(&h, &[]).await;

    edge.connect(&h);
    edge.birth(&h);
    h.sync().await;

    let record = h.results.try_recv().unwrap();
    assert_eq!(record.overall, Verdict::Fail);
    assert_eq!(
        record.verdicts.get(MESSAGE_FLOW_EDGE_NODE_BIRTH_PUBLISH_PHID_WAIT),
        Some(Verdict::Fail)
    );
    assert_eq!(
        record.verdicts.get(MESSAGE_FLOW_EDGE_NODE_NCMD_SUBSCRIBE),
        Some(Verdict::Fail)
    );
    assert_eq!(record.verdicts.get(PAYLOADS_DBIRTH_ORDER), None);
}

#[tokio::test(start_paused = true)]
async fn device_data_before_device_birth() {
    let mut h = Harness::start();
    let edge = Edge::new("edge-1", "G1", "E1");
    h.host_online("host-1", "H1");
    start(&h, &["D1"]).await;

    edge.connect(&h);
    h.subscribe("edge-1", &["spBv1.0/G1/NCMD/E1", "spBv1.0/G1/DCMD/E1/D1"]);
    edge.birth(&h);
    edge.send(
        &h,
        &edge.device_topic(MessageKind::DData, "D1"),
        support::encode(Some(1), vec![support::long("Pressure", 2)]),
    );
    h.sync().await;
    assert!(h.results.try_recv().is_err());

    let record = h.handle.end_scenario().await.unwrap().unwrap();
    assert_eq!(record.verdicts.get(PAYLOADS_DBIRTH_ORDER), Some(Verdict::Fail));
}
