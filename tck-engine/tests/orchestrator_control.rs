//! Orchestrator control flow: control topics, scenario replacement,
//! rejected scenarios, verdict merging.

mod support;

use support::{params, Edge, Harness};
use tck_core::constants::{CONFIG_TOPIC, LOG_TOPIC, MONITOR_PREFIX, RESULT_TOPIC};
use tck_core::requirements::{
    MESSAGE_FLOW_PHID_SPARKPLUG_SUBSCRIPTION, PAYLOADS_STATE_SUBSCRIBE,
};
use tck_core::{Qos, Verdict};
use tck_engine::EngineConfig;

#[tokio::test(start_paused = true)]
async fn new_test_and_end_test_over_control_topic() {
    let mut h = Harness::start();
    h.control("NEW_TEST host SessionEstablishmentTest H1");
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.scenario.as_deref(), Some("host SessionEstablishmentTest"));

    h.control("END_TEST");
    h.sync().await;

    let record = h.results.try_recv().unwrap();
    assert_eq!(record.overall, Verdict::NotExecuted);
    assert!(record.incomplete);
    assert_eq!(record.overall_label(), "NOT EXECUTED INCOMPLETE");
    assert!(record
        .verdicts
        .iter()
        .all(|(_, e)| e.verdict == Verdict::NotExecuted));

    let reports: Vec<_> = h
        .drain_outbound()
        .into_iter()
        .filter(|m| m.topic == RESULT_TOPIC)
        .collect();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].qos, Qos::AtLeastOnce);
    let text = String::from_utf8(reports[0].payload.clone()).unwrap();
    assert!(text.ends_with("OVERALL: NOT EXECUTED INCOMPLETE;"));
    assert_eq!(h.handle.snapshot().await.unwrap().scenario, None);
}

#[tokio::test(start_paused = true)]
async fn host_session_merges_monitor_verdicts() {
    let mut h = Harness::start();
    h.handle
        .start_scenario("host", "SessionEstablishmentTest", params(&["H1"]))
        .await
        .unwrap();
    h.host_online("host-1", "H1");
    h.sync().await;

    let record = h.results.try_recv().unwrap();
    assert_eq!(record.scenario, "host SessionEstablishmentTest");
    assert_eq!(record.overall, Verdict::Pass);
    assert!(!record.incomplete);
    assert_eq!(
        record.verdicts.get(MESSAGE_FLOW_PHID_SPARKPLUG_SUBSCRIPTION),
        Some(Verdict::Pass)
    );
    assert!(record
        .verdicts
        .iter()
        .any(|(id, _)| id.starts_with(MONITOR_PREFIX)));
    // The scenario ended itself.
    assert_eq!(h.handle.snapshot().await.unwrap().scenario, None);
}

#[tokio::test(start_paused = true)]
async fn publish_before_subscribe_is_recorded_not_fatal() {
    let mut h = Harness::start();
    h.handle
        .start_scenario("host", "SessionEstablishmentTest", params(&["H1"]))
        .await
        .unwrap();
    h.connect_host("host-1", "H1");
    h.publish_state("host-1", "H1", true);
    h.sync().await;

    let record = h.results.try_recv().unwrap();
    assert_eq!(record.overall, Verdict::Fail);
    assert_eq!(record.verdicts.get(PAYLOADS_STATE_SUBSCRIBE), Some(Verdict::Fail));

    // The engine keeps running.
    h.control("NEW_TEST host SessionEstablishmentTest H2");
    assert!(h.handle.snapshot().await.unwrap().scenario.is_some());
}

#[tokio::test(start_paused = true)]
async fn rejected_scenario_leaves_engine_usable() {
    let mut h = Harness::start();
    h.control("NEW_TEST host MessageOrderingTest H1 G1 E1");
    h.sync().await;
    assert_eq!(h.handle.snapshot().await.unwrap().scenario, None);
    assert!(h.results.try_recv().is_err());

    let logs: Vec<String> = h
        .drain_outbound()
        .into_iter()
        .filter(|m| m.topic == LOG_TOPIC)
        .map(|m| String::from_utf8_lossy(&m.payload).into_owned())
        .collect();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].contains("rejected"), "{}", logs[0]);

    h.control("NEW_TEST edge SessionEstablishmentTest H1 G1 E1");
    assert_eq!(
        h.handle.snapshot().await.unwrap().scenario.as_deref(),
        Some("edge SessionEstablishmentTest")
    );
}

#[tokio::test(start_paused = true)]
async fn new_test_ends_the_previous_scenario() {
    let mut h = Harness::start();
    h.control("NEW_TEST edge SessionEstablishmentTest H1 G1 E1");
    h.control("NEW_TEST host SessionEstablishmentTest H1");
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.scenario.as_deref(), Some("host SessionEstablishmentTest"));

    let first = h.results.try_recv().unwrap();
    assert_eq!(first.scenario, "edge SessionEstablishmentTest");
    assert!(first.incomplete);
}

#[tokio::test(start_paused = true)]
async fn new_run_resets_monitor_verdicts_but_keeps_sessions() {
    let h = Harness::start();
    let edge = Edge::new("edge-1", "G1", "E1");
    h.host_online("host-1", "H1");
    edge.connect(&h);
    edge.birth(&h);
    let before = h.handle.snapshot().await.unwrap();
    assert!(!before.monitor.is_empty());
    assert_eq!(before.edge_nodes, 1);

    h.control("NEW_TEST host SessionEstablishmentTest H2");
    let after = h.handle.snapshot().await.unwrap();
    assert!(after.monitor.is_empty());
    assert_eq!(after.edge_nodes, 1);

    h.disconnect("edge-1");
    assert_eq!(h.handle.snapshot().await.unwrap().edge_nodes, 0);
}

#[tokio::test(start_paused = true)]
async fn control_traffic_bypasses_the_monitor() {
    let h = Harness::start();
    h.publish("tck", LOG_TOPIC, b"hello from the console".to_vec(), Qos::AtMostOnce, false);
    h.control("NEW_TEST bogus");
    h.publish("tck", CONFIG_TOPIC, b"UTCwindow 5000".to_vec(), Qos::AtMostOnce, false);
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.monitor.is_empty());
    assert_eq!(snapshot.scenario, None);
    assert_eq!(snapshot.utc_window_ms, 5000);
}

#[tokio::test(start_paused = true)]
async fn results_are_not_published_when_disabled() {
    let config = EngineConfig {
        publish_results: false,
        ..EngineConfig::default()
    };
    let mut h = Harness::with_config(config);
    h.control("NEW_TEST host SessionEstablishmentTest H1");
    let record = h.handle.end_scenario().await.unwrap().unwrap();
    assert!(record.incomplete);
    assert!(h.results.try_recv().is_ok());
    assert!(!h.drain_outbound().iter().any(|m| m.topic == RESULT_TOPIC));
}
