use tck_core::requirements::*;
use tck_core::{DisconnectEvent, Monitor, Verdict};

use crate::support::*;

#[test]
fn single_connection_cycles_online_and_offline() {
    let mut monitor = Monitor::default();
    let will = connect_host(&mut monitor, "host-client", "H1", 0);
    assert_eq!(finding(&will, PAYLOADS_STATE_WILL_MESSAGE_RETAIN), Some(Verdict::Pass));
    assert_eq!(finding(&will, HOST_TOPIC_PHID_DEATH_PAYLOAD), Some(Verdict::Pass));

    let online = publish_state(&mut monitor, "host-client", "H1", true, 0, NOW);
    assert_eq!(
        finding(&online, OPERATIONAL_BEHAVIOR_HOST_APPLICATION_HOST_ID),
        Some(Verdict::Pass)
    );
    assert_eq!(finding(&online, PAYLOADS_STATE_BIRTH_PAYLOAD_BDSEQ), Some(Verdict::Pass));
    assert!(monitor.registry().is_host_online("H1"));

    let offline = publish_state(&mut monitor, "host-client", "H1", false, 0, NOW + 1);
    assert_eq!(finding(&offline, HOST_TOPIC_PHID_DEATH_PAYLOAD_BDSEQ), Some(Verdict::Pass));
    assert!(!monitor.registry().is_host_online("H1"));

    let again = publish_state(&mut monitor, "host-client", "H1", true, 0, NOW + 2);
    assert_eq!(
        finding(&again, OPERATIONAL_BEHAVIOR_HOST_APPLICATION_HOST_ID),
        Some(Verdict::Pass)
    );
    assert_eq!(
        recorded(&monitor, OPERATIONAL_BEHAVIOR_HOST_APPLICATION_HOST_ID),
        Some(Verdict::Pass)
    );
}

#[test]
fn second_connection_claiming_online_host_fails() {
    let mut monitor = Monitor::default();
    connect_host(&mut monitor, "first", "H1", 0);
    publish_state(&mut monitor, "first", "H1", true, 0, NOW);

    let second = connect_host(&mut monitor, "second", "H1", 1);
    assert_eq!(
        finding(&second, PAYLOADS_STATE_WILL_MESSAGE_PAYLOAD_BDSEQ),
        Some(Verdict::Pass)
    );
    let rival = publish_state(&mut monitor, "second", "H1", true, 1, NOW + 1);
    assert_eq!(
        finding(&rival, OPERATIONAL_BEHAVIOR_HOST_APPLICATION_HOST_ID),
        Some(Verdict::Fail)
    );
    assert_eq!(
        monitor.registry().host("H1").and_then(|h| h.owner.clone()).as_deref(),
        Some("second")
    );
}

#[test]
fn offline_older_than_online_fails() {
    let mut monitor = Monitor::default();
    connect_host(&mut monitor, "host-client", "H1", 0);
    publish_state(&mut monitor, "host-client", "H1", true, 0, NOW);
    let offline = publish_state(&mut monitor, "host-client", "H1", false, 0, NOW - 10);
    assert_eq!(finding(&offline, HOST_TOPIC_PHID_DEATH_PAYLOAD), Some(Verdict::Fail));
}

#[test]
fn online_bdseq_must_match_will() {
    let mut monitor = Monitor::default();
    connect_host(&mut monitor, "host-client", "H1", 4);
    let online = publish_state(&mut monitor, "host-client", "H1", true, 5, NOW);
    assert_eq!(finding(&online, PAYLOADS_STATE_BIRTH_PAYLOAD_BDSEQ), Some(Verdict::Fail));
}

#[test]
fn connection_loss_takes_host_offline() {
    let mut monitor = Monitor::default();
    connect_host(&mut monitor, "host-client", "H1", 0);
    publish_state(&mut monitor, "host-client", "H1", true, 0, NOW);

    let eviction = monitor.on_disconnect(&DisconnectEvent {
        client_id: "host-client".into(),
        reason: Some("keepalive timeout".into()),
    });
    assert_eq!(eviction.hosts_offline, vec!["H1".to_owned()]);
    assert!(!monitor.registry().is_host_online("H1"));
}
