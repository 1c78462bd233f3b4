use tck_core::payload::{metric::Value, DataType, Metric, Template};
use tck_core::requirements::*;
use tck_core::topic::MessageKind;
use tck_core::{Monitor, Verdict};

use crate::support::*;

fn template_metric(name: &str, template: Template) -> Metric {
    Metric {
        name: Some(name.into()),
        timestamp: Some(NOW),
        datatype: Some(DataType::Template.code()),
        value: Some(Value::TemplateValue(template)),
        ..Default::default()
    }
}

fn definition(members: &[&str]) -> Template {
    Template {
        metrics: members.iter().map(|m| long(m, None, 0)).collect(),
        is_definition: Some(true),
        ..Default::default()
    }
}

fn instance(reference: &str, members: &[&str]) -> Template {
    Template {
        metrics: members.iter().map(|m| long(m, None, 0)).collect(),
        template_ref: Some(reference.into()),
        is_definition: Some(false),
        ..Default::default()
    }
}

#[test]
fn instance_matching_definition_passes() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    let birth = edge.birth(
        &mut monitor,
        0,
        vec![
            template_metric("Motor", definition(&["rpm", "amps"])),
            template_metric("Motor1", instance("Motor", &["rpm", "amps"])),
        ],
    );
    assert_eq!(finding(&birth, PAYLOADS_TEMPLATE_DEFINITION_NBIRTH_ONLY), Some(Verdict::Pass));
    assert_eq!(finding(&birth, PAYLOADS_TEMPLATE_REF_INSTANCE), Some(Verdict::Pass));
    assert_eq!(finding(&birth, PAYLOADS_TEMPLATE_INSTANCE_MEMBERS_BIRTH), Some(Verdict::Pass));
}

#[test]
fn instance_with_undefined_member_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    let birth = edge.birth(
        &mut monitor,
        0,
        vec![
            template_metric("Motor", definition(&["rpm"])),
            template_metric("Motor1", instance("Motor", &["rpm", "torque"])),
        ],
    );
    assert_eq!(finding(&birth, PAYLOADS_TEMPLATE_INSTANCE_MEMBERS), Some(Verdict::Fail));
}

#[test]
fn instance_of_unknown_definition_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    let birth = edge.birth(
        &mut monitor,
        0,
        vec![template_metric("Pump1", instance("Pump", &["flow"]))],
    );
    assert_eq!(finding(&birth, PAYLOADS_TEMPLATE_REF_INSTANCE), Some(Verdict::Fail));
}

#[test]
fn definition_outside_nbirth_fails() {
    let mut monitor = Monitor::default();
    let edge = Edge::new("edge-client", "G1", "E1");
    edge.connect(&mut monitor, 0);
    edge.birth(&mut monitor, 0, vec![]);
    let dbirth = edge.publish(
        &mut monitor,
        &edge.device_topic(MessageKind::DBirth, "D1"),
        encode(Some(1), vec![template_metric("Motor", definition(&["rpm"]))]),
    );
    assert_eq!(finding(&dbirth, PAYLOADS_TEMPLATE_DEFINITION_NBIRTH_ONLY), Some(Verdict::Fail));
}
