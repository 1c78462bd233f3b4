//! Metric-level rules: shape of birth metrics, alias uniqueness, name/alias
//! usage in data and commands, chronological order, DataSets and templates.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::rules::{birth_metrics_requirement, chronology_requirement};
use super::Eval;
use crate::constants::{BD_SEQ_METRIC, REBIRTH_METRIC};
use crate::payload::{DataSet, Metric};
use crate::requirements::*;
use crate::topic::MessageKind;

/// Shape of every metric in an NBIRTH/DBIRTH.
pub(super) fn check_birth_metrics(eval: &mut Eval<'_>, kind: MessageKind, metrics: &[Metric]) {
    let shape_req = birth_metrics_requirement(kind);
    let aliases_in_use = metrics.iter().any(|m| m.alias.is_some());

    for (index, m) in metrics.iter().enumerate() {
        let label = || m.name.clone().unwrap_or_else(|| format!("#{index}"));

        eval.check(PAYLOADS_NAME_REQUIREMENT, m.name.is_some(), || {
            format!("{kind} metric {} has no name", label())
        });

        let reserved = matches!(m.name.as_deref(), Some(BD_SEQ_METRIC | REBIRTH_METRIC));
        if aliases_in_use && !reserved {
            eval.check(
                PAYLOADS_ALIAS_BIRTH_REQUIREMENT,
                m.name.is_some() && m.alias.is_some(),
                || format!("{kind} metric {} lacks a name or alias", label()),
            );
        }

        match m.datatype {
            None => {
                eval.check(PAYLOADS_METRIC_DATATYPE_REQ, false, || {
                    format!("{kind} metric {} has no datatype", label())
                });
            }
            Some(code) => {
                eval.check(PAYLOADS_METRIC_DATATYPE_REQ, true, String::new);
                eval.check(
                    PAYLOADS_METRIC_DATATYPE_VALUE,
                    m.data_type().is_some(),
                    || format!("{kind} metric {} has invalid datatype {code}", label()),
                );
            }
        }

        let has_value = m.value.is_some() || m.is_null == Some(true);
        eval.check(
            shape_req,
            m.name.is_some() && m.datatype.is_some() && has_value,
            || format!("{kind} metric {} is missing name, datatype or value", label()),
        );

        eval.check(PAYLOADS_NAME_BIRTH_DATA_REQUIREMENT, m.timestamp.is_some(), || {
            format!("{kind} metric {} has no timestamp", label())
        });

        if let Some(ds) = m.dataset() {
            check_dataset(eval, ds);
        }
    }
}

/// Aliases declared in a birth must be unique within the message and must
/// not collide with aliases already `taken` by the rest of the edge node.
pub(super) fn check_alias_uniqueness(
    eval: &mut Eval<'_>,
    kind: MessageKind,
    metrics: &[Metric],
    taken: impl Fn(u64) -> bool,
) {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut any = false;
    for alias in metrics.iter().filter_map(|m| m.alias) {
        any = true;
        if !seen.insert(alias) || taken(alias) {
            duplicates.push(alias);
        }
    }
    if any {
        eval.check(PAYLOADS_ALIAS_UNIQUENESS, duplicates.is_empty(), || {
            format!("{kind} reuses aliases {duplicates:?}")
        });
    }
}

/// Name/alias usage of one metric in a data or command message.
///
/// With aliases in use, a metric must carry only its alias; without, it
/// must carry its name.
pub(super) fn check_metric_addressing(
    eval: &mut Eval<'_>,
    kind: MessageKind,
    m: &Metric,
    aliases_in_use: bool,
) {
    if aliases_in_use {
        eval.check(
            PAYLOADS_ALIAS_DATA_CMD_REQUIREMENT,
            m.alias.is_some() && m.name.is_none(),
            || {
                format!(
                    "{kind} metric {:?}/{:?} must carry only an alias",
                    m.name, m.alias
                )
            },
        );
    } else {
        eval.check(PAYLOADS_NAME_REQUIREMENT, m.name.is_some(), || {
            format!("{kind} metric without name (alias {:?})", m.alias)
        });
    }
}

/// Non-historical metrics must appear in non-decreasing timestamp order.
pub(super) fn check_chronology(eval: &mut Eval<'_>, kind: MessageKind, metrics: &[Metric]) {
    let stamps: Vec<u64> = metrics
        .iter()
        .filter(|m| m.is_current())
        .filter_map(|m| m.timestamp)
        .collect();
    if stamps.len() < 2 {
        return;
    }
    let ordered = stamps.windows(2).all(|w| w[0] <= w[1]);
    eval.check(chronology_requirement(kind), ordered, || {
        format!("{kind} metric timestamps out of order: {stamps:?}")
    });
}

pub(super) fn check_dataset(eval: &mut Eval<'_>, ds: &DataSet) {
    let columns = ds.columns.len() as u64;
    eval.check(
        PAYLOADS_DATASET_COLUMN_SIZE,
        ds.num_of_columns == Some(columns),
        || {
            format!(
                "num_of_columns {:?} but {} column names",
                ds.num_of_columns, columns
            )
        },
    );
    eval.check(
        PAYLOADS_DATASET_TYPES_NUM,
        ds.types.len() == ds.columns.len(),
        || format!("{} types for {} columns", ds.types.len(), ds.columns.len()),
    );
}

/// Template definitions and instances.
///
/// Definitions are only legal in NBIRTH, where they are collected into
/// `definitions` (name → member names). Instances are checked against the
/// definitions known for the edge node, including ones declared earlier in
/// the same message.
pub(super) fn check_templates(
    eval: &mut Eval<'_>,
    kind: MessageKind,
    metrics: &[Metric],
    definitions: &mut HashMap<String, BTreeSet<String>>,
) {
    for m in metrics {
        let Some(template) = m.template() else {
            continue;
        };
        if template.is_definition != Some(true) {
            continue;
        }
        let name = m.name.clone().unwrap_or_default();
        let in_nbirth = kind == MessageKind::NBirth;
        eval.check(PAYLOADS_TEMPLATE_DEFINITION_NBIRTH_ONLY, in_nbirth, || {
            format!("template definition {name} published in {kind}")
        });
        eval.check(
            PAYLOADS_TEMPLATE_DEFINITION_REF,
            template.template_ref.is_none(),
            || format!("template definition {name} carries template_ref"),
        );
        if in_nbirth {
            definitions.insert(name, member_names(&template.metrics));
        }
    }

    for m in metrics {
        let Some(template) = m.template() else {
            continue;
        };
        if template.is_definition == Some(true) {
            continue;
        }
        let label = m.name.clone().unwrap_or_else(|| format!("alias {:?}", m.alias));
        let Some(reference) = &template.template_ref else {
            eval.check(PAYLOADS_TEMPLATE_INSTANCE_REF, false, || {
                format!("template instance {label} has no template_ref")
            });
            continue;
        };
        eval.check(PAYLOADS_TEMPLATE_INSTANCE_REF, true, String::new);

        let Some(definition) = definitions.get(reference) else {
            eval.check(PAYLOADS_TEMPLATE_REF_INSTANCE, false, || {
                format!("template instance {label} references unknown definition {reference}")
            });
            continue;
        };
        eval.check(PAYLOADS_TEMPLATE_REF_INSTANCE, true, String::new);

        let members = member_names(&template.metrics);
        let extra: Vec<&String> = members.difference(definition).collect();
        eval.check(PAYLOADS_TEMPLATE_INSTANCE_MEMBERS, extra.is_empty(), || {
            format!("template instance {label} has undefined members {extra:?}")
        });

        if kind.is_birth() {
            let missing: Vec<&String> = definition.difference(&members).collect();
            eval.check(
                PAYLOADS_TEMPLATE_INSTANCE_MEMBERS_BIRTH,
                missing.is_empty(),
                || format!("template instance {label} in {kind} is missing {missing:?}"),
            );
        } else {
            eval.check(PAYLOADS_TEMPLATE_INSTANCE_MEMBERS_DATA, extra.is_empty(), || {
                format!("template instance {label} in {kind} is not a subset of {reference}")
            });
        }
    }
}

fn member_names(metrics: &[Metric]) -> BTreeSet<String> {
    metrics.iter().filter_map(|m| m.name.clone()).collect()
}
