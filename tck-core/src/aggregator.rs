//! Results Aggregator: reduce a verdict map to an overall verdict.
//!
//! # Contract
//!
//! - empty map → NOT_EXECUTED;
//! - any FAIL → FAIL;
//! - otherwise any PASS → PASS;
//! - otherwise any MAYBE → MAYBE, else NOT_EXECUTED;
//! - `incomplete` is set when a requirement outside the `monitor:`
//!   namespace is still NOT_EXECUTED. It qualifies the overall verdict and
//!   never turns it into FAIL.
//!
//! Pure: no IO, no clocks.

use crate::constants::{INCOMPLETE, MONITOR_PREFIX};
use crate::verdict::{Verdict, VerdictMap};

/// Outcome of a finished scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub scenario: String,
    pub overall: Verdict,
    pub incomplete: bool,
    pub verdicts: VerdictMap,
}

impl ResultRecord {
    /// Overall verdict as reported, e.g. `PASS` or `PASS INCOMPLETE`.
    pub fn overall_label(&self) -> String {
        if self.incomplete {
            format!("{} {INCOMPLETE}", self.overall)
        } else {
            self.overall.to_string()
        }
    }

    /// Text report: one `<id>: <verdict>[ <detail>];` line per requirement
    /// followed by `OVERALL: <verdict>;`.
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        for (id, entry) in self.verdicts.iter() {
            out.push_str(id);
            out.push_str(": ");
            out.push_str(entry.verdict.as_str());
            if let Some(detail) = &entry.detail {
                out.push(' ');
                out.push_str(detail);
            }
            out.push_str(";\n");
        }
        out.push_str("OVERALL: ");
        out.push_str(&self.overall_label());
        out.push(';');
        out
    }
}

/// Overall verdict of `verdicts`.
pub fn overall(verdicts: &VerdictMap) -> Verdict {
    let mut has_pass = false;
    let mut has_maybe = false;
    for (_, entry) in verdicts.iter() {
        match entry.verdict {
            Verdict::Fail => return Verdict::Fail,
            Verdict::Pass => has_pass = true,
            Verdict::Maybe => has_maybe = true,
            Verdict::NotExecuted => {}
        }
    }
    if has_pass {
        Verdict::Pass
    } else if has_maybe {
        Verdict::Maybe
    } else {
        Verdict::NotExecuted
    }
}

/// `true` if a scenario requirement (not a `monitor:` one) was never
/// evaluated.
pub fn is_incomplete(verdicts: &VerdictMap) -> bool {
    verdicts
        .iter()
        .any(|(id, e)| !id.starts_with(MONITOR_PREFIX) && e.verdict == Verdict::NotExecuted)
}

pub fn aggregate(scenario: &str, verdicts: VerdictMap) -> ResultRecord {
    ResultRecord {
        scenario: scenario.to_owned(),
        overall: overall(&verdicts),
        incomplete: is_incomplete(&verdicts),
        verdicts,
    }
}
