//! Verdicts and the requirement-ID → verdict map.
//!
//! Writes follow a severity lattice, `NotExecuted < Pass < Maybe < Fail`:
//! a write stores the more severe of the old and new value. A FAIL can
//! therefore never be cleared by a later PASS in the same run, a MAYBE is
//! not cleared by PASS, and FAIL overrides MAYBE.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants;
use crate::requirements::{strength_of, Strength};

/// Outcome of evaluating one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verdict {
    NotExecuted,
    Pass,
    Maybe,
    Fail,
}

impl Verdict {
    /// Report spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Verdict::NotExecuted => constants::NOT_EXECUTED,
            Verdict::Pass => constants::PASS,
            Verdict::Maybe => constants::MAYBE,
            Verdict::Fail => constants::FAIL,
        }
    }

    /// The more severe of two verdicts.
    pub fn merge(self, other: Verdict) -> Verdict {
        self.max(other)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict plus the first detail recorded at that severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictEntry {
    pub verdict: Verdict,
    pub detail: Option<String>,
}

/// Requirement-ID → verdict, ordered by ID for stable reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictMap {
    entries: BTreeMap<String, VerdictEntry>,
}

impl VerdictMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `verdict` for `id` under the severity lattice.
    ///
    /// Returns the verdict stored after the write. The detail is replaced
    /// only when the write raises the severity, so the first failure's
    /// explanation survives repeated failures.
    pub fn record(&mut self, id: &str, verdict: Verdict, detail: Option<String>) -> Verdict {
        match self.entries.get_mut(id) {
            Some(entry) => {
                if verdict > entry.verdict {
                    entry.verdict = verdict;
                    entry.detail = detail;
                }
                entry.verdict
            }
            None => {
                self.entries
                    .insert(id.to_owned(), VerdictEntry { verdict, detail });
                verdict
            }
        }
    }

    /// Record the outcome of a rule check.
    ///
    /// `ok == true` records PASS. A failure records FAIL for `Must`
    /// requirements and MAYBE for `Should` requirements. Returns the verdict
    /// this particular check produced, not the stored one.
    pub fn check(&mut self, id: &str, ok: bool, detail: impl FnOnce() -> String) -> Verdict {
        let verdict = if ok {
            Verdict::Pass
        } else {
            match strength_of(id) {
                Strength::Must => Verdict::Fail,
                Strength::Should => Verdict::Maybe,
            }
        };
        let detail = if ok { None } else { Some(detail()) };
        self.record(id, verdict, detail);
        verdict
    }

    /// Insert NOT_EXECUTED for `id` unless a verdict already exists.
    pub fn declare(&mut self, id: &str) {
        self.entries.entry(id.to_owned()).or_insert(VerdictEntry {
            verdict: Verdict::NotExecuted,
            detail: None,
        });
    }

    pub fn get(&self, id: &str) -> Option<Verdict> {
        self.entries.get(id).map(|e| e.verdict)
    }

    pub fn entry(&self, id: &str) -> Option<&VerdictEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VerdictEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge every entry of `other` into `self`, prefixing its keys.
    pub fn merge_prefixed(&mut self, prefix: &str, other: &VerdictMap) {
        for (id, entry) in other.iter() {
            self.record(
                &format!("{prefix}{id}"),
                entry.verdict,
                entry.detail.clone(),
            );
        }
    }
}
