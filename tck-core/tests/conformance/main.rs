//! Conformance Harness: Invariant Monitor
//!
//! Drives `Monitor` with scripted protocol events and asserts the verdicts
//! written per event and in the accumulated map.
//!
//! Invariant coverage:
//! - Sequence continuity per edge node, including the 255 → 0 wrap
//! - bdSeq correlation between the NDEATH will, NBIRTH and NDEATH
//! - Alias uniqueness across an edge node and its devices
//! - Birth-before-data ordering for nodes and devices
//! - Host application identity and STATE semantics
//! - Template definitions and instances

mod support;

mod alias_uniqueness;
mod bdseq_correlation;
mod birth_ordering;
mod host_identity;
mod sequence_continuity;
mod templates;
