//! Protocol constants: Sparkplug B namespace, reserved metric names,
//! control topics and the verdict spellings used in result reports.
//!
//! Values here are wire-visible. Host applications and edge nodes under
//! test see the namespace and metric names; the result payload format is
//! consumed by the console that drives the TCK.

/// Sparkplug B topic namespace (first topic level).
pub const NAMESPACE: &str = "spBv1.0";

/// First topic level of a host application STATE topic (`STATE/<host_id>`).
pub const STATE_TOPIC_LEVEL: &str = "STATE";

/// Name of the birth/death sequence metric carried in NDEATH and NBIRTH.
pub const BD_SEQ_METRIC: &str = "bdSeq";

/// Name of the rebirth request metric every NBIRTH must declare.
pub const REBIRTH_METRIC: &str = "Node Control/Rebirth";

/// Sequence numbers wrap after this value.
pub const MAX_SEQ: u8 = 255;

/// Prefix shared by every control topic.
pub const CONTROL_TOPIC_PREFIX: &str = "SPARKPLUG_TCK/";

/// Control topic carrying `NEW_TEST` / `END_TEST` commands.
pub const TEST_CONTROL_TOPIC: &str = "SPARKPLUG_TCK/TEST_CONTROL";

/// Control topic carrying runtime configuration (`UTCwindow <ms>`).
pub const CONFIG_TOPIC: &str = "SPARKPLUG_TCK/CONFIG";

/// Control topic the result report is published on.
pub const RESULT_TOPIC: &str = "SPARKPLUG_TCK/RESULT";

/// Control topic for free-form log lines.
pub const LOG_TOPIC: &str = "SPARKPLUG_TCK/LOG";

/// Default tolerated skew between a payload timestamp and the engine clock.
pub const DEFAULT_UTC_WINDOW_MS: u64 = 60_000;

/// Key prefix applied to monitor verdicts when merged with a scenario's.
pub const MONITOR_PREFIX: &str = "monitor:";

/// Result report spelling for each verdict.
pub const PASS: &str = "PASS";
pub const FAIL: &str = "FAIL";
pub const MAYBE: &str = "MAYBE";
pub const NOT_EXECUTED: &str = "NOT EXECUTED";

/// Qualifier appended to the overall verdict when scenario requirements
/// were left unevaluated.
pub const INCOMPLETE: &str = "INCOMPLETE";
