//! Typed scenario catalog.
//!
//! Each scenario is registered under `(profile, name)` with the exact
//! parameter shape its factory accepts. Construction checks the shape
//! before the factory runs, so a factory only validates parameter values.

use std::collections::BTreeMap;
use std::fmt;

use tck_core::topic::is_valid_id;

use super::{
    EdgeSessionTest, HostSessionTest, MessageOrderingTest, ScenarioError, ScenarioKind,
};

/// Parameter names a scenario accepts, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    /// Exactly these parameters.
    Exact(&'static [&'static str]),
    /// These parameters followed by any number of extra values.
    AtLeast(&'static [&'static str]),
}

impl ParamShape {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            ParamShape::Exact(names) => count == names.len(),
            ParamShape::AtLeast(names) => count >= names.len(),
        }
    }
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamShape::Exact(names) => write!(f, "[{}]", names.join(" ")),
            ParamShape::AtLeast(names) => write!(f, "[{} ...]", names.join(" ")),
        }
    }
}

/// Ordered scenario parameters as supplied by the start request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioParams {
    values: Vec<String>,
}

impl ScenarioParams {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Values from `index` on.
    pub fn rest(&self, index: usize) -> &[String] {
        self.values.get(index..).unwrap_or(&[])
    }

    /// A Sparkplug identifier at `index`.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::InvalidParam`] when the value is missing or is not a
    /// valid group, edge node, device or host id.
    pub fn id(&self, index: usize, name: &str) -> Result<String, ScenarioError> {
        let value = self.get(index).unwrap_or_default();
        if is_valid_id(value) {
            Ok(value.to_owned())
        } else {
            Err(ScenarioError::InvalidParam {
                name: name.to_owned(),
                value: value.to_owned(),
                reason: "not a valid Sparkplug identifier".into(),
            })
        }
    }

    /// A positive integer at `index`.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::InvalidParam`] when the value is missing, not an
    /// integer, or zero.
    pub fn positive_u64(&self, index: usize, name: &str) -> Result<u64, ScenarioError> {
        let value = self.get(index).unwrap_or_default();
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            Ok(_) => Err(ScenarioError::InvalidParam {
                name: name.to_owned(),
                value: value.to_owned(),
                reason: "must be greater than zero".into(),
            }),
            Err(err) => Err(ScenarioError::InvalidParam {
                name: name.to_owned(),
                value: value.to_owned(),
                reason: err.to_string(),
            }),
        }
    }
}

impl From<Vec<String>> for ScenarioParams {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

pub type Factory = fn(&ScenarioParams) -> Result<ScenarioKind, ScenarioError>;

#[derive(Debug, Clone, Copy)]
pub struct ScenarioDescriptor {
    pub profile: &'static str,
    pub name: &'static str,
    pub shape: ParamShape,
    pub factory: Factory,
}

#[derive(Debug, Default)]
pub struct ScenarioCatalog {
    descriptors: BTreeMap<(String, String), ScenarioDescriptor>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in scenario.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for descriptor in [
            EdgeSessionTest::DESCRIPTOR,
            HostSessionTest::DESCRIPTOR,
            MessageOrderingTest::DESCRIPTOR,
        ] {
            let registered = catalog.register(descriptor);
            debug_assert!(registered.is_ok(), "built-in scenario names are distinct");
        }
        catalog
    }

    /// # Errors
    ///
    /// [`ScenarioError::DuplicateScenario`] if `(profile, name)` is taken.
    pub fn register(&mut self, descriptor: ScenarioDescriptor) -> Result<(), ScenarioError> {
        let key = (descriptor.profile.to_owned(), descriptor.name.to_owned());
        if self.descriptors.contains_key(&key) {
            return Err(ScenarioError::DuplicateScenario {
                profile: key.0,
                name: key.1,
            });
        }
        self.descriptors.insert(key, descriptor);
        Ok(())
    }

    pub fn get(&self, profile: &str, name: &str) -> Option<&ScenarioDescriptor> {
        self.descriptors.get(&(profile.to_owned(), name.to_owned()))
    }

    /// Build a scenario from its start request.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::UnknownScenario`], [`ScenarioError::ParamCount`], or
    /// whatever the factory rejects.
    pub fn create(
        &self,
        profile: &str,
        name: &str,
        params: &ScenarioParams,
    ) -> Result<ScenarioKind, ScenarioError> {
        let descriptor = self
            .get(profile, name)
            .ok_or_else(|| ScenarioError::UnknownScenario {
                profile: profile.to_owned(),
                name: name.to_owned(),
            })?;
        if !descriptor.shape.accepts(params.len()) {
            return Err(ScenarioError::ParamCount {
                scenario: format!("{profile} {name}"),
                expected: descriptor.shape.to_string(),
                got: params.len(),
            });
        }
        (descriptor.factory)(params)
    }

    /// Registered `(profile, name)` pairs, sorted.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.descriptors
            .keys()
            .map(|(p, n)| (p.as_str(), n.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    fn params(values: &[&str]) -> ScenarioParams {
        ScenarioParams::new(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn builtin_lists_all_scenarios() {
        let catalog = ScenarioCatalog::builtin();
        assert_eq!(
            catalog.list(),
            vec![
                ("edge", "SessionEstablishmentTest"),
                ("host", "MessageOrderingTest"),
                ("host", "SessionEstablishmentTest"),
            ]
        );
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut catalog = ScenarioCatalog::builtin();
        let err = catalog.register(HostSessionTest::DESCRIPTOR).unwrap_err();
        assert!(matches!(err, ScenarioError::DuplicateScenario { .. }));
    }

    #[test]
    fn unknown_scenario() {
        let catalog = ScenarioCatalog::builtin();
        let err = catalog.create("broker", "Nope", &params(&[])).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::UnknownScenario {
                profile: "broker".into(),
                name: "Nope".into()
            }
        );
    }

    #[test]
    fn wrong_parameter_count() {
        let catalog = ScenarioCatalog::builtin();
        let err = catalog
            .create("host", "SessionEstablishmentTest", &params(&[]))
            .unwrap_err();
        assert!(matches!(err, ScenarioError::ParamCount { got: 0, .. }));

        let err = catalog
            .create("host", "MessageOrderingTest", &params(&["H1", "G1", "E1"]))
            .unwrap_err();
        assert!(err.to_string().contains("reorder_timeout_ms"));
    }

    #[test]
    fn edge_session_accepts_any_number_of_devices() {
        let catalog = ScenarioCatalog::builtin();
        for values in [
            &["H1", "G1", "E1"][..],
            &["H1", "G1", "E1", "D1", "D2"][..],
        ] {
            let s = catalog
                .create("edge", "SessionEstablishmentTest", &params(values))
                .unwrap();
            assert_eq!(s.name(), "edge SessionEstablishmentTest");
        }
    }

    #[test]
    fn invalid_identifier_rejected() {
        let catalog = ScenarioCatalog::builtin();
        let err = catalog
            .create("host", "SessionEstablishmentTest", &params(&["bad/id"]))
            .unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidParam { ref name, .. } if name == "host_id"));
    }

    #[test]
    fn positive_u64_rejects_zero_and_text() {
        let p = params(&["0", "abc", "250"]);
        assert!(p.positive_u64(0, "t").is_err());
        assert!(p.positive_u64(1, "t").is_err());
        assert_eq!(p.positive_u64(2, "t").unwrap(), 250);
        assert!(p.positive_u64(3, "t").is_err());
    }
}
