//! Session Registry: lifecycle state keyed by edge node, device and host
//! application identity.
//!
//! Pure data plus accessors. Rule evaluation lives in [`crate::monitor`];
//! this module only guarantees the structural invariants:
//!
//! - device sessions are nested inside their edge node session, so evicting
//!   an edge node evicts its devices and no device can outlive its parent;
//! - sessions are installed whole (a birth replaces the previous session,
//!   it never patches it);
//! - sequence counters are `u8`, so they are always in `[0, 255]`.
//!
//! The registry also keeps the per-identity history that must survive
//! eviction: the last bdSeq seen in a connect-time death certificate, per
//! edge node and per host application.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::errors::TckError;
use crate::payload::{metric, Metric};
use crate::topic::{filter_matches, DeviceKey, EdgeNodeKey};

pub type MetricValue = Option<metric::Value>;

/// Metric tables established by a birth and advanced by data messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTables {
    /// Value of each metric as declared in the birth.
    pub birth: BTreeMap<String, MetricValue>,
    /// Most recent value of each metric.
    pub last: BTreeMap<String, MetricValue>,
    /// Alias → metric name, as declared in the birth.
    pub aliases: HashMap<u64, String>,
}

impl MetricTables {
    /// Build the tables from the metrics of a birth. Metrics without a name
    /// cannot be addressed later and are skipped; a repeated alias keeps its
    /// first binding.
    pub fn from_birth(metrics: &[Metric]) -> Self {
        let mut tables = MetricTables::default();
        for m in metrics {
            let Some(name) = &m.name else { continue };
            tables.birth.insert(name.clone(), m.value.clone());
            tables.last.insert(name.clone(), m.value.clone());
            if let Some(alias) = m.alias {
                tables.aliases.entry(alias).or_insert_with(|| name.clone());
            }
        }
        tables
    }

    pub fn uses_aliases(&self) -> bool {
        !self.aliases.is_empty()
    }

    /// Resolve a data/command metric to the name declared at birth.
    pub fn resolve<'a>(&'a self, m: &'a Metric) -> Option<&'a str> {
        if let Some(alias) = m.alias {
            return self.aliases.get(&alias).map(String::as_str);
        }
        m.name
            .as_deref()
            .filter(|name| self.birth.contains_key(*name))
    }

    /// Store `value` as the latest for `name`; returns `true` if it differs
    /// from the previous latest value.
    pub fn observe(&mut self, name: &str, value: &MetricValue) -> bool {
        match self.last.get_mut(name) {
            Some(last) if last == value => false,
            Some(last) => {
                *last = value.clone();
                true
            }
            None => {
                self.last.insert(name.to_owned(), value.clone());
                true
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSession {
    pub metrics: MetricTables,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeNodeSession {
    /// Client id of the connection that published the NBIRTH.
    pub owner: String,
    /// Last sequence number received from this edge node.
    pub seq: u8,
    /// bdSeq declared in the NBIRTH.
    pub bd_seq: Option<u8>,
    pub metrics: MetricTables,
    /// Template definition name → member metric names.
    pub templates: HashMap<String, BTreeSet<String>>,
    pub devices: BTreeMap<String, DeviceSession>,
}

impl EdgeNodeSession {
    pub fn new(owner: impl Into<String>, bd_seq: Option<u8>, metrics: MetricTables) -> Self {
        Self {
            owner: owner.into(),
            seq: 0,
            bd_seq,
            metrics,
            templates: HashMap::new(),
            devices: BTreeMap::new(),
        }
    }

    /// `true` if `alias` is declared by the node or any of its live devices.
    pub fn alias_in_use(&self, alias: u64) -> bool {
        self.metrics.aliases.contains_key(&alias)
            || self
                .devices
                .values()
                .any(|d| d.metrics.aliases.contains_key(&alias))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSession {
    pub online: bool,
    /// Connection currently holding the host id online.
    pub owner: Option<String>,
    /// Timestamp of the most recent STATE message.
    pub last_timestamp: Option<u64>,
    /// Timestamp of the most recent online STATE message.
    pub last_online_timestamp: Option<u64>,
    pub bd_seq: Option<u8>,
}

/// Death certificate registered by a connection at CONNECT time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeathCertificate {
    Edge {
        key: EdgeNodeKey,
        bd_seq: Option<u8>,
    },
    Host {
        host_id: String,
        bd_seq: Option<u8>,
        timestamp: Option<u64>,
    },
}

/// What a connection loss removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eviction {
    pub edges: Vec<EdgeNodeKey>,
    pub devices: usize,
    pub hosts_offline: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    edges: HashMap<EdgeNodeKey, EdgeNodeSession>,
    hosts: HashMap<String, HostSession>,
    certificates: HashMap<String, DeathCertificate>,
    edge_bd_seq: HashMap<EdgeNodeKey, u8>,
    host_bd_seq: HashMap<String, u8>,
    subscriptions: HashMap<String, Vec<String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Edge nodes ──────────────────────────────────────────────────────

    pub fn edge(&self, key: &EdgeNodeKey) -> Option<&EdgeNodeSession> {
        self.edges.get(key)
    }

    pub fn edge_mut(&mut self, key: &EdgeNodeKey) -> Option<&mut EdgeNodeSession> {
        self.edges.get_mut(key)
    }

    /// Install a freshly born edge node, replacing (and returning) any
    /// previous session for the same identity together with its devices.
    pub fn install_edge(
        &mut self,
        key: EdgeNodeKey,
        session: EdgeNodeSession,
    ) -> Option<EdgeNodeSession> {
        self.edges.insert(key, session)
    }

    pub fn evict_edge(&mut self, key: &EdgeNodeKey) -> Option<EdgeNodeSession> {
        self.edges.remove(key)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ── Devices ─────────────────────────────────────────────────────────

    pub fn device(&self, key: &DeviceKey) -> Option<&DeviceSession> {
        self.edges.get(&key.edge)?.devices.get(&key.device_id)
    }

    pub fn device_mut(&mut self, key: &DeviceKey) -> Option<&mut DeviceSession> {
        self.edges.get_mut(&key.edge)?.devices.get_mut(&key.device_id)
    }

    /// # Errors
    ///
    /// Returns [`TckError::Session`] if the parent edge node is not alive.
    pub fn install_device(
        &mut self,
        key: &DeviceKey,
        session: DeviceSession,
    ) -> Result<Option<DeviceSession>, TckError> {
        let edge = self
            .edges
            .get_mut(&key.edge)
            .ok_or_else(|| TckError::Session(format!("edge node {} is not alive", key.edge)))?;
        Ok(edge.devices.insert(key.device_id.clone(), session))
    }

    pub fn evict_device(&mut self, key: &DeviceKey) -> Option<DeviceSession> {
        self.edges.get_mut(&key.edge)?.devices.remove(&key.device_id)
    }

    pub fn device_count(&self) -> usize {
        self.edges.values().map(|e| e.devices.len()).sum()
    }

    // ── Host applications ───────────────────────────────────────────────

    pub fn host(&self, host_id: &str) -> Option<&HostSession> {
        self.hosts.get(host_id)
    }

    /// Session for `host_id`, created offline if absent.
    pub fn host_entry(&mut self, host_id: &str) -> &mut HostSession {
        self.hosts.entry(host_id.to_owned()).or_default()
    }

    pub fn is_host_online(&self, host_id: &str) -> bool {
        self.hosts.get(host_id).is_some_and(|h| h.online)
    }

    // ── Connect-time certificates and bdSeq history ─────────────────────

    pub fn record_certificate(
        &mut self,
        client_id: &str,
        cert: DeathCertificate,
    ) -> Option<DeathCertificate> {
        self.certificates.insert(client_id.to_owned(), cert)
    }

    pub fn certificate(&self, client_id: &str) -> Option<&DeathCertificate> {
        self.certificates.get(client_id)
    }

    pub fn last_edge_bd_seq(&self, key: &EdgeNodeKey) -> Option<u8> {
        self.edge_bd_seq.get(key).copied()
    }

    pub fn set_edge_bd_seq(&mut self, key: EdgeNodeKey, bd_seq: u8) {
        self.edge_bd_seq.insert(key, bd_seq);
    }

    pub fn last_host_bd_seq(&self, host_id: &str) -> Option<u8> {
        self.host_bd_seq.get(host_id).copied()
    }

    pub fn set_host_bd_seq(&mut self, host_id: &str, bd_seq: u8) {
        self.host_bd_seq.insert(host_id.to_owned(), bd_seq);
    }

    // ── Subscriptions ───────────────────────────────────────────────────

    pub fn record_subscriptions(&mut self, client_id: &str, filters: &[String]) {
        let subs = self.subscriptions.entry(client_id.to_owned()).or_default();
        for filter in filters {
            if !subs.contains(filter) {
                subs.push(filter.clone());
            }
        }
    }

    pub fn subscriptions(&self, client_id: &str) -> &[String] {
        self.subscriptions
            .get(client_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `true` if any filter `client_id` subscribed with matches `topic`.
    pub fn is_subscribed(&self, client_id: &str, topic: &str) -> bool {
        self.subscriptions(client_id)
            .iter()
            .any(|f| filter_matches(f, topic))
    }

    // ── Connection loss ─────────────────────────────────────────────────

    /// Remove everything owned by `client_id`: its edge node sessions (and
    /// their devices), its online host claims, its certificate and its
    /// subscriptions. bdSeq history is kept.
    pub fn evict_connection(&mut self, client_id: &str) -> Eviction {
        let mut eviction = Eviction::default();

        let owned: Vec<EdgeNodeKey> = self
            .edges
            .iter()
            .filter(|(_, s)| s.owner == client_id)
            .map(|(k, _)| k.clone())
            .collect();
        for key in owned {
            if let Some(session) = self.edges.remove(&key) {
                eviction.devices += session.devices.len();
            }
            eviction.edges.push(key);
        }

        for (host_id, host) in &mut self.hosts {
            if host.online && host.owner.as_deref() == Some(client_id) {
                host.online = false;
                host.owner = None;
                eviction.hosts_offline.push(host_id.clone());
            }
        }
        eviction.edges.sort();
        eviction.hosts_offline.sort();

        self.certificates.remove(client_id);
        self.subscriptions.remove(client_id);
        eviction
    }

    /// Forget all sessions and history.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
