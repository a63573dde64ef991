use std::{
    collections::HashMap,
    hash::Hash,
    net::IpAddr,
    sync::{Mutex, PoisonError},
    time::Instant,
};

/// Lists of banned identities the login validator consults
pub trait BanRegistry: Send + Sync {
    /// `name` is the first token of the Client's display name
    fn is_name_banned(&self, name: &str) -> bool;
    fn is_ip_banned(&self, ip: &IpAddr) -> bool;
    fn is_fingerprint_banned(&self, fingerprint: &str) -> bool;
}

// BanSet
struct BanSet<K: Eq + Hash> {
    // None means the ban never expires
    entries: Mutex<HashMap<K, Option<Instant>>>,
}

impl<K: Eq + Hash> BanSet<K> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn ban(&self, key: K, until: Option<Instant>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, until);
    }

    fn lift(&self, key: &K) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    fn contains(&self, key: &K) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, until| until.map_or(true, |until| until > now));
        entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

// BanList
/// In-memory [`BanRegistry`] whose bans may expire
pub struct BanList {
    names: BanSet<String>,
    ips: BanSet<IpAddr>,
    fingerprints: BanSet<String>,
}

impl BanList {
    pub fn new() -> Self {
        Self {
            names: BanSet::new(),
            ips: BanSet::new(),
            fingerprints: BanSet::new(),
        }
    }

    /// Bans a name until `until`, or for good if `None`
    pub fn ban_name(&self, name: impl Into<String>, until: Option<Instant>) {
        self.names.ban(name.into(), until);
    }

    pub fn ban_ip(&self, ip: IpAddr, until: Option<Instant>) {
        self.ips.ban(ip, until);
    }

    pub fn ban_fingerprint(&self, fingerprint: impl Into<String>, until: Option<Instant>) {
        self.fingerprints.ban(fingerprint.into(), until);
    }

    pub fn lift_name_ban(&self, name: &str) -> bool {
        self.names.lift(&name.to_string())
    }

    pub fn lift_ip_ban(&self, ip: &IpAddr) -> bool {
        self.ips.lift(ip)
    }

    pub fn lift_fingerprint_ban(&self, fingerprint: &str) -> bool {
        self.fingerprints.lift(&fingerprint.to_string())
    }

    /// Number of bans recorded, expired ones included until next checked
    pub fn len(&self) -> usize {
        self.names.len() + self.ips.len() + self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BanList {
    fn default() -> Self {
        Self::new()
    }
}

impl BanRegistry for BanList {
    fn is_name_banned(&self, name: &str) -> bool {
        self.names.contains(&name.to_string())
    }

    fn is_ip_banned(&self, ip: &IpAddr) -> bool {
        self.ips.contains(ip)
    }

    fn is_fingerprint_banned(&self, fingerprint: &str) -> bool {
        self.fingerprints.contains(&fingerprint.to_string())
    }
}
