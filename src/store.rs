//! Persistent flag store.
//!
//! The two toggles remember their state between page loads through a tiny
//! key/value store. Only two keys exist and each holds `"yes"` or `"no"`.
//! A key that was never written, that expired, or that holds anything else
//! reads as absent. Absence is a real state, not an error: it tells an
//! initializer that this is a first visit and a default must be written.
//!
//! The toggles talk to the store through the [`FlagStore`] trait so the
//! precedence rules can be tested against [`MemoryStore`] while the CLI
//! runs them against a cookie jar ([`crate::cookie::CookieStore`]).

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;

use crate::clock::Clock;

/// How long a written flag stays valid unless configured otherwise.
pub const DEFAULT_LIFETIME_DAYS: u32 = 2;

/// Longest lifetime a config may ask for.
pub const MAX_LIFETIME_DAYS: u32 = 3650;

/// `Fri, 31 Dec 9999 23:59:59 GMT`, the last instant an `expires=` date can name.
const LATEST_EXPIRY_SECS: i64 = 253_402_300_799;

/// The keys the toggles persist under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKey {
    PrivateHidden,
    SidebarCollapsed,
}

impl FlagKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKey::PrivateHidden => "private-hidden",
            FlagKey::SidebarCollapsed => "sidebar-collapsed",
        }
    }
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagValue {
    Yes,
    No,
}

impl FlagValue {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagValue::Yes => "yes",
            FlagValue::No => "no",
        }
    }

    /// Parse stored text. Anything but the exact `"yes"` / `"no"` is absent.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(FlagValue::Yes),
            "no" => Some(FlagValue::No),
            _ => None,
        }
    }

    pub fn from_bool(on: bool) -> Self {
        if on { FlagValue::Yes } else { FlagValue::No }
    }

    pub fn is_yes(self) -> bool {
        self == FlagValue::Yes
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Get/set of a named yes/no value with an expiry horizon.
///
/// Writes overwrite unconditionally. Reads return the latest non-expired
/// value, or `None`.
pub trait FlagStore {
    fn read(&self, key: FlagKey) -> Option<FlagValue>;
    fn write(&mut self, key: FlagKey, value: FlagValue, ttl: Duration);
}

impl<S: FlagStore + ?Sized> FlagStore for &mut S {
    fn read(&self, key: FlagKey) -> Option<FlagValue> {
        (**self).read(key)
    }

    fn write(&mut self, key: FlagKey, value: FlagValue, ttl: Duration) {
        (**self).write(key, value, ttl)
    }
}

/// Convert a lifetime in days into the ttl passed to [`FlagStore::write`].
pub fn lifetime(days: u32) -> Duration {
    Duration::days(i64::from(days))
}

/// Latest expiry a store will record.
pub fn latest_expiry() -> DateTime<Utc> {
    DateTime::from_timestamp(LATEST_EXPIRY_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `now + ttl`, saturating at [`latest_expiry`] on the way up and at the
/// earliest representable instant on the way down.
pub fn expires_at(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    match now.checked_add_signed(ttl) {
        Some(at) => at.min(latest_expiry()),
        None if ttl < Duration::zero() => DateTime::<Utc>::MIN_UTC,
        None => latest_expiry(),
    }
}

/// In-memory [`FlagStore`].
#[derive(Debug)]
pub struct MemoryStore<C: Clock> {
    clock: C,
    entries: HashMap<FlagKey, (FlagValue, DateTime<Utc>)>,
    writes: usize,
}

impl<C: Clock> MemoryStore<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            entries: HashMap::new(),
            writes: 0,
        }
    }

    /// Seed a value expiring `ttl` from now. Not counted by [`writes`](Self::writes).
    pub fn with(mut self, key: FlagKey, value: FlagValue, ttl: Duration) -> Self {
        let expires = expires_at(self.clock.now(), ttl);
        self.entries.insert(key, (value, expires));
        self
    }

    /// Number of `write` calls since construction. Seeding does not count.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> FlagStore for MemoryStore<C> {
    fn read(&self, key: FlagKey) -> Option<FlagValue> {
        let (value, expires) = self.entries.get(&key)?;
        (*expires > self.clock.now()).then_some(*value)
    }

    fn write(&mut self, key: FlagKey, value: FlagValue, ttl: Duration) {
        let expires = expires_at(self.clock.now(), ttl);
        self.entries.insert(key, (value, expires));
        self.writes += 1;
    }
}
