//! Cookie-backed flag storage.
//!
//! Generated pages keep toggle preferences in ordinary cookies scoped to the
//! site root, so a choice made on one page applies to every page of the
//! site. This module models the slice of `document.cookie` the toggles rely
//! on:
//!
//! - **Assignment**: `name=value;expires=<date>;path=/`, one cookie per
//!   assignment, keyed by name and path. An `expires` (or `max-age`) already
//!   in the past deletes the cookie.
//! - **Read view**: every live cookie rendered as `name=value` pairs joined
//!   by `"; "`. Expired cookies silently drop out of this view.
//!
//! [`CookieStore`] implements [`FlagStore`] on top of these two primitives,
//! going through the string view on read so it sees exactly what page script
//! would.
//!
//! ## Storage
//!
//! Between CLI invocations the jar is persisted as versioned JSON. A missing
//! or unreadable file loads as an empty jar, which simply looks like a first
//! visit to the toggles.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::clock::Clock;
use crate::store::{FlagKey, FlagStore, FlagValue, expires_at};

/// Version of the jar file format. Bump to discard jars written by older builds.
const JAR_VERSION: u32 = 1;

/// `Date.prototype.toUTCString()` layout, as used in `expires=`.
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Path every toggle cookie is scoped to.
pub const SITE_ROOT: &str = "/";

#[derive(Error, Debug)]
pub enum JarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single stored cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    /// `None` for session cookies, which are never written to disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieJar {
    version: u32,
    cookies: Vec<Cookie>,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::empty()
    }
}

impl CookieJar {
    pub fn empty() -> Self {
        Self {
            version: JAR_VERSION,
            cookies: Vec::new(),
        }
    }

    /// Load a jar from disk. Returns an empty jar if the file doesn't exist
    /// or can't be parsed (version mismatch, corruption).
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let jar: Self = match serde_json::from_str(&content) {
            Ok(j) => j,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "discarding unreadable cookie jar");
                return Self::empty();
            }
        };
        if jar.version != JAR_VERSION {
            debug!(found = jar.version, expected = JAR_VERSION, "discarding cookie jar version");
            return Self::empty();
        }
        jar
    }

    /// Write the jar to disk, dropping expired and session cookies.
    pub fn save(&self, path: &Path, now: DateTime<Utc>) -> Result<(), JarError> {
        let persisted = Self {
            version: JAR_VERSION,
            cookies: self
                .cookies
                .iter()
                .filter(|c| c.expires.is_some() && c.is_live(now))
                .cloned()
                .collect(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Apply a `document.cookie = raw` assignment.
    ///
    /// Attribute names are case-insensitive. A missing `path` defaults to the
    /// site root. `max-age` wins over `expires` when both are present; a
    /// `max-age` of zero or less deletes, and one past the representable
    /// range saturates at [`crate::store::latest_expiry`].
    /// Assignments without `=` in the leading pair are ignored.
    pub fn set_cookie(&mut self, raw: &str, now: DateTime<Utc>) {
        let mut parts = raw.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            debug!(raw, "ignoring cookie assignment without name=value");
            return;
        };
        let name = name.trim();
        let value = value.trim();

        let mut path = SITE_ROOT.to_string();
        let mut expires = None;
        let mut max_age = None;
        for attr in parts {
            let (key, val) = attr.split_once('=').unwrap_or((attr, ""));
            match key.trim().to_ascii_lowercase().as_str() {
                "path" => path = val.trim().to_string(),
                "expires" => expires = parse_http_date(val.trim()),
                "max-age" => max_age = val.trim().parse::<i64>().ok(),
                _ => {}
            }
        }
        let expires = max_age
            .map(|secs| {
                if secs <= 0 {
                    return now;
                }
                expires_at(now, Duration::try_seconds(secs).unwrap_or(Duration::MAX))
            })
            .or(expires);

        let existing = self
            .cookies
            .iter()
            .position(|c| c.name == name && c.path == path);

        if expires.is_some_and(|at| at <= now) {
            if let Some(idx) = existing {
                self.cookies.remove(idx);
            }
            return;
        }

        let cookie = Cookie {
            name: name.to_string(),
            value: value.to_string(),
            path,
            expires,
        };
        match existing {
            Some(idx) => self.cookies[idx] = cookie,
            None => self.cookies.push(cookie),
        }
    }

    /// The `document.cookie` read view at `now`.
    pub fn cookie_string(&self, now: DateTime<Utc>) -> String {
        self.live(now)
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Cookies that have not expired at `now`, in insertion order.
    pub fn live(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter().filter(move |c| c.is_live(now))
    }
}

/// Find `name` in a `document.cookie` string.
///
/// Entries are separated by `;` and may carry leading whitespace. The first
/// entry whose name matches exactly wins.
pub fn lookup<'a>(cookie_string: &'a str, name: &str) -> Option<&'a str> {
    cookie_string.split(';').find_map(|entry| {
        entry
            .trim_start()
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE).to_string()
}

pub fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, HTTP_DATE)
        .ok()
        .map(|naive| naive.and_utc())
}

/// [`FlagStore`] over a [`CookieJar`].
#[derive(Debug)]
pub struct CookieStore<C: Clock> {
    jar: CookieJar,
    clock: C,
}

impl<C: Clock> CookieStore<C> {
    pub fn new(jar: CookieJar, clock: C) -> Self {
        Self { jar, clock }
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> FlagStore for CookieStore<C> {
    fn read(&self, key: FlagKey) -> Option<FlagValue> {
        let cookies = self.jar.cookie_string(self.clock.now());
        lookup(&cookies, key.as_str()).and_then(FlagValue::parse)
    }

    fn write(&mut self, key: FlagKey, value: FlagValue, ttl: Duration) {
        let now = self.clock.now();
        let assignment = format!(
            "{key}={value};expires={};path={SITE_ROOT}",
            format_http_date(expires_at(now, ttl))
        );
        debug!(%key, %value, cookie = %assignment, "writing flag cookie");
        self.jar.set_cookie(&assignment, now);
    }
}
