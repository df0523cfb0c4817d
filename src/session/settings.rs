use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conic_errors::ConicError;

pub const CENTRAL_BODY: &str = "central-body";
pub const CONIC_SECTION: &str = "conic-section";
pub const SEMIMAJOR_AXIS: &str = "semimajor-axis";
pub const ECCENTRICITY: &str = "eccentricity";
pub const LONGITUDE_OF_ASCENDING_NODE: &str = "longitude-of-ascending-node";
pub const INCLINATION: &str = "inclination";
pub const ARGUMENT_OF_PERIAPSIS: &str = "argument-of-periapsis";
pub const TIME_SCALE: &str = "time-scale";

/// Keys read and written by [`OrbitSession`](crate::session::OrbitSession).
pub const SESSION_KEYS: [&str; 8] = [
    CENTRAL_BODY,
    CONIC_SECTION,
    SEMIMAJOR_AXIS,
    ECCENTRICITY,
    LONGITUDE_OF_ASCENDING_NODE,
    INCLINATION,
    ARGUMENT_OF_PERIAPSIS,
    TIME_SCALE,
];

/// Persisted key/value pairs handed over by the storage layer.
///
/// The map is serialized as a flat JSON-like object. Keys unknown to the session are kept
/// untouched so that several consumers can share one store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMap(BTreeMap<String, String>);

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse the value of a key.
    ///
    /// Return
    /// ----------
    /// * `Ok(None)` if the key is absent.
    /// * [`ConicError::InvalidSetting`] if the value does not parse.
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConicError> {
        self.get(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|_| ConicError::InvalidSetting {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
            })
            .transpose()
    }
}

impl FromIterator<(String, String)> for SettingsMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        SettingsMap(iter.into_iter().collect())
    }
}
