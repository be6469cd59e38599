use crate::PlayerVersion;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Version key → stat snapshot, in document order.
///
/// Never empty: construction and deserialisation both reject an empty map,
/// so "first key" always exists.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionMap {
    entries: Vec<(String, PlayerVersion)>,
}

impl VersionMap {
    /// Builds a map from ordered entries. Later duplicates replace the value
    /// of the first occurrence but keep its position. Returns `None` when
    /// `entries` is empty.
    pub fn from_entries(entries: Vec<(String, PlayerVersion)>) -> Option<Self> {
        let mut map = Self { entries: Vec::with_capacity(entries.len()) };
        for (key, version) in entries {
            map.insert(key, version);
        }
        if map.entries.is_empty() {
            return None;
        }
        Some(map)
    }

    fn insert(&mut self, key: String, version: PlayerVersion) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = version,
            None => self.entries.push((key, version)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PlayerVersion> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn first_key(&self) -> &str {
        // non-empty by construction
        &self.entries[0].0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlayerVersion)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for VersionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, version) in self.iter() {
            map.serialize_entry(key, version)?;
        }
        map.end()
    }
}

struct VersionMapVisitor;

impl<'de> Visitor<'de> for VersionMapVisitor {
    type Value = VersionMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-empty map of version key to player version")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(2));
        while let Some((key, version)) = access.next_entry::<String, PlayerVersion>()? {
            entries.push((key, version));
        }
        VersionMap::from_entries(entries)
            .ok_or_else(|| de::Error::invalid_length(0, &"at least one version"))
    }
}

impl<'de> Deserialize<'de> for VersionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(VersionMapVisitor)
    }
}
