use super::Task;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The branches of a `SWITCH`, keyed by case value.
///
/// Serialized as a JSON object. Case order is the order branches render in,
/// so it is kept exactly as written instead of being sorted by key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecisionCases(Vec<(String, Vec<Task>)>);

impl DecisionCases {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets the tasks for `key`, keeping its position if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, tasks: Vec<Task>) {
        let key = key.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = tasks,
            None => self.0.push((key, tasks)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Vec<Task>> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, tasks)| tasks)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Vec<Task>> {
        self.0
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, tasks)| tasks)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<Task>> {
        let index = self.0.iter().position(|(existing, _)| existing == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Task>)> {
        self.0.iter().map(|(key, tasks)| (key, tasks))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Vec<Task>)> {
        self.0.iter_mut().map(|(key, tasks)| (&*key, tasks))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Task>)> for DecisionCases {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Task>)>>(iter: I) -> Self {
        let mut cases = DecisionCases::new();
        for (key, tasks) in iter {
            cases.insert(key, tasks);
        }
        cases
    }
}

impl Serialize for DecisionCases {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, tasks) in &self.0 {
            map.serialize_entry(key, tasks)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DecisionCases {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CasesVisitor;

        impl<'de> Visitor<'de> for CasesVisitor {
            type Value = DecisionCases;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of case keys to task lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut cases = DecisionCases::new();
                while let Some((key, tasks)) = access.next_entry::<String, Vec<Task>>()? {
                    cases.insert(key, tasks);
                }
                Ok(cases)
            }
        }

        deserializer.deserialize_map(CasesVisitor)
    }
}
