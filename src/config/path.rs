//! Dot-path addressing over nested TOML tables.
//!
//! `profile.dev.silent` names the `silent` entry of the `dev` table inside the
//! `profile` table. All get/set/delete navigation goes through [`KeyPath`].

use std::fmt;

use toml::{Table, Value};

use crate::error::{ChroniqError, Result};

/// A validated, non-empty sequence of key segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Split a dotted key. Empty keys and empty segments (`a..b`, `.a`) are rejected.
    pub fn parse(key: &str) -> Result<Self> {
        let segments: Vec<String> = key.split('.').map(|s| s.trim().to_string()).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ChroniqError::InvalidKey(key.to_string()));
        }
        Ok(KeyPath { segments })
    }

    /// Prefix this path with further segments, e.g. `profile.dev`
    pub fn scoped(&self, prefix: &[&str]) -> Self {
        let mut segments: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        segments.extend(self.segments.iter().cloned());
        KeyPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Every segment but the last
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Look up the value at this path
    pub fn get<'t>(&self, table: &'t Table) -> Option<&'t Value> {
        lookup(table, &self.segments)
    }

    /// Descend to the parent table, creating missing tables on the way.
    ///
    /// Fails with `NotATable` if an existing intermediate entry is a scalar.
    pub fn parent_mut_or_create<'t>(&self, table: &'t mut Table) -> Result<&'t mut Table> {
        descend_or_create(table, self.parents(), 0, self)
    }

    /// Descend to the parent table without creating anything
    pub fn parent_mut<'t>(&self, table: &'t mut Table) -> Option<&'t mut Table> {
        descend(table, self.parents())
    }

    /// Set the leaf, creating parent tables as needed
    pub fn set(&self, table: &mut Table, value: Value) -> Result<()> {
        let parent = self.parent_mut_or_create(table)?;
        parent.insert(self.leaf().to_string(), value);
        Ok(())
    }

    /// Remove the leaf, returning the removed value when it existed
    pub fn remove(&self, table: &mut Table) -> Option<Value> {
        self.parent_mut(table)?.remove(self.leaf())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

fn lookup<'t>(table: &'t Table, segments: &[String]) -> Option<&'t Value> {
    match segments {
        [] => None,
        [last] => table.get(last),
        [head, rest @ ..] => match table.get(head)? {
            Value::Table(child) => lookup(child, rest),
            _ => None,
        },
    }
}

fn descend<'t>(table: &'t mut Table, segments: &[String]) -> Option<&'t mut Table> {
    match segments {
        [] => Some(table),
        [head, rest @ ..] => match table.get_mut(head)? {
            Value::Table(child) => descend(child, rest),
            _ => None,
        },
    }
}

fn descend_or_create<'t>(
    table: &'t mut Table,
    segments: &[String],
    depth: usize,
    path: &KeyPath,
) -> Result<&'t mut Table> {
    match segments {
        [] => Ok(table),
        [head, rest @ ..] => {
            let entry = table
                .entry(head.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            match entry {
                Value::Table(child) => descend_or_create(child, rest, depth + 1, path),
                _ => Err(ChroniqError::NotATable(
                    path.segments[..=depth].join("."),
                )),
            }
        }
    }
}

/// Flatten nested tables into `(dotted.key, value)` pairs, sorted by key
pub fn flatten(table: &Table) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(table, "", &mut out);
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn flatten_into(table: &Table, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Table(child) => flatten_into(child, &full, out),
            other => out.push((full, other.clone())),
        }
    }
}
