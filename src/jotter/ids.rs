//! Id generation for pages and blocks.
//!
//! Everything that creates a page or a block takes an `&mut impl IdGenerator` so tests can
//! drive creation with a predictable counter while the binary picks the source from config.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Source of fresh, unique identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Monotonic counter: "1", "2", "3", ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

/// Millisecond timestamps, bumped by one whenever the clock has not advanced
/// so two ids minted in the same millisecond stay distinct.
#[derive(Debug, Clone, Default)]
pub struct TimestampIds {
    last: i64,
}

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        self.last.to_string()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Which generator to build, as named in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdSourceKind {
    #[default]
    Sequential,
    Timestamp,
    Uuid,
}

impl fmt::Display for IdSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdSourceKind::Sequential => "sequential",
            IdSourceKind::Timestamp => "timestamp",
            IdSourceKind::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

impl FromStr for IdSourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "counter" => Ok(IdSourceKind::Sequential),
            "timestamp" | "time" => Ok(IdSourceKind::Timestamp),
            "uuid" => Ok(IdSourceKind::Uuid),
            other => Err(format!(
                "unknown id source `{other}`; expected sequential|timestamp|uuid"
            )),
        }
    }
}

/// Runtime-selected generator, so the api type stays concrete in the binary.
#[derive(Debug, Clone)]
pub enum IdSource {
    Sequential(SequentialIds),
    Timestamp(TimestampIds),
    Uuid(UuidIds),
}

impl IdSource {
    pub fn from_kind(kind: IdSourceKind) -> Self {
        match kind {
            IdSourceKind::Sequential => IdSource::Sequential(SequentialIds::new()),
            IdSourceKind::Timestamp => IdSource::Timestamp(TimestampIds::default()),
            IdSourceKind::Uuid => IdSource::Uuid(UuidIds),
        }
    }
}

impl IdGenerator for IdSource {
    fn next_id(&mut self) -> String {
        match self {
            IdSource::Sequential(ids) => ids.next_id(),
            IdSource::Timestamp(ids) => ids.next_id(),
            IdSource::Uuid(ids) => ids.next_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_counts_up_from_one() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "1");
        assert_eq!(ids.next_id(), "2");
        assert_eq!(ids.next_id(), "3");
    }

    #[test]
    fn timestamp_ids_never_repeat_within_a_millisecond() {
        let mut ids = TimestampIds::default();
        let minted: Vec<i64> = (0..50)
            .map(|_| ids.next_id().parse().unwrap())
            .collect();
        for pair in minted.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn uuid_ids_are_unique() {
        let mut ids = UuidIds;
        let minted: HashSet<String> = (0..20).map(|_| ids.next_id()).collect();
        assert_eq!(minted.len(), 20);
    }

    #[test]
    fn parses_source_names() {
        assert_eq!(
            "UUID".parse::<IdSourceKind>().unwrap(),
            IdSourceKind::Uuid
        );
        assert_eq!(
            "counter".parse::<IdSourceKind>().unwrap(),
            IdSourceKind::Sequential
        );
        assert!("dice".parse::<IdSourceKind>().is_err());
    }
}
