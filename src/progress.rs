use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Catalog;

/// Identity of one chapter: the (class, subject, chapter) labels as they
/// appear in the catalog. The triple is the natural key everywhere — in
/// memory, in the JSON file, and in the sheet table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChapterKey {
    pub class: String,
    pub subject: String,
    pub chapter: String,
}

impl ChapterKey {
    pub fn new(
        class: impl Into<String>,
        subject: impl Into<String>,
        chapter: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            subject: subject.into(),
            chapter: chapter.into(),
        }
    }
}

impl std::fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.class, self.subject, self.chapter)
    }
}

/// The three completion tasks tracked per chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Revision,
    Mcq,
    Pyq,
}

impl Flag {
    pub fn parse(s: &str) -> Option<Flag> {
        match s {
            "revision" => Some(Flag::Revision),
            "mcq" => Some(Flag::Mcq),
            "pyq" => Some(Flag::Pyq),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Revision => "revision",
            Flag::Mcq => "mcq",
            Flag::Pyq => "pyq",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion state for one chapter. Flags are independent; a record starts
/// all-false and is only ever changed by explicit toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub revision: bool,
    pub mcq: bool,
    pub pyq: bool,
}

impl ChapterRecord {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Revision => self.revision,
            Flag::Mcq => self.mcq,
            Flag::Pyq => self.pyq,
        }
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Revision => self.revision = value,
            Flag::Mcq => self.mcq = value,
            Flag::Pyq => self.pyq = value,
        }
    }
}

/// The full in-memory mapping from every catalog triple to its record.
///
/// Invariant: the key set is exactly the catalog's flattened triple set.
/// `ProgressStore::load` enforces this before a snapshot reaches anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    records: BTreeMap<ChapterKey, ChapterRecord>,
}

impl ProgressSnapshot {
    /// Every catalog triple mapped to an all-false record.
    pub fn blank(catalog: &Catalog) -> Self {
        let records = catalog
            .flatten()
            .into_iter()
            .map(|key| (key, ChapterRecord::default()))
            .collect();
        Self { records }
    }

    pub fn from_records(records: BTreeMap<ChapterKey, ChapterRecord>) -> Self {
        Self { records }
    }

    pub fn record(&self, key: &ChapterKey) -> Option<&ChapterRecord> {
        self.records.get(key)
    }

    pub fn record_mut(&mut self, key: &ChapterKey) -> Option<&mut ChapterRecord> {
        self.records.get_mut(key)
    }

    pub fn records(&self) -> impl Iterator<Item = (&ChapterKey, &ChapterRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One requested toggle, as handed over by the UI layer.
#[derive(Debug, Clone)]
pub struct FlagEdit {
    pub key: ChapterKey,
    pub flag: Flag,
    pub value: bool,
}
