use anyhow::Context;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::progress::{ChapterKey, ChapterRecord, ProgressSnapshot};

/// Structural tag of the JSON file payload. A file without it (or with a
/// different one) is treated as no usable prior data.
const SCHEMA_TAG: &str = "dream-tracker/1";

/// One persisted row, in the tabular shape shared by both backends:
/// (class, subject, chapter) labels plus the three task flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRow {
    pub class: String,
    pub subject: String,
    pub chapter: String,
    pub revision: bool,
    pub mcq: bool,
    pub pyq: bool,
}

/// A durable home for the full row set. `read` returns `None` when the
/// backend exists but holds nothing yet; `write` replaces everything.
pub trait ProgressBackend {
    fn read(&mut self) -> anyhow::Result<Option<Vec<ProgressRow>>>;
    fn write(&mut self, rows: &[ProgressRow]) -> anyhow::Result<()>;
    fn describe(&self) -> String;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilePayload {
    schema: String,
    saved_at: String,
    rows: Vec<ProgressRow>,
}

/// Local structured-file backend: one `progress.json` in the workspace.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(workspace)?;
        Ok(Self {
            path: workspace.join("progress.json"),
        })
    }
}

impl ProgressBackend for JsonFileBackend {
    fn read(&mut self) -> anyhow::Result<Option<Vec<ProgressRow>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let payload: FilePayload = serde_json::from_str(&text)
            .with_context(|| format!("parse {}", self.path.display()))?;
        if payload.schema != SCHEMA_TAG {
            anyhow::bail!("unrecognized schema tag: {}", payload.schema);
        }
        Ok(Some(payload.rows))
    }

    fn write(&mut self, rows: &[ProgressRow]) -> anyhow::Result<()> {
        let payload = FilePayload {
            schema: SCHEMA_TAG.to_string(),
            saved_at: chrono::Utc::now().to_rfc3339(),
            rows: rows.to_vec(),
        };
        let text = serde_json::to_string_pretty(&payload)?;
        // Write-then-rename keeps the visible file whole even if the process
        // dies mid-save.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

/// Tabular backend: the `progress` table of the workspace's sheet workbook
/// (see `db::open_sheet`).
pub struct SheetBackend {
    conn: Connection,
}

impl SheetBackend {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl ProgressBackend for SheetBackend {
    fn read(&mut self) -> anyhow::Result<Option<Vec<ProgressRow>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT class, subject, chapter, revision, mcq, pyq FROM progress")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ProgressRow {
                    class: row.get(0)?,
                    subject: row.get(1)?,
                    chapter: row.get(2)?,
                    revision: row.get(3)?,
                    mcq: row.get(4)?,
                    pyq: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows))
    }

    fn write(&mut self, rows: &[ProgressRow]) -> anyhow::Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM progress", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO progress(class, subject, chapter, revision, mcq, pyq)
                 VALUES(?, ?, ?, ?, ?, ?)",
            )?;
            for r in rows {
                stmt.execute((&r.class, &r.subject, &r.chapter, r.revision, r.mcq, r.pyq))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        "sheet workbook".to_string()
    }
}

/// How a persisted row set failed validation against the current catalog.
#[derive(Debug)]
pub struct SchemaMismatch {
    pub missing: usize,
    pub orphaned: usize,
    pub duplicates: usize,
}

impl std::fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} missing, {} orphaned, {} duplicate rows",
            self.missing, self.orphaned, self.duplicates
        )
    }
}

fn rows_to_map(rows: &[ProgressRow]) -> (BTreeMap<ChapterKey, ChapterRecord>, usize) {
    let mut map = BTreeMap::new();
    let mut duplicates = 0;
    for row in rows {
        let key = ChapterKey::new(&row.class, &row.subject, &row.chapter);
        let record = ChapterRecord {
            revision: row.revision,
            mcq: row.mcq,
            pyq: row.pyq,
        };
        if map.insert(key, record).is_some() {
            duplicates += 1;
        }
    }
    (map, duplicates)
}

fn snapshot_to_rows(snapshot: &ProgressSnapshot) -> Vec<ProgressRow> {
    snapshot
        .records()
        .map(|(key, record)| ProgressRow {
            class: key.class.clone(),
            subject: key.subject.clone(),
            chapter: key.chapter.clone(),
            revision: record.revision,
            mcq: record.mcq,
            pyq: record.pyq,
        })
        .collect()
}

/// Check persisted rows against the catalog's flattened triple set. The key
/// sets must match exactly; anything else is a schema mismatch, reported as
/// such rather than swallowed by a catch-all.
fn validate_rows(
    rows: &[ProgressRow],
    catalog: &Catalog,
) -> Result<ProgressSnapshot, SchemaMismatch> {
    let (map, duplicates) = rows_to_map(rows);
    let wanted = catalog.flatten();
    let missing = wanted.iter().filter(|k| !map.contains_key(k)).count();
    let orphaned = map.len() - (wanted.len() - missing);
    if duplicates == 0 && missing == 0 && orphaned == 0 {
        Ok(ProgressSnapshot::from_records(map))
    } else {
        Err(SchemaMismatch {
            missing,
            orphaned,
            duplicates,
        })
    }
}

/// Rebuild against the current catalog, keeping flags for triples that still
/// exist, defaulting new chapters, and dropping orphans.
fn carry_matching(rows: &[ProgressRow], catalog: &Catalog) -> ProgressSnapshot {
    let (found, _) = rows_to_map(rows);
    let records = catalog
        .flatten()
        .into_iter()
        .map(|key| {
            let record = found.get(&key).copied().unwrap_or_default();
            (key, record)
        })
        .collect();
    ProgressSnapshot::from_records(records)
}

/// Owner of the durable snapshot. All backend traffic goes through `load`,
/// `save` and `reset`; nothing else touches storage.
pub struct ProgressStore {
    backend: Box<dyn ProgressBackend>,
    carry_over: bool,
}

impl ProgressStore {
    /// `carry_over` decides what happens when persisted rows no longer match
    /// the catalog: `false` rebuilds from defaults (the historical behavior),
    /// `true` keeps the flags of still-valid triples.
    pub fn new(backend: Box<dyn ProgressBackend>, carry_over: bool) -> Self {
        Self {
            backend,
            carry_over,
        }
    }

    /// Read the backend and produce a snapshot whose key set is exactly the
    /// catalog's. Absent, unreadable or mismatched data is never fatal: every
    /// such path ends in a freshly persisted usable snapshot.
    pub fn load(&mut self, catalog: &Catalog) -> anyhow::Result<ProgressSnapshot> {
        let rows = match self.backend.read() {
            Ok(Some(rows)) => rows,
            Ok(None) => return self.reset(catalog),
            Err(_) => return self.reset(catalog),
        };
        match validate_rows(&rows, catalog) {
            Ok(snapshot) => Ok(snapshot),
            Err(_mismatch) if self.carry_over => {
                let snapshot = carry_matching(&rows, catalog);
                self.save(&snapshot)?;
                Ok(snapshot)
            }
            Err(_mismatch) => self.reset(catalog),
        }
    }

    /// Full overwrite of the backend. Never partial.
    pub fn save(&mut self, snapshot: &ProgressSnapshot) -> anyhow::Result<()> {
        let rows = snapshot_to_rows(snapshot);
        self.backend
            .write(&rows)
            .with_context(|| format!("write {}", self.backend.describe()))
    }

    /// Blank snapshot for the whole catalog, persisted and returned. Serves
    /// both the user-facing "clear all progress" and every recovery path.
    pub fn reset(&mut self, catalog: &Catalog) -> anyhow::Result<ProgressSnapshot> {
        let snapshot = ProgressSnapshot::blank(catalog);
        self.save(&snapshot)?;
        Ok(snapshot)
    }
}
