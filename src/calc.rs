use serde::Serialize;

use crate::catalog::Catalog;
use crate::progress::{ChapterKey, ChapterRecord, ProgressSnapshot};

/// Tasks tracked per chapter (revision, MCQs, PYQs).
pub const TASKS_PER_CHAPTER: u32 = 3;

/// Count of completed tasks for one chapter, 0..=3.
pub fn chapter_score(record: &ChapterRecord) -> u32 {
    [record.revision, record.mcq, record.pyq]
        .into_iter()
        .filter(|b| *b)
        .count() as u32
}

/// Integer percent for the per-row display, rounded to the nearest whole.
pub fn chapter_percent(record: &ChapterRecord) -> u32 {
    ((chapter_score(record) as f64 / TASKS_PER_CHAPTER as f64) * 100.0).round() as u32
}

/// Fraction of all tasks completed across the whole snapshot, in [0, 100].
/// An empty snapshot reads as 0, never a division by zero.
pub fn overall_percent(snapshot: &ProgressSnapshot) -> f64 {
    if snapshot.is_empty() {
        return 0.0;
    }
    let total_tasks = snapshot.len() as u32 * TASKS_PER_CHAPTER;
    let completed: u32 = snapshot.records().map(|(_, rec)| chapter_score(rec)).sum();
    (completed as f64 / total_tasks as f64) * 100.0
}

pub fn is_complete(snapshot: &ProgressSnapshot) -> bool {
    overall_percent(snapshot) >= 100.0
}

/// One row of the chapter list the UI renders for a (class, subject) pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRow {
    pub chapter: String,
    pub revision: bool,
    pub mcq: bool,
    pub pyq: bool,
    pub percent: u32,
    pub done: bool,
}

/// Chapter rows for one subject view, in catalog order. Fails if the pair is
/// unknown; a snapshot missing one of the pair's chapters is a broken load
/// invariant and fails too.
pub fn subject_rows(
    snapshot: &ProgressSnapshot,
    catalog: &Catalog,
    class: &str,
    subject: &str,
) -> anyhow::Result<Vec<ChapterRow>> {
    let chapters = catalog.chapters(class, subject)?;
    let mut rows = Vec::with_capacity(chapters.len());
    for chapter in chapters {
        let key = ChapterKey::new(class, subject, chapter);
        let record = snapshot
            .record(&key)
            .ok_or_else(|| anyhow::anyhow!("snapshot is missing {key}"))?;
        let score = chapter_score(record);
        rows.push(ChapterRow {
            chapter: chapter.to_string(),
            revision: record.revision,
            mcq: record.mcq,
            pyq: record.pyq,
            percent: chapter_percent(record),
            done: score == TASKS_PER_CHAPTER,
        });
    }
    Ok(rows)
}

/// The headline numbers for the progress bar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub total_chapters: usize,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub percent: f64,
    pub complete: bool,
}

pub fn overall_summary(snapshot: &ProgressSnapshot) -> OverallSummary {
    let total_chapters = snapshot.len();
    let total_tasks = total_chapters as u32 * TASKS_PER_CHAPTER;
    let completed_tasks: u32 = snapshot.records().map(|(_, rec)| chapter_score(rec)).sum();
    let percent = overall_percent(snapshot);
    OverallSummary {
        total_chapters,
        total_tasks,
        completed_tasks,
        // Two decimals is the display precision everywhere.
        percent: (percent * 100.0).round() / 100.0,
        complete: is_complete(snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{Flag, ProgressSnapshot};

    fn one_chapter_catalog() -> Catalog {
        Catalog::from_entries(&[("Class 9 (Foundation)", &[("Physics", &["Motion"])])])
    }

    #[test]
    fn chapter_score_and_percent_steps() {
        let mut rec = ChapterRecord::default();
        assert_eq!(chapter_score(&rec), 0);
        assert_eq!(chapter_percent(&rec), 0);

        rec.set(Flag::Revision, true);
        assert_eq!(chapter_score(&rec), 1);
        assert_eq!(chapter_percent(&rec), 33);

        rec.set(Flag::Mcq, true);
        assert_eq!(chapter_score(&rec), 2);
        assert_eq!(chapter_percent(&rec), 67);

        rec.set(Flag::Pyq, true);
        assert_eq!(chapter_score(&rec), 3);
        assert_eq!(chapter_percent(&rec), 100);
    }

    #[test]
    fn empty_snapshot_reads_zero() {
        let snapshot = ProgressSnapshot::default();
        assert_eq!(overall_percent(&snapshot), 0.0);
        assert!(!is_complete(&snapshot));
        let summary = overall_summary(&snapshot);
        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.percent, 0.0);
    }

    #[test]
    fn single_chapter_walkthrough() {
        let catalog = one_chapter_catalog();
        let mut snapshot = ProgressSnapshot::blank(&catalog);
        let key = ChapterKey::new("Class 9 (Foundation)", "Physics", "Motion");

        assert_eq!(overall_summary(&snapshot).percent, 0.0);

        snapshot.record_mut(&key).unwrap().set(Flag::Revision, true);
        let summary = overall_summary(&snapshot);
        assert_eq!(summary.completed_tasks, 1);
        assert_eq!(summary.percent, 33.33);
        assert!(!summary.complete);

        snapshot.record_mut(&key).unwrap().set(Flag::Mcq, true);
        snapshot.record_mut(&key).unwrap().set(Flag::Pyq, true);
        let summary = overall_summary(&snapshot);
        assert_eq!(summary.percent, 100.0);
        assert!(summary.complete);
        assert!(is_complete(&snapshot));
    }

    #[test]
    fn overall_percent_stays_in_range() {
        let catalog = Catalog::builtin();
        let blank = ProgressSnapshot::blank(&catalog);
        assert_eq!(overall_percent(&blank), 0.0);

        let mut half = blank.clone();
        for (i, key) in catalog.flatten().into_iter().enumerate() {
            if i % 2 == 0 {
                half.record_mut(&key).unwrap().set(Flag::Revision, true);
            }
        }
        let pct = overall_percent(&half);
        assert!(pct > 0.0 && pct < 100.0);

        let mut full = blank.clone();
        for key in catalog.flatten() {
            let rec = full.record_mut(&key).unwrap();
            rec.set(Flag::Revision, true);
            rec.set(Flag::Mcq, true);
            rec.set(Flag::Pyq, true);
        }
        assert_eq!(overall_percent(&full), 100.0);
        assert!(is_complete(&full));
    }

    #[test]
    fn subject_rows_follow_catalog_order() {
        let catalog = Catalog::builtin();
        let mut snapshot = ProgressSnapshot::blank(&catalog);
        let key = ChapterKey::new("Class 9 (Foundation)", "Physics", "Gravitation");
        let rec = snapshot.record_mut(&key).unwrap();
        rec.set(Flag::Revision, true);
        rec.set(Flag::Mcq, true);
        rec.set(Flag::Pyq, true);

        let rows = subject_rows(&snapshot, &catalog, "Class 9 (Foundation)", "Physics")
            .expect("known pair");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].chapter, "Motion");
        assert_eq!(rows[2].chapter, "Gravitation");
        assert!(rows[2].done);
        assert_eq!(rows[2].percent, 100);
        assert!(!rows[0].done);

        assert!(subject_rows(&snapshot, &catalog, "Class 9 (Foundation)", "Maths").is_err());
    }
}
