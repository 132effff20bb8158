use crate::catalog::Catalog;
use crate::progress::{FlagEdit, ProgressSnapshot};
use crate::store::ProgressStore;

/// Apply one render cycle's batch of toggles against the durable store.
///
/// An edit naming a triple outside the catalog fails the whole batch before
/// anything is applied — that only happens when the caller feeds stale
/// selections. Equal-value edits are skipped; if anything actually changed,
/// the working copy is persisted with exactly one save. Callers must keep
/// rendering from the returned snapshot, never the one they passed in.
pub fn reconcile(
    store: &mut ProgressStore,
    catalog: &Catalog,
    snapshot: &ProgressSnapshot,
    edits: &[FlagEdit],
) -> anyhow::Result<(ProgressSnapshot, bool)> {
    for edit in edits {
        if !catalog.contains(&edit.key) {
            anyhow::bail!("not in the catalog: {}", edit.key);
        }
    }

    let mut working = snapshot.clone();
    let mut changed = false;
    for edit in edits {
        let record = working
            .record_mut(&edit.key)
            .ok_or_else(|| anyhow::anyhow!("snapshot is missing {}", edit.key))?;
        if record.get(edit.flag) != edit.value {
            record.set(edit.flag, edit.value);
            changed = true;
        }
    }

    if changed {
        store.save(&working)?;
    }
    Ok((working, changed))
}
