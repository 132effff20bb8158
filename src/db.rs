use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the sheet workbook for a workspace. The whole backend is
/// one `progress` table, one row per chapter, keyed by the label triple —
/// the same shape as the spreadsheet it stands in for.
pub fn open_sheet(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("tracker.sqlite3");
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS progress(
            class TEXT NOT NULL,
            subject TEXT NOT NULL,
            chapter TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            mcq INTEGER NOT NULL DEFAULT 0,
            pyq INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY(class, subject, chapter)
        )",
        [],
    )?;
    Ok(())
}
