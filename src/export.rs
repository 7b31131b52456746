use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::record::CommitteeRecord;

pub const COMMITTEE_LIST_FILE: &str = "committee_list.txt";
pub const TABLE_FILE: &str = "committees.csv";

/// Committee names in discovery order, one per line.
pub fn write_committee_list<W: Write>(mut w: W, records: &[CommitteeRecord]) -> io::Result<()> {
    for record in records {
        writeln!(w, "{}", record.meta.name)?;
    }
    Ok(())
}

/// Header row plus one 13-cell row per committee. Absent fields are empty cells.
pub fn write_table<W: Write>(mut w: W, records: &[CommitteeRecord], sep: char) -> io::Result<()> {
    let header: Vec<Option<&str>> = CommitteeRecord::COLUMNS.iter().copied().map(Some).collect();
    write_row(&mut w, &header, sep)?;
    for record in records {
        write_row(&mut w, &record.cells(), sep)?;
    }
    Ok(())
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, cells: &[Option<&str>], sep: char) -> io::Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", sep)?;
        }
        let cell = cell.unwrap_or("");
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Write both artifacts into `dir`.
pub fn save(dir: &Path, records: &[CommitteeRecord], sep: char) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let list_path = dir.join(COMMITTEE_LIST_FILE);
    let mut list = BufWriter::new(
        File::create(&list_path).with_context(|| format!("Failed to create {}", list_path.display()))?,
    );
    write_committee_list(&mut list, records)?;
    list.flush()?;

    let table_path = dir.join(TABLE_FILE);
    let mut table = BufWriter::new(
        File::create(&table_path).with_context(|| format!("Failed to create {}", table_path.display()))?,
    );
    write_table(&mut table, records, sep)?;
    table.flush()?;

    info!(
        "Wrote {} committees to {} and {}",
        records.len(),
        list_path.display(),
        table_path.display()
    );
    Ok(())
}

// ── Tests ──
