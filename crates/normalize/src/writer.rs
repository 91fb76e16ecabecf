use memorie_core::write_atomic;
use std::io::{self, Write};
use std::path::Path;

use crate::error::NormalizeError;
use crate::table::Table;

/// Header row then one record per table row; no index column.
pub fn write_csv<W: Write>(table: &Table, out: W) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b',').from_writer(out);
    writer.write_record(&table.columns)?;
    for row in 0..table.len() {
        writer.write_record(table.cells(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write to a temp file beside `path`, then rename over it. A failed write
/// leaves any existing file at `path` untouched.
pub fn write_csv_atomic(table: &Table, path: &Path) -> Result<(), NormalizeError> {
    write_atomic(path, |file| write_csv(table, file).map_err(io::Error::from)).map_err(|source| {
        NormalizeError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}
