use std::io::{Cursor, Write};

use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use crate::errors::PncpResult;

/// Store one file in a fresh deflated archive
pub fn bundle(entry_name: &str, bytes: &[u8]) -> PncpResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(entry_name, options)?;
        zip.write_all(bytes)?;
        zip.finish()?;
    }
    Ok(cursor.into_inner())
}
