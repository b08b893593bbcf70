use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook_from_rs, Data, Ods, Range, Reader, Xlsx};

use crate::errors::{PncpError, PncpResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpreadsheetKind {
    Xlsx,
    Ods,
}

impl SpreadsheetKind {
    pub fn from_filename(filename: &str) -> PncpResult<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".xlsx") {
            Ok(SpreadsheetKind::Xlsx)
        } else if lower.ends_with(".ods") {
            Ok(SpreadsheetKind::Ods)
        } else {
            Err(PncpError::UnsupportedFile(filename.to_string()))
        }
    }
}

/// One data line of the sheet; `number` is the 1-based row as shown by spreadsheet tools
#[derive(Clone, Debug, PartialEq)]
pub struct SheetRow {
    pub number: usize,
    pub cells: Vec<Data>,
}

/// First worksheet of a workbook: header names plus the non-blank data rows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl SheetTable {
    pub fn from_range(range: &Range<Data>) -> Self {
        let offset = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut lines = range.rows().enumerate();

        let headers = match lines.next() {
            Some((_, header)) => header
                .iter()
                .map(|cell| cell_to_text(cell).unwrap_or_default())
                .collect(),
            None => return Self::default(),
        };

        let rows = lines
            .filter(|(_, cells)| cells.iter().any(|cell| cell_to_text(cell).is_some()))
            .map(|(idx, cells)| SheetRow {
                number: offset + idx + 1,
                cells: cells.to_vec(),
            })
            .collect();

        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a cell as trimmed text; blank cells yield `None`
pub fn cell_to_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // catalog codes typed as numbers come back as floats
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn first_sheet<RS, R>(workbook: &mut R) -> PncpResult<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
{
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(PncpError::Spreadsheet(format!("{:?}", e))),
        None => Err(PncpError::Spreadsheet("arquivo não contém planilhas".to_string())),
    }
}

pub fn parse_spreadsheet(bytes: &[u8], kind: SpreadsheetKind) -> PncpResult<SheetTable> {
    tracing::debug!("Parsing {:?} upload with {} bytes", kind, bytes.len());

    let cursor = Cursor::new(bytes);
    let range = match kind {
        SpreadsheetKind::Xlsx => {
            let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor).map_err(|e| {
                tracing::error!("Failed to open XLSX: {:?}", e);
                PncpError::Spreadsheet(format!("{:?}", e))
            })?;
            first_sheet(&mut workbook)?
        }
        SpreadsheetKind::Ods => {
            let mut workbook: Ods<_> = open_workbook_from_rs(cursor).map_err(|e| {
                tracing::error!("Failed to open ODS: {:?}", e);
                PncpError::Spreadsheet(format!("{:?}", e))
            })?;
            first_sheet(&mut workbook)?
        }
    };

    let table = SheetTable::from_range(&range);
    tracing::info!(
        "Parsed sheet with {} columns and {} data rows",
        table.headers.len(),
        table.len()
    );
    Ok(table)
}
