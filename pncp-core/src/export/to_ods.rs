use icu_locid::locale;
use spreadsheet_ods::{Sheet, Value, WorkBook};

use super::{FieldValue, RecordSet};
use crate::errors::{PncpError, PncpResult};

pub const SHEET_NAME: &str = "pncp";

pub fn render(records: &RecordSet) -> PncpResult<Vec<u8>> {
    let mut workbook = WorkBook::new(locale!("pt_BR"));
    let mut sheet = Sheet::new(SHEET_NAME);

    for (col_idx, column) in records.columns.iter().enumerate() {
        sheet.set_value(0, col_idx as u32, Value::Text(column.clone()));
    }

    for (row_idx, row) in records.rows.iter().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        for (col_idx, cell) in records.cells(row).enumerate() {
            let value = match cell {
                FieldValue::Null => continue,
                FieldValue::Bool(b) => Value::Boolean(*b),
                FieldValue::Integer(i) => Value::Number(*i as f64),
                FieldValue::Float(f) => Value::Number(*f),
                FieldValue::Text(s) => Value::Text(s.clone()),
            };
            sheet.set_value(sheet_row, col_idx as u32, value);
        }
    }

    workbook.push_sheet(sheet);

    spreadsheet_ods::write_ods_buf(&mut workbook, Vec::new())
        .map_err(|e| PncpError::Export(format!("Falha ao gerar ODS: {}", e)))
}
