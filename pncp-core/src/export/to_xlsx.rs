use rust_xlsxwriter::{Format, Workbook};

use super::{FieldValue, RecordSet};
use crate::errors::PncpResult;

pub const SHEET_NAME: &str = "pncp";

/// Single sheet: bold header row followed by one row per record
pub fn render(records: &RecordSet) -> PncpResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col_idx, column) in records.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, column, &header_format)?;
    }

    for (row_idx, row) in records.rows.iter().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        for (col_idx, cell) in records.cells(row).enumerate() {
            let col = col_idx as u16;
            match cell {
                FieldValue::Null => {}
                FieldValue::Bool(b) => {
                    worksheet.write_boolean(sheet_row, col, *b)?;
                }
                FieldValue::Integer(i) => {
                    worksheet.write_number(sheet_row, col, *i as f64)?;
                }
                FieldValue::Float(f) => {
                    worksheet.write_number(sheet_row, col, *f)?;
                }
                FieldValue::Text(s) => {
                    worksheet.write_string(sheet_row, col, s)?;
                }
            }
        }
    }

    tracing::debug!("Wrote {} rows to sheet {}", records.len(), SHEET_NAME);
    Ok(workbook.save_to_buffer()?)
}
