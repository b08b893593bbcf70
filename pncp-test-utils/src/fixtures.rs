use icu_locid::locale;
use rust_xlsxwriter::Workbook;
use spreadsheet_ods::{Sheet, Value, WorkBook};

pub const ITEM_HEADERS: [&str; 4] = ["item", "catalogo", "descricao", "descricao_detalhada"];

#[derive(Clone, Debug)]
pub enum SheetCell {
    Number(f64),
    Text(String),
    Empty,
}

impl From<&str> for SheetCell {
    fn from(value: &str) -> Self {
        SheetCell::Text(value.to_string())
    }
}

impl From<f64> for SheetCell {
    fn from(value: f64) -> Self {
        SheetCell::Number(value)
    }
}

/// One complete row per item number, in the order given
pub fn item_rows(items: &[i64]) -> Vec<Vec<SheetCell>> {
    items
        .iter()
        .map(|item| {
            vec![
                SheetCell::Number(*item as f64),
                SheetCell::Number(447850.0 + *item as f64),
                SheetCell::Text(format!("Item {}", item)),
                SheetCell::Text(format!("Descrição detalhada do item {}", item)),
            ]
        })
        .collect()
}

pub fn xlsx_bytes(headers: &[&str], rows: &[Vec<SheetCell>]) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                SheetCell::Number(n) => {
                    worksheet.write_number(sheet_row, col as u16, *n)?;
                }
                SheetCell::Text(s) => {
                    worksheet.write_string(sheet_row, col as u16, s)?;
                }
                SheetCell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn ods_bytes(headers: &[&str], rows: &[Vec<SheetCell>]) -> anyhow::Result<Vec<u8>> {
    let mut workbook = WorkBook::new(locale!("pt_BR"));
    let mut sheet = Sheet::new("itens");

    for (col, header) in headers.iter().enumerate() {
        sheet.set_value(0, col as u32, Value::Text(header.to_string()));
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let value = match cell {
                SheetCell::Number(n) => Value::Number(*n),
                SheetCell::Text(s) => Value::Text(s.clone()),
                SheetCell::Empty => continue,
            };
            sheet.set_value((row_idx + 1) as u32, col as u32, value);
        }
    }
    workbook.push_sheet(sheet);

    spreadsheet_ods::write_ods_buf(&mut workbook, Vec::new())
        .map_err(|e| anyhow::anyhow!("failed to write ods: {}", e))
}
