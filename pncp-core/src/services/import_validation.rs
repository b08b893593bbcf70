use std::collections::BTreeSet;

use calamine::Data;

use crate::domain::ItemDescription;
use crate::errors::{PncpError, PncpResult};
use crate::services::spreadsheet::{cell_to_text, SheetRow, SheetTable};

pub const COLUMN_ITEM: &str = "item";
pub const COLUMN_CATALOGO: &str = "catalogo";
pub const COLUMN_DESCRICAO: &str = "descricao";
pub const COLUMN_DESCRICAO_DETALHADA: &str = "descricao_detalhada";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    COLUMN_ITEM,
    COLUMN_CATALOGO,
    COLUMN_DESCRICAO,
    COLUMN_DESCRICAO_DETALHADA,
];

static EMPTY_CELL: Data = Data::Empty;

struct ColumnLayout {
    item: usize,
    catalogo: usize,
    descricao: usize,
    descricao_detalhada: usize,
}

impl ColumnLayout {
    fn resolve(table: &SheetTable) -> PncpResult<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| table.column_index(column).is_none())
            .map(|column| column.to_string())
            .collect();

        match (
            table.column_index(COLUMN_ITEM),
            table.column_index(COLUMN_CATALOGO),
            table.column_index(COLUMN_DESCRICAO),
            table.column_index(COLUMN_DESCRICAO_DETALHADA),
        ) {
            (Some(item), Some(catalogo), Some(descricao), Some(descricao_detalhada)) => Ok(Self {
                item,
                catalogo,
                descricao,
                descricao_detalhada,
            }),
            _ => Err(PncpError::SchemaViolation(missing)),
        }
    }

    fn read_row(&self, row: &SheetRow) -> PncpResult<ItemDescription> {
        let cell = |idx: usize| row.cells.get(idx).unwrap_or(&EMPTY_CELL);

        Ok(ItemDescription {
            item: coerce_item(cell(self.item), row.number)?,
            catalogo: cell_to_text(cell(self.catalogo)),
            descricao: cell_to_text(cell(self.descricao)),
            descricao_detalhada: cell_to_text(cell(self.descricao_detalhada)),
        })
    }
}

fn coerce_item(cell: &Data, row: usize) -> PncpResult<i32> {
    let invalid = || PncpError::InvalidItemNumber {
        row,
        value: cell_to_text(cell).unwrap_or_default(),
    };

    let value: i64 = match cell {
        Data::Int(i) => *i,
        Data::Float(f) if f.fract() == 0.0 => *f as i64,
        Data::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(v) => v,
                Err(_) => match trimmed.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 => f as i64,
                    _ => return Err(invalid()),
                },
            }
        }
        _ => return Err(invalid()),
    };

    i32::try_from(value).map_err(|_| invalid())
}

/// Checks an uploaded sheet against the expected item count `expected`.
///
/// Rules run in order and the first failure wins: required columns, row count
/// bound, then completeness of the `1..=expected` sequence. Repeated item
/// numbers are accepted as long as no number is missing.
pub fn validate_items(table: &SheetTable, expected: u32) -> PncpResult<Vec<ItemDescription>> {
    let layout = ColumnLayout::resolve(table)?;

    if table.len() > expected as usize {
        return Err(PncpError::TooManyItems {
            actual: table.len(),
            allowed: expected,
        });
    }

    let items = table
        .rows
        .iter()
        .map(|row| layout.read_row(row))
        .collect::<PncpResult<Vec<_>>>()?;

    let present: BTreeSet<i64> = items.iter().map(|row| i64::from(row.item)).collect();
    let missing: Vec<i64> = (1..=i64::from(expected))
        .filter(|n| !present.contains(n))
        .collect();

    if !missing.is_empty() {
        return Err(PncpError::MissingItems(missing));
    }

    tracing::debug!("Validated {} item rows against {} expected", items.len(), expected);
    Ok(items)
}
