use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::{Cnpj, DEFAULT_CNPJ};
use crate::errors::{PncpError, PncpResult};

pub mod to_csv;
pub mod to_docx;
pub mod to_ods;
pub mod to_xlsx;
pub mod to_zip;

/// A normalized column value, serializable to every output format
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            // whole floats keep their decimal point, as in the JSON output
            FieldValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e16 => format!("{:.1}", f),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

static NULL_FIELD: FieldValue = FieldValue::Null;

/// One row keyed by column name, in query column order
pub type Record = IndexMap<String, FieldValue>;

/// Rows of one query, all sharing the same column set
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl RecordSet {
    pub fn from_records(rows: Vec<Record>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Cells of `row` in column order; columns missing from the row read as null
    pub fn cells<'a>(&'a self, row: &'a Record) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.columns
            .iter()
            .map(move |column| row.get(column).unwrap_or(&NULL_FIELD))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Xlsx,
    Csv,
    Ods,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Ods => "ods",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv",
            ExportFormat::Ods => "application/vnd.oasis.opendocument.spreadsheet",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PncpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "ods" => Ok(ExportFormat::Ods),
            other => Err(PncpError::Validation(format!(
                "Formato não suportado: {} (use json, xlsx, csv ou ods)",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered file ready to be sent as an attachment
#[derive(Clone, Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// `pncp_{cnpj}_{ano}.{ext}`, falling back to the default organization
pub fn dataset_filename(cnpj: Option<&Cnpj>, ano: i32, format: ExportFormat) -> String {
    let organization = cnpj.map(Cnpj::as_str).unwrap_or(DEFAULT_CNPJ);
    format!("pncp_{}_{}.{}", organization, ano, format.extension())
}

pub fn record_basename(sequencial: i64, ano: i32) -> String {
    format!("pncp_{}_{}", sequencial, ano)
}

pub fn render(records: &RecordSet, format: ExportFormat) -> PncpResult<Vec<u8>> {
    match format {
        ExportFormat::Json => serde_json::to_vec(&records.rows)
            .map_err(|e| PncpError::Export(e.to_string())),
        ExportFormat::Xlsx => to_xlsx::render(records),
        ExportFormat::Csv => to_csv::render(records),
        ExportFormat::Ods => to_ods::render(records),
    }
}

pub fn dataset_export(
    records: &RecordSet,
    cnpj: Option<&Cnpj>,
    ano: i32,
    format: ExportFormat,
) -> PncpResult<ExportFile> {
    let bytes = render(records, format)?;
    tracing::debug!("Rendered {} rows as {} ({} bytes)", records.len(), format, bytes.len());

    Ok(ExportFile {
        filename: dataset_filename(cnpj, ano, format),
        content_type: format.content_type(),
        bytes,
    })
}

/// One record as a DOCX report, wrapped in a zip archive
pub fn record_archive(record: &Record, sequencial: i64, ano: i32) -> PncpResult<ExportFile> {
    let basename = record_basename(sequencial, ano);
    let docx = to_docx::render(record, &to_docx::document_title(sequencial, ano))?;
    let bytes = to_zip::bundle(&format!("{}.docx", basename), &docx)?;

    Ok(ExportFile {
        filename: format!("{}.zip", basename),
        content_type: ZIP_CONTENT_TYPE,
        bytes,
    })
}
