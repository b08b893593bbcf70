//! Error types for the PNCP import and export pipeline
//!
//! Every failure the service can report is a [`PncpError`] variant. The HTTP
//! layer turns them into `{"detail", "code"}` bodies using
//! [`PncpError::status_code`] and [`PncpError::error_code`].
//!
//! # Examples
//!
//! ```rust
//! use pncp::errors::PncpError;
//!
//! let err = PncpError::MissingItems(vec![2, 5]);
//! assert_eq!(err.to_string(), "Itens faltando na sequência: 2, 5");
//! assert!(err.is_client_error());
//! assert_eq!(err.error_code(), "MISSING_ITEMS");
//! ```

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type PncpResult<T> = Result<T, PncpError>;

#[derive(Error, Debug)]
pub enum PncpError {
    /// Malformed request parameter, rejected before any I/O
    #[error("{0}")]
    Validation(String),

    /// Uploaded file is neither `.xlsx` nor `.ods`
    #[error("Arquivo deve ser .xlsx ou .ods: {0}")]
    UnsupportedFile(String),

    #[error("Colunas obrigatórias faltando: {}", .0.join(", "))]
    SchemaViolation(Vec<String>),

    #[error("Arquivo contém mais itens ({actual}) do que o permitido ({allowed})")]
    TooManyItems { actual: usize, allowed: u32 },

    #[error("Itens faltando na sequência: {}", join_numbers(.0))]
    MissingItems(Vec<i64>),

    /// `item` cell that cannot be read as an integer; `row` is the 1-based sheet row
    #[error("Valor inválido na coluna item (linha {row}): {value}")]
    InvalidItemNumber { row: usize, value: String },

    /// Workbook could not be decoded
    #[error("Erro ao ler planilha: {0}")]
    Spreadsheet(String),

    #[error("Erro ao consultar API do PNCP: {0}")]
    UpstreamUnavailable(String),

    #[error("Compra não encontrada na base de dados (sequencial {sequencial}, ano {ano})")]
    PurchaseNotFound { sequencial: i64, ano: i32 },

    #[error("Nenhum dado encontrado para o CNPJ e ano informados")]
    NoDataFound,

    #[error("Registro não encontrado (sequencial {sequencial}, ano {ano})")]
    RecordNotFound { sequencial: i64, ano: i32 },

    /// Serializing a result set into an output format failed
    #[error("Erro ao gerar arquivo: {0}")]
    Export(String),

    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sea_orm::DbErr),
}

fn join_numbers(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PncpError {
    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PncpError::NoDataFound | PncpError::RecordNotFound { .. }
        )
    }

    /// Every other failure, infrastructure included, is reported to the caller as a 400
    pub fn is_client_error(&self) -> bool {
        !self.is_not_found()
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PncpError::Validation(_) => "VALIDATION_ERROR",
            PncpError::UnsupportedFile(_) => "UNSUPPORTED_FILE",
            PncpError::SchemaViolation(_) => "SCHEMA_VIOLATION",
            PncpError::TooManyItems { .. } => "TOO_MANY_ITEMS",
            PncpError::MissingItems(_) => "MISSING_ITEMS",
            PncpError::InvalidItemNumber { .. } => "INVALID_ITEM_NUMBER",
            PncpError::Spreadsheet(_) => "SPREADSHEET_ERROR",
            PncpError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            PncpError::PurchaseNotFound { .. } => "PURCHASE_NOT_FOUND",
            PncpError::NoDataFound => "NO_DATA_FOUND",
            PncpError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            PncpError::Export(_) => "EXPORT_FAILED",
            PncpError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<csv::Error> for PncpError {
    fn from(err: csv::Error) -> Self {
        PncpError::Export(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for PncpError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        PncpError::Export(err.to_string())
    }
}

impl From<zip::result::ZipError> for PncpError {
    fn from(err: zip::result::ZipError) -> Self {
        PncpError::Export(err.to_string())
    }
}

impl From<quick_xml::Error> for PncpError {
    fn from(err: quick_xml::Error) -> Self {
        PncpError::Export(err.to_string())
    }
}

impl From<std::io::Error> for PncpError {
    fn from(err: std::io::Error) -> Self {
        PncpError::Export(err.to_string())
    }
}
