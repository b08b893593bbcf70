//! Import of PNCP item descriptions from spreadsheets and export of the
//! stored procurement data as JSON, XLSX, ODS, CSV or a zipped DOCX report.

pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod export;
pub mod server;
pub mod services;

pub use errors::{PncpError, PncpResult};
