pub mod dados;
pub mod health;
pub mod importacao;

use axum::http::{header, HeaderMap, HeaderValue};

use crate::errors::{PncpError, PncpResult};
use crate::export::ExportFile;

/// Headers for a file returned as a download
pub(crate) fn attachment_headers(file: &ExportFile) -> PncpResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(file.content_type));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename={}", file.filename))
            .map_err(|e| PncpError::Export(e.to_string()))?,
    );
    Ok(headers)
}
