use axum::body::Body;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::{validate_ano, validate_sequencial, Cnpj};
use crate::errors::{PncpError, PncpResult};
use crate::export::{self, ExportFormat};
use crate::server::app::AppState;
use crate::services::ProcurementQueryService;

use super::attachment_headers;

#[derive(Debug, Deserialize)]
pub struct DadosParams {
    pub ano: i32,
    pub cnpj: Option<String>,
    pub formato: Option<String>,
}

/// `GET /pncp/dados?ano=&cnpj=&formato=`
pub async fn get_dados(
    State(state): State<AppState>,
    params: Result<Query<DadosParams>, QueryRejection>,
) -> PncpResult<Response> {
    let Query(params) = params.map_err(|e| PncpError::Validation(e.body_text()))?;

    let ano = validate_ano(params.ano)?;
    let cnpj = match params.cnpj.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(Cnpj::parse(raw)?),
        _ => None,
    };
    let format = match params.formato.as_deref() {
        Some(raw) => raw.parse::<ExportFormat>()?,
        None => ExportFormat::default(),
    };

    let service = ProcurementQueryService::new(state.db.clone());
    let records = service.fetch_by_organization(cnpj.as_ref(), ano).await?;
    let file = export::dataset_export(&records, cnpj.as_ref(), ano, format)?;

    if format == ExportFormat::Json {
        let content_type = HeaderValue::from_static(file.content_type);
        return Ok(([(header::CONTENT_TYPE, content_type)], Body::from(file.bytes)).into_response());
    }

    tracing::info!("Sending {} with {} rows", file.filename, records.len());
    let headers = attachment_headers(&file)?;
    Ok((headers, file.bytes).into_response())
}

/// `GET /pncp/:sequencial/:ano/zip`
pub async fn get_zip(
    State(state): State<AppState>,
    path: Result<Path<(i64, i32)>, PathRejection>,
) -> PncpResult<Response> {
    let Path((sequencial, ano)) = path.map_err(|e| PncpError::Validation(e.body_text()))?;
    let sequencial = validate_sequencial(sequencial)?;
    let ano = validate_ano(ano)?;

    let service = ProcurementQueryService::new(state.db.clone());
    let record = service.fetch_record(sequencial, ano).await?;
    let file = export::record_archive(&record, sequencial, ano)?;

    tracing::info!("Sending {} ({} bytes)", file.filename, file.bytes.len());
    let headers = attachment_headers(&file)?;
    Ok((headers, file.bytes).into_response())
}
