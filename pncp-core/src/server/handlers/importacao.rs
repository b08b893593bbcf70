use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::domain::{ImportSummary, PurchaseKey};
use crate::errors::{PncpError, PncpResult};
use crate::server::app::AppState;
use crate::services::{
    parse_spreadsheet, validate_items, DescricaoItensService, SpreadsheetKind,
};

pub const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ImportParams {
    pub cnpj: String,
    pub sequencial: i64,
    pub ano: i32,
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> PncpResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PncpError::Validation(format!("Requisição multipart inválida: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| PncpError::Validation(format!("Falha ao ler arquivo enviado: {}", e)))?
            .to_vec();
        return Ok(Upload { filename, bytes });
    }

    Err(PncpError::Validation(format!(
        "Campo '{}' com a planilha não foi enviado",
        FILE_FIELD
    )))
}

/// `POST /pncp/importar_descricao_itens?cnpj=&sequencial=&ano=`
pub async fn importar_descricao_itens(
    State(state): State<AppState>,
    params: Result<Query<ImportParams>, QueryRejection>,
    mut multipart: Multipart,
) -> PncpResult<Json<ImportSummary>> {
    let Query(params) = params.map_err(|e| PncpError::Validation(e.body_text()))?;
    let key = PurchaseKey::new(&params.cnpj, params.sequencial, params.ano)?;

    let upload = read_upload(&mut multipart).await?;
    tracing::info!(
        "Import of '{}' ({} bytes) requested for purchase {}",
        upload.filename,
        upload.bytes.len(),
        key
    );

    let expected = state.item_counts.fetch_item_count(&key).await?;

    let kind = SpreadsheetKind::from_filename(&upload.filename)?;
    let table = parse_spreadsheet(&upload.bytes, kind)?;
    let rows = validate_items(&table, expected)?;

    let service = DescricaoItensService::new(state.db.clone());
    let summary = service.replace_items(&key, &rows).await?;

    Ok(Json(summary))
}
