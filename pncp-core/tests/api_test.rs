//! HTTP tests for the import and export endpoints

use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use pncp::domain::{ItemDescription, PurchaseKey};
use pncp::server::app::{create_app, AppState};
use pncp::services::{DescricaoItensService, ItemCountSource};
use pncp_test_utils::db::insert_purchase;
use pncp_test_utils::fixtures::{item_rows, ods_bytes, xlsx_bytes, ITEM_HEADERS};
use pncp_test_utils::{FixedItemCount, TestDb, UnavailableItemCount};
use sea_orm::DatabaseConnection;
use serde_json::Value;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const IMPORT_URL: &str = "/pncp/importar_descricao_itens?cnpj=12.345.678/0001-95&sequencial=10&ano=2024";

struct TestApp {
    server: TestServer,
    db: DatabaseConnection,
    _test_db: TestDb,
}

async fn setup_test_app(item_counts: Arc<dyn ItemCountSource>) -> Result<TestApp> {
    let test_db = TestDb::new()?;
    let db = test_db.setup().await?;
    insert_purchase(&db, 10, 2024, Some("Material de limpeza"), Some(1500.5)).await?;

    let state = AppState::new(db.clone(), item_counts);
    let app = create_app(state, None, 1024 * 1024)?;
    let server = TestServer::new(app)?;

    Ok(TestApp {
        server,
        db,
        _test_db: test_db,
    })
}

fn upload(bytes: Vec<u8>, filename: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes).file_name(filename).mime_type(XLSX_MIME),
    )
}

fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["code"], code, "unexpected body {}", body);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(0))).await?;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "pncp");

    Ok(())
}

#[tokio::test]
async fn test_import_then_export_json() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(3))).await?;

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[3, 1, 2]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], "Arquivo importado com sucesso");
    assert_eq!(body["quantidade_itens"], 3);
    assert_eq!(body["itens_importados"], 3);

    let response = app
        .server
        .get("/pncp/dados?ano=2024&cnpj=12345678000195")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let rows: Vec<Value> = response.json();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["sequencial_compra"], 10);
    assert_eq!(rows[0]["objeto"], "Material de limpeza");
    assert_eq!(rows[0]["valor_total_estimado"], 1500.5);

    Ok(())
}

#[tokio::test]
async fn test_import_accepts_ods() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(2))).await?;

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(ods_bytes(&ITEM_HEADERS, &item_rows(&[1, 2]))?, "ITENS.ODS"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_gap_in_sequence_is_rejected() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(3))).await?;

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1, 3]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_error(&body, "MISSING_ITEMS");
    assert_eq!(body["detail"], "Itens faltando na sequência: 2");

    // nothing was written, so the export has no rows
    let response = app.server.get("/pncp/dados?ano=2024&cnpj=12345678000195").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_more_rows_than_expected_is_rejected() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(2))).await?;

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1, 2, 3]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error(&response.json(), "TOO_MANY_ITEMS");

    Ok(())
}

#[tokio::test]
async fn test_missing_column_is_reported() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let headers = ["item", "catalogo", "descricao"];
    let rows = item_rows(&[1])
        .into_iter()
        .map(|mut row| {
            row.truncate(3);
            row
        })
        .collect::<Vec<_>>();

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(xlsx_bytes(&headers, &rows)?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_error(&body, "SCHEMA_VIOLATION");
    assert_eq!(body["detail"], "Colunas obrigatórias faltando: descricao_detalhada");

    Ok(())
}

#[tokio::test]
async fn test_unsupported_extension_after_count_lookup() -> Result<()> {
    let counts = Arc::new(FixedItemCount::new(1));
    let app = setup_test_app(counts.clone()).await?;

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(b"item,catalogo\n1,2\n".to_vec(), "itens.csv"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error(&response.json(), "UNSUPPORTED_FILE");
    assert_eq!(counts.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_invalid_cnpj_fails_before_upstream_call() -> Result<()> {
    let counts = Arc::new(FixedItemCount::new(1));
    let app = setup_test_app(counts.clone()).await?;

    let response = app
        .server
        .post("/pncp/importar_descricao_itens?cnpj=123&sequencial=10&ano=2024")
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_error(&body, "VALIDATION_ERROR");
    assert_eq!(body["detail"], "CNPJ deve ter 14 dígitos");
    assert_eq!(counts.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_out_of_range_year_is_rejected() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let response = app
        .server
        .post("/pncp/importar_descricao_itens?cnpj=12345678000195&sequencial=10&ano=1899")
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error(&response.json(), "VALIDATION_ERROR");

    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_is_bad_request() -> Result<()> {
    let app = setup_test_app(Arc::new(UnavailableItemCount)).await?;

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error(&response.json(), "UPSTREAM_UNAVAILABLE");

    Ok(())
}

#[tokio::test]
async fn test_unknown_purchase_is_bad_request() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let response = app
        .server
        .post("/pncp/importar_descricao_itens?cnpj=12345678000195&sequencial=77&ano=2024")
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error(&response.json(), "PURCHASE_NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_dataset_downloads_carry_filenames() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;
    let response = app
        .server
        .post("/pncp/importar_descricao_itens?cnpj=00394502000144&sequencial=10&ano=2024")
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    for (formato, content_type) in [
        ("xlsx", XLSX_MIME),
        ("csv", "text/csv"),
        ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ] {
        let response = app
            .server
            .get(&format!("/pncp/dados?ano=2024&formato={}", formato))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("content-type"), content_type);
        assert_eq!(
            response.header("content-disposition"),
            format!("attachment; filename=pncp_00394502000144_2024.{}", formato).as_str()
        );
        assert!(!response.as_bytes().is_empty());
    }

    Ok(())
}

#[tokio::test]
async fn test_unknown_format_is_rejected() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let response = app.server.get("/pncp/dados?ano=2024&formato=pdf").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error(&response.json(), "VALIDATION_ERROR");

    Ok(())
}

#[tokio::test]
async fn test_export_without_data_is_not_found() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let response = app.server.get("/pncp/dados?ano=2024").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_error(&response.json(), "NO_DATA_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_zip_download() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let response = app.server.get("/pncp/10/2024/zip").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "application/zip");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=pncp_10_2024.zip"
    );

    let bytes = response.as_bytes().to_vec();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names, vec!["pncp_10_2024.docx"]);

    Ok(())
}

#[tokio::test]
async fn test_zip_for_unknown_record_is_not_found() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let response = app.server.get("/pncp/10/2023/zip").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_error(&response.json(), "RECORD_NOT_FOUND");

    let response = app.server.get("/pncp/0/2024/zip").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_reupload_keeps_descriptions_of_other_items() -> Result<()> {
    let app = setup_test_app(Arc::new(FixedItemCount::new(1))).await?;

    let key = PurchaseKey::new("12345678000195", 10, 2024)?;
    let service = DescricaoItensService::new(app.db.clone());
    let existing = |item: i32, descricao: &str| ItemDescription {
        item,
        catalogo: None,
        descricao: Some(descricao.to_string()),
        descricao_detalhada: None,
    };
    service
        .replace_items(&key, &[existing(1, "Antigo"), existing(2, "Mantido")])
        .await?;

    let response = app
        .server
        .post(IMPORT_URL)
        .multipart(upload(xlsx_bytes(&ITEM_HEADERS, &item_rows(&[1]))?, "itens.xlsx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let stored: Vec<_> = service
        .list_items(&key)
        .await?
        .into_iter()
        .map(|row| (row.item, row.descricao))
        .collect();
    assert_eq!(
        stored,
        vec![
            (1, Some("Item 1".to_string())),
            (2, Some("Mantido".to_string())),
        ]
    );

    Ok(())
}
