use sea_orm::sea_query::Expr;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Schema, Statement, Value,
};
use tempfile::NamedTempFile;

use pncp::database::entities::descricao_itens;

/// `pncp` is owned by another system; tests recreate its key columns plus a
/// few opaque ones to exercise dynamic-column export.
const PNCP_TABLE_DDL: &str = "CREATE TABLE pncp (
    sequencial_compra INTEGER NOT NULL,
    ano_compra INTEGER NOT NULL,
    objeto TEXT,
    valor_total_estimado REAL,
    data_publicacao TEXT,
    PRIMARY KEY (sequencial_compra, ano_compra)
)";

/// SQLite database in a temporary file, removed when dropped
pub struct TestDb {
    _file: NamedTempFile,
    url: String,
}

impl TestDb {
    pub fn new() -> anyhow::Result<Self> {
        let file = NamedTempFile::new()?;
        let url = format!("sqlite://{}?mode=rwc", file.path().display());
        Ok(Self { _file: file, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        Database::connect(&self.url).await
    }

    /// Connect and create both tables; `pncp_descricao_itens` rejects `item <= 0`
    pub async fn setup(&self) -> Result<DatabaseConnection, DbErr> {
        let db = self.connect().await?;
        create_schema(&db).await?;
        Ok(db)
    }
}

pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    db.execute_unprepared(PNCP_TABLE_DDL).await?;

    let schema = Schema::new(backend);
    let mut descricoes = schema.create_table_from_entity(descricao_itens::Entity);
    // item numbers are positive; a non-positive one makes an insert fail mid-batch
    descricoes.check(Expr::col(descricao_itens::Column::Item).gt(0));
    db.execute(backend.build(&descricoes)).await?;
    Ok(())
}

pub async fn insert_purchase(
    db: &DatabaseConnection,
    sequencial: i64,
    ano: i32,
    objeto: Option<&str>,
    valor_total_estimado: Option<f64>,
) -> Result<(), DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "INSERT INTO pncp (sequencial_compra, ano_compra, objeto, valor_total_estimado, data_publicacao) VALUES (?, ?, ?, ?, ?)",
        [
            Value::from(sequencial),
            Value::from(ano),
            Value::from(objeto.map(str::to_string)),
            Value::from(valor_total_estimado),
            Value::from(format!("{}-03-15", ano)),
        ],
    );
    db.execute(stmt).await?;
    Ok(())
}
