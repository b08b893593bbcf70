use sea_orm::sea_query::{Asterisk, Order, Query, SelectStatement};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, FromQueryResult, JsonValue};

use crate::database::entities::{compras, descricao_itens};
use crate::domain::Cnpj;
use crate::errors::{PncpError, PncpResult};
use crate::export::{FieldValue, Record, RecordSet};

/// Reads procurement rows with their full, schema-defined column set
pub struct ProcurementQueryService {
    db: DatabaseConnection,
}

impl ProcurementQueryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Purchases of year `ano` that have item descriptions for the organization.
    ///
    /// Without a CNPJ the default organization is used. Rows come back ordered by
    /// `sequencial_compra`; an empty result is [`PncpError::NoDataFound`].
    pub async fn fetch_by_organization(
        &self,
        cnpj: Option<&Cnpj>,
        ano: i32,
    ) -> PncpResult<RecordSet> {
        let organization = cnpj.cloned().unwrap_or_else(Cnpj::default_organization);

        let described = Query::select()
            .distinct()
            .column(descricao_itens::Column::Sequencial)
            .from(descricao_itens::Entity)
            .and_where(descricao_itens::Column::Cnpj.eq(organization.as_str()))
            .and_where(descricao_itens::Column::Ano.eq(ano))
            .to_owned();

        let query = Query::select()
            .column(Asterisk)
            .from(compras::Entity)
            .and_where(compras::Column::SequencialCompra.in_subquery(described))
            .and_where(compras::Column::AnoCompra.eq(ano))
            .order_by(compras::Column::SequencialCompra, Order::Asc)
            .to_owned();

        let rows = self.fetch_rows(&query).await?;
        if rows.is_empty() {
            tracing::info!("No purchases with descriptions for {} in {}", organization, ano);
            return Err(PncpError::NoDataFound);
        }

        tracing::info!("Loaded {} purchases for {} in {}", rows.len(), organization, ano);
        Ok(RecordSet::from_records(rows))
    }

    pub async fn fetch_record(&self, sequencial: i64, ano: i32) -> PncpResult<Record> {
        let query = Query::select()
            .column(Asterisk)
            .from(compras::Entity)
            .and_where(compras::Column::SequencialCompra.eq(sequencial))
            .and_where(compras::Column::AnoCompra.eq(ano))
            .to_owned();

        self.fetch_rows(&query)
            .await?
            .into_iter()
            .next()
            .ok_or(PncpError::RecordNotFound { sequencial, ano })
    }

    async fn fetch_rows(&self, query: &SelectStatement) -> PncpResult<Vec<Record>> {
        let stmt = self.db.get_database_backend().build(query);
        tracing::debug!("Executing {}", stmt);

        let rows = JsonValue::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(normalize_row).collect())
    }
}

fn normalize_row(row: JsonValue) -> Record {
    match row {
        JsonValue::Object(map) => map
            .into_iter()
            .map(|(column, value)| (column, normalize_value(value)))
            .collect(),
        other => {
            tracing::warn!("Unexpected non-object row: {}", other);
            Record::new()
        }
    }
}

/// Convert one decoded column value into an exportable field.
///
/// Decimals already arrive as JSON numbers and dates as ISO-8601 strings;
/// nested arrays and objects are flattened to compact JSON text.
pub fn normalize_value(value: JsonValue) -> FieldValue {
    match value {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(b) => FieldValue::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
        },
        JsonValue::String(s) => FieldValue::Text(s),
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => FieldValue::Text(nested.to_string()),
    }
}
