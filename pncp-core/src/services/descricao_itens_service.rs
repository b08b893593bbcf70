use indexmap::IndexMap;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::database::entities::{compras, descricao_itens};
use crate::domain::{ImportSummary, ItemDescription, PurchaseKey};
use crate::errors::{PncpError, PncpResult};

/// Rows per statement; keeps bind parameters well under the SQLite and
/// Postgres limits
const DESCRICAO_BATCH_SIZE: usize = 500;

/// Writes and reads item descriptions attached to a purchase
pub struct DescricaoItensService {
    db: DatabaseConnection,
}

impl DescricaoItensService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replace the descriptions of the item numbers present in `rows`.
    ///
    /// Runs in one transaction: purchase lookup, targeted delete, inserts.
    /// Deletes and inserts are issued in batches of 500 rows.
    /// Rows for item numbers absent from `rows` are left untouched. When an
    /// item number repeats, the last row wins. Dropping the transaction on
    /// any early return rolls the batch back.
    pub async fn replace_items(
        &self,
        key: &PurchaseKey,
        rows: &[ItemDescription],
    ) -> PncpResult<ImportSummary> {
        let txn = self.db.begin().await?;

        let purchase = compras::Entity::find()
            .filter(compras::Column::SequencialCompra.eq(key.sequencial))
            .filter(compras::Column::AnoCompra.eq(key.ano))
            .one(&txn)
            .await?;

        if purchase.is_none() {
            tracing::warn!("Purchase {} not found, import aborted", key);
            return Err(PncpError::PurchaseNotFound {
                sequencial: key.sequencial,
                ano: key.ano,
            });
        }

        let mut latest: IndexMap<i32, &ItemDescription> = IndexMap::new();
        for row in rows {
            latest.insert(row.item, row);
        }

        let items: Vec<i32> = latest.keys().copied().collect();
        let mut deleted = 0;
        for chunk in items.chunks(DESCRICAO_BATCH_SIZE) {
            let result = descricao_itens::Entity::delete_many()
                .filter(descricao_itens::Column::Cnpj.eq(key.cnpj.as_str()))
                .filter(descricao_itens::Column::Sequencial.eq(key.sequencial))
                .filter(descricao_itens::Column::Ano.eq(key.ano))
                .filter(descricao_itens::Column::Item.is_in(chunk.iter().copied()))
                .exec(&txn)
                .await?;
            deleted += result.rows_affected;
        }
        tracing::debug!("Removed {} previous descriptions for {}", deleted, key);

        let mut models: Vec<descricao_itens::ActiveModel> = latest
            .values()
            .map(|row| descricao_itens::ActiveModel {
                cnpj: Set(key.cnpj.as_str().to_string()),
                sequencial: Set(key.sequencial),
                ano: Set(key.ano),
                item: Set(row.item),
                catalogo: Set(row.catalogo.clone()),
                descricao: Set(row.descricao.clone()),
                descricao_detalhada: Set(row.descricao_detalhada.clone()),
            })
            .collect();
        while !models.is_empty() {
            let batch_size = DESCRICAO_BATCH_SIZE.min(models.len());
            let batch: Vec<_> = models.drain(..batch_size).collect();
            descricao_itens::Entity::insert_many(batch)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::info!(
            "Imported {} item descriptions for purchase {}",
            latest.len(),
            key
        );

        Ok(ImportSummary {
            itens_importados: latest.len(),
            quantidade_itens: rows.len(),
            ..ImportSummary::imported(rows.len())
        })
    }

    pub async fn list_items(&self, key: &PurchaseKey) -> PncpResult<Vec<descricao_itens::Model>> {
        let items = descricao_itens::Entity::find()
            .filter(descricao_itens::Column::Cnpj.eq(key.cnpj.as_str()))
            .filter(descricao_itens::Column::Sequencial.eq(key.sequencial))
            .filter(descricao_itens::Column::Ano.eq(key.ano))
            .order_by_asc(descricao_itens::Column::Item)
            .all(&self.db)
            .await?;
        Ok(items)
    }
}
