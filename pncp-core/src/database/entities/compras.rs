//! Key columns of the `pncp` procurement table.
//!
//! The table carries many more columns; they are read dynamically by
//! [`crate::services::ProcurementQueryService`] and never mapped here.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pncp")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sequencial_compra: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ano_compra: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
