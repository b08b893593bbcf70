use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pncp_descricao_itens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cnpj: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub sequencial: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ano: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub item: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub catalogo: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub descricao: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub descricao_detalhada: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
