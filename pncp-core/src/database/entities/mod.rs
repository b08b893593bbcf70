pub mod compras;
pub mod descricao_itens;
