pub mod descricao_itens_service;
pub mod import_validation;
pub mod item_count;
pub mod procurement_query_service;
pub mod spreadsheet;

pub use descricao_itens_service::DescricaoItensService;
pub use import_validation::{validate_items, REQUIRED_COLUMNS};
pub use item_count::{ItemCountSource, PncpApiClient};
pub use procurement_query_service::ProcurementQueryService;
pub use spreadsheet::{parse_spreadsheet, SheetTable, SpreadsheetKind};
