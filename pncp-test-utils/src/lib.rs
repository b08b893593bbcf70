pub mod db;
pub mod fixtures;
pub mod item_counts;

pub use db::TestDb;
pub use item_counts::{FixedItemCount, UnavailableItemCount};
