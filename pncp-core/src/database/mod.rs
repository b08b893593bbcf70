pub mod connection;
pub mod entities;

pub use connection::*;
pub use entities::*;
