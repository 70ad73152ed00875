pub mod connection;
pub mod games;
pub mod models;
pub mod players;
pub mod plays;
pub mod runs;
pub mod series;
pub mod setup;
pub mod stats;
pub mod teams;

pub use connection::{
    create_memory_pool, create_pool, get_connection, with_transaction, DbConn, DbPool,
};
pub use models::*;
