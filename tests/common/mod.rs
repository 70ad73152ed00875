#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use courtside::database::{self, DbConn};
use courtside::errors::CoreError;
use courtside::services::seeding;

/// Fresh in-memory database with the full 32-team league seeded.
pub fn seeded_league(seed: u64) -> DbConn {
    let pool = database::create_memory_pool().expect("memory pool");
    let mut conn = database::get_connection(&pool).expect("connection");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    seeding::seed_league(&mut conn, &mut rng).expect("seed league");
    conn
}

/// Fresh in-memory database with the schema but no data.
pub fn empty_database() -> DbConn {
    let pool = database::create_memory_pool().expect("memory pool");
    let mut conn = database::get_connection(&pool).expect("connection");
    database::setup::reset_database(&mut conn).expect("reset schema");
    conn
}

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn core_error(err: &anyhow::Error) -> &CoreError {
    err.downcast_ref::<CoreError>()
        .unwrap_or_else(|| panic!("expected a CoreError, got: {err:#}"))
}
