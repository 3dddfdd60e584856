//! SeaORM entity definitions for PostgreSQL database.

pub mod attachment;
pub mod test_phase;
pub mod test_run;
