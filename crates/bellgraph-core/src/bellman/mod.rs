pub mod config;
pub mod engine;
pub mod q_table;
pub mod snapshot;
pub mod sweep;
pub mod trace;
