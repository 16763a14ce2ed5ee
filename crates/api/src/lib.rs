//! `lootledger-api` — HTTP delivery surface.

pub mod app;
pub mod context;
pub mod middleware;
