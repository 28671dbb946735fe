//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory implementations of every port (tests, local runs)
//! - `postgres` - sqlx repositories and the embedded migration
//! - `redis` - Cache and notification marker ledger
//! - `vk` - Chat transport over the VK Bots API
//! - `geo` - Place name to timezone resolution

pub mod geo;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod vk;
