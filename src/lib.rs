//! Goal Oracle - Daily goal tracking bot
//!
//! Users plan one goal per category for each local day, mark them done in
//! the evening, and rate each other's results. Background passes move goals
//! through their lifecycle at local day boundaries and send reminders.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
