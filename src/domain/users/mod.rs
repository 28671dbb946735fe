//! Users module - registered participants and the conversation flow they are in.

mod flow;
mod user;

pub use flow::FlowName;
pub use user::{NewUser, User};
