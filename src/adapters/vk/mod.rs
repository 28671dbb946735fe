//! VK adapters.
//!
//! - `VkClient` - API calls and the outbound [`Transport`](crate::ports::Transport)
//! - `VkLongPoll` - Inbound Bots Long Poll loop

mod client;
mod keyboard;
mod long_poll;

pub use client::VkClient;
pub use long_poll::{VkLongPoll, VkMessage};
