//! Domain aggregates shared by the client list and the client detail page.

pub mod client;
pub mod exercise;
pub mod selection;
pub mod types;
