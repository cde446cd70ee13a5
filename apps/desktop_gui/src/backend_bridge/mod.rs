//! Bridge between the egui thread and the async scheduling client.

pub mod commands;
pub mod runtime;
