//! Controller layer: UI events, the landing-screen state machine, and command dispatch.

pub mod events;
pub mod landing;
pub mod orchestration;
