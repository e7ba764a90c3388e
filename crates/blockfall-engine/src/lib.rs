pub use self::{config::*, core::*, engine::*};

pub mod config;
pub mod core;
pub mod engine;

/// Reasons a command left the session unchanged.
///
/// Rejections are routine (bumping a wall, pressing a key while paused) and
/// never end the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("piece colliding at the requested placement")]
    Collision,
    #[display("session is paused")]
    Paused,
    #[display("session is over")]
    GameOver,
}
