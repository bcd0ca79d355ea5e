//! Flying Spur: a side-scrolling arcade flyer.
//!
//! The library holds the whole simulation: pure data in [`entities`], the
//! per-frame logic in the component modules and the state machine in
//! [`game`].  The binary only feeds it input and draws it.

pub mod assets;
pub mod audio;
pub mod config;
pub mod craft;
pub mod entities;
pub mod error;
pub mod explosion;
pub mod game;
pub mod highscores;
pub mod input;
pub mod obstacles;
pub mod scheduler;
pub mod tween;

pub use error::{GameError, Result};
