//! Trailforge library crate: procedural side-scroller campaign maps.
//!
//! The binary crate (`main.rs`) is a headless driver that builds and dumps
//! one map. This library crate exposes the same modules so that the game's
//! map/rendering side and the `tests/` integration tests can use the
//! generator directly or through its Bevy plugins.

pub mod shared;
pub mod pieces;
pub mod mapgen;
pub mod data;
