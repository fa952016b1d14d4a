//! Shared value types: the entity vocabulary, grid coordinates, directions and level ids.
//!
//! # Invariants
//! - Every type here is a plain `Copy` value; nothing in this crate owns state.

mod types;

pub use types::{Direction, Entity, GridPos, LevelId};
