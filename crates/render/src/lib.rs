//! Rendering adapter: the read-only query surface renderers draw from.
//!
//! # Invariants
//! - Renderers cannot mutate game state; `GridView` has no mutating methods.
//! - Queries outside the grid answer `Entity::Nothing` instead of failing.
//!
//! The 3D renderer lives outside this workspace. `DebugTextRenderer` draws the same
//! view as Sokoban text for the CLI, logs and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, GridView, Renderer};

pub fn crate_info() -> &'static str {
    "stockroom-render v0.1.0"
}
