//! Procedurally generated geometry.

mod cube;
mod room;

pub use room::{mirror_mesh, room_mesh};
