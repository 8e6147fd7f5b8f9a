//! Per-frame machinery: ray generation, tiled shading, throttling, and the
//! pacing and reload helpers that drive a [`Scene`](crate::scene::Scene)
//! from outside.

pub mod clock;
pub mod frame_clock;
pub mod gate;
pub mod governor;
pub mod integrator;
pub mod ray_generator;
pub mod reload;
pub mod stats;
pub mod tiles;
pub mod timer;

pub use clock::Clock;
pub use frame_clock::{FrameClock, FrameTick};
pub use gate::RenderGate;
pub use governor::{rays_per_second, FrameReport, ThroughputGovernor};
pub use integrator::{Integrator, ObjectIds, Palette, EMPTY_PIXEL};
pub use ray_generator::RayBasis;
pub use reload::{spawn_reload, ReloadHandle};
pub use stats::{FpsAverage, FrameStats, FrameSymbol};
pub use tiles::{RayCounter, Tile, TileScheduler};
pub use timer::{FixedHz, Throttled};
