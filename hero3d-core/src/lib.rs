//! hero3d Core Library - scene model, animation and projection
//!
//! This library holds everything about the hero scene that does not depend
//! on an output device: the floating-object animator and its frame driver,
//! scene configuration, lighting, orbit controls, and the draw lists that
//! terminal and web rasterizers consume.

pub mod color;
pub mod config;
pub mod drift;
pub mod driver;
pub mod error;
pub mod floating;
pub mod geometry;
pub mod lighting;
pub mod orbit;
pub mod projection;
pub mod render;
pub mod scene;
pub mod sparkles;
pub mod transform;

// Re-export commonly used types
pub use color::Rgb;
pub use config::SceneConfig;
pub use driver::{Clock, FrameCallback, FrameDriver, FrameInfo, FrameLoop};
pub use error::SceneError;
pub use floating::{FloatingObject, MeshInstance};
pub use geometry::{Mesh, Triangle, Vertex};
pub use projection::{Camera, ScreenPoint, Viewport};
pub use render::{DrawItem, DrawList, DrawTriangle, Sprite};
pub use scene::{Scene, DEFAULT_SEED};
pub use transform::{RotationState, Transform};
