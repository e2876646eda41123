//! Diorama
//!
//! A small GPU rendering sandbox built on wgpu and winit: procedurally
//! generated meshes, GLSL shader programs compiled per stage, and a static
//! lit scene explored with a free-fly camera.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod util;

pub use app::SandboxApp;
pub use config::WindowConfig;
pub use error::{Error, Result};
