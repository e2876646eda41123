//! Error taxonomy for the sandbox.
//!
//! Everything here is fatal at scene-initialization time: callers propagate
//! with `?` up to the binary, which logs the chain and exits. The per-frame
//! path does not produce new errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad primitive dimensions, segment counts, colors or window config.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A shader or texture file is missing on disk.
    #[error("resource not found: {0}")]
    ResourceNotFound(PathBuf),

    /// Shader compilation or program link failure, carrying the compiler's
    /// diagnostic text.
    #[error("failed to compile/link `{label}`:\n{log}")]
    CompileLink { label: String, log: String },

    /// Operation attempted against the device in the wrong state: a program
    /// linked twice, a stage the device cannot consume, or a failed
    /// adapter/device/buffer creation.
    #[error("device state error: {0}")]
    DeviceState(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }

    pub(crate) fn device(msg: impl Into<String>) -> Self {
        Error::DeviceState(msg.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
