//! Window configuration, validated once at construction.

use crate::error::{Error, Result};

/// Build-time window parameters. There is no runtime flag surface; the
/// binary constructs one of these directly.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// MSAA sample count; 1 disables multisampling.
    pub samples: u32,
    pub title: String,
}

impl WindowConfig {
    pub fn new(width: u32, height: u32, samples: u32, title: &str) -> Result<WindowConfig> {
        if width == 0 || height == 0 {
            return Err(Error::invalid(format!(
                "window dimensions must be positive, got {width}x{height}"
            )));
        }
        if !matches!(samples, 1 | 2 | 4 | 8 | 16) {
            return Err(Error::invalid(format!(
                "antialiasing sample count must be 1, 2, 4, 8 or 16, got {samples}"
            )));
        }
        Ok(WindowConfig {
            width,
            height,
            samples,
            title: title.to_owned(),
        })
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 1024,
            height: 768,
            samples: 1,
            title: "PlayGround ;)".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_configs() {
        assert!(WindowConfig::new(1650, 1050, 4, "t").is_ok());
        assert!(WindowConfig::new(1, 1, 1, "").is_ok());
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            WindowConfig::new(0, 768, 1, "t"),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            WindowConfig::new(1024, 0, 1, "t"),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_odd_sample_counts() {
        assert!(matches!(
            WindowConfig::new(1024, 768, 3, "t"),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            WindowConfig::new(1024, 768, 0, "t"),
            Err(Error::InvalidParameter(_))
        ));
    }
}
