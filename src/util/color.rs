//! Hex color parsing for material and light definitions.

use cgmath::Vector3;

use crate::error::{Error, Result};

const COLOR_COEF: f32 = 1.0 / 256.0;

/// Parses a `#RRGGBB` hex string into an RGB triple in [0, 1).
///
/// The leading `#` and exactly six hex digits are required.
pub fn parse_rgb(color: &str) -> Result<Vector3<f32>> {
    let Some(digits) = color.strip_prefix('#') else {
        return Err(Error::invalid(format!(
            "color `{color}` must start with '#'"
        )));
    };
    if digits.len() != 6 {
        return Err(Error::invalid(format!(
            "color `{color}` must be '#' followed by 6 hex digits"
        )));
    }
    let value = u32::from_str_radix(digits, 16)
        .map_err(|_| Error::invalid(format!("color `{color}` contains non-hex digits")))?;

    Ok(Vector3::new(
        ((value >> 16) & 0xFF) as f32 * COLOR_COEF,
        ((value >> 8) & 0xFF) as f32 * COLOR_COEF,
        (value & 0xFF) as f32 * COLOR_COEF,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primary_channels() {
        let cyan = parse_rgb("#00FFFF").unwrap();
        assert_eq!(cyan.x, 0.0);
        assert!((cyan.y - 255.0 * COLOR_COEF).abs() < 1e-6);
        assert!((cyan.z - 255.0 * COLOR_COEF).abs() < 1e-6);
        // 255/256 is as close to full intensity as the coefficient gets
        assert!(cyan.y > 0.99);
    }

    #[test]
    fn parses_mixed_channels() {
        let brown = parse_rgb("#663300").unwrap();
        assert!((brown.x - 0.3984375).abs() < 1e-6);
        assert!((brown.y - 0.19921875).abs() < 1e-6);
        assert_eq!(brown.z, 0.0);
    }

    #[test]
    fn lowercase_accepted() {
        let a = parse_rgb("#6600cc").unwrap();
        let b = parse_rgb("#6600CC").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_missing_hash() {
        assert!(matches!(
            parse_rgb("00FFFF"),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(parse_rgb("#FFF"), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            parse_rgb("#FFFFFFFF"),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            parse_rgb("#zzzzzz"),
            Err(Error::InvalidParameter(_))
        ));
    }
}
