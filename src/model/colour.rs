//! Colour conversion from palette tokens to glTF linear factors.
//!
//! glTF `baseColorFactor` is linear RGBA; palette tokens are sRGB hex.

use rgb::RGBA8;

/// Parse a 6-digit hex token (optional `#`) into opaque RGBA8.
pub fn hex_to_rgba(token: &str) -> Option<RGBA8> {
    let hex = token.strip_prefix('#').unwrap_or(token);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(RGBA8::new(r, g, b, u8::MAX))
}

/// Inverse sRGB transfer function for one 8-bit channel.
fn srgb_channel_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Gamma-decode the colour channels; alpha is only scaled to 0–1.
pub fn to_linear(color: RGBA8) -> [f64; 4] {
    [
        srgb_channel_to_linear(color.r),
        srgb_channel_to_linear(color.g),
        srgb_channel_to_linear(color.b),
        color.a as f64 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(hex_to_rgba("#F7F6F5"), Some(RGBA8::new(247, 246, 245, 255)));
        assert_eq!(hex_to_rgba("0b1821"), Some(RGBA8::new(11, 24, 33, 255)));
        assert_eq!(hex_to_rgba("0b182"), None);
        assert_eq!(hex_to_rgba("0b18zz"), None);
        assert_eq!(hex_to_rgba("ééé"), None);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(to_linear(RGBA8::new(0, 0, 0, 255)), [0.0, 0.0, 0.0, 1.0]);
        let white = to_linear(RGBA8::new(255, 255, 255, 255));
        assert!(white.iter().all(|c| close(*c, 1.0)));
    }

    #[test]
    fn test_known_values() {
        // Linear segment below the 0.04045 threshold.
        let dark = to_linear(RGBA8::new(10, 0, 0, 255));
        assert!(close(dark[0], 10.0 / 255.0 / 12.92));

        // Mid grey decodes to about 0.2158.
        let grey = to_linear(RGBA8::new(128, 128, 128, 255));
        assert!((grey[0] - 0.2158605).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_is_not_gamma_decoded() {
        let c = to_linear(RGBA8::new(0, 0, 0, 128));
        assert!(close(c[3], 128.0 / 255.0));
    }
}
