//! Colour conversion for body hues.

/// Converts three channel magnitudes into an HSL hue measured in turns.
///
/// The inputs are raw bit counts, so only their proportions matter. Greys,
/// including all-zero input, have hue `0`.
pub fn rgb_to_hue(red: u32, green: u32, blue: u32) -> f64 {
    let (r, g, b) = (red as f64, green as f64, blue as f64);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta == 0.0 {
        return 0.0;
    }

    let sixths = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    super::geometric_utils::normalize(sixths / 6.0)
}
