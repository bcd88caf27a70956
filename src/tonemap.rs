//! Component H: post-process tone mapping and the two debug visualizers.
//!
//! Grounded on the reference `Render` mode dispatch (§4.H): full-color
//! output gets a Reinhard map with a global white point plus gamma 2.2;
//! depth and normal modes are direct linear encodings used for debugging.

use crate::vec3::Vec3;

/// `Vmax` — the largest channel value across every pixel's accumulated
/// color, the Reinhard white point. Globally associative, so callers
/// reduce it in parallel (§5).
pub fn max_channel(colors: &[Vec3]) -> f64 {
    colors.iter().fold(0.0_f64, |acc, v| acc.max(v.max_component()))
}

/// `Dmax` — the largest finite hit distance among per-pixel depths.
pub fn max_depth(depths: &[Option<f64>]) -> f64 {
    depths
        .iter()
        .filter_map(|d| *d)
        .fold(0.0_f64, f64::max)
}

/// Reinhard tone map with white point `vmax`, followed by gamma 2.2. NaN
/// (the `0/0` case when both the channel and `vmax` are zero) is scrubbed
/// to black (§4.H).
pub fn tonemap_full(color: Vec3, vmax: f64) -> [u8; 3] {
    let channel = |c: f64| -> u8 {
        let tmp = c * (1.0 + c / (vmax * vmax)) / (1.0 + c);
        let mut out = tmp.powf(1.0 / 2.2);
        if out.is_nan() {
            out = 0.0;
        }
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };
    [channel(color.x()), channel(color.y()), channel(color.z())]
}

/// `(255, 255, 255)` on miss, else `round(d / Dmax · 255)` in grayscale.
pub fn tonemap_depth(depth: Option<f64>, dmax: f64) -> [u8; 3] {
    match depth {
        None => [255, 255, 255],
        Some(d) => {
            let v = (d / dmax * 255.0).round().clamp(0.0, 255.0) as u8;
            [v, v, v]
        }
    }
}

/// `round((0.5·N + 0.5) · 255)` per channel.
pub fn tonemap_normal(normal: Vec3) -> [u8; 3] {
    let channel = |c: f64| -> u8 { ((0.5 * c + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8 };
    [channel(normal.x()), channel(normal.y()), channel(normal.z())]
}
