// Value mapping helpers shared by every estimation curve

/// Affine map sending `a` to `c` and `b` to `d`.
///
/// No bounds checking; `a == b` yields a non-finite result.
pub fn map_value(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    ((c - d) * (x - a)) / (a - b) + c
}

/// Like [`map_value`], then clamped into `[min(c, d), max(c, d)]`.
pub fn map_value_clamp(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let v = map_value(x, a, b, c, d);
    if v < c && v < d {
        c.min(d)
    } else if v > c && v > d {
        c.max(d)
    } else {
        v
    }
}

pub fn force_non_negative(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}
