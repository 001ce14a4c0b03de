use std::cmp::Ordering;
use std::error::Error;
use std::f64::consts::PI;
use std::fmt;

/// InputValueError is used if some simulation option or parameter does not fulfill the posed
/// requirements, e.g., a draw distance exceeding the number of track segments.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that sort the array x (unstable sort). Incomparable values (NaN)
/// are treated as equal.
pub fn argsort<T: std::cmp::PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..x.len()).collect();

    match order {
        SortOrder::Ascending => idxs.sort_unstable_by(|&a, &b| {
            x[a].partial_cmp(&x[b]).unwrap_or(Ordering::Equal)
        }),
        SortOrder::Descending => idxs.sort_unstable_by(|&a, &b| {
            x[b].partial_cmp(&x[a]).unwrap_or(Ordering::Equal)
        }),
    };

    idxs
}

// SCALAR HELPERS ----------------------------------------------------------------------------------
/// limit clamps value into [min, max].
pub fn limit(value: f64, min: f64, max: f64) -> f64 {
    min.max(value.min(max))
}

/// interpolate returns the linear interpolation between a and b at the given percent.
pub fn interpolate(a: f64, b: f64, percent: f64) -> f64 {
    a + (b - a) * percent
}

/// ease_in is a quadratic ease-in between a and b.
pub fn ease_in(a: f64, b: f64, percent: f64) -> f64 {
    a + (b - a) * percent.powi(2)
}

/// ease_in_out is a cosine ease-in-out between a and b.
pub fn ease_in_out(a: f64, b: f64, percent: f64) -> f64 {
    a + (b - a) * (-(percent * PI).cos() / 2.0 + 0.5)
}

/// exponential_fog returns the fog factor for a distance fraction in [0, 1]. 1.0 means no fog.
pub fn exponential_fog(distance: f64, density: f64) -> f64 {
    1.0 / (distance * distance * density).exp()
}

/// increase adds increment to start and wraps the result into [0, max). Over- and underflow of any
/// size are handled. A non-positive max collapses everything to 0.
pub fn increase(start: f64, increment: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }

    let result = (start + increment).rem_euclid(max);

    // rem_euclid can round up to max for tiny negative inputs
    if result >= max {
        0.0
    } else {
        result
    }
}

/// percent_remaining returns the fractional progress of n within the current chunk of size total.
pub fn percent_remaining(n: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    n.rem_euclid(total) / total
}

/// accelerate integrates a velocity v with the acceleration accel over dt.
pub fn accelerate(v: f64, accel: f64, dt: f64) -> f64 {
    v + accel * dt
}

/// overlap checks whether the 1D intervals centered at x1 and x2 with widths w1 and w2 overlap.
/// The percent factor scales both widths.
pub fn overlap(x1: f64, w1: f64, x2: f64, w2: f64, percent: f64) -> bool {
    let half1 = percent * w1 / 2.0;
    let half2 = percent * w2 / 2.0;
    !(x1 - half1 > x2 + half2 || x1 + half1 < x2 - half2)
}
