/// Checks that a numerical value is in the provided interval `[a,b]` and returns early with
/// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if not
///
/// ### Example
/// ```ignore
/// fn validate(gamma: f32) -> Result<()> {
///     check_interval!(gamma, 0.0, 1.0);
///     Ok(())
/// }
/// ```
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::InvalidConfig {
                name: stringify!($var),
                reason: format!("must be in the interval [{}, {}], got {}", $a, $b, $var),
            });
        }
    };
}

pub(crate) use check_interval;

/// Index of the largest value, ties broken by the lowest index
///
/// Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Largest value of a slice, `None` if empty
pub fn max(values: &[f32]) -> Option<f32> {
    values.iter().copied().reduce(f32::max)
}

/// Arithmetic mean, `None` if empty
pub fn mean(values: impl IntoIterator<Item = f32>) -> Option<f32> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f32)
}
