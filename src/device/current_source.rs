/// An ideal two-terminal current source, injecting `current` from `neg`
/// through the device to `pos`.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    pub current: f64,
}

impl CurrentSource {
    pub fn new() -> Self {
        CurrentSource { current: 0.0 }
    }

    pub fn with_current(current: f64) -> Self {
        CurrentSource { current }
    }
}

impl Default for CurrentSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamps an ideal current source: `b[p] -= I; b[n] += I`.
pub fn stamp(rhs: &mut nalgebra::DVector<f64>, p: Option<usize>, n: Option<usize>, current: f64) {
    if let Some(p) = p {
        rhs[p] -= current;
    }
    if let Some(n) = n {
        rhs[n] += current;
    }
}
