/// An ideal two-terminal voltage source, `pos - neg == voltage`.
///
/// Injects a branch-current unknown into the MNA system.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub voltage: f64,
}

impl VoltageSource {
    pub fn new() -> Self {
        VoltageSource { voltage: 0.0 }
    }

    pub fn with_voltage(voltage: f64) -> Self {
        VoltageSource { voltage }
    }
}

impl Default for VoltageSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamps an ideal voltage source occupying branch row/column `k`.
pub fn stamp(
    matrix: &mut nalgebra::DMatrix<f64>,
    rhs: &mut nalgebra::DVector<f64>,
    p: Option<usize>,
    n: Option<usize>,
    k: usize,
    voltage: f64,
) {
    if let Some(p) = p {
        matrix[(p, k)] += 1.0;
        matrix[(k, p)] += 1.0;
    }
    if let Some(n) = n {
        matrix[(n, k)] -= 1.0;
        matrix[(k, n)] -= 1.0;
    }
    rhs[k] += voltage;
}
