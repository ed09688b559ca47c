/// A linear two-terminal resistor.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub resistance: f64,
}

impl Resistor {
    pub fn new() -> Self {
        Resistor { resistance: 1000.0 }
    }

    pub fn with_resistance(resistance: f64) -> Self {
        Resistor { resistance }
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

impl Default for Resistor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamps a plain resistor of the given conductance between the matrix
/// indices `p`/`n` (either may be `None` for a pin bound to ground, in
/// which case that row/column is omitted).
pub fn stamp(matrix: &mut nalgebra::DMatrix<f64>, p: Option<usize>, n: Option<usize>, g: f64) {
    if let Some(p) = p {
        matrix[(p, p)] += g;
    }
    if let Some(n) = n {
        matrix[(n, n)] += g;
    }
    if let (Some(p), Some(n)) = (p, n) {
        matrix[(p, n)] -= g;
        matrix[(n, p)] -= g;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conductance_is_reciprocal_of_resistance() {
        let r = Resistor::with_resistance(250.0);
        assert!((r.conductance() - 0.004).abs() < 1e-12);
    }
}
