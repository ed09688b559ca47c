/// A linear capacitor, stamped each step as a backward-Euler companion
/// model: a resistor of conductance `C/dt` in parallel with a current
/// source carrying the history term `C * V0 / dt`.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub capacitance: f64,
    /// Potential across the capacitor (`pos - neg`) at the end of the
    /// last successful step; the companion model's `V0`.
    pub prior_potential: f64,
}

impl Capacitor {
    pub fn new() -> Self {
        Capacitor {
            capacitance: 1e-6,
            prior_potential: 0.0,
        }
    }

    pub fn with_capacitance(capacitance: f64) -> Self {
        Capacitor {
            capacitance,
            prior_potential: 0.0,
        }
    }

    pub fn conductance(&self, dt: f64) -> f64 {
        self.capacitance / dt
    }

    pub fn history_current(&self, dt: f64) -> f64 {
        self.conductance(dt) * self.prior_potential
    }
}

impl Default for Capacitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamps the companion resistor and its history current source.
///
/// The history term's sign is the opposite of [`crate::device::current_source::stamp`]'s
/// for the same `(p, n)` pair: solving the discretized KCL equation for a
/// single RC node (`C*(v_n - v_{n-1})/dt = (v_ext - v_n)/R`) places the
/// known `C/dt * v_{n-1}` term on the `p` row with a `+` sign, not `-`.
pub fn stamp(
    matrix: &mut nalgebra::DMatrix<f64>,
    rhs: &mut nalgebra::DVector<f64>,
    p: Option<usize>,
    n: Option<usize>,
    g: f64,
    history_current: f64,
) {
    super::resistor::stamp(matrix, p, n, g);
    if let Some(p) = p {
        rhs[p] += history_current;
    }
    if let Some(n) = n {
        rhs[n] -= history_current;
    }
}
