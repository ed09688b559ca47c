/// A linear inductor, stamped each step as a backward-Euler Thévenin
/// companion: a branch equation `V_p - V_n - (L/dt) * i_k = (L/dt) * I0`
/// — an ideal voltage source of `L*I0/dt` in series with a resistor of
/// `L/dt`, folded into the branch row/column the inductor already owns.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub inductance: f64,
    /// Branch current at the end of the last successful step; the
    /// companion model's `I0`.
    pub prior_current: f64,
}

impl Inductor {
    pub fn new() -> Self {
        Inductor {
            inductance: 1e-3,
            prior_current: 0.0,
        }
    }

    pub fn with_inductance(inductance: f64) -> Self {
        Inductor {
            inductance,
            prior_current: 0.0,
        }
    }

    pub fn companion_voltage(&self, dt: f64) -> f64 {
        self.inductance / dt * self.prior_current
    }

    pub fn branch_resistance(&self, dt: f64) -> f64 {
        self.inductance / dt
    }
}

impl Default for Inductor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamps the inductor's branch row/column `k`: the usual voltage-source
/// coupling to `p`/`n` plus `-L/dt` on the branch diagonal.
pub fn stamp(
    matrix: &mut nalgebra::DMatrix<f64>,
    rhs: &mut nalgebra::DVector<f64>,
    p: Option<usize>,
    n: Option<usize>,
    k: usize,
    companion_voltage: f64,
    branch_resistance: f64,
) {
    super::voltage_source::stamp(matrix, rhs, p, n, k, companion_voltage);
    matrix[(k, k)] -= branch_resistance;
}
