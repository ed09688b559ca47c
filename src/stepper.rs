//! Drives one discrete time step of a [`Circuit`]: decide whether to
//! restamp fully or just refresh `rhs`, solve, write the solution back
//! onto nodes and branch currents, then run each component's post-step
//! hook in add order.

use log::{debug, warn};

use crate::circuit::Circuit;
use crate::device::Device;
use crate::error::{CircuitError, Result};
use crate::power::PowerKind;
use crate::solver::{self, SolverConfig};

/// Convergence tolerance for the power-controller fixed point; distinct
/// from the solver's pivot tolerance.
const POWER_CONTROL_EPS: f64 = 1e-9;

impl Circuit {
    /// Advances the circuit by `dt`. Returns `Ok(false)` — not an `Err`
    /// — on numerical failure (singular matrix or a non-finite solve),
    /// leaving the last successful solution in place; `Err` is reserved
    /// for usage errors that don't apply here, since `step` only runs on
    /// an already-built `Circuit`.
    pub fn step(&mut self, dt: f64) -> Result<bool> {
        let config = SolverConfig::default();
        let need_full = self.matrix_changed || (self.has_reactive() && self.last_dt != Some(dt));

        if need_full {
            self.restamp_full(dt);
        } else if self.rhs_changed || self.has_dynamic_rhs() {
            self.restamp_rhs(dt);
        }
        debug!("step(dt={dt}): {}", if need_full { "full restamp" } else { "rhs-only" });

        let solved = if need_full || self.factorization.is_none() {
            solver::solve(&self.matrix, &self.rhs, config).map(|(x, fact)| {
                self.factorization = Some(fact);
                x
            })
        } else {
            self.factorization.as_ref().unwrap().solve(&self.rhs)
        };

        let solution = match solved {
            Ok(x) => x,
            Err(CircuitError::SingularMatrix) | Err(CircuitError::NonFinite) => {
                warn!("step(dt={dt}): solve failed numerically, retaining last solution");
                return Ok(false);
            }
            Err(other) => return Err(other),
        };

        self.solution = solution;
        for i in 1..self.nodes.len() {
            self.nodes[i].potential = self.solution[i - 1];
        }

        self.run_post_step();
        Ok(true)
    }

    fn run_post_step(&mut self) {
        let Circuit {
            ref nodes,
            ref pins,
            ref mut components,
            ref solution,
            ref branch_index,
            ref mut rhs_changed,
            ..
        } = *self;

        for comp in components.iter_mut() {
            let vp = nodes[pins[comp.pos().0].node.0].potential;
            let vn = nodes[pins[comp.neg().0].node.0].potential;

            let observed_current = match &comp.device {
                Device::VoltageSource(_) | Device::Inductor(_) => {
                    Some(solution[branch_index[&comp.id] + (nodes.len() - 1)])
                }
                Device::CurrentSource(c) => Some(c.current),
                _ => None,
            };

            match &mut comp.device {
                Device::Capacitor(c) => c.prior_potential = vp - vn,
                Device::Inductor(l) => l.prior_current = observed_current.unwrap_or(0.0),
                Device::Line(line) => line.propagate(vp, vn),
                _ => {}
            }

            if let (Some(ctrl), Some(observed_current)) = (&comp.controller, observed_current) {
                let old_target = match ctrl.kind {
                    PowerKind::Voltage => match &comp.device {
                        Device::VoltageSource(v) => v.voltage,
                        _ => continue,
                    },
                    PowerKind::Current => match &comp.device {
                        Device::CurrentSource(c) => c.current,
                        _ => continue,
                    },
                };
                if let Some(new_target) =
                    ctrl.next_target(old_target, vp - vn, observed_current, POWER_CONTROL_EPS)
                {
                    match &mut comp.device {
                        Device::VoltageSource(v) => v.voltage = new_target,
                        Device::CurrentSource(c) => c.current = new_target,
                        _ => {}
                    }
                    *rhs_changed = true;
                }
            }
        }
    }
}
