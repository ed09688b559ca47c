//! Power-controlled sources.
//!
//! `PowerVoltageSource`/`PowerCurrentSource` are not separate `Device`
//! variants — the `Device` tagged union stays closed at seven kinds. A
//! power-controlled source is a plain
//! `VoltageSource`/`CurrentSource` with a [`PowerController`] attached to
//! its [`crate::device::ComponentRecord`]; the controller runs in
//! `postStep` and mutates the underlying source's `voltage`/`current`
//! field through the ordinary setter, which is what actually marks
//! `rhs_changed`.

/// Which field of the underlying source the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerKind {
    Voltage,
    Current,
}

/// A fixed-point control law driving a source's target toward a desired
/// ideal power, assuming a quadratic target/power relation (exact for
/// LTI circuits).
#[derive(Debug, Clone)]
pub struct PowerController {
    pub kind: PowerKind,
    pub power_ideal: f64,
    pub target_abs_max: Option<f64>,
}

impl PowerController {
    pub fn new(kind: PowerKind, power_ideal: f64, target_abs_max: Option<f64>) -> Self {
        PowerController {
            kind,
            power_ideal,
            target_abs_max,
        }
    }

    /// Computes the next target value given the currently-configured
    /// `old_target`, the potential/current observed at the last solve,
    /// and a convergence tolerance `eps`. Returns `None` when no update
    /// is needed (already converged, or the clipped result is unchanged).
    pub fn next_target(
        &self,
        old_target: f64,
        observed_potential: f64,
        observed_current: f64,
        eps: f64,
    ) -> Option<f64> {
        let power = observed_potential * observed_current;
        let factor = if self.power_ideal.abs() < eps {
            0.0
        } else {
            power / self.power_ideal
        };

        if (factor - 1.0).abs() < eps {
            return None;
        }

        let sign = if old_target < 0.0 { -1.0 } else { 1.0 };

        let raw_target = if factor.abs() < eps {
            sign * self.target_abs_max.unwrap_or(0.0)
        } else {
            sign * (old_target * old_target / factor.abs()).sqrt()
        };

        let clipped = match self.target_abs_max {
            Some(max) => raw_target.clamp(-max, max),
            None => raw_target,
        };

        if (clipped - old_target).abs() < eps {
            None
        } else {
            Some(clipped)
        }
    }
}
