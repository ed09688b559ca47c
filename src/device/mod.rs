//! The primitive device library.
//!
//! `Device` is a closed tagged variant: the core dispatches on it
//! directly during stamping and post-step instead of using trait
//! objects. `Port`-style behavior (two pins, `pos`/`neg`, signed
//! `potential`) is not a separate type — it is a pair of computed
//! accessors on [`crate::circuit::Circuit`] that read pin 0/1 of any
//! two-pin device, composition rather than inheritance.

pub mod capacitor;
pub mod current_source;
pub mod inductor;
pub mod line;
pub mod resistor;
pub mod switch;
pub mod voltage_source;

pub use capacitor::Capacitor;
pub use current_source::CurrentSource;
pub use inductor::Inductor;
pub use line::{Line, Part};
pub use resistor::Resistor;
pub use switch::Switch;
pub use voltage_source::VoltageSource;

use crate::pin::PinId;
use crate::power::PowerController;

/// Stable identity of a component within a [`crate::builder::CircuitBuilder`]
/// or a built [`crate::circuit::Circuit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub usize);

/// The closed set of stampable device kinds.
#[derive(Debug, Clone)]
pub enum Device {
    Resistor(Resistor),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    Capacitor(Capacitor),
    Inductor(Inductor),
    Switch(Switch),
    Line(Line),
}

impl Device {
    /// Number of pins this device kind has; every primitive device here is
    /// a two-terminal `Port`.
    pub fn pin_count(&self) -> usize {
        2
    }

    /// Whether this device consumes a branch-current unknown in the MNA
    /// system (voltage sources and inductors do).
    pub fn needs_branch(&self) -> bool {
        matches!(self, Device::VoltageSource(_) | Device::Inductor(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Device::Resistor(_) => "Resistor",
            Device::VoltageSource(_) => "VoltageSource",
            Device::CurrentSource(_) => "CurrentSource",
            Device::Capacitor(_) => "Capacitor",
            Device::Inductor(_) => "Inductor",
            Device::Switch(_) => "Switch",
            Device::Line(_) => "Line",
        }
    }
}

/// One installed component: a stable id, its pin list, the device data,
/// and (for `VoltageSource`/`CurrentSource` devices only) an optional
/// power control law run during `postStep`.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub id: ComponentId,
    pub pins: Vec<PinId>,
    pub device: Device,
    pub controller: Option<PowerController>,
}

impl ComponentRecord {
    pub fn pos(&self) -> PinId {
        self.pins[0]
    }

    pub fn neg(&self) -> PinId {
        self.pins[1]
    }
}
