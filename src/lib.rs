//! A lumped-element circuit simulation core built on Modified Nodal
//! Analysis (MNA): a `CircuitBuilder` assembles components and their pin
//! connectivity, a `LineCompiler` collapses maximal series chains of
//! approximated-wire resistors into single `Line` stamps, and the
//! resulting `Circuit` steps forward in time under backward-Euler
//! companion models for reactive elements.

pub mod builder;
pub mod circuit;
pub mod device;
pub mod error;
pub mod line_compiler;
pub mod node;
pub mod pin;
pub mod power;
pub mod solver;
pub mod stepper;

pub use builder::{CircuitBuilder, PinHandle, VirtualResistorId};
pub use circuit::Circuit;
pub use device::{ComponentId, ComponentRecord, Device};
pub use error::{CircuitError, Result};
pub use node::{Node, NodeId};
pub use pin::{Pin, PinId};
pub use power::{PowerController, PowerKind};
