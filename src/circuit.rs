//! The built, steppable circuit: nodes, components, the dense MNA system,
//! and the dirty-flag bookkeeping that decides whether a step needs a
//! full restamp or just an rhs refresh.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use crate::device::{capacitor, current_source, inductor, resistor, voltage_source, ComponentId, ComponentRecord, Device};
use crate::error::{CircuitError, Result};
use crate::node::{Node, NodeId};
use crate::pin::{Pin, PinId};
use crate::solver::LuFactorization;

/// A built circuit, ready to `step(dt)`.
///
/// `matrix_changed` forces a full from-scratch restamp and refactorization
/// at the next step; `rhs_changed` alone reuses the cached factorization
/// and only recomputes the right-hand side. Both flags start `true` so
/// the first `step` always does a full assembly.
pub struct Circuit {
    pub(crate) nodes: Vec<Node>,
    pub(crate) pins: Vec<Pin>,
    pub(crate) components: Vec<ComponentRecord>,
    /// Maps a stable `ComponentId` (assigned at `add()` time, possibly
    /// with gaps left by `remove()` before `build()`) to its position in
    /// `components`. `Line`s compiled from virtual resistors get fresh
    /// ids appended after every user-added component, so this map is the
    /// only place id-to-position indirection lives.
    pub(crate) component_index: HashMap<ComponentId, usize>,
    pub(crate) branch_index: HashMap<ComponentId, usize>,
    pub(crate) matrix: DMatrix<f64>,
    pub(crate) rhs: DVector<f64>,
    pub(crate) solution: DVector<f64>,
    pub(crate) matrix_changed: bool,
    pub(crate) rhs_changed: bool,
    pub(crate) factorization: Option<LuFactorization>,
    pub(crate) last_dt: Option<f64>,
}

impl Circuit {
    pub(crate) fn new(
        nodes: Vec<Node>,
        pins: Vec<Pin>,
        components: Vec<ComponentRecord>,
        branch_index: HashMap<ComponentId, usize>,
    ) -> Self {
        let unknowns = (nodes.len() - 1) + branch_index.len();
        let component_index = components.iter().enumerate().map(|(pos, c)| (c.id, pos)).collect();
        Circuit {
            nodes,
            pins,
            components,
            component_index,
            branch_index,
            matrix: DMatrix::zeros(unknowns, unknowns),
            rhs: DVector::zeros(unknowns),
            solution: DVector::zeros(unknowns),
            matrix_changed: true,
            rhs_changed: true,
            factorization: None,
            last_dt: None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn is_in_circuit(&self, id: ComponentId) -> bool {
        self.component_index.contains_key(&id)
    }

    pub fn potential(&self, node: NodeId) -> f64 {
        self.nodes[node.0].potential
    }

    /// Ids of every installed component, in `add()`/Line-compilation order.
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().map(|c| c.id)
    }

    pub fn device(&self, id: ComponentId) -> Option<&Device> {
        self.record(id).map(|c| &c.device)
    }

    pub(crate) fn record(&self, id: ComponentId) -> Option<&ComponentRecord> {
        let pos = *self.component_index.get(&id)?;
        self.components.get(pos)
    }

    fn record_mut(&mut self, id: ComponentId) -> Option<&mut ComponentRecord> {
        let pos = *self.component_index.get(&id)?;
        self.components.get_mut(pos)
    }

    pub(crate) fn row(&self, node: NodeId) -> Option<usize> {
        if node.is_ground() {
            None
        } else {
            Some(node.0 - 1)
        }
    }

    pub(crate) fn branch_row(&self, id: ComponentId) -> usize {
        (self.nodes.len() - 1) + self.branch_index[&id]
    }

    pub(crate) fn unknowns(&self) -> usize {
        self.matrix.nrows()
    }

    pub(crate) fn has_reactive(&self) -> bool {
        self.components
            .iter()
            .any(|c| matches!(c.device, Device::Capacitor(_) | Device::Inductor(_)))
    }

    pub(crate) fn has_dynamic_rhs(&self) -> bool {
        self.components
            .iter()
            .any(|c| matches!(c.device, Device::Capacitor(_) | Device::Inductor(_)) || c.controller.is_some())
    }

    fn row_of(&self, pin: PinId) -> Option<usize> {
        self.row(self.pins[pin.0].node)
    }

    pub fn pos_potential(&self, id: ComponentId) -> Option<f64> {
        let comp = self.record(id)?;
        Some(self.potential(self.pins[comp.pos().0].node))
    }

    pub fn neg_potential(&self, id: ComponentId) -> Option<f64> {
        let comp = self.record(id)?;
        Some(self.potential(self.pins[comp.neg().0].node))
    }

    pub fn voltage(&self, id: ComponentId) -> Option<f64> {
        Some(self.pos_potential(id)? - self.neg_potential(id)?)
    }

    /// Branch current through a component, signed from `pos` to `neg`.
    pub fn current(&self, id: ComponentId) -> Option<f64> {
        let comp = self.record(id)?;
        let v = self.voltage(id)?;
        match &comp.device {
            Device::Resistor(r) => Some(r.conductance() * v),
            Device::Switch(s) => Some(s.conductance() * v),
            Device::Line(l) => Some(l.conductance() * v),
            Device::CurrentSource(c) => Some(c.current),
            Device::VoltageSource(_) => Some(self.solution[self.branch_row(id)]),
            Device::Inductor(_) => Some(self.solution[self.branch_row(id)]),
            Device::Capacitor(c) => {
                let dt = self.last_dt?;
                Some(c.conductance(dt) * v - c.history_current(dt))
            }
        }
    }

    pub fn power(&self, id: ComponentId) -> Option<f64> {
        Some(self.voltage(id)? * self.current(id)?)
    }

    pub fn set_resistance(&mut self, id: ComponentId, resistance: f64) -> Result<()> {
        let comp = self.record_mut(id).ok_or(CircuitError::NotAdded(id))?;
        if let Device::Resistor(r) = &mut comp.device {
            r.resistance = resistance;
            self.matrix_changed = true;
        }
        Ok(())
    }

    pub fn set_voltage(&mut self, id: ComponentId, voltage: f64) -> Result<()> {
        let comp = self.record_mut(id).ok_or(CircuitError::NotAdded(id))?;
        if let Device::VoltageSource(v) = &mut comp.device {
            v.voltage = voltage;
            self.rhs_changed = true;
        }
        Ok(())
    }

    pub fn set_current(&mut self, id: ComponentId, current: f64) -> Result<()> {
        let comp = self.record_mut(id).ok_or(CircuitError::NotAdded(id))?;
        if let Device::CurrentSource(c) = &mut comp.device {
            c.current = current;
            self.rhs_changed = true;
        }
        Ok(())
    }

    pub fn set_switch_closed(&mut self, id: ComponentId, closed: bool) -> Result<()> {
        let comp = self.record_mut(id).ok_or(CircuitError::NotAdded(id))?;
        if let Device::Switch(s) = &mut comp.device {
            s.closed = closed;
            self.matrix_changed = true;
        }
        Ok(())
    }

    /// Mutates a single part's resistance within a compiled [`Device::Line`]
    /// and recomputes the line's cached total, marking the matrix dirty so
    /// the next `step` restamps with the new conductance. A no-op if `id`
    /// doesn't name a `Line` or `part_index` is out of range.
    pub fn set_part_resistance(&mut self, id: ComponentId, part_index: usize, resistance: f64) -> Result<()> {
        let comp = self.record_mut(id).ok_or(CircuitError::NotAdded(id))?;
        if let Device::Line(line) = &mut comp.device {
            if let Some(part) = line.parts.get_mut(part_index) {
                part.resistance = resistance;
                line.recompute_resistance();
                self.matrix_changed = true;
            }
        }
        Ok(())
    }

    /// Zeros and fully re-stamps both `matrix` and `rhs` from the current
    /// device parameters, then drops the cached factorization.
    pub(crate) fn restamp_full(&mut self, dt: f64) {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);
        for comp in &self.components {
            let p = self.row(self.pins[comp.pos().0].node);
            let n = self.row(self.pins[comp.neg().0].node);
            match &comp.device {
                Device::Resistor(r) => resistor::stamp(&mut self.matrix, p, n, r.conductance()),
                Device::Switch(s) => resistor::stamp(&mut self.matrix, p, n, s.conductance()),
                Device::Line(l) => resistor::stamp(&mut self.matrix, p, n, l.conductance()),
                Device::CurrentSource(c) => current_source::stamp(&mut self.rhs, p, n, c.current),
                Device::VoltageSource(v) => {
                    let k = self.branch_index[&comp.id] + (self.nodes.len() - 1);
                    voltage_source::stamp(&mut self.matrix, &mut self.rhs, p, n, k, v.voltage);
                }
                Device::Capacitor(c) => {
                    let g = c.conductance(dt);
                    let ih = c.history_current(dt);
                    capacitor::stamp(&mut self.matrix, &mut self.rhs, p, n, g, ih);
                }
                Device::Inductor(l) => {
                    let k = self.branch_index[&comp.id] + (self.nodes.len() - 1);
                    let vh = l.companion_voltage(dt);
                    let rb = l.branch_resistance(dt);
                    inductor::stamp(&mut self.matrix, &mut self.rhs, p, n, k, vh, rb);
                }
            }
        }
        self.matrix_changed = false;
        self.rhs_changed = false;
        self.factorization = None;
        self.last_dt = Some(dt);
    }

    /// Recomputes only `rhs` from the current device parameters, leaving
    /// `matrix` and any cached factorization untouched.
    pub(crate) fn restamp_rhs(&mut self, dt: f64) {
        self.rhs.fill(0.0);
        for comp in &self.components {
            let p = self.row_of(comp.pos());
            let n = self.row_of(comp.neg());
            match &comp.device {
                Device::Resistor(_) | Device::Switch(_) | Device::Line(_) => {}
                Device::CurrentSource(c) => current_source::stamp(&mut self.rhs, p, n, c.current),
                Device::VoltageSource(v) => {
                    let k = self.branch_index[&comp.id] + (self.nodes.len() - 1);
                    self.rhs[k] += v.voltage;
                }
                Device::Capacitor(c) => {
                    let ih = c.history_current(dt);
                    if let Some(p) = p {
                        self.rhs[p] += ih;
                    }
                    if let Some(n) = n {
                        self.rhs[n] -= ih;
                    }
                }
                Device::Inductor(l) => {
                    let k = self.branch_index[&comp.id] + (self.nodes.len() - 1);
                    self.rhs[k] += l.companion_voltage(dt);
                }
            }
        }
        self.rhs_changed = false;
    }

    /// Debug-only GraphViz rendering of the node graph.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("graph circuit {\n");
        for comp in &self.components {
            let p = self.pins[comp.pos().0].node;
            let n = self.pins[comp.neg().0].node;
            out.push_str(&format!(
                "  n{} -- n{} [label=\"{}{}\"];\n",
                p.0,
                n.0,
                comp.device.name(),
                comp.id.0
            ));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CircuitBuilder;
    use crate::device::{Device, Resistor};

    #[test]
    fn fresh_circuit_starts_dirty() {
        let mut b = CircuitBuilder::new();
        let r = b.add(Device::Resistor(Resistor::new())).unwrap();
        b.ground((r, 1)).unwrap();
        let circuit = b.build().unwrap();
        assert!(circuit.matrix_changed);
        assert!(circuit.rhs_changed);
    }

    #[test]
    fn setting_resistance_marks_matrix_dirty() {
        let mut b = CircuitBuilder::new();
        let r = b.add(Device::Resistor(Resistor::new())).unwrap();
        b.ground((r, 1)).unwrap();
        let mut circuit = b.build().unwrap();
        circuit.matrix_changed = false;
        circuit.set_resistance(r, 500.0).unwrap();
        assert!(circuit.matrix_changed);
    }
}
