//! Assembles a [`Circuit`] from components, virtual resistors, and the
//! `connect`/`ground` relations between their pins.

use std::collections::HashMap;

use log::info;

use crate::circuit::Circuit;
use crate::device::{ComponentId, ComponentRecord, Device};
use crate::error::{CircuitError, Result};
use crate::line_compiler::{self, VirtualResistor};
use crate::node::{Node, NodeId};
use crate::pin::{Pin, PinId, UnionFind};
use crate::power::PowerController;

/// Handle to a virtual resistor added with [`CircuitBuilder::add_virtual_resistor`].
///
/// Virtual resistors model an approximated wire and never survive into
/// the built `Circuit` as their own component — the `LineCompiler`
/// either fuses them into a `Line` or, for a lone segment, produces a
/// degenerate one-part `Line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualResistorId(pub usize);

/// A reference to one of a component's or virtual resistor's two pins,
/// used as the argument to `connect`/`ground`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinHandle {
    Component(ComponentId, usize),
    Virtual(VirtualResistorId, usize),
}

impl From<(ComponentId, usize)> for PinHandle {
    fn from((id, local): (ComponentId, usize)) -> Self {
        PinHandle::Component(id, local)
    }
}

impl From<(VirtualResistorId, usize)> for PinHandle {
    fn from((id, local): (VirtualResistorId, usize)) -> Self {
        PinHandle::Virtual(id, local)
    }
}

struct StagedComponent {
    id: ComponentId,
    device: Device,
    controller: Option<PowerController>,
    arena: [usize; 2],
    removed: bool,
}

struct StagedVirtualResistor {
    resistance: f64,
    arena: [usize; 2],
}

/// Build-time disjoint-set arena index reserved for ground; every
/// `ground()` call unions its pin into this set rather than merely
/// flagging it, so two `ground()` calls on otherwise unconnected pins
/// still land on the same node.
const GROUND_ARENA: usize = 0;

pub struct CircuitBuilder {
    uf: UnionFind,
    components: Vec<StagedComponent>,
    virtual_resistors: Vec<StagedVirtualResistor>,
    built: bool,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        let mut uf = UnionFind::new();
        let ground_arena = uf.push(true);
        uf.mark_ground(ground_arena);
        debug_assert_eq!(ground_arena, GROUND_ARENA);
        CircuitBuilder {
            uf,
            components: Vec::new(),
            virtual_resistors: Vec::new(),
            built: false,
        }
    }

    /// Installs a component and allocates its two pins. Fails with
    /// [`CircuitError::AlreadyBuilt`] once `build()` has consumed this
    /// builder.
    pub fn add(&mut self, device: Device) -> Result<ComponentId> {
        self.guard_mutation()?;
        let id = ComponentId(self.components.len());
        let arena = [self.uf.push(true), self.uf.push(true)];
        self.components.push(StagedComponent {
            id,
            device,
            controller: None,
            arena,
            removed: false,
        });
        Ok(id)
    }

    /// Un-stages a previously `add()`-ed component. Only valid before
    /// `build()`; a removed component is permanent for this builder and
    /// requires a fresh `CircuitBuilder` to undo. The component's two
    /// pins stay in the union-find as unconnected singletons, so any
    /// other component still joined to them keeps its own node
    /// assignment unaffected.
    pub fn remove(&mut self, id: ComponentId) -> Result<()> {
        self.guard_mutation()?;
        let comp = self.components.get_mut(id.0).ok_or(CircuitError::NotAdded(id))?;
        comp.removed = true;
        Ok(())
    }

    /// Attaches a power-control law to an already-added `VoltageSource`
    /// or `CurrentSource` component. The controller is carried alongside
    /// the device on its `ComponentRecord` rather than as its own
    /// component or device variant.
    pub fn set_power_controller(&mut self, id: ComponentId, controller: PowerController) -> Result<()> {
        self.guard_mutation()?;
        let comp = self
            .components
            .get_mut(id.0)
            .filter(|c| !c.removed)
            .ok_or(CircuitError::NotAdded(id))?;
        comp.controller = Some(controller);
        Ok(())
    }

    /// Adds a segment of approximated wire for the `LineCompiler` to
    /// consider during `build()`.
    pub fn add_virtual_resistor(&mut self, resistance: f64) -> Result<VirtualResistorId> {
        self.guard_mutation()?;
        let id = VirtualResistorId(self.virtual_resistors.len());
        let arena = [self.uf.push(false), self.uf.push(false)];
        self.virtual_resistors.push(StagedVirtualResistor { resistance, arena });
        Ok(id)
    }

    /// Joins two pins into the same node. Connecting a component's own
    /// two pins to each other is rejected: it would short the device.
    pub fn connect(&mut self, a: impl Into<PinHandle>, b: impl Into<PinHandle>) -> Result<()> {
        self.guard_mutation()?;
        let a = a.into();
        let b = b.into();
        if let (PinHandle::Component(ca, _), PinHandle::Component(cb, _)) = (a, b) {
            if ca == cb {
                return Err(CircuitError::SameComponent);
            }
        }
        let ai = self.arena_index(a)?;
        let bi = self.arena_index(b)?;
        self.uf.union(ai, bi);
        Ok(())
    }

    /// Marks a pin's node as ground.
    pub fn ground(&mut self, a: impl Into<PinHandle>) -> Result<()> {
        self.guard_mutation()?;
        let idx = self.arena_index(a.into())?;
        self.uf.union(GROUND_ARENA, idx);
        Ok(())
    }

    fn arena_index(&self, handle: PinHandle) -> Result<usize> {
        match handle {
            PinHandle::Component(id, local) => self
                .components
                .get(id.0)
                .filter(|c| !c.removed)
                .map(|c| c.arena[local])
                .ok_or(CircuitError::NotAdded(id)),
            PinHandle::Virtual(id, local) => Ok(self.virtual_resistors[id.0].arena[local]),
        }
    }

    fn guard_mutation(&self) -> Result<()> {
        if self.built {
            Err(CircuitError::AlreadyBuilt)
        } else {
            Ok(())
        }
    }

    /// Runs the `LineCompiler`, assigns final node indices, and produces
    /// a ready-to-step `Circuit`. A second call returns `DoubleBuild`
    /// rather than rebuilding.
    pub fn build(&mut self) -> Result<Circuit> {
        if self.built {
            return Err(CircuitError::DoubleBuild);
        }
        self.built = true;

        let mut components = std::mem::take(&mut self.components);
        let virtual_resistors: Vec<VirtualResistor> = self
            .virtual_resistors
            .iter()
            .map(|v| VirtualResistor {
                resistance: v.resistance,
                pins: v.arena,
            })
            .collect();
        let graphs = line_compiler::compile(&virtual_resistors, &mut self.uf)?;

        for graph in graphs {
            let id = ComponentId(components.len());
            components.push(StagedComponent {
                id,
                device: Device::Line(crate::device::Line::from_parts(graph.parts)),
                controller: None,
                arena: [graph.pos_root, graph.neg_root],
                removed: false,
            });
        }

        // Removed components leave their arena slots behind as ordinary
        // (possibly still-connected) union-find members but never become
        // nodes/pins/records of their own.
        let components: Vec<StagedComponent> = components.into_iter().filter(|c| !c.removed).collect();

        let ground_root = self.uf.find(GROUND_ARENA);
        if self.uf.class_size(ground_root) <= 1 {
            return Err(CircuitError::FloatingCircuit);
        }

        let mut nodes = vec![Node::ground()];
        let mut node_roots: HashMap<usize, NodeId> = HashMap::new();
        node_roots.insert(ground_root, NodeId::GROUND);
        let mut next_node_idx = 1usize;

        let mut pins: Vec<Pin> = Vec::new();
        let mut component_pins: Vec<[PinId; 2]> = Vec::with_capacity(components.len());

        for comp in &components {
            let mut ids = [PinId(0); 2];
            for (local, &arena_idx) in comp.arena.iter().enumerate() {
                let root = self.uf.find(arena_idx);
                let node_id = *node_roots.entry(root).or_insert_with(|| {
                    let nid = NodeId(next_node_idx);
                    next_node_idx += 1;
                    nodes.push(Node::new(nid, None));
                    nid
                });
                let pin_id = PinId(pins.len());
                pins.push(Pin { id: pin_id, node: node_id });
                ids[local] = pin_id;
            }
            component_pins.push(ids);
        }

        let mut records = Vec::with_capacity(components.len());
        let mut branch_index = HashMap::new();
        let mut branch_count = 0usize;
        for (comp, pin_ids) in components.into_iter().zip(component_pins.into_iter()) {
            if comp.device.needs_branch() {
                branch_index.insert(comp.id, branch_count);
                branch_count += 1;
            }
            records.push(ComponentRecord {
                id: comp.id,
                pins: pin_ids.to_vec(),
                device: comp.device,
                controller: comp.controller,
            });
        }

        info!(
            "circuit built: {} nodes, {} components, {} branch unknowns",
            nodes.len(),
            records.len(),
            branch_count
        );

        Ok(Circuit::new(nodes, pins, records, branch_index))
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
