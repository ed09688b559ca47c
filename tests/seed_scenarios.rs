use mna_circuit::builder::{CircuitBuilder, PinHandle};
use mna_circuit::device::{Device, Resistor, VoltageSource};

const EPS: f64 = 1e-9;

/// (A) Single 10Ω resistor across a 10V source → 1A, 10W.
#[test]
fn scenario_a_single_resistor() {
    let mut b = CircuitBuilder::new();
    let vs = b.add(Device::VoltageSource(VoltageSource::with_voltage(10.0))).unwrap();
    let r = b.add(Device::Resistor(Resistor::with_resistance(10.0))).unwrap();
    b.ground((vs, 1)).unwrap();
    b.connect((vs, 0), (r, 0)).unwrap();
    b.ground((r, 1)).unwrap();
    let mut circuit = b.build().unwrap();

    assert!(circuit.step(1e-3).unwrap());
    assert!((circuit.current(r).unwrap() - 1.0).abs() < EPS);
    assert!((circuit.power(r).unwrap() - 10.0).abs() < EPS);
}

/// (B) 5Ω and 5Ω in series across 10V → each current 1A.
#[test]
fn scenario_b_equal_series_resistors() {
    let mut b = CircuitBuilder::new();
    let vs = b.add(Device::VoltageSource(VoltageSource::with_voltage(10.0))).unwrap();
    let r1 = b.add(Device::Resistor(Resistor::with_resistance(5.0))).unwrap();
    let r2 = b.add(Device::Resistor(Resistor::with_resistance(5.0))).unwrap();
    b.ground((vs, 1)).unwrap();
    b.connect((vs, 0), (r1, 0)).unwrap();
    b.connect((r1, 1), (r2, 0)).unwrap();
    b.ground((r2, 1)).unwrap();
    let mut circuit = b.build().unwrap();

    assert!(circuit.step(1e-3).unwrap());
    assert!((circuit.current(r1).unwrap() - 1.0).abs() < EPS);
    assert!((circuit.current(r2).unwrap() - 1.0).abs() < EPS);
}

/// (C) 10Ω and 20Ω in series across 10V → 1/3A, mid-node potential 10/3V.
#[test]
fn scenario_c_unequal_series_resistors() {
    let mut b = CircuitBuilder::new();
    let vs = b.add(Device::VoltageSource(VoltageSource::with_voltage(10.0))).unwrap();
    let r1 = b.add(Device::Resistor(Resistor::with_resistance(10.0))).unwrap();
    let r2 = b.add(Device::Resistor(Resistor::with_resistance(20.0))).unwrap();
    b.ground((vs, 1)).unwrap();
    b.connect((vs, 0), (r1, 0)).unwrap();
    b.connect((r1, 1), (r2, 0)).unwrap();
    b.ground((r2, 1)).unwrap();
    let mut circuit = b.build().unwrap();

    assert!(circuit.step(1e-3).unwrap());
    assert!((circuit.current(r1).unwrap() - 1.0 / 3.0).abs() < 1e-6);
    assert!((circuit.pos_potential(r2).unwrap() - 10.0 / 3.0).abs() < 1e-6);
}

/// (D) Two 5Ω resistors in parallel across 10V → each 2A, source current 4A.
#[test]
fn scenario_d_parallel_resistors() {
    let mut b = CircuitBuilder::new();
    let vs = b.add(Device::VoltageSource(VoltageSource::with_voltage(10.0))).unwrap();
    let r1 = b.add(Device::Resistor(Resistor::with_resistance(5.0))).unwrap();
    let r2 = b.add(Device::Resistor(Resistor::with_resistance(5.0))).unwrap();
    b.ground((vs, 1)).unwrap();
    b.connect((vs, 0), (r1, 0)).unwrap();
    b.connect((vs, 0), (r2, 0)).unwrap();
    b.ground((r1, 1)).unwrap();
    b.ground((r2, 1)).unwrap();
    let mut circuit = b.build().unwrap();

    assert!(circuit.step(1e-3).unwrap());
    assert!((circuit.current(r1).unwrap() - 2.0).abs() < EPS);
    assert!((circuit.current(r2).unwrap() - 2.0).abs() < EPS);
    let source_current = circuit.current(vs).unwrap();
    assert!((source_current.abs() - 4.0).abs() < EPS);
}

/// (E) A chain of 50 virtual resistors of resistance 1..=50Ω compiles to
/// one Line of total resistance 1275Ω.
#[test]
fn scenario_e_fifty_segment_line_compiles_to_1275_ohms() {
    let mut b = CircuitBuilder::new();
    let vs = b.add(Device::VoltageSource(VoltageSource::with_voltage(10.0))).unwrap();
    b.ground((vs, 1)).unwrap();

    let mut prev: PinHandle = (vs, 0).into();
    for r in 1..=50 {
        let vr = b.add_virtual_resistor(r as f64).unwrap();
        b.connect(prev, (vr, 0)).unwrap();
        prev = (vr, 1).into();
    }
    let sink = b.add(Device::Resistor(Resistor::with_resistance(1.0))).unwrap();
    b.connect(prev, (sink, 0)).unwrap();
    b.ground((sink, 1)).unwrap();

    let mut circuit = b.build().unwrap();

    assert!(circuit.step(1e-3).unwrap());
    // total loop resistance: 1275 (line) + 1 (sink) = 1276
    let expected_current = 10.0 / 1276.0;
    assert!((circuit.current(sink).unwrap() - expected_current).abs() < 1e-9);
}

/// (F) A virtual resistor chain with a real tap in the middle splits
/// into two Line segments separated by one real node.
#[test]
fn scenario_f_real_tap_splits_chain_into_two_lines() {
    let mut b = CircuitBuilder::new();
    let vs = b.add(Device::VoltageSource(VoltageSource::with_voltage(10.0))).unwrap();
    b.ground((vs, 1)).unwrap();

    let vr1 = b.add_virtual_resistor(10.0).unwrap();
    let vr2 = b.add_virtual_resistor(20.0).unwrap();
    let tap = b.add(Device::Resistor(Resistor::with_resistance(1_000_000.0))).unwrap();

    b.connect((vs, 0), (vr1, 0)).unwrap();
    b.connect((vr1, 1), (tap, 0)).unwrap();
    b.connect((tap, 0), (vr2, 0)).unwrap();
    b.ground((tap, 1)).unwrap();
    let sink = b.add(Device::Resistor(Resistor::with_resistance(1.0))).unwrap();
    b.connect((vr2, 1), (sink, 0)).unwrap();
    b.ground((sink, 1)).unwrap();

    let circuit = b.build().unwrap();
    // The tap's real node forces two distinct Lines (each one part here,
    // since a single virtual resistor per side), not one 30Ω fusion.
    let line_count = circuit
        .component_ids()
        .filter(|&id| matches!(circuit.device(id), Some(mna_circuit::device::Device::Line(_))))
        .count();
    assert_eq!(line_count, 2);
}
