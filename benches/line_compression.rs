use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mna_circuit::builder::{CircuitBuilder, PinHandle};
use mna_circuit::device::{Device, Resistor, VoltageSource};

/// A voltage source feeding a chain of `n` virtual resistors into a
/// grounded resistor, forcing the `LineCompiler` to fuse the whole chain
/// into a single `Line` stamp.
fn build_virtual_chain(n: usize) -> CircuitBuilder {
    let mut b = CircuitBuilder::new();
    let vs = b.add(Device::VoltageSource(VoltageSource::with_voltage(5.0))).unwrap();
    b.ground((vs, 1)).unwrap();

    let mut prev: PinHandle = (vs, 0).into();
    for _ in 0..n {
        let vr = b.add_virtual_resistor(1.0).unwrap();
        b.connect(prev, (vr, 0)).unwrap();
        prev = (vr, 1).into();
    }

    let r = b.add(Device::Resistor(Resistor::with_resistance(1000.0))).unwrap();
    b.connect(prev, (r, 0)).unwrap();
    b.ground((r, 1)).unwrap();
    b
}

fn bench_line_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_compiler");

    for size in [10usize, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("compile_chain", size), size, |b, &size| {
            b.iter(|| {
                let mut builder = build_virtual_chain(size);
                builder.build().unwrap()
            });
        });
    }

    group.finish();
}

fn bench_repeated_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for size in [10usize, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("step_after_build", size), size, |b, &size| {
            let mut builder = build_virtual_chain(size);
            let mut circuit = builder.build().unwrap();
            circuit.step(1e-3).unwrap();

            b.iter(|| {
                circuit.step(1e-3).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_line_compilation, bench_repeated_steps);
criterion_main!(benches);
