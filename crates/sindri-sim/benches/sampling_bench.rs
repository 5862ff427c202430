//! Benchmarks for statevector evolution and shot sampling.
//!
//! Run with: cargo bench -p sindri-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sindri_hal::Backend;
use sindri_ir::{Circuit, ClbitId, QubitId, StandardGate};
use sindri_sim::{SimulatorBackend, Statevector};

fn bench_bell_shots(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("bell_sampling");

    for shots in &[100u32, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("shots", shots), shots, |b, &shots| {
            let backend = SimulatorBackend::with_seed(1);
            let circuit = Circuit::bell().unwrap();
            b.iter(|| {
                runtime
                    .block_on(backend.execute(black_box(&circuit), shots))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_ghz_width(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("ghz_sampling");

    for num_qubits in &[5u32, 10, 15] {
        group.bench_with_input(
            BenchmarkId::new("qubits", num_qubits),
            num_qubits,
            |b, &n| {
                let backend = SimulatorBackend::with_seed(1);
                let circuit = Circuit::ghz(n).unwrap();
                b.iter(|| {
                    runtime
                        .block_on(backend.execute(black_box(&circuit), 1_000))
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_execution_paths(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("execution_paths");

    // Terminal measurements: one evolution, then per-shot sampling.
    group.bench_function("terminal_measurements", |b| {
        let backend = SimulatorBackend::with_seed(1);
        let circuit = Circuit::bell().unwrap();
        b.iter(|| {
            runtime
                .block_on(backend.execute(black_box(&circuit), 200))
                .unwrap()
        });
    });

    // Gate after a measurement forces full re-simulation every shot.
    group.bench_function("mid_circuit_measurement", |b| {
        let backend = SimulatorBackend::with_seed(1);
        let mut circuit = Circuit::with_size("midway", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();
        b.iter(|| {
            runtime
                .block_on(backend.execute(black_box(&circuit), 200))
                .unwrap()
        });
    });

    group.finish();
}

fn bench_statevector_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("statevector_evolution");

    for num_qubits in &[10u32, 15, 20] {
        group.bench_with_input(
            BenchmarkId::new("ghz_chain", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let mut sv = Statevector::new(n as usize);
                    sv.apply_gate(StandardGate::H, &[QubitId(0)]);
                    for i in 0..n - 1 {
                        sv.apply_gate(StandardGate::CX, &[QubitId(i), QubitId(i + 1)]);
                    }
                    black_box(sv.probabilities())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_bell_shots,
    bench_ghz_width,
    bench_execution_paths,
    bench_statevector_evolution,
);

criterion_main!(benches);
