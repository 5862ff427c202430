//! Property-based tests for the circuit builder and DAG.
//!
//! Random gate sequences over valid operands must always leave the DAG
//! structurally sound, with metadata consistent with what was applied.

use proptest::prelude::*;
use sindri_ir::{Circuit, QubitId};

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Z(u32),
    Rz(u32, f64),
    CX(u32, u32),
    CP(u32, u32, f64),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let result = match self {
            GateOp::H(q) => circuit.h(QubitId(q)),
            GateOp::X(q) => circuit.x(QubitId(q)),
            GateOp::Z(q) => circuit.z(QubitId(q)),
            GateOp::Rz(q, theta) => circuit.rz(theta, QubitId(q)),
            GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)),
            GateOp::CP(c, t, theta) => circuit.cp(theta, QubitId(c), QubitId(t)),
        };
        // Operands are valid by construction.
        result.unwrap();
    }

    /// Wires this op occupies, for the depth lower bound.
    fn touches(&self, qubit: u32) -> bool {
        match *self {
            GateOp::H(q) | GateOp::X(q) | GateOp::Z(q) | GateOp::Rz(q, _) => q == qubit,
            GateOp::CX(c, t) | GateOp::CP(c, t, _) => c == qubit || t == qubit,
        }
    }
}

/// Generate a random gate operation for a circuit with `num_qubits` qubits.
fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    if num_qubits < 2 {
        prop_oneof![
            (0..num_qubits).prop_map(GateOp::H),
            (0..num_qubits).prop_map(GateOp::X),
            (0..num_qubits).prop_map(GateOp::Z),
            (0..num_qubits, -6.3..6.3).prop_map(|(q, t)| GateOp::Rz(q, t)),
        ]
        .boxed()
    } else {
        prop_oneof![
            (0..num_qubits).prop_map(GateOp::H),
            (0..num_qubits).prop_map(GateOp::X),
            (0..num_qubits).prop_map(GateOp::Z),
            (0..num_qubits, -6.3..6.3).prop_map(|(q, t)| GateOp::Rz(q, t)),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| GateOp::CX(c, t)),
            (0..num_qubits, 0..num_qubits, -6.3..6.3)
                .prop_filter("control and target must differ", |(c, t, _)| c != t)
                .prop_map(|(c, t, theta)| GateOp::CP(c, t, theta)),
        ]
        .boxed()
    }
}

/// Generate qubit count plus a gate sequence valid for that count.
fn arb_circuit_ops() -> impl Strategy<Value = (u32, Vec<GateOp>)> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_gate_op(num_qubits), 0..=20),
        )
    })
}

proptest! {
    /// Every random builder sequence leaves the DAG structurally intact
    /// and the op count equal to the number of applied gates.
    #[test]
    fn test_random_circuits_stay_consistent((num_qubits, ops) in arb_circuit_ops()) {
        let mut circuit = Circuit::with_size("prop", num_qubits, 0);
        let expected_ops = ops.len();
        for op in ops {
            op.apply(&mut circuit);
        }

        prop_assert_eq!(circuit.num_qubits(), num_qubits as usize);
        prop_assert_eq!(circuit.num_ops(), expected_ops);
        prop_assert_eq!(circuit.dag().topological_ops().count(), expected_ops);
        circuit.dag().verify_integrity().unwrap();
    }

    /// Depth is bounded below by the busiest wire and above by the op count.
    #[test]
    fn test_depth_bounds((num_qubits, ops) in arb_circuit_ops()) {
        let mut circuit = Circuit::with_size("prop", num_qubits, 0);
        for op in ops.clone() {
            op.apply(&mut circuit);
        }

        let depth = circuit.depth();
        prop_assert!(depth <= circuit.num_ops());

        let busiest = (0..num_qubits)
            .map(|q| ops.iter().filter(|op| op.touches(q)).count())
            .max()
            .unwrap_or(0);
        prop_assert!(depth >= busiest);
    }

    /// `measure_all` always yields one clbit per qubit and a measured circuit.
    #[test]
    fn test_measure_all_after_random_gates((num_qubits, ops) in arb_circuit_ops()) {
        let mut circuit = Circuit::with_size("prop", num_qubits, 0);
        for op in ops {
            op.apply(&mut circuit);
        }
        prop_assert!(!circuit.has_measurements());

        circuit.measure_all().unwrap();
        prop_assert!(circuit.has_measurements());
        prop_assert_eq!(circuit.num_clbits(), num_qubits as usize);
        circuit.dag().verify_integrity().unwrap();
    }
}
