//! Sindri Circuit Intermediate Representation
//!
//! Core data structures for representing quantum circuits. Circuits are
//! stored as a DAG internally; the high-level [`Circuit`] API provides a
//! fluent builder over it.
//!
//! # Core Components
//!
//! - **Qubits and classical bits**: [`QubitId`], [`ClbitId`] handles
//! - **Gates**: [`StandardGate`], the closed gate vocabulary
//! - **Instructions**: [`Instruction`] combining an operation with operands;
//!   measurements carry their qubit→clbit map explicitly
//! - **DAG**: [`CircuitDag`], the internal wire graph
//! - **Circuit**: [`Circuit`], the builder API with prebuilt `bell`, `ghz`,
//!   and `qft` constructors
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use sindri_ir::{Circuit, QubitId};
//!
//! // Create a new circuit with 2 qubits and 2 classical bits
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//!
//! // Build the Bell state: |00⟩ → (|00⟩ + |11⟩)/√2
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! // Measure both qubits into their classical bits
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3); // H, CX, measure
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CY`, `CZ`, `CH` | 2 | Controlled Pauli-Y/Z and Hadamard |
//! | `Swap` | 2 | SWAP gate |
//! | `CP` | 2 | Controlled phase gate |
//! | `CCX` | 3 | Toffoli (CCNOT) gate |
//! | `CSwap` | 3 | Fredkin gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
