//! Sindri Local Statevector Simulator
//!
//! This crate provides a local quantum simulator for testing, development,
//! and small-scale experiments. It holds the full statevector in memory,
//! which gives exact probabilities but limits circuits to ~25 qubits.
//!
//! # Features
//!
//! - **All Standard Gates**: supports every gate in `sindri-ir`
//! - **Mid-Circuit Measurement**: projective collapse, plus `reset`
//! - **Fast Terminal Sampling**: circuits that only measure at the end
//!   are evolved once and sampled per shot from the final distribution
//! - **Reproducible Runs**: optional fixed RNG seed
//!
//! # Memory
//!
//! | Qubits | Statevector |
//! |--------|-------------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//!
//! # Example
//!
//! ```ignore
//! use sindri_hal::Backend;
//! use sindri_ir::Circuit;
//! use sindri_sim::SimulatorBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!
//!     // Run a Bell state, expect ~50% |00> and ~50% |11>
//!     let circuit = Circuit::bell()?;
//!     let result = backend.execute(&circuit, 1000).await?;
//!     println!("{}", result.counts);
//!
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
pub use statevector::Statevector;
