//! Bell-State Sampling Demo
//!
//! Builds the two-qubit Bell circuit, runs it for 10 000 shots on the
//! local statevector simulator, and prints the measurement histogram as
//! a single line, e.g. `{"00": 5012, "11": 4988}`.

use sindri_hal::Backend;
use sindri_ir::Circuit;
use sindri_sim::SimulatorBackend;

const SHOTS: u32 = 10_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so stdout carries only the histogram.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let circuit = Circuit::bell()?;
    let backend = SimulatorBackend::new();
    let result = backend.execute(&circuit, SHOTS).await?;

    println!("{}", result.counts);

    Ok(())
}
