//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use sindri_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use sindri_ir::{Circuit, Instruction, InstructionKind};

use crate::statevector::Statevector;

/// Default qubit limit. At 25 qubits the statevector occupies 512 MB.
pub const DEFAULT_MAX_QUBITS: u32 = 25;

const SIMULATOR_NAME: &str = "statevector_simulator";

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector simulator backend.
///
/// Jobs run synchronously inside `submit()`; by the time a job ID is
/// returned the job is already in a terminal state, so `wait()` and
/// `execute()` never poll more than once.
///
/// Circuits whose measurements are all terminal are evolved once and
/// sampled per shot from the final distribution. Circuits with
/// mid-circuit measurement or reset are re-simulated shot by shot with
/// projective collapse.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Capabilities, cached at construction.
    capabilities: Capabilities,
    /// Finished and cancelled jobs.
    jobs: Mutex<FxHashMap<String, SimJob>>,
    /// Maximum number of qubits accepted.
    max_qubits: u32,
    /// Fixed RNG seed. `None` seeds from entropy per job.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::from_parts(BackendConfig::new(SIMULATOR_NAME), DEFAULT_MAX_QUBITS, None)
    }

    /// Create a simulator with a custom qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::from_parts(BackendConfig::new(SIMULATOR_NAME), max_qubits, None)
    }

    /// Create a simulator with a fixed RNG seed.
    ///
    /// Two simulators built with the same seed produce identical counts
    /// for identical submissions.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(
            BackendConfig::new(SIMULATOR_NAME),
            DEFAULT_MAX_QUBITS,
            Some(seed),
        )
    }

    fn from_parts(config: BackendConfig, max_qubits: u32, seed: Option<u64>) -> Self {
        let capabilities = Capabilities::simulator(max_qubits).with_name(config.name.clone());
        Self {
            config,
            capabilities,
            jobs: Mutex::new(FxHashMap::default()),
            max_qubits,
            seed,
        }
    }

    /// Run a job synchronously.
    #[instrument(skip(self, circuit))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();

        let num_qubits = circuit.num_qubits();
        let num_clbits = circuit.num_clbits();
        let instructions: Vec<Instruction> = circuit
            .dag()
            .topological_ops()
            .map(|(_, inst)| inst.clone())
            .collect();

        debug!(
            num_qubits,
            num_clbits,
            num_ops = instructions.len(),
            shots,
            "starting simulation"
        );

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (counts, method) = if measurements_are_terminal(&instructions, num_qubits) {
            let counts = sample_final_state(&instructions, num_qubits, num_clbits, shots, &mut rng)?;
            (counts, "sampling")
        } else {
            let counts = resimulate_per_shot(&instructions, num_qubits, num_clbits, shots, &mut rng);
            (counts, "resimulation")
        };

        let elapsed = start.elapsed();
        debug!(method, ?elapsed, "simulation completed");

        Ok(ExecutionResult::new(counts, shots)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata(serde_json::json!({
                "simulation_method": method,
                "num_qubits": num_qubits,
            })))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let caps = self.capabilities();
        let mut reasons = Vec::new();

        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "circuit has {} qubits but the simulator supports at most {}",
                circuit.num_qubits(),
                caps.num_qubits
            ));
        }

        for (_, inst) in circuit.dag().topological_ops() {
            if inst.is_gate() && !caps.gate_set.contains(inst.name()) {
                reasons.push(format!("unsupported gate: {}", inst.name()));
            }
        }

        if !circuit.has_measurements() {
            reasons.push("circuit has no measurements; counts would be empty".to_string());
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if shots == 0 {
            return Err(HalError::InvalidShots(
                "shot count must be at least 1".to_string(),
            ));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "requested {} shots but the maximum is {}",
                shots, self.capabilities.max_shots
            )));
        }
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "circuit has {} qubits but the simulator supports at most {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        if !circuit.has_measurements() {
            return Err(HalError::InvalidCircuit(
                "circuit has no measurements; counts would be empty".to_string(),
            ));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots).with_backend(self.name());
        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        }

        debug!(%job_id, "job submitted");

        match self.run_simulation(circuit, shots) {
            Ok(result) => {
                let mut jobs = self
                    .jobs
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                    sim_job.result = Some(result);
                    sim_job.job.transition(JobStatus::Completed);
                }
                Ok(job_id)
            }
            Err(e) => {
                let mut jobs = self
                    .jobs
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                    sim_job.job.transition(JobStatus::Failed(e.to_string()));
                }
                Err(e)
            }
        }
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        match (&sim_job.result, &sim_job.job.status) {
            (Some(result), _) => Ok(result.clone()),
            (None, JobStatus::Failed(msg)) => Err(HalError::JobFailed(msg.clone())),
            (None, JobStatus::Cancelled) => Err(HalError::JobCancelled),
            (None, _) => Err(HalError::JobFailed("result not available".to_string())),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        // Jobs complete inside submit(), so cancellation of a finished
        // job is a no-op; transition() ignores it.
        sim_job.job.transition(JobStatus::Cancelled);
        Ok(())
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra.get("max_qubits") {
            None => DEFAULT_MAX_QUBITS,
            Some(value) => {
                let n = value.as_u64().ok_or_else(|| {
                    HalError::Configuration(format!(
                        "max_qubits must be an unsigned integer, got {value}"
                    ))
                })?;
                u32::try_from(n).map_err(|_| {
                    HalError::Configuration(format!("max_qubits {n} is out of range"))
                })?
            }
        };

        let seed = match config.extra.get("seed") {
            None => None,
            Some(value) => Some(value.as_u64().ok_or_else(|| {
                HalError::Configuration(format!("seed must be an unsigned integer, got {value}"))
            })?),
        };

        Ok(Self::from_parts(config, max_qubits, seed))
    }
}

/// Check whether every measurement is terminal: no reset anywhere, and
/// no operation of any kind touching a qubit after it was measured.
fn measurements_are_terminal(instructions: &[Instruction], num_qubits: usize) -> bool {
    let mut measured = vec![false; num_qubits];
    for inst in instructions {
        match &inst.kind {
            InstructionKind::Reset => return false,
            InstructionKind::Measure => {
                if inst.qubits.iter().any(|q| measured[q.index()]) {
                    return false;
                }
                for q in &inst.qubits {
                    measured[q.index()] = true;
                }
            }
            InstructionKind::Gate(_) => {
                if inst.qubits.iter().any(|q| measured[q.index()]) {
                    return false;
                }
            }
            InstructionKind::Barrier => {}
        }
    }
    true
}

/// Evolve the state once, then draw all shots from the final
/// distribution. Valid only when `measurements_are_terminal` holds.
fn sample_final_state(
    instructions: &[Instruction],
    num_qubits: usize,
    num_clbits: usize,
    shots: u32,
    rng: &mut StdRng,
) -> HalResult<Counts> {
    let mut sv = Statevector::new(num_qubits);
    for inst in instructions {
        if let InstructionKind::Gate(gate) = &inst.kind {
            sv.apply_gate(*gate, &inst.qubits);
        }
    }

    let dist = WeightedIndex::new(sv.probabilities())
        .map_err(|e| HalError::SubmissionFailed(format!("invalid sampling distribution: {e}")))?;

    let pairs: Vec<_> = instructions
        .iter()
        .filter(|inst| inst.is_measure())
        .flat_map(Instruction::measure_pairs)
        .collect();

    let mut counts = Counts::new();
    for _ in 0..shots {
        let outcome = dist.sample(rng);
        let mut bits = vec![b'0'; num_clbits];
        for (qubit, clbit) in &pairs {
            bits[clbit.index()] = if (outcome >> qubit.index()) & 1 == 1 {
                b'1'
            } else {
                b'0'
            };
        }
        counts.record(bits_to_key(&bits));
    }
    Ok(counts)
}

/// Run every shot through the full circuit with projective collapse at
/// each measurement. Handles mid-circuit measurement and reset.
fn resimulate_per_shot(
    instructions: &[Instruction],
    num_qubits: usize,
    num_clbits: usize,
    shots: u32,
    rng: &mut StdRng,
) -> Counts {
    let mut counts = Counts::new();
    for _ in 0..shots {
        let mut sv = Statevector::new(num_qubits);
        let mut bits = vec![b'0'; num_clbits];
        for inst in instructions {
            match &inst.kind {
                InstructionKind::Gate(gate) => sv.apply_gate(*gate, &inst.qubits),
                InstructionKind::Measure => {
                    for (qubit, clbit) in inst.measure_pairs() {
                        bits[clbit.index()] = b'0' + sv.measure(qubit, rng);
                    }
                }
                InstructionKind::Reset => {
                    for qubit in &inst.qubits {
                        sv.reset(*qubit, rng);
                    }
                }
                InstructionKind::Barrier => {}
            }
        }
        counts.record(bits_to_key(&bits));
    }
    counts
}

/// Render classical bits as a key with clbit 0 rightmost.
fn bits_to_key(bits: &[u8]) -> String {
    bits.iter().rev().map(|&b| b as char).collect()
}
