//! Backend capability introspection.
//!
//! Describes what a backend can do: qubit count, supported gates, and
//! shot limits. Callers use [`Capabilities`] to size circuits before
//! submission; backends use it to implement `validate()`.

use serde::{Deserialize, Serialize};

/// Capabilities of a quantum backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (lowercase OpenQASM-style naming).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this backend is a simulator (`true`) or real hardware.
    pub is_simulator: bool,
    /// Additional capability flags, e.g. `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a local statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "statevector_simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: true,
            features: vec!["statevector".into(), "mid_circuit_measurement".into()],
        }
    }

    /// Override the backend name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check whether a capability flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate set supported by a backend.
///
/// Gate names are lowercase: `h`, `cx`, `rz`, `ccx`, etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Create the universal gate set of a statevector simulator.
    pub fn universal() -> Self {
        Self {
            single_qubit: vec![
                "id".into(),
                "x".into(),
                "y".into(),
                "z".into(),
                "h".into(),
                "s".into(),
                "sdg".into(),
                "t".into(),
                "tdg".into(),
                "rx".into(),
                "ry".into(),
                "rz".into(),
                "p".into(),
            ],
            two_qubit: vec![
                "cx".into(),
                "cy".into(),
                "cz".into(),
                "ch".into(),
                "swap".into(),
                "cp".into(),
            ],
            three_qubit: vec!["ccx".into(), "cswap".into()],
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.three_qubit.iter().any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_simulator() {
        let caps = Capabilities::simulator(25);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 25);
        assert_eq!(caps.max_shots, 100_000);
        assert!(caps.has_feature("statevector"));
        assert!(!caps.has_feature("pulse"));
        assert!(caps.gate_set.contains("h"));
    }

    #[test]
    fn test_with_name() {
        let caps = Capabilities::simulator(2).with_name("bell_box");
        assert_eq!(caps.name, "bell_box");
    }

    #[test]
    fn test_gate_set_universal() {
        let gs = GateSet::universal();
        assert!(gs.contains("h"));
        assert!(gs.contains("cx"));
        assert!(gs.contains("ccx"));
        assert!(gs.contains("cswap"));
        assert!(!gs.contains("ecr"));
        assert!(!gs.contains("prx"));
    }

    #[test]
    fn test_capabilities_serde_round_trip() {
        let caps = Capabilities::simulator(10);
        let json = serde_json::to_string(&caps).unwrap();
        let decoded: Capabilities = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.name, caps.name);
        assert_eq!(decoded.num_qubits, 10);
        assert!(decoded.gate_set.contains("swap"));
    }
}
