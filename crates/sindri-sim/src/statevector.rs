//! Statevector simulation engine.
//!
//! Holds the full `2^n` complex amplitude vector and evolves it gate by
//! gate. Every single-qubit gate is expressed as a 2x2 matrix or a
//! diagonal, so the engine needs only a handful of kernels: one for
//! general 2x2 matrices, one for diagonals, their controlled variants,
//! and the three permutation gates (`swap`, `ccx`, `cswap`).

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use sindri_ir::{QubitId, StandardGate};

const ONE: Complex64 = Complex64::new(1.0, 0.0);
const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Unit phase factor `e^(i*theta)`.
fn phase(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

// Row-major 2x2 matrices: [m00, m01, m10, m11].

fn mat_x() -> [Complex64; 4] {
    [ZERO, ONE, ONE, ZERO]
}

fn mat_y() -> [Complex64; 4] {
    [
        ZERO,
        Complex64::new(0.0, -1.0),
        Complex64::new(0.0, 1.0),
        ZERO,
    ]
}

fn mat_h() -> [Complex64; 4] {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [h, h, h, -h]
}

fn mat_rx(theta: f64) -> [Complex64; 4] {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
    [c, neg_i_s, neg_i_s, c]
}

fn mat_ry(theta: f64) -> [Complex64; 4] {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    [c, -s, s, c]
}

/// A quantum state over `n` qubits.
///
/// Basis state indices follow the usual binary convention: bit `k` of
/// the index is the state of qubit `k`, so `|q1 q0>` = `|10>` lives at
/// index 2.
pub struct Statevector {
    /// The state amplitudes (`2^n` complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to `|0...0>`.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Probability of each basis state, without collapsing.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Apply a standard gate to the given qubits.
    ///
    /// `qubits.len()` must equal `gate.num_qubits()`; the circuit layer
    /// validates this before instructions reach the engine.
    pub fn apply_gate(&mut self, gate: StandardGate, qubits: &[QubitId]) {
        use StandardGate as G;

        let q = |k: usize| qubits[k].index();
        match gate {
            G::I => {}
            G::X => self.apply_single(q(0), mat_x()),
            G::Y => self.apply_single(q(0), mat_y()),
            G::Z => self.apply_diag(q(0), ONE, -ONE),
            G::H => self.apply_single(q(0), mat_h()),
            G::S => self.apply_diag(q(0), ONE, phase(FRAC_PI_2)),
            G::Sdg => self.apply_diag(q(0), ONE, phase(-FRAC_PI_2)),
            G::T => self.apply_diag(q(0), ONE, phase(FRAC_PI_4)),
            G::Tdg => self.apply_diag(q(0), ONE, phase(-FRAC_PI_4)),
            G::Rx(theta) => self.apply_single(q(0), mat_rx(theta)),
            G::Ry(theta) => self.apply_single(q(0), mat_ry(theta)),
            G::Rz(theta) => self.apply_diag(q(0), phase(-theta / 2.0), phase(theta / 2.0)),
            G::P(theta) => self.apply_diag(q(0), ONE, phase(theta)),
            G::CX => self.apply_controlled(q(0), q(1), mat_x()),
            G::CY => self.apply_controlled(q(0), q(1), mat_y()),
            G::CZ => self.apply_controlled_diag(q(0), q(1), ONE, -ONE),
            G::CH => self.apply_controlled(q(0), q(1), mat_h()),
            G::Swap => self.apply_swap(q(0), q(1)),
            G::CP(theta) => self.apply_controlled_diag(q(0), q(1), ONE, phase(theta)),
            G::CCX => self.apply_ccx(q(0), q(1), q(2)),
            G::CSwap => self.apply_cswap(q(0), q(1), q(2)),
        }
    }

    /// Measure one qubit in the computational basis and collapse the
    /// state. Returns the outcome (0 or 1).
    pub fn measure(&mut self, qubit: QubitId, rng: &mut impl Rng) -> u8 {
        let mask = 1usize << qubit.index();

        let prob_one: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();

        let outcome = rng.gen_range(0.0..1.0) < prob_one;

        // Zero out amplitudes inconsistent with the outcome, then
        // renormalize what survives.
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) != outcome {
                *amp = ZERO;
            }
        }
        let kept = if outcome { prob_one } else { 1.0 - prob_one };
        if kept > 0.0 {
            let scale = 1.0 / kept.sqrt();
            for amp in &mut self.amplitudes {
                *amp *= scale;
            }
        }

        u8::from(outcome)
    }

    /// Reset one qubit to `|0>`: measure, then flip if the outcome was 1.
    pub fn reset(&mut self, qubit: QubitId, rng: &mut impl Rng) {
        if self.measure(qubit, rng) == 1 {
            self.apply_single(qubit.index(), mat_x());
        }
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    fn apply_single(&mut self, qubit: usize, m: [Complex64; 4]) {
        let mask = 1usize << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0] * a + m[1] * b;
                self.amplitudes[j] = m[2] * a + m[3] * b;
            }
        }
    }

    fn apply_diag(&mut self, qubit: usize, d0: Complex64, d1: Complex64) {
        let mask = 1usize << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { d0 } else { d1 };
        }
    }

    fn apply_controlled(&mut self, control: usize, target: usize, m: [Complex64; 4]) {
        let ctrl_mask = 1usize << control;
        let tgt_mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0] * a + m[1] * b;
                self.amplitudes[j] = m[2] * a + m[3] * b;
            }
        }
    }

    fn apply_controlled_diag(&mut self, control: usize, target: usize, d0: Complex64, d1: Complex64) {
        let ctrl_mask = 1usize << control;
        let tgt_mask = 1usize << target;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & ctrl_mask != 0 {
                *amp *= if i & tgt_mask == 0 { d0 } else { d1 };
            }
        }
    }

    fn apply_swap(&mut self, a: usize, b: usize) {
        let mask_a = 1usize << a;
        let mask_b = 1usize << b;
        for i in 0..self.amplitudes.len() {
            if (i & mask_a != 0) && (i & mask_b == 0) {
                let j = (i & !mask_a) | mask_b;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = 1usize << c1;
        let c2_mask = 1usize << c2;
        let tgt_mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cswap(&mut self, control: usize, a: usize, b: usize) {
        let ctrl_mask = 1usize << control;
        let mask_a = 1usize << a;
        let mask_b = 1usize << b;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & mask_a != 0) && (i & mask_b == 0) {
                let j = (i & !mask_a) | mask_b;
                self.amplitudes.swap(i, j);
            }
        }
    }
}
