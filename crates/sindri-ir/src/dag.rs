//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input boundary node for a wire.
    In(WireId),
    /// Output boundary node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an input node.
    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, DagNode::In(_))
    }

    /// Check if this is an output node.
    #[inline]
    pub fn is_output(&self) -> bool {
        matches!(self, DagNode::Out(_))
    }

    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
///
/// Every qubit and every classical bit is one wire; an instruction node sits
/// on the path between the In and Out boundary nodes of each wire it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG, labeled with the wire it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// DAG-based circuit representation.
///
/// - Nodes are wire inputs, wire outputs, or operations.
/// - Edges carry wire labels; following edges of one wire from its In node
///   visits that wire's operations in program order and ends at its Out node.
/// - The DAG is acyclic by construction: `apply` only splices new nodes in
///   front of wire outputs.
///
/// A `front` index maps each wire to the node currently feeding its output,
/// so `apply` splices in O(1) lookups per wire instead of scanning the
/// output node's incoming edges.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from wire to its input boundary node.
    inputs: FxHashMap<WireId, NodeIndex>,
    /// Map from wire to its output boundary node.
    outputs: FxHashMap<WireId, NodeIndex>,
    /// Map from wire to the node currently feeding its output.
    front: FxHashMap<WireId, NodeIndex>,
    /// Number of quantum wires.
    num_qubits: usize,
    /// Number of classical wires.
    num_clbits: usize,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            inputs: FxHashMap::default(),
            outputs: FxHashMap::default(),
            front: FxHashMap::default(),
            num_qubits: 0,
            num_clbits: 0,
        }
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.inputs.contains_key(&wire) {
            return false;
        }
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.inputs.insert(wire, in_node);
        self.outputs.insert(wire, out_node);
        self.front.insert(wire, in_node);
        true
    }

    /// Add a qubit wire to the circuit.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.num_qubits += 1;
        }
    }

    /// Add a classical wire to the circuit.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(WireId::Clbit(clbit)) {
            self.num_clbits += 1;
        }
    }

    /// Splice `op_node` between the current front of `wire` and its output.
    fn splice_at_front(&mut self, wire: WireId, op_node: NodeIndex) -> IrResult<()> {
        let out_node = self.outputs[&wire];
        let prev_node = self.front[&wire];

        let edge_id = self
            .graph
            .edges_directed(prev_node, Direction::Outgoing)
            .find(|e| e.weight().wire == wire && e.target() == out_node)
            .map(|e| e.id())
            .ok_or_else(|| {
                IrError::InvalidDag(format!("Missing edge from front to output on wire {wire:?}"))
            })?;

        self.graph.remove_edge(edge_id);
        self.graph.add_edge(prev_node, op_node, DagEdge { wire });
        self.graph.add_edge(op_node, out_node, DagEdge { wire });
        self.front.insert(wire, op_node);
        Ok(())
    }

    /// Append an instruction at the current end of its wires.
    ///
    /// Validates gate arity, operand existence, and duplicate qubit operands
    /// before touching the graph.
    #[allow(clippy::needless_pass_by_value, clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let op_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.inputs.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    op_name: op_name.clone(),
                });
            }
        }
        for &clbit in &instruction.clbits {
            if !self.inputs.contains_key(&WireId::Clbit(clbit)) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    op_name: op_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op_name: op_name.clone(),
                });
            }
        }

        let wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let op_node = self.graph.add_node(DagNode::Op(instruction));
        for wire in wires {
            self.splice_at_front(wire, op_node)?;
        }
        Ok(op_node)
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        let sorted: Vec<_> = petgraph::algo::toposort(&self.graph, None)
            .expect("circuit DAG is acyclic by construction")
            .into_iter()
            .filter_map(|idx| match &self.graph[idx] {
                DagNode::Op(inst) => Some((idx, inst)),
                _ => None,
            })
            .collect();
        sorted.into_iter()
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(|n| n.instruction())
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        let io_nodes = 2 * (self.num_qubits + self.num_clbits);
        self.graph.node_count().saturating_sub(io_nodes)
    }

    /// Check whether any operation is a measurement.
    pub fn has_measurement(&self) -> bool {
        self.graph
            .node_weights()
            .any(|n| matches!(n, DagNode::Op(inst) if inst.is_measure()))
    }

    /// Longest operation chain over any wire path.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for node in petgraph::algo::toposort(&self.graph, None)
            .expect("circuit DAG is acyclic by construction")
        {
            let pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = if self.graph[node].is_op() {
                pred_depth + 1
            } else {
                pred_depth
            };

            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Iterate over qubit wires (arbitrary order).
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.inputs.keys().filter_map(|w| match w {
            WireId::Qubit(q) => Some(*q),
            WireId::Clbit(_) => None,
        })
    }

    /// Iterate over classical wires (arbitrary order).
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.inputs.keys().filter_map(|w| match w {
            WireId::Clbit(c) => Some(*c),
            WireId::Qubit(_) => None,
        })
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks acyclicity, paired In/Out boundary nodes, unbroken wire paths
    /// from In to Out, and that the topological order covers every node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        for &wire in self.inputs.keys() {
            if !self.outputs.contains_key(&wire) {
                return Err(IrError::InvalidDag(format!(
                    "Wire {wire:?} has an In node but no Out node"
                )));
            }
        }
        for &wire in self.outputs.keys() {
            if !self.inputs.contains_key(&wire) {
                return Err(IrError::InvalidDag(format!(
                    "Wire {wire:?} has an Out node but no In node"
                )));
            }
        }

        // Walk each wire from In to Out along its labeled edges.
        for (&wire, &in_node) in &self.inputs {
            let out_node = self.outputs[&wire];
            let mut current = in_node;
            let mut steps = 0;
            let max_steps = self.graph.node_count();

            while current != out_node {
                let next = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target());

                match next {
                    Some(n) => current = n,
                    None => {
                        return Err(IrError::InvalidDag(format!(
                            "Wire {wire:?} is broken: no outgoing edge from node {current:?}"
                        )));
                    }
                }

                steps += 1;
                if steps > max_steps {
                    return Err(IrError::InvalidDag(format!(
                        "Wire {wire:?} revisits nodes (path longer than the graph)"
                    )));
                }
            }
        }

        // Acyclicity holds, so a toposort that covers every node proves all
        // operations hang off some wire.
        let topo_nodes = petgraph::algo::toposort(&self.graph, None).unwrap_or_default();
        if topo_nodes.len() != self.graph.node_count() {
            return Err(IrError::InvalidDag(
                "Unreachable operation node found in DAG".into(),
            ));
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}
