use crate::ancilla::AncillaManager;
use crate::error::{Error, Result};
use crate::op::{Gate, GateCounts, Op};
use crate::qubit::{Qubit, Register};

/// What the gate emitters produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// materialized gates, replayable by the simulator
    #[default]
    Gates,
    /// only tallies; each `seq` collapses into a single `Op::Count`
    Counts,
}

/// Synthesis context threaded through every routine: the ancilla allocator
/// plus the emission mode. Gates naming a retired ancilla are refused.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    ancillas: AncillaManager,
    mode: Mode,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counting() -> Self {
        Self {
            ancillas: AncillaManager::new(),
            mode: Mode::Counts,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ancillas(&self) -> &AncillaManager {
        &self.ancillas
    }

    pub fn into_ancillas(self) -> AncillaManager {
        self.ancillas
    }

    pub fn ancilla(&mut self) -> Qubit {
        self.ancillas.allocate_one()
    }

    pub fn ancilla_register(&mut self, n: usize) -> Register {
        self.ancillas.allocate_many(n)
    }

    pub fn retire(&mut self, qubits: &[Qubit]) -> Result<()> {
        self.ancillas.retire(qubits)
    }

    pub fn retire_one(&mut self, qubit: Qubit) -> Result<()> {
        self.ancillas.retire_one(qubit)
    }

    pub fn x(&self, q: Qubit) -> Result<Op> {
        self.emit(Gate::X(q))
    }

    pub fn cnot(&self, c: Qubit, t: Qubit) -> Result<Op> {
        self.emit(Gate::Cnot(c, t))
    }

    pub fn toffoli(&self, c1: Qubit, c2: Qubit, t: Qubit) -> Result<Op> {
        self.emit(Gate::Toffoli(c1, c2, t))
    }

    /// Wraps the ops of one routine. In counting mode the whole subtree is
    /// folded into a single tally.
    pub fn seq(&self, ops: Vec<Op>) -> Op {
        match self.mode {
            Mode::Gates => Op::Seq(ops),
            Mode::Counts => Op::Count(
                ops.iter()
                    .fold(GateCounts::default(), |acc, op| acc + op.counts()),
            ),
        }
    }

    fn emit(&self, gate: Gate) -> Result<Op> {
        for q in gate.qubits() {
            if !self.ancillas.is_issued(q) {
                return Err(Error::protocol(format!(
                    "{} was never issued but used by {}",
                    q, gate
                )));
            }
            if self.ancillas.is_retired(q) {
                return Err(Error::protocol(format!(
                    "{} is retired but used by {}",
                    q, gate
                )));
            }
        }
        Ok(match self.mode {
            Mode::Gates => Op::Gate(gate),
            Mode::Counts => Op::Count(GateCounts::of(&gate)),
        })
    }
}
