use std::fmt;
use std::ops::Deref;

/// Identity of a single bit-cell.
///
/// Cells are plain handles: the value lives in the simulator's state, so two
/// handles naming the same cell alias each other everywhere, including
/// through sub-register slices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qubit {
    /// cell `index` of a caller supplied register
    Named { register: usize, index: usize },
    /// scratch cell handed out by an `AncillaManager`
    Ancilla(usize),
}

impl Qubit {
    pub fn is_ancilla(&self) -> bool {
        matches!(self, Qubit::Ancilla(_))
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qubit::Named { register, index } => write!(f, "r{}[{}]", register, index),
            Qubit::Ancilla(idx) => write!(f, "anc{}", idx),
        }
    }
}

/// An owned, ordered run of cells, least significant first.
///
/// Sub-registers are ordinary borrowed slices (`&reg[lo..hi]`), which share
/// identity with the parent and never copy anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Register(Vec<Qubit>);

impl Register {
    pub fn qubits(&self) -> &[Qubit] {
        &self.0
    }
}

impl Deref for Register {
    type Target = [Qubit];

    fn deref(&self) -> &[Qubit] {
        &self.0
    }
}

impl AsRef<[Qubit]> for Register {
    fn as_ref(&self) -> &[Qubit] {
        &self.0
    }
}

impl From<Vec<Qubit>> for Register {
    fn from(qubits: Vec<Qubit>) -> Self {
        Self(qubits)
    }
}

impl<'a> IntoIterator for &'a Register {
    type Item = &'a Qubit;
    type IntoIter = std::slice::Iter<'a, Qubit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Issues the caller-side registers (inputs and outputs). Cells handed out
/// here are never allocated or retired by the synthesis routines.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    names: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, prefix: &str, n: usize) -> Register {
        let id = self.names.len();
        self.names.push(prefix.to_string());
        (0..n)
            .map(|index| Qubit::Named {
                register: id,
                index,
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// Display name of a cell, e.g. `x3` or `anc17`.
    pub fn name(&self, qubit: Qubit) -> String {
        match qubit {
            Qubit::Named { register, index } => match self.names.get(register) {
                Some(prefix) => format!("{}{}", prefix, index),
                None => qubit.to_string(),
            },
            Qubit::Ancilla(_) => qubit.to_string(),
        }
    }
}
