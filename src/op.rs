use std::fmt;
use std::ops::{Add, AddAssign};

use crate::qubit::Qubit;

/// Primitive gates. Synthesis only ever emits `X`, `Cnot` and `Toffoli`;
/// `Y` and `Z` exist so fault injection can express phase errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    X(Qubit),
    Y(Qubit),
    Z(Qubit),
    Cnot(Qubit, Qubit),
    Toffoli(Qubit, Qubit, Qubit),
}

impl Gate {
    /// The cells this gate touches, target last.
    pub fn qubits(&self) -> Vec<Qubit> {
        match *self {
            Gate::X(q) | Gate::Y(q) | Gate::Z(q) => vec![q],
            Gate::Cnot(c, t) => vec![c, t],
            Gate::Toffoli(c1, c2, t) => vec![c1, c2, t],
        }
    }

    pub fn target(&self) -> Qubit {
        match *self {
            Gate::X(q) | Gate::Y(q) | Gate::Z(q) => q,
            Gate::Cnot(_, t) | Gate::Toffoli(_, _, t) => t,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::X(q) => write!(f, "X({})", q),
            Gate::Y(q) => write!(f, "Y({})", q),
            Gate::Z(q) => write!(f, "Z({})", q),
            Gate::Cnot(c, t) => write!(f, "CNOT({}, {})", c, t),
            Gate::Toffoli(c1, c2, t) => write!(f, "TOFFOLI({}, {}, {})", c1, c2, t),
        }
    }
}

/// Per-kind gate tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateCounts {
    pub x: u64,
    pub y: u64,
    pub z: u64,
    pub cnot: u64,
    pub toffoli: u64,
}

impl GateCounts {
    pub fn of(gate: &Gate) -> Self {
        let mut counts = Self::default();
        match gate {
            Gate::X(_) => counts.x = 1,
            Gate::Y(_) => counts.y = 1,
            Gate::Z(_) => counts.z = 1,
            Gate::Cnot(..) => counts.cnot = 1,
            Gate::Toffoli(..) => counts.toffoli = 1,
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.x + self.y + self.z + self.cnot + self.toffoli
    }

    /// `(gates, t_gates)`. With `decompose`, each Toffoli is costed as its
    /// Clifford+T decomposition: 15 gates, 7 of them T.
    pub fn describe(&self, decompose: bool) -> (u64, u64) {
        if decompose {
            let others = self.total() - self.toffoli;
            (others + 15 * self.toffoli, 7 * self.toffoli)
        } else {
            (self.total(), 0)
        }
    }
}

impl Add for GateCounts {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for GateCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
        self.cnot += rhs.cnot;
        self.toffoli += rhs.toffoli;
    }
}

/*
    an op tree mirrors the call structure of the synthesis routines:

        Seq [ Seq [ Gate, Gate ], Gate, Seq [ Seq [ ... ] ] ]

    flattening walks it depth first with an explicit stack, so deep
    karatsuba recursions never recurse on the native stack at replay time.
    `Count` leaves are produced instead of gates in counting-only mode.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Gate(Gate),
    Count(GateCounts),
    Seq(Vec<Op>),
}

impl Op {
    pub fn empty() -> Self {
        Op::Seq(vec![])
    }

    /// Depth-first iterator over the leaves (`Gate` or `Count`).
    pub fn flatten(&self) -> Flatten<'_> {
        Flatten {
            stack: vec![std::slice::from_ref(self).iter()],
        }
    }

    /// Only the materialized gates, in execution order.
    pub fn gates(&self) -> impl Iterator<Item = Gate> + '_ {
        self.flatten().filter_map(|op| match op {
            Op::Gate(g) => Some(*g),
            _ => None,
        })
    }

    pub fn counts(&self) -> GateCounts {
        self.flatten().fold(GateCounts::default(), |acc, op| match op {
            Op::Gate(g) => acc + GateCounts::of(g),
            Op::Count(c) => acc + *c,
            Op::Seq(_) => acc,
        })
    }
}

impl From<Gate> for Op {
    fn from(gate: Gate) -> Self {
        Op::Gate(gate)
    }
}

pub struct Flatten<'a> {
    stack: Vec<std::slice::Iter<'a, Op>>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = &'a Op;

    fn next(&mut self) -> Option<&'a Op> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Op::Seq(children)) => self.stack.push(children.iter()),
                Some(leaf) => return Some(leaf),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
