use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::qubit::{Qubit, Register};

/// Hands out scratch cells and tracks their lifecycle.
///
/// Every allocation is a fresh identity; retired cells are never handed out
/// again. `peak_concurrency` is therefore the number of physical cells a
/// backend would need if it reused retired storage, while `all_issued` only
/// grows.
#[derive(Clone, Debug, Default)]
pub struct AncillaManager {
    retired: Vec<bool>,
    live: usize,
    peak: usize,
}

impl AncillaManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_one(&mut self) -> Qubit {
        let q = Qubit::Ancilla(self.retired.len());
        self.retired.push(false);
        self.bump(1);
        q
    }

    pub fn allocate_many(&mut self, n: usize) -> Register {
        let start = self.retired.len();
        self.retired.resize(start + n, false);
        self.bump(n);
        (start..start + n)
            .map(Qubit::Ancilla)
            .collect::<Vec<_>>()
            .into()
    }

    /// Marks the given cells retired. Nothing is marked unless every cell is
    /// a live ancilla issued by this manager.
    pub fn retire(&mut self, qubits: &[Qubit]) -> Result<()> {
        let mut seen = HashSet::with_capacity(qubits.len());
        for &q in qubits {
            let idx = match q {
                Qubit::Ancilla(idx) => idx,
                Qubit::Named { .. } => {
                    return Err(Error::protocol(format!("{} is not an ancilla", q)))
                }
            };
            match self.retired.get(idx) {
                None => return Err(Error::protocol(format!("{} was never issued", q))),
                Some(true) => return Err(Error::protocol(format!("{} retired twice", q))),
                Some(false) => {}
            }
            if !seen.insert(idx) {
                return Err(Error::protocol(format!("{} retired twice", q)));
            }
        }

        for idx in seen {
            self.retired[idx] = true;
        }
        self.live -= qubits.len();
        Ok(())
    }

    pub fn retire_one(&mut self, qubit: Qubit) -> Result<()> {
        self.retire(std::slice::from_ref(&qubit))
    }

    pub fn is_retired(&self, qubit: Qubit) -> bool {
        match qubit {
            Qubit::Ancilla(idx) => self.retired.get(idx).copied().unwrap_or(false),
            Qubit::Named { .. } => false,
        }
    }

    /// Register cells are always known; an ancilla only once issued here.
    pub fn is_issued(&self, qubit: Qubit) -> bool {
        match qubit {
            Qubit::Ancilla(idx) => idx < self.retired.len(),
            Qubit::Named { .. } => true,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak
    }

    /// Each retirement is one measurement on hardware.
    pub fn retired_count(&self) -> usize {
        self.retired.len() - self.live
    }

    pub fn all_retired(&self) -> bool {
        self.live == 0
    }

    /// Every ancilla ever issued, retired or not.
    pub fn all_issued(&self) -> impl Iterator<Item = Qubit> + '_ {
        (0..self.retired.len()).map(Qubit::Ancilla)
    }

    pub fn len(&self) -> usize {
        self.retired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retired.is_empty()
    }

    fn bump(&mut self, n: usize) {
        self.live += n;
        self.peak = self.peak.max(self.live);
    }
}
