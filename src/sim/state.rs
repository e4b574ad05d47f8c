use std::collections::HashMap;

use num_bigint::BigUint;

use crate::ancilla::AncillaManager;
use crate::error::{Error, Result};
use crate::qubit::Qubit;

/// Classical assignment of every cell a circuit touches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    bits: HashMap<Qubit, bool>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, qubit: Qubit, value: bool) {
        self.bits.insert(qubit, value);
    }

    pub fn get(&self, qubit: Qubit) -> Result<bool> {
        self.bits
            .get(&qubit)
            .copied()
            .ok_or_else(|| Error::protocol(format!("{} was never initialized", qubit)))
    }

    pub(crate) fn flip(&mut self, qubit: Qubit) -> Result<()> {
        match self.bits.get_mut(&qubit) {
            Some(bit) => {
                *bit ^= true;
                Ok(())
            }
            None => Err(Error::protocol(format!("{} was never initialized", qubit))),
        }
    }

    /// Writes `value` into `reg`, least significant bit first.
    pub fn load(&mut self, reg: &[Qubit], value: &BigUint) -> Result<()> {
        if value.bits() > reg.len() as u64 {
            return Err(Error::size(format!(
                "{} does not fit in a register of {} qubits",
                value,
                reg.len()
            )));
        }
        for (i, &q) in reg.iter().enumerate() {
            self.set(q, value.bit(i as u64));
        }
        Ok(())
    }

    pub fn read(&self, reg: &[Qubit]) -> Result<BigUint> {
        let mut value = BigUint::default();
        for (i, &q) in reg.iter().enumerate() {
            if self.get(q)? {
                value.set_bit(i as u64, true);
            }
        }
        Ok(value)
    }

    /// Every ancilla the manager has issued starts at zero.
    pub fn zero_ancillas(&mut self, ancillas: &AncillaManager) {
        for q in ancillas.all_issued() {
            self.set(q, false);
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

#[test]
fn test_int_state_conversion() {
    use crate::qubit::Registry;

    let mut registry = Registry::new();
    let r = registry.register("r", 8);
    for x in [84u32, 117, 225] {
        let mut state = State::new();
        state.load(&r, &BigUint::from(x)).unwrap();
        assert_eq!(state.read(&r).unwrap(), BigUint::from(x));
    }

    let mut state = State::new();
    assert!(matches!(
        state.load(&r, &BigUint::from(256u32)),
        Err(Error::Size(_))
    ));
    assert!(matches!(state.read(&r), Err(Error::Protocol(_))));
}
