pub mod faults;
pub mod state;

use log::trace;

use crate::error::{Error, Result};
use crate::op::{Gate, Op};

pub use state::State;

/*
    X, CNOT and TOFFOLI map basis states to basis states, so a circuit made
    only of them can be replayed one classical assignment at a time:

        gate              update
        X(t)              t ^= 1
        CNOT(c, t)        t ^= c
        TOFFOLI(a, b, t)  t ^= a & b

    with phase tracking enabled, two more single-qubit gates are allowed:

        Z(t)              sign *= -1 if t
        Y(t)              sign *= -1 if t, then t ^= 1

    anything else has no classical replay and is refused outright.
*/
#[derive(Clone, Debug)]
pub struct Simulator {
    state: State,
    track_phase: bool,
    negative: bool,
}

impl Simulator {
    /// Base mode: only X, CNOT and TOFFOLI.
    pub fn new(state: State) -> Self {
        Self {
            state,
            track_phase: false,
            negative: false,
        }
    }

    /// Extended mode for fault-injection studies: also accepts Y and Z and
    /// tracks the resulting global sign.
    pub fn with_phase(state: State) -> Self {
        Self {
            state,
            track_phase: true,
            negative: false,
        }
    }

    pub fn apply(&mut self, gate: &Gate) -> Result<()> {
        match *gate {
            Gate::X(t) => self.state.flip(t),
            Gate::Cnot(c, t) => {
                if self.state.get(c)? {
                    self.state.flip(t)?;
                }
                Ok(())
            }
            Gate::Toffoli(c1, c2, t) => {
                if self.state.get(c1)? && self.state.get(c2)? {
                    self.state.flip(t)?;
                }
                Ok(())
            }
            Gate::Z(t) if self.track_phase => {
                self.negative ^= self.state.get(t)?;
                Ok(())
            }
            Gate::Y(t) if self.track_phase => {
                self.negative ^= self.state.get(t)?;
                self.state.flip(t)
            }
            Gate::Y(_) | Gate::Z(_) => Err(Error::UnsupportedGate(format!(
                "{} needs phase tracking",
                gate
            ))),
        }
    }

    /// Replays every gate of `op` in order and returns the global sign.
    pub fn simulate(&mut self, op: &Op) -> Result<i8> {
        let mut applied = 0usize;
        for leaf in op.flatten() {
            match leaf {
                Op::Gate(gate) => self.apply(gate)?,
                Op::Count(_) => {
                    return Err(Error::UnsupportedGate(
                        "a counting-only circuit cannot be simulated".to_string(),
                    ))
                }
                Op::Seq(_) => continue,
            }
            applied += 1;
        }
        trace!("simulated {} gates", applied);
        Ok(self.sign())
    }

    /// Replays a flat gate stream, e.g. one with injected faults.
    pub fn simulate_gates<I: IntoIterator<Item = Gate>>(&mut self, gates: I) -> Result<i8> {
        for gate in gates {
            self.apply(&gate)?;
        }
        Ok(self.sign())
    }

    pub fn sign(&self) -> i8 {
        if self.negative {
            -1
        } else {
            1
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::{Qubit, Registry};

    fn three() -> (State, Vec<Qubit>) {
        let mut registry = Registry::new();
        let q = registry.register("q", 3);
        let mut state = State::new();
        state.set(q[0], true);
        state.set(q[1], true);
        state.set(q[2], false);
        (state, q.to_vec())
    }

    #[test]
    fn replays_the_closed_gate_set() {
        let (state, q) = three();
        let op = Op::Seq(vec![
            Gate::Toffoli(q[0], q[1], q[2]).into(),
            Gate::Cnot(q[2], q[0]).into(),
            Gate::X(q[1]).into(),
        ]);
        let mut sim = Simulator::new(state);
        assert_eq!(sim.simulate(&op).unwrap(), 1);
        assert!(!sim.state().get(q[0]).unwrap());
        assert!(!sim.state().get(q[1]).unwrap());
        assert!(sim.state().get(q[2]).unwrap());
    }

    #[test]
    fn rejects_gates_outside_the_set() {
        let (state, q) = three();
        for gate in [Gate::Z(q[0]), Gate::Y(q[1])] {
            let op = Op::Seq(vec![Gate::X(q[2]).into(), gate.into()]);
            let mut sim = Simulator::new(state.clone());
            assert!(matches!(sim.simulate(&op), Err(Error::UnsupportedGate(_))));
        }

        let counted = Op::Count(Default::default());
        let mut sim = Simulator::new(state);
        assert!(matches!(
            sim.simulate(&counted),
            Err(Error::UnsupportedGate(_))
        ));
    }

    #[test]
    fn phase_tracking() {
        let (state, q) = three();
        let mut sim = Simulator::with_phase(state);

        // q2 is 0: no sign change
        sim.apply(&Gate::Z(q[2])).unwrap();
        assert_eq!(sim.sign(), 1);

        // q0 is 1: sign flips, Z leaves the bit alone
        sim.apply(&Gate::Z(q[0])).unwrap();
        assert_eq!(sim.sign(), -1);
        assert!(sim.state().get(q[0]).unwrap());

        // Y on a 1 flips the sign back and clears the bit
        sim.apply(&Gate::Y(q[1])).unwrap();
        assert_eq!(sim.sign(), 1);
        assert!(!sim.state().get(q[1]).unwrap());

        // Y on a 0 sets the bit without a sign change
        sim.apply(&Gate::Y(q[2])).unwrap();
        assert_eq!(sim.sign(), 1);
        assert!(sim.state().get(q[2]).unwrap());
    }

    #[test]
    fn uninitialized_cells_are_an_error() {
        let (state, _) = three();
        let mut sim = Simulator::new(state);
        let stray = Qubit::Ancilla(0);
        assert!(matches!(
            sim.apply(&Gate::X(stray)),
            Err(Error::Protocol(_))
        ));
    }
}
