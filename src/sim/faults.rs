use rand::seq::SliceRandom;
use rand::Rng;

use crate::op::Gate;

/// Gate stream with random single-qubit Pauli errors.
///
/// Before each gate, with probability `rate`, one of that gate's qubits is
/// hit by an X, Y or Z chosen uniformly. The result has to be replayed with
/// `Simulator::with_phase`, since Y and Z are outside the base gate set.
pub struct Faults<'r, I, R> {
    gates: I,
    rate: f64,
    rng: &'r mut R,
    pending: Option<Gate>,
}

pub fn inject<I, R>(gates: I, rate: f64, rng: &mut R) -> Faults<'_, I::IntoIter, R>
where
    I: IntoIterator<Item = Gate>,
    R: Rng,
{
    Faults {
        gates: gates.into_iter(),
        rate,
        rng,
        pending: None,
    }
}

impl<'r, I, R> Iterator for Faults<'r, I, R>
where
    I: Iterator<Item = Gate>,
    R: Rng,
{
    type Item = Gate;

    fn next(&mut self) -> Option<Gate> {
        if let Some(gate) = self.pending.take() {
            return Some(gate);
        }

        let gate = self.gates.next()?;
        if self.rng.gen::<f64>() < self.rate {
            let qubits = gate.qubits();
            if let Some(&q) = qubits.choose(&mut *self.rng) {
                let error = match self.rng.gen_range(0..3) {
                    0 => Gate::X(q),
                    1 => Gate::Y(q),
                    _ => Gate::Z(q),
                };
                self.pending = Some(gate);
                return Some(error);
            }
        }
        Some(gate)
    }
}
