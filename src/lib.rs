/*
    reversible circuits for x^2 mod N over the gate set {X, CNOT, TOFFOLI}

    x2_mod_n composes three stages on an input register x and a zeroed
    accumulator y:

        x <- 3^t x                      times_three, t times
        y <- x^2                        schoolbook or karatsuba squaring
        y <- y R^-1 mod 3^(2t) N        montgomery reduction

    and hands back R. after measuring the top bits of y, the classical side
    computes (R * measured / 3^(2t)) mod N.

    synthesis is eager: every routine builds its whole subtree before it
    returns, so ancillas are allocated and retired in exactly the order the
    gates are emitted. each routine retires what it allocated before it
    returns. retired ancillas may hold garbage; on hardware they are
    measured and never read again.

    numbers on a register are little endian: cell 0 is the least significant
    bit.

    two ways to consume the result:
        Mode::Gates   a tree of gates, replayed by sim::Simulator
        Mode::Counts  every Seq folds into a tally, for resource estimates
                      at sizes where materializing gates is too slow
*/

pub mod add;
pub mod ancilla;
pub mod builder;
pub mod count;
pub mod error;
pub mod gates;
pub mod montgomery;
pub mod mult;
pub mod op;
pub mod qubit;
pub mod sim;
pub mod x2modn;

pub use ancilla::AncillaManager;
pub use builder::{Builder, Mode};
pub use count::{count_x2modn, Report};
pub use error::{Error, Result};
pub use montgomery::{extended_gcd, montgomery_reduce, ClassicalMult};
pub use op::{Gate, GateCounts, Op};
pub use qubit::{Qubit, Register, Registry};
pub use sim::{Simulator, State};
pub use x2modn::{output_bits, recover, registers_for, x2_mod_n, Method};
