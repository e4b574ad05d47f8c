mod classical;
mod karatsuba;
mod schoolbook;

pub use classical::{karatsuba_classical_mult, schoolbook_classical_mult};
pub use karatsuba::{karatsuba_mult, karatsuba_square};
pub use schoolbook::{schoolbook_mult, schoolbook_square};

use crate::error::{Error, Result};

/// Karatsuba recursion cutoff for register by register products and squares.
pub const DEFAULT_CUTOFF: usize = 15;

/// Karatsuba recursion cutoff when one operand is a known constant.
pub const DEFAULT_CLASSICAL_CUTOFF: usize = 24;

/// Below this the split no longer shrinks the operands and recursion would
/// not terminate.
pub const MIN_CUTOFF: usize = 4;

/// Output must hold `len_a + len_b` bits.
pub fn check_mult_sizes(len_a: usize, len_b: usize, len_c: usize) -> Result<()> {
    if len_c < len_a + len_b {
        return Err(Error::size(format!(
            "output of {} qubits cannot hold a {} by {} bit product",
            len_c, len_a, len_b
        )));
    }
    Ok(())
}

pub fn get_cutoff(cutoff: Option<usize>, default: usize) -> Result<usize> {
    let cutoff = cutoff.unwrap_or(default);
    if cutoff < MIN_CUTOFF {
        return Err(Error::domain(format!(
            "cutoff must be >= {}, got {}",
            MIN_CUTOFF, cutoff
        )));
    }
    Ok(cutoff)
}
