use log::debug;
use num_bigint::BigInt;

use super::{check_mult_sizes, get_cutoff, schoolbook_mult, schoolbook_square, DEFAULT_CUTOFF};
use crate::add::{add_classical_int, add_int};
use crate::builder::Builder;
use crate::error::Result;
use crate::gates::copy_register;
use crate::op::Op;
use crate::qubit::{Qubit, Register};

/*
    inputs:  A  B  C
    outputs: A  B  C + A*B mod 2^len(C)

    split both operands at k = min(len A, len B) / 2:

        A = A_lo + 2^k A_hi,   B = B_lo + 2^k B_hi

        low   = A_lo * B_lo                        -> C[0..]
        high  = A_hi * B_hi                        -> C[2k..]
        cross = (A_lo + A_hi)(B_lo + B_hi) - low - high
                                                   -> C[k..]

    `mid` first holds low, then low + high. negating it in two's complement
    (flip every bit, add 1) and accumulating the product of the half sums
    on top leaves exactly the cross term, with no subtractor needed.

    sub-products that land in a region known to be zero are computed with
    `c_zero` set, which saves their final carry chains.
*/
pub fn karatsuba_mult(
    b: &mut Builder,
    a: &[Qubit],
    bq: &[Qubit],
    c: &[Qubit],
    cutoff: Option<usize>,
    c_zero: bool,
) -> Result<Op> {
    check_mult_sizes(a.len(), bq.len(), c.len())?;
    let cutoff = get_cutoff(cutoff, DEFAULT_CUTOFF)?;

    // base case
    if a.len() <= cutoff || bq.len() <= cutoff {
        return schoolbook_mult(b, a, bq, c, c_zero);
    }
    debug!(
        "karatsuba_mult: {}x{} -> {} (cutoff: {}, c_zero: {})",
        a.len(),
        bq.len(),
        c.len(),
        cutoff,
        c_zero
    );

    let k = a.len().min(bq.len()) / 2;
    let (a_low, a_high) = a.split_at(k);
    let (b_low, b_high) = bq.split_at(k);

    let mut ops = vec![];

    let mid = b.ancilla_register(a_high.len() + b_high.len() + 2);

    // mid doubles as the low product, saving a separate allocation
    ops.push(karatsuba_mult(b, a_low, b_low, &mid, Some(cutoff), true)?);
    if c_zero {
        ops.push(copy_register(b, &mid[..2 * k], &c[..2 * k])?);
    } else {
        ops.push(add_int(b, &mid, c, false)?);
    }

    let high_size = a_high.len() + b_high.len();
    let scratch: Option<Register> = if c_zero {
        None
    } else {
        Some(b.ancilla_register(high_size))
    };
    let high: &[Qubit] = match &scratch {
        Some(reg) => &reg[..],
        None => &c[2 * k..2 * k + high_size],
    };

    ops.push(karatsuba_mult(b, a_high, b_high, high, Some(cutoff), true)?);
    ops.push(add_int(b, high, &mid, false)?);

    if let Some(reg) = &scratch {
        ops.push(add_int(b, reg, &c[2 * k..], false)?);
        b.retire(reg)?;
    }

    let a_sum = b.ancilla_register(a_high.len() + 1);
    let b_sum = b.ancilla_register(b_high.len() + 1);

    ops.push(copy_register(b, a_low, &a_sum)?);
    ops.push(add_int(b, a_high, &a_sum, false)?);

    ops.push(copy_register(b, b_low, &b_sum)?);
    ops.push(add_int(b, b_high, &b_sum, false)?);

    // mid <- -(low + high)
    for &q in mid.iter() {
        ops.push(b.x(q)?);
    }
    ops.push(add_classical_int(b, &BigInt::from(1u32), &mid, None)?);

    // mid <- (A_lo + A_hi)(B_lo + B_hi) - low - high
    ops.push(karatsuba_mult(b, &a_sum, &b_sum, &mid, Some(cutoff), false)?);
    ops.push(add_int(b, &mid, &c[k..], false)?);

    b.retire(&a_sum)?;
    b.retire(&b_sum)?;
    b.retire(&mid)?;

    Ok(b.seq(ops))
}

/*
    inputs:  A  C
    outputs: A  C + A*A mod 2^len(C)

    A*A = A_lo^2 + 2^(2k) A_hi^2 + 2^(k+1) A_lo A_hi

    two recursive squares and one product, with the doubling of the cross
    term folded into its offset. nothing has to be negated.
*/
pub fn karatsuba_square(
    b: &mut Builder,
    a: &[Qubit],
    c: &[Qubit],
    cutoff: Option<usize>,
    c_zero: bool,
) -> Result<Op> {
    let n = a.len();
    check_mult_sizes(n, n, c.len())?;
    let cutoff = get_cutoff(cutoff, DEFAULT_CUTOFF)?;

    // base case
    if n <= cutoff {
        return schoolbook_square(b, a, c, c_zero);
    }
    debug!(
        "karatsuba_square: {} -> {} (cutoff: {}, c_zero: {})",
        n,
        c.len(),
        cutoff,
        c_zero
    );

    let k = n / 2;
    let (a_low, a_high) = a.split_at(k);

    let mut ops = vec![];

    let scratch_low: Option<Register> = if c_zero {
        None
    } else {
        Some(b.ancilla_register(2 * k))
    };
    let low: &[Qubit] = match &scratch_low {
        Some(reg) => &reg[..],
        None => &c[..2 * k],
    };
    ops.push(karatsuba_square(b, a_low, low, Some(cutoff), true)?);

    if let Some(reg) = &scratch_low {
        ops.push(add_int(b, reg, c, false)?);
        b.retire(reg)?;
    }

    let scratch_high: Option<Register> = if c_zero {
        None
    } else {
        Some(b.ancilla_register(2 * (n - k)))
    };
    let high: &[Qubit] = match &scratch_high {
        Some(reg) => &reg[..],
        None => &c[2 * k..],
    };
    ops.push(karatsuba_square(b, a_high, high, Some(cutoff), true)?);

    if let Some(reg) = &scratch_high {
        ops.push(add_int(b, reg, &c[2 * k..], false)?);
        b.retire(reg)?;
    }

    let mid = b.ancilla_register(n);
    ops.push(karatsuba_mult(b, a_low, a_high, &mid, Some(cutoff), true)?);
    ops.push(add_int(b, &mid, &c[k + 1..], false)?);
    b.retire(&mid)?;

    Ok(b.seq(ops))
}
