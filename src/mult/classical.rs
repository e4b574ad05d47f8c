use log::debug;
use num_bigint::{BigInt, BigUint};

use super::{check_mult_sizes, get_cutoff, DEFAULT_CLASSICAL_CUTOFF};
use crate::add::{add_classical_int, add_int};
use crate::builder::Builder;
use crate::error::Result;
use crate::gates::{copy_register, full_adder, half_adder};
use crate::op::Op;
use crate::qubit::{Qubit, Register};

fn low_bits(a: &BigUint, k: usize) -> BigUint {
    let mask = (BigUint::from(1u32) << k) - 1u32;
    a & mask
}

fn bit_len(a: &BigUint) -> usize {
    a.bits() as usize
}

/*
    inputs:  B  C
    outputs: B  C + a*B mod 2^len(C)

    same rows as the register version, except an AND against a known bit
    is either B itself or nothing: rows where a has a 0 emit no gates.
    with `allow_overflow`, columns past the end of C are dropped.
*/
pub fn schoolbook_classical_mult(
    b: &mut Builder,
    a: &BigUint,
    bq: &[Qubit],
    c: &[Qubit],
    allow_overflow: bool,
    c_zero: bool,
) -> Result<Op> {
    if !allow_overflow {
        check_mult_sizes(bit_len(a), bq.len(), c.len())?;
    }
    debug!(
        "schoolbook_classical_mult: {} bits x {} -> {} (overflow: {}, c_zero: {})",
        a.bits(),
        bq.len(),
        c.len(),
        allow_overflow,
        c_zero
    );

    let mut ops = vec![];
    for i in 0..bit_len(a) {
        if !a.bit(i as u64) {
            continue;
        }

        let mut cin = b.ancilla();
        for (j, &bj) in bq.iter().enumerate() {
            if i + j >= c.len() {
                break;
            }
            let cout = b.ancilla();
            ops.push(full_adder(b, bj, c[i + j], cin, cout)?);
            b.retire_one(cin)?;
            cin = cout;
        }

        // finish performing the carries
        let top = i + bq.len();
        if !c_zero {
            for &ck in c.get(top..).unwrap_or(&[]) {
                let cout = b.ancilla();
                ops.push(half_adder(b, cin, ck, cout)?);
                b.retire_one(cin)?;
                cin = cout;
            }
        } else if c.len() > top {
            ops.push(b.cnot(cin, c[top])?);
        }

        b.retire_one(cin)?;
    }

    Ok(b.seq(ops))
}

/*
    inputs:  B  C
    outputs: B  C + a*B mod 2^len(C)

    karatsuba with a known left operand. the half sum a_lo + a_hi is
    computed classically, so only B's halves need adding in-circuit.

    with `allow_overflow` the output is narrower than the product, and the
    split is taken from the output width instead of the operands:

        C += a_lo * B_lo
        C[b_break..] += a_lo * B_hi     (truncated)
        C[a_break..] += a_hi * B_lo     (truncated)

    a_hi * B_hi lies entirely above C and is skipped.
*/
pub fn karatsuba_classical_mult(
    b: &mut Builder,
    a: &BigUint,
    bq: &[Qubit],
    c: &[Qubit],
    cutoff: Option<usize>,
    allow_overflow: bool,
    c_zero: bool,
) -> Result<Op> {
    if !allow_overflow {
        check_mult_sizes(bit_len(a), bq.len(), c.len())?;
    }
    let cutoff = get_cutoff(cutoff, DEFAULT_CLASSICAL_CUTOFF)?;
    let len_a = bit_len(a);

    if allow_overflow && c.len() > 4 {
        let (a_break, b_break) = if len_a > bq.len() {
            let b_break = c.len() / 2;
            (c.len() - b_break, b_break)
        } else {
            let a_break = c.len() / 2;
            (a_break, c.len() - a_break)
        };
        debug!(
            "karatsuba_classical_mult: truncated split at a={} b={} -> {}",
            a_break,
            b_break,
            c.len()
        );

        let a_low = low_bits(a, a_break);
        let a_high = a >> a_break;
        let (b_low, b_high) = bq.split_at(b_break.min(bq.len()));

        let ops = vec![
            karatsuba_classical_mult(b, &a_low, b_low, c, Some(cutoff), false, c_zero)?,
            karatsuba_classical_mult(b, &a_low, b_high, &c[b_break..], Some(cutoff), true, false)?,
            karatsuba_classical_mult(b, &a_high, b_low, &c[a_break..], Some(cutoff), true, false)?,
        ];
        return Ok(b.seq(ops));
    }

    // base case
    if len_a <= cutoff || bq.len() <= cutoff || c.len() <= cutoff {
        return schoolbook_classical_mult(b, a, bq, c, allow_overflow, c_zero);
    }

    let k = len_a.min(bq.len()) / 2;
    debug!(
        "karatsuba_classical_mult: {} bits x {} -> {} split at {} (cutoff: {}, c_zero: {})",
        len_a,
        bq.len(),
        c.len(),
        k,
        cutoff,
        c_zero
    );

    let a_low = low_bits(a, k);
    let a_high = a >> k;
    let (b_low, b_high) = bq.split_at(k);

    let mut ops = vec![];

    let mid = b.ancilla_register(bit_len(&a_high) + b_high.len() + 2);

    // mid doubles as the low product, saving a separate allocation
    ops.push(karatsuba_classical_mult(b, &a_low, b_low, &mid, Some(cutoff), false, true)?);
    if c_zero {
        ops.push(copy_register(b, &mid[..2 * k], &c[..2 * k])?);
    } else {
        ops.push(add_int(b, &mid, c, false)?);
    }

    let high_size = bit_len(&a_high) + b_high.len();
    let scratch: Option<Register> = if c_zero {
        None
    } else {
        Some(b.ancilla_register(high_size))
    };
    let high: &[Qubit] = match &scratch {
        Some(reg) => &reg[..],
        None => &c[2 * k..2 * k + high_size],
    };

    ops.push(karatsuba_classical_mult(b, &a_high, b_high, high, Some(cutoff), false, true)?);
    ops.push(add_int(b, high, &mid, false)?);

    if let Some(reg) = &scratch {
        ops.push(add_int(b, reg, &c[2 * k..], false)?);
        b.retire(reg)?;
    }

    let a_sum = &a_low + &a_high;

    let b_sum = b.ancilla_register(b_high.len() + 1);
    ops.push(copy_register(b, b_low, &b_sum)?);
    ops.push(add_int(b, b_high, &b_sum, false)?);

    // mid <- -(low + high)
    for &q in mid.iter() {
        ops.push(b.x(q)?);
    }
    ops.push(add_classical_int(b, &BigInt::from(1u32), &mid, None)?);

    ops.push(karatsuba_classical_mult(b, &a_sum, &b_sum, &mid, Some(cutoff), false, false)?);
    ops.push(add_int(b, &mid, &c[k..], false)?);

    b.retire(&b_sum)?;
    b.retire(&mid)?;

    Ok(b.seq(ops))
}
