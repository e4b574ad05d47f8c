use log::debug;

use super::check_mult_sizes;
use crate::builder::Builder;
use crate::error::Result;
use crate::gates::{full_adder, half_adder};
use crate::op::Op;
use crate::qubit::Qubit;

/*
    inputs:  A  B  C
    outputs: A  B  C + A*B mod 2^len(C)

    row i adds (A[i] & B) << i into C:

        d      <- A[i] & B[j]                  (toffoli into a fresh ancilla)
        C[i+j] <- full_adder(d, C[i+j], carry)

    then the row's carry is rippled up through the rest of C. when C is
    known to be zero above the current row (`c_zero`), the ripple is a
    single CNOT into the next cell instead.
*/
pub fn schoolbook_mult(
    b: &mut Builder,
    a: &[Qubit],
    bq: &[Qubit],
    c: &[Qubit],
    c_zero: bool,
) -> Result<Op> {
    check_mult_sizes(a.len(), bq.len(), c.len())?;
    debug!(
        "schoolbook_mult: {}x{} -> {} (c_zero: {})",
        a.len(),
        bq.len(),
        c.len(),
        c_zero
    );

    let mut ops = vec![];
    for (i, &ai) in a.iter().enumerate() {
        let mut cin = b.ancilla();
        for (j, &bj) in bq.iter().enumerate() {
            let d = b.ancilla();
            ops.push(b.toffoli(ai, bj, d)?);

            let cout = b.ancilla();
            ops.push(full_adder(b, d, c[i + j], cin, cout)?);
            b.retire_one(cin)?;
            cin = cout;

            b.retire_one(d)?;
        }

        // finish performing the carries
        let top = i + bq.len();
        if !c_zero {
            for &ck in &c[top..] {
                let cout = b.ancilla();
                ops.push(half_adder(b, cin, ck, cout)?);
                b.retire_one(cin)?;
                cin = cout;
            }
        } else {
            ops.push(b.cnot(cin, c[top])?);
        }

        b.retire_one(cin)?;
    }

    Ok(b.seq(ops))
}

/*
    inputs:  A  C
    outputs: A  C + A*A mod 2^len(C)

    A*A = sum_i A[i] 2^(2i) + sum_{i<j} A[i]A[j] 2^(i+j+1)

    the diagonal needs no AND at all, and each cross term is computed once
    and lands one position higher, which doubles it. a diagonal column skips
    position 2i+1, so the carry is pushed through it with a half adder.
*/
pub fn schoolbook_square(b: &mut Builder, a: &[Qubit], c: &[Qubit], c_zero: bool) -> Result<Op> {
    let n = a.len();
    check_mult_sizes(n, n, c.len())?;
    debug!("schoolbook_square: {} -> {} (c_zero: {})", n, c.len(), c_zero);

    let mut ops = vec![];
    for i in 0..n {
        let mut cin = b.ancilla();
        let mut idx = 0;
        for j in i..n {
            let term = if i == j {
                a[i]
            } else {
                let d = b.ancilla();
                ops.push(b.toffoli(a[i], a[j], d)?);
                d
            };

            idx = i + j + usize::from(i != j);

            let cout = b.ancilla();
            ops.push(full_adder(b, term, c[idx], cin, cout)?);
            b.retire_one(cin)?;
            cin = cout;

            if i == j {
                idx += 1;
                let cout = b.ancilla();
                ops.push(half_adder(b, cin, c[idx], cout)?);
                b.retire_one(cin)?;
                cin = cout;
            } else {
                b.retire_one(term)?;
            }
        }

        // finish performing the carries
        idx += 1;
        if !c_zero {
            for &ck in &c[idx..] {
                let cout = b.ancilla();
                ops.push(half_adder(b, cin, ck, cout)?);
                b.retire_one(cin)?;
                cin = cout;
            }
        } else if c.len() > idx {
            ops.push(b.cnot(cin, c[idx])?);
        }

        b.retire_one(cin)?;
    }

    Ok(b.seq(ops))
}
