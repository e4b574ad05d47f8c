use num_bigint::BigUint;

use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::op::Op;
use crate::qubit::Qubit;

/*
    inputs:  a  b      cout
    outputs: a  a^b    cout ^ (a & b)
*/
pub fn half_adder(b: &Builder, a: Qubit, sum: Qubit, cout: Qubit) -> Result<Op> {
    Ok(b.seq(vec![b.toffoli(a, sum, cout)?, b.cnot(a, sum)?]))
}

/*
    inputs:  a  b            cin  cout
    outputs: a  a^b^cin      cin  cout ^ maj(a, b, cin)

    a and cin are left as they were; the caller owns cout and is
    responsible for retiring cin once it has been consumed.
*/
pub fn full_adder(b: &Builder, a: Qubit, sum: Qubit, cin: Qubit, cout: Qubit) -> Result<Op> {
    Ok(b.seq(vec![
        b.toffoli(a, sum, cout)?,
        b.cnot(a, sum)?,
        b.toffoli(sum, cin, cout)?,
        b.cnot(cin, sum)?,
    ]))
}

/// XORs `src` into `dst`, which is a copy when `dst` starts out zero.
pub fn copy_register(b: &Builder, src: &[Qubit], dst: &[Qubit]) -> Result<Op> {
    if src.len() > dst.len() {
        return Err(Error::size(format!(
            "cannot copy {} qubits into a register of {}",
            src.len(),
            dst.len()
        )));
    }

    let ops = src
        .iter()
        .zip(dst)
        .map(|(&s, &d)| b.cnot(s, d))
        .collect::<Result<Vec<_>>>()?;
    Ok(b.seq(ops))
}

/*
    inputs:  A  result
    outputs: A  result ^ (A < x)

    walks A from the top bit down, carrying a "still equal" flag. each
    step allocates the next flag and retires the previous one.
*/
pub fn lessthan_classical(b: &mut Builder, a: &[Qubit], x: &BigUint, result: Qubit) -> Result<Op> {
    if x.bits() > a.len() as u64 {
        // x is certainly larger than anything A can hold
        return Ok(b.seq(vec![b.x(result)?]));
    }

    let mut ops = vec![];

    let mut eq = b.ancilla();
    ops.push(b.x(eq)?);

    for (i, &ai) in a.iter().enumerate().rev() {
        let eq_out = b.ancilla();
        ops.push(b.cnot(eq, eq_out)?);
        if !x.bit(i as u64) {
            // a 1 here means A > x from now on
            ops.push(b.toffoli(eq, ai, eq_out)?);
        } else {
            // a 0 here while still tied means A < x
            ops.push(b.x(ai)?);
            ops.push(b.toffoli(eq, ai, result)?);
            ops.push(b.toffoli(eq, ai, eq_out)?);
            ops.push(b.x(ai)?);
        }

        b.retire_one(eq)?;
        eq = eq_out;
    }

    b.retire_one(eq)?;
    Ok(b.seq(ops))
}
