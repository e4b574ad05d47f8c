use log::debug;
use num_bigint::BigInt;
use num_integer::Integer;

use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::gates::{full_adder, half_adder};
use crate::op::Op;
use crate::qubit::Qubit;

/*
    ripple-carry addition of A into B, len(A) <= len(B)

    inputs:  A  B
    outputs: A  B + A mod 2^len(B)

    column i:  carry_{i+1} <- adder(A[i], B[i], carry_i)

    one fresh carry per column; the previous carry is retired as soon as
    the next one has been produced. with `allow_overflow`, the bits of A
    above len(B) are ignored instead of being an error.
*/
pub fn add_int(b: &mut Builder, a: &[Qubit], dst: &[Qubit], allow_overflow: bool) -> Result<Op> {
    if !allow_overflow && a.len() > dst.len() {
        return Err(Error::size(format!(
            "register of {} qubits too long to add into {}",
            a.len(),
            dst.len()
        )));
    }

    let a = &a[..a.len().min(dst.len())];
    if a.is_empty() {
        return Ok(b.seq(vec![]));
    }

    let mut ops = vec![];
    let mut cin: Option<Qubit> = None;
    for (&ai, &di) in a.iter().zip(dst) {
        let cout = b.ancilla();
        match cin {
            None => ops.push(half_adder(b, ai, di, cout)?),
            Some(c) => {
                ops.push(full_adder(b, ai, di, c, cout)?);
                b.retire_one(c)?;
            }
        }
        cin = Some(cout);
    }

    // a is non-empty, so at least one carry exists
    let mut cin = cin.ok_or_else(|| Error::protocol("missing carry"))?;

    // need to carry to the end of B
    for &di in &dst[a.len()..] {
        let cout = b.ancilla();
        ops.push(half_adder(b, cin, di, cout)?);
        b.retire_one(cin)?;
        cin = cout;
    }

    b.retire_one(cin)?;
    Ok(b.seq(ops))
}

/*
    adds the known integer x into A

    inputs:  A
    outputs: A + x mod 2^len(A)

    a column where x has a 0 is a plain half adder on the carry. a column
    where x has a 1 is a half adder on the negated carry and addend,
    which works out to adding one more at that position:

        X(cin) X(a) half_adder(cin, a, cout) X(a) X(cout)

    with a control qubit, every X becomes a CNOT from the control, so the
    whole addition happens only when the control is set. negative x is
    added in two's complement over the width of A.
*/
pub fn add_classical_int(
    b: &mut Builder,
    x: &BigInt,
    a: &[Qubit],
    control: Option<Qubit>,
) -> Result<Op> {
    if x.magnitude().bits() > a.len() as u64 {
        return Err(Error::size(format!(
            "{} too large to add to a register of {} qubits",
            x,
            a.len()
        )));
    }

    let modulus = BigInt::from(1u32) << a.len();
    let x = x.mod_floor(&modulus).magnitude().clone();

    let flip = |b: &Builder, q: Qubit| match control {
        None => b.x(q),
        Some(c) => b.cnot(c, q),
    };

    let mut ops = vec![];
    let mut cin = b.ancilla();
    for (i, &ai) in a.iter().enumerate() {
        let cout = b.ancilla();
        if !x.bit(i as u64) {
            ops.push(half_adder(b, cin, ai, cout)?);
        } else {
            ops.push(flip(b, cin)?);
            ops.push(flip(b, ai)?);
            ops.push(half_adder(b, cin, ai, cout)?);
            ops.push(flip(b, ai)?);
            ops.push(flip(b, cout)?);
        }

        b.retire_one(cin)?;
        cin = cout;
    }

    b.retire_one(cin)?;
    Ok(b.seq(ops))
}

/*
    multiplies A by 3 in place, A + (A << 1)

    the shifted copy of a[i-1] lives in its own ancilla so a[i-1] can be
    overwritten by its own column before column i runs. A needs two spare
    high bits for the product to fit; that is on the caller.
*/
pub fn times_three(b: &mut Builder, a: &[Qubit]) -> Result<Op> {
    if a.len() < 2 {
        return Err(Error::size("times_three needs at least two qubits"));
    }
    debug!("times_three: {} qubits", a.len());

    let (&top, body) = a
        .split_last()
        .ok_or_else(|| Error::size("empty register"))?;

    let mut ops = vec![];
    let mut carry: Option<(Qubit, Qubit)> = None;
    for &ai in body {
        let cout = b.ancilla();
        let new_prev = b.ancilla();
        ops.push(b.cnot(ai, new_prev)?);
        if let Some((prev, cin)) = carry {
            ops.push(full_adder(b, prev, ai, cin, cout)?);
            b.retire(&[cin, prev])?;
        }
        carry = Some((new_prev, cout));
    }

    let (prev, cin) = carry.ok_or_else(|| Error::protocol("missing carry"))?;

    // carry to the end; at most one of prev and cin is set
    ops.push(b.cnot(cin, top)?);
    ops.push(b.cnot(prev, top)?);
    b.retire(&[cin, prev])?;

    Ok(b.seq(ops))
}
