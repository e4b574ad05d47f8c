use log::{debug, info};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;

use crate::add::add_classical_int;
use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::gates::lessthan_classical;
use crate::mult::{karatsuba_classical_mult, schoolbook_classical_mult};
use crate::op::Op;
use crate::qubit::Qubit;

/// Multiplier used for the two constant products inside the reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassicalMult {
    Schoolbook,
    /// `None` picks the default classical cutoff.
    Karatsuba { cutoff: Option<usize> },
}

impl Default for ClassicalMult {
    fn default() -> Self {
        ClassicalMult::Karatsuba { cutoff: None }
    }
}

impl ClassicalMult {
    /// `c += a * bq`, see [`schoolbook_classical_mult`] and
    /// [`karatsuba_classical_mult`].
    pub fn synthesize(
        &self,
        b: &mut Builder,
        a: &BigUint,
        bq: &[Qubit],
        c: &[Qubit],
        allow_overflow: bool,
        c_zero: bool,
    ) -> Result<Op> {
        match *self {
            ClassicalMult::Schoolbook => {
                schoolbook_classical_mult(b, a, bq, c, allow_overflow, c_zero)
            }
            ClassicalMult::Karatsuba { cutoff } => {
                karatsuba_classical_mult(b, a, bq, c, cutoff, allow_overflow, c_zero)
            }
        }
    }
}

/*
    in-place montgomery reduction of T by the odd modulus N

    with r = bitlen(N) and R = 2^r, and T < N*R held in 2r+1 qubits:

        m  <- T * N' mod R          N' = -N^-1 mod R, product truncated to r bits
        T  <- T + N*m               now divisible by R, so T[..r] = 0
        b  <- T[r..] >= N
        T[r..] -= N if b

    afterwards T[r..] = T*R^-1 mod N and the low r qubits are zero. m and
    b are retired holding garbage that is never read again.

    returns R; the caller recovers T mod N as R * T[r..] mod N.
*/
pub fn montgomery_reduce(
    b: &mut Builder,
    t: &[Qubit],
    n: &BigUint,
    mult: ClassicalMult,
) -> Result<(BigUint, Op)> {
    let r = n.bits() as usize;
    if t.len() < 2 * r + 1 {
        return Err(Error::size(format!(
            "{} qubits too small for montgomery reduction by a {} bit modulus",
            t.len(),
            r
        )));
    }
    if !n.bit(0) {
        return Err(Error::domain(format!("modulus {} must be odd", n)));
    }

    let big_r = BigUint::from(1u32) << r;
    let (_, n_prime) = extended_gcd(&big_r, n)?;
    debug!("montgomery_reduce: N = {}, R = 2^{}, N' = {}", n, r, n_prime);

    let mut ops = vec![];

    let m = b.ancilla_register(r);
    ops.push(mult.synthesize(b, &n_prime, &t[..r], &m, true, true)?);
    ops.push(mult.synthesize(b, n, &m, t, false, false)?);
    b.retire(&m)?;

    let ge = b.ancilla();
    ops.push(lessthan_classical(b, &t[r..], n, ge)?);
    ops.push(b.x(ge)?);

    ops.push(add_classical_int(b, &-BigInt::from(n.clone()), &t[r..], Some(ge))?);
    b.retire_one(ge)?;

    info!("montgomery reduction by {} bit modulus synthesized", r);
    Ok((big_r, b.seq(ops)))
}

/// Returns `(x, y)` with `a*x = 1 (mod b)`, `b*y = -1 (mod a)`,
/// `0 <= x < b` and `0 <= y < a`.
///
/// `a` and `b` must be nonzero and coprime.
pub fn extended_gcd(a: &BigUint, b: &BigUint) -> Result<(BigUint, BigUint)> {
    let zero = BigUint::default();
    if *a == zero || *b == zero {
        return Err(Error::domain(format!(
            "extended_gcd needs nonzero inputs, got {} and {}",
            a, b
        )));
    }

    let (a, b) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let zero = BigInt::default();

    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::from(1), BigInt::from(0));
    let (mut old_t, mut t) = (BigInt::from(0), BigInt::from(1));

    while r != zero {
        let quotient = old_r.div_floor(&r);
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    if old_r != BigInt::from(1) {
        return Err(Error::domain(format!(
            "{} and {} are not coprime (gcd {})",
            a, b, old_r
        )));
    }

    if old_s < zero {
        old_s += &b;
    }
    if old_t > zero {
        old_t -= &a;
    }

    let x = old_s
        .to_biguint()
        .ok_or_else(|| Error::protocol("negative bezout coefficient"))?;
    let y = (-old_t)
        .to_biguint()
        .ok_or_else(|| Error::protocol("negative bezout coefficient"))?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::qubit::Registry;
    use crate::sim::testing::run;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn gcd(a: u64, b: u64) -> u64 {
        a.gcd(&b)
    }

    #[test]
    fn test_extended_gcd() {
        let mut rng = StdRng::seed_from_u64(0xFEEDBEEF);
        let mut checked = 0;
        while checked < 32 {
            let a: u64 = rng.gen_range(0..1 << 16);
            let b: u64 = rng.gen_range(0..1 << 16);
            let g = gcd(a, b);
            if g == 0 || a / g == 0 || b / g == 0 {
                continue;
            }
            let (a, b) = (a / g, b / g);

            let (x, y) = extended_gcd(&BigUint::from(a), &BigUint::from(b)).unwrap();
            let (x, y) = (x.to_u64_digits(), y.to_u64_digits());
            let x = x.first().copied().unwrap_or(0);
            let y = y.first().copied().unwrap_or(0);

            assert_eq!(a * x % b, 1 % b);
            assert_eq!(b * y % a, a - 1);
            assert!(x < b);
            assert!(y < a);
            checked += 1;
        }
    }

    #[test]
    fn extended_gcd_small_exhaustive() {
        for a in 1u64..40 {
            for b in 1u64..40 {
                let result = extended_gcd(&BigUint::from(a), &BigUint::from(b));
                if gcd(a, b) != 1 {
                    assert!(matches!(result, Err(Error::Domain(_))));
                    continue;
                }
                let (x, y) = result.unwrap();
                let x = x.to_u64_digits().first().copied().unwrap_or(0);
                let y = y.to_u64_digits().first().copied().unwrap_or(0);
                assert_eq!(a * x % b, 1 % b, "a={} b={}", a, b);
                assert_eq!((b * y + 1) % a, 0, "a={} b={}", a, b);
                assert!(x < b && y < a);
            }
        }
    }

    #[test]
    fn extended_gcd_rejects_degenerate_inputs() {
        let two = BigUint::from(2u32);
        assert!(matches!(
            extended_gcd(&BigUint::from(0u32), &two),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            extended_gcd(&two, &BigUint::from(0u32)),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            extended_gcd(&BigUint::from(4u32), &BigUint::from(6u32)),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn extended_gcd_with_unit_inputs() {
        let one = BigUint::from(1u32);
        let five = BigUint::from(5u32);
        assert_eq!(
            extended_gcd(&five, &one),
            Ok((BigUint::from(0u32), BigUint::from(4u32)))
        );
        assert_eq!(
            extended_gcd(&one, &five),
            Ok((BigUint::from(1u32), BigUint::from(0u32)))
        );
        assert_eq!(
            extended_gcd(&one, &one),
            Ok((BigUint::from(0u32), BigUint::from(0u32)))
        );
    }

    #[test]
    fn modulus_one_reduces_to_zero() {
        for mult in [
            ClassicalMult::Schoolbook,
            ClassicalMult::Karatsuba { cutoff: Some(4) },
        ] {
            let mut registry = Registry::new();
            let t = registry.register("T", 3);
            let mut b = Builder::new();
            let (big_r, op) = montgomery_reduce(&mut b, &t, &BigUint::from(1u32), mult).unwrap();
            assert_eq!(big_r, BigUint::from(2u32));
            assert!(b.ancillas().all_retired());

            for t_val in [0u64, 1] {
                let state = run(&op, &b, &[(&t[..], t_val)]);
                assert_eq!(state.read_u64(&t), 0);
            }
        }
    }

    #[test]
    fn test_montgomery_reduce() {
        init();
        let n = 8;
        let mut rng = StdRng::seed_from_u64(0xFEEDBEEF);

        for _ in 0..32 {
            let modulus: u64 = rng.gen_range(0..1 << n) | 1 | (1 << (n - 1));
            let t_val: u64 = rng.gen_range(0..modulus << n);

            for mult in [
                ClassicalMult::Schoolbook,
                ClassicalMult::Karatsuba { cutoff: Some(4) },
            ] {
                let mut registry = Registry::new();
                let t = registry.register("T", 2 * n + 1);
                let mut b = Builder::new();

                let (big_r, op) =
                    montgomery_reduce(&mut b, &t, &BigUint::from(modulus), mult).unwrap();
                assert_eq!(big_r, BigUint::from(1u32 << n));
                assert!(b.ancillas().all_retired());

                let state = run(&op, &b, &[(&t[..], t_val)]);
                let low = state.read_u64(&t[..n]);
                let high = state.read_u64(&t[n..]);

                assert_eq!(low, 0, "T={} N={} {:?}", t_val, modulus, mult);
                assert_eq!((high << n) % modulus, t_val % modulus);
                assert!(high < modulus);
            }
        }
    }

    #[test]
    fn montgomery_reduce_checks_inputs() {
        let mut registry = Registry::new();
        let t = registry.register("T", 17);
        let short = registry.register("S", 16);
        let mut b = Builder::new();

        assert!(matches!(
            montgomery_reduce(&mut b, &t, &BigUint::from(200u32), ClassicalMult::Schoolbook),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            montgomery_reduce(&mut b, &short, &BigUint::from(201u32), ClassicalMult::Schoolbook),
            Err(Error::Size(_))
        ));
        assert_eq!(b.ancillas().len(), 0);
    }
}
