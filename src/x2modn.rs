use std::fmt;
use std::str::FromStr;

use log::{info, warn};
use num_bigint::BigUint;

use crate::add::times_three;
use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::montgomery::{montgomery_reduce, ClassicalMult};
use crate::mult::{karatsuba_square, schoolbook_square};
use crate::op::Op;
use crate::qubit::{Qubit, Register, Registry};

/// Squaring strategy, which also fixes the multiplier inside the reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    Schoolbook,
    #[default]
    Karatsuba,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Karatsuba, Method::Schoolbook];
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Schoolbook => write!(f, "schoolbook"),
            Method::Karatsuba => write!(f, "karatsuba"),
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "schoolbook" => Ok(Method::Schoolbook),
            "karatsuba" => Ok(Method::Karatsuba),
            other => Err(Error::domain(format!("unknown mult type '{}'", other))),
        }
    }
}

fn three_pow(threes: u32) -> BigUint {
    BigUint::from(3u32).pow(threes)
}

/*
    y <- (3^t x)^2 R^-1 mod 3^(2t) N, in the top bits of y

    x is scaled by 3 in place `threes` times, squared into y (which must
    start at zero), and y is then montgomery reduced by factor^2 N. x is
    left holding factor * x.

    the result sits in output_bits(y, R); recover() turns a measured value
    back into x^2 mod N.
*/
pub fn x2_mod_n(
    b: &mut Builder,
    n: &BigUint,
    x: &[Qubit],
    y: &[Qubit],
    method: Method,
    threes: u32,
) -> Result<(BigUint, Op)> {
    let factor = three_pow(threes);
    let xmax = &factor * n;
    let modulus = &factor * &xmax;

    // y has to hold the full square of x and the montgomery input
    let x_len = xmax.bits() as usize;
    let y_len = ((&xmax * 2u32 + 1u32).bits() as usize)
        .max(2 * x.len())
        .max(2 * modulus.bits() as usize + 1);
    if x.len() < x_len || y.len() < y_len {
        return Err(Error::size(format!(
            "registers of {} and {} qubits not large enough for N = {} with factor {}",
            x.len(),
            y.len(),
            n,
            factor
        )));
    }
    if !n.bit(0) {
        return Err(Error::domain(format!("N = {} must be odd", n)));
    }

    info!(
        "x2_mod_n: {} bit N, method {}, threes {}, |x| = {}, |y| = {}",
        n.bits(),
        method,
        threes,
        x.len(),
        y.len()
    );

    let mut ops = vec![];
    for _ in 0..threes {
        ops.push(times_three(b, x)?);
    }

    let (big_r, reduce) = match method {
        Method::Karatsuba => {
            ops.push(karatsuba_square(b, x, y, None, true)?);
            montgomery_reduce(b, y, &modulus, ClassicalMult::Karatsuba { cutoff: None })?
        }
        Method::Schoolbook => {
            ops.push(schoolbook_square(b, x, y, true)?);
            montgomery_reduce(b, y, &modulus, ClassicalMult::Schoolbook)?
        }
    };
    ops.push(reduce);

    let ancillas = b.ancillas();
    if !ancillas.all_retired() {
        warn!(
            "qubit memory leak! {} ancillas not retired",
            ancillas.live_count()
        );
    }
    info!(
        "x2_mod_n: {} ancillas issued, peak {} live",
        ancillas.len(),
        ancillas.peak_concurrency()
    );

    Ok((big_r, b.seq(ops)))
}

/// Input and accumulator registers wide enough for an `n` bit modulus
/// scaled by `factor`.
pub fn registers_for(registry: &mut Registry, n: usize, factor: &BigUint) -> (Register, Register) {
    let extra = factor.bits() as usize;
    let x = registry.register("x", n + extra);
    let y = registry.register("y", 2 * (n + 2 * extra) + 1);
    (x, y)
}

/// The cells of `y` holding the reduced value.
pub fn output_bits<'a>(y: &'a [Qubit], big_r: &BigUint) -> &'a [Qubit] {
    let skip = (big_r.bits() as usize).saturating_sub(1).min(y.len());
    &y[skip..]
}

/// `x^2 mod N` from the value measured on [`output_bits`].
pub fn recover(big_r: &BigUint, measured: &BigUint, threes: u32, n: &BigUint) -> BigUint {
    let factor = three_pow(threes);
    (big_r * measured / (&factor * &factor)) % n
}

#[cfg(test)]
mod tests {
    use num_bigint::RandBigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sim::testing::run;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn method_names() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>(), Ok(method));
        }
        assert!(matches!("fast".parse::<Method>(), Err(Error::Domain(_))));
    }

    #[test]
    fn seventy_seven() {
        init();
        let n = BigUint::from(77u32);
        for method in Method::ALL {
            let mut registry = Registry::new();
            let (x, y) = registers_for(&mut registry, 7, &BigUint::from(1u32));
            let mut b = Builder::new();

            let (big_r, op) = x2_mod_n(&mut b, &n, &x, &y, method, 0).unwrap();
            assert_eq!(big_r, BigUint::from(128u32));

            let state = run(&op, &b, &[(&x[..], 5u32), (&y[..], 0)]);
            let measured = state.read(output_bits(&y, &big_r)).unwrap();
            assert_eq!(recover(&big_r, &measured, 0, &n), BigUint::from(25u32));
            assert_eq!(state.read_u64(&x), 5);
        }
    }

    #[test]
    fn test_x2modn() {
        init();
        let mut rng = StdRng::seed_from_u64(0xF00DCAFE);
        for bits in [4usize, 8, 16] {
            for threes in [0u32, 1, 2] {
                let factor = three_pow(threes);
                for method in Method::ALL {
                    let mut registry = Registry::new();
                    let (x, y) = registers_for(&mut registry, bits, &factor);

                    let mut n = rng.gen_biguint(bits as u64);
                    n.set_bit(0, true);
                    n.set_bit(bits as u64 - 1, true);

                    let mut b = Builder::new();
                    let (big_r, op) = x2_mod_n(&mut b, &n, &x, &y, method, threes).unwrap();
                    assert!(b.ancillas().all_retired());

                    for _ in 0..4 {
                        let xv = rng.gen_biguint_below(&n);
                        let state = run(&op, &b, &[(&x[..], xv.clone()), (&y[..], BigUint::default())]);

                        assert_eq!(state.read(&x).unwrap(), &factor * &xv);

                        let measured = state.read(output_bits(&y, &big_r)).unwrap();
                        assert!(measured < &factor * &factor * &n);
                        assert_eq!(
                            recover(&big_r, &measured, threes, &n),
                            (&xv * &xv) % &n,
                            "N={} x={} method={} threes={}",
                            n,
                            xv,
                            method,
                            threes
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn undersized_registers() {
        let n = BigUint::from(201u32);
        let mut registry = Registry::new();
        let (x, y) = registers_for(&mut registry, 8, &BigUint::from(1u32));
        let mut b = Builder::new();

        assert!(matches!(
            x2_mod_n(&mut b, &n, &x[..7], &y, Method::Karatsuba, 0),
            Err(Error::Size(_))
        ));
        assert!(matches!(
            x2_mod_n(&mut b, &n, &x, &y[..16], Method::Schoolbook, 0),
            Err(Error::Size(_))
        ));
        // 201 * 9 needs 11 bits
        assert!(matches!(
            x2_mod_n(&mut b, &n, &x, &y, Method::Karatsuba, 2),
            Err(Error::Size(_))
        ));
        assert!(matches!(
            x2_mod_n(&mut b, &BigUint::from(200u32), &x, &y, Method::Karatsuba, 0),
            Err(Error::Domain(_))
        ));
        assert!(b.ancillas().is_empty());
    }

    #[test]
    fn undersized_accumulator_fails_before_scaling() {
        let n = BigUint::from(201u32);
        let mut registry = Registry::new();
        let x = registry.register("x", 10);
        let y = registry.register("y", 19);
        for method in Method::ALL {
            let mut b = Builder::new();
            assert!(matches!(
                x2_mod_n(&mut b, &n, &x, &y, method, 1),
                Err(Error::Size(_))
            ));
            assert!(b.ancillas().is_empty());
        }

        // 2 * bitlen(9 * 201) + 1 = 23 cells for the reduction
        let (x, y) = registers_for(&mut registry, 8, &BigUint::from(3u32));
        let mut b = Builder::new();
        assert!(matches!(
            x2_mod_n(&mut b, &n, &x, &y[..22], Method::Schoolbook, 1),
            Err(Error::Size(_))
        ));
        assert!(b.ancillas().is_empty());
        assert!(x2_mod_n(&mut b, &n, &x, &y[..23], Method::Schoolbook, 1).is_ok());
    }

    #[test]
    fn unit_modulus() {
        let n = BigUint::from(1u32);
        for threes in [0u32, 1] {
            let factor = three_pow(threes);
            for method in Method::ALL {
                let mut registry = Registry::new();
                let (x, y) = registers_for(&mut registry, 1, &factor);
                let mut b = Builder::new();

                let (big_r, op) = x2_mod_n(&mut b, &n, &x, &y, method, threes).unwrap();
                assert!(b.ancillas().all_retired());

                let state = run(&op, &b, &[(&x[..], 0u32), (&y[..], 0)]);
                let measured = state.read(output_bits(&y, &big_r)).unwrap();
                assert_eq!(recover(&big_r, &measured, threes, &n), BigUint::default());
            }
        }
    }

    #[test]
    fn counting_matches_construction() {
        let n = BigUint::from(0xC35Bu32);
        for method in Method::ALL {
            let mut registry = Registry::new();
            let (x, y) = registers_for(&mut registry, 16, &BigUint::from(1u32));

            let mut full = Builder::new();
            let (r1, op) = x2_mod_n(&mut full, &n, &x, &y, method, 0).unwrap();
            let mut counting = Builder::counting();
            let (r2, tally) = x2_mod_n(&mut counting, &n, &x, &y, method, 0).unwrap();

            assert_eq!(r1, r2);
            assert!(matches!(tally, Op::Count(_)));
            assert_eq!(op.counts(), tally.counts());
            assert_eq!(op.gates().count() as u64, tally.counts().total());
            assert_eq!(
                full.ancillas().peak_concurrency(),
                counting.ancillas().peak_concurrency()
            );
            assert!(counting.ancillas().all_retired());
        }
    }
}
