use std::fmt;

use log::{debug, warn};
use num_bigint::BigUint;

use crate::ancilla::AncillaManager;
use crate::builder::Builder;
use crate::error::Result;
use crate::op::Op;
use crate::qubit::Registry;
use crate::x2modn::{x2_mod_n, Method};

/// One CSV row of resource estimates for a synthesized circuit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub method: Method,
    pub n: usize,
    /// Gate total, Toffolis decomposed if requested, plus one per measurement.
    pub gates: u64,
    pub t_gates: u64,
    /// Register cells plus the peak number of live ancillas.
    pub qubits: usize,
    /// Each retired ancilla is measured once.
    pub measurements: usize,
}

impl Report {
    pub const HEADER: &'static str = "impl,n,gates,t_gates,qubits,measurements";

    pub fn new(
        method: Method,
        n: usize,
        op: &Op,
        register_qubits: usize,
        ancillas: &AncillaManager,
        decompose: bool,
    ) -> Self {
        let (gates, t_gates) = op.counts().describe(decompose);
        let measurements = ancillas.retired_count();
        Report {
            method,
            n,
            gates: gates + measurements as u64,
            t_gates,
            qubits: register_qubits + ancillas.peak_concurrency(),
            measurements,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            self.method, self.n, self.gates, self.t_gates, self.qubits, self.measurements
        )
    }
}

/// Counts `x^2 mod N` for the given modulus without materializing gates.
/// Registers are the minimal `bitlen(N)` and `2 bitlen(N) + 1` cells.
pub fn count_x2modn(n: &BigUint, method: Method, decompose: bool) -> Result<Report> {
    let bits = n.bits() as usize;
    let mut registry = Registry::new();
    let x = registry.register("x", bits);
    let y = registry.register("y", 2 * bits + 1);

    let mut b = Builder::counting();
    let (_, op) = x2_mod_n(&mut b, n, &x, &y, method, 0)?;
    if !b.ancillas().all_retired() {
        warn!(
            "qubit memory leak! {} ancillas not retired",
            b.ancillas().live_count()
        );
    }

    let report = Report::new(method, bits, &op, x.len() + y.len(), b.ancillas(), decompose);
    debug!("{}", report);
    Ok(report)
}
