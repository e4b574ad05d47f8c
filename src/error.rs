use thiserror::Error;

/// A result type for circuit synthesis and simulation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or replaying a circuit. All of them point at
/// a wiring or parameter mistake made by the caller, none are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// a register or constant does not fit the width an operation needs
    #[error("size error: {0}")]
    Size(String),

    /// a mathematically invalid input (even modulus, cutoff below 4, ...)
    #[error("domain error: {0}")]
    Domain(String),

    /// an ancilla lifecycle violation
    #[error("protocol error: {0}")]
    Protocol(String),

    /// the simulator met a gate outside the set it can replay
    #[error("unsupported gate: {0}")]
    UnsupportedGate(String),
}

impl Error {
    pub(crate) fn size(msg: impl Into<String>) -> Self {
        Error::Size(msg.into())
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Error::Domain(msg.into())
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }
}
