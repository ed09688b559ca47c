use thiserror::Error;

/// The closed error taxonomy for circuit building and stepping.
///
/// Build-time variants are returned synchronously from `CircuitBuilder`
/// methods. `SingularMatrix` and `NonFinite` are never returned as an
/// `Err` from [`crate::circuit::Circuit::step`]; that method reports
/// numerical failure by returning `Ok(false)` instead, keeping a failed
/// solve distinguishable from a hard structural error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CircuitError {
    #[error("cannot connect a component to itself")]
    SameComponent,

    #[error("component {0:?} referenced in connect/ground before it was added")]
    NotAdded(crate::device::ComponentId),

    #[error("circuit already built; no further mutation is possible")]
    AlreadyBuilt,

    #[error("build() called twice on the same CircuitBuilder")]
    DoubleBuild,

    #[error("circuit has no ground reachable from any node")]
    FloatingCircuit,

    #[error("LineCompiler found a cycle of virtual resistors with no real node")]
    DanglingChain,

    #[error("LU pivot magnitude fell below tolerance; matrix is numerically singular")]
    SingularMatrix,

    #[error("solution vector contains a non-finite value (NaN or Inf)")]
    NonFinite,
}

pub type Result<T> = std::result::Result<T, CircuitError>;
