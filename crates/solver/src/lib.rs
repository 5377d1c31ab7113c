#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # DAE Gym Solver
//!
//! The numerical integration boundary of the DAE Gym workspace.
//!
//! An environment never looks inside a solver. It hands over three flat
//! arrays (state, parameters, action) together with a [`TimeSpan`], and
//! receives the state values at the end of that span. This crate defines
//! that contract and ships two backends that honour it.
//!
//! ## Key Components
//!
//! -   **[`SystemDynamics`]:** the right-hand side `dy/dt = f(t, y, p, u)`
//!     of a model, supplied by the domain crate.
//! -   **[`Integrator`]:** the capability an environment consumes. Solver
//!     tuning is fixed at construction and opaque to the caller.
//! -   **Backends:** [`DormandPrince`] (adaptive RK4(5), the default) and
//!     [`RungeKutta4`] (classical fixed step).
//! -   **[`IntegratorConfig`]:** a serde-friendly description that builds
//!     either backend.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use solver::{DormandPrince, DormandPrinceConfig, Integrator, TimeSpan};
//!
//! let decay = |_t: f64, y: &[f64], p: &[f64], _u: &[f64], dydt: &mut [f64]| {
//!     dydt[0] = -y[0] / p[0];
//!     Ok(())
//! };
//! let integrator = DormandPrince::new(Arc::new(decay), DormandPrinceConfig::new(1.0))?;
//! let next = integrator.integrate(&[1.0], &[0.5], &[], TimeSpan::new(0.0, 1.0))?;
//! ```

mod config;
mod dynamics;
mod error;
pub mod integrators;
mod time_span;

pub use config::IntegratorConfig;
pub use dynamics::SystemDynamics;
pub use error::SolverError;
pub use integrators::{
    DormandPrince, DormandPrinceConfig, Integrator, RungeKutta4, RungeKutta4Config,
};
pub use time_span::TimeSpan;
