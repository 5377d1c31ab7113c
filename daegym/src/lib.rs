//! # DAE Gym
//!
//! Reinforcement-learning environments over differential-algebraic process
//! models.
//!
//! ## Overview
//!
//! A process model (a reactor, a column, a heat exchanger) is a set of
//! differential equations with some inputs an operator can turn. DAE Gym
//! wraps such a model in the reset/step protocol RL agents are trained
//! against. Observations and actions are flat arrays inside declared boxes;
//! underneath, every quantity lives in a typed record with physical units.
//!
//! ## Project Architecture
//!
//! -   **`daegym`:** The crate you are currently viewing. It re-exports the
//!     other crates and ships the `daegym` binary, which runs random-policy
//!     episodes of the reactor environment from a JSON configuration.
//! -   **[`solver`]:** The integration boundary. Models implement
//!     `SystemDynamics`; environments consume an `Integrator` that advances
//!     flat state arrays over a time span. Adaptive Dormand–Prince and
//!     classical RK4 backends are included.
//! -   **[`gym`]:** The core. It defines the state and action data model,
//!     the action pipeline, the extractor and generator traits, parameter
//!     sampling, and the `Environment` orchestrator with its fixed step and
//!     reset algorithm.
//! -   **[`cstr`]:** A continuous stirred-tank reactor built from those
//!     parts, usable as an environment and as a template for new domains.
//!
//! ## Getting Started
//!
//! ```text
//! cargo run -p daegym -- --config daegym/configs/cstr.json --episodes 3
//! ```
//!
//! Set `RUST_LOG=debug` to see environment construction and resets, or
//! `RUST_LOG=trace` for every step.

pub use cstr;
pub use gym;
pub use solver;
