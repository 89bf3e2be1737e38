//! Mamdani fuzzy inference.
//!
//! Crisp inputs are fuzzified through labeled membership functions, rules fire
//! with min (AND) / max (OR), consequents are clipped at their firing strength,
//! aggregated by pointwise max and reduced to a crisp value by centroid over a
//! discrete universe.
//!
//! ```
//! use fuzzy_fan::{FuzzyInferenceSystem, Inputs, MembershipFunction, Rules, Terms, Variables};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut vars = Variables::new();
//! let temperature = vars.add(
//!     "temperature",
//!     0. ..=40.,
//!     Terms::from_iter([
//!         ("cold", MembershipFunction::trapezoid(0., 0., 10., 15.)?),
//!         ("warm", MembershipFunction::triangle(10., 20., 30.)?),
//!     ]),
//!     Some(1.),
//! );
//! let fan_speed = vars.add(
//!     "fan_speed",
//!     0. ..=100.,
//!     Terms::from_iter([
//!         ("low", MembershipFunction::trapezoid(0., 0., 30., 40.)?),
//!         ("medium", MembershipFunction::triangle(30., 50., 70.)?),
//!     ]),
//!     Some(1.),
//! );
//!
//! let mut rules = Rules::new();
//! rules.add(temperature.is("cold"), fan_speed.is("low"));
//! rules.add(temperature.is("warm"), fan_speed.is("medium"));
//!
//! let system = FuzzyInferenceSystem::build(vars, rules)?;
//! let outputs = system.compute(&Inputs::from_iter([("temperature", 12.5)]))?;
//!
//! assert!(outputs.get("fan_speed").is_some());
//! # Ok(())
//! # }
//! ```

mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
pub mod presets;
mod rules;
mod system;
mod terms;
mod universe;
mod variable;

pub use dsl::{Expr, Proposition};
pub use error::{ConfigError, ConfigResult, InferenceError, InferenceResult};
pub use inference::InferenceTrace;
pub use inputs::Inputs;
pub use membership::MembershipFunction;
pub use ops::DefuzzificationOp;
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use system::FuzzyInferenceSystem;
pub use terms::Terms;
pub use universe::{Universe, DEFAULT_STEP, MAX_SAMPLES};
pub use variable::{LinguisticVariable, Variable, VariableKey, Variables};
