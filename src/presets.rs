//! Ready-made rule bases.

use crate::error::ConfigResult;
use crate::membership::MembershipFunction;
use crate::rules::Rules;
use crate::system::FuzzyInferenceSystem;
use crate::terms::Terms;
use crate::variable::Variables;

pub const TEMPERATURE: &str = "temperature";
pub const FAN_SPEED: &str = "fan_speed";

/// Temperature (°C, `[0, 40]`) to fan speed (%, `[0, 100]`) on integer grids.
///
/// ```
/// use fuzzy_fan::{presets, Inputs};
///
/// let system = presets::fan_controller().unwrap();
/// let outputs = system.compute(&Inputs::from_iter([(presets::TEMPERATURE, 20.)])).unwrap();
///
/// assert!((outputs.get(presets::FAN_SPEED).unwrap() - 50.).abs() < 1e-9);
/// ```
pub fn fan_controller() -> ConfigResult<FuzzyInferenceSystem> {
    fan_controller_with_step(1.)
}

/// [`fan_controller`] with both universes sampled every `step`.
pub fn fan_controller_with_step(step: f64) -> ConfigResult<FuzzyInferenceSystem> {
    let temperature_terms = Terms::from_iter([
        ("cold", MembershipFunction::trapezoid(0., 0., 10., 15.)?),
        ("warm", MembershipFunction::triangle(10., 20., 30.)?),
        ("hot", MembershipFunction::trapezoid(25., 30., 40., 40.)?),
    ]);
    let fan_speed_terms = Terms::from_iter([
        ("low", MembershipFunction::trapezoid(0., 0., 30., 40.)?),
        ("medium", MembershipFunction::triangle(30., 50., 70.)?),
        ("high", MembershipFunction::trapezoid(60., 70., 100., 100.)?),
    ]);

    let mut vars = Variables::new();
    let temperature = vars.add(TEMPERATURE, 0. ..=40., temperature_terms, Some(step));
    let fan_speed = vars.add(FAN_SPEED, 0. ..=100., fan_speed_terms, Some(step));

    let mut rules = Rules::with_capacity(3);
    rules.add(temperature.is("cold"), fan_speed.is("low"));
    rules.add(temperature.is("warm"), fan_speed.is("medium"));
    rules.add(temperature.is("hot"), fan_speed.is("high"));

    FuzzyInferenceSystem::build(vars, rules)
}
