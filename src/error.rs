//! Error types for building and querying a fuzzy inference system.
//!
//! Build-time errors ([`ConfigError`]) are fatal to the build call: nothing is
//! returned until the whole configuration checks out. Query-time errors
//! ([`InferenceError`]) leave the system untouched and usable.

/// Result alias for building a system.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for running a query.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Errors raised while validating variables, shapes and rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed membership function: {0}")]
    MalformedMembershipFunction(String),

    #[error("Rule references label `{label}` which variable `{variable}` does not define")]
    UnknownLabel { variable: String, label: String },

    #[error("Malformed universe for `{variable}`: {reason}")]
    MalformedUniverse { variable: String, reason: String },

    #[error("Label `{label}` of `{variable}` has breakpoints outside the universe [{min}, {max}]")]
    ShapeOutsideUniverse {
        variable: String,
        label: String,
        min: f64,
        max: f64,
    },

    #[error("Variable `{variable}` defines label `{label}` more than once")]
    DuplicateLabel { variable: String, label: String },

    #[error("Variable `{0}` is defined more than once")]
    DuplicateVariable(String),

    #[error("Rule references a variable that is not part of this system")]
    UnknownVariable,

    #[error("Variable `{0}` is used both as an antecedent and as a consequent")]
    AmbiguousVariableRole(String),

    #[error("A fuzzy inference system needs at least one rule")]
    EmptyRuleBase,
}

/// Errors raised by a single query. None of these invalidate the system.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Input {value} for `{variable}` is outside its domain [{min}, {max}]")]
    OutOfDomainInput {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("No rule fired for `{0}`: the aggregated output set is empty")]
    NoActiveRule(String),

    #[error("No input provided for antecedent `{0}`")]
    MissingInput(String),

    #[error("`{0}` is not an antecedent of this system")]
    UnknownInput(String),
}
