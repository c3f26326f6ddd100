//! Value normalization applied to task inputs.
//!
//! Both passes work on anything that exposes an `inputParameters` object, so
//! tasks and bare parameter maps are handled the same way.

use crate::task::Task;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub mod coercion;
pub mod substitution;

pub use coercion::{auto_type_transform, coerce_value};
pub use substitution::{BuiltInBindings, BuiltInValue, replace_built_in_value};

/// Anything carrying an `inputParameters` object.
pub trait HasInputParameters {
    fn input_parameters(&self) -> &Map<String, Value>;
    fn input_parameters_mut(&mut self) -> &mut Map<String, Value>;
}

impl HasInputParameters for Task {
    fn input_parameters(&self) -> &Map<String, Value> {
        &self.input_parameters
    }

    fn input_parameters_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.input_parameters
    }
}

impl HasInputParameters for Map<String, Value> {
    fn input_parameters(&self) -> &Map<String, Value> {
        self
    }

    fn input_parameters_mut(&mut self) -> &mut Map<String, Value> {
        self
    }
}

/// `${...}` with at least one non-blank character inside.
static VARIABLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}\s][^}]*\}").expect("variable reference pattern"));

/// Returns `true` if the string holds a `${...}` variable reference.
///
/// References are resolved by the execution engine at run time, so they are
/// never coerced or treated as literal values here.
pub fn is_variable_reference(value: &str) -> bool {
    VARIABLE_REFERENCE.is_match(value)
}
