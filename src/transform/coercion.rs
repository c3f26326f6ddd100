use super::{HasInputParameters, is_variable_reference};
use crate::tool::{PropertyDef, PropertyType};
use serde_json::{Number, Value};

/// Normalizes `target`'s input parameters against the declared properties.
///
/// Every declared property is present afterwards: the coerced user value, the
/// (coerced) default, or a type-appropriate empty value. Strings holding a
/// variable reference are left alone. Never fails; values that cannot be
/// coerced stay as they are. Applying it twice gives the same result as once.
pub fn auto_type_transform<'a, T>(properties: &[PropertyDef], target: &'a mut T) -> &'a mut T
where
    T: HasInputParameters + ?Sized,
{
    let params = target.input_parameters_mut();
    for property in properties {
        match params.get_mut(&property.name) {
            Some(value) => coerce_value(property, value),
            None => {
                if let Some(value) = empty_value(property) {
                    params.insert(property.name.clone(), value);
                }
            }
        }
    }
    target
}

/// Value given to a property the caller did not supply.
fn empty_value(property: &PropertyDef) -> Option<Value> {
    if let Some(default) = &property.default {
        let mut value = default.clone();
        coerce_value(property, &mut value);
        return Some(value);
    }
    if property.is_multiple() {
        return Some(Value::Array(Vec::new()));
    }
    match property.property_type {
        PropertyType::Boolean => Some(Value::Bool(false)),
        PropertyType::String => Some(Value::Null),
        _ => None,
    }
}

/// Coerces a single present value according to its declaration.
pub fn coerce_value(property: &PropertyDef, value: &mut Value) {
    if let Value::String(s) = value {
        if is_variable_reference(s) {
            return;
        }
    }

    if property.is_multiple() {
        match value {
            Value::Array(_) | Value::Null => {}
            Value::String(s) => {
                let items = split_list(s, property.property_type);
                *value = Value::Array(items);
            }
            _ => {
                *value = match &property.default {
                    Some(default @ Value::Array(_)) => default.clone(),
                    _ => Value::Array(Vec::new()),
                };
            }
        }
        return;
    }

    match property.property_type {
        PropertyType::Boolean => {
            if let Value::String(s) = value {
                if let Some(b) = parse_bool(s) {
                    *value = Value::Bool(b);
                }
            }
        }
        PropertyType::Number => {
            if let Value::String(s) = value {
                if let Some(n) = parse_number(s) {
                    *value = n;
                }
            }
        }
        PropertyType::String => match value {
            Value::String(s) => {
                let trimmed = s.trim();
                *value = if trimmed.is_empty() {
                    Value::Null
                } else {
                    Value::String(trimmed.to_string())
                };
            }
            Value::Number(n) => *value = Value::String(n.to_string()),
            Value::Bool(b) => *value = Value::String(b.to_string()),
            _ => {}
        },
        _ => {}
    }
}

fn split_list(raw: &str, item_type: PropertyType) -> Vec<Value> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item_type {
            PropertyType::Number => {
                parse_number(item).unwrap_or_else(|| Value::String(item.to_string()))
            }
            PropertyType::Boolean => parse_bool(item)
                .map(Value::Bool)
                .unwrap_or_else(|| Value::String(item.to_string())),
            _ => Value::String(item.to_string()),
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
