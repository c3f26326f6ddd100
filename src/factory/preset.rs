use crate::task::{RESERVED_INPUT_KEYS, TaskType};
use serde_json::{Map, Value};

/// Recursively merges `patch` into `base`. Objects merge key by key; any other
/// value in `patch` replaces what `base` had.
pub(super) fn deep_merge(base: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) = (base.get_mut(key), value)
        {
            deep_merge(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

/// Moves reserved keys the execution engine expects at task level out of
/// `inputParameters`. Only keys that have a home on the task's type move; a
/// value already set at task level is kept.
pub(super) fn lift_reserved_keys(task: &mut Map<String, Value>) {
    let task_type = task
        .get("type")
        .cloned()
        .and_then(|t| serde_json::from_value::<TaskType>(t).ok());
    let keys: &[&str] = match task_type {
        Some(TaskType::DoWhile) => &RESERVED_INPUT_KEYS[..1],
        Some(TaskType::Switch) => &RESERVED_INPUT_KEYS[1..],
        _ => return,
    };

    let Some(Value::Object(params)) = task.get_mut("inputParameters") else {
        return;
    };
    let lifted: Vec<(String, Value)> = keys
        .iter()
        .filter_map(|key| params.shift_remove(*key).map(|value| (key.to_string(), value)))
        .collect();

    for (key, value) in lifted {
        let value = match value {
            Value::String(s) => Value::String(s),
            Value::Null => Value::String(String::new()),
            other => Value::String(other.to_string()),
        };
        task.entry(key).or_insert(value);
    }
}
