//! Shape validation for task collections read back from storage.
//!
//! Stored data is untrusted: it may predate the current layout, be
//! hand-edited or be truncated. Nothing read from the store becomes
//! application state without passing through `validate_task_list`.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::list::TaskList;
use crate::task::Task;

const FIELDS: [&str; 4] = ["id", "value", "checked", "removed"];

/// Outcome of validating a decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Valid(TaskList),
    Invalid(ShapeError),
}

/// Why a value was rejected. Only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    NotAnArray,
    NotAnObject { index: usize },
    MissingField { index: usize, field: &'static str },
    UnknownField { index: usize, field: String },
    WrongType { index: usize, field: &'static str },
    DuplicateId { index: usize, id: i64 },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::NotAnArray => write!(f, "expected an array of tasks"),
            ShapeError::NotAnObject { index } => write!(f, "element {index} is not an object"),
            ShapeError::MissingField { index, field } => {
                write!(f, "element {index} is missing `{field}`")
            }
            ShapeError::UnknownField { index, field } => {
                write!(f, "element {index} has unexpected field `{field}`")
            }
            ShapeError::WrongType { index, field } => {
                write!(f, "element {index} has a mistyped `{field}`")
            }
            ShapeError::DuplicateId { index, id } => {
                write!(f, "element {index} repeats id {id}")
            }
        }
    }
}

/// Check that `value` is a sequence of well-formed tasks and convert it.
pub fn validate_task_list(value: &Value) -> Validated {
    match check_list(value) {
        Ok(list) => Validated::Valid(list),
        Err(e) => Validated::Invalid(e),
    }
}

/// Predicate form of `validate_task_list`.
pub fn is_task_list(value: &Value) -> bool {
    matches!(validate_task_list(value), Validated::Valid(_))
}

fn check_list(value: &Value) -> Result<TaskList, ShapeError> {
    let items = value.as_array().ok_or(ShapeError::NotAnArray)?;
    let mut seen = HashSet::with_capacity(items.len());
    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let obj = item.as_object().ok_or(ShapeError::NotAnObject { index })?;
        let task = check_task(index, obj)?;
        if !seen.insert(task.id) {
            return Err(ShapeError::DuplicateId { index, id: task.id });
        }
        tasks.push(task);
    }
    Ok(TaskList::from_tasks(tasks))
}

fn check_task(index: usize, obj: &Map<String, Value>) -> Result<Task, ShapeError> {
    if let Some(extra) = obj.keys().find(|k| !FIELDS.contains(&k.as_str())) {
        return Err(ShapeError::UnknownField {
            index,
            field: extra.clone(),
        });
    }
    let field = |name: &'static str| {
        obj.get(name)
            .ok_or(ShapeError::MissingField { index, field: name })
    };
    let wrong = |name: &'static str| ShapeError::WrongType { index, field: name };

    Ok(Task {
        id: field("id")?.as_i64().ok_or_else(|| wrong("id"))?,
        value: field("value")?.as_str().ok_or_else(|| wrong("value"))?.to_string(),
        checked: field("checked")?.as_bool().ok_or_else(|| wrong("checked"))?,
        removed: field("removed")?.as_bool().ok_or_else(|| wrong("removed"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_list() {
        let value = json!([
            {"id": 2, "value": "b", "checked": true, "removed": false},
            {"id": 1, "value": "", "checked": false, "removed": true}
        ]);
        match validate_task_list(&value) {
            Validated::Valid(list) => {
                assert_eq!(list.len(), 2);
                assert_eq!(list.get(1).unwrap().value, "");
                assert!(list.get(1).unwrap().removed);
            }
            Validated::Invalid(e) => panic!("unexpected rejection: {e}"),
        }
    }

    #[test]
    fn accepts_empty_array() {
        assert!(is_task_list(&json!([])));
    }

    #[test]
    fn rejects_non_array() {
        assert_eq!(
            validate_task_list(&json!({"id": 1})),
            Validated::Invalid(ShapeError::NotAnArray)
        );
        assert!(!is_task_list(&Value::Null));
    }

    #[test]
    fn rejects_missing_field() {
        let value = json!([{"id": 1, "value": "a", "checked": false}]);
        assert_eq!(
            validate_task_list(&value),
            Validated::Invalid(ShapeError::MissingField { index: 0, field: "removed" })
        );
    }

    #[test]
    fn rejects_wrong_types() {
        let cases = [
            (json!([{"id": "1", "value": "a", "checked": false, "removed": false}]), "id"),
            (json!([{"id": 1.5, "value": "a", "checked": false, "removed": false}]), "id"),
            (json!([{"id": 1, "value": 3, "checked": false, "removed": false}]), "value"),
            (json!([{"id": 1, "value": "a", "checked": "no", "removed": false}]), "checked"),
            (json!([{"id": 1, "value": "a", "checked": false, "removed": null}]), "removed"),
        ];
        for (value, field) in cases {
            assert_eq!(
                validate_task_list(&value),
                Validated::Invalid(ShapeError::WrongType { index: 0, field }),
            );
        }
    }

    #[test]
    fn rejects_non_object_element_after_valid_ones() {
        let value = json!([{"id": 1, "value": "a", "checked": false, "removed": false}, 7]);
        assert_eq!(
            validate_task_list(&value),
            Validated::Invalid(ShapeError::NotAnObject { index: 1 })
        );
    }

    #[test]
    fn rejects_unknown_field() {
        let value = json!([{"id": 1, "value": "a", "checked": false, "removed": false, "due": 3}]);
        assert!(matches!(
            validate_task_list(&value),
            Validated::Invalid(ShapeError::UnknownField { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let value = json!([
            {"id": 1, "value": "a", "checked": false, "removed": false},
            {"id": 1, "value": "b", "checked": false, "removed": false}
        ]);
        assert_eq!(
            validate_task_list(&value),
            Validated::Invalid(ShapeError::DuplicateId { index: 1, id: 1 })
        );
    }

    #[test]
    fn serialized_list_validates_back_to_itself() {
        let list = TaskList::default().submit("one", 10).submit("two", 20);
        let list = list.update(20, &crate::fields::TaskUpdate::SetChecked(true));
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(validate_task_list(&value), Validated::Valid(list));
    }
}
