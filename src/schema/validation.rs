use serde_json::Value;

use super::error::{FieldViolation, ValidationErrors, ViolationKind};
use super::schema::{Schema, SchemaKind};

/// 校验值是否符合 Shape
///
/// 不做任何强制转换或修复：要么整体通过，要么返回全部违规。
pub fn validate(schema: &Schema, value: &Value) -> std::result::Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    validate_value(schema, value, &mut Vec::new(), &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(errors))
    }
}

fn validate_value(
    schema: &Schema,
    value: &Value,
    path: &mut Vec<String>,
    errors: &mut Vec<FieldViolation>,
) {
    match &schema.kind {
        SchemaKind::String {
            min_length,
            max_length,
        } => {
            let Some(text) = value.as_str() else {
                errors.push(wrong_type(path, "string", value));
                return;
            };
            let actual = text.chars().count();
            if let Some(min) = *min_length {
                if actual < min {
                    errors.push(violation(path, ViolationKind::TooShort { min, actual }));
                }
            }
            if let Some(max) = *max_length {
                if actual > max {
                    errors.push(violation(path, ViolationKind::TooLong { max, actual }));
                }
            }
        }
        SchemaKind::Number { minimum, maximum } => {
            if !value.is_number() {
                errors.push(wrong_type(path, "number", value));
                return;
            }
            check_range(path, value, *minimum, *maximum, errors);
        }
        SchemaKind::Integer { minimum, maximum } => {
            if !(value.is_i64() || value.is_u64()) {
                errors.push(wrong_type(path, "integer", value));
                return;
            }
            check_range(path, value, *minimum, *maximum, errors);
        }
        SchemaKind::Boolean => {
            if !value.is_boolean() {
                errors.push(wrong_type(path, "boolean", value));
            }
        }
        SchemaKind::Enum { values } => match value.as_str() {
            Some(text) if values.iter().any(|allowed| allowed == text) => {}
            Some(text) => errors.push(violation(
                path,
                ViolationKind::EnumMismatch {
                    allowed: values.clone(),
                    found: text.to_string(),
                },
            )),
            None => errors.push(wrong_type(path, "string", value)),
        },
        SchemaKind::Optional { inner } => {
            if !value.is_null() {
                validate_value(inner, value, path, errors);
            }
        }
        SchemaKind::Array { items } => {
            if let Some(array) = value.as_array() {
                for (idx, element) in array.iter().enumerate() {
                    path.push(format!("[{idx}]"));
                    validate_value(items, element, path, errors);
                    path.pop();
                }
            } else {
                errors.push(wrong_type(path, "array", value));
            }
        }
        SchemaKind::Object { fields, additional } => {
            let Some(object) = value.as_object() else {
                errors.push(wrong_type(path, "object", value));
                return;
            };

            for field in fields {
                path.push(field.name.clone());
                match object.get(&field.name) {
                    Some(val) => validate_value(&field.schema, val, path, errors),
                    None if field.schema.is_optional() => {}
                    None => errors.push(violation(path, ViolationKind::MissingRequired)),
                }
                path.pop();
            }

            if !additional {
                for key in object.keys() {
                    if !fields.iter().any(|field| &field.name == key) {
                        path.push(key.clone());
                        errors.push(violation(path, ViolationKind::UnknownField));
                        path.pop();
                    }
                }
            }
        }
        SchemaKind::Any => {}
    }
}

fn check_range(
    path: &[String],
    value: &Value,
    minimum: Option<f64>,
    maximum: Option<f64>,
    errors: &mut Vec<FieldViolation>,
) {
    let Some(found) = value.as_f64() else {
        return;
    };
    let below = minimum.is_some_and(|min| found < min);
    let above = maximum.is_some_and(|max| found > max);
    if below || above {
        errors.push(violation(
            path,
            ViolationKind::OutOfRange {
                minimum,
                maximum,
                found,
            },
        ));
    }
}

fn violation(path: &[String], kind: ViolationKind) -> FieldViolation {
    FieldViolation {
        path: render_path(path),
        kind,
    }
}

fn wrong_type(path: &[String], expected: &str, value: &Value) -> FieldViolation {
    violation(
        path,
        ViolationKind::WrongType {
            expected: expected.to_string(),
            found: type_name(value).to_string(),
        },
    )
}

fn render_path(path: &[String]) -> String {
    let mut out = String::new();
    for segment in path {
        if !segment.starts_with('[') && !out.is_empty() {
            out.push('.');
        }
        out.push_str(segment);
    }
    out
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_paths_are_rendered_with_indices() {
        let schema = Schema::object().field(
            "steps",
            Schema::array(Schema::object().field("title", Schema::string().non_empty())),
        );
        let errors = validate(&schema, &json!({"steps": [{"title": "ok"}, {"title": ""}]}))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_path("steps[1].title"),
            vec![&ViolationKind::TooShort { min: 1, actual: 0 }]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let schema = Schema::string().max_length(3);
        assert!(validate(&schema, &json!("été")).is_ok());
    }

    #[test]
    fn integer_rejects_fractional_numbers() {
        let errors = validate(&Schema::integer(), &json!(2.5)).unwrap_err();
        assert_eq!(errors.to_string(), "value expected integer, found number");
    }

    #[test]
    fn integers_outside_bounds_are_rejected() {
        let schema = Schema::integer().range(1, 20);
        assert!(validate(&schema, &json!(20)).is_ok());

        let errors = validate(&schema, &json!(-3)).unwrap_err();
        assert_eq!(errors.to_string(), "value must be between 1 and 20, found -3");
        assert!(validate(&schema, &json!(10_000_000_000u64)).is_err());
    }

    #[test]
    fn one_sided_bound_is_reported_as_such() {
        let errors = validate(&Schema::number().minimum(0), &json!(-0.5)).unwrap_err();
        assert_eq!(errors.to_string(), "value must be at least 0, found -0.5");
    }
}
