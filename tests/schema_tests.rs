use careerflow::{validate, Schema, ViolationKind};
use serde_json::json;

fn profile() -> Schema {
    Schema::object()
        .field("name", Schema::string().non_empty())
        .field("age", Schema::integer().optional())
        .field("level", Schema::enumeration(["Entry", "Senior"]))
        .field(
            "jobs",
            Schema::array(Schema::object().field("title", Schema::string().max_length(5))),
        )
}

#[test]
fn conforming_value_passes() {
    let value = json!({
        "name": "Alice",
        "level": "Entry",
        "jobs": [{"title": "Dev"}]
    });
    assert!(validate(&profile(), &value).is_ok());
}

#[test]
fn every_violation_is_collected_with_its_path() {
    let value = json!({
        "name": "",
        "age": "thirty",
        "level": "Junior",
        "jobs": [{"title": "Dev"}, {"title": "Engineer"}],
        "city": "Paris"
    });
    let errors = validate(&profile(), &value).unwrap_err();

    assert_eq!(errors.len(), 5);
    assert_eq!(errors.for_path("name"), vec![&ViolationKind::TooShort { min: 1, actual: 0 }]);
    assert!(matches!(errors.for_path("age")[0], ViolationKind::WrongType { .. }));
    assert!(matches!(errors.for_path("level")[0], ViolationKind::EnumMismatch { .. }));
    assert!(matches!(errors.for_path("jobs[1].title")[0], ViolationKind::TooLong { max: 5, .. }));
    assert_eq!(errors.for_path("city"), vec![&ViolationKind::UnknownField]);
}

#[test]
fn absent_and_null_optional_fields_are_accepted() {
    let base = json!({"name": "Bob", "level": "Senior", "jobs": []});
    assert!(validate(&profile(), &base).is_ok());

    let mut with_null = base.clone();
    with_null["age"] = json!(null);
    assert!(validate(&profile(), &with_null).is_ok());
}

#[test]
fn missing_required_field_is_reported() {
    let errors = validate(&profile(), &json!({"level": "Senior", "jobs": []})).unwrap_err();
    assert_eq!(errors.for_path("name"), vec![&ViolationKind::MissingRequired]);
}

#[test]
fn json_schema_export_marks_required_fields() {
    let exported = profile().to_json_schema();
    assert_eq!(exported["type"], "object");
    assert_eq!(exported["required"], json!(["name", "level", "jobs"]));
    assert_eq!(exported["properties"]["level"]["enum"], json!(["Entry", "Senior"]));
    assert_eq!(exported["additionalProperties"], json!(false));
}
