// Shape 定义与通用校验器

mod error;
mod schema;
mod validation;

pub use error::{FieldViolation, ValidationErrors, ViolationKind};
pub use schema::{Schema, SchemaField, SchemaKind};
pub use validation::validate;
