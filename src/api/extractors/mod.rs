//! Custom request extractors.

mod path;
mod validated_json;

pub use path::IdPath;
pub use validated_json::ValidatedJson;
pub(crate) use validated_json::format_validation_errors;
