//! OpenAPI specification metadata.

use paperclip::v2::models::{DefaultApiRaw, Info};

/// Swagger UI mount point
pub const SWAGGER_PATH: &str = "/swagger";

/// Raw OpenAPI v2 document
pub const SWAGGER_JSON_PATH: &str = "/swagger/json";

/// Creates the OpenAPI document metadata for the API
///
/// Operations, schemas and the bearer security definition are filled in by
/// paperclip from the handler annotations when the app is built.
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Configurable Module Example".into(),
            version: "1.0".into(),
            description: Some(String::new()),
            ..Default::default()
        },
        ..Default::default()
    }
}
