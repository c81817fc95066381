//! OpenAPI documentation and schema generation
//!
//! Defines the OpenAPI specification for the apod-collector REST API using
//! utoipa for compile-time document generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the apod-collector REST API
///
/// The document is served at:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (when enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "apod-collector REST API",
        version = "0.1.0",
        description = "Collects NASA Astronomy Picture of the Day URLs for a date range",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::routes::get_pictures,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::api::routes::PicturesResponse,
        crate::types::PictureRecord,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "pictures", description = "Picture of the day URLs over a date range"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
