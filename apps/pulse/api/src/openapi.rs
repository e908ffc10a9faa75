use utoipa::OpenApi;

/// Empty prefix: the coach-tips doc already carries its full paths.
/// (The derive rejects an empty string literal, but accepts an expression.)
const ROOT: &str = "";

/// Top-level OpenAPI documentation for the pulse API.
///
/// Merges the coach-tips domain documentation and the shared error schema.
#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Pulse API",
        version = "0.1.0",
        description = "Retrieval API for generated coach tips"
    ),
    nest(
        (path = ROOT, api = domain_coaching::handlers::CoachTipsApiDoc)
    )
)]
pub struct ApiDoc;
