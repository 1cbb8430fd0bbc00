use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::health::HealthResponse;
use crate::application::dto::{
    CsrfTokenResponse, SignInForm, SignInResponse, SignUpForm, SignUpResponse,
};

/// OpenAPI document for the raffle gateway
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Raffle Gateway API",
        version = "1.0.0",
        description = "Form validation, CSRF protection and account endpoints for the raffle site"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::csrf::csrf_token_handler,
        crate::api::handlers::auth::sign_up_handler,
        crate::api::handlers::auth::sign_in_handler,
        crate::api::handlers::auth::sign_out_handler,
    ),
    components(
        schemas(
            HealthResponse,
            CsrfTokenResponse,
            SignUpForm,
            SignInForm,
            SignUpResponse,
            SignInResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "csrf", description = "CSRF token issuance"),
        (name = "auth", description = "Account sign-up, sign-in and sign-out")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI route
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/health",
            "/api/csrf",
            "/api/auth/signup",
            "/api/auth/signin",
            "/api/auth/signout",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {}",
                expected
            );
        }
    }
}
