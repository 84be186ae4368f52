use crate::{
    message::{
        message_dto::{MessageContainer, MessageForCreationDto},
        message_handlers,
        message_models::MessageResponse,
    },
    middleware::{auth_middleware, log_user_activity},
    pagination::PAGINATION_HEADER,
    state::AppState,
};
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::message::message_handlers::get_message,
        crate::message::message_handlers::get_message_thread,
        crate::message::message_handlers::get_messages_for_user,
        crate::message::message_handlers::create_message,
    ),
    components(
        schemas(
            MessageForCreationDto,
            MessageResponse,
            MessageContainer,
        )
    ),
    tags(
        (name = "messages", description = "Direct messages between users")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) if origin != "*" => Some(value),
            _ => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([PAGINATION_HEADER])
        .allow_credentials(true)
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    // Layers run bottom-up: auth resolves the caller before activity is logged
    let message_routes = Router::new()
        .route(
            "/",
            get(message_handlers::get_messages_for_user).post(message_handlers::create_message),
        )
        .route("/thread/:recipient_id", get(message_handlers::get_message_thread))
        .route("/:id", get(message_handlers::get_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            log_user_activity,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new().nest("/users/:user_id/messages", message_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
