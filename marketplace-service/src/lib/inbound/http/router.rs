use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::products::browse::get_product;
use super::handlers::products::browse::list_products;
use super::handlers::products::browse::my_products;
use super::handlers::products::create::create_product;
use super::handlers::products::delete::delete_product;
use super::handlers::products::update::update_product;
use super::handlers::users::login::login;
use super::handlers::users::manage::create_user;
use super::handlers::users::manage::delete_user;
use super::handlers::users::manage::get_user;
use super::handlers::users::manage::list_users;
use super::handlers::users::manage::update_user;
use super::handlers::users::profile::delete_profile;
use super::handlers::users::profile::get_profile;
use super::handlers::users::profile::update_profile;
use super::handlers::users::register::register;
use super::handlers::ApiError;
use super::middleware::authenticate as auth_gate;
use super::policy::RoutePolicyTable;
use crate::domain::product::service::ProductService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::InMemoryProductRepository;
use crate::outbound::repositories::InMemoryUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<InMemoryUserRepository>>,
    pub product_service: Arc<ProductService<InMemoryProductRepository, InMemoryUserRepository>>,
    pub authenticator: Arc<Authenticator>,
    pub route_policy: Arc<RoutePolicyTable>,
}

pub fn create_router(
    user_service: Arc<UserService<InMemoryUserRepository>>,
    product_service: Arc<ProductService<InMemoryProductRepository, InMemoryUserRepository>>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        product_service,
        authenticator,
        route_policy: Arc::new(RoutePolicyTable::standard()),
    };

    let user_routes = Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route(
            "/users/me",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        );

    let product_routes = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/me", get(my_products))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(user_routes)
        .merge(product_routes)
        // The gate's route table already answers unknown paths; this
        // fallback only fires if the table and the router disagree.
        .fallback(|| async { ApiError::RouteNotFound })
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
