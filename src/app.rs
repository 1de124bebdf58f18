use crate::types::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::HeaderName, Method},
    Extension, Router,
};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors, timeout::TimeoutLayer, trace};

use crate::modules;

const ALLOWED_HEADERS: [&str; 6] = [
    "content-type",
    "x-amz-date",
    "authorization",
    "x-api-key",
    "x-amz-security-token",
    "x-amz-user-agent",
];

/// Open cross-origin policy applied to every route, preflights included.
pub fn cors_layer() -> cors::CorsLayer {
    cors::CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
        .allow_origin(cors::Any)
}

pub struct App {
    ctx: Arc<Context>,
    router: Router,
}

impl App {
    pub fn new(ctx: Arc<Context>) -> Self {
        let router = Router::new()
            .merge(modules::get_router())
            .with_state(ctx.clone())
            .layer(Extension(ctx.clone()))
            .layer(DefaultBodyLimit::max(1024 * 1024))
            .layer(TimeoutLayer::new(ctx.app.request_timeout))
            .layer(trace::TraceLayer::new_for_http())
            .layer(cors_layer());

        Self { ctx, router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn serve(self) -> io::Result<()> {
        let listener = TcpListener::bind(format!("{}:{}", self.ctx.app.host, self.ctx.app.port)).await?;

        tracing::info!("App is running on {}", listener.local_addr()?);

        axum::serve(listener, self.router).await
    }
}
