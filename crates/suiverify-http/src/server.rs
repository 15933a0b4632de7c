use crate::{
    config::HTTPConfig, did::DIDHTTPHandler, encrypt_upload::EncryptUploadHTTPHandler, handlers,
    state::AppState,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, IntoMakeService};
use axum::Router;
use hyper::server::conn::AddrIncoming;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Allowance for multipart framing and the address field on top of the file size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub struct SuiVerifyRouter {
    router: Router,
}

impl From<Arc<AppState>> for SuiVerifyRouter {
    fn from(app_state: Arc<AppState>) -> Self {
        Self {
            router: Self::generate_router(app_state),
        }
    }
}

impl SuiVerifyRouter {
    /// Constructs a router given the shared app state.
    fn generate_router(shared_state: Arc<AppState>) -> Router {
        let body_limit = shared_state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
        Router::new()
            .route("/", get(handlers::index))
            .route(
                "/api/encrypt-upload",
                post(EncryptUploadHTTPHandler::post_encrypt_upload)
                    .layer(DefaultBodyLimit::max(body_limit)),
            )
            .route("/api/did/create", post(DIDHTTPHandler::post_create_did))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
            .with_state(shared_state)
    }

    /// Moves wrapped app router and consumes.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// General method to spawn a SuiVerify server given its config and state.
pub fn server(
    config: &HTTPConfig,
    app_state: Arc<AppState>,
) -> axum::Server<AddrIncoming, IntoMakeService<Router>> {
    let addr = config.to_socket_address();
    let app = SuiVerifyRouter::from(app_state).into_router();
    axum::Server::bind(&addr).serve(app.into_make_service())
}
