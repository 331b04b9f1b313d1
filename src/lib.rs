use std::sync::Arc;

use poem::{
    endpoint::StaticFilesEndpoint,
    middleware::{AddData, AddDataEndpoint, Cors, CorsEndpoint, Tracing, TracingEndpoint},
    EndpointExt, Route,
};
use poem_openapi::OpenApiService;
use route::user::ApiUser;
use settings::Config;

use crate::{
    core::blob::{BlobStore, UPLOADS_PATH},
    repository::user::UserRepository,
};

pub mod cli;
pub mod client;
pub mod core;
pub mod factory;
pub mod model;
pub mod repository;
pub mod route;
pub mod schema;
pub mod settings;

pub struct AppState {
    pub db: Arc<dyn UserRepository>,
    pub blobs: BlobStore,
}

pub fn init_openapi_route(
    app_state: Arc<AppState>,
    config: &Config,
) -> TracingEndpoint<CorsEndpoint<AddDataEndpoint<Route, Arc<AppState>>>> {
    let prefix = config.api_prefix();
    let openapi_route =
        OpenApiService::new(ApiUser, "User Directory", "1.0").server(prefix.clone());
    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    let uploads = StaticFilesEndpoint::new(app_state.blobs.root());
    Route::new()
        .nest(prefix, openapi_route)
        .nest(UPLOADS_PATH, uploads)
        .nest("/docs", ui)
        .at("openapi.json", openapi_json_endpoint)
        .with(AddData::new(app_state))
        .with(Cors::new())
        .with(Tracing)
}
