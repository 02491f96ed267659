// Route exports
pub mod api;
pub mod docs;
pub mod errors;
pub mod pages;

pub use api::AppState;
pub use errors::{handle_json_payload_error, json_config, JsonError};

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(pages::configure)
        .configure(api::configure)
        .configure(docs::configure);
}
