use actix_web::{http::header::ContentType, web, HttpResponse, Responder};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const STYLE_CSS: &str = include_str!("../../static/css/style.css");
const SCRIPT_JS: &str = include_str!("../../static/js/script.js");

/// Configure the web page and its assets
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(index))
        .route("/static/css/style.css", web::get().to(style))
        .route("/static/js/script.js", web::get().to(script));
}

async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

async fn style() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .body(STYLE_CSS)
}

async fn script() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(SCRIPT_JS)
}
