pub mod health;
pub mod links;
pub mod redirect;

pub use health::{HealthService, health_routes};
pub use links::{CreateLinkRequest, CreateLinkResponse, LinkApiService, LinkStatsResponse, link_routes};
pub use redirect::{RedirectService, redirect_routes};

use actix_web::web;

/// 注册全部路由
///
/// 重定向的通配路由必须最后注册，否则会吞掉 `/health` 和 `/api/...`。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").service(health_routes()))
        .service(web::scope("/api/v1/links").service(link_routes()))
        .service(redirect_routes());
}
