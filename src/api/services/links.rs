//! Link creation and stats endpoints

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::AppState;
use crate::errors::ShortenerError;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    pub long_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub short_code: String,
    pub long_url: String,
    pub full_short_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkStatsResponse {
    pub short_code: String,
    pub long_url: String,
    pub total_clicks: u64,
}

pub struct LinkApiService;

impl LinkApiService {
    pub async fn create_link(
        state: web::Data<AppState>,
        body: web::Json<CreateLinkRequest>,
    ) -> Result<HttpResponse, ShortenerError> {
        let link = state.link_service.create_link(&body.long_url).await?;
        debug!("API: created {} -> {}", link.shortcode, link.long_url);

        Ok(HttpResponse::Created().json(CreateLinkResponse {
            full_short_url: state.full_short_url(&link.shortcode),
            short_code: link.shortcode,
            long_url: link.long_url,
        }))
    }

    pub async fn link_stats(
        state: web::Data<AppState>,
        path: web::Path<String>,
    ) -> Result<HttpResponse, ShortenerError> {
        let code = path.into_inner();
        let stats = state.link_service.get_link_stats(&code).await?;

        Ok(HttpResponse::Ok().json(LinkStatsResponse {
            short_code: stats.link.shortcode,
            long_url: stats.link.long_url,
            total_clicks: stats.total_clicks,
        }))
    }
}

pub fn link_routes() -> actix_web::Scope {
    // 请求体解析失败也返回统一的 JSON 错误
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        ShortenerError::invalid_input(format!("Invalid request body: {}", err)).into()
    });

    web::scope("")
        .app_data(json_config)
        .route("", web::post().to(LinkApiService::create_link))
        .route("/{code}/stats", web::get().to(LinkApiService::link_stats))
}
