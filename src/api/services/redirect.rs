//! Short link redirect
//!
//! The lookup is the only thing on the response path; click recording is a
//! non-blocking enqueue whose failure never affects the redirect.

use actix_web::http::{Method, header};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, trace};

use crate::analytics::{ClickEvent, ClickQueue};
use crate::api::AppState;
use crate::errors::ShortenerError;
use crate::storage::Link;
use crate::utils::is_valid_short_code;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        state: web::Data<AppState>,
        queue: Option<web::Data<ClickQueue>>,
    ) -> Result<HttpResponse, ShortenerError> {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            // 非法短码，不查库
            trace!("Invalid short code rejected: {}", code);
            return Err(ShortenerError::not_found(format!("Link '{}' not found", code)));
        }

        let link = state.link_service.get_link_by_shortcode(&code).await?;

        // HEAD 只做可达性检查，不计点击
        if let Some(queue) = queue
            && req.method() != Method::HEAD
        {
            Self::record_click(&queue, &link, &req);
        }

        debug!("Redirecting {} -> {}", link.shortcode, link.long_url);
        Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, link.long_url))
            .finish())
    }

    /// 入队点击事件，队列满时事件被丢弃（queue 内部已记录 warn）
    fn record_click(queue: &ClickQueue, link: &Link, req: &HttpRequest) {
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        };

        let event = ClickEvent::new(link).with_request_meta(
            header_value(header::REFERER),
            header_value(header::USER_AGENT),
            req.peer_addr().map(|addr| addr.ip().to_string()),
        );

        let _ = queue.enqueue(event);
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
