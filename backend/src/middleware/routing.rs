//! Locale and login page-routing middleware.
//!
//! Applies the page-routing contract to non-API paths:
//!
//! - unprefixed paths 307-redirect once to the default-locale (`en`)
//!   equivalent; already-prefixed paths pass through untouched, so a prefix
//!   is never applied twice;
//! - paths under `/{locale}/app` without a session cookie redirect to
//!   `/{locale}/login?redirect=<original>` preserving the destination.
//!
//! API paths (`/api/...`), the health endpoints, and asset-like paths with a
//! file extension are never redirected.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

const DEFAULT_LOCALE: &str = "en";
const SUPPORTED_LOCALES: [&str; 2] = ["en", "ru"];
const SESSION_COOKIE: &str = "session";

/// Decision taken for one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Routing {
    PassThrough,
    Redirect(String),
}

fn is_exempt(path: &str) -> bool {
    path.starts_with("/api/")
        || path.starts_with("/healthz/")
        || path.starts_with("/docs")
        || path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

fn locale_prefix(path: &str) -> Option<&'static str> {
    SUPPORTED_LOCALES.iter().copied().find(|locale| {
        path.strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(locale))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn encode_redirect_target(path: &str) -> String {
    url::form_urlencoded::byte_serialize(path.as_bytes()).collect()
}

/// Compute the routing decision for a path and session-cookie presence.
fn route(path: &str, has_session: bool) -> Routing {
    if is_exempt(path) {
        return Routing::PassThrough;
    }
    let Some(locale) = locale_prefix(path) else {
        // Prefix exactly once; the redirected request lands in the branch
        // below and is never prefixed again.
        let suffix = if path == "/" { "" } else { path };
        return Routing::Redirect(format!("/{DEFAULT_LOCALE}{suffix}"));
    };
    let after_locale = &path[1 + locale.len()..];
    if (after_locale == "/app" || after_locale.starts_with("/app/")) && !has_session {
        return Routing::Redirect(format!(
            "/{locale}/login?redirect={}",
            encode_redirect_target(path)
        ));
    }
    Routing::PassThrough
}

/// Middleware applying locale prefixes and login redirects to page routes.
#[derive(Clone)]
pub struct PageRouting;

impl<S, B> Transform<S, ServiceRequest> for PageRouting
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = PageRoutingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PageRoutingMiddleware { service }))
    }
}

/// Service wrapper produced by [`PageRouting`].
pub struct PageRoutingMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for PageRoutingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let has_session = req.cookie(SESSION_COOKIE).is_some();
        match route(req.path(), has_session) {
            Routing::Redirect(target) => {
                let (request, _) = req.into_parts();
                let response = HttpResponse::TemporaryRedirect()
                    .insert_header((header::LOCATION, target))
                    .finish()
                    .map_into_right_body();
                Box::pin(ready(Ok(ServiceResponse::new(request, response))))
            }
            Routing::PassThrough => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
        }
    }
}
