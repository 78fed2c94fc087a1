/// HTTP middleware utilities for emoji-feed-service
///
/// Provides bearer token authentication and per-route request metrics.
pub mod permissions;

pub use permissions::*;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use crate::auth::JwtVerifier;
use crate::error::AppError;
use crate::metrics::http::{observe_http_request, UNMATCHED_ROUTE};

// =====================================================================
// Authentication
// =====================================================================

/// Authenticated actor, stored in request extensions after auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Actix middleware that validates a Bearer token when one is present.
///
/// Requests without a valid token pass through anonymously; handlers that
/// need an actor take the `ActorId` extractor, which rejects them with 401.
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    verifier: Option<Arc<JwtVerifier>>,
}

impl JwtAuthMiddleware {
    pub fn new(verifier: Option<Arc<JwtVerifier>>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    verifier: Option<Arc<JwtVerifier>>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();

        Box::pin(async move {
            if let Some(actor) = authenticate(&req, verifier.as_deref()) {
                req.extensions_mut().insert(actor);
            }

            service.call(req).await
        })
    }
}

/// Resolve the bearer token, if any, to an actor.
///
/// A missing, malformed or expired token yields `None`; the request then
/// proceeds anonymously and only `ActorId` extraction fails.
fn authenticate(req: &ServiceRequest, verifier: Option<&JwtVerifier>) -> Option<ActorId> {
    let value = req.headers().get(header::AUTHORIZATION)?;

    let Some(token) = value
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
    else {
        tracing::debug!("Ignoring malformed Authorization header");
        return None;
    };

    let Some(verifier) = verifier else {
        tracing::warn!("Bearer token received but no JWT public key is configured");
        return None;
    };

    match verifier.verify(token) {
        Ok(claims) => Some(ActorId(claims.sub)),
        Err(e) => {
            tracing::debug!(error = %e, "Treating request with rejected bearer token as anonymous");
            None
        }
    }
}

impl FromRequest for ActorId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<ActorId>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("Sign in required".to_string()).into()),
        )
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

/// Records `emoji_feed_http_request*` metrics per matched route.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            let (route, status) = match &res {
                Ok(res) => (
                    res.request()
                        .match_pattern()
                        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string()),
                    res.status(),
                ),
                Err(e) => (UNMATCHED_ROUTE.to_string(), e.as_response_error().status_code()),
            };
            observe_http_request(&method, &route, status.as_u16(), elapsed);
            tracing::debug!(
                %method,
                %route,
                status = status.as_u16(),
                elapsed_ms = elapsed.as_millis() as u64,
                "request completed"
            );

            res
        })
    }
}
