//! Login throttling middleware.

use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use folio_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;

use crate::middleware::error::retry_after_secs;
use crate::observability::RequestId;
use crate::state::AppState;

/// Rejects requests over the per-address budget of `AppState::login_limiter`.
/// Without a limiter configured every request passes through.
pub struct RateLimitMiddleware;

/// Budget key: the socket peer's IP. Forwarding headers are client-controlled
/// and never used here.
fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService { service }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let limiter = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| state.login_limiter.clone());

        if let Some(limiter) = limiter {
            let key = client_key(&req);

            let result = limiter.check(&key);
            if !result.allowed {
                tracing::warn!(client = %key, "Login rate limit exceeded");

                let secs = retry_after_secs(result.retry_after);
                let mut error = ErrorResponse::too_many_requests(secs);
                if let Some(id) = req.extensions().get::<RequestId>() {
                    error = error.with_request_id(id.as_str());
                }

                let response = HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", secs.to_string()))
                    .json(error);

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
