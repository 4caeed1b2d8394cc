//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! Each request gets a fresh [`TraceId`] held in task-local storage while the
//! handler runs, so domain errors pick it up automatically. The identifier is
//! echoed in the `trace-id` response header and attached to a `request`
//! span for log correlation.
//!
//! Task-locals are not inherited by spawned tasks; wrap such work in
//! [`TraceId::scope`] to carry the identifier along.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory; wrap the app with `.wrap(Trace)`.
///
/// ```
/// use actix_web::App;
/// use bookshelf::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(
            TraceId::scope(trace_id, async move {
                let mut res = fut.await?;
                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(err) => {
                        error!(error = %err, "failed to encode trace identifier header");
                    }
                }
                debug!(
                    status = res.status().as_u16(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "request completed"
                );
                Ok(res)
            })
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::Error as DomainError;

    fn header_of(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace-id header present")
            .to_str()
            .expect("ascii header")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn responses_carry_a_fresh_trace_id() {
        let app = actix_test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let first = actix_test::call_service(&app, actix_test::TestRequest::get().to_request()).await;
        let second =
            actix_test::call_service(&app, actix_test::TestRequest::get().to_request()).await;

        let first_id = header_of(&first);
        assert!(first_id.parse::<TraceId>().is_ok());
        assert_ne!(first_id, header_of(&second));
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_errors_report_the_same_trace_id() {
        let app = actix_test::init_service(App::new().wrap(Trace).route(
            "/fail",
            web::get().to(|| async { Err::<HttpResponse, _>(DomainError::not_found("book not found")) }),
        ))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/fail").to_request(),
        )
        .await;
        let header = header_of(&res);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["traceId"], header.as_str());
    }

    #[rstest]
    #[actix_web::test]
    async fn handlers_observe_the_scoped_id() {
        let app = actix_test::init_service(App::new().wrap(Trace).route(
            "/id",
            web::get().to(|| async {
                let current = TraceId::current().map(|id| id.to_string()).unwrap_or_default();
                HttpResponse::Ok().body(current)
            }),
        ))
        .await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/id").to_request())
                .await;
        let header = header_of(&res);
        let body = actix_test::read_body(res).await;
        assert_eq!(body, header.as_bytes());
    }
}
