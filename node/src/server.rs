//! Metrics HTTP endpoint.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use prometheus::{Encoder, TextEncoder};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use usechain_config::METRIC_NAMESPACE;
use usechain_monitoring::{
    into_families, scrape, CollectError, MetricSample, NamedCollector, ScrapeDescriptors,
};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("collection failed: {0}")]
    Collect(#[from] CollectError),

    #[error("encoding failed: {0}")]
    Encode(#[from] prometheus::Error),
}

/// Serves the enabled collectors at `metrics_path`.
pub struct Exporter {
    collectors: Vec<NamedCollector>,
    meta: ScrapeDescriptors,
    metrics_path: String,
    // one collection cycle at a time against the node
    cycle: Mutex<()>,
}

impl Exporter {
    pub fn new(collectors: Vec<NamedCollector>, metrics_path: &str) -> Result<Self, ServerError> {
        Ok(Self {
            collectors,
            meta: ScrapeDescriptors::new(METRIC_NAMESPACE)?,
            metrics_path: metrics_path.to_string(),
            cycle: Mutex::new(()),
        })
    }

    pub fn metrics_path(&self) -> &str {
        &self.metrics_path
    }

    /// Runs one scrape and encodes it in the text exposition format.
    pub async fn render(&self) -> Result<Vec<u8>, ServerError> {
        let mut samples: Vec<MetricSample> = Vec::new();
        {
            let _cycle = self.cycle.lock().await;
            scrape(&self.collectors, &self.meta, &mut samples).await?;
        }

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&into_families(&samples), &mut buffer)?;
        Ok(buffer)
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        debug!(method = %req.method(), path = req.uri().path(), "http request");

        let path = req.uri().path();
        if path != self.metrics_path && path != "/" {
            return plain(StatusCode::NOT_FOUND, "404 page not found\n");
        }
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return plain(StatusCode::METHOD_NOT_ALLOWED, "method not allowed\n");
        }
        if path != self.metrics_path {
            return self.landing_page();
        }

        match self.render().await {
            Ok(buffer) => {
                let mut response = Response::new(Body::from(buffer));
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(prometheus::TEXT_FORMAT));
                response
            }
            Err(err) => {
                error!(error = %err, "scrape failed");
                plain(StatusCode::INTERNAL_SERVER_ERROR, format!("{err}\n"))
            }
        }
    }

    fn landing_page(&self) -> Response<Body> {
        let html = format!(
            "<html>\n<head><title>Usechain Exporter</title></head>\n<body>\n\
             <h1>Usechain Exporter</h1>\n<p><a href=\"{path}\">Metrics</a></p>\n\
             </body>\n</html>\n",
            path = self.metrics_path
        );
        let mut response = Response::new(Body::from(html));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        response
    }
}

fn plain(status: StatusCode, body: impl Into<Body>) -> Response<Body> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

/// Binds `addr` and returns the bound address with the server future, which
/// completes once `shutdown` resolves and in-flight requests finish.
pub fn bind<F>(
    exporter: Arc<Exporter>,
    addr: SocketAddr,
    shutdown: F,
) -> Result<(SocketAddr, impl Future<Output = Result<(), hyper::Error>>), hyper::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let make_service = make_service_fn(move |_conn| {
        let exporter = exporter.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let exporter = exporter.clone();
                async move { Ok::<_, Infallible>(exporter.handle(req).await) }
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_service);
    let local_addr = server.local_addr();
    info!(address = %local_addr, "metrics server listening");
    Ok((local_addr, server.with_graceful_shutdown(shutdown)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::TcpListener;
    use usechain_monitoring::{
        CollectResult, Collector, MetricDescriptor, MetricKind, MetricSink,
    };
    use usechain_rpc_client::RpcError;

    struct Height(f64);

    #[async_trait]
    impl Collector for Height {
        async fn update(&self, sink: &mut dyn MetricSink) -> CollectResult<()> {
            let desc = Arc::new(MetricDescriptor::new(
                "usechain_height",
                "usechain_exporter: Current block height.",
            )?);
            sink.emit(MetricSample::new(desc, MetricKind::Gauge, self.0))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Collector for Unreachable {
        async fn update(&self, _sink: &mut dyn MetricSink) -> CollectResult<()> {
            Err(CollectError::HeadHeight(RpcError::request_failed("connection refused")))
        }
    }

    fn exporter(collector: impl Collector + 'static) -> Exporter {
        let collectors = vec![NamedCollector {
            name: "block".to_string(),
            collector: Box::new(collector),
        }];
        Exporter::new(collectors, "/metrics").unwrap()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn metrics_path_returns_text_format() {
        let response = exporter(Height(1_234.0)).handle(get("/metrics")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], prometheus::TEXT_FORMAT);
        let body = body_text(response).await;
        assert!(body.contains("# HELP usechain_height usechain_exporter: Current block height."));
        assert!(body.contains("# TYPE usechain_height gauge"));
        assert!(body.contains("usechain_height 1234"));
        assert!(body.contains("usechain_scrape_collector_success{collector=\"block\"} 1"));
    }

    #[tokio::test]
    async fn failed_collector_still_answers() {
        let response = exporter(Unreachable).handle(get("/metrics")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(!body.contains("usechain_height"));
        assert!(body.contains("usechain_scrape_collector_success{collector=\"block\"} 0"));
    }

    #[tokio::test]
    async fn landing_page_links_metrics() {
        let response = exporter(Height(1.0)).handle(get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("href=\"/metrics\""));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = exporter(Height(1.0)).handle(get("/debug/vars")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let response = exporter(Height(1.0)).handle(request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn serves_over_tcp_until_shutdown() {
        if TcpListener::bind("127.0.0.1:0").is_err() {
            return;
        }
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let (addr, server) = bind(
            Arc::new(exporter(Height(42.0))),
            "127.0.0.1:0".parse().unwrap(),
            async {
                let _ = stop_rx.await;
            },
        )
        .unwrap();
        let handle = tokio::spawn(server);

        let uri: hyper::Uri = format!("http://{addr}/metrics").parse().unwrap();
        let response = hyper::Client::new().get(uri).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("usechain_height 42"));

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
