/* src/middleware.rs */

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request},
    http::{Extensions, HeaderMap, request::Parts},
    response::Response,
};
use futures_util::future::BoxFuture;
use std::{
    convert::Infallible,
    fmt,
    net::SocketAddr,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::resolver::ClientIpResolver;

/// Request extension holding the resolved client address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    /// The resolved address, ready for an event's `sourceIp` field.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve from a header map and the connection info stored in `extensions`.
    pub fn resolve(
        resolver: &ClientIpResolver,
        headers: &HeaderMap,
        extensions: &Extensions,
    ) -> Self {
        let peer = peer_addr(extensions);
        ClientIp(resolver.resolve(headers, peer.as_deref()))
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ClientIp> for String {
    fn from(ip: ClientIp) -> Self {
        ip.0
    }
}

/// Peer address recorded by `into_make_service_with_connect_info`.
fn peer_addr(extensions: &Extensions) -> Option<String> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string())
}

/// Layer that resolves the client address once per request.
///
/// The result is stored as a [`ClientIp`] request extension that handlers can
/// take as an extractor.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use origin_ip::{ClientIp, ClientIpLayer};
///
/// async fn handler(ip: ClientIp) -> String {
///     ip.to_string()
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(ClientIpLayer::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientIpLayer {
    resolver: ClientIpResolver,
}

impl ClientIpLayer {
    /// Create a layer using the default header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer with a custom resolver configuration.
    pub fn with_resolver(resolver: ClientIpResolver) -> Self {
        Self { resolver }
    }
}

impl<S> Layer<S> for ClientIpLayer {
    type Service = ClientIpService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientIpService {
            inner,
            resolver: self.resolver.clone(),
        }
    }
}

/// Service that attaches a [`ClientIp`] to each request.
#[derive(Debug, Clone)]
pub struct ClientIpService<S> {
    inner: S,
    resolver: ClientIpResolver,
}

impl<S> Service<Request> for ClientIpService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let client_ip = ClientIp::resolve(&self.resolver, req.headers(), req.extensions());
        req.extensions_mut().insert(client_ip);

        let future = self.inner.call(req);
        Box::pin(future)
    }
}

/// Uses the extension set by [`ClientIpLayer`]; without the layer the
/// address is resolved on the spot with the default header list.
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(client_ip) = parts.extensions.get::<ClientIp>() {
            return Ok(client_ip.clone());
        }
        Ok(ClientIp::resolve(
            &ClientIpResolver::default(),
            &parts.headers,
            &parts.extensions,
        ))
    }
}
