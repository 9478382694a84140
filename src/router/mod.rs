//! Request routing — a declarative table from `(method, path shape)` to handlers.
//!
//! A request path is decomposed into a *route family* (the first segment) and
//! an optional *parameter* (the second segment):
//!
//! | Pattern          | Example match    | Captured params       |
//! |------------------|------------------|-----------------------|
//! | `/`              | `/`              | *(none)*              |
//! | `/user-agent`    | `/user-agent`    | *(none)*              |
//! | `/echo/:value`   | `/echo/abc`      | `value → "abc"`       |
//! | `/files/:name`   | `/files/foo.txt` | `name → "foo.txt"`    |
//!
//! Paths with more than two segments after the leading `/` never reach the
//! table; they are answered with `400 Bad Request`. Anything the table does
//! not match is answered with `404 Not Found`.
//!
//! Routes are matched in registration order; the first route whose method and
//! pattern both match wins.

use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::context::{Context, Parameters};
use crate::storage::StaticFiles;
use crate::{Method, Request, Response, StatusCode};

pub mod handlers;

/// Type-erased, heap-allocated async handler that processes a [`Context`] and returns a
/// [`Response`].
pub type Handler =
    Arc<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait through the blanket impl below.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(ctx))
    }
}

/// What the connection loop does after writing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Go back to reading the next request on the same connection.
    KeepAlive,
    /// Close the connection.
    Close,
}

/// The router's answer to one request.
#[derive(Debug)]
pub struct Routed {
    pub response: Response,
    pub disposition: Disposition,
}

/// A request path split into route family and parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Exactly `/`.
    Root,
    Family {
        name: &'a str,
        param: Option<&'a str>,
    },
}

/// Returned by [`Target::decompose`] when the path has more than two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooManySegments;

impl<'a> Target<'a> {
    /// Splits `path` on `/`, dropping the empty segment before the leading slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use tcp_http::router::{Target, TooManySegments};
    ///
    /// assert_eq!(Target::decompose("/"), Ok(Target::Root));
    /// assert_eq!(
    ///     Target::decompose("/echo/abc"),
    ///     Ok(Target::Family { name: "echo", param: Some("abc") })
    /// );
    /// assert_eq!(Target::decompose("/a/b/c"), Err(TooManySegments));
    /// ```
    pub fn decompose(path: &'a str) -> Result<Self, TooManySegments> {
        if path == "/" {
            return Ok(Target::Root);
        }

        let mut segments = path.strip_prefix('/').unwrap_or(path).split('/');
        let name = segments.next().unwrap_or_default();
        let param = segments.next();
        if segments.next().is_some() {
            return Err(TooManySegments);
        }

        Ok(Target::Family { name, param })
    }
}

// Compiled representation of a route pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Root,
    // `param` names the capture for the second segment, e.g. `value` in `/echo/:value`.
    Family { name: String, param: Option<String> },
}

impl Pattern {
    /// Parse a route pattern string such as `"/"`, `"/user-agent"` or `"/files/:name"`.
    fn parse(pattern: &str) -> Self {
        if pattern == "/" {
            return Pattern::Root;
        }

        let mut segments = pattern.trim_start_matches('/').splitn(2, '/');
        let name = segments.next().unwrap_or_default().to_owned();
        let param = segments
            .next()
            .map(|s| s.strip_prefix(':').unwrap_or(s).to_owned());

        Pattern::Family { name, param }
    }

    // A pattern without a capture ignores any second segment.
    fn matches(&self, target: Target<'_>) -> Option<Parameters> {
        match (self, target) {
            (Pattern::Root, Target::Root) => Some(Parameters::new()),
            (
                Pattern::Family { name, param },
                Target::Family {
                    name: seg,
                    param: value,
                },
            ) if name == seg => match (param, value) {
                (None, _) => Some(Parameters::new()),
                (Some(key), Some(value)) => {
                    let mut params = Parameters::new();
                    params.insert(key.as_str(), value);
                    Some(params)
                }
                (Some(_), None) => None,
            },
            _ => None,
        }
    }
}

// A single registered route binding a method filter + pattern to a handler.
struct Route {
    // `None` matches every method.
    method: Option<Method>,
    pattern: Pattern,
    disposition: Disposition,
    handler: Handler,
}

impl Route {
    fn matches(&self, method: &Method, target: Target<'_>) -> Option<Parameters> {
        match &self.method {
            Some(m) if m != method => None,
            _ => self.pattern.matches(target),
        }
    }
}

/// Returned by the registration methods to adjust the route just added.
pub struct RouteOptions<'a> {
    route: &'a mut Route,
}

impl RouteOptions<'_> {
    /// Keep the connection open after a successful response from this route.
    pub fn keep_alive(self) {
        self.route.disposition = Disposition::KeepAlive;
    }
}

/// Dispatches decoded requests to registered handlers.
///
/// Routes close the connection after responding unless registered with
/// [`RouteOptions::keep_alive`]. Even then the connection closes when the
/// handler answers with a non-2xx status or the client sent
/// `Connection: close`.
///
/// # Examples
///
/// ```rust,no_run
/// use tcp_http::{Response, Router, StatusCode};
/// use tcp_http::context::Context;
/// use tcp_http::storage::StaticFiles;
///
/// let mut router = Router::new(StaticFiles::unconfigured());
/// router.get("/ping", |_ctx| async { Response::new(StatusCode::Ok) });
/// router.any("/echo/:value", |ctx: Context| async move {
///     Response::new(StatusCode::Ok).body(ctx.param("value").to_owned())
/// }).keep_alive();
/// ```
pub struct Router {
    routes: Vec<Route>,
    files: Arc<StaticFiles>,
}

impl Router {
    /// Create a router with no routes, serving files from `files`.
    pub fn new(files: StaticFiles) -> Self {
        Self {
            routes: Vec::new(),
            files: Arc::new(files),
        }
    }

    /// Create the router for the server's fixed route table.
    ///
    /// | Path             | Method | Handler                    |
    /// |------------------|--------|----------------------------|
    /// | `/`              | any    | [`handlers::root`]         |
    /// | `/echo/:value`   | any    | [`handlers::echo`]         |
    /// | `/user-agent`    | any    | [`handlers::user_agent`]   |
    /// | `/files/:name`   | GET    | [`handlers::read_file`]    |
    /// | `/files/:name`   | POST   | [`handlers::write_file`]   |
    pub fn builtin(files: StaticFiles) -> Self {
        let mut router = Self::new(files);
        router.any("/", handlers::root);
        router.any("/echo/:value", handlers::echo).keep_alive();
        router.any("/user-agent", handlers::user_agent).keep_alive();
        router.get("/files/:name", handlers::read_file);
        router.post("/files/:name", handlers::write_file);
        router
    }

    /// Register a handler for `GET` requests matching `path`.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) -> RouteOptions<'_> {
        self.add_route(Some(Method::Get), path, handler)
    }

    /// Register a handler for `POST` requests matching `path`.
    pub fn post(&mut self, path: &str, handler: impl IntoHandler) -> RouteOptions<'_> {
        self.add_route(Some(Method::Post), path, handler)
    }

    /// Register a handler for requests of any method matching `path`.
    pub fn any(&mut self, path: &str, handler: impl IntoHandler) -> RouteOptions<'_> {
        self.add_route(None, path, handler)
    }

    // Erase the concrete handler type and store it as a `Handler` trait object.
    fn add_route(
        &mut self,
        method: Option<Method>,
        path: &str,
        handler: impl IntoHandler,
    ) -> RouteOptions<'_> {
        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(path),
            disposition: Disposition::Close,
            handler,
        });
        let last = self.routes.len() - 1;
        RouteOptions {
            route: &mut self.routes[last],
        }
    }

    /// Return the number of routes registered in this router.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` if no routes have been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch `request` to the first matching route.
    ///
    /// The response always carries the request's protocol version.
    pub async fn route(&self, request: Request) -> Routed {
        let protocol = request.protocol().to_owned();
        let client_close = request.wants_close();

        let (response, disposition) = match Target::decompose(request.path()) {
            Err(TooManySegments) => {
                debug!(path = %request.path(), "too many path segments");
                (Response::new(StatusCode::BadRequest), Disposition::Close)
            }
            Ok(target) => {
                let matched = self.routes.iter().find_map(|route| {
                    route
                        .matches(request.method(), target)
                        .map(|params| (route, params))
                });

                match matched {
                    Some((route, params)) => {
                        let ctx = Context::new(request, params, Arc::clone(&self.files));
                        let response = (route.handler)(ctx).await;
                        (response, route.disposition)
                    }
                    None => (Response::new(StatusCode::NotFound), Disposition::Close),
                }
            }
        };

        let disposition = if client_close || !response.status().is_success() {
            Disposition::Close
        } else {
            disposition
        };

        Routed {
            response: response.protocol(protocol),
            disposition,
        }
    }
}
