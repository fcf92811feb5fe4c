//! HTTP front end serving rendered dependency graphs
//!
//! `GET /` answers with the overview graph, `GET /?mod=<module>` with the
//! neighborhood of one module. The rendered SVG links every module back to
//! this route, which makes the graph browsable. Adding `png` to the query
//! asks for a PNG instead.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::cli::ImageFormat;
use crate::constants::server::{PNG_CONTENT_TYPE, SVG_CONTENT_TYPE};
use crate::error::GomodGraphError;
use crate::graph::{DependencyGraph, GraphRenderer, LayoutEngine};

#[derive(Clone)]
pub struct ServerState {
    graph: Arc<DependencyGraph>,
    renderer: Arc<GraphRenderer>,
    engine: Arc<dyn LayoutEngine>,
}

impl ServerState {
    pub fn new(
        graph: DependencyGraph,
        renderer: GraphRenderer,
        engine: Arc<dyn LayoutEngine>,
    ) -> Self {
        Self {
            graph: Arc::new(graph),
            renderer: Arc::new(renderer),
            engine,
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQuery {
    #[serde(rename = "mod")]
    pub module: Option<String>,
    /// Present, with any value, to request PNG output
    pub png: Option<String>,
}

impl GraphQuery {
    fn format(&self) -> ImageFormat {
        if self.png.is_some() {
            ImageFormat::Png
        } else {
            ImageFormat::Svg
        }
    }
}

/// Fully buffered answer to one graph request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphReply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl GraphReply {
    fn image(format: ImageFormat, body: Vec<u8>) -> Self {
        let content_type = match format {
            ImageFormat::Png => PNG_CONTENT_TYPE,
            _ => SVG_CONTENT_TYPE,
        };
        Self {
            status: StatusCode::OK,
            content_type,
            body,
        }
    }

    fn text(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: message.into().into_bytes(),
        }
    }
}

impl IntoResponse for GraphReply {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Render the graph a query asks for
///
/// Blocks while the layout engine runs.
pub fn handle_graph_request(state: &ServerState, query: &GraphQuery) -> GraphReply {
    let format = query.format();

    let rendered = match query.module.as_deref().filter(|name| !name.is_empty()) {
        None => {
            info!("Serving overview graph");
            state
                .renderer
                .render(&state.graph, format, state.engine.as_ref())
        }
        Some(name) => {
            let Some(center) = state.graph.resolve(name, state.renderer.registry_prefix()) else {
                return GraphReply::text(
                    StatusCode::BAD_REQUEST,
                    format!("\"{name}\" is not a known module."),
                );
            };

            info!(module = name, "Serving graph for module");
            let neighborhood = state.graph.subgraph_from(center);
            state
                .renderer
                .render(&neighborhood, format, state.engine.as_ref())
        }
    };

    match rendered {
        Ok(body) => GraphReply::image(format, body),
        Err(e) => {
            error!(error = ?e, "Failed to serve request");
            GraphReply::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render graph")
        }
    }
}

async fn serve_graph(State(state): State<ServerState>, Query(query): Query<GraphQuery>) -> GraphReply {
    tokio::task::spawn_blocking(move || handle_graph_request(&state, &query))
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Render task failed");
            GraphReply::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render graph")
        })
}

pub fn router(state: ServerState) -> Router {
    Router::new().route("/", get(serve_graph)).with_state(state)
}

/// Serve `state` on localhost until the process is stopped
pub async fn serve(
    state: ServerState,
    port: u16,
    home_module: Option<&str>,
) -> Result<(), GomodGraphError> {
    let addr: SocketAddr = ([127, 0, 0, 1], port).into();
    let listener = TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;

    info!(
        "Serving at http://localhost:{}/?mod={}",
        bound.port(),
        urlencoding::encode(home_module.unwrap_or_default())
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::manifest::{ModuleRecord, Requirement};

    /// Returns the DOT text it was given, prefixed with the format
    #[derive(Default)]
    struct EchoEngine {
        calls: Mutex<Vec<ImageFormat>>,
    }

    impl LayoutEngine for EchoEngine {
        fn layout(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>, GomodGraphError> {
            self.calls.lock().unwrap().push(format);
            Ok(format!("{format}:{dot}").into_bytes())
        }
    }

    struct FailingEngine;

    impl LayoutEngine for FailingEngine {
        fn layout(&self, _dot: &str, _format: ImageFormat) -> Result<Vec<u8>, GomodGraphError> {
            Err(GomodGraphError::RenderError {
                message: "syntax error in line 1".to_string(),
            })
        }
    }

    fn state(engine: Arc<dyn LayoutEngine>) -> ServerState {
        let graph = DependencyGraph::build(&[
            ModuleRecord::new("gitlab.example.com/team/a")
                .with_requirement(Requirement::new("gitlab.example.com/team/b", "v1.0.0")),
            ModuleRecord::new("gitlab.example.com/team/b")
                .with_requirement(Requirement::new("gitlab.example.com/team/c", "v0.1.0")),
            ModuleRecord::new("gitlab.example.com/team/c"),
            ModuleRecord::new("gitlab.example.com/team/d"),
        ]);
        ServerState::new(graph, GraphRenderer::new("gitlab.example.com/"), engine)
    }

    fn query(module: Option<&str>, png: bool) -> GraphQuery {
        GraphQuery {
            module: module.map(str::to_string),
            png: png.then(String::new),
        }
    }

    #[test]
    fn test_overview_graph() {
        let reply = handle_graph_request(&state(Arc::new(EchoEngine::default())), &query(None, false));
        let body = String::from_utf8(reply.body).unwrap();

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.content_type, "image/svg+xml");
        assert!(body.starts_with("svg:digraph"));
        assert!(body.contains("team/d"));
    }

    #[test]
    fn test_empty_module_means_overview() {
        let reply =
            handle_graph_request(&state(Arc::new(EchoEngine::default())), &query(Some(""), false));
        assert_eq!(reply.status, StatusCode::OK);
        assert!(String::from_utf8(reply.body).unwrap().contains("team/d"));
    }

    #[test]
    fn test_module_neighborhood() {
        let reply = handle_graph_request(
            &state(Arc::new(EchoEngine::default())),
            &query(Some("gitlab.example.com/team/b"), false),
        );
        let body = String::from_utf8(reply.body).unwrap();

        assert_eq!(reply.status, StatusCode::OK);
        assert!(body.contains("shape=egg"));
        assert!(body.contains("team/a"));
        assert!(body.contains("team/c"));
        assert!(!body.contains("team/d"));
    }

    #[test]
    fn test_module_without_registry_prefix() {
        let reply = handle_graph_request(
            &state(Arc::new(EchoEngine::default())),
            &query(Some("team/b"), false),
        );
        assert_eq!(reply.status, StatusCode::OK);
    }

    #[test]
    fn test_unknown_module_is_bad_request() {
        let reply = handle_graph_request(
            &state(Arc::new(EchoEngine::default())),
            &query(Some("team/nope"), false),
        );

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            String::from_utf8(reply.body).unwrap(),
            "\"team/nope\" is not a known module."
        );
    }

    #[test]
    fn test_png_requested() {
        let engine = Arc::new(EchoEngine::default());
        let reply = handle_graph_request(&state(engine.clone()), &query(None, true));

        assert_eq!(reply.content_type, "image/png");
        assert_eq!(*engine.calls.lock().unwrap(), vec![ImageFormat::Png]);
    }

    #[test]
    fn test_render_failure_is_internal_error() {
        let reply = handle_graph_request(&state(Arc::new(FailingEngine)), &query(None, false));

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.body, b"Failed to render graph");
    }

    #[test]
    fn test_query_string_parsing() {
        let parsed: Query<GraphQuery> =
            Query::try_from_uri(&"/?mod=team%2Fb&png".parse().unwrap()).unwrap();

        assert_eq!(parsed.module.as_deref(), Some("team/b"));
        assert!(parsed.png.is_some());
    }
}
