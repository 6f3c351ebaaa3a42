use std::sync::Arc;

use axum::{
    extract::{Path as AxumPath, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::Config,
    error::{ApiError, BrowseError, Result},
    listing::{list_dir, Entry, EntryRecord},
    render::{render_file, FileView},
    repo_info::RepoInfo,
    resolve::{normalize, resolve},
    tree::{build_tree, Expansion},
    views::{self, breadcrumbs, Page},
};

// --- State ---
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> SharedState {
        Arc::new(Self { config })
    }
}

/// Directory holding the stylesheet and sidebar script, relative to the
/// working directory.
const ASSETS_DIR: &str = "static";

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/api/tree", get(api_tree_root))
        .route("/api/tree/*dirpath", get(api_tree))
        .nest_service("/_assets", ServeDir::new(ASSETS_DIR))
        // Every other path is a repository path.
        .fallback(browse_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Result of the blocking part of a browse request.
enum Rendered {
    Directory { current: String, sidebar: Entry, tree: Entry },
    File { current: String, sidebar: Entry, file: FileView },
}

/// Resolves `request_path` and builds the sidebar plus the main view.
fn render_path(config: &Config, request_path: &str) -> Result<Rendered> {
    let root = &config.repo_root;
    let target = resolve(root, request_path)?;
    // Crumbs and sidebar follow the path as requested, not where symlinks lead.
    let current = normalize(request_path)?;
    let sidebar = build_tree(root, root, Expansion::AlongPath(&current))?;

    if target.is_dir() {
        let tree = build_tree(root, &target, Expansion::Full)?;
        Ok(Rendered::Directory {
            current,
            sidebar,
            tree,
        })
    } else {
        let file = render_file(&target);
        Ok(Rendered::File {
            current,
            sidebar,
            file,
        })
    }
}

/// Renders the directory or file view for the request URI.
async fn browse_handler(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
) -> Result<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Ok(views::error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Only GET is supported.",
        ));
    }

    let raw = uri.path().trim_matches('/');
    let request_path = urlencoding::decode(raw)
        .map_err(|_| BrowseError::NotFound(raw.to_string()))?
        .into_owned();

    let blocking_state = Arc::clone(&state);
    let rendered =
        tokio::task::spawn_blocking(move || render_path(&blocking_state.config, &request_path))
            .await??;
    let repo = RepoInfo::lookup(&state.config.repo_root).await;

    let markup = match &rendered {
        Rendered::Directory {
            current,
            sidebar,
            tree,
        } => {
            let crumbs = breadcrumbs(current);
            let page = Page {
                title: if current.is_empty() { "root" } else { current.as_str() },
                current,
                crumbs: &crumbs,
                sidebar,
                repo: &repo,
            };
            views::directory_page(&page, tree)
        }
        Rendered::File {
            current,
            sidebar,
            file,
        } => {
            let crumbs = breadcrumbs(current);
            let page = Page {
                title: &file.name,
                current,
                crumbs: &crumbs,
                sidebar,
                repo: &repo,
            };
            views::file_page(&page, file)
        }
    };
    Ok(markup.into_response())
}

/// One level of `request_path` as API records.
fn list_records(config: &Config, request_path: &str) -> Result<Vec<EntryRecord>> {
    let root = &config.repo_root;
    let dir = resolve(root, request_path)?;
    let entries = list_dir(root, &dir)?;
    Ok(entries.iter().map(EntryRecord::from).collect())
}

async fn api_listing(
    state: SharedState,
    request_path: String,
) -> std::result::Result<Json<Vec<EntryRecord>>, ApiError> {
    info!("Listing requested for '{}'", request_path);
    let records =
        tokio::task::spawn_blocking(move || list_records(&state.config, &request_path))
            .await
            .map_err(BrowseError::from)??;
    Ok(Json(records))
}

async fn api_tree_root(
    State(state): State<SharedState>,
) -> std::result::Result<Json<Vec<EntryRecord>>, ApiError> {
    api_listing(state, String::new()).await
}

async fn api_tree(
    State(state): State<SharedState>,
    AxumPath(dirpath): AxumPath<String>,
) -> std::result::Result<Json<Vec<EntryRecord>>, ApiError> {
    api_listing(state, dirpath.trim_matches('/').to_string()).await
}
