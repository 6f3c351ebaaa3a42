/*!
 * dotview - read-only web browser for a single local source repository
 *
 * Request paths are confined to the repository root, directories are shown
 * as trees (fully expanded in the main view, expanded along the current path
 * in the sidebar) and files are shown with a highlight.js language tag.
 */

pub mod config;
pub mod error;
pub mod language;
pub mod listing;
pub mod render;
pub mod repo_info;
pub mod resolve;
pub mod routes;
pub mod tree;
pub mod views;

pub use config::{Args, Config};
pub use error::{ApiError, BrowseError};
pub use listing::{list_dir, Entry, EntryRecord};
pub use render::{render_file, FileKind, FileView};
pub use resolve::resolve;
pub use routes::{router, AppState, SharedState};
pub use tree::{build_tree, Expansion};
