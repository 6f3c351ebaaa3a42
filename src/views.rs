//! Maud templates for the directory, file and error pages.

use std::time::SystemTime;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::prelude::*;
use humansize::{format_size, BINARY};
use maud::{html, Markup, DOCTYPE};

use crate::{
    listing::Entry,
    render::{FileKind, FileView},
    repo_info::RepoInfo,
};

const HIGHLIGHT_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0";

/// One step of the navigation trail above the main view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

/// Splits `request_path` on `/` into crumbs, starting with the root crumb.
pub fn breadcrumbs(request_path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        name: "root".to_string(),
        path: String::new(),
    }];
    let mut prefix = String::new();
    for part in request_path.split('/').filter(|p| !p.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(part);
        crumbs.push(Breadcrumb {
            name: part.to_string(),
            path: prefix.clone(),
        });
    }
    crumbs
}

/// Browser link for a root-relative path, each segment percent-encoded.
pub fn href(path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|p| !p.is_empty())
        .map(|p| urlencoding::encode(p).into_owned())
        .collect();
    format!("/{}", encoded.join("/"))
}

fn size_string(size: u64) -> String {
    format_size(size, BINARY)
}

fn modified_string(modified: Option<SystemTime>) -> String {
    modified
        .map(|time| {
            let datetime: DateTime<Local> = time.into();
            datetime.format("%Y-%m-%d %H:%M").to_string()
        })
        .unwrap_or_default()
}

/// Everything a full page needs besides its main content.
pub struct Page<'a> {
    pub title: &'a str,
    pub current: &'a str,
    pub crumbs: &'a [Breadcrumb],
    pub sidebar: &'a Entry,
    pub repo: &'a RepoInfo,
}

fn layout(page: &Page<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page.title) " · dotview" }
                link rel="stylesheet" href="/_assets/styles.css";
                link rel="stylesheet" href={ (HIGHLIGHT_JS) "/styles/github.min.css" };
                script src={ (HIGHLIGHT_JS) "/highlight.min.js" } defer {}
                script src="/_assets/tree.js" defer {}
            }
            body {
                header #top {
                    a .brand href="/" { "dotview" }
                    @if !page.repo.branch.is_empty() {
                        span .repo-meta { "branch " code { (page.repo.branch) } }
                    }
                    @if !page.repo.commit.is_empty() {
                        span .repo-meta { "commit " code { (page.repo.commit) } }
                    }
                }
                nav #crumbs {
                    @for (i, crumb) in page.crumbs.iter().enumerate() {
                        @if i > 0 { span .sep { "/" } }
                        a href=(href(&crumb.path)) { (crumb.name) }
                    }
                }
                div #layout {
                    aside #sidebar {
                        ul .tree { (tree_items(&page.sidebar.children, page.current)) }
                    }
                    main #content { (content) }
                }
            }
        }
    }
}

/// Sidebar items. Collapsed directories carry `data-path` so the client can
/// fetch their children from `/api/tree`.
fn tree_items(entries: &[Entry], current: &str) -> Markup {
    html! {
        @for entry in entries {
            @let is_current = entry.path == current;
            @if entry.is_dir {
                li .dir.current[is_current] {
                    details open[entry.expanded]
                        data-path=(entry.path)
                        data-loaded=(if entry.expanded { "true" } else { "false" }) {
                        summary { a href=(href(&entry.path)) { (entry.display_name()) } }
                        ul { (tree_items(&entry.children, current)) }
                    }
                }
            } @else {
                li .file.current[is_current] {
                    a href=(href(&entry.path)) { (entry.name) }
                }
            }
        }
    }
}

/// Fully expanded listing for the main pane.
fn listing_rows(entries: &[Entry]) -> Markup {
    html! {
        @for entry in entries {
            li .dir[entry.is_dir] .file[!entry.is_dir] {
                div .entry {
                    span .icon { @if entry.is_dir { "📁" } @else { "📄" } }
                    a href=(href(&entry.path)) { (entry.display_name()) }
                    span .file-info {
                        @if !entry.is_dir { span { (size_string(entry.size)) " " } }
                        span { (modified_string(entry.modified)) }
                    }
                }
                @if !entry.children.is_empty() {
                    ul { (listing_rows(&entry.children)) }
                }
            }
        }
    }
}

pub fn directory_page(page: &Page<'_>, tree: &Entry) -> Markup {
    layout(
        page,
        html! {
            h2 { (tree.display_name()) }
            @if tree.children.is_empty() {
                p .empty { "Empty directory." }
            } @else {
                ul #file-list { (listing_rows(&tree.children)) }
            }
        },
    )
}

pub fn file_page(page: &Page<'_>, file: &FileView) -> Markup {
    layout(
        page,
        html! {
            div .file-header {
                h2 { (file.name) }
                div .file-meta {
                    span { (file.language) }
                    span { (size_string(file.size)) }
                    @if file.kind == FileKind::Text {
                        span { (file.line_count) " lines" }
                    }
                }
            }
            @match &file.kind {
                FileKind::Text => {
                    pre { code class={ "language-" (file.language) } { (file.content) } }
                },
                _ => {
                    p .placeholder { (file.content) }
                }
            }
        },
    )
}

/// Helper to generate consistent Maud-based error responses.
pub fn error_response(status_code: StatusCode, message: &str) -> Response {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Error · dotview" }
                link rel="stylesheet" href="/_assets/styles.css";
            }
            body {
                div .error {
                    h2 { (status_code.as_u16()) " " (status_code.canonical_reason().unwrap_or("Error")) }
                    p { (message) }
                    a href="/" { "Back to root" }
                }
            }
        }
    };
    (status_code, markup).into_response()
}
