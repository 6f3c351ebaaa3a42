use std::{
    io,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use clap::Parser;

// --- Command line / environment ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The repository directory to browse
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "DOTVIEW_REPO_DIR",
        default_value = "/data/repo"
    )]
    pub repo_dir: PathBuf,

    /// The network address to bind to
    #[arg(
        short,
        long,
        value_name = "ADDR",
        env = "DOTVIEW_BIND_ADDR",
        default_value = "127.0.0.1:3000"
    )]
    pub bind_addr: SocketAddr,
}

/// Process-wide, read-only settings shared by every request.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute, canonical repository root. Never changes after startup.
    pub repo_root: PathBuf,
}

impl Config {
    /// Canonicalizes `repo_dir` and checks that it is a directory.
    pub fn new(repo_dir: &Path) -> io::Result<Self> {
        let repo_root = repo_dir.canonicalize()?;
        if !repo_root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a directory", repo_root.display()),
            ));
        }
        Ok(Self { repo_root })
    }

    pub fn from_args(args: &Args) -> io::Result<Self> {
        Self::new(&args.repo_dir)
    }
}
