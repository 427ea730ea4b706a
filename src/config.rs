// src/config.rs
// =============================================================================
// Static defaults and the runtime configuration built from them.
//
// The browser always looks at ONE repository on ONE branch. The defaults
// below point at the HEARTH repository; the CLI can override any of them
// before the config is frozen into a BrowserConfig.
// =============================================================================

use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Repository browsed when `--repo` is not given.
pub const DEFAULT_REPO: &str = "letswastetimee/HEARTH";

/// Branch (git ref) browsed when `--branch` is not given.
pub const DEFAULT_BRANCH: &str = "gh-pages";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

/// GitHub rejects API requests without a User-Agent header.
pub const USER_AGENT: &str = concat!("hearth-browser/", env!("CARGO_PKG_VERSION"));

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How many directory listings the tree builder keeps in flight at once.
pub const LISTING_CONCURRENCY: usize = 8;

/// Infrastructure entries hidden from the tree (exact, case-sensitive names).
///
/// The default repository is a gh-pages site, so its build scaffolding
/// ("src", "public", "docs", "index.html", ...) is hidden along with VCS and
/// package-manager files. Names match at EVERY level the browser lists, so a
/// content folder called "docs" two levels down is hidden too. Use
/// `--no-default-excludes` (optionally with `--exclude`) for repositories
/// where these names hold real content.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".github",
    ".git",
    ".gitignore",
    ".gitattributes",
    "node_modules",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "vite.config.js",
    "tailwind.config.js",
    "postcss.config.js",
    "eslint.config.js",
    "index.html",
    "src",
    "public",
    "dist",
    "docs",
    "target",
    "Cargo.lock",
    "Cargo.toml",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid repository '{0}': expected 'owner/name'")]
    InvalidRepo(String),
    #[error("branch name must not be empty")]
    EmptyBranch,
}

/// Everything the core needs to talk to one repository.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
    pub raw_url: String,
    pub excludes: HashSet<String>,
}

impl BrowserConfig {
    /// Builds a config for `owner/name` on `branch` with the default
    /// endpoints and exclusion set.
    pub fn new(repository: &str, branch: &str) -> Result<Self, ConfigError> {
        let (owner, repo) = parse_repository(repository)?;

        if branch.trim().is_empty() {
            return Err(ConfigError::EmptyBranch);
        }

        Ok(Self {
            owner,
            repo,
            branch: branch.trim().to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn with_endpoints(mut self, api_url: impl Into<String>, raw_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.raw_url = raw_url.into();
        self
    }

    /// Replaces the exclusion set.
    pub fn with_excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds names on top of the current exclusion set.
    pub fn exclude_more<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    /// "owner/name", as shown to the user.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            owner: "letswastetimee".to_string(),
            repo: "HEARTH".to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// Splits "owner/name" into its two parts.
//
// A trailing ".git" is tolerated since people paste clone URLs' tails.
fn parse_repository(repository: &str) -> Result<(String, String), ConfigError> {
    let trimmed = repository.trim().trim_end_matches('/');
    let mut parts = trimmed.split('/');

    let owner = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    let name = name.strip_suffix(".git").unwrap_or(name);

    if owner.is_empty() || name.is_empty() || parts.next().is_some() {
        return Err(ConfigError::InvalidRepo(repository.to_string()));
    }

    Ok((owner.to_string(), name.to_string()))
}
