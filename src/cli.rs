// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - tree:   build the repository tree and print it
// - show:   resolve one path and print its content
// - browse: interactive session, one selection per input line
//
// Repository options (--repo, --branch, ...) are global so they can be given
// before or after the subcommand.
// =============================================================================

use clap::{Args, Parser, Subcommand};

use crate::config::{
    BrowserConfig, ConfigError, DEFAULT_API_URL, DEFAULT_BRANCH, DEFAULT_RAW_URL, DEFAULT_REPO,
};

#[derive(Parser, Debug)]
#[command(
    name = "hearth-browser",
    version,
    about = "Browse the contents of a GitHub repository from the terminal",
    long_about = "hearth-browser lists a repository two levels deep (hiding build and VCS \
                  infrastructure) and shows file contents, rendering Markdown and falling \
                  back to a directory listing when a folder has no README.md."
)]
pub struct Cli {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which repository to browse and what to hide.
#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Repository as owner/name
    #[arg(long, global = true, default_value = DEFAULT_REPO)]
    pub repo: String,

    /// Branch or other git ref
    #[arg(long, global = true, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Base URL of the contents API
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL of the raw-content host
    #[arg(long, global = true, default_value = DEFAULT_RAW_URL)]
    pub raw_url: String,

    /// Extra entry name to hide (repeatable)
    #[arg(long = "exclude", value_name = "NAME", global = true)]
    pub excludes: Vec<String>,

    /// Start from an empty exclusion set instead of the built-in one
    #[arg(long, global = true)]
    pub no_default_excludes: bool,
}

impl RepoArgs {
    pub fn to_config(&self) -> Result<BrowserConfig, ConfigError> {
        let mut config = BrowserConfig::new(&self.repo, &self.branch)?
            .with_endpoints(self.api_url.clone(), self.raw_url.clone());

        if self.no_default_excludes {
            config = config.with_excludes(Vec::<String>::new());
        }

        Ok(config.exclude_more(self.excludes.iter().cloned()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the repository tree (root plus one level)
    ///
    /// Example: hearth-browser tree --json
    Tree {
        /// Output the tree as JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },

    /// Print the content of one file or directory
    ///
    /// Example: hearth-browser show Flames --dir
    Show {
        /// Repository-relative path, e.g. Flames/H001.md
        path: String,

        /// Treat the path as a directory (README.md or a listing is shown)
        #[arg(long)]
        dir: bool,

        /// Print Markdown source instead of rendering it
        #[arg(long)]
        raw: bool,
    },

    /// Interactive browsing: type a path per line, ':tree' to reprint, ':q' to quit
    Browse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["hearth-browser", "tree"]).unwrap();
        let config = cli.repo.to_config().unwrap();

        assert_eq!(config.full_name(), DEFAULT_REPO);
        assert_eq!(config.branch, DEFAULT_BRANCH);
        assert!(config.excludes.contains(".github"));
        assert!(matches!(cli.command, Commands::Tree { json: false }));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hearth-browser",
            "show",
            "Flames",
            "--dir",
            "--repo",
            "octo/docs",
            "--branch",
            "main",
        ])
        .unwrap();

        let config = cli.repo.to_config().unwrap();
        assert_eq!(config.full_name(), "octo/docs");
        assert_eq!(config.branch, "main");
        match cli.command {
            Commands::Show { path, dir, raw } => {
                assert_eq!(path, "Flames");
                assert!(dir);
                assert!(!raw);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_exclusion_flags() {
        let cli = Cli::try_parse_from([
            "hearth-browser",
            "--no-default-excludes",
            "--exclude",
            "drafts",
            "--exclude",
            "tmp",
            "browse",
        ])
        .unwrap();

        let config = cli.repo.to_config().unwrap();
        assert_eq!(config.excludes.len(), 2);
        assert!(config.excludes.contains("drafts"));
        assert!(!config.excludes.contains(".github"));
    }

    #[test]
    fn test_bad_repository_is_a_config_error() {
        let cli = Cli::try_parse_from(["hearth-browser", "--repo", "nope", "tree"]).unwrap();
        assert!(cli.repo.to_config().is_err());
    }
}
