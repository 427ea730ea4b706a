// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, controlled by --verbose / RUST_LOG)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = content failed to load,
//    2 = error such as a failed tree build or a bad option)
// =============================================================================

mod cli;
mod config;
mod content;
mod github;
mod session;
mod tree;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::BrowserConfig;
use content::{render, ContentResolver, ResolvedContent};
use github::{ContentSource, GitHubClient};
use session::{parse_selection, Browser, ContentState};
use tree::{build_tree, BuildError, ExclusionFilter, TreeModel};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match cli.repo.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(2);
        }
    };

    match cli.command {
        Commands::Tree { json } => handle_tree(&config, json).await,
        Commands::Show { path, dir, raw } => handle_show(&config, &path, dir, raw).await,
        Commands::Browse => handle_browse(&config).await,
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let directive = if verbose {
        "hearth_browser=debug"
    } else {
        "hearth_browser=warn"
    };

    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

// The source and exclusion filter every command starts from.
fn connect(config: &BrowserConfig) -> Result<(Arc<dyn ContentSource>, ExclusionFilter)> {
    let source: Arc<dyn ContentSource> = Arc::new(GitHubClient::new(config)?);
    Ok((source, ExclusionFilter::from(&config.excludes)))
}

// Handles the 'tree' subcommand
async fn handle_tree(config: &BrowserConfig, json: bool) -> Result<i32> {
    let (source, filter) = connect(config)?;

    println!("🔍 Listing {} ({})", config.full_name(), config.branch);

    let tree = match build_tree(source.as_ref(), &filter).await {
        Ok(tree) => tree,
        Err(e) => {
            report_build_error(config, &e);
            return Ok(2);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print_tree(&tree);
    }

    Ok(0)
}

// Handles the 'show' subcommand
async fn handle_show(config: &BrowserConfig, path: &str, dir: bool, raw: bool) -> Result<i32> {
    let (source, filter) = connect(config)?;
    let resolver = ContentResolver::new(source.clone(), filter);

    let content = resolver.resolve(path.trim_matches('/'), dir).await;
    print_content(path, &content, raw, source.as_ref());

    Ok(if content.failed { 1 } else { 0 })
}

// Handles the 'browse' subcommand
async fn handle_browse(config: &BrowserConfig) -> Result<i32> {
    let (source, filter) = connect(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("🔍 Browsing {} ({})", config.full_name(), config.branch);

    let tree = match build_with_retry(config, source.as_ref(), &filter, &mut lines).await? {
        Some(tree) => tree,
        None => return Ok(2),
    };

    print_tree(&tree);
    println!("\nType a path to view it (':tree' to list again, ':q' to quit).");

    let resolver = ContentResolver::new(source.clone(), filter);
    let mut browser = Browser::start(Arc::new(tree), resolver);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match line.trim() {
                    ":q" | ":quit" => break,
                    ":tree" => print_tree(browser.state().tree()),
                    input => {
                        if let Some(selection) = parse_selection(browser.state().tree(), input) {
                            println!("⏳ Loading {}...", display_path(&selection.path));
                            browser.select(selection).await?;
                        }
                    }
                }
            }
            Some(event) = browser.recv() => {
                // Results for anything but the latest selection are dropped.
                if browser.apply(event) {
                    show_current(&browser, source.as_ref());
                }
            }
        }
    }

    // Input is gone but the last selection may still be in flight
    // (e.g. `echo README.md | hearth-browser browse`).
    if matches!(browser.state().content(), ContentState::Loading)
        && browser.wait_current().await.is_some()
    {
        show_current(&browser, source.as_ref());
    }

    info!("browse session ended");
    Ok(0)
}

// Builds the tree, offering a retry after each failure. Returns None when the
// user gives up (or stdin closes).
async fn build_with_retry(
    config: &BrowserConfig,
    source: &dyn ContentSource,
    filter: &ExclusionFilter,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<TreeModel>> {
    loop {
        match build_tree(source, filter).await {
            Ok(tree) => return Ok(Some(tree)),
            Err(e) => {
                report_build_error(config, &e);
                println!("Press Enter to retry, or type q to quit.");

                match lines.next_line().await? {
                    Some(answer) if !answer.trim().eq_ignore_ascii_case("q") => continue,
                    _ => return Ok(None),
                }
            }
        }
    }
}

fn report_build_error(config: &BrowserConfig, error: &BuildError) {
    match error {
        BuildError::EmptyRepository => {
            eprintln!(
                "⚠️  {} has no files on branch '{}'",
                config.full_name(),
                config.branch
            );
        }
        BuildError::Fetch(fetch) => {
            eprintln!("❌ Could not load the repository tree: {}", fetch);
            if fetch.status() == Some(403) {
                eprintln!("   (GitHub may be rate limiting unauthenticated requests)");
            }
        }
    }
}

// Prints the tree as an indented listing
fn print_tree(tree: &TreeModel) {
    if tree.is_empty() {
        println!("(every entry is hidden by the exclusion list)");
        return;
    }

    for row in tree.walk() {
        let indent = "   ".repeat(row.depth);
        if row.node.is_dir() && row.depth > 0 {
            // Not expanded; shows the path that opens it.
            println!("{}📁 {}/  ({}/)", indent, row.name, row.path);
        } else if row.node.is_dir() {
            println!("{}📁 {}/", indent, row.name);
        } else {
            println!("{}📄 {}", indent, row.name);
        }
    }

    println!();
    println!(
        "📊 {} file(s), {} folder(s)",
        tree.file_count(),
        tree.dir_count()
    );
}

// Prints whatever the session currently shows for its selection.
fn show_current(browser: &Browser, source: &dyn ContentSource) {
    let state = browser.state();
    if let (Some(selection), ContentState::Resolved(content)) = (state.selection(), state.content())
    {
        print_content(&display_path(&selection.path), content, false, source);
    }
}

fn print_content(title: &str, content: &ResolvedContent, raw: bool, source: &dyn ContentSource) {
    println!();
    println!("── {} ──", title);
    println!();

    if raw {
        println!("{}", content.text);
    } else {
        println!("{}", render(content).trim_end());
    }

    if let Some(url) = content.file.as_deref().and_then(|file| source.download_url(file)) {
        println!("\n🔗 {}", url);
    }

    if content.failed {
        eprintln!("❌ Could not load {}", title);
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
