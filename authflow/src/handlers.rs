use anyhow::{Context, Result, anyhow, bail};
use authflow_core::snapshot::StudioSnapshot;
use authflow_core::{
    AuthConfig, Graph, emit_config, emit_env_template, export_graph, extract_config,
    generate_from_graph, graph_from_source,
};
use authflow_scanner::locator::ProgressCallback;
use authflow_scanner::{ConfigCandidate, ConfigStore, Locator, StoreError};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_SNAPSHOT_PATH: &str = ".authflow/studio.json";
pub const DEFAULT_OUTPUT_PATH: &str = "auth.ts";
pub const DEFAULT_ENV_TEMPLATE_PATH: &str = ".env.example";

pub fn print_banner() {
    println!(
        "{} {}",
        "authflow".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("{}", "better-auth config <-> graph".bright_black());
    println!();
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

// Helper functions shared by the handlers

/// Tilde-expand a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Turn `--base-url` into the expression written after `baseURL:`. An
/// http(s) URL becomes a string literal; a `process.env.*` reference is
/// kept as an expression.
pub fn base_url_expression(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.starts_with("process.env.") {
        return Ok(raw.to_string());
    }

    let url = Url::parse(raw).with_context(|| format!("'{}' is not a valid URL", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Base URL must use http or https, got '{}'", url.scheme());
    }
    // Url normalises a bare origin to a trailing slash
    Ok(format!("\"{}\"", url.as_str().trim_end_matches('/')))
}

/// A next step to suggest for a failed command, if one applies.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    let store_err = err.chain().find_map(|e| e.downcast_ref::<StoreError>())?;
    match store_err {
        StoreError::NotFound(_) => Some(
            "Check the path, or run `authflow locate --deep` to search for config files",
        ),
        StoreError::PermissionDenied(_) => Some("Check the file permissions and try again"),
        StoreError::InvalidPath(_) => Some("Pass a file path, not a directory"),
        StoreError::Io { .. } => None,
    }
}

/// Load a studio snapshot. A missing file is an error with a hint; text
/// that is not a snapshot falls back to the root-only graph.
pub async fn load_snapshot<S: ConfigStore>(store: &S, path: &Path) -> Result<StudioSnapshot> {
    let text = store
        .read_text(path)
        .await
        .with_context(|| format!("Could not read snapshot {}", path.display()))?;
    let snapshot = StudioSnapshot::from_json(Some(&text), DEFAULT_OUTPUT_PATH);
    debug!(
        "Loaded snapshot with {} nodes and {} edges",
        snapshot.nodes.len(),
        snapshot.edges.len()
    );
    Ok(snapshot)
}

async fn read_config_source<S: ConfigStore>(store: &S, path: &Path) -> Result<String> {
    store
        .read_text(path)
        .await
        .with_context(|| format!("Could not read auth config {}", path.display()))
}

// Command handlers

pub async fn handle_init<S: ConfigStore>(store: &S, path: &Path, force: bool) -> Result<StudioSnapshot> {
    if !force && store.read_if_exists(path).await?.is_some() {
        bail!(
            "A snapshot already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let snapshot = StudioSnapshot::empty(DEFAULT_OUTPUT_PATH);
    store.write_text(path, &snapshot.to_json()?).await?;
    info!("Initialised snapshot at {}", path.display());

    println!(
        "{} Snapshot initialised: {}",
        "✓".green().bold(),
        path.display().to_string().bright_white()
    );
    Ok(snapshot)
}

pub async fn handle_locate(dir: &Path, deep: bool, quiet: bool) -> Result<Vec<ConfigCandidate>> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| anyhow!("Invalid progress template: {}", e))?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let progress_bar = spinner.clone();
    let progress_callback: ProgressCallback = Arc::new(move |count: usize, current: String| {
        progress_bar.set_message(format!("[{}] {}", count, current));
    });

    let result = Locator::new()
        .with_deep_scan(deep)
        .with_progress_callback(progress_callback)
        .locate(dir)
        .await;
    spinner.finish_and_clear();

    let candidates =
        result.with_context(|| format!("Could not search {}", dir.display()))?;

    if candidates.is_empty() {
        println!(
            "{} No auth config files found under {}",
            "✗".yellow().bold(),
            dir.display().to_string().bright_white()
        );
        if !deep {
            println!("{} Try again with --deep", "ℹ".blue());
        }
        return Ok(candidates);
    }

    for candidate in &candidates {
        let marker = if candidate.error.is_some() {
            "?".red().bold()
        } else if candidate.has_better_auth {
            "✓".green().bold()
        } else {
            "•".yellow().bold()
        };
        println!(
            "  {} {} {}",
            marker,
            candidate.path.display().to_string().bright_white(),
            format!("({} bytes)", candidate.size).bright_black()
        );
    }
    Ok(candidates)
}

pub async fn handle_inspect<S: ConfigStore>(store: &S, config_path: &Path) -> Result<AuthConfig> {
    let content = read_config_source(store, config_path).await?;
    let config = extract_config(&content);
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(config)
}

pub async fn handle_parse<S: ConfigStore>(
    store: &S,
    config_path: &Path,
    snapshot_path: &Path,
) -> Result<StudioSnapshot> {
    let content = read_config_source(store, config_path).await?;
    let graph = graph_from_source(&content);
    let snapshot =
        StudioSnapshot::capture(&config_path.display().to_string(), &graph, &content);
    store
        .write_text(snapshot_path, &snapshot.to_json()?)
        .await
        .with_context(|| format!("Could not write snapshot {}", snapshot_path.display()))?;

    print_divider();
    println!("{}", "  PARSE COMPLETE".green().bold());
    print_divider();
    println!(
        "{} Sections found: {}",
        "✓".green().bold(),
        snapshot.config.feature_count().to_string().cyan()
    );
    println!(
        "{} Graph: {} nodes, {} edges",
        "✓".green().bold(),
        snapshot.nodes.len().to_string().cyan(),
        snapshot.edges.len().to_string().cyan()
    );
    println!(
        "{} Snapshot: {}",
        "✓".green().bold(),
        snapshot_path.display().to_string().bright_white()
    );
    Ok(snapshot)
}

pub struct GenerateOptions {
    pub snapshot_path: PathBuf,
    pub output_path: PathBuf,
    pub env_path: PathBuf,
    pub base_url: Option<String>,
    pub dry_run: bool,
}

/// Files produced by `generate`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFiles {
    pub config: AuthConfig,
    pub source: String,
    pub env_template: String,
}

pub async fn handle_generate<S: ConfigStore>(
    store: &S,
    options: &GenerateOptions,
) -> Result<GeneratedFiles> {
    let snapshot = load_snapshot(store, &options.snapshot_path).await?;
    let mut config = generate_from_graph(&snapshot.graph());
    if let Some(raw) = &options.base_url {
        config.base_url = base_url_expression(raw)?;
    }

    let generated = GeneratedFiles {
        source: emit_config(&config),
        env_template: emit_env_template(&config),
        config,
    };

    if options.dry_run {
        println!("{}", format!("// {}", options.output_path.display()).bright_black());
        println!("{}", generated.source);
        println!("{}", format!("# {}", options.env_path.display()).bright_black());
        println!("{}", generated.env_template);
        return Ok(generated);
    }

    store
        .write_text(&options.output_path, &generated.source)
        .await
        .with_context(|| format!("Could not write {}", options.output_path.display()))?;
    store
        .write_text(&options.env_path, &generated.env_template)
        .await
        .with_context(|| format!("Could not write {}", options.env_path.display()))?;

    println!(
        "{} Config: {}",
        "✓".green().bold(),
        options.output_path.display().to_string().bright_white()
    );
    println!(
        "{} Env template: {}",
        "✓".green().bold(),
        options.env_path.display().to_string().bright_white()
    );
    Ok(generated)
}

pub async fn handle_export<S: ConfigStore>(
    store: &S,
    snapshot_path: &Path,
    output_path: &Path,
) -> Result<Graph> {
    let snapshot = load_snapshot(store, snapshot_path).await?;
    let exported = export_graph(&snapshot.nodes, &snapshot.edges);
    let json = serde_json::to_string_pretty(&exported)?;
    store
        .write_text(output_path, &json)
        .await
        .with_context(|| format!("Could not write {}", output_path.display()))?;

    println!(
        "{} Exported {} nodes to {}",
        "✓".green().bold(),
        exported.nodes.len().to_string().cyan(),
        output_path.display().to_string().bright_white()
    );
    Ok(exported)
}
