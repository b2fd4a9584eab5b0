//! tabstack CLI - registry validation and headless navigation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use tabstack::errors::{ValidationError, ValidationLayer, ValidationResult};
use tabstack::registry::schema::registry_schema;
use tabstack::{
    Category, FixSuggestion, MemorySurface, NavAction, NavError, Presenter, RegistryFile, Router,
    ScreenTable,
};

/// Registry files end with this suffix
const REGISTRY_SUFFIX: &str = ".screens.yaml";

#[derive(Parser)]
#[command(name = "tabstack")]
#[command(about = "tabstack - tab/stack navigation core for screen playgrounds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a registry file, or every *.screens.yaml under a directory
    Validate {
        /// Registry file or directory
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = ValidateFormat::Text)]
        format: ValidateFormat,
    },

    /// List the screens of a registry by category
    Screens {
        /// Path to a .screens.yaml file
        file: PathBuf,
    },

    /// Apply navigation actions and print the resulting page
    Nav {
        /// Path to a .screens.yaml file
        file: PathBuf,

        /// Actions in order, e.g. `navigate:item-detail:{"id":"x"}` `pop`
        actions: Vec<String>,

        /// Initial tab (overrides TABSTACK_DEFAULT_TAB and the file)
        #[arg(long)]
        default_tab: Option<String>,

        /// Fail on the first ignored action (also TABSTACK_STRICT=1)
        #[arg(long)]
        strict: bool,

        #[arg(long, value_enum, default_value_t = NavFormat::Html)]
        format: NavFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the embedded registry JSON Schema
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum ValidateFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum NavFormat {
    Html,
    Json,
}

fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries documents
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { path, format } => validate(&path, format),
        Commands::Screens { file } => list_screens(&file),
        Commands::Nav {
            file,
            actions,
            default_tab,
            strict,
            format,
            output,
        } => {
            let default_tab = default_tab.or_else(|| env_value("TABSTACK_DEFAULT_TAB"));
            let strict = strict || env_flag("TABSTACK_STRICT");
            navigate(&file, &actions, default_tab.as_deref(), strict, format, output.as_deref())
        }
        Commands::Schema => print_json(registry_schema()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.downcast_ref::<NavError>().and_then(|n| n.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str) -> bool {
    env_value(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(file: &Path) -> anyhow::Result<RegistryFile> {
    RegistryFile::load(file).with_context(|| format!("failed to load '{}'", file.display()))
}

// ═══════════════════════════════════════════════════════════════════════════
// validate
// ═══════════════════════════════════════════════════════════════════════════

fn registry_files(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(REGISTRY_SUFFIX))
        })
        .collect();
    files.sort();
    files
}

fn validate_file(file: &Path) -> ValidationResult {
    let display = file.display().to_string();
    match RegistryFile::load(file) {
        Ok(registry) => registry.validate(&display),
        Err(e) => {
            let mut result = ValidationResult::new(display);
            result.add_error(ValidationError::SchemaViolation {
                layer: ValidationLayer::Schema,
                path: String::from("/"),
                message: e.to_string(),
            });
            result
        }
    }
}

fn validate(path: &Path, format: ValidateFormat) -> anyhow::Result<()> {
    let files = registry_files(path);
    if files.is_empty() {
        println!(
            "{} No registry files found in '{}'",
            "⚠".yellow(),
            path.display()
        );
        return Ok(());
    }

    let results: Vec<ValidationResult> = files.iter().map(|f| validate_file(f)).collect();
    let invalid = results.iter().filter(|r| !r.is_valid()).count();

    match format {
        ValidateFormat::Json => print_json(&json!({
            "valid": invalid == 0,
            "files": results.iter().map(ValidationResult::to_json).collect::<Vec<_>>(),
        }))?,
        ValidateFormat::Text => {
            for result in &results {
                print_result(result);
            }
            println!(
                "\nValidated {} registry file(s): {} valid, {} invalid",
                results.len(),
                results.len() - invalid,
                invalid
            );
        }
    }

    if invalid > 0 {
        let error_count = results.iter().map(|r| r.errors.len()).sum();
        return Err(NavError::InvalidRegistry {
            source_name: path.display().to_string(),
            error_count,
            summary: format!("{invalid} file(s) failed validation"),
        }
        .into());
    }
    Ok(())
}

fn print_result(result: &ValidationResult) {
    if result.is_valid() {
        println!(
            "{} {} ({} tabs, {} screens)",
            "✓".green(),
            result.file_path,
            result.tab_count,
            result.screen_count
        );
    } else {
        println!(
            "{} {} ({} error(s))",
            "✗".red(),
            result.file_path,
            result.errors.len()
        );
    }

    for error in &result.errors {
        println!("  {} [{}] {}", "error".red(), error.layer(), error);
        if let Some(suggestion) = error.suggestion() {
            println!("    {} {}", "→".cyan(), suggestion);
        }
    }
    for warning in &result.warnings {
        println!("  {} [{}] {}", "warning".yellow(), warning.layer(), warning);
        if let Some(suggestion) = warning.suggestion() {
            println!("    {} {}", "→".cyan(), suggestion);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// screens
// ═══════════════════════════════════════════════════════════════════════════

fn list_screens(file: &Path) -> anyhow::Result<()> {
    let registry = load(file)?;
    println!(
        "{} {}",
        registry.display_name(file).cyan().bold(),
        format!("({} screens)", registry.screens.len()).dimmed()
    );

    for category in [
        Category::Tab,
        Category::Detail,
        Category::Onboarding,
        Category::Utility,
    ] {
        let entries: Vec<_> = registry
            .screens
            .entries()
            .filter(|e| e.category() == category)
            .collect();
        if entries.is_empty() {
            continue;
        }
        println!("\n{}", category.to_string().bold());
        for entry in entries {
            let extra = match entry {
                tabstack::ScreenEntry::Detail(d) => format!(" → {}", d.parent),
                tabstack::ScreenEntry::Onboarding(o) => format!(" (page {})", o.page),
                _ => String::new(),
            };
            println!(
                "  {:<20} {}{}",
                entry.id(),
                entry.label(),
                extra.dimmed()
            );
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// nav
// ═══════════════════════════════════════════════════════════════════════════

fn navigate(
    file: &Path,
    actions: &[String],
    default_tab: Option<&str>,
    strict: bool,
    format: NavFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    // Parse everything first so a typo fails before any state changes
    let actions = actions
        .iter()
        .map(|a| a.parse::<NavAction>())
        .collect::<Result<Vec<_>, NavError>>()?;

    let registry = load(file)?;
    let title = registry.display_name(file);
    let surface = MemorySurface::new();

    let mut router = Router::from_file(registry, default_tab)?;
    router.subscribe(Presenter::new(ScreenTable::new(), surface.clone()));
    router.refresh();

    for action in actions {
        let transition = router.dispatch(action);
        if strict {
            transition.into_result()?;
        }
    }

    let document = match format {
        NavFormat::Html => surface.to_document(&title),
        NavFormat::Json => {
            let mut snapshot = router.view().to_json();
            snapshot["events"] = router.event_log().to_json();
            serde_json::to_string_pretty(&snapshot)?
        }
    };

    match output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}
