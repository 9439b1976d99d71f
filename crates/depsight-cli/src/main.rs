use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use depsight_core::{ProjectDeclarationsFile, RestoreOutput, TargetFramework};
use depsight_graph::{aggregate, build_graph, build_graph_for};
use tracing::info;

mod logging;
mod render;

use render::{print_lines, render_paths, render_report, OutputStyle};

#[derive(Parser, Debug)]
#[command(name = "depsight")]
#[command(
    about = "Reconcile a project's package references with its restore output",
    long_about = None
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); DEPSIGHT_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List top-level and transitive packages per target framework.
    List {
        #[arg(long, env = "DEPSIGHT_RESTORE_OUTPUT")]
        restore: PathBuf,
        /// Project declarations file (TOML).
        #[arg(long, env = "DEPSIGHT_PROJECT")]
        project: PathBuf,
        /// `framework` or `framework/runtime-identifier`; repeatable.
        #[arg(long = "framework", short = 'f')]
        frameworks: Vec<String>,
        #[arg(long)]
        include_transitive: bool,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Show every dependency path from the project to a package.
    Why {
        package: String,
        #[arg(long, env = "DEPSIGHT_RESTORE_OUTPUT")]
        restore: PathBuf,
        #[arg(long, short = 'f')]
        framework: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn output_style(self) -> OutputStyle {
        match self {
            Self::Always => OutputStyle::Rich,
            Self::Never => OutputStyle::Plain,
            Self::Auto if std::io::stdout().is_terminal() => OutputStyle::Rich,
            Self::Auto => OutputStyle::Plain,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;
    let style = cli.color.output_style();

    match cli.command {
        Commands::List {
            restore,
            project,
            frameworks,
            include_transitive,
            format,
        } => {
            let restore = load_restore_output(&restore)?;
            let declarations = ProjectDeclarationsFile::load(&project)?;
            let report = aggregate(&restore, &declarations, &frameworks, include_transitive)
                .with_context(|| {
                    format!(
                        "failed to reconcile package references for '{}'",
                        restore.package_spec_name()
                    )
                })?;

            match format {
                ReportFormat::Text => print_lines(&render_report(
                    restore.package_spec_name().as_str(),
                    &report,
                    style,
                )),
                ReportFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("failed to encode report")?
                ),
            }
        }
        Commands::Why {
            package,
            restore,
            framework,
        } => {
            let restore = load_restore_output(&restore)?;
            let graph = match framework {
                Some(raw) => build_graph_for(&restore, &TargetFramework::parse(&raw)?)?,
                None => build_graph(&restore)?,
            };
            print_lines(&render_paths(&graph, &package, style));
        }
    }

    Ok(())
}

fn load_restore_output(path: &Path) -> Result<RestoreOutput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read restore output: {}", path.display()))?;
    let restore = RestoreOutput::from_json_str(&raw)
        .with_context(|| format!("invalid restore output: {}", path.display()))?;
    info!(
        path = %path.display(),
        project = %restore.package_spec_name(),
        targets = restore.targets().len(),
        "loaded restore output"
    );
    Ok(restore)
}
