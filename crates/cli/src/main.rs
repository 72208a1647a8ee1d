use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use regionfold_core::{
    analyze_file, fold_directive_for_line, foldexpr_lines, format_file, format_output,
    render_file, render_file_ansi, to_foldexpr, Language, OutputFormat, RegionConfig,
    RegionScanner, ScanConfig,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mta_rust_regionfold")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Region-marker folding utility for Python and Node.js/TypeScript")]
#[command(long_about = "Finds region markers written in comments (`# region name` / `# endregion`), \
    checks that they nest and reports per-line fold levels.\n\n\
    - Comments are located with Tree-sitter, so markers inside strings are ignored\n\
    - Unmatched ends, mismatched names and unclosed starts are reported\n\
    - Fold levels can be printed as Vim foldexpr tokens\n\n\
    Marker keywords can be set on the command line or in a TOML config file.")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project root directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json)]
    pub format: OutputFormatArg,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only scan specific language
    #[arg(long, value_enum)]
    pub language: Option<LanguageFilter>,

    /// Additional ignore patterns (gitignore style)
    #[arg(long, action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Ignore file path (defaults to .gitignore)
    #[arg(long)]
    pub ignore_file: Option<PathBuf>,

    /// Include node_modules / .venv in scan
    #[arg(long)]
    pub include_deps: bool,

    /// Parallel threads (0 = auto)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Marker configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Match keywords case-sensitively
    #[arg(long, global = true)]
    pub case_sensitive: bool,

    /// Region start keyword (repeatable, replaces the defaults)
    #[arg(long = "start-keyword", global = true, action = clap::ArgAction::Append)]
    pub start_keywords: Vec<String>,

    /// Region end keyword (repeatable, replaces the defaults)
    #[arg(long = "end-keyword", global = true, action = clap::ArgAction::Append)]
    pub end_keywords: Vec<String>,

    /// Sentinel marking a region as folded by default
    #[arg(long, global = true)]
    pub fold_sentinel: Option<String>,

    /// Fold every region by default
    #[arg(long, global = true)]
    pub fold_all: bool,

    /// Disable colors in terminal output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Show verbose progress and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List regions and region errors in a file
    List {
        /// File to analyze
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Summary)]
        format: OutputFormatArg,
    },

    /// Print Vim foldexpr tokens for a file, one per line
    Foldexpr {
        /// File to analyze
        file: PathBuf,

        /// Print the token for this line only (1-indexed)
        #[arg(long)]
        line: Option<usize>,
    },

    /// Print a file with its fold gutter
    Render {
        /// File to render
        file: PathBuf,

        /// Output with ANSI colors
        #[arg(long)]
        ansi: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Summary,
    Ansi,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Summary => OutputFormat::Summary,
            OutputFormatArg::Ansi => OutputFormat::Ansi,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LanguageFilter {
    Python,
    JavaScript,
    TypeScript,
    /// Alias for JS + TS
    Node,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let region = build_region_config(&args)?;
    debug!(?region, "marker configuration");

    match &args.command {
        Some(Commands::List { file, format }) => run_list(file.clone(), format.clone(), &region),
        Some(Commands::Foldexpr { file, line }) => run_foldexpr(file.clone(), *line, &region),
        Some(Commands::Render { file, ansi }) => run_render(file.clone(), *ansi, &region, &args),
        None => run_scan(&args, region),
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file first, then command-line overrides
fn build_region_config(args: &Args) -> anyhow::Result<RegionConfig> {
    let mut config = match args.config {
        Some(ref path) => RegionConfig::from_file(path)?,
        None => RegionConfig::default(),
    };

    if args.case_sensitive {
        config = config.with_case_sensitive(true);
    }
    if !args.start_keywords.is_empty() {
        config = config.with_start_keywords(args.start_keywords.clone());
    }
    if !args.end_keywords.is_empty() {
        config = config.with_end_keywords(args.end_keywords.clone());
    }
    if let Some(ref sentinel) = args.fold_sentinel {
        config = config.with_fold_sentinel(sentinel.clone());
    }
    if args.fold_all {
        config = config.with_fold_all_by_default(true);
    }

    config.validate()?;
    Ok(config)
}

fn run_scan(args: &Args, region: RegionConfig) -> anyhow::Result<()> {
    let language_filter = args.language.as_ref().map(|l| match l {
        LanguageFilter::Python => vec![Language::Python],
        LanguageFilter::JavaScript => vec![Language::JavaScript],
        LanguageFilter::TypeScript => vec![Language::TypeScript],
        LanguageFilter::Node => vec![Language::JavaScript, Language::TypeScript],
    });

    let mut config = ScanConfig::new(args.path.clone())
        .with_ignore_patterns(args.ignore.clone())
        .with_include_deps(args.include_deps)
        .with_threads(args.threads)
        .with_region_config(region);

    if let Some(languages) = language_filter {
        config = config.with_language_filter(languages);
    }

    if let Some(ref ignore_file) = args.ignore_file {
        config = config.with_ignore_file(ignore_file.clone());
    }

    let spinner = if args.verbose {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scanning project...");
        Some(pb)
    } else {
        None
    };

    let scanner = RegionScanner::new(config)?;
    let result = scanner.scan()?;

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Scanned {} files in {}ms",
            result.stats.total_files, result.metadata.scan_duration_ms
        ));
    }

    let format = match args.format {
        OutputFormatArg::Ansi if args.no_color => OutputFormatArg::Summary,
        ref other => other.clone(),
    };
    let output = format_output(&result, format.into())?;

    if let Some(ref path) = args.output {
        fs::write(path, &output)?;
        if args.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn run_list(file: PathBuf, format: OutputFormatArg, region: &RegionConfig) -> anyhow::Result<()> {
    let config = ScanConfig::default().with_region_config(region.clone());
    let scanner = RegionScanner::new(config)?;
    let source_file = scanner.scan_file(&file)?;

    let output = format_file(&source_file, format.into())?;
    println!("{}", output);
    Ok(())
}

fn run_foldexpr(file: PathBuf, line: Option<usize>, region: &RegionConfig) -> anyhow::Result<()> {
    let (content, _language, snapshot) = analyze_file(&file, region)?;

    match line {
        Some(line) => println!("{}", to_foldexpr(&fold_directive_for_line(line, &snapshot))),
        None => {
            for token in foldexpr_lines(&snapshot, content.lines().count()) {
                println!("{}", token);
            }
        }
    }

    Ok(())
}

fn run_render(file: PathBuf, ansi: bool, region: &RegionConfig, args: &Args) -> anyhow::Result<()> {
    let rendered = if ansi || (atty::is(atty::Stream::Stdout) && !args.no_color) {
        render_file_ansi(&file, region)?
    } else {
        render_file(&file, region)?
    };

    print!("{}", rendered.content);

    if args.verbose {
        eprintln!(
            "\n--- {} regions, {} errors ---",
            rendered.region_count, rendered.error_count
        );
    }

    Ok(())
}
