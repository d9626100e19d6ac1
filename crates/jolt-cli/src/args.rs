use clap::Parser;

/// CLI arguments for the jolt binary.
#[derive(Parser, Debug)]
#[command(
    name = "jolt",
    version,
    about = "jolt - a JavaScript/TypeScript bundler core",
    disable_help_flag = true
)]
pub struct CliArgs {
    /// Entry point files.
    pub entry_points: Vec<String>,

    /// Show usage information and exit with code 2.
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Interpret input files with this loader (e.g. "js", "ts", "json").
    #[arg(long)]
    pub loader: Option<String>,

    /// Environments to support (e.g. "es2020,chrome58,node12.19.0").
    #[arg(long)]
    pub target: Option<String>,

    /// Shorten symbol names and drop whitespace in the output.
    #[arg(long)]
    pub minify: bool,

    /// Emit a source map next to each output file.
    #[arg(long)]
    pub sourcemap: bool,

    /// Stop after scanning: report syntax errors without emitting output.
    #[arg(long = "scan-only")]
    pub scan_only: bool,

    /// Absolute working directory override.
    #[arg(long = "working-dir")]
    pub working_dir: Option<String>,
}
