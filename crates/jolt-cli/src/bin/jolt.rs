use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use jolt_cli::args::CliArgs;
use jolt_cli::exit::{HelpRequested, exit_code_for};
use jolt_cli::loader::Loader;
use jolt_cli::reporter::format_msg;
use jolt_cli::targets::parse_target_list;
use jolt_cli::{driver, tracing_config};
use jolt_common::diagnostics::Log;
use jolt_fs::{Fs, RealFs, RealFsOptions, ZipFs};

fn main() {
    tracing_config::init();
    match run() {
        Ok(()) => {}
        Err(err) => {
            let code = exit_code_for(&err);
            // Help is not an error from the user's point of view
            if code != 2 {
                eprintln!("{err:#}");
            }
            std::process::exit(code);
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.help {
        print_usage();
        return Err(HelpRequested.into());
    }

    let loader = match &args.loader {
        Some(name) => Loader::from_name(name).map_err(anyhow::Error::msg)?,
        None => Loader::Default,
    };

    // Validated up front so a bad target fails before any I/O
    let _constraints = match &args.target {
        Some(target) => Some(parse_target_list(target).map_err(anyhow::Error::msg)?),
        None => None,
    };

    let real = match &args.working_dir {
        Some(dir) => RealFs::with_cwd(RealFsOptions::default(), dir.clone()),
        None => RealFs::new(RealFsOptions::default()).context("cannot determine working directory")?,
    };
    let fs: Arc<dyn Fs> = Arc::new(ZipFs::new(Arc::new(real)));

    let log = Log::new();
    let result = driver::scan_entry_points(&fs, &log, &args.entry_points, loader);

    let msgs = log.take_msgs();
    let had_errors = msgs
        .iter()
        .any(|m| m.kind == jolt_common::diagnostics::MsgKind::Error);
    for msg in &msgs {
        eprint!("{}", format_msg(msg));
    }

    let scan = result?;
    if had_errors {
        anyhow::bail!("scan failed with errors");
    }
    tracing::debug!(
        files = scan.sources.len(),
        lines = scan.total_lines,
        "scan finished"
    );
    Ok(())
}

fn print_usage() {
    println!("Usage: jolt [options] <entry points>");
    println!();
    println!("Options:");
    println!("  --loader <name>       Interpret inputs with this loader");
    println!("  --target <list>       Environments to support (es2020,chrome58,...)");
    println!("  --minify              Shorten names and drop whitespace");
    println!("  --sourcemap           Emit source maps");
    println!("  --scan-only           Report syntax errors and stop");
    println!("  --working-dir <path>  Override the working directory");
    println!("  -h, --help            Show this help (exit code 2)");
}
