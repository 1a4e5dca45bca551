//! `rar-packager` CLI entrypoint.
//!
//! Loads the project descriptor, packages the resource adapter archive, and
//! prints where it was published.

use clap::Parser;
use rar_packager::archive::ZipArchiveWriter;
use rar_packager::cli::{Cli, Command, LifecycleArgs, PackageArgs};
use rar_packager::config::RarSettings;
use rar_packager::error::{PackagerError, Result};
use rar_packager::lifecycle::bindings;
use rar_packager::output::{
    format_bindings_human, format_bindings_json, format_outcome_human, format_outcome_json,
};
use rar_packager::packager::RarPackager;
use rar_packager::publish::ProjectArtifacts;
use rar_packager::resources::PropertyResourceFilter;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.package_args());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install the logger; `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_logging(args: &PackageArgs) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(args.log_level());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        // A logger is already installed; keep it.
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::Lifecycle(args)) => print_lifecycle(args, stdout),
        Some(Command::Package(args)) => package(args, stdout),
        None => package(&cli.package, stdout),
    }
}

fn package(args: &PackageArgs, stdout: &mut dyn Write) -> Result<()> {
    let settings = RarSettings::load(&args.config, args.overrides())?;
    let packager = RarPackager::new(&settings, &PropertyResourceFilter, &ZipArchiveWriter);

    let mut artifacts = ProjectArtifacts::default();
    let outcome = packager.execute(&mut artifacts)?;

    let text = if args.json {
        format_outcome_json(&outcome, &artifacts)
    } else {
        format_outcome_human(&outcome, &artifacts)
    };
    write_line(stdout, &text)
}

fn print_lifecycle(args: &LifecycleArgs, stdout: &mut dyn Write) -> Result<()> {
    let found = bindings(&args.id);
    let text = if args.json {
        format_bindings_json(found)
    } else {
        format_bindings_human(&args.id, found)
    };
    write_line(stdout, &text)
}

fn write_line(stdout: &mut dyn Write, text: &str) -> Result<()> {
    writeln!(stdout, "{text}").map_err(|source| PackagerError::WriteFailed { source })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            let mut cause = std::error::Error::source(&err);
            while let Some(inner) = cause {
                write_stderr_line(stderr, format!("  caused by: {inner}"));
                cause = inner.source();
            }
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
