//! CLI argument definitions for `rar-packager`.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::{ConfigOverrides, DEFAULT_DESCRIPTOR};
use crate::lifecycle::DEFAULT_LIFECYCLE;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use log::LevelFilter;

/// Package a resource adapter archive.
#[derive(Parser, Debug)]
#[command(name = "rar-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a J2EE resource adapter archive (RAR).\n\n",
    "Reads the project descriptor, stages the primary jar, runtime dependency ",
    "jars, rar sources, and extra resources in the work directory, then zips ",
    "that directory into <output_directory>/<final_name>[-<classifier>].rar.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package using ./rar.toml:\n",
    "    $ rar-packager\n\n",
    "  Build a classified, reproducible archive:\n",
    "    $ rar-packager --classifier jboss --output-timestamp 2024-01-01T00:00:00Z\n\n",
    "  Supply a filter property:\n",
    "    $ rar-packager -D jndi.name=eis/Adapter --filter-rar-source-directory\n\n",
    "  Show lifecycle bindings:\n",
    "    $ rar-packager lifecycle --json",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Package arguments (used when no subcommand is given).
    #[command(flatten)]
    pub package: PackageArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Package the archive (default when no subcommand given).
    Package(PackageArgs),

    /// Print the lifecycle phase bindings for `rar` packaging.
    Lifecycle(LifecycleArgs),
}

/// Arguments for the package command.
#[derive(Parser, Debug, Clone)]
pub struct PackageArgs {
    /// Project descriptor to read.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DESCRIPTOR)]
    pub config: Utf8PathBuf,

    /// Skip packaging entirely.
    #[arg(long)]
    pub skip: bool,

    /// Classifier appended to the archive name; attaches the archive instead
    /// of replacing the main artifact.
    #[arg(long, value_name = "NAME")]
    pub classifier: Option<String>,

    /// Timestamp for reproducible archives (RFC 3339 or epoch seconds).
    #[arg(long, value_name = "TIMESTAMP", env = "SOURCE_DATE_EPOCH")]
    pub output_timestamp: Option<String>,

    /// Filter the rar source directory.
    #[arg(long)]
    pub filter_rar_source_directory: bool,

    /// Do not warn when `META-INF/ra.xml` is missing.
    #[arg(long)]
    pub no_warn_on_missing_ra_xml: bool,

    /// Define a user property for filtering (repeatable).
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,

    /// Print the publication record as JSON.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the lifecycle command.
#[derive(Parser, Debug, Clone)]
pub struct LifecycleArgs {
    /// Lifecycle to show.
    #[arg(value_name = "LIFECYCLE", default_value = DEFAULT_LIFECYCLE)]
    pub id: String,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

impl PackageArgs {
    /// Return the descriptor overrides these arguments request.
    ///
    /// # Examples
    ///
    /// ```
    /// use rar_packager::cli::PackageArgs;
    ///
    /// let args = PackageArgs {
    ///     skip: true,
    ///     defines: vec![("jndi.name".to_owned(), "eis/A".to_owned())],
    ///     ..PackageArgs::default()
    /// };
    /// let overrides = args.overrides();
    /// assert!(overrides.skip);
    /// assert_eq!(overrides.user_properties["jndi.name"], "eis/A");
    /// ```
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            skip: self.skip,
            classifier: self.classifier.clone(),
            output_timestamp: self.output_timestamp.clone(),
            filter_rar_source_directory: self.filter_rar_source_directory,
            no_warn_on_missing_ra_xml: self.no_warn_on_missing_ra_xml,
            user_properties: self.defines.iter().cloned().collect(),
        }
    }

    /// Return the log level selected by `-v` and `-q`.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Default for PackageArgs {
    /// Creates a `PackageArgs` instance reading `rar.toml` with no overrides.
    fn default() -> Self {
        Self {
            config: Utf8PathBuf::from(DEFAULT_DESCRIPTOR),
            skip: false,
            classifier: None,
            output_timestamp: None,
            filter_rar_source_directory: false,
            no_warn_on_missing_ra_xml: false,
            defines: Vec::new(),
            json: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Default for LifecycleArgs {
    fn default() -> Self {
        Self {
            id: DEFAULT_LIFECYCLE.to_owned(),
            json: false,
        }
    }
}

impl Cli {
    /// Returns the effective package arguments.
    ///
    /// If a `Package` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened package arguments.
    #[must_use]
    pub fn package_args(&self) -> &PackageArgs {
        match &self.command {
            Some(Command::Package(args)) => args,
            Some(Command::Lifecycle(_)) | None => &self.package,
        }
    }
}

/// Parse a `KEY=VALUE` definition. A bare `KEY` defines an empty value.
fn parse_define(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("property definition `{raw}` has an empty key"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
