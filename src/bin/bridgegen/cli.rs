//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// bridgegen - generate exported bridge wrappers for a C library
///
/// Running without a subcommand is the same as `bridgegen generate`.
#[derive(Parser)]
#[command(name = "bridgegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the bridge source and module-definition file
    Generate(GenerateArgs),

    /// List discovered headers and the bridges they would produce
    List(LayoutArgs),
}

/// Where the library lives and how it is scanned.
#[derive(Args, Debug, Default, Clone)]
pub struct LayoutArgs {
    /// Base directory for relative paths (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Config file (defaults to bridgegen.toml under the root, if present)
    #[arg(long, env = "BRIDGEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Entry header seeding the include traversal
    #[arg(long)]
    pub entry: Option<PathBuf>,

    /// Include search directory (repeatable, searched in order)
    #[arg(long = "include-dir", short = 'I')]
    pub include_dirs: Vec<PathBuf>,

    /// Declaration scanner: regex or token
    #[arg(long)]
    pub scanner: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Generated C source file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generated module-definition file
    #[arg(long)]
    pub def: Option<PathBuf>,

    /// Library name for the LIBRARY line of the definition file
    #[arg(long)]
    pub library: Option<String>,

    /// Show what would be generated without writing files
    #[arg(long)]
    pub dry_run: bool,
}
