//! Bridge generation operation.
//!
//! Runs the whole pipeline: collect the library's headers from the entry
//! header, parse every annotated declaration, and emit the bridge source and
//! module-definition file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::bindings::{
    BridgeEmitter, BridgeError, BridgeParser, BridgeTemplates, EmittedFiles, HeaderCollector,
    ParsedHeader, TraversalContext,
};
use crate::util::config::Config;
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::{relative_path, resolve};

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Base directory for every relative path in the config
    pub root: PathBuf,

    /// Library layout, scanning and output settings
    pub config: Config,

    /// Dry run - don't write the output files
    pub dry_run: bool,
}

impl GenerateOptions {
    /// Create options rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        GenerateOptions {
            root: root.into(),
            config,
            dry_run: false,
        }
    }

    /// Set dry run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn entry(&self) -> PathBuf {
        resolve(&self.root, &self.config.library.entry)
    }

    /// Search directories, defaulting to the entry header's directory.
    fn include_dirs(&self, entry: &Path) -> Vec<PathBuf> {
        if self.config.library.include_dirs.is_empty() {
            return entry.parent().map(Path::to_path_buf).into_iter().collect();
        }
        self.config
            .library
            .include_dirs
            .iter()
            .map(|dir| resolve(&self.root, dir))
            .collect()
    }

    pub fn source_path(&self) -> PathBuf {
        resolve(&self.root, &self.config.emit.source)
    }

    pub fn def_path(&self) -> PathBuf {
        resolve(&self.root, &self.config.emit.definition)
    }
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Headers parsed, in discovery order
    pub headers: Vec<PathBuf>,

    /// Number of wrappers generated from declarations
    pub generated: usize,

    /// Number of hand-written wrappers appended
    pub fixed: usize,

    /// Generated source file
    pub source_path: PathBuf,

    /// Generated module-definition file
    pub def_path: PathBuf,

    /// Rendered contents of both files
    pub files: EmittedFiles,

    /// Whether the files were written to disk
    pub written: bool,
}

/// Collect every header reachable from the entry header and parse it.
///
/// Returns one [`ParsedHeader`] per header, in discovery order.
pub fn collect_bridges(opts: &GenerateOptions) -> Result<Vec<ParsedHeader>> {
    let config = &opts.config;
    config.validate()?;

    let entry = opts.entry();
    if !entry.is_file() {
        return Err(BridgeError::EntryNotFound { path: entry }.into());
    }

    let collector = HeaderCollector::new(&config.library.include_prefix, opts.include_dirs(&entry));
    let mut ctx = TraversalContext::new();
    let headers = collector.collect(&entry, &mut ctx);
    tracing::debug!("found {} headers from {}", headers.len(), entry.display());

    let templates = BridgeTemplates::new(&config.emit.export_marker)?;
    let parser = BridgeParser::new(&config.scan.annotation, config.scan.scanner.build()?, templates)
        .with_deny_list(config.scan.deny.iter().cloned().collect())
        .with_suffix(&config.emit.suffix);
    tracing::debug!("scanner: {}, deny-list: {} names", config.scan.scanner, config.scan.deny.len());

    let mut parsed = Vec::with_capacity(headers.len());
    for header in &headers {
        tracing::info!("Parsing: {}", relative_path(&opts.root, header).display());
        let result = parser.parse_file(header)?;
        tracing::debug!("  {} bridges", result.bridges.len());
        parsed.push(result);
    }

    Ok(parsed)
}

/// Generate the bridge source and definition file.
pub fn generate(opts: &GenerateOptions) -> Result<GenerateReport> {
    let config = &opts.config;
    let parsed = collect_bridges(opts)?;
    let headers: Vec<PathBuf> = parsed.iter().map(|p| p.source.clone()).collect();

    let mut all = ParsedHeader::default();
    for header in parsed {
        all.merge(header);
    }

    if all.bridges.is_empty() {
        let diag = Diagnostic::warning(format!(
            "no `{}` declarations found in {} header(s)",
            config.scan.annotation,
            headers.len()
        ))
        .with_suggestion("Check the export annotation in the [scan] section of bridgegen.toml");
        tracing::warn!("{}", diag.format(false).trim_end());
    }

    let templates = BridgeTemplates::new(&config.emit.export_marker)?;
    let emitter = BridgeEmitter::new(&config.library.name, &config.library.umbrella, templates)
        .with_suffix(&config.emit.suffix);
    let files = emitter.emit(&all.bridges, &config.emit.fixed)?;

    let source_path = opts.source_path();
    let def_path = opts.def_path();

    if !opts.dry_run {
        emitter
            .write(&files, &source_path, &def_path)
            .context("failed to write bridge module")?;
        tracing::debug!("wrote {} and {}", source_path.display(), def_path.display());
    }

    Ok(GenerateReport {
        headers,
        generated: all.bridges.len(),
        fixed: config.emit.fixed.len(),
        source_path,
        def_path,
        files,
        written: !opts.dry_run,
    })
}
