//! `bridgegen generate` command

use anyhow::Result;

use super::load_config;
use crate::cli::GenerateArgs;
use bridgegen::ops::{generate, GenerateOptions};

pub fn execute(args: GenerateArgs) -> Result<()> {
    let (root, mut config) = load_config(&args.layout)?;

    if let Some(output) = args.output {
        config.emit.source = output;
    }
    if let Some(def) = args.def {
        config.emit.definition = def;
    }
    if let Some(library) = args.library {
        config.library.name = library;
    }

    let opts = GenerateOptions::new(root, config).with_dry_run(args.dry_run);
    let report = generate(&opts)?;

    if report.written {
        println!("Bridge file generated: {}", report.source_path.display());
        println!("Definition file:       {}", report.def_path.display());
    } else {
        println!("[dry-run] Would write:");
        println!("  {}", report.source_path.display());
        println!("  {}", report.def_path.display());
    }
    println!(
        "{} headers, {} generated bridges, {} fixed bridges",
        report.headers.len(),
        report.generated,
        report.fixed
    );

    Ok(())
}
