//! `bridgegen list` command
//!
//! Prints every discovered header with the mappings it produces.

use anyhow::Result;

use super::load_config;
use crate::cli::LayoutArgs;
use bridgegen::ops::{collect_bridges, GenerateOptions};
use bridgegen::util::fs::relative_path;

pub fn execute(args: LayoutArgs) -> Result<()> {
    let (root, config) = load_config(&args)?;
    let opts = GenerateOptions::new(&root, config);
    let parsed = collect_bridges(&opts)?;

    let mut total = 0;
    for header in &parsed {
        println!("{}", relative_path(&root, &header.source).display());
        for mapping in header.mappings() {
            println!("    {}", mapping);
        }
        total += header.bridges.len();
    }

    println!();
    println!("{} headers, {} bridges", parsed.len(), total);

    Ok(())
}
