pub mod builder;
pub mod config;
pub mod markdown;
pub mod scanner;
pub mod template;

use std::path::Path;

use log::info;
use thiserror::Error;

// Re-export main types
pub use builder::{BuildError, SiteBuilder};
pub use config::MarkdownConfig;
pub use markdown::{MarkdownRenderer, extract_title};
pub use scanner::{InputFile, InputKind, ScanError, SiteScanner};
pub use template::{RenderContext, TemplateError, TemplateRegistry};

#[derive(Debug, Error)]
pub enum Error {
    #[error("error scanning site directory")]
    Scan(#[from] ScanError),
    #[error("error loading templates")]
    Template(#[from] TemplateError),
    #[error("error building site")]
    Build(#[from] BuildError),
}

/// Scans `source_dir`, loads the templates it needs and renders everything
/// into `output_dir`, replacing whatever was there.
pub fn build_site(
    source_dir: &Path,
    output_dir: &Path,
    markdown: &MarkdownConfig,
) -> Result<Vec<InputFile>, Error> {
    info!("=== READING INPUT FILES ===");
    let inputs = SiteScanner::new(source_dir).scan()?;

    info!("=== LOADING TEMPLATES ===");
    let templates = TemplateRegistry::load(&inputs, source_dir)?;
    info!(
        "Loaded {} template(s): {}",
        templates.names().len(),
        templates.names().join(", ")
    );

    info!("=== BUILDING SITE ===");
    SiteBuilder::new(output_dir)
        .markdown(MarkdownRenderer::new(markdown))
        .build(&inputs, &templates)?;

    Ok(inputs)
}
