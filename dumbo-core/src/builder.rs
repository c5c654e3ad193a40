use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::markdown::{MarkdownRenderer, extract_title};
use crate::scanner::{InputFile, InputKind};
use crate::template::{RenderContext, TemplateError, TemplateRegistry};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("could not remove output directory '{}'", path.display())]
    RemoveOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not create directory '{}'", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write file '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not render '{}'", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
}

/// Writes the output tree for a set of scanned inputs.
pub struct SiteBuilder {
    output_dir: PathBuf,
    markdown: MarkdownRenderer,
}

impl SiteBuilder {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            markdown: MarkdownRenderer::plain(),
        }
    }

    pub fn markdown(mut self, renderer: MarkdownRenderer) -> Self {
        self.markdown = renderer;
        self
    }

    /// Wipes the output directory and renders every input into it, in order.
    /// Stops at the first failure; files written before it are left in place.
    ///
    /// # Panics
    ///
    /// If a Markdown input names a template that is not in `templates`.
    /// [`TemplateRegistry::load`] loads every referenced template, so this
    /// only happens when the registry was built from other inputs.
    pub fn build(
        &self,
        inputs: &[InputFile],
        templates: &TemplateRegistry,
    ) -> Result<(), BuildError> {
        self.prepare_output()?;

        for input in inputs {
            self.build_file(input, templates)?;
        }

        Ok(())
    }

    fn prepare_output(&self) -> Result<(), BuildError> {
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir).map_err(|source| BuildError::RemoveOutput {
                path: self.output_dir.clone(),
                source,
            })?;
        }

        create_dir_all(&self.output_dir)
    }

    fn build_file(
        &self,
        input: &InputFile,
        templates: &TemplateRegistry,
    ) -> Result<(), BuildError> {
        let dest = input.output_path(&self.output_dir);
        if let Some(parent) = dest.parent() {
            create_dir_all(parent)?;
        }

        match &input.kind {
            InputKind::Html => self.build_html(input, &dest),
            InputKind::Markdown { template } => {
                self.build_markdown(input, template, templates, &dest)
            }
        }
    }

    fn build_html(&self, input: &InputFile, dest: &Path) -> Result<(), BuildError> {
        let bytes = read(&input.source)?;
        write(dest, bytes)?;

        info!("[BUILT]   {}", dest.display());
        Ok(())
    }

    fn build_markdown(
        &self,
        input: &InputFile,
        template: &str,
        templates: &TemplateRegistry,
        dest: &Path,
    ) -> Result<(), BuildError> {
        let bytes = read(&input.source)?;
        let content = self.markdown.render(&String::from_utf8_lossy(&bytes));
        let title = extract_title(&content);

        assert!(
            templates.contains(template),
            "template '{template}' used by '{}' was never loaded",
            input.source.display()
        );

        let html = templates
            .render(template, &RenderContext { content: &content, title: &title })
            .map_err(|source| BuildError::Render {
                path: dest.to_path_buf(),
                source,
            })?;

        write(dest, html)?;

        info!("[BUILT]   {} ({title})", dest.display());
        Ok(())
    }
}

fn read(path: &Path) -> Result<Vec<u8>, BuildError> {
    fs::read(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write<C: AsRef<[u8]>>(path: &Path, contents: C) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir_all(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
