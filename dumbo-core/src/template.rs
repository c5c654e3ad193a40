use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::scanner::{InputFile, TEMPLATES_DIR};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not read template '{name}' at '{}'", path.display())]
    Read {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse template '{name}'")]
    Parse {
        name: String,
        #[source]
        source: tera::Error,
    },
    #[error("could not render template '{name}'")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },
}

/// Values substituted into a template's `content` and `title` slots.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    pub content: &'a str,
    pub title: &'a str,
}

/// Compiled templates keyed by name.
pub struct TemplateRegistry {
    tera: Tera,
    names: Vec<String>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        // Content is already HTML
        tera.autoescape_on(Vec::new());

        Self {
            tera,
            names: Vec::new(),
        }
    }

    /// Loads `<source_dir>/_templates/<name>.html` for every template the
    /// inputs reference. All of them are compiled before anything is built.
    pub fn load(inputs: &[InputFile], source_dir: &Path) -> Result<Self, TemplateError> {
        let mut registry = Self::default();
        let templates_dir = source_dir.join(TEMPLATES_DIR);

        for name in referenced_templates(inputs) {
            let path = templates_dir.join(format!("{name}.html"));
            let source = std::fs::read_to_string(&path).map_err(|source| TemplateError::Read {
                name: name.to_string(),
                path: path.clone(),
                source,
            })?;

            registry.add(name, &source)?;
            info!("[LOADED]  {name}");
        }

        Ok(registry)
    }

    /// Compiles `source` under `name`.
    pub fn add(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        self.tera
            .add_raw_template(name, source)
            .map_err(|source| TemplateError::Parse {
                name: name.to_string(),
                source,
            })?;

        if !self.contains(name) {
            self.names.push(name.to_string());
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Template names in load order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn render(&self, name: &str, ctx: &RenderContext) -> Result<String, TemplateError> {
        let render_err = |source| TemplateError::Render {
            name: name.to_string(),
            source,
        };

        let context = Context::from_serialize(ctx).map_err(render_err)?;
        self.tera.render(name, &context).map_err(render_err)
    }
}

/// Distinct template names in first-seen order.
fn referenced_templates(inputs: &[InputFile]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for name in inputs.iter().filter_map(InputFile::template_name) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
