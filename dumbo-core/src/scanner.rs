use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use walkdir::WalkDir;

/// Directory holding template sources. Never scanned as content.
pub const TEMPLATES_DIR: &str = "_templates";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not scan '{}'", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("could not extract template name from path '{}'", .0.display())]
    MissingTemplate(PathBuf),
    #[error("invalid path: '{}'", .0.display())]
    InvalidPath(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Copied through to the output untouched.
    Html,
    /// Converted to HTML and wrapped in the named template.
    Markdown { template: String },
}

/// A source file discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub source: PathBuf,
    /// Output location relative to the output root, without extension.
    pub dest: PathBuf,
    pub kind: InputKind,
}

impl InputFile {
    pub fn template_name(&self) -> Option<&str> {
        match &self.kind {
            InputKind::Html => None,
            InputKind::Markdown { template } => Some(template),
        }
    }

    /// `<output_dir>/<dest>.html`
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        let mut out = output_dir.join(&self.dest).into_os_string();
        out.push(".html");
        PathBuf::from(out)
    }
}

pub struct SiteScanner {
    source_dir: PathBuf,
}

impl SiteScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source_dir: path.as_ref().to_path_buf(),
        }
    }

    /// Walks the source tree in file-name order and classifies every HTML and
    /// Markdown file. Anything else is ignored.
    pub fn scan(&self) -> Result<Vec<InputFile>, ScanError> {
        debug!("Scanning: {}", self.source_dir.display());

        let mut inputs = Vec::new();

        let walker = WalkDir::new(&self.source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == TEMPLATES_DIR));

        for entry in walker {
            let entry = entry.map_err(|err| ScanError::Walk {
                path: err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.source_dir.clone()),
                source: err,
            })?;

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if let Some(input) = self.scan_file(path)? {
                debug!(
                    "[VISITED] {} (kind: {:?})",
                    input.source.display(),
                    input.kind
                );
                inputs.push(input);
            }
        }

        Ok(inputs)
    }

    fn scan_file(&self, path: &Path) -> Result<Option<InputFile>, ScanError> {
        // Suffix match so bare `.md` and `.html` names are classified too
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        let kind = if file_name.ends_with(".html") {
            InputKind::Html
        } else if file_name.ends_with(".md") {
            InputKind::Markdown {
                template: template_name(path)?,
            }
        } else {
            return Ok(None);
        };

        Ok(Some(InputFile {
            source: path.to_path_buf(),
            dest: dest_path(&self.source_dir, path)?,
            kind,
        }))
    }
}

/// Strips the source root and everything from the first `.` of the file name.
///
/// `site/a/b/index.html` becomes `a/b/index`, `site/a/page.en.md` becomes `a/page`.
fn dest_path(source_dir: &Path, path: &Path) -> Result<PathBuf, ScanError> {
    let relative = path
        .strip_prefix(source_dir)
        .map_err(|_| ScanError::InvalidPath(path.to_path_buf()))?;

    let file_name = relative
        .file_name()
        .ok_or_else(|| ScanError::InvalidPath(path.to_path_buf()))?
        .to_string_lossy();
    let stem = file_name.split('.').next().unwrap_or_default();

    Ok(match relative.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    })
}

/// The second-to-last dot segment of the file name: `post.blog.md` uses `blog`.
fn template_name(path: &Path) -> Result<String, ScanError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ScanError::InvalidPath(path.to_path_buf()))?
        .to_string_lossy();

    let segments: Vec<&str> = file_name.split('.').collect();
    match segments.as_slice() {
        [.., _, name, _] if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ScanError::MissingTemplate(path.to_path_buf())),
    }
}
