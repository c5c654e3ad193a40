use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use dumbo_core::MarkdownConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DumboConfig {
    /// Markdown conversion (from dumbo-core)
    pub markdown: MarkdownConfig,
}

impl DumboConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (DUMBO_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        Self::load_with_env(args, environment())
    }

    fn load_with_env(args: &ArgMatches, env: Environment) -> Result<Self> {
        // 1. Start with defaults
        let mut builder =
            ConfigBuilder::builder().add_source(ConfigBuilder::try_from(&Self::default())?);

        // 2. Add configuration file if it exists
        if let Some(config_file) = args.get_one::<String>("config")
            && Path::new(config_file).exists()
        {
            builder = builder.add_source(File::new(config_file, FileFormat::Toml));
        }

        // 3. Add environment variables with DUMBO_ prefix
        builder = builder.add_source(env);

        // 4. Override with CLI arguments (highest priority)
        if let Some(theme) = args.get_one::<String>("syntax-theme") {
            builder = builder.set_override("markdown.syntax_theme", theme.as_str())?;
        }
        if args.get_flag("no-highlight") {
            builder = builder.set_override("markdown.highlight", false)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("DUMBO")
        .prefix_separator("_")
        .separator("__") // Use double underscore for nested keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::build::make_command;
    use tempfile::TempDir;

    fn matches(args: &[&str]) -> ArgMatches {
        make_command()
            .try_get_matches_from(std::iter::once("dumbo").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = DumboConfig::default();
        assert!(config.markdown.highlight);
        assert_eq!(config.markdown.syntax_theme, "base16-ocean.dark");
    }

    #[test]
    fn test_cli_args_override() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let missing = missing.to_str().unwrap();

        let config = DumboConfig::load(&matches(&[
            "/custom/source",
            "/custom/output",
            "--config",
            missing,
            "--no-highlight",
        ]))
        .unwrap();

        assert!(!config.markdown.highlight);
        // Should still have defaults for non-overridden values
        assert_eq!(config.markdown.syntax_theme, "base16-ocean.dark");
    }

    #[test]
    fn test_config_file_is_layered_under_cli() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("dumbo.toml");
        std::fs::write(
            &file,
            "[markdown]\nsyntax_theme = \"InspiredGitHub\"\nhighlight = false\n",
        )
        .unwrap();

        let config = DumboConfig::load(&matches(&[
            "in",
            "out",
            "--config",
            file.to_str().unwrap(),
            "--syntax-theme",
            "Solarized (dark)",
        ]))
        .unwrap();

        assert_eq!(config.markdown.syntax_theme, "Solarized (dark)");
        assert!(!config.markdown.highlight);
    }

    #[test]
    fn test_env_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("dumbo.toml");
        std::fs::write(
            &file,
            "[markdown]\nsyntax_theme = \"InspiredGitHub\"\nhighlight = true\n",
        )
        .unwrap();

        let mut vars = config::Map::new();
        vars.insert("DUMBO_MARKDOWN__HIGHLIGHT".to_string(), "false".to_string());

        let args = matches(&["in", "out", "--config", file.to_str().unwrap()]);
        let config = DumboConfig::load_with_env(&args, environment().source(Some(vars))).unwrap();

        assert!(!config.markdown.highlight);
        assert_eq!(config.markdown.syntax_theme, "InspiredGitHub");
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut vars = config::Map::new();
        vars.insert("DUMBO_MARKDOWN__SYNTAX_THEME".to_string(), "InspiredGitHub".to_string());

        let args = matches(&["in", "out", "--syntax-theme", "Solarized (dark)"]);
        let config = DumboConfig::load_with_env(&args, environment().source(Some(vars))).unwrap();

        assert_eq!(config.markdown.syntax_theme, "Solarized (dark)");
        assert!(config.markdown.highlight);
    }
}
