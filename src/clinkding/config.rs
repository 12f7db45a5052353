//! Configuration loading.
//!
//! Values are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the YAML config file (`~/.config/clinkding/config.yaml`, `$XDG_CONFIG_HOME`,
//!    `--config` or `LINKDING_CONFIG`)
//! 3. environment (`LINKDING_URL`, `LINKDING_TOKEN`, `NO_COLOR`)
//! 4. command-line flags
//!
//! The environment and flag layers arrive together as [`Overrides`]; clap reads the
//! `LINKDING_*` variables so an explicit flag always wins. The resolved [`Config`] is
//! built once and passed by reference to everything that needs it.

use crate::error::{Error, Result};
use crate::output::OutputMode;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "clinkding";
const CONFIG_FILENAME: &str = "config.yaml";
pub const DEFAULT_BOOKMARK_LIMIT: u32 = 100;

/// Output format requested by the config file when no flag is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Auto,
    Human,
    Json,
    Plain,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Auto => "auto",
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Plain => "plain",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_bookmark_limit")]
    pub bookmark_limit: u32,
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_bookmark_limit() -> u32 {
    DEFAULT_BOOKMARK_LIMIT
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            bookmark_limit: DEFAULT_BOOKMARK_LIMIT,
            output_format: OutputFormat::Auto,
        }
    }
}

/// On-disk shape of `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub defaults: Defaults,
}

impl ConfigFile {
    /// Reads `path`, returning an empty config when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loaded config file");
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Writes the file, creating parent directories. On Unix the file is readable by the owner only.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Error::filesystem(dir, e))?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).map_err(|e| Error::filesystem(path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(|e| Error::filesystem(path, e))?;
        }
        Ok(())
    }
}

/// Environment and command-line values layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub json: bool,
    pub plain: bool,
    pub no_color: bool,
    pub quiet: bool,
    pub verbose: bool,
}

/// The resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub path: PathBuf,
    pub url: String,
    pub token: String,
    pub json: bool,
    pub plain: bool,
    pub no_color: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from(CONFIG_FILENAME),
            url: String::new(),
            token: String::new(),
            json: false,
            plain: false,
            no_color: false,
            quiet: false,
            verbose: false,
            defaults: Defaults::default(),
        }
    }
}

impl Config {
    /// Loads the config file and applies `overrides` and `NO_COLOR`.
    pub fn load(overrides: Overrides) -> Result<Self> {
        let path = match &overrides.config_path {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        let file = ConfigFile::load(&path)?;
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Ok(Self::resolve(path, file, overrides, no_color_env))
    }

    /// Layers `overrides` over `file`. Empty override strings do not clear file values.
    pub fn resolve(path: PathBuf, file: ConfigFile, overrides: Overrides, no_color_env: bool) -> Self {
        let pick = |over: Option<String>, file: Option<String>| {
            over.filter(|v| !v.trim().is_empty())
                .or(file)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            path,
            url: pick(overrides.url, file.url),
            token: pick(overrides.token, file.token),
            json: overrides.json,
            plain: overrides.plain,
            no_color: overrides.no_color || no_color_env,
            quiet: overrides.quiet,
            verbose: overrides.verbose,
            defaults: file.defaults,
        }
    }

    /// Fails with an actionable message when the URL or token is missing.
    pub fn require_credentials(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::Config(
                "linkding URL not configured. Use --url, set LINKDING_URL, or run: clinkding config init".into(),
            ));
        }
        if self.token.is_empty() {
            return Err(Error::Config(
                "API token not configured. Use --token, set LINKDING_TOKEN, or run: clinkding config init".into(),
            ));
        }
        Ok(())
    }

    /// JSON beats plain beats human; the config file decides when no flag is set.
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            return OutputMode::Json;
        }
        if self.plain {
            return OutputMode::Plain;
        }
        match self.defaults.output_format {
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
            OutputFormat::Auto | OutputFormat::Human => OutputMode::Human,
        }
    }
}

/// `$XDG_CONFIG_HOME/clinkding/config.yaml`, falling back to `~/.config`.
pub fn default_config_path() -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    config_path_from(xdg, home)
}

fn config_path_from(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf> {
    let base = match (xdg_config_home, home) {
        (Some(xdg), _) => xdg,
        (None, Some(home)) => home.join(".config"),
        (None, None) => {
            return Err(Error::Config(
                "could not determine home directory; pass --config".into(),
            ))
        }
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Masks all but the first and last four characters of a token.
pub fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    match chars.len() {
        0 => "(not set)".to_string(),
        n if n <= 8 => "****".to_string(),
        n => {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{}****{}", head, tail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(url: &str, token: &str) -> ConfigFile {
        ConfigFile {
            url: Some(url.into()),
            token: Some(token.into()),
            defaults: Defaults::default(),
        }
    }

    #[test]
    fn test_default_defaults() {
        let defaults = Defaults::default();
        assert_eq!(defaults.bookmark_limit, 100);
        assert_eq!(defaults.output_format, OutputFormat::Auto);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ConfigFile::load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(loaded, ConfigFile::default());
    }

    #[test]
    fn test_load_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "url: https://links.example.com\ndefaults:\n  output_format: plain\n",
        )
        .unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.url.as_deref(), Some("https://links.example.com"));
        assert_eq!(loaded.token, None);
        assert_eq!(loaded.defaults.bookmark_limit, 100);
        assert_eq!(loaded.defaults.output_format, OutputFormat::Plain);
    }

    #[test]
    fn test_load_invalid_yaml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "defaults: [1, 2\n").unwrap();
        assert!(matches!(ConfigFile::load(&path), Err(Error::ConfigFile(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = file("https://links.example.com", "abc123");
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded, config);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn overrides_beat_file_values() {
        let overrides = Overrides {
            url: Some("https://flag.example.com".into()),
            ..Default::default()
        };
        let config = Config::resolve(
            PathBuf::from("c.yaml"),
            file("https://file.example.com", "file-token"),
            overrides,
            false,
        );
        assert_eq!(config.url, "https://flag.example.com");
        assert_eq!(config.token, "file-token");
    }

    #[test]
    fn blank_override_keeps_file_value() {
        let overrides = Overrides {
            token: Some("  ".into()),
            ..Default::default()
        };
        let config = Config::resolve(PathBuf::new(), file("u", "file-token"), overrides, false);
        assert_eq!(config.token, "file-token");
    }

    #[test]
    fn no_color_env_disables_color() {
        let config = Config::resolve(PathBuf::new(), ConfigFile::default(), Overrides::default(), true);
        assert!(config.no_color);
    }

    #[test]
    fn output_mode_precedence() {
        let mut config = Config::default();
        assert_eq!(config.output_mode(), OutputMode::Human);

        config.defaults.output_format = OutputFormat::Plain;
        assert_eq!(config.output_mode(), OutputMode::Plain);

        config.json = true;
        config.plain = true;
        assert_eq!(config.output_mode(), OutputMode::Json);

        config.json = false;
        config.defaults.output_format = OutputFormat::Json;
        assert_eq!(config.output_mode(), OutputMode::Plain);
    }

    #[test]
    fn missing_credentials_are_reported() {
        let mut config = Config::default();
        let err = config.require_credentials().unwrap_err();
        assert!(err.to_string().contains("URL not configured"));
        assert_eq!(err.exit_code(), 1);

        config.url = "https://links.example.com".into();
        let err = config.require_credentials().unwrap_err();
        assert!(err.to_string().contains("token not configured"));

        config.token = "t".into();
        assert!(config.require_credentials().is_ok());
    }

    #[test]
    fn config_path_prefers_xdg() {
        let path = config_path_from(Some("/xdg".into()), Some("/home/me".into())).unwrap();
        assert_eq!(path, PathBuf::from("/xdg/clinkding/config.yaml"));

        let path = config_path_from(None, Some("/home/me".into())).unwrap();
        assert_eq!(path, PathBuf::from("/home/me/.config/clinkding/config.yaml"));

        assert!(config_path_from(None, None).is_err());
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(redact_token(""), "(not set)");
        assert_eq!(redact_token("short"), "****");
        assert_eq!(redact_token("12345678"), "****");
        assert_eq!(redact_token("abcd1234efgh5678"), "abcd****5678");
    }
}
