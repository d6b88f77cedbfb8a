use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConfigLoadError;
use crate::models::ClientConfig;
use crate::sources::{CONFIG_JSON_VAR, EnvConfig};

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["reelsift.toml", "reelsift.json", "config/reelsift.toml"];

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    /// `--config` on the command line.
    Explicit(PathBuf),
    /// `REELSIFT_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// `REELSIFT_CONFIG_JSON`.
    EnvInline,
    /// A default candidate file found relative to the working directory.
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "built-in defaults"),
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::EnvPath(path) => {
                write!(f, "{} (REELSIFT_CONFIG_PATH)", path.display())
            }
            ConfigSource::EnvInline => write!(f, "{CONFIG_JSON_VAR}"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Default, Clone)]
struct ConfigLoaderOptions {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    /// Directory default candidate files are resolved against. Defaults to
    /// the working directory.
    search_root: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: ClientConfig,
    pub source: ConfigSource,
    pub env_file_loaded: bool,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_search_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.search_root = Some(path.into());
        self
    }

    /// Load `.env`, gather the process environment and resolve the
    /// configuration.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolve the configuration against an already captured environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (mut config, source) = self.resolve(&env)?;

        if let Some(url) = env.backend_url {
            debug!(url = %url, "backend URL overridden from environment");
            config.backend.base_url = url;
        }
        if let Some(key) = env.api_key {
            config.backend.api_key = Some(key);
        }

        let config = config.validate()?;
        info!(source = %source, base_url = %config.backend.base_url, "loaded client configuration");

        Ok(ConfigLoad {
            config,
            source,
            env_file_loaded: false,
        })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if let Some(path) = &self.options.env_file {
            dotenvy::from_path(path)?;
            debug!(path = %path.display(), "loaded env file");
            return Ok(true);
        }
        // A missing .env in the working directory is normal.
        match dotenvy::dotenv() {
            Ok(_) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn resolve(
        &self,
        env: &EnvConfig,
    ) -> Result<(ClientConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.options.config_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        if let Some(path) = &env.config_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::EnvPath(path.clone())));
        }

        if let Some(raw) = &env.config_json {
            let config = ClientConfig::parse_json(raw, CONFIG_JSON_VAR)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((ClientConfig::default(), ConfigSource::Default))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        let root = self.options.search_root.as_deref().unwrap_or(Path::new(""));
        DEFAULT_CONFIG_LOCATIONS
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.exists())
    }
}

/// Read a TOML or JSON file, picking the format from the extension.
pub fn load_from_file(path: &Path) -> Result<ClientConfig, ConfigLoadError> {
    if !path.exists() {
        return Err(ConfigLoadError::MissingConfig {
            path: path.to_path_buf(),
        });
    }
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = path.display().to_string();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ClientConfig::parse_json(&contents, &origin),
        Some("toml") | Some("tml") => ClientConfig::parse_toml(&contents, &origin),
        _ => ClientConfig::parse_from_str(&contents, &origin),
    }
}
