use std::path::PathBuf;

pub const CONFIG_PATH_VAR: &str = "REELSIFT_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "REELSIFT_CONFIG_JSON";
pub const BACKEND_URL_VAR: &str = "REELSIFT_BACKEND_URL";
pub const API_KEY_VAR: &str = "REELSIFT_API_KEY";

/// Configuration-relevant environment, captured once so loading stays a
/// pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub config_json: Option<String>,
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
}

fn non_blank(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_blank(CONFIG_PATH_VAR).map(PathBuf::from),
            config_json: non_blank(CONFIG_JSON_VAR),
            backend_url: non_blank(BACKEND_URL_VAR),
            api_key: non_blank(API_KEY_VAR),
        }
    }
}
