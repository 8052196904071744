use std::path::PathBuf;

/// Service configuration: compiled defaults overridden from the
/// environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address. Port 0 asks the OS for an ephemeral port, which the
    /// discovery file then records.
    pub listen_addr: String,
    /// Directory holding the trained artifact bundle.
    pub model_dir: PathBuf,
    /// One-line discovery file recording the bound endpoint URL.
    pub endpoint_file: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:0".to_string(),
            model_dir: PathBuf::from("models"),
            endpoint_file: PathBuf::from("endpoint.dat"),
        }
    }
}

impl ServiceConfig {
    pub fn load() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_non_empty("DGA_LISTEN_ADDR") {
            self.listen_addr = v;
        }
        if let Some(v) = env_non_empty("DGA_MODEL_DIR") {
            self.model_dir = PathBuf::from(v);
        }
        if let Some(v) = env_non_empty("DGA_ENDPOINT_FILE") {
            self.endpoint_file = PathBuf::from(v);
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
