use std::path::PathBuf;

// Public client key the gateway sends to the Last.fm web API. Callers with
// their own Last.fm application can override it with LASTFM_API_KEY.
const DEFAULT_LASTFM_API_KEY: &str = "9d29de38c39dae02aecde146ea2f3042";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub lastfm_api_key: String,
}

impl Config {
    /// Bind parameters come from the CLI; the Last.fm key comes from the
    /// environment.
    pub fn new(host: String, port: u16, static_dir: PathBuf) -> Self {
        let lastfm_api_key = std::env::var("LASTFM_API_KEY")
            .unwrap_or_else(|_| DEFAULT_LASTFM_API_KEY.to_string());

        Self {
            host,
            port,
            static_dir,
            lastfm_api_key,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
