use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://cloud.oilfield-monitor.com/api/public";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub upstream: UpstreamSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: String,
}

/// Load settings from `config/upstream.*` (optional), overridden by
/// `INVIEW_*` environment variables, e.g. `INVIEW_UPSTREAM__API_KEY`.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(config::File::with_name("config/upstream").required(false))
}

fn load_settings_from<S>(file: S) -> anyhow::Result<Settings>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("upstream.base_url", DEFAULT_BASE_URL)?
        .set_default("upstream.api_key", "")?
        .set_default("upstream.timeout_secs", 30)?
        .set_default("server.listen_addr", "0.0.0.0:8080")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("INVIEW")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
