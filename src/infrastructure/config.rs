use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub anthropic: AnthropicSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnthropicSettings {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

/// Load config/app.toml with environment overrides, e.g.
/// CSV_INSIGHT__ANTHROPIC__API_KEY for the API key.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8000")?
        .set_default("anthropic.host", "https://api.anthropic.com")?
        .set_default("anthropic.api_key", "")?
        .set_default("anthropic.model", "claude-3-5-sonnet-20241022")?
        .set_default("anthropic.max_tokens", 4000)?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("CSV_INSIGHT")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_config_file() {
        let config = load_app_config().unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8000");
        assert_eq!(config.anthropic.host, "https://api.anthropic.com");
        assert_eq!(config.anthropic.max_tokens, 4000);
    }
}
