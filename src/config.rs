use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub voice: VoiceConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct VoiceConfig {
    /// Provider-side assistant the calls are started with.
    pub assistant_id: String,

    /// Delay between an end request and the provider stop, in milliseconds.
    pub grace_delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct GenerationConfig {
    /// Model name passed to the text-generation service.
    pub model: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
