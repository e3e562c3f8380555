use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub redis: RedisSettings,
    pub storage: StorageSettings,
    pub openai: OpenAiSettings,
    pub workflow: WorkflowSettings,
    pub poller: PollerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub transcribe_model: String,
    pub summary_model: String,
}

/// Retry/flow-control policy for the workflow engine. Retry delay grows as
/// `retry_delay_ms * 2^attempt`; flow control caps each user to
/// `parallelism` concurrent runs and `rate` starts per `period_secs`.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowSettings {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub parallelism: usize,
    pub rate: u32,
    pub period_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollerSettings {
    pub interval_ms: u64,
    pub max_wait_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("AMBIENCE"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("storage.endpoint", "http://localhost:9000/upload")?
            .set_default("openai.base_url", "https://api.openai.com/v1")?
            .set_default("openai.transcribe_model", "whisper-1")?
            .set_default("openai.summary_model", "gpt-4o-audio-preview")?
            .set_default("workflow.max_retries", 3)?
            .set_default("workflow.retry_delay_ms", 1000)?
            .set_default("workflow.parallelism", 2)?
            .set_default("workflow.rate", 10)?
            .set_default("workflow.period_secs", 60)?
            .set_default("poller.interval_ms", 2000)?
            .set_default("poller.max_wait_secs", 600)?
            .build()?;

        config.try_deserialize()
    }
}
