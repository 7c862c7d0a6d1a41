use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub quiz: QuizConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub recordings_dir: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizConfig {
    pub option_count: usize,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "voicedesk".to_string(),
            },
            audio: AudioConfig {
                sample_rate: 48_000,
                channels: 2,
                recordings_dir: "recordings".to_string(),
                cache_dir: "cache".to_string(),
            },
            quiz: QuizConfig {
                option_count: 5,
                themes: Vec::new(),
            },
        }
    }
}
