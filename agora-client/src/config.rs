use anyhow::{anyhow, Context};

use crate::api::{AuthToken, Uuid};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Server root, without the trailing `/api`
    pub host: String,

    pub token: Option<AuthToken>,

    /// Page size used when the caller does not pick one
    pub page_size: u32,

    /// Retries of transient transport failures, per call
    pub max_retries: u32,
}

impl ClientConfig {
    pub fn new(host: String) -> ClientConfig {
        ClientConfig {
            host,
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Reads `AGORA_HOST`, and optionally `AGORA_TOKEN`, `AGORA_PAGE_SIZE`
    /// and `AGORA_MAX_RETRIES`
    pub fn from_env() -> anyhow::Result<ClientConfig> {
        ClientConfig::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the optional `AGORA_TOKEN`
    pub fn token_from_env() -> anyhow::Result<Option<AuthToken>> {
        parse_token(std::env::var("AGORA_TOKEN").ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<ClientConfig> {
        let host = lookup("AGORA_HOST")
            .ok_or_else(|| anyhow!("AGORA_HOST environment variable must be set"))?;
        let mut config = ClientConfig::new(host);
        config.token = parse_token(lookup("AGORA_TOKEN"))?;
        if let Some(size) = lookup("AGORA_PAGE_SIZE") {
            config.page_size = size.parse().context("parsing AGORA_PAGE_SIZE")?;
            if config.page_size == 0 {
                return Err(anyhow!("AGORA_PAGE_SIZE must be at least 1"));
            }
        }
        if let Some(retries) = lookup("AGORA_MAX_RETRIES") {
            config.max_retries = retries.parse().context("parsing AGORA_MAX_RETRIES")?;
        }
        Ok(config)
    }
}

fn parse_token(raw: Option<String>) -> anyhow::Result<Option<AuthToken>> {
    raw.map(|tok| {
        Uuid::try_parse(&tok)
            .map(AuthToken)
            .context("parsing AGORA_TOKEN as an auth token")
    })
    .transpose()
}
