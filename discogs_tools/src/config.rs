use diggers_common::Secret;
use log::*;

#[derive(Debug, Clone)]
pub struct DiscogsConfig {
    pub api_base: String,
    pub user_agent: String,
    /// Personal access token for the catalog API. Sent as `Authorization: Discogs token=...`.
    pub token: Secret<String>,
    /// Preferred currency for marketplace prices, sent as the `Accept-Currency` header.
    pub currency: String,
    /// Client-side call budget per minute. The catalog enforces 60/min for authenticated clients; staying well
    /// under it leaves headroom for the rest of the application.
    pub max_calls_per_minute: u32,
}

impl Default for DiscogsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.discogs.com".to_string(),
            user_agent: format!("diggers/{}", env!("CARGO_PKG_VERSION")),
            token: Secret::default(),
            currency: "EUR".to_string(),
            max_calls_per_minute: 25,
        }
    }
}

impl DiscogsConfig {
    pub fn new_from_env_or_default() -> Self {
        let mut config = Self::default();
        if let Ok(api_base) = std::env::var("DGG_DISCOGS_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(user_agent) = std::env::var("DGG_DISCOGS_USER_AGENT") {
            config.user_agent = user_agent;
        }
        match std::env::var("DGG_DISCOGS_TOKEN") {
            Ok(token) => config.token = Secret::new(token),
            Err(_) => warn!("DGG_DISCOGS_TOKEN not set. Only unauthenticated catalog calls will succeed"),
        }
        if let Ok(currency) = std::env::var("DGG_DISCOGS_CURRENCY") {
            config.currency = currency;
        }
        if let Ok(max_calls) = std::env::var("DGG_DISCOGS_MAX_CALLS_PER_MINUTE") {
            match max_calls.parse::<u32>() {
                Ok(n) if n > 0 => config.max_calls_per_minute = n,
                _ => warn!("DGG_DISCOGS_MAX_CALLS_PER_MINUTE is not a positive integer, using {}", config.max_calls_per_minute),
            }
        }
        config
    }
}
