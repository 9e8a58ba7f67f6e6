use std::env;
use std::time::Duration;

pub const DEFAULT_MAP_ENDPOINT: &str = "https://restapi.amap.com/v3";
pub const DEFAULT_GENERATION_ENDPOINT: &str =
    "https://api.hunyuan.cloud.tencent.com/v1/chat/completions";
pub const DEFAULT_GENERATION_MODEL: &str = "hunyuan-lite";
pub const DEFAULT_RADIUS_M: u32 = 3000;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_REASON_DEADLINE_MS: u64 = 5000;

/// Process-wide configuration, built once at startup and injected into
/// every component. Nothing below this layer reads the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Map-search credential; the pipeline refuses to search without it.
    pub map_key: Option<String>,
    pub map_endpoint: String,
    pub default_radius_m: u32,
    pub page_size: u32,
    /// Generation credential; absent means the generative strategy is off.
    pub generation_api_key: Option<String>,
    pub generation_endpoint: String,
    pub generation_model: String,
    /// Wall-clock budget for enriching one whole batch.
    pub reason_deadline: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            map_key: None,
            map_endpoint: DEFAULT_MAP_ENDPOINT.to_string(),
            default_radius_m: DEFAULT_RADIUS_M,
            page_size: DEFAULT_PAGE_SIZE,
            generation_api_key: None,
            generation_endpoint: DEFAULT_GENERATION_ENDPOINT.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            reason_deadline: Duration::from_millis(DEFAULT_REASON_DEADLINE_MS),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            map_key: env::var("NEARBY_MAP_KEY")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            map_endpoint: env::var("NEARBY_MAP_ENDPOINT").unwrap_or(defaults.map_endpoint),
            default_radius_m: env::var("NEARBY_DEFAULT_RADIUS_M")
                .ok()
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|value| *value > 0)
                .unwrap_or(defaults.default_radius_m),
            page_size: env::var("NEARBY_PAGE_SIZE")
                .ok()
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|value| *value > 0)
                .unwrap_or(defaults.page_size),
            generation_api_key: env::var("NEARBY_LLM_API_KEY")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            generation_endpoint: env::var("NEARBY_LLM_ENDPOINT")
                .unwrap_or(defaults.generation_endpoint),
            generation_model: env::var("NEARBY_LLM_MODEL").unwrap_or(defaults.generation_model),
            reason_deadline: Duration::from_millis(
                env::var("NEARBY_REASON_DEADLINE_MS")
                    .ok()
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_REASON_DEADLINE_MS),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ServiceConfig::default();
        assert!(config.map_key.is_none());
        assert_eq!(config.default_radius_m, 3000);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.reason_deadline, Duration::from_millis(5000));
    }
}
