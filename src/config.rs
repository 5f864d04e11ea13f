use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

/// OpenFoodFacts product database used for barcode lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodDbConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub food_db: FoodDbConfig,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "nutrilog"),
            audience: env_or("JWT_AUDIENCE", "nutrilog-users"),
            ttl_minutes: env_parse_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: env_or("MINIO_BUCKET", "food-images"),
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
            region: env_or("MINIO_REGION", "us-east-1"),
        };
        let llm = LlmConfig {
            api_key: std::env::var("ANTHROPIC_API_KEY")?,
            base_url: env_or("ANTHROPIC_BASE_URL", "https://api.anthropic.com"),
            model: env_or("ANTHROPIC_MODEL", "claude-3-5-haiku-20241022"),
            max_tokens: env_parse_or("ANTHROPIC_MAX_TOKENS", 2048),
        };
        let food_db = FoodDbConfig {
            base_url: env_or("OPENFOODFACTS_BASE_URL", "https://world.openfoodfacts.org"),
            timeout_secs: env_parse_or("OPENFOODFACTS_TIMEOUT_SECS", 10),
        };
        let allowed_origins = split_origins(&env_or("ALLOWED_ORIGINS", ""));
        Ok(Self {
            database_url,
            jwt,
            storage,
            llm,
            food_db,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_origins(" http://localhost:5173 ,,https://app.example.com"),
            vec!["http://localhost:5173", "https://app.example.com"]
        );
        assert!(split_origins("").is_empty());
    }
}
