use chrono::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "expense_tracker";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub allowed_origins: Vec<String>,
    pub auth: AuthConfig,
}

/// JWT and password hashing settings shared by the auth service and the gate.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests don't touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("PORT must be a valid port number: {}", e))?,
            None => DEFAULT_PORT,
        };

        // MONGO_URI is what older deployments set
        let database_url = var("DATABASE_URL")
            .or_else(|| var("MONGO_URI"))
            .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        let jwt_secret = var("JWT_SECRET").ok_or_else(|| "JWT_SECRET must be set".to_string())?;
        let ttl_hours = match var("JWT_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .ok_or_else(|| format!("JWT_TTL_HOURS must be a positive integer, got '{}'", raw))?,
            None => 24,
        };
        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .ok_or_else(|| format!("BCRYPT_COST must be between 4 and 31, got '{}'", raw))?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            host,
            port,
            database_url,
            allowed_origins,
            auth: AuthConfig {
                jwt_secret,
                jwt_issuer: var("JWT_ISSUER").unwrap_or_else(|| "expense-tracker".to_string()),
                jwt_audience: var("JWT_AUDIENCE")
                    .unwrap_or_else(|| "expense-tracker-api".to_string()),
                token_ttl: Duration::hours(ttl_hours),
                bcrypt_cost,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database name from the URI path, e.g. `mongodb://host:27017/expenses?retryWrites=true`.
pub fn database_name(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DATABASE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mongodb://localhost:27017/expenses"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.auth.token_ttl, Duration::hours(24));
        assert_eq!(config.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.auth.jwt_issuer, "expense-tracker");
    }

    #[test]
    fn accepts_mongo_uri_alias() {
        let config = Config::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://db/expenses"),
            ("JWT_SECRET", "s3cret"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example ,"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "mongodb://db/expenses");
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[rstest]
    #[case(&[("JWT_SECRET", "s")], "DATABASE_URL must be set")]
    #[case(&[("DATABASE_URL", "mongodb://db")], "JWT_SECRET must be set")]
    fn rejects_missing_required(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
        let err = Config::from_lookup(lookup(pairs)).unwrap_err();
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("PORT", "http")]
    #[case("JWT_TTL_HOURS", "0")]
    #[case("BCRYPT_COST", "2")]
    fn rejects_bad_numbers(#[case] key: &str, #[case] value: &str) {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mongodb://db"),
            ("JWT_SECRET", "s"),
            (key, value),
        ]));
        assert!(result.is_err());
    }

    #[rstest]
    #[case("mongodb://localhost:27017/expenses", "expenses")]
    #[case("mongodb+srv://u:p@cluster.mongodb.net/tracker?retryWrites=true", "tracker")]
    #[case("mongodb://localhost:27017", "expense_tracker")]
    #[case("mongodb://localhost:27017/?authSource=admin", "expense_tracker")]
    fn extracts_database_name(#[case] uri: &str, #[case] expected: &str) {
        assert_eq!(database_name(uri), expected);
    }
}
