use std::env;

/// Fallback signing secret for local development sessions.
pub const LOCAL_AUTH_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// immutable afterwards. Pulled into handlers and extractors via `FromRef`, as part of
/// the Unified State Pattern.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local auth bypass and developer sign-in.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Shared secret used to validate session tokens issued by the identity provider.
    pub jwt_secret: String,
    // Sign-in entry point of the external identity provider.
    pub auth_provider_url: String,
    // Externally visible base URL of this dashboard, used to build the provider callback.
    pub public_url: String,
    // Origins permitted by the CORS layer.
    pub allowed_origins: Vec<String>,
    // Lifetime of the session cookie in seconds.
    pub session_ttl_secs: u64,
    // Adds the `Secure` attribute to the session cookie.
    pub secure_cookies: bool,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (header bypass, developer sign-in) and the hardened production auth flow.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking configuration for test state scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            jwt_secret: LOCAL_AUTH_SECRET.to_string(),
            auth_provider_url: "http://localhost:3000/auth/dev-signin".to_string(),
            public_url: "http://localhost:3000".to_string(),
            allowed_origins: vec!["localhost:3000".to_string()],
            session_ttl_secs: 86_400,
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables and implements the **fail-fast**
    /// principle.
    ///
    /// # Panics
    /// Panics in production if `AUTH_SECRET`, `AUTH_PROVIDER_URL` or `PUBLIC_URL` is
    /// missing, or if `SESSION_TTL_SECS` is not a number.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let session_ttl_secs = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .expect("FATAL: SESSION_TTL_SECS must be a whole number of seconds."),
            Err(_) => 86_400,
        };

        match env {
            Env::Local => {
                let public_url =
                    env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
                Self {
                    env: Env::Local,
                    bind_addr,
                    // The developer should ideally use the provider's real secret, but local
                    // sessions minted by /auth/dev-signin only need a stable value.
                    jwt_secret: env::var("AUTH_SECRET")
                        .unwrap_or_else(|_| LOCAL_AUTH_SECRET.to_string()),
                    auth_provider_url: env::var("AUTH_PROVIDER_URL")
                        .unwrap_or_else(|_| format!("{}/auth/dev-signin", public_url)),
                    allowed_origins: parse_origins(env::var("ALLOWED_ORIGINS").ok())
                        .unwrap_or_else(|| vec!["localhost:3000".to_string()]),
                    public_url,
                    session_ttl_secs,
                    secure_cookies: false,
                }
            }
            Env::Production => {
                let public_url =
                    env::var("PUBLIC_URL").expect("FATAL: PUBLIC_URL required in prod");
                Self {
                    env: Env::Production,
                    bind_addr,
                    jwt_secret: env::var("AUTH_SECRET")
                        .expect("FATAL: AUTH_SECRET must be set in production."),
                    auth_provider_url: env::var("AUTH_PROVIDER_URL")
                        .expect("FATAL: AUTH_PROVIDER_URL required in prod"),
                    allowed_origins: parse_origins(env::var("ALLOWED_ORIGINS").ok())
                        .unwrap_or_else(|| vec![public_url.clone()]),
                    public_url,
                    session_ttl_secs,
                    secure_cookies: true,
                }
            }
        }
    }

    /// Absolute URL the identity provider redirects back to after sign-in.
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.public_url.trim_end_matches('/'))
    }
}

/// Splits a comma-separated origin list, dropping blanks. `None` when nothing usable remains.
fn parse_origins(raw: Option<String>) -> Option<Vec<String>> {
    let origins: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() { None } else { Some(origins) }
}
