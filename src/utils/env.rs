use std::str::FromStr;

const PREFIX: &str = "CACHE_FACADE_";

/// Read `CACHE_FACADE_{key}`, falling back to the bare `{key}`
///
/// ```rust,ignore
/// use cache_facade::utils::get_env_with_prefix;
///
/// // CACHE_FACADE_REDIS_HOST wins over REDIS_HOST
/// let host = get_env_with_prefix("REDIS_HOST");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("{PREFIX}{key}"))
        .or_else(|_| std::env::var(key))
        .ok()
}

/// Like [`get_env_with_prefix`], parsed into `T`
///
/// A value that does not parse is logged and treated as unset.
pub fn parse_env_with_prefix<T: FromStr>(key: &str) -> Option<T> {
    let raw = get_env_with_prefix(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment variable");
            None
        }
    }
}
