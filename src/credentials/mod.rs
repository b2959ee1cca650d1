use crate::error::Error;

/// Environment variables checked for a GitHub token, in order.
pub const ENV_TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// Pick the first non-blank token from `lookup` over `ENV_TOKEN_VARS`.
pub fn resolve_token_with<F>(lookup: F) -> Result<String, Error>
where
    F: Fn(&str) -> Option<String>,
{
    ENV_TOKEN_VARS
        .iter()
        .find_map(|name| non_blank(lookup(name)))
        .ok_or_else(|| {
            Error::Config(format!(
                "must set {}=<github token>",
                ENV_TOKEN_VARS.join(" or ")
            ))
        })
}

/// Read the GitHub token from the environment.
///
/// A missing token is a startup-time configuration error.
pub fn get_token_from_env() -> Result<String, Error> {
    resolve_token_with(|name| std::env::var(name).ok())
}
