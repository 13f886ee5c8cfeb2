//! User-Agent header value.

use std::sync::OnceLock;

const CLIENT_NAME: &str = env!("CARGO_PKG_NAME");
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

static USER_AGENT: OnceLock<String> = OnceLock::new();

/// Returns the User-Agent for API requests, computed once.
///
/// Format: `hauler/0.1.0 (rust/1.92; linux/x86_64)`
pub fn user_agent() -> &'static str {
    USER_AGENT.get_or_init(|| {
        format!(
            "{}/{} ({}; {}/{})",
            CLIENT_NAME,
            CLIENT_VERSION,
            rust_version(),
            os_name(),
            std::env::consts::ARCH,
        )
    })
}

/// Returns the User-Agent with a caller-supplied suffix appended.
pub fn user_agent_with(suffix: Option<&str>) -> String {
    match suffix.map(str::trim).filter(|s| !s.is_empty()) {
        Some(suffix) => format!("{} {}", user_agent(), suffix),
        None => user_agent().to_owned(),
    }
}

fn rust_version() -> &'static str {
    concat!("rust/", env!("CARGO_PKG_RUST_VERSION"))
}

fn os_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_format() {
        let ua = user_agent();
        assert!(ua.starts_with("hauler/"));
        assert!(ua.contains("rust/"));
        assert!(ua.contains(std::env::consts::ARCH));
        assert!(ua.contains('(') && ua.ends_with(')'));
    }

    #[test]
    fn test_user_agent_cached() {
        assert!(std::ptr::eq(user_agent(), user_agent()));
    }

    #[test]
    fn test_user_agent_suffix() {
        assert_eq!(user_agent_with(None), user_agent());
        assert_eq!(user_agent_with(Some("  ")), user_agent());
        assert!(user_agent_with(Some("ci/1")).ends_with(") ci/1"));
    }
}
