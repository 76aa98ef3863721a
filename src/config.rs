/// Process-wide feature flags, loaded once at startup and passed explicitly
/// to the components that need them.
///
/// Recognized environment variables (truthy values are exactly `"1"` or
/// `"true"`, default false):
/// - `QUICK`       — run a lightweight scan (`--headers`)
/// - `DEBUG`       — verbose internal logging
/// - `CONSOLE_LOG` — echo the scan's console output to our own stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    pub quick: bool,
    pub debug: bool,
    pub console_log: bool,
}

impl Config {
    /// Read the flags from the process environment.
    pub fn from_env() -> Self {
        Self {
            quick: env_truthy("QUICK"),
            debug: env_truthy("DEBUG"),
            console_log: env_truthy("CONSOLE_LOG"),
        }
    }
}

fn env_truthy(name: &str) -> bool {
    match std::env::var(name) {
        Ok(v) => truthy(&v),
        Err(_) => false,
    }
}

fn truthy(v: &str) -> bool {
    v == "1" || v == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_and_true_are_truthy() {
        assert!(truthy("1"));
        assert!(truthy("true"));
        assert!(!truthy("TRUE"));
        assert!(!truthy("yes"));
        assert!(!truthy("0"));
        assert!(!truthy(""));
    }

    #[test]
    fn default_is_all_off() {
        let cfg = Config::default();
        assert!(!cfg.quick && !cfg.debug && !cfg.console_log);
    }
}
