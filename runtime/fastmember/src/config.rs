//! Runtime configuration.
//!
//! Both config structs default to the documented behavior and can be
//! overridden from the environment with `from_env()`.

/// Environment variable overriding `AccessConfig::static_requires_instance`.
pub const STATIC_REQUIRES_INSTANCE_VAR: &str = "FASTMEMBER_STATIC_REQUIRES_INSTANCE";

/// Environment variable overriding `RegistryConfig::seed_on_attach`.
pub const SEED_REGISTRY_VAR: &str = "FASTMEMBER_SEED_REGISTRY";

/// Configuration for `MemberAccess`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessConfig {
    /// Static method calls must still supply an instance (which the method
    /// ignores). When `false`, only instance methods require one.
    pub static_requires_instance: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig {
            static_requires_instance: true,
        }
    }
}

impl AccessConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(flag) = env_flag(STATIC_REQUIRES_INSTANCE_VAR) {
            config.static_requires_instance = flag;
        }
        config
    }
}

/// Configuration for `TypeRegistry`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Scan the modules already available when the registry attaches.
    /// Without seeding, those modules are only reached by fallback scans.
    pub seed_on_attach: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            seed_on_attach: true,
        }
    }
}

impl RegistryConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(flag) = env_flag(SEED_REGISTRY_VAR) {
            config.seed_on_attach = flag;
        }
        config
    }
}

fn env_flag(var: &str) -> Option<bool> {
    std::env::var(var).ok().and_then(|raw| parse_flag(&raw))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_documented_contract() {
        assert!(AccessConfig::default().static_requires_instance);
        assert!(RegistryConfig::default().seed_on_attach);
    }

    // No other test in this crate reads these variables.
    #[test]
    fn test_from_env_reads_variables() {
        std::env::set_var(STATIC_REQUIRES_INSTANCE_VAR, "0");
        std::env::set_var(SEED_REGISTRY_VAR, "false");
        let access = AccessConfig::from_env();
        let registry = RegistryConfig::from_env();

        std::env::set_var(STATIC_REQUIRES_INSTANCE_VAR, "bogus");
        std::env::remove_var(SEED_REGISTRY_VAR);
        let fallback_access = AccessConfig::from_env();
        let fallback_registry = RegistryConfig::from_env();
        std::env::remove_var(STATIC_REQUIRES_INSTANCE_VAR);

        assert!(!access.static_requires_instance);
        assert!(!registry.seed_on_attach);
        assert_eq!(fallback_access, AccessConfig::default());
        assert_eq!(fallback_registry, RegistryConfig::default());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
