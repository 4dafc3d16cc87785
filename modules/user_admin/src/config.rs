use serde::{Deserialize, Serialize};

/// Configuration for the user_admin module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserAdminConfig {
    /// Load the built-in profiles at startup.
    #[serde(default = "default_true")]
    pub seed_profiles: bool,
    /// Load the built-in users at startup.
    #[serde(default = "default_true")]
    pub seed_users: bool,
}

impl Default for UserAdminConfig {
    fn default() -> Self {
        Self {
            seed_profiles: default_true(),
            seed_users: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: UserAdminConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg, UserAdminConfig::default());
        assert!(cfg.seed_profiles && cfg.seed_users);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_value::<UserAdminConfig>(serde_json::json!({
            "seed_profiles": false,
            "seed_everything": true
        }))
        .unwrap_err();
        assert!(err.to_string().contains("seed_everything"));
    }
}
