//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `LOAN_DESK_*` environment variables or a
//! configuration file, in that order of precedence.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::TransitionPolicy;

const DEFAULT_PORT: u16 = 8080;

/// Configuration values controlling the loan desk server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOAN_DESK")]
pub struct ServiceSettings {
    /// Socket address to listen on; `0.0.0.0:8080` when unset.
    pub bind_addr: Option<SocketAddr>,
    /// Directory holding `applications.json`. Records live in memory only
    /// when unset.
    pub data_dir: Option<PathBuf>,
    /// Replace the collection with the sample applications on startup.
    #[ortho_config(default = false)]
    pub seed_samples: bool,
    /// Refuse status changes on applications that are already decided.
    #[ortho_config(default = false)]
    pub enforce_transitions: bool,
}

impl ServiceSettings {
    /// Return the configured listen address, falling back to the default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Server-side transition policy implied by `enforce_transitions`.
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.enforce_transitions {
            TransitionPolicy::Enforced
        } else {
            TransitionPolicy::ClientTrusted
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for service configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("loan-desk")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("LOAN_DESK_BIND_ADDR", None::<String>),
            ("LOAN_DESK_DATA_DIR", None::<String>),
            ("LOAN_DESK_SEED_SAMPLES", None::<String>),
            ("LOAN_DESK_ENFORCE_TRANSITIONS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert!(settings.data_dir.is_none());
        assert!(!settings.seed_samples);
        assert_eq!(settings.transition_policy(), TransitionPolicy::ClientTrusted);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("LOAN_DESK_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("LOAN_DESK_DATA_DIR", Some("/var/lib/loan-desk".to_owned())),
            ("LOAN_DESK_SEED_SAMPLES", Some("true".to_owned())),
            ("LOAN_DESK_ENFORCE_TRANSITIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(settings.data_dir, Some(PathBuf::from("/var/lib/loan-desk")));
        assert!(settings.seed_samples);
        assert_eq!(settings.transition_policy(), TransitionPolicy::Enforced);
    }
}
