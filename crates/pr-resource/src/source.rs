//! Source configuration
//!
//! The `source` block of a pipeline's resource definition. It is decoded
//! from the request on stdin and is immutable for one operation.

use crate::error::{ResourceError, Result};
use gitea_client::StateFilter;
use serde::{Deserialize, Serialize};

/// Filter criteria and connection settings for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Source {
    /// Repository as "owner/name"
    pub repository: String,

    /// Base URL of the Gitea instance (e.g., "https://codeberg.org")
    pub endpoint: String,

    /// API token; may be left empty when provided by the environment
    pub access_token: String,

    /// Only trigger on PRs touching at least one of these patterns
    pub paths: Vec<String>,

    /// Do not trigger on PRs touching only these patterns
    pub ignore_paths: Vec<String>,

    /// Which PRs to consider
    pub state: StateFilter,

    /// Trigger even when the title or latest commit asks to skip CI
    pub disable_ci_skip: bool,

    /// Only trigger on PRs targeting this branch
    pub base_branch: Option<String>,

    /// Only trigger on PRs carrying at least one of these labels
    pub labels: Vec<String>,
}

impl Source {
    /// Reject configurations that cannot address a repository
    pub fn validate(&self) -> Result<()> {
        if self.repository.is_empty() {
            return Err(ResourceError::InvalidSource(
                "repository must be set".to_string(),
            ));
        }
        gitea_client::parse_repository(&self.repository)
            .map_err(|e| ResourceError::InvalidSource(e.to_string()))?;

        if self.endpoint.is_empty() {
            return Err(ResourceError::InvalidSource(
                "endpoint must be set".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured base branch, treating an empty string as unset
    pub fn base_branch(&self) -> Option<&str> {
        self.base_branch.as_deref().filter(|b| !b.is_empty())
    }

    /// Whether changed files are needed to decide on a PR
    pub fn has_path_filters(&self) -> bool {
        !self.paths.is_empty() || !self.ignore_paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_source() -> Source {
        Source {
            repository: "owner/repo".to_string(),
            endpoint: "https://gitea.example.com".to_string(),
            access_token: "oauthtoken".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_deserialize_minimal_source_uses_defaults() {
        let source: Source = serde_json::from_str(
            r#"{"repository": "owner/repo", "endpoint": "https://gitea.example.com"}"#,
        )
        .unwrap();

        assert_eq!(source.state, StateFilter::Open);
        assert!(!source.disable_ci_skip);
        assert!(source.paths.is_empty());
        assert!(source.labels.is_empty());
        assert_eq!(source.base_branch(), None);
    }

    #[test]
    fn test_deserialize_full_source() {
        let source: Source = serde_json::from_str(
            r#"{
                "repository": "owner/repo",
                "endpoint": "https://gitea.example.com",
                "access_token": "oauthtoken",
                "paths": ["src/*"],
                "ignore_paths": ["docs"],
                "state": "all",
                "disable_ci_skip": true,
                "base_branch": "develop",
                "labels": ["enhancement"]
            }"#,
        )
        .unwrap();

        assert_eq!(source.state, StateFilter::All);
        assert!(source.disable_ci_skip);
        assert_eq!(source.base_branch(), Some("develop"));
        assert_eq!(source.paths, vec!["src/*".to_string()]);
        assert!(source.has_path_filters());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_str::<Source>(
            r#"{"repository": "owner/repo", "skip_ssl_verification": true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_state_is_rejected() {
        let result =
            serde_json::from_str::<Source>(r#"{"repository": "owner/repo", "state": "merged"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(valid_source().validate().is_ok());

        let missing_repository = Source {
            repository: String::new(),
            ..valid_source()
        };
        assert_eq!(
            missing_repository.validate().unwrap_err().to_string(),
            "invalid source configuration: repository must be set"
        );

        let malformed_repository = Source {
            repository: "owner".to_string(),
            ..valid_source()
        };
        assert!(malformed_repository.validate().is_err());

        let missing_endpoint = Source {
            endpoint: String::new(),
            ..valid_source()
        };
        assert_eq!(
            missing_endpoint.validate().unwrap_err().to_string(),
            "invalid source configuration: endpoint must be set"
        );
    }

    #[test]
    fn test_empty_base_branch_is_unset() {
        let source = Source {
            base_branch: Some(String::new()),
            ..valid_source()
        };
        assert_eq!(source.base_branch(), None);
    }
}
