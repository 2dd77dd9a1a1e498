//! Types shared between discovery providers and the routing consumer.
//!
//! A provider turns whatever it observes into [`RoutingRule`] values and tags
//! them with its [`ProviderId`]; the consumer owns merging and serving.

mod status;

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use status::{StatusVocabulary, Transition};

/// Identifies which kind of discovery provider produced a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Rules derived from running Docker containers.
    Docker,
}

impl ProviderId {
    /// Stable lowercase tag for logs and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Docker => "docker",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps matching requests to a destination URL template.
///
/// `src_match` is matched against the request path; its capture groups are
/// referenced positionally (`$1`, `$2`, ...) from `dst`. Expanding the
/// template is the consumer's job.
#[derive(Debug, Clone)]
pub struct RoutingRule {
    server: String,
    src_match: Regex,
    dst: String,
}

impl RoutingRule {
    /// Server name that matches every host.
    pub const ANY_SERVER: &'static str = "*";

    /// Create a rule from an already compiled source pattern.
    #[must_use]
    pub fn new(server: impl Into<String>, src_match: Regex, dst: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            src_match,
            dst: dst.into(),
        }
    }

    /// Hostname the rule is restricted to, or `*`.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Compiled source pattern.
    #[must_use]
    pub const fn src_match(&self) -> &Regex {
        &self.src_match
    }

    /// Destination template.
    #[must_use]
    pub fn dst(&self) -> &str {
        &self.dst
    }

    /// Returns `true` when the rule applies to requests for `host`.
    #[must_use]
    pub fn matches_server(&self, host: &str) -> bool {
        self.server == Self::ANY_SERVER || self.server == host
    }
}
