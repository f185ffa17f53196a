//! Shape catalog
//!
//! The editor draws a closed set of system-design shapes. Each kind has its
//! own semantic property schema; the catalog is a tagged enum rather than a
//! class-style hierarchy so the extractor only ever needs the tag and the
//! property mapping.

use serde::{Deserialize, Serialize};

/// Kind tag carried by a shape record's `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Persistent data store
    Database,
    /// Application server
    Server,
    /// Load balancer
    LoadBalancer,
    /// End-user client
    Client,
    /// In-memory cache
    Cache,
    /// Connector between two shapes
    Arrow,
    /// Any tag outside the catalog (kept verbatim)
    Other(String),
}

impl ShapeKind {
    /// Parse a raw `type` tag from the document.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "database" => Self::Database,
            "server" => Self::Server,
            "loadBalancer" => Self::LoadBalancer,
            "client" => Self::Client,
            "cache" => Self::Cache,
            "arrow" => Self::Arrow,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag as it appears in the document.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Database => "database",
            Self::Server => "server",
            Self::LoadBalancer => "loadBalancer",
            Self::Client => "client",
            Self::Cache => "cache",
            Self::Arrow => "arrow",
            Self::Other(tag) => tag,
        }
    }

    /// Connectors become edges, not nodes.
    #[inline]
    #[must_use]
    pub fn is_connector(&self) -> bool {
        matches!(self, Self::Arrow)
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Database engine variants selectable on a database shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    /// PostgreSQL
    Postgres,
    /// MySQL
    Mysql,
    /// MongoDB
    Mongodb,
    /// Redis
    Redis,
}

/// Client platform variants selectable on a client shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientPlatform {
    /// Native mobile app
    Mobile,
    /// Browser client
    Web,
}

/// Properties of a database shape as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProps {
    /// Visual width
    pub w: f64,
    /// Visual height
    pub h: f64,
    /// Selected engine
    pub db_type: DatabaseEngine,
    /// User-visible label
    pub label: String,
}

/// Properties of a client shape as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProps {
    /// Visual width
    pub w: f64,
    /// Visual height
    pub h: f64,
    /// Selected platform
    pub client_type: ClientPlatform,
    /// User-visible label
    pub label: String,
}

/// Properties shared by server, load-balancer and cache shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledProps {
    /// Visual width
    pub w: f64,
    /// Visual height
    pub h: f64,
    /// User-visible label
    pub label: String,
}
