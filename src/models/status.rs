use serde::{Deserialize, Serialize};

/// Lifecycle of a contracted project. Stored as the snake_case string in Postgres.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Contracted,
    InDevelopment,
    Staging,
    Done,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Contracted => "contracted",
            ProjectStatus::InDevelopment => "in_development",
            ProjectStatus::Staging => "staging",
            ProjectStatus::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "contracted" => Some(ProjectStatus::Contracted),
            "in_development" => Some(ProjectStatus::InDevelopment),
            "staging" => Some(ProjectStatus::Staging),
            "done" => Some(ProjectStatus::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account role. Admins run the back office; associates are client accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Associate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Associate => "associate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "associate" => Some(Role::Associate),
            _ => None,
        }
    }
}
