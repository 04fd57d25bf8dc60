use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category a raw task-instance state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateCategory {
    Success,
    Failed,
    /// Queued, running, or waiting for a retry
    Running,
    /// Skipped, shut down, or blocked by an upstream failure
    Stopped,
    /// Any state the taxonomy does not list, including a missing state
    Unknown,
}

impl StateCategory {
    pub const ALL: [StateCategory; 5] = [
        Self::Success,
        Self::Failed,
        Self::Running,
        Self::Stopped,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid state category: {s}")),
        }
    }
}

/// Per-category task counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub success: i64,
    pub failed: i64,
    pub running: i64,
    pub stopped: i64,
    pub unknown: i64,
}

impl CategoryCounts {
    pub fn increment(&mut self, category: StateCategory) {
        match category {
            StateCategory::Success => self.success += 1,
            StateCategory::Failed => self.failed += 1,
            StateCategory::Running => self.running += 1,
            StateCategory::Stopped => self.stopped += 1,
            StateCategory::Unknown => self.unknown += 1,
        }
    }

    pub fn get(&self, category: StateCategory) -> i64 {
        match category {
            StateCategory::Success => self.success,
            StateCategory::Failed => self.failed,
            StateCategory::Running => self.running,
            StateCategory::Stopped => self.stopped,
            StateCategory::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> i64 {
        self.success + self.failed + self.running + self.stopped + self.unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_string_conversion() {
        for category in StateCategory::ALL {
            assert_eq!(category.as_str().parse::<StateCategory>().unwrap(), category);
        }
        assert!("all".parse::<StateCategory>().is_err());
        assert!("Success".parse::<StateCategory>().is_err());
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&StateCategory::Stopped).unwrap();
        assert_eq!(json, "\"stopped\"");
    }

    #[test]
    fn test_counts_increment_and_total() {
        let mut counts = CategoryCounts::default();
        counts.increment(StateCategory::Success);
        counts.increment(StateCategory::Success);
        counts.increment(StateCategory::Unknown);

        assert_eq!(counts.get(StateCategory::Success), 2);
        assert_eq!(counts.get(StateCategory::Unknown), 1);
        assert_eq!(counts.get(StateCategory::Failed), 0);
        assert_eq!(counts.total(), 3);
    }
}
