use serde::{Deserialize, Serialize};

use super::category::StateCategory;
use crate::constants::ALL_STATES;
use crate::error::{MonitorError, MonitorResult};

/// Raw scheduler states grouped by category.
///
/// The four lists must be disjoint; [`StateTaxonomy::validate`] enforces it
/// at configuration load time. A state listed nowhere classifies as
/// [`StateCategory::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateTaxonomy {
    pub success_states: Vec<String>,
    pub failed_states: Vec<String>,
    pub running_states: Vec<String>,
    pub stopped_states: Vec<String>,
}

impl Default for StateTaxonomy {
    fn default() -> Self {
        let owned = |states: &[&str]| states.iter().map(|s| (*s).to_string()).collect();
        Self {
            success_states: owned(&["success"]),
            failed_states: owned(&["failed"]),
            running_states: owned(&["queued", "running", "restarting", "up_for_retry"]),
            stopped_states: owned(&["shutdown", "upstream_failed", "skipped"]),
        }
    }
}

impl StateTaxonomy {
    /// Classify a raw state. Missing states are `Unknown`.
    pub fn classify(&self, raw_state: Option<&str>) -> StateCategory {
        let Some(state) = raw_state else {
            return StateCategory::Unknown;
        };

        [
            StateCategory::Success,
            StateCategory::Failed,
            StateCategory::Running,
            StateCategory::Stopped,
        ]
        .into_iter()
        .find(|category| self.states_for(*category).iter().any(|s| s == state))
        .unwrap_or(StateCategory::Unknown)
    }

    /// Raw states belonging to one category. `Unknown` has none.
    pub fn states_for(&self, category: StateCategory) -> &[String] {
        match category {
            StateCategory::Success => &self.success_states,
            StateCategory::Failed => &self.failed_states,
            StateCategory::Running => &self.running_states,
            StateCategory::Stopped => &self.stopped_states,
            StateCategory::Unknown => &[],
        }
    }

    /// Expand categories into the concrete raw states they cover, in
    /// request order with duplicates removed.
    ///
    /// Callers must not route "no filter" requests through here; see
    /// [`StateFilter`].
    pub fn expand_categories(&self, categories: &[StateCategory]) -> Vec<String> {
        let mut states: Vec<String> = Vec::new();
        for category in categories {
            for state in self.states_for(*category) {
                if !states.contains(state) {
                    states.push(state.clone());
                }
            }
        }
        states
    }

    pub fn validate(&self) -> MonitorResult<()> {
        let groups = [
            ("success_states", &self.success_states),
            ("failed_states", &self.failed_states),
            ("running_states", &self.running_states),
            ("stopped_states", &self.stopped_states),
        ];

        for (i, (name, states)) in groups.iter().enumerate() {
            for (other_name, other_states) in groups.iter().skip(i + 1) {
                if let Some(shared) = states.iter().find(|s| other_states.contains(s)) {
                    return Err(MonitorError::Configuration(format!(
                        "task state '{shared}' is listed in both {name} and {other_name}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Caller-requested state filter.
///
/// Filters match raw states only. `unknown` is accepted but expands to no
/// raw states, so a filter of just `unknown` matches no task, even though
/// aggregated counts place NULL and unlisted states under `unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateFilter {
    /// No filtering: `"all"`, an empty list, or no parameter at all
    All,
    Categories(Vec<StateCategory>),
}

impl StateFilter {
    /// Parse a comma-separated list of category names such as
    /// `"success,failed"`. `"all"` anywhere in the list wins.
    pub fn parse(param: Option<&str>) -> MonitorResult<Self> {
        let names: Vec<&str> = param
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() || names.iter().any(|name| name.eq_ignore_ascii_case(ALL_STATES)) {
            return Ok(Self::All);
        }

        let mut categories = Vec::with_capacity(names.len());
        for name in names {
            let category = name
                .to_ascii_lowercase()
                .parse::<StateCategory>()
                .map_err(MonitorError::InvalidInput)?;
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(Self::Categories(categories))
    }

    /// Raw states to hand to a query collaborator; `None` means unfiltered.
    pub fn raw_states(&self, taxonomy: &StateTaxonomy) -> Option<Vec<String>> {
        match self {
            Self::All => None,
            Self::Categories(categories) => Some(taxonomy.expand_categories(categories)),
        }
    }
}
