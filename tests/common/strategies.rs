//! Proptest strategies for state classification.

use proptest::prelude::*;

use dag_monitor::state::{StateCategory, StateTaxonomy};

/// Any raw state the default taxonomy knows about
pub fn known_state_strategy() -> impl Strategy<Value = String> {
    let taxonomy = StateTaxonomy::default();
    let states: Vec<String> = StateCategory::ALL
        .iter()
        .flat_map(|category| taxonomy.states_for(*category).to_vec())
        .collect();
    prop::sample::select(states)
}

/// Lowercase identifiers that are not states in the default taxonomy
pub fn unknown_state_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,20}".prop_filter("must not be a known state", |state| {
        let taxonomy = StateTaxonomy::default();
        taxonomy.classify(Some(state.as_str())) == StateCategory::Unknown
    })
}

pub fn category_strategy() -> impl Strategy<Value = StateCategory> {
    prop::sample::select(StateCategory::ALL.to_vec())
}

/// Category lists without `Unknown`, possibly empty
pub fn category_list_strategy() -> impl Strategy<Value = Vec<StateCategory>> {
    prop::collection::vec(
        prop::sample::select(vec![
            StateCategory::Success,
            StateCategory::Failed,
            StateCategory::Running,
            StateCategory::Stopped,
        ]),
        0..4,
    )
}
