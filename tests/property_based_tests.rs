mod common;

use common::strategies::*;
use proptest::prelude::*;

use dag_monitor::aggregation::{aggregate, running_max_totals};
use dag_monitor::state::{StateCategory, StateFilter, StateTaxonomy};
use dag_monitor::table_name::extract_target_name;

proptest! {
    /// Property: every configured state classifies into its own category
    #[test]
    fn known_states_classify_into_their_category(category in category_strategy()) {
        let taxonomy = StateTaxonomy::default();
        for state in taxonomy.states_for(category) {
            prop_assert_eq!(taxonomy.classify(Some(state.as_str())), category);
        }
    }

    /// Property: configured states are never reported as unknown
    #[test]
    fn known_states_never_classify_as_unknown(state in known_state_strategy()) {
        let taxonomy = StateTaxonomy::default();
        prop_assert_ne!(taxonomy.classify(Some(state.as_str())), StateCategory::Unknown);
    }

    /// Property: per-run category counts always sum to the run's task count
    #[test]
    fn counts_sum_to_task_count(states in prop::collection::vec(
        prop_oneof![known_state_strategy(), unknown_state_strategy()], 0..30)
    ) {
        let tasks: Vec<(String, String)> = states
            .iter()
            .enumerate()
            .map(|(i, state)| (format!("task_{i}.py-TO-table_{i}"), state.clone()))
            .collect();
        let borrowed: Vec<(&str, &str)> = tasks.iter().map(|(t, s)| (t.as_str(), s.as_str())).collect();
        let fetched = common::runs(vec![common::run_rows("run_1", "2024-03-01T01:00:00Z", &borrowed)]);

        let summaries = aggregate(&fetched.runs, &fetched.tasks_by_run, &StateTaxonomy::default(), common::offset());
        prop_assert_eq!(summaries.len(), 1);
        prop_assert_eq!(summaries[0].counts.total(), states.len() as i64);
        prop_assert_eq!(summaries[0].scheduled_total, states.len() as i64);
    }

    /// Property: states outside every set fall back to unknown
    #[test]
    fn unlisted_states_are_unknown(state in unknown_state_strategy()) {
        let taxonomy = StateTaxonomy::default();
        prop_assert_eq!(taxonomy.classify(Some(state.as_str())), StateCategory::Unknown);
    }

    /// Property: expanding categories yields exactly states of those categories
    #[test]
    fn expansion_inverts_classification(categories in category_list_strategy()) {
        let taxonomy = StateTaxonomy::default();
        let expanded = taxonomy.expand_categories(&categories);

        for state in &expanded {
            prop_assert!(categories.contains(&taxonomy.classify(Some(state.as_str()))));
        }
        for category in &categories {
            for state in taxonomy.states_for(*category) {
                prop_assert!(expanded.contains(state));
            }
        }
    }

    /// Property: a filter mentioning "all" is never expanded
    #[test]
    fn all_anywhere_disables_filtering(categories in category_list_strategy(), position in 0usize..5) {
        let mut names: Vec<String> = categories.iter().map(|c| c.as_str().to_string()).collect();
        names.insert(position.min(names.len()), "all".to_string());

        let filter = StateFilter::parse(Some(&names.join(","))).unwrap();
        prop_assert_eq!(&filter, &StateFilter::All);
        prop_assert_eq!(filter.raw_states(&StateTaxonomy::default()), None);
    }

    /// Property: extraction returns the text after the last separator
    #[test]
    fn extraction_takes_last_segment(prefix in "[a-z_.]{0,12}", middle in "[a-z_]{0,8}", target in "[a-z_]{1,16}") {
        let task_id = format!("{prefix}-TO-{middle}-TO-{target}");
        prop_assert_eq!(extract_target_name(Some(&task_id)), Some(target.as_str()));
    }

    /// Property: ids without the separator never yield a target
    #[test]
    fn extraction_without_separator_is_absent(task_id in "[a-z_.]{0,24}") {
        prop_assert_eq!(extract_target_name(Some(&task_id)), None);
    }

    /// Property: the running maximum never decreases and dominates each run
    #[test]
    fn running_max_is_monotone(sizes in prop::collection::vec(0i64..50, 0..12)) {
        let summaries: Vec<_> = sizes.iter().enumerate().map(|(i, size)| {
            dag_monitor::aggregation::RunSummary {
                run_id: format!("run_{i}"),
                logical_date_local: None,
                start_date_local: None,
                state: None,
                counts: Default::default(),
                scheduled_total: *size,
            }
        }).collect();

        let totals = running_max_totals(&summaries);
        prop_assert_eq!(totals.len(), sizes.len());
        for (i, total) in totals.iter().enumerate() {
            prop_assert!(*total >= sizes[i]);
            if i > 0 {
                prop_assert!(*total >= totals[i - 1]);
            }
        }
        if let Some(last) = totals.last() {
            prop_assert_eq!(Some(last), sizes.iter().max());
        }
    }
}
