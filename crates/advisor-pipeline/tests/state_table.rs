//! Property tests for the pipeline state table

use advisor_model::Stage;
use advisor_pipeline::{allowed_transitions, validate_transition, PipelineState};
use proptest::prelude::*;

fn any_state() -> impl Strategy<Value = PipelineState> {
    (0..PipelineState::ALL.len()).prop_map(|i| PipelineState::ALL[i])
}

proptest! {
    #[test]
    fn validate_agrees_with_table(from in any_state(), to in any_state()) {
        let allowed = allowed_transitions(from).contains(&to);
        prop_assert_eq!(validate_transition(from, to).is_ok(), allowed);
    }

    #[test]
    fn non_terminal_states_have_one_successor_and_one_failure(from in any_state()) {
        let next = allowed_transitions(from);
        match from.stage() {
            Some(stage) => {
                prop_assert_eq!(next.len(), 2);
                prop_assert!(next.contains(&PipelineState::Failed(stage)));
                let forward = next
                    .iter()
                    .filter(|s| !matches!(s, PipelineState::Failed(_)))
                    .count();
                prop_assert_eq!(forward, 1);
            }
            None => prop_assert!(next.is_empty()),
        }
    }

    #[test]
    fn no_state_transitions_to_itself(state in any_state()) {
        prop_assert!(validate_transition(state, state).is_err());
    }
}

#[test]
fn forward_walk_visits_every_stage_then_done() {
    let mut state = PipelineState::Validating;
    let mut visited = Vec::new();

    while let Some(stage) = state.stage() {
        visited.push(stage);
        state = allowed_transitions(state)
            .into_iter()
            .find(|s| !matches!(s, PipelineState::Failed(_)))
            .unwrap();
    }

    assert_eq!(visited, Stage::ALL.to_vec());
    assert_eq!(state, PipelineState::Done);
}
