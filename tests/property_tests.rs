#[cfg(test)]
mod property_tests {
    use lander::exploration::EpsilonSchedule;
    use lander::frame_stack::FrameStack;
    use lander::replay_memory::{ReplayMemory, Transition};
    use ndarray::{Array1, Array2};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const FEATURE_DIM: usize = 3;

    // Strategy for a sequence of (observation, is_new_episode) updates
    fn updates_strategy() -> impl Strategy<Value = Vec<(Vec<f32>, bool)>> {
        prop::collection::vec(
            (prop::collection::vec(-10.0f32..10.0, FEATURE_DIM), any::<bool>()),
            1..40,
        )
    }

    fn transition(id: usize) -> Transition {
        Transition {
            state: Array2::zeros((2, 2)),
            action: 0,
            reward: id as f32,
        }
    }

    proptest! {
        #[test]
        fn test_frame_stack_keeps_its_size(stack_size in 1usize..20, updates in updates_strategy()) {
            let mut stack = FrameStack::new(stack_size, FEATURE_DIM);
            for (obs, new_episode) in updates {
                let (state, next) = stack.update(Array1::from(obs).view(), new_episode).unwrap();
                prop_assert_eq!(next.len(), stack_size);
                prop_assert_eq!(state.dim(), (FEATURE_DIM, stack_size));
                stack = next;
            }
        }

        #[test]
        fn test_reset_fills_with_copies(
            stack_size in 1usize..20,
            updates in updates_strategy(),
            obs in prop::collection::vec(-10.0f32..10.0, FEATURE_DIM),
        ) {
            let mut stack = FrameStack::new(stack_size, FEATURE_DIM);
            for (o, new_episode) in updates {
                stack = stack.update(Array1::from(o).view(), new_episode).unwrap().1;
            }

            let observation = Array1::from(obs);
            let (state, stack) = stack.update(observation.view(), true).unwrap();
            prop_assert!(stack.frames().all(|f| f == &observation));
            for column in state.columns() {
                prop_assert_eq!(column.to_owned(), observation.clone());
            }
        }

        #[test]
        fn test_epsilon_is_monotonic_and_bounded(
            min in 0.0f32..0.5,
            span in 0.0f32..0.5,
            decay in 0.0f64..0.01,
            a in 0u64..10_000_000,
            b in 0u64..10_000_000,
        ) {
            let schedule = EpsilonSchedule::new(min, min + span, decay).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (e_lo, e_hi) = (schedule.epsilon(lo), schedule.epsilon(hi));
            prop_assert!(e_lo + 1e-6 >= e_hi);
            prop_assert!(e_lo >= schedule.min_epsilon && e_lo <= schedule.max_epsilon);
            prop_assert!(e_hi >= schedule.min_epsilon && e_hi <= schedule.max_epsilon);
        }

        #[test]
        fn test_replay_eviction(capacity in 1usize..50, extra in 0usize..50) {
            let mut memory = ReplayMemory::new(capacity);
            for id in 0..capacity + extra {
                memory.append(transition(id));
            }
            prop_assert_eq!(memory.len(), capacity);
            let ids: Vec<usize> = memory.iter().map(|t| t.reward as usize).collect();
            let expected: Vec<usize> = (extra..capacity + extra).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn test_sampling_distinctness(size in 1usize..100, fraction in 0.0f64..=1.0, seed in any::<u64>()) {
            let mut memory = ReplayMemory::new(200);
            for id in 0..size {
                memory.append(transition(id));
            }
            let n = ((size as f64 * fraction) as usize).min(size);
            let batch = memory.sample(n, &mut StdRng::seed_from_u64(seed)).unwrap();

            prop_assert_eq!(batch.len(), n);
            let ids: HashSet<usize> = batch.iter().map(|t| t.reward as usize).collect();
            prop_assert_eq!(ids.len(), n);
        }
    }
}
