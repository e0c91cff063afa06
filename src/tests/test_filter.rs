#[cfg(test)]
mod tests {
    use crate::combinations::Strategy;
    use crate::service::FilterResult;
    use crate::tests::common::{sample_service_with, set_record};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{EntityId, PoolId};

    fn seen(values: &[u32]) -> Vec<EntityId> {
        values.iter().copied().map(EntityId).collect()
    }

    #[rstest]
    fn test_filter_with_nothing_seen(#[values(Strategy::ClosedForm, Strategy::Enumerate)] strategy: Strategy) {
        let service = sample_service_with(strategy);

        let result = service.filter("pool_a", &[]).unwrap();

        assert_eq!(result.num_possible_teams, 15);
        assert_eq!(result.seen_global_ids, seen(&[]));
        assert_eq!(result.possible_remaining_global_ids, seen(&[101, 102, 103, 104, 105, 106]));
        // 106 has no backing record and is dropped from the hydrated list only.
        assert_eq!(result.possible_remaining_sets.len(), 5);
    }

    #[rstest]
    fn test_filter_narrows_by_seen(#[values(Strategy::ClosedForm, Strategy::Enumerate)] strategy: Strategy) {
        let service = sample_service_with(strategy);

        // Duplicates and ordering in the request do not matter.
        let result = service.filter("pool_a", &seen(&[104, 101, 104])).unwrap();

        assert_eq!(
            result,
            FilterResult {
                pool_id: PoolId::new("pool_a"),
                seen_global_ids: seen(&[101, 104]),
                num_possible_teams: 6,
                possible_remaining_global_ids: seen(&[102, 103, 105, 106]),
                possible_remaining_sets: vec![
                    set_record(102, "Garchomp"),
                    set_record(103, "Salamence"),
                    set_record(105, "Lucario"),
                ],
            }
        );
    }

    #[rstest]
    fn test_filter_full_team_seen(#[values(Strategy::ClosedForm, Strategy::Enumerate)] strategy: Strategy) {
        let service = sample_service_with(strategy);

        let result = service.filter("pool_a", &seen(&[101, 102, 103, 104])).unwrap();

        assert_eq!(result.num_possible_teams, 1);
        assert!(result.possible_remaining_global_ids.is_empty());
        assert!(result.possible_remaining_sets.is_empty());
    }

    #[rstest]
    #[case::too_many_seen("pool_a", &[101, 102, 103, 104, 105])]
    #[case::seen_from_another_pool("pool_a", &[201])]
    #[case::pool_smaller_than_team("pool_b", &[])]
    fn test_filter_impossible_observations(
        #[case] pool_id: &str,
        #[case] seen_ids: &[u32],
        #[values(Strategy::ClosedForm, Strategy::Enumerate)] strategy: Strategy,
    ) {
        let service = sample_service_with(strategy);

        let result = service.filter(pool_id, &seen(seen_ids)).unwrap();

        assert_eq!(result.num_possible_teams, 0);
        assert!(result.possible_remaining_global_ids.is_empty());
        assert!(result.possible_remaining_sets.is_empty());
        // The echoed seen list is still the sorted request.
        let mut expected = seen(seen_ids);
        expected.sort();
        assert_eq!(result.seen_global_ids, expected);
    }

    #[test]
    fn test_trainer_to_filter_flow() {
        let service = sample_service_with(Strategy::ClosedForm);

        let detail = service.trainer_detail("set4-ximena").unwrap();
        let first_seen = detail.sets[2]["global_id"].as_u64().unwrap() as u32;
        let result = service.filter(detail.pool_id.as_str(), &[EntityId(first_seen)]).unwrap();

        assert_eq!(first_seen, 103);
        assert_eq!(result.num_possible_teams, 10);
        assert_eq!(result.possible_remaining_global_ids.len(), 5);
    }
}
