//! Property tests for fan-out and grouping

use std::collections::HashSet;

use livingdoc::prelude::*;
use proptest::prelude::*;

const IDS: [&str; 4] = ["A", "B", "C", "D"];

prop_compose! {
    fn arb_records()(
        specs in prop::collection::vec(
            (
                prop::collection::vec(0usize..IDS.len(), 1..6),
                prop::collection::vec("[a-z ]{1,12}", 0..3),
                prop::option::of("[a-z]{1,8}"),
            ),
            0..12,
        )
    ) -> Vec<TypeAnnotationRecord> {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (ids, notes, stereotype))| {
                let mut payload = AnnotationPayload::new();
                if let Some(stereotype) = stereotype {
                    payload = payload.with_stereotype(stereotype);
                }
                TypeAnnotationRecord::new(
                    TypeReference::class(format!("com.example.T{}", i)),
                    ids.into_iter().map(|n| IDS[n]),
                )
                .with_payload(payload)
                .with_notes(notes.into_iter().map(Note::new))
            })
            .collect()
    }
}

proptest! {
    #[test]
    fn fan_out_produces_one_full_copy_per_membership(records in arb_records()) {
        let aggregator = Aggregator::new();
        for record in &records {
            let fanned = aggregator.fan_out(record).unwrap();
            prop_assert_eq!(fanned.len(), record.diagram_ids().len());

            let fanned_ids: HashSet<_> = fanned.iter().map(|f| f.diagram_id.clone()).collect();
            let record_ids: HashSet<_> = record.diagram_ids().iter().cloned().collect();
            prop_assert_eq!(fanned_ids, record_ids);

            for part in &fanned {
                prop_assert_eq!(&part.type_ref, record.type_ref());
                prop_assert_eq!(&part.payload, record.payload());
                prop_assert_eq!(part.notes.as_slice(), record.notes());
            }
        }
    }

    #[test]
    fn grouping_loses_and_duplicates_nothing(records in arb_records()) {
        let groups = Aggregator::new().aggregate(&records).unwrap();

        let expected: usize = records.iter().map(|r| r.diagram_ids().len()).sum();
        prop_assert_eq!(groups.member_count(), expected);

        for (id, members) in &groups {
            for member in members {
                prop_assert_eq!(&member.diagram_id, id);
            }
            let names: HashSet<_> = members.iter().map(|m| m.type_ref.qualified_name()).collect();
            prop_assert_eq!(names.len(), members.len());
        }

        for record in &records {
            for id in record.diagram_ids() {
                let members = groups.get(id).unwrap();
                let hits = members.iter().filter(|m| &m.type_ref == record.type_ref()).count();
                prop_assert_eq!(hits, 1);
            }
        }
    }

    #[test]
    fn group_members_follow_processing_order(records in arb_records()) {
        let groups = Aggregator::new().aggregate(&records).unwrap();
        for (id, members) in &groups {
            let expected: Vec<_> = records
                .iter()
                .filter(|r| r.diagram_ids().contains(id))
                .map(|r| r.type_ref().qualified_name())
                .collect();
            let actual: Vec<_> = members.iter().map(|m| m.type_ref.qualified_name()).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn models_do_not_depend_on_discovery_order(
        (records, shuffled) in arb_records().prop_flat_map(|records| {
            let shuffled = Just(records.clone()).prop_shuffle();
            (Just(records), shuffled)
        })
    ) {
        let pipeline = Pipeline::with_plantuml();
        let settings = MemorySettings::new();

        let first = pipeline.build_models(&StaticSource::new(records), &settings).unwrap();
        let second = pipeline.build_models(&StaticSource::new(shuffled), &settings).unwrap();
        prop_assert_eq!(first, second);
    }
}
