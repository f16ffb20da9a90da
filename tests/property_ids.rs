use std::collections::HashSet;

use jobdag::dag::{PetgraphSort, TopologicalSort};
use jobdag::job::{JobBody, JobValidator, StructuralValidator};
use jobdag_test_utils::builders::{JobBodyBuilder, read_drop_write};
use jobdag_test_utils::fixtures::{StaticValidator, TestEnv};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create,
    // Index into the currently live ids, wrapped.
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![3 => Just(Op::Create), 1 => any::<usize>().prop_map(Op::Delete)]
}

// Acyclic by construction: task N only feeds tasks with a higher index.
fn acyclic_body_strategy(max_tasks: usize) -> impl Strategy<Value = JobBody> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(move |raw_edges| {
            let mut builder = JobBodyBuilder::new();
            for i in 0..num_tasks {
                builder = builder.drop_column(&format!("t{i}"), "x");
            }
            for (i, targets) in raw_edges.into_iter().enumerate() {
                let remaining = num_tasks - i - 1;
                if remaining == 0 {
                    continue;
                }
                let unique: HashSet<usize> = targets.into_iter().map(|t| i + 1 + t % remaining).collect();
                for j in unique {
                    builder = builder.edge(&format!("t{i}"), &format!("t{j}"));
                }
            }
            builder.build()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_ids_strictly_increase_and_are_never_reused(
        ops in proptest::collection::vec(op_strategy(), 1..24)
    ) {
        let env = TestEnv::with_validator(Box::new(StaticValidator::accept()));
        let mut live: Vec<u64> = Vec::new();
        let mut issued: HashSet<u64> = HashSet::new();
        let mut last: Option<u64> = None;

        for op in ops {
            match op {
                Op::Create => {
                    let id = env.store.create(read_drop_write("in.csv", "x", "out.csv")).unwrap();
                    prop_assert!(issued.insert(id), "id {} issued twice", id);
                    if let Some(prev) = last {
                        prop_assert!(id > prev);
                    }
                    last = Some(id);
                    live.push(id);
                }
                Op::Delete(idx) => {
                    if live.is_empty() {
                        continue;
                    }
                    let id = live.remove(idx % live.len());
                    prop_assert!(env.store.delete(id).unwrap());
                }
            }
        }

        let stored: Vec<u64> = env.store.list().unwrap().iter().map(|r| r.job_id).collect();
        prop_assert_eq!(stored, live);
    }

    #[test]
    fn test_acyclic_jobs_validate_and_sort_consistently(body in acyclic_body_strategy(8)) {
        let verdict = StructuralValidator.validate(&body);
        prop_assert!(verdict.is_valid, "rejected: {:?}", verdict.error);

        let order = PetgraphSort.order(&body.task_list).unwrap();
        prop_assert_eq!(order.len(), body.task_list.len());

        let pos = |name: &str| order.iter().position(|n| n == name).unwrap();
        for (from, targets) in &body.task_list {
            for to in targets {
                prop_assert!(pos(from) < pos(to), "{} must run before {}", from, to);
            }
        }
    }
}
