//! Property tests: wrapping a service never changes what callers observe.
//!
//! Random sequences of operations run against two identical in-memory apps,
//! one wrapped and one not. Every response (success or failure) must match,
//! and the wrapped app must emit exactly one event per successful mutation.

mod common;

use beacon_realtime::{RealtimeConfig, install};
use beacon_service::{App, Id, MemoryService, Method, Params, ServiceCall};
use common::RecordingPublisher;
use serde_json::{Map, Value};

#[derive(Clone, Debug)]
enum Op {
    Create(Map<String, Value>),
    Get(u64),
    Patch(u64, Map<String, Value>),
    Remove(u64),
    Find,
}

impl Op {
    fn call(&self) -> ServiceCall {
        let params = Params::default();
        match self {
            Op::Create(data) => ServiceCall::Create {
                data: Value::Object(data.clone()),
                params,
            },
            Op::Get(id) => ServiceCall::Get {
                id: Id::from(*id),
                params,
            },
            Op::Patch(id, data) => ServiceCall::Patch {
                id: Some(Id::from(*id)),
                data: Value::Object(data.clone()),
                params,
            },
            Op::Remove(id) => ServiceCall::Remove {
                id: Some(Id::from(*id)),
                params,
            },
            Op::Find => ServiceCall::Find { params },
        }
    }
}

fn memory_app() -> App {
    let mut app = App::new();
    app.use_service("items", MemoryService::new()).unwrap();
    app
}

mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_object() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..4usize).prop_map(|fields| {
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()
        })
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            arb_object().prop_map(Op::Create),
            (0..6u64).prop_map(Op::Get),
            (0..6u64, arb_object()).prop_map(|(id, data)| Op::Patch(id, data)),
            (0..6u64).prop_map(Op::Remove),
            Just(Op::Find),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// The wrapped service answers every call exactly like the plain one.
        #[test]
        fn prop_wrapped_responses_match_unwrapped(ops in prop::collection::vec(arb_op(), 1..24usize)) {
            let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
            rt.block_on(async {
                let plain = memory_app();
                let mut wrapped = memory_app();
                let publisher = RecordingPublisher::new();
                install(
                    &mut wrapped,
                    "items",
                    RealtimeConfig::default().with_publisher(publisher.clone()),
                )
                .expect("install");

                let mut mutations = 0;
                for op in &ops {
                    let expected = plain.dispatch("items", op.call()).await;
                    let actual = wrapped.dispatch("items", op.call()).await;
                    if actual.is_ok() && op.call().method().is_mutating() {
                        mutations += 1;
                    }
                    prop_assert_eq!(actual, expected, "op {:?}", op);
                }

                let events = publisher.events();
                prop_assert_eq!(events.len(), mutations);
                for event in &events {
                    prop_assert!(event.method != Method::Get && event.method != Method::Find);
                }
                Ok(())
            })?;
        }
    }
}
