//! The cached standard environment under concurrent first use.

use filter_env::{EnvBuilder, Type, standard_env};
use std::{sync::Arc, thread};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_concurrent_callers_share_one_environment() {
    let envs: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(standard_env)).collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked").expect("standard env builds"))
            .collect()
    });

    for env in &envs[1..] {
        assert!(Arc::ptr_eq(&envs[0], env));
    }
}

#[test]
fn test_custom_environment_is_built_independently() {
    let standard = standard_env().unwrap();
    let custom = EnvBuilder::new()
        .with_subject("row")
        .with_variable("now", Type::Timestamp)
        .build()
        .unwrap();

    assert_eq!(standard.subject(), "i");
    assert_eq!(custom.subject(), "row");
    assert_eq!(custom.variable("now"), Some(&Type::Timestamp));
    assert_eq!(standard.variable("now"), None);
}
