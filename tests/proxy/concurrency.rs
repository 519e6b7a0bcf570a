//! A registry shared between threads.

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_first_creation_synthesizes_once() {
    let registry = Arc::new(ProxyRegistry::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut foo = registry.create::<Foo>().unwrap();
                let log = record(&mut foo);
                foo.set("X", format!("thread-{}", i)).unwrap();
                assert_eq!(names(&log), vec!["X"]);
                Arc::clone(foo.synthesized_type())
            })
        })
        .collect();

    let types: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(types.iter().all(|ty| Arc::ptr_eq(ty, &types[0])));
    assert_eq!(registry.syntheses(), 1);
}

#[test]
fn concurrent_creation_of_many_contracts() {
    let registry = Arc::new(ProxyRegistry::new());
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..10 {
                    match i % 2 {
                        0 => {
                            registry.create::<Foo>().unwrap();
                            registry.create::<IPerson>().unwrap();
                        }
                        _ => {
                            registry.create::<IPerson>().unwrap();
                            registry.create::<Customer>().unwrap();
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.cached_types(), 3);
    assert_eq!(registry.syntheses(), 3);
}

#[test]
fn instance_can_move_between_threads() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();
    let log = record(&mut foo);

    let foo = thread::spawn(move || {
        foo.set("Y", "from another thread").unwrap();
        foo
    })
    .join()
    .unwrap();

    assert_eq!(foo.get("Y").unwrap(), Value::from("from another thread"));
    assert_eq!(names(&log), vec!["Y"]);
}
