//! Testing utilities for OB workspace
//!
//! Shared test handles, fixtures, and a recording destroyer.

#![allow(missing_docs)]

use ob_registry::{Handle, Registry};
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

/// Handle to a fake host entity
///
/// Clones share the entity: equality is identity (`id`), and killing one
/// clone kills them all.
#[derive(Debug, Clone)]
pub struct TestObject {
    pub id: u32,
    pub name: String,
    alive: Rc<Cell<bool>>,
}

impl TestObject {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            alive: Rc::new(Cell::new(true)),
        }
    }

    /// Simulate the host destroying the entity
    pub fn kill(&self) {
        self.alive.set(false);
    }
}

impl PartialEq for TestObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Handle for TestObject {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name.as_str())
    }

    fn is_live(&self) -> bool {
        self.alive.get()
    }
}

/// Objects with ids `0..` and the given names
pub fn objects(names: &[&str]) -> Vec<TestObject> {
    names
        .iter()
        .zip(0u32..)
        .map(|(name, id)| TestObject::new(id, name))
        .collect()
}

/// Registry keyed by position over [`objects`]
pub fn bundle(names: &[&str]) -> (Registry<TestObject>, Vec<TestObject>) {
    let objs = objects(names);
    (Registry::from_items(objs.clone()), objs)
}

/// Destroyer that kills each handle and records the destruction order
#[derive(Debug, Default, Clone)]
pub struct Graveyard {
    buried: Rc<RefCell<Vec<u32>>>,
}

impl Graveyard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destroy(&self, obj: TestObject) {
        obj.kill();
        self.buried.borrow_mut().push(obj.id);
    }

    /// Ids in destruction order
    pub fn buried(&self) -> Vec<u32> {
        self.buried.borrow().clone()
    }
}

/// Install a fmt subscriber honouring `RUST_LOG`, once per process
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
