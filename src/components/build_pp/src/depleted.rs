use std::{
    collections::HashSet,
    hash::{DefaultHasher, Hash, Hasher},
    rc::Rc,
};

/*
    Set of macros that have already been used along one expansion path.

    A name that was produced by expanding itself is left alone, so
    self-referential and mutually recursive macros stop expanding instead of
    looping. Tokens produced by the same expansion share one set.
*/

#[derive(Clone, Debug, Default)]
pub struct Depleted {
    hashes: HashSet<u64>,
}

impl Depleted {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// The set for tokens produced by expanding the macro `hash`.
    pub fn with(&self, hash: u64) -> Rc<Self> {
        let mut hashes = self.hashes.clone();
        hashes.insert(hash);
        Rc::new(Self { hashes })
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.hashes.contains(&hash)
    }

    pub fn hash_name(name: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        hasher.finish()
    }
}
