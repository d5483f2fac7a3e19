use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

/// Object-safe equality and hashing for type-erased values.
///
/// Values of different concrete types never compare equal, and their hashes
/// are salted with the [`TypeId`] so that `1u8` and `1u16` land in different
/// buckets.
pub trait DynHash: Any {
    fn dyn_eq(&self, other: &dyn Any) -> bool;

    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T: Eq + Hash + 'static> DynHash for T {
    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}
