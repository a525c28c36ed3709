//! Identifiers and a simple allocator for annotated objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a host object inside an [`AnnotationDocument`](crate::AnnotationDocument).
/// Survives renames of the host object; opaque to callers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Monotonic allocator for ObjectId. Ids are never reused within a document.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next_object: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object = self.next_object.wrapping_add(1);
        id
    }

    /// Make sure future allocations never collide with `id` (used after loading a document).
    #[inline]
    pub fn observe(&mut self, id: ObjectId) {
        if id.0 >= self.next_object {
            self.next_object = id.0.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_object(), ObjectId(0));
        assert_eq!(alloc.alloc_object(), ObjectId(1));
        alloc.observe(ObjectId(7));
        assert_eq!(alloc.alloc_object(), ObjectId(8));
        alloc.observe(ObjectId(2));
        assert_eq!(alloc.alloc_object(), ObjectId(9));
    }

    #[test]
    fn display() {
        assert_eq!(ObjectId(3).to_string(), "obj#3");
    }
}
