//! Rough memory accounting for cached values.

use podlens_shared::UsageExample;

/// Approximate number of bytes a value keeps alive, heap included.
///
/// Used only for [`crate::CacheStats`]; precision is not a goal.
pub trait ApproxSize {
    fn approx_size(&self) -> usize;
}

impl ApproxSize for String {
    fn approx_size(&self) -> usize {
        std::mem::size_of::<String>() + self.capacity()
    }
}

impl<T: ApproxSize> ApproxSize for Option<T> {
    fn approx_size(&self) -> usize {
        match self {
            Some(value) => value.approx_size(),
            None => std::mem::size_of::<Self>(),
        }
    }
}

impl<T: ApproxSize> ApproxSize for Vec<T> {
    fn approx_size(&self) -> usize {
        let spare = (self.capacity() - self.len()) * std::mem::size_of::<T>();
        std::mem::size_of::<Self>() + spare + self.iter().map(ApproxSize::approx_size).sum::<usize>()
    }
}

impl ApproxSize for UsageExample {
    fn approx_size(&self) -> usize {
        self.title.approx_size()
            + self.description.approx_size()
            + self.code.approx_size()
            + self.language.approx_size()
    }
}
