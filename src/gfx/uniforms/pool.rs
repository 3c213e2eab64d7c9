//! Typed arena of CPU-side uniform values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Stable index of one value in a [`UniformPool<T>`].
///
/// Handles are never invalidated; the pool only grows.
pub struct UniformHandle<T> {
    index: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> UniformHandle<T> {
    fn new(index: usize) -> Self {
        Self {
            index: index as u32,
            marker: PhantomData,
        }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for UniformHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UniformHandle<T> {}

impl<T> PartialEq for UniformHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for UniformHandle<T> {}

impl<T> Hash for UniformHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for UniformHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "UniformHandle<{}>({})", short, self.index)
    }
}

/// Growable store of uniform values of one block type.
#[derive(Debug, Clone)]
pub struct UniformPool<T> {
    values: Vec<T>,
}

impl<T> Default for UniformPool<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T: Copy> UniformPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, value: T) -> UniformHandle<T> {
        self.values.push(value);
        UniformHandle::new(self.values.len() - 1)
    }

    pub fn get(&self, handle: UniformHandle<T>) -> &T {
        &self.values[handle.index()]
    }

    pub fn get_mut(&mut self, handle: UniformHandle<T>) -> &mut T {
        &mut self.values[handle.index()]
    }

    pub fn set(&mut self, handle: UniformHandle<T>, value: T) {
        self.values[handle.index()] = value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UniformHandle<T>, &T)> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (UniformHandle::new(index), value))
    }
}
