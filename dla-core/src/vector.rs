use std::ops::{Index, IndexMut};

use crate::traits::{Scalar, Vector};

/// A fixed-size vector of real values stored on the CPU.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseVector<T: Scalar> {
    values: Vec<T>,
}

impl<T: Scalar> DenseVector<T> {
    /// Creates a zero vector of length `n`.
    pub fn new(n: usize) -> Self {
        Self {
            values: vec![T::zero(); n],
        }
    }

    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Reinitializes the vector to `n` zeros, reusing the allocation.
    pub fn init(&mut self, n: usize) {
        self.values.clear();
        self.values.resize(n, T::zero());
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.values.get(i)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.values.get_mut(i)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Maximum absolute entry.
    pub fn norm_inf(&self) -> T {
        self.values.iter().fold(T::zero(), |acc, v| acc.max(v.abs()))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T: Scalar> From<Vec<T>> for DenseVector<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T: Scalar> Index<usize> for DenseVector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.values[i]
    }
}

impl<T: Scalar> IndexMut<usize> for DenseVector<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.values[i]
    }
}

impl<T: Scalar> Vector for DenseVector<T> {
    type Value = T;

    fn len(&self) -> usize {
        self.values.len()
    }
}
