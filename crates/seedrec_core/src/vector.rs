//! Dense rational vectors and strided views.
//!
//! A [`Vector`] owns contiguous storage. Views borrow a storage slice and
//! address component `i` at `storage[offset + i * stride]`, which is how
//! [`crate::matrix::Matrix`] exposes rows, columns and diagonals without
//! copying. Mutations through a view are visible through every other
//! accessor of the same cells.

use crate::rational::Rational;
use std::fmt;

/// Read-only operations shared by owned vectors and views.
pub trait VectorRead {
    fn len(&self) -> usize;

    /// Component at `index`. Panics when the index is out of bounds.
    fn get(&self, index: usize) -> &Rational;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_zero(&self) -> bool {
        (0..self.len()).all(|i| self.get(i).is_zero())
    }

    /// Copy into an owned contiguous vector.
    fn to_vector(&self) -> Vector {
        Vector::from_fn(self.len(), |i| self.get(i).clone())
    }

    fn dot<V: VectorRead + ?Sized>(&self, other: &V) -> Rational {
        assert_eq!(self.len(), other.len(), "vectors must be equal in size");

        let mut sum = Rational::zero();
        for i in 0..self.len() {
            sum = &sum + &(self.get(i) * other.get(i));
        }
        sum
    }

    /// Squared length.
    fn sdot(&self) -> Rational {
        self.dot(self)
    }

    fn scaled(&self, scalar: &Rational) -> Vector {
        Vector::from_fn(self.len(), |i| self.get(i) * scalar)
    }

    fn plus<V: VectorRead + ?Sized>(&self, other: &V) -> Vector {
        assert_eq!(self.len(), other.len(), "vectors must be equal in size");
        Vector::from_fn(self.len(), |i| self.get(i) + other.get(i))
    }

    fn minus<V: VectorRead + ?Sized>(&self, other: &V) -> Vector {
        assert_eq!(self.len(), other.len(), "vectors must be equal in size");
        Vector::from_fn(self.len(), |i| self.get(i) - other.get(i))
    }

    fn negated(&self) -> Vector {
        Vector::from_fn(self.len(), |i| -self.get(i))
    }
}

/// Mutating operations shared by owned vectors and mutable views.
pub trait VectorWrite: VectorRead {
    fn get_mut(&mut self, index: usize) -> &mut Rational;

    fn set(&mut self, index: usize, value: Rational) {
        *self.get_mut(index) = value;
    }

    fn assign<V: VectorRead + ?Sized>(&mut self, other: &V) {
        assert_eq!(self.len(), other.len(), "vectors must be equal in size");
        for i in 0..self.len() {
            self.set(i, other.get(i).clone());
        }
    }

    fn add_assign<V: VectorRead + ?Sized>(&mut self, other: &V) {
        assert_eq!(self.len(), other.len(), "vectors must be equal in size");
        for i in 0..self.len() {
            let value = self.get(i) + other.get(i);
            self.set(i, value);
        }
    }

    fn sub_assign<V: VectorRead + ?Sized>(&mut self, other: &V) {
        assert_eq!(self.len(), other.len(), "vectors must be equal in size");
        for i in 0..self.len() {
            let value = self.get(i) - other.get(i);
            self.set(i, value);
        }
    }

    fn scale_assign(&mut self, scalar: &Rational) {
        for i in 0..self.len() {
            let value = self.get(i) * scalar;
            self.set(i, value);
        }
    }

    fn div_assign(&mut self, scalar: &Rational) {
        for i in 0..self.len() {
            let value = self.get(i) / scalar;
            self.set(i, value);
        }
    }

    fn negate_assign(&mut self) {
        for i in 0..self.len() {
            let value = -self.get(i);
            self.set(i, value);
        }
    }
}

/// Owned vector with contiguous storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vector {
    data: Vec<Rational>,
}

impl Vector {
    pub fn zero(size: usize) -> Self {
        Self {
            data: vec![Rational::zero(); size],
        }
    }

    pub fn from_fn<F: FnMut(usize) -> Rational>(size: usize, mut generator: F) -> Self {
        Self {
            data: (0..size).map(&mut generator).collect(),
        }
    }

    pub fn from_rationals(data: Vec<Rational>) -> Self {
        Self { data }
    }

    pub fn from_ints(values: &[i64]) -> Self {
        Self::from_fn(values.len(), |i| Rational::from_int(values[i]))
    }

    pub fn repeat(size: usize, value: Rational) -> Self {
        Self {
            data: vec![value; size],
        }
    }

    /// Vector with a single nonzero component.
    pub fn basis(size: usize, index: usize, value: Rational) -> Self {
        let mut vector = Self::zero(size);
        vector.set(index, value);
        vector
    }
}

impl VectorRead for Vector {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn get(&self, index: usize) -> &Rational {
        &self.data[index]
    }
}

impl VectorWrite for Vector {
    fn get_mut(&mut self, index: usize) -> &mut Rational {
        &mut self.data[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.data.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

/// Borrowed strided view into shared storage.
#[derive(Debug, Clone, Copy)]
pub struct VectorView<'a> {
    storage: &'a [Rational],
    len: usize,
    stride: usize,
    offset: usize,
}

impl<'a> VectorView<'a> {
    pub fn new(storage: &'a [Rational], len: usize, stride: usize, offset: usize) -> Self {
        Self {
            storage,
            len,
            stride,
            offset,
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl VectorRead for VectorView<'_> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> &Rational {
        assert!(index < self.len, "index must fall within [0, len)");
        &self.storage[self.offset + index * self.stride]
    }
}

/// Mutable strided view into shared storage.
#[derive(Debug)]
pub struct VectorViewMut<'a> {
    storage: &'a mut [Rational],
    len: usize,
    stride: usize,
    offset: usize,
}

impl<'a> VectorViewMut<'a> {
    pub fn new(storage: &'a mut [Rational], len: usize, stride: usize, offset: usize) -> Self {
        Self {
            storage,
            len,
            stride,
            offset,
        }
    }
}

impl VectorRead for VectorViewMut<'_> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> &Rational {
        assert!(index < self.len, "index must fall within [0, len)");
        &self.storage[self.offset + index * self.stride]
    }
}

impl VectorWrite for VectorViewMut<'_> {
    fn get_mut(&mut self, index: usize) -> &mut Rational {
        assert!(index < self.len, "index must fall within [0, len)");
        &mut self.storage[self.offset + index * self.stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Vector::from_ints(&[1, 2, 3]);
        let b = Vector::from_ints(&[4, 5, 6]);

        assert_eq!(a.plus(&b), Vector::from_ints(&[5, 7, 9]));
        assert_eq!(b.minus(&a), Vector::from_ints(&[3, 3, 3]));
        assert_eq!(a.scaled(&Rational::from_int(2)), Vector::from_ints(&[2, 4, 6]));
        assert_eq!(a.negated(), Vector::from_ints(&[-1, -2, -3]));
        assert_eq!(a.dot(&b), Rational::from_int(32));
        assert_eq!(a.sdot(), Rational::from_int(14));
    }

    #[test]
    fn in_place_ops() {
        let mut a = Vector::from_ints(&[1, 2, 3]);
        a.add_assign(&Vector::from_ints(&[1, 1, 1]));
        assert_eq!(a, Vector::from_ints(&[2, 3, 4]));

        a.scale_assign(&Rational::from_int(3));
        assert_eq!(a, Vector::from_ints(&[6, 9, 12]));

        a.div_assign(&Rational::from_int(3));
        assert_eq!(a, Vector::from_ints(&[2, 3, 4]));

        a.negate_assign();
        assert_eq!(a, Vector::from_ints(&[-2, -3, -4]));
    }

    #[test]
    fn strided_view() {
        let storage: Vec<Rational> = (0..6).map(Rational::from_int).collect();

        // Every second element starting at 1: (1, 3, 5).
        let view = VectorView::new(&storage, 3, 2, 1);
        assert_eq!(view.get(0), &Rational::from_int(1));
        assert_eq!(view.get(1), &Rational::from_int(3));
        assert_eq!(view.get(2), &Rational::from_int(5));
        assert_eq!(view.to_vector(), Vector::from_ints(&[1, 3, 5]));
    }

    #[test]
    fn mutation_through_view() {
        let mut storage: Vec<Rational> = (0..4).map(Rational::from_int).collect();

        let mut view = VectorViewMut::new(&mut storage, 2, 2, 0);
        view.set(1, Rational::from_int(42));

        assert_eq!(storage[2], Rational::from_int(42));
    }

    #[test]
    fn basis_vector() {
        let v = Vector::basis(3, 1, Rational::from_int(7));
        assert_eq!(v, Vector::from_ints(&[0, 7, 0]));
    }

    #[test]
    fn zero_size() {
        let v = Vector::zero(0);
        assert!(v.is_empty());
        assert!(v.is_zero());
        assert_eq!(v.dot(&Vector::zero(0)), Rational::zero());
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_get() {
        let v = Vector::from_ints(&[1, 2]);
        v.get(2);
    }
}
