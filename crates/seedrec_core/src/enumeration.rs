//! Lazy branch-and-bound enumeration of lattice points inside a polytope.
//!
//! A tree node fixes one coordinate of the sorted-basis space per depth
//! level. Splitting a node asks the linear program for the integer range of
//! the current coordinate; interior depths spawn one child per admissible
//! value (each with the equality appended to its own cloned program), while
//! the final depth yields the leaf vertices directly. Nodes expand only when
//! traversal reaches them, and the work queue can hand off its front half
//! for parallel traversal.

use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::simplex::LinearProgram;
use crate::vector::{Vector, VectorRead};
use num_traits::ToPrimitive;
use std::collections::VecDeque;
use std::sync::Arc;

/// An unexpanded branch of the enumeration tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    depth: usize,
    basis: Arc<Matrix>,
    program: LinearProgram,
    vertex: Vector,
}

impl TreeNode {
    /// Root of the tree.
    ///
    /// `basis` is the width-sorted inverse basis; `program` bounds the
    /// translated polytope.
    pub fn root(basis: Arc<Matrix>, program: LinearProgram) -> Self {
        let size = basis.width();
        Self {
            depth: 0,
            basis,
            program,
            vertex: Vector::zero(size),
        }
    }

    fn expand(self) -> Vec<Work> {
        let size = self.basis.width();
        let gradient = self.basis.row(self.depth).to_vector();

        let min = self.program.minimize(&gradient).dot(&gradient).ceil();
        let max = self.program.maximize(&gradient).dot(&gradient).floor();

        let span = (&max - &min)
            .numerator()
            .to_i64()
            .expect("coordinate span exceeds the addressable range");
        if span < 0 {
            // No integer point in this slice.
            return Vec::new();
        }
        let count = span as u64 + 1;

        if self.depth + 1 == size {
            return vec![Work::Leaves(LeafRange {
                vertex: self.vertex,
                depth: self.depth,
                min,
                count,
                cursor: 0,
            })];
        }

        let mut children = Vec::with_capacity(count as usize);
        for k in 0..count {
            let value = &min + &Rational::from_int(k as i64);
            let program = self
                .program
                .with_equality(&gradient, value.clone())
                .expect("an equality inside the coordinate bounds is feasible");
            let vertex = self
                .vertex
                .plus(&Vector::basis(size, self.depth, value));

            children.push(Work::Node(TreeNode {
                depth: self.depth + 1,
                basis: Arc::clone(&self.basis),
                program,
                vertex,
            }));
        }
        children
    }
}

/// Leaf vertices of one fully fixed branch, yielded lazily by ascending
/// coordinate value.
#[derive(Debug, Clone)]
struct LeafRange {
    vertex: Vector,
    depth: usize,
    min: Rational,
    count: u64,
    cursor: u64,
}

impl LeafRange {
    fn next(&mut self) -> Option<Vector> {
        if self.cursor >= self.count {
            return None;
        }

        let value = &self.min + &Rational::from_int(self.cursor as i64);
        self.cursor += 1;
        Some(self
            .vertex
            .plus(&Vector::basis(self.vertex.len(), self.depth, value)))
    }

    fn remaining(&self) -> u64 {
        self.count - self.cursor
    }

    /// Carve off the front half of the remaining values.
    fn split(&mut self) -> Option<LeafRange> {
        let half = self.remaining() / 2;
        if half == 0 {
            return None;
        }

        let front = LeafRange {
            vertex: self.vertex.clone(),
            depth: self.depth,
            min: self.min.clone(),
            count: self.cursor + half,
            cursor: self.cursor,
        };
        self.cursor += half;
        Some(front)
    }
}

#[derive(Debug, Clone)]
enum Work {
    Node(TreeNode),
    Leaves(LeafRange),
}

/// Depth-first, child-minor, k-ascending traversal of the tree.
///
/// Splitting hands the front half of the unexpanded work to a new iterator;
/// siblings never observe each other's state.
#[derive(Debug, Clone)]
pub struct VertexIter {
    queue: VecDeque<Work>,
}

impl VertexIter {
    pub fn new(root: TreeNode) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(Work::Node(root));
        Self { queue }
    }

    /// Split off roughly half of the pending work, expanding single nodes
    /// until a division is possible. Returns `None` when at most one vertex
    /// remains.
    pub fn try_split(&mut self) -> Option<VertexIter> {
        loop {
            match self.queue.len() {
                0 => return None,
                1 => match self.queue.pop_front() {
                    Some(Work::Node(node)) => {
                        for work in node.expand().into_iter().rev() {
                            self.queue.push_front(work);
                        }
                    }
                    Some(Work::Leaves(mut range)) => {
                        let front = range.split();
                        self.queue.push_front(Work::Leaves(range));
                        return front.map(|range| Self {
                            queue: VecDeque::from([Work::Leaves(range)]),
                        });
                    }
                    None => return None,
                },
                len => {
                    let queue: VecDeque<Work> = self.queue.drain(..len / 2).collect();
                    return Some(Self { queue });
                }
            }
        }
    }
}

impl Iterator for VertexIter {
    type Item = Vector;

    fn next(&mut self) -> Option<Vector> {
        loop {
            match self.queue.pop_front()? {
                Work::Leaves(mut range) => {
                    if let Some(vertex) = range.next() {
                        self.queue.push_front(Work::Leaves(range));
                        return Some(vertex);
                    }
                }
                Work::Node(node) => {
                    for work in node.expand().into_iter().rev() {
                        self.queue.push_front(work);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplex::LinearProgramBuilder;
    use std::collections::HashSet;

    fn box_tree(bounds: &[(i64, i64)]) -> TreeNode {
        let size = bounds.len();
        let mut builder = LinearProgramBuilder::new();
        let min = Vector::from_ints(&bounds.iter().map(|b| b.0).collect::<Vec<_>>());
        let max = Vector::from_ints(&bounds.iter().map(|b| b.1).collect::<Vec<_>>());
        builder.add_bounded_basis(&min, &Matrix::identity(size), &max);
        TreeNode::root(Arc::new(Matrix::identity(size)), builder.build().unwrap())
    }

    fn as_pairs(vertices: impl Iterator<Item = Vector>) -> HashSet<(i64, i64)> {
        vertices
            .map(|v| {
                let x = v.get(0).numerator().to_i64().unwrap();
                let y = v.get(1).numerator().to_i64().unwrap();
                (x, y)
            })
            .collect()
    }

    #[test]
    fn enumerates_every_point_of_a_box() {
        let vertices = as_pairs(VertexIter::new(box_tree(&[(0, 2), (0, 2)])));

        let mut expected = HashSet::new();
        for x in 0..=2 {
            for y in 0..=2 {
                expected.insert((x, y));
            }
        }
        assert_eq!(vertices, expected);
    }

    #[test]
    fn negative_and_offset_bounds() {
        let vertices = as_pairs(VertexIter::new(box_tree(&[(-2, -1), (3, 5)])));

        let mut expected = HashSet::new();
        for x in -2..=-1 {
            for y in 3..=5 {
                expected.insert((x, y));
            }
        }
        assert_eq!(vertices, expected);
    }

    #[test]
    fn single_point_polytope() {
        let vertices: Vec<Vector> = VertexIter::new(box_tree(&[(7, 7), (-4, -4)])).collect();
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0], Vector::from_ints(&[7, -4]));
    }

    #[test]
    fn fractional_slice_without_integer_points_is_empty() {
        // 4 <= 10x <= 6 has no integer solution.
        let mut builder = LinearProgramBuilder::new();
        builder.add_bounds(
            Rational::from_int(4),
            Vector::from_ints(&[10]),
            Rational::from_int(6),
        );
        let root = TreeNode::root(Arc::new(Matrix::identity(1)), builder.build().unwrap());
        assert_eq!(VertexIter::new(root).count(), 0);
    }

    #[test]
    fn traversal_is_ascending_within_a_branch() {
        let values: Vec<i64> = VertexIter::new(box_tree(&[(2, 6), (0, 0)]))
            .map(|v| v.get(0).numerator().to_i64().unwrap())
            .collect();
        assert_eq!(values, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn split_preserves_the_full_vertex_set() {
        let mut left = VertexIter::new(box_tree(&[(0, 3), (0, 3)]));
        let right = left.try_split().expect("splittable");

        let mut combined = as_pairs(right);
        combined.extend(as_pairs(left));

        assert_eq!(combined, as_pairs(VertexIter::new(box_tree(&[(0, 3), (0, 3)]))));
    }

    #[test]
    fn split_of_leaf_range() {
        // One dimension: the whole tree is a single leaf range.
        let mut builder = LinearProgramBuilder::new();
        builder.add_bounds(
            Rational::zero(),
            Vector::from_ints(&[1]),
            Rational::from_int(9),
        );
        let root = TreeNode::root(Arc::new(Matrix::identity(1)), builder.build().unwrap());

        let mut left = VertexIter::new(root);
        let right = left.try_split().expect("splittable");

        let collect = |iter: VertexIter| -> Vec<i64> {
            iter.map(|v| v.get(0).numerator().to_i64().unwrap()).collect()
        };
        assert_eq!(collect(right), vec![0, 1, 2, 3, 4]);
        assert_eq!(collect(left), vec![5, 6, 7, 8, 9]);
    }
}
