//! This module builds the polynomials of the permutation argument.
//!
//! Copy constraints are folded into disjoint cycles over the cells of the
//! permutable columns. Each cell `(i, j)` is encoded as `delta^i * omega^j`:
//! the identity polynomials interpolate these encodings, the permutation
//! polynomials interpolate the encoding of the successor of each cell in its
//! cycle.

use ark_ff::FftField;
use ark_poly::{
    univariate::DensePolynomial, EvaluationDomain, Evaluations, Radix2EvaluationDomain as D,
};
use log::debug;
use rayon::prelude::*;

use crate::circuits::{
    constraint_system::ConstraintSystem, gate::CopyConstraint, table::TableDescription,
    variable::Variable,
};

/// A cell of the table, as `(global column index, row)`.
pub type Key = (usize, usize);

/// Union-find over the cells of the permutable columns, where every class is
/// also kept as a ring of successor pointers.
///
/// All the copy constraints are applied by [CycleRepresentation::new]; the
/// structure is read-only afterwards.
#[derive(Debug, Clone)]
pub struct CycleRepresentation {
    columns: usize,
    rows: usize,
    /// successor of each cell in its cycle
    mapping: Vec<Key>,
    /// representative of the cycle of each cell
    aux: Vec<Key>,
    /// size of each cycle, only meaningful for representatives
    sizes: Vec<usize>,
}

impl CycleRepresentation {
    /// Seeds one singleton cycle per cell of the non-selector columns, then
    /// merges the cycles joined by each copy constraint of `cs`.
    ///
    /// # Panics
    ///
    /// Panics if a copy constraint points outside of the permutable part of
    /// the table.
    pub fn new<F>(cs: &ConstraintSystem<F>, table: &TableDescription) -> Self {
        let columns = table.permutable_columns();
        let rows = table.rows_amount;

        let mut cycles = CycleRepresentation {
            columns,
            rows,
            mapping: Vec::with_capacity(columns * rows),
            aux: Vec::with_capacity(columns * rows),
            sizes: vec![1; columns * rows],
        };
        for i in 0..columns {
            for j in 0..rows {
                cycles.mapping.push((i, j));
                cycles.aux.push((i, j));
            }
        }

        for CopyConstraint(x, y) in cs.copy_constraints() {
            let x = cycles.key(table, x);
            let y = cycles.key(table, y);
            cycles.apply_copy_constraint(x, y);
        }

        debug!(
            "cycle representation: {} cells, {} copy constraints",
            columns * rows,
            cs.copy_constraints().len()
        );

        cycles
    }

    fn key(&self, table: &TableDescription, var: &Variable) -> Key {
        let column = table.global_index(var);
        let row = usize::try_from(var.rotation).unwrap_or_else(|_| {
            panic!("copy constraint on {var} refers to a negative row")
        });
        self.check(&(column, row));
        (column, row)
    }

    fn check(&self, &(column, row): &Key) {
        assert!(
            column < self.columns && row < self.rows,
            "cell ({column}, {row}) is outside of the {}x{} permutable table",
            self.columns,
            self.rows
        );
    }

    fn index(&self, key: &Key) -> usize {
        self.check(key);
        key.0 * self.rows + key.1
    }

    fn apply_copy_constraint(&mut self, x: Key, y: Key) {
        let (ix, iy) = (self.index(&x), self.index(&y));
        if self.aux[ix] == self.aux[iy] {
            return;
        }

        // the smaller cycle is relabelled and attached to the larger one
        let (left, right) = if self.sizes[self.index(&self.aux[ix])]
            < self.sizes[self.index(&self.aux[iy])]
        {
            (iy, ix)
        } else {
            (ix, iy)
        };
        let left_root = self.aux[left];
        let right_root = self.aux[right];
        let (l, r) = (self.index(&left_root), self.index(&right_root));
        self.sizes[l] += self.sizes[r];

        let mut z = right_root;
        loop {
            let iz = self.index(&z);
            self.aux[iz] = left_root;
            z = self.mapping[iz];
            if z == right_root {
                break;
            }
        }

        // splice the two rings into one
        self.mapping.swap(left, right);
    }

    /// The next cell in the cycle of `key`.
    pub fn successor(&self, key: Key) -> Key {
        self.mapping[self.index(&key)]
    }

    /// Number of cells in the cycle of `key`.
    pub fn cycle_size(&self, key: Key) -> usize {
        let root = self.aux[self.index(&key)];
        self.sizes[self.index(&root)]
    }

    /// Whether `a` and `b` were declared equal by a chain of copy constraints.
    pub fn same_cycle(&self, a: Key, b: Key) -> bool {
        self.aux[self.index(&a)] == self.aux[self.index(&b)]
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// `delta^0, ..., delta^(n-1)`
fn powers<F: FftField>(x: F, n: usize) -> Vec<F> {
    let mut acc = F::one();
    (0..n)
        .map(|_| {
            let res = acc;
            acc *= x;
            res
        })
        .collect()
}

/// The polynomials `S_id_i` interpolating `delta^i * omega^j` over the rows `j`
/// of `domain`, for the first `permutation_size` columns.
pub fn identity_polynomials<F: FftField>(
    permutation_size: usize,
    delta: F,
    domain: D<F>,
) -> Vec<DensePolynomial<F>> {
    let omegas: Vec<F> = domain.elements().collect();
    let deltas = powers(delta, permutation_size);

    deltas
        .par_iter()
        .map(|shift| {
            let evals = omegas.iter().map(|omega| *shift * omega).collect();
            Evaluations::from_vec_and_domain(evals, domain).interpolate()
        })
        .collect()
}

/// The polynomials `S_sigma_i` interpolating `delta^c * omega^r` over the rows
/// `j` of `domain`, where `(c, r)` is the successor of `(i, j)` in `cycles`.
///
/// # Panics
///
/// Panics if `permutation_size` exceeds the columns of `cycles` or if the
/// domain and the cycles disagree on the number of rows.
pub fn permutation_polynomials<F: FftField>(
    permutation_size: usize,
    delta: F,
    cycles: &CycleRepresentation,
    domain: D<F>,
) -> Vec<DensePolynomial<F>> {
    assert!(
        permutation_size <= cycles.columns(),
        "{permutation_size} permutation columns requested but only {} are permutable",
        cycles.columns()
    );
    assert_eq!(cycles.rows(), domain.size());

    let omegas: Vec<F> = domain.elements().collect();
    let deltas = powers(delta, cycles.columns());

    (0..permutation_size)
        .into_par_iter()
        .map(|i| {
            let evals = (0..domain.size())
                .map(|j| {
                    let (c, r) = cycles.successor((i, j));
                    deltas[c] * omegas[r]
                })
                .collect();
            Evaluations::from_vec_and_domain(evals, domain).interpolate()
        })
        .collect()
}
