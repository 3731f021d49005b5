//! Polynomial expressions over [Variable]s.
//!
//! A gate constraint is an [Expr] that must vanish on every row where the
//! selector of its gate is set. The same type is used by the gate argument to
//! assemble the random linear combination of all constraints, which is then
//! evaluated over an extended domain by a [CachedEvaluator].

use ark_ff::{FftField, Field, One, Zero};
use ark_poly::{EvaluationDomain, Evaluations, Radix2EvaluationDomain as D};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{
    collections::HashMap,
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub},
};

use crate::{
    circuits::{
        table::AssignmentTable,
        variable::{EvaluationKey, Variable},
    },
    evaluations::ExtendedEvaluations,
    serialization::SerdeAs,
};

/// Scalar evaluations of variables, as received by the verifier.
pub type EvaluationMap<F> = HashMap<EvaluationKey, F>;

/// A binary operation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op2 {
    Add,
    Mul,
    Sub,
}

impl Op2 {
    fn symbol(&self) -> &'static str {
        match self {
            Op2::Add => "+",
            Op2::Mul => "*",
            Op2::Sub => "-",
        }
    }
}

/// A multivariate polynomial over the cells of the assignment table.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub enum Expr<F> {
    Constant(#[serde_as(as = "SerdeAs")] F),
    Var(Variable),
    Pow(Box<Expr<F>>, u64),
    BinOp(Op2, Box<Expr<F>>, Box<Expr<F>>),
}

/// A constraint is an expression that must evaluate to zero.
pub type Constraint<F> = Expr<F>;

/// Convenience function to create a constant as [Expr].
pub fn constant<F>(x: F) -> Expr<F> {
    Expr::Constant(x)
}

impl<F> Expr<F> {
    /// The maximum degree of the monomials of this expression, counting
    /// every variable as a degree one polynomial.
    pub fn degree(&self) -> usize {
        match self {
            Expr::Constant(_) => 0,
            Expr::Var(_) => 1,
            Expr::Pow(e, n) => e.degree() * (*n as usize),
            Expr::BinOp(Op2::Mul, x, y) => x.degree() + y.degree(),
            Expr::BinOp(Op2::Add | Op2::Sub, x, y) => std::cmp::max(x.degree(), y.degree()),
        }
    }

    /// Calls `f` on every variable occurrence, in a left to right traversal.
    pub fn for_each_variable(&self, f: &mut impl FnMut(&Variable)) {
        match self {
            Expr::Constant(_) => {}
            Expr::Var(v) => f(v),
            Expr::Pow(e, _) => e.for_each_variable(f),
            Expr::BinOp(_, x, y) => {
                x.for_each_variable(f);
                y.for_each_variable(f);
            }
        }
    }

    /// Counts how many times each variable occurs in the expression.
    pub fn variable_counts(&self) -> HashMap<Variable, usize> {
        let mut counts = HashMap::new();
        self.for_each_variable(&mut |v| *counts.entry(*v).or_insert(0) += 1);
        counts
    }

    pub fn pow(self, p: u64) -> Self {
        Expr::Pow(Box::new(self), p)
    }
}

impl<F: Field> Expr<F> {
    pub fn square(self) -> Self {
        self.clone() * self
    }

    /// Evaluates the expression, reading each variable through `value`.
    pub fn evaluate_with(&self, value: &mut impl FnMut(&Variable) -> F) -> F {
        match self {
            Expr::Constant(c) => *c,
            Expr::Var(v) => value(v),
            Expr::Pow(e, n) => e.evaluate_with(value).pow([*n]),
            Expr::BinOp(op, x, y) => {
                let x = x.evaluate_with(value);
                let y = y.evaluate_with(value);
                match op {
                    Op2::Add => x + y,
                    Op2::Mul => x * y,
                    Op2::Sub => x - y,
                }
            }
        }
    }

    /// Evaluates the expression at a point, given the evaluation of every
    /// variable it mentions.
    ///
    /// # Panics
    ///
    /// Panics if `evaluations` misses the key of one of the variables.
    pub fn evaluate(&self, evaluations: &EvaluationMap<F>) -> F {
        self.evaluate_with(&mut |v| match evaluations.get(&v.key()) {
            Some(x) => *x,
            None => panic!("no evaluation provided for variable {v} (key {:?})", v.key()),
        })
    }
}

impl<F: FftField> Expr<F> {
    /// Evaluates the expression on `row` of an assignment, relative
    /// variables wrapping around the table.
    pub fn evaluate_at_row(&self, assignment: &AssignmentTable<F>, row: usize) -> F {
        self.evaluate_with(&mut |v| assignment.cell(v, row))
    }
}

impl<F: fmt::Display> fmt::Display for Expr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Var(v) => write!(f, "{v}"),
            Expr::Pow(e, n) => write!(f, "({e})^{n}"),
            Expr::BinOp(op, x, y) => write!(f, "({x} {} {y})", op.symbol()),
        }
    }
}

impl<F> From<Variable> for Expr<F> {
    fn from(v: Variable) -> Self {
        Expr::Var(v)
    }
}

impl<F: Zero> Zero for Expr<F> {
    fn zero() -> Self {
        Expr::Constant(F::zero())
    }

    fn is_zero(&self) -> bool {
        match self {
            Expr::Constant(x) => x.is_zero(),
            _ => false,
        }
    }
}

impl<F: Zero + One + PartialEq> One for Expr<F> {
    fn one() -> Self {
        Expr::Constant(F::one())
    }

    fn is_one(&self) -> bool {
        match self {
            Expr::Constant(x) => x.is_one(),
            _ => false,
        }
    }
}

impl<F: Zero + One + PartialEq + Neg<Output = F>> Neg for Expr<F> {
    type Output = Expr<F>;

    fn neg(self) -> Expr<F> {
        match self {
            Expr::Constant(x) => Expr::Constant(x.neg()),
            e => Expr::Constant(F::one().neg()) * e,
        }
    }
}

impl<F: Zero> Add<Expr<F>> for Expr<F> {
    type Output = Expr<F>;
    fn add(self, other: Self) -> Self {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        Expr::BinOp(Op2::Add, Box::new(self), Box::new(other))
    }
}

impl<F: Zero> AddAssign<Expr<F>> for Expr<F> {
    fn add_assign(&mut self, other: Self) {
        let this = std::mem::replace(self, Expr::zero());
        *self = this + other;
    }
}

impl<F: Zero + One + PartialEq> Mul<Expr<F>> for Expr<F> {
    type Output = Expr<F>;
    fn mul(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        if self.is_one() {
            return other;
        }
        if other.is_one() {
            return self;
        }
        Expr::BinOp(Op2::Mul, Box::new(self), Box::new(other))
    }
}

impl<F: Zero + One + PartialEq> MulAssign<Expr<F>> for Expr<F> {
    fn mul_assign(&mut self, other: Self) {
        let this = std::mem::replace(self, Expr::zero());
        *self = this * other;
    }
}

impl<F: Zero> Sub<Expr<F>> for Expr<F> {
    type Output = Expr<F>;
    fn sub(self, other: Self) -> Self {
        if other.is_zero() {
            return self;
        }
        Expr::BinOp(Op2::Sub, Box::new(self), Box::new(other))
    }
}

impl<F: Field> From<u64> for Expr<F> {
    fn from(x: u64) -> Self {
        Expr::Constant(F::from(x))
    }
}

//
// Evaluation over a domain
//

#[derive(Clone)]
enum EvalResult<F: FftField> {
    Constant(F),
    Evals(Evaluations<F, D<F>>),
}

impl<F: FftField> EvalResult<F> {
    fn into_evals(self, domain: D<F>) -> Evaluations<F, D<F>> {
        match self {
            EvalResult::Constant(c) => {
                Evaluations::from_vec_and_domain(vec![c; domain.size()], domain)
            }
            EvalResult::Evals(e) => e,
        }
    }

    fn binop(self, op: Op2, other: Self) -> Self {
        use EvalResult::*;
        match (self, other) {
            (Constant(x), Constant(y)) => Constant(match op {
                Op2::Add => x + y,
                Op2::Mul => x * y,
                Op2::Sub => x - y,
            }),
            (Evals(x), Constant(y)) => Evals(match op {
                Op2::Add => x.add_constant(y),
                Op2::Mul => x.scale(y),
                Op2::Sub => x.add_constant(-y),
            }),
            (Constant(x), Evals(y)) => Evals(match op {
                Op2::Add => y.add_constant(x),
                Op2::Mul => y.scale(x),
                Op2::Sub => y.scale(-F::one()).add_constant(x),
            }),
            (Evals(x), Evals(y)) => Evals(match op {
                Op2::Add => &x + &y,
                Op2::Mul => &x * &y,
                Op2::Sub => &x - &y,
            }),
        }
    }

    fn pow(self, n: u64) -> Self {
        match self {
            EvalResult::Constant(c) => EvalResult::Constant(c.pow([n])),
            EvalResult::Evals(e) => EvalResult::Evals(e.pow(n)),
        }
    }
}

/// Evaluates expressions over a fixed domain. Results are cached by node
/// address, so evaluating an expression again, or any node inside it, is
/// served from the cache.
pub struct CachedEvaluator<'a, F: FftField> {
    domain: D<F>,
    values: &'a HashMap<Variable, Evaluations<F, D<F>>>,
    // keys point into expressions borrowed for 'a, so they stay unique
    cache: HashMap<*const Expr<F>, EvalResult<F>>,
}

impl<'a, F: FftField> CachedEvaluator<'a, F> {
    /// `values` holds the evaluations of every variable, either on `domain`
    /// or on one of its subgroups.
    pub fn new(domain: D<F>, values: &'a HashMap<Variable, Evaluations<F, D<F>>>) -> Self {
        CachedEvaluator {
            domain,
            values,
            cache: HashMap::new(),
        }
    }

    /// Number of expression nodes evaluated so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Evaluates `expr` on every point of the domain.
    ///
    /// # Panics
    ///
    /// Panics if a variable of `expr` has no entry in the value map.
    pub fn evaluate(&mut self, expr: &'a Expr<F>) -> Evaluations<F, D<F>> {
        let domain = self.domain;
        self.evaluate_helper(expr).into_evals(domain)
    }

    fn evaluate_helper(&mut self, expr: &'a Expr<F>) -> EvalResult<F> {
        let key: *const Expr<F> = expr;
        if let Some(res) = self.cache.get(&key) {
            return res.clone();
        }
        let res = match expr {
            Expr::Constant(c) => EvalResult::Constant(*c),
            Expr::Var(v) => {
                let evals = match self.values.get(v) {
                    Some(evals) => evals,
                    None => panic!("variable {v} was not resolved to a column polynomial"),
                };
                EvalResult::Evals(evals.widen(self.domain))
            }
            Expr::Pow(e, n) => self.evaluate_helper(e).pow(*n),
            Expr::BinOp(op, x, y) => {
                let x = self.evaluate_helper(x);
                let y = self.evaluate_helper(y);
                x.binop(*op, y)
            }
        };
        self.cache.insert(key, res.clone());
        res
    }
}
