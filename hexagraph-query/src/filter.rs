//! The filter tree: the executable form of the `WHERE` clause.

use crate::ast::{CompareOp, CondOp, EntityRef, FilterExpr, WhereClause};
use crate::evaluator;
use crate::executor::Bindings;
use hexagraph_storage::keyspace::Keyspace;
use hexagraph_storage::value::Value;
use std::cmp::Ordering;

#[derive(Debug)]
pub enum FilterTree {
    ConstPredicate {
        lhs: EntityRef,
        op: CompareOp,
        value: Value,
    },
    RefPredicate {
        lhs: EntityRef,
        op: CompareOp,
        rhs: EntityRef,
    },
    Cond {
        left: Box<FilterTree>,
        op: CondOp,
        right: Box<FilterTree>,
    },
}

impl FilterTree {
    pub fn build(where_clause: &WhereClause) -> FilterTree {
        Self::build_expr(&where_clause.filter)
    }

    fn build_expr(exp: &FilterExpr) -> FilterTree {
        match exp {
            FilterExpr::ConstPredicate { lhs, op, value } => FilterTree::ConstPredicate {
                lhs: lhs.clone(),
                op: *op,
                value: value.clone(),
            },
            FilterExpr::RefPredicate { lhs, op, rhs } => FilterTree::RefPredicate {
                lhs: lhs.clone(),
                op: *op,
                rhs: rhs.clone(),
            },
            FilterExpr::Cond { left, op, right } => FilterTree::Cond {
                left: Box::new(Self::build_expr(left)),
                op: *op,
                right: Box::new(Self::build_expr(right)),
            },
        }
    }

    /// Evaluates the tree against the current bindings. `AND`/`OR`
    /// short-circuit; a `Null` operand fails every ordered comparison and
    /// equals nothing.
    pub fn apply(&self, bindings: &Bindings, keyspace: &Keyspace) -> bool {
        match self {
            FilterTree::ConstPredicate { lhs, op, value } => {
                compare(&evaluator::resolve(lhs, bindings, keyspace), *op, value)
            }
            FilterTree::RefPredicate { lhs, op, rhs } => compare(
                &evaluator::resolve(lhs, bindings, keyspace),
                *op,
                &evaluator::resolve(rhs, bindings, keyspace),
            ),
            FilterTree::Cond { left, op, right } => match op {
                CondOp::And => left.apply(bindings, keyspace) && right.apply(bindings, keyspace),
                CondOp::Or => left.apply(bindings, keyspace) || right.apply(bindings, keyspace),
            },
        }
    }
}

fn compare(lhs: &Value, op: CompareOp, rhs: &Value) -> bool {
    if lhs.is_null() || rhs.is_null() {
        // A missing property is unequal to everything and unordered.
        return op == CompareOp::Ne && !(lhs.is_null() && rhs.is_null());
    }
    let ordering = lhs.total_cmp(rhs);
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    }
}
