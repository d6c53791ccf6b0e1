#![forbid(unsafe_code)]

//! Constraint-based box layout.
//!
//! Every widget owns a [`BoxModel`]: four solver variables (`left`,
//! `bottom`, `width`, `height`) in window coordinates. All other edges are
//! derived linear expressions over those four. A window owns one
//! [`WidgetSolver`] shared by all of its widgets; it resolves the whole
//! constraint graph incrementally.

pub mod box_model;
pub mod solver;

pub use box_model::{Alignment, BoxModel, HorizontalAlignment, VerticalAlignment};
pub use cassowary::strength;
pub use cassowary::{Constraint, Expression, RelationalOperator, Variable};
pub use solver::{SolverError, VariableValues, WidgetSolver, evaluate};

/// Build `lhs op rhs` at the given strength.
///
/// ```
/// use trellis_layout::{RelationalOperator, Variable, constraint, strength};
///
/// let width = Variable::new();
/// let c = constraint(width, RelationalOperator::GreaterOrEqual, 100.0, strength::REQUIRED);
/// assert_eq!(c.op(), RelationalOperator::GreaterOrEqual);
/// ```
pub fn constraint(
    lhs: impl Into<Expression>,
    op: RelationalOperator,
    rhs: impl Into<Expression>,
    strength: f64,
) -> Constraint {
    Constraint::new(lhs.into() - rhs.into(), op, strength)
}
