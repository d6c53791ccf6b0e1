#![forbid(unsafe_code)]

//! The window-wide constraint solver.
//!
//! [`WidgetSolver`] wraps an incremental Cassowary solver and keeps a cache
//! of the last solved value of every variable. The cache is refreshed after
//! every mutation, so reads never go back into the solver tableau.
//!
//! It also records whether the constraint set changed since the last time
//! the window asked ([`WidgetSolver::take_constraints_updated`]). The window
//! uses that to decide whether another layout round is required.

use std::collections::{HashMap, HashSet};
use std::fmt;

use cassowary::{
    AddConstraintError, AddEditVariableError, Constraint, Expression, RemoveConstraintError,
    RemoveEditVariableError, Solver, SuggestValueError, Variable, strength,
};

/// Failure of a solver operation.
///
/// All of these indicate a widget bug rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The same constraint was added twice.
    DuplicateConstraint,
    /// A required constraint conflicts with the existing required set.
    UnsatisfiableConstraint,
    /// Removal of a constraint that is not in the solver.
    UnknownConstraint,
    /// Suggestion for a variable that is not an edit variable.
    UnknownEditVariable,
    /// Edit variables cannot have required strength.
    RequiredEditStrength,
    /// The solver's internal state is inconsistent.
    Internal(&'static str),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateConstraint => write!(f, "constraint was already added"),
            Self::UnsatisfiableConstraint => {
                write!(f, "required constraint cannot be satisfied")
            }
            Self::UnknownConstraint => write!(f, "constraint is not in the solver"),
            Self::UnknownEditVariable => write!(f, "variable is not an edit variable"),
            Self::RequiredEditStrength => {
                write!(f, "edit variables must have less than required strength")
            }
            Self::Internal(reason) => write!(f, "internal solver error: {reason}"),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<AddConstraintError> for SolverError {
    fn from(error: AddConstraintError) -> Self {
        match error {
            AddConstraintError::DuplicateConstraint => Self::DuplicateConstraint,
            AddConstraintError::UnsatisfiableConstraint => Self::UnsatisfiableConstraint,
            AddConstraintError::InternalSolverError(reason) => Self::Internal(reason),
        }
    }
}

impl From<RemoveConstraintError> for SolverError {
    fn from(error: RemoveConstraintError) -> Self {
        match error {
            RemoveConstraintError::UnknownConstraint => Self::UnknownConstraint,
            RemoveConstraintError::InternalSolverError(reason) => Self::Internal(reason),
        }
    }
}

impl From<AddEditVariableError> for SolverError {
    fn from(error: AddEditVariableError) -> Self {
        match error {
            AddEditVariableError::DuplicateEditVariable => Self::Internal("duplicate edit variable"),
            AddEditVariableError::BadRequiredStrength => Self::RequiredEditStrength,
        }
    }
}

impl From<RemoveEditVariableError> for SolverError {
    fn from(error: RemoveEditVariableError) -> Self {
        match error {
            RemoveEditVariableError::UnknownEditVariable => Self::UnknownEditVariable,
            RemoveEditVariableError::InternalSolverError(reason) => Self::Internal(reason),
        }
    }
}

impl From<SuggestValueError> for SolverError {
    fn from(error: SuggestValueError) -> Self {
        match error {
            SuggestValueError::UnknownEditVariable => Self::UnknownEditVariable,
            SuggestValueError::InternalSolverError(reason) => Self::Internal(reason),
        }
    }
}

/// Anything that can report a numeric value for a solver variable.
///
/// Implemented by the solver itself and by plain maps, so derived
/// expressions can be evaluated without a solver in tests.
pub trait VariableValues {
    /// The value of `variable`, 0 when unknown.
    fn value_of(&self, variable: Variable) -> f64;
}

impl VariableValues for HashMap<Variable, f64> {
    fn value_of(&self, variable: Variable) -> f64 {
        self.get(&variable).copied().unwrap_or(0.0)
    }
}

/// Evaluate a linear expression against a set of variable values.
pub fn evaluate(expression: &Expression, values: &impl VariableValues) -> f64 {
    expression
        .terms
        .iter()
        .fold(expression.constant, |acc, term| {
            acc + term.coefficient * values.value_of(term.variable)
        })
}

/// The constraint solver shared by all widgets of one window.
pub struct WidgetSolver {
    solver: Solver,
    values: HashMap<Variable, f64>,
    edits: HashSet<Variable>,
    constraints_updated: bool,
}

impl WidgetSolver {
    /// An empty solver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            values: HashMap::new(),
            edits: HashSet::new(),
            constraints_updated: false,
        }
    }

    /// Add a constraint and re-solve.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), SolverError> {
        self.solver.add_constraint(constraint)?;
        self.constraints_updated = true;
        self.refresh();
        Ok(())
    }

    /// Remove a constraint and re-solve.
    pub fn remove_constraint(&mut self, constraint: &Constraint) -> Result<(), SolverError> {
        self.solver.remove_constraint(constraint)?;
        self.constraints_updated = true;
        self.refresh();
        Ok(())
    }

    /// Swap `old` for `new`. Either side may be absent.
    ///
    /// Nothing changes when both are the same constraint.
    pub fn replace_constraint(
        &mut self,
        old: Option<&Constraint>,
        new: Option<Constraint>,
    ) -> Result<(), SolverError> {
        if matches!((old, new.as_ref()), (Some(a), Some(b)) if a == b) {
            return Ok(());
        }
        if let Some(old) = old {
            self.remove_constraint(old)?;
        }
        if let Some(new) = new {
            self.add_constraint(new)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.solver.has_constraint(constraint)
    }

    /// Make `variable` suggestible at `strength`.
    ///
    /// A variable that already is an edit variable is left alone.
    pub fn add_edit_variable(&mut self, variable: Variable, strength: f64) -> Result<(), SolverError> {
        if self.edits.contains(&variable) {
            return Ok(());
        }
        self.solver.add_edit_variable(variable, strength)?;
        self.edits.insert(variable);
        Ok(())
    }

    /// Stop accepting suggestions for `variable`.
    pub fn remove_edit_variable(&mut self, variable: Variable) -> Result<(), SolverError> {
        self.solver.remove_edit_variable(variable)?;
        self.edits.remove(&variable);
        self.refresh();
        Ok(())
    }

    /// Nudge `variable` towards `value` and re-solve.
    ///
    /// The variable becomes a strong edit variable on first use. Required
    /// constraints always win over the suggestion.
    pub fn suggest(&mut self, variable: Variable, value: f64) -> Result<(), SolverError> {
        self.add_edit_variable(variable, strength::STRONG)?;
        self.solver.suggest_value(variable, value)?;
        self.refresh();
        Ok(())
    }

    /// Last solved value of `variable`; 0 before it appears in any
    /// constraint.
    #[must_use]
    pub fn value(&self, variable: Variable) -> f64 {
        self.values.value_of(variable)
    }

    /// Evaluate a derived expression against the current solution.
    #[must_use]
    pub fn evaluate(&self, expression: &Expression) -> f64 {
        evaluate(expression, self)
    }

    /// Return whether constraints were added or removed since the last call,
    /// and clear the flag.
    pub fn take_constraints_updated(&mut self) -> bool {
        std::mem::take(&mut self.constraints_updated)
    }

    /// Whether constraints changed since the flag was last taken.
    #[must_use]
    pub fn constraints_updated(&self) -> bool {
        self.constraints_updated
    }

    fn refresh(&mut self) {
        for &(variable, value) in self.solver.fetch_changes() {
            self.values.insert(variable, value);
        }
    }
}

impl VariableValues for WidgetSolver {
    fn value_of(&self, variable: Variable) -> f64 {
        self.value(variable)
    }
}

impl Default for WidgetSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WidgetSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetSolver")
            .field("solved_variables", &self.values.len())
            .field("edit_variables", &self.edits.len())
            .field("constraints_updated", &self.constraints_updated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint;
    use cassowary::RelationalOperator::{Equal, GreaterOrEqual, LessOrEqual};
    use cassowary::strength::{REQUIRED, WEAK};

    #[test]
    fn add_solves_and_flags_update() {
        let mut solver = WidgetSolver::new();
        let x = Variable::new();
        solver
            .add_constraint(constraint(x, Equal, 42.0, REQUIRED))
            .unwrap();
        assert_eq!(solver.value(x), 42.0);
        assert!(solver.take_constraints_updated());
        assert!(!solver.take_constraints_updated());
    }

    #[test]
    fn duplicate_constraint_is_rejected() {
        let mut solver = WidgetSolver::new();
        let x = Variable::new();
        let c = constraint(x, GreaterOrEqual, 1.0, REQUIRED);
        solver.add_constraint(c.clone()).unwrap();
        assert_eq!(solver.add_constraint(c), Err(SolverError::DuplicateConstraint));
    }

    #[test]
    fn conflicting_required_constraints_are_unsatisfiable() {
        let mut solver = WidgetSolver::new();
        let x = Variable::new();
        solver
            .add_constraint(constraint(x, GreaterOrEqual, 10.0, REQUIRED))
            .unwrap();
        let err = solver
            .add_constraint(constraint(x, LessOrEqual, 5.0, REQUIRED))
            .unwrap_err();
        assert_eq!(err, SolverError::UnsatisfiableConstraint);
    }

    #[test]
    fn removing_unknown_constraint_is_an_error() {
        let mut solver = WidgetSolver::new();
        let c = constraint(Variable::new(), Equal, 1.0, REQUIRED);
        assert_eq!(solver.remove_constraint(&c), Err(SolverError::UnknownConstraint));
    }

    #[test]
    fn suggest_respects_required_bounds() {
        let mut solver = WidgetSolver::new();
        let w = Variable::new();
        solver
            .add_constraint(constraint(w, GreaterOrEqual, 100.0, REQUIRED))
            .unwrap();
        solver.suggest(w, 0.0).unwrap();
        assert_eq!(solver.value(w), 100.0);
        solver.suggest(w, 300.0).unwrap();
        assert_eq!(solver.value(w), 300.0);
    }

    #[test]
    fn suggest_beats_weak_preference() {
        let mut solver = WidgetSolver::new();
        let w = Variable::new();
        solver.add_constraint(constraint(w, Equal, 10.0, WEAK)).unwrap();
        assert_eq!(solver.value(w), 10.0);
        solver.suggest(w, 20.0).unwrap();
        assert_eq!(solver.value(w), 20.0);
        solver.remove_edit_variable(w).unwrap();
        assert_eq!(solver.value(w), 10.0);
    }

    #[test]
    fn replace_swaps_constraints() {
        let mut solver = WidgetSolver::new();
        let x = Variable::new();
        let a = constraint(x, Equal, 1.0, REQUIRED);
        let b = constraint(x, Equal, 2.0, REQUIRED);
        solver.replace_constraint(None, Some(a.clone())).unwrap();
        solver.replace_constraint(Some(&a), Some(b.clone())).unwrap();
        assert!(!solver.has_constraint(&a));
        assert!(solver.has_constraint(&b));
        assert_eq!(solver.value(x), 2.0);
        solver.replace_constraint(Some(&b), None).unwrap();
        assert!(!solver.has_constraint(&b));
    }

    #[test]
    fn evaluate_uses_constant_and_coefficients() {
        let a = Variable::new();
        let b = Variable::new();
        let mut values = HashMap::new();
        values.insert(a, 3.0);
        values.insert(b, 4.0);
        let expr = Expression::from(a) + b * 2.0 + 1.0;
        assert_eq!(evaluate(&expr, &values), 12.0);
    }
}
