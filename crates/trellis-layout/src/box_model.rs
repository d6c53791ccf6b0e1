#![forbid(unsafe_code)]

//! Per-widget solver variables and derived edges.
//!
//! A [`BoxModel`] holds exactly four independent variables. Everything else
//! (`right`, `top`, `center`, `middle`, and the padding- or margin-adjusted
//! edges) is a linear [`Expression`] built on demand and never stored or
//! constrained on its own.
//!
//! Padding and margin are plain numbers, not variables. Padding shrinks the
//! area children are placed in; margin is the space kept between this box and
//! its neighbours or its parent's padded edge.
//!
//! # Extent constraints
//!
//! The `set_*_extent` family replaces the previous constraint of the same
//! kind. Requesting the value already in effect is a no-op, so widgets can
//! call these from `layout` every frame without re-triggering layout.

use cassowary::strength::{MEDIUM, REQUIRED, WEAK};
use cassowary::{Constraint, Expression, RelationalOperator, Variable};

use trellis_core::geometry::{Extent, Point, Rect, Sides};

use crate::constraint;
use crate::solver::{SolverError, VariableValues, WidgetSolver, evaluate};

use RelationalOperator::{Equal, GreaterOrEqual, LessOrEqual};

/// Horizontal anchor of a child inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of a child inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Where a child is pulled to inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl Alignment {
    pub const TOP_LEFT: Self = Self::new(HorizontalAlignment::Left, VerticalAlignment::Top);
    pub const TOP_CENTER: Self = Self::new(HorizontalAlignment::Center, VerticalAlignment::Top);
    pub const TOP_RIGHT: Self = Self::new(HorizontalAlignment::Right, VerticalAlignment::Top);
    pub const MIDDLE_LEFT: Self = Self::new(HorizontalAlignment::Left, VerticalAlignment::Middle);
    pub const MIDDLE_CENTER: Self =
        Self::new(HorizontalAlignment::Center, VerticalAlignment::Middle);
    pub const MIDDLE_RIGHT: Self = Self::new(HorizontalAlignment::Right, VerticalAlignment::Middle);
    pub const BOTTOM_LEFT: Self = Self::new(HorizontalAlignment::Left, VerticalAlignment::Bottom);
    pub const BOTTOM_CENTER: Self =
        Self::new(HorizontalAlignment::Center, VerticalAlignment::Bottom);
    pub const BOTTOM_RIGHT: Self = Self::new(HorizontalAlignment::Right, VerticalAlignment::Bottom);

    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtentSlot {
    MinimumWidth,
    MinimumHeight,
    PreferredWidth,
    PreferredHeight,
    FixedWidth,
    FixedHeight,
}

const SLOT_COUNT: usize = 6;

/// Geometry variables of one widget.
#[derive(Debug)]
pub struct BoxModel {
    pub left: Variable,
    pub bottom: Variable,
    pub width: Variable,
    pub height: Variable,
    pub padding: Sides,
    pub margin: Sides,
    structural: Vec<Constraint>,
    extents: [Option<(f64, Constraint)>; SLOT_COUNT],
}

impl BoxModel {
    /// Fresh variables with no padding or margin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            left: Variable::new(),
            bottom: Variable::new(),
            width: Variable::new(),
            height: Variable::new(),
            padding: Sides::ZERO,
            margin: Sides::ZERO,
            structural: Vec::new(),
            extents: Default::default(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Sides) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    // ── Registration ────────────────────────────────────────────────────

    /// Add the non-negative extent constraints to `solver`.
    ///
    /// Calling this on an already registered box does nothing.
    pub fn register(&mut self, solver: &mut WidgetSolver) -> Result<(), SolverError> {
        if self.is_registered() {
            return Ok(());
        }
        let structural = [
            constraint(self.width, GreaterOrEqual, 0.0, REQUIRED),
            constraint(self.height, GreaterOrEqual, 0.0, REQUIRED),
        ];
        for c in structural {
            solver.add_constraint(c.clone())?;
            self.structural.push(c);
        }
        Ok(())
    }

    /// Remove every constraint this box added to `solver`.
    pub fn deregister(&mut self, solver: &mut WidgetSolver) -> Result<(), SolverError> {
        for slot in self.extents.iter_mut() {
            if let Some((_, c)) = slot.take() {
                solver.remove_constraint(&c)?;
            }
        }
        for c in self.structural.drain(..) {
            solver.remove_constraint(&c)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.structural.is_empty()
    }

    // ── Derived edges ───────────────────────────────────────────────────

    /// `left + width`
    #[must_use]
    pub fn right(&self) -> Expression {
        Expression::from(self.left) + self.width
    }

    /// `left + width / 2`
    #[must_use]
    pub fn center(&self) -> Expression {
        Expression::from(self.left) + self.width * 0.5
    }

    /// `bottom + height`
    #[must_use]
    pub fn top(&self) -> Expression {
        Expression::from(self.bottom) + self.height
    }

    /// `bottom + height / 2`
    #[must_use]
    pub fn middle(&self) -> Expression {
        Expression::from(self.bottom) + self.height * 0.5
    }

    #[must_use]
    pub fn inner_left(&self) -> Expression {
        Expression::from(self.left) + f64::from(self.padding.left)
    }

    #[must_use]
    pub fn inner_right(&self) -> Expression {
        self.right() - f64::from(self.padding.right)
    }

    #[must_use]
    pub fn inner_bottom(&self) -> Expression {
        Expression::from(self.bottom) + f64::from(self.padding.bottom)
    }

    #[must_use]
    pub fn inner_top(&self) -> Expression {
        self.top() - f64::from(self.padding.top)
    }

    /// Horizontal center of the padded area.
    #[must_use]
    pub fn inner_center(&self) -> Expression {
        self.center() + f64::from(self.padding.left - self.padding.right) * 0.5
    }

    /// Vertical middle of the padded area.
    #[must_use]
    pub fn inner_middle(&self) -> Expression {
        self.middle() + f64::from(self.padding.bottom - self.padding.top) * 0.5
    }

    #[must_use]
    pub fn outer_left(&self) -> Expression {
        Expression::from(self.left) - f64::from(self.margin.left)
    }

    #[must_use]
    pub fn outer_right(&self) -> Expression {
        self.right() + f64::from(self.margin.right)
    }

    #[must_use]
    pub fn outer_bottom(&self) -> Expression {
        Expression::from(self.bottom) - f64::from(self.margin.bottom)
    }

    #[must_use]
    pub fn outer_top(&self) -> Expression {
        self.top() + f64::from(self.margin.top)
    }

    // ── Solved values ───────────────────────────────────────────────────

    /// Solved width and height. Zero before the first solve.
    #[must_use]
    pub fn current_extent(&self, values: &impl VariableValues) -> Extent {
        Extent::new(
            values.value_of(self.width) as f32,
            values.value_of(self.height) as f32,
        )
    }

    /// Solved bottom-left corner.
    #[must_use]
    pub fn current_position(&self, values: &impl VariableValues) -> Point {
        Point::new(
            values.value_of(self.left) as f32,
            values.value_of(self.bottom) as f32,
        )
    }

    #[must_use]
    pub fn current_rectangle(&self, values: &impl VariableValues) -> Rect {
        Rect::from_parts(self.current_position(values), self.current_extent(values))
    }

    /// Evaluate one of the derived edges.
    #[must_use]
    pub fn current(&self, expression: &Expression, values: &impl VariableValues) -> f32 {
        evaluate(expression, values) as f32
    }

    // ── Extent constraints ──────────────────────────────────────────────

    /// Require at least `extent`.
    pub fn set_minimum_extent(
        &mut self,
        solver: &mut WidgetSolver,
        extent: Extent,
    ) -> Result<(), SolverError> {
        let (width, height) = (self.width, self.height);
        self.set_slot(solver, ExtentSlot::MinimumWidth, extent.width, |v| {
            Some(constraint(width, GreaterOrEqual, v, REQUIRED))
        })?;
        self.set_slot(solver, ExtentSlot::MinimumHeight, extent.height, |v| {
            Some(constraint(height, GreaterOrEqual, v, REQUIRED))
        })
    }

    /// Prefer `extent` when nothing stronger decides otherwise.
    pub fn set_preferred_extent(
        &mut self,
        solver: &mut WidgetSolver,
        extent: Extent,
    ) -> Result<(), SolverError> {
        let (width, height) = (self.width, self.height);
        self.set_slot(solver, ExtentSlot::PreferredWidth, extent.width, |v| {
            Some(constraint(width, Equal, v, WEAK))
        })?;
        self.set_slot(solver, ExtentSlot::PreferredHeight, extent.height, |v| {
            Some(constraint(height, Equal, v, WEAK))
        })
    }

    /// Pin the extent. A zero component leaves that dimension free.
    pub fn set_fixed_extent(
        &mut self,
        solver: &mut WidgetSolver,
        extent: Extent,
    ) -> Result<(), SolverError> {
        self.set_fixed_width(solver, extent.width)?;
        self.set_fixed_height(solver, extent.height)
    }

    /// Pin the width. Zero leaves the width free.
    pub fn set_fixed_width(
        &mut self,
        solver: &mut WidgetSolver,
        width: f32,
    ) -> Result<(), SolverError> {
        let var = self.width;
        self.set_slot(solver, ExtentSlot::FixedWidth, width, |v| {
            (v != 0.0).then(|| constraint(var, Equal, v, REQUIRED))
        })
    }

    /// Pin the height. Zero leaves the height free.
    pub fn set_fixed_height(
        &mut self,
        solver: &mut WidgetSolver,
        height: f32,
    ) -> Result<(), SolverError> {
        let var = self.height;
        self.set_slot(solver, ExtentSlot::FixedHeight, height, |v| {
            (v != 0.0).then(|| constraint(var, Equal, v, REQUIRED))
        })
    }

    fn set_slot(
        &mut self,
        solver: &mut WidgetSolver,
        slot: ExtentSlot,
        value: f32,
        make: impl FnOnce(f64) -> Option<Constraint>,
    ) -> Result<(), SolverError> {
        let value = f64::from(value);
        let entry = &mut self.extents[slot as usize];
        match entry {
            Some((current, _)) if *current == value => return Ok(()),
            None if make_is_noop(slot, value) => return Ok(()),
            _ => {}
        }
        let new = make(value);
        solver.replace_constraint(entry.as_ref().map(|(_, c)| c), new.clone())?;
        *entry = new.map(|c| (value, c));
        Ok(())
    }

    // ── Placement ───────────────────────────────────────────────────────

    /// Keep this box at least `margin` below `other`.
    #[must_use]
    pub fn place_below(&self, other: &BoxModel, margin: f32) -> Constraint {
        constraint(
            self.top() + f64::from(margin),
            LessOrEqual,
            other.bottom,
            REQUIRED,
        )
    }

    /// Keep this box at least `margin` above `other`.
    #[must_use]
    pub fn place_above(&self, other: &BoxModel, margin: f32) -> Constraint {
        constraint(
            Expression::from(self.bottom),
            GreaterOrEqual,
            other.top() + f64::from(margin),
            REQUIRED,
        )
    }

    /// Keep this box at least `margin` to the left of `other`.
    #[must_use]
    pub fn place_left_of(&self, other: &BoxModel, margin: f32) -> Constraint {
        constraint(
            self.right() + f64::from(margin),
            LessOrEqual,
            other.left,
            REQUIRED,
        )
    }

    /// Keep this box at least `margin` to the right of `other`.
    #[must_use]
    pub fn place_right_of(&self, other: &BoxModel, margin: f32) -> Constraint {
        constraint(
            Expression::from(self.left),
            GreaterOrEqual,
            other.right() + f64::from(margin),
            REQUIRED,
        )
    }

    /// Stick to the padded top edge of `parent`, `margin` away.
    #[must_use]
    pub fn place_at_top(&self, parent: &BoxModel, margin: f32) -> Constraint {
        constraint(
            self.top() + f64::from(margin),
            Equal,
            parent.inner_top(),
            REQUIRED,
        )
    }

    /// Stick to the padded bottom edge of `parent`, `margin` away.
    #[must_use]
    pub fn place_at_bottom(&self, parent: &BoxModel, margin: f32) -> Constraint {
        constraint(
            Expression::from(self.bottom),
            Equal,
            parent.inner_bottom() + f64::from(margin),
            REQUIRED,
        )
    }

    /// Stick to the padded left edge of `parent`, `margin` away.
    #[must_use]
    pub fn place_left(&self, parent: &BoxModel, margin: f32) -> Constraint {
        constraint(
            Expression::from(self.left),
            Equal,
            parent.inner_left() + f64::from(margin),
            REQUIRED,
        )
    }

    /// Stick to the padded right edge of `parent`, `margin` away.
    #[must_use]
    pub fn place_right(&self, parent: &BoxModel, margin: f32) -> Constraint {
        constraint(
            self.right() + f64::from(margin),
            Equal,
            parent.inner_right(),
            REQUIRED,
        )
    }

    /// Constraints that keep this box, margin included, inside the padded
    /// area of `parent` and pull it towards `alignment`.
    ///
    /// Containment is required; the pull is medium strength so explicit
    /// placement can override it.
    #[must_use]
    pub fn align_within(&self, parent: &BoxModel, alignment: Alignment) -> Vec<Constraint> {
        let mut constraints = vec![
            constraint(self.outer_left(), GreaterOrEqual, parent.inner_left(), REQUIRED),
            constraint(self.outer_right(), LessOrEqual, parent.inner_right(), REQUIRED),
            constraint(self.outer_bottom(), GreaterOrEqual, parent.inner_bottom(), REQUIRED),
            constraint(self.outer_top(), LessOrEqual, parent.inner_top(), REQUIRED),
        ];
        constraints.push(match alignment.horizontal {
            HorizontalAlignment::Left => {
                constraint(self.outer_left(), Equal, parent.inner_left(), MEDIUM)
            }
            HorizontalAlignment::Center => {
                constraint(self.center(), Equal, parent.inner_center(), MEDIUM)
            }
            HorizontalAlignment::Right => {
                constraint(self.outer_right(), Equal, parent.inner_right(), MEDIUM)
            }
        });
        constraints.push(match alignment.vertical {
            VerticalAlignment::Top => constraint(self.outer_top(), Equal, parent.inner_top(), MEDIUM),
            VerticalAlignment::Middle => {
                constraint(self.middle(), Equal, parent.inner_middle(), MEDIUM)
            }
            VerticalAlignment::Bottom => {
                constraint(self.outer_bottom(), Equal, parent.inner_bottom(), MEDIUM)
            }
        });
        constraints
    }
}

/// A fixed extent of zero with nothing installed needs no constraint.
fn make_is_noop(slot: ExtentSlot, value: f64) -> bool {
    matches!(slot, ExtentSlot::FixedWidth | ExtentSlot::FixedHeight) && value == 0.0
}

impl Default for BoxModel {
    fn default() -> Self {
        Self::new()
    }
}
