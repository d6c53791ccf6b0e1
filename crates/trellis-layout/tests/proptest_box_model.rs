//! Property-based tests for box-model algebra and solver probing.
//!
//! 1. Derived edges equal their closed forms for any primitive values.
//! 2. Suggesting an extreme extent lands on the required bounds.
//! 3. Containment holds for every alignment after solving.

use std::collections::HashMap;

use proptest::prelude::*;
use trellis_core::geometry::{Extent, Sides};
use trellis_layout::{
    Alignment, BoxModel, HorizontalAlignment, RelationalOperator, VerticalAlignment,
    WidgetSolver, constraint, evaluate, strength,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn whole(max: u16) -> impl Strategy<Value = f64> {
    (0..=max).prop_map(f64::from)
}

fn alignment_strategy() -> impl Strategy<Value = Alignment> {
    let h = prop_oneof![
        Just(HorizontalAlignment::Left),
        Just(HorizontalAlignment::Center),
        Just(HorizontalAlignment::Right),
    ];
    let v = prop_oneof![
        Just(VerticalAlignment::Top),
        Just(VerticalAlignment::Middle),
        Just(VerticalAlignment::Bottom),
    ];
    (h, v).prop_map(|(h, v)| Alignment::new(h, v))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Derived edges
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn derived_edges_are_exact(
        left in whole(4000),
        bottom in whole(4000),
        width in whole(4000),
        height in whole(4000),
    ) {
        let model = BoxModel::new();
        let values = HashMap::from([
            (model.left, left),
            (model.bottom, bottom),
            (model.width, width),
            (model.height, height),
        ]);
        prop_assert_eq!(evaluate(&model.right(), &values), left + width);
        prop_assert_eq!(evaluate(&model.center(), &values), left + width / 2.0);
        prop_assert_eq!(evaluate(&model.top(), &values), bottom + height);
        prop_assert_eq!(evaluate(&model.middle(), &values), bottom + height / 2.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Probing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zero_suggestion_finds_minimum(min_w in 1u16..2000, min_h in 1u16..2000) {
        let mut solver = WidgetSolver::new();
        let mut model = BoxModel::new();
        model.register(&mut solver).unwrap();
        let minimum = Extent::new(f32::from(min_w), f32::from(min_h));
        model.set_minimum_extent(&mut solver, minimum).unwrap();
        solver.suggest(model.width, 0.0).unwrap();
        solver.suggest(model.height, 0.0).unwrap();
        prop_assert_eq!(model.current_extent(&solver), minimum);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn aligned_child_stays_inside(
        alignment in alignment_strategy(),
        pad in 0u16..20,
        child_w in 1u16..100,
        child_h in 1u16..100,
    ) {
        let mut solver = WidgetSolver::new();
        let mut parent = BoxModel::new().with_padding(Sides::all(f32::from(pad)));
        let mut child = BoxModel::new();
        parent.register(&mut solver).unwrap();
        child.register(&mut solver).unwrap();
        use RelationalOperator::Equal;
        for c in [
            constraint(parent.left, Equal, 0.0, strength::REQUIRED),
            constraint(parent.bottom, Equal, 0.0, strength::REQUIRED),
            constraint(parent.width, Equal, 400.0, strength::REQUIRED),
            constraint(parent.height, Equal, 300.0, strength::REQUIRED),
        ] {
            solver.add_constraint(c).unwrap();
        }
        child
            .set_fixed_extent(&mut solver, Extent::new(f32::from(child_w), f32::from(child_h)))
            .unwrap();
        for c in child.align_within(&parent, alignment) {
            solver.add_constraint(c).unwrap();
        }
        let inner = parent
            .current_rectangle(&solver)
            .inner(Sides::all(f32::from(pad)));
        let rect = child.current_rectangle(&solver);
        let eps = 1e-3;
        prop_assert!(rect.left() >= inner.left() - eps, "{:?} in {:?}", rect, inner);
        prop_assert!(rect.right() <= inner.right() + eps, "{:?} in {:?}", rect, inner);
        prop_assert!(rect.bottom() >= inner.bottom() - eps, "{:?} in {:?}", rect, inner);
        prop_assert!(rect.top() <= inner.top() + eps, "{:?} in {:?}", rect, inner);
    }
}
