#![forbid(unsafe_code)]

//! Property tests for the window extent probe.

use std::sync::Arc;

use proptest::prelude::*;
use trellis_core::geometry::Extent;
use trellis_core::keybinding::KeybindingTable;
use trellis_core::time::TimePoint;
use trellis_layout::{Alignment, RelationalOperator, constraint, strength};
use trellis_runtime::{
    HeadlessSurface, RecordingPlatform, RenderOutcome, Window, WindowConfig, WindowState,
};
use trellis_widgets::{DefaultTheme, LayoutContext, Widget};

struct AtLeast(Extent);

impl Widget for AtLeast {
    fn init(&mut self, cx: &mut LayoutContext<'_>) {
        cx.set_minimum_extent(self.0);
    }
}

fn window(extent: Extent) -> Window<HeadlessSurface, RecordingPlatform> {
    let mut window = Window::new(
        WindowConfig::default().with_extent(extent),
        HeadlessSurface::new(),
        RecordingPlatform::new(),
        Arc::new(DefaultTheme::compact()),
        KeybindingTable::default(),
    )
    .unwrap();
    window.render(TimePoint::MIN);
    window
}

fn whole(range: std::ops::Range<u16>) -> impl Strategy<Value = f32> {
    range.prop_map(f32::from)
}

proptest! {
    #[test]
    fn current_extent_lands_between_limits(
        min_w in whole(1..400),
        min_h in whole(1..400),
        w in whole(1..600),
        h in whole(1..600),
    ) {
        let mut window = window(Extent::new(w, h));
        window.add_widget(AtLeast(Extent::new(min_w, min_h)), Alignment::TOP_LEFT).unwrap();
        let outcome = window.render(TimePoint::MIN);
        let resized = w < min_w || h < min_h;
        let expected_outcome = if resized {
            matches!(outcome, RenderOutcome::NotReady(WindowState::SwapchainLost))
        } else {
            matches!(outcome, RenderOutcome::Presented { .. })
        };
        prop_assert!(expected_outcome, "unexpected outcome {:?}", outcome);

        prop_assert_eq!(window.minimum_extent(), Extent::new(min_w, min_h));
        prop_assert_eq!(window.current_extent(), Extent::new(w.max(min_w), h.max(min_h)));
        prop_assert_eq!(window.platform().size_requests.len(), usize::from(resized));
    }

    #[test]
    fn constraint_removal_restores_limits(cap in whole(1..400), floor in whole(0..400)) {
        let mut window = window(Extent::new(200.0, 100.0));
        let (minimum, maximum) = (window.minimum_extent(), window.maximum_extent());
        let width = window.tree().core(window.root()).unwrap().box_model.width;
        let height = window.tree().core(window.root()).unwrap().box_model.height;

        let upper = constraint(width, RelationalOperator::LessOrEqual, f64::from(cap), strength::REQUIRED);
        let lower = constraint(height, RelationalOperator::GreaterOrEqual, f64::from(floor), strength::REQUIRED);
        window.add_constraint(upper.clone());
        window.add_constraint(lower.clone());
        prop_assert_eq!(window.maximum_extent().width, cap);
        prop_assert_eq!(window.minimum_extent().height, floor);

        window.remove_constraint(&lower);
        window.remove_constraint(&upper);
        prop_assert_eq!(window.minimum_extent(), minimum);
        prop_assert_eq!(window.maximum_extent(), maximum);
    }
}
