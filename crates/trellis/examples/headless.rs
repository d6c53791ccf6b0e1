//! Drive a small widget tree through a headless window and print what each
//! frame presented.
//!
//!   RUST_LOG=trellis_runtime=debug cargo run -p trellis --example headless

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use trellis::prelude::*;
use trellis::{
    DefaultTheme, HeadlessSurface, KeybindingTable, MouseButtons, RecordingPlatform,
};

fn main() -> trellis::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = WindowConfig::from_env().with_title("headless");
    let mut window = Window::new(
        config,
        HeadlessSurface::new(),
        RecordingPlatform::new(),
        Arc::new(DefaultTheme::default()),
        KeybindingTable::default(),
    )?;

    let status = Observable::new(MonospaceText::new("idle"));
    let clicked = status.clone();
    window.add_widget(LabelWidget::observing(status.clone()), Alignment::TOP_LEFT)?;
    let button = window.add_widget(
        ButtonWidget::new(MonospaceText::new("press"), move || {
            clicked.set(MonospaceText::new("pressed"));
        }),
        Alignment::MIDDLE_CENTER,
    )?;

    let mut now = TimePoint::MIN;
    for frame in 0..4 {
        let outcome = window.render(now);
        println!("frame {frame}: {outcome:?} in {}", window.state());
        if frame == 1 {
            let rect = window
                .tree()
                .core(button)
                .map(|core| core.geometry().window_rectangle())
                .unwrap_or_default();
            let inside = Point::new(rect.x + 1.0, rect.y + 1.0);
            window.handle_mouse_event(MouseEvent::pressed(MouseButtons::LEFT, inside));
            window.handle_mouse_event(MouseEvent::released(MouseButtons::LEFT, inside));
        }
        now = TimePoint::from_millis(16 * (frame + 1));
    }

    let extent = window.current_extent();
    println!(
        "window {}x{} (min {:?}, max {:?}), {} frames presented",
        extent.width,
        extent.height,
        window.minimum_extent(),
        window.maximum_extent(),
        window.surface().frames().len()
    );
    Ok(())
}
