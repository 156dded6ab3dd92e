use dock_win::app::{DesktopContext, DockController, MoveOutcome, WindowEvent, WindowId};
use dock_win::config::DockConfig;
use dock_win::domain::{BoundingBox, Vector};
use dock_win::platform::window::VirtualWindow;
use tracing::{error, info};

fn main() {
    dock_win::telemetry::init();

    let config = DockConfig::default();
    let mut context = DesktopContext::new(&config);
    load_monitors(&mut context);

    let Some(work_area) = context.mouse_monitor().map(|m| m.available_rect) else {
        error!("No monitors available");
        return;
    };
    info!(?work_area, "Using work area");

    let mut controller = DockController::new(config);
    controller.subscribe(|window: WindowId, event: &WindowEvent| {
        info!(%window, ?event, "window event");
    });

    // Two half-height panels stacked on the left half of the work area
    let width = work_area.width() / 2.0;
    let height = work_area.height() / 2.0;
    let origin = work_area.position();
    let top_panel = controller.add_window(VirtualWindow::new(
        "top",
        BoundingBox::new(origin.left, origin.top, origin.left + width, origin.top + height),
    ));
    let bottom_panel = controller.add_window(VirtualWindow::new(
        "bottom",
        BoundingBox::new(
            origin.left,
            origin.top + height,
            origin.left + width,
            origin.top + 2.0 * height,
        ),
    ));

    if let Err(e) = controller.handle_event(top_panel, WindowEvent::EndSnap { target: None }) {
        error!("Failed to dock panels: {}", e);
        return;
    }
    info!(members = ?controller.group_members(top_panel).ok(), "Panels docked");

    let mut target = origin;
    target.add(&Vector::new(width, 0.0));
    for (label, destination) in [
        ("right half", target),
        ("far off-screen", Vector::new(-100_000.0, -100_000.0)),
    ] {
        match controller.move_to(top_panel, destination.left, destination.top, context.monitors()) {
            Ok(MoveOutcome::Moved) => info!(
                label,
                top = ?controller.position(top_panel).ok(),
                bottom = ?controller.position(bottom_panel).ok(),
                "Group moved"
            ),
            Ok(MoveOutcome::Rejected) => info!(label, "Move rejected, group stays on screen"),
            Err(e) => error!("Failed to move group: {}", e),
        }
    }

    if let Err(e) = controller.handle_event(bottom_panel, WindowEvent::Closed) {
        error!("Failed to close panel: {}", e);
    }
    info!(
        top_docked = ?controller.is_docked(top_panel).ok(),
        bottom_docked = ?controller.is_docked(bottom_panel).ok(),
        "Panel closed"
    );
}

#[cfg(windows)]
fn load_monitors(context: &mut DesktopContext) {
    if let Err(e) = context.refresh_from_system() {
        error!("Failed to enumerate monitors: {}", e);
    }
}

#[cfg(not(windows))]
fn load_monitors(context: &mut DesktopContext) {
    use dock_win::platform::monitors::{Monitor, MonitorSet};

    // Simulated dual-monitor desk with a taskbar on the primary monitor
    context.update_monitors(MonitorSet::new(vec![
        Monitor::new(0, BoundingBox::new(0.0, 0.0, 1920.0, 1080.0))
            .with_available_rect(BoundingBox::new(0.0, 0.0, 1920.0, 1040.0)),
        Monitor::new(1, BoundingBox::new(1920.0, 0.0, 3840.0, 1080.0)),
    ]));
    context.update_mouse_position(Vector::new(960.0, 540.0));
}
