use crate::{
    indicator::{IndicatorController, IndicatorPosition, SAVE_DEBOUNCE, WorkArea},
    tests::fakes::{FakeStore, FakeSurface, Shared, StoreLog, SurfaceLog, shared},
};

use std::time::{Duration, Instant};

const SCREEN: WorkArea = WorkArea {
    x: 0,
    y: 0,
    width: 1920,
    height: 1040,
};

fn controller(
    saved: Option<IndicatorPosition>,
    work_area: Option<WorkArea>,
) -> (
    IndicatorController<FakeSurface, FakeStore>,
    Shared<SurfaceLog>,
    Shared<StoreLog>,
) {
    let surface = shared::<SurfaceLog>();
    let store = shared::<StoreLog>();
    if let Ok(mut log) = store.lock() {
        log.saved = saved;
    }

    let controller = IndicatorController::new(
        FakeSurface {
            log: surface.clone(),
            work_area,
        },
        FakeStore(store.clone()),
    );

    (controller, surface, store)
}

/// WHAT: A saved position inside the work area is restored as-is
/// WHY: The user put the indicator there on purpose
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_position_on_screen_when_created_then_restored() {
    // Given/When: A saved position that fits
    let saved = IndicatorPosition::new(100, 200);
    let (controller, surface, store) = controller(Some(saved), Some(SCREEN));

    // Then: The window sits there, hidden, and nothing was rewritten
    assert_eq!(surface.lock().unwrap().position, Some(saved));
    assert!(!controller.is_visible());
    assert_eq!(store.lock().unwrap().saves, 0);
}

/// WHAT: An off-screen position is replaced by the centred one
/// WHY: A disconnected monitor must not hide the indicator forever
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_position_off_screen_when_created_then_centered_and_saved() {
    // Given/When: A saved position hanging off the right edge
    let (_controller, surface, store) =
        controller(Some(IndicatorPosition::new(1800, 10)), Some(SCREEN));

    // Then: The window is centred and that position persisted
    let centered = IndicatorPosition::new((1920 - 150) / 2, (1040 - 32) / 2);
    assert_eq!(surface.lock().unwrap().position, Some(centered));
    assert_eq!(store.lock().unwrap().saved, Some(centered));
}

/// WHAT: With no saved position the window is centred
/// WHY: First launch needs a visible default
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_saved_position_when_created_then_centered() {
    // Given/When: Nothing saved
    let (_controller, _surface, store) = controller(None, Some(SCREEN));

    // Then: The centred position is saved
    assert_eq!(
        store.lock().unwrap().saved,
        Some(IndicatorPosition::new(885, 504))
    );
}

/// WHAT: Show and hide are idempotent
/// WHY: Release and final can both try to hide the indicator
#[test]
#[allow(clippy::unwrap_used)]
fn given_controller_when_show_and_hide_repeat_then_surface_changes_once_each() {
    // Given: A hidden indicator
    let (mut controller, surface, _store) = controller(None, Some(SCREEN));

    // When: Showing and hiding twice each
    assert!(controller.show());
    assert!(!controller.show());
    assert!(controller.hide());
    assert!(!controller.hide());

    // Then: The surface saw exactly two changes
    let log = surface.lock().unwrap();
    assert_eq!(log.visibility_changes, 2);
    assert!(!log.visible);
}

/// WHAT: Moves are saved once after a quiet period
/// WHY: Dragging fires many move events; the file is written once
#[test]
#[allow(clippy::unwrap_used)]
fn given_drag_when_moves_settle_then_saved_once_after_debounce() {
    // Given: A placed indicator
    let (mut controller, _surface, store) =
        controller(Some(IndicatorPosition::new(10, 10)), Some(SCREEN));
    let start = Instant::now();

    // When: Several moves arrive during a drag
    controller.on_moved(IndicatorPosition::new(20, 20), start);
    controller.on_moved(
        IndicatorPosition::new(30, 30),
        start + Duration::from_millis(100),
    );
    controller.poll(start + Duration::from_millis(400));
    assert_eq!(store.lock().unwrap().saves, 0);

    let last_move = start + Duration::from_millis(100);
    assert_eq!(controller.next_deadline(), Some(last_move + SAVE_DEBOUNCE));
    controller.poll(last_move + SAVE_DEBOUNCE);
    controller.poll(last_move + SAVE_DEBOUNCE * 4);

    // Then: Only the final position was written, once
    let log = store.lock().unwrap();
    assert_eq!(log.saves, 1);
    assert_eq!(log.saved, Some(IndicatorPosition::new(30, 30)));
    assert_eq!(controller.next_deadline(), None);
}

/// WHAT: Closing flushes a pending move immediately
/// WHY: The debounce must not lose the last drag on exit
#[test]
#[allow(clippy::unwrap_used)]
fn given_pending_move_when_closed_then_saved_immediately() {
    // Given: A move still inside its debounce window
    let (mut controller, _surface, store) =
        controller(Some(IndicatorPosition::new(10, 10)), Some(SCREEN));
    controller.on_moved(IndicatorPosition::new(42, 24), Instant::now());

    // When: The window closes
    controller.close();

    // Then: The move was written
    assert_eq!(
        store.lock().unwrap().saved,
        Some(IndicatorPosition::new(42, 24))
    );
}

/// WHAT: Work area containment checks every edge
/// WHY: A window half off-screen cannot be dragged back
#[test]
fn given_work_area_when_checking_containment_then_all_edges_enforced() {
    // Given: A secondary display to the left of the primary
    let area = WorkArea {
        x: -1280,
        y: 0,
        width: 1280,
        height: 1024,
    };
    let size = crate::indicator::IndicatorSize {
        width: 150,
        height: 32,
    };

    // When/Then: Edge cases are classified
    assert!(area.contains(IndicatorPosition::new(-1280, 0), size));
    assert!(area.contains(IndicatorPosition::new(-150, 992), size));
    assert!(!area.contains(IndicatorPosition::new(-149, 0), size));
    assert!(!area.contains(IndicatorPosition::new(-1281, 0), size));
    assert!(!area.contains(IndicatorPosition::new(-500, 993), size));
}
