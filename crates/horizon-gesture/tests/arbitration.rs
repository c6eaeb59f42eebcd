//! End-to-end arbitration scenarios driven through the public engine API.

use horizon_gesture::dispatch::{OutgoingRecord, RecordedEvents, RecordingDispatcherFactory};
use horizon_gesture::event::{GestureEvent, GestureTouchEvent, TouchPhase};
use horizon_gesture::prelude::*;
use serde_json::json;

const MS: u64 = 1_000_000;
const ROOT: ViewTag = 1;

const ACTION_CANCEL: u32 = 0;
const ACTION_DOWN: u32 = 1;
const ACTION_MOVE: u32 = 2;
const ACTION_UP: u32 = 3;

const SOURCE_MOUSE: u32 = 1;
const SOURCE_TOUCH: u32 = 3;

struct Fixture {
    engine: GestureEngine,
    events: RecordedEvents,
}

fn fixture() -> Fixture {
    let factory = RecordingDispatcherFactory::new();
    let events = factory.events();
    let mut engine = GestureEngine::new(Box::new(factory));
    engine.create_root(ROOT);
    Fixture { engine, events }
}

fn view(tag: ViewTag, x: f32, y: f32, width: f32, height: f32) -> RawTouchableView {
    RawTouchableView {
        tag,
        frame: Rect::new(x, y, width, height),
        has_button_role: false,
    }
}

fn touch_event(
    action: u32,
    source: u32,
    pointer: PointerId,
    x: f32,
    y: f32,
    time_ms: u64,
    views: &[RawTouchableView],
) -> RawTouchEvent {
    RawTouchEvent {
        action,
        action_touch: RawTouchPoint {
            pointer_id: pointer,
            window_x: x,
            window_y: y,
        },
        touch_points: vec![RawTouchPoint {
            pointer_id: pointer,
            window_x: x,
            window_y: y,
        }],
        source_type: source,
        timestamp_nanos: time_ms * MS,
        touchable_views: views.to_vec(),
    }
}

fn down(pointer: PointerId, x: f32, y: f32, time_ms: u64, views: &[RawTouchableView]) -> RawTouchEvent {
    touch_event(ACTION_DOWN, SOURCE_TOUCH, pointer, x, y, time_ms, views)
}

fn mv(pointer: PointerId, x: f32, y: f32, time_ms: u64, views: &[RawTouchableView]) -> RawTouchEvent {
    touch_event(ACTION_MOVE, SOURCE_TOUCH, pointer, x, y, time_ms, views)
}

fn up(pointer: PointerId, x: f32, y: f32, time_ms: u64, views: &[RawTouchableView]) -> RawTouchEvent {
    touch_event(ACTION_UP, SOURCE_TOUCH, pointer, x, y, time_ms, views)
}

/// State-change states recorded for one handler, in emission order.
fn states_of(events: &RecordedEvents, tag: HandlerTag) -> Vec<State> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|record| match record {
            OutgoingRecord::StateChange(e) if e.handler_tag == tag => Some(e.state),
            _ => None,
        })
        .collect()
}

/// Raw touch records forwarded for one handler, in emission order.
fn touches_of(events: &RecordedEvents, tag: HandlerTag) -> Vec<GestureTouchEvent> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|record| match record {
            OutgoingRecord::Gesture(GestureEvent::Touch(e)) if e.handler_tag == tag => {
                Some(e.clone())
            }
            _ => None,
        })
        .collect()
}

fn create_manual(engine: &mut GestureEngine, tag: HandlerTag, view_tag: ViewTag) {
    engine
        .create_handler("ManualGestureHandler", tag, &ConfigUpdate::default())
        .unwrap();
    engine
        .attach_to_view(tag, view_tag, DeliveryChannel::Synchronous)
        .unwrap();
}

#[test]
fn test_single_pan_lifecycle_never_fails() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 200.0, 200.0)];
    engine
        .create_handler("PanGestureHandler", 10, &ConfigUpdate::default())
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::AnimationDriver)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));

    // Past the default slop: the pan activates.
    engine.handle_touch(ROOT, &mv(1, 80.0, 50.0, 16, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Active));

    engine.handle_touch(ROOT, &mv(1, 90.0, 50.0, 32, &views)).unwrap();
    engine.handle_touch(ROOT, &up(1, 90.0, 50.0, 48, &views)).unwrap();

    // UNDETERMINED -> BEGAN -> ACTIVE -> END, with no cancel/fail anywhere.
    assert_eq!(
        states_of(&events, 10),
        vec![State::Began, State::Active, State::End]
    );
    // After the terminal state the handler resets and is eligible again.
    assert_eq!(engine.handler_state(10), Some(State::Undetermined));
}

#[test]
fn test_transitions_are_idempotent() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 10, 100);

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine.set_handler_state(10, State::Began).unwrap(); // already BEGAN
    engine.set_handler_state(10, State::Active).unwrap();
    engine.set_handler_state(10, State::Active).unwrap(); // already ACTIVE

    let states = states_of(&events, 10);
    assert_eq!(states, vec![State::Began, State::Active]);
    assert_eq!(engine.handler_state(10), Some(State::Active));
}

#[test]
fn test_mutual_exclusion_on_shared_view() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 10, 100);
    create_manual(&mut engine, 20, 100);

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));
    assert_eq!(engine.handler_state(20), Some(State::Began));

    // The first handler to reach ACTIVE cancels the competitor within the
    // same processing step.
    engine.set_handler_state(10, State::Active).unwrap();

    assert_eq!(states_of(&events, 10), vec![State::Began, State::Active]);
    assert_eq!(states_of(&events, 20), vec![State::Began, State::Cancelled]);
    assert!(!states_of(&events, 20).contains(&State::Active));
}

#[test]
fn test_wait_for_releases_on_failure() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 20, 100);
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "waitFor": [20] })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();

    // The waiter must not leave UNDETERMINED while its dependency is
    // unresolved.
    assert_eq!(engine.handler_state(20), Some(State::Began));
    assert_eq!(engine.handler_state(10), Some(State::Undetermined));
    assert!(states_of(&events, 10).is_empty());

    // A failing resolution releases the waiter.
    engine.set_handler_state(20, State::Failed).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));
    assert_eq!(states_of(&events, 10), vec![State::Began]);
}

#[test]
fn test_wait_for_loser_fails_when_dependency_activates() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 20, 100);
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "waitFor": [20] })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine.set_handler_state(20, State::Active).unwrap();

    // The winner excludes its declared waiters.
    assert_eq!(engine.handler_state(20), Some(State::Active));
    assert_eq!(states_of(&events, 10), vec![State::Failed]);
    assert!(!states_of(&events, 10).contains(&State::Began));
}

#[test]
fn test_hit_slop_contraction_blocks_begin() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "hitSlop": { "left": -50.0 } })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    // In view bounds, but left of the contracted hit rectangle.
    engine.handle_touch(ROOT, &down(1, 25.0, 50.0, 0, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Undetermined));
    assert!(states_of(&events, 10).is_empty());

    // Inside the contracted rectangle the same handler begins.
    engine.handle_touch(ROOT, &up(1, 25.0, 50.0, 5, &views)).unwrap();
    engine.handle_touch(ROOT, &down(1, 75.0, 50.0, 10, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));
}

#[test]
fn test_down_up_round_trip_keeps_mapped_id() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "needsPointerData": true })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(7, 60.0, 60.0, 0, &views)).unwrap();
    engine.handle_touch(ROOT, &up(7, 60.0, 60.0, 10, &views)).unwrap();

    let touches = touches_of(&events, 10);
    assert_eq!(touches.len(), 2);
    assert_eq!(touches[0].phase, TouchPhase::Down);
    assert_eq!(touches[1].phase, TouchPhase::Up);

    // Same mapped touch id on both sides of the round trip, same coords.
    let down_touch = touches[0].changed_touches[0];
    let up_touch = touches[1].changed_touches[0];
    assert_eq!(down_touch.id, up_touch.id);
    assert_eq!(down_touch.absolute_x, up_touch.absolute_x);
    assert_eq!(down_touch.absolute_y, up_touch.absolute_y);

    // The up event reports one pointer less while still listing it.
    assert_eq!(touches[1].all_touches.len(), 1);
    assert_eq!(touches[1].number_of_touches, 0);

    // No tracked pointers remain afterwards.
    assert_eq!(engine.tracked_pointer_count(10), Some(0));
}

#[test]
fn test_long_press_timer_scenario() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 200.0, 100.0)];
    engine
        .create_handler(
            "LongPressGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "minDurationMs": 800 })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));
    assert_eq!(engine.next_deadline(), Some(800 * MS));

    // No movement for 900ms; the host timer fires the activation.
    engine.advance_time(900 * MS);
    assert_eq!(engine.handler_state(10), Some(State::Active));

    engine.handle_touch(ROOT, &up(1, 50.0, 50.0, 900, &views)).unwrap();

    let states = states_of(&events, 10);
    assert_eq!(states, vec![State::Began, State::Active, State::End]);
    let active_at = states.iter().position(|s| *s == State::Active).unwrap();
    let end_at = states.iter().position(|s| *s == State::End).unwrap();
    assert!(active_at < end_at);
}

#[test]
fn test_cancel_when_outside_policies() {
    // ACTIVE handlers cancel when the pointer leaves the view.
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "shouldCancelWhenOutside": true })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine.set_handler_state(10, State::Active).unwrap();
    engine.handle_touch(ROOT, &mv(1, 150.0, 50.0, 16, &views)).unwrap();
    assert_eq!(
        states_of(&events, 10),
        vec![State::Began, State::Active, State::Cancelled]
    );

    // BEGAN handlers fail instead.
    let Fixture { mut engine, events } = fixture();
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "shouldCancelWhenOutside": true })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine.handle_touch(ROOT, &mv(1, 150.0, 50.0, 16, &views)).unwrap();
    assert_eq!(states_of(&events, 10), vec![State::Began, State::Failed]);
}

#[test]
fn test_child_gets_touches_before_parent() {
    let Fixture { mut engine, events } = fixture();
    // Touchable views arrive root to leaf.
    let views = [
        view(100, 0.0, 0.0, 200.0, 200.0),
        view(200, 50.0, 50.0, 100.0, 100.0),
    ];
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "needsPointerData": true })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();
    engine
        .create_handler(
            "ManualGestureHandler",
            20,
            &ConfigUpdate::from_json(&json!({ "needsPointerData": true })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(20, 200, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 75.0, 75.0, 0, &views)).unwrap();

    // The child view's handler (20) sees the touch first.
    let first_touch = events
        .lock()
        .unwrap()
        .iter()
        .find_map(|record| match record {
            OutgoingRecord::Gesture(GestureEvent::Touch(e)) => Some(e.handler_tag),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_touch, 20);
}

#[test]
fn test_simultaneous_handlers_both_stay_active() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 20, 100);
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "simultaneousHandlers": [20] })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine.set_handler_state(10, State::Active).unwrap();
    // The declared-simultaneous competitor survives...
    assert_eq!(engine.handler_state(20), Some(State::Began));

    engine.set_handler_state(20, State::Active).unwrap();
    // ...and both can be active at once.
    assert_eq!(engine.handler_state(10), Some(State::Active));
    assert_eq!(engine.handler_state(20), Some(State::Active));
    assert!(!states_of(&events, 10).contains(&State::Cancelled));
    assert!(!states_of(&events, 20).contains(&State::Cancelled));
}

#[test]
fn test_cancel_touches_is_reentrant_safe() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 10, 100);

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));

    engine.cancel_touches(ROOT).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Undetermined));
    let after_first = states_of(&events, 10);
    assert_eq!(after_first, vec![State::Began, State::Cancelled]);

    // A second forced cancellation changes nothing.
    engine.cancel_touches(ROOT).unwrap();
    assert_eq!(states_of(&events, 10), after_first);
    assert_eq!(engine.handler_state(10), Some(State::Undetermined));
}

#[test]
fn test_touch_cancels_mouse_gesture() {
    let Fixture { mut engine, events } = fixture();
    let view_a = [view(100, 0.0, 0.0, 100.0, 100.0)];
    let view_b = [view(200, 100.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 10, 100);
    create_manual(&mut engine, 20, 200);

    // A mouse press starts a gesture on the first view...
    engine
        .handle_touch(
            ROOT,
            &touch_event(ACTION_DOWN, SOURCE_MOUSE, 1, 50.0, 50.0, 0, &view_a),
        )
        .unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));

    // ...and a finger landing elsewhere cancels it.
    engine
        .handle_touch(
            ROOT,
            &touch_event(ACTION_DOWN, SOURCE_TOUCH, 2, 150.0, 50.0, 5, &view_b),
        )
        .unwrap();
    assert_eq!(states_of(&events, 10), vec![State::Began, State::Cancelled]);
    assert_eq!(engine.handler_state(20), Some(State::Began));
}

#[test]
fn test_blocks_handlers_parks_and_fails_the_blocked() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 20, 100);
    // Handler 10 blocks handler 20: 20 must wait for 10 and is excluded
    // when 10 wins.
    engine
        .create_handler(
            "ManualGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "blocksHandlers": [20] })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));
    assert_eq!(engine.handler_state(20), Some(State::Undetermined));

    engine.set_handler_state(10, State::Active).unwrap();
    assert_eq!(states_of(&events, 20), vec![State::Failed]);
}

#[test]
fn test_manual_activation_requires_external_promotion() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 200.0, 200.0)];
    // A pan that is manually activated never self-activates, even past the
    // distance threshold; it is also declared simultaneous with another
    // handler to pin down that combination.
    create_manual(&mut engine, 20, 100);
    engine
        .create_handler(
            "PanGestureHandler",
            10,
            &ConfigUpdate::from_json(
                &json!({ "manualActivation": true, "simultaneousHandlers": [20] }),
            )
            .unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::Synchronous)
        .unwrap();

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine.handle_touch(ROOT, &mv(1, 150.0, 50.0, 16, &views)).unwrap();
    // Way past the slop, still only BEGAN.
    assert_eq!(engine.handler_state(10), Some(State::Began));

    // External promotion activates it; the simultaneous partner survives.
    engine.set_handler_state(10, State::Active).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Active));
    assert_eq!(engine.handler_state(20), Some(State::Began));
    assert_eq!(states_of(&events, 10), vec![State::Began, State::Active]);
}

#[test]
fn test_two_finger_pan_with_min_pointers() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 300.0, 300.0)];
    engine
        .create_handler(
            "PanGestureHandler",
            10,
            &ConfigUpdate::from_json(&json!({ "minPointers": 2 })).unwrap(),
        )
        .unwrap();
    engine
        .attach_to_view(10, 100, DeliveryChannel::AnimationDriver)
        .unwrap();

    // One finger alone does not begin the pan.
    engine.handle_touch(ROOT, &down(1, 100.0, 100.0, 0, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Undetermined));

    // The second finger begins the gesture.
    let mut second = down(2, 120.0, 100.0, 10, &views);
    second.touch_points = vec![
        RawTouchPoint {
            pointer_id: 1,
            window_x: 100.0,
            window_y: 100.0,
        },
        RawTouchPoint {
            pointer_id: 2,
            window_x: 120.0,
            window_y: 100.0,
        },
    ];
    engine.handle_touch(ROOT, &second).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));
    assert_eq!(engine.tracked_pointer_count(10), Some(2));

    // Dragging one finger past the slop activates.
    engine.handle_touch(ROOT, &mv(2, 160.0, 100.0, 30, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Active));

    // Lifting one finger keeps the pan alive; lifting the last ends it.
    engine.handle_touch(ROOT, &up(1, 100.0, 100.0, 40, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Active));
    engine.handle_touch(ROOT, &up(2, 160.0, 100.0, 50, &views)).unwrap();
    assert_eq!(
        states_of(&events, 10),
        vec![State::Began, State::Active, State::End]
    );
}

#[test]
fn test_unknown_action_code_drops_single_event() {
    let Fixture { mut engine, .. } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 10, 100);

    let mut bad = down(1, 50.0, 50.0, 0, &views);
    bad.action = 9;
    assert_eq!(
        engine.handle_touch(ROOT, &bad),
        Err(GestureError::UnknownTouchPhase(9))
    );

    // The session keeps working for the next event.
    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 5, &views)).unwrap();
    assert_eq!(engine.handler_state(10), Some(State::Began));
}

#[test]
fn test_cancel_action_cancels_and_resets() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 10, 100);

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine
        .handle_touch(
            ROOT,
            &touch_event(ACTION_CANCEL, SOURCE_TOUCH, 1, 50.0, 50.0, 10, &views),
        )
        .unwrap();

    assert_eq!(states_of(&events, 10), vec![State::Began, State::Cancelled]);
    assert_eq!(engine.handler_state(10), Some(State::Undetermined));
    assert_eq!(engine.tracked_pointer_count(10), Some(0));
}

#[test]
fn test_drop_handler_cancels_prepared_gesture() {
    let Fixture { mut engine, events } = fixture();
    let views = [view(100, 0.0, 0.0, 100.0, 100.0)];
    create_manual(&mut engine, 10, 100);

    engine.handle_touch(ROOT, &down(1, 50.0, 50.0, 0, &views)).unwrap();
    engine.drop_handler(10).unwrap();

    assert_eq!(states_of(&events, 10), vec![State::Began, State::Cancelled]);
    assert_eq!(engine.handler_state(10), None);
    // Dropping again reports the unknown tag.
    assert_eq!(engine.drop_handler(10), Err(GestureError::UnknownHandler(10)));
}
