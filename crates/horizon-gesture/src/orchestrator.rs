//! Arbitration between competing handlers.
//!
//! The orchestrator holds the set of handlers in play for the current touch
//! sequence and decides who may begin, activate, fail or cancel, based on
//! the relation graph. At most one exclusive handler may be active per
//! pointer sequence unless simultaneity is explicitly allowed.
//!
//! Resolution is a sequential pass over the registered handlers ordered by
//! activation index, which makes arbitration deterministic and replayable
//! from a recorded event log. The arbitration methods live on
//! [`EngineCtx`]; the struct here is only their persistent state.

use horizon_gesture_core::diagnostics::targets;
use horizon_gesture_core::{HandlerTag, PointerType, ViewTag};

use crate::handler::{EngineCtx, UNSET_ACTIVATION_INDEX};
use crate::state::State;

/// Persistent arbitration state.
#[derive(Debug, Default)]
pub struct Orchestrator {
    /// Handlers in play for the current sequence, in registration order.
    registered: Vec<HandlerTag>,
    /// Handlers parked behind an unresolved waitFor dependency.
    awaiting: Vec<HandlerTag>,
    /// Monotonic counter stamped when a handler first leaves UNDETERMINED.
    activation_counter: u64,
    /// Reentrancy depth; the finished-handler sweep only runs at depth zero.
    change_depth: u32,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next activation index, used as the arbitration tie-break.
    pub(crate) fn next_activation_index(&mut self) -> u64 {
        let index = self.activation_counter;
        self.activation_counter += 1;
        index
    }

    /// Forget a handler entirely (it is being dropped by the host).
    pub(crate) fn forget(&mut self, tag: HandlerTag) {
        self.registered.retain(|t| *t != tag);
        self.awaiting.retain(|t| *t != tag);
    }
}

impl EngineCtx<'_> {
    /// Add a handler to the current sequence if it is not in play yet.
    /// Repeated pointer events must not re-register.
    pub(crate) fn record_handler_if_not_present(&mut self, tag: HandlerTag) {
        if self.orchestrator.registered.contains(&tag) {
            return;
        }
        self.orchestrator.registered.push(tag);
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.is_activated = false;
            handler.is_awaiting = false;
            handler.pending_activation = false;
            handler.activation_index = UNSET_ACTIVATION_INDEX;
        }
        tracing::trace!(target: targets::ORCHESTRATOR, handler = tag, "registered for sequence");
    }

    /// Arbitration side effects of a handler state change. Invoked from
    /// `move_to_state` before the recognizer's own hook.
    pub(crate) fn on_handler_state_change(
        &mut self,
        tag: HandlerTag,
        new_state: State,
        old_state: State,
    ) {
        self.orchestrator.change_depth += 1;

        if new_state.is_terminal() {
            // A terminal handler cannot keep waiting; its relation edges
            // stay configured for the next gesture.
            self.remove_awaiting_handler(tag);
            self.resolve_waiters(tag, new_state);
        }

        if new_state == State::Active {
            self.try_activate(tag);
        } else if old_state == State::Active || old_state == State::End {
            let is_activated = self
                .handlers
                .get(tag)
                .is_some_and(|handler| handler.is_activated);
            if is_activated {
                self.dispatch_state_change(tag, new_state, old_state);
            } else if old_state == State::Active
                && matches!(new_state, State::Cancelled | State::Failed)
            {
                // The handler was vetoed right after self-activation and
                // never announced ACTIVE; report the fall from BEGAN.
                self.dispatch_state_change(tag, new_state, State::Began);
            }
        } else if old_state != State::Undetermined || new_state != State::Cancelled {
            self.dispatch_state_change(tag, new_state, old_state);
        }

        self.orchestrator.change_depth -= 1;
        if self.orchestrator.change_depth == 0 {
            self.cleanup_finished_handlers();
        }
    }

    /// Release or tear down handlers parked on `resolved`.
    ///
    /// FAILED/CANCELLED releases waiters to attempt `begin()` again (and a
    /// deferred activation, if one was parked); END kills them.
    fn resolve_waiters(&mut self, resolved: HandlerTag, resolution: State) {
        let waiters: Vec<HandlerTag> = self.orchestrator.awaiting.clone();
        for waiter in waiters {
            if !self.should_handler_wait_for_other(waiter, resolved) {
                continue;
            }
            if resolution == State::End {
                // The awaited gesture completed: the waiter lost its window.
                self.remove_awaiting_handler(waiter);
                self.cancel(waiter);
            } else {
                self.release_awaiting_handler(waiter);
            }
        }
        self.compact_awaiting_handlers();
    }

    /// Handle a handler that moved itself to ACTIVE: either promote it to
    /// the winning handler or veto the attempt.
    fn try_activate(&mut self, tag: HandlerTag) {
        let Some(handler) = self.handlers.get(tag) else {
            return;
        };
        if matches!(handler.state, State::Cancelled | State::Failed) {
            return;
        }
        if self.should_activate(tag) {
            self.make_active(tag);
            return;
        }
        match self.handlers.get(tag).map(|handler| handler.state) {
            Some(State::Active) => self.fail(tag),
            Some(State::Began) => self.cancel(tag),
            _ => {}
        }
    }

    /// Whether no currently-active blocker vetoes the activation.
    fn should_activate(&self, tag: HandlerTag) -> bool {
        for other in self.orchestrator.registered.iter().copied() {
            if other == tag || self.can_run_simultaneously(tag, other) {
                continue;
            }
            let other_active = self
                .handlers
                .get(other)
                .is_some_and(|handler| handler.state == State::Active);
            if other_active && self.interactions.should_be_cancelled_by(tag, other) {
                return false;
            }
        }
        true
    }

    /// Promote a handler to the winner of the sequence: cancel everything
    /// that competes with it and fail its declared waiters.
    fn make_active(&mut self, tag: HandlerTag) {
        tracing::debug!(target: targets::ORCHESTRATOR, handler = tag, "activating");
        self.remove_awaiting_handler(tag);
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.is_activated = true;
            if handler.activation_index == UNSET_ACTIVATION_INDEX {
                handler.activation_index = self.orchestrator.next_activation_index();
            }
        }

        // Victims: not simultaneous-eligible and still in play, cancelled
        // in ascending activation-index order.
        let mut victims: Vec<(u64, HandlerTag)> = self
            .orchestrator
            .registered
            .iter()
            .copied()
            .filter(|other| self.is_cancellable_victim_of(*other, tag))
            .map(|other| {
                let index = self
                    .handlers
                    .get(other)
                    .map_or(UNSET_ACTIVATION_INDEX, |handler| handler.activation_index);
                (index, other)
            })
            .collect();
        victims.sort_unstable();
        for (_, victim) in victims {
            self.cancel(victim);
        }

        // The winner excludes its losers: declared waiters go to FAILED.
        let waiters: Vec<HandlerTag> = self.orchestrator.awaiting.clone();
        for waiter in waiters {
            let still_parked = self
                .handlers
                .get(waiter)
                .is_some_and(|handler| handler.state == State::Undetermined);
            if still_parked
                && self.should_handler_wait_for_other(waiter, tag)
                && !self.can_run_simultaneously(waiter, tag)
            {
                self.remove_awaiting_handler(waiter);
                // Parked waiters never left UNDETERMINED; force the
                // transition directly.
                self.move_to_state(waiter, State::Failed);
            }
        }

        self.dispatch_state_change(tag, State::Active, State::Began);
    }

    /// Whether `victim` must be torn down when `winner` becomes active.
    fn is_cancellable_victim_of(&self, victim: HandlerTag, winner: HandlerTag) -> bool {
        if victim == winner || self.can_run_simultaneously(victim, winner) {
            return false;
        }
        let Some(victim_handler) = self.handlers.get(victim) else {
            return false;
        };
        if victim_handler.is_awaiting {
            // Parked for an unrelated reason; only an explicit blocks edge
            // tears it down here.
            return self.interactions.should_be_cancelled_by(victim, winner);
        }
        if !matches!(
            victim_handler.state,
            State::Began | State::Undetermined | State::Active
        ) {
            return false;
        }
        let Some(winner_handler) = self.handlers.get(winner) else {
            return false;
        };
        // Handlers with common pointers or a shared view always compete;
        // otherwise they only compete when their views overlap under a
        // pointer of either one.
        if !victim_handler
            .tracker
            .shares_common_pointers(&winner_handler.tracker)
            && victim_handler.view != winner_handler.view
        {
            return self.views_overlap_under_pointers(victim, winner);
        }
        true
    }

    /// Whether any tracked pointer of either handler lies within both
    /// handlers' view bounds.
    fn views_overlap_under_pointers(&self, a: HandlerTag, b: HandlerTag) -> bool {
        let (Some(handler_a), Some(handler_b)) = (self.handlers.get(a), self.handlers.get(b))
        else {
            return false;
        };
        let (Some(view_a), Some(view_b)) = (handler_a.view, handler_b.view) else {
            return false;
        };
        let within_both = |position| {
            self.views.is_position_in_bounds(view_a, position)
                && self.views.is_position_in_bounds(view_b, position)
        };
        handler_a
            .tracker
            .iter()
            .map(|(_, entry)| entry.last)
            .chain(handler_b.tracker.iter().map(|(_, entry)| entry.last))
            .any(within_both)
    }

    /// Whether the pair may both stay active for overlapping touches.
    pub(crate) fn can_run_simultaneously(&self, a: HandlerTag, b: HandlerTag) -> bool {
        if a == b {
            return true;
        }
        if self.interactions.should_recognize_simultaneously(a, b) {
            return true;
        }
        let opts_out = |tag| {
            self.handlers
                .get(tag)
                .is_some_and(|handler| handler.simultaneous_with_all)
        };
        opts_out(a) || opts_out(b)
    }

    /// Whether `handler` must stay parked while `other` is unresolved.
    pub(crate) fn should_handler_wait_for_other(
        &self,
        handler: HandlerTag,
        other: HandlerTag,
    ) -> bool {
        handler != other
            && (self.interactions.should_wait_for_failure(handler, other)
                || self
                    .interactions
                    .should_require_to_wait_for_failure(other, handler))
    }

    /// Whether any unresolved handler in play forces `tag` to wait.
    pub(crate) fn has_other_handler_to_wait_for(&self, tag: HandlerTag) -> bool {
        self.orchestrator.registered.iter().copied().any(|other| {
            let unresolved = self
                .handlers
                .get(other)
                .is_some_and(|handler| !handler.state.is_terminal());
            unresolved && self.should_handler_wait_for_other(tag, other)
        })
    }

    /// Park a handler behind its waitFor dependencies. The handler stays
    /// UNDETERMINED; its activation index is stamped at park time.
    pub(crate) fn add_awaiting_handler(&mut self, tag: HandlerTag) {
        if self.orchestrator.awaiting.contains(&tag) {
            return;
        }
        self.orchestrator.awaiting.push(tag);
        let index = self.orchestrator.next_activation_index();
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.is_awaiting = true;
            if handler.activation_index == UNSET_ACTIVATION_INDEX {
                handler.activation_index = index;
            }
        }
        tracing::debug!(target: targets::ORCHESTRATOR, handler = tag, "parked awaiting");
    }

    fn remove_awaiting_handler(&mut self, tag: HandlerTag) {
        self.orchestrator.awaiting.retain(|t| *t != tag);
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.is_awaiting = false;
        }
    }

    /// Release a parked waiter: re-attempt `begin()`, then a deferred
    /// activation if one was requested while parked.
    fn release_awaiting_handler(&mut self, tag: HandlerTag) {
        self.remove_awaiting_handler(tag);
        let pending = self
            .handlers
            .get_mut(tag)
            .map(|handler| std::mem::take(&mut handler.pending_activation))
            .unwrap_or(false);

        self.begin(tag);

        let parked_again = self
            .handlers
            .get(tag)
            .is_some_and(|handler| handler.is_awaiting);
        if pending {
            if parked_again {
                if let Some(handler) = self.handlers.get_mut(tag) {
                    handler.pending_activation = true;
                }
            } else {
                self.activate(tag);
            }
        }
    }

    /// Drop stale awaiting entries whose handlers are no longer parked.
    fn compact_awaiting_handlers(&mut self) {
        let handlers = &self.handlers;
        self.orchestrator
            .awaiting
            .retain(|tag| handlers.get(*tag).is_some_and(|handler| handler.is_awaiting));
    }

    /// Reset and de-register finished handlers. Runs only when no state
    /// change is being processed, so cascades observe a stable set.
    fn cleanup_finished_handlers(&mut self) {
        let finished: Vec<HandlerTag> = self
            .orchestrator
            .registered
            .iter()
            .copied()
            .filter(|tag| {
                self.handlers.get(*tag).is_some_and(|handler| {
                    handler.state.is_terminal() && !handler.is_awaiting
                })
            })
            .collect();
        for tag in finished {
            self.orchestrator.registered.retain(|t| *t != tag);
            self.clean_handler(tag);
        }
    }

    fn clean_handler(&mut self, tag: HandlerTag) {
        self.reset(tag);
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.is_activated = false;
            handler.is_awaiting = false;
            handler.pending_activation = false;
            handler.activation_index = UNSET_ACTIVATION_INDEX;
        }
    }

    /// A touch pointer-down cancels any in-flight mouse/pen gesture; the
    /// handler that received the touch is reset without cancelling.
    pub(crate) fn cancel_mouse_and_pen_gestures(&mut self, current: HandlerTag) {
        for tag in self.orchestrator.registered.clone() {
            let pointer_type = self
                .handlers
                .get(tag)
                .map(|handler| handler.pointer_type);
            if !matches!(pointer_type, Some(PointerType::Mouse | PointerType::Pen)) {
                continue;
            }
            if tag != current {
                self.cancel(tag);
            } else {
                self.reset(tag);
                if let Some(handler) = self.handlers.get_mut(tag) {
                    handler.is_activated = false;
                }
            }
        }
    }

    /// Host-forced cancellation of every handler attached to the given
    /// views. Reentrant-safe: cancel of an already-cancelled handler is a
    /// no-op per the state machine's guard.
    pub(crate) fn force_cancel_views(&mut self, view_tags: &[ViewTag]) {
        for view_tag in view_tags {
            for tag in self.handlers.handlers_for_view(*view_tag) {
                self.cancel(tag);
                self.reset(tag);
            }
        }
    }
}
