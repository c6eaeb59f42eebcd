//! The host-facing engine facade.
//!
//! [`GestureEngine`] owns every component (handler and view registries,
//! relation graph, orchestrator, per-root routers) and exposes the
//! configuration protocol the host bridge drives:
//!
//! ```
//! use horizon_gesture::{ConfigUpdate, DeliveryChannel, GestureEngine};
//! use horizon_gesture::dispatch::RecordingDispatcherFactory;
//!
//! let factory = RecordingDispatcherFactory::new();
//! let mut engine = GestureEngine::new(Box::new(factory));
//!
//! engine.create_root(1);
//! engine
//!     .create_handler("TapGestureHandler", 10, &ConfigUpdate::default())
//!     .unwrap();
//! engine
//!     .attach_to_view(10, 100, DeliveryChannel::Synchronous)
//!     .unwrap();
//! ```
//!
//! All processing is single-threaded and synchronous: each call runs to
//! completion, including every cascaded arbitration side effect, before
//! returning.

use std::collections::HashMap;

use horizon_gesture_core::diagnostics::targets;
use horizon_gesture_core::{HandlerTag, ViewTag};

use crate::config::ConfigUpdate;
use crate::dispatch::{DeliveryChannel, EventDispatcherFactory};
use crate::error::{GestureError, GestureResult};
use crate::event::RawTouchEvent;
use crate::handler::{EngineCtx, GestureHandler};
use crate::interaction::{InteractionManager, RelationConfig};
use crate::orchestrator::Orchestrator;
use crate::recognizers::create_recognizer;
use crate::registry::{HandlerRegistry, ViewRegistry};
use crate::router::RootRouter;
use crate::state::State;

/// The gesture recognition and arbitration engine.
pub struct GestureEngine {
    handlers: HandlerRegistry,
    views: ViewRegistry,
    interactions: InteractionManager,
    orchestrator: Orchestrator,
    routers: HashMap<ViewTag, RootRouter>,
    dispatcher_factory: Box<dyn EventDispatcherFactory>,
}

static_assertions::assert_impl_all!(GestureEngine: Send);

impl GestureEngine {
    /// Create an engine delivering events through the given factory.
    pub fn new(dispatcher_factory: Box<dyn EventDispatcherFactory>) -> Self {
        Self {
            handlers: HandlerRegistry::new(),
            views: ViewRegistry::new(),
            interactions: InteractionManager::new(),
            orchestrator: Orchestrator::new(),
            routers: HashMap::new(),
            dispatcher_factory,
        }
    }

    /// Register a gesture root. Touch events arrive per root.
    pub fn create_root(&mut self, root_tag: ViewTag) {
        self.routers
            .entry(root_tag)
            .or_insert_with(|| RootRouter::new(root_tag));
    }

    /// Forget a gesture root and its routing state.
    pub fn drop_root(&mut self, root_tag: ViewTag) {
        self.routers.remove(&root_tag);
    }

    /// Create a handler of the given kind with an initial configuration.
    pub fn create_handler(
        &mut self,
        kind: &str,
        tag: HandlerTag,
        config: &ConfigUpdate,
    ) -> GestureResult<()> {
        let recognizer = create_recognizer(kind).inspect_err(|err| {
            tracing::warn!(target: targets::ENGINE, handler = tag, %err, "create skipped");
        })?;
        let mut handler = GestureHandler::new(tag, recognizer);
        handler.apply_config(config);
        self.handlers.insert(handler);
        self.configure_relations(tag, config);
        tracing::debug!(target: targets::ENGINE, handler = tag, kind, "handler created");
        Ok(())
    }

    /// Apply a sparse configuration update to an existing handler.
    ///
    /// Relation lists are replaced wholesale on every update; unset options
    /// retain their previous values.
    pub fn update_handler(&mut self, tag: HandlerTag, config: &ConfigUpdate) -> GestureResult<()> {
        let Some(handler) = self.handlers.get_mut(tag) else {
            tracing::warn!(target: targets::ENGINE, handler = tag, "update for unknown handler");
            return Err(GestureError::UnknownHandler(tag));
        };
        handler.apply_config(config);
        self.configure_relations(tag, config);
        Ok(())
    }

    /// Attach a handler to a view, selecting its delivery channel.
    pub fn attach_to_view(
        &mut self,
        tag: HandlerTag,
        view_tag: ViewTag,
        channel: DeliveryChannel,
    ) -> GestureResult<()> {
        if !self.handlers.contains(tag) {
            tracing::warn!(target: targets::ENGINE, handler = tag, "attach for unknown handler");
            return Err(GestureError::UnknownHandler(tag));
        }
        self.views.ensure(view_tag);
        self.handlers.bind_to_view(tag, view_tag);

        let dispatcher = self.dispatcher_factory.create(channel, view_tag);
        let handler = self
            .handlers
            .get_mut(tag)
            .expect("handler verified present above");
        handler.channel = Some(channel);
        handler.dispatcher = Some(dispatcher);
        if handler.continuous && channel == DeliveryChannel::Synchronous {
            tracing::warn!(
                target: targets::ENGINE,
                handler = tag,
                kind = handler.kind,
                "continuous gesture on the synchronous channel; \
                 gesture-driven animations may not be smooth"
            );
        }
        Ok(())
    }

    /// Drop a handler entirely.
    ///
    /// A handler attached to a view may be registered with the orchestrator
    /// and still receive touches, so it is cancelled before removal.
    pub fn drop_handler(&mut self, tag: HandlerTag) -> GestureResult<()> {
        let Some(handler) = self.handlers.get(tag) else {
            tracing::warn!(target: targets::ENGINE, handler = tag, "drop for unknown handler");
            return Err(GestureError::UnknownHandler(tag));
        };
        if handler.view.is_some() {
            self.ctx().cancel(tag);
        }
        self.interactions.drop_relations(tag);
        self.orchestrator.forget(tag);
        let (_, orphaned_view) = self.handlers.remove(tag);
        if let Some(view_tag) = orphaned_view {
            self.views.remove(view_tag);
        }
        Ok(())
    }

    /// External state forcing, used by manual-activation recognizers and
    /// debug tooling. The request goes through the ordinary transition
    /// guards and arbitration.
    pub fn set_handler_state(&mut self, tag: HandlerTag, state: State) -> GestureResult<()> {
        if !self.handlers.contains(tag) {
            return Err(GestureError::UnknownHandler(tag));
        }
        let mut ctx = self.ctx();
        match state {
            State::Began => ctx.begin(tag),
            State::Active => ctx.activate(tag),
            State::End => ctx.end(tag),
            State::Failed => ctx.fail(tag),
            State::Cancelled => ctx.cancel(tag),
            State::Undetermined => {}
        }
        Ok(())
    }

    /// Process one raw touch event for a root, synchronously.
    #[tracing::instrument(skip(self, event), target = "horizon_gesture::engine", level = "trace")]
    pub fn handle_touch(&mut self, root_tag: ViewTag, event: &RawTouchEvent) -> GestureResult<()> {
        // Refresh cached geometry before any hit-testing.
        for view in &event.touchable_views {
            self.views.upsert(view);
        }
        let Some(router) = self.routers.get_mut(&root_tag) else {
            tracing::warn!(target: targets::ENGINE, root = root_tag, "touch for unknown root");
            return Err(GestureError::UnknownRoot(root_tag));
        };
        let mut ctx = EngineCtx {
            handlers: &mut self.handlers,
            views: &self.views,
            interactions: &self.interactions,
            orchestrator: &mut self.orchestrator,
        };
        router.handle_touch(&mut ctx, event)
    }

    /// Host-forced cancellation of all touches for a root.
    #[tracing::instrument(skip(self), target = "horizon_gesture::engine", level = "trace")]
    pub fn cancel_touches(&mut self, root_tag: ViewTag) -> GestureResult<()> {
        let Some(router) = self.routers.get_mut(&root_tag) else {
            return Err(GestureError::UnknownRoot(root_tag));
        };
        let mut ctx = EngineCtx {
            handlers: &mut self.handlers,
            views: &self.views,
            interactions: &self.interactions,
            orchestrator: &mut self.orchestrator,
        };
        router.cancel_touches(&mut ctx);
        Ok(())
    }

    /// Fire every recognizer deadline due at `now_nanos`, in deadline
    /// order. The host event loop drives this from its timer source.
    pub fn advance_time(&mut self, now_nanos: u64) {
        let mut due: Vec<(u64, HandlerTag)> = self
            .handlers
            .tags()
            .into_iter()
            .filter_map(|tag| {
                let deadline = self.handlers.get(tag)?.deadline_nanos?;
                (deadline <= now_nanos).then_some((deadline, tag))
            })
            .collect();
        due.sort_unstable();

        for (_, tag) in due {
            if let Some(handler) = self.handlers.get_mut(tag) {
                handler.deadline_nanos = None;
            }
            self.ctx().on_deadline(tag, now_nanos);
        }
    }

    /// The earliest parked recognizer deadline, for host timer scheduling.
    pub fn next_deadline(&self) -> Option<u64> {
        self.handlers
            .tags()
            .into_iter()
            .filter_map(|tag| self.handlers.get(tag)?.deadline_nanos)
            .min()
    }

    /// Current lifecycle state of a handler.
    pub fn handler_state(&self, tag: HandlerTag) -> Option<State> {
        self.handlers.get(tag).map(|handler| handler.state)
    }

    /// Number of pointers a handler currently tracks.
    pub fn tracked_pointer_count(&self, tag: HandlerTag) -> Option<usize> {
        self.handlers.get(tag).map(|handler| handler.tracker.count())
    }

    fn ctx(&mut self) -> EngineCtx<'_> {
        EngineCtx {
            handlers: &mut self.handlers,
            views: &self.views,
            interactions: &self.interactions,
            orchestrator: &mut self.orchestrator,
        }
    }

    fn configure_relations(&mut self, tag: HandlerTag, config: &ConfigUpdate) {
        let relations = RelationConfig {
            simultaneous_handlers: config.simultaneous_handlers.clone().unwrap_or_default(),
            wait_for: config.wait_for.clone().unwrap_or_default(),
            blocks_handlers: config.blocks_handlers.clone().unwrap_or_default(),
        };
        let handlers = &self.handlers;
        self.interactions
            .configure(tag, &relations, |other| handlers.contains(other));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RecordingDispatcherFactory;

    fn engine() -> GestureEngine {
        GestureEngine::new(Box::new(RecordingDispatcherFactory::new()))
    }

    #[test]
    fn test_create_unknown_kind_is_skipped() {
        let mut engine = engine();
        let err = engine
            .create_handler("PinchGestureHandler", 1, &ConfigUpdate::default())
            .unwrap_err();
        assert!(matches!(err, GestureError::UnknownHandlerKind(_)));
        assert_eq!(engine.handler_state(1), None);
    }

    #[test]
    fn test_update_unknown_handler_is_error() {
        let mut engine = engine();
        assert_eq!(
            engine.update_handler(9, &ConfigUpdate::default()),
            Err(GestureError::UnknownHandler(9))
        );
    }

    #[test]
    fn test_touch_for_unknown_root_is_error() {
        let mut engine = engine();
        let event = RawTouchEvent {
            action: 1,
            action_touch: crate::event::RawTouchPoint {
                pointer_id: 1,
                window_x: 0.0,
                window_y: 0.0,
            },
            touch_points: vec![],
            source_type: 3,
            timestamp_nanos: 0,
            touchable_views: vec![],
        };
        assert_eq!(
            engine.handle_touch(42, &event),
            Err(GestureError::UnknownRoot(42))
        );
    }

    #[test]
    fn test_deadline_bookkeeping() {
        let mut engine = engine();
        engine
            .create_handler("LongPressGestureHandler", 1, &ConfigUpdate::default())
            .unwrap();
        assert_eq!(engine.next_deadline(), None);
        // advance_time with nothing parked is a no-op
        engine.advance_time(1_000_000);
        assert_eq!(engine.handler_state(1), Some(State::Undetermined));
    }
}
