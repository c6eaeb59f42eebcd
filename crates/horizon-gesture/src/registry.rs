//! Handler and view registries.
//!
//! The [`HandlerRegistry`] is the single owner of every
//! [`GestureHandler`]; the orchestrator, router and relation graph refer to
//! handlers by tag only. The [`ViewRegistry`] is a lightweight cache of the
//! host view tree's bounding boxes, refreshed opportunistically whenever a
//! raw touch event reports updated geometry.

use std::collections::HashMap;

use horizon_gesture_core::{HandlerTag, Point, Rect, ViewTag};

use crate::event::RawTouchableView;
use crate::handler::GestureHandler;

/// Owns every registered handler, indexed by tag and by attached view.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    by_tag: HashMap<HandlerTag, GestureHandler>,
    by_view: HashMap<ViewTag, Vec<HandlerTag>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A handler with the same tag is replaced.
    pub(crate) fn insert(&mut self, handler: GestureHandler) {
        self.by_tag.insert(handler.tag, handler);
    }

    pub(crate) fn contains(&self, tag: HandlerTag) -> bool {
        self.by_tag.contains_key(&tag)
    }

    pub(crate) fn get(&self, tag: HandlerTag) -> Option<&GestureHandler> {
        self.by_tag.get(&tag)
    }

    pub(crate) fn get_mut(&mut self, tag: HandlerTag) -> Option<&mut GestureHandler> {
        self.by_tag.get_mut(&tag)
    }

    /// Bind a handler to a view, maintaining the view index.
    ///
    /// A handler is attached to at most one view; re-binding moves it.
    pub(crate) fn bind_to_view(&mut self, tag: HandlerTag, view_tag: ViewTag) {
        let Some(handler) = self.by_tag.get_mut(&tag) else {
            return;
        };
        if let Some(previous) = handler.view.replace(view_tag) {
            self.unindex_view(tag, previous);
        }
        let entry = self.by_view.entry(view_tag).or_default();
        if !entry.contains(&tag) {
            entry.push(tag);
        }
    }

    /// Handlers attached to a view, in attachment order.
    pub(crate) fn handlers_for_view(&self, view_tag: ViewTag) -> Vec<HandlerTag> {
        self.by_view.get(&view_tag).cloned().unwrap_or_default()
    }

    /// Remove a handler, returning it together with the view tag that lost
    /// its last handler (if any), so the caller can evict the view cache.
    pub(crate) fn remove(&mut self, tag: HandlerTag) -> (Option<GestureHandler>, Option<ViewTag>) {
        let Some(handler) = self.by_tag.remove(&tag) else {
            return (None, None);
        };
        let mut orphaned_view = None;
        if let Some(view_tag) = handler.view {
            self.unindex_view(tag, view_tag);
            if !self.by_view.contains_key(&view_tag) {
                orphaned_view = Some(view_tag);
            }
        }
        (Some(handler), orphaned_view)
    }

    /// Every registered handler tag.
    pub(crate) fn tags(&self) -> Vec<HandlerTag> {
        self.by_tag.keys().copied().collect()
    }

    fn unindex_view(&mut self, tag: HandlerTag, view_tag: ViewTag) {
        if let Some(entry) = self.by_view.get_mut(&view_tag) {
            entry.retain(|t| *t != tag);
            if entry.is_empty() {
                self.by_view.remove(&view_tag);
            }
        }
    }
}

/// A cached snapshot of one touchable view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    pub frame: Rect,
    pub has_button_role: bool,
}

/// Mirror of the host view tree's bounding boxes.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: HashMap<ViewTag, ViewSnapshot>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh (or create) a view snapshot from raw event geometry.
    pub(crate) fn upsert(&mut self, raw: &RawTouchableView) {
        self.views.insert(
            raw.tag,
            ViewSnapshot {
                frame: raw.frame,
                has_button_role: raw.has_button_role,
            },
        );
    }

    /// Ensure a view exists, with an empty frame until layout reports one.
    /// Handlers can be attached before the view is ever touched.
    pub(crate) fn ensure(&mut self, view_tag: ViewTag) {
        self.views.entry(view_tag).or_insert(ViewSnapshot {
            frame: Rect::ZERO,
            has_button_role: false,
        });
    }

    pub(crate) fn rect_of(&self, view_tag: ViewTag) -> Option<Rect> {
        self.views.get(&view_tag).map(|view| view.frame)
    }

    /// Whether the view carries a button accessibility role.
    pub(crate) fn has_button_role(&self, view_tag: ViewTag) -> bool {
        self.views
            .get(&view_tag)
            .is_some_and(|view| view.has_button_role)
    }

    /// Whether a window-space position falls within the view's bounds.
    pub(crate) fn is_position_in_bounds(&self, view_tag: ViewTag, position: Point) -> bool {
        self.rect_of(view_tag)
            .is_some_and(|rect| rect.contains(position))
    }

    pub(crate) fn remove(&mut self, view_tag: ViewTag) {
        self.views.remove(&view_tag);
    }
}
