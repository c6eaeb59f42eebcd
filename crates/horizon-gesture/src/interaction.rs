//! The relation graph between handlers.
//!
//! Three kinds of directed edges, configured per handler alongside its
//! option record and replaced wholesale on every update:
//!
//! - **waitFor**: the source must stay out of BEGAN/ACTIVE until the target
//!   resolves to a terminal failing state.
//! - **simultaneousWith**: the two handlers may both be ACTIVE for
//!   overlapping touches; queried in both directions.
//! - **blocks**: while the source is ACTIVE, targets are cancelled on
//!   contact and may not activate.
//!
//! Every query is a pure function of the current edges and the two tags,
//! and answers `false` for self-queries.

use std::collections::HashMap;

use horizon_gesture_core::diagnostics::targets;
use horizon_gesture_core::HandlerTag;

/// Relation lists supplied with a handler's configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationConfig {
    pub simultaneous_handlers: Vec<HandlerTag>,
    pub wait_for: Vec<HandlerTag>,
    pub blocks_handlers: Vec<HandlerTag>,
}

/// Stores handler relations and answers arbitration queries about them.
#[derive(Debug, Default)]
pub struct InteractionManager {
    wait_for: HashMap<HandlerTag, Vec<HandlerTag>>,
    simultaneous: HashMap<HandlerTag, Vec<HandlerTag>>,
    blocks: HashMap<HandlerTag, Vec<HandlerTag>>,
}

impl InteractionManager {
    /// Create an empty relation graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the handler's relations with the given lists.
    ///
    /// Tags in `known` are the handlers currently registered; relation
    /// entries referencing unknown tags are logged and skipped rather than
    /// stored.
    pub fn configure<F>(&mut self, tag: HandlerTag, relations: &RelationConfig, known: F)
    where
        F: Fn(HandlerTag) -> bool,
    {
        self.drop_relations(tag);

        let filter = |kind: &str, list: &[HandlerTag]| -> Vec<HandlerTag> {
            list.iter()
                .copied()
                .filter(|other| {
                    let ok = known(*other);
                    if !ok {
                        tracing::warn!(
                            target: targets::INTERACTION,
                            handler = tag,
                            other,
                            kind,
                            "relation references unknown handler tag, skipping"
                        );
                    }
                    ok
                })
                .collect()
        };

        let wait_for = filter("waitFor", &relations.wait_for);
        if !wait_for.is_empty() {
            self.wait_for.insert(tag, wait_for);
        }
        let simultaneous = filter("simultaneousWith", &relations.simultaneous_handlers);
        if !simultaneous.is_empty() {
            self.simultaneous.insert(tag, simultaneous);
        }
        let blocks = filter("blocks", &relations.blocks_handlers);
        if !blocks.is_empty() {
            self.blocks.insert(tag, blocks);
        }
    }

    /// Remove every relation the handler declared.
    pub fn drop_relations(&mut self, tag: HandlerTag) {
        self.wait_for.remove(&tag);
        self.simultaneous.remove(&tag);
        self.blocks.remove(&tag);
    }

    /// Whether `handler` declared that it waits for `other` to fail.
    pub fn should_wait_for_failure(&self, handler: HandlerTag, other: HandlerTag) -> bool {
        handler != other && self.has_edge(&self.wait_for, handler, other)
    }

    /// Whether `handler` declared that `other` must wait for it to fail
    /// (the reverse query, letting a handler assert priority over one that
    /// did not declare the relation itself).
    pub fn should_require_to_wait_for_failure(
        &self,
        handler: HandlerTag,
        other: HandlerTag,
    ) -> bool {
        handler != other && self.has_edge(&self.blocks, handler, other)
    }

    /// Whether the two handlers declared simultaneous recognition, in
    /// either direction.
    pub fn should_recognize_simultaneously(&self, handler: HandlerTag, other: HandlerTag) -> bool {
        handler != other
            && (self.has_edge(&self.simultaneous, handler, other)
                || self.has_edge(&self.simultaneous, other, handler))
    }

    /// Whether `handler` should be cancelled by `other` on contact: true
    /// iff `other` blocks `handler`. The caller additionally requires
    /// `other` to have reached ACTIVE.
    pub fn should_be_cancelled_by(&self, handler: HandlerTag, other: HandlerTag) -> bool {
        handler != other && self.has_edge(&self.blocks, other, handler)
    }

    fn has_edge(
        &self,
        edges: &HashMap<HandlerTag, Vec<HandlerTag>>,
        source: HandlerTag,
        target: HandlerTag,
    ) -> bool {
        edges
            .get(&source)
            .is_some_and(|list| list.contains(&target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configure(manager: &mut InteractionManager, tag: HandlerTag, relations: RelationConfig) {
        manager.configure(tag, &relations, |_| true);
    }

    #[test]
    fn test_wait_for_is_directional() {
        let mut manager = InteractionManager::new();
        configure(
            &mut manager,
            1,
            RelationConfig {
                wait_for: vec![2],
                ..Default::default()
            },
        );
        assert!(manager.should_wait_for_failure(1, 2));
        assert!(!manager.should_wait_for_failure(2, 1));
    }

    #[test]
    fn test_blocks_drives_reverse_wait_query() {
        let mut manager = InteractionManager::new();
        configure(
            &mut manager,
            1,
            RelationConfig {
                blocks_handlers: vec![2],
                ..Default::default()
            },
        );
        // Handler 1 blocks 2: handler 1 requires 2 to wait for it...
        assert!(manager.should_require_to_wait_for_failure(1, 2));
        // ...and 2 is the one cancelled by 1 on contact.
        assert!(manager.should_be_cancelled_by(2, 1));
        assert!(!manager.should_be_cancelled_by(1, 2));
    }

    #[test]
    fn test_simultaneous_is_symmetric() {
        let mut manager = InteractionManager::new();
        configure(
            &mut manager,
            1,
            RelationConfig {
                simultaneous_handlers: vec![2],
                ..Default::default()
            },
        );
        assert!(manager.should_recognize_simultaneously(1, 2));
        assert!(manager.should_recognize_simultaneously(2, 1));
        assert!(!manager.should_recognize_simultaneously(1, 3));
    }

    #[test]
    fn test_self_relations_are_meaningless() {
        let mut manager = InteractionManager::new();
        configure(
            &mut manager,
            1,
            RelationConfig {
                wait_for: vec![1],
                simultaneous_handlers: vec![1],
                blocks_handlers: vec![1],
            },
        );
        assert!(!manager.should_wait_for_failure(1, 1));
        assert!(!manager.should_recognize_simultaneously(1, 1));
        assert!(!manager.should_be_cancelled_by(1, 1));
    }

    #[test]
    fn test_configure_replaces_wholesale() {
        let mut manager = InteractionManager::new();
        configure(
            &mut manager,
            1,
            RelationConfig {
                wait_for: vec![2, 3],
                ..Default::default()
            },
        );
        configure(
            &mut manager,
            1,
            RelationConfig {
                wait_for: vec![4],
                ..Default::default()
            },
        );
        assert!(!manager.should_wait_for_failure(1, 2));
        assert!(!manager.should_wait_for_failure(1, 3));
        assert!(manager.should_wait_for_failure(1, 4));
    }

    #[test]
    fn test_unknown_tags_are_skipped() {
        let mut manager = InteractionManager::new();
        manager.configure(
            1,
            &RelationConfig {
                wait_for: vec![2, 99],
                ..Default::default()
            },
            |tag| tag != 99,
        );
        assert!(manager.should_wait_for_failure(1, 2));
        assert!(!manager.should_wait_for_failure(1, 99));
    }

    #[test]
    fn test_drop_relations() {
        let mut manager = InteractionManager::new();
        configure(
            &mut manager,
            1,
            RelationConfig {
                wait_for: vec![2],
                simultaneous_handlers: vec![3],
                ..Default::default()
            },
        );
        manager.drop_relations(1);
        assert!(!manager.should_wait_for_failure(1, 2));
        assert!(!manager.should_recognize_simultaneously(1, 3));
    }
}
