//! Container registry
//!
//! The registry owns every live [`Container`], routes platform events to
//! them, and offers the bulk operations (refresh/clear all, broadcast
//! subscriptions, programmatic access by surface).

use std::sync::Arc;

use scrollsync_platform::{Axis, NodeId, NotificationSource, Platform, PlatformEvent};
use slotmap::SlotMap;

use crate::config::{ResizeSource, ScrollbarConfig};
use crate::container::Container;
use crate::error::{Result, ScrollError};
use crate::events::{EventHandler, EventKind, ScrollEvent};
use crate::resize::ResizeWatcher;

slotmap::new_key_type! {
    /// Handle to a registered container
    pub struct ContainerId;
}

/// Live containers in registration order
#[derive(Debug, Default)]
pub struct Registry {
    config: ScrollbarConfig,
    containers: SlotMap<ContainerId, Container>,
    order: Vec<ContainerId>,
    watcher: ResizeWatcher,
}

impl Registry {
    pub fn new(config: ScrollbarConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ScrollbarConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Containers in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ContainerId, &Container)> {
        self.order
            .iter()
            .filter_map(|id| self.containers.get(*id).map(|c| (*id, c)))
    }

    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }

    /// Container managing `node`
    pub fn find(&self, node: NodeId) -> Option<ContainerId> {
        self.iter().find(|(_, c)| c.node() == node).map(|(id, _)| id)
    }

    pub fn watcher(&self) -> &ResizeWatcher {
        &self.watcher
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register one container per surface.
    ///
    /// Surfaces that are already registered return their existing handle.
    pub fn create<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        nodes: &[NodeId],
    ) -> Vec<ContainerId> {
        nodes
            .iter()
            .map(|&node| self.create_one(platform, node))
            .collect()
    }

    pub fn create_one<P: Platform + ?Sized>(&mut self, platform: &mut P, node: NodeId) -> ContainerId {
        if let Some(id) = self.find(node) {
            tracing::debug!(?node, "surface already registered");
            return id;
        }

        let container = Container::new(platform, node, self.config);
        let id = self.containers.insert(container);
        self.order.push(id);
        if self.config.resize_source == ResizeSource::Poll {
            self.watcher.watch(platform, node);
        }
        id
    }

    /// Clear a container and drop it from the registry
    pub fn remove<P: Platform + ?Sized>(&mut self, platform: &mut P, id: ContainerId) -> Result<()> {
        let mut container = self
            .containers
            .remove(id)
            .ok_or(ScrollError::UnknownContainer)?;
        self.order.retain(|other| *other != id);
        self.watcher.unwatch(container.node());

        match container.clear(platform) {
            Ok(()) | Err(ScrollError::Cleared) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Remove the container managing `node`
    pub fn clear<P: Platform + ?Sized>(&mut self, platform: &mut P, node: NodeId) -> Result<()> {
        let id = self.find(node).ok_or(ScrollError::UnknownSurface)?;
        self.remove(platform, id)
    }

    // =========================================================================
    // Bulk operations
    // =========================================================================

    pub fn refresh_all<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        for id in &self.order {
            if let Some(container) = self.containers.get_mut(*id) {
                if container.is_active() {
                    container.insert_scrollbars(platform);
                }
            }
        }
    }

    pub fn clear_all<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        for id in std::mem::take(&mut self.order) {
            if let Some(mut container) = self.containers.remove(id) {
                self.watcher.unwatch(container.node());
                match container.clear(platform) {
                    Ok(()) | Err(ScrollError::Cleared) => {}
                    Err(err) => tracing::warn!(%err, "container clear failed"),
                }
            }
        }
        tracing::debug!("all containers cleared");
    }

    /// Subscribe one handler to every live container
    pub fn on_any<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&ScrollEvent) + Send + Sync + 'static,
    {
        let handler: EventHandler = Arc::new(handler);
        for container in self.containers.values_mut() {
            container.on_shared(kind, handler.clone());
        }
    }

    /// Jump `node`'s `axis` to an internal position
    pub fn scroll_to<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        node: NodeId,
        axis: Axis,
        position: f32,
    ) -> Result<f32> {
        let id = self.find(node).ok_or(ScrollError::UnknownSurface)?;
        self.containers
            .get_mut(id)
            .ok_or(ScrollError::UnknownContainer)?
            .scroll_to(platform, axis, position)
    }

    /// Percent scrolled from the start of `node`'s `axis`
    pub fn position_of(&self, node: NodeId, axis: Axis) -> Result<f32> {
        let id = self.find(node).ok_or(ScrollError::UnknownSurface)?;
        self.containers
            .get(id)
            .ok_or(ScrollError::UnknownContainer)?
            .position(axis)
    }

    // =========================================================================
    // Event routing
    // =========================================================================

    /// Route one platform event. Returns whether any container reacted.
    pub fn dispatch<P: Platform + ?Sized>(&mut self, platform: &mut P, event: &PlatformEvent) -> bool {
        if matches!(event, PlatformEvent::WindowResize) {
            return self.poll_resize(platform) > 0;
        }

        let mut handled = false;
        for id in &self.order {
            if let Some(container) = self.containers.get_mut(*id) {
                handled |= container.handle(platform, event);
            }
        }
        if !handled {
            tracing::trace!(?event, "event ignored");
        }
        handled
    }

    /// Drain `platform`'s notifications. Returns how many were delivered.
    pub fn pump<P>(&mut self, platform: &mut P) -> usize
    where
        P: Platform + NotificationSource + ?Sized,
    {
        let mut delivered = 0;
        while let Some(event) = platform.next_notification() {
            self.dispatch(platform, &event);
            delivered += 1;
        }
        delivered
    }

    /// Poll the resize watcher, marking changed surfaces
    pub fn poll_resize<P: Platform + ?Sized>(&mut self, platform: &mut P) -> usize {
        self.watcher.poll(platform).len()
    }
}
