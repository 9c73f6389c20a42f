//! Post-render notifications
//!
//! Tools subscribe a callback that runs every time a view finishes
//! rendering. Callbacks run synchronously on the host's event thread, in
//! subscription order.

use crate::view::ViewProvider;
use quill_core::{QuillError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Handle returned by a subscription, used to remove it again
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CallbackId(u64);

impl CallbackId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback#{}", self.0)
    }
}

/// Callback invoked with the view that was just rendered
pub type PostRenderCallback = Box<dyn FnMut(&dyn ViewProvider)>;

/// Source of "view re-rendered" notifications
pub trait RenderNotifier {
    fn add_post_render_callback(&mut self, callback: PostRenderCallback) -> Result<CallbackId>;

    fn remove_callback(&mut self, id: CallbackId) -> Result<()>;
}

/// In-memory notifier; the host calls [`PostRenderHub::notify`] after drawing a view
#[derive(Default)]
pub struct PostRenderHub {
    next_id: u64,
    callbacks: BTreeMap<CallbackId, PostRenderCallback>,
}

impl PostRenderHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every subscribed callback against `view`
    pub fn notify(&mut self, view: &dyn ViewProvider) {
        for callback in self.callbacks.values_mut() {
            callback(view);
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl RenderNotifier for PostRenderHub {
    fn add_post_render_callback(&mut self, callback: PostRenderCallback) -> Result<CallbackId> {
        self.next_id += 1;
        let id = CallbackId(self.next_id);
        self.callbacks.insert(id, callback);
        log::debug!("post-render subscription {id} added");
        Ok(id)
    }

    fn remove_callback(&mut self, id: CallbackId) -> Result<()> {
        if self.callbacks.remove(&id).is_none() {
            return Err(QuillError::CallbackError(format!("unknown {id}")));
        }
        log::debug!("post-render subscription {id} removed");
        Ok(())
    }
}
