//! Registry of views that receive world snapshots.

use std::fmt;

use maze_chase_core::{WorldObserver, WorldSnapshot};

/// Ordered collection of registered views.
#[derive(Default)]
pub(crate) struct ViewRegistry {
    views: Vec<Box<dyn WorldObserver>>,
}

impl ViewRegistry {
    /// Appends a view and immediately hands it the current snapshot.
    pub(crate) fn register(&mut self, mut view: Box<dyn WorldObserver>, snapshot: &WorldSnapshot) {
        view.on_update(snapshot);
        self.views.push(view);
    }

    /// Pushes the snapshot to every view in registration order.
    pub(crate) fn notify_all(&mut self, snapshot: &WorldSnapshot) {
        for view in &mut self.views {
            view.on_update(snapshot);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.views.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.views.len())
            .finish()
    }
}
