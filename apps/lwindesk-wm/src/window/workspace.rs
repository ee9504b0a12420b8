use tracing::info;

use crate::window::view::{View, ViewId};

#[derive(Debug)]
pub struct Workspace {
    pub index: usize,
    pub name: String,
    views: Vec<ViewId>,
}

impl Workspace {
    pub fn views(&self) -> &[ViewId] {
        &self.views
    }
}

/// Virtual desktops. There is always at least one, and exactly one is
/// active.
#[derive(Debug)]
pub struct WorkspaceManager {
    workspaces: Vec<Workspace>,
    active: usize,
}

impl WorkspaceManager {
    /// Create the manager with its first workspace already active.
    pub fn new(first: impl Into<String>) -> Self {
        let mut manager = Self {
            workspaces: Vec::new(),
            active: 0,
        };
        manager.create(first);
        info!("Switched to workspace 0: {}", manager.workspaces[0].name);
        manager
    }

    /// Create from a list of names; an empty list still yields one workspace.
    pub fn with_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut iter = names.iter();
        let mut manager = match iter.next() {
            Some(first) => Self::new(first.as_ref()),
            None => Self::new("Desktop 1"),
        };
        for name in iter {
            manager.create(name.as_ref());
        }
        manager
    }

    /// Append a workspace and return its index. It stays hidden until
    /// switched to.
    pub fn create(&mut self, name: impl Into<String>) -> usize {
        let index = self.workspaces.len();
        let name = name.into();
        info!("Created workspace {}: {}", index, name);
        self.workspaces.push(Workspace {
            index,
            name,
            views: Vec::new(),
        });
        index
    }

    pub fn get(&self, index: usize) -> Option<&Workspace> {
        self.workspaces.get(index)
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_workspace(&self) -> &Workspace {
        &self.workspaces[self.active]
    }

    /// Make `index` the active workspace. Returns false when it already is
    /// or does not exist.
    pub fn switch(&mut self, index: usize) -> bool {
        if index == self.active {
            return false;
        }
        let Some(ws) = self.workspaces.get(index) else {
            return false;
        };
        info!("Switched to workspace {}: {}", ws.index, ws.name);
        self.active = index;
        true
    }

    /// Record a freshly created view on the active workspace.
    pub fn adopt(&mut self, id: ViewId) -> usize {
        let active = self.active;
        self.workspaces[active].views.push(id);
        active
    }

    /// Reassign a view. Its visibility follows from the workspace it is on.
    pub fn move_view(&mut self, view: &mut View, index: usize) -> bool {
        if index >= self.workspaces.len() {
            return false;
        }
        if let Some(old) = self.workspaces.get_mut(view.workspace) {
            old.views.retain(|&v| v != view.id);
        }
        let target = &mut self.workspaces[index];
        if !target.views.contains(&view.id) {
            target.views.push(view.id);
        }
        view.workspace = index;
        true
    }

    pub fn forget(&mut self, id: ViewId) {
        for ws in &mut self.workspaces {
            ws.views.retain(|&v| v != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::SurfaceId;

    #[test]
    fn test_first_workspace_is_active() {
        let wsm = WorkspaceManager::new("Main");
        assert_eq!(wsm.len(), 1);
        assert_eq!(wsm.active(), 0);
        assert_eq!(wsm.active_workspace().name, "Main");
    }

    #[test]
    fn test_create_and_switch() {
        let mut wsm = WorkspaceManager::with_names(&["One", "Two"]);
        assert_eq!(wsm.create("Three"), 2);
        assert_eq!(wsm.get(2).map(|w| w.index), Some(2));
        assert!(wsm.get(3).is_none());

        assert!(!wsm.switch(0));
        assert!(wsm.switch(2));
        assert_eq!(wsm.active(), 2);
        assert!(!wsm.switch(2));
        assert!(!wsm.switch(7));
        assert_eq!(wsm.active(), 2);
    }

    #[test]
    fn test_empty_names_still_creates_one() {
        let names: [&str; 0] = [];
        let wsm = WorkspaceManager::with_names(&names);
        assert_eq!(wsm.len(), 1);
    }

    #[test]
    fn test_move_view() {
        let mut wsm = WorkspaceManager::with_names(&["One", "Two"]);
        let mut view = View::new(ViewId(1), SurfaceId(1), None, 0);
        view.workspace = wsm.adopt(view.id);
        assert_eq!(wsm.get(0).map(|w| w.views().len()), Some(1));

        assert!(wsm.move_view(&mut view, 1));
        assert_eq!(view.workspace, 1);
        assert!(wsm.get(0).map(|w| w.views().is_empty()).unwrap_or(false));
        assert_eq!(wsm.get(1).map(|w| w.views().to_vec()), Some(vec![ViewId(1)]));

        assert!(!wsm.move_view(&mut view, 5));
        assert_eq!(view.workspace, 1);

        wsm.forget(view.id);
        assert!(wsm.get(1).map(|w| w.views().is_empty()).unwrap_or(false));
    }
}
