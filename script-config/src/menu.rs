//! Menu entries, a script exposes to the host.
//!
//! Host asks every script for its menu groups, checks each action against
//! the current selection and its own version to decide whether to show
//! it, and calls the action with the selection, when the user picks it.

use crate::{
    errors::{ConfigError, ConfigResult},
    host::{Host, HostVersion, MessageKind},
};
use log::debug;
use std::fmt::Debug;

type VisibilityCallback<S> = dyn Fn(&[S]) -> bool;
type ActionCallback<S> = dyn Fn(&[S]) -> anyhow::Result<()>;

/// Single menu item.
///
/// `S` is the type of the selected host objects.
pub struct MenuAction<S> {
    name: String,
    order: u32,
    minimum_version: Option<HostVersion>,
    is_visible: Box<VisibilityCallback<S>>,
    operation: Box<ActionCallback<S>>,
}
impl<S> MenuAction<S> {
    /// Visible for any selection and any host version.
    pub fn new(
        name: impl Into<String>,
        operation: impl Fn(&[S]) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            order: 0,
            minimum_version: None,
            is_visible: Box::new(|_| true),
            operation: Box::new(operation),
        }
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn visible_when(
        mut self,
        predicate: impl Fn(&[S]) -> bool + 'static,
    ) -> Self {
        self.is_visible = Box::new(predicate);
        self
    }

    pub fn minimum_version(mut self, version: HostVersion) -> Self {
        self.minimum_version = Some(version);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_available(&self, selection: &[S], version: HostVersion) -> bool {
        if let Some(minimum) = self.minimum_version {
            if version < minimum {
                return false;
            }
        }
        (self.is_visible)(selection)
    }

    pub fn call(&self, selection: &[S]) -> anyhow::Result<()> {
        (self.operation)(selection)
    }
}
impl<S> Debug for MenuAction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuAction")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("minimum_version", &self.minimum_version)
            .finish()
    }
}

/// Submenu with actions.
#[derive(Debug)]
pub struct MenuGroup<S> {
    name: String,
    hierarchy: Vec<String>,
    order: u32,
    actions: Vec<MenuAction<S>>,
}
impl<S> MenuGroup<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hierarchy: Vec::new(),
            order: 0,
            actions: Vec::new(),
        }
    }

    /// Parent menus, from the top.
    pub fn hierarchy(
        mut self,
        hierarchy: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.hierarchy = hierarchy.into_iter().map(Into::into).collect();
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Add action.
    ///
    /// Returns [ConfigError::DuplicateAction] if the group already has
    /// action with the same name.
    pub fn with_action(mut self, action: MenuAction<S>) -> ConfigResult<Self> {
        self.push_action(action)?;
        Ok(self)
    }

    pub fn push_action(&mut self, action: MenuAction<S>) -> ConfigResult<()> {
        if self.action(action.name()).is_some() {
            return Err(ConfigError::DuplicateAction(action.name));
        }
        self.actions.push(action);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[MenuAction<S>] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&MenuAction<S>> {
        self.actions.iter().find(|a| a.name == name)
    }
}

/// Visible menu item, as the host should present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub hierarchy: Vec<String>,
    pub group: String,
    pub action: String,
}

/// All menu groups of a script.
#[derive(Debug)]
pub struct ScriptMenu<S> {
    groups: Vec<MenuGroup<S>>,
}
impl<S> Default for ScriptMenu<S> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}
impl<S> ScriptMenu<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register group.
    ///
    /// Actions of a group with already registered name are appended to it.
    pub fn register(&mut self, group: MenuGroup<S>) -> ConfigResult<()> {
        debug!("register menu group: {}", group.name);
        match self.groups.iter_mut().find(|g| g.name == group.name) {
            None => self.groups.push(group),
            Some(existing) => {
                for action in group.actions {
                    existing.push_action(action)?;
                }
            }
        }
        Ok(())
    }

    pub fn groups(&self) -> &[MenuGroup<S>] {
        &self.groups
    }

    /// Entries to show for the selection, sorted by group and action order.
    pub fn visible_actions(
        &self,
        selection: &[S],
        version: HostVersion,
    ) -> Vec<MenuEntry> {
        let mut groups: Vec<&MenuGroup<S>> = self.groups.iter().collect();
        groups.sort_by_key(|g| g.order);
        let mut entries = Vec::new();
        for group in groups {
            let mut actions: Vec<&MenuAction<S>> = group
                .actions
                .iter()
                .filter(|a| a.is_available(selection, version))
                .collect();
            actions.sort_by_key(|a| a.order);
            entries.extend(actions.into_iter().map(|a| MenuEntry {
                hierarchy: group.hierarchy.clone(),
                group: group.name.clone(),
                action: a.name.clone(),
            }));
        }
        entries
    }

    /// Run action, chosen by the user.
    ///
    /// Errors of the action are posted to the host console and returned.
    pub fn invoke(
        &self,
        group: &str,
        action: &str,
        selection: &[S],
        host: &impl Host,
    ) -> anyhow::Result<()> {
        let found = self
            .groups
            .iter()
            .find(|g| g.name == group)
            .and_then(|g| g.action(action))
            .filter(|a| a.is_available(selection, host.version()))
            .ok_or_else(|| {
                ConfigError::UnknownAction(format!("{group}/{action}"))
            })?;
        debug!("invoke menu action: {}/{}", group, action);
        found.call(selection).map_err(|e| {
            host.show_console_msg(
                &format!("{action}: {e}"),
                MessageKind::Error,
                5,
            );
            e
        })
    }
}
