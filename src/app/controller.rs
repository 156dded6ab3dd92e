//! Docking controller
//!
//! The controller owns every registered window, the dock group table and the
//! observers. It implements the docking algorithm:
//! - `dock` merges two groups when the two windows' own meshes touch
//! - `undock` dissolves a group into singletons, then re-docks every remaining
//!   pair that still touches
//! - `move_to` moves a whole group by one delta, but only if some part of the
//!   group would stay on a monitor
//!
//! Every grouped operation reads all geometry it needs before changing any
//! state, so a window that is not ready makes the operation fail without
//! partial effects.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::app::events::{DockObserver, WindowEvent};
use crate::app::groups::{GroupId, GroupTable};
use crate::config::DockConfig;
use crate::domain::{BoundingBox, CollisionMesh, Shape, Vector};
use crate::platform::monitors::MonitorSet;
use crate::platform::window::{WindowError, WindowHost};

/// Identity of a registered window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u32);

impl WindowId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Errors raised by controller operations
#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error("Unknown window {0}")]
    UnknownWindow(WindowId),

    #[error("Window {child} cannot become a child of {parent}")]
    InvalidChild { parent: WindowId, child: WindowId },

    #[error("Making {child} a child of {parent} would create a cycle")]
    ChildCycle { parent: WindowId, child: WindowId },

    #[error("Window {child} is not a child of {parent}")]
    NotAChild { parent: WindowId, child: WindowId },

    #[error("Window operation failed: {0}")]
    Window(#[from] WindowError),
}

/// How a child relates to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChildOptions {
    /// The child's box is part of the parent's collision mesh and moves with it
    pub add_to_parent_mesh: bool,
    /// The child is raised whenever a docked peer of its parent raises its children
    pub always_above_parent: bool,
}

impl ChildOptions {
    /// Child that contributes to its parent's mesh
    pub fn in_mesh() -> Self {
        Self {
            add_to_parent_mesh: true,
            always_above_parent: false,
        }
    }

    /// Floating child kept above its parent, outside the mesh
    pub fn above_parent() -> Self {
        Self {
            add_to_parent_mesh: false,
            always_above_parent: true,
        }
    }
}

/// Which windows contribute boxes to a collision mesh
///
/// The default includes mesh-contributing children and the whole dock group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshOptions {
    pub ignore_children: bool,
    pub ignore_docked_group: bool,
}

impl MeshOptions {
    /// The window and its mesh-contributing children, without docked peers
    pub fn own() -> Self {
        Self {
            ignore_children: false,
            ignore_docked_group: true,
        }
    }

    /// Only the window's own box
    pub fn bare() -> Self {
        Self {
            ignore_children: true,
            ignore_docked_group: true,
        }
    }
}

/// Result of a grouped move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Every member was moved
    Moved,
    /// The group would have left every monitor; nothing moved
    Rejected,
}

#[derive(Debug)]
struct DockWindow {
    host: Box<dyn WindowHost>,
    parent: Option<WindowId>,
    children: Vec<WindowId>,
    options: ChildOptions,
    group: GroupId,
    docked: bool,
}

/// Owner of windows, dock groups and observers
pub struct DockController {
    config: DockConfig,
    windows: HashMap<WindowId, DockWindow>,
    groups: GroupTable,
    next_window_id: u32,
    observers: Vec<Box<dyn DockObserver>>,
}

impl fmt::Debug for DockController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockController")
            .field("config", &self.config)
            .field("windows", &self.windows)
            .field("groups", &self.groups)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for DockController {
    fn default() -> Self {
        Self::new(DockConfig::default())
    }
}

impl DockController {
    pub fn new(config: DockConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
            groups: GroupTable::new(),
            next_window_id: 1,
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    /// Registers an observer for every window event
    pub fn subscribe(&mut self, observer: impl DockObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Registers an independent window (a group of one)
    pub fn add_window(&mut self, host: impl WindowHost + 'static) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        let group = self.groups.create_singleton(id);
        self.windows.insert(
            id,
            DockWindow {
                host: Box::new(host),
                parent: None,
                children: Vec::new(),
                options: ChildOptions::default(),
                group,
                docked: false,
            },
        );
        debug!(%id, %group, "window registered");
        id
    }

    /// Registers a new window as a child of `parent`
    pub fn add_child(
        &mut self,
        parent: WindowId,
        host: impl WindowHost + 'static,
        options: ChildOptions,
    ) -> Result<WindowId, DockError> {
        self.window(parent)?;
        let child = self.add_window(host);
        self.attach_child(parent, child, options)?;
        Ok(child)
    }

    /// Makes an existing, parentless window a child of `parent`
    pub fn attach_child(
        &mut self,
        parent: WindowId,
        child: WindowId,
        options: ChildOptions,
    ) -> Result<(), DockError> {
        self.window(parent)?;
        if parent == child || self.window(child)?.parent.is_some() {
            return Err(DockError::InvalidChild { parent, child });
        }

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(DockError::ChildCycle { parent, child });
            }
            cursor = self.window(current)?.parent;
        }

        let window = self.window_mut(child)?;
        window.parent = Some(parent);
        window.options = options;
        self.window_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detaches a child and lets the parent react to losing it
    pub fn remove_child(&mut self, parent: WindowId, child: WindowId) -> Result<(), DockError> {
        self.window(child)?;
        let parent_window = self.window_mut(parent)?;
        let index = parent_window
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(DockError::NotAChild { parent, child })?;
        parent_window.children.remove(index);
        self.window_mut(child)?.parent = None;

        self.handle_event(parent, WindowEvent::ChildRemoved { child })
    }

    /// Undocks and forgets a window; its children become parentless
    pub fn remove_window(&mut self, id: WindowId) -> Result<(), DockError> {
        self.undock(id)?;
        if let Some(parent) = self.window(id)?.parent {
            self.remove_child(parent, id)?;
        }

        let window = self
            .windows
            .remove(&id)
            .ok_or(DockError::UnknownWindow(id))?;
        for child in window.children {
            if let Some(child) = self.windows.get_mut(&child) {
                child.parent = None;
            }
        }
        self.groups.retire(window.group);
        info!(%id, "window removed");
        Ok(())
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// Registered window ids in ascending order
    pub fn window_ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.windows.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn host(&self, id: WindowId) -> Result<&dyn WindowHost, DockError> {
        Ok(self.window(id)?.host.as_ref())
    }

    pub fn parent(&self, id: WindowId) -> Result<Option<WindowId>, DockError> {
        Ok(self.window(id)?.parent)
    }

    pub fn children(&self, id: WindowId) -> Result<&[WindowId], DockError> {
        Ok(&self.window(id)?.children)
    }

    pub fn is_docked(&self, id: WindowId) -> Result<bool, DockError> {
        Ok(self.window(id)?.docked)
    }

    /// Identity of the window's current group
    pub fn group_id(&self, id: WindowId) -> Result<GroupId, DockError> {
        Ok(self.window(id)?.group)
    }

    /// Members of the window's group (including the window itself)
    pub fn group_members(&self, id: WindowId) -> Result<&[WindowId], DockError> {
        Ok(self.groups.members(self.window(id)?.group))
    }

    pub fn position(&self, id: WindowId) -> Result<Vector, DockError> {
        Ok(self.window(id)?.host.position()?)
    }

    /// Windows whose boxes make up the mesh, in mesh order
    pub fn collision_mesh_windows(
        &self,
        id: WindowId,
        options: MeshOptions,
    ) -> Result<Vec<WindowId>, DockError> {
        let mut windows = Vec::new();
        self.collect_mesh_windows(id, options, &mut windows)?;
        Ok(windows)
    }

    /// Collision mesh of the window, its children and/or its dock group
    pub fn collision_mesh(&self, id: WindowId, options: MeshOptions) -> Result<CollisionMesh, DockError> {
        self.collision_mesh_windows(id, options)?
            .into_iter()
            .map(|window| -> Result<BoundingBox, DockError> {
                Ok(self.window(window)?.host.bounds()?)
            })
            .collect()
    }

    /// Box enclosing the window, its mesh children and its whole group
    pub fn bounding_box(&self, id: WindowId) -> Result<BoundingBox, DockError> {
        Ok(self
            .collision_mesh(id, MeshOptions::default())?
            .to_bounding_box())
    }

    /// Merges the groups of two touching windows
    ///
    /// Returns `Ok(false)` without changes when the windows already share a
    /// group or do not touch.
    pub fn dock(&mut self, id: WindowId, other: WindowId) -> Result<bool, DockError> {
        let group = self.window(id)?.group;
        self.window(other)?;
        if self.groups.contains(group, other) {
            return Ok(false);
        }

        let mesh = self.collision_mesh(id, MeshOptions::own())?;
        let other_mesh = self.collision_mesh(other, MeshOptions::own())?;
        if !mesh.is_touching(&other_mesh) {
            debug!(%id, %other, "dock refused: windows are not touching");
            return Ok(false);
        }

        self.merge_groups(id, other)?;
        Ok(true)
    }

    /// Dissolves the window's group and re-docks the remaining members that touch
    ///
    /// Every former member, including the ones that end up docked again, is
    /// notified with `Undocked` before any reconnection happens.
    pub fn undock(&mut self, id: WindowId) -> Result<(), DockError> {
        let group = self.window(id)?.group;
        if self.groups.len(group) <= 1 {
            return Ok(());
        }

        let old_group = self.groups.members(group).to_vec();
        let remaining: Vec<WindowId> = old_group.iter().copied().filter(|w| *w != id).collect();
        let meshes = remaining
            .iter()
            .map(|window| self.collision_mesh(*window, MeshOptions::own()))
            .collect::<Result<Vec<_>, _>>()?;

        self.groups.retire(group);
        for &member in &old_group {
            let singleton = self.groups.create_singleton(member);
            let window = self.window_mut(member)?;
            window.group = singleton;
            window.docked = false;
            self.notify(member, WindowEvent::Undocked);
        }

        for (i, &window) in remaining.iter().enumerate() {
            for (j, &other) in remaining.iter().enumerate() {
                if i == j || !meshes[i].is_touching(&meshes[j]) {
                    continue;
                }
                let target = self.window(window)?.group;
                if !self.groups.contains(target, other) {
                    self.merge_groups(window, other)?;
                }
            }
        }

        debug!(%id, former = old_group.len(), "group dissolved");
        Ok(())
    }

    /// Moves the window's whole group so the window lands at `(left, top)`
    ///
    /// The move is committed only if the translated boxes of every window that
    /// will move collide with at least one monitor. Mesh children move first,
    /// then docked peers (with their mesh children), then the window itself.
    /// Failures moving children or peers are logged; the window's own move
    /// result is returned.
    pub fn move_to(
        &mut self,
        id: WindowId,
        left: f64,
        top: f64,
        monitors: &MonitorSet,
    ) -> Result<MoveOutcome, DockError> {
        let mut delta = Vector::new(left, top);
        delta.subtract(&self.position(id)?);

        let plan = self.move_plan(id)?;
        let mut prospective = std::iter::once(id)
            .chain(plan.iter().copied())
            .map(|window| -> Result<BoundingBox, DockError> {
                Ok(self.window(window)?.host.bounds()?)
            })
            .collect::<Result<CollisionMesh, _>>()?;
        prospective.move_by(&delta);
        if !prospective.some_colliding(monitors.monitors()) {
            debug!(%id, left, top, "move rejected: group would leave every monitor");
            return Ok(MoveOutcome::Rejected);
        }

        for window in plan {
            if let Err(err) = self.move_window_by(window, &delta) {
                warn!(%id, %window, error = %err, "failed to move group member");
            }
        }
        self.move_window_by(id, &delta)?;
        Ok(MoveOutcome::Moved)
    }

    /// Moves a single window without touching its children or group
    pub fn move_primitive(&mut self, id: WindowId, left: f64, top: f64) -> Result<(), DockError> {
        self.window_mut(id)?.host.move_to(left, top)?;
        Ok(())
    }

    /// Minimizes every member of the window's group
    pub fn minimize(&mut self, id: WindowId) -> Result<(), DockError> {
        self.for_each_member(id, true, |host| host.minimize())
    }

    /// Restores every member of the window's group
    pub fn restore(&mut self, id: WindowId) -> Result<(), DockError> {
        self.for_each_member(id, true, |host| host.restore())
    }

    /// Reacts to a window event, then forwards it to the observers
    ///
    /// `Docked` and `Undocked` are produced by the controller only; inbound
    /// copies are dropped without reaching the observers.
    pub fn handle_event(&mut self, id: WindowId, event: WindowEvent) -> Result<(), DockError> {
        self.window(id)?;
        if event.is_notification() {
            debug!(%id, ?event, "ignoring inbound dock notification");
            return Ok(());
        }
        match event {
            WindowEvent::Hidden if self.config.undock_on_hidden => self.undock(id)?,
            WindowEvent::Maximized if self.config.undock_on_maximize => self.undock(id)?,
            WindowEvent::Closed if self.config.undock_on_close => self.undock(id)?,
            WindowEvent::Restored if self.config.restore_group_on_restore => {
                self.for_each_member(id, false, |host| host.restore())?
            }
            WindowEvent::ChildRemoved { child } if self.config.undock_on_child_remove => {
                if self.window(child)?.options.add_to_parent_mesh {
                    self.undock(id)?;
                }
            }
            WindowEvent::EndSnap { target } if self.config.dock_on_snap => {
                self.dock_after_snap(id, target)?
            }
            WindowEvent::BringToFront => {
                self.for_each_member(id, false, |host| host.bring_to_front())?
            }
            WindowEvent::BringChildrenToFront => self.bring_peer_children_to_front(id)?,
            _ => {}
        }

        self.notify(id, event);
        Ok(())
    }

    fn window(&self, id: WindowId) -> Result<&DockWindow, DockError> {
        self.windows.get(&id).ok_or(DockError::UnknownWindow(id))
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut DockWindow, DockError> {
        self.windows.get_mut(&id).ok_or(DockError::UnknownWindow(id))
    }

    fn notify(&mut self, window: WindowId, event: WindowEvent) {
        for observer in &mut self.observers {
            observer.on_event(window, &event);
        }
    }

    /// Appends every member of `other`'s group to `id`'s group
    fn merge_groups(&mut self, id: WindowId, other: WindowId) -> Result<(), DockError> {
        let target = self.window(id)?.group;
        let source = self.window(other)?.group;

        for member in self.groups.retire(source) {
            if self.groups.push(target, member) {
                self.window_mut(member)?.group = target;
            }
        }

        let members = self.groups.members(target).to_vec();
        debug!(%id, %other, group = %target, size = members.len(), "windows docked");
        for member in members {
            self.window_mut(member)?.docked = true;
            self.notify(member, WindowEvent::Docked);
        }
        Ok(())
    }

    fn collect_mesh_windows(
        &self,
        id: WindowId,
        options: MeshOptions,
        out: &mut Vec<WindowId>,
    ) -> Result<(), DockError> {
        let window = self.window(id)?;
        out.push(id);

        if !options.ignore_children {
            for &child in &window.children {
                if self.window(child)?.options.add_to_parent_mesh {
                    self.collect_mesh_windows(child, options, out)?;
                }
            }
        }

        if !options.ignore_docked_group {
            let nested = MeshOptions {
                ignore_docked_group: true,
                ..options
            };
            for &peer in self.groups.members(window.group) {
                if peer != id {
                    self.collect_mesh_windows(peer, nested, out)?;
                }
            }
        }
        Ok(())
    }

    /// Windows moved along with `id`, in move order, excluding `id` itself
    fn move_plan(&self, id: WindowId) -> Result<Vec<WindowId>, DockError> {
        let mut plan = Vec::new();
        self.collect_mesh_descendants(id, &mut plan)?;
        for &peer in self.groups.members(self.window(id)?.group) {
            if peer != id && !plan.contains(&peer) {
                plan.push(peer);
                self.collect_mesh_descendants(peer, &mut plan)?;
            }
        }
        plan.retain(|window| *window != id);
        Ok(plan)
    }

    fn collect_mesh_descendants(&self, id: WindowId, plan: &mut Vec<WindowId>) -> Result<(), DockError> {
        for &child in &self.window(id)?.children {
            if self.window(child)?.options.add_to_parent_mesh && !plan.contains(&child) {
                plan.push(child);
                self.collect_mesh_descendants(child, plan)?;
            }
        }
        Ok(())
    }

    fn move_window_by(&mut self, id: WindowId, delta: &Vector) -> Result<(), DockError> {
        let window = self.window_mut(id)?;
        let mut target = window.host.position()?;
        target.add(delta);
        window.host.move_to(target.left, target.top)?;
        Ok(())
    }

    /// Runs `op` on every group member, returning the first failure after all ran
    fn for_each_member<F>(&mut self, id: WindowId, include_self: bool, mut op: F) -> Result<(), DockError>
    where
        F: FnMut(&mut dyn WindowHost) -> Result<(), WindowError>,
    {
        let members = self.group_members(id)?.to_vec();
        let mut first_error = None;
        for member in members {
            if !include_self && member == id {
                continue;
            }
            let window = self.window_mut(member)?;
            if let Err(err) = op(window.host.as_mut()) {
                warn!(window = %member, error = %err, "group operation failed");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn dock_after_snap(&mut self, id: WindowId, target: Option<WindowId>) -> Result<(), DockError> {
        if let Some(target) = target {
            self.dock(id, target)?;
            return Ok(());
        }

        for candidate in self.window_ids() {
            if candidate == id {
                continue;
            }
            let window = self.window(candidate)?;
            if window.parent.is_some() || !window.host.is_visible() {
                continue;
            }
            match self.dock(id, candidate) {
                Err(DockError::Window(WindowError::NotReady)) => {
                    debug!(%id, %candidate, "skipping snap candidate that is not ready");
                }
                other => {
                    other?;
                }
            }
        }
        Ok(())
    }

    fn bring_peer_children_to_front(&mut self, id: WindowId) -> Result<(), DockError> {
        let peers: Vec<WindowId> = self
            .group_members(id)?
            .iter()
            .copied()
            .filter(|peer| *peer != id)
            .collect();

        let mut first_error = None;
        for peer in peers {
            let children = self.window(peer)?.children.clone();
            for child in children {
                let window = self.window_mut(child)?;
                if !window.options.always_above_parent || window.host.is_visible() {
                    continue;
                }
                let raised = window
                    .host
                    .bring_to_front()
                    .and_then(|()| window.host.focus());
                if let Err(err) = raised {
                    warn!(window = %child, error = %err, "failed to raise child");
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::monitors::Monitor;
    use crate::platform::window::{HostJournal, VirtualWindow};
    use std::cell::RefCell;
    use std::rc::Rc;

    type EventLog = Rc<RefCell<Vec<(WindowId, WindowEvent)>>>;

    fn add(controller: &mut DockController, label: &str, l: f64, t: f64, r: f64, b: f64) -> WindowId {
        controller.add_window(VirtualWindow::new(label, BoundingBox::new(l, t, r, b)))
    }

    fn screen() -> MonitorSet {
        MonitorSet::new(vec![Monitor::new(0, BoundingBox::new(0.0, 0.0, 1920.0, 1080.0))])
    }

    fn record_events(controller: &mut DockController) -> EventLog {
        let log = EventLog::default();
        let sink = log.clone();
        controller.subscribe(move |window: WindowId, event: &WindowEvent| {
            sink.borrow_mut().push((window, *event));
        });
        log
    }

    /// Three windows in a row: a touches b, b touches c, a does not touch c
    fn chain(controller: &mut DockController) -> (WindowId, WindowId, WindowId) {
        let a = add(controller, "a", 0.0, 0.0, 100.0, 100.0);
        let b = add(controller, "b", 100.0, 0.0, 200.0, 100.0);
        let c = add(controller, "c", 200.0, 0.0, 300.0, 100.0);
        (a, b, c)
    }

    #[test]
    fn new_window_is_its_own_group() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);

        assert!(!controller.is_docked(a).unwrap());
        assert_eq!(controller.group_members(a).unwrap(), &[a]);
    }

    #[test]
    fn dock_merges_touching_windows() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);

        assert!(controller.dock(a, b).unwrap());
        assert_eq!(controller.group_id(a).unwrap(), controller.group_id(b).unwrap());
        assert_eq!(controller.group_members(a).unwrap(), &[a, b]);
        assert!(controller.is_docked(a).unwrap());
        assert!(controller.is_docked(b).unwrap());
    }

    #[test]
    fn dock_is_idempotent() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);

        assert!(controller.dock(a, b).unwrap());
        assert!(!controller.dock(a, b).unwrap());
        assert!(!controller.dock(b, a).unwrap());
        assert_eq!(controller.group_members(b).unwrap().len(), 2);
    }

    #[test]
    fn dock_refuses_windows_that_do_not_touch() {
        let mut controller = DockController::default();
        let events = record_events(&mut controller);
        let (a, _, c) = chain(&mut controller);

        assert!(!controller.dock(a, c).unwrap());
        assert!(!controller.is_docked(a).unwrap());
        assert_ne!(controller.group_id(a).unwrap(), controller.group_id(c).unwrap());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn chained_docks_share_one_group_identity() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);

        controller.dock(a, b).unwrap();
        controller.dock(b, c).unwrap();

        let group = controller.group_id(a).unwrap();
        assert_eq!(controller.group_id(b).unwrap(), group);
        assert_eq!(controller.group_id(c).unwrap(), group);
        assert_eq!(controller.group_members(c).unwrap(), &[a, b, c]);
    }

    #[test]
    fn dock_ignores_peers_when_checking_contact() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();

        // c touches a's peer b, not a itself
        assert!(!controller.dock(a, c).unwrap());
        assert_eq!(controller.group_members(a).unwrap().len(), 2);
    }

    #[test]
    fn dock_notifies_every_member_of_merged_group() {
        let mut controller = DockController::default();
        let events = record_events(&mut controller);
        let (a, b, c) = chain(&mut controller);

        controller.dock(a, b).unwrap();
        events.borrow_mut().clear();
        controller.dock(c, b).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                (c, WindowEvent::Docked),
                (a, WindowEvent::Docked),
                (b, WindowEvent::Docked),
            ]
        );
    }

    #[test]
    fn undocking_the_middle_of_a_chain_isolates_both_ends() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();
        controller.dock(b, c).unwrap();

        controller.undock(b).unwrap();

        for window in [a, b, c] {
            assert_eq!(controller.group_members(window).unwrap(), &[window]);
            assert!(!controller.is_docked(window).unwrap());
        }
        assert_ne!(controller.group_id(a).unwrap(), controller.group_id(c).unwrap());
    }

    #[test]
    fn undocking_an_end_keeps_the_rest_together_under_a_new_identity() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();
        controller.dock(b, c).unwrap();
        let old_group = controller.group_id(a).unwrap();

        controller.undock(a).unwrap();

        assert_eq!(controller.group_members(a).unwrap(), &[a]);
        assert_eq!(controller.group_id(b).unwrap(), controller.group_id(c).unwrap());
        assert_ne!(controller.group_id(b).unwrap(), old_group);
        assert!(controller.is_docked(b).unwrap());
        assert!(controller.is_docked(c).unwrap());
    }

    #[test]
    fn undock_notifies_all_former_members_before_reconnecting() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();
        controller.dock(b, c).unwrap();
        let events = record_events(&mut controller);

        controller.undock(a).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                (a, WindowEvent::Undocked),
                (b, WindowEvent::Undocked),
                (c, WindowEvent::Undocked),
                (b, WindowEvent::Docked),
                (c, WindowEvent::Docked),
            ]
        );
    }

    #[test]
    fn undock_of_a_singleton_is_a_no_op() {
        let mut controller = DockController::default();
        let events = record_events(&mut controller);
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let group = controller.group_id(a).unwrap();

        controller.undock(a).unwrap();

        assert_eq!(controller.group_id(a).unwrap(), group);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn undock_reconnects_components_regardless_of_member_order() {
        let mut controller = DockController::default();
        let x = add(&mut controller, "x", 0.0, 0.0, 100.0, 100.0);
        let y = add(&mut controller, "y", 100.0, 0.0, 200.0, 100.0);
        let z = add(&mut controller, "z", 200.0, 0.0, 300.0, 100.0);
        let w = add(&mut controller, "w", 300.0, 0.0, 400.0, 100.0);

        // Build the group from the far end so member order differs from geometry order
        controller.dock(w, z).unwrap();
        controller.dock(z, y).unwrap();
        controller.dock(y, x).unwrap();
        assert_eq!(controller.group_members(x).unwrap(), &[w, z, y, x]);

        controller.undock(w).unwrap();
        let group = controller.group_id(x).unwrap();
        assert_eq!(controller.group_id(y).unwrap(), group);
        assert_eq!(controller.group_id(z).unwrap(), group);
        assert_eq!(controller.group_members(x).unwrap().len(), 3);

        controller.dock(z, w).unwrap();
        controller.undock(y).unwrap();
        assert_eq!(controller.group_members(x).unwrap(), &[x]);
        assert_eq!(controller.group_id(z).unwrap(), controller.group_id(w).unwrap());
        assert_eq!(controller.group_members(w).unwrap().len(), 2);
    }

    #[test]
    fn collision_mesh_honours_options() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let child = controller
            .add_child(
                a,
                VirtualWindow::new("child", BoundingBox::new(0.0, 100.0, 100.0, 150.0)),
                ChildOptions::in_mesh(),
            )
            .unwrap();
        controller
            .add_child(
                a,
                VirtualWindow::new("popup", BoundingBox::new(500.0, 500.0, 600.0, 600.0)),
                ChildOptions::above_parent(),
            )
            .unwrap();
        let b = add(&mut controller, "b", 100.0, 0.0, 200.0, 100.0);
        controller.dock(a, b).unwrap();

        assert_eq!(
            controller.collision_mesh_windows(a, MeshOptions::default()).unwrap(),
            vec![a, child, b]
        );
        assert_eq!(controller.collision_mesh(a, MeshOptions::own()).unwrap().len(), 2);
        assert_eq!(controller.collision_mesh(a, MeshOptions::bare()).unwrap().len(), 1);
        assert_eq!(
            controller
                .collision_mesh_windows(b, MeshOptions::default())
                .unwrap(),
            vec![b, a, child]
        );
        assert_eq!(
            controller.bounding_box(a).unwrap(),
            BoundingBox::new(0.0, 0.0, 200.0, 150.0)
        );
    }

    #[test]
    fn grouped_move_translates_every_member() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();

        let outcome = controller.move_to(a, 300.0, 200.0, &screen()).unwrap();

        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(controller.position(a).unwrap(), Vector::new(300.0, 200.0));
        assert_eq!(controller.position(b).unwrap(), Vector::new(400.0, 200.0));
        // Not docked, so left alone
        assert_eq!(controller.position(c).unwrap(), Vector::new(200.0, 0.0));
    }

    #[test]
    fn move_off_every_monitor_is_rejected_atomically() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();
        controller.dock(b, c).unwrap();
        let before: Vec<Vector> = [a, b, c]
            .iter()
            .map(|w| controller.position(*w).unwrap())
            .collect();

        let outcome = controller.move_to(b, 5000.0, 5000.0, &screen()).unwrap();

        assert_eq!(outcome, MoveOutcome::Rejected);
        let after: Vec<Vector> = [a, b, c]
            .iter()
            .map(|w| controller.position(*w).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn move_is_accepted_while_any_member_stays_visible() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);
        controller.dock(a, b).unwrap();

        // a ends up fully off-screen, b straddles the left monitor edge
        let outcome = controller.move_to(a, -150.0, 0.0, &screen()).unwrap();

        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(controller.position(b).unwrap(), Vector::new(-50.0, 0.0));
    }

    #[test]
    fn move_with_no_monitors_is_rejected() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let outcome = controller.move_to(a, 10.0, 10.0, &MonitorSet::default()).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected);
        assert_eq!(controller.position(a).unwrap(), Vector::new(0.0, 0.0));
    }

    #[test]
    fn move_order_is_children_then_peers_then_self() {
        let journal = HostJournal::default();
        let mut controller = DockController::default();
        let a = controller.add_window(
            VirtualWindow::new("a", BoundingBox::new(0.0, 0.0, 100.0, 100.0)).with_journal(journal.clone()),
        );
        let child = controller
            .add_child(
                a,
                VirtualWindow::new("child", BoundingBox::new(0.0, 100.0, 100.0, 150.0))
                    .with_journal(journal.clone()),
                ChildOptions::in_mesh(),
            )
            .unwrap();
        let popup = controller
            .add_child(
                a,
                VirtualWindow::new("popup", BoundingBox::new(500.0, 500.0, 600.0, 600.0))
                    .with_journal(journal.clone()),
                ChildOptions::above_parent(),
            )
            .unwrap();
        let b = controller.add_window(
            VirtualWindow::new("b", BoundingBox::new(100.0, 0.0, 200.0, 100.0)).with_journal(journal.clone()),
        );
        controller.dock(a, b).unwrap();

        controller.move_to(a, 10.0, 20.0, &screen()).unwrap();

        assert_eq!(*journal.borrow(), vec!["child:move", "b:move", "a:move"]);
        assert_eq!(controller.position(child).unwrap(), Vector::new(10.0, 120.0));
        assert_eq!(controller.position(popup).unwrap(), Vector::new(500.0, 500.0));
    }

    #[test]
    fn failed_peer_move_does_not_fail_the_group_move() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let b = controller.add_window(
            VirtualWindow::new("b", BoundingBox::new(100.0, 0.0, 200.0, 100.0)).with_failing_moves(),
        );
        controller.dock(a, b).unwrap();

        let outcome = controller.move_to(a, 50.0, 50.0, &screen()).unwrap();

        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(controller.position(a).unwrap(), Vector::new(50.0, 50.0));
        assert_eq!(controller.position(b).unwrap(), Vector::new(100.0, 0.0));
    }

    #[test]
    fn own_move_failure_is_forwarded() {
        let mut controller = DockController::default();
        let a = controller.add_window(
            VirtualWindow::new("a", BoundingBox::new(0.0, 0.0, 100.0, 100.0)).with_failing_moves(),
        );

        let result = controller.move_to(a, 50.0, 50.0, &screen());

        assert!(matches!(
            result,
            Err(DockError::Window(WindowError::PositionFailed { .. }))
        ));
    }

    #[test]
    fn primitive_move_leaves_group_in_place() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);
        controller.dock(a, b).unwrap();

        controller.move_primitive(a, 0.0, 500.0).unwrap();

        assert_eq!(controller.position(a).unwrap(), Vector::new(0.0, 500.0));
        assert_eq!(controller.position(b).unwrap(), Vector::new(100.0, 0.0));
    }

    #[test]
    fn minimize_and_restore_fan_out_to_the_group() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();

        controller.minimize(b).unwrap();
        assert!(controller.host(a).unwrap().is_minimized());
        assert!(controller.host(b).unwrap().is_minimized());
        assert!(!controller.host(c).unwrap().is_minimized());

        controller.restore(a).unwrap();
        assert!(!controller.host(a).unwrap().is_minimized());
        assert!(!controller.host(b).unwrap().is_minimized());
    }

    #[test]
    fn lifecycle_events_undock() {
        for event in [WindowEvent::Hidden, WindowEvent::Maximized, WindowEvent::Closed] {
            let mut controller = DockController::default();
            let (a, b, _) = chain(&mut controller);
            controller.dock(a, b).unwrap();

            controller.handle_event(a, event).unwrap();

            assert!(!controller.is_docked(a).unwrap(), "{event:?} should undock");
            assert!(!controller.is_docked(b).unwrap(), "{event:?} should undock");
        }
    }

    #[test]
    fn manual_config_ignores_lifecycle_events() {
        let mut controller = DockController::new(DockConfig::manual());
        let (a, b, _) = chain(&mut controller);
        controller.dock(a, b).unwrap();

        controller.handle_event(a, WindowEvent::Hidden).unwrap();
        controller.handle_event(a, WindowEvent::EndSnap { target: None }).unwrap();

        assert!(controller.is_docked(a).unwrap());
        assert_eq!(controller.group_members(a).unwrap().len(), 2);
    }

    #[test]
    fn observers_see_the_inbound_event_after_its_effects() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);
        controller.dock(a, b).unwrap();
        let events = record_events(&mut controller);

        controller.handle_event(a, WindowEvent::Hidden).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                (a, WindowEvent::Undocked),
                (b, WindowEvent::Undocked),
                (a, WindowEvent::Hidden),
            ]
        );
    }

    #[test]
    fn restored_event_restores_the_peers() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);
        controller.dock(a, b).unwrap();
        controller.minimize(a).unwrap();

        controller.handle_event(a, WindowEvent::Restored).unwrap();

        // The restored window itself is restored by the OS, not by the group
        assert!(controller.host(a).unwrap().is_minimized());
        assert!(!controller.host(b).unwrap().is_minimized());
    }

    #[test]
    fn removing_a_mesh_child_undocks_the_parent() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let child = controller
            .add_child(
                a,
                VirtualWindow::new("child", BoundingBox::new(0.0, 100.0, 100.0, 150.0)),
                ChildOptions::in_mesh(),
            )
            .unwrap();
        // b only touches a through its child
        let b = add(&mut controller, "b", 100.0, 110.0, 200.0, 150.0);
        assert!(controller.dock(a, b).unwrap());

        controller.remove_child(a, child).unwrap();

        assert!(!controller.is_docked(a).unwrap());
        assert!(!controller.is_docked(b).unwrap());
        assert_eq!(controller.parent(child).unwrap(), None);
        assert!(controller.children(a).unwrap().is_empty());
    }

    #[test]
    fn removing_a_floating_child_keeps_the_group() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);
        let popup = controller
            .add_child(
                a,
                VirtualWindow::new("popup", BoundingBox::new(500.0, 500.0, 600.0, 600.0)),
                ChildOptions::above_parent(),
            )
            .unwrap();
        controller.dock(a, b).unwrap();

        controller.remove_child(a, popup).unwrap();

        assert!(controller.is_docked(a).unwrap());
    }

    #[test]
    fn end_snap_docks_with_target_or_every_touching_window() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);

        controller
            .handle_event(a, WindowEvent::EndSnap { target: Some(b) })
            .unwrap();
        assert_eq!(controller.group_members(a).unwrap(), &[a, b]);

        controller.undock(a).unwrap();
        controller
            .handle_event(b, WindowEvent::EndSnap { target: None })
            .unwrap();
        assert_eq!(controller.group_members(b).unwrap(), &[b, a, c]);
    }

    #[test]
    fn end_snap_scan_skips_unready_and_hidden_windows() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        controller.add_window(VirtualWindow::unready("pending"));
        controller.add_window(
            VirtualWindow::new("hidden", BoundingBox::new(100.0, 0.0, 200.0, 100.0)).hidden(),
        );

        controller
            .handle_event(a, WindowEvent::EndSnap { target: None })
            .unwrap();

        assert!(!controller.is_docked(a).unwrap());
    }

    #[test]
    fn bring_to_front_raises_the_other_members() {
        let journal = HostJournal::default();
        let mut controller = DockController::default();
        let a = controller.add_window(
            VirtualWindow::new("a", BoundingBox::new(0.0, 0.0, 100.0, 100.0)).with_journal(journal.clone()),
        );
        let b = controller.add_window(
            VirtualWindow::new("b", BoundingBox::new(100.0, 0.0, 200.0, 100.0)).with_journal(journal.clone()),
        );
        controller.dock(a, b).unwrap();

        controller.handle_event(a, WindowEvent::BringToFront).unwrap();

        assert_eq!(*journal.borrow(), vec!["b:bring_to_front"]);
    }

    #[test]
    fn bring_children_to_front_raises_hidden_children_of_peers() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);
        let toolbar = controller
            .add_child(
                b,
                VirtualWindow::new("toolbar", BoundingBox::new(100.0, -40.0, 200.0, 0.0)).hidden(),
                ChildOptions::above_parent(),
            )
            .unwrap();
        controller.dock(a, b).unwrap();

        controller
            .handle_event(a, WindowEvent::BringChildrenToFront)
            .unwrap();

        let host = controller.host(toolbar).unwrap();
        assert!(host.is_visible());
        assert!(host.is_focused());
    }

    #[test]
    fn unready_window_fails_without_side_effects() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let pending = controller.add_window(VirtualWindow::unready("pending"));

        let result = controller.dock(a, pending);

        assert!(matches!(result, Err(DockError::Window(WindowError::NotReady))));
        assert!(!controller.is_docked(a).unwrap());
        assert!(matches!(
            controller.bounding_box(pending),
            Err(DockError::Window(WindowError::NotReady))
        ));
    }

    #[test]
    fn unknown_windows_are_rejected() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let ghost = WindowId::new(999);

        assert!(matches!(controller.dock(a, ghost), Err(DockError::UnknownWindow(id)) if id == ghost));
        assert!(matches!(controller.undock(ghost), Err(DockError::UnknownWindow(_))));
        assert!(matches!(
            controller.move_to(ghost, 0.0, 0.0, &screen()),
            Err(DockError::UnknownWindow(_))
        ));
    }

    #[test]
    fn child_links_reject_cycles() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let child = controller
            .add_child(
                a,
                VirtualWindow::new("child", BoundingBox::new(0.0, 100.0, 100.0, 150.0)),
                ChildOptions::in_mesh(),
            )
            .unwrap();
        let other = add(&mut controller, "other", 500.0, 0.0, 600.0, 100.0);

        assert!(matches!(
            controller.attach_child(child, a, ChildOptions::in_mesh()),
            Err(DockError::ChildCycle { .. })
        ));
        assert!(matches!(
            controller.attach_child(a, a, ChildOptions::in_mesh()),
            Err(DockError::InvalidChild { .. })
        ));
        assert!(matches!(
            controller.attach_child(other, child, ChildOptions::in_mesh()),
            Err(DockError::InvalidChild { .. })
        ));
        assert!(matches!(
            controller.remove_child(other, child),
            Err(DockError::NotAChild { .. })
        ));
    }

    #[test]
    fn removing_a_docked_window_releases_its_peers() {
        let mut controller = DockController::default();
        let (a, b, c) = chain(&mut controller);
        controller.dock(a, b).unwrap();
        controller.dock(b, c).unwrap();

        controller.remove_window(c).unwrap();

        assert!(!controller.contains(c));
        assert_eq!(controller.group_members(a).unwrap(), &[a, b]);
        assert_eq!(controller.window_ids(), vec![a, b]);
    }

    #[test]
    fn move_validation_ignores_windows_that_do_not_move() {
        let mut controller = DockController::default();
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);
        let child = controller
            .add_child(
                a,
                VirtualWindow::new("child", BoundingBox::new(0.0, 100.0, 100.0, 150.0)),
                ChildOptions::in_mesh(),
            )
            .unwrap();
        // Docked to the child, not to a, so it stays behind when a moves
        let wide = add(&mut controller, "wide", 100.0, 100.0, 3000.0, 150.0);
        assert!(controller.dock(child, wide).unwrap());

        let outcome = controller.move_to(a, -1500.0, 0.0, &screen()).unwrap();

        assert_eq!(outcome, MoveOutcome::Rejected);
        assert_eq!(controller.position(a).unwrap(), Vector::new(0.0, 0.0));
        assert_eq!(controller.position(child).unwrap(), Vector::new(0.0, 100.0));
        assert_eq!(controller.position(wide).unwrap(), Vector::new(100.0, 100.0));
    }

    #[test]
    fn inbound_dock_notifications_are_dropped() {
        let mut controller = DockController::default();
        let events = record_events(&mut controller);
        let a = add(&mut controller, "a", 0.0, 0.0, 100.0, 100.0);

        controller.handle_event(a, WindowEvent::Docked).unwrap();
        controller.handle_event(a, WindowEvent::Undocked).unwrap();

        assert!(events.borrow().is_empty());
        assert!(!controller.is_docked(a).unwrap());
    }

    #[test]
    fn bring_children_to_front_visits_every_child_before_failing() {
        let mut controller = DockController::default();
        let (a, b, _) = chain(&mut controller);
        controller
            .add_child(
                b,
                VirtualWindow::new("stuck", BoundingBox::new(100.0, -40.0, 150.0, 0.0))
                    .hidden()
                    .with_failing_commands(),
                ChildOptions::above_parent(),
            )
            .unwrap();
        let toolbar = controller
            .add_child(
                b,
                VirtualWindow::new("toolbar", BoundingBox::new(150.0, -40.0, 200.0, 0.0)).hidden(),
                ChildOptions::above_parent(),
            )
            .unwrap();
        controller.dock(a, b).unwrap();

        let result = controller.handle_event(a, WindowEvent::BringChildrenToFront);

        assert!(matches!(
            result,
            Err(DockError::Window(WindowError::CommandFailed("bring_to_front")))
        ));
        let host = controller.host(toolbar).unwrap();
        assert!(host.is_visible());
        assert!(host.is_focused());
    }
}
