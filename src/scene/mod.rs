// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Scenes and the scene stack.
//!
//! # Architecture
//!
//! A [`Scene`] is one screen of the application: a menu, a game, a player.
//! Scenes are wrapped in [`SceneNode`]s, which carry the lifecycle phase, the
//! dirty flag and a registry of named child scenes. Only the top of the
//! [`SceneStack`] receives input, updates and renders; everything below it is
//! paused.
//!
//! Entering a registered child moves it out of its parent's registry and onto
//! the stack. Popping it moves it back, so a child keeps its state between
//! visits and is never reachable from two places at once.
//!
//! # Hooks
//!
//! * `enter` / `exit`: once per visit.
//! * `pause` / `resume`: when a scene is covered by, and then uncovered from,
//!   a scene pushed on top of it.
//! * `handle_input` / `update`: return a [`Navigation`] that the stack applies
//!   after the hook has finished.
//! * `render`: called only when the scene is dirty. Scenes become dirty when
//!   entered or resumed, or by calling [`SceneContext::mark_dirty`].

use std::fmt;
use std::time::Duration;

use log::{debug, warn};

use crate::events::{Event, EventKind, EventQueue};
use crate::hardware::{Hardware, TextLine};
use crate::timer::TimerService;

/// What a scene hook asks the stack to do next.
#[derive(Debug)]
pub enum Navigation {
    Stay,
    /// Enter the named child of the current scene.
    Enter(String),
    /// Leave the current scene and resume its parent.
    Back,
    /// Replace the whole stack with a new root.
    Change(SceneNode),
    /// Shut the runtime down.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Active,
    Paused,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackStatus {
    Active,
    Empty,
}

/// Everything a scene may touch while one of its hooks runs.
pub struct SceneContext<'a> {
    pub hardware: &'a mut Hardware,
    pub events: &'a mut EventQueue,
    pub timers: &'a mut TimerService<EventQueue>,
    pub now: Duration,
    dirty: bool,
}

impl<'a> SceneContext<'a> {
    pub fn new(
        hardware: &'a mut Hardware,
        events: &'a mut EventQueue,
        timers: &'a mut TimerService<EventQueue>,
        now: Duration,
    ) -> Self {
        Self {
            hardware,
            events,
            timers,
            now,
            dirty: false,
        }
    }

    /// Requests a render of the scene whose hook is running.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn post(&mut self, kind: EventKind) {
        self.events.post(kind);
    }

    /// Starts a timer that posts [`EventKind::Timer`] carrying `name` when it
    /// expires.
    pub fn schedule(&mut self, name: &str, duration: Duration, repeat: bool) {
        let event_name = name.to_string();
        self.timers.create(
            name,
            duration,
            move |queue: &mut EventQueue| queue.post(EventKind::Timer(event_name.clone())),
            repeat,
        );
    }

    pub fn render(&mut self, lines: &[TextLine]) {
        self.hardware.display.render(lines);
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

pub trait Scene {
    fn enter(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn exit(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn pause(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn resume(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn handle_input(&mut self, _event: &Event, _ctx: &mut SceneContext<'_>) -> Navigation {
        Navigation::Stay
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut SceneContext<'_>) -> Navigation {
        Navigation::Stay
    }

    fn render(&mut self, ctx: &mut SceneContext<'_>);
}

pub struct SceneNode {
    name: String,
    scene: Box<dyn Scene>,
    phase: Phase,
    dirty: bool,
    children: Vec<SceneNode>,
    /// Registry position this node was taken from, while on the stack.
    slot: Option<usize>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, scene: impl Scene + 'static) -> Self {
        Self {
            name: name.into(),
            scene: Box::new(scene),
            phase: Phase::Exiting,
            dirty: false,
            children: Vec::new(),
            slot: None,
        }
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.add_child(child);
        self
    }

    /// Registers a child, replacing any existing child with the same name.
    pub fn add_child(&mut self, child: SceneNode) {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(existing) => *existing = child,
            None => self.children.push(child),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name == name)
    }

    fn take_child(&mut self, name: &str) -> Option<SceneNode> {
        let index = self.children.iter().position(|c| c.name == name)?;
        let mut child = self.children.remove(index);
        child.slot = Some(index);
        Some(child)
    }

    fn restore_child(&mut self, mut child: SceneNode) {
        let index = child.slot.take().unwrap_or(self.children.len());
        self.children.insert(index.min(self.children.len()), child);
    }

    /// Runs a hook and moves any dirty request it made onto this node.
    fn call<'a, R>(
        &mut self,
        ctx: &mut SceneContext<'a>,
        hook: impl FnOnce(&mut dyn Scene, &mut SceneContext<'a>) -> R,
    ) -> R {
        let result = hook(self.scene.as_mut(), ctx);
        if ctx.take_dirty() {
            self.dirty = true;
        }
        result
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("dirty", &self.dirty)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct SceneStack {
    nodes: Vec<SceneNode>,
    generation: u64,
}

impl SceneStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses the current scene, if any, and enters `node` on top of it.
    pub fn push(&mut self, mut node: SceneNode, ctx: &mut SceneContext<'_>) {
        if let Some(parent) = self.nodes.last_mut() {
            parent.phase = Phase::Paused;
            parent.call(ctx, |scene, ctx| scene.pause(ctx));
        }
        debug!("entering scene '{}'", node.name);
        node.phase = Phase::Entering;
        node.call(ctx, |scene, ctx| scene.enter(ctx));
        node.phase = Phase::Active;
        node.dirty = true;
        self.nodes.push(node);
        self.generation += 1;
    }

    /// Enters a registered child of the current scene. An unknown name is
    /// logged and leaves the stack untouched.
    pub fn enter_subscene(&mut self, name: &str, ctx: &mut SceneContext<'_>) -> bool {
        let Some(parent) = self.nodes.last_mut() else {
            warn!("cannot enter '{}' on an empty scene stack", name);
            return false;
        };
        let Some(child) = parent.take_child(name) else {
            warn!("scene '{}' has no sub-scene '{}'", parent.name, name);
            return false;
        };
        self.push(child, ctx);
        true
    }

    /// Exits the current scene and resumes its parent. Popping the root
    /// leaves the stack empty.
    pub fn pop(&mut self, ctx: &mut SceneContext<'_>) -> StackStatus {
        let Some(mut leaf) = self.nodes.pop() else {
            return StackStatus::Empty;
        };
        self.generation += 1;
        debug!("exiting scene '{}'", leaf.name);
        leaf.phase = Phase::Exiting;
        leaf.call(ctx, |scene, ctx| scene.exit(ctx));
        leaf.dirty = false;

        let Some(parent) = self.nodes.last_mut() else {
            return StackStatus::Empty;
        };
        if leaf.slot.is_some() {
            parent.restore_child(leaf);
        }
        parent.phase = Phase::Active;
        parent.call(ctx, |scene, ctx| scene.resume(ctx));
        parent.dirty = true;
        StackStatus::Active
    }

    /// Replaces the whole stack with `node`. Only the current scene is
    /// exited; the scenes beneath it are dropped.
    pub fn change(&mut self, node: SceneNode, ctx: &mut SceneContext<'_>) {
        if let Some(mut leaf) = self.nodes.pop() {
            debug!("changing scene '{}' to '{}'", leaf.name, node.name);
            leaf.phase = Phase::Exiting;
            leaf.call(ctx, |scene, ctx| scene.exit(ctx));
        }
        self.nodes.clear();
        self.push(node, ctx);
    }

    /// Exits every scene, current first.
    pub fn exit_all(&mut self, ctx: &mut SceneContext<'_>) {
        while let Some(mut node) = self.nodes.pop() {
            debug!("shutting down scene '{}'", node.name);
            node.phase = Phase::Exiting;
            node.call(ctx, |scene, ctx| scene.exit(ctx));
        }
        self.generation += 1;
    }

    pub fn navigate(&mut self, navigation: Navigation, ctx: &mut SceneContext<'_>) -> StackStatus {
        match navigation {
            Navigation::Stay => {}
            Navigation::Enter(name) => {
                self.enter_subscene(&name, ctx);
            }
            Navigation::Back => return self.pop(ctx),
            Navigation::Change(node) => self.change(node, ctx),
            Navigation::Exit => self.exit_all(ctx),
        }
        self.status()
    }

    pub fn handle_input(&mut self, event: &Event, ctx: &mut SceneContext<'_>) -> Navigation {
        match self.nodes.last_mut() {
            Some(leaf) => leaf.call(ctx, |scene, ctx| scene.handle_input(event, ctx)),
            None => Navigation::Stay,
        }
    }

    pub fn update(&mut self, dt: Duration, ctx: &mut SceneContext<'_>) -> Navigation {
        match self.nodes.last_mut() {
            Some(leaf) => leaf.call(ctx, |scene, ctx| scene.update(dt, ctx)),
            None => Navigation::Stay,
        }
    }

    /// Renders the current scene if it is dirty. Returns whether it rendered.
    pub fn render(&mut self, ctx: &mut SceneContext<'_>) -> bool {
        match self.nodes.last_mut() {
            Some(leaf) if leaf.dirty => {
                leaf.dirty = false;
                leaf.call(ctx, |scene, ctx| scene.render(ctx));
                true
            }
            _ => false,
        }
    }

    pub fn status(&self) -> StackStatus {
        if self.nodes.is_empty() {
            StackStatus::Empty
        } else {
            StackStatus::Active
        }
    }

    pub fn current(&self) -> Option<&SceneNode> {
        self.nodes.last()
    }

    /// Scene names from the root to the current scene.
    pub fn path(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Changes whenever a scene is entered or left.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Tracer {
        name: &'static str,
        journal: Journal,
    }

    impl Tracer {
        fn node(name: &'static str, journal: &Journal) -> SceneNode {
            SceneNode::new(
                name,
                Tracer {
                    name,
                    journal: journal.clone(),
                },
            )
        }

        fn log(&self, hook: &str) {
            self.journal
                .borrow_mut()
                .push(format!("{}.{}", self.name, hook));
        }
    }

    impl Scene for Tracer {
        fn enter(&mut self, _ctx: &mut SceneContext<'_>) {
            self.log("enter");
        }

        fn exit(&mut self, _ctx: &mut SceneContext<'_>) {
            self.log("exit");
        }

        fn pause(&mut self, _ctx: &mut SceneContext<'_>) {
            self.log("pause");
        }

        fn resume(&mut self, _ctx: &mut SceneContext<'_>) {
            self.log("resume");
        }

        fn render(&mut self, _ctx: &mut SceneContext<'_>) {
            self.log("render");
        }
    }

    struct Rig {
        hardware: Hardware,
        events: EventQueue,
        timers: TimerService<EventQueue>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                hardware: Hardware::null(),
                events: EventQueue::new(Duration::from_millis(100)),
                timers: TimerService::new(),
            }
        }

        fn ctx(&mut self) -> SceneContext<'_> {
            SceneContext::new(
                &mut self.hardware,
                &mut self.events,
                &mut self.timers,
                Duration::ZERO,
            )
        }
    }

    fn count(journal: &Journal, entry: &str) -> usize {
        journal.borrow().iter().filter(|e| *e == entry).count()
    }

    #[test]
    fn test_nested_push_pop_pauses_and_resumes_root_once() {
        let journal = Journal::default();
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        let mut stack = SceneStack::new();

        stack.push(Tracer::node("root", &journal), &mut ctx);
        stack.push(Tracer::node("a", &journal), &mut ctx);
        stack.push(Tracer::node("b", &journal), &mut ctx);
        assert_eq!(stack.path(), vec!["root", "a", "b"]);

        assert_eq!(stack.pop(&mut ctx), StackStatus::Active);
        assert_eq!(stack.pop(&mut ctx), StackStatus::Active);

        assert_eq!(count(&journal, "root.pause"), 1);
        assert_eq!(count(&journal, "root.resume"), 1);
        assert_eq!(count(&journal, "a.pause"), 1);
        assert_eq!(count(&journal, "a.resume"), 1);
        assert_eq!(stack.current().map(|n| n.phase()), Some(Phase::Active));
    }

    #[test]
    fn test_popping_root_empties_stack() {
        let journal = Journal::default();
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        let mut stack = SceneStack::new();

        stack.push(Tracer::node("root", &journal), &mut ctx);
        assert_eq!(stack.pop(&mut ctx), StackStatus::Empty);
        assert!(stack.is_empty());
        assert_eq!(count(&journal, "root.exit"), 1);
    }

    #[test]
    fn test_unknown_subscene_is_a_no_op() {
        let journal = Journal::default();
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        let mut stack = SceneStack::new();

        stack.push(Tracer::node("root", &journal), &mut ctx);
        let generation = stack.generation();
        journal.borrow_mut().clear();

        assert!(!stack.enter_subscene("nowhere", &mut ctx));
        assert_eq!(stack.path(), vec!["root"]);
        assert_eq!(stack.generation(), generation);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn test_subscene_returns_to_registry_after_pop() {
        let journal = Journal::default();
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        let mut stack = SceneStack::new();

        let root = Tracer::node("root", &journal).with_child(Tracer::node("game", &journal));
        stack.push(root, &mut ctx);

        assert!(stack.enter_subscene("game", &mut ctx));
        assert_eq!(stack.path(), vec!["root", "game"]);
        stack.pop(&mut ctx);

        let root = stack.current().unwrap();
        assert!(root.has_child("game"));
        assert!(stack.enter_subscene("game", &mut ctx));
        assert_eq!(count(&journal, "game.enter"), 2);
    }

    #[test]
    fn test_change_exits_only_the_current_scene() {
        let journal = Journal::default();
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        let mut stack = SceneStack::new();

        stack.push(Tracer::node("root", &journal), &mut ctx);
        stack.push(Tracer::node("a", &journal), &mut ctx);
        stack.change(Tracer::node("fresh", &journal), &mut ctx);

        assert_eq!(stack.path(), vec!["fresh"]);
        assert_eq!(count(&journal, "a.exit"), 1);
        assert_eq!(count(&journal, "root.exit"), 0);
        assert_eq!(count(&journal, "fresh.enter"), 1);
    }

    #[test]
    fn test_render_only_when_dirty() {
        let journal = Journal::default();
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        let mut stack = SceneStack::new();

        stack.push(Tracer::node("root", &journal), &mut ctx);
        assert!(stack.render(&mut ctx));
        assert!(!stack.render(&mut ctx));
        assert_eq!(count(&journal, "root.render"), 1);
    }

    #[test]
    fn test_exit_navigation_exits_every_scene() {
        let journal = Journal::default();
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        let mut stack = SceneStack::new();

        stack.push(Tracer::node("root", &journal), &mut ctx);
        stack.push(Tracer::node("a", &journal), &mut ctx);
        assert_eq!(stack.navigate(Navigation::Exit, &mut ctx), StackStatus::Empty);
        assert_eq!(
            *journal.borrow(),
            vec!["root.enter", "root.pause", "a.enter", "a.exit", "root.exit"]
        );
    }

    #[test]
    fn test_schedule_posts_timer_event() {
        let mut rig = Rig::new();
        {
            let mut ctx = rig.ctx();
            ctx.schedule("blink", Duration::from_millis(500), false);
        }
        rig.timers
            .update(Duration::from_millis(500), &mut rig.events);
        let events = rig.events.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timer_name(), Some("blink"));
    }
}
