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

//! The cooperative application loop.
//!
//! # Architecture
//!
//! Everything runs on one thread, one frame at a time. Each call to
//! [`Runtime::step`] performs, in order:
//!
//! 1. Input polling, which turns debounced edges into queued events.
//! 2. Draining the queue and dispatching each event to the current scene.
//!    Once a dispatch changes the scene stack, the rest of that drain is
//!    dropped; those events were meant for a scene that is no longer in
//!    front. A quit among them is still honoured.
//! 3. Advancing the timers by the frame delta. Their callbacks post events,
//!    which are seen on the next frame.
//! 4. Updating the current scene.
//! 5. Rendering the current scene if it is dirty.
//! 6. Waiting for the next frame boundary.
//!
//! A [`EventKind::Quit`] event, or a scene navigating to
//! [`Navigation::Exit`], ends the loop. Every scene still on the stack is
//! exited before [`Runtime::run`] returns.

use std::time::Duration;

use log::{debug, info, trace};

use crate::clock::{Clock, FrameClock};
use crate::config::AppConfig;
use crate::error::RuntimeError;
use crate::events::{EventKind, EventQueue, InputPoller};
use crate::hardware::Hardware;
use crate::scene::{Navigation, SceneContext, SceneNode, SceneStack, StackStatus};
use crate::timer::TimerService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    Exited,
}

pub struct Runtime {
    clock: Box<dyn Clock>,
    frames: FrameClock,
    hardware: Hardware,
    poller: InputPoller,
    events: EventQueue,
    timers: TimerService<EventQueue>,
    stack: SceneStack,
    last_step: Duration,
    frame_count: u64,
}

impl Runtime {
    /// Builds a runtime over `hardware`, paced by `clock`.
    ///
    /// # Arguments
    ///
    /// * `config` - Frame rate and input settings.
    /// * `hardware` - The device bundle, lent to the current scene each call.
    /// * `clock` - Time source for frame pacing and event timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidFps`] when the configured frame rate is
    /// zero.
    pub fn new(
        config: &AppConfig,
        hardware: Hardware,
        clock: Box<dyn Clock>,
    ) -> Result<Self, RuntimeError> {
        let frames = FrameClock::new(config.fps)?;
        info!(
            "runtime at {} fps ({:?} per frame)",
            config.fps,
            frames.interval()
        );
        Ok(Self {
            clock,
            frames,
            hardware,
            poller: InputPoller::new(&config.input),
            events: EventQueue::new(config.input.event_window()),
            timers: TimerService::new(),
            stack: SceneStack::new(),
            last_step: Duration::ZERO,
            frame_count: 0,
        })
    }

    /// Enters `root` as the bottom of the scene stack.
    pub fn start(&mut self, root: SceneNode) {
        let now = self.clock.now();
        self.last_step = now;
        self.frames.reset(now);
        self.events.set_time(now);

        let mut ctx = SceneContext::new(&mut self.hardware, &mut self.events, &mut self.timers, now);
        self.stack.change(root, &mut ctx);
    }

    /// Runs one frame.
    ///
    /// Returns [`LoopStatus::Exited`] once the scene stack has emptied,
    /// whether through a quit event, a navigation to exit or the root scene
    /// being popped. Further calls keep returning `Exited`.
    ///
    /// # Note
    ///
    /// This blocks until the next frame boundary of the configured rate.
    pub fn step(&mut self) -> LoopStatus {
        if self.stack.is_empty() {
            return LoopStatus::Exited;
        }

        let now = self.clock.now();
        let dt = now.saturating_sub(self.last_step);
        self.last_step = now;
        self.frame_count += 1;
        self.events.set_time(now);

        self.poller.poll(&mut self.hardware, &mut self.events);

        if self.dispatch_events(now) == StackStatus::Empty {
            return self.finish();
        }

        let fired = self.timers.update(dt, &mut self.events);
        if fired > 0 {
            trace!("{} timers fired", fired);
        }

        let mut ctx = SceneContext::new(&mut self.hardware, &mut self.events, &mut self.timers, now);
        let navigation = self.stack.update(dt, &mut ctx);
        if self.stack.navigate(navigation, &mut ctx) == StackStatus::Empty {
            return self.finish();
        }
        self.stack.render(&mut ctx);

        self.frames.tick_blocking(self.clock.as_ref());
        LoopStatus::Running
    }

    fn dispatch_events(&mut self, now: Duration) -> StackStatus {
        let events = self.events.drain();
        let mut ctx = SceneContext::new(&mut self.hardware, &mut self.events, &mut self.timers, now);

        for (index, event) in events.iter().enumerate() {
            if event.kind == EventKind::Quit {
                info!("quit requested");
                self.stack.exit_all(&mut ctx);
                return StackStatus::Empty;
            }

            let generation = self.stack.generation();
            let navigation = self.stack.handle_input(event, &mut ctx);
            if self.stack.navigate(navigation, &mut ctx) == StackStatus::Empty {
                return StackStatus::Empty;
            }
            if self.stack.generation() != generation {
                let rest = &events[index + 1..];
                if rest.iter().any(|e| e.kind == EventKind::Quit) {
                    info!("quit requested");
                    self.stack.exit_all(&mut ctx);
                    return StackStatus::Empty;
                }
                if !rest.is_empty() {
                    debug!("dropping {} events after scene change", rest.len());
                }
                break;
            }
        }
        StackStatus::Active
    }

    fn finish(&mut self) -> LoopStatus {
        info!("runtime stopped after {} frames", self.frame_count);
        LoopStatus::Exited
    }

    /// Steps until the scene stack empties.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        if self.stack.is_empty() {
            return Err(RuntimeError::NoRootScene);
        }
        while self.step() == LoopStatus::Running {}
        Ok(())
    }

    /// Exits every remaining scene.
    pub fn shutdown(&mut self) {
        let now = self.clock.now();
        let mut ctx = SceneContext::new(&mut self.hardware, &mut self.events, &mut self.timers, now);
        self.stack.navigate(Navigation::Exit, &mut ctx);
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn stack(&self) -> &SceneStack {
        &self.stack
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    pub fn hardware(&self) -> &Hardware {
        &self.hardware
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::events::{Button, ButtonAction, Event};
    use crate::hardware::fake::{RecordingDisplay, ScriptedButton};
    use crate::hardware::{DigitalInput, DisplaySurface, TextLine};
    use crate::scene::Scene;

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Logs what it sees; A enters "child", B goes back, a "tick" timer
    /// event is recorded.
    struct Recorder {
        name: &'static str,
        journal: Journal,
    }

    impl Scene for Recorder {
        fn enter(&mut self, ctx: &mut SceneContext<'_>) {
            if self.name == "root" {
                ctx.schedule("tick", Duration::from_millis(100), true);
            }
        }

        fn exit(&mut self, _ctx: &mut SceneContext<'_>) {
            self.journal.borrow_mut().push(format!("{}.exit", self.name));
        }

        fn handle_input(&mut self, event: &Event, _ctx: &mut SceneContext<'_>) -> Navigation {
            self.journal
                .borrow_mut()
                .push(format!("{}.{:?}", self.name, event.tag()));
            if event.is_button(Button::A, ButtonAction::Down) {
                return Navigation::Enter("child".into());
            }
            if event.is_button(Button::B, ButtonAction::Down) {
                return Navigation::Back;
            }
            Navigation::Stay
        }

        fn render(&mut self, ctx: &mut SceneContext<'_>) {
            ctx.render(&[TextLine::center(self.name)]);
        }
    }

    fn recorder(name: &'static str, journal: &Journal) -> SceneNode {
        SceneNode::new(
            name,
            Recorder {
                name,
                journal: journal.clone(),
            },
        )
    }

    struct Rig {
        runtime: Runtime,
        clock: ManualClock,
        button_a: ScriptedButton,
        display: RecordingDisplay,
        journal: Journal,
    }

    fn rig() -> Rig {
        let clock = ManualClock::new();
        let button_a = ScriptedButton::new();
        let display = RecordingDisplay::new();
        let hardware = Hardware::builder()
            .button_a(Ok::<_, String>(Box::new(button_a.clone()) as Box<dyn DigitalInput>))
            .display(Ok::<_, String>(Box::new(display.clone()) as Box<dyn DisplaySurface>))
            .build();
        let config = AppConfig {
            fps: 50,
            ..AppConfig::default()
        };
        let mut runtime = Runtime::new(&config, hardware, Box::new(clock.clone())).unwrap();

        let journal = Journal::default();
        runtime.start(recorder("root", &journal).with_child(recorder("child", &journal)));
        Rig {
            runtime,
            clock,
            button_a,
            display,
            journal,
        }
    }

    #[test]
    fn test_step_renders_and_paces_frames() {
        let mut rig = rig();
        assert_eq!(rig.runtime.step(), LoopStatus::Running);
        assert!(rig.display.shows("root"));
        assert_eq!(rig.clock.now(), Duration::from_millis(20));

        rig.runtime.step();
        assert_eq!(rig.display.frame_count(), 1);
        assert_eq!(rig.clock.now(), Duration::from_millis(40));
    }

    #[test]
    fn test_button_enters_child_scene() {
        let mut rig = rig();
        rig.button_a.set(true);
        rig.runtime.step();
        assert_eq!(rig.runtime.stack().path(), vec!["root", "child"]);
        assert!(rig.display.shows("child"));
    }

    #[test]
    fn test_events_after_scene_change_are_dropped() {
        let mut rig = rig();
        rig.runtime
            .events_mut()
            .post(EventKind::button(Button::A, ButtonAction::Down));
        rig.runtime.events_mut().post(EventKind::Custom(9));
        rig.runtime.step();

        assert_eq!(rig.runtime.stack().path(), vec!["root", "child"]);
        assert!(!rig.journal.borrow().iter().any(|e| e.contains("Custom")));
    }

    #[test]
    fn test_timer_events_arrive_on_following_frame() {
        let mut rig = rig();
        for _ in 0..7 {
            rig.runtime.step();
        }
        let ticks = rig
            .journal
            .borrow()
            .iter()
            .filter(|e| e.as_str() == "root.Timer")
            .count();
        assert!(ticks >= 1);
    }

    #[test]
    fn test_quit_exits_every_scene() {
        let mut rig = rig();
        rig.button_a.set(true);
        rig.runtime.step();
        rig.runtime.events_mut().post(EventKind::Quit);

        assert_eq!(rig.runtime.step(), LoopStatus::Exited);
        assert!(rig.runtime.stack().is_empty());
        let journal = rig.journal.borrow();
        let exits: Vec<_> = journal.iter().filter(|e| e.ends_with(".exit")).collect();
        assert_eq!(exits, vec!["child.exit", "root.exit"]);
    }

    #[test]
    fn test_quit_survives_scene_change_in_same_frame() {
        let mut rig = rig();
        rig.runtime
            .events_mut()
            .post(EventKind::button(Button::A, ButtonAction::Down));
        rig.runtime.events_mut().post(EventKind::Custom(9));
        rig.runtime.events_mut().post(EventKind::Quit);

        assert_eq!(rig.runtime.step(), LoopStatus::Exited);
        assert!(rig.runtime.stack().is_empty());
        let journal = rig.journal.borrow();
        assert!(!journal.iter().any(|e| e.contains("Custom")));
        let exits: Vec<_> = journal.iter().filter(|e| e.ends_with(".exit")).collect();
        assert_eq!(exits, vec!["child.exit", "root.exit"]);
    }

    #[test]
    fn test_back_from_root_ends_the_loop() {
        let mut rig = rig();
        rig.runtime
            .events_mut()
            .post(EventKind::button(Button::B, ButtonAction::Down));
        assert_eq!(rig.runtime.step(), LoopStatus::Exited);
        assert!(matches!(rig.runtime.run(), Err(RuntimeError::NoRootScene)));
    }
}
