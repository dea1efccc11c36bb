// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application loop
//!
//! [`System`] pumps window events into [`Input`], renders a frame through
//! [`Graphics`] and stops on a quit message, the escape key or a frame limit.
//! Events come from an [`EventSource`] so the loop can be driven by a real
//! window or by a script.

use super::config::SandboxConfig;
use super::device::RenderBackend;
use super::error::Result;
use super::graphics::Graphics;
use super::input::{Input, VK_ESCAPE};
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindowEvent {
    KeyDown(u32),
    KeyUp(u32),
    Quit,
}

/// Supplies the window messages pending before a frame
pub trait EventSource {
    /// Next pending event for `frame`, or `None` once drained
    fn poll(&mut self, frame: u64) -> Option<WindowEvent>;
}

/// Events delivered at fixed frame numbers
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<(u64, WindowEvent)>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` before `frame` is rendered
    ///
    /// The queue stays sorted by frame. Events sharing a frame keep the order
    /// they were added in.
    pub fn at(mut self, frame: u64, event: WindowEvent) -> Self {
        let slot = self.queue.partition_point(|&(due, _)| due <= frame);
        self.queue.insert(slot, (frame, event));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, frame: u64) -> Option<WindowEvent> {
        match self.queue.front() {
            Some(&(due, _)) if due <= frame => self.queue.pop_front().map(|(_, event)| event),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Quit,
    Escape,
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub reason: StopReason,
}

pub struct System<B: RenderBackend> {
    input: Input,
    graphics: Graphics<B>,
    max_frames: Option<u64>,
}

impl<B: RenderBackend> System<B> {
    pub fn init(config: &SandboxConfig, backend: B) -> Result<Self> {
        let graphics = Graphics::init(config, backend)?;
        Ok(Self {
            input: Input::new(),
            graphics,
            max_frames: None,
        })
    }

    /// Stop after `frames` rendered frames
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Run until quit, escape or the frame limit
    ///
    /// A render failure stops the loop and is returned.
    pub fn run<E: EventSource>(&mut self, events: &mut E) -> Result<RunSummary> {
        let mut frames = 0u64;

        let reason = loop {
            if self.max_frames.is_some_and(|max| frames >= max) {
                break StopReason::FrameLimit;
            }

            if self.pump(events, frames) {
                break StopReason::Quit;
            }

            if self.frame()? {
                break StopReason::Escape;
            }
            frames += 1;
        };

        log::info!("Stopped after {} frames ({:?})", frames, reason);
        Ok(RunSummary { frames, reason })
    }

    /// Drain pending events; returns true on quit
    fn pump<E: EventSource>(&mut self, events: &mut E, frame: u64) -> bool {
        while let Some(event) = events.poll(frame) {
            log::trace!("Frame {}: {:?}", frame, event);
            match event {
                WindowEvent::KeyDown(key) => self.input.key_down(key),
                WindowEvent::KeyUp(key) => self.input.key_up(key),
                WindowEvent::Quit => return true,
            }
        }
        false
    }

    /// Render one frame; returns true when escape is held
    pub fn frame(&mut self) -> Result<bool> {
        if self.input.is_key_down(VK_ESCAPE) {
            return Ok(true);
        }
        self.graphics.frame()?;
        Ok(false)
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn graphics(&self) -> &Graphics<B> {
        &self.graphics
    }

    pub fn into_graphics(self) -> Graphics<B> {
        self.graphics
    }
}
