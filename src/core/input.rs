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

//! Keyboard state
//!
//! Tracks which virtual-key codes are currently held. The window layer feeds
//! key-down and key-up events in; the frame loop polls the table.

/// Number of virtual-key codes tracked
pub const KEY_COUNT: usize = 256;

/// Virtual-key code for the Escape key
pub const VK_ESCAPE: u32 = 0x1B;

#[derive(Debug, Clone)]
pub struct Input {
    keys: [bool; KEY_COUNT],
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    /// All keys start released
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn key_down(&mut self, key: u32) {
        match self.keys.get_mut(key as usize) {
            Some(state) => *state = true,
            None => log::warn!("Ignoring key-down for out of range key code {}", key),
        }
    }

    pub fn key_up(&mut self, key: u32) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = false;
        }
    }

    /// Codes outside the table are never down
    pub fn is_key_down(&self, key: u32) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let input = Input::new();
        assert!((0..KEY_COUNT as u32).all(|key| !input.is_key_down(key)));
    }

    #[test]
    fn test_press_and_release() {
        let mut input = Input::new();
        input.key_down(VK_ESCAPE);
        assert!(input.is_key_down(VK_ESCAPE));
        assert!(!input.is_key_down(0x41));

        input.key_up(VK_ESCAPE);
        assert!(!input.is_key_down(VK_ESCAPE));
    }

    #[test]
    fn test_out_of_range_keys() {
        let mut input = Input::new();
        input.key_down(300);
        assert!(!input.is_key_down(300));
        input.key_up(u32::MAX);
    }

    #[test]
    fn test_reset() {
        let mut input = Input::new();
        input.key_down(1);
        input.key_down(255);
        input.reset();
        assert!(!input.is_key_down(1));
        assert!(!input.is_key_down(255));
    }
}
