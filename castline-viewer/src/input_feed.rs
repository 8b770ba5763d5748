//! Input polling seam.
//!
//! Real deployments plug the window toolkit's event queue in behind
//! [`InputSource`]; this binary ships an idle source (nothing to
//! relay) and a demo source that sweeps the pointer and types a short
//! string, which is enough to exercise the relay end to end.

use castline_core::{InputEvent, InputSource, KeyModifiers, MouseButton};

/// Polls nothing; every tick returns an empty batch, which the
/// channel suppresses on the wire.
#[derive(Debug, Default)]
pub struct IdleInputSource;

impl InputSource for IdleInputSource {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }
}

/// Synthesizes a repeating script of pointer and key events.
#[derive(Debug, Default)]
pub struct DemoInputSource {
    tick: u64,
}

impl DemoInputSource {
    pub fn new() -> Self {
        Self::default()
    }
}

const DEMO_TEXT: &str = "castline";

impl InputSource for DemoInputSource {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let tick = self.tick;
        self.tick += 1;

        // Sweep the pointer across a 1920x1080 surface, clicking every
        // 32nd tick and typing one demo character every 8th.
        let mut events = vec![InputEvent::Mouse {
            x: (tick * 16 % 1920) as u16,
            y: (tick * 9 % 1080) as u16,
            button: MouseButton::Left,
        }];
        if tick % 32 == 0 {
            events.push(InputEvent::Mouse {
                x: (tick * 16 % 1920) as u16,
                y: (tick * 9 % 1080) as u16,
                button: MouseButton::Right,
            });
        }
        if tick % 8 == 0 {
            let chars: Vec<char> = DEMO_TEXT.chars().collect();
            events.push(InputEvent::Key {
                modifiers: KeyModifiers::empty(),
                key: chars[(tick / 8) as usize % chars.len()],
            });
        }
        events
    }
}
