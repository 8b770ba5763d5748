//! Input injection seam.
//!
//! Real deployments plug an OS injector (`SendInput`, XTest, …) in
//! behind [`InputInjector`]; this binary ships a tracing-backed
//! injector that logs every replayed event, which is enough to
//! verify order and content of the relay end to end.

use castline_core::{CastError, InputEvent, InputInjector};
use tracing::info;

/// Logs each replayed event instead of injecting it into the OS.
#[derive(Default)]
pub struct TraceInjector {
    replayed: u64,
}

impl TraceInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events replayed so far.
    pub fn replayed(&self) -> u64 {
        self.replayed
    }
}

impl InputInjector for TraceInjector {
    fn replay(&mut self, event: &InputEvent) -> Result<(), CastError> {
        self.replayed += 1;
        match event {
            InputEvent::Mouse { x, y, button } => {
                info!(x, y, ?button, "replay mouse event");
            }
            InputEvent::Key { modifiers, key } => {
                info!(?modifiers, %key, "replay key event");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castline_core::{KeyModifiers, MouseButton};

    #[test]
    fn replay_counts_events() {
        let mut inj = TraceInjector::new();
        inj.replay(&InputEvent::Mouse {
            x: 10,
            y: 20,
            button: MouseButton::Left,
        })
        .unwrap();
        inj.replay(&InputEvent::Key {
            modifiers: KeyModifiers::CTRL,
            key: 'c',
        })
        .unwrap();
        assert_eq!(inj.replayed(), 2);
    }
}
