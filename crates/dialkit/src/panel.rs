use crate::env::{Environment, FocusTarget, ListenerKind};
use crate::ring::Key;

pub const DEFAULT_SMALL_SCREEN_WIDTH: f64 = 640.0;

/// `visible` is what the user asked for; `allowed` gates whether it is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisclosureState {
    pub visible: bool,
    pub allowed: bool,
}

impl DisclosureState {
    pub fn shown(&self) -> bool {
        self.visible && self.allowed
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.allowed = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelMode {
    #[default]
    Inline,
    Overlay,
}

impl PanelMode {
    pub fn select(small_screen: bool, overlay: bool) -> Self {
        if small_screen || overlay {
            Self::Overlay
        } else {
            Self::Inline
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    Ignored,
    Handled,
    Close,
}

/// Keeps keyboard focus inside the overlay panel while it is open.
#[derive(Debug, Clone)]
pub struct FocusTrap {
    tabbables: Vec<FocusTarget>,
    restore: Option<FocusTarget>,
}

impl FocusTrap {
    pub fn activate(env: &mut dyn Environment, tabbables: Vec<FocusTarget>) -> Self {
        let trap = Self {
            restore: env.focused().filter(|t| !t.is_within_panel()),
            tabbables,
        };
        trap.focus(env, trap.initial());
        env.listen(ListenerKind::FocusIn);
        trap
    }

    pub fn initial(&self) -> FocusTarget {
        self.tabbables.first().copied().unwrap_or(FocusTarget::Panel)
    }

    fn focus(&self, env: &mut dyn Environment, target: FocusTarget) {
        if let Err(e) = env.focus(target) {
            log::debug!("Focus skipped: {}", e);
        }
    }

    pub fn key(&self, key: Key, shift: bool, env: &mut dyn Environment) -> TrapOutcome {
        match key {
            Key::Escape => TrapOutcome::Close,
            Key::Tab => {
                if let Some(target) = self.tab_target(env.focused(), shift) {
                    self.focus(env, target);
                }
                TrapOutcome::Handled
            }
            _ => TrapOutcome::Ignored,
        }
    }

    fn tab_target(&self, active: Option<FocusTarget>, shift: bool) -> Option<FocusTarget> {
        let (first, last) = (*self.tabbables.first()?, *self.tabbables.last()?);
        let pos = active.and_then(|a| self.tabbables.iter().position(|&t| t == a));

        let target = match (pos, shift) {
            (None, false) => first,
            (None, true) => last,
            (Some(i), false) if i + 1 == self.tabbables.len() => first,
            (Some(i), false) => self.tabbables[i + 1],
            (Some(0), true) => last,
            (Some(i), true) => self.tabbables[i - 1],
        };
        Some(target)
    }

    /// Pulls focus back when something outside the panel receives it.
    pub fn focus_in(&self, target: FocusTarget, env: &mut dyn Environment) -> bool {
        if target.is_within_panel() {
            return false;
        }
        self.focus(env, self.initial());
        true
    }

    /// Returns focus to where it was before the trap, or to `fallback`.
    pub fn release(self, env: &mut dyn Environment, fallback: FocusTarget) {
        env.unlisten(ListenerKind::FocusIn);
        let restored = self.restore.is_some_and(|t| env.focus(t).is_ok());
        if !restored {
            self.focus(env, fallback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::HeadlessEnvironment;
    use crate::geometry::Rect;
    use crate::ring::Slot;

    fn env() -> HeadlessEnvironment {
        HeadlessEnvironment::new(Rect::new(0.0, 0.0, 375.0, 800.0))
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(PanelMode::select(false, false), PanelMode::Inline);
        assert_eq!(PanelMode::select(true, false), PanelMode::Overlay);
        assert_eq!(PanelMode::select(false, true), PanelMode::Overlay);
    }

    #[test]
    fn test_shown_needs_both_flags() {
        let mut d = DisclosureState {
            visible: true,
            allowed: false,
        };
        assert!(!d.shown());
        d.allowed = true;
        assert!(d.shown());
        d.close();
        assert_eq!(d, DisclosureState::default());
    }

    #[test]
    fn test_open_focuses_first_tabbable_or_panel() {
        let mut env = env();
        FocusTrap::activate(&mut env, vec![FocusTarget::PanelClose]);
        assert_eq!(env.focused, Some(FocusTarget::PanelClose));
        assert!(env.listeners.contains(&ListenerKind::FocusIn));

        let mut empty = self::env();
        FocusTrap::activate(&mut empty, Vec::new());
        assert_eq!(empty.focused, Some(FocusTarget::Panel));
    }

    #[test]
    fn test_tab_cycles_inside() {
        let mut env = env();
        let items = vec![FocusTarget::PanelClose, FocusTarget::Panel];
        let trap = FocusTrap::activate(&mut env, items);

        assert_eq!(trap.key(Key::Tab, false, &mut env), TrapOutcome::Handled);
        assert_eq!(env.focused, Some(FocusTarget::Panel));
        trap.key(Key::Tab, false, &mut env);
        assert_eq!(env.focused, Some(FocusTarget::PanelClose));
        trap.key(Key::Tab, true, &mut env);
        assert_eq!(env.focused, Some(FocusTarget::Panel));
    }

    #[test]
    fn test_tab_with_nothing_tabbable_stays_put() {
        let mut env = env();
        let trap = FocusTrap::activate(&mut env, Vec::new());
        assert_eq!(trap.key(Key::Tab, false, &mut env), TrapOutcome::Handled);
        assert_eq!(env.focused, Some(FocusTarget::Panel));
    }

    #[test]
    fn test_escape_requests_close_and_restores_focus() {
        let mut env = env();
        env.focused = Some(FocusTarget::Host(7));
        let trap = FocusTrap::activate(&mut env, vec![FocusTarget::PanelClose]);

        assert_eq!(trap.key(Key::Escape, false, &mut env), TrapOutcome::Close);
        trap.release(&mut env, FocusTarget::Slot(Slot::East));
        assert_eq!(env.focused, Some(FocusTarget::Host(7)));
        assert!(!env.listeners.contains(&ListenerKind::FocusIn));
    }

    #[test]
    fn test_restore_falls_back_to_slot() {
        let mut env = env();
        env.focused = Some(FocusTarget::Host(7));
        let trap = FocusTrap::activate(&mut env, vec![FocusTarget::PanelClose]);
        env.unfocusable.insert(FocusTarget::Host(7));

        trap.release(&mut env, FocusTarget::Slot(Slot::East));
        assert_eq!(env.focused, Some(FocusTarget::Slot(Slot::East)));
    }

    #[test]
    fn test_focus_escaping_the_panel_is_pulled_back() {
        let mut env = env();
        let trap = FocusTrap::activate(&mut env, vec![FocusTarget::PanelClose]);
        env.focused = Some(FocusTarget::Slot(Slot::North));

        assert!(trap.focus_in(FocusTarget::Slot(Slot::North), &mut env));
        assert_eq!(env.focused, Some(FocusTarget::PanelClose));
        assert!(!trap.focus_in(FocusTarget::PanelClose, &mut env));
    }
}
