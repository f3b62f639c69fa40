#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    Hide,
    Toggle,
    ConfigReload,
}

impl AppEvent {
    /// Parses one line of the control socket protocol.
    pub fn from_command(line: &str) -> Option<Self> {
        match line.trim() {
            "show" => Some(Self::Show),
            "hide" => Some(Self::Hide),
            "toggle" => Some(Self::Toggle),
            _ => None,
        }
    }
}
