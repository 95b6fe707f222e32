//! Keyboard shortcut registry and resolution.

use inkcanvas_core::{KeyEvent, ToolKind};

/// What a shortcut asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    DeleteSelection,
    SelectTool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub command: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, command: bool, description: &'static str) -> Self {
        Self {
            key,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        if self.command {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Single-letter keys that switch tools.
const TOOL_KEYS: [(char, ToolKind); 9] = [
    ('v', ToolKind::Select),
    ('p', ToolKind::Pen),
    ('h', ToolKind::Highlighter),
    ('e', ToolKind::Eraser),
    ('b', ToolKind::Fill),
    ('l', ToolKind::Line),
    ('r', ToolKind::Rectangle),
    ('c', ToolKind::Circle),
    ('t', ToolKind::Text),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, "Undo"),
            Shortcut::new("Y", true, "Redo"),
            Shortcut::new("Delete", false, "Delete selected object"),
            Shortcut::new("Backspace", false, "Delete selected object"),
            Shortcut::new("V", false, "Select tool"),
            Shortcut::new("P", false, "Pen"),
            Shortcut::new("H", false, "Highlighter"),
            Shortcut::new("E", false, "Eraser"),
            Shortcut::new("B", false, "Fill"),
            Shortcut::new("L", false, "Line"),
            Shortcut::new("R", false, "Rectangle"),
            Shortcut::new("C", false, "Circle"),
            Shortcut::new("T", false, "Text"),
        ]
    }

    /// Map a key press to an action given the active tool.
    ///
    /// Deletion only applies while the select tool is active.
    pub fn resolve(event: &KeyEvent, active_tool: ToolKind) -> Option<ShortcutAction> {
        let key = event.key.as_str();
        let mods = event.modifiers;
        if mods.command() {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }
        if matches!(key, "Delete" | "Backspace") {
            return (active_tool == ToolKind::Select).then_some(ShortcutAction::DeleteSelection);
        }
        if mods.alt {
            return None;
        }
        let mut chars = key.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        let ch = ch.to_ascii_lowercase();
        TOOL_KEYS
            .iter()
            .find(|(k, _)| *k == ch)
            .map(|(_, tool)| ShortcutAction::SelectTool(*tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkcanvas_core::Modifiers;

    fn ctrl(key: &str) -> KeyEvent {
        KeyEvent::new(key, Modifiers { ctrl: true, ..Default::default() })
    }

    #[test]
    fn test_undo_redo() {
        assert_eq!(ShortcutRegistry::resolve(&ctrl("z"), ToolKind::Pen), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutRegistry::resolve(&ctrl("Y"), ToolKind::Pen), Some(ShortcutAction::Redo));
        let cmd = KeyEvent::new("z", Modifiers { meta: true, ..Default::default() });
        assert_eq!(ShortcutRegistry::resolve(&cmd, ToolKind::Pen), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutRegistry::resolve(&ctrl("p"), ToolKind::Pen), None);
    }

    #[test]
    fn test_delete_requires_select_tool() {
        let delete = KeyEvent::plain("Delete");
        assert_eq!(
            ShortcutRegistry::resolve(&delete, ToolKind::Select),
            Some(ShortcutAction::DeleteSelection)
        );
        assert_eq!(ShortcutRegistry::resolve(&delete, ToolKind::Pen), None);
        assert_eq!(
            ShortcutRegistry::resolve(&KeyEvent::plain("Backspace"), ToolKind::Select),
            Some(ShortcutAction::DeleteSelection)
        );
    }

    #[test]
    fn test_tool_keys() {
        assert_eq!(
            ShortcutRegistry::resolve(&KeyEvent::plain("R"), ToolKind::Pen),
            Some(ShortcutAction::SelectTool(ToolKind::Rectangle))
        );
        assert_eq!(
            ShortcutRegistry::resolve(&KeyEvent::plain("b"), ToolKind::Pen),
            Some(ShortcutAction::SelectTool(ToolKind::Fill))
        );
        assert_eq!(ShortcutRegistry::resolve(&KeyEvent::plain("x"), ToolKind::Pen), None);
        assert_eq!(ShortcutRegistry::resolve(&KeyEvent::plain("Enter"), ToolKind::Pen), None);
        let alt = KeyEvent::new("r", Modifiers { alt: true, ..Default::default() });
        assert_eq!(ShortcutRegistry::resolve(&alt, ToolKind::Pen), None);
    }

    #[test]
    fn test_registry_lists_every_tool_key() {
        let shortcuts = ShortcutRegistry::all();
        for (key, _) in TOOL_KEYS {
            let upper = key.to_ascii_uppercase().to_string();
            assert!(shortcuts.iter().any(|s| s.key == upper && !s.command));
        }
        assert_eq!(Shortcut::new("Z", true, "Undo").format(), "Ctrl+Z");
    }
}
