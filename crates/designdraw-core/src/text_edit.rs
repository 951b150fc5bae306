//! In-place editing state for a text object.

use crate::canvas::Scene;
use crate::input::{Key, KeyEvent};
use crate::shapes::ShapeId;

/// What a key press means for the edit as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditOutcome {
    /// Keep editing.
    Continue,
    /// Finish and keep the content.
    Commit,
    /// Finish and throw the edit away.
    Cancel,
}

/// Buffer and cursor for the text object being edited.
///
/// `cursor` counts chars, not bytes.
#[derive(Debug, Clone)]
pub struct TextEditSession {
    pub shape_id: ShapeId,
    pub content: String,
    pub cursor: usize,
    /// Content as last committed; restored on cancel.
    pub original: String,
    /// The object was created for this edit and has never been committed.
    pub temporary: bool,
    /// Scene as it was when editing began, pushed to history on commit.
    pub before: Scene,
}

impl TextEditSession {
    /// Start editing with the cursor at the end of `content`.
    pub fn new(shape_id: ShapeId, content: String, temporary: bool, before: Scene) -> Self {
        let cursor = content.chars().count();
        Self {
            shape_id,
            original: content.clone(),
            content,
            cursor,
            temporary,
            before,
        }
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Whether the buffer differs from the last committed content.
    pub fn is_modified(&self) -> bool {
        self.content != self.original
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.content.remove(at);
        true
    }

    /// Delete the char after the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.content.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Apply a key press to the buffer.
    pub fn handle_key(&mut self, event: &KeyEvent) -> TextEditOutcome {
        match event.key {
            Key::Enter if event.modifiers.ctrl || event.modifiers.shift => TextEditOutcome::Commit,
            Key::Enter => {
                self.insert_newline();
                TextEditOutcome::Continue
            }
            Key::Escape => TextEditOutcome::Cancel,
            Key::Backspace => {
                self.backspace();
                TextEditOutcome::Continue
            }
            Key::Delete => {
                self.delete();
                TextEditOutcome::Continue
            }
            Key::ArrowLeft => {
                self.move_left();
                TextEditOutcome::Continue
            }
            Key::ArrowRight => {
                self.move_right();
                TextEditOutcome::Continue
            }
            Key::Home => {
                self.move_home();
                TextEditOutcome::Continue
            }
            Key::End => {
                self.move_end();
                TextEditOutcome::Continue
            }
            Key::Character(c) if !c.is_control() && !event.modifiers.command() => {
                self.insert_char(c);
                TextEditOutcome::Continue
            }
            Key::Character(_) | Key::Tab => TextEditOutcome::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use uuid::Uuid;

    fn session(content: &str) -> TextEditSession {
        TextEditSession::new(Uuid::new_v4(), content.to_string(), false, Scene::new())
    }

    fn press(edit: &mut TextEditSession, key: Key) -> TextEditOutcome {
        edit.handle_key(&KeyEvent::new(key))
    }

    #[test]
    fn test_typing_at_cursor() {
        let mut edit = session("ac");
        assert_eq!(edit.cursor, 2);
        edit.move_left();
        edit.insert_char('b');
        assert_eq!(edit.content, "abc");
        assert_eq!(edit.cursor, 2);
        assert!(edit.is_modified());
    }

    #[test]
    fn test_backspace_and_delete_bounds() {
        let mut edit = session("xy");
        edit.move_home();
        assert!(!edit.backspace());
        assert!(edit.delete());
        assert_eq!(edit.content, "y");
        edit.move_end();
        assert!(!edit.delete());
        assert!(edit.backspace());
        assert_eq!(edit.content, "");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut edit = session("héllo");
        edit.move_home();
        edit.move_right();
        edit.move_right();
        assert!(edit.backspace());
        assert_eq!(edit.content, "hllo");
        edit.insert_char('é');
        assert_eq!(edit.content, "héllo");
    }

    #[test]
    fn test_enter_variants() {
        let mut edit = session("a");
        assert_eq!(press(&mut edit, Key::Enter), TextEditOutcome::Continue);
        assert_eq!(edit.content, "a\n");

        let ctrl_enter = KeyEvent::new(Key::Enter).with_modifiers(Modifiers::CTRL);
        assert_eq!(edit.handle_key(&ctrl_enter), TextEditOutcome::Commit);
        let shift_enter = KeyEvent::new(Key::Enter).with_modifiers(Modifiers::SHIFT);
        assert_eq!(edit.handle_key(&shift_enter), TextEditOutcome::Commit);
        assert_eq!(press(&mut edit, Key::Escape), TextEditOutcome::Cancel);
    }

    #[test]
    fn test_navigation_keys() {
        let mut edit = session("abc");
        press(&mut edit, Key::Home);
        assert_eq!(edit.cursor, 0);
        press(&mut edit, Key::ArrowLeft);
        assert_eq!(edit.cursor, 0);
        press(&mut edit, Key::ArrowRight);
        assert_eq!(edit.cursor, 1);
        press(&mut edit, Key::End);
        press(&mut edit, Key::ArrowRight);
        assert_eq!(edit.cursor, 3);
        press(&mut edit, Key::Tab);
        let ctrl_v = KeyEvent::new(Key::Character('v')).with_modifiers(Modifiers::CTRL);
        assert_eq!(edit.handle_key(&ctrl_v), TextEditOutcome::Continue);
        assert_eq!(edit.content, "abc");
    }
}
