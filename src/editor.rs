// SPDX-License-Identifier: MIT
//
// Editor: the controller.
//
// Owns the buffer, cursor, view and status message, and turns each key
// from the event loop into an edit, a motion, or a command. It is always
// in one of three states:
//
//   Running    keys edit the buffer and move the cursor
//   Prompting  keys go to a one-line prompt (save-as or find)
//   Quitting   the loop is being told to stop
//
// Quitting with unsaved changes takes `quit_times` Ctrl-Q presses in a
// row. Any other key in between starts the count over.

use std::path::PathBuf;
use std::time::Instant;

use kilt_editor::buffer::Buffer;
use kilt_editor::cursor::{Cursor, Motion};
use kilt_editor::message::StatusMessage;
use kilt_editor::options::Options;
use kilt_editor::prompt::{Prompt, PromptOutcome};
use kilt_editor::render::render_frame;
use kilt_editor::search::find_first;
use kilt_editor::view::View;

use kilt_term::event_loop::{Action, App};
use kilt_term::input::{KeyCode, KeyEvent};
use kilt_term::output::OutputBuffer;
use kilt_term::terminal::Size;

use tracing::{debug, info, warn};

const HELP: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// Rows taken by the status and message bars.
const BAR_ROWS: usize = 2;

// ─── State ──────────────────────────────────────────────────────────────────

/// What a submitted prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptPurpose {
    SaveAs,
    Find,
}

impl PromptPurpose {
    const fn label(self) -> &'static str {
        match self {
            Self::SaveAs => "Save as: ",
            Self::Find => "Search: ",
        }
    }

    const fn aborted(self) -> &'static str {
        match self {
            Self::SaveAs => "Save aborted",
            Self::Find => "Search aborted",
        }
    }
}

#[derive(Debug)]
enum State {
    Running,
    Prompting { prompt: Prompt, purpose: PromptPurpose },
    Quitting,
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// All editor state, owned in one place.
pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    view: View,
    message: StatusMessage,
    state: State,
    quit_times: u32,
    /// Ctrl-Q presses still needed to quit a dirty buffer.
    quit_remaining: u32,
    /// Whether the last painted frame showed the status message.
    message_on_screen: bool,
}

impl Editor {
    pub fn new(buffer: Buffer, options: &Options) -> Self {
        let mut message = StatusMessage::new(options.message_timeout);
        message.set(HELP);
        Self {
            buffer,
            cursor: Cursor::ZERO,
            view: View::new(1, 1),
            message,
            state: State::Running,
            quit_times: options.quit_times,
            quit_remaining: options.quit_times,
            message_on_screen: false,
        }
    }

    // -- Running ------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.is_ctrl(b'q') {
            return self.quit();
        }

        match key.code {
            KeyCode::Enter => self.cursor = self.buffer.insert_newline(self.cursor),
            KeyCode::Backspace => self.cursor = self.buffer.delete_char(self.cursor),
            KeyCode::Delete => {
                self.cursor.apply(Motion::Right, &self.buffer);
                self.cursor = self.buffer.delete_char(self.cursor);
            }
            KeyCode::Char(b's') if key.is_ctrl(b's') => self.save(),
            KeyCode::Char(b'f') if key.is_ctrl(b'f') => self.start_prompt(PromptPurpose::Find),
            KeyCode::Up => self.cursor.apply(Motion::Up, &self.buffer),
            KeyCode::Down => self.cursor.apply(Motion::Down, &self.buffer),
            KeyCode::Left => self.cursor.apply(Motion::Left, &self.buffer),
            KeyCode::Right => self.cursor.apply(Motion::Right, &self.buffer),
            KeyCode::Home => self.cursor.apply(Motion::Home, &self.buffer),
            KeyCode::End => self.cursor.apply(Motion::End, &self.buffer),
            KeyCode::PageUp => self.page(Motion::Up),
            KeyCode::PageDown => self.page(Motion::Down),
            KeyCode::Tab => self.cursor = self.buffer.insert_char(self.cursor, b'\t'),
            KeyCode::Char(c) if key.modifiers.is_empty() => {
                self.cursor = self.buffer.insert_char(self.cursor, c);
            }
            // Escape, Ctrl-L and other control keys only redraw.
            _ => {}
        }

        self.quit_remaining = self.quit_times;
        Action::Continue
    }

    fn quit(&mut self) -> Action {
        if self.buffer.is_dirty() {
            self.quit_remaining = self.quit_remaining.saturating_sub(1);
            if self.quit_remaining > 0 {
                self.message.set(format!(
                    "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                    self.quit_remaining
                ));
                return Action::Continue;
            }
        }
        info!(dirty = self.buffer.dirty(), "quit");
        self.state = State::Quitting;
        Action::Quit
    }

    /// Jump to the top or bottom row of the window, then move a screenful.
    fn page(&mut self, motion: Motion) {
        let rows = self.view.screen_rows;
        self.cursor.cy = if motion == Motion::Up {
            self.view.row_offset
        } else {
            (self.view.row_offset + rows - 1).min(self.buffer.line_count())
        };
        for _ in 0..rows {
            self.cursor.apply(motion, &self.buffer);
        }
    }

    fn save(&mut self) {
        match self.buffer.path() {
            Some(path) => {
                let path = path.to_path_buf();
                self.write_out(path);
            }
            None => self.start_prompt(PromptPurpose::SaveAs),
        }
    }

    fn write_out(&mut self, path: PathBuf) {
        match self.buffer.save_to(&path) {
            Ok(n) => self.message.set(format!("{n} bytes written to disk")),
            Err(err) => {
                warn!(path = %path.display(), %err, "save failed");
                self.message.set(format!("Can't save! I/O error: {err}"));
            }
        }
    }

    // -- Prompting ----------------------------------------------------------

    fn start_prompt(&mut self, purpose: PromptPurpose) {
        let prompt = Prompt::new(purpose.label());
        self.message.set(prompt.message());
        self.state = State::Prompting { prompt, purpose };
    }

    fn handle_prompt(&mut self, key: KeyEvent) {
        let State::Prompting { prompt, purpose } = &mut self.state else {
            return;
        };
        let purpose = *purpose;

        match prompt.handle_key(key) {
            PromptOutcome::Pending => {
                let text = prompt.message();
                self.message.set(text);
            }
            PromptOutcome::Cancelled => {
                debug!(?purpose, "prompt cancelled");
                self.state = State::Running;
                self.message.set(purpose.aborted());
            }
            PromptOutcome::Submitted(input) => {
                debug!(?purpose, %input, "prompt submitted");
                self.state = State::Running;
                self.message.set("");
                match purpose {
                    PromptPurpose::SaveAs => {
                        let path = PathBuf::from(input);
                        self.buffer.set_path(path.clone());
                        self.write_out(path);
                    }
                    PromptPurpose::Find => self.find(&input),
                }
            }
        }
    }

    fn find(&mut self, query: &str) {
        if let Some(hit) = find_first(&self.buffer, query.as_bytes()) {
            self.cursor = hit;
            self.view.scroll_to_end(&self.buffer);
        }
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Editor {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        match self.state {
            State::Running => self.handle_key(key),
            State::Prompting { .. } => {
                self.handle_prompt(key);
                Action::Continue
            }
            State::Quitting => Action::Quit,
        }
    }

    fn on_resize(&mut self, size: Size) {
        let rows = usize::from(size.rows).saturating_sub(BAR_ROWS);
        self.view.resize(rows, usize::from(size.cols));
    }

    fn on_tick(&mut self) -> bool {
        if matches!(self.state, State::Prompting { .. }) {
            return false;
        }
        self.message_on_screen && !self.message.is_visible(Instant::now())
    }

    fn paint(&mut self, out: &mut OutputBuffer) {
        let now = Instant::now();
        // An open prompt never times out.
        if let State::Prompting { prompt, .. } = &self.state {
            self.message.set_at_time(prompt.message(), now);
        }
        self.message_on_screen = self.message.is_visible(now);
        if let Err(err) = render_frame(
            out,
            &self.buffer,
            &mut self.view,
            self.cursor,
            &self.message,
            now,
        ) {
            warn!(%err, "frame composition failed");
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    // ── Helpers ───────────────────────────────────────────────────────────

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn ctrl(letter: u8) -> KeyEvent {
        KeyEvent::ctrl(letter)
    }

    /// Feed a sequence of keys, returning the last action.
    fn feed(editor: &mut Editor, keys: &[KeyEvent]) -> Action {
        let mut last = Action::Continue;
        for &k in keys {
            last = editor.on_key(k);
        }
        last
    }

    fn typed(editor: &mut Editor, text: &str) {
        for b in text.bytes() {
            editor.on_key(key(KeyCode::Char(b)));
        }
    }

    /// An editor on a 24×80 terminal with `text` loaded (clean).
    fn editor_with(text: &str) -> Editor {
        let buffer = Buffer::from_reader(text.as_bytes(), 8).unwrap();
        let mut e = Editor::new(buffer, &Options::default());
        e.on_resize(Size { cols: 80, rows: 24 });
        e
    }

    fn lines(e: &Editor) -> Vec<String> {
        e.buffer
            .lines()
            .iter()
            .map(|l| String::from_utf8_lossy(l.chars()).into_owned())
            .collect()
    }

    /// The viewport invariant, checked after a paint.
    fn assert_cursor_visible(e: &Editor) {
        let v = &e.view;
        let cy = e.cursor.cy;
        assert!(
            v.row_offset <= cy && cy < v.row_offset + v.screen_rows,
            "cy {cy} off screen"
        );
        let rx = v.rx();
        assert!(
            v.col_offset <= rx && rx < v.col_offset + v.screen_cols,
            "rx {rx} off screen"
        );
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kilt-editor-{}-{name}", std::process::id()))
    }

    // ── Startup ───────────────────────────────────────────────────────────

    #[test]
    fn starts_with_help_message() {
        let e = editor_with("");
        assert_eq!(e.message.text(), HELP);
    }

    #[test]
    fn resize_reserves_two_bar_rows() {
        let e = editor_with("");
        assert_eq!(e.view.screen_rows, 22);
        assert_eq!(e.view.screen_cols, 80);
    }

    #[test]
    fn tiny_terminal_keeps_one_text_row() {
        let mut e = editor_with("");
        e.on_resize(Size { cols: 10, rows: 1 });
        assert_eq!(e.view.screen_rows, 1);
    }

    // ── Editing ───────────────────────────────────────────────────────────

    #[test]
    fn typing_inserts() {
        let mut e = editor_with("");
        typed(&mut e, "hi");
        assert_eq!(lines(&e), ["hi"]);
        assert_eq!(e.cursor, Cursor::new(0, 2));
        assert!(e.buffer.is_dirty());
    }

    #[test]
    fn enter_splits_and_backspace_joins() {
        let mut e = editor_with("foobar");
        feed(&mut e, &[key(KeyCode::Right), key(KeyCode::Right), key(KeyCode::Right)]);
        feed(&mut e, &[key(KeyCode::Enter)]);
        assert_eq!(lines(&e), ["foo", "bar"]);
        assert_eq!(e.cursor, Cursor::new(1, 0));

        feed(&mut e, &[key(KeyCode::Backspace)]);
        assert_eq!(lines(&e), ["foobar"]);
        assert_eq!(e.cursor, Cursor::new(0, 3));
    }

    #[test]
    fn ctrl_h_byte_is_backspace() {
        let mut e = editor_with("ab");
        let decoded = kilt_term::input::Decoder::new().advance(0x08).unwrap();
        feed(&mut e, &[key(KeyCode::End), decoded]);
        assert_eq!(lines(&e), ["a"]);
    }

    #[test]
    fn delete_removes_under_cursor() {
        let mut e = editor_with("abc");
        feed(&mut e, &[key(KeyCode::Delete)]);
        assert_eq!(lines(&e), ["bc"]);
        assert_eq!(e.cursor, Cursor::new(0, 0));
    }

    #[test]
    fn delete_at_line_end_joins_next() {
        let mut e = editor_with("ab\ncd");
        feed(&mut e, &[key(KeyCode::End), key(KeyCode::Delete)]);
        assert_eq!(lines(&e), ["abcd"]);
        assert_eq!(e.cursor, Cursor::new(0, 2));
    }

    #[test]
    fn tab_inserts_literal_tab() {
        let mut e = editor_with("");
        feed(&mut e, &[key(KeyCode::Tab)]);
        assert_eq!(lines(&e), ["\t"]);
    }

    #[test]
    fn control_keys_do_not_insert() {
        let mut e = editor_with("x");
        feed(&mut e, &[ctrl(b'l'), key(KeyCode::Escape), ctrl(b'a')]);
        assert_eq!(lines(&e), ["x"]);
        assert!(!e.buffer.is_dirty());
    }

    // ── Motion ────────────────────────────────────────────────────────────

    #[test]
    fn page_down_then_up() {
        let text: String = (0..100).map(|i| format!("{i}\n")).collect();
        let mut e = editor_with(&text);
        let mut out = OutputBuffer::new();

        feed(&mut e, &[key(KeyCode::PageDown)]);
        assert_eq!(e.cursor.cy, 43);
        e.paint(&mut out);
        assert_eq!(e.view.row_offset, 22);

        feed(&mut e, &[key(KeyCode::PageUp)]);
        assert_eq!(e.cursor.cy, 0);
    }

    #[test]
    fn page_down_stops_at_virtual_line() {
        let mut e = editor_with("a\nb\nc");
        feed(&mut e, &[key(KeyCode::PageDown)]);
        assert_eq!(e.cursor.cy, 3);
    }

    #[test]
    fn cursor_stays_visible_after_paint() {
        let text: String = (0..60)
            .map(|i| format!("line {i}\t{}\n", "x".repeat(i * 3)))
            .collect();
        let mut e = editor_with(&text);
        let mut out = OutputBuffer::new();
        let keys = [
            KeyCode::PageDown,
            KeyCode::End,
            KeyCode::Down,
            KeyCode::End,
            KeyCode::PageDown,
            KeyCode::Home,
            KeyCode::PageUp,
            KeyCode::Left,
        ];
        for k in keys {
            e.on_key(key(k));
            out.clear();
            e.paint(&mut out);
            assert_cursor_visible(&e);
        }
    }

    #[test]
    fn cursor_stays_visible_while_editing_small_screen() {
        let mut e = editor_with("");
        e.on_resize(Size { cols: 20, rows: 6 });
        let mut keys: Vec<KeyEvent> = (0..30)
            .map(|i| key(KeyCode::Char(b'a' + i % 26)))
            .collect();
        keys.push(key(KeyCode::Tab));
        keys.extend([key(KeyCode::Enter); 8]);
        keys.extend([key(KeyCode::Backspace); 12]);
        keys.push(key(KeyCode::Delete));

        let mut out = OutputBuffer::new();
        for k in keys {
            e.on_key(k);
            out.clear();
            e.paint(&mut out);
            assert_cursor_visible(&e);
        }
        assert_eq!(lines(&e), ["abcdefghijklmnopqrstuvwxyza"]);
        assert_eq!(e.cursor, Cursor::new(1, 0));
    }

    // ── Quit ──────────────────────────────────────────────────────────────

    #[test]
    fn quit_clean_buffer_immediately() {
        let mut e = editor_with("abc");
        assert_eq!(feed(&mut e, &[ctrl(b'q')]), Action::Quit);
    }

    #[test]
    fn quit_dirty_needs_three_presses() {
        let mut e = editor_with("abc");
        typed(&mut e, "x");

        assert_eq!(e.on_key(ctrl(b'q')), Action::Continue);
        assert_eq!(
            e.message.text(),
            "WARNING!!! File has unsaved changes. Press Ctrl-Q 2 more times to quit."
        );
        assert_eq!(e.on_key(ctrl(b'q')), Action::Continue);
        assert_eq!(e.on_key(ctrl(b'q')), Action::Quit);
    }

    #[test]
    fn keys_after_quit_keep_quitting() {
        let mut e = editor_with("abc");
        assert_eq!(e.on_key(ctrl(b'q')), Action::Quit);
        assert!(matches!(e.state, State::Quitting));
        assert_eq!(e.on_key(key(KeyCode::Char(b'x'))), Action::Quit);
        assert_eq!(lines(&e), ["abc"]);
    }

    #[test]
    fn other_key_resets_quit_countdown() {
        let mut e = editor_with("abc");
        typed(&mut e, "x");

        assert_eq!(feed(&mut e, &[ctrl(b'q'), ctrl(b'q')]), Action::Continue);
        feed(&mut e, &[key(KeyCode::Left)]);

        assert_eq!(e.on_key(ctrl(b'q')), Action::Continue);
        assert_eq!(e.on_key(ctrl(b'q')), Action::Continue);
        assert_eq!(e.on_key(ctrl(b'q')), Action::Quit);
    }

    // ── Save ──────────────────────────────────────────────────────────────

    #[test]
    fn save_to_known_path() {
        let path = temp_path("save");
        std::fs::write(&path, "old\n").unwrap();
        let mut e = Editor::new(Buffer::open(&path, 8).unwrap(), &Options::default());
        typed(&mut e, "new ");

        feed(&mut e, &[ctrl(b's')]);

        assert_eq!(e.message.text(), "8 bytes written to disk");
        assert!(!e.buffer.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new old\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_as_prompts_for_name() {
        let path = temp_path("save-as");
        let mut e = editor_with("");
        typed(&mut e, "hi");

        feed(&mut e, &[ctrl(b's')]);
        assert!(matches!(
            e.state,
            State::Prompting {
                purpose: PromptPurpose::SaveAs,
                ..
            }
        ));
        assert_eq!(e.message.text(), "Save as:  (ESC to cancel)");

        typed(&mut e, path.to_str().unwrap());
        feed(&mut e, &[key(KeyCode::Enter)]);

        assert!(matches!(e.state, State::Running));
        assert_eq!(e.buffer.path(), Some(path.as_path()));
        assert_eq!(e.message.text(), "3 bytes written to disk");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_as_cancel() {
        let mut e = editor_with("");
        typed(&mut e, "hi");
        feed(&mut e, &[ctrl(b's'), key(KeyCode::Char(b'f')), key(KeyCode::Escape)]);

        assert!(matches!(e.state, State::Running));
        assert_eq!(e.message.text(), "Save aborted");
        assert_eq!(e.buffer.path(), None);
        assert!(e.buffer.is_dirty());
        assert_eq!(lines(&e), ["hi"]);
    }

    #[test]
    fn save_failure_is_reported_and_keeps_dirty() {
        let mut e = editor_with("");
        typed(&mut e, "hi");
        e.buffer.set_path(temp_path("no-such-dir").join("f.txt"));

        feed(&mut e, &[ctrl(b's')]);

        assert!(e.message.text().starts_with("Can't save! I/O error: "));
        assert!(e.buffer.is_dirty());
    }

    // ── Find ──────────────────────────────────────────────────────────────

    #[test]
    fn find_moves_cursor() {
        let mut e = editor_with("first\nhello world\n");
        feed(&mut e, &[ctrl(b'f')]);
        typed(&mut e, "world");
        assert_eq!(e.message.text(), "Search: world (ESC to cancel)");
        feed(&mut e, &[key(KeyCode::Enter)]);

        assert_eq!(e.cursor, Cursor::new(1, 6));
        assert_eq!(e.view.row_offset, 2);
        assert!(!e.buffer.is_dirty());
    }

    #[test]
    fn find_without_match_keeps_cursor() {
        let mut e = editor_with("abc\ndef");
        feed(&mut e, &[key(KeyCode::Down), ctrl(b'f')]);
        typed(&mut e, "zzz");
        feed(&mut e, &[key(KeyCode::Enter)]);
        assert_eq!(e.cursor, Cursor::new(1, 0));
    }

    #[test]
    fn find_cancel_keeps_cursor() {
        let mut e = editor_with("abc\ndef");
        feed(&mut e, &[key(KeyCode::Down), ctrl(b'f')]);
        typed(&mut e, "abc");
        feed(&mut e, &[key(KeyCode::Escape)]);
        assert_eq!(e.cursor, Cursor::new(1, 0));
        assert_eq!(e.message.text(), "Search aborted");
    }

    #[test]
    fn prompt_keys_do_not_edit_buffer() {
        let mut e = editor_with("abc");
        feed(&mut e, &[ctrl(b'f')]);
        typed(&mut e, "q");
        feed(&mut e, &[ctrl(b'q'), key(KeyCode::Backspace)]);
        assert_eq!(lines(&e), ["abc"]);
        assert!(matches!(e.state, State::Prompting { .. }));
    }

    // ── Painting ──────────────────────────────────────────────────────────

    #[test]
    fn paint_draws_status_and_help() {
        let mut e = editor_with("hello");
        let mut out = OutputBuffer::new();
        e.paint(&mut out);
        let frame = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert!(frame.contains("hello\x1b[K\r\n"));
        assert!(frame.contains("[No Name] - 1 lines"));
        assert!(frame.contains(HELP));
    }

    #[test]
    fn tick_requests_redraw_when_message_expires() {
        let mut e = editor_with("");
        let mut out = OutputBuffer::new();
        e.paint(&mut out);
        assert!(!e.on_tick());

        let expired = Instant::now()
            .checked_sub(Duration::from_secs(10))
            .unwrap();
        e.message.set_at_time("old", expired);
        assert!(e.on_tick());

        e.paint(&mut out);
        assert!(!e.on_tick());
    }

    #[test]
    fn prompt_outlives_message_timeout() {
        let mut e = editor_with("abc");
        feed(&mut e, &[ctrl(b'f')]);
        typed(&mut e, "a");
        let mut out = OutputBuffer::new();
        e.paint(&mut out);

        let stale = Instant::now()
            .checked_sub(Duration::from_secs(6))
            .unwrap();
        e.message.set_at_time("Search: a (ESC to cancel)", stale);
        assert!(!e.on_tick());

        let mut out = OutputBuffer::new();
        e.paint(&mut out);
        let frame = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert!(frame.contains("Search: a (ESC to cancel)"));
        assert!(matches!(
            e.state,
            State::Prompting {
                purpose: PromptPurpose::Find,
                ..
            }
        ));
    }
}
