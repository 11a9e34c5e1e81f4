//! Input state machine.
//!
//! Translates raw platform events into the [`Button`] vocabulary and drives
//! the application's edge-triggered (press/release) and level-triggered
//! (held) callbacks. Events are consumed once per frame in arrival order;
//! after the batch, the held table is scanned exactly once.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;

use crate::engine::{Application, Context};

/// Abstract buttons the engine reports. Left/right modifier keys and both
/// return keys fold into single variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Button {
    Up = 0,
    Down,
    Left,
    Right,
    Q,
    E,
    R,
    Space,
    Shift,
    Return,
    Ctrl,
    Mouse1,
    Mouse2,
}

impl Button {
    /// Number of buttons; sizes the held table.
    pub const COUNT: usize = 13;

    /// Every button, in held-table order.
    pub const ALL: [Button; Button::COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Q,
        Button::E,
        Button::R,
        Button::Space,
        Button::Shift,
        Button::Return,
        Button::Ctrl,
        Button::Mouse1,
        Button::Mouse2,
    ];
}

/// A platform input event, already stripped down to what the state machine
/// consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    Quit,
    KeyDown { key: Keycode, repeat: bool },
    KeyUp { key: Keycode },
    MouseDown { button: Button },
    MouseUp { button: Button },
    MouseMove { x: i32, y: i32, dx: i32, dy: i32 },
    Text { ch: char },
}

/// Convert an SDL event into a [`RawEvent`]. Events the engine does not
/// consume map to None.
pub(crate) fn translate(event: &Event) -> Option<RawEvent> {
    match event {
        Event::Quit { .. } => Some(RawEvent::Quit),
        Event::KeyDown {
            keycode: Some(key),
            repeat,
            ..
        } => Some(RawEvent::KeyDown {
            key: *key,
            repeat: *repeat,
        }),
        Event::KeyUp {
            keycode: Some(key), ..
        } => Some(RawEvent::KeyUp { key: *key }),
        Event::MouseButtonDown { mouse_btn, .. } => {
            map_mouse_button(*mouse_btn).map(|button| RawEvent::MouseDown { button })
        }
        Event::MouseButtonUp { mouse_btn, .. } => {
            map_mouse_button(*mouse_btn).map(|button| RawEvent::MouseUp { button })
        }
        Event::MouseMotion {
            x, y, xrel, yrel, ..
        } => Some(RawEvent::MouseMove {
            x: *x,
            y: *y,
            dx: *xrel,
            dy: *yrel,
        }),
        Event::TextInput { text, .. } => text.chars().next().map(|ch| RawEvent::Text { ch }),
        _ => None,
    }
}

fn map_mouse_button(btn: MouseButton) -> Option<Button> {
    match btn {
        MouseButton::Left => Some(Button::Mouse1),
        MouseButton::Right => Some(Button::Mouse2),
        _ => None,
    }
}

/// Map a physical key to its Button. Left/right shift and ctrl, and both
/// return keys, collapse onto one variant each.
fn map_key(key: Keycode) -> Option<Button> {
    match key {
        Keycode::Up => Some(Button::Up),
        Keycode::Down => Some(Button::Down),
        Keycode::Left => Some(Button::Left),
        Keycode::Right => Some(Button::Right),
        Keycode::Q => Some(Button::Q),
        Keycode::E => Some(Button::E),
        Keycode::R => Some(Button::R),
        Keycode::Space => Some(Button::Space),
        Keycode::LShift | Keycode::RShift => Some(Button::Shift),
        Keycode::Return | Keycode::Return2 => Some(Button::Return),
        Keycode::LCtrl | Keycode::RCtrl => Some(Button::Ctrl),
        _ => None,
    }
}

/// Per-frame input dispatcher. Owns the held-button table.
pub struct InputState {
    held: [bool; Button::COUNT],
    window_width: u32,
    window_height: u32,
    scale: u32,
}

impl InputState {
    /// `width`/`height` are logical pixels; the window itself is
    /// `width * scale` by `height * scale`.
    pub fn new(width: u32, height: u32, scale: u32) -> Self {
        Self {
            held: [false; Button::COUNT],
            window_width: width * scale,
            window_height: height * scale,
            scale: scale.max(1),
        }
    }

    /// Whether `button` is currently held.
    pub fn is_held(&self, button: Button) -> bool {
        self.held[button as usize]
    }

    /// Consume one frame's event batch in arrival order, then scan the held
    /// table once, firing a held callback per pressed button.
    ///
    /// Repeat key-downs are dropped so a held key produces one press edge.
    /// A key-up for a button that was never pressed still fires the release
    /// callback; the held entry was already false and stays false. While
    /// relative mouse capture is on, a motion event landing exactly on the
    /// window center is the platform re-centering the pointer, not the user,
    /// and is discarded.
    pub fn dispatch(
        &mut self,
        events: &[RawEvent],
        elapsed: f32,
        relative_capture: bool,
        ctx: &mut Context,
        app: &mut dyn Application,
    ) {
        for event in events {
            match *event {
                RawEvent::Quit => ctx.quit(),
                RawEvent::KeyDown { key, repeat } => {
                    if repeat {
                        continue;
                    }
                    match key {
                        Keycode::Backspace => app.on_text_input(ctx, elapsed, '\u{8}'),
                        Keycode::Tab => app.on_text_input(ctx, elapsed, '\t'),
                        _ => {
                            if key == Keycode::Return || key == Keycode::Return2 {
                                app.on_text_input(ctx, elapsed, '\n');
                            }
                            if let Some(button) = map_key(key) {
                                app.on_key_press(ctx, elapsed, button);
                                self.held[button as usize] = true;
                            }
                        }
                    }
                }
                RawEvent::KeyUp { key } => {
                    if let Some(button) = map_key(key) {
                        app.on_key_release(ctx, elapsed, button);
                        self.held[button as usize] = false;
                    }
                }
                RawEvent::MouseDown { button } => {
                    app.on_key_press(ctx, elapsed, button);
                    self.held[button as usize] = true;
                }
                RawEvent::MouseUp { button } => {
                    app.on_key_release(ctx, elapsed, button);
                    self.held[button as usize] = false;
                }
                RawEvent::MouseMove { x, y, dx, dy } => {
                    if relative_capture
                        && x == self.window_width as i32 / 2
                        && y == self.window_height as i32 / 2
                    {
                        continue;
                    }
                    let scale = self.scale as i32;
                    app.on_mouse_move(ctx, elapsed, x / scale, y / scale, dx, dy);
                }
                RawEvent::Text { ch } => app.on_text_input(ctx, elapsed, ch),
            }
        }

        for button in Button::ALL {
            if self.held[button as usize] {
                app.on_key_held(ctx, elapsed, button);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerBank;

    #[derive(Default)]
    struct Recorder {
        presses: Vec<Button>,
        releases: Vec<Button>,
        helds: Vec<Button>,
        moves: Vec<(i32, i32, i32, i32)>,
        text: Vec<char>,
    }

    impl Application for Recorder {
        fn on_key_press(&mut self, _ctx: &mut Context, _elapsed: f32, button: Button) {
            self.presses.push(button);
        }
        fn on_key_held(&mut self, _ctx: &mut Context, _elapsed: f32, button: Button) {
            self.helds.push(button);
        }
        fn on_key_release(&mut self, _ctx: &mut Context, _elapsed: f32, button: Button) {
            self.releases.push(button);
        }
        fn on_mouse_move(
            &mut self,
            _ctx: &mut Context,
            _elapsed: f32,
            x: i32,
            y: i32,
            dx: i32,
            dy: i32,
        ) {
            self.moves.push((x, y, dx, dy));
        }
        fn on_text_input(&mut self, _ctx: &mut Context, _elapsed: f32, ch: char) {
            self.text.push(ch);
        }
    }

    fn run_events(
        input: &mut InputState,
        events: &[RawEvent],
        relative_capture: bool,
        app: &mut Recorder,
    ) -> bool {
        let mut timers = TimerBank::new();
        let mut quit = false;
        let mut ctx = Context::bare(&mut timers, &mut quit, 320, 240, 2);
        input.dispatch(events, 0.016, relative_capture, &mut ctx, app);
        quit
    }

    #[test]
    fn test_press_sets_held_and_fires_edge() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [RawEvent::KeyDown {
            key: Keycode::Space,
            repeat: false,
        }];
        run_events(&mut input, &events, false, &mut app);
        assert_eq!(app.presses, vec![Button::Space]);
        assert_eq!(app.helds, vec![Button::Space]);
        assert!(input.is_held(Button::Space));
    }

    #[test]
    fn test_repeat_key_down_is_suppressed() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [RawEvent::KeyDown {
            key: Keycode::Q,
            repeat: true,
        }];
        run_events(&mut input, &events, false, &mut app);
        assert!(app.presses.is_empty());
        assert!(!input.is_held(Button::Q));
    }

    #[test]
    fn test_release_without_press_still_fires() {
        // Preserved quirk: the release callback fires even though the key
        // was never pressed, and the held entry stays false.
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [RawEvent::KeyUp { key: Keycode::E }];
        run_events(&mut input, &events, false, &mut app);
        assert_eq!(app.releases, vec![Button::E]);
        assert!(!input.is_held(Button::E));
        assert!(app.helds.is_empty());
    }

    #[test]
    fn test_held_scan_runs_once_per_frame() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let press = [RawEvent::KeyDown {
            key: Keycode::Up,
            repeat: false,
        }];
        run_events(&mut input, &press, false, &mut app);
        // Two more frames with no events at all: one held callback each.
        run_events(&mut input, &[], false, &mut app);
        run_events(&mut input, &[], false, &mut app);
        assert_eq!(app.helds, vec![Button::Up, Button::Up, Button::Up]);
        assert_eq!(app.presses, vec![Button::Up]);
    }

    #[test]
    fn test_modifier_keys_fold_to_one_button() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [
            RawEvent::KeyDown {
                key: Keycode::LShift,
                repeat: false,
            },
            RawEvent::KeyUp {
                key: Keycode::RShift,
            },
            RawEvent::KeyDown {
                key: Keycode::RCtrl,
                repeat: false,
            },
        ];
        run_events(&mut input, &events, false, &mut app);
        assert_eq!(app.presses, vec![Button::Shift, Button::Ctrl]);
        assert_eq!(app.releases, vec![Button::Shift]);
        // RShift released the LShift press; only Ctrl is still held.
        assert_eq!(app.helds, vec![Button::Ctrl]);
    }

    #[test]
    fn test_mouse_move_scaled_and_center_discarded() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [
            // Exact window center (640x480 window): the warp echo.
            RawEvent::MouseMove {
                x: 320,
                y: 240,
                dx: 3,
                dy: -2,
            },
            RawEvent::MouseMove {
                x: 100,
                y: 60,
                dx: 1,
                dy: 1,
            },
        ];
        run_events(&mut input, &events, true, &mut app);
        // Only the off-center move survives, in logical coordinates.
        assert_eq!(app.moves, vec![(50, 30, 1, 1)]);
    }

    #[test]
    fn test_center_move_kept_without_capture() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [RawEvent::MouseMove {
            x: 320,
            y: 240,
            dx: 0,
            dy: 0,
        }];
        run_events(&mut input, &events, false, &mut app);
        assert_eq!(app.moves.len(), 1);
    }

    #[test]
    fn test_return_emits_newline_and_press() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [RawEvent::KeyDown {
            key: Keycode::Return,
            repeat: false,
        }];
        run_events(&mut input, &events, false, &mut app);
        assert_eq!(app.text, vec!['\n']);
        assert_eq!(app.presses, vec![Button::Return]);
    }

    #[test]
    fn test_backspace_and_tab_become_text() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [
            RawEvent::KeyDown {
                key: Keycode::Backspace,
                repeat: false,
            },
            RawEvent::KeyDown {
                key: Keycode::Tab,
                repeat: false,
            },
        ];
        run_events(&mut input, &events, false, &mut app);
        assert_eq!(app.text, vec!['\u{8}', '\t']);
        assert!(app.presses.is_empty());
    }

    #[test]
    fn test_mouse_buttons_act_like_keys() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        let events = [
            RawEvent::MouseDown {
                button: Button::Mouse1,
            },
            RawEvent::MouseUp {
                button: Button::Mouse1,
            },
            RawEvent::MouseDown {
                button: Button::Mouse2,
            },
        ];
        run_events(&mut input, &events, false, &mut app);
        assert_eq!(app.presses, vec![Button::Mouse1, Button::Mouse2]);
        assert_eq!(app.releases, vec![Button::Mouse1]);
        assert_eq!(app.helds, vec![Button::Mouse2]);
    }

    #[test]
    fn test_quit_event_requests_shutdown() {
        let mut input = InputState::new(320, 240, 2);
        let mut app = Recorder::default();
        assert!(run_events(&mut input, &[RawEvent::Quit], false, &mut app));
    }
}
