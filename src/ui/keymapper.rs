//! Key mapping for captured terminal input
//!
//! Converts the raw key string a terminal emits for one keypress (VT
//! escape sequences, control bytes, plain characters) into a structured
//! [`KeyEvent`]. Unknown sequences degrade to [`KeyCode::Unidentified`]
//! rather than failing, so callers can decide whether to ignore them.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

/// Logical key identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
    /// Raw string not recognized as any key.
    Unidentified,
}

/// One structured keypress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    fn unidentified() -> Self {
        Self::plain(KeyCode::Unidentified)
    }
}

/// Map a raw captured key string to a [`KeyEvent`].
///
/// Recognizes CSI and SS3 sequences with xterm modifier codes, tilde
/// sequences, control bytes, Alt chords (ESC-prefixed), and plain
/// characters. Deterministic: the same raw string always maps to the
/// same event.
pub fn map_raw_key(raw: &str) -> KeyEvent {
    match raw {
        "" => return KeyEvent::unidentified(),
        "\r" | "\n" => return KeyEvent::plain(KeyCode::Enter),
        "\t" => return KeyEvent::plain(KeyCode::Tab),
        "\x1b[Z" => return KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT),
        "\x7f" => return KeyEvent::plain(KeyCode::Backspace),
        "\x1b\x7f" => return KeyEvent::new(KeyCode::Backspace, Modifiers::ALT),
        "\x1b" => return KeyEvent::plain(KeyCode::Escape),
        _ => {}
    }

    if let Some(rest) = raw.strip_prefix("\x1b[") {
        return map_csi(rest);
    }
    if let Some(rest) = raw.strip_prefix("\x1bO") {
        return map_ss3(rest);
    }

    let mut chars = raw.chars();
    let first = match chars.next() {
        Some(ch) => ch,
        None => return KeyEvent::unidentified(),
    };

    // Alt chord: ESC followed by exactly one key.
    if first == '\x1b' {
        let chord = chars.as_str();
        let mut inner = map_raw_key(chord);
        if inner.code != KeyCode::Unidentified && chord.chars().count() == 1 {
            inner.modifiers |= Modifiers::ALT;
            return inner;
        }
        return KeyEvent::unidentified();
    }

    if chars.next().is_some() {
        return KeyEvent::unidentified();
    }

    // Control byte: Ctrl+letter lands in 0x01..=0x1A.
    if let ch @ '\x01'..='\x1a' = first {
        let letter = (b'a' + (ch as u8) - 1) as char;
        return KeyEvent::new(KeyCode::Char(letter), Modifiers::CTRL);
    }

    if first.is_control() {
        return KeyEvent::unidentified();
    }

    KeyEvent::plain(KeyCode::Char(first))
}

/// CSI sequence body: params then a final byte, e.g. `1;5A` or `3~`.
fn map_csi(body: &str) -> KeyEvent {
    let Some(final_byte) = body.chars().last() else {
        return KeyEvent::unidentified();
    };
    let params = &body[..body.len() - final_byte.len_utf8()];

    match final_byte {
        'A' | 'B' | 'C' | 'D' | 'H' | 'F' => {
            let code = match final_byte {
                'A' => KeyCode::Up,
                'B' => KeyCode::Down,
                'C' => KeyCode::Right,
                'D' => KeyCode::Left,
                'H' => KeyCode::Home,
                _ => KeyCode::End,
            };
            // Either no params, or "1;<mod>".
            match split_params(params) {
                (None, None) => KeyEvent::plain(code),
                (Some(1), Some(mod_code)) => KeyEvent::new(code, decode_modifiers(mod_code)),
                _ => KeyEvent::unidentified(),
            }
        }
        '~' => {
            let (Some(number), mod_code) = split_params(params) else {
                return KeyEvent::unidentified();
            };
            let code = match number {
                2 => KeyCode::Insert,
                3 => KeyCode::Delete,
                5 => KeyCode::PageUp,
                6 => KeyCode::PageDown,
                15 => KeyCode::F(5),
                17 => KeyCode::F(6),
                18 => KeyCode::F(7),
                19 => KeyCode::F(8),
                20 => KeyCode::F(9),
                21 => KeyCode::F(10),
                23 => KeyCode::F(11),
                24 => KeyCode::F(12),
                _ => return KeyEvent::unidentified(),
            };
            let modifiers = mod_code.map(decode_modifiers).unwrap_or_default();
            KeyEvent::new(code, modifiers)
        }
        _ => KeyEvent::unidentified(),
    }
}

/// SS3 sequence body: arrows in application mode and F1-F4.
fn map_ss3(body: &str) -> KeyEvent {
    let code = match body {
        "A" => KeyCode::Up,
        "B" => KeyCode::Down,
        "C" => KeyCode::Right,
        "D" => KeyCode::Left,
        "H" => KeyCode::Home,
        "F" => KeyCode::End,
        "P" => KeyCode::F(1),
        "Q" => KeyCode::F(2),
        "R" => KeyCode::F(3),
        "S" => KeyCode::F(4),
        _ => return KeyEvent::unidentified(),
    };
    KeyEvent::plain(code)
}

/// Split `params` into at most two `;`-separated numbers.
fn split_params(params: &str) -> (Option<u8>, Option<u8>) {
    if params.is_empty() {
        return (None, None);
    }
    let mut parts = params.splitn(2, ';');
    let first = parts.next().and_then(|p| p.parse().ok());
    let second = parts.next().and_then(|p| p.parse().ok());
    (first, second)
}

/// Decode an xterm modifier code: 1 + shift(1) + alt(2) + ctrl(4).
fn decode_modifiers(code: u8) -> Modifiers {
    let bits = code.saturating_sub(1);
    let mut mods = Modifiers::empty();
    if bits & 1 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= Modifiers::CTRL;
    }
    mods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_characters() {
        assert_eq!(map_raw_key("a"), KeyEvent::plain(KeyCode::Char('a')));
        assert_eq!(map_raw_key("Z"), KeyEvent::plain(KeyCode::Char('Z')));
        assert_eq!(map_raw_key("7"), KeyEvent::plain(KeyCode::Char('7')));
    }

    #[test]
    fn control_bytes() {
        // Ctrl+C
        assert_eq!(
            map_raw_key("\x03"),
            KeyEvent::new(KeyCode::Char('c'), Modifiers::CTRL)
        );
        // Ctrl+A
        assert_eq!(
            map_raw_key("\x01"),
            KeyEvent::new(KeyCode::Char('a'), Modifiers::CTRL)
        );
    }

    #[test]
    fn alt_chords() {
        assert_eq!(
            map_raw_key("\x1bx"),
            KeyEvent::new(KeyCode::Char('x'), Modifiers::ALT)
        );
        // ESC alone stays Escape.
        assert_eq!(map_raw_key("\x1b"), KeyEvent::plain(KeyCode::Escape));
    }

    #[test]
    fn arrow_keys() {
        assert_eq!(map_raw_key("\x1b[A"), KeyEvent::plain(KeyCode::Up));
        assert_eq!(map_raw_key("\x1b[D"), KeyEvent::plain(KeyCode::Left));
        // Application cursor mode.
        assert_eq!(map_raw_key("\x1bOB"), KeyEvent::plain(KeyCode::Down));
        // Ctrl+Up
        assert_eq!(
            map_raw_key("\x1b[1;5A"),
            KeyEvent::new(KeyCode::Up, Modifiers::CTRL)
        );
        // Ctrl+Shift+Right
        assert_eq!(
            map_raw_key("\x1b[1;6C"),
            KeyEvent::new(KeyCode::Right, Modifiers::CTRL | Modifiers::SHIFT)
        );
    }

    #[test]
    fn navigation_and_tilde_keys() {
        assert_eq!(map_raw_key("\x1b[H"), KeyEvent::plain(KeyCode::Home));
        assert_eq!(map_raw_key("\x1b[5~"), KeyEvent::plain(KeyCode::PageUp));
        assert_eq!(map_raw_key("\x1b[3~"), KeyEvent::plain(KeyCode::Delete));
        // Shift+Delete
        assert_eq!(
            map_raw_key("\x1b[3;2~"),
            KeyEvent::new(KeyCode::Delete, Modifiers::SHIFT)
        );
    }

    #[test]
    fn function_keys() {
        assert_eq!(map_raw_key("\x1bOP"), KeyEvent::plain(KeyCode::F(1)));
        assert_eq!(map_raw_key("\x1b[15~"), KeyEvent::plain(KeyCode::F(5)));
        assert_eq!(map_raw_key("\x1b[24~"), KeyEvent::plain(KeyCode::F(12)));
    }

    #[test]
    fn enter_tab_backspace() {
        assert_eq!(map_raw_key("\r"), KeyEvent::plain(KeyCode::Enter));
        assert_eq!(map_raw_key("\t"), KeyEvent::plain(KeyCode::Tab));
        assert_eq!(
            map_raw_key("\x1b[Z"),
            KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT)
        );
        assert_eq!(map_raw_key("\x7f"), KeyEvent::plain(KeyCode::Backspace));
    }

    #[test]
    fn unknown_input_degrades_without_failing() {
        assert_eq!(map_raw_key(""), KeyEvent::unidentified());
        assert_eq!(map_raw_key("\x1b[999q"), KeyEvent::unidentified());
        assert_eq!(map_raw_key("ab"), KeyEvent::unidentified());
        assert_eq!(map_raw_key("\x1bOX"), KeyEvent::unidentified());
    }

    #[test]
    fn mapping_is_deterministic() {
        for raw in ["a", "\x1b[1;5A", "\x1b[3~", "\x03", "mystery"] {
            assert_eq!(map_raw_key(raw), map_raw_key(raw));
        }
    }
}
