//! Inline markup transformation
//!
//! VM output strings embed a small tag mini-language (`<color=red>`,
//! `<b>`, `</b>`, ...). This module converts it to plain terminal text:
//! recognized style tags become their SGR equivalents, unrecognized tags
//! are stripped or passed through depending on the hide flag. Pure and
//! never fails; text without tags passes through untouched.

/// Transform `input`, replacing recognized tags with ANSI SGR sequences.
///
/// When `hide_unsupported` is set, tags outside the recognized set are
/// stripped entirely; otherwise they pass through as literal text. An
/// unterminated `<...` run is literal text either way.
pub fn transform(input: &str, hide_unsupported: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('>') {
            Some(close) => {
                let body = &after[..close];
                match render_tag(body) {
                    Some(sgr) => out.push_str(&sgr),
                    None if hide_unsupported => {}
                    None => {
                        out.push('<');
                        out.push_str(body);
                        out.push('>');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // No closing bracket: the rest is literal text.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// SGR rendition for one tag body, or None if the tag is unrecognized.
fn render_tag(body: &str) -> Option<String> {
    let (closing, body) = match body.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let name = name.trim().to_ascii_lowercase();

    let sgr = match (name.as_str(), closing) {
        ("b", false) => "\x1b[1m".to_string(),
        ("b", true) => "\x1b[22m".to_string(),
        ("i", false) => "\x1b[3m".to_string(),
        ("i", true) => "\x1b[23m".to_string(),
        ("u", false) => "\x1b[4m".to_string(),
        ("u", true) => "\x1b[24m".to_string(),
        ("s", false) => "\x1b[9m".to_string(),
        ("s", true) => "\x1b[29m".to_string(),
        ("color", false) => color_sgr(value?.trim(), false)?,
        ("color", true) => "\x1b[39m".to_string(),
        ("mark", false) => color_sgr(value?.trim(), true)?,
        ("mark", true) => "\x1b[49m".to_string(),
        _ => return None,
    };
    Some(sgr)
}

/// Foreground or background SGR for a named or `#rrggbb` color.
fn color_sgr(value: &str, background: bool) -> Option<String> {
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let plane = if background { 48 } else { 38 };
        return Some(format!("\x1b[{};2;{};{};{}m", plane, r, g, b));
    }

    let base = match value.to_ascii_lowercase().as_str() {
        "black" => 30,
        "red" => 31,
        "green" => 32,
        "yellow" => 33,
        "blue" => 34,
        "magenta" | "purple" => 35,
        "cyan" => 36,
        "white" => 37,
        "gray" | "grey" => 90,
        _ => return None,
    };
    let code = if background { base + 10 } else { base };
    Some(format!("\x1b[{}m", code))
}
