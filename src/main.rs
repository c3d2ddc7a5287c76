//! termbridge demo binary
//!
//! Drives the output bridge against the real console: a short scripted
//! "VM run" that prints styled output, asks for a line and a password,
//! animates two progress bars (one running to its timeout, one finished
//! early by the exit signal), and waits for a single key press.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use termbridge::{
    Config, ConsoleSurface, OutputBridge, OutputHandler, PendingKind, PrintOptions,
    SessionRegistry, TerminalSession, VmHandle,
};

fn main() -> Result<()> {
    init_logging();
    info!("termbridge starting...");

    let config = Config::load();

    // Single cooperative event loop; all suspension is via awaiting.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    terminal::enable_raw_mode()?;
    let outcome = runtime.block_on(run_demo(config));
    terminal::disable_raw_mode()?;
    outcome
}

/// Log to `~/.termbridge/termbridge.log` so log lines never interleave
/// with the rendered surface.
fn init_logging() {
    let log_path = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
        .map(|h| h.join(".termbridge").join("termbridge.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("termbridge.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

async fn run_demo(config: Config) -> Result<()> {
    let registry = SessionRegistry::new();
    let surface = Arc::new(ConsoleSurface::new());
    let bridge = OutputBridge::new(
        surface,
        registry,
        config.hide_unsupported_tags,
        config.strict_dispose,
    )
    .with_progress_tick(Duration::from_millis(config.progress_tick_ms));
    let vm = VmHandle::new();

    bridge.print(
        &vm,
        "<b>termbridge</b> demo\\n<color=cyan>styled VM output</color>",
        PrintOptions::default(),
    );

    let session = bridge.session().clone();
    let (name, _) = tokio::join!(
        bridge.wait_for_input(&vm, false, "your name: "),
        serve_one_request(session.clone()),
    );
    let name = name?;

    let (secret, _) = tokio::join!(
        bridge.wait_for_input(&vm, true, "a secret: "),
        serve_one_request(session.clone()),
    );
    let secret = secret?;

    bridge.print(
        &vm,
        &format!(
            "hello <color=green>{}</color>, your secret stays {} chars long",
            name,
            secret.chars().count()
        ),
        PrintOptions::default(),
    );

    // First bar runs to its timeout.
    bridge.print(&vm, "bounded wait:", PrintOptions::default());
    bridge.progress(&vm, 2_000).await;

    // Second bar is finished early by the exit signal.
    bridge.print(&vm, "early completion:", PrintOptions::default());
    let finisher = {
        let vm = vm.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            vm.signal_exit();
        })
    };
    bridge.progress(&vm, 60_000).await;
    finisher.await?;

    let (key, _) = tokio::join!(
        bridge.wait_for_key_press(&vm, "press any key to exit "),
        serve_one_request(session.clone()),
    );
    let key = key?;
    bridge.print(
        &vm,
        &format!("captured {:?} (modifiers {:?})", key.code, key.modifiers),
        PrintOptions::default(),
    );

    info!("termbridge demo finished");
    Ok(())
}

/// Host input pump: wait for the session to expose a pending request,
/// then satisfy exactly one from the real keyboard.
async fn serve_one_request(session: Arc<TerminalSession>) -> Result<()> {
    let kind = loop {
        match session.pending_kind() {
            PendingKind::None => tokio::time::sleep(Duration::from_millis(10)).await,
            kind => break kind,
        }
    };

    tokio::task::spawn_blocking(move || serve_blocking(&session, kind)).await??;
    Ok(())
}

/// Blocking keyboard loop for one request. Line requests accumulate
/// until Enter (the session echoes the finished line itself); key
/// requests capture the first press, re-encoded as the raw VT string the
/// bridge-side mapper understands.
fn serve_blocking(session: &TerminalSession, kind: PendingKind) -> Result<()> {
    let mut line = String::new();
    loop {
        let Event::Key(event) = crossterm::event::read()? else {
            continue;
        };
        if event.kind != KeyEventKind::Press {
            continue;
        }

        match kind {
            PendingKind::Key => {
                session.submit_key(&encode_key_event(&event));
                return Ok(());
            }
            PendingKind::Line { .. } => match event.code {
                KeyCode::Enter => {
                    session.submit_line(&line);
                    return Ok(());
                }
                KeyCode::Backspace => {
                    line.pop();
                }
                KeyCode::Char(ch) => line.push(ch),
                _ => {}
            },
            PendingKind::None => return Ok(()),
        }
    }
}

/// Encode a crossterm key event as the VT string a terminal would emit
/// for it. Covers the keys the demo cares about; anything else encodes
/// as an empty (unidentified) capture.
fn encode_key_event(event: &crossterm::event::KeyEvent) -> String {
    let mods = event.modifiers;
    match event.code {
        KeyCode::Char(ch) if mods.contains(KeyModifiers::CONTROL) && ch.is_ascii_lowercase() => {
            ((ch as u8 - b'a' + 1) as char).to_string()
        }
        KeyCode::Char(ch) if mods.contains(KeyModifiers::ALT) => format!("\x1b{ch}"),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "\r".to_string(),
        KeyCode::Tab => "\t".to_string(),
        KeyCode::Backspace => "\x7f".to_string(),
        KeyCode::Esc => "\x1b".to_string(),
        KeyCode::Up => arrow(b'A', mods),
        KeyCode::Down => arrow(b'B', mods),
        KeyCode::Right => arrow(b'C', mods),
        KeyCode::Left => arrow(b'D', mods),
        KeyCode::Home => arrow(b'H', mods),
        KeyCode::End => arrow(b'F', mods),
        KeyCode::PageUp => tilde(5, mods),
        KeyCode::PageDown => tilde(6, mods),
        KeyCode::Insert => tilde(2, mods),
        KeyCode::Delete => tilde(3, mods),
        _ => String::new(),
    }
}

fn modifier_code(mods: KeyModifiers) -> u8 {
    1 + if mods.contains(KeyModifiers::SHIFT) { 1 } else { 0 }
        + if mods.contains(KeyModifiers::ALT) { 2 } else { 0 }
        + if mods.contains(KeyModifiers::CONTROL) { 4 } else { 0 }
}

fn arrow(key: u8, mods: KeyModifiers) -> String {
    if mods.is_empty() {
        format!("\x1b[{}", key as char)
    } else {
        format!("\x1b[1;{}{}", modifier_code(mods), key as char)
    }
}

fn tilde(code: u8, mods: KeyModifiers) -> String {
    if mods.is_empty() {
        format!("\x1b[{code}~")
    } else {
        format!("\x1b[{};{}~", code, modifier_code(mods))
    }
}
