#![allow(clippy::module_name_repetitions)]
//! Color mode configuration and ANSI painting helpers.
//!
//! Logging helpers policy (stderr one-liners):
//! - Use log_progress_stderr for workflow steps, log_info_stderr for previews,
//!   log_warn_stderr for warnings/notes and log_error_stderr for fatal errors.
//! - Precompute once per scope and reuse:
//!     let use_err = gitwp::color_enabled_stderr();
//! - Passthrough output (`wp`, `docker logs`) is never painted.

use clap::ValueEnum;
use once_cell::sync::OnceCell;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

static COLOR_MODE: OnceCell<ColorMode> = OnceCell::new();

pub fn set_color_mode(mode: ColorMode) {
    let _ = COLOR_MODE.set(mode);
}

fn parse_color_mode(s: &str) -> Option<ColorMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(ColorMode::Auto),
        "always" | "on" | "true" | "yes" => Some(ColorMode::Always),
        "never" | "off" | "false" | "no" => Some(ColorMode::Never),
        _ => None,
    }
}

fn env_color_mode_pref() -> Option<ColorMode> {
    std::env::var("GITWP_COLOR")
        .ok()
        .and_then(|v| parse_color_mode(&v))
}

fn no_color_env() -> bool {
    // Per https://no-color.org/
    std::env::var("NO_COLOR").is_ok()
}

fn resolve(mode: ColorMode, is_tty: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_tty,
    }
}

fn color_enabled_for(is_tty: bool) -> bool {
    // 1) NO_COLOR disables color unconditionally
    if no_color_env() {
        return false;
    }
    // 2) --color flag
    if let Some(mode) = COLOR_MODE.get().copied() {
        return resolve(mode, is_tty);
    }
    // 3) GITWP_COLOR
    if let Some(env_mode) = env_color_mode_pref() {
        return resolve(env_mode, is_tty);
    }
    is_tty
}

pub fn color_enabled_stderr() -> bool {
    color_enabled_for(atty::is(atty::Stream::Stderr))
}

/// Wrap string with ANSI color code when enabled; otherwise return unchanged.
pub fn paint(enabled: bool, code: &str, s: &str) -> String {
    if enabled {
        format!("{code}{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

pub fn log_progress_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[32m", msg));
}

pub fn log_info_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[36;1m", msg));
}

pub fn log_warn_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[33m", msg));
}

pub fn log_error_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[31;1m", msg));
}

/// One-shot progress line for a workflow step (green when enabled).
pub fn progress(msg: &str) {
    log_progress_stderr(color_enabled_stderr(), msg);
}

/// Standardized warning line (`warning: ...`).
pub fn warn_print(msg: &str) {
    log_warn_stderr(color_enabled_stderr(), &format!("warning: {msg}"));
}
