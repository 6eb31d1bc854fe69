//! Styled CLI output.
//!
//! One line per message, prefixed with a tag such as `[OK]`. Colors adapt to
//! the terminal background and are dropped when `NO_COLOR` is set or the
//! stream is not a terminal. `CLICOLOR_FORCE` keeps them on regardless.

use std::io::{IsTerminal, Write};

/// Check if colors should be disabled based on NO_COLOR env var.
fn colors_disabled() -> bool {
    env_flag("NO_COLOR")
}

/// Check if colors were forced on with `--color always`.
fn colors_forced() -> bool {
    env_flag("CLICOLOR_FORCE")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

fn use_colors(to_stderr: bool) -> bool {
    if colors_disabled() {
        return false;
    }
    if colors_forced() {
        return true;
    }
    if to_stderr {
        std::io::stderr().is_terminal()
    } else {
        std::io::stdout().is_terminal()
    }
}

/// Colors for light terminal backgrounds.
mod light_theme {
    pub const SUCCESS: &str = "\x1b[38;2;0;150;125m";
    pub const ERROR: &str = "\x1b[38;2;217;61;61m";
    pub const WARNING: &str = "\x1b[38;2;201;154;46m";
    pub const INFO: &str = "\x1b[38;2;0;100;160m";
    pub const DIM: &str = "\x1b[38;2;100;100;100m";
}

/// Colors for dark terminal backgrounds.
mod dark_theme {
    pub const SUCCESS: &str = "\x1b[38;2;0;245;212m";
    pub const ERROR: &str = "\x1b[38;2;255;107;107m";
    pub const WARNING: &str = "\x1b[38;2;255;200;87m";
    pub const INFO: &str = "\x1b[38;2;72;202;228m";
    pub const DIM: &str = "\x1b[38;2;130;154;177m";
}

const RESET: &str = "\x1b[0m";

/// Detect a light terminal background from `COLORFGBG` ("fg;bg").
///
/// Defaults to dark when detection fails.
fn is_light_theme() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .is_some_and(|bg| bg >= 7)
}

/// Message type for styled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// A file was deleted or a setting saved
    Success,
    /// Something failed
    Error,
    /// A file was skipped
    Warning,
    /// Protection events and progress
    Info,
    /// Secondary information
    Dim,
}

impl MessageType {
    fn icon(&self) -> &'static str {
        match self {
            MessageType::Success => "[OK]",
            MessageType::Error => "[ERROR]",
            MessageType::Warning => "[WARN]",
            MessageType::Info => "[INFO]",
            MessageType::Dim => "-",
        }
    }

    fn color(&self) -> &'static str {
        let light = is_light_theme();
        match (self, light) {
            (MessageType::Success, true) => light_theme::SUCCESS,
            (MessageType::Success, false) => dark_theme::SUCCESS,
            (MessageType::Error, true) => light_theme::ERROR,
            (MessageType::Error, false) => dark_theme::ERROR,
            (MessageType::Warning, true) => light_theme::WARNING,
            (MessageType::Warning, false) => dark_theme::WARNING,
            (MessageType::Info, true) => light_theme::INFO,
            (MessageType::Info, false) => dark_theme::INFO,
            (MessageType::Dim, true) => light_theme::DIM,
            (MessageType::Dim, false) => dark_theme::DIM,
        }
    }
}

/// Render `message` with its tag, colored or not.
pub fn format_styled(msg_type: MessageType, message: &str, colored: bool) -> String {
    if colored {
        format!("{}{} {}{}", msg_type.color(), msg_type.icon(), message, RESET)
    } else {
        format!("{} {}", msg_type.icon(), message)
    }
}

fn print_styled(msg_type: MessageType, message: &str, to_stderr: bool) {
    let line = format_styled(msg_type, message, use_colors(to_stderr));
    // A closed pipe is not worth a panic.
    if to_stderr {
        let _ = writeln!(std::io::stderr(), "{line}");
    } else {
        let _ = writeln!(std::io::stdout(), "{line}");
    }
}

// ============================================================
// STDERR - status messages about the command itself
// ============================================================

pub fn print_success(message: &str) {
    print_styled(MessageType::Success, message, true);
}

pub fn print_error(message: &str) {
    print_styled(MessageType::Error, message, true);
}

pub fn print_warning(message: &str) {
    print_styled(MessageType::Warning, message, true);
}

pub fn print_info(message: &str) {
    print_styled(MessageType::Info, message, true);
}

// ============================================================
// STDOUT - the events a command produces
// ============================================================

/// Print a message to stdout.
pub fn println_styled(msg_type: MessageType, message: &str) {
    print_styled(msg_type, message, false);
}

/// Color a bare label for inline use on stdout.
pub fn styled_label(msg_type: MessageType, label: &str) -> String {
    if use_colors(false) {
        format!("{}{}{}", msg_type.color(), label, RESET)
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_message_type_icons() {
        assert_eq!(MessageType::Success.icon(), "[OK]");
        assert_eq!(MessageType::Error.icon(), "[ERROR]");
        assert_eq!(MessageType::Warning.icon(), "[WARN]");
        assert_eq!(MessageType::Info.icon(), "[INFO]");
        assert_eq!(MessageType::Dim.icon(), "-");
    }

    #[test]
    fn test_format_styled_plain() {
        assert_eq!(
            format_styled(MessageType::Success, "Deleted hero.tunic", false),
            "[OK] Deleted hero.tunic"
        );
    }

    #[test]
    fn test_format_styled_colored_resets() {
        let line = format_styled(MessageType::Error, "boom", true);
        assert!(line.starts_with("\x1b["));
        assert!(line.ends_with(RESET));
        assert!(line.contains("[ERROR] boom"));
    }

    #[test]
    #[serial]
    fn test_no_color_wins_over_force() {
        // SAFETY: These tests run serially and we restore env vars immediately
        unsafe { std::env::set_var("NO_COLOR", "1") };
        unsafe { std::env::set_var("CLICOLOR_FORCE", "1") };
        assert!(!use_colors(false));
        unsafe { std::env::remove_var("NO_COLOR") };
        assert!(use_colors(false));
        unsafe { std::env::remove_var("CLICOLOR_FORCE") };
    }

    #[test]
    #[serial]
    fn test_env_flag_values() {
        for (value, expected) in [("1", true), ("true", true), ("0", false), ("false", false), ("", false)] {
            // SAFETY: These tests run serially and we restore env vars immediately
            unsafe { std::env::set_var("NO_COLOR", value) };
            assert_eq!(colors_disabled(), expected, "NO_COLOR={value:?}");
        }
        unsafe { std::env::remove_var("NO_COLOR") };
    }

    #[test]
    #[serial]
    fn test_light_theme_detection() {
        // SAFETY: These tests run serially and we restore env vars immediately
        unsafe { std::env::set_var("COLORFGBG", "0;15") };
        assert!(is_light_theme());
        unsafe { std::env::set_var("COLORFGBG", "15;0") };
        assert!(!is_light_theme());
        unsafe { std::env::remove_var("COLORFGBG") };
        assert!(!is_light_theme());
    }
}
