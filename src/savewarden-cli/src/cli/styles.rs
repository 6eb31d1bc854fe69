//! CLI styling for the help output.

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Help theme: cyan headers, green literals, yellow placeholders.
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Cyan.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

/// After-help section with usage examples and environment variables.
pub const AFTER_HELP: &str = color_print::cstr!(
    r#"<cyan,bold>QUICK START</>
    <green,bold>savewarden</>                        Watch the configured save directory
    <green,bold>savewarden --saves</> <dim>~/TUNIC/SAVES</>   First run: remember the save directory
    <green,bold>savewarden once --dry-run</>         Show what a single pass would delete
    <green,bold>savewarden status</>                 List slots and generations on disk

<cyan,bold>ENVIRONMENT VARIABLES</>
    <yellow>SAVEWARDEN_CONFIG_DIR</>   Override config directory
    <yellow>SAVEWARDEN_LOG_LEVEL</>    Log verbosity (error, warn, info, debug, trace)
    <yellow>RUST_LOG</>                Full tracing filter, takes precedence over the above
    <yellow>NO_COLOR</>                Disable colored output (set to '1' or 'true')

<cyan,bold>SAVE FILES</>
    <dim>slot.tunic</>                 generation 0
    <dim>slot~000000000007.tunic</>    generation 7
    Each slot keeps the generation it was first protected at."#
);
