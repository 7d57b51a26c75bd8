//! # Output Formatting
//!
//! Colored, emoji-prefixed messages for the terminal.

use owo_colors::{OwoColorize, Stream, Style};

/// When colored output is used
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Detect from the terminal
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  pub fn apply(self) {
    match self {
      ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
      ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
      // owo-colors detects the terminal on its own
      ColorMode::Auto => {}
    }
  }
}

/// Get an emoji by shortcode, or `default` when it is unknown
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Apply `style` when `stream` supports colors and no `--colors` override
/// disables them
fn paint(text: &str, stream: Stream, style: Style) -> String {
  text.if_supports_color(stream, |text| text.style(style)).to_string()
}

pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", paint(&check, Stream::Stdout, Style::new().green().bold()), message);
}

pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", paint(&cross, Stream::Stderr, Style::new().red().bold()), message);
}

pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", paint(&warning, Stream::Stdout, Style::new().yellow().bold()), message);
}

pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", paint(&info, Stream::Stdout, Style::new().blue().bold()), message);
}

/// Format a Jira issue key
pub fn format_issue_key(key: &str) -> String {
  paint(key, Stream::Stdout, Style::new().bright_cyan().bold())
}

/// Format a URL
pub fn format_url(url: &str) -> String {
  paint(url, Stream::Stdout, Style::new().bright_green())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unknown_emoji_falls_back() {
    assert_eq!(get_emoji_or_default("no_such_shortcode", "*"), "*");
  }

  #[test]
  fn test_formatting_follows_color_override() {
    ColorMode::Never.apply();
    assert_eq!(format_issue_key("DEMO-42"), "DEMO-42");
    assert_eq!(format_url("https://jira.example.com"), "https://jira.example.com");

    ColorMode::Always.apply();
    let key = format_issue_key("DEMO-42");
    assert!(key.contains('\u{1b}'));
    assert!(key.contains("DEMO-42"));

    owo_colors::unset_override();
  }
}
