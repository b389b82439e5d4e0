use colored::*;
use tracing::info;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

/// Events on this target are printed verbatim, without a level symbol.
pub const PRINT_TARGET: &str = "sniscan::print";

#[macro_export]
macro_rules! sprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

pub fn banner() {
    let text: String = format!("⟦ SNISCAN v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width: usize = unicode_width::UnicodeWidthStr::width(text.as_str());
    let side: usize = TOTAL_WIDTH.saturating_sub(text_width) / 2;
    let sep: ColoredString = "═".repeat(side).bright_black();

    print(&format!("{}{}{}", sep, text.bright_green().bold(), sep));
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

/// `key....: value` with the dots padding keys to `key_width`.
pub fn aligned_line(key: &str, value: &str, key_width: usize) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.len()));
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    print(&format!(
        "{} {}{}{} {}",
        prefix,
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value.color(colors::TEXT_DEFAULT)
    ));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}
