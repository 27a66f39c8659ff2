//! Terminal output. Everything goes through [`print`], which logs on
//! [`PRINT_TARGET`] so lines share the progress bar's writer.

use std::fmt::Display;

use colored::*;
use subprobe_common::network::Outcome;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, format};

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "subprobe::print";

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

const BANNER: &str = r#"
             _                     _
   ___ _   _| |__  _ __  _ __ ___ | |__   ___
  / __| | | | '_ \| '_ \| '__/ _ \| '_ \ / _ \
  \__ \ |_| | |_) | |_) | | | (_) | |_) |  __/
  |___/\__,_|_.__/| .__/|_|  \___/|_.__/ \___|
                  |_|
"#;

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }

    print(&format!("{}", BANNER.bright_cyan().bold()));
    let tagline = format!("subdomains in, live hosts out · v{}", env!("CARGO_PKG_VERSION"));
    centerln(&tagline.color(colors::SEPARATOR).to_string());
    mprint!();
}

/// `──⟦ MSG ⟧──` centered in [`TOTAL_WIDTH`].
pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let title = format!("⟦ {} ⟧", msg.to_uppercase());
    let dashes = TOTAL_WIDTH.saturating_sub(title.width());
    let left = dashes / 2;

    print(&format!(
        "{}{}{}",
        "─".repeat(left).color(colors::SEPARATOR),
        title.bright_green(),
        "─".repeat(dashes - left).color(colors::SEPARATOR)
    ));
}

/// `key....: value`, with the dots padding `key` to `key_width` columns.
pub fn aligned_line(key: &str, value: impl Display, key_width: usize) {
    let dots = ".".repeat((key_width + 1).saturating_sub(key.width()));
    print(&format!(
        "{} {}{}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value
    ));
}

/// One ranked result row: host, then its coloured status.
pub fn outcome_line(outcome: &Outcome, key_width: usize) {
    aligned_line(
        outcome.host().as_str(),
        format::classification_to_colored(outcome.classification()),
        key_width,
    );
}

/// Width of the widest host, for lining up [`outcome_line`] rows.
pub fn host_column_width(outcomes: &[Outcome]) -> usize {
    outcomes
        .iter()
        .map(|outcome| outcome.host().as_str().width())
        .max()
        .unwrap_or(0)
}

pub fn summary(msg: &str) {
    print(&format!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)));
    centerln(msg);
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}"));
}

pub fn no_hosts() {
    centerln(&"nothing to probe: the host list is empty".red().bold().to_string());
}

pub fn end_of_program(q_level: u8) {
    if q_level > 0 {
        return;
    }
    print(&format!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)));
}
