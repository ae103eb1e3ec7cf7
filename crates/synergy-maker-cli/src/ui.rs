//! Terminal output for the synergy-maker CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use synergy_maker::merge::DiagnosticLevel;
use synergy_maker::{BuildReport, EntityReport, FormReport};

pub mod colors {
    use console::Color;

    pub const TEAL: Color = Color::Color256(37);
    pub const AMBER: Color = Color::Color256(214);
    pub const RED: Color = Color::Color256(160);
    pub const GREEN: Color = Color::Color256(70);
    pub const DIM: Color = Color::Color256(244);
}

pub mod symbols {
    pub const BULLET: &str = "\u{25CF}"; // ●
    pub const RING: &str = "\u{25CB}"; // ○
    pub const CHECK: &str = "\u{2714}"; // ✔
    pub const CROSS: &str = "\u{2716}"; // ✖
    pub const WARN: &str = "\u{25B2}"; // ▲
    pub const ARROW: &str = "\u{2192}"; // →
    pub const DOT: &str = "\u{00B7}"; // ·
}

pub fn header(version: &str) {
    println!(
        "  {} {} {}",
        style(symbols::BULLET).fg(colors::TEAL),
        style("synergy-maker").fg(colors::TEAL).bold(),
        style(version).dim()
    );
    println!();
}

pub fn success(msg: &str) {
    println!("  {} {}", style(symbols::CHECK).fg(colors::GREEN), msg);
}

pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::CROSS).fg(colors::RED),
        style(msg).fg(colors::RED)
    );
}

pub fn warning(msg: &str) {
    println!(
        "    {} {}",
        style(symbols::WARN).fg(colors::AMBER),
        style(msg).fg(colors::AMBER)
    );
}

pub fn info(msg: &str) {
    println!("  {} {}", style(symbols::RING).fg(colors::TEAL), msg);
}

pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("\u{25CB}\u{25D4}\u{25D1}\u{25D5}\u{25CF}")
        .template("  {spinner:.cyan} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(bar_style) = ProgressStyle::default_bar().template("  {bar:32.cyan/dim} {pos}/{len} {msg}") {
        pb.set_style(bar_style.progress_chars("\u{2501}\u{2501}\u{2500}"));
    }
    pb
}

/// One line per generated file, followed by its warnings.
pub fn build_report(report: &BuildReport) {
    if let Some(entity) = &report.entity {
        entity_line(entity);
    }
    if let Some(form) = &report.form {
        form_line(form);
    }
}

fn entity_line(report: &EntityReport) {
    let status = if report.scaffolded {
        style("created".to_string()).fg(colors::GREEN)
    } else if report.added.is_empty() && !report.changed {
        style("unchanged".to_string()).fg(colors::DIM)
    } else {
        style(format!("+{} members", report.added.len())).fg(colors::TEAL)
    };
    success(&format!(
        "{} {} {} {}",
        style(&report.short_name).bold(),
        style(symbols::ARROW).fg(colors::DIM),
        report.path.display(),
        status
    ));
    for added in &report.added {
        dim(&format!("    {} {}", symbols::DOT, added));
    }
    for diagnostic in &report.diagnostics {
        if diagnostic.level >= DiagnosticLevel::Warning {
            let subject = diagnostic.field.as_deref().unwrap_or(&report.short_name);
            warning(&format!("{}: {}", subject, diagnostic.message));
        }
    }
}

fn form_line(report: &FormReport) {
    success(&format!(
        "form {} {}",
        style(symbols::ARROW).fg(colors::DIM),
        report.path.display()
    ));
    if report.redirected {
        warning("existing form kept, use --overwrite-crud to replace it");
    }
}

pub fn summary(built: usize, failed: usize) {
    println!();
    if failed == 0 {
        success(&format!("{} entities generated", built));
    } else {
        error(&format!("{} entities generated, {} failed", built, failed));
    }
}
