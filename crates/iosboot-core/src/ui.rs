//! Severity-tagged console output

use colored::Colorize;

pub fn step(message: impl AsRef<str>) {
    println!("{} {}", "->".blue(), message.as_ref());
}

pub fn info(message: impl AsRef<str>) {
    println!("{} {}", "Info:".cyan(), message.as_ref());
}

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "Success:".green().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    eprintln!("{} {}", "Warning:".yellow(), message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    eprintln!("{} {}", "Error:".red().bold(), message.as_ref());
}

/// Indented follow-up lines after an error
pub fn remediation<S: AsRef<str>>(lines: &[S]) {
    for line in lines {
        eprintln!("    {}", line.as_ref().dimmed());
    }
}

/// Print the first `max_lines` non-empty lines of a tool's output
pub fn excerpt(output: &str, max_lines: usize) {
    for line in first_lines(output, max_lines) {
        println!("    {}", line.dimmed());
    }
}

fn first_lines(output: &str, max_lines: usize) -> Vec<&str> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(max_lines)
        .collect()
}
