//! Progress lines on stdout, colored when stdout is a terminal.

use std::path::Path;

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub color: bool,
    pub quiet: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self { color: std::io::stdout().is_terminal(), quiet: false }
    }
}

impl Progress {
    pub fn quiet() -> Self {
        Self { color: false, quiet: true }
    }

    fn line(&self, text: String) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    pub fn skip(&self, path: &Path) {
        let tag = if self.color { format!("{}", "[skip]".yellow()) } else { "[skip]".to_string() };
        self.line(format!("{} {} exists", tag, path.display()));
    }

    pub fn start(&self, index: usize, total: usize, name: &str, slide_number: u32) {
        let counter = format!("[{}/{}]", index, total);
        let counter = if self.color { format!("{}", counter.cyan()) } else { counter };
        self.line(format!("{} {} (slide {})", counter, name, slide_number));
    }

    pub fn wrote(&self, path: &Path) {
        let arrow = if self.color { format!("{}", "->".green()) } else { "->".to_string() };
        self.line(format!("  {} {}", arrow, path.display()));
    }

    pub fn failed(&self, name: &str, err: &dyn std::fmt::Display) {
        let tag = if self.color { format!("{}", "[fail]".red()) } else { "[fail]".to_string() };
        self.line(format!("{} {}: {}", tag, name, err));
    }

    pub fn done(&self) {
        self.line("Done.".to_string());
    }
}
