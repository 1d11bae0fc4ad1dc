//! Derives a deterministic image plan from a research document.
//!
//! Only a thin slice of markdown is understood: the first `# ` line is the deck title, and the blocks of the
//! `## Detailed Analysis` section, split on `### ` headings, become slides.

use super::{prompt::render_prompt, ImageRequest, Plan, DEFAULT_RESOLUTION, DEFAULT_SIZE, PLAN_VERSION};
use crate::config::DEFAULT_MODEL;

pub const MAX_SECTIONS: usize = 5;
pub const DEFAULT_START_SLIDE: u32 = 5;
pub const DEFAULT_THEME: &str = "golden-hour";

const DEFAULT_DECK_TITLE: &str = "Deck";
const SECTION_START: &str = "## Detailed Analysis";
const SECTION_END: &str = "## Areas of Consensus";
const BLOCK_MARKER: &str = "###";
const DATE_STAMP_PREFIX: &str = "生成日期：";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

pub fn build_plan(document: &str, theme_slug: &str, start_slide: u32) -> Plan {
    let deck_title = deck_title(document);
    let images = parse_detailed_analysis(document)
        .into_iter()
        .take(MAX_SECTIONS)
        .zip(start_slide..)
        .map(|(section, slide_number)| ImageRequest {
            name: format!("slide-{slide_number:02}"),
            slide_number,
            size: DEFAULT_SIZE.to_string(),
            resolution: DEFAULT_RESOLUTION.to_string(),
            prompt: render_prompt(&deck_title, &section.title, &section.body, theme_slug),
        })
        .collect();

    Plan {
        version: PLAN_VERSION,
        theme: theme_slug.to_string(),
        model_hint: DEFAULT_MODEL.to_string(),
        images,
    }
}

/// First `# ` line, or a placeholder when absent or blank.
pub fn deck_title(document: &str) -> String {
    document
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_DECK_TITLE)
        .to_string()
}

pub fn parse_detailed_analysis(document: &str) -> Vec<Section> {
    let raw = section_between(document, SECTION_START, Some(SECTION_END));
    if raw.is_empty() {
        return Vec::new();
    }
    split_blocks(raw)
        .iter()
        .filter_map(|block| {
            let mut lines = block.lines();
            let title = strip_md(lines.next()?.trim());
            let rest: Vec<&str> = lines.collect();
            let body = strip_md(&normalize_paragraphs(&rest.join("\n")));
            Some(Section { title, body })
        })
        .collect()
}

/// Text after `start` up to `end` (or end of document), trimmed. Empty when `start` is absent.
fn section_between<'a>(document: &'a str, start: &str, end: Option<&str>) -> &'a str {
    let Some(pos) = document.find(start) else {
        return "";
    };
    let after = &document[pos + start.len()..];
    match end.and_then(|e| after.find(e)) {
        Some(end_pos) => after[..end_pos].trim(),
        None => after.trim(),
    }
}

/// Splits on lines that open with `###` plus whitespace. Text before the first marker is its own block;
/// blank blocks are dropped.
fn split_blocks(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in raw.lines() {
        match block_heading(line) {
            Some(heading) => blocks.push(std::mem::replace(&mut current, heading.to_string())),
            None => {
                if !current.is_empty() {
                    current.push('\n');
                }
                current.push_str(line);
            }
        }
    }
    blocks.push(current);
    blocks
        .into_iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect()
}

fn block_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(BLOCK_MARKER)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn normalize_paragraphs(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(DATE_STAMP_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_md(text: &str) -> String {
    text.replace("**", "").replace('`', "").trim().to_string()
}
