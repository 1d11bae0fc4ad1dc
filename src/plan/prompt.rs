//! Prompt template and theme style hints.

/// Characters of section body carried into the prompt.
pub const CONTEXT_BUDGET: usize = 260;

const FALLBACK_HINT: &str = "consistent palette matching the deck theme";

const THEME_HINTS: &[(&str, &str)] = &[
    ("golden-hour", "warm mustard yellow + terracotta + soft beige palette, cozy but premium"),
    ("tech-innovation", "high-contrast dark gray with electric blue and neon cyan accents, sleek modern"),
    ("ocean-depths", "deep navy + teal + seafoam palette, clean and trustworthy"),
    ("modern-minimalist", "neutral grayscale, minimal, lots of whitespace"),
    ("midnight-galaxy", "dark cosmic palette, subtle glow accents"),
];

pub fn theme_style_hint(theme_slug: &str) -> &'static str {
    let slug = theme_slug.trim().to_lowercase();
    THEME_HINTS
        .iter()
        .find(|(k, _)| *k == slug)
        .map(|(_, v)| *v)
        .unwrap_or(FALLBACK_HINT)
}

pub fn context_excerpt(body: &str) -> String {
    body.chars().take(CONTEXT_BUDGET).collect::<String>().replace('\n', " ")
}

pub fn render_prompt(deck_title: &str, section_title: &str, section_body: &str, theme_slug: &str) -> String {
    let style = theme_style_hint(theme_slug);
    let context = context_excerpt(section_body);
    format!(
        "Create a modern editorial illustration for a presentation slide.\n\
         Topic: {deck_title}\n\
         Slide focus: {section_title}\n\
         Context: {context}\n\
         Style: {style}; flat vector / editorial, subtle grain, clean shapes.\n\
         Composition: subject centered, plenty of negative space around edges, 16:9 friendly.\n\
         Constraints: no text, no captions, no logos, no watermarks, no brand marks.\n\
         Quality: crisp, high detail, professional, not cartoonish.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_theme_is_case_insensitive() {
        assert_eq!(theme_style_hint("  Ocean-Depths "), "deep navy + teal + seafoam palette, clean and trustworthy");
    }

    #[test]
    fn unknown_theme_falls_back() {
        assert_eq!(theme_style_hint("sunset-noir"), FALLBACK_HINT);
    }

    #[test]
    fn excerpt_counts_chars_and_flattens_newlines() {
        let body = format!("第一行\n{}", "é".repeat(400));
        let out = context_excerpt(&body);
        assert_eq!(out.chars().count(), CONTEXT_BUDGET);
        assert!(out.starts_with("第一行 é"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn prompt_has_fixed_directives() {
        let p = render_prompt("Q3 Report", "Market Trends", "Demand rose.", "golden-hour");
        let lines: Vec<&str> = p.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "Topic: Q3 Report");
        assert_eq!(lines[2], "Slide focus: Market Trends");
        assert_eq!(lines[3], "Context: Demand rose.");
        assert!(lines[4].starts_with("Style: warm mustard yellow"));
        assert!(p.contains("no logos"));
        assert!(p.ends_with("not cartoonish.\n"));
    }
}
