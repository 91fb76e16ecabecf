const FENCE: &str = "```";

/// Drop every line whose trimmed form opens or closes a fenced code block.
/// Other lines are kept verbatim, line breaks included.
pub fn strip_fences(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !line.trim().starts_with(FENCE))
        .collect()
}
