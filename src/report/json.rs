use crate::report::SummaryDocument;

pub fn render_summary_json(doc: &SummaryDocument<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}
