// Topic tagging — the keyword-frequency heuristic and its surroundings.
//
// normalize -> extract -> match is the write-time pipeline that assigns
// topics to a document; bootstrap runs the same pipeline over the whole
// corpus once to seed the taxonomy.

pub mod bootstrap;
pub mod extract;
pub mod matcher;
pub mod normalize;

/// The text a document is tagged from: title and content, space-joined.
/// Extraction only counts frequency, so the order carries no meaning, but
/// both fields always contribute.
pub fn document_text(title: &str, content: &str) -> String {
    format!("{title} {content}")
}
