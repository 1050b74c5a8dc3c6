/// Markdown to HTML conversion.
///
/// Implementations must be pure: the same source always renders to the same
/// fragment.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}
