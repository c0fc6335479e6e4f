/// Responsible for formatting tool outputs
pub trait Render: Send + Sync + 'static {
    /// Short status line for logs
    fn status(&self) -> String;

    /// The text handed back to the model as the tool result
    fn render(&self) -> String;
}
