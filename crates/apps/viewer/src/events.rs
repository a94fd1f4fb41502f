/// Output the host drains after input or frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobeEvent {
    /// Region shown as hovered (or the sticky selection when nothing is hovered).
    HoverChanged(Option<String>),
    /// Click result; `None` clears the selection.
    Selected(Option<String>),
}
