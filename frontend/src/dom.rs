//! Capability-abstracted document.
//!
//! Every behavior module talks to the page through [`Dom`], so the same code
//! runs against the browser (`web`, wasm32 only) and against the headless
//! `memory::MemoryDom` used in tests (and exported with the `headless`
//! feature).

use std::cell::Cell;
use std::fmt;

use crate::subscription::Subscription;

#[cfg(any(test, feature = "headless"))]
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Small CSS selector model. Renders to a CSS string for the browser and is
/// matched structurally by the in-memory document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Class(String),
    HasAttr(String),
    AttrEq(String, String),
    AttrPrefix(String, String),
    /// Compound selector: every part must match the same element.
    All(Vec<Selector>),
    /// Selector list: any part may match.
    Any(Vec<Selector>),
}

impl Selector {
    pub fn tag(tag: &str) -> Self {
        Selector::Tag(tag.to_string())
    }

    pub fn class(class: &str) -> Self {
        Selector::Class(class.to_string())
    }

    pub fn has_attr(name: &str) -> Self {
        Selector::HasAttr(name.to_string())
    }

    pub fn attr_eq(name: &str, value: &str) -> Self {
        Selector::AttrEq(name.to_string(), value.to_string())
    }

    pub fn attr_prefix(name: &str, prefix: &str) -> Self {
        Selector::AttrPrefix(name.to_string(), prefix.to_string())
    }

    pub fn named(name: &str) -> Self {
        Selector::attr_eq("name", name)
    }

    /// `input, textarea, select`
    pub fn form_fields() -> Self {
        Selector::Any(vec![
            Selector::tag("input"),
            Selector::tag("textarea"),
            Selector::tag("select"),
        ])
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Tag(tag) => write!(f, "{}", tag),
            Selector::Class(class) => write!(f, ".{}", class),
            Selector::HasAttr(name) => write!(f, "[{}]", name),
            Selector::AttrEq(name, value) => write!(f, "[{}=\"{}\"]", name, value),
            Selector::AttrPrefix(name, prefix) => write!(f, "[{}^=\"{}\"]", name, prefix),
            Selector::All(parts) => parts.iter().try_for_each(|part| write!(f, "{}", part)),
            Selector::Any(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Input,
    Blur,
    Scroll,
    MouseOut,
    MouseEnter,
    MouseLeave,
    DomContentLoaded,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Input => "input",
            EventKind::Blur => "blur",
            EventKind::Scroll => "scroll",
            EventKind::MouseOut => "mouseout",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::DomContentLoaded => "DOMContentLoaded",
        }
    }

    pub fn bubbles(self) -> bool {
        matches!(
            self,
            EventKind::Click | EventKind::Submit | EventKind::Input | EventKind::MouseOut
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target<N> {
    Window,
    Document,
    Node(N),
}

/// What a handler sees of a dispatched event.
#[derive(Debug)]
pub struct Event<N> {
    pub kind: EventKind,
    pub target: Option<N>,
    pub client_y: f64,
    pub has_related_target: bool,
    default_prevented: Cell<bool>,
}

impl<N> Event<N> {
    pub fn new(kind: EventKind, target: Option<N>) -> Self {
        Self {
            kind,
            target,
            client_y: 0.0,
            has_related_target: false,
            default_prevented: Cell::new(false),
        }
    }

    pub fn with_client_y(mut self, client_y: f64) -> Self {
        self.client_y = client_y;
        self
    }

    pub fn with_related_target(mut self, present: bool) -> Self {
        self.has_related_target = present;
        self
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type Handler<N> = Box<dyn FnMut(&Event<N>)>;

/// The document surface the behavior modules need.
///
/// Node handles are cheap clones; identity is `PartialEq`.
pub trait Dom: 'static {
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    fn body(&self) -> Option<Self::Node>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Descendants of `scope` (or of the whole document) in document order.
    fn select_all(&self, scope: Option<&Self::Node>, selector: &Selector) -> Vec<Self::Node>;

    fn select(&self, scope: Option<&Self::Node>, selector: &Selector) -> Option<Self::Node> {
        self.select_all(scope, selector).into_iter().next()
    }

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &Selector) -> Option<Self::Node>;

    /// Lowercase tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    fn set_class(&self, node: &Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Current value of a form control; empty for anything else.
    fn value(&self, node: &Self::Node) -> String;
    fn set_value(&self, node: &Self::Node, value: &str);
    fn reset_form(&self, form: &Self::Node);

    /// Inline style property. An empty value clears it.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn style(&self, node: &Self::Node, property: &str) -> String;

    fn set_hidden(&self, node: &Self::Node, hidden: bool) {
        if hidden {
            self.set_attribute(node, "hidden", "");
        } else {
            self.remove_attribute(node, "hidden");
        }
    }

    fn is_hidden(&self, node: &Self::Node) -> bool {
        self.has_attribute(node, "hidden")
    }

    fn set_disabled(&self, node: &Self::Node, disabled: bool) {
        if disabled {
            self.set_attribute(node, "disabled", "");
        } else {
            self.remove_attribute(node, "disabled");
        }
    }

    fn create_element(&self, tag: &str) -> Option<Self::Node>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node);
    fn insert_after(&self, reference: &Self::Node, node: &Self::Node);
    fn remove(&self, node: &Self::Node);

    /// Rendered height in CSS pixels.
    fn offset_height(&self, node: &Self::Node) -> f64;
    /// Top edge relative to the document, not the viewport.
    fn document_top(&self, node: &Self::Node) -> f64;

    fn scroll_y(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64);
    fn pathname(&self) -> String;

    fn listen(
        &self,
        target: Target<Self::Node>,
        kind: EventKind,
        handler: Handler<Self::Node>,
    ) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selectors_render_as_css() {
        let anchors = Selector::All(vec![Selector::tag("a"), Selector::attr_prefix("href", "#")]);
        assert_eq!(anchors.to_string(), "a[href^=\"#\"]");
        assert_eq!(Selector::form_fields().to_string(), "input, textarea, select");
        let submit = Selector::All(vec![
            Selector::tag("button"),
            Selector::attr_eq("type", "submit"),
        ]);
        assert_eq!(submit.to_string(), "button[type=\"submit\"]");
    }

    #[test]
    fn only_document_level_events_bubble() {
        assert!(EventKind::Click.bubbles());
        assert!(!EventKind::Blur.bubbles());
        assert!(!EventKind::MouseEnter.bubbles());
    }
}
