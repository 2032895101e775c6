//! Headless document used by the test suite and anywhere a browser is not
//! available. Nodes live in an arena and are addressed by [`NodeId`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::{Dom, Event, EventKind, Handler, Selector, Target};
use crate::subscription::Subscription;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    top: f64,
    height: f64,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            if self.classes.is_empty() {
                return None;
            }
            return Some(self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Tag(tag) => self.tag == *tag,
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
            Selector::HasAttr(name) => self.attribute(name).is_some(),
            Selector::AttrEq(name, value) => self.attribute(name).as_deref() == Some(value.as_str()),
            Selector::AttrPrefix(name, prefix) => self
                .attribute(name)
                .map_or(false, |v| v.starts_with(prefix.as_str())),
            Selector::All(parts) => parts.iter().all(|part| self.matches(part)),
            Selector::Any(parts) => parts.iter().any(|part| self.matches(part)),
        }
    }
}

struct Listener {
    id: u64,
    target: Target<NodeId>,
    kind: EventKind,
    handler: Rc<RefCell<Handler<NodeId>>>,
}

type Listeners = Rc<RefCell<Vec<Listener>>>;

pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    listeners: Listeners,
    next_listener: Cell<u64>,
    scroll_y: Cell<f64>,
    scroll_requests: RefCell<Vec<f64>>,
    pathname: RefCell<String>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty `<html><body></body></html>` document at `/`.
    pub fn new() -> Self {
        let mut root = NodeData::new("html");
        root.children.push(BODY);
        let mut body = NodeData::new("body");
        body.parent = Some(ROOT);
        Self {
            nodes: RefCell::new(vec![root, body]),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Cell::new(0),
            scroll_y: Cell::new(0.0),
            scroll_requests: RefCell::new(Vec::new()),
            pathname: RefCell::new("/".to_string()),
        }
    }

    pub fn with_path(path: &str) -> Self {
        let dom = Self::new();
        dom.pathname.replace(path.to_string());
        dom
    }

    pub fn body_node(&self) -> NodeId {
        BODY
    }

    /// Create `<tag attrs...>` and append it to `parent`.
    pub fn append(&self, parent: &NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let node = self.create(tag);
        for (name, value) in attributes {
            self.set_attribute(&node, name, value);
        }
        self.append_child(parent, &node);
        node
    }

    pub fn set_layout(&self, node: &NodeId, top: f64, height: f64) {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[node.0];
        data.top = top;
        data.height = height;
    }

    pub fn is_attached(&self, node: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == ROOT {
                return true;
            }
            current = nodes[id.0].parent;
        }
        false
    }

    pub fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let parent = nodes[node.0].parent?;
        let siblings = &nodes[parent.0].children;
        let index = siblings.iter().position(|c| c == node)?;
        siblings.get(index + 1).copied()
    }

    pub fn scroll_requests(&self) -> Vec<f64> {
        self.scroll_requests.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to `target`, bubbling through ancestors, the document
    /// and the window when the event kind bubbles.
    pub fn dispatch(&self, target: Target<NodeId>, event: Event<NodeId>) -> Event<NodeId> {
        let mut path = Vec::new();
        match &target {
            Target::Node(node) => {
                path.push(Target::Node(*node));
                if event.kind.bubbles() {
                    let nodes = self.nodes.borrow();
                    let mut current = nodes[node.0].parent;
                    while let Some(id) = current {
                        path.push(Target::Node(id));
                        current = nodes[id.0].parent;
                    }
                    path.push(Target::Document);
                    path.push(Target::Window);
                }
            }
            Target::Document => {
                path.push(Target::Document);
                if event.kind.bubbles() {
                    path.push(Target::Window);
                }
            }
            Target::Window => path.push(Target::Window),
        }

        for hop in path {
            let handlers: Vec<_> = self
                .listeners
                .borrow()
                .iter()
                .filter(|l| l.kind == event.kind && l.target == hop)
                .map(|l| l.handler.clone())
                .collect();
            for handler in handlers {
                if let Ok(mut handler) = handler.try_borrow_mut() {
                    (*handler)(&event);
                }
            }
        }
        event
    }

    pub fn click(&self, node: &NodeId) -> Event<NodeId> {
        self.dispatch(
            Target::Node(*node),
            Event::new(EventKind::Click, Some(*node)),
        )
    }

    pub fn submit(&self, form: &NodeId) -> Event<NodeId> {
        self.dispatch(
            Target::Node(*form),
            Event::new(EventKind::Submit, Some(*form)),
        )
    }

    /// Replace a field's value and fire `input` the way typing would.
    pub fn type_text(&self, field: &NodeId, value: &str) {
        self.set_value(field, value);
        self.dispatch(
            Target::Node(*field),
            Event::new(EventKind::Input, Some(*field)),
        );
    }

    pub fn blur(&self, field: &NodeId) {
        self.dispatch(
            Target::Node(*field),
            Event::new(EventKind::Blur, Some(*field)),
        );
    }

    pub fn mouse_enter(&self, node: &NodeId) {
        self.dispatch(
            Target::Node(*node),
            Event::new(EventKind::MouseEnter, Some(*node)),
        );
    }

    pub fn mouse_leave(&self, node: &NodeId) {
        self.dispatch(
            Target::Node(*node),
            Event::new(EventKind::MouseLeave, Some(*node)),
        );
    }

    /// Pointer leaving the document at `client_y` with nothing underneath.
    pub fn pointer_exit(&self, client_y: f64) {
        self.dispatch(
            Target::Document,
            Event::new(EventKind::MouseOut, Some(ROOT)).with_client_y(client_y),
        );
    }

    pub fn scroll_window(&self, y: f64) {
        self.scroll_y.set(y);
        self.dispatch(Target::Window, Event::new(EventKind::Scroll, None));
    }

    fn create(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData::new(tag));
        NodeId(nodes.len() - 1)
    }

    fn detach(nodes: &mut [NodeData], node: NodeId) {
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn descendants(nodes: &[NodeData], scope: NodeId, out: &mut Vec<NodeId>) {
        for child in &nodes[scope.0].children {
            out.push(*child);
            Self::descendants(nodes, *child, out);
        }
    }

    fn collect_text(nodes: &[NodeData], node: NodeId, out: &mut String) {
        out.push_str(&nodes[node.0].text);
        for child in &nodes[node.0].children {
            Self::collect_text(nodes, *child, out);
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.select(None, &Selector::attr_eq("id", id))
    }

    fn select_all(&self, scope: Option<&NodeId>, selector: &Selector) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut candidates = Vec::new();
        Self::descendants(&nodes, scope.copied().unwrap_or(ROOT), &mut candidates);
        candidates
            .into_iter()
            .filter(|id| nodes[id.0].matches(selector))
            .collect()
    }

    fn closest(&self, node: &NodeId, selector: &Selector) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut current = Some(*node);
        while let Some(id) = current {
            if nodes[id.0].matches(selector) {
                return Some(id);
            }
            current = nodes[id.0].parent;
        }
        None
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attribute(name)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[node.0];
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[node.0];
        if name == "class" {
            data.classes.clear();
        } else {
            data.attributes.remove(name);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.retain(|c| c != class);
    }

    fn text(&self, node: &NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        Self::collect_text(&nodes, *node, &mut out);
        out
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[node.0].children);
        for child in children {
            nodes[child.0].parent = None;
        }
        nodes[node.0].text = text.to_string();
    }

    fn value(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].value.clone()
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        self.nodes.borrow_mut()[node.0].value = value.to_string();
    }

    fn reset_form(&self, form: &NodeId) {
        for field in self.select_all(Some(form), &Selector::form_fields()) {
            let initial = self.attribute(&field, "value").unwrap_or_default();
            self.set_value(&field, &initial);
        }
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.nodes.borrow()[node.0]
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        Some(self.create(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, *child);
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.push(*child);
    }

    fn insert_after(&self, reference: &NodeId, node: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes[reference.0].parent else {
            return;
        };
        Self::detach(&mut nodes, *node);
        let siblings = &mut nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|c| c == reference)
            .map_or(siblings.len(), |i| i + 1);
        siblings.insert(index, *node);
        nodes[node.0].parent = Some(parent);
    }

    fn remove(&self, node: &NodeId) {
        Self::detach(&mut self.nodes.borrow_mut(), *node);
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].height
    }

    fn document_top(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].top
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scroll_y.set(top);
        self.scroll_requests.borrow_mut().push(top);
    }

    fn pathname(&self) -> String {
        self.pathname.borrow().clone()
    }

    fn listen(
        &self,
        target: Target<NodeId>,
        kind: EventKind,
        handler: Handler<NodeId>,
    ) -> Subscription {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            target,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });

        let listeners: Weak<RefCell<Vec<Listener>>> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                // Take the removed entry out before dropping it: its handler may
                // own further subscriptions that re-enter this registry.
                let removed: Vec<Listener> = {
                    let mut list = listeners.borrow_mut();
                    let (gone, kept): (Vec<Listener>, Vec<Listener>) =
                        list.drain(..).partition(|l| l.id == id);
                    *list = kept;
                    gone
                };
                drop(removed);
            }
        })
    }
}
