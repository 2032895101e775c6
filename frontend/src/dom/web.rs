use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, MouseEvent, ScrollBehavior, ScrollToOptions, Window,
};

use super::{Dom, Event, EventKind, Handler, Selector, Target};
use crate::subscription::Subscription;

/// The live browser document.
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    fn html(node: &Element) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn select_all(&self, scope: Option<&Element>, selector: &Selector) -> Vec<Element> {
        let css = selector.to_string();
        let list = match scope {
            Some(scope) => scope.query_selector_all(&css),
            None => self.document.query_selector_all(&css),
        };
        let list = match list {
            Ok(list) => list,
            Err(e) => {
                warn!("query_selector_all({}) failed: {:?}", css, e);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn closest(&self, node: &Element, selector: &Selector) -> Option<Element> {
        node.closest(&selector.to_string()).ok().flatten()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn reset_form(&self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(el) = Self::html(node) {
            let style = el.style();
            if value.is_empty() {
                let _ = style.remove_property(property);
            } else {
                let _ = style.set_property(property, value);
            }
        }
    }

    fn style(&self, node: &Element, property: &str) -> String {
        Self::html(node)
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_hidden(&self, node: &Element, hidden: bool) {
        match Self::html(node) {
            Some(el) => el.set_hidden(hidden),
            None if hidden => {
                let _ = node.set_attribute("hidden", "");
            }
            None => {
                let _ = node.remove_attribute("hidden");
            }
        }
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        match self.document.create_element(tag) {
            Ok(el) => Some(el),
            Err(e) => {
                warn!("create_element({}) failed: {:?}", tag, e);
                None
            }
        }
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        let _ = parent.append_child(child);
    }

    fn insert_after(&self, reference: &Element, node: &Element) {
        let _ = reference.after_with_node_1(node);
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn offset_height(&self, node: &Element) -> f64 {
        Self::html(node).map_or(0.0, |el| f64::from(el.offset_height()))
    }

    fn document_top(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().top() + self.scroll_y()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn listen(
        &self,
        target: Target<Element>,
        kind: EventKind,
        mut handler: Handler<Element>,
    ) -> Subscription {
        let event_target: EventTarget = match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Node(node) => node.into(),
        };

        let callback = Closure::wrap(Box::new(move |raw: web_sys::Event| {
            let mouse = raw.dyn_ref::<MouseEvent>();
            let event = Event::new(
                kind,
                raw.target().and_then(|t| t.dyn_into::<Element>().ok()),
            )
            .with_client_y(mouse.map_or(0.0, |m| f64::from(m.client_y())))
            .with_related_target(mouse.map_or(false, |m| m.related_target().is_some()));
            handler(&event);
            if event.default_prevented() {
                raw.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(e) = event_target
            .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
        {
            warn!("failed to listen for {}: {:?}", kind.as_str(), e);
            return Subscription::noop();
        }

        Subscription::new(move || {
            let _ = event_target.remove_event_listener_with_callback(
                kind.as_str(),
                callback.as_ref().unchecked_ref(),
            );
        })
    }
}
