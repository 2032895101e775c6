use std::rc::Rc;

use log::debug;

use crate::dom::{Dom, Event, EventKind, Selector, Target};
use crate::subscription::Subscription;

/// Smooth scrolling for same-page `#fragment` links, leaving room for the
/// sticky header.
pub struct AnchorScroller {
    _listeners: Vec<Subscription>,
}

impl AnchorScroller {
    pub fn mount<D: Dom>(dom: Rc<D>) -> Option<Self> {
        let anchors = dom.select_all(
            None,
            &Selector::All(vec![Selector::tag("a"), Selector::attr_prefix("href", "#")]),
        );
        if anchors.is_empty() {
            return None;
        }
        debug!("smooth scrolling {} anchor(s)", anchors.len());

        let listeners = anchors
            .into_iter()
            .map(|anchor| {
                let d = dom.clone();
                let a = anchor.clone();
                dom.listen(
                    Target::Node(anchor),
                    EventKind::Click,
                    Box::new(move |event: &Event<D::Node>| {
                        if let Some(top) = scroll_target(&*d, &a) {
                            event.prevent_default();
                            d.smooth_scroll_to(top);
                        }
                    }),
                )
            })
            .collect();

        Some(Self {
            _listeners: listeners,
        })
    }
}

/// Where a click on `anchor` should scroll to, or `None` to let the browser
/// handle it.
pub fn scroll_target<D: Dom>(dom: &D, anchor: &D::Node) -> Option<f64> {
    let href = dom.attribute(anchor, "href")?;
    let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
    let target = dom.element_by_id(id)?;
    let header_height = dom
        .select(None, &Selector::class("header"))
        .map_or(0.0, |header| dom.offset_height(&header));
    Some(dom.document_top(&target) - header_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDom;
    use pretty_assertions::assert_eq;

    #[test]
    fn scrolls_to_target_minus_header_height() {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body_node();
        let header = dom.append(&body, "header", &[("class", "header")]);
        dom.set_layout(&header, 0.0, 80.0);
        let link = dom.append(&body, "a", &[("href", "#practice-areas")]);
        let section = dom.append(&body, "section", &[("id", "practice-areas")]);
        dom.set_layout(&section, 1200.0, 600.0);
        let _scroller = AnchorScroller::mount(dom.clone()).unwrap();

        let event = dom.click(&link);
        assert!(event.default_prevented());
        assert_eq!(dom.scroll_requests(), vec![1120.0]);
    }

    #[test]
    fn bare_hash_and_missing_targets_are_left_alone() {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body_node();
        let bare = dom.append(&body, "a", &[("href", "#")]);
        let dangling = dom.append(&body, "a", &[("href", "#nowhere")]);
        let _scroller = AnchorScroller::mount(dom.clone()).unwrap();

        assert!(!dom.click(&bare).default_prevented());
        assert!(!dom.click(&dangling).default_prevented());
        assert!(dom.scroll_requests().is_empty());
    }

    #[test]
    fn no_header_means_no_offset() {
        let dom = MemoryDom::new();
        let body = dom.body_node();
        let link = dom.append(&body, "a", &[("href", "#top")]);
        let top = dom.append(&body, "div", &[("id", "top")]);
        dom.set_layout(&top, 300.0, 10.0);
        assert_eq!(scroll_target(&dom, &link), Some(300.0));
    }
}
