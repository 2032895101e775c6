use std::rc::Rc;

use log::debug;

use crate::dom::{Dom, Selector};
use crate::platform::VisibilityWatcher;
use crate::subscription::Subscription;

pub const ANIMATED_CLASS: &str = "animated";

/// Marks `[data-animate]` elements as `animated` the first time they scroll
/// into view.
pub struct RevealOnScroll {
    watched: usize,
    _watch: Subscription,
}

impl RevealOnScroll {
    pub fn mount<D: Dom>(dom: Rc<D>, visibility: Rc<dyn VisibilityWatcher<D::Node>>) -> Option<Self> {
        let nodes = dom.select_all(None, &Selector::has_attr("data-animate"));
        if nodes.is_empty() {
            debug!("nothing to reveal on this page");
            return None;
        }
        let watched = nodes.len();
        let d = dom.clone();
        let watch = visibility.watch(
            nodes,
            Box::new(move |node: &D::Node| d.add_class(node, ANIMATED_CLASS)),
        );
        Some(Self {
            watched,
            _watch: watch,
        })
    }

    pub fn watched(&self) -> usize {
        self.watched
    }
}
