use std::rc::Rc;

use log::debug;

use crate::dom::{Dom, Event, EventKind, Selector, Target};
use crate::subscription::Subscription;

pub const BUTTON_CLASS: &str = "lang-toggle__btn";
pub const ACTIVE_CLASS: &str = "lang-toggle__btn--active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Bengali,
}

impl Locale {
    fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("bn") => Locale::Bengali,
            _ => Locale::English,
        }
    }
}

struct Switch<D: Dom> {
    dom: Rc<D>,
    buttons: Vec<D::Node>,
    english: D::Node,
    bengali: D::Node,
}

impl<D: Dom> Switch<D> {
    fn activate(&self, button: &D::Node) {
        let dom = &*self.dom;
        for b in &self.buttons {
            let active = b == button;
            dom.set_class(b, ACTIVE_CLASS, active);
            dom.set_attribute(b, "aria-selected", if active { "true" } else { "false" });
        }
        let locale = Locale::from_code(dom.attribute(button, "data-lang").as_deref());
        dom.set_hidden(&self.english, locale == Locale::Bengali);
        dom.set_hidden(&self.bengali, locale == Locale::English);
    }
}

/// Two-way language toggle between parallel testimonial blocks.
pub struct LocaleSwitch<D: Dom> {
    switch: Rc<Switch<D>>,
    _listeners: Vec<Subscription>,
}

impl<D: Dom> LocaleSwitch<D> {
    pub fn mount(dom: Rc<D>) -> Option<Self> {
        let buttons = dom.select_all(None, &Selector::class(BUTTON_CLASS));
        if buttons.is_empty() {
            return None;
        }
        let english = dom.element_by_id("testimonials-en");
        let bengali = dom.element_by_id("testimonials-bn");
        let (Some(english), Some(bengali)) = (english, bengali) else {
            debug!("language toggle without both content blocks");
            return None;
        };

        let switch = Rc::new(Switch {
            dom: dom.clone(),
            buttons: buttons.clone(),
            english,
            bengali,
        });
        let listeners = buttons
            .into_iter()
            .map(|button| {
                let s = switch.clone();
                let b = button.clone();
                dom.listen(
                    Target::Node(button),
                    EventKind::Click,
                    Box::new(move |_: &Event<D::Node>| s.activate(&b)),
                )
            })
            .collect();

        Some(Self {
            switch,
            _listeners: listeners,
        })
    }

    pub fn active(&self) -> Locale {
        if self.switch.dom.is_hidden(&self.switch.english) {
            Locale::Bengali
        } else {
            Locale::English
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};
    use pretty_assertions::assert_eq;

    struct Fixture {
        dom: Rc<MemoryDom>,
        en_button: NodeId,
        bn_button: NodeId,
        en: NodeId,
        bn: NodeId,
    }

    fn fixture() -> Fixture {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body_node();
        let toggle = dom.append(&body, "div", &[("class", "lang-toggle")]);
        let en_button = dom.append(
            &toggle,
            "button",
            &[("class", "lang-toggle__btn lang-toggle__btn--active"), ("data-lang", "en")],
        );
        let bn_button = dom.append(&toggle, "button", &[("class", BUTTON_CLASS), ("data-lang", "bn")]);
        let en = dom.append(&body, "div", &[("id", "testimonials-en")]);
        let bn = dom.append(&body, "div", &[("id", "testimonials-bn"), ("hidden", "")]);
        Fixture {
            dom,
            en_button,
            bn_button,
            en,
            bn,
        }
    }

    #[test]
    fn exactly_one_block_and_button_active() {
        let f = fixture();
        let switch = LocaleSwitch::mount(f.dom.clone()).unwrap();

        f.dom.click(&f.bn_button);
        assert_eq!(switch.active(), Locale::Bengali);
        assert!(f.dom.is_hidden(&f.en));
        assert!(!f.dom.is_hidden(&f.bn));
        assert!(f.dom.has_class(&f.bn_button, ACTIVE_CLASS));
        assert!(!f.dom.has_class(&f.en_button, ACTIVE_CLASS));
        assert_eq!(f.dom.attribute(&f.bn_button, "aria-selected").as_deref(), Some("true"));
        assert_eq!(f.dom.attribute(&f.en_button, "aria-selected").as_deref(), Some("false"));

        f.dom.click(&f.en_button);
        assert_eq!(switch.active(), Locale::English);
        assert!(!f.dom.is_hidden(&f.en));
        assert!(f.dom.is_hidden(&f.bn));
    }

    #[test]
    fn unknown_language_code_means_english() {
        assert_eq!(Locale::from_code(Some("fr")), Locale::English);
        assert_eq!(Locale::from_code(None), Locale::English);
    }

    #[test]
    fn needs_both_blocks() {
        let dom = Rc::new(MemoryDom::new());
        dom.append(&dom.body_node(), "button", &[("class", BUTTON_CLASS)]);
        dom.append(&dom.body_node(), "div", &[("id", "testimonials-en")]);
        assert!(LocaleSwitch::mount(dom).is_none());
    }
}
