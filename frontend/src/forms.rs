//! Validation and simulated submission for `form[data-validate]`.

use std::rc::Rc;

use log::debug;

use crate::dom::{Dom, Event, EventKind, Selector, Target};
use crate::subscription::Subscription;

pub mod kind;
pub mod rules;
pub mod submission;
pub mod validator;

use submission::SubmissionHandler;
use validator::FieldValidator;

/// Wires every opted-in form on the page.
pub struct FormEnhancer<D: Dom> {
    validator: FieldValidator<D>,
    forms: Vec<D::Node>,
    _listeners: Vec<Subscription>,
}

impl<D: Dom> FormEnhancer<D> {
    pub fn mount(dom: Rc<D>, submissions: SubmissionHandler<D>) -> Option<Self> {
        let forms = dom.select_all(None, &Selector::has_attr("data-validate"));
        if forms.is_empty() {
            debug!("no validated forms on this page");
            return None;
        }

        let validator = FieldValidator::new(dom.clone());
        let submissions = Rc::new(submissions);
        let mut listeners = Vec::new();
        for form in &forms {
            // The browser's own validation bubbles would race ours.
            dom.set_attribute(form, "novalidate", "");

            let v = validator.clone();
            let s = submissions.clone();
            let target = form.clone();
            listeners.push(dom.listen(
                Target::Node(form.clone()),
                EventKind::Submit,
                Box::new(move |event: &Event<D::Node>| {
                    event.prevent_default();
                    if v.validate_form(&target) {
                        s.submit(&target);
                    }
                }),
            ));

            for field in dom.select_all(Some(form), &Selector::form_fields()) {
                let v = validator.clone();
                let blurred = field.clone();
                listeners.push(dom.listen(
                    Target::Node(field.clone()),
                    EventKind::Blur,
                    Box::new(move |_: &Event<D::Node>| {
                        v.validate_field(&blurred);
                    }),
                ));

                let v = validator.clone();
                let edited = field.clone();
                listeners.push(dom.listen(
                    Target::Node(field),
                    EventKind::Input,
                    Box::new(move |_: &Event<D::Node>| {
                        if v.has_error(&edited) {
                            v.validate_field(&edited);
                        }
                    }),
                ));
            }
        }
        debug!("validating {} form(s)", forms.len());

        Some(Self {
            validator,
            forms,
            _listeners: listeners,
        })
    }

    pub fn validator(&self) -> &FieldValidator<D> {
        &self.validator
    }

    pub fn forms(&self) -> &[D::Node] {
        &self.forms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};
    use crate::icons::IconRenderer;
    use crate::platform::memory::{CountingIcons, ManualScheduler};
    use pretty_assertions::assert_eq;
    use submission::{BUSY_LABEL, SUCCESS_CLASS};
    use validator::{ERROR_CLASS, GROUP_CLASS};

    struct Page {
        dom: Rc<MemoryDom>,
        scheduler: Rc<ManualScheduler>,
        form: NodeId,
        name: NodeId,
        email: NodeId,
        button: NodeId,
    }

    fn contact_page() -> Page {
        let dom = Rc::new(MemoryDom::with_path("/contact.html"));
        let form = dom.append(&dom.body_node(), "form", &[("data-validate", "")]);
        let group = dom.append(&form, "div", &[("class", GROUP_CLASS)]);
        let name = dom.append(&group, "input", &[("name", "name"), ("required", "")]);
        let group = dom.append(&form, "div", &[("class", GROUP_CLASS)]);
        let email = dom.append(
            &group,
            "input",
            &[("name", "email"), ("type", "email"), ("required", "")],
        );
        let button = dom.append(&form, "button", &[("type", "submit")]);
        dom.set_text(&button, "Send");
        Page {
            dom,
            scheduler: Rc::new(ManualScheduler::default()),
            form,
            name,
            email,
            button,
        }
    }

    fn mount(page: &Page) -> FormEnhancer<MemoryDom> {
        let handler = SubmissionHandler::new(
            page.dom.clone(),
            page.scheduler.clone(),
            IconRenderer::new(Rc::new(CountingIcons::default())),
            1000,
        );
        FormEnhancer::mount(page.dom.clone(), handler).unwrap()
    }

    #[test]
    fn mount_marks_forms_novalidate() {
        let page = contact_page();
        let forms = mount(&page);
        assert_eq!(forms.forms(), &[page.form]);
        assert!(page.dom.has_attribute(&page.form, "novalidate"));
    }

    #[test]
    fn page_without_forms_stays_inactive() {
        let dom = Rc::new(MemoryDom::new());
        let handler = SubmissionHandler::new(
            dom.clone(),
            Rc::new(ManualScheduler::default()),
            IconRenderer::new(Rc::new(CountingIcons::default())),
            1000,
        );
        assert!(FormEnhancer::mount(dom, handler).is_none());
    }

    #[test]
    fn invalid_submit_is_blocked_and_annotated() {
        let page = contact_page();
        let _forms = mount(&page);

        let event = page.dom.submit(&page.form);
        assert!(event.default_prevented());
        assert_eq!(page.dom.select_all(None, &Selector::class(ERROR_CLASS)).len(), 2);
        assert!(!page.dom.has_attribute(&page.button, "disabled"));
        page.scheduler.advance(5000);
        assert!(page.dom.select(None, &Selector::class(SUCCESS_CLASS)).is_none());
    }

    #[test]
    fn valid_submit_runs_the_full_lifecycle() {
        let page = contact_page();
        let _forms = mount(&page);
        page.dom.set_value(&page.name, "Asha Sen");
        page.dom.set_value(&page.email, "asha@example.com");

        assert!(page.dom.submit(&page.form).default_prevented());
        assert!(page.dom.has_attribute(&page.button, "disabled"));
        assert_eq!(page.dom.text(&page.button), BUSY_LABEL);

        page.scheduler.advance(1000);
        assert!(!page.dom.has_attribute(&page.button, "disabled"));
        assert_eq!(page.dom.text(&page.button), "Send");
        assert_eq!(page.dom.style(&page.form, "display"), "none");
        let panel = page.dom.next_sibling(&page.form).unwrap();
        assert!(page.dom.has_class(&panel, SUCCESS_CLASS));
    }

    #[test]
    fn blur_validates_and_input_revalidates_only_flagged_fields() {
        let page = contact_page();
        let forms = mount(&page);

        page.dom.type_text(&page.email, "bad");
        assert!(!forms.validator().has_error(&page.email));

        page.dom.blur(&page.email);
        assert!(forms.validator().has_error(&page.email));

        page.dom.type_text(&page.email, "good@example.com");
        assert!(!forms.validator().has_error(&page.email));
    }
}
