use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, info};

use crate::dom::{Dom, Selector};
use crate::forms::kind::FormKind;
use crate::icons::IconRenderer;
use crate::platform::Scheduler;
use crate::subscription::Subscription;

pub const BUSY_LABEL: &str = "Sending...";
pub const SUCCESS_CLASS: &str = "form-success";

/// Simulated send: the transport is a fixed delay, after which the form is
/// swapped for a success panel. There is no failure path.
pub struct SubmissionHandler<D: Dom> {
    dom: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    icons: IconRenderer,
    delay_ms: u32,
    // One entry per form; dropping the handler cancels sends still in flight.
    in_flight: RefCell<Vec<PendingSend<D::Node>>>,
}

struct PendingSend<N> {
    form: N,
    label: Option<String>,
    _timer: Subscription,
}

impl<D: Dom> SubmissionHandler<D> {
    pub fn new(dom: Rc<D>, scheduler: Rc<dyn Scheduler>, icons: IconRenderer, delay_ms: u32) -> Self {
        Self {
            dom,
            scheduler,
            icons,
            delay_ms,
            in_flight: RefCell::new(Vec::new()),
        }
    }

    /// Start sending an already validated form.
    pub fn submit(&self, form: &D::Node) {
        let dom = &*self.dom;
        let button = dom.select(
            Some(form),
            &Selector::All(vec![Selector::tag("button"), Selector::attr_eq("type", "submit")]),
        );
        // A resubmit replaces the earlier send and keeps the label it saved.
        let previous = {
            let mut in_flight = self.in_flight.borrow_mut();
            let at = in_flight.iter().position(|send| send.form == *form);
            at.map(|i| in_flight.swap_remove(i))
        };
        let label = match previous {
            Some(send) => send.label,
            None => button.as_ref().map(|b| dom.text(b)),
        };
        if let Some(button) = &button {
            dom.set_disabled(button, true);
            dom.set_text(button, BUSY_LABEL);
        }

        info!("form submitted: {:?}", self.collect(form));

        let dom = self.dom.clone();
        let target = form.clone();
        let icons = self.icons.clone();
        let restore = label.clone();
        let timer = self.scheduler.timeout(
            self.delay_ms,
            Box::new(move || {
                show_success(&*dom, &target, &icons);
                if let (Some(button), Some(label)) = (button, restore) {
                    dom.set_disabled(&button, false);
                    dom.set_text(&button, &label);
                }
            }),
        );
        self.in_flight.borrow_mut().push(PendingSend {
            form: form.clone(),
            label,
            _timer: timer,
        });
    }

    /// Named field values; later fields win on duplicate names.
    pub fn collect(&self, form: &D::Node) -> BTreeMap<String, String> {
        let dom = &*self.dom;
        dom.select_all(Some(form), &Selector::form_fields())
            .iter()
            .filter_map(|field| {
                let name = dom.attribute(field, "name").filter(|n| !n.is_empty())?;
                Some((name, dom.value(field)))
            })
            .collect()
    }
}

/// Clear and hide `form`, then put the message for its kind right after it.
pub fn show_success<D: Dom>(dom: &D, form: &D::Node, icons: &IconRenderer) -> Option<D::Node> {
    let kind = FormKind::classify(dom, form);
    let message = kind.success_message();
    debug!("showing {:?} success panel", kind);

    let panel = dom.create_element("div")?;
    dom.set_attribute(&panel, "class", SUCCESS_CLASS);
    dom.set_attribute(&panel, "role", "status");

    let icon = dom.create_element("i")?;
    dom.set_attribute(&icon, "data-lucide", "check-circle");
    let title = dom.create_element("h3")?;
    dom.set_text(&title, message.title);
    let body = dom.create_element("p")?;
    dom.set_text(&body, message.body);
    for child in [&icon, &title, &body] {
        dom.append_child(&panel, child);
    }

    dom.reset_form(form);
    dom.set_style(form, "display", "none");
    dom.insert_after(form, &panel);
    icons.refresh();
    Some(panel)
}
