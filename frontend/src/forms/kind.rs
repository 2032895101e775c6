use crate::dom::{Dom, Selector};

/// What a form is for; only decides which success message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Consultation,
    Testimonial,
    Application,
    Newsletter,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessMessage {
    pub title: &'static str,
    pub body: &'static str,
}

impl FormKind {
    /// First match wins, page path before field names.
    pub fn classify<D: Dom>(dom: &D, form: &D::Node) -> Self {
        let path = dom.pathname();
        let has_field = |name: &str| dom.select(Some(form), &Selector::named(name)).is_some();

        if path.contains("contact") || has_field("case_type") {
            FormKind::Consultation
        } else if path.contains("testimonial") || has_field("testimonial") {
            FormKind::Testimonial
        } else if path.contains("join") || has_field("position") || has_field("resume") {
            FormKind::Application
        } else if has_field("newsletter") || dom.has_class(form, "newsletter-form") {
            FormKind::Newsletter
        } else {
            FormKind::General
        }
    }

    pub fn success_message(self) -> SuccessMessage {
        match self {
            FormKind::Consultation => SuccessMessage {
                title: "Request Received",
                body: "Thank you for reaching out. We will contact you within 24 hours to schedule your consultation.",
            },
            FormKind::Testimonial => SuccessMessage {
                title: "Thank You",
                body: "We appreciate you taking the time to share your experience. Your testimonial will be reviewed and published soon.",
            },
            FormKind::Application => SuccessMessage {
                title: "Application Submitted",
                body: "Thank you for your interest in joining our team. We will review your application and get back to you within 5 business days.",
            },
            FormKind::Newsletter => SuccessMessage {
                title: "Subscribed",
                body: "You have been added to our mailing list. We will send you updates on legal developments and firm news.",
            },
            FormKind::General => SuccessMessage {
                title: "Submitted Successfully",
                body: "Thank you for your message. We will get back to you soon.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDom;
    use pretty_assertions::assert_eq;

    fn form_with(dom: &MemoryDom, names: &[&str]) -> crate::dom::memory::NodeId {
        let form = dom.append(&dom.body_node(), "form", &[]);
        for name in names {
            dom.append(&form, "input", &[("name", name)]);
        }
        form
    }

    #[test]
    fn page_path_decides_before_field_names() {
        let dom = MemoryDom::with_path("/contact.html");
        let form = form_with(&dom, &["newsletter"]);
        assert_eq!(FormKind::classify(&dom, &form), FormKind::Consultation);

        let dom = MemoryDom::with_path("/join-us.html");
        let form = form_with(&dom, &["email"]);
        assert_eq!(FormKind::classify(&dom, &form), FormKind::Application);
    }

    #[test]
    fn field_names_classify_on_neutral_pages() {
        let cases = [
            (vec!["case_type"], FormKind::Consultation),
            (vec!["testimonial"], FormKind::Testimonial),
            (vec!["resume"], FormKind::Application),
            (vec!["position"], FormKind::Application),
            (vec!["newsletter"], FormKind::Newsletter),
            (vec!["email"], FormKind::General),
        ];
        for (names, expected) in cases {
            let dom = MemoryDom::with_path("/index.html");
            let form = form_with(&dom, &names);
            assert_eq!(FormKind::classify(&dom, &form), expected, "fields {:?}", names);
        }
    }

    #[test]
    fn newsletter_marker_class_counts() {
        let dom = MemoryDom::new();
        let form = dom.append(&dom.body_node(), "form", &[("class", "newsletter-form")]);
        assert_eq!(FormKind::classify(&dom, &form), FormKind::Newsletter);
        assert_eq!(FormKind::Newsletter.success_message().title, "Subscribed");
    }
}
