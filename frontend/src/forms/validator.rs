use std::rc::Rc;

use crate::dom::{Dom, Selector};
use crate::forms::rules::{FieldError, FieldRules};

pub const GROUP_CLASS: &str = "form-group";
pub const ERROR_CLASS: &str = "form-error";
pub const FIELD_ERROR_CLASS: &str = "form-input--error";

/// Checks fields against their markup rules and keeps the inline error UI
/// in step with the result.
pub struct FieldValidator<D: Dom> {
    dom: Rc<D>,
}

impl<D: Dom> Clone for FieldValidator<D> {
    fn clone(&self) -> Self {
        Self { dom: self.dom.clone() }
    }
}

impl<D: Dom> FieldValidator<D> {
    pub fn new(dom: Rc<D>) -> Self {
        Self { dom }
    }

    pub fn validate_field(&self, field: &D::Node) -> bool {
        let value = self.dom.value(field);
        let error = FieldRules::read(&*self.dom, field).check(value.trim());
        self.show_error(field, error.as_ref());
        error.is_none()
    }

    /// Validates every field, even after the first failure, so each one is
    /// annotated.
    pub fn validate_form(&self, form: &D::Node) -> bool {
        self.dom
            .select_all(Some(form), &Selector::form_fields())
            .iter()
            .map(|field| self.validate_field(field))
            .fold(true, |all_valid, valid| all_valid & valid)
    }

    pub fn has_error(&self, field: &D::Node) -> bool {
        self.dom.has_class(field, FIELD_ERROR_CLASS)
    }

    fn show_error(&self, field: &D::Node, error: Option<&FieldError>) {
        let dom = &*self.dom;
        let group = dom.closest(field, &Selector::class(GROUP_CLASS));
        let existing = group
            .as_ref()
            .and_then(|g| dom.select(Some(g), &Selector::class(ERROR_CLASS)));

        match error {
            Some(error) => {
                dom.add_class(field, FIELD_ERROR_CLASS);
                dom.set_attribute(field, "aria-invalid", "true");
                let message = existing.or_else(|| {
                    let group = group.as_ref()?;
                    let span = dom.create_element("span")?;
                    dom.set_attribute(&span, "class", ERROR_CLASS);
                    dom.set_attribute(&span, "role", "alert");
                    dom.append_child(group, &span);
                    Some(span)
                });
                if let Some(message) = message {
                    dom.set_text(&message, &error.to_string());
                }
            }
            None => {
                dom.remove_class(field, FIELD_ERROR_CLASS);
                dom.remove_attribute(field, "aria-invalid");
                if let Some(message) = existing {
                    dom.remove(&message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};
    use pretty_assertions::assert_eq;

    fn grouped_field(dom: &MemoryDom, parent: &NodeId, tag: &str, attrs: &[(&str, &str)]) -> (NodeId, NodeId) {
        let group = dom.append(parent, "div", &[("class", GROUP_CLASS)]);
        dom.append(&group, "label", &[]);
        let field = dom.append(&group, tag, attrs);
        (group, field)
    }

    fn errors_in(dom: &MemoryDom, group: &NodeId) -> Vec<String> {
        dom.select_all(Some(group), &Selector::class(ERROR_CLASS))
            .iter()
            .map(|e| dom.text(e))
            .collect()
    }

    #[test]
    fn failing_field_gets_exactly_one_error_even_when_rechecked() {
        let dom = Rc::new(MemoryDom::new());
        let (group, field) = grouped_field(&dom, &dom.body_node(), "input", &[("type", "email")]);
        let validator = FieldValidator::new(dom.clone());
        dom.set_value(&field, "a@b");

        assert!(!validator.validate_field(&field));
        assert!(!validator.validate_field(&field));
        assert_eq!(
            errors_in(&dom, &group),
            vec![FieldError::Email.to_string()]
        );
        assert!(validator.has_error(&field));
        assert_eq!(dom.attribute(&field, "aria-invalid").as_deref(), Some("true"));
        let span = dom.select(Some(&group), &Selector::class(ERROR_CLASS)).unwrap();
        assert_eq!(dom.attribute(&span, "role").as_deref(), Some("alert"));
    }

    #[test]
    fn fixing_the_value_clears_error_ui() {
        let dom = Rc::new(MemoryDom::new());
        let (group, field) = grouped_field(&dom, &dom.body_node(), "input", &[("required", "")]);
        let validator = FieldValidator::new(dom.clone());

        assert!(!validator.validate_field(&field));
        dom.set_value(&field, "  Asha  ");
        assert!(validator.validate_field(&field));
        assert!(errors_in(&dom, &group).is_empty());
        assert!(!validator.has_error(&field));
        assert_eq!(dom.attribute(&field, "aria-invalid"), None);
    }

    #[test]
    fn message_is_replaced_when_the_violation_changes() {
        let dom = Rc::new(MemoryDom::new());
        let (group, field) = grouped_field(
            &dom,
            &dom.body_node(),
            "textarea",
            &[("required", ""), ("minlength", "10")],
        );
        let validator = FieldValidator::new(dom.clone());

        validator.validate_field(&field);
        assert_eq!(errors_in(&dom, &group), vec!["Please fill this field".to_string()]);
        dom.set_value(&field, "short");
        validator.validate_field(&field);
        assert_eq!(
            errors_in(&dom, &group),
            vec!["Please enter at least 10 characters".to_string()]
        );
    }

    #[test]
    fn empty_required_select_uses_selection_message() {
        let dom = Rc::new(MemoryDom::new());
        let (group, select) = grouped_field(&dom, &dom.body_node(), "select", &[("required", "")]);
        let validator = FieldValidator::new(dom.clone());
        assert!(!validator.validate_field(&select));
        assert_eq!(errors_in(&dom, &group), vec!["Please select an option".to_string()]);
    }

    #[test]
    fn validate_form_checks_every_field() {
        let dom = Rc::new(MemoryDom::new());
        let form = dom.append(&dom.body_node(), "form", &[("data-validate", "")]);
        let (name_group, _) = grouped_field(&dom, &form, "input", &[("required", "")]);
        let (email_group, email) = grouped_field(&dom, &form, "input", &[("type", "email")]);
        let (topic_group, _) = grouped_field(&dom, &form, "select", &[("required", "")]);
        let validator = FieldValidator::new(dom.clone());
        dom.set_value(&email, "nobody");

        assert!(!validator.validate_form(&form));
        assert_eq!(errors_in(&dom, &name_group).len(), 1);
        assert_eq!(errors_in(&dom, &email_group).len(), 1);
        assert_eq!(errors_in(&dom, &topic_group).len(), 1);
    }

    #[test]
    fn field_outside_a_group_is_still_flagged() {
        let dom = Rc::new(MemoryDom::new());
        let field = dom.append(&dom.body_node(), "input", &[("required", "")]);
        let validator = FieldValidator::new(dom.clone());
        assert!(!validator.validate_field(&field));
        assert!(validator.has_error(&field));
        assert!(dom.select(None, &Selector::class(ERROR_CLASS)).is_none());
    }
}
