//! Contact form: real-time field validation, honeypot filtering and the
//! submit flow.

pub mod debounce;
pub mod flow;
pub mod rules;
pub mod submit;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use gloo_timers::future::TimeoutFuture;
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement,
};

use crate::config::SiteConfig;
use crate::dom::{self, Listener};
use crate::error::SiteError;

use debounce::Debouncer;
use flow::{first_invalid, submit_steps, transport_steps, ControlState, FieldFeedback, LoadingSwap, Step};
use rules::{FieldValue, RuleTable, Validity};
use submit::{plan_submission, SubmitOutcome, SubmitTransport, HONEYPOT_FIELD};

pub const FORM_SELECTOR: &str = ".contact-form-element";
pub const FIELD_SELECTOR: &str = "input, textarea, select";
pub const SUBMIT_BUTTON_SELECTOR: &str = "#submit-btn";
pub const STATUS_SELECTOR: &str = ".form-status";
const GROUP_SELECTORS: [&str; 2] = [".form-group", ".form-privacy"];
const ERROR_MESSAGE_SELECTOR: &str = ".error-message";

/// A form control of any of the kinds the contact form uses.
#[derive(Clone)]
enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
}

impl Control {
    fn from_element(element: Element) -> Option<Self> {
        let element = match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(Control::Input(input)),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(area) => return Some(Control::TextArea(area)),
            Err(element) => element,
        };
        element.dyn_into::<HtmlSelectElement>().ok().map(Control::Select)
    }

    fn html(&self) -> &HtmlElement {
        match self {
            Control::Input(input) => input,
            Control::TextArea(area) => area,
            Control::Select(select) => select,
        }
    }

    fn name(&self) -> String {
        match self {
            Control::Input(input) => input.name(),
            Control::TextArea(area) => area.name(),
            Control::Select(select) => select.name(),
        }
    }

    fn is_checkbox(&self) -> bool {
        matches!(self, Control::Input(input) if input.type_().eq_ignore_ascii_case("checkbox"))
    }

    fn raw_value(&self) -> String {
        match self {
            Control::Input(input) => input.value(),
            Control::TextArea(area) => area.value(),
            Control::Select(select) => select.value(),
        }
    }

    fn value(&self) -> FieldValue {
        match self {
            Control::Input(input) if self.is_checkbox() => FieldValue::Checkbox(input.checked()),
            _ => FieldValue::Text(self.raw_value()),
        }
    }

    /// Name/value pair sent to a backend; unchecked boxes and unnamed
    /// controls contribute nothing.
    fn submitted(&self) -> Option<(String, String)> {
        let name = self.name();
        if name.is_empty() {
            return None;
        }
        if let Control::Input(input) = self {
            if self.is_checkbox() && !input.checked() {
                return None;
            }
        }
        Some((name, self.raw_value()))
    }

    /// The field's `.form-group`, or its `.form-privacy` wrapper.
    fn group(&self) -> Option<Element> {
        GROUP_SELECTORS
            .iter()
            .find_map(|selector| self.html().closest(selector).ok().flatten())
    }
}

struct Field {
    control: Control,
    name: String,
    validity: RefCell<Validity>,
    debouncer: Debouncer,
}

struct FormState {
    form: HtmlFormElement,
    fields: Vec<Field>,
    rules: RuleTable,
    transport: SubmitTransport,
    config: SiteConfig,
}

impl FormState {
    /// Validates one field and renders the result. Returns whether it is
    /// valid; a field without a rule is valid and left untouched.
    fn validate_field(&self, index: usize) -> bool {
        let Some(field) = self.fields.get(index) else {
            return true;
        };
        let value = field.control.value();
        let Some(validity) = self.rules.validate(&field.name, &value) else {
            return true;
        };
        render_validity(&field.control, &validity, value.has_content());
        let valid = validity.is_valid();
        field.validity.replace(validity);
        valid
    }

    /// Validates every non-honeypot field so that all errors show at once.
    fn validate_all(&self) -> bool {
        let mut valid = true;
        for index in 0..self.fields.len() {
            if self.fields[index].name == HONEYPOT_FIELD {
                continue;
            }
            valid &= self.validate_field(index);
        }
        valid
    }

    fn first_invalid(&self) -> Option<usize> {
        let validities: Vec<Validity> = self
            .fields
            .iter()
            .map(|field| field.validity.borrow().clone())
            .collect();
        first_invalid(&validities)
    }

    fn honeypot_value(&self) -> Option<String> {
        dom::query::<HtmlInputElement>(&self.form, &format!("input[name=\"{}\"]", HONEYPOT_FIELD))
            .map(|input| input.value())
    }

    fn submit(self: &Rc<Self>) {
        let honeypot = self.honeypot_value();
        let outcome = plan_submission(honeypot.as_deref(), || self.validate_all(), &self.form.action());
        match outcome {
            SubmitOutcome::Discarded => debug!("Discarded submission with filled honeypot"),
            SubmitOutcome::Invalid => debug!("Contact form has errors"),
            SubmitOutcome::Accepted(path) => info!("Submitting contact form via {:?}", path),
        }
        let steps = submit_steps(outcome, self.first_invalid(), &self.config);
        if !steps.is_empty() {
            spawn_local(self.clone().run(steps));
        }
    }

    /// Carries out `steps` in order, waiting where they say to.
    async fn run(self: Rc<Self>, steps: Vec<Step>) {
        let mut queue = VecDeque::from(steps);
        let mut busy: Option<BusyState> = None;
        let mut announcement: Option<Element> = None;

        while let Some(step) = queue.pop_front() {
            match step {
                Step::ClearStatus => self.clear_status(),
                Step::EnterLoading => {
                    busy = Some(BusyState::enter(&self.form, &self.config.text.sending_label))
                }
                Step::NativeSubmit => {
                    if let Err(e) = self.form.submit() {
                        warn!("Native form submission failed: {}", SiteError::from(e));
                    }
                }
                Step::Wait(ms) => TimeoutFuture::new(ms).await,
                Step::AwaitTransport => {
                    let fields: Vec<(String, String)> = self
                        .fields
                        .iter()
                        .filter(|field| field.name != HONEYPOT_FIELD)
                        .filter_map(|field| field.control.submitted())
                        .collect();
                    let result = self.transport.send(&fields).await;
                    match &result {
                        Ok(()) => info!("Contact form submitted"),
                        Err(e) => warn!("Contact form submission failed: {}", e),
                    }
                    queue.extend(transport_steps(result.is_ok()));
                }
                Step::LeaveLoading => {
                    if let Some(busy) = busy.take() {
                        busy.leave();
                    }
                }
                Step::Notify(notice) => self.notify(notice.text(&self.config.text)),
                Step::ResetForm => self.reset(),
                Step::FocusField(index) => {
                    if let Some(field) = self.fields.get(index) {
                        let _ = field.control.html().focus();
                    }
                }
                Step::Announce => match self.post_announcement() {
                    Ok(element) => announcement = Some(element),
                    Err(e) => warn!("Could not announce form errors: {}", e),
                },
                Step::RemoveAnnouncement => {
                    if let Some(element) = announcement.take() {
                        element.remove();
                    }
                }
            }
        }
    }

    fn reset(&self) {
        self.form.reset();
        for field in &self.fields {
            field.debouncer.cancel();
            field.validity.replace(Validity::Unvalidated);
            render_validity(&field.control, &Validity::Unvalidated, false);
        }
    }

    fn status(&self) -> Option<Element> {
        dom::query::<Element>(&self.form, STATUS_SELECTOR)
    }

    fn clear_status(&self) {
        if let Some(status) = self.status() {
            status.set_text_content(None);
        }
    }

    fn notify(&self, message: &str) {
        if let Some(status) = self.status() {
            status.set_text_content(Some(message));
            return;
        }
        if let Ok(window) = dom::window() {
            let _ = window.alert_with_message(message);
        }
    }

    /// Posts a polite live-region message for screen readers.
    fn post_announcement(&self) -> Result<Element, SiteError> {
        let document = dom::document()?;
        let body = document.body().ok_or(SiteError::NoBody)?;
        let notice = document.create_element("div")?;
        notice.set_class_name("sr-only");
        notice.set_attribute("aria-live", "polite")?;
        notice.set_text_content(Some(&self.config.text.invalid_form_announcement));
        body.append_child(&notice)?;
        Ok(notice)
    }
}

/// Writes `validity` into the field's ARIA state and its group's feedback.
fn render_validity(control: &Control, validity: &Validity, has_content: bool) {
    let feedback = FieldFeedback::for_validity(validity, has_content);
    let html = control.html();
    let _ = match feedback.aria_invalid {
        Some(value) => html.set_attribute("aria-invalid", value),
        None => html.remove_attribute("aria-invalid"),
    };

    let Some(group) = control.group() else {
        return;
    };
    if let Some(error) = dom::query::<Element>(&group, ERROR_MESSAGE_SELECTOR) {
        error.set_text_content(Some(feedback.message));
        let _ = error.class_list().toggle_with_force("show", feedback.show_message);
    }
    let classes = group.class_list();
    let _ = classes.toggle_with_force("error", feedback.error);
    let _ = classes.toggle_with_force("success", feedback.success);
}

/// Loading state of the form and its submit control while a submission is in
/// flight.
struct BusyState {
    form: HtmlFormElement,
    button: Option<HtmlButtonElement>,
    swap: LoadingSwap,
}

impl BusyState {
    fn enter(form: &HtmlFormElement, sending_label: &str) -> Self {
        let button = dom::query::<HtmlButtonElement>(form, SUBMIT_BUTTON_SELECTOR);
        let idle = ControlState {
            loading: form.class_list().contains("loading"),
            disabled: button.as_ref().map_or(false, |b| b.disabled()),
            label: button.as_ref().and_then(|b| b.text_content()),
        };
        let (swap, busy) = LoadingSwap::enter(idle, sending_label);
        apply_control(form, button.as_ref(), &busy);
        Self {
            form: form.clone(),
            button,
            swap,
        }
    }

    fn leave(self) {
        let idle = self.swap.leave();
        apply_control(&self.form, self.button.as_ref(), &idle);
    }
}

fn apply_control(form: &HtmlFormElement, button: Option<&HtmlButtonElement>, state: &ControlState) {
    let _ = form.class_list().toggle_with_force("loading", state.loading);
    if let Some(button) = button {
        button.set_disabled(state.disabled);
        button.set_text_content(state.label.as_deref());
    }
}

/// The mounted contact form. Absent when the page has no contact form.
pub struct ContactForm {
    _state: Rc<FormState>,
    _listeners: Vec<Listener>,
}

impl ContactForm {
    pub fn mount(document: &Document, config: &SiteConfig) -> Result<Option<Self>, SiteError> {
        let Some(form) = dom::query_in_document::<HtmlFormElement>(document, FORM_SELECTOR) else {
            return Ok(None);
        };

        let fields: Vec<Field> = dom::query_all::<Element>(&form, FIELD_SELECTOR)
            .into_iter()
            .filter_map(Control::from_element)
            .map(|control| Field {
                name: control.name(),
                control,
                validity: RefCell::new(Validity::Unvalidated),
                debouncer: Debouncer::new(config.debounce_ms),
            })
            .collect();

        let transport = SubmitTransport::select(
            form.get_attribute("data-transport").as_deref(),
            &form.action(),
            config,
        );
        debug!("Contact form has {} fields, transport {:?}", fields.len(), transport);

        let state = Rc::new(FormState {
            form: form.clone(),
            fields,
            rules: RuleTable::contact_defaults(),
            transport,
            config: config.clone(),
        });

        let mut listeners = Vec::new();
        for (index, field) in state.fields.iter().enumerate() {
            if field.name == HONEYPOT_FIELD {
                continue;
            }
            let target = field.control.html();

            let weak = Rc::downgrade(&state);
            listeners.push(Listener::new(target, "blur", move |_| {
                if let Some(state) = weak.upgrade() {
                    state.validate_field(index);
                }
            })?);

            let weak = Rc::downgrade(&state);
            listeners.push(Listener::new(target, "input", move |_| {
                revalidate_if_erroneous(&weak, index);
            })?);
        }

        let weak = Rc::downgrade(&state);
        listeners.push(Listener::new(&form, "submit", move |event| {
            event.prevent_default();
            if let Some(state) = weak.upgrade() {
                state.submit();
            }
        })?);

        Ok(Some(Self {
            _state: state,
            _listeners: listeners,
        }))
    }
}

fn revalidate_if_erroneous(weak: &Weak<FormState>, index: usize) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let Some(field) = state.fields.get(index) else {
        return;
    };
    let erroneous = matches!(*field.validity.borrow(), Validity::Invalid(_));
    if !erroneous {
        return;
    }
    let weak = weak.clone();
    field.debouncer.schedule(move || {
        if let Some(state) = weak.upgrade() {
            state.validate_field(index);
        }
    });
}
