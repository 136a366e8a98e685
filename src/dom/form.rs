//! Form-control properties of the host document.
//!
//! Value with HTML sanitization, checkedness, selection ranges and the
//! predicates the interaction engine asks about elements (disabled,
//! editable, focusable, ...).

use super::{Document, NodeId};

// =============================================================================
// INPUT KIND
// =============================================================================

/// The `type` of an `<input>` element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Search,
    Url,
    Tel,
    Email,
    Password,
    Number,
    Date,
    Time,
    Checkbox,
    Radio,
    Submit,
    Reset,
    Button,
    Image,
    Color,
    File,
    Hidden,
}

impl InputKind {
    /// Parse a `type` attribute. Unknown types fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "search" => Self::Search,
            "url" => Self::Url,
            "tel" => Self::Tel,
            "email" => Self::Email,
            "password" => Self::Password,
            "number" => Self::Number,
            "date" => Self::Date,
            "time" => Self::Time,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "button" => Self::Button,
            "image" => Self::Image,
            "color" => Self::Color,
            "file" => Self::File,
            "hidden" => Self::Hidden,
            _ => Self::Text,
        }
    }

    /// Kinds that expose `selectionStart`/`selectionEnd`.
    pub fn has_selection(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Search | Self::Url | Self::Tel | Self::Password
        )
    }

    /// Kinds honouring the `maxlength` attribute.
    pub fn supports_max_length(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Search | Self::Url | Self::Tel | Self::Email | Self::Password
        )
    }

    /// Kinds that accept typed text.
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Search
                | Self::Url
                | Self::Tel
                | Self::Email
                | Self::Password
                | Self::Number
                | Self::Date
                | Self::Time
        )
    }

    pub fn is_date_or_time(self) -> bool {
        matches!(self, Self::Date | Self::Time)
    }

    /// Kinds whose sanitizer turns an incomplete value into `""`.
    pub fn rejects_invalid(self) -> bool {
        matches!(self, Self::Number | Self::Date | Self::Time)
    }

    /// Kinds activated by a click from Enter or Space.
    pub fn is_clickable(self) -> bool {
        matches!(
            self,
            Self::Button
                | Self::Color
                | Self::File
                | Self::Image
                | Self::Reset
                | Self::Submit
                | Self::Checkbox
                | Self::Radio
        )
    }
}

// =============================================================================
// SANITIZATION
// =============================================================================

/// Apply the value sanitization algorithm of an input kind.
pub(crate) fn sanitize(kind: InputKind, value: &str) -> String {
    match kind {
        InputKind::Number => {
            if is_valid_float(value) {
                value.to_string()
            } else {
                String::new()
            }
        }
        InputKind::Date => {
            if is_valid_date(value) {
                value.to_string()
            } else {
                String::new()
            }
        }
        InputKind::Time => {
            if is_valid_time(value) {
                value.to_string()
            } else {
                String::new()
            }
        }
        InputKind::Email | InputKind::Url => strip_newlines(value).trim().to_string(),
        InputKind::Color => {
            let lower = value.to_ascii_lowercase();
            let valid = lower.len() == 7
                && lower.starts_with('#')
                && lower[1..].chars().all(|c| c.is_ascii_hexdigit());
            if valid { lower } else { "#000000".to_string() }
        }
        _ => strip_newlines(value),
    }
}

fn strip_newlines(value: &str) -> String {
    value.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// HTML "valid floating-point number".
pub(crate) fn is_valid_float(value: &str) -> bool {
    let rest = value.strip_prefix('-').unwrap_or(value);
    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(at) => (&rest[..at], Some(&rest[at + 1..])),
        None => (rest, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (mantissa, None),
    };
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let mantissa_ok = match frac_part {
        Some(frac) => digits(frac) && (int_part.is_empty() || digits(int_part)),
        None => digits(int_part),
    };
    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['-', '+']).unwrap_or(e);
        digits(e)
    });
    mantissa_ok && exponent_ok
}

/// `YYYY-MM-DD` with a real calendar day.
pub(crate) fn is_valid_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return false;
    };
    let numeric = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_digit());
    if !(year.len() >= 4 && numeric(year, year.len()) && numeric(month, 2) && numeric(day, 2)) {
        return false;
    }
    let (Ok(year), Ok(month), Ok(day)) = (year.parse::<u32>(), month.parse::<u32>(), day.parse::<u32>())
    else {
        return false;
    };
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };
    year > 0 && (1..=days_in_month).contains(&day)
}

/// `HH:MM`, `HH:MM:SS` or `HH:MM:SS.fff`.
pub(crate) fn is_valid_time(value: &str) -> bool {
    let two_digits = |s: &str, max: u32| {
        s.len() == 2 && s.chars().all(|c| c.is_ascii_digit()) && s.parse::<u32>().is_ok_and(|n| n <= max)
    };
    let mut parts = value.splitn(3, ':');
    let (Some(hours), Some(minutes)) = (parts.next(), parts.next()) else {
        return false;
    };
    if !two_digits(hours, 23) || !two_digits(minutes, 59) {
        return false;
    }
    match parts.next() {
        None => true,
        Some(seconds) => {
            let (whole, fraction) = match seconds.split_once('.') {
                Some((whole, fraction)) => (whole, Some(fraction)),
                None => (seconds, None),
            };
            two_digits(whole, 59)
                && fraction.is_none_or(|f| {
                    (1..=3).contains(&f.len()) && f.chars().all(|c| c.is_ascii_digit())
                })
        }
    }
}

// =============================================================================
// FORM CONTROL STATE
// =============================================================================

impl Document {
    /// The kind of an `<input>`, `None` for anything else.
    pub fn input_kind(&self, node: NodeId) -> Option<InputKind> {
        if !self.is_tag(node, "input") {
            return None;
        }
        Some(
            self.attribute(node, "type")
                .map(|t| InputKind::parse(&t))
                .unwrap_or(InputKind::Text),
        )
    }

    pub fn is_input_of(&self, node: NodeId, kind: InputKind) -> bool {
        self.input_kind(node) == Some(kind)
    }

    /// `<input>` or `<textarea>`.
    pub fn is_value_control(&self, node: NodeId) -> bool {
        self.is_tag(node, "input") || self.is_tag(node, "textarea")
    }

    /// Current value of a form control.
    ///
    /// Inputs fall back to the sanitized `value` attribute until the value
    /// is set; textareas fall back to their text content.
    pub fn value(&self, node: NodeId) -> String {
        if let Some(dirty) = self.with_element(node, |e| e.value.clone()).flatten() {
            return dirty;
        }
        if self.is_tag(node, "textarea") {
            return self.text_content(node);
        }
        let raw = self.attribute(node, "value").unwrap_or_default();
        match self.input_kind(node) {
            Some(kind) => sanitize(kind, &raw),
            None => raw,
        }
    }

    /// Set the value of a form control as a script would.
    ///
    /// The value is sanitized; when it changes, the caret moves to the end.
    pub fn set_value(&self, node: NodeId, value: &str) {
        let sanitized = match self.input_kind(node) {
            Some(kind) => sanitize(kind, value),
            None => value.to_string(),
        };
        let old = self.value(node);
        let len = sanitized.chars().count();
        self.with_element_mut(node, |e| {
            e.value = Some(sanitized.clone());
            if old != sanitized {
                e.selection = Some((len, len));
            }
        });
    }

    /// Whether `value` survives sanitization unchanged.
    pub fn accepts_value(&self, node: NodeId, value: &str) -> bool {
        match self.input_kind(node) {
            Some(kind) => sanitize(kind, value) == value,
            None => true,
        }
    }

    /// Checkedness of a checkbox or radio.
    pub fn checked(&self, node: NodeId) -> bool {
        self.with_element(node, |e| e.checked)
            .flatten()
            .unwrap_or_else(|| self.has_attribute(node, "checked"))
    }

    /// Set checkedness. Checking a radio unchecks the rest of its group.
    pub fn set_checked(&self, node: NodeId, checked: bool) {
        if checked && self.is_input_of(node, InputKind::Radio) {
            for other in self.radio_group(node) {
                if other != node {
                    self.with_element_mut(other, |e| e.checked = Some(false));
                }
            }
        }
        self.with_element_mut(node, |e| e.checked = Some(checked));
    }

    /// Whether the element exposes a native selection range.
    pub fn supports_selection(&self, node: NodeId) -> bool {
        self.is_tag(node, "textarea") || self.input_kind(node).is_some_and(InputKind::has_selection)
    }

    /// `(selectionStart, selectionEnd)`, `None` when unsupported.
    pub fn selection_range(&self, node: NodeId) -> Option<(usize, usize)> {
        if !self.supports_selection(node) {
            return None;
        }
        let len = self.value(node).chars().count();
        let stored = self.with_element(node, |e| e.selection).flatten();
        let (start, end) = stored.unwrap_or((len, len));
        Some((start.min(len), end.min(len)))
    }

    /// Set the native selection. Returns `false` when unsupported.
    pub fn set_selection_range(&self, node: NodeId, start: usize, end: usize) -> bool {
        if !self.supports_selection(node) {
            return false;
        }
        let len = self.value(node).chars().count();
        let end = end.min(len);
        let start = start.min(end);
        self.with_element_mut(node, |e| e.selection = Some((start, end)));
        true
    }

    // -------------------------------------------------------------------------
    // Predicates
    // -------------------------------------------------------------------------

    pub fn supports_max_length(&self, node: NodeId) -> bool {
        self.is_tag(node, "textarea") || self.input_kind(node).is_some_and(InputKind::supports_max_length)
    }

    /// Parsed `maxlength`, ignoring invalid values.
    pub fn max_length(&self, node: NodeId) -> Option<usize> {
        if !self.supports_max_length(node) {
            return None;
        }
        self.attribute(node, "maxlength")?.trim().parse().ok()
    }

    /// Disabled form control, directly or through a disabled `<fieldset>`.
    pub fn is_disabled(&self, node: NodeId) -> bool {
        const DISABLEABLE: [&str; 6] = ["button", "input", "select", "textarea", "fieldset", "option"];
        let tag = self.tag_name(node);
        if !DISABLEABLE.contains(&tag.as_str()) {
            return false;
        }
        if self.has_attribute(node, "disabled") {
            return true;
        }
        self.ancestors(node)
            .into_iter()
            .skip(1)
            .any(|a| self.is_tag(a, "fieldset") && self.has_attribute(a, "disabled"))
    }

    pub fn is_readonly(&self, node: NodeId) -> bool {
        self.is_value_control(node) && self.has_attribute(node, "readonly")
    }

    /// Inherited `contenteditable` state.
    pub fn is_content_editable(&self, node: NodeId) -> bool {
        for ancestor in self.ancestors(node) {
            match self.attribute(ancestor, "contenteditable").as_deref() {
                Some("" | "true" | "plaintext-only") => return true,
                Some("false") => return false,
                _ => {}
            }
        }
        false
    }

    /// Outermost element of the editable region containing `node`.
    pub fn editing_host(&self, node: NodeId) -> Option<NodeId> {
        if !self.is_content_editable(node) {
            return None;
        }
        let mut host = None;
        for ancestor in self.ancestors(node) {
            if self.is_element(ancestor) && self.is_content_editable(ancestor) {
                host = Some(ancestor);
            } else if self.is_element(ancestor) {
                break;
            }
        }
        host
    }

    /// Form control that accepts typed text right now.
    pub fn is_editable_input(&self, node: NodeId) -> bool {
        let kind_ok = self.is_tag(node, "textarea") || self.input_kind(node).is_some_and(InputKind::is_text_entry);
        kind_ok && !self.is_readonly(node) && !self.is_disabled(node)
    }

    pub fn is_editable(&self, node: NodeId) -> bool {
        self.is_editable_input(node) || self.is_content_editable(node)
    }

    /// Whether focus can land on the element.
    pub fn is_focusable(&self, node: NodeId) -> bool {
        if !self.is_element(node) || self.is_disabled(node) {
            return false;
        }
        if self.has_attribute(node, "tabindex") {
            return true;
        }
        match self.tag_name(node).as_str() {
            "input" => !self.is_input_of(node, InputKind::Hidden),
            "textarea" | "select" | "button" | "iframe" => true,
            "a" | "area" => self.has_attribute(node, "href"),
            _ => self.editing_host(node) == Some(node),
        }
    }

    /// Effective tab index; `-1` for elements outside sequential navigation.
    pub fn tab_index(&self, node: NodeId) -> i32 {
        if let Some(value) = self.attribute(node, "tabindex").and_then(|t| t.trim().parse().ok()) {
            return value;
        }
        if self.is_focusable(node) { 0 } else { -1 }
    }

    // -------------------------------------------------------------------------
    // Relations
    // -------------------------------------------------------------------------

    /// The form a control belongs to.
    pub fn form_owner(&self, node: NodeId) -> Option<NodeId> {
        if let Some(id) = self.attribute(node, "form") {
            return self.get_element_by_id(&id).filter(|f| self.is_tag(*f, "form"));
        }
        self.ancestors(node)
            .into_iter()
            .skip(1)
            .find(|a| self.is_tag(*a, "form"))
    }

    /// Controls associated with a form, in tree order.
    pub fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        let root = self.root();
        self.descendants(root)
            .into_iter()
            .filter(|n| {
                ["input", "textarea", "select", "button"].contains(&self.tag_name(*n).as_str())
                    && self.form_owner(*n) == Some(form)
            })
            .collect()
    }

    /// The control a `<label>` activates.
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        if !self.is_tag(label, "label") {
            return None;
        }
        if let Some(id) = self.attribute(label, "for") {
            return self.get_element_by_id(&id).filter(|c| self.is_labelable(*c));
        }
        self.descendants(label)
            .into_iter()
            .find(|c| self.is_labelable(*c))
    }

    fn is_labelable(&self, node: NodeId) -> bool {
        match self.tag_name(node).as_str() {
            "input" => !self.is_input_of(node, InputKind::Hidden),
            "textarea" | "select" | "button" => true,
            _ => false,
        }
    }

    /// Radios sharing a name and form owner with `radio`, in tree order.
    pub fn radio_group(&self, radio: NodeId) -> Vec<NodeId> {
        if !self.is_input_of(radio, InputKind::Radio) {
            return Vec::new();
        }
        let name = self.attribute(radio, "name").unwrap_or_default();
        if name.is_empty() {
            return vec![radio];
        }
        let owner = self.form_owner(radio);
        let root = self.root();
        self.descendants(root)
            .into_iter()
            .filter(|n| {
                self.is_input_of(*n, InputKind::Radio)
                    && self.attribute(*n, "name").as_deref() == Some(name.as_str())
                    && self.form_owner(*n) == owner
            })
            .collect()
    }

    /// `<button>` or `<input>` that submits its form.
    pub fn is_submit_button(&self, node: NodeId) -> bool {
        if self.is_tag(node, "button") {
            return self
                .attribute(node, "type")
                .is_none_or(|t| t.eq_ignore_ascii_case("submit"));
        }
        self.is_input_of(node, InputKind::Submit) || self.is_input_of(node, InputKind::Image)
    }

    pub fn is_reset_button(&self, node: NodeId) -> bool {
        if self.is_tag(node, "button") {
            return self
                .attribute(node, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("reset"));
        }
        self.is_input_of(node, InputKind::Reset)
    }

    /// Restore every control of a form to its default value and checkedness.
    pub fn reset_form(&self, form: NodeId) {
        for control in self.form_controls(form) {
            self.with_element_mut(control, |e| {
                e.value = None;
                e.checked = None;
                e.selection = None;
            });
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
