//! Form-control editing: char-offset splicing with `maxlength` and
//! type-specific coercion for number and time fields.

use crate::dom::{InputKind, NodeId};
use crate::event::{dispatch, EventInit, EventType, InputType};
use crate::session::Session;
use crate::state::ui::{clear_initial_value, get_ui_value, set_ui_selection, set_ui_value, UiSelection};

use super::event_data;

/// Outcome of splicing an edit into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub new_value: String,
    /// Caret position after the edit
    pub new_offset: usize,
}

/// Splice `data` into `value` at `selection`.
///
/// With a collapsed selection, backward and forward deletes remove the
/// char before or after the caret.
pub fn calculate_new_value(value: &str, data: &str, selection: UiSelection, input_type: InputType) -> EditResult {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();
    let start = selection.start().min(len);
    let end = selection.end().min(len);

    let prolog_end = if start == end && input_type == InputType::DeleteContentBackward {
        start.saturating_sub(1)
    } else {
        start
    };
    let epilog_start = if start == end && input_type == InputType::DeleteContentForward {
        (start + 1).min(len)
    } else {
        end
    };

    let mut new_value: String = chars[..prolog_end].iter().collect();
    new_value.push_str(data);
    new_value.extend(&chars[epilog_start..]);
    EditResult {
        new_value,
        new_offset: prolog_end + data.chars().count(),
    }
}

/// Whether a number field would display `value` while typing.
///
/// Allows digits, `.`, `e` and signs, with at most one sign per part, one
/// dot in the mantissa and no dot in the exponent.
pub fn is_valid_number_input(value: &str) -> bool {
    if value
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
    {
        return false;
    }
    let mut parts = value.split(['e', 'E']);
    let mantissa = parts.next().unwrap_or_default();
    let exponent = parts.next();
    if parts.next().is_some() {
        return false;
    }
    let signs = |s: &str| s.chars().filter(|c| matches!(c, '-' | '+')).count();
    let dots = |s: &str| s.chars().filter(|c| *c == '.').count();
    signs(mantissa) <= 1
        && dots(mantissa) <= 1
        && exponent.is_none_or(|e| signs(e) <= 1 && dots(e) == 0)
}

/// Group typed digits into `HH:MM`, clamping to 23:59.
///
/// Returns the input unchanged while there are not enough digits to decide.
pub fn build_time_value(value: &str) -> String {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 2 {
        return value.to_string();
    }
    let hour_digits = if digits[0] >= 3 {
        1
    } else if digits[0] == 2 && digits[1] >= 4 {
        2
    } else if value.chars().count() == 2 {
        return value.to_string();
    } else {
        2
    };
    let minute_digits = &digits[hour_digits..];
    if minute_digits.is_empty() {
        return value.to_string();
    }
    let number = |ds: &[u32]| ds.iter().fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(*d)));
    let hours = number(&digits[..hour_digits]).min(23);
    let minutes = number(minute_digits).min(59);
    format!("{hours:02}:{minutes:02}")
}

/// Edit a form control's value.
pub(super) fn edit_input_element(
    session: &mut Session,
    element: NodeId,
    selection: UiSelection,
    data: &str,
    input_type: InputType,
) {
    let doc = session.document().clone();
    let kind = doc.input_kind(element);
    let current = get_ui_value(&doc, element);

    let mut insert = data.to_string();
    if let Some(max) = doc.max_length(element) {
        if !data.is_empty() {
            let kept = current.chars().count() - (selection.end() - selection.start()).min(current.chars().count());
            let available = max.saturating_sub(kept);
            if available == 0 {
                return;
            }
            insert = data.chars().take(available).collect();
        }
    }

    let mut edit = calculate_new_value(&current, &insert, selection, input_type);
    if edit.new_value == current && edit.new_offset == selection.start() && edit.new_offset == selection.end() {
        return;
    }
    match kind {
        Some(InputKind::Number) if !is_valid_number_input(&edit.new_value) => return,
        Some(InputKind::Time) => {
            let built = build_time_value(&edit.new_value);
            if !built.is_empty() && doc.accepts_value(element, &built) {
                edit.new_offset = built.chars().count();
                edit.new_value = built;
            }
        }
        _ => {}
    }

    set_ui_value(&doc, element, &edit.new_value);
    set_ui_selection(&doc, element, edit.new_offset, edit.new_offset);

    if kind.is_some_and(InputKind::is_date_or_time) {
        // Date and time fields commit only complete values
        if !edit.new_value.is_empty() && doc.accepts_value(element, &edit.new_value) {
            dispatch(session, element, EventType::Input, EventInit::default());
            dispatch(session, element, EventType::Change, EventInit::default());
            clear_initial_value(&doc, element);
        }
    } else {
        let init = EventInit::input(input_type, event_data(data, input_type));
        dispatch(session, element, EventType::Input, init);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_selection() {
        let edit = calculate_new_value("hello", "J", UiSelection::new(0, 1), InputType::InsertText);
        assert_eq!(edit.new_value, "Jello");
        assert_eq!(edit.new_offset, 1);
    }

    #[test]
    fn test_collapsed_deletes() {
        let back = calculate_new_value("abc", "", UiSelection::caret(2), InputType::DeleteContentBackward);
        assert_eq!((back.new_value.as_str(), back.new_offset), ("ac", 1));
        let forward = calculate_new_value("abc", "", UiSelection::caret(2), InputType::DeleteContentForward);
        assert_eq!((forward.new_value.as_str(), forward.new_offset), ("ab", 2));
        let at_start = calculate_new_value("abc", "", UiSelection::caret(0), InputType::DeleteContentBackward);
        assert_eq!((at_start.new_value.as_str(), at_start.new_offset), ("abc", 0));
    }

    #[test]
    fn test_range_delete_ignores_direction() {
        let edit = calculate_new_value("abcdef", "", UiSelection::new(4, 1), InputType::DeleteContentBackward);
        assert_eq!((edit.new_value.as_str(), edit.new_offset), ("aef", 1));
    }

    #[test]
    fn test_multibyte_offsets() {
        let edit = calculate_new_value("héllo", "x", UiSelection::caret(2), InputType::InsertText);
        assert_eq!(edit.new_value, "héxllo");
        assert_eq!(edit.new_offset, 3);
    }

    #[test]
    fn test_number_input_validity() {
        for ok in ["", "1", "1e", "1e-", "1e-5", "-1.5", "+3", ".5", "1.e2"] {
            assert!(is_valid_number_input(ok), "{ok}");
        }
        for bad in ["1e--", "1..2", "1e1.5", "a", "1e2e3", "--1"] {
            assert!(!is_valid_number_input(bad), "{bad}");
        }
    }

    #[test]
    fn test_build_time_value() {
        assert_eq!(build_time_value("1"), "1");
        assert_eq!(build_time_value("12"), "12");
        assert_eq!(build_time_value("123"), "12:03");
        assert_eq!(build_time_value("12:034"), "12:34");
        assert_eq!(build_time_value("93"), "09:03");
        assert_eq!(build_time_value("2"), "2");
        assert_eq!(build_time_value("25"), "25");
        assert_eq!(build_time_value("257"), "23:07");
        assert_eq!(build_time_value("1299"), "12:59");
    }
}
