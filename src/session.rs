//! Session - Shared user state across chained calls
//!
//! A [`Session`] is the context every state machine step runs against: the
//! document, the immutable [`Config`] built once from [`Options`], the
//! keyboard and pointer state of the simulated user, and the clipboard.
//! Keys held and pointer positions carry over from one call to the next.
//!
//! Every top-level operation compiles its input into a list of [`Step`]s and
//! runs them in one of two modes:
//!
//! - async (`keyboard`, `pointer`, `type_text`): sleeps for `delay`
//!   milliseconds at every pause point when `delay > 0`
//! - sync (`*_sync`): runs the whole list inline; pauses are skipped
//!
//! Callers without a session use the free functions ([`keyboard`],
//! [`pointer`], ...), which run against a fresh single-use session.
//!
//! # Example
//!
//! ```ignore
//! use spark_user_event::{Options, PointerInput, Session};
//!
//! let mut session = Session::setup(&doc, Options::default());
//! session.pointer([PointerInput::keys("[MouseLeft]").target(input)]).await?;
//! session.keyboard("{Shift>}hello{/Shift}").await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::descriptor::parse_keyboard;
use crate::dom::{Document, NodeId};
use crate::edit;
use crate::error::{Error, Result};
use crate::event::{dispatch, BehaviorRegistry, EventInit, EventType, EventWrapper, InputType};
use crate::keyboard::{self, KeyMap, KeyStep, KeyboardState};
use crate::pointer::{self, PointerInput, PointerMap, PointerState, PointerStep};
use crate::state::focus::{blur_element, focus_element};
use crate::state::selection::{is_all_selected, select_all, selected_text};
use crate::state::ui::{prepare_document, set_ui_selection};

// =============================================================================
// OPTIONS
// =============================================================================

/// How often pointer interactions verify `pointer-events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PointerEventsCheck {
    /// Before every pointer step
    Always,
    /// Once per target, until any inline style changes
    EachTarget,
    /// Once per target within one API call
    #[default]
    EachApiCall,
    Never,
}

/// User-facing options. Loadable from JSON with camelCase keys.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Milliseconds to wait at each pause point; `None` or 0 never waits
    pub delay: Option<u64>,
    pub pointer_events_check: PointerEventsCheck,
    /// Press and release without hovering the target first
    pub skip_hover: bool,
    /// Keep legacy modifier aliases held at the end of a call
    pub skip_auto_close: bool,
    /// `None` takes the default of the call style
    pub write_to_clipboard: Option<bool>,
    /// Milliseconds after which a press starts a new click streak
    pub click_timeout: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delay: Some(0),
            pointer_events_check: PointerEventsCheck::default(),
            skip_hover: false,
            skip_auto_close: false,
            write_to_clipboard: None,
            click_timeout: None,
        }
    }
}

impl Options {
    fn delay(&self) -> Option<Duration> {
        self.delay.filter(|d| *d > 0).map(Duration::from_millis)
    }
}

/// Options for [`Session::type_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeOptions {
    /// Type into whatever has focus instead of clicking the element first
    pub skip_click: bool,
    /// Leave keys pressed when typing ends
    pub skip_auto_close: bool,
    /// Selection `(anchor, focus)` to place before typing
    pub initial_selection: Option<(usize, usize)>,
}

// =============================================================================
// CONFIG
// =============================================================================

/// Immutable configuration of a session, resolved once at construction.
#[derive(Clone)]
pub struct Config {
    pub options: Options,
    pub behaviors: BehaviorRegistry,
    pub key_map: Rc<KeyMap>,
    pub pointer_map: Rc<PointerMap>,
    pub event_wrapper: Option<EventWrapper>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("options", &self.options)
            .field("behaviors", &self.behaviors)
            .field("keys", &self.key_map.len())
            .field("event_wrapper", &self.event_wrapper.is_some())
            .finish()
    }
}

/// Build a config with the standard behaviors and US key layout.
pub fn create_config(options: Options) -> Config {
    Config {
        options,
        behaviors: BehaviorRegistry::default(),
        key_map: Rc::new(KeyMap::default()),
        pointer_map: Rc::new(PointerMap::default()),
        event_wrapper: None,
    }
}

// =============================================================================
// STEPS
// =============================================================================

/// One unit of work of a top-level call.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Suspension point: the async mode waits `delay` here
    Pause,
    Key(KeyStep),
    Pointer(PointerStep),
    /// Place a selection in a form control or editing host
    Select { element: NodeId, anchor: usize, focus: usize },
    /// Release held keys; all of them, or only those marked auto-release
    ReleaseKeys { all: bool },
}

// =============================================================================
// SESSION
// =============================================================================

/// Keyboard and pointer state of the simulated user.
#[derive(Debug, Clone, Default)]
pub struct System {
    pub keyboard: KeyboardState,
    pub pointer: PointerState,
}

/// Bookkeeping of the current top-level call.
#[derive(Debug, Default)]
struct CallState {
    id: u64,
    /// Targets that passed the pointer-events check: `(call id, style generation)`
    checked: HashMap<NodeId, (u64, u64)>,
}

/// A simulated user acting on one document.
pub struct Session {
    document: Document,
    config: Config,
    system: System,
    clipboard: Option<Box<dyn Clipboard>>,
    call: CallState,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("system", &self.system)
            .field("clipboard", &self.clipboard.is_some())
            .finish()
    }
}

impl Session {
    /// Reusable session with an in-memory clipboard; copies write to it
    /// unless `write_to_clipboard` is `Some(false)`.
    pub fn setup(document: &Document, options: Options) -> Self {
        Self::with_config(document, create_config(options))
    }

    /// Session for one direct call. Has no clipboard and does not write
    /// to one unless asked.
    pub fn direct(document: &Document, mut options: Options) -> Self {
        options.write_to_clipboard.get_or_insert(false);
        let mut session = Self::with_config(document, create_config(options));
        session.clipboard = None;
        session
    }

    pub fn with_config(document: &Document, mut config: Config) -> Self {
        prepare_document(document);
        config.options.write_to_clipboard.get_or_insert(true);
        Self {
            document: document.clone(),
            config,
            system: System::default(),
            clipboard: Some(Box::new(MemoryClipboard::new())),
            call: CallState::default(),
        }
    }

    /// Replace the clipboard.
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn keyboard_state(&self) -> &KeyboardState {
        &self.system.keyboard
    }

    pub(crate) fn keyboard_state_mut(&mut self) -> &mut KeyboardState {
        &mut self.system.keyboard
    }

    pub fn pointer_state(&self) -> &PointerState {
        &self.system.pointer
    }

    pub(crate) fn pointer_state_mut(&mut self) -> &mut PointerState {
        &mut self.system.pointer
    }

    pub fn clipboard(&self) -> Option<&dyn Clipboard> {
        self.clipboard.as_deref()
    }

    pub(crate) fn call_id(&self) -> u64 {
        self.call.id
    }

    pub(crate) fn pointer_checks(&mut self) -> &mut HashMap<NodeId, (u64, u64)> {
        &mut self.call.checked
    }

    fn begin_call(&mut self, operation: &str) {
        self.call.id += 1;
        self.call
            .checked
            .retain(|node, _| self.document.is_alive(*node));
        debug!(operation, call = self.call.id, "user-event call");
    }

    /// Click streaks never span top-level pointer calls.
    fn end_pointer_call(&mut self) {
        self.system.pointer.reset_click_count();
    }

    // -------------------------------------------------------------------------
    // Step interpreter
    // -------------------------------------------------------------------------

    fn execute(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Pause => {}
            Step::Key(step) => keyboard::run_step(self, step),
            Step::Pointer(step) => pointer::pointer_action(self, step)?,
            Step::Select { element, anchor, focus } => {
                set_ui_selection(&self.document, *element, *anchor, *focus)
            }
            Step::ReleaseKeys { all } => keyboard::release_keys(self, *all),
        }
        Ok(())
    }

    /// Run steps, waiting `delay` at every pause.
    pub async fn run(&mut self, steps: &[Step]) -> Result<()> {
        let delay = self.config.options.delay();
        for step in steps {
            match (step, delay) {
                (Step::Pause, Some(delay)) => tokio::time::sleep(delay).await,
                _ => self.execute(step)?,
            }
        }
        Ok(())
    }

    /// Run steps inline. Pauses are skipped even when a delay is set.
    pub fn run_sync(&mut self, steps: &[Step]) -> Result<()> {
        if let Some(delay) = self.config.options.delay() {
            warn!(?delay, "synchronous call ignores the configured delay");
        }
        for step in steps {
            self.execute(step)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    fn keyboard_steps(&mut self, text: &str) -> Result<Vec<Step>> {
        self.begin_call("keyboard");
        let actions = parse_keyboard(text, &self.config.key_map)?;
        let mut steps = keyboard::expand(&actions);
        if !self.config.options.skip_auto_close {
            steps.push(Step::ReleaseKeys { all: false });
        }
        Ok(steps)
    }

    /// Type a key descriptor string into the focused element.
    pub async fn keyboard(&mut self, text: &str) -> Result<()> {
        let steps = self.keyboard_steps(text)?;
        self.run(&steps).await
    }

    pub fn keyboard_sync(&mut self, text: &str) -> Result<()> {
        let steps = self.keyboard_steps(text)?;
        self.run_sync(&steps)
    }

    // -------------------------------------------------------------------------
    // Pointer
    // -------------------------------------------------------------------------

    fn pointer_steps<I>(&mut self, inputs: I) -> Result<Vec<Step>>
    where
        I: IntoIterator,
        I::Item: Into<PointerInput>,
    {
        self.begin_call("pointer");
        let inputs: Vec<PointerInput> = inputs.into_iter().map(Into::into).collect();
        pointer::expand(&inputs, &self.config.pointer_map)
    }

    /// Run pointer inputs: button descriptors like `"[MouseLeft]"` or moves.
    pub async fn pointer<I>(&mut self, inputs: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<PointerInput>,
    {
        let steps = self.pointer_steps(inputs)?;
        let result = self.run(&steps).await;
        self.end_pointer_call();
        result
    }

    pub fn pointer_sync<I>(&mut self, inputs: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<PointerInput>,
    {
        let steps = self.pointer_steps(inputs)?;
        let result = self.run_sync(&steps);
        self.end_pointer_call();
        result
    }

    // -------------------------------------------------------------------------
    // Typing
    // -------------------------------------------------------------------------

    fn type_steps(&mut self, element: NodeId, text: &str, options: &TypeOptions) -> Result<Vec<Step>> {
        self.begin_call("type");
        let mut steps = Vec::new();
        if !options.skip_click {
            let click = [PointerInput::keys("[MouseLeft]").target(element)];
            steps.extend(pointer::expand(&click, &self.config.pointer_map)?);
        }
        if let Some((anchor, focus)) = options.initial_selection {
            steps.push(Step::Select { element, anchor, focus });
        }
        let actions = parse_keyboard(text, &self.config.key_map)?;
        if !steps.is_empty() && !actions.is_empty() {
            steps.push(Step::Pause);
        }
        steps.extend(keyboard::expand(&actions));
        if !options.skip_auto_close {
            steps.push(Step::ReleaseKeys { all: true });
        }
        Ok(steps)
    }

    /// Click `element`, then type `text` into it.
    pub async fn type_text(&mut self, element: NodeId, text: &str, options: TypeOptions) -> Result<()> {
        let steps = self.type_steps(element, text, &options)?;
        let result = self.run(&steps).await;
        self.end_pointer_call();
        result
    }

    pub fn type_text_sync(&mut self, element: NodeId, text: &str, options: TypeOptions) -> Result<()> {
        let steps = self.type_steps(element, text, &options)?;
        let result = self.run_sync(&steps);
        self.end_pointer_call();
        result
    }

    /// Select the whole content of an editable element and delete it.
    pub fn clear(&mut self, element: NodeId) -> Result<()> {
        self.begin_call("clear");
        let doc = self.document.clone();
        if !doc.is_editable(element) || doc.is_disabled(element) {
            return Err(Error::UnsupportedOperation(
                "`clear()` is only supported on editable elements.".to_string(),
            ));
        }
        focus_element(self, element);
        if doc.active_element() != element {
            return Err(Error::Focus("The element to be cleared could not be focused.".to_string()));
        }
        select_all(&doc, element);
        if !is_all_selected(&doc, element) {
            return Err(Error::Focus(
                "The element content to be cleared could not be selected.".to_string(),
            ));
        }
        edit::input(self, element, "", InputType::DeleteContentBackward);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Clipboard
    // -------------------------------------------------------------------------

    fn clipboard_target(&self) -> NodeId {
        self.document.active_element()
    }

    fn write_clipboard(&self, text: &str) -> Result<()> {
        if self.config.options.write_to_clipboard != Some(true) {
            return Ok(());
        }
        let clipboard = self.clipboard.as_deref().ok_or_else(|| {
            Error::UnsupportedOperation("Writing to the clipboard requires a clipboard.".to_string())
        })?;
        clipboard.write_text(text);
        Ok(())
    }

    /// Fire `copy` or `cut` with the selected text and write it to the
    /// clipboard unless prevented. `None` when nothing is selected.
    fn copy_selection(&mut self, event_type: EventType) -> Result<Option<String>> {
        self.begin_call(event_type.name());
        let target = self.clipboard_target();
        let Some(text) = selected_text(&self.document, target) else {
            return Ok(None);
        };
        let init = EventInit {
            clipboard_data: Some(text.clone()),
            ..EventInit::default()
        };
        if dispatch(self, target, event_type, init) {
            self.write_clipboard(&text)?;
        }
        Ok(Some(text))
    }

    pub fn copy(&mut self) -> Result<Option<String>> {
        self.copy_selection(EventType::Copy)
    }

    /// Copy, then remove the selection from an editable target.
    pub fn cut(&mut self) -> Result<Option<String>> {
        self.copy_selection(EventType::Cut)
    }

    /// Fire `paste` with `data`, or the clipboard text when `None`.
    pub fn paste(&mut self, data: Option<&str>) -> Result<()> {
        self.begin_call("paste");
        let data = match data {
            Some(data) => Some(data.to_string()),
            None => self
                .clipboard
                .as_deref()
                .ok_or_else(|| {
                    Error::UnsupportedOperation("paste() without data requires a clipboard.".to_string())
                })?
                .read_text(),
        };
        let target = self.clipboard_target();
        let init = EventInit {
            clipboard_data: data,
            ..EventInit::default()
        };
        dispatch(self, target, EventType::Paste, init);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Direct primitives
    // -------------------------------------------------------------------------

    /// Fire one event through the pipeline. `false` if prevented.
    pub fn dispatch(&mut self, target: NodeId, event_type: EventType, init: EventInit) -> bool {
        dispatch(self, target, event_type, init)
    }

    pub fn input(&mut self, element: NodeId, data: &str, input_type: InputType) {
        edit::input(self, element, data, input_type)
    }

    pub fn focus(&mut self, element: NodeId) {
        focus_element(self, element)
    }

    pub fn blur(&mut self, element: NodeId) {
        blur_element(self, element)
    }
}

// =============================================================================
// ONE-SHOT CALLS
// =============================================================================

/// Type into `document` with a fresh session.
pub async fn keyboard(document: &Document, text: &str, options: Options) -> Result<()> {
    Session::direct(document, options).keyboard(text).await
}

pub fn keyboard_sync(document: &Document, text: &str, options: Options) -> Result<()> {
    Session::direct(document, options).keyboard_sync(text)
}

/// Run pointer inputs on `document` with a fresh session.
pub async fn pointer<I>(document: &Document, inputs: I, options: Options) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<PointerInput>,
{
    Session::direct(document, options).pointer(inputs).await
}

pub fn pointer_sync<I>(document: &Document, inputs: I, options: Options) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<PointerInput>,
{
    Session::direct(document, options).pointer_sync(inputs)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ui::{get_ui_selection, get_ui_value, UiSelection};
    use std::cell::RefCell;

    fn setup() -> (Document, Session, NodeId) {
        let doc = Document::new();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input);
        let session = Session::setup(&doc, Options::default());
        (doc, session, input)
    }

    fn record(doc: &Document, node: NodeId, types: &[EventType]) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for ty in types {
            let sink = log.clone();
            doc.add_event_listener(node, *ty, move |_, e| sink.borrow_mut().push(e.event_type.name().to_string()));
        }
        log
    }

    #[test]
    fn test_options_defaults() {
        let options = Options::default();
        assert_eq!(options.delay, Some(0));
        assert_eq!(options.pointer_events_check, PointerEventsCheck::EachApiCall);
        assert!(!options.skip_hover);
        assert!(!options.skip_auto_close);
    }

    #[test]
    fn test_write_to_clipboard_default_per_call_style() {
        let doc = Document::new();
        let setup = Session::setup(&doc, Options::default());
        assert_eq!(setup.config().options.write_to_clipboard, Some(true));
        assert!(setup.clipboard().is_some());

        let direct = Session::direct(&doc, Options::default());
        assert_eq!(direct.config().options.write_to_clipboard, Some(false));
        assert!(direct.clipboard().is_none());
    }

    #[test]
    fn test_state_carries_over_calls() {
        let (doc, mut session, input) = setup();
        session.focus(input);
        session.keyboard_sync("{Shift>}").unwrap();
        session.keyboard_sync("a").unwrap();
        assert!(session.keyboard_state().modifiers().shift());
        session.keyboard_sync("{/Shift}b").unwrap();
        assert_eq!(doc.value(input), "ab");
        assert!(session.keyboard_state().pressed().is_empty());
    }

    #[test]
    fn test_skip_auto_close_keeps_alias_held() {
        let doc = Document::new();
        let mut session = Session::setup(
            &doc,
            Options {
                skip_auto_close: true,
                ..Options::default()
            },
        );
        session.keyboard_sync("{ctrl}").unwrap();
        assert!(session.keyboard_state().modifiers().ctrl());
    }

    #[test]
    fn test_parse_error_runs_nothing() {
        let (doc, mut session, input) = setup();
        session.focus(input);
        let err = session.keyboard_sync("ab{c").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(doc.value(input), "");
    }

    #[test]
    fn test_type_text_clicks_then_types() {
        let (doc, mut session, input) = setup();
        let log = record(&doc, input, &[EventType::Click, EventType::Focus, EventType::Keydown]);
        session.type_text_sync(input, "hi", TypeOptions::default()).unwrap();
        assert_eq!(*log.borrow(), vec!["focus", "click", "keydown", "keydown"]);
        assert_eq!(doc.value(input), "hi");
    }

    #[test]
    fn test_type_text_initial_selection() {
        let (doc, mut session, input) = setup();
        doc.set_value(input, "ac");
        session
            .type_text_sync(
                input,
                "b",
                TypeOptions {
                    initial_selection: Some((1, 1)),
                    ..TypeOptions::default()
                },
            )
            .unwrap();
        assert_eq!(get_ui_value(&doc, input), "abc");
        assert_eq!(get_ui_selection(&doc, input), UiSelection::caret(2));
    }

    #[test]
    fn test_clear() {
        let (doc, mut session, input) = setup();
        doc.set_value(input, "hello");
        let log = record(&doc, input, &[EventType::Beforeinput, EventType::Input]);
        session.clear(input).unwrap();
        assert_eq!(doc.value(input), "");
        assert_eq!(*log.borrow(), vec!["beforeinput", "input"]);
    }

    #[test]
    fn test_prevented_beforeinput_blocks_edit() {
        let (doc, mut session, input) = setup();
        session.focus(input);
        doc.add_event_listener(input, EventType::Beforeinput, |_, e| e.prevent_default());
        let log = record(&doc, input, &[EventType::Input]);

        session.keyboard_sync("ab").unwrap();
        assert_eq!(doc.value(input), "");
        assert_eq!(get_ui_value(&doc, input), "");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_clear_errors() {
        let (doc, mut session, input) = setup();
        let div = doc.create_element("div");
        doc.append_child(doc.body(), div);
        assert!(matches!(session.clear(div), Err(Error::UnsupportedOperation(_))));

        doc.set_attribute(input, "disabled", "");
        assert!(matches!(session.clear(input), Err(Error::UnsupportedOperation(_))));
    }

    #[test]
    fn test_copy_cut_paste() {
        let (doc, mut session, input) = setup();
        let clipboard = MemoryClipboard::new();
        session = session.with_clipboard(clipboard.clone());
        doc.set_value(input, "hello world");
        session.focus(input);
        set_ui_selection(&doc, input, 0, 5);

        assert_eq!(session.copy().unwrap(), Some("hello".to_string()));
        assert_eq!(clipboard.read_text(), Some("hello".to_string()));
        assert_eq!(doc.value(input), "hello world");

        assert_eq!(session.cut().unwrap(), Some("hello".to_string()));
        assert_eq!(doc.value(input), " world");

        set_ui_selection(&doc, input, 6, 6);
        session.paste(None).unwrap();
        assert_eq!(doc.value(input), " worldhello");
        session.paste(Some("!")).unwrap();
        assert_eq!(doc.value(input), " worldhello!");
    }

    #[test]
    fn test_prevented_copy_leaves_clipboard() {
        let (doc, mut session, input) = setup();
        let clipboard = MemoryClipboard::with_text("before");
        session = session.with_clipboard(clipboard.clone());
        doc.set_value(input, "abc");
        session.focus(input);
        set_ui_selection(&doc, input, 0, 3);
        doc.add_event_listener(input, EventType::Copy, |_, e| e.prevent_default());
        assert_eq!(session.copy().unwrap(), Some("abc".to_string()));
        assert_eq!(clipboard.read_text(), Some("before".to_string()));
    }

    #[test]
    fn test_direct_paste_without_data_fails() {
        let doc = Document::new();
        let mut session = Session::direct(&doc, Options::default());
        assert!(matches!(session.paste(None), Err(Error::UnsupportedOperation(_))));
        assert!(session.paste(Some("x")).is_ok());
    }

    #[test]
    fn test_one_shot_sessions_do_not_share_state() {
        let doc = Document::new();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input);
        let mut session = Session::setup(&doc, Options::default());
        session.focus(input);
        keyboard_sync(&doc, "{Shift>}", Options::default()).unwrap();
        keyboard_sync(&doc, "a", Options::default()).unwrap();
        assert_eq!(doc.value(input), "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_delay_between_steps() {
        let (doc, _session, input) = setup();
        let mut session = Session::setup(
            &doc,
            Options {
                delay: Some(50),
                ..Options::default()
            },
        );
        session.focus(input);
        let start = tokio::time::Instant::now();
        session.keyboard("abc").await.unwrap();
        assert_eq!(doc.value(input), "abc");
        // Two pauses: between a/b and b/c
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn test_sync_ignores_delay() {
        let doc = Document::new();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input);
        let mut session = Session::setup(
            &doc,
            Options {
                delay: Some(1_000),
                ..Options::default()
            },
        );
        session.focus(input);
        session.keyboard_sync("ab").unwrap();
        assert_eq!(doc.value(input), "ab");
    }
}
