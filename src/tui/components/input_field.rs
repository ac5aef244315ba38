//! Text input field component
//!
//! The field is controlled: edits never write to `value` directly. Each edit
//! reports the would-be value through the change handler and a returned
//! [`FieldAction::Changed`]; the owner applies it with [`InputField::set_value`].

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Modifier,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::error::FormgridError;
use crate::tui::{
    traits::Component,
    ui::{self, Spinner, Styles},
};

const MASK_CHAR: char = '•';

/// Visual variant of the input box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputVariant {
    Filled,
    #[default]
    Outlined,
    Ghost,
}

impl InputVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputVariant::Filled => "filled",
            InputVariant::Outlined => "outlined",
            InputVariant::Ghost => "ghost",
        }
    }

    /// Next variant, wrapping around
    pub fn next(self) -> Self {
        match self {
            InputVariant::Filled => InputVariant::Outlined,
            InputVariant::Outlined => InputVariant::Ghost,
            InputVariant::Ghost => InputVariant::Filled,
        }
    }

    fn border_type(&self) -> BorderType {
        match self {
            InputVariant::Filled => BorderType::Thick,
            InputVariant::Outlined => BorderType::Plain,
            InputVariant::Ghost => BorderType::Rounded,
        }
    }
}

impl FromStr for InputVariant {
    type Err = FormgridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filled" => Ok(InputVariant::Filled),
            "outlined" => Ok(InputVariant::Outlined),
            "ghost" => Ok(InputVariant::Ghost),
            _ => Err(FormgridError::InvalidOption {
                option: "variant",
                value: s.to_string(),
                expected: "filled, outlined, ghost",
            }),
        }
    }
}

/// Size of the input box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl InputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputSize::Sm => "sm",
            InputSize::Md => "md",
            InputSize::Lg => "lg",
        }
    }

    pub fn next(self) -> Self {
        match self {
            InputSize::Sm => InputSize::Md,
            InputSize::Md => InputSize::Lg,
            InputSize::Lg => InputSize::Sm,
        }
    }

    /// Rows taken by the bordered box
    pub fn box_height(&self) -> u16 {
        match self {
            InputSize::Sm | InputSize::Md => 3,
            InputSize::Lg => 5,
        }
    }

    fn padding(&self) -> Padding {
        match self {
            InputSize::Sm => Padding::zero(),
            InputSize::Md => Padding::horizontal(1),
            InputSize::Lg => Padding::new(2, 2, 1, 1),
        }
    }
}

impl FromStr for InputSize {
    type Err = FormgridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sm" | "small" => Ok(InputSize::Sm),
            "md" | "medium" => Ok(InputSize::Md),
            "lg" | "large" => Ok(InputSize::Lg),
            _ => Err(FormgridError::InvalidOption {
                option: "size",
                value: s.to_string(),
                expected: "sm, md, lg",
            }),
        }
    }
}

/// Kind of content the field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    Password,
}

impl FromStr for InputKind {
    type Err = FormgridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(InputKind::Text),
            "password" => Ok(InputKind::Password),
            _ => Err(FormgridError::InvalidOption {
                option: "type",
                value: s.to_string(),
                expected: "text, password",
            }),
        }
    }
}

/// What happened in response to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// The owner should adopt this value
    Changed(String),
    /// The secret is now shown in plain text (`true`) or masked (`false`)
    VisibilityToggled(bool),
    None,
}

pub type ChangeHandler = Box<dyn FnMut(&str)>;

/// Labeled single-line text input
pub struct InputField {
    pub value: String,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub helper_text: Option<String>,
    pub error_message: Option<String>,
    pub disabled: bool,
    pub invalid: bool,
    pub loading: bool,
    pub variant: InputVariant,
    pub size: InputSize,
    pub kind: InputKind,
    pub clearable: bool,
    pub show_password_toggle: bool,
    on_change: Option<ChangeHandler>,

    show_password: bool,
    focused: bool,
    /// Char index into `value`
    cursor: usize,
    scroll_offset: usize,
    spinner: Spinner,
    text_area: Option<Rect>,
    clear_button: Option<Rect>,
    toggle_button: Option<Rect>,
}

impl Default for InputField {
    fn default() -> Self {
        Self::new()
    }
}

impl InputField {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            label: None,
            placeholder: None,
            helper_text: None,
            error_message: None,
            disabled: false,
            invalid: false,
            loading: false,
            variant: InputVariant::default(),
            size: InputSize::default(),
            kind: InputKind::default(),
            clearable: false,
            show_password_toggle: false,
            on_change: None,
            show_password: false,
            focused: false,
            cursor: 0,
            scroll_offset: 0,
            spinner: Spinner::default(),
            text_area: None,
            clear_button: None,
            toggle_button: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_helper_text(mut self, helper_text: &str) -> Self {
        self.helper_text = Some(helper_text.to_string());
        self
    }

    pub fn with_error_message(mut self, error_message: &str) -> Self {
        self.error_message = Some(error_message.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor = self.char_count();
        self
    }

    pub fn with_variant(mut self, variant: InputVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_size(mut self, size: InputSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn with_password_toggle(mut self, enabled: bool) -> Self {
        self.show_password_toggle = enabled;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Register the change handler, invoked with every new value
    pub fn on_change(mut self, handler: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    /// Adopt a new value from the owner, keeping the cursor in range
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.cursor.min(self.char_count());
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.min(self.char_count())
    }

    /// Loading and disabled both lock the control
    pub fn is_editable(&self) -> bool {
        !self.disabled && !self.loading
    }

    /// Kind the control is currently rendered as
    pub fn input_kind(&self) -> InputKind {
        if self.shows_password_toggle() && self.show_password {
            InputKind::Text
        } else {
            self.kind
        }
    }

    pub fn is_password_visible(&self) -> bool {
        self.input_kind() == InputKind::Text && self.kind == InputKind::Password
    }

    pub fn shows_clear_button(&self) -> bool {
        self.clearable && !self.value.is_empty() && self.is_editable()
    }

    pub fn shows_password_toggle(&self) -> bool {
        self.show_password_toggle && self.kind == InputKind::Password
    }

    /// Helper text when valid, error message when invalid
    pub fn message(&self) -> Option<&str> {
        if self.invalid {
            self.error_message.as_deref()
        } else {
            self.helper_text.as_deref()
        }
    }

    /// Rows needed to render label, box, and message
    pub fn height(&self) -> u16 {
        let mut height = self.size.box_height();
        if self.label.is_some() {
            height += 1;
        }
        if self.message().is_some() {
            height += 1;
        }
        height
    }

    fn emit(&mut self, value: String) -> FieldAction {
        if let Some(handler) = self.on_change.as_mut() {
            handler(&value);
        }
        FieldAction::Changed(value)
    }

    /// Press the clear button
    pub fn clear(&mut self) -> FieldAction {
        if !self.shows_clear_button() {
            return FieldAction::None;
        }
        debug!(label = ?self.label, "Input cleared");
        self.focused = true;
        self.cursor = 0;
        self.scroll_offset = 0;
        self.emit(String::new())
    }

    /// Press the show/hide button of a secret field
    pub fn toggle_password_visibility(&mut self) -> FieldAction {
        if !self.shows_password_toggle() {
            return FieldAction::None;
        }
        self.show_password = !self.show_password;
        debug!(label = ?self.label, visible = self.show_password, "Password visibility toggled");
        FieldAction::VisibilityToggled(self.show_password)
    }

    pub fn insert_char(&mut self, c: char) -> FieldAction {
        if !self.is_editable() {
            return FieldAction::None;
        }
        let cursor = self.cursor();
        let mut next = self.value.clone();
        next.insert(byte_index(&next, cursor), c);
        self.cursor = cursor + 1;
        self.emit(next)
    }

    pub fn delete_char(&mut self) -> FieldAction {
        let cursor = self.cursor();
        if !self.is_editable() || cursor == 0 {
            return FieldAction::None;
        }
        let mut next = self.value.clone();
        next.remove(byte_index(&next, cursor - 1));
        self.cursor = cursor - 1;
        self.emit(next)
    }

    pub fn delete_char_forward(&mut self) -> FieldAction {
        let cursor = self.cursor();
        if !self.is_editable() || cursor >= self.char_count() {
            return FieldAction::None;
        }
        let mut next = self.value.clone();
        next.remove(byte_index(&next, cursor));
        self.emit(next)
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor().saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor() + 1).min(self.char_count());
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.char_count();
    }

    fn display_widths(&self) -> Vec<usize> {
        match self.input_kind() {
            InputKind::Password => vec![1; self.char_count()],
            InputKind::Text => self.value.chars().map(|c| c.width().unwrap_or(0)).collect(),
        }
    }

    fn cursor_from_column(&self, column: u16, area: Rect) -> usize {
        let widths = self.display_widths();
        let target = column.saturating_sub(area.x) as usize;
        let mut index = self.scroll_offset.min(widths.len());
        let mut used = 0;
        while index < widths.len() && used + widths[index] <= target {
            used += widths[index];
            index += 1;
        }
        index
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let mut y = area.y;
        let bottom = area.bottom();
        let mut next_rows = |height: u16| {
            let height = height.min(bottom.saturating_sub(y));
            let rect = Rect::new(area.x, y, area.width, height);
            y += height;
            rect
        };

        if let Some(label) = &self.label {
            let style = if self.is_editable() { Styles::label() } else { Styles::disabled() };
            f.render_widget(Paragraph::new(label.as_str()).style(style), next_rows(1));
        }

        let box_area = next_rows(self.size.box_height());
        let message_area = next_rows(1);

        self.render_box(f, box_area);

        if let Some(message) = self.message() {
            let style = if self.invalid { Styles::error() } else { Styles::inactive() };
            f.render_widget(Paragraph::new(message.to_string()).style(style), message_area);
        }
    }

    fn render_box(&mut self, f: &mut Frame, area: Rect) {
        let editable = self.is_editable();

        let mut border_style = if self.invalid {
            Styles::error()
        } else if self.focused && editable {
            Styles::active_border()
        } else if self.variant == InputVariant::Ghost {
            Styles::disabled()
        } else {
            Styles::inactive_border()
        };
        if !editable {
            border_style = border_style.add_modifier(Modifier::DIM);
        }

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(self.variant.border_type())
            .border_style(border_style)
            .padding(self.size.padding());
        if self.variant == InputVariant::Filled {
            block = block.style(Styles::filled());
        }

        let inner = block.inner(area);
        f.render_widget(block, area);

        self.text_area = None;
        self.clear_button = None;
        self.toggle_button = None;
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let row = Rect::new(inner.x, inner.y, inner.width, 1);
        let mut right = row.right();

        if self.loading {
            if let Some(rect) = take_right(&mut right, row, 1) {
                f.render_widget(Paragraph::new(self.spinner.symbol()).style(Styles::info()), rect);
            }
        }

        if self.shows_clear_button() {
            if let Some(rect) = take_right(&mut right, row, 1) {
                f.render_widget(Paragraph::new("×").style(Styles::inactive()), rect);
                self.clear_button = Some(rect);
            }
        }

        if self.shows_password_toggle() {
            let label = if self.show_password { "hide" } else { "show" };
            if let Some(rect) = take_right(&mut right, row, label.len() as u16) {
                f.render_widget(Paragraph::new(label).style(Styles::info()), rect);
                self.toggle_button = Some(rect);
            }
        }

        let text_area = Rect::new(row.x, row.y, right.saturating_sub(row.x), 1);
        self.text_area = Some(text_area);

        let widths = self.display_widths();
        let cursor = self.cursor();
        let available = text_area.width as usize;
        let offset = visible_offset(&widths, cursor, self.scroll_offset, available);
        self.scroll_offset = offset;

        let paragraph = if self.value.is_empty() {
            Paragraph::new(self.placeholder.clone().unwrap_or_default()).style(Styles::inactive())
        } else {
            let shown: Vec<char> = match self.input_kind() {
                InputKind::Password => vec![MASK_CHAR; widths.len()],
                InputKind::Text => self.value.chars().collect(),
            };
            let mut used = 0;
            let visible: String = shown
                .iter()
                .zip(widths.iter())
                .skip(offset)
                .take_while(|(_, w)| {
                    used += **w;
                    used <= available
                })
                .map(|(c, _)| *c)
                .collect();
            let style = if editable { Styles::default() } else { Styles::disabled() };
            Paragraph::new(visible).style(style)
        };
        f.render_widget(paragraph, text_area);

        if self.focused && editable && available > 0 {
            let cursor_x = text_area.x + widths[offset..cursor].iter().sum::<usize>() as u16;
            if cursor_x < text_area.right() {
                f.set_cursor(cursor_x, text_area.y);
            }
        }
    }
}

impl Component for InputField {
    type Action = FieldAction;

    fn render(&mut self, f: &mut Frame, area: Rect) {
        InputField::render(self, f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> FieldAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('r') if ctrl => self.toggle_password_visibility(),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => FieldAction::None,
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => {
                self.move_cursor_left();
                FieldAction::None
            }
            KeyCode::Right => {
                self.move_cursor_right();
                FieldAction::None
            }
            KeyCode::Home => {
                self.move_cursor_to_start();
                FieldAction::None
            }
            KeyCode::End => {
                self.move_cursor_to_end();
                FieldAction::None
            }
            _ => FieldAction::None,
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> FieldAction {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return FieldAction::None;
        }
        let (column, row) = (mouse.column, mouse.row);

        if self.clear_button.is_some_and(|r| ui::hit(r, column, row)) {
            return self.clear();
        }
        if self.toggle_button.is_some_and(|r| ui::hit(r, column, row)) {
            return self.toggle_password_visibility();
        }
        if let Some(area) = self.text_area.filter(|r| ui::hit(*r, column, row)) {
            self.focused = true;
            self.cursor = self.cursor_from_column(column, area);
        }
        FieldAction::None
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn tick(&mut self) {
        if self.loading {
            self.spinner.advance();
        }
    }
}

impl fmt::Debug for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputField")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("variant", &self.variant)
            .field("size", &self.size)
            .field("disabled", &self.disabled)
            .field("invalid", &self.invalid)
            .field("loading", &self.loading)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Reserve `width` columns at the right edge of `row`, keeping a one column gap
fn take_right(right: &mut u16, row: Rect, width: u16) -> Option<Rect> {
    let start = right.checked_sub(width)?;
    if start < row.x {
        return None;
    }
    *right = start.saturating_sub(1).max(row.x);
    Some(Rect::new(start, row.y, width, 1))
}

/// First visible char so that the cursor stays inside `available` columns
fn visible_offset(widths: &[usize], cursor: usize, previous: usize, available: usize) -> usize {
    if available == 0 {
        return cursor;
    }
    let mut offset = previous.min(cursor);
    while offset < cursor && widths[offset..cursor].iter().sum::<usize>() >= available {
        offset += 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::render_lines;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl FnMut(&str) + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (calls, move |value: &str| sink.borrow_mut().push(value.to_string()))
    }

    #[test]
    fn test_clear_emits_empty_value_and_focuses() {
        let (calls, handler) = recorder();
        let mut field = InputField::new().with_value("Alice").clearable(true).on_change(handler);
        assert!(field.shows_clear_button());
        assert!(!field.is_focused());

        let action = field.clear();

        assert_eq!(action, FieldAction::Changed(String::new()));
        assert_eq!(*calls.borrow(), vec![String::new()]);
        assert!(field.is_focused());
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_clear_button_visibility() {
        let field = InputField::new().with_value("Alice");
        assert!(!field.shows_clear_button());

        let field = InputField::new().clearable(true);
        assert!(!field.shows_clear_button());

        let field = InputField::new().with_value("Alice").clearable(true).disabled(true);
        assert!(!field.shows_clear_button());

        let mut field = InputField::new().with_value("Alice").clearable(true).loading(true);
        assert!(!field.shows_clear_button());
        assert_eq!(field.clear(), FieldAction::None);
    }

    #[test]
    fn test_password_toggle_round_trip() {
        let mut field = InputField::new()
            .with_kind(InputKind::Password)
            .with_password_toggle(true)
            .with_value("secret");
        assert_eq!(field.input_kind(), InputKind::Password);

        assert_eq!(field.toggle_password_visibility(), FieldAction::VisibilityToggled(true));
        assert_eq!(field.input_kind(), InputKind::Text);
        assert!(field.is_password_visible());

        assert_eq!(field.toggle_password_visibility(), FieldAction::VisibilityToggled(false));
        assert_eq!(field.input_kind(), InputKind::Password);
    }

    #[test]
    fn test_password_toggle_requires_secret_kind_and_flag() {
        let mut text = InputField::new().with_password_toggle(true);
        assert!(!text.shows_password_toggle());
        assert_eq!(text.toggle_password_visibility(), FieldAction::None);

        let mut secret = InputField::new().with_kind(InputKind::Password);
        assert_eq!(secret.toggle_password_visibility(), FieldAction::None);
        assert_eq!(secret.input_kind(), InputKind::Password);
    }

    #[test]
    fn test_helper_and_error_are_exclusive() {
        let field = InputField::new()
            .with_helper_text("Please enter your full name")
            .with_error_message("Name is required");
        assert_eq!(field.message(), Some("Please enter your full name"));

        let field = field.invalid(true);
        assert_eq!(field.message(), Some("Name is required"));

        let field = InputField::new().with_helper_text("help").invalid(true);
        assert_eq!(field.message(), None);
    }

    #[test]
    fn test_typing_is_controlled() {
        let (calls, handler) = recorder();
        let mut field = InputField::new().on_change(handler);

        assert_eq!(field.handle_key_event(key(KeyCode::Char('B'))), FieldAction::Changed("B".into()));
        // the owner has not applied the change yet
        assert_eq!(field.value, "");

        field.set_value("B");
        field.handle_key_event(key(KeyCode::Char('o')));
        field.set_value("Bo");
        field.handle_key_event(key(KeyCode::Left));
        assert_eq!(field.handle_key_event(key(KeyCode::Backspace)), FieldAction::Changed("o".into()));

        assert_eq!(*calls.borrow(), vec!["B".to_string(), "Bo".to_string(), "o".to_string()]);
    }

    #[test]
    fn test_edit_multibyte_text() {
        let mut field = InputField::new().with_value("héllo");
        field.move_cursor_to_start();
        field.move_cursor_right();
        field.move_cursor_right();
        assert_eq!(field.insert_char('ß'), FieldAction::Changed("héßllo".into()));
        assert_eq!(field.delete_char_forward(), FieldAction::Changed("hélo".into()));
    }

    #[test]
    fn test_disabled_and_loading_block_edits() {
        let mut field = InputField::new().with_value("abc").disabled(true);
        assert_eq!(field.insert_char('x'), FieldAction::None);
        assert_eq!(field.delete_char(), FieldAction::None);

        let mut field = InputField::new().with_value("abc").loading(true);
        assert!(!field.is_editable());
        assert_eq!(field.handle_key_event(key(KeyCode::Char('x'))), FieldAction::None);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut field = InputField::new().with_value("Alice").clearable(true);
        assert_eq!(field.handle_key_event(ctrl('u')), FieldAction::Changed(String::new()));

        let mut secret = InputField::new()
            .with_kind(InputKind::Password)
            .with_password_toggle(true);
        assert_eq!(secret.handle_key_event(ctrl('r')), FieldAction::VisibilityToggled(true));
        assert_eq!(secret.handle_key_event(ctrl('x')), FieldAction::None);
    }

    #[test]
    fn test_height() {
        let field = InputField::new();
        assert_eq!(field.height(), 3);

        let field = InputField::new()
            .with_label("Name")
            .with_helper_text("help")
            .with_size(InputSize::Lg);
        assert_eq!(field.height(), 7);
    }

    #[test]
    fn test_render_label_placeholder_and_helper() {
        let mut field = InputField::new()
            .with_label("Your Name")
            .with_placeholder("Enter your name")
            .with_helper_text("Please enter your full name");

        let lines = render_lines(40, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });

        assert!(lines[0].starts_with("Your Name"));
        assert!(lines[2].contains("Enter your name"));
        assert!(lines[4].starts_with("Please enter your full name"));
    }

    #[test]
    fn test_render_error_when_invalid() {
        let mut field = InputField::new()
            .with_helper_text("Please enter your full name")
            .with_error_message("Name is required")
            .invalid(true);

        let lines = render_lines(40, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });

        assert!(lines.iter().any(|l| l.contains("Name is required")));
        assert!(!lines.iter().any(|l| l.contains("Please enter")));
    }

    #[test]
    fn test_render_masks_secret() {
        let mut field = InputField::new()
            .with_kind(InputKind::Password)
            .with_password_toggle(true)
            .with_value("hunter2");

        let lines = render_lines(30, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });
        assert!(lines[1].contains("•••••••"));
        assert!(lines[1].contains("show"));
        assert!(!lines[1].contains("hunter2"));

        field.toggle_password_visibility();
        let lines = render_lines(30, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });
        assert!(lines[1].contains("hunter2"));
        assert!(lines[1].contains("hide"));
    }

    #[test]
    fn test_render_clear_button_and_click() {
        let (calls, handler) = recorder();
        let mut field = InputField::new()
            .with_value("Alice")
            .clearable(true)
            .on_change(handler);

        let lines = render_lines(20, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });
        let column = lines[1].chars().position(|c| c == '×').unwrap() as u16;

        assert_eq!(field.handle_mouse_event(click(column, 1)), FieldAction::Changed(String::new()));
        assert_eq!(*calls.borrow(), vec![String::new()]);
        assert!(field.is_focused());
    }

    #[test]
    fn test_click_in_text_moves_cursor() {
        let mut field = InputField::new().with_value("Alice");
        render_lines(20, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });

        // border + one column of padding puts the text at column 2
        field.handle_mouse_event(click(4, 1));
        assert!(field.is_focused());
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_render_loading_spinner() {
        let mut field = InputField::new().with_value("Alice").clearable(true).loading(true);
        let lines = render_lines(20, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });
        assert!(lines[1].contains(Spinner::default().symbol()));
        assert!(!lines[1].contains('×'));
    }

    #[test]
    fn test_long_value_scrolls_to_cursor() {
        let mut field = InputField::new().with_value("abcdefghijklmnopqrstuvwxyz");
        field.set_focus(true);
        let lines = render_lines(12, field.height(), |f| {
            let area = f.size();
            field.render(f, area)
        });
        assert!(lines[1].contains("tuvwxyz"));
        assert!(!lines[1].contains("abc"));
    }

    #[test]
    fn test_variant_border_styles() {
        for (variant, corner) in [
            (InputVariant::Outlined, "┌"),
            (InputVariant::Filled, "┏"),
            (InputVariant::Ghost, "╭"),
        ] {
            let mut field = InputField::new().with_variant(variant);
            let lines = render_lines(20, field.height(), |f| {
                let area = f.size();
                field.render(f, area)
            });
            assert!(lines[0].starts_with(corner), "{:?}: {}", variant, lines[0]);
        }
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("Ghost".parse::<InputVariant>().unwrap(), InputVariant::Ghost);
        assert_eq!("large".parse::<InputSize>().unwrap(), InputSize::Lg);
        assert_eq!("password".parse::<InputKind>().unwrap(), InputKind::Password);
        assert!(matches!(
            "huge".parse::<InputSize>(),
            Err(FormgridError::InvalidOption { option: "size", .. })
        ));
    }
}
