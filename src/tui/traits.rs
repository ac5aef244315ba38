//! Core traits shared by the interactive components
//!
//! Components own their local state (focus, cursor, sort, selection) and
//! report state transitions through an action value returned from the event
//! handlers.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

/// An interactive, focusable piece of UI
pub trait Component {
    /// Transition reported back to the owner after an event
    type Action;

    /// Draw the component and remember where its clickable parts landed
    fn render(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input while focused
    fn handle_key_event(&mut self, key: KeyEvent) -> Self::Action;

    /// Handle mouse input against the areas recorded by the last render
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Self::Action;

    fn set_focus(&mut self, focused: bool);

    fn is_focused(&self) -> bool;

    /// Advance animations
    fn tick(&mut self) {}
}

/// Trait for components with navigable rows
pub trait Navigable {
    /// Move selection up
    fn navigate_up(&mut self);

    /// Move selection down
    fn navigate_down(&mut self);

    /// Get currently selected index
    fn get_selected_index(&self) -> Option<usize>;

    /// Set selected index
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Get total number of items
    fn get_item_count(&self) -> usize;

    /// Navigate to first item
    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    /// Navigate to last item
    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}
