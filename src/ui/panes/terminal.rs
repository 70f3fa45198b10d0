//! Terminal output pane rendering

use super::utils::{clamp_scroll, pane_block};
use crate::snapshot::MockTerminal;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the terminal output pane
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    terminal: &MockTerminal,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Terminal Output ", is_focused);
    let lines = terminal.get_output();

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders
    clamp_scroll(scroll_offset, total_items, visible_height);

    // Tabs are expanded here since the List widget renders them as-is
    let visible_items: Vec<ListItem> = lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| {
            ListItem::new(line.replace('\t', "    ")).style(Style::default().fg(DEFAULT_THEME.fg))
        })
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
