use crate::memory::value::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
};

/// Bordered pane block, highlighted when focused
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Format a value with styling
pub(crate) fn format_value_styled(value: &Value) -> Span<'static> {
    match value {
        Value::Int(_) => {
            Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.number))
        }
        Value::Pointer(_) => Span::styled(
            value.to_string(),
            Style::default().fg(DEFAULT_THEME.secondary),
        ),
        Value::Null => Span::styled("NULL", Style::default().fg(DEFAULT_THEME.number)),
        Value::Uninitialized => Span::styled(
            "(uninitialized)",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
        ),
    }
}

/// Clamp a scroll offset so the last page stays full
pub(crate) fn clamp_scroll(scroll_offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }
}
