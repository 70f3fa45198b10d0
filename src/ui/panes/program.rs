//! Program pane: the step plan with the current step highlighted

use super::utils::{clamp_scroll, pane_block};
use crate::driver::step::Step;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Render the program pane
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    plan: &[Step],
    current_step: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Program ", is_focused);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the current step on screen
    if let Some(current) = current_step {
        if current < *scroll_offset {
            *scroll_offset = current;
        } else if current >= *scroll_offset + visible_height {
            *scroll_offset = current + 1 - visible_height;
        }
    }
    clamp_scroll(scroll_offset, plan.len(), visible_height);

    let gutter_width = plan.len().to_string().len();
    let items: Vec<ListItem> = plan
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(index, step)| {
            let is_current = current_step == Some(index);
            let marker = if is_current { "▶ " } else { "  " };
            let text_style = match step {
                Step::Mutate(_) | Step::AllocateScalar => Style::default().fg(DEFAULT_THEME.function),
                Step::AllocateBuffer | Step::Release => Style::default().fg(DEFAULT_THEME.type_name),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.cursor)),
                Span::styled(
                    format!("{:>width$} ", index + 1, width = gutter_width),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(step.to_string(), text_style),
            ]);

            let item = ListItem::new(line);
            if is_current {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
