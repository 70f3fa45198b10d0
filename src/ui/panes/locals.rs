//! Locals pane: the driver's variables and the ints their pointers reach

use super::utils::{format_value_styled, pane_block};
use crate::driver::engine::Locals;
use crate::memory::heap::Heap;
use crate::memory::value::Value;
use crate::memory::{pointer_diff, INT_SIZE, POINTER_SIZE};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the locals pane
pub fn render_locals_pane(
    frame: &mut Frame,
    area: Rect,
    locals: &Locals,
    heap: &Heap,
    is_focused: bool,
) {
    let block = pane_block(" Locals ", is_focused);

    let mut lines = vec![
        pointer_line("a", &locals.a, heap),
        pointer_line("heap_addr", &locals.heap_addr, heap),
    ];

    // Element index of the cursor within the buffer
    if let (Value::Pointer(a), Value::Pointer(base)) = (locals.a, locals.base) {
        lines.push(Line::from(vec![
            Span::styled("  a - base  ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                pointer_diff(a, base, INT_SIZE).to_string(),
                Style::default().fg(DEFAULT_THEME.number),
            ),
        ]));
    }

    let i_span = match locals.i {
        Some(i) => format_value_styled(&Value::Int(i as i32)),
        None => Span::styled("(out of scope)", Style::default().fg(DEFAULT_THEME.comment)),
    };
    lines.push(Line::from(vec![
        Span::styled("int ", Style::default().fg(DEFAULT_THEME.type_name)),
        Span::raw("i = "),
        i_span,
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn pointer_line(name: &str, value: &Value, heap: &Heap) -> Line<'static> {
    let mut spans = vec![
        Span::styled("int* ", Style::default().fg(DEFAULT_THEME.type_name)),
        Span::raw(format!("{} = ", name)),
        format_value_styled(value),
    ];

    if let Value::Pointer(addr) = value {
        spans.push(Span::styled(" → ", Style::default().fg(DEFAULT_THEME.comment)));
        match heap.read_int(*addr) {
            Ok(pointee) => spans.push(format_value_styled(&pointee)),
            Err(e) => spans.push(Span::styled(
                e.to_string(),
                Style::default().fg(DEFAULT_THEME.error),
            )),
        }
    }

    spans.push(Span::styled(
        format!("  ({} bytes)", POINTER_SIZE),
        Style::default().fg(DEFAULT_THEME.comment),
    ));
    Line::from(spans)
}
