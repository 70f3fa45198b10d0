//! Heap pane rendering
//!
//! Every block is shown with its address, size and state, followed by its
//! contents laid out as int cells. Cells that were never written show `??`,
//! and the cell the cursor `a` points at is highlighted. Freed blocks stay
//! listed as tombstones so the release step is visible when replaying.

use super::utils::{clamp_scroll, pane_block};
use crate::driver::engine::Locals;
use crate::memory::heap::{BlockState, Heap, HeapBlock};
use crate::memory::value::{Address, Value};
use crate::memory::INT_SIZE;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

const CELL_WIDTH: usize = 6;
const ROW_LABEL_WIDTH: usize = 7;

/// Render the heap pane
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    heap: &Heap,
    locals: &Locals,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(
        " Heap Memory ({} / {} bytes) ",
        heap.total_allocated(),
        heap.max_size()
    );
    let block = pane_block(&title, is_focused);

    let inner_width = area.width.saturating_sub(2) as usize;
    let cells_per_row = (inner_width.saturating_sub(ROW_LABEL_WIDTH) / CELL_WIDTH).max(1);
    let cursor = match locals.a {
        Value::Pointer(addr) => Some(addr),
        _ => None,
    };

    let mut sorted: Vec<_> = heap.allocations().iter().collect();
    sorted.sort_by_key(|(addr, _)| **addr);

    let mut all_items = Vec::new();
    if sorted.is_empty() {
        all_items.push(
            ListItem::new("(no allocations)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }

    for (&addr, heap_block) in sorted {
        all_items.push(ListItem::new(block_header(addr, heap_block)));
        if heap_block.state == BlockState::Allocated {
            for line in block_rows(addr, heap_block, cursor, cells_per_row) {
                all_items.push(ListItem::new(line));
            }
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn block_header(addr: Address, heap_block: &HeapBlock) -> Line<'static> {
    let (state_text, state_style) = match heap_block.state {
        BlockState::Allocated => ("live", Style::default().fg(DEFAULT_THEME.success)),
        BlockState::Tombstone => ("freed", Style::default().fg(DEFAULT_THEME.error)),
    };

    Line::from(vec![
        Span::styled(
            format!("0x{:08x}", addr),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("{} bytes", heap_block.size),
            Style::default().fg(DEFAULT_THEME.primary),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("int[{}]", heap_block.size / INT_SIZE),
            Style::default().fg(DEFAULT_THEME.type_name),
        ),
        Span::raw(" | "),
        Span::styled(state_text, state_style),
    ])
}

fn block_rows(
    addr: Address,
    heap_block: &HeapBlock,
    cursor: Option<Address>,
    cells_per_row: usize,
) -> Vec<Line<'static>> {
    let count = heap_block.size / INT_SIZE;
    let mut lines = Vec::new();

    for row_start in (0..count).step_by(cells_per_row) {
        let mut spans = vec![Span::styled(
            format!("  [{:>3}]", row_start),
            Style::default().fg(DEFAULT_THEME.comment),
        )];

        for index in row_start..(row_start + cells_per_row).min(count) {
            let offset = index * INT_SIZE;
            let text = match heap_block.read_bytes(offset, INT_SIZE) {
                Some(bytes) if heap_block.is_initialized(offset, INT_SIZE) => {
                    let mut raw = [0u8; INT_SIZE];
                    raw.copy_from_slice(bytes);
                    i32::from_le_bytes(raw).to_string()
                }
                _ => "??".to_string(),
            };

            let style = if cursor == Some(addr + offset as u64) {
                Style::default()
                    .fg(DEFAULT_THEME.cursor)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if text == "??" {
                Style::default().fg(DEFAULT_THEME.comment)
            } else {
                Style::default().fg(DEFAULT_THEME.number)
            };

            spans.push(Span::styled(
                format!("{:>width$}", text, width = CELL_WIDTH),
                style,
            ));
        }
        lines.push(Line::from(spans));
    }

    lines
}
