//! TUI rendering for the piano keyboard
//!
//! [`PianoWidget`] paints a [`KeyboardView`] into a ratatui buffer;
//! [`hit_test`] and [`selector_hit_test`] map terminal cells back to keys
//! and size buttons using the same placement.

use crate::config::Theme;
use crate::host::Host;
use crate::layout::{self, KeyKind, KeyVisual, KeyboardView, SizeButton, NATURAL_KEY_HEIGHT};
use crate::theory::{KeyboardSize, Note};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Keyboard widget for rendering in ratatui
pub struct PianoWidget<'a> {
    view: &'a KeyboardView,
    label_color: Color,
}

impl<'a> PianoWidget<'a> {
    /// Create a new keyboard widget
    pub fn new(view: &'a KeyboardView) -> Self {
        Self {
            view,
            label_color: Color::DarkGray,
        }
    }

    /// Set the color of the note names on natural keys
    pub fn label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }
}

impl Widget for PianoWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < NATURAL_KEY_HEIGHT || area.width == 0 {
            return;
        }

        let placement = Placement::new(area, self.view);

        for key in self.view.keys_by_z() {
            paint_key(buf, &placement, key, self.label_color);
        }

        if let Some(row) = placement.selector_row {
            for button in &self.view.size_selector {
                paint_button(buf, area, row, button);
            }
        }

        if let (Some(row), Some(text)) = (placement.debug_row, &self.view.debug_text) {
            buf.set_stringn(
                area.x,
                row,
                text,
                area.width as usize,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Where the keyboard parts land inside an area
#[derive(Debug, Clone, Copy)]
struct Placement {
    area: Rect,
    /// Screen column of key x = 0
    origin_x: i32,
    selector_row: Option<u16>,
    debug_row: Option<u16>,
}

impl Placement {
    fn new(area: Rect, view: &KeyboardView) -> Self {
        // An accidental at the start of the range hangs left of x = 0
        let overhang = view.keys.first().map_or(0, |key| (-key.x).max(0));
        let content_width = view.width as i32 + overhang;
        let padding = ((area.width as i32 - content_width) / 2).max(0);
        let origin_x = area.x as i32 + padding + overhang;

        // One blank row between the keys and the extra lines
        let mut next_row = area.y.saturating_add(NATURAL_KEY_HEIGHT + 1);
        let mut take_row = |wanted: bool| {
            if wanted && next_row < area.bottom() {
                next_row += 1;
                Some(next_row - 1)
            } else {
                None
            }
        };
        let selector_row = take_row(!view.size_selector.is_empty());
        let debug_row = take_row(view.debug_text.is_some());

        Self {
            area,
            origin_x,
            selector_row,
            debug_row,
        }
    }

    /// Screen columns covered by a key, clipped to the area
    fn columns(&self, x: i32, width: u16) -> Option<(u16, u16)> {
        let left = (self.origin_x + x).max(self.area.left() as i32);
        let right = (self.origin_x + x + width as i32).min(self.area.right() as i32);
        (right > left).then(|| (left as u16, (right - left) as u16))
    }
}

fn paint_key(buf: &mut Buffer, placement: &Placement, key: &KeyVisual, label_color: Color) {
    let Some((x, width)) = placement.columns(key.x, key.width) else {
        return;
    };
    let area = placement.area;
    let rect = Rect {
        x,
        y: area.y,
        width,
        height: key.height.min(area.height),
    };
    buf.set_style(rect, Style::default().bg(key.color));

    if key.kind == KeyKind::Accidental {
        return;
    }

    // Left edge separates neighbouring naturals
    let edge = placement.origin_x + key.x;
    if edge == x as i32 {
        let style = Style::default().fg(Color::Black).bg(key.color);
        for row in rect.top()..rect.bottom() {
            buf.set_string(x, row, "▏", style);
        }
    }

    // Note name on the bottom row, next to the edge
    let name = key.name();
    let label_x = edge + 1;
    if name.len() < key.width as usize
        && label_x >= area.left() as i32
        && label_x + name.len() as i32 <= area.right() as i32
    {
        buf.set_string(
            label_x as u16,
            rect.bottom() - 1,
            name,
            Style::default().fg(label_color).bg(key.color),
        );
    }
}

fn paint_button(buf: &mut Buffer, area: Rect, row: u16, button: &SizeButton) {
    let x = area.x as u32 + button.x as u32;
    if x >= area.right() as u32 {
        return;
    }
    let style = if button.selected {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let max_width = (area.right() as u32 - x) as usize;
    buf.set_stringn(x as u16, row, button.text(), max_width, style);
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.left() && column < area.right() && row >= area.top() && row < area.bottom()
}

/// The note whose key is drawn at (`column`, `row`) when the view is
/// rendered into `area`; accidentals win over the naturals below them
pub fn hit_test(view: &KeyboardView, area: Rect, column: u16, row: u16) -> Option<Note> {
    if !contains(area, column, row) {
        return None;
    }
    let placement = Placement::new(area, view);
    view.key_at(column as i32 - placement.origin_x, row - area.y)
        .map(|key| key.note)
}

/// The size button drawn at (`column`, `row`), if any
pub fn selector_hit_test<'v>(
    view: &'v KeyboardView,
    area: Rect,
    column: u16,
    row: u16,
) -> Option<&'v SizeButton> {
    if !contains(area, column, row) || Placement::new(area, view).selector_row != Some(row) {
        return None;
    }
    view.button_at(column - area.x)
}

/// Area inside the border drawn by [`render_standalone`]
pub fn widget_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Render the whole application screen
///
/// Shows a loading placeholder until the sound engine is ready. Returns the
/// area the keyboard was drawn into, for hit testing.
pub fn render_standalone(frame: &mut Frame, host: &Host, player_name: &str, theme: &Theme) -> Rect {
    let area = frame.area();
    let inner = widget_area(area);
    let keyboard = host.keyboard();

    let size = KeyboardSize::from_range(keyboard.note_range)
        .map(KeyboardSize::label)
        .unwrap_or_else(|| format!("{}-key range", keyboard.note_range.key_count()));
    let mode = if keyboard.config.interactive { "" } else { " (passive)" };
    let title = format!(" Piano [{}]{} -> {} ", size, mode, player_name);

    let block = Block::default()
        .title(title)
        .title_bottom(" click keys | 1-6 size | Esc quit ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()));
    frame.render_widget(block, area);

    if !host.is_engine_ready() {
        let loading = Paragraph::new("Loading sound engine...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, inner);
        return inner;
    }

    let view = layout::view(keyboard);
    frame.render_widget(PianoWidget::new(&view).label_color(theme.label()), inner);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{Keyboard, KeyboardEvent, WidgetConfig};
    use crate::layout::{ACCIDENTAL_KEY_HEIGHT, NATURAL_KEY_WIDTH};
    use crate::theory::NoteRange;

    fn octave_view(config: WidgetConfig) -> KeyboardView {
        let keyboard = Keyboard::new(config).with_range(NoteRange::new(48, 59));
        layout::view(&keyboard)
    }

    fn full_config() -> WidgetConfig {
        WidgetConfig {
            interactive: true,
            show_size_selector: true,
            debug_notes: true,
        }
    }

    #[test]
    fn test_keyboard_is_centered() {
        let view = octave_view(WidgetConfig::default());
        let area = Rect::new(0, 0, view.width + 10, NATURAL_KEY_HEIGHT);
        // Five columns of padding before the first key
        assert_eq!(hit_test(&view, area, 4, 0), None);
        assert_eq!(hit_test(&view, area, 5, 0), Some(48));
    }

    #[test]
    fn test_hit_test_accidental_on_top() {
        let view = octave_view(WidgetConfig::default());
        let area = Rect::new(0, 0, view.width, NATURAL_KEY_HEIGHT);
        let boundary = NATURAL_KEY_WIDTH;
        assert_eq!(hit_test(&view, area, boundary, 0), Some(49));
        assert_eq!(hit_test(&view, area, boundary, ACCIDENTAL_KEY_HEIGHT), Some(50));
        assert_eq!(hit_test(&view, area, 0, NATURAL_KEY_HEIGHT), None);
    }

    #[test]
    fn test_render_colors_keys() {
        let keyboard = Keyboard::default()
            .with_range(NoteRange::new(48, 59))
            .update(KeyboardEvent::KeyDown(48))
            .update(KeyboardEvent::KeyDown(49));
        let view = layout::view(&keyboard);
        let area = Rect::new(0, 0, view.width, NATURAL_KEY_HEIGHT);
        let mut buf = Buffer::empty(area);
        PianoWidget::new(&view).render(area, &mut buf);

        let c = view.keys[0].color;
        let c_sharp = view.keys[1].color;
        let d = view.keys[2].color;
        assert_eq!(buf[(1, 0)].bg, c);
        assert_eq!(buf[(NATURAL_KEY_WIDTH, 0)].bg, c_sharp);
        assert_eq!(buf[(NATURAL_KEY_WIDTH, NATURAL_KEY_HEIGHT - 1)].bg, d);
        // Note name on the bottom row of C4
        assert_eq!(buf[(1, NATURAL_KEY_HEIGHT - 1)].symbol(), "C");
        assert_eq!(buf[(2, NATURAL_KEY_HEIGHT - 1)].symbol(), "4");
    }

    #[test]
    fn test_selector_and_debug_lines() {
        let keyboard = Keyboard::new(full_config())
            .with_range(NoteRange::new(48, 59))
            .update(KeyboardEvent::KeyDown(52));
        let view = layout::view(&keyboard);
        let area = Rect::new(0, 0, 120, NATURAL_KEY_HEIGHT + 3);
        let mut buf = Buffer::empty(area);
        PianoWidget::new(&view).render(area, &mut buf);

        let selector_row = NATURAL_KEY_HEIGHT + 1;
        let line: String = (0..14).map(|x| buf[(x, selector_row)].symbol().to_string()).collect();
        assert_eq!(line, "[12-key piano]");

        let debug_row = selector_row + 1;
        let text: String = (0..29).map(|x| buf[(x, debug_row)].symbol().to_string()).collect();
        assert_eq!(text, "Currently pressed notes: E4  ");

        let button = selector_hit_test(&view, area, 0, selector_row).unwrap();
        assert_eq!(button.size, KeyboardSize::Keys12);
        assert!(button.selected);
        assert!(selector_hit_test(&view, area, 0, debug_row).is_none());
    }

    #[test]
    fn test_extra_lines_skipped_when_no_room() {
        let view = octave_view(full_config());
        let area = Rect::new(0, 0, 120, NATURAL_KEY_HEIGHT);
        assert!(selector_hit_test(&view, area, 0, NATURAL_KEY_HEIGHT + 1).is_none());
        let mut buf = Buffer::empty(area);
        PianoWidget::new(&view).render(area, &mut buf);
    }

    #[test]
    fn test_narrow_area_clips() {
        let view = layout::view(&Keyboard::default().with_range(NoteRange::new(9, 96)));
        let area = Rect::new(0, 0, 20, NATURAL_KEY_HEIGHT);
        let mut buf = Buffer::empty(area);
        PianoWidget::new(&view).render(area, &mut buf);
        assert_eq!(hit_test(&view, area, 0, NATURAL_KEY_HEIGHT - 1), Some(9));
    }

    #[test]
    fn test_widget_area() {
        assert_eq!(widget_area(Rect::new(0, 0, 80, 24)), Rect::new(1, 1, 78, 22));
    }
}
