use pb_core::palette::{ColorIndex, Palette};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::canvas::CanvasView;

/// Largeur d'une pastille de palette, en colonnes.
pub const SWATCH_WIDTH: u16 = 4;
/// Espace entre deux pastilles.
pub const SWATCH_GAP: u16 = 1;
/// Hauteur de la barre de palette (2 lignes de couleur + 1 ligne de marqueur).
pub const PALETTE_HEIGHT: u16 = 3;
/// Libellé du bouton d'export.
pub const EXPORT_LABEL: &str = "[ Export as PNG ]";

const TITLE: &str = "Make Empes Banner";
const ACCENT: Color = Color::Rgb(0xBB, 0x86, 0xFC);
const BORDER: Color = Color::Rgb(0x55, 0x55, 0x55);

/// Zones de l'écran, recalculées à chaque frame et réutilisées pour le hit-testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiLayout {
    /// Title line.
    pub title: Rect,
    /// Palette bar.
    pub palette: Rect,
    /// Bordered canvas frame.
    pub canvas_frame: Rect,
    /// Inner canvas area (inside its border).
    pub canvas: Rect,
    /// Status line.
    pub status: Rect,
    /// Export button, inside the status line.
    pub export_button: Rect,
    /// Help bar (zero-sized when hidden).
    pub help_bar: Rect,
}

/// Découpe l'écran : titre | palette | canvas bordé | statut | aide.
///
/// # Example
/// ```
/// use pb_render::ui::layout;
/// use ratatui::layout::Rect;
/// let l = layout(Rect::new(0, 0, 120, 40), true);
/// assert_eq!(l.title.height, 1);
/// assert_eq!(l.palette.height, 3);
/// assert!(l.canvas.height > 0);
/// ```
#[must_use]
pub fn layout(area: Rect, show_help_bar: bool) -> UiLayout {
    let help_h = u16::from(show_help_bar);
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(PALETTE_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(help_h),
    ])
    .split(area);

    let canvas_block = rows[2];
    let canvas = Block::default().borders(Borders::ALL).inner(canvas_block);

    let status = rows[3];
    let label_w = (EXPORT_LABEL.chars().count() as u16).min(status.width);
    let export_button = Rect::new(
        status.x + status.width.saturating_sub(label_w),
        status.y,
        label_w,
        status.height,
    );

    UiLayout {
        title: rows[0],
        palette: rows[1],
        canvas_frame: canvas_block,
        canvas,
        status,
        export_button,
        help_bar: rows[4],
    }
}

/// Rectangle de la pastille `index`, centrée comme une rangée de boutons.
#[must_use]
pub fn swatch_rect(palette_area: Rect, count: usize, index: usize) -> Rect {
    let count = count as u16;
    let total = count * SWATCH_WIDTH + count.saturating_sub(1) * SWATCH_GAP;
    let x0 = palette_area.x + palette_area.width.saturating_sub(total) / 2;
    let x = x0 + index as u16 * (SWATCH_WIDTH + SWATCH_GAP);
    Rect::new(x, palette_area.y, SWATCH_WIDTH, PALETTE_HEIGHT - 1).intersection(palette_area)
}

/// Pastille sous le point `(column, row)`, s'il y en a une.
///
/// # Example
/// ```
/// use pb_render::ui::{swatch_at, swatch_rect};
/// use ratatui::layout::Rect;
/// let area = Rect::new(0, 2, 100, 3);
/// let r = swatch_rect(area, 16, 5);
/// assert_eq!(swatch_at(area, 16, r.x, r.y), Some(5));
/// assert_eq!(swatch_at(area, 16, r.x + r.width, r.y), None);
/// ```
#[must_use]
pub fn swatch_at(palette_area: Rect, count: usize, column: u16, row: u16) -> Option<usize> {
    (0..count).find(|&i| {
        let r = swatch_rect(palette_area, count, i);
        column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
    })
}

/// Tout ce qu'il faut pour dessiner une frame.
pub struct DrawContext<'a> {
    /// Fixed palette.
    pub palette: &'a Palette,
    /// Active color.
    pub selection: ColorIndex,
    /// Canvas raster and viewport.
    pub canvas: &'a CanvasView,
    /// Seconds left before the next placement, `None` when ready.
    pub cooldown_secs: Option<u64>,
    /// Transient status message (export result, storage error...).
    pub status: Option<&'a str>,
    /// Blocking notification (cooldown).
    pub notice: Option<&'a str>,
    /// Help overlay visible.
    pub show_help: bool,
    /// Bottom help bar visible.
    pub show_help_bar: bool,
}

/// Dessine l'interface complète et renvoie les zones utilisées.
pub fn draw(frame: &mut Frame, ctx: &DrawContext) -> UiLayout {
    let area = frame.area();
    let l = layout(area, ctx.show_help_bar);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .centered(),
        l.title,
    );

    draw_palette(frame, l.palette, ctx.palette, ctx.selection);

    let canvas_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER));
    frame.render_widget(canvas_block, l.canvas_frame);
    ctx.canvas.draw(frame.buffer_mut(), l.canvas);

    draw_status(frame, &l, ctx);

    if ctx.show_help_bar {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Cooldown: 60 seconds per pixel. Click canvas to place pixels.  ? = help",
                Style::default().fg(Color::Gray),
            )))
            .centered(),
            l.help_bar,
        );
    }

    if ctx.show_help {
        draw_help_overlay(frame, area);
    }
    if let Some(notice) = ctx.notice {
        draw_notice(frame, area, notice);
    }
    l
}

fn draw_palette(frame: &mut Frame, area: Rect, palette: &Palette, selection: ColorIndex) {
    let buf = frame.buffer_mut();
    for (index, (r, g, b)) in palette.iter() {
        let rect = swatch_rect(area, palette.len(), usize::from(index.get()));
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(' ').set_bg(Color::Rgb(r, g, b));
                }
            }
        }
        if index == selection {
            let marker_y = area.y + PALETTE_HEIGHT - 1;
            for x in rect.x..rect.x + rect.width {
                if let Some(cell) = buf.cell_mut((x, marker_y)) {
                    cell.set_char('▀').set_fg(Color::White);
                }
            }
        }
    }
}

fn draw_status(frame: &mut Frame, l: &UiLayout, ctx: &DrawContext) {
    let hex = ctx.palette.hex(ctx.selection);
    let (sr, sg, sb) = ctx.palette.color(ctx.selection);
    let cooldown = match ctx.cooldown_secs {
        None => Span::styled("Ready", Style::default().fg(Color::Green)),
        Some(secs) => Span::styled(
            format!("Cooldown {secs}s"),
            Style::default().fg(Color::Yellow),
        ),
    };
    let mut spans = vec![
        Span::raw(" "),
        Span::styled("  ", Style::default().bg(Color::Rgb(sr, sg, sb))),
        Span::raw(format!(" {hex}  ")),
        cooldown,
    ];
    if let Some(msg) = ctx.status {
        spans.push(Span::styled(
            format!("  {msg}"),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), l.status);
    frame.render_widget(
        Paragraph::new(Span::styled(
            EXPORT_LABEL,
            Style::default()
                .fg(Color::Rgb(0x12, 0x12, 0x12))
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        l.export_button,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Notification bloquante : tant qu'elle est affichée, les clics ne peignent pas.
fn draw_notice(frame: &mut Frame, area: Rect, notice: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(notice, Style::default().fg(Color::White))).centered(),
        Line::from(""),
        Line::from(Span::styled(
            "Enter / Esc / click to close",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];
    let width = (notice.chars().count() as u16 + 8).max(34);
    let rect = centered(area, width, lines.len() as u16 + 2);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(" Notice ")
                .style(Style::default().bg(Color::Black)),
        ),
        rect,
    );
}

fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " pixelbanner — Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" Click     Place pixel / pick color"),
        Line::from(" Tab       Next color"),
        Line::from(" S-Tab     Previous color"),
        Line::from(" ←↑↓→      Scroll canvas"),
        Line::from(" Wheel     Scroll canvas"),
        Line::from(" x         Export as PNG"),
        Line::from(" ?         Toggle help"),
        Line::from(" q/Esc     Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let rect = centered(area, 40, help_text.len() as u16 + 2);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(Style::default().bg(Color::Black).fg(Color::White)),
        ),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::grid::Grid;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn layout_without_help_bar_gives_canvas_the_space() {
        let with = layout(Rect::new(0, 0, 100, 40), true);
        let without = layout(Rect::new(0, 0, 100, 40), false);
        assert_eq!(without.help_bar.height, 0);
        assert_eq!(without.canvas.height, with.canvas.height + 1);
    }

    #[test]
    fn export_button_sits_at_right_of_status() {
        let l = layout(Rect::new(0, 0, 100, 40), true);
        assert_eq!(l.export_button.y, l.status.y);
        assert_eq!(l.export_button.x + l.export_button.width, 100);
    }

    #[test]
    fn swatches_do_not_overlap() {
        let area = Rect::new(0, 1, 120, PALETTE_HEIGHT);
        for i in 0..15 {
            let a = swatch_rect(area, 16, i);
            let b = swatch_rect(area, 16, i + 1);
            assert_eq!(a.x + SWATCH_WIDTH + SWATCH_GAP, b.x);
        }
        assert_eq!(swatch_at(area, 16, 0, 1), None);
    }

    #[test]
    fn draw_marks_selected_swatch_and_shows_notice() {
        let palette = Palette::default();
        let grid = Grid::blank();
        let mut view = CanvasView::new(&grid);
        view.refresh(&grid, &palette);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let selection = palette.index(5).unwrap();
        let mut drawn = UiLayout::default();
        terminal
            .draw(|f| {
                drawn = draw(
                    f,
                    &DrawContext {
                        palette: &palette,
                        selection,
                        canvas: &view,
                        cooldown_secs: Some(59),
                        status: None,
                        notice: Some("Cooldown active! Wait 59s"),
                        show_help: false,
                        show_help_bar: true,
                    },
                );
            })
            .unwrap();

        let buf = terminal.backend().buffer();
        let swatch = swatch_rect(drawn.palette, 16, 5);
        assert_eq!(buf[(swatch.x, swatch.y)].bg, Color::Rgb(0xE5, 0, 0));
        assert_eq!(buf[(swatch.x, drawn.palette.y + 2)].symbol(), "▀");

        let text: String = (0..40)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .map(|p| buf[p].symbol().to_string())
            .collect();
        assert!(text.contains("Cooldown active! Wait 59s"));
        assert!(text.contains("Export as PNG"));
    }
}
