//! Demo application state: an in-memory document of sections driven through
//! the reveal engine by keyboard scrolling.
//!
//! Terminal rows stand in for pixels at a fixed scale, so the engine works in
//! document px exactly as it would against a real layout host.

use std::collections::HashMap;
use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::layout::Rect as UiRect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use scrollcue_core::{Config, Document, Engine, MemoryDocument, NodeId};

use crate::fade::{Easing, Fade};

/// Document px represented by one terminal row.
pub const ROW_PX: f64 = 20.0;

const SCROLL_STEP_PX: f64 = 40.0;
const SECTION_HEIGHT_PX: f64 = 120.0;
const SECTION_GAP_PX: f64 = 200.0;
const FIRST_SECTION_TOP_PX: f64 = 300.0;

/// Reveal tokens cycled across demo sections; each becomes the extra class
/// applied on visibility.
const TOKENS: [&str; 4] = ["fade-up", "fade-left", "fade-right", "zoom-in"];

struct Section {
    node: NodeId,
    title: String,
}

pub struct App {
    doc: MemoryDocument,
    engine: Engine,
    sections: Vec<Section>,
    /// In-flight fades for currently revealed sections.
    fades: HashMap<NodeId, Fade>,
    easing: Easing,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, viewport_px: f64, section_count: usize) -> Self {
        let mut doc = MemoryDocument::new(viewport_px);
        let mut sections = Vec::with_capacity(section_count);
        for i in 0..section_count {
            let top = FIRST_SECTION_TOP_PX + i as f64 * (SECTION_HEIGHT_PX + SECTION_GAP_PX);
            let token = TOKENS[i % TOKENS.len()];
            let node = doc.insert_tracked(top, SECTION_HEIGHT_PX, token);
            sections.push(Section {
                node,
                title: format!("Section {:02} · {}", i + 1, token),
            });
        }

        let easing = Easing::from_name(&config.easing);
        let mut engine = Engine::init(config, &mut doc);
        engine.on_ready(&mut doc);

        Self {
            doc,
            engine,
            sections,
            fades: HashMap::new(),
            easing,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, code: KeyCode, now: Instant) {
        let viewport = self.doc.viewport().height;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(SCROLL_STEP_PX, now),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-SCROLL_STEP_PX, now),
            KeyCode::PageDown => self.scroll_by(viewport, now),
            KeyCode::PageUp => self.scroll_by(-viewport, now),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_to(0.0, now),
            KeyCode::End | KeyCode::Char('G') => self.scroll_to(self.max_scroll(), now),
            KeyCode::Char('m') => self.append_section(now),
            _ => {}
        }
    }

    pub fn handle_resize(&mut self, rows: u16, now: Instant) {
        // Bottom row is the status bar.
        let height = f64::from(rows.saturating_sub(1)) * ROW_PX;
        self.doc.set_viewport_height(height);
        self.engine.on_resize(now);
    }

    /// Advance deferred engine work and keep fades in sync with the class
    /// state the engine wrote.
    pub fn tick(&mut self, now: Instant) {
        self.engine.tick(&mut self.doc, now);

        let animated = self.engine.config().animated_class_name.clone();
        let delay = self.engine.config().delay();
        let duration = self.engine.config().duration();
        for section in &self.sections {
            if self.doc.has_class(section.node, &animated) {
                self.fades
                    .entry(section.node)
                    .or_insert_with(|| Fade::new(now, delay, duration, self.easing));
            } else {
                // Mirror mode removed the class: the fade resets.
                self.fades.remove(&section.node);
            }
        }
    }

    fn scroll_by(&mut self, delta_px: f64, now: Instant) {
        self.scroll_to(self.doc.scroll_top() + delta_px, now);
    }

    fn scroll_to(&mut self, target_px: f64, now: Instant) {
        let clamped = target_px.clamp(0.0, self.max_scroll());
        self.doc.set_scroll_top(clamped);
        self.engine.on_scroll(&mut self.doc, now);
    }

    fn max_scroll(&self) -> f64 {
        (self.doc.content_height() + SECTION_GAP_PX - self.doc.viewport().height).max(0.0)
    }

    /// Synthetic structural mutation: append a section below the current
    /// content and notify the engine.
    fn append_section(&mut self, now: Instant) {
        let index = self.sections.len();
        let top = FIRST_SECTION_TOP_PX + index as f64 * (SECTION_HEIGHT_PX + SECTION_GAP_PX);
        let token = TOKENS[index % TOKENS.len()];
        let node = self.doc.insert_tracked(top, SECTION_HEIGHT_PX, token);
        self.sections.push(Section {
            node,
            title: format!("Section {:02} · {}", index + 1, token),
        });
        self.engine.on_mutation(now);
    }

    pub fn render(&self, frame: &mut Frame, now: Instant) {
        let area = frame.area();
        if area.height < 2 {
            return;
        }
        let content = UiRect::new(area.x, area.y, area.width, area.height - 1);
        let status = UiRect::new(area.x, area.bottom() - 1, area.width, 1);

        let scroll_top = self.doc.scroll_top();
        for section in &self.sections {
            let Some(rect) = self.doc.document_rect(section.node) else {
                continue;
            };
            let top_row = ((rect.top - scroll_top) / ROW_PX).floor() as i32;
            let height_rows = (rect.height / ROW_PX).ceil() as i32;
            if top_row + height_rows <= 0 || top_row >= i32::from(content.height) {
                continue;
            }

            let level = self
                .fades
                .get(&section.node)
                .map(|fade| fade.level(now))
                .unwrap_or(0.0);
            self.render_section(frame, content, section, top_row, height_rows, level);
        }

        self.render_status(frame, status);
    }

    fn render_section(
        &self,
        frame: &mut Frame,
        content: UiRect,
        section: &Section,
        top_row: i32,
        height_rows: i32,
        level: f64,
    ) {
        // Clip to the content area.
        let y0 = top_row.max(0);
        let y1 = (top_row + height_rows).min(i32::from(content.height));
        if y1 <= y0 {
            return;
        }
        let rect = UiRect::new(
            content.x + 2,
            content.y + y0 as u16,
            content.width.saturating_sub(4),
            (y1 - y0) as u16,
        );

        let color = fade_color(level);
        let style = if level > 0.0 {
            Style::default().fg(color)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };

        let window = self
            .engine
            .elements()
            .iter()
            .find(|el| el.node == section.node)
            .map(|el| el.window);
        let detail = match window {
            Some(w) => match w.exit {
                Some(exit) => format!("enter {:.0}px · exit {:.0}px", w.enter, exit),
                None => format!("enter {:.0}px", w.enter),
            },
            None => "untracked".to_string(),
        };

        let body = Paragraph::new(vec![
            Line::from(detail),
            Line::from(format!("reveal {:>3.0}%", level * 100.0)),
        ])
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(section.title.clone())
                .style(style),
        );
        frame.render_widget(body, rect);
    }

    fn render_status(&self, frame: &mut Frame, status: UiRect) {
        let viewport = self.doc.viewport();
        let line = format!(
            " {:.0}px / {:.0}px · {} tracked · j/k scroll · m add section · q quit",
            viewport.scroll_top,
            self.max_scroll(),
            self.engine.elements().len(),
        );
        let bar = Paragraph::new(line).style(Style::default().fg(Color::Black).bg(Color::Gray));
        frame.render_widget(bar, status);
    }
}

/// Blend from dim gray to the reveal accent as the fade progresses.
fn fade_color(level: f64) -> Color {
    let level = level.clamp(0.0, 1.0);
    let lerp = |from: f64, to: f64| (from + (to - from) * level).round() as u8;
    Color::Rgb(lerp(90.0, 140.0), lerp(90.0, 220.0), lerp(90.0, 240.0))
}
