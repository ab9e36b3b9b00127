//! HUD drawing (macroquad immediate mode)
//!
//! Everything here draws straight to the screen and holds no game state.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use macroquad::prelude::*;

use crate::puzzle::{format_time, SlotView};
use crate::quiz::QuizEntry;
use crate::rasterizer::Framebuffer;

use super::slots::{ListLayout, SlotBar};
use super::theme::*;
use super::Rect;

/// GPU textures for slot images, keyed by the shared image they came from.
/// Holding the `Arc` keeps the key address from being reused.
#[derive(Default)]
pub struct ImageCache {
    textures: HashMap<usize, (Arc<RgbaImage>, Texture2D)>,
}

impl ImageCache {
    pub fn texture(&mut self, image: &Arc<RgbaImage>) -> &Texture2D {
        let key = Arc::as_ptr(image) as usize;
        &self
            .textures
            .entry(key)
            .or_insert_with(|| {
                let tex = Texture2D::from_rgba8(image.width() as u16, image.height() as u16, image.as_raw());
                tex.set_filter(FilterMode::Linear);
                (Arc::clone(image), tex)
            })
            .1
    }

    /// Drop textures for images nobody else holds anymore
    pub fn prune(&mut self) {
        self.textures.retain(|_, (image, _)| Arc::strong_count(image) > 1);
    }
}

/// Blit the software framebuffer letterboxed into `rect`
pub fn draw_framebuffer(fb: &Framebuffer, rect: Rect) {
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);

    let dest = rect.fit_aspect(fb.width as f32 / fb.height.max(1) as f32);
    draw_texture_ex(
        &texture,
        dest.x,
        dest.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(dest.w, dest.h)),
            ..Default::default()
        },
    );
}

pub fn draw_slot_bar<'a>(bar: &SlotBar, views: impl Iterator<Item = SlotView<'a>>, cache: &mut ImageCache, mouse: (f32, f32)) {
    draw_rectangle(bar.rect.x, bar.rect.y, bar.rect.w, bar.rect.h, PANEL_COLOR);

    for (rect, view) in bar.slot_rects().into_iter().zip(views) {
        let bg = if view.visible && rect.contains(mouse.0, mouse.1) { SLOT_HOVER } else { SLOT_BG };
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, SLOT_BORDER);

        let (true, Some(image)) = (view.visible, view.image) else {
            continue;
        };
        let inner = rect.pad(6.0).fit_aspect(image.width() as f32 / image.height().max(1) as f32);
        draw_texture_ex(
            cache.texture(image),
            inner.x,
            inner.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(inner.w, inner.h)),
                ..Default::default()
            },
        );
    }
}

/// Score top-left, timer top-right
pub fn draw_status(screen: Rect, title: &str, score: i32, elapsed: f32) {
    draw_text(title, screen.x + 12.0, screen.y + 28.0, FONT_SIZE_HEADER, TEXT_COLOR);
    draw_text(&format!("Score: {score}"), screen.x + 12.0, screen.y + 54.0, FONT_SIZE_CONTENT, TEXT_COLOR);

    let time = format_time(elapsed);
    let dims = measure_text(&time, None, FONT_SIZE_HEADER as u16, 1.0);
    draw_text(&time, screen.right() - dims.width - 12.0, screen.y + 28.0, FONT_SIZE_HEADER, TEXT_COLOR);
}

/// Big red cross in the middle of the screen
pub fn draw_wrong_mark(screen: Rect) {
    let (cx, cy) = (screen.center_x(), screen.center_y());
    let s = screen.w.min(screen.h) * 0.08;
    draw_line(cx - s, cy - s, cx + s, cy + s, 10.0, WRONG_MARK_COLOR);
    draw_line(cx - s, cy + s, cx + s, cy - s, 10.0, WRONG_MARK_COLOR);
}

pub fn draw_quiz_list(list: &ListLayout, entries: &[QuizEntry], selected: Option<&str>) {
    draw_rectangle(list.rect.x, list.rect.y, list.rect.w, list.rect.h, PANEL_COLOR);
    for (i, entry) in entries.iter().enumerate() {
        let row = list.row(i);
        if selected == Some(entry.id.as_str()) {
            draw_rectangle(row.x, row.y, row.w, row.h, SELECTED_COLOR);
        }
        draw_text(&entry.display_name, row.x + 10.0, row.y + row.h * 0.7, FONT_SIZE_CONTENT, TEXT_COLOR);
    }
}

pub fn draw_end_screen(screen: Rect, score: i32, elapsed: f32, previous: Option<(i32, f32)>) {
    draw_rectangle(screen.x, screen.y, screen.w, screen.h, OVERLAY_COLOR);

    let mut lines = vec![
        "Puzzle complete".to_string(),
        format!("Score: {score}"),
        format!("Time: {}", format_time(elapsed)),
    ];
    if let Some((best_score, best_time)) = previous {
        lines.push(format!("Previous: {best_score} in {}", format_time(best_time)));
    }

    let mut y = screen.center_y() - lines.len() as f32 * 18.0;
    for (i, line) in lines.iter().enumerate() {
        let size = if i == 0 { FONT_SIZE_HEADER * 1.4 } else { FONT_SIZE_CONTENT };
        let dims = measure_text(line, None, size as u16, 1.0);
        draw_text(line, screen.center_x() - dims.width * 0.5, y, size, if i == 0 { WHITE } else { TEXT_COLOR });
        y += 36.0;
    }
    draw_text("Press R to play again", screen.center_x() - 90.0, y + 12.0, FONT_SIZE_CONTENT, TEXT_DIM);
}
