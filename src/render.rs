//! Half-block pixel renderer for a scene.
use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::bird::Bird;
use crate::game::Phase;
use crate::geometry::{Aabb, GROUND_Y, WORLD_LEFT, WORLD_RIGHT, WORLD_TOP};
use crate::pipe::{PIPE_GAP, PIPE_WIDTH, Pipe};
use crate::scene::{GameOverPanel, Scene};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn halved(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PANEL: Rgb = Rgb(220, 195, 120);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// World y at the bottom edge of the screen.
const VIEW_BOTTOM: f64 = GROUND_Y - 1.2;

// ── Pixel buffer ────────────────────────────────────────────────────────────

/// Two pixels per terminal cell, drawn with the upper half-block glyph.
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Write the whole buffer from the top-left corner, changing colors only
    /// when they differ from the previous cell.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.term()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.term()))?;
                    fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?; // ▀
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, ch) in s.bytes().enumerate() {
        let glyph = &DIGITS[(ch - b'0') as usize];
        let x = start_x + i as i32 * 4;
        for (cell, on) in glyph.iter().enumerate() {
            if *on == 1 {
                let px = x + (cell % 3) as i32;
                let py = y + (cell / 3) as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

// ── World to screen ─────────────────────────────────────────────────────────

/// Maps world units onto the pixel buffer.
#[derive(Clone, Copy, Debug)]
pub struct View {
    pw: f64,
    ph: f64,
}

impl View {
    pub fn new(pw: usize, ph: usize) -> Self {
        Self {
            pw: pw as f64,
            ph: ph as f64,
        }
    }

    pub fn px(&self, x: f64) -> i32 {
        ((x - WORLD_LEFT) / (WORLD_RIGHT - WORLD_LEFT) * self.pw).floor() as i32
    }

    pub fn py(&self, y: f64) -> i32 {
        ((WORLD_TOP - y) / (WORLD_TOP - VIEW_BOTTOM) * self.ph).floor() as i32
    }

    /// Pixels per world unit, vertically.
    fn unit(&self) -> f64 {
        self.ph / (WORLD_TOP - VIEW_BOTTOM)
    }

    fn fill(&self, buf: &mut PixelBuf, b: &Aabb, c: Rgb) {
        let x0 = self.px(b.left());
        let y0 = self.py(b.top());
        let x1 = self.px(b.right()).max(x0 + 1);
        let y1 = self.py(b.bottom()).max(y0 + 1);
        buf.fill_rect(x0, y0, x1 - x0, y1 - y0, c);
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Draw the scene. `scroll` is the distance the ground has travelled, in
/// world units.
pub fn draw_scene(buf: &mut PixelBuf, scene: &Scene, phase: Phase, scroll: f64) {
    let view = View::new(buf.width(), buf.height());

    draw_sky(buf, &view);
    draw_hills(buf, &view, scroll);
    for pipe in &scene.pipes {
        draw_pipe(buf, &view, pipe);
    }
    draw_ground(buf, &view, scroll);
    if let Some(bird) = &scene.bird {
        draw_bird(buf, &view, bird, scroll);
    }

    if phase == Phase::Ready {
        draw_title(buf, &view);
    }
    if let Some(panel) = scene.game_over.as_ref().filter(|p| p.is_visible()) {
        draw_game_over(buf, &view, panel);
    }
}

fn draw_sky(buf: &mut PixelBuf, view: &View) {
    let sky_h = view.py(GROUND_Y).max(1);
    for y in 0..sky_h {
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, (y * 256 / sky_h) as u16);
        buf.fill_rect(0, y, buf.width() as i32, 1, c);
    }
}

fn draw_hills(buf: &mut PixelBuf, view: &View, scroll: f64) {
    let base = view.py(GROUND_Y);
    let s = view.unit() / 4.0;
    for (c, speed, freq, amp, lift) in [
        (HILL_FAR, 0.8, 0.04, 6.0, 4.0),
        (HILL_NEAR, 1.6, 0.06, 4.0, 2.0),
    ] {
        for x in 0..buf.width() as i32 {
            let fx = (x as f64 + scroll * speed) * freq;
            let h = (fx.sin() * amp + (fx * 1.9).sin() * amp / 2.0) * s;
            let top = base - h as i32 - (lift * s) as i32;
            buf.fill_rect(x, top, 1, base - top, c);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, view: &View, scroll: f64) {
    let gy = view.py(GROUND_Y);
    let offset = view.px(WORLD_LEFT + scroll) - view.px(WORLD_LEFT);
    for x in 0..buf.width() as i32 {
        let alt = ((x + offset) / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
    }
    for y in (gy + 2)..buf.height() as i32 {
        for x in 0..buf.width() as i32 {
            let stripe = (x + offset + (y - gy) * 2).rem_euclid(12) < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn draw_pipe(buf: &mut PixelBuf, view: &View, pipe: &Pipe) {
    let left = view.px(pipe.x() - PIPE_WIDTH / 2.0);
    let w = (view.px(pipe.x() + PIPE_WIDTH / 2.0) - left).max(1);
    let gap_top = view.py(pipe.gap_center() + PIPE_GAP / 2.0);
    let gap_bot = view.py(pipe.gap_center() - PIPE_GAP / 2.0);
    let ground = view.py(GROUND_Y);
    let cap_extra = (view.unit() / 6.0).max(1.0) as i32;
    let cap_h = (view.unit() / 3.0).max(2.0) as i32;

    for x in 0..w {
        let c = pipe_shade(x, w);
        buf.fill_rect(left + x, 0, 1, gap_top - cap_h, c);
        buf.fill_rect(left + x, gap_bot + cap_h, 1, ground - gap_bot - cap_h, c);
    }

    let cap_w = w + cap_extra * 2;
    for x in 0..cap_w {
        let c = pipe_shade(x, cap_w);
        let cx = left - cap_extra + x;
        buf.fill_rect(cx, gap_top - cap_h, 1, cap_h, c);
        buf.fill_rect(cx, gap_bot, 1, cap_h, c);
        for y in [gap_top - cap_h, gap_top - 1, gap_bot, gap_bot + cap_h - 1] {
            buf.set(cx, y, CAP_DARK);
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

fn draw_bird(buf: &mut PixelBuf, view: &View, bird: &Bird, scroll: f64) {
    let body = bird.collider().bounds;
    view.fill(buf, &body, BIRD_Y);

    let x0 = view.px(body.left());
    let x1 = view.px(body.right());
    let y0 = view.py(body.top());
    let y1 = view.py(body.bottom());
    let s = (view.unit() / 4.0).max(1.0) as i32;
    let tilt = if bird.vy() > 2.0 {
        -1
    } else if bird.vy() < -4.0 {
        1
    } else {
        0
    };

    buf.fill_rect(x0 + 1, y0, (x1 - x0 - 2).max(1), 1, BIRD_HI);

    // Wing flaps with distance travelled
    let wing_y = if (scroll * 4.0) as i64 % 2 == 0 { -1 } else { 1 };
    buf.fill_rect(x0 + 1, (y0 + y1) / 2 + wing_y + tilt, 2 * s, s, BIRD_WING);

    let ex = x1 - 2 * s;
    buf.fill_rect(ex, y0 + 1, s + 1, s + 1, BIRD_EYE);
    buf.set(ex + s, y0 + 1 + s, BIRD_PUPIL);

    buf.fill_rect(x1, (y0 + y1) / 2 + tilt, 2 * s, s.max(1), BIRD_BEAK);
    buf.fill_rect(x0 - s, (y0 + y1) / 2 - 1 + tilt, s, 2, BIRD_WING);
}

fn draw_title(buf: &mut PixelBuf, view: &View) {
    let cx = buf.width() as i32 / 2;
    let cy = view.py(WORLD_TOP - 1.5);
    let char_w = (view.unit() / 2.0).max(3.0) as i32;
    let char_h = (view.unit() * 0.75).max(4.0) as i32;
    let letters = 6;
    let sx = cx - letters * char_w / 2;

    for i in 0..letters {
        let bx = sx + i * char_w;
        buf.fill_rect(bx, cy, char_w - 1, char_h, BIRD_Y);
        buf.fill_rect(bx, cy, char_w - 1, 1, BIRD_HI);
    }
}

fn draw_game_over(buf: &mut PixelBuf, view: &View, panel: &GameOverPanel) {
    for y in 0..buf.height() {
        for x in 0..buf.width() {
            let c = buf.get(x, y).halved();
            buf.set(x as i32, y as i32, c);
        }
    }

    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 2;
    let panel_w = (view.unit() * 5.0).max(30.0) as i32;
    let panel_h = (view.unit() * 2.5).max(16.0) as i32;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;

    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, DIRT);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

    draw_number(buf, cx, py + 4, panel.score(), WHITE);
    draw_number(buf, cx, py + 12, panel.best(), BIRD_Y);
}

/// Print every label's text on the top terminal row, left to right.
pub fn render_labels(out: &mut impl Write, scene: &Scene) -> io::Result<()> {
    let mut col: u16 = 1;
    for label in scene.labels() {
        let text = label.text();
        if text.is_empty() {
            continue;
        }
        queue!(
            out,
            cursor::MoveTo(col, 0),
            style::SetForegroundColor(WHITE.term()),
            style::SetBackgroundColor(SHADOW.term()),
            style::Print(format!(" {text} ")),
            style::ResetColor,
        )?;
        col = col.saturating_add(text.len() as u16 + 3);
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::display::SCORE_TEXT;
    use crate::scene::standard_scene;

    #[test]
    fn test_view_maps_world_edges() {
        let view = View::new(180, 100);
        assert_eq!(view.px(WORLD_LEFT), 0);
        assert_eq!(view.px(WORLD_RIGHT), 180);
        assert_eq!(view.py(WORLD_TOP), 0);
        assert!(view.py(GROUND_Y) < 100);
    }

    #[test]
    fn test_render_emits_half_blocks() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(0, 0, WHITE);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('\u{2580}'));
        assert!(text.contains("\r\n"));
    }

    #[test]
    fn test_draw_scene_with_pipe_and_panel() {
        let mut scene = standard_scene("Main", &GameConfig::default());
        scene.pipes.push(Pipe::new(0.0, 0.5, 2.0));
        let mut buf = PixelBuf::new(90, 60);
        draw_scene(&mut buf, &scene, Phase::Playing, 0.0);
        let view = View::new(90, 60);
        let top_of_pipe = buf.get(view.px(0.0) as usize, 0);
        assert_ne!(top_of_pipe, SKY_TOP);

        scene.game_over.as_mut().unwrap().show(3, 7);
        draw_scene(&mut buf, &scene, Phase::Over, 0.0);
        assert_eq!(buf.get(0, 0), SKY_TOP.halved());
    }

    #[test]
    fn test_labels_are_printed() {
        let scene = standard_scene("Main", &GameConfig::default());
        scene.label(SCORE_TEXT).unwrap().set_text("Score: 12");
        let mut out = Vec::new();
        render_labels(&mut out, &scene).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("Score: 12"));
    }
}
