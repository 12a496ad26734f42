// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the logical canvas, upscaled with hard pixel edges.
// 2) Opaque blits for the background tile, alpha blits for runner frames.
// 3) A tiny 5x7 bitmap font to render HUD text on top of the scene.

use crate::app::Action;
use crate::error::{Error, Result};
use crate::types::FrameBuffer;
use image::RgbaImage;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window for a `width` x `height` canvas, shown `scale` times larger.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, scale: u32, target_fps: usize) -> Result<Self> {
        let options = WindowOptions { scale: window_scale(scale), ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Keys pressed since the last `present`, translated to actions.
    pub fn actions(&self) -> Vec<Action> {
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(action_for_key)
            .collect()
    }
}

/// minifb only upscales by powers of two; anything else rounds down.
fn window_scale(scale: u32) -> Scale {
    match scale {
        0 | 1 => Scale::X1,
        2..=3 => Scale::X2,
        4..=7 => Scale::X4,
        8..=15 => Scale::X8,
        16..=31 => Scale::X16,
        _ => Scale::X32,
    }
}

/// W/S rows, A/D columns (arrows too), Q/E animation fps, -/+ height,
/// F mirror, Space pause, Esc quit.
pub fn action_for_key(key: Key) -> Option<Action> {
    match key {
        Key::W | Key::Up => Some(Action::RowsDown),
        Key::S | Key::Down => Some(Action::RowsUp),
        Key::A | Key::Left => Some(Action::ColumnsDown),
        Key::D | Key::Right => Some(Action::ColumnsUp),
        Key::Q => Some(Action::FrameRateDown),
        Key::E => Some(Action::FrameRateUp),
        Key::Minus | Key::NumPadMinus => Some(Action::HeightDown),
        Key::Equal | Key::NumPadPlus => Some(Action::HeightUp),
        Key::F => Some(Action::ToggleMirror),
        Key::Space => Some(Action::TogglePause),
        Key::Escape => Some(Action::Quit),
        _ => None,
    }
}

/* ---------- Software drawing: fills, blits, tiny bitmap font ---------- */

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Paint the whole canvas one color.
pub fn fill(fb: &mut FrameBuffer, color: u32) {
    fb.pixels.fill(color);
}

/// One-pixel horizontal line from x0 to x1 inclusive (the ground).
pub fn hline(fb: &mut FrameBuffer, x0: i32, x1: i32, y: i32, color: u32) {
    for x in x0.min(x1)..=x0.max(x1) {
        put_pixel(fb, x, y, color);
    }
}

/// Clip `img` placed at (x,y) against the framebuffer.
/// Returns (first src col, first src row, dst x, dst y, cols, rows) or None when nothing shows.
fn clip(fb: &FrameBuffer, img: &RgbaImage, x: i64, y: i64) -> Option<(usize, usize, usize, usize, usize, usize)> {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(fb.width as i64);
    let y1 = (y + h).min(fb.height as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((
        (x0 - x) as usize,
        (y0 - y) as usize,
        x0 as usize,
        y0 as usize,
        (x1 - x0) as usize,
        (y1 - y0) as usize,
    ))
}

/// Copy `img` onto the canvas ignoring alpha (background tiles).
pub fn blit_opaque(fb: &mut FrameBuffer, img: &RgbaImage, x: i64, y: i64) {
    let Some((sx, sy, dx, dy, cols, rows)) = clip(fb, img, x, y) else { return };
    for row in 0..rows {
        let dst_row = (dy + row) * fb.width + dx;
        for col in 0..cols {
            let p = img.get_pixel((sx + col) as u32, (sy + row) as u32);
            fb.pixels[dst_row + col] = rgb(p[0], p[1], p[2]);
        }
    }
}

/// Composite `img` over the canvas using its alpha channel (runner frames).
pub fn blit_alpha(fb: &mut FrameBuffer, img: &RgbaImage, x: i64, y: i64) {
    let Some((sx, sy, dx, dy, cols, rows)) = clip(fb, img, x, y) else { return };
    for row in 0..rows {
        let dst_row = (dy + row) * fb.width + dx;
        for col in 0..cols {
            let p = img.get_pixel((sx + col) as u32, (sy + row) as u32);
            let a = p[3] as u32;
            if a == 0 {
                continue;
            }
            let idx = dst_row + col;
            if a == 255 {
                fb.pixels[idx] = rgb(p[0], p[1], p[2]);
                continue;
            }

            let old = fb.pixels[idx];
            let inv = 255 - a;
            let mix = |src: u8, shift: u32| (src as u32 * a + ((old >> shift) & 0xFF) * inv + 127) / 255;
            fb.pixels[idx] = (mix(p[0], 16) << 16) | (mix(p[1], 8) << 8) | mix(p[2], 0);
        }
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y).
/// Visual: a tiny glyph appears with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 1-pixel spacing.
/// Lowercase is drawn as uppercase; unknown characters leave a blank cell.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}
