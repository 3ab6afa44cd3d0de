use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A box to paint onto a fixture image.
#[derive(Debug, Clone, Copy)]
pub struct Box2 {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Box2 {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

pub fn blank(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// White canvas with solid black boxes painted on it.
pub fn boxes_on_white(width: u32, height: u32, boxes: &[Box2]) -> RgbaImage {
    let mut img = blank(width, height, WHITE);
    for b in boxes {
        draw_filled_rect_mut(&mut img, Rect::at(b.x, b.y).of_size(b.width, b.height), BLACK);
    }
    img
}

/// White canvas with one black box outline whose stroke grows inward.
pub fn outline_on_white(width: u32, height: u32, b: Box2, stroke: u32) -> RgbaImage {
    let mut img = blank(width, height, WHITE);
    for i in 0..stroke {
        let inset = i as i32;
        let rect = Rect::at(b.x + inset, b.y + inset)
            .of_size(b.width - 2 * i, b.height - 2 * i);
        draw_hollow_rect_mut(&mut img, rect, BLACK);
    }
    img
}

/// The reference scene: 200x150 white image with one black 80x50 box.
pub fn single_box_scene() -> RgbaImage {
    boxes_on_white(200, 150, &[Box2::new(60, 50, 80, 50)])
}

/// 4x3 grid of 30x20 boxes spaced well apart.
pub fn box_grid_scene() -> RgbaImage {
    let mut boxes = Vec::new();
    for row in 0..3 {
        for col in 0..4 {
            boxes.push(Box2::new(20 + 70 * col, 20 + 60 * row, 30, 20));
        }
    }
    boxes_on_white(320, 200, &boxes)
}
