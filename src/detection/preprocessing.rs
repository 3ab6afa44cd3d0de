use std::ops::Deref;

use image::{GrayImage, ImageBuffer, Luma, Rgba};

/// Value written to the edge mask for pixels above the gradient threshold.
pub const EDGE: u8 = 255;

/// Convert an RGBA image to luminance (BT.601 weights, alpha ignored)
pub fn to_grayscale<C>(img: &ImageBuffer<Rgba<u8>, C>) -> GrayImage
where
    C: Deref<Target = [u8]>,
{
    let mut out = GrayImage::new(img.width(), img.height());
    to_grayscale_into(img, &mut out);
    out
}

pub fn to_grayscale_into<C>(img: &ImageBuffer<Rgba<u8>, C>, out: &mut GrayImage)
where
    C: Deref<Target = [u8]>,
{
    debug_assert_eq!(img.dimensions(), out.dimensions());
    for (src, dst) in img.pixels().zip(out.pixels_mut()) {
        let [r, g, b, _] = src.0;
        let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        *dst = Luma([luma.round().clamp(0.0, 255.0) as u8]);
    }
}

/// Normalized 1-D Gaussian kernel of size `2 * radius + 1` with `sigma = radius / 3`.
pub fn gaussian_kernel(radius: u32) -> Vec<f64> {
    if radius == 0 {
        return vec![1.0];
    }
    let r = f64::from(radius);
    let sigma = r / 3.0;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let d = f64::from(i) - r;
            (-(d * d) / two_sigma_sq).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Apply Gaussian blur to reduce noise
pub fn gaussian_blur(img: &GrayImage, radius: u32) -> GrayImage {
    let mut out = GrayImage::new(img.width(), img.height());
    gaussian_blur_into(img, radius, &mut out);
    out
}

/// Blurs the interior `[radius, dim - radius)` with the outer product of
/// [`gaussian_kernel`]. The border band of width `radius` is copied unchanged.
pub fn gaussian_blur_into(img: &GrayImage, radius: u32, out: &mut GrayImage) {
    debug_assert_eq!(img.dimensions(), out.dimensions());
    out.copy_from_slice(img);

    let (w, h) = (img.width() as usize, img.height() as usize);
    let r = radius as usize;
    if r == 0 || w <= 2 * r || h <= 2 * r {
        return;
    }

    let kernel = gaussian_kernel(radius);
    let src: &[u8] = img;
    for y in r..h - r {
        for x in r..w - r {
            let mut sum = 0.0;
            for (ky, wy) in kernel.iter().enumerate() {
                let row = (y + ky - r) * w;
                for (kx, wx) in kernel.iter().enumerate() {
                    sum += wy * wx * f64::from(src[row + x + kx - r]);
                }
            }
            out.put_pixel(x as u32, y as u32, Luma([sum.round().clamp(0.0, 255.0) as u8]));
        }
    }
}

/// Binary edge mask from central-difference gradient magnitude
pub fn detect_edges(img: &GrayImage, threshold: u32) -> GrayImage {
    let mut out = GrayImage::new(img.width(), img.height());
    detect_edges_into(img, threshold, &mut out);
    out
}

pub fn detect_edges_into(img: &GrayImage, threshold: u32, out: &mut GrayImage) {
    debug_assert_eq!(img.dimensions(), out.dimensions());
    for p in out.pixels_mut() {
        *p = Luma([0]);
    }

    let (w, h) = (img.width() as usize, img.height() as usize);
    if w < 3 || h < 3 {
        return;
    }

    let src: &[u8] = img;
    let threshold = f64::from(threshold);
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = y * w + x;
            let gx = i32::from(src[idx + 1]) - i32::from(src[idx - 1]);
            let gy = i32::from(src[idx + w]) - i32::from(src[idx - w]);
            let magnitude = f64::from(gx * gx + gy * gy).sqrt();
            if magnitude > threshold {
                out.put_pixel(x as u32, y as u32, Luma([EDGE]));
            }
        }
    }
}
