use eframe::egui;
use tray_icon::Icon;

/// Muted tile palette; a target hashes to a stable slot so its color never
/// shifts between sessions.
const TILE_PALETTE: [[u8; 3]; 8] = [
    [66, 133, 244],
    [219, 68, 55],
    [244, 180, 0],
    [15, 157, 88],
    [171, 71, 188],
    [0, 172, 193],
    [255, 112, 67],
    [92, 107, 192],
];

fn stable_hash64(input: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in input {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

pub fn tile_color(target: &str) -> egui::Color32 {
    let slot = (stable_hash64(target.as_bytes()) % TILE_PALETTE.len() as u64) as usize;
    let [r, g, b] = TILE_PALETTE[slot];
    egui::Color32::from_rgb(r, g, b)
}

/// Synthesizes a rounded-square tile for a launch target: palette color from
/// the target hash, a slight vertical gradient, transparent corners. The
/// display initial is painted over it as regular text by the UI layer.
pub fn synthesize_tile(target: &str, side: usize) -> egui::ColorImage {
    let side = side.clamp(16, 256);
    let base = tile_color(target);
    let radius = (side as f32 * 0.22).max(2.0);
    let mut pixels = vec![0u8; side * side * 4];

    for y in 0..side {
        // Lighten toward the top, darken toward the bottom.
        let shade = 1.10 - 0.20 * (y as f32 / side as f32);
        let r = (base.r() as f32 * shade).min(255.0) as u8;
        let g = (base.g() as f32 * shade).min(255.0) as u8;
        let b = (base.b() as f32 * shade).min(255.0) as u8;
        for x in 0..side {
            let alpha = corner_alpha(x as f32 + 0.5, y as f32 + 0.5, side as f32, radius);
            let i = (y * side + x) * 4;
            pixels[i] = r;
            pixels[i + 1] = g;
            pixels[i + 2] = b;
            pixels[i + 3] = alpha;
        }
    }
    egui::ColorImage::from_rgba_unmultiplied([side, side], &pixels)
}

fn corner_alpha(x: f32, y: f32, side: f32, radius: f32) -> u8 {
    let cx = x.clamp(radius, side - radius);
    let cy = y.clamp(radius, side - radius);
    let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
    if dist <= radius - 0.5 {
        255
    } else if dist >= radius + 0.5 {
        0
    } else {
        ((radius + 0.5 - dist) * 255.0) as u8
    }
}

pub fn generate_tray_icon(target: &str) -> Icon {
    let image = synthesize_tile(target, 32);
    Icon::from_rgba(image.as_raw().to_vec(), 32, 32).expect("Failed to create icon")
}
