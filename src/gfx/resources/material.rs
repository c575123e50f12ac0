//! Surface colors and materials
//!
//! Every object owns its own [`Material`] so that changing one object's color
//! never affects another. Colors are stored as sRGB components and converted
//! to linear space only when they are handed to the GPU.

/// An sRGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a 24-bit `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Returns the color as a 24-bit `0xRRGGBB` value.
    pub fn hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Linear-space RGB, multiplied by `intensity`.
    pub fn to_linear_scaled(&self, intensity: f32) -> [f32; 3] {
        [
            srgb_to_linear(self.r) * intensity,
            srgb_to_linear(self.g) * intensity,
            srgb_to_linear(self.b) * intensity,
        ]
    }

    /// Linear-space RGBA.
    pub fn to_linear_rgba(&self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_linear_scaled(1.0);
        [r, g, b, alpha]
    }

    /// Linear-space color for a render pass clear.
    pub fn to_wgpu(&self) -> wgpu::Color {
        let [r, g, b] = self.to_linear_scaled(1.0);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Color::from_hex(hex)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Surface parameters of an object
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            color: Color::rgb(0.8, 0.8, 0.8),
            metallic: 0.0,
            roughness: 1.0,
        }
    }
}

impl Material {
    /// Creates a rough dielectric material with the given color.
    pub fn new(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            color,
            ..Default::default()
        }
    }

    /// Builder pattern: Set base color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder pattern: Set metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }
}
