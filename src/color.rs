/// Logical line color in RGBA format.
///
/// Builders never write this value into vertices directly. It is resolved once per shape by the
/// [`TextureResolver`](crate::TextureResolver) into a region of the color atlas, and vertices
/// carry the center of that region as their color texture coordinate.
///
/// # Examples
///
/// ```
/// use linework::Color;
///
/// let road = Color::rgb(255, 200, 0);
/// assert_eq!(road.to_array(), [255, 200, 0, 255]);
///
/// let shadow = Color::rgba(0, 0, 0, 128);
/// assert!(!shadow.is_opaque());
///
/// assert_eq!(Color::from_hex(0xff0000ff), Color::rgb(255, 0, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    /// Opaque black.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// Opaque white.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Creates an opaque color from its red, green and blue channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Creates a color from all four channels.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Creates a color from a packed `0xRRGGBBAA` value, the format style files use.
    pub fn from_hex(rgba: u32) -> Self {
        Self(rgba.to_be_bytes())
    }

    /// Channels scaled to `[0.0, 1.0]`.
    pub fn normalize(&self) -> [f32; 4] {
        self.0.map(|channel| channel as f32 / 255.0)
    }

    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }

    pub fn is_opaque(&self) -> bool {
        self.0[3] == 255
    }
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_is_read_as_rgba() {
        assert_eq!(Color::from_hex(0x11223344), Color::rgba(0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn normalize_maps_full_channel_to_one() {
        assert_eq!(Color::rgb(255, 0, 0).normalize(), [1.0, 0.0, 0.0, 1.0]);
    }
}
