/// An RGB pixel or light color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const ORANGE: Rgb = Rgb::new(0xff, 0x7f, 0x00);
    pub const YELLOW: Rgb = Rgb::new(0xff, 0xff, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0xff, 0x00);
    pub const CYAN: Rgb = Rgb::new(0x00, 0xff, 0xff);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
    pub const PURPLE: Rgb = Rgb::new(0x7f, 0x00, 0xff);
    pub const PINK: Rgb = Rgb::new(0xff, 0x00, 0xff);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    /// Cycle colors, assigned round-robin by join order.
    pub const PALETTE: &[Rgb] = &[
        Rgb::BLUE,
        Rgb::RED,
        Rgb::GREEN,
        Rgb::PURPLE,
        Rgb::CYAN,
        Rgb::ORANGE,
        Rgb::YELLOW,
        Rgb::PINK,
        Rgb::WHITE,
    ];

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale each channel by a 0.0..=1.0 brightness factor.
    pub fn scaled(self, amt: f32) -> Rgb {
        Rgb::new(
            (f32::from(self.r) * amt) as u8,
            (f32::from(self.g) * amt) as u8,
            (f32::from(self.b) * amt) as u8,
        )
    }
}
