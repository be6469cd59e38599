//! Bass energy → glow parameters, and the three glow surfaces they drive.

/// Share of the lowest frequency bins treated as the bass band.
const BASS_SHARE: f64 = 0.1;
/// Energies at or below this map to the resting glow.
const NOISE_FLOOR: f64 = 0.1;

pub const BASE_ALPHA: f64 = 0.12;
pub const ALPHA_RANGE: f64 = 0.6;
pub const BASE_SPREAD: f64 = 18.0;
pub const SPREAD_RANGE: f64 = 65.0;

/// rgb(124, 58, 237)
pub const ACCENT: (u8, u8, u8) = (124, 58, 237);

/// Mean of the lowest 10% of byte-valued frequency bins, normalised to
/// [0, 1]. Fewer than ten bins leaves an empty bass band, which reads as
/// silence.
pub fn bass_energy(bins: &[u8]) -> f64 {
    let bass_bins = (bins.len() as f64 * BASS_SHARE).floor() as usize;
    if bass_bins == 0 {
        return 0.0;
    }
    let sum: u32 = bins[..bass_bins].iter().map(|&b| u32::from(b)).sum();
    (f64::from(sum) / bass_bins as f64) / 255.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowParams {
    /// Opacity, 0.12 at rest up to 0.72.
    pub alpha: f64,
    /// Percentage of the surface the gradient covers before fading out.
    pub spread: f64,
}

impl GlowParams {
    pub fn from_energy(energy: f64) -> Self {
        let norm = (energy - NOISE_FLOOR).max(0.0) / (1.0 - NOISE_FLOOR);
        Self {
            alpha: BASE_ALPHA + norm * ALPHA_RANGE,
            spread: BASE_SPREAD + norm * SPREAD_RANGE,
        }
    }

    pub fn from_bins(bins: &[u8]) -> Self {
        Self::from_energy(bass_energy(bins))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Left,
    Right,
}

/// Direction the gradient travels from its opaque edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToBottom,
    ToRight,
    ToLeft,
}

impl Side {
    pub fn direction(self) -> Direction {
        match self {
            Side::Top => Direction::ToBottom,
            Side::Left => Direction::ToRight,
            Side::Right => Direction::ToLeft,
        }
    }
}

/// Linear gradient from the accent colour at `alpha` to fully transparent at
/// `spread` percent of the way across.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub direction: Direction,
    pub color: (u8, u8, u8),
    pub alpha: f64,
    pub spread: f64,
}

impl Gradient {
    /// Gradient alpha at `t` (0 at the opaque edge, 1 at the far edge).
    pub fn alpha_at(&self, t: f64) -> f64 {
        let stop = self.spread / 100.0;
        if stop <= 0.0 || t >= stop {
            return 0.0;
        }
        self.alpha * (1.0 - t.max(0.0) / stop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowSurface {
    pub side: Side,
    pub opacity: f64,
    pub gradient: Option<Gradient>,
}

impl GlowSurface {
    fn new(side: Side) -> Self {
        Self { side, opacity: 0.0, gradient: None }
    }

    fn apply(&mut self, params: GlowParams) {
        self.opacity = params.alpha;
        self.gradient = Some(Gradient {
            direction: self.side.direction(),
            color: ACCENT,
            alpha: params.alpha,
            spread: params.spread,
        });
    }

    fn clear(&mut self) {
        self.opacity = 0.0;
        self.gradient = None;
    }

    /// Effective alpha a point at `t` receives from this surface.
    pub fn intensity_at(&self, t: f64) -> f64 {
        self.gradient.map_or(0.0, |g| self.opacity * g.alpha_at(t))
    }

    pub fn is_lit(&self) -> bool {
        self.opacity > 0.0 && self.gradient.is_some()
    }
}

/// The hero's three glow elements. They always carry identical parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowSurfaces {
    pub top: GlowSurface,
    pub left: GlowSurface,
    pub right: GlowSurface,
}

impl Default for GlowSurfaces {
    fn default() -> Self {
        Self {
            top: GlowSurface::new(Side::Top),
            left: GlowSurface::new(Side::Left),
            right: GlowSurface::new(Side::Right),
        }
    }
}

impl GlowSurfaces {
    pub fn apply(&mut self, params: GlowParams) {
        for surface in self.iter_mut() {
            surface.apply(params);
        }
    }

    pub fn clear(&mut self) {
        for surface in self.iter_mut() {
            surface.clear();
        }
    }

    pub fn is_lit(&self) -> bool {
        self.iter().any(GlowSurface::is_lit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlowSurface> {
        [&self.top, &self.left, &self.right].into_iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut GlowSurface> {
        [&mut self.top, &mut self.left, &mut self.right].into_iter()
    }
}
