//! The color-space pipeline: sRGB, linear RGB, CIE XYZ, CIE L*C*h and HSL,
//! with the XYZ matrix derived from the sRGB primaries and a configurable
//! illuminant-D whitepoint.

/// 8-bit-per-channel sRGB, the palette's storage form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Srgb888 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb888 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Companded sRGB in 0..=1 per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// CIE 1931 chromaticity coordinates (the xy plane of xyY).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

/// CIE 1931 tristimulus values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Cylindrical CIE L*a*b*: lightness, chroma, hue angle in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// Hue/saturation/lightness with hue in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

pub type Matrix3 = [[f64; 3]; 3];

const CIE_EPSILON: f64 = 216.0 / 24389.0;
const CIE_KAPPA: f64 = 24389.0 / 27.0;

/// Chromaticity of CIE standard illuminant D at blackbody temperature `t`
/// (e.g. 5000, 6500), per the piecewise polynomial.
pub fn illuminant_d(t: f64) -> Xy {
    let x = if t <= 7000.0 {
        0.244063 + 0.09911 * 1000.0 / t + 2.9678 * 1e6 / (t * t) - 4.6070 * 1e9 / (t * t * t)
    } else {
        0.237040 + 0.24748 * 1000.0 / t + 1.9018 * 1e6 / (t * t) - 2.0064 * 1e9 / (t * t * t)
    };
    Xy {
        x,
        y: -3.0 * x * x + 2.87 * x - 0.275,
    }
}

/// Lift a whitepoint chromaticity to tristimulus with Y normalized to 1.
/// Only meaningful for white.
pub fn white_xyz(w: Xy) -> Xyz {
    Xyz {
        x: w.x / w.y,
        y: 1.0,
        z: (1.0 - w.x - w.y) / w.y,
    }
}

fn mat_mul_vec(m: &Matrix3, v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn mat_inverse(m: &Matrix3) -> Matrix3 {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    let d = 1.0 / det;
    [
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * d,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * d,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * d,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * d,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * d,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * d,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * d,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * d,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * d,
        ],
    ]
}

/// Linear-RGB to XYZ matrix for the sRGB primaries and the given white:
/// `M = M' * diag(M'^-1 * W)`, <https://mina86.com/2019/srgb-xyz-matrix/>.
pub fn rgb_to_xyz_matrix(white: Xyz) -> Matrix3 {
    const RED: Xy = Xy { x: 0.64, y: 0.33 };
    const GREEN: Xy = Xy { x: 0.30, y: 0.60 };
    const BLUE: Xy = Xy { x: 0.15, y: 0.06 };
    let col = |p: Xy| [p.x / p.y, 1.0, (1.0 - p.x - p.y) / p.y];
    let (r, g, b) = (col(RED), col(GREEN), col(BLUE));
    let m_prime: Matrix3 = [
        [r[0], g[0], b[0]],
        [r[1], g[1], b[1]],
        [r[2], g[2], b[2]],
    ];
    let s = mat_mul_vec(&mat_inverse(&m_prime), [white.x, white.y, white.z]);
    [
        [m_prime[0][0] * s[0], m_prime[0][1] * s[1], m_prime[0][2] * s[2]],
        [m_prime[1][0] * s[0], m_prime[1][1] * s[1], m_prime[1][2] * s[2]],
        [m_prime[2][0] * s[0], m_prime[2][1] * s[1], m_prime[2][2] * s[2]],
    ]
}

/// Whitepoint, conversion matrices and the gamma override: the explicit
/// context every conversion goes through.
#[derive(Debug, Clone)]
pub struct ColorEngine {
    white: Xyz,
    rgb_to_xyz: Matrix3,
    xyz_to_rgb: Matrix3,
    /// `cfgamma=g`: replace the piecewise sRGB expansion by a pure power.
    pub continuous_gamma: Option<f64>,
}

impl Default for ColorEngine {
    fn default() -> Self {
        Self::new(6500.0)
    }
}

impl ColorEngine {
    pub fn new(temperature: f64) -> Self {
        let mut engine = Self {
            white: Xyz::default(),
            rgb_to_xyz: Matrix3::default(),
            xyz_to_rgb: Matrix3::default(),
            continuous_gamma: None,
        };
        engine.set_illuminant(temperature);
        engine
    }

    /// Recompute the matrices for a new illuminant-D temperature; returns
    /// the chromaticity and tristimulus for reporting.
    pub fn set_illuminant(&mut self, temperature: f64) -> (Xy, Xyz) {
        let chroma = illuminant_d(temperature);
        let white = white_xyz(chroma);
        self.white = white;
        self.rgb_to_xyz = rgb_to_xyz_matrix(white);
        self.xyz_to_rgb = mat_inverse(&self.rgb_to_xyz);
        (chroma, white)
    }

    pub fn matrix(&self) -> &Matrix3 {
        &self.rgb_to_xyz
    }

    /// sRGB transfer expansion. The linear toe avoids a zero slope at
    /// black; the 2.4 exponent compensates the toe so the curve tracks an
    /// effective 2.2 gamma.
    pub fn expand(&self, c: f64) -> f64 {
        if let Some(g) = self.continuous_gamma {
            return c.powf(g);
        }
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(12.0 / 5.0).min(1.0)
        }
    }

    pub fn compress(&self, c: f64) -> f64 {
        if c <= 0.04045 / 12.92 {
            c * 12.92
        } else {
            c.powf(5.0 / 12.0) * 1.055 - 0.055
        }
    }

    /// Relative luminance of a companded color: the Y row of the matrix
    /// applied to linear RGB.
    pub fn luminance(&self, c: Srgb) -> f64 {
        let m = &self.rgb_to_xyz;
        m[1][0] * self.expand(c.r) + m[1][1] * self.expand(c.g) + m[1][2] * self.expand(c.b)
    }

    pub fn srgb_to_xyz(&self, c: Srgb) -> Xyz {
        let v = mat_mul_vec(
            &self.rgb_to_xyz,
            [self.expand(c.r), self.expand(c.g), self.expand(c.b)],
        );
        Xyz {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }

    pub fn xyz_to_srgb(&self, v: Xyz) -> Srgb {
        let lin = mat_mul_vec(&self.xyz_to_rgb, [v.x, v.y, v.z]);
        Srgb {
            r: self.compress(lin[0]),
            g: self.compress(lin[1]),
            b: self.compress(lin[2]),
        }
    }

    pub fn srgb_to_lch(&self, c: Srgb) -> Lch {
        let v = self.srgb_to_xyz(c);
        let f = |t: f64| {
            if t > CIE_EPSILON {
                t.cbrt()
            } else {
                (CIE_KAPPA * t + 16.0) / 116.0
            }
        };
        let fx = f(v.x / self.white.x);
        let fy = f(v.y / self.white.y);
        let fz = f(v.z / self.white.z);
        let l = 116.0 * fy - 16.0;
        let a = 500.0 * (fx - fy);
        let b = 200.0 * (fy - fz);
        Lch {
            l,
            c: a.hypot(b),
            h: b.atan2(a).to_degrees().rem_euclid(360.0),
        }
    }

    pub fn lch_to_srgb(&self, c: Lch) -> Srgb {
        let h = c.h.to_radians();
        let (a, b) = (c.c * h.cos(), c.c * h.sin());
        let fy = (c.l + 16.0) / 116.0;
        let fx = fy + a / 500.0;
        let fz = fy - b / 200.0;
        let finv = |f: f64| {
            let f3 = f * f * f;
            if f3 > CIE_EPSILON {
                f3
            } else {
                (116.0 * f - 16.0) / CIE_KAPPA
            }
        };
        let yr = if c.l > CIE_KAPPA * CIE_EPSILON {
            fy * fy * fy
        } else {
            c.l / CIE_KAPPA
        };
        self.xyz_to_srgb(Xyz {
            x: finv(fx) * self.white.x,
            y: yr * self.white.y,
            z: finv(fz) * self.white.z,
        })
    }

    pub fn to_lch(&self, c: Srgb888) -> Lch {
        self.srgb_to_lch(srgb_from_888(c))
    }

    pub fn to_srgb888(&self, c: Lch) -> Srgb888 {
        srgb_to_888(self.lch_to_srgb(c))
    }
}

pub fn srgb_from_888(c: Srgb888) -> Srgb {
    Srgb {
        r: c.r as f64 / 255.0,
        g: c.g as f64 / 255.0,
        b: c.b as f64 / 255.0,
    }
}

pub fn srgb_to_888(c: Srgb) -> Srgb888 {
    let q = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Srgb888::new(q(c.r), q(c.g), q(c.b))
}

pub fn to_hsl(i: Srgb) -> Hsl {
    let vmin = i.r.min(i.g).min(i.b);
    let vmax = i.r.max(i.g).max(i.b);
    let l = (vmin + vmax) / 2.0;
    if vmax == vmin {
        return Hsl { h: 0.0, s: 0.0, l };
    }
    let d = vmax - vmin;
    let s = if l > 0.5 {
        d / (2.0 - vmax - vmin)
    } else {
        d / (vmax + vmin)
    };
    let mut h = if vmax == i.r {
        (i.g - i.b) / d + if i.g < i.b { 6.0 } else { 0.0 }
    } else if vmax == i.g {
        (i.b - i.r) / d + 2.0
    } else {
        (i.r - i.g) / d + 4.0
    };
    h *= 60.0;
    Hsl { h, s, l }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 360.0;
    }
    if t > 360.0 {
        t -= 360.0;
    }
    if t < 60.0 {
        p + (q - p) * t / 60.0
    } else if t < 180.0 {
        q
    } else if t < 240.0 {
        p + (q - p) * (4.0 - t / 60.0)
    } else {
        p
    }
}

pub fn hsl_to_srgb(c: Hsl) -> Srgb {
    if c.s <= 0.0 {
        return Srgb {
            r: c.l,
            g: c.l,
            b: c.l,
        };
    }
    let q = if c.l < 0.5 {
        c.l * (1.0 + c.s)
    } else {
        c.l + c.s - c.l * c.s
    };
    let p = 2.0 * c.l - q;
    Srgb {
        r: hue_to_rgb(p, q, c.h + 120.0),
        g: hue_to_rgb(p, q, c.h),
        b: hue_to_rgb(p, q, c.h - 120.0),
    }
}

pub fn to_hex(c: Srgb888) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Parse `rrggbb` with an optional leading `#`; returns the color and how
/// many input characters were consumed.
pub fn parse_hex(s: &str) -> Option<(Srgb888, usize)> {
    let bytes = s.as_bytes();
    let skip = usize::from(bytes.first() == Some(&b'#'));
    let hex = s.get(skip..skip + 6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((Srgb888::new(r, g, b), 6 + skip))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d65_whitepoint_location() {
        let w = illuminant_d(6500.0);
        assert!((w.x - 0.3128).abs() < 5e-4, "x = {}", w.x);
        assert!((w.y - 0.3292).abs() < 5e-4, "y = {}", w.y);
    }

    #[test]
    fn test_mid_gray_lightness() {
        let engine = ColorEngine::default();
        let lch = engine.srgb_to_lch(Srgb {
            r: 0.5,
            g: 0.5,
            b: 0.5,
        });
        assert!((lch.l - 53.4).abs() < 0.1, "l = {}", lch.l);
        assert!(lch.c < 1e-6, "c = {}", lch.c);
    }

    #[test]
    fn test_round_trip_within_one_per_channel() {
        let engine = ColorEngine::default();
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(51) {
                for b in (0..=255).step_by(51) {
                    let c = Srgb888::new(r as u8, g as u8, b as u8);
                    let back = engine.to_srgb888(engine.to_lch(c));
                    assert!(
                        (back.r as i32 - c.r as i32).abs() <= 1
                            && (back.g as i32 - c.g as i32).abs() <= 1
                            && (back.b as i32 - c.b as i32).abs() <= 1,
                        "{c:?} -> {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_matrix_rows_sum_to_white() {
        let engine = ColorEngine::default();
        let m = engine.matrix();
        let w = white_xyz(illuminant_d(6500.0));
        assert!((m[0][0] + m[0][1] + m[0][2] - w.x).abs() < 1e-9);
        assert!((m[1][0] + m[1][1] + m[1][2] - 1.0).abs() < 1e-9);
        assert!((m[2][0] + m[2][1] + m[2][2] - w.z).abs() < 1e-9);
    }

    #[test]
    fn test_hsl_round_trip() {
        let c = Srgb {
            r: 2.0 / 3.0,
            g: 1.0 / 3.0,
            b: 0.0,
        };
        let h = to_hsl(c);
        let back = hsl_to_srgb(h);
        assert!((back.r - c.r).abs() < 1e-9);
        assert!((back.g - c.g).abs() < 1e-9);
        assert!((back.b - c.b).abs() < 1e-9);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            parse_hex("#aa5500"),
            Some((Srgb888::new(0xAA, 0x55, 0x00), 7))
        );
        assert_eq!(parse_hex("ffffff;"), Some((Srgb888::new(255, 255, 255), 6)));
        assert_eq!(parse_hex("#zzz"), None);
        assert_eq!(to_hex(Srgb888::new(0xAA, 0x55, 0x00)), "#aa5500");
    }

    #[test]
    fn test_continuous_gamma_override() {
        let mut engine = ColorEngine::default();
        engine.continuous_gamma = Some(2.2);
        assert!((engine.expand(0.5) - 0.5f64.powf(2.2)).abs() < 1e-12);
        engine.continuous_gamma = None;
        assert!((engine.expand(0.5) - 0.21404).abs() < 1e-4);
    }
}
