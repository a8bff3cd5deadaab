//! Terminal-facing output: palette lines for Xfce and xterm, the ANSI
//! color tables, and the LCh dump.

use std::fmt::Write as _;

use crate::color::{to_hex, Lch, Srgb888};

/// The `ColorPalette=...;` line Xfce terminals read.
pub fn xfce_line(pal: &[Srgb888]) -> String {
    let mut out = String::from("ColorPalette=");
    for e in pal {
        let _ = write!(out, "{};", to_hex(*e));
    }
    out
}

/// Which extra resources `xterm` emission should carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct XtermOpts {
    pub fg: bool,
    pub bg: bool,
    pub bd: bool,
}

pub fn xterm_line(pal: &[Srgb888], opts: XtermOpts) -> String {
    let mut out = String::new();
    for (idx, e) in pal.iter().take(16).enumerate() {
        let _ = write!(out, " -xrm *VT100*color{idx}:{}", to_hex(*e));
    }
    if opts.fg {
        let _ = write!(out, " -fg {}", to_hex(pal[7]));
    }
    if opts.bg {
        let _ = write!(out, " -bg {}", to_hex(pal[0]));
    }
    if opts.bd {
        let _ = write!(out, " -xrm *VT100*colorBD:{}", to_hex(pal[15]));
    }
    out
}

/// The `lch` dump: one colorized line per entry.
pub fn lch_dump(la: &[Lch]) -> String {
    let mut out = String::from("#L,c,h\n");
    for (cnt, e) in la.iter().enumerate() {
        let _ = writeln!(
            out,
            "\x1b[{};3{}m{:x}\x1b[0m: {{{:10.6}, {:10.6}, {:10.6}}}",
            u8::from(cnt & 0x8 != 0),
            cnt & 0x7,
            cnt,
            e.l,
            e.c,
            e.h
        );
    }
    out
}

/// The 16-color crossing table. The default cell printer shows bg/fg
/// nibbles (or blanks when quiet); analyzers pass their own printer to
/// overlay contrast numbers on the same grid.
pub fn colortable_16(verbose: u8, mut cell: Option<&mut dyn FnMut(i32, i32, bool)>) {
    let modes: &[i32] = if cell.is_none() {
        println!(
            "                  \u{250c}\u{2500} bright \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2510}\u{250c}\u{2500} bold \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2510}\u{250c}\u{2500} reverse \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2510}"
        );
        &[0, 90, 1, 7]
    } else {
        &[0, 90]
    };

    for bg in -1..16 {
        for &mode in modes {
            for fg in 0..=9 {
                if fg == 8 {
                    continue;
                }
                let mut report_fg = fg;
                let mut report_bg = bg;
                let mut emit = String::from("\x1b[");
                match mode {
                    0 => {
                        let _ = write!(emit, "0;{}", 30 + fg);
                    }
                    1 => {
                        let _ = write!(emit, "0;1;{}", 30 + fg);
                        report_fg += 16;
                    }
                    7 => {
                        let _ = write!(emit, "0;7;{}", 30 + fg);
                        report_bg ^= 0x8;
                    }
                    90 => {
                        let _ = write!(emit, "0;{}", 90 + fg);
                        report_fg += 8;
                    }
                    _ => {}
                }
                if fg == 9 {
                    report_fg = 9;
                }
                if bg >= 8 {
                    let _ = write!(emit, ";{}", 100 + bg - 8);
                } else if bg >= 0 {
                    let _ = write!(emit, ";{}", 40 + bg);
                }
                emit.push('m');
                print!("{emit}");
                let special = bg == -1 || fg == 9 || mode == 7;
                match cell.as_deref_mut() {
                    Some(f) => f(report_bg, report_fg, special),
                    None if verbose == 0 => print!("  "),
                    None => {
                        let fg_char = if report_fg < 10 {
                            (b'0' + report_fg as u8) as char
                        } else {
                            (b'a' + (report_fg - 10) as u8) as char
                        };
                        print!("{:x}{}", report_bg.max(0), fg_char);
                    }
                }
            }
        }
        println!("\x1b[0m");
    }
    println!(
        "\x1b[0mdefault \x1b[37mgray \x1b[0;1mbold\x1b[0m \x1b[2mdim\x1b[0m \
         \x1b[3mitalic\x1b[0m \x1b[4munderscore\x1b[0m \x1b[5mblink\x1b[0m \
         \x1b[6mrapidblink\x1b[0m \x1b[7mreverse\x1b[0m \
         \x1b[8mhidden\x1b[0m \x1b[9mstrikethrough\x1b[0m"
    );
}

/// The 256-color sweep: truecolor ramps plus the indexed table.
pub fn colortable_256(verbose: u8) {
    let v = if verbose >= 1 { '.' } else { ' ' };
    for b in (0..256).step_by(32) {
        for g in (0..256).step_by(32) {
            for r in (0..256).step_by(16) {
                print!("\x1b[30;48;2;{r};{g};{b}m{v}");
            }
            println!("\x1b[0m");
        }
    }
    for c in 0..=0xFFu32 {
        if verbose >= 1 {
            print!("\x1b[30;48;5;{c}m-{c:02x}-");
        } else {
            print!("\x1b[30;48;5;{c}m  ");
        }
        if (c as i32 - 3) % 6 == 0 {
            println!("\x1b[0m");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::VGA;

    #[test]
    fn test_xfce_line_starts_with_the_vga_colors() {
        let line = xfce_line(&VGA);
        assert!(line.starts_with("ColorPalette=#000000;#aa0000;#00aa00;#aa5500;"));
        assert!(line.ends_with("#ffffff;"));
    }

    #[test]
    fn test_xterm_line_flags() {
        let plain = xterm_line(&VGA, XtermOpts::default());
        assert!(plain.contains("-xrm *VT100*color0:#000000"));
        assert!(!plain.contains("-fg"));

        let full = xterm_line(
            &VGA,
            XtermOpts {
                fg: true,
                bg: true,
                bd: true,
            },
        );
        assert!(full.contains(" -fg #aaaaaa"));
        assert!(full.contains(" -bg #000000"));
        assert!(full.contains("colorBD:#ffffff"));
    }

    #[test]
    fn test_lch_dump_header() {
        let dump = lch_dump(&[Lch {
            l: 53.4,
            c: 0.0,
            h: 0.0,
        }]);
        assert!(dump.starts_with("#L,c,h\n"));
        assert!(dump.contains("53.4"));
    }
}
