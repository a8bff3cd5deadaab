//! palcomp: compose, measure and emit 16-color terminal palettes.

mod cli;

use std::collections::HashMap;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::warn;

use palcomp::color::hsl_to_srgb;
use palcomp::emit::{self, XtermOpts};
use palcomp::eval;
use palcomp::palette::{self, load_palette, parse_hsl, Palette, VGA, VGA_SAT, WIN};
use palcomp::{contrast, ColorEngine};

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli::log_level(args.quiet, args.verbose)),
    )
    .init();

    match run(&args.commands, args.verbose) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("palcomp: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(words: &[String], verbose: u8) -> Result<()> {
    let mut engine = ColorEngine::default();
    let mut registers: HashMap<String, Palette> = HashMap::new();
    let mut pal = Palette::default();
    let mut xterm = XtermOpts::default();

    for word in words {
        let word = word.as_str();
        let mut mod_rgb = false;
        let mut mod_lch = false;

        if word == "vga" {
            pal.ra = VGA.to_vec();
            mod_rgb = true;
        } else if word == "vgs" {
            pal.ra = VGA_SAT.to_vec();
            mod_rgb = true;
        } else if word == "win" {
            pal.ra = WIN.to_vec();
            mod_rgb = true;
        } else if let Some(file) = word.strip_prefix("loadpal=") {
            pal.ra = load_palette(file).map_err(|e| anyhow!("could not load {file}: {e}"))?;
            mod_rgb = true;
        } else if let Some(name) = word.strip_prefix("loadreg=") {
            pal = registers.get(name).cloned().unwrap_or_default();
        } else if let Some(name) = word.strip_prefix("savereg=") {
            registers.insert(name.to_string(), pal.clone());
        } else if let Some(rest) = word.strip_prefix("blend=") {
            let (pct, name) = rest
                .split_once(',')
                .ok_or_else(|| anyhow!("blend wants PCT,NAME"))?;
            let pct: f64 = pct.parse().unwrap_or(0.0);
            match registers.get(name) {
                None => warn!("register {name:?} not defined yet"),
                Some(other) => {
                    let other = other.clone();
                    pal.blend(&other, pct);
                    mod_rgb = true;
                }
            }
        } else if let Some(rest) = word.strip_prefix("eval@") {
            let (list, expr) = rest
                .split_once('=')
                .ok_or_else(|| anyhow!("eval@ wants LIST=EXPR"))?;
            let indices = eval::parse_range(list);
            eval::run(expr, &mut pal, &engine, Some(&indices)).map_err(|e| anyhow!("{e}"))?;
        } else if let Some(expr) = word.strip_prefix("eval=") {
            eval::run(expr, &mut pal, &engine, None).map_err(|e| anyhow!("{e}"))?;
        } else if let Some(t) = word.strip_prefix("ild=") {
            let t: f64 = t.parse().unwrap_or(6500.0);
            let (chroma, white) = engine.set_illuminant(t);
            eprintln!("New white_point D_{:.2}:", t / 100.0);
            eprintln!("{{x={:.15}, y={:.15}}}", chroma.x, chroma.y);
            eprintln!(
                "{{X={:.15}, Y={:.15}, Z={:.15}}}",
                white.x, white.y, white.z
            );
            eprintln!("RGB-to-XYZ matrix:");
            for row in engine.matrix() {
                eprintln!("{:12.8} {:12.8} {:12.8}", row[0], row[1], row[2]);
            }
            // The new whitepoint has to reach the LCh side for later
            // commands to see it.
            mod_rgb = true;
        } else if word == "lch" {
            print!("{}", emit::lch_dump(&pal.la));
        } else if let Some(v) = word.strip_prefix("hsltint=") {
            pal.hsltint(parse_hsl(v));
            mod_rgb = true;
        } else if let Some(v) = word.strip_prefix("lchtint=") {
            let base = engine.srgb_to_lch(hsl_to_srgb(parse_hsl(v)));
            log::debug!("converted {v:?} to LCh({},{},{})", base.l, base.c, base.h);
            pal.lchtint(base);
            mod_lch = true;
        } else if word == "emit" || word == "xfce" {
            println!("{}", emit::xfce_line(&pal.ra));
        } else if word == "xterm" {
            println!("{}", emit::xterm_line(&pal.ra, xterm));
        } else if word == "fg" {
            xterm.fg = true;
        } else if word == "bg" {
            xterm.bg = true;
        } else if word == "bd" {
            xterm.bd = true;
        } else if word == "b0" {
            pal.black_zero();
        } else if word == "inv16" {
            pal.invert16();
            mod_rgb = true;
        } else if word == "ct256" {
            emit::colortable_256(verbose);
            emit::colortable_16(verbose, None);
        } else if word == "ct" {
            emit::colortable_16(verbose, None);
        } else if word == "cxl" {
            cxl_command(&pal, verbose);
        } else if word == "cxa" {
            cxa_command(&engine, &pal, verbose);
        } else if let Some(g) = word.strip_prefix("cfgamma=") {
            let g: f64 = g.parse().unwrap_or(0.0);
            engine.continuous_gamma = (g != 0.0).then_some(g);
        } else if word == "loeq" {
            pal.equalize(9, 100.0 / 9.0, 100.0 * 8.0 / 9.0);
            mod_lch = true;
        } else if let Some(rest) = word.strip_prefix("loeq=") {
            let mut it = rest.split(',');
            let blue: f64 = it.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
            let gray: f64 = it
                .next()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100.0 / 9.0 * 8.0);
            pal.equalize(9, blue, gray);
            mod_lch = true;
        } else if word == "eq" {
            pal.equalize(16, 100.0 / 16.0, 100.0);
            mod_lch = true;
        } else if let Some(rest) = word.strip_prefix("eq=") {
            let blue: f64 = rest.parse().unwrap_or(0.0);
            pal.equalize(16, blue, 100.0);
            mod_lch = true;
        } else if word == "syncfromrgb" {
            pal.sync_from_rgb(&engine);
        } else if word == "syncfromlch" {
            pal.sync_from_lch(&engine);
        } else if word.starts_with('(') || is_shorthand_expr(word) {
            eval::run(word, &mut pal, &engine, None).map_err(|e| anyhow!("{e}"))?;
        } else {
            warn!("unrecognized command: {word:?}");
        }

        if mod_rgb {
            pal.sync_from_rgb(&engine);
        } else if mod_lch {
            pal.sync_from_lch(&engine);
        }
    }
    Ok(())
}

fn is_shorthand_expr(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(reg), Some('=')) if eval::REGS.contains(reg)
    )
}

fn cxl_command(pal: &Palette, verbose: u8) {
    if pal.la.len() < palette::PALETTE_LEN {
        warn!("cxl: LCh palette must have 16 entries");
        return;
    }
    let stat = contrast::cxl(&pal.la);
    println!("\x1b[1m════ Difference of the L components ════\x1b[0m");
    emit::colortable_16(
        verbose,
        Some(&mut |bg, fg, special| {
            if special || !(0..16).contains(&fg) || !(0..16).contains(&bg) || fg == bg {
                print!("   ");
            } else {
                print!("{:3.0}", stat.delta[bg as usize][fg as usize]);
            }
        }),
    );
    print!("{}", contrast::report(&stat));
}

fn cxa_command(engine: &ColorEngine, pal: &Palette, verbose: u8) {
    if pal.ra.len() < palette::PALETTE_LEN {
        warn!("cxa: RGB palette must have 16 entries");
        return;
    }
    println!("\x1b[1m════ APCA lightness contrast ════\x1b[0m");
    let stat = contrast::cxa(engine, &pal.ra);
    emit::colortable_16(
        verbose,
        Some(&mut |bg, fg, special| {
            if special || !(0..16).contains(&fg) || !(0..16).contains(&bg) || fg == bg {
                print!("    ");
            } else {
                print!("{:3.0} ", stat.delta[bg as usize][fg as usize]);
            }
        }),
    );
    print!("{}", contrast::report(&stat));
}
