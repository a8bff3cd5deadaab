//! End-to-end checks against the built binary.

use std::process::Command;

fn palcomp(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_palcomp"))
        .args(args)
        .output()
        .expect("spawn palcomp")
}

#[test]
fn test_vga_emit_line() {
    let out = palcomp(&["vga", "emit"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(
        stdout.starts_with("ColorPalette=#000000;#aa0000;#00aa00;#aa5500;"),
        "{stdout}"
    );
}

#[test]
fn test_vga_cxl_reports_all_grids() {
    let out = palcomp(&["vga", "cxl"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[16x16] contrast"));
    assert!(stdout.contains("[ 8x8 ] contrast"));
}

#[test]
fn test_whitepoint_switch_changes_cxl() {
    let d50 = palcomp(&["vga", "ild=5000", "cxl"]);
    let d65 = palcomp(&["vga", "ild=6500", "cxl"]);
    assert!(d50.status.success() && d65.status.success());
    assert_ne!(d50.stdout, d65.stdout);
}

#[test]
fn test_expression_shorthand_and_eval() {
    let out = palcomp(&["vga", "(l=l*0, c=c*0, h=h*0)", "emit"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    // All entries collapse to black.
    assert!(stdout.starts_with("ColorPalette=#000000;#000000;"));

    let scoped = palcomp(&["vga", "eval@0=l=100", "lch"]);
    let text = String::from_utf8_lossy(&scoped.stdout);
    assert!(text.contains("100.0"), "{text}");
}

#[test]
fn test_bad_expression_fails_with_caret() {
    let out = palcomp(&["vga", "eval=l=+"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains('^'), "{stderr}");
}

#[test]
fn test_xterm_emission_with_flags() {
    let out = palcomp(&["win", "fg", "bg", "bd", "xterm"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("-xrm *VT100*color0:#000000"));
    assert!(stdout.contains("-fg #c0c0c0"));
    assert!(stdout.contains("-bg #000000"));
    assert!(stdout.contains("colorBD:#ffffff"));
}

#[test]
fn test_register_blend_round_trip() {
    let out = palcomp(&["vga", "savereg=base", "win", "blend=100,base", "emit"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    // Blending 100% of the saved VGA register restores VGA exactly.
    assert!(stdout.starts_with("ColorPalette=#000000;#aa0000;#00aa00;"), "{stdout}");
}
