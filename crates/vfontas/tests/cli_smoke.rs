//! End-to-end smoke tests driving the built binary.

use std::process::{Command, Stdio};

fn vfontas() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vfontas"))
}

#[test]
fn test_blankfnt_savefnt_to_stdout_is_4096_zero_bytes() {
    let out = vfontas()
        .args(["blankfnt", "savefnt", "-"])
        .stdout(Stdio::piped())
        .output()
        .expect("spawn vfontas");
    assert!(out.status.success());
    assert_eq!(out.stdout.len(), 256 * 16);
    assert!(out.stdout.iter().all(|&b| b == 0));
}

#[test]
fn test_unknown_command_exits_nonzero() {
    let out = vfontas().arg("frobnicate").output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_missing_argument_exits_nonzero() {
    let out = vfontas().args(["blankfnt", "upscale", "2"]).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_psf_pipeline_round_trip() {
    let dir = std::env::temp_dir().join("vfontas-smoke-psf");
    std::fs::create_dir_all(&dir).unwrap();
    let psf = dir.join("out.psf");
    let psf = psf.to_str().unwrap();

    let out = vfontas()
        .args(["blankfnt", "upscale", "2", "2", "savepsf", psf])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let fnt = dir.join("out.fnt");
    let fnt = fnt.to_str().unwrap();
    let out = vfontas().args(["loadpsf", psf, "savefnt", fnt]).output().unwrap();
    assert!(out.status.success());
    // 256 glyphs of 16x32, row-padded to two bytes per row.
    assert_eq!(std::fs::read(fnt).unwrap().len(), 256 * 32 * 2);
}

#[test]
fn test_sfd_output_via_dash_prefixed_words() {
    let dir = std::env::temp_dir().join("vfontas-smoke-sfd");
    std::fs::create_dir_all(&dir).unwrap();
    let sfd = dir.join("out.sfd");
    let sfd = sfd.to_str().unwrap();

    let out = vfontas()
        .args(["-blankfnt", "-setname", "Smoke Face", "-saven2", sfd])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = std::fs::read_to_string(sfd).unwrap();
    assert!(text.contains("FontName: Smoke-Face"));
    assert!(text.contains("SplineFontDB: 3.0"));
}
