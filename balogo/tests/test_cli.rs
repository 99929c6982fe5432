// Allow deprecated APIs (assert_cmd::cargo_bin is deprecated but still works)
#![allow(deprecated)]

use assert_cmd::prelude::*; // Add methods on commands
use balogo_rs::balogo_canvas2d::FontConfig;
use balogo_rs::FontLoader;
use predicates::prelude::*; // Used for writing assertions
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// A temp dir holding a synthetic halo and cross.
struct Assets {
    dir: TempDir,
}

impl Assets {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let halo = image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
        halo.save(dir.path().join("halo.png")).unwrap();
        let cross = image::RgbaImage::from_fn(10, 10, |x, y| {
            if x == y {
                image::Rgba([0, 255, 0, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        cross.save(dir.path().join("cross.png")).unwrap();
        Self { dir }
    }

    fn halo(&self) -> PathBuf {
        self.dir.path().join("halo.png")
    }

    fn cross(&self) -> PathBuf {
        self.dir.path().join("cross.png")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("balogo").unwrap();
        cmd.arg("--halo").arg(self.halo()).arg("--cross").arg(self.cross());
        cmd
    }
}

fn fonts_available() -> bool {
    let available = FontLoader::new(&FontConfig::default())
        .map(|loader| loader.resolved().face_count() > 0)
        .unwrap_or(false);
    if !available {
        eprintln!("skipping: no fonts installed");
    }
    available
}

fn png_size(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

#[test]
fn check_no_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("balogo")?;

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage: balogo"));
    Ok(())
}

#[test]
fn check_help_lists_subcommands() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("balogo")?;

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("edit"));
    Ok(())
}

#[test]
fn missing_asset_fails() -> Result<(), Box<dyn std::error::Error>> {
    let out = tempfile::tempdir()?;
    let mut cmd = Command::cargo_bin("balogo")?;
    cmd.arg("render")
        .arg("--halo").arg("/no/such/halo.png")
        .arg("--output").arg(out.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing asset: halo"));
    assert_eq!(fs::read_dir(out.path())?.count(), 0);
    Ok(())
}

#[rstest]
#[case(r#"{"canvasHeight": 0}"#, "canvas dimensions must be positive")]
#[case(r#"{"textBaseLine": 1.5}"#, "textBaseLine must be within")]
#[case(r#"{"fontSize": "big"}"#, "Failed to parse layout config")]
fn invalid_config_fails(
    #[case] json: &str,
    #[case] message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let assets = Assets::new();
    let config = assets.dir.path().join("layout.json");
    fs::write(&config, json)?;

    let mut cmd = assets.command();
    cmd.arg("render").arg("--config").arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains(message));
    Ok(())
}

#[test]
fn unreadable_font_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let assets = Assets::new();
    let mut cmd = assets.command();
    cmd.arg("render")
        .arg("--no-system-fonts")
        .arg("--font-file").arg("/no/such/font.otf");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load font"));
    Ok(())
}

#[test]
fn render_without_fonts_fails() -> Result<(), Box<dyn std::error::Error>> {
    let assets = Assets::new();
    let out = assets.dir.path().join("logo.png");
    let mut cmd = assets.command();
    cmd.arg("render").arg("--no-system-fonts").arg("-o").arg(&out);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no font faces available"));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn render_into_directory_uses_download_name() -> Result<(), Box<dyn std::error::Error>> {
    if !fonts_available() {
        return Ok(());
    }
    let assets = Assets::new();
    let out = tempfile::tempdir()?;
    let mut cmd = assets.command();
    cmd.arg("render").arg("--output").arg(out.path());
    cmd.assert().success();

    let path = out.path().join("BlueArchive_ba-style@nulla.top.png");
    assert!(path.exists());
    assert_eq!(png_size(&path), (900, 250));
    Ok(())
}

#[test]
fn render_crop_flags() -> Result<(), Box<dyn std::error::Error>> {
    if !fonts_available() {
        return Ok(());
    }
    let assets = Assets::new();
    let render = |flag: Option<&str>| -> (u32, u32) {
        let out = assets.dir.path().join(format!("logo{}.png", flag.unwrap_or("")));
        let mut cmd = assets.command();
        cmd.arg("render")
            .arg("--left").arg("BlueBlueBlueBlueBlueBlue")
            .args(flag)
            .arg("-o").arg(&out);
        cmd.assert().success();
        png_size(&out)
    };

    let (cropped, height) = render(None);
    let (full, _) = render(Some("--full"));
    let (tight, _) = render(Some("--tight"));

    assert_eq!(height, 250);
    // The left word expanded the canvas, so the default export is cropped.
    assert!(full > 900);
    assert!(cropped < full);
    assert_eq!(tight, cropped);
    Ok(())
}

#[test]
fn tight_and_full_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let assets = Assets::new();
    let mut cmd = assets.command();
    cmd.arg("render").arg("--tight").arg("--full");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}

#[test]
fn render_accepts_negative_offsets() -> Result<(), Box<dyn std::error::Error>> {
    if !fonts_available() {
        return Ok(());
    }
    let assets = Assets::new();
    let out = assets.dir.path().join("shifted.png");
    let mut cmd = assets.command();
    cmd.arg("render")
        .arg("--graph-x").arg("-40")
        .arg("--text2-y").arg("-10")
        .arg("--second-line")
        .arg("--glow")
        .arg("--transparent")
        .arg("-o").arg(&out);
    cmd.assert().success();

    let logo = image::open(&out)?.to_rgba8();
    // Transparent background in the corner.
    assert_eq!(logo.get_pixel(1, 1)[3], 0);
    Ok(())
}

#[test]
fn edit_session_saves_and_previews() -> Result<(), Box<dyn std::error::Error>> {
    if !fonts_available() {
        return Ok(());
    }
    let assets = Assets::new();
    let preview = assets.dir.path().join("preview.png");
    let saves = tempfile::tempdir()?;

    let mut cmd = assets.command();
    let mut child = cmd
        .arg("edit")
        .arg("--preview").arg(&preview)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let script = format!(
        "commit left Red\ntoggle debug on\nfrobnicate\nsave {}\nquit\n",
        saves.path().display()
    );
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(script.as_bytes())?;
    drop(stdin); // Explicitly close stdin before wait
    let output = child.wait_with_output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stdout.contains("saved"), "stdout: {}", stdout);
    assert!(stderr.contains("unknown command 'frobnicate'"), "stderr: {}", stderr);

    assert!(saves.path().join("RedArchive_ba-style@nulla.top.png").exists());
    assert_eq!(png_size(&preview), (900, 250));
    Ok(())
}

#[test]
fn edit_flushes_pending_text_at_end_of_input() -> Result<(), Box<dyn std::error::Error>> {
    if !fonts_available() {
        return Ok(());
    }
    let assets = Assets::new();
    let preview = assets.dir.path().join("preview.png");

    let mut cmd = assets.command();
    let mut child = cmd
        .arg("edit")
        .arg("--preview").arg(&preview)
        .arg("--full")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"left BlueBlueBlueBlueBlueBlueBlue\n")?;
    drop(stdin);
    let output = child.wait_with_output()?;

    assert!(output.status.success());
    // The debounced edit was applied before exit and widened the canvas.
    let (width, _) = png_size(&preview);
    assert!(width > 900);
    Ok(())
}
