use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    cargo_bin_cmd!("bordered_square")
}

fn fixture_dir() -> TempDir {
    let tmp = TempDir::new().expect("create temp dir");
    fs::write(tmp.path().join("hollow.json"), "[[1,1,1],[1,0,1],[1,1,1]]").expect("write json");
    fs::write(tmp.path().join("zeros.txt"), "00\n").expect("write text");
    tmp
}

#[test]
fn reports_area_for_each_file() {
    let tmp = fixture_dir();
    cmd()
        .arg("--dir")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(contains("area=9 side=3 at (0, 0)"))
        .stdout(contains("zeros.txt: area=0"));
}

#[test]
fn json_report_includes_square() {
    let tmp = fixture_dir();
    let output = cmd()
        .args(["--json", "--strategy", "run-length"])
        .arg(tmp.path().join("hollow.json"))
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).expect("utf8 stdout");
    let report: Value = serde_json::from_str(line.trim()).expect("json report");
    assert_eq!(report["area"], 9);
    assert_eq!(report["rows"], 3);
    assert_eq!(report["square"]["side"], 3);
}

#[test]
fn plot_writes_png() {
    let tmp = fixture_dir();
    let out = tmp.path().join("plots");
    cmd()
        .arg("--plot")
        .arg("--out-dir")
        .arg(&out)
        .arg(tmp.path().join("hollow.json"))
        .assert()
        .success();

    let img = image::open(out.join("hollow_bordered.png")).expect("open plot");
    assert_eq!((img.width(), img.height()), (48, 48));
}

#[test]
fn bad_file_fails_but_others_still_run() {
    let tmp = fixture_dir();
    fs::write(tmp.path().join("broken.json"), "[[1,2]]").expect("write bad json");
    cmd()
        .arg("--dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .stdout(contains("hollow.json: area=9"));
}

#[test]
fn requires_an_input() {
    cmd().assert().failure();
}

#[test]
fn dir_skips_unknown_files_and_own_outputs() {
    let tmp = fixture_dir();
    fs::write(tmp.path().join("README.md"), "# notes\n").expect("write readme");

    cmd()
        .args(["--plot", "--grid", "--dir"])
        .arg(tmp.path())
        .assert()
        .success();
    assert!(tmp.path().join("hollow_bordered.png").is_file());
    assert!(tmp.path().join("hollow_grid.json").is_file());

    // Second run must not pick up the files written by the first.
    let output = cmd().arg("--dir").arg(tmp.path()).output().expect("run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert_eq!(stdout.lines().count(), 2, "unexpected inputs: {stdout}");
    assert!(!stdout.contains("_bordered"));
    assert!(!stdout.contains("_grid"));
    assert!(!stdout.contains("README"));
}

#[test]
fn grid_flag_writes_loaded_grid() {
    let tmp = fixture_dir();
    let out = tmp.path().join("grids");
    cmd()
        .arg("--grid")
        .arg("--out-dir")
        .arg(&out)
        .arg(tmp.path().join("hollow.json"))
        .assert()
        .success();

    let written = fs::read_to_string(out.join("hollow_grid.json")).expect("read grid json");
    let cells: Vec<Vec<u8>> = serde_json::from_str(&written).expect("grid json");
    assert_eq!(cells, vec![vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]]);
}

#[test]
fn format_flag_overrides_extension() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("rows.json");
    fs::write(&path, "111\n101\n111\n").expect("write text grid");

    cmd().arg(&path).assert().failure();
    cmd()
        .args(["--format", "text"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("area=9 side=3"));
}

fn blocky_png(tmp: &TempDir) -> std::path::PathBuf {
    // 3x3 cells of 4px: dark ring with a light centre, all pixels mid-grey or darker.
    let mut img = image::GrayImage::from_pixel(12, 12, image::Luma([100]));
    for y in 4..8 {
        for x in 4..8 {
            img.put_pixel(x, y, image::Luma([200]));
        }
    }
    let path = tmp.path().join("ring.png");
    img.save(&path).expect("save png");
    path
}

#[test]
fn image_cell_size_and_threshold_flags() {
    let tmp = TempDir::new().expect("create temp dir");
    let png = blocky_png(&tmp);

    cmd()
        .args(["--cell-px", "4", "--threshold", "128"])
        .arg(&png)
        .assert()
        .success()
        .stdout(contains("area=9 side=3 at (0, 0)"));

    // Nothing is at or below luma 50, so every cell is 0.
    cmd()
        .args(["--cell-px", "4", "--threshold", "50"])
        .arg(&png)
        .assert()
        .success()
        .stdout(contains("ring.png: area=0"));
}

#[test]
fn zero_cell_size_fails() {
    let tmp = TempDir::new().expect("create temp dir");
    let png = blocky_png(&tmp);
    cmd().args(["--cell-px", "0"]).arg(&png).assert().failure();
}

#[test]
fn verbose_emits_debug_events() {
    let tmp = fixture_dir();
    cmd()
        .env_remove("BORDERED_SQUARE_LOG")
        .arg("-v")
        .arg(tmp.path().join("hollow.json"))
        .assert()
        .success()
        .stderr(contains("bordered square found"));
}
