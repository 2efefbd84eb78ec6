mod common;

use std::fs;

use approx::assert_abs_diff_eq;

use common::{checker_frame, solid_frame, tagged_frames};
use sharpframes_core::io::{
    frame_to_rgb8, load_frame, load_frames_dir, next_counter, save_frame_png, write_frames,
};
use sharpframes_core::pipeline::config::WriterConfig;

fn file_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_next_counter_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(next_counter(dir.path(), "frame").unwrap(), 1);
    assert_eq!(next_counter(&dir.path().join("missing"), "frame").unwrap(), 1);
}

#[test]
fn test_next_counter_continues_after_highest() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["frame_0003.png", "frame_0017_455.png", "other_0099.png", "frame.png"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    assert_eq!(next_counter(dir.path(), "frame").unwrap(), 18);
}

#[test]
fn test_write_uses_real_frame_indices() {
    let dir = tempfile::tempdir().unwrap();
    let frames = tagged_frames(2);
    let paths = write_frames(
        &frames,
        "F:120 (Score:431), F:168 (Score:77)",
        dir.path(),
        &WriterConfig::default(),
    )
    .unwrap();

    assert_eq!(file_names(&paths), vec!["frame_0120.png", "frame_0168.png"]);
    assert!(paths.iter().all(|p| p.exists()));
}

#[test]
fn test_write_with_score_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        prefix: "moon".into(),
        counter_digits: 6,
        filename_with_score: true,
        ..Default::default()
    };
    let paths = write_frames(&tagged_frames(1), "F:42 (Score:812)", dir.path(), &config).unwrap();
    assert_eq!(file_names(&paths), vec!["moon_000042_812.png"]);
}

#[test]
fn test_write_without_manifest_auto_increments() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("frame_0005.png"), b"x").unwrap();

    let paths = write_frames(&tagged_frames(3), "", dir.path(), &WriterConfig::default()).unwrap();
    assert_eq!(
        file_names(&paths),
        vec!["frame_0006.png", "frame_0007.png", "frame_0008.png"]
    );
}

#[test]
fn test_write_without_auto_increment_starts_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        auto_increment: false,
        ..Default::default()
    };
    let paths = write_frames(&tagged_frames(2), "", dir.path(), &config).unwrap();
    assert_eq!(file_names(&paths), vec!["frame_0000.png", "frame_0001.png"]);
}

#[test]
fn test_write_with_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        use_timestamp: true,
        ..Default::default()
    };
    let paths = write_frames(&tagged_frames(1), "F:9 (Score:1)", dir.path(), &config).unwrap();
    let name = &file_names(&paths)[0];
    let parts: Vec<&str> = name.trim_end_matches(".png").split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "frame");
    assert!(parts[1].parse::<u64>().unwrap() > 1_600_000_000);
    assert_eq!(parts[2], "0009");
}

#[test]
fn test_write_creates_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    write_frames(&tagged_frames(1), "F:3 (Score:1)", &nested, &WriterConfig::default()).unwrap();
    assert!(nested.join("frame_0003.png").exists());
}

#[test]
fn test_png_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checker.png");
    let frame = checker_frame(6, 4, 0.2);
    save_frame_png(&frame, &path).unwrap();

    let loaded = load_frame(&path).unwrap();
    assert_eq!(loaded.data.dim(), (6, 4, 3));
    assert_eq!(loaded.original_bit_depth, 8);
    for (a, b) in loaded.data.iter().zip(frame.data.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 0.5 / 255.0 + 1e-6);
    }
}

#[test]
fn test_frame_to_rgb8_rounds_and_clamps() {
    let mut frame = solid_frame(1, 3, 0.5);
    frame.data[[0, 1, 0]] = 1.7;
    frame.data[[0, 2, 0]] = -0.2;
    let img = frame_to_rgb8(&frame);
    assert_eq!(img.get_pixel(0, 0).0, [128, 128, 128]);
    assert_eq!(img.get_pixel(1, 0).0[0], 255);
    assert_eq!(img.get_pixel(2, 0).0[0], 0);
}

#[test]
fn test_load_frames_dir_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    save_frame_png(&solid_frame(2, 2, 1.0), &dir.path().join("b.png")).unwrap();
    save_frame_png(&solid_frame(2, 2, 0.0), &dir.path().join("a.png")).unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

    let frames = load_frames_dir(dir.path()).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].index(), 0);
    assert_abs_diff_eq!(frames[0].data[[0, 0, 0]], 0.0);
    assert_abs_diff_eq!(frames[1].data[[0, 0, 0]], 1.0);
}
