//! Icon locator against real calibration files

use popup_smoke::{locate_icon, IconPosition, IconSource, FALLBACK_ICON_POSITION};
use tempfile::TempDir;

fn write_calibration(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(".extension-coords");
    std::fs::write(&path, content).expect("write calibration");
    path
}

#[test]
fn test_calibrated_coordinates_are_used() {
    let dir = TempDir::new().unwrap();
    let path = write_calibration(&dir, "EXTENSION_ICON_X=900\nEXTENSION_ICON_Y=40");

    let located = locate_icon(Some(&path));

    assert_eq!(located.position, IconPosition::new(900, 40));
    assert_eq!(located.source, IconSource::Calibrated(path));
    assert!(located.is_calibrated());
}

#[test]
fn test_any_positive_pair_round_trips() {
    let dir = TempDir::new().unwrap();
    for (x, y) in [(1, 1), (1250, 80), (2559, 1439), (37, 912)] {
        let path = write_calibration(
            &dir,
            &format!("METHOD=cliclick\nEXTENSION_ICON_X={x}\nEXTENSION_ICON_Y={y}\n"),
        );
        assert_eq!(locate_icon(Some(&path)).position, IconPosition::new(x, y));
    }
}

#[test]
fn test_missing_file_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never-calibrated");

    let located = locate_icon(Some(&path));

    assert_eq!(located.position, IconPosition::new(1250, 80));
    // Fallback source is what marks the calibration hint as given
    assert_eq!(located.source, IconSource::Fallback);
    assert!(!located.is_calibrated());
}

#[test]
fn test_missing_either_key_falls_back() {
    let dir = TempDir::new().unwrap();

    let only_x = write_calibration(&dir, "EXTENSION_ICON_X=900\n");
    assert_eq!(locate_icon(Some(&only_x)).position, FALLBACK_ICON_POSITION);

    let only_y = write_calibration(&dir, "EXTENSION_ICON_Y=40\n");
    assert_eq!(locate_icon(Some(&only_y)).position, FALLBACK_ICON_POSITION);

    let empty = write_calibration(&dir, "");
    assert_eq!(locate_icon(Some(&empty)).source, IconSource::Fallback);
}
