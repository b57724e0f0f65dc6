//! Edge case and error handling tests for sentinel


use harness::{TestTree, png_bytes, run_sentinel};
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[test]
fn test_symlink_to_png_is_sniffed() {
    let tree = TestTree::new();
    tree.add_png("real.png", 8, 8);
    symlink(tree.path().join("real.png"), tree.path().join("alias.png"))
        .expect("Failed to create symlink");

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success);
    assert!(stdout.contains("real.png [PNG 8x8]"), "{}", stdout);
    assert!(stdout.contains("├── 📄 alias.png [PNG 8x8]\n"), "{}", stdout);
}

#[test]
fn test_symlink_to_directory_is_not_followed() {
    let tree = TestTree::new();
    tree.add_file("realdir/inside.txt", b"");
    symlink(tree.path().join("realdir"), tree.path().join("linkdir"))
        .expect("Failed to create dir symlink");

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success);
    assert!(stdout.contains("├── 📂 realdir\n"), "{}", stdout);
    assert!(stdout.contains("├── 📄 linkdir\n"), "{}", stdout);
    assert_eq!(stdout.matches("inside.txt").count(), 1, "{}", stdout);
}

#[test]
fn test_symlink_to_parent_no_infinite_loop() {
    let tree = TestTree::new();
    tree.add_file("subdir/file.txt", b"");
    symlink("..", tree.path().join("subdir").join("parent"))
        .expect("Failed to create parent symlink");

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success, "sentinel should not hang on parent symlink");
    assert!(stdout.contains("file.txt"));
    assert!(stdout.contains("parent"));
}

#[test]
fn test_broken_symlink() {
    let tree = TestTree::new();
    tree.add_file("real.txt", b"");
    symlink("nonexistent.png", tree.path().join("broken.png"))
        .expect("Failed to create broken symlink");

    let (stdout, stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success, "sentinel should handle broken symlinks");
    assert!(stdout.contains("broken.png"));
    assert!(!stderr.contains("Error reading"), "{}", stderr);
}

// ============================================================================
// Permission Error Handling
// ============================================================================

/// Permission bits do not stop root; such tests have nothing to check there.
fn permissions_enforced(path: &std::path::Path) -> bool {
    fs::read_dir(path).is_err()
}

#[test]
fn test_unreadable_directory() {
    let tree = TestTree::new();
    tree.add_file("readable/file.txt", b"");
    tree.add_file("zzz.txt", b"");
    let unreadable = tree.add_dir("unreadable");
    fs::write(unreadable.join("hidden.txt"), b"").expect("Failed to write file");

    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o000))
        .expect("Failed to set permissions");
    let enforced = permissions_enforced(&unreadable);

    let (stdout, stderr, success) = run_sentinel(tree.path(), &[]);

    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o755))
        .expect("Failed to restore permissions");

    if !enforced {
        return;
    }

    assert!(success, "sentinel should handle unreadable directories gracefully");
    assert!(stdout.contains("├── 📂 unreadable\n"), "{}", stdout);
    assert!(stdout.contains("file.txt"));
    assert!(stdout.contains("zzz.txt"));
    assert!(!stdout.contains("hidden.txt"));
    assert!(stdout.trim_end().ends_with("Scan complete. ✅"));

    let error_lines: Vec<&str> = stderr
        .lines()
        .filter(|l| l.contains("Error reading directory"))
        .collect();
    assert_eq!(error_lines.len(), 1, "{}", stderr);
    assert!(error_lines[0].contains("unreadable"), "{}", stderr);
}

#[test]
fn test_unreadable_png_has_no_label() {
    let tree = TestTree::new();
    let path = tree.add_png("secret.png", 100, 100);

    fs::set_permissions(&path, fs::Permissions::from_mode(0o000))
        .expect("Failed to set permissions");
    let enforced = fs::File::open(&path).is_err();

    let (stdout, stderr, success) = run_sentinel(tree.path(), &[]);

    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))
        .expect("Failed to restore permissions");

    assert!(success);
    assert!(stdout.contains("secret.png"));
    assert!(!stderr.contains("secret.png"), "sniff failures are silent: {}", stderr);
    if enforced {
        assert!(!stdout.contains("[PNG"), "{}", stdout);
    }
}

// ============================================================================
// Content Edge Cases
// ============================================================================

#[test]
fn test_short_files_have_no_label() {
    let tree = TestTree::new();
    tree.add_file("zero", b"");
    tree.add_file("three", &[0x89, 0x50, 0x4E]);
    tree.add_file("zeros", &[0, 0, 0, 0]);

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success);
    for name in ["zero", "three", "zeros"] {
        assert!(stdout.contains(&format!("├── 📄 {}\n", name)), "{}", stdout);
    }
}

#[test]
fn test_large_file_only_header_matters() {
    let tree = TestTree::new();
    let mut data = png_bytes(4000, 3000);
    data.resize(8 * 1024 * 1024, 0xAB);
    tree.add_file("huge.png", &data);

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success);
    assert!(stdout.contains("huge.png [PNG 4000x3000]"), "{}", stdout);
}

#[test]
fn test_non_utf8_file_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tree = TestTree::new();
    let name = OsStr::from_bytes(b"caf\xe9.png");
    if fs::write(tree.path().join(name), png_bytes(1, 2)).is_err() {
        // Some file systems reject invalid UTF-8 names.
        return;
    }

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success);
    assert!(stdout.contains("caf\u{FFFD}.png [PNG 1x2]"), "{}", stdout);
}

#[test]
fn test_deep_nesting() {
    let tree = TestTree::new();
    let deep_path: String = (0..40).map(|i| format!("d{}/", i)).collect();
    tree.add_png(&format!("{}leaf.png", deep_path), 5, 5);

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &[]);
    assert!(success);
    let expected = format!("{}├── 📄 leaf.png [PNG 5x5]", "│  ".repeat(40));
    assert!(stdout.contains(&expected), "{}", stdout);
    assert!(stdout.contains("40 directories, 1 files"), "{}", stdout);
}

#[test]
fn test_wide_directory() {
    let tree = TestTree::new();
    for i in 0..2_000 {
        tree.add_file(&format!("f{:04}", i), b"");
    }

    let (stdout, _stderr, success) = run_sentinel(tree.path(), &["--no-sniff"]);
    assert!(success);
    assert!(stdout.contains("0 directories, 2000 files"), "{}", stdout);
}
