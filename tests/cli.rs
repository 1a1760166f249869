//! Process-level tests for the `capsule` binary

use std::path::Path;
use std::process::{Command, Output};

fn capsule(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_capsule"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn capsule")
}

fn write_fixture(dir: &Path) {
    std::fs::write(dir.join("runtime"), vec![7u8; 1000]).unwrap();
    std::fs::write(dir.join("main.js"), b"console.log('hi')").unwrap();
}

#[test]
fn test_compile_without_entrypoint() {
    let dir = tempfile::tempdir().unwrap();

    let out = capsule(dir.path(), &["compile"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&out.stdout).contains("Entrypoint file was not specified"),
        "stdout: {:?}",
        out.stdout
    );

    // No output file may be created.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty());
}

#[test]
fn test_positional_compile() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let out = capsule(
        dir.path(),
        &["compile", "main.js", "app", "--stub", "runtime"],
    );

    assert!(out.status.success(), "stderr: {:?}", out.stderr);

    let image = std::fs::read(dir.path().join("app")).unwrap();
    assert_eq!(&image[..1000], &vec![7u8; 1000][..]);
    assert_eq!(&image[image.len() - 24..][..8], b"4str0d0n");
}

#[test]
fn test_flag_form_matches_positional_form() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let positional = capsule(
        dir.path(),
        &["compile", "main.js", "one", "--stub", "runtime"],
    );
    let flagged = capsule(
        dir.path(),
        &[
            "compile", "--input", "main.js", "--output", "two", "--stub", "runtime",
        ],
    );

    assert!(positional.status.success(), "stderr: {:?}", positional.stderr);
    assert!(flagged.status.success(), "stderr: {:?}", flagged.stderr);

    let one = std::fs::read(dir.path().join("one")).unwrap();
    let two = std::fs::read(dir.path().join("two")).unwrap();
    assert_eq!(one, two);
}

#[test]
fn test_compile_with_missing_stub_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.js"), b"export {}").unwrap();

    let out = capsule(
        dir.path(),
        &["compile", "main.js", "app", "--stub", "no-such-runtime"],
    );

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("runtime stub"));
    assert!(!dir.path().join("app").exists());
}

#[test]
fn test_inspect_reports_metadata() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let out = capsule(
        dir.path(),
        &[
            "compile", "main.js", "app", "--stub", "runtime", "--author", "Ada", "--name", "demo",
        ],
    );
    assert!(out.status.success(), "stderr: {:?}", out.stderr);

    let out = capsule(dir.path(), &["inspect", "app"]);
    assert!(out.status.success(), "stderr: {:?}", out.stderr);

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("entrypoint: file://"));
    assert!(stdout.contains("author: Ada"));
    assert!(stdout.contains("name: demo"));
    assert!(stdout.contains("bundle: 17 bytes"));
}

#[test]
fn test_inspect_rejects_unpackaged_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("plain"), vec![0u8; 64]).unwrap();

    let out = capsule(dir.path(), &["inspect", "plain"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("magic"));
}
