//! Integration tests for narlock

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn narlock() -> Command {
        cargo_bin_cmd!("narlock")
    }

    /// One length-prefixed NAR token.
    fn token(data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u64).to_le_bytes().to_vec();
        out.extend_from_slice(data);
        let pad = (8 - (data.len() % 8)) % 8;
        out.extend(std::iter::repeat_n(0u8, pad));
        out
    }

    /// A NAR archive holding one directory with a single file.
    fn sample_nar() -> Vec<u8> {
        let mut nar = Vec::new();
        for part in [
            "nix-archive-1",
            "(",
            "type",
            "directory",
            "entry",
            "(",
            "name",
            "hello.txt",
            "node",
            "(",
            "type",
            "regular",
            "contents",
        ] {
            nar.extend(token(part.as_bytes()));
        }
        nar.extend(token(b"hello from narlock\n"));
        for part in [")", ")", ")"] {
            nar.extend(token(part.as_bytes()));
        }
        nar
    }

    #[test]
    fn help_displays() {
        narlock()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("binary cache closure resolver"));
    }

    #[test]
    fn version_displays() {
        narlock()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("narlock"));
    }

    #[test]
    fn unpack_local_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("sample.nar");
        fs::write(&archive, sample_nar()).unwrap();
        let dest = dir.path().join("out");

        narlock()
            .arg("unpack")
            .arg(&archive)
            .arg(&dest)
            .assert()
            .success()
            .stdout(predicate::str::contains("Unpacked"));

        let content = fs::read_to_string(dest.join("hello.txt")).unwrap();
        assert_eq!(content, "hello from narlock\n");
    }

    #[test]
    fn unpack_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("bogus.nar");
        fs::write(&archive, b"definitely not a NAR").unwrap();

        narlock()
            .arg("unpack")
            .arg(&archive)
            .arg(dir.path().join("out"))
            .assert()
            .failure();
    }

    #[test]
    fn unpack_unknown_compression_hints() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("sample.nar");
        fs::write(&archive, sample_nar()).unwrap();

        narlock()
            .args(["unpack", "--compression", "lrzip"])
            .arg(&archive)
            .arg(dir.path().join("out"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("unsupported compression"));
    }

    #[test]
    fn show_missing_lockfile_reports_empty() {
        let dir = TempDir::new().unwrap();

        narlock()
            .arg("show")
            .arg("--lockfile")
            .arg(dir.path().join("nix.lock"))
            .assert()
            .success()
            .stdout(predicate::str::contains("No store paths resolved"));
    }

    #[test]
    fn show_json_emits_schema_version() {
        let dir = TempDir::new().unwrap();

        narlock()
            .arg("show")
            .arg("--json")
            .arg("--lockfile")
            .arg(dir.path().join("nix.lock"))
            .assert()
            .success()
            .stdout(predicate::str::contains("\"version\": 1"));
    }

    #[test]
    fn resolve_requires_store_path() {
        narlock().arg("resolve").assert().failure();
    }

    #[test]
    fn explicit_missing_config_fails() {
        let dir = TempDir::new().unwrap();

        narlock()
            .arg("--config")
            .arg(dir.path().join("nope.toml"))
            .args(["show"])
            .assert()
            .failure();
    }
}
