//! Record-replay integration tests.
//!
//! Link generation only touches the outside world through the filesystem
//! and git ports, so a run can be replayed from cassettes with no package
//! on disk and no git checkout.

use std::path::Path;

use clap::Parser;
use serde_json::json;

use apilinks::cassette::config::CassetteConfig;
use apilinks::cassette::recorder::CassetteRecorder;
use apilinks::cli::Cli;
use apilinks::commands::generate;
use apilinks::context::ServiceContext;

const PACKAGE_SOURCE: &str =
    "def area():\n    pass\n\n\nclass Shape:\n    def draw(self):\n        pass\n";

fn generate_with(ctx: &ServiceContext, args: &[&str]) -> String {
    let cli = Cli::parse_from(std::iter::once("apilinks").chain(args.iter().copied()));
    let mut out = Vec::new();
    generate::run(&cli, ctx, &mut out).expect("generation should succeed");
    String::from_utf8(out).unwrap()
}

#[test]
fn replays_a_run_from_hand_built_cassettes() {
    let dir = tempfile::tempdir().unwrap();
    let cassettes = dir.path().join("cassettes");

    let fs = CassetteRecorder::new(cassettes.join("fs.cassette.yaml"), "fs", "pkg-links", "abc123");
    fs.record("is_file", &json!({"path": "/project/pkg/__init__.py"}), &true);
    fs.record_result::<_, &str, String>(
        "read_to_string",
        &json!({"path": "/project/pkg/__init__.py"}),
        &Ok(PACKAGE_SOURCE),
    );
    let git = CassetteRecorder::new(cassettes.join("git.cassette.yaml"), "git", "pkg-links", "abc123");
    git.record_result::<_, &str, String>(
        "remote_url",
        &json!({"remote": "origin"}),
        &Ok("https://github.com/org/pkg.git"),
    );
    git.record_result::<_, &str, String>("current_commit", &(), &Ok("abc123"));
    assert_eq!(fs.finish().expect("recording should succeed"), cassettes.join("fs.cassette.yaml"));
    git.finish().expect("recording should succeed");
    let config = CassetteConfig::from_session_dir(&cassettes);

    let expected = "\
[Shape class]: https://github.com/org/pkg/blob/abc123/__init__.py#L5
[Shape.draw() method]: https://github.com/org/pkg/blob/abc123/__init__.py#L6
[area() function]: https://github.com/org/pkg/blob/abc123/__init__.py#L1
";
    let args = ["--root", "pkg", "--source-dir", "/project"];

    let first = generate_with(&ServiceContext::replaying_from(&config).unwrap(), &args);
    assert_eq!(first, expected);

    // Replaying again yields the same output.
    let second = generate_with(&ServiceContext::replaying_from(&config).unwrap(), &args);
    assert_eq!(first, second, "determinism: outputs differ between replays");
}

#[test]
fn recorded_session_replays_without_the_package_on_disk() {
    let work = tempfile::tempdir().unwrap();
    let source_dir = work.path().join("src");
    std::fs::create_dir_all(source_dir.join("pkg")).unwrap();
    std::fs::write(source_dir.join("pkg/__init__.py"), "from .shapes import *\n").unwrap();
    std::fs::write(source_dir.join("pkg/shapes.py"), PACKAGE_SOURCE).unwrap();

    let source = source_dir.to_str().unwrap().to_string();
    let args = [
        "--root",
        "pkg",
        "--source-dir",
        source.as_str(),
        "--repository",
        "https://github.com/org/pkg",
        "--commit",
        "c0ffee",
    ];

    let (ctx, session) = ServiceContext::recording_at(work.path().join("cassettes")).unwrap();
    let recorded = generate_with(&ctx, &args);
    drop(ctx);
    let session_dir = session.finish().unwrap();
    assert!(recorded.contains("[Shape.draw() method]: https://github.com/org/pkg/blob/c0ffee/shapes.py#L6"));

    std::fs::remove_dir_all(&source_dir).unwrap();
    assert!(!Path::new(&source).exists());

    let config = CassetteConfig::from_session_dir(&session_dir);
    let replayed = generate_with(&ServiceContext::replaying_from(&config).unwrap(), &args);
    assert_eq!(recorded, replayed);
}
