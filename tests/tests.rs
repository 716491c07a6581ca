//! Integration tests for `topic_text`.
//
// This suite verifies:
// - Library behavior on whole datasets (conversion, no output on failure, ranking)
// - CLI behavior of docword2text and view_model, including export formats
//
// CLI tests run the binaries with a per-test working directory.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use regex::Regex;
use serde_json::Value as Json;
use tempfile::tempdir;

use topic_text::{DatasetPaths, FinalDocument, convert_dataset, rank_model_file};

// --------------------- helpers ---------------------

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Read file to string.
fn read_to_string<P: AsRef<Path>>(p: P) -> String {
    fs::read_to_string(p).unwrap()
}

/// Write the small cat/dog/fish dataset as `docword.<name>.txt` / `vocab.<name>.txt`.
fn write_dataset(dir: &assert_fs::TempDir, name: &str, vocab: &str, docword: &str) {
    write_file(dir, &format!("vocab.{name}.txt"), vocab);
    write_file(dir, &format!("docword.{name}.txt"), docword);
}

const VOCAB: &str = "cat\ndog\nfish\n";
const DOCWORD: &str = "2\n3\n4\n1 1 5\n1 2 2\n2 3 7\n2 1 1\n";
const MODEL: &str = "cat\t0.5 3.2\ndog\t4.1 1.0\n";

fn run_cli_ok_in(bin: &str, dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin(bin).unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Count occurrences of `needle` in the captured stderr.
fn stderr_count(assert: &assert_cmd::assert::Assert, needle: &str) -> usize {
    String::from_utf8_lossy(&assert.get_output().stderr)
        .matches(needle)
        .count()
}

fn run_cli_fail_in(bin: &str, dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin(bin).unwrap();
    cmd.current_dir(dir);
    cmd.env("RUST_LOG", "error");
    cmd.args(args).assert().failure()
}

/// Parse a converted line back into (term, count) pairs.
fn pairs(line: &str) -> Vec<(String, u64)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens
        .chunks(2)
        .map(|c| (c[0].to_string(), c[1].parse().unwrap()))
        .collect()
}

// --------------------- library tests ---------------------

#[test]
fn lib_convert_dataset_writes_every_document() {
    let td = assert_fs::TempDir::new().unwrap();
    write_dataset(&td, "toy", VOCAB, DOCWORD);
    let paths = DatasetPaths::new(td.path(), "toy").unwrap();

    let n = convert_dataset(&paths, FinalDocument::Flush).expect("convert");
    assert_eq!(n, 2);
    let out = read_to_string(&paths.output);
    let lines: Vec<&str> = out.lines().map(str::trim_end).collect();
    assert_eq!(lines, vec!["cat 5 dog 2", "fish 7 cat 1"]);
}

#[test]
fn lib_documents_match_their_triples() {
    let td = assert_fs::TempDir::new().unwrap();
    let vocab: Vec<String> = (1..=20).map(|i| format!("w{i}")).collect();
    let mut expected: HashMap<u64, HashSet<(String, u64)>> = HashMap::new();
    let mut triples = Vec::new();
    for doc in 1..=7u64 {
        for k in 0..(doc as usize % 4 + 1) {
            let term = (doc as usize * 3 + k * 5) % 20 + 1;
            let count = doc + k as u64;
            triples.push(format!("{doc} {term} {count}"));
            expected
                .entry(doc)
                .or_default()
                .insert((vocab[term - 1].clone(), count));
        }
    }
    let docword = format!("7\n20\n{}\n{}\n", triples.len(), triples.join("\n"));
    write_dataset(&td, "prop", &vocab.join("\n"), &docword);
    let paths = DatasetPaths::new(td.path(), "prop").unwrap();

    assert_eq!(convert_dataset(&paths, FinalDocument::Flush).unwrap(), 7);
    let out = read_to_string(&paths.output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 7);
    for (i, line) in lines.iter().enumerate() {
        let got: HashSet<(String, u64)> = pairs(line).into_iter().collect();
        assert_eq!(got, expected[&(i as u64 + 1)], "document {}", i + 1);
    }
}

#[test]
fn lib_consistency_error_leaves_no_output() {
    let td = assert_fs::TempDir::new().unwrap();
    write_dataset(&td, "bad", "cat\ndog\n", DOCWORD);
    let paths = DatasetPaths::new(td.path(), "bad").unwrap();

    let err = convert_dataset(&paths, FinalDocument::Flush).unwrap_err();
    assert!(matches!(err, topic_text::FormatError::Consistency { .. }));
    assert!(!paths.output.exists());
}

#[test]
fn lib_rank_model_file() {
    let td = assert_fs::TempDir::new().unwrap();
    let model = write_file(&td, "model.txt", MODEL);
    let ranked = rank_model_file(&model).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].terms.len(), 1);
    assert_eq!(ranked[0].terms[0].term, "dog");
    assert_eq!(ranked[1].terms[0].term, "cat");
}

#[test]
fn lib_ranked_output_sorted_and_thresholded() {
    let td = assert_fs::TempDir::new().unwrap();
    let rows: Vec<String> = (0..30)
        .map(|i| {
            let a = (i % 5) as f64 * 0.75;
            let b = ((i * 7) % 4) as f64;
            format!("t{i:02}\t{a} {b}")
        })
        .collect();
    let model = write_file(&td, "model.txt", &rows.join("\n"));

    for topic in rank_model_file(&model).unwrap() {
        assert!(topic.terms.iter().all(|t| t.weight > 1.0));
        for pair in topic.terms.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.weight > b.weight || (a.weight == b.weight && a.term > b.term),
                "{} {} before {} {}",
                a.term,
                a.weight,
                b.term,
                b.weight
            );
        }
    }
}

// --------------------- CLI tests: docword2text ---------------------

#[test]
fn cli_docword_default_paths() {
    let td = assert_fs::TempDir::new().unwrap();
    write_dataset(&td, "toy", VOCAB, DOCWORD);

    run_cli_ok_in("docword2text", td.path(), &["toy"]);
    assert_eq!(
        read_to_string(td.path().join("toy.txt")),
        "cat 5 dog 2 \nfish 7 cat 1 \n"
    );
}

#[test]
fn cli_docword_data_dir_and_output() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("data").create_dir_all().unwrap();
    write_file(&td, "data/vocab.toy.txt", VOCAB);
    write_file(&td, "data/docword.toy.txt", DOCWORD);

    run_cli_ok_in(
        "docword2text",
        td.path(),
        &["toy", "--data-dir", "data", "--output", "out.txt"],
    );
    td.child("out.txt").assert(predicate::str::contains("fish 7 cat 1"));
    assert!(!td.path().join("data/toy.txt").exists());
}

#[test]
fn cli_docword_legacy_drops_last_document() {
    let td = assert_fs::TempDir::new().unwrap();
    write_dataset(&td, "toy", VOCAB, DOCWORD);

    run_cli_ok_in("docword2text", td.path(), &["toy", "--legacy-drop-last"]);
    assert_eq!(read_to_string(td.path().join("toy.txt")), "cat 5 dog 2 \n");
}

#[test]
fn cli_docword_missing_argument_prints_usage() {
    let td = tempdir().unwrap();
    run_cli_fail_in("docword2text", td.path(), &[])
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn cli_docword_mismatch_fails_without_output() {
    let td = assert_fs::TempDir::new().unwrap();
    write_dataset(&td, "toy", "cat\n", DOCWORD);

    let assert = run_cli_fail_in("docword2text", td.path(), &["toy"])
        .stderr(predicate::str::contains("Consistency error"));
    assert_eq!(stderr_count(&assert, "Consistency error"), 1);
    assert!(!td.path().join("toy.txt").exists());
}

#[test]
fn cli_docword_decreasing_id_reports_line() {
    let td = assert_fs::TempDir::new().unwrap();
    write_dataset(&td, "toy", VOCAB, "2\n3\n3\n2 1 1\n1 2 1\n2 3 1\n");

    run_cli_fail_in("docword2text", td.path(), &["toy"])
        .stderr(predicate::str::contains("line 5"));
    assert!(!td.path().join("toy.txt").exists());
}

#[test]
fn cli_docword_empty_name_is_usage_error() {
    let td = tempdir().unwrap();
    run_cli_fail_in("docword2text", td.path(), &[""])
        .stderr(predicate::str::contains("Usage error"));
}

#[test]
fn cli_docword_missing_files_fail() {
    let td = tempdir().unwrap();
    run_cli_fail_in("docword2text", td.path(), &["nothing"])
        .stderr(predicate::str::contains("I/O error"));
}

// --------------------- CLI tests: view_model ---------------------

#[test]
fn cli_view_model_txt() {
    let td = assert_fs::TempDir::new().unwrap();
    write_file(&td, "model.txt", MODEL);

    run_cli_ok_in("view_model", td.path(), &["model.txt", "view.txt"]);
    let out = read_to_string(td.path().join("view.txt"));
    assert_eq!(out, "\nTOPIC:  0 4.1\n\ndog 4.1\n\nTOPIC:  1 3.2\n\ncat 3.2\n");

    let header = Regex::new(r"(?m)^TOPIC:  \d+ \d+(\.\d+)?$").unwrap();
    assert_eq!(header.find_iter(&out).count(), 2);
}

#[test]
fn cli_view_model_stdout() {
    let td = assert_fs::TempDir::new().unwrap();
    write_file(&td, "model.txt", MODEL);

    run_cli_ok_in("view_model", td.path(), &["model.txt", "-"])
        .stdout(predicate::str::contains("TOPIC:  1 3.2"));
}

#[test]
fn cli_view_model_json() {
    let td = assert_fs::TempDir::new().unwrap();
    write_file(&td, "model.txt", MODEL);

    run_cli_ok_in(
        "view_model",
        td.path(),
        &["model.txt", "view.json", "--export-format", "json"],
    );
    let v: Json = serde_json::from_str(&read_to_string(td.path().join("view.json"))).unwrap();
    let arr = v.as_array().expect("json array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["terms"][0]["term"], "dog");
    assert_eq!(arr[0]["terms"][0]["weight"].as_f64(), Some(4.1));
}

#[test]
fn cli_view_model_csv() {
    let td = assert_fs::TempDir::new().unwrap();
    write_file(&td, "model.txt", MODEL);

    run_cli_ok_in(
        "view_model",
        td.path(),
        &["model.txt", "view.csv", "--export-format", "csv"],
    );
    td.child("view.csv")
        .assert("topic,term,weight\n0,dog,4.1\n1,cat,3.2\n");
}

#[test]
fn cli_view_model_short_row_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    write_file(&td, "model.txt", "cat\t0.5 3.2\ndog\t4.1\n");

    let assert = run_cli_fail_in("view_model", td.path(), &["model.txt", "view.txt"])
        .stderr(predicate::str::contains("Malformed row at line 2"));
    assert_eq!(stderr_count(&assert, "Malformed row"), 1);
    assert!(!td.path().join("view.txt").exists());
}

#[test]
fn cli_view_model_requires_both_arguments() {
    let td = tempdir().unwrap();
    run_cli_fail_in("view_model", td.path(), &["model.txt"])
        .stderr(predicate::str::contains("Usage"));
}
