use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const FALLBACK: &str = "I'm sorry, I don't understand your question. Could you please rephrase it?";

fn bin(dir: &Path) -> Command {
    let path = assert_cmd::cargo::cargo_bin!("faq");
    let mut cmd = Command::new(path);
    cmd.env_remove("FAQ_FILE")
        .env_remove("FAQ_INTERACTIONS_FILE")
        .env_remove("RUST_LOG")
        .arg("--faqs")
        .arg(dir.join("faqs.json"))
        .arg("--interactions")
        .arg(dir.join("interactions.json"));
    cmd
}

fn read_log(dir: &Path) -> Value {
    let raw = fs::read_to_string(dir.join("interactions.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn ask_answers_from_seed_and_persists_the_exchange() {
    let dir = tempfile::tempdir().unwrap();

    bin(dir.path())
        .args(["ask", "--question", "How do I track my order?"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You can track your order using the tracking link sent to your email.",
        ));

    let log = read_log(dir.path());
    assert_eq!(log.as_array().unwrap().len(), 1);
    assert_eq!(log[0]["question"], "track order");
}

#[test]
fn repeated_question_is_served_from_learned_interactions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("faqs.json"),
        r#"{"What is the return policy?": "You can return any item within 30 days of purchase."}"#,
    )
    .unwrap();

    let first = bin(dir.path())
        .args(["ask", "--json", "--question", "how can I return something"])
        .assert()
        .success();
    let first: Value = serde_json::from_slice(&first.get_output().stdout).unwrap();
    assert_eq!(first["source"]["kind"], "faq");
    assert_eq!(first["normalized_query"], "return something");

    let second = bin(dir.path())
        .args(["ask", "--json", "--question", "how can I return something"])
        .assert()
        .success();
    let second: Value = serde_json::from_slice(&second.get_output().stdout).unwrap();
    assert_eq!(second["source"]["kind"], "interaction");
    assert_eq!(second["source"]["index"], 0);
    assert_eq!(second["answer"], first["answer"]);

    assert_eq!(read_log(dir.path()).as_array().unwrap().len(), 2);
}

#[test]
fn unrelated_question_prints_fallback_and_learns_it() {
    let dir = tempfile::tempdir().unwrap();

    bin(dir.path())
        .args(["ask", "--question", "xyzabc qwerty"])
        .assert()
        .success()
        .stdout(predicate::str::contains(FALLBACK));

    let log = read_log(dir.path());
    assert_eq!(log[0]["answer"], FALLBACK);
}

#[test]
fn no_persist_leaves_the_log_untouched() {
    let dir = tempfile::tempdir().unwrap();

    bin(dir.path())
        .args(["--no-persist", "ask", "--question", "What is the return policy?"])
        .assert()
        .success();

    assert!(!dir.path().join("interactions.json").exists());
}

#[test]
fn no_persist_warns_about_a_broken_log_and_leaves_it_alone() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("interactions.json"), "{not json").unwrap();

    bin(dir.path())
        .args(["--no-persist", "ask", "--question", "How do I track my order?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tracking link"))
        .stderr(predicate::str::contains("unreadable interaction log"));

    let raw = fs::read_to_string(dir.path().join("interactions.json")).unwrap();
    assert_eq!(raw, "{not json");
}

#[test]
fn faqs_lists_curated_entries() {
    let dir = tempfile::tempdir().unwrap();

    bin(dir.path())
        .arg("faqs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Q: What is the return policy?"))
        .stdout(predicate::str::contains(
            "A: We accept credit cards, PayPal, and bank transfers.",
        ));
}

#[test]
fn eval_reports_pass_rate_and_fails_below_minimum() {
    let dir = tempfile::tempdir().unwrap();
    let cases = dir.path().join("cases.json");
    fs::write(
        &cases,
        r#"[
            {"case_id": "track", "question": "track my order",
             "expected_answer": "You can track your order using the tracking link sent to your email."},
            {"case_id": "noise", "question": "xyzabc", "expected_answer": null},
            {"case_id": "wrong", "question": "payment methods", "expected_answer": "nope"}
        ]"#,
    )
    .unwrap();

    bin(dir.path())
        .args(["eval", "--cases"])
        .arg(&cases)
        .assert()
        .failure()
        .stdout(predicate::str::contains("total=3 passed=2 failed=1"))
        .stderr(predicate::str::contains("below required"));

    bin(dir.path())
        .args(["eval", "--min-pass-rate", "0.5", "--cases"])
        .arg(&cases)
        .assert()
        .success()
        .stdout(predicate::str::contains("case=noise passed=true source=fallback"));

    assert!(!dir.path().join("interactions.json").exists());
}

#[test]
fn rejects_invalid_threshold() {
    let dir = tempfile::tempdir().unwrap();

    bin(dir.path())
        .args(["--threshold", "2", "ask", "--question", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold"));
}
