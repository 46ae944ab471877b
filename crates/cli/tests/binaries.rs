use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn flight_timeline_writes_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("timeline.csv");
    Command::cargo_bin("flight_timeline")
        .expect("flight_timeline bin")
        .args([
            "--duration",
            "18",
            "--fps",
            "10",
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).expect("read csv");
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("elapsed_s,phase,progress"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 181);
    assert!(rows[0].contains(",idle,"));
    assert!(rows.last().unwrap().contains(",orbit,"));
}

#[test]
fn flight_timeline_json_summary_on_stdout() {
    let output = Command::cargo_bin("flight_timeline")
        .expect("flight_timeline bin")
        .args(["--duration", "20", "--fps", "20", "--format", "json"])
        .output()
        .expect("run flight_timeline");
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json summary");
    assert_eq!(summary["frames"], 401);
    assert_eq!(summary["phases"][0]["phase"], "idle");
    assert_eq!(summary["phases"][5]["phase"], "orbit");
    assert!(summary["max_thrust"].as_f64().unwrap() <= 1.0);
}

#[test]
fn flight_timeline_rejects_zero_fps() {
    Command::cargo_bin("flight_timeline")
        .expect("flight_timeline bin")
        .args(["--fps", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fps"));
}

#[test]
fn flight_timeline_rejects_unbounded_durations() {
    for duration in ["inf", "NaN", "1e12"] {
        Command::cargo_bin("flight_timeline")
            .expect("flight_timeline bin")
            .args(["--duration", duration])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--duration"));
    }
}

#[test]
fn contact_send_requires_a_captcha_token() {
    Command::cargo_bin("contact_send")
        .expect("contact_send bin")
        .args([
            "--name",
            "Jane",
            "--email",
            "jane@example.com",
            "--message",
            "hi",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("toast.captcha"));
}

#[test]
fn contact_send_checks_email_shape_locally() {
    Command::cargo_bin("contact_send")
        .expect("contact_send bin")
        .args([
            "--name",
            "Jane",
            "--email",
            "not-an-email",
            "--message",
            "hi",
            "--token",
            "tok",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("toast.email"));
}

#[test]
fn contact_send_reports_unreachable_endpoint_as_network() {
    Command::cargo_bin("contact_send")
        .expect("contact_send bin")
        .args([
            "--endpoint",
            "http://127.0.0.1:9/api/contact",
            "--name",
            "Jane",
            "--email",
            "jane@example.com",
            "--message",
            "hi",
            "--token",
            "tok",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("toast.network"));
}
