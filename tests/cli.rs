use std::io::Write;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_authlog-geo"))
}

#[test]
fn missing_database_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("auth.log");
    let csv = dir.path().join("out.csv");
    let mut file = std::fs::File::create(&log).unwrap();
    writeln!(file, "Mar  3 10:00:01 bastion sshd[311]: Failed password for root from 203.0.113.9 port 50122 ssh2").unwrap();
    drop(file);

    let output = bin()
        .arg("--database")
        .arg(dir.path().join("missing.mmdb"))
        .arg("--output")
        .arg(&csv)
        .arg("--json")
        .arg(&log)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: cannot use GeoIP database"), "{stderr}");
    assert!(stderr.contains("missing.mmdb"), "{stderr}");
    assert!(output.stdout.is_empty());
    assert!(!csv.exists());
}

#[test]
fn no_inputs_is_an_argument_error() {
    let output = bin().output().unwrap();
    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn unknown_flag_is_an_argument_error() {
    let output = bin().arg("--frobnicate").arg("auth.log").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--frobnicate"));
}
