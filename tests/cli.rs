use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    path.to_string_lossy().into_owned()
}

fn rollabi(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rollabi"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run rollabi")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "rollabi failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

const TRANSFER_PAYLOAD: &str = concat!(
    "0xa9059cbb",
    "0000000000000000000000000000000000000000000000000000000000000001",
    "00000000000000000000000000000000000000000000000000000000000003e8",
);

#[test]
fn check_lists_selectors() {
    let out = stdout(&rollabi(&["check", &fixture("library.yaml")]));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("report   0x"));
    assert!(lines[0].ends_with(" Notice(string)"));
    assert_eq!(lines[2], "advance  0xa9059cbb transfer(address,uint256)");
    assert!(lines[3].ends_with(" Count()"));
}

#[test]
fn check_reports_invalid_names() {
    let output = rollabi(&["check", &fixture("bad_field.yaml")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("struct foo: field name: invalid rune '_'"),
        "{stderr}"
    );
}

#[test]
fn empty_schema_policy() {
    let output = rollabi(&["check", &fixture("structs_only.yaml")]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no reports, advances or inspects"));

    let output = rollabi(&[
        "check",
        &fixture("structs_only.yaml"),
        "--empty-schema",
        "allow",
    ]);
    assert_eq!(stdout(&output), "");
}

#[test]
fn generates_abi_json() {
    let out = stdout(&rollabi(&[
        "generate",
        &fixture("library.yaml"),
        "--target",
        "abi-json",
    ]));
    let abi: serde_json::Value = serde_json::from_str(&out).unwrap();
    let functions = abi.as_array().unwrap();
    assert_eq!(functions.len(), 4);
    assert_eq!(functions[1]["name"], "AddChapter");
    assert_eq!(functions[1]["inputs"][0]["internalType"], "struct Chapter");
    assert_eq!(
        functions[1]["inputs"][0]["components"][0]["type"],
        "string"
    );
}

#[test]
fn generates_rust_to_a_file() {
    let path = std::env::temp_dir().join(format!("rollabi-cli-{}.rs", std::process::id()));
    let output = rollabi(&[
        "generate",
        &fixture("library.yaml"),
        "--module",
        "library",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert_eq!(stdout(&output), "");
    let code = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(code.contains("pub mod library {"));
    assert!(code.contains("pub trait AdvanceHandler"));
}

#[test]
fn packs_and_unpacks() {
    let out = stdout(&rollabi(&[
        "pack",
        &fixture("library.yaml"),
        "transfer",
        r#"{"to": "0x0000000000000000000000000000000000000001", "amount": 1000}"#,
    ]));
    assert_eq!(out.trim(), TRANSFER_PAYLOAD);

    let out = stdout(&rollabi(&[
        "unpack",
        &fixture("library.yaml"),
        TRANSFER_PAYLOAD,
    ]));
    let decoded: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        decoded,
        serde_json::json!({
            "message": "transfer",
            "args": {
                "to": "0x0000000000000000000000000000000000000001",
                "amount": "1000",
            },
        })
    );
}

#[test]
fn pack_and_unpack_struct_arguments() {
    let payload = stdout(&rollabi(&[
        "pack",
        &fixture("library.yaml"),
        "AddChapter",
        r#"[{"title": "intro"}]"#,
    ]));
    let out = stdout(&rollabi(&[
        "unpack",
        &fixture("library.yaml"),
        payload.trim(),
    ]));
    let decoded: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(decoded["message"], "AddChapter");
    assert_eq!(decoded["args"]["book"]["title"], "intro");
}

#[test]
fn unpack_rejects_bad_payloads() {
    let output = rollabi(&["unpack", &fixture("library.yaml"), "0xa9059c"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed payload"));

    let output = rollabi(&["unpack", &fixture("library.yaml"), "0xdeadbeef"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("selector 0xdeadbeef not found"));

    let output = rollabi(&["pack", &fixture("library.yaml"), "Missing", "{}"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown message \"Missing\""));
}
