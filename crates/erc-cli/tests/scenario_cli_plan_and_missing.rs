use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

const TWO_TIER_CATALOG: &str = r#"
ladder:
  - tier: 1
    base_currency_cost: 1000
  - tier: 2
    lower_tier_cost: { 1: 15 }
    base_currency_cost: 2000
rewards:
  - name: "SR Ticket"
    limit: 2
    tiers: { 2: 40 }
    base_currency: 35000
"#;

fn write_fixture(dir: &Path, holdings_json: &str) -> (String, String) {
    let config = dir.join("catalog.yaml");
    let holdings = dir.join("holdings.json");
    fs::write(&config, TWO_TIER_CATALOG).unwrap();
    fs::write(&holdings, holdings_json).unwrap();
    (
        config.to_string_lossy().to_string(),
        holdings.to_string_lossy().to_string(),
    )
}

fn erc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("erc").unwrap();
    cmd.current_dir(dir).env_remove("ERC_HOLDINGS");
    cmd
}

#[test]
fn plan_prints_depth_first_steps_and_total() {
    let dir = tempfile::tempdir().unwrap();
    let (config, holdings) = write_fixture(
        dir.path(),
        r#"{ "base_currency": 500000, "tiers": { "1": 100, "2": 10 } }"#,
    );

    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["plan", "--reward", "sr ticket", "--qty", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reward=SR Ticket qty=1"))
        .stdout(predicate::str::contains(
            "affordable=true required_EP=445 000 available_EP=500 000 missing_EP=0",
        ))
        .stdout(predicate::str::contains(
            "  1. make 30 x T2 [100 x T1 from stock; synthesize 350 x T1; 60 000 EP]",
        ))
        .stdout(predicate::str::contains("    2. make 350 x T1 [350 000 EP]"))
        .stdout(predicate::str::contains(
            "  3. exchange for 1 x SR Ticket [spend 40 x T2; 35 000 EP]",
        ))
        .stdout(predicate::str::contains("total_EP=445 000"));
}

#[test]
fn plan_reports_missing_base_currency_when_unaffordable() {
    let dir = tempfile::tempdir().unwrap();
    let (config, holdings) = write_fixture(
        dir.path(),
        r#"{ "base_currency": 50000, "tiers": { "1": 600 } }"#,
    );

    // 40 T2 -> 600 T1 (all in stock) + 80 000 EP, plus 35 000 EP for the ticket.
    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["plan", "--reward", "SR Ticket"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "affordable=false required_EP=115 000 available_EP=50 000 missing_EP=65 000",
        ))
        .stdout(predicate::str::contains("not affordable yet: 65 000 EP short"));
}

#[test]
fn plan_with_everything_on_hand_is_a_single_step() {
    let dir = tempfile::tempdir().unwrap();
    let (config, holdings) = write_fixture(
        dir.path(),
        r#"{ "base_currency": 100000, "tiers": { "2": 80 } }"#,
    );

    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["plan", "--reward", "SR Ticket", "--qty", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  1. exchange for 2 x SR Ticket [spend 80 x T2; 70 000 EP]",
        ))
        .stdout(predicate::str::contains("everything is on hand"))
        .stdout(predicate::str::contains("2. ").not());
}

#[test]
fn plan_rejects_quantity_above_limit() {
    let dir = tempfile::tempdir().unwrap();
    let (config, holdings) = write_fixture(dir.path(), r#"{ "base_currency": 0, "tiers": {} }"#);

    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["plan", "--reward", "SR Ticket", "--qty", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds acquisition limit 2"));

    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["plan", "--reward", "SR Ticket", "--qty", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --qty"));
}

#[test]
fn plan_rejects_unknown_reward() {
    let dir = tempfile::tempdir().unwrap();
    let (config, holdings) = write_fixture(dir.path(), r#"{ "base_currency": 0, "tiers": {} }"#);

    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["plan", "--reward", "UR Ticket"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown reward 'UR Ticket'"))
        .stderr(predicate::str::contains("SR Ticket"));
}

#[test]
fn missing_lists_direct_shortfall_without_conversions() {
    let dir = tempfile::tempdir().unwrap();
    let (config, holdings) = write_fixture(
        dir.path(),
        r#"{ "base_currency": 20000, "tiers": { "1": 5000, "2": 10 } }"#,
    );

    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["missing", "--reward", "SR Ticket", "--qty", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recipe: 40 x T2, 35 000 EP"))
        .stdout(predicate::str::contains("T2: need 40 have 10 missing 30"))
        .stdout(predicate::str::contains("EP: need 35 000 have 20 000 missing 15 000"))
        // Tier 1 is not part of the recipe; its stock is irrelevant here.
        .stdout(predicate::str::contains("T1:").not());
}

#[test]
fn missing_reports_complete_when_everything_is_owned() {
    let dir = tempfile::tempdir().unwrap();
    let (config, holdings) = write_fixture(
        dir.path(),
        r#"{ "base_currency": 35000, "tiers": { "2": 40 } }"#,
    );

    erc(dir.path())
        .args(["--config", &config, "--holdings", &holdings])
        .args(["missing", "--reward", "SR Ticket"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing missing"));
}
