use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn holdings_set_then_show_round_trips_through_the_state_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let holdings = dir.path().join("state").join("holdings.json");
    let holdings_s = holdings.to_string_lossy().to_string();

    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .args(["--holdings", &holdings_s])
        .args(["holdings", "set", "--base-currency", "1200000"])
        .args(["--tier", "2=15", "--tier", "5=3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "saved: EP=1 200 000 T1=0 T2=15 T3=0 T4=0 T5=3",
        ));

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&holdings)?)?;
    assert_eq!(raw["base_currency"], 1_200_000);
    assert_eq!(raw["tiers"]["2"], 15);
    assert_eq!(raw["tiers"]["5"], 3);

    // A second set keeps what it does not touch.
    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .args(["--holdings", &holdings_s])
        .args(["holdings", "set", "--tier", "2=0", "--tier", "1=40"])
        .assert()
        .success();

    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .args(["--holdings", &holdings_s, "holdings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EP=1 200 000\n"))
        .stdout(predicate::str::contains("T1=40\n"))
        .stdout(predicate::str::contains("T2=0\n"))
        .stdout(predicate::str::contains("T5=3\n"));

    Ok(())
}

#[test]
fn holdings_set_rejects_tiers_outside_the_ladder() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let holdings = dir.path().join("holdings.json");
    let holdings_s = holdings.to_string_lossy().to_string();

    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .args(["--holdings", &holdings_s])
        .args(["holdings", "set", "--tier", "9=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ladder defines tiers 1..=5"));

    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .args(["--holdings", &holdings_s])
        .args(["holdings", "set", "--tier", "2=-4"])
        .assert()
        .failure();

    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .args(["--holdings", &holdings_s, "holdings", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to set"));

    assert!(!holdings.exists());
    Ok(())
}

#[test]
fn holdings_path_falls_back_to_the_store_setting() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("catalog.yaml");
    fs::write(
        &config,
        r#"
ladder:
  - tier: 1
    base_currency_cost: 1000
rewards: []
store:
  holdings_path: "my_state.json"
"#,
    )?;

    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .env_remove("ERC_HOLDINGS")
        .args(["--config", &config.to_string_lossy()])
        .args(["holdings", "set", "--base-currency", "7"])
        .assert()
        .success();

    let saved = fs::read_to_string(dir.path().join("my_state.json"))?;
    assert!(saved.contains("\"base_currency\": 7"));
    Ok(())
}

#[test]
fn corrupt_state_file_is_treated_as_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let holdings = dir.path().join("holdings.json");
    fs::write(&holdings, "{ not json")?;

    Command::cargo_bin("erc")?
        .current_dir(dir.path())
        .args(["--holdings", &holdings.to_string_lossy(), "holdings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EP=0\n"))
        .stderr(predicate::str::contains("holdings"));

    Ok(())
}
