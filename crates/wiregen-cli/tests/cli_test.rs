//! End-to-end tests for the `wiregen` binary
//!
//! These tests run the real binary against files in a temp directory:
//! - genkey prints a usable key pair
//! - clients writes the server/client layout and honors its flags
//! - pair writes one directory per site
//! - failures write nothing and exit non-zero

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SERVER_TOML: &str = r#"
address = "10.0.0.1/24"
endpoint = "vpn.example.com"
hostname = "hub"
interface_name = "wg-hub"
"#;

fn wiregen(output: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wiregen").expect("binary built");
    cmd.env_remove("WIREGEN_KEYS")
        .env_remove("WIREGEN_OUTPUT")
        .arg("--output")
        .arg(output);
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("server.toml"), SERVER_TOML).expect("server.toml");
    fs::write(dir.path().join("clients.csv"), "Hostname,Allowed IPs\nalpha,\nbeta laptop,10.0.0.0/24\n")
        .expect("clients.csv");
    dir
}

#[test]
fn genkey_prints_both_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    wiregen(dir.path())
        .arg("genkey")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(
                r"^Private Key: [A-Za-z0-9+/]{42}[AEIMQUYcgkosw480]=\nPublic Key: [A-Za-z0-9+/]{42}[AEIMQUYcgkosw480]=\n$",
            )
            .expect("regex"),
        );
}

#[test]
fn clients_writes_server_and_client_configs() {
    let dir = workspace();
    let out = dir.path().join("out");
    wiregen(&out)
        .current_dir(dir.path())
        .args(["clients", "--server", "server.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server.conf"));

    let server = fs::read_to_string(out.join("hub/server.conf")).expect("server.conf");
    assert!(server.contains("# Name = alpha\n# Peer IP = 10.0.0.2\n"));
    assert!(server.contains("# Name = beta laptop\n# Peer IP = 10.0.0.3\n"));

    let alpha = fs::read_to_string(out.join("hub/clients/alpha.conf")).expect("alpha.conf");
    assert!(alpha.contains("Address = 10.0.0.2\n"));
    assert!(alpha.contains("AllowedIPs = 0.0.0.0/0, ::/0\n"));
    assert!(alpha.contains("Endpoint = vpn.example.com:51820\n"));
    assert!(alpha.contains("PersistentKeepalive = 25\n"));

    let beta = fs::read_to_string(out.join("hub/clients/beta_laptop.conf")).expect("beta_laptop.conf");
    assert!(beta.contains("AllowedIPs = 10.0.0.0/24\n"));

    assert!(!out.join("hub/mikrotik_server.txt").exists());
}

#[test]
fn clients_mikrotik_and_no_keepalive() {
    let dir = workspace();
    let out = dir.path().join("out");
    wiregen(&out)
        .args(["clients", "--mikrotik", "--no-keepalive", "--server"])
        .arg(dir.path().join("server.toml"))
        .arg("--roster")
        .arg(dir.path().join("clients.csv"))
        .assert()
        .success();

    let script = fs::read_to_string(out.join("hub/mikrotik_server.txt")).expect("script");
    assert!(script.starts_with("/interface/wireguard/add name=wg-hub "));
    assert!(script.contains("/interface/wireguard/peers/add interface=wg-hub comment=\"alpha\""));
    assert!(script.ends_with("allowed-address=\"10.0.0.3,::/0\"\n"));

    let server = fs::read_to_string(out.join("hub/server.conf")).expect("server.conf");
    assert!(server.contains("AllowedIPs = 10.0.0.2,::/0\n"));
    assert!(server.contains("AllowedIPs = 10.0.0.3,::/0\n"));

    let alpha = fs::read_to_string(out.join("hub/clients/alpha.conf")).expect("alpha.conf");
    assert!(!alpha.contains("PersistentKeepalive"));
}

#[test]
fn clients_roster_address_mode() {
    let dir = workspace();
    fs::write(
        dir.path().join("fixed.csv"),
        "Hostname,Interface Address\nalpha,10.0.0.77/32\n",
    )
    .expect("fixed.csv");
    let out = dir.path().join("out");
    wiregen(&out)
        .current_dir(dir.path())
        .args([
            "clients",
            "--server",
            "server.toml",
            "--roster",
            "fixed.csv",
            "--address-mode",
            "roster",
        ])
        .assert()
        .success();

    let alpha = fs::read_to_string(out.join("hub/clients/alpha.conf")).expect("alpha.conf");
    assert!(alpha.contains("Address = 10.0.0.77/32\n"));
}

#[test]
fn duplicate_hostnames_write_nothing() {
    let dir = workspace();
    fs::write(dir.path().join("dupes.csv"), "Hostname\nalpha\nalpha\n").expect("dupes.csv");
    let out = dir.path().join("out");
    wiregen(&out)
        .current_dir(dir.path())
        .args(["clients", "--server", "server.toml", "--roster", "dupes.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: duplicate hostname in roster: alpha"));

    assert!(!out.exists());
}

#[test]
fn unknown_definition_key_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.toml"), "address = \"10.0.0.1/24\"\nport = 1\n").expect("bad.toml");
    wiregen(&dir.path().join("out"))
        .current_dir(dir.path())
        .args(["clients", "--server", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid interface definition"));
}

#[test]
fn pair_writes_both_sites() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("a.toml"),
        "address = \"172.16.0.1/30\"\nhostname = \"office\"\nendpoint = \"office.example.com\"\n",
    )
    .expect("a.toml");
    fs::write(
        dir.path().join("b.toml"),
        "address = \"172.16.0.2/30\"\nhostname = \"warehouse\"\nendpoint = \"wh.example.com\"\n",
    )
    .expect("b.toml");
    let out = dir.path().join("out");
    wiregen(&out)
        .current_dir(dir.path())
        .args(["pair", "--first", "a.toml", "--second", "b.toml", "--allowed", "192.168.0.0/16"])
        .assert()
        .success();

    let office = fs::read_to_string(out.join("office/wg.conf")).expect("office wg.conf");
    assert!(office.contains("# Name = warehouse\n"));
    assert!(office.contains("AllowedIPs = 192.168.0.0/16\n"));
    assert!(office.contains("Endpoint = wh.example.com:51820\n"));

    let warehouse = fs::read_to_string(out.join("warehouse/wg.conf")).expect("warehouse wg.conf");
    assert!(warehouse.contains("# Name = office\n"));

    let mt = fs::read_to_string(out.join("warehouse/mt.rsc")).expect("mt.rsc");
    assert!(mt.contains("comment=\"warehouse\""));
    assert!(mt.contains("allowed-address=\"172.16.0.2/30,::/0\""));
}

#[test]
fn pair_with_shared_hostname_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.toml"), "address = \"172.16.0.1/30\"\nhostname = \"edge\"\n")
        .expect("a.toml");
    fs::write(dir.path().join("b.toml"), "address = \"172.16.0.2/30\"\nhostname = \"edge\"\n")
        .expect("b.toml");
    let out = dir.path().join("out");
    wiregen(&out)
        .current_dir(dir.path())
        .args(["pair", "--first", "a.toml", "--second", "b.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: both sites would be written to"));

    assert!(!out.join("edge").exists());
}

#[test]
fn output_dir_from_env() {
    let dir = workspace();
    let mut cmd = Command::cargo_bin("wiregen").expect("binary built");
    cmd.current_dir(dir.path())
        .env_remove("WIREGEN_KEYS")
        .env("WIREGEN_OUTPUT", "from-env")
        .args(["clients", "--server", "server.toml"])
        .assert()
        .success();

    assert!(dir.path().join("from-env/hub/server.conf").is_file());
}
