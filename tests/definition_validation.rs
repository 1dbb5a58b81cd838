//! Malformed definitions are rejected before the file is touched.

mod common;

use hostsfile::{Definition, HostsError, Params, RawDefinition, State};

fn raw(ip: Option<&str>, names: Option<&[&str]>) -> RawDefinition {
    RawDefinition {
        ipaddress: ip.map(String::from),
        hostnames: names.map(|n| n.iter().map(|s| s.to_string()).collect()),
    }
}

fn message(err: HostsError) -> String {
    match err {
        HostsError::Validation(msg) => msg,
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn missing_ipaddress() {
    let err = Definition::from_raw(&raw(None, Some(&["a"]))).unwrap_err();
    assert!(message(err).contains("ipaddress"));
    assert!(Definition::from_raw(&raw(Some("  "), Some(&["a"]))).is_err());
}

#[test]
fn missing_or_empty_hostnames() {
    let err = Definition::from_raw(&raw(Some("10.0.0.1"), None)).unwrap_err();
    assert!(message(err).contains("no hostnames"));
    let err = Definition::from_raw(&raw(Some("10.0.0.1"), Some(&[]))).unwrap_err();
    assert!(message(err).contains("no hostnames"));
}

#[test]
fn bad_address() {
    for ip in ["10.0.0", "300.1.1.1", "web", "10.0.0.1%eth0", "fe80::1%"] {
        let err = Definition::new(ip, ["a"]).unwrap_err();
        assert!(matches!(err, HostsError::Validation(_)), "{ip}");
    }
}

#[test]
fn bad_hostname() {
    for name in ["", "two words", "tab\there", "hash#tag"] {
        assert!(Definition::new("10.0.0.1", [name]).is_err(), "{name:?}");
    }
}

#[test]
fn names_are_lowercased_and_deduplicated() {
    let def = Definition::new("10.0.0.1", [" Api.Test ", "api.test", "www"]).unwrap();
    assert_eq!(def.hostnames(), ["api.test", "www"]);
}

#[test]
fn command_line_form() {
    let def = Definition::parse_arg("fe80::1%eth0=router,gw").unwrap();
    assert_eq!(def.address().to_string(), "fe80::1%eth0");
    assert_eq!(def.address().zone(), Some("eth0"));
    assert_eq!(def.hostnames(), ["router", "gw"]);

    assert!(Definition::parse_arg("10.0.0.1").is_err());
    assert!(Definition::parse_arg("=a").is_err());
    assert!(Definition::parse_arg("10.0.0.1=").is_err());
}

#[test]
fn invalid_definition_leaves_file_untouched() {
    let dir = common::temp_dir();
    let hosts_path = common::hosts_with(&dir, "127.0.0.1 localhost\n");

    let params = Params {
        hostsfile: Some(hosts_path.clone()),
        state: State::Present,
        definitions: vec![
            raw(Some("10.0.0.1"), Some(&["good"])),
            raw(Some("10.0.0.2"), None),
        ],
        ..Params::default()
    };

    assert!(matches!(params.run(), Err(HostsError::Validation(_))));
    assert_eq!(common::read(&hosts_path), "127.0.0.1 localhost\n");
}
