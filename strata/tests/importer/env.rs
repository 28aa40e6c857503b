use std::collections::HashMap;
use strata::StrataError;
use strata::env::{database_config_with, sharepoint_credentials_with};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

const SQL: &[(&str, &str)] = &[
    ("STRATA_SQL_USERNAME", "reader"),
    ("STRATA_SQL_PASSWORD", "secret"),
    ("STRATA_SQL_HOST", "10.0.0.5"),
    ("STRATA_SQL_DATABASE", "plant"),
];

#[test]
fn database_config_without_port_uses_default() {
    let cfg = database_config_with(vars(SQL)).unwrap();
    assert_eq!(cfg.username, "reader");
    assert_eq!(cfg.host, "10.0.0.5");
    assert_eq!(cfg.port, 0);
    assert_eq!(cfg.effective_port(), 3306);
    assert!(!format!("{cfg:?}").contains("secret"));
}

#[test]
fn database_port_is_parsed() {
    let mut pairs = SQL.to_vec();
    pairs.push(("STRATA_SQL_PORT", " 3307 "));
    assert_eq!(database_config_with(vars(&pairs)).unwrap().port, 3307);

    // Later entries win.
    pairs.push(("STRATA_SQL_PORT", "mysql"));
    let err = database_config_with(vars(&pairs)).unwrap_err();
    assert!(matches!(err, StrataError::InvalidArg(_)));
}

#[test]
fn missing_or_blank_variable_is_reported_by_name() {
    let err = database_config_with(vars(&SQL[..3])).unwrap_err();
    assert!(err.to_string().contains("STRATA_SQL_DATABASE"), "{err}");

    let mut pairs = SQL.to_vec();
    pairs[0] = ("STRATA_SQL_USERNAME", "");
    let err = database_config_with(vars(&pairs)).unwrap_err();
    assert!(err.to_string().contains("STRATA_SQL_USERNAME"), "{err}");
}

#[test]
fn sharepoint_credentials_are_read() {
    let creds = sharepoint_credentials_with(vars(&[
        ("STRATA_SHAREPOINT_USERNAME", "analyst@contoso.com"),
        ("STRATA_SHAREPOINT_PASSWORD", "pw"),
        ("STRATA_SHAREPOINT_CLIENT_ID", "client"),
        ("STRATA_SHAREPOINT_TENANT", "contoso"),
    ]))
    .unwrap();
    assert_eq!(creds.tenant, "contoso");
    assert_eq!(creds.client_id, "client");

    let err = sharepoint_credentials_with(vars(&[])).unwrap_err();
    assert!(matches!(err, StrataError::InvalidArg(_)));
}
