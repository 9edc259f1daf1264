//! Identity validation and `arapp.json` resolution tests.

use std::path::Path;

use assert_fs::prelude::*;
use devstart_core::{
    identity::{self, is_valid_dev_ens_name},
    EnsName, IdentityError,
};
use predicates::prelude::*;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Development name convention
// ---------------------------------------------------------------------------

#[rstest]
#[case("myapp.aragonpm.eth")]
#[case("voting.aragonpm.eth")]
#[case("my-app-2.aragonpm.eth")]
#[case("0x.aragonpm.eth")]
fn accepts_single_label_under_dev_registry(#[case] name: &str) {
    assert!(is_valid_dev_ens_name(name), "{name} should be accepted");
}

#[rstest]
#[case("myapp")]
#[case("myapp.eth")]
#[case("aragonpm.eth")]
#[case(".aragonpm.eth")]
#[case("myapp.open.aragonpm.eth")]
#[case("sub.myapp.aragonpm.eth")]
#[case("MyApp.aragonpm.eth")]
#[case("my_app.aragonpm.eth")]
#[case("myapp.aragonpm.eth.")]
#[case("myapparagonpm.eth")]
#[case("")]
fn rejects_other_shapes(#[case] name: &str) {
    assert!(!is_valid_dev_ens_name(name), "{name} should be rejected");
}

// ---------------------------------------------------------------------------
// 2. arapp.json
// ---------------------------------------------------------------------------

#[test]
fn reads_default_environment_app_name() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let file = project.child("arapp.json");
    file.write_str(
        r#"{
  "environments": {
    "default": { "appName": "myapp.aragonpm.eth", "network": "rpc" },
    "rinkeby": { "appName": "myapp.open.aragonpm.eth" }
  }
}"#,
    )
    .expect("write arapp.json");
    let contents = std::fs::read_to_string(file.path()).expect("read back");

    let ens = identity::ens_name_from_arapp(file.path(), &contents).expect("parse");
    assert_eq!(ens, EnsName::from("myapp.aragonpm.eth"));
}

#[test]
fn corrupt_arapp_is_parse_error_naming_the_file() {
    let err = identity::ens_name_from_arapp(Path::new("proj/arapp.json"), "{ not json").unwrap_err();
    assert!(matches!(err, IdentityError::Parse { .. }), "got: {err}");
    assert!(predicate::str::contains("proj/arapp.json").eval(&err.to_string()));
}

#[test]
fn non_string_app_name_is_missing() {
    let err = identity::ens_name_from_arapp(
        Path::new("arapp.json"),
        r#"{"environments":{"default":{"appName":42}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, IdentityError::MissingAppName { .. }), "got: {err}");
}

#[test]
fn arapp_path_is_under_project_root() {
    assert_eq!(
        identity::arapp_path(Path::new("/work/voting")),
        Path::new("/work/voting/arapp.json")
    );
}

// ---------------------------------------------------------------------------
// 3. Derived identity
// ---------------------------------------------------------------------------

#[test]
fn identity_is_deterministic() {
    let ens = EnsName::from("myapp.aragonpm.eth");
    let a = identity::identity_for(identity::app_name(&ens), ens.clone());
    let b = identity::identity_for(identity::app_name(&ens), ens);
    assert_eq!(a, b);
    assert_eq!(a.name, "myapp");
}

#[test]
fn different_names_get_different_ids() {
    let a = identity::app_id(&EnsName::from("myapp.aragonpm.eth"));
    let b = identity::app_id(&EnsName::from("other.aragonpm.eth"));
    assert_ne!(a, b);
}
