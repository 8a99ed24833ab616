//! The two filesystem-path loader entry points (spec §6.1/§6.4) and
//! cooperative cancellation (§5), exercised against real temp files.

use std::io::Write;

use blueprint_core::cancel::CancellationToken;
use blueprint_core::loader::{from_jwcc_path, from_yaml_path, DecodeOptions};

#[test]
fn from_yaml_path_reads_and_decodes_a_real_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "version: '1'\nvariables:\n  env:\n    type: string\n").unwrap();

    let result = from_yaml_path(file.path(), &DecodeOptions::default()).unwrap();
    assert_eq!(result.blueprint.version, "1");
    assert!(result.blueprint.variables.contains_key("env"));
}

#[test]
fn from_jwcc_path_reads_and_decodes_a_real_file() {
    let mut file = tempfile::Builder::new().suffix(".jwcc").tempfile().unwrap();
    write!(
        file,
        r#"{{
  "version": "1", // trailing line comment
  "resources": {{
    "bucket": {{ "type": "aws/s3-bucket", "spec": {{}}, }},
  }},
}}"#
    )
    .unwrap();

    let result = from_jwcc_path(file.path(), &DecodeOptions::default()).unwrap();
    assert_eq!(result.blueprint.version, "1");
    assert!(result.blueprint.resources.contains_key("bucket"));
}

#[test]
fn missing_path_reports_io_error() {
    let err = from_yaml_path(std::path::Path::new("/no/such/blueprint.yaml"), &DecodeOptions::default())
        .expect_err("missing file must fail");
    assert!(matches!(err, blueprint_core::BlueprintError::Io(_)));
}

#[test]
fn cancelled_token_aborts_the_decode_before_it_starts() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "version: '1'\n").unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let options = DecodeOptions { cancellation: Some(token), tree_view: false };
    let err = from_yaml_path(file.path(), &options).expect_err("cancelled decode must fail");
    assert!(matches!(err, blueprint_core::BlueprintError::Cancelled));
}
