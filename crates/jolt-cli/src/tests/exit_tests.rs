use anyhow::Context;

use crate::exit::{CodedError, Coder, HelpRequested, exit_code_for};

#[test]
fn default_errors_exit_one() {
    let err = anyhow::anyhow!("something broke");
    assert_eq!(exit_code_for(&err), 1);
}

#[test]
fn help_sentinel_exits_two() {
    let err: anyhow::Error = HelpRequested.into();
    assert_eq!(exit_code_for(&err), 2);
}

#[test]
fn help_sentinel_survives_wrapping() {
    let err = anyhow::Error::from(HelpRequested).context("while starting up");
    assert_eq!(exit_code_for(&err), 2);
}

#[test]
fn coded_errors_carry_their_code() {
    let err: anyhow::Error = CodedError::new(3, "special failure").into();
    assert_eq!(exit_code_for(&err), 3);

    let wrapped = anyhow::Error::from(CodedError::new(7, "deep")).context("outer layer");
    assert_eq!(exit_code_for(&wrapped), 7);
}

#[test]
fn coder_trait_exposes_the_code() {
    let coded = CodedError::new(42, "x");
    assert_eq!(coded.code(), 42);
}
