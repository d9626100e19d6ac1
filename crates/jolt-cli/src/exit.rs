//! The process exit-code contract.
//!
//! `0` on success, `1` for any ordinary error, `2` when help was
//! requested (a sentinel error so the help path flows through the same
//! error plumbing), and whatever code an error carries when it implements
//! [`Coder`].

/// Errors that know their own exit code.
pub trait Coder {
    fn code(&self) -> i32;
}

/// An error carrying an explicit exit code through an `anyhow` chain.
#[derive(Debug)]
pub struct CodedError {
    pub code: i32,
    pub message: String,
}

impl CodedError {
    pub fn new(code: i32, message: impl Into<String>) -> CodedError {
        CodedError {
            code,
            message: message.into(),
        }
    }
}

impl Coder for CodedError {
    fn code(&self) -> i32 {
        self.code
    }
}

impl std::fmt::Display for CodedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CodedError {}

/// The sentinel raised when the user asked for help.
#[derive(Debug)]
pub struct HelpRequested;

impl std::fmt::Display for HelpRequested {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("help requested")
    }
}

impl std::error::Error for HelpRequested {}

/// Resolve the process exit code for a failed run.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<HelpRequested>().is_some() {
            return 2;
        }
        if let Some(coded) = cause.downcast_ref::<CodedError>() {
            return coded.code();
        }
    }
    1
}
