//! Application error type.
//!
//! A single error struct carrying a message plus the process exit code to
//! report. Exit-code conventions:
//!
//! - 2: usage errors and data-shape violations (bad flags, malformed or
//!   mis-shaped input CSVs)
//! - 3: input errors the tool cannot work around (no overlapping x-values,
//!   zero usable rows)
//! - 4: database failures
//! - 5: report/plot failures

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// A data-shape or usage violation (exit code 2).
    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// An unrecoverable input problem (exit code 3).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// A database failure (exit code 4).
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    /// A report or plot failure (exit code 5).
    pub fn report(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
