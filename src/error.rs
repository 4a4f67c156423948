/// Hard failure surfaced to the binary as a message plus process exit code.
///
/// Exit codes:
/// - `2`: unreadable/malformed input (table bundle, dates, arguments)
/// - `3`: table bundle failed structural validation
/// - `4`: output could not be written
///
/// Lookup misses are *not* errors; they travel as `ValueWithProvenance` notes.
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

    /// Malformed or unreadable input (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Table bundle violates a structural invariant (exit code 3).
    pub fn invalid_tables(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Output could not be written (exit code 4).
    pub fn output(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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
