//! Application-boundary error type.
//!
//! Exit-code convention:
//!
//! - `2`: input/configuration problems (bad flags, missing files, bad env)
//! - `3`: data problems (empty or unusable snapshot history)
//! - `4`: network/compute problems (fetch failures, export failures)
//!
//! Solver failures are a separate typed enum (`math::SolveError`) because the
//! series builder applies per-variant policy; they only become an `AppError`
//! if they reach the application boundary.

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
