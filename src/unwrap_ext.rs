use std::fmt::Display;

use log::error;

/// Ends the process on fatal startup errors after logging them.
pub trait UnwrapOrExit {
    type Output;
    fn unwrap_or_exit(self, msg: &str) -> Self::Output;
}

impl<T, E> UnwrapOrExit for Result<T, E>
where
    E: Display,
{
    type Output = T;
    fn unwrap_or_exit(self, msg: &str) -> Self::Output {
        match self {
            Err(e) => {
                error!("{msg}: {e:#}");
                std::process::exit(1);
            }
            Ok(v) => v,
        }
    }
}
