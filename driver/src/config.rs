use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use error_stack::Report;
use kernel::prelude::policy::LendingPolicy;
use kernel::KernelError;

static SERVER_ADDR: &str = "SERVER_ADDR";
static UNLOCK_JOB_INTERVAL_SECS: &str = "UNLOCK_JOB_INTERVAL_SECS";
static LENDING_OVERDUE_AFTER_DAYS: &str = "LENDING_OVERDUE_AFTER_DAYS";
static LENDING_LOCK_WINDOW_DAYS: &str = "LENDING_LOCK_WINDOW_DAYS";
static LENDING_LOCK_THRESHOLD: &str = "LENDING_LOCK_THRESHOLD";
static LENDING_UNLOCK_AFTER_DAYS: &str = "LENDING_UNLOCK_AFTER_DAYS";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: SocketAddr,
    pub unlock_interval: Duration,
    pub lending_policy: LendingPolicy,
}

impl AppConfig {
    /// Reads the process environment, a `.env` file included.
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> error_stack::Result<Self, KernelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = LendingPolicy::default();
        let lending_policy = LendingPolicy::new(
            parse_or(&lookup, LENDING_OVERDUE_AFTER_DAYS, *default.overdue_after_days())?,
            parse_or(&lookup, LENDING_LOCK_WINDOW_DAYS, *default.lock_window_days())?,
            parse_or(&lookup, LENDING_LOCK_THRESHOLD, *default.lock_threshold())?,
            parse_or(&lookup, LENDING_UNLOCK_AFTER_DAYS, *default.unlock_after_days())?,
        );
        let server_addr = parse_or(
            &lookup,
            SERVER_ADDR,
            SocketAddr::from(([0, 0, 0, 0], 8080)),
        )?;
        let unlock_secs: u64 = parse_or(&lookup, UNLOCK_JOB_INTERVAL_SECS, 24 * 60 * 60)?;
        if unlock_secs == 0 {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("{UNLOCK_JOB_INTERVAL_SECS} must be positive")));
        }
        let unlock_interval = Duration::from_secs(unlock_secs);

        Ok(Self {
            server_addr,
            unlock_interval,
            lending_policy,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> error_stack::Result<T, KernelError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|error| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("Invalid value {raw:?} for {key}: {error}"))
        }),
    }
}
