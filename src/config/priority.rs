// src/config/priority.rs

//! Syslog facility and severity name tables.
//!
//! These mirror the `facilitynames` / `prioritynames` tables of `syslog.h`.
//! Lookup is exact on the lowercase names.

use crate::config::model::LogTarget;
use crate::errors::{Result, SequenceError};

const FACILITIES: &[(&str, libc::c_int)] = &[
    ("auth", libc::LOG_AUTH),
    ("authpriv", libc::LOG_AUTHPRIV),
    ("cron", libc::LOG_CRON),
    ("daemon", libc::LOG_DAEMON),
    ("ftp", libc::LOG_FTP),
    ("kern", libc::LOG_KERN),
    ("lpr", libc::LOG_LPR),
    ("mail", libc::LOG_MAIL),
    ("news", libc::LOG_NEWS),
    ("syslog", libc::LOG_SYSLOG),
    ("user", libc::LOG_USER),
    ("uucp", libc::LOG_UUCP),
    ("local0", libc::LOG_LOCAL0),
    ("local1", libc::LOG_LOCAL1),
    ("local2", libc::LOG_LOCAL2),
    ("local3", libc::LOG_LOCAL3),
    ("local4", libc::LOG_LOCAL4),
    ("local5", libc::LOG_LOCAL5),
    ("local6", libc::LOG_LOCAL6),
    ("local7", libc::LOG_LOCAL7),
];

// "panic", "error" and "warn" are the deprecated aliases syslog.h still accepts.
const SEVERITIES: &[(&str, libc::c_int)] = &[
    ("emerg", libc::LOG_EMERG),
    ("panic", libc::LOG_EMERG),
    ("alert", libc::LOG_ALERT),
    ("crit", libc::LOG_CRIT),
    ("err", libc::LOG_ERR),
    ("error", libc::LOG_ERR),
    ("warning", libc::LOG_WARNING),
    ("warn", libc::LOG_WARNING),
    ("notice", libc::LOG_NOTICE),
    ("info", libc::LOG_INFO),
    ("debug", libc::LOG_DEBUG),
];

/// Facility used when the target names only a level.
pub const DEFAULT_FACILITY: &str = "user";

pub fn facility_by_name(name: &str) -> Option<i32> {
    lookup(FACILITIES, name)
}

pub fn severity_by_name(name: &str) -> Option<i32> {
    lookup(SEVERITIES, name)
}

fn lookup(table: &[(&str, libc::c_int)], name: &str) -> Option<i32> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Parse a `[facility.]level` string into a syslog [`LogTarget`].
pub fn parse_syslog_target(target: &str) -> Result<LogTarget> {
    let (facility_name, level_name) = match target.split_once('.') {
        Some((facility, level)) => (facility, level),
        None => (DEFAULT_FACILITY, target),
    };

    if facility_name.is_empty() || level_name.is_empty() {
        return Err(SequenceError::Config(format!(
            "Syslog target '{target}' must be of the form [facility.]level"
        )));
    }

    let facility = facility_by_name(facility_name).ok_or_else(|| {
        SequenceError::Config(format!("Syslog facility '{facility_name}' not recognised"))
    })?;
    let level = severity_by_name(level_name).ok_or_else(|| {
        SequenceError::Config(format!("Syslog level '{level_name}' not recognised"))
    })?;

    Ok(LogTarget::Syslog { facility, level })
}
