//! Declaration of the single-instance decrypt function and its log group.

use std::collections::BTreeMap;

/// Retention period for the function's operational log group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionDays {
    OneDay,
    ThreeDays,
    FiveDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
}

impl RetentionDays {
    /// Number of days this retention period covers.
    pub fn as_days(self) -> u32 {
        match self {
            RetentionDays::OneDay => 1,
            RetentionDays::ThreeDays => 3,
            RetentionDays::FiveDays => 5,
            RetentionDays::OneWeek => 7,
            RetentionDays::TwoWeeks => 14,
            RetentionDays::OneMonth => 30,
        }
    }
}

impl Default for RetentionDays {
    /// Logs of the decrypt function are short-lived diagnostics.
    fn default() -> Self {
        RetentionDays::OneWeek
    }
}

/// What happens to the log group when its owning resource is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    Destroy,
    Retain,
}

/// Declaration of the function's dedicated log group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogGroupSpec {
    pub retention: RetentionDays,
    pub removal_policy: RemovalPolicy,
}

/// Instruction-set architecture the function runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Arm64,
    X86_64,
}

/// Declaration of a single-instance function.
///
/// `uuid` is the stable dedup key: the [`crate::DeploymentUnit`] guarantees at
/// most one function is declared per uuid, no matter how many times the
/// declaration code runs within the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    /// Human-readable purpose label, e.g. `DecryptSecret`.
    pub purpose: String,
    /// Stable identity derived from the deployment-unit name.
    pub uuid: String,
    /// Name of the executor artifact the function runs.
    pub handler: String,
    /// Memory allocation in MiB.
    pub memory_size_mb: u32,
    pub architecture: Architecture,
    /// Environment variables injected into the executor at runtime.
    pub environment: BTreeMap<String, String>,
    pub log_group: LogGroupSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_day_counts() {
        assert_eq!(RetentionDays::OneDay.as_days(), 1);
        assert_eq!(RetentionDays::FiveDays.as_days(), 5);
        assert_eq!(RetentionDays::OneWeek.as_days(), 7);
        assert_eq!(RetentionDays::TwoWeeks.as_days(), 14);
        assert_eq!(RetentionDays::OneMonth.as_days(), 30);
    }

    #[test]
    fn default_retention_is_one_week() {
        assert_eq!(RetentionDays::default(), RetentionDays::OneWeek);
    }
}
