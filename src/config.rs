use std::path::{Path, PathBuf};

use asterfee::FeeSchedule;
use tracing::info;

use crate::error::CliError;

/// Environment variable naming a JSON fee schedule to load instead of the builtin one.
pub const SCHEDULE_ENV: &str = "ASTER_FEE_SCHEDULE";

/// Path from `--schedule`, else from the environment.
pub fn schedule_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var(SCHEDULE_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    })
}

/// Load the active fee schedule. No path means the compiled-in schedule.
pub fn load_schedule(path: Option<&Path>) -> Result<FeeSchedule, CliError> {
    let Some(path) = path else {
        return Ok(FeeSchedule::builtin());
    };

    let text = std::fs::read_to_string(path).map_err(|source| CliError::ScheduleRead {
        path: path.display().to_string(),
        source,
    })?;
    let schedule = FeeSchedule::from_json_str(&text)?;
    info!(path = %path.display(), "loaded fee schedule");
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_is_builtin() {
        assert_eq!(load_schedule(None).unwrap(), FeeSchedule::builtin());
    }

    #[test]
    fn test_flag_wins_over_env() {
        let flag = PathBuf::from("/tmp/from-flag.json");
        assert_eq!(schedule_path(Some(flag.clone())), Some(flag));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("aster-calc-{}.json", std::process::id()));
        let mut schedule = FeeSchedule::builtin();
        schedule.bridge_transactions_per_month = 2.0;
        std::fs::write(&path, schedule.to_json_pretty().unwrap()).unwrap();

        let loaded = load_schedule(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.bridge_transactions_per_month, 2.0);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_schedule(Some(Path::new("/nonexistent/schedule.json"))).unwrap_err();
        match err {
            CliError::ScheduleRead { path, .. } => assert_eq!(path, "/nonexistent/schedule.json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
