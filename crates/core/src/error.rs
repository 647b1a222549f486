use thiserror::Error;

use crate::model::{ProgressError, SkillNameError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    SkillName(#[from] SkillNameError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SkillName, TopicProgress};

    #[test]
    fn domain_errors_convert_into_crate_error() {
        let err: Error = SkillName::new("").unwrap_err().into();
        assert!(matches!(err, Error::SkillName(_)));

        let err: Error = TopicProgress::new()
            .record_code_score(-1.0)
            .unwrap_err()
            .into();
        assert_eq!(
            err.to_string(),
            "score must be a finite value between 0 and 100, got -1"
        );
    }
}
