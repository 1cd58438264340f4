//! Per-file upload progress records.

/// `Uploading(0..=99) -> Completed(100) | Error(message)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Completed,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub id: String,
    pub file_name: String,
    pub progress: u8,
    pub status: UploadStatus,
}

impl UploadRecord {
    pub fn new(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            progress: 0,
            status: UploadStatus::Uploading,
        }
    }

    /// Progress only moves while uploading, and stays below 100 until the
    /// server confirms.
    pub fn set_progress(&mut self, percent: u8) {
        if self.status == UploadStatus::Uploading {
            self.progress = self.progress.max(percent.min(99));
        }
    }

    pub fn complete(&mut self) {
        self.progress = 100;
        self.status = UploadStatus::Completed;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = UploadStatus::Error(message.into());
    }

    pub fn is_finished(&self) -> bool {
        self.status != UploadStatus::Uploading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            UploadStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotonic_and_capped() {
        let mut record = UploadRecord::new("u1", "a.png");
        record.set_progress(40);
        record.set_progress(20);
        assert_eq!(record.progress, 40);
        record.set_progress(100);
        assert_eq!(record.progress, 99);
        assert!(!record.is_finished());
    }

    #[test]
    fn terminal_states_freeze_progress() {
        let mut done = UploadRecord::new("u1", "a.png");
        done.complete();
        done.set_progress(10);
        assert_eq!(done.progress, 100);
        assert_eq!(done.status, UploadStatus::Completed);

        let mut failed = UploadRecord::new("u2", "b.png");
        failed.set_progress(30);
        failed.fail("HTTP error! status: 500");
        failed.set_progress(80);
        assert_eq!(failed.progress, 30);
        assert_eq!(failed.error(), Some("HTTP error! status: 500"));
        assert!(failed.is_finished());
    }
}
