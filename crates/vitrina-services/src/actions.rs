//! User-facing failure reporting.
//!
//! Every failure is scoped to the action that triggered it and degrades to a
//! localized message the front end shows in a banner; details go to the log.

use vitrina_core::{AppError, LogLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    LoadFiles,
    UploadFile,
    UpdateFile,
    DeleteFile,
    DeleteFiles,
    LoadTags,
    LoadStats,
    LoadPosts,
    SavePost,
    DeletePost,
}

impl UserAction {
    pub fn failure_message(&self) -> &'static str {
        match self {
            UserAction::LoadFiles => "Error al cargar archivos",
            UserAction::UploadFile => "Error al subir archivo",
            UserAction::UpdateFile => "Error al actualizar archivo",
            UserAction::DeleteFile => "Error al eliminar archivo",
            UserAction::DeleteFiles => "Error al eliminar archivos",
            UserAction::LoadTags => "Error al cargar etiquetas",
            UserAction::LoadStats => "Error al cargar estadísticas",
            UserAction::LoadPosts => "Error al cargar noticias",
            UserAction::SavePost => "Error al guardar la noticia",
            UserAction::DeletePost => "Error al eliminar la noticia",
        }
    }
}

/// Log `err` at its own level and return the message to show the user.
/// Locally detected errors (validation, taken slug) are specific enough to
/// show as-is.
pub fn report_failure(action: UserAction, err: &AppError) -> String {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(?action, error = %err, "Action did not complete"),
        LogLevel::Warn => tracing::warn!(?action, error = %err, "Action failed"),
        LogLevel::Error => tracing::error!(?action, error = %err, "Action failed"),
    }

    match err {
        AppError::Validation(inner) => inner.to_string(),
        AppError::SlugTaken(_) => "El slug ya está en uso por otra noticia".to_string(),
        AppError::InvalidInput(detail) => format!("{}: {}", action.failure_message(), detail),
        _ => action.failure_message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::validation::validate_file;

    #[test]
    fn http_failures_use_generic_message() {
        let err = AppError::Http {
            status: 500,
            message: "stack trace".to_string(),
        };
        assert_eq!(
            report_failure(UserAction::LoadFiles, &err),
            "Error al cargar archivos"
        );
    }

    #[test]
    fn validation_failures_are_shown_verbatim() {
        let err: AppError = validate_file("audio/mpeg", 1)
            .into_result()
            .unwrap_err()
            .into();
        assert_eq!(
            report_failure(UserAction::UploadFile, &err),
            "Tipo de archivo no permitido: audio/mpeg"
        );
    }

    #[test]
    fn taken_slug_has_its_own_message() {
        let err = AppError::SlugTaken("hola".to_string());
        assert_eq!(
            report_failure(UserAction::SavePost, &err),
            "El slug ya está en uso por otra noticia"
        );
    }
}
