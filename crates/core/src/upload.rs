//! Checks applied to an upload before the validator runs.

use thiserror::Error;

/// File extensions accepted for validation, lower case.
pub const ALLOWED_EXTENSIONS: &[&str] = &["epub"];

/// Reasons an upload is refused before any tool runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// The request has no `file` part.
    #[error("no file field in request")]
    MissingFile,
    /// The request has more than one `file` part.
    #[error("more than one file field in request")]
    MultipleFiles,
    /// The `file` part has an empty filename.
    #[error("uploaded file has an empty name")]
    EmptyFilename,
    /// The filename has no permitted extension.
    #[error("file type not allowed: {0}")]
    InvalidExtension(String),
    /// The body is larger than the configured limit.
    #[error("upload exceeds the size limit")]
    TooLarge,
    /// The multipart body could not be decoded.
    #[error("malformed multipart body: {0}")]
    Malformed(String),
}

impl UploadError {
    /// Short category reported in the `error` field.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingFile => "No file provided",
            Self::MultipleFiles => "Multiple files provided",
            Self::EmptyFilename => "Empty filename",
            Self::InvalidExtension(_) => "Invalid file type",
            Self::TooLarge => "File too large",
            Self::Malformed(_) => "Malformed upload",
        }
    }

    /// Localized explanation reported in the `errors` list.
    pub fn detail(&self) -> String {
        match self {
            Self::MissingFile => "No se proporcionó ningún archivo".into(),
            Self::MultipleFiles => "Solo se permite un archivo por solicitud".into(),
            Self::EmptyFilename => "Nombre de archivo vacío".into(),
            Self::InvalidExtension(_) => "Solo se permiten archivos .epub".into(),
            Self::TooLarge => "El archivo supera el tamaño máximo permitido".into(),
            Self::Malformed(reason) => format!("No se pudo leer el archivo enviado: {reason}"),
        }
    }
}

/// Checks the client-supplied filename of the `file` field.
///
/// `None` means the field was absent. The extension is whatever follows the
/// last `.` and is compared case-insensitively.
pub fn screen_filename(name: Option<&str>) -> Result<&str, UploadError> {
    let name = name.ok_or(UploadError::MissingFile)?;
    if name.is_empty() {
        return Err(UploadError::EmptyFilename);
    }
    let allowed = name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false);
    if !allowed {
        return Err(UploadError::InvalidExtension(name.to_owned()));
    }
    Ok(name)
}
