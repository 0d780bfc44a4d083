/// Result alias used throughout the crate.
pub type GenResult<T> = Result<T, GenError>;

/// Everything that can end a generation run.
///
/// Best-effort teardown failures (for example suspending the audio context during
/// finalization) are never surfaced through this type; they are logged and dropped.
#[derive(thiserror::Error, Debug)]
pub enum GenError {
    /// No entry of the fallback MIME list can be recorded on this host.
    #[error("unsupported format: no recordable WebM variant is available")]
    UnsupportedFormat,

    /// The drawing surface could not be created.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A run was triggered while another one is still in progress.
    #[error("a generation run is already in progress")]
    AlreadyGenerating,

    /// Invalid input or internal contract violation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The encoder failed while recording or finalizing.
    #[error("encode error: {0}")]
    Encode(String),

    /// Any other failure (I/O and friends).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    /// Build a [`GenError::SurfaceUnavailable`].
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`GenError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GenError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Text shown in the single error area of the presenter.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFormat => "Seu navegador não suporta gravação de vídeo WebM.".to_owned(),
            Self::SurfaceUnavailable(_) => "Canvas não disponível.".to_owned(),
            Self::AlreadyGenerating => "Já existe um vídeo sendo gerado.".to_owned(),
            other => format!("Falha ao gerar o vídeo: {other}"),
        }
    }
}
