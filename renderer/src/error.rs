use thiserror::Error;

/// Errors raised while constructing scene objects from parameter maps, or
/// while loading/saving a photon map to disk.
///
/// These never cross a worker-thread boundary: a construction call collects
/// zero or more `RenderError`s alongside a best-effort default value, and it
/// is the caller (the scene-description loader) that decides whether to
/// abort. Runtime inconsistencies discovered mid-render (an out-of-range
/// sample, an empty k-d tree) are logged via the `log` facade at the call
/// site instead, per the render-time error policy.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("missing required parameter `{0}`")]
    MissingParameter(String),

    #[error("parameter `{name}` expected type `{expected}` but found `{found}`")]
    ParamTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown material reference `{0}`")]
    UnknownMaterial(String),

    #[error("unknown shape type `{0}`")]
    UnknownShape(String),

    #[error("unknown light type `{0}`")]
    UnknownLight(String),

    #[error("unknown camera type `{0}`")]
    UnknownCamera(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("photon map I/O error: {0}")]
    PhotonMapIo(#[from] std::io::Error),

    #[error("photon map file has incompatible version {found}, expected {expected}")]
    PhotonMapVersionMismatch { found: u32, expected: u32 },
}

pub type RenderResult<T> = Result<T, RenderError>;
