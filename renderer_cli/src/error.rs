use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("could not read scene file {}: {}", path, source))]
    ReadSceneFile { path: String, source: std::io::Error },

    #[snafu(display("could not parse scene file {}: {}", path, source))]
    ParseSceneFile { path: String, source: toml::de::Error },

    #[snafu(display("could not build scene: {}", source))]
    BuildScene { source: renderer::RenderError },

    #[snafu(display("scene has no lights"))]
    NoLights,

    #[snafu(display("unknown integrator type `{}`", name))]
    UnknownIntegrator { name: String },

    #[snafu(display("could not save output image {}: {}", path, source))]
    SaveImage { path: String, source: image::ImageError },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<renderer::RenderError> for Error {
    fn from(source: renderer::RenderError) -> Self {
        Error::BuildScene { source }
    }
}
