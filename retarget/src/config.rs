use {
    crate::stats::DEFAULT_FILTER_WINDOW,
    color_eyre::Report,
    eyre::WrapErr,
    std::path::{Path, PathBuf},
};

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    /// Sample budget of the spike-rejection pass per statistics report.
    #[serde(default = "default_filter_window")]
    pub filter_window: usize,

    /// Optional RON rig prefab; the built-in full skeleton is used when
    /// absent.
    #[serde(default)]
    pub rig: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            filter_window: default_filter_window(),
            rig: None,
        }
    }
}

impl Config {
    /// Loads from `RETARGET_CONFIG_PATH`, falling back to `./retarget.ron`
    /// and then to defaults when no file is present.
    pub fn load_default() -> Result<Self, Report> {
        let path = std::env::var("RETARGET_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./retarget.ron"));

        if !path.exists() {
            tracing::warn!(
                "no config at '{}', using defaults",
                path.display()
            );
            return Ok(Config::default());
        }

        let config = Self::load(&path)?;
        Ok(config)
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, Report> {
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to open config '{}'", path.display()))?;
        Ok(ron::de::from_reader(file)?)
    }
}

fn default_filter_window() -> usize {
    DEFAULT_FILTER_WINDOW
}
