#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub retarget: retarget::config::Config,

    #[serde(default)]
    pub demo: DemoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            retarget: retarget::config::Config::default(),
            demo: DemoConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Deserialize)]
pub struct DemoConfig {
    /// Tracking updates to simulate.
    #[serde(default = "default_ticks")]
    pub ticks: u32,

    /// Amplitude of the random jitter added to the hand motion.
    #[serde(default = "default_jitter")]
    pub jitter: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            ticks: default_ticks(),
            jitter: default_jitter(),
        }
    }
}

fn default_ticks() -> u32 {
    120
}

fn default_jitter() -> f32 {
    0.01
}
