mod config;
mod source;

use {
    bumpalo::Bump,
    color_eyre::Report,
    eyre::WrapErr,
    hecs::World,
    retarget::{broker::TrackingEvents, rig::RigPrefab, scene, tracker::BodyTracker},
    std::path::PathBuf,
    tracing_subscriber::layer::SubscriberExt as _,
};

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish()
            .with(tracing_error::ErrorLayer::default()),
    )?;

    let config = load_config()?;
    tracing::info!("Config loaded: {:?}", config);

    let prefab = match &config.retarget.rig {
        Some(path) => RigPrefab::load(path)?,
        None => RigPrefab::full_skeleton(),
    };

    let mut world = World::new();
    let mut events = TrackingEvents::new();
    let mut tracker = BodyTracker::new(prefab, &config.retarget);
    let mut rng = rand::thread_rng();
    let mut source =
        source::SyntheticSource::new(config.demo.ticks, config.demo.jitter, &mut rng);
    let mut bump = Bump::new();

    tracker.start();

    while let Some(event) = source.next_event(&mut rng) {
        events.add(event);
        tracker.advance(&mut world, &mut events, &bump);

        for anchor in tracker.anchors() {
            scene::refresh_globals(&world, anchor, &bump);
        }

        events.clear();
        bump.reset();
    }

    tracker.stop();
    tracing::info!(
        "left hand samples: {}, right hand samples: {}",
        tracker.left_hand_history().len(),
        tracker.right_hand_history().len(),
    );

    Ok(())
}

fn load_config() -> Result<config::Config, Report> {
    let path = std::env::var("RETARGET_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./retarget.ron"));

    if !path.exists() {
        tracing::warn!("no config at '{}', using defaults", path.display());
        return Ok(config::Config::default());
    }

    let file = std::fs::File::open(&path)
        .wrap_err_with(|| format!("failed to open config '{}'", path.display()))?;
    Ok(ron::de::from_reader(file)?)
}
