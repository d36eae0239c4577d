use std::any::Any;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

#[derive(Debug, thiserror::Error)]
pub enum ProfilingError {
  #[error("Failed to create trace file: {0}")]
  TraceFile(#[from] std::io::Error),
  #[error("A global subscriber is already installed: {0}")]
  Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs the global subscriber, solver events are filtered through `RUST_LOG`
///
/// The returned guards flush their layers when dropped and must outlive the profiled code.
pub fn enable_profiling() -> Result<Vec<Box<dyn Any>>, ProfilingError> {
  #[allow(unused_mut)]
  let mut guards: Vec<Box<dyn Any>> = Vec::new();

  let subscriber = Registry::default()
    .with(EnvFilter::from_default_env())
    .with(tracing_subscriber::fmt::layer());

  #[cfg(feature = "tracing-tracy")]
  let subscriber = {
    use tracing_tracy::TracyLayer;
    use tracing_tracy::client::Client;

    let (tracy_layer, tracy_client) = (TracyLayer::default(), Client::start());

    guards.push(Box::new(tracy_client));
    subscriber.with(tracy_layer)
  };

  #[cfg(feature = "tracing-chrome")]
  let output_file = format!(
    "target/trace-{variant}.json",
    variant = chrono::Local::now().format("%Y%m%d-%H%M%S")
  );

  #[cfg(feature = "tracing-chrome")]
  let subscriber = {
    use std::fs::File;
    use tracing_chrome::ChromeLayerBuilder;

    let (chrome_layer, chrome_guard) = ChromeLayerBuilder::new()
      .writer(File::create(&output_file)?)
      .build();

    guards.push(Box::new(chrome_guard));
    subscriber.with(chrome_layer)
  };

  tracing::subscriber::set_global_default(subscriber)?;

  #[cfg(feature = "tracing-chrome")]
  tracing::info!(%output_file, "saving chrome trace");

  Ok(guards)
}
