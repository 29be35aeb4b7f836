//! Logging for the `agora` binary.
//!
//! Turn phases, memory degradations and Ollama calls are all emitted as
//! `tracing` events. They go to stderr so that `--json` output on stdout
//! stays machine readable. With `--otel`, spans are also exported as
//! OpenTelemetry data on stdout.
//!
//! ```no_run
//! // What `agora -v` installs
//! agora_observe::tracing_setup::init_tracing("info,agora_core=debug", false).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Held until [`shutdown_tracing`] so buffered spans get flushed.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// `RUST_LOG` wins when it parses; otherwise the verbosity-derived default.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the process-wide subscriber.
///
/// Log lines carry their target (`agora_core::simulation::orchestrator`,
/// `agora_infra::llm::ollama::client`, ...) and span close timings, which
/// is how slow generations show up.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(default_filter: &str, enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    let otel_layer = enable_otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("agora");
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer::<Registry>().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(build_filter(default_filter))
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Export whatever spans are still buffered. Does nothing without `--otel`.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: failed to flush agora traces: {e}");
        }
    }
}
