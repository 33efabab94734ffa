//! Period watch process: wires the core state machine to the engine and runs
//! the detector and responder loops until Ctrl-C.
pub mod config;
pub mod detector;
pub mod effects;
pub mod logging;
pub mod responder;

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use watch_engine::{
    BotApi, BotApiSettings, FetchSettings, Notifier, PageProbe, PeriodExtractor, ReqwestBotApi,
    ReqwestPageFetcher,
};
use watch_logging::{watch_error, watch_info, watch_warn};

use crate::config::WatchConfig;
use crate::detector::Detector;
use crate::effects::EffectRunner;
use crate::responder::{Responder, ResponderSettings};

/// Reads configuration, initializes logging and blocks until shutdown.
pub fn run() -> anyhow::Result<()> {
    let config = WatchConfig::from_env()?;
    logging::initialize(config.log_destination, config.log_level);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async move {
        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => watch_info!("Ctrl-C received, shutting down"),
                Err(err) => watch_error!("Failed to listen for Ctrl-C: {}", err),
            }
            signal_token.cancel();
        });
        serve(config, shutdown).await
    })
}

/// Both loops, sharing one notifier and one page probe, until `shutdown` fires.
pub async fn serve(config: WatchConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let fetch_settings = FetchSettings {
        accept_invalid_certs: config.insecure_tls,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestPageFetcher::new(fetch_settings).context("failed to build page client")?;
    let extractor = PeriodExtractor::new(&config.period_selector)
        .context("invalid period selector")?;
    let probe = PageProbe::new(config.page_url.clone(), Arc::new(fetcher), extractor);

    let mut api_settings = BotApiSettings::new(config.bot_token.clone());
    api_settings.api_url = config.api_url.clone();
    let api: Arc<dyn BotApi> =
        Arc::new(ReqwestBotApi::new(api_settings).context("failed to build bot api client")?);

    let runner = Arc::new(EffectRunner::new(
        Notifier::new(api.clone()),
        probe.clone(),
        config.destinations.clone(),
    ));

    watch_info!(
        "Watching {} every {:?} with {} policy",
        config.page_url,
        config.check_interval,
        config.policy
    );
    if config.insecure_tls {
        watch_warn!("TLS certificate verification is disabled for {}", config.page_url);
    }
    if config.destinations.public.is_none() {
        watch_warn!("{} not set; public notifications disabled", config::ENV_PUBLIC_CHAT);
    }
    if config.destinations.admin.is_none() {
        watch_warn!("{} not set; admin alerts disabled", config::ENV_ADMIN_CHAT);
    }

    let detector = Detector::new(config.policy, probe, runner.clone());
    let responder = Responder::new(api, runner, ResponderSettings::default());

    let detector_task = tokio::spawn(detector.run(config.check_interval, shutdown.clone()));
    let responder_task = tokio::spawn(responder.run(shutdown.clone()));

    let (detector_result, responder_result) = tokio::join!(detector_task, responder_task);
    detector_result.context("detector task panicked")?;
    responder_result.context("responder task panicked")?;
    Ok(())
}
