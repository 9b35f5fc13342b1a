pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod proxy;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use app::builder::LocationQuery;
use app::controller::{Controller, DashboardUpdate};
use app::events::start_refresh_task;
use app::settings::{
    SettingsOverrides, load_runtime_settings, load_settings_from, save_runtime_settings,
    settings_path,
};
use cli::{Cli, Command, DashboardArgs, FavoritesAction, WatchArgs};
use config::ProxyConfig;
use data::cache::CachingGateway;
use data::gateway::ProviderGateway;
use data::http::HttpGateway;
use domain::weather::{UnitPreference, WeatherSnapshot};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Show(args) => show(args).await,
        Command::Watch(args) => watch(args).await,
        Command::Serve(args) => {
            let config = ProxyConfig::from_env()?.with_overrides(&args);
            proxy::serve(config).await
        }
        Command::Favorites(args) => {
            let path = settings_path()
                .context("no settings location; set WEATHERVERSE_CONFIG_DIR or HOME")?;
            let output = manage_favorites(&path, args.action.unwrap_or(FavoritesAction::List))?;
            println!("{output}");
            Ok(())
        }
    }
}

fn manage_favorites(path: &Path, action: FavoritesAction) -> Result<String> {
    let mut settings = load_settings_from(path, SettingsOverrides::default());
    match action {
        FavoritesAction::List => Ok(ui::render_favorites(&settings.favorites, settings.units)),
        FavoritesAction::Remove { position } => {
            let removed = position
                .checked_sub(1)
                .and_then(|index| settings.remove_favorite(index))
                .with_context(|| format!("no favorite at position {position}"))?;
            save_runtime_settings(path, &settings)?;
            info!(name = %removed.name, "favorite removed");
            Ok(format!("Removed {}", removed.location().display_name()))
        }
    }
}

/// Stars or unstars whatever the controller currently shows, then saves.
fn toggle_favorite<G: ProviderGateway + 'static>(controller: &mut Controller<G>) {
    if let Some(starred) = controller.state_mut().toggle_favorite() {
        controller.persist();
        info!(starred, "favorite toggled");
    }
}

fn overrides(args: &DashboardArgs, refresh_interval_secs: Option<u64>) -> SettingsOverrides {
    SettingsOverrides {
        temp: args.units.map(Into::into),
        speed: args.speed.map(Into::into),
        refresh_interval_secs,
    }
}

async fn show(args: DashboardArgs) -> Result<()> {
    args.validate()?;
    let gateway = HttpGateway::with_base_url(&args.gateway_url);
    if args.no_cache {
        show_with(gateway, &args).await
    } else {
        show_with(CachingGateway::new(gateway), &args).await
    }
}

async fn show_with<G: ProviderGateway + 'static>(gateway: G, args: &DashboardArgs) -> Result<()> {
    let (settings, path) = load_runtime_settings(overrides(args, None), !args.no_save);
    let mut controller = Controller::new(gateway, settings, path);
    let mut updates = controller.subscribe();

    let query = start_query(&controller, args).await?;
    controller.request(query);

    loop {
        let event = controller
            .next_event()
            .await
            .context("event channel closed before the snapshot arrived")?;
        controller.handle_event(event);
        match updates.try_recv() {
            Ok(DashboardUpdate::SnapshotUpdated(snapshot)) => {
                print_snapshot(&snapshot, controller.state().units(), args.json)?;
                if args.favorite {
                    toggle_favorite(&mut controller);
                }
                return Ok(());
            }
            Ok(DashboardUpdate::Error(err)) => return Err(err.into()),
            Err(_) => {}
        }
    }
}

async fn watch(args: WatchArgs) -> Result<()> {
    args.dashboard.validate()?;
    let gateway = HttpGateway::with_base_url(&args.dashboard.gateway_url);
    if args.dashboard.no_cache {
        watch_with(gateway, &args).await
    } else {
        watch_with(CachingGateway::new(gateway), &args).await
    }
}

async fn watch_with<G: ProviderGateway + 'static>(gateway: G, args: &WatchArgs) -> Result<()> {
    let dashboard = &args.dashboard;
    let (settings, path) = load_runtime_settings(
        overrides(dashboard, Some(args.refresh_interval)),
        !dashboard.no_save,
    );
    let refresh_secs = settings.refresh_interval_secs;
    let mut controller = Controller::new(gateway, settings, path);
    let mut updates = controller.subscribe();

    let query = start_query(&controller, dashboard).await?;
    controller.request(query);
    let refresh = start_refresh_task(controller.sender(), refresh_secs);
    info!(refresh_secs, "watching; press Ctrl-C to stop");

    let mut favorite_pending = dashboard.favorite;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("stopping watch");
                break;
            }
            event = controller.next_event() => match event {
                Some(event) => {
                    if !controller.handle_event(event) {
                        break;
                    }
                }
                None => break,
            },
            update = updates.recv() => match update {
                Ok(DashboardUpdate::SnapshotUpdated(snapshot)) => {
                    print_snapshot(&snapshot, controller.state().units(), dashboard.json)?;
                    println!();
                    if favorite_pending {
                        favorite_pending = false;
                        toggle_favorite(&mut controller);
                    }
                }
                Ok(DashboardUpdate::Error(err)) => {
                    error!(error = %err, "refresh failed, keeping last snapshot");
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "dashboard updates dropped"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    refresh.abort();
    controller.persist();
    Ok(())
}

/// Location from the flags, else the saved or default one. Bare
/// coordinates get a reverse-geocoded name when the lookup succeeds.
async fn start_query<G: ProviderGateway + 'static>(
    controller: &Controller<G>,
    args: &DashboardArgs,
) -> Result<LocationQuery> {
    let query = args
        .location_query()?
        .unwrap_or_else(|| LocationQuery::Coordinates(controller.state().startup_location()));

    match query {
        LocationQuery::Coordinates(location) if location.name.is_none() => {
            let named = match controller
                .builder()
                .reverse_geocode(location.latitude, location.longitude)
                .await
            {
                Ok(named) => named,
                Err(err) => {
                    debug!(error = %err, "reverse geocoding failed, using bare coordinates");
                    location
                }
            };
            Ok(LocationQuery::Coordinates(named))
        }
        other => Ok(other),
    }
}

fn print_snapshot(snapshot: &WeatherSnapshot, units: UnitPreference, json: bool) -> Result<()> {
    if json {
        let payload =
            serde_json::to_string_pretty(snapshot).context("serializing snapshot failed")?;
        println!("{payload}");
    } else {
        println!("{}", ui::render_report(snapshot, units, Utc::now()));
    }
    Ok(())
}
