mod common;

use common::{benin_location, fixed_now, gateway_for, mount_healthy_gateway};
use weatherverse::{
    app::builder::WeatherSnapshotBuilder,
    domain::weather::{SpeedUnit, TempUnit, UnitPreference, WeatherSnapshot},
    ui::{render_report, share_text},
};
use wiremock::MockServer;

async fn benin_snapshot() -> WeatherSnapshot {
    let server = MockServer::start().await;
    mount_healthy_gateway(&server).await;
    WeatherSnapshotBuilder::new(gateway_for(&server))
        .build_snapshot_at(benin_location(), fixed_now())
        .await
        .expect("snapshot")
}

/// Lines from `heading` up to the next blank line.
fn section(report: &str, heading: &str) -> String {
    report
        .lines()
        .skip_while(|line| *line != heading)
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn metric() -> UnitPreference {
    UnitPreference::default()
}

#[tokio::test]
async fn current_conditions_block() {
    let snapshot = benin_snapshot().await;
    let report = render_report(&snapshot, metric(), fixed_now());
    let header = report
        .lines()
        .take_while(|line| *line != "Next hours")
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(header.trim_end(), @r"
Benin City, NG  (6.3350, 5.6270)
Updated just now

☁ 24°C  feels like 26°C  scattered clouds
Wind 12 km/h SW  Humidity 70%  Pressure 1011 hPa  Visibility 9.0 km
Dew point 18°C
Sunrise 08:00  Sunset 20:00  Daylight 42%
Air quality Fair (AQI 2): Air quality is acceptable. Unusually sensitive people should consider reducing prolonged outdoor exertion.
UV 6.2 High (estimated): Stay in shade during midday hours.
");
}

#[tokio::test]
async fn hourly_strip() {
    let snapshot = benin_snapshot().await;
    let report = render_report(&snapshot, metric(), fixed_now());

    insta::assert_snapshot!(section(&report, "Next hours"), @r"
Next hours
  00:00  ☁   20°C  rain  20%  clouds
  03:00  ☁   21°C  rain  20%  clouds
  06:00  ☁   22°C  rain  20%  clouds
  09:00  ☁   23°C  rain  20%  clouds
  12:00  ☁   24°C  rain  20%  clouds
  15:00  ☁   25°C  rain  20%  clouds
  18:00  ☁   26°C  rain  20%  clouds
  21:00  ☁   27°C  rain  20%  clouds
");
}

#[tokio::test]
async fn five_day_outlook() {
    let snapshot = benin_snapshot().await;
    let report = render_report(&snapshot, metric(), fixed_now());

    insta::assert_snapshot!(section(&report, "Next days"), @r"
Next days
  Thu 12 Feb  ☁   20°C / 27°C    rain  20%  humidity 65%  clouds
  Fri 13 Feb  ☁   20°C / 27°C    rain  20%  humidity 65%  clouds
  Sat 14 Feb  ☁   20°C / 27°C    rain  20%  humidity 65%  clouds
  Sun 15 Feb  ☁   20°C / 27°C    rain  20%  humidity 65%  clouds
  Mon 16 Feb  ☁   20°C / 27°C    rain  20%  humidity 65%  clouds
");
}

#[tokio::test]
async fn imperial_units_apply_at_render_time() {
    let snapshot = benin_snapshot().await;
    let imperial = UnitPreference {
        temp: TempUnit::Fahrenheit,
        speed: SpeedUnit::Mph,
    };
    let report = render_report(&snapshot, imperial, fixed_now());

    assert!(report.contains("☁ 75°F  feels like 78°F  scattered clouds"));
    assert!(report.contains("Wind 7 mph SW"));
    assert_eq!(snapshot.current.temperature_c, 24.0);
}

#[tokio::test]
async fn share_text_lines() {
    let snapshot = benin_snapshot().await;
    let fahrenheit = UnitPreference {
        temp: TempUnit::Fahrenheit,
        ..UnitPreference::default()
    };

    insta::assert_snapshot!(
        share_text(&snapshot, metric()),
        @"Current weather in Benin City, NG: 24°C, scattered clouds. Check WeatherVerse for more details!"
    );
    insta::assert_snapshot!(
        share_text(&snapshot, fahrenheit),
        @"Current weather in Benin City, NG: 75°F, scattered clouds. Check WeatherVerse for more details!"
    );
}
