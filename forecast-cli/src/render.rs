//! Plain-text rendering of a [`WeatherViewModel`].

use forecast_core::{Favorite, WeatherFetchError, WeatherViewModel};

pub fn weather(vm: &WeatherViewModel) -> String {
    let loc = &vm.location;
    let cur = &vm.current;

    let mut lines = vec![
        format!("{}, {}", loc.name, loc.country),
        loc.local_time.clone(),
        String::new(),
        format!("{}  {}°C  {}", cur.icon_category.glyph(), cur.temp_c, cur.condition),
        format!("Feels like {}°C", cur.feels_like_c),
        String::new(),
        "Weather details".to_string(),
    ];

    let mut details = vec![
        ("Wind", format!("{} km/h {}", cur.wind_kph, cur.wind_dir)),
        ("Gust", format!("{} km/h", cur.gust_kph)),
        ("Humidity", format!("{}%", cur.humidity)),
        ("Pressure", format!("{} hPa", cur.pressure_mb)),
        ("Visibility", format!("{} km", cur.vis_km)),
        ("Precipitation", format!("{} mm", cur.precip_mm)),
        ("UV index", cur.uv.to_string()),
    ];
    if let Some(dew) = cur.dewpoint_c {
        details.push(("Dew point", format!("{dew}°C")));
    }
    if let Some(cloud) = cur.cloud {
        details.push(("Cloud cover", format!("{cloud}%")));
    }
    lines.extend(details.into_iter().map(|(label, value)| format!("  {label:<14}{value}")));

    if !vm.forecast_days.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}-day forecast", vm.forecast_days.len()));
        for day in &vm.forecast_days {
            let mut line = format!(
                "  {:<13}{}  {}° / {}°  {}  {} mm  {}% humidity",
                day.display_date,
                day.icon_category.glyph(),
                day.max_temp_c,
                day.min_temp_c,
                day.condition,
                day.total_precip_mm,
                day.avg_humidity,
            );
            if let (Some(rise), Some(set)) = (&day.sunrise, &day.sunset) {
                line.push_str(&format!("  sunrise {rise}, sunset {set}"));
            }
            lines.push(line);
        }
    }

    if !vm.upcoming_hours.is_empty() {
        lines.push(String::new());
        lines.push(format!("Next {} hours", vm.upcoming_hours.len()));
        lines.extend(vm.upcoming_hours.iter().map(|hour| {
            format!(
                "  {:<6}{}  {}°  {}",
                hour.display_time,
                hour.icon_category.glyph(),
                hour.temp_c,
                hour.condition
            )
        }));
    }

    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// User-facing text for a failed fetch, with suggestions where they help.
pub fn fetch_error(err: &WeatherFetchError, favorites: &[Favorite]) -> String {
    let mut out = format!("⚠️ {}", err.user_message());
    if matches!(err, WeatherFetchError::NotFound) && !favorites.is_empty() {
        let cities: Vec<&str> = favorites.iter().take(8).map(|f| f.city.as_str()).collect();
        out.push_str("\nTry one of these popular cities: ");
        out.push_str(&cities.join(", "));
    }
    out
}

pub fn favorites(favorites: &[Favorite]) -> String {
    if favorites.is_empty() {
        return "No favorites yet. Add one with `forecast favorites add <city> <country>`."
            .to_string();
    }
    favorites.iter().map(|f| format!("📍 {f}\n")).collect()
}

pub fn history(searches: &[String]) -> String {
    if searches.is_empty() {
        return "No recent searches.".to_string();
    }
    searches.iter().map(|s| format!("🔍 {s}\n")).collect()
}
