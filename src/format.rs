//! User-facing texts. Everything the bot says is in Russian.

use crate::weather::WeatherReport;

pub const HELP_TEXT: &str = "Я расскажу о текущей погоде для населенного пункта.\n\n\
                             Я могу ответить на:\n\
                             - Текстовое сообщение с названием населенного пункта.\n\
                             - Голосовое сообщение с названием населенного пункта.\n\
                             - Сообщение с геопозицией.";

pub const UNSUPPORTED_TEXT: &str = "Я не могу ответить на такой тип сообщения.\n\
                                    Но могу ответить на:\n\
                                    - Текстовое сообщение с названием населенного пункта.\n\
                                    - Голосовое сообщение с названием населенного пункта.\n\
                                    - Сообщение с геопозицией.";

pub const VOICE_TOO_LONG_TEXT: &str = "Я не могу обработать это голосовое сообщение.";

pub const VOICE_NOT_RECOGNIZED_TEXT: &str = "Не удалось распознать голосовое сообщение.";

pub const LOCATION_UNKNOWN_TEXT: &str = "Я не знаю какая погода в этом месте.";

pub fn place_not_found(query: &str) -> String {
    format!("Я не нашел населенный пункт \"{}\".", query)
}

/// Full report for a text reply. Values are printed as the provider sent them.
pub fn text_report(report: &WeatherReport) -> String {
    [
        format!("{}.", capitalize(&report.description)),
        format!(
            "Температура {} ℃, ощущается как {} ℃.",
            report.temperature, report.feels_like
        ),
        format!("Атмосферное давление {} мм рт. ст.", report.pressure),
        format!("Влажность {} %.", report.humidity),
        format!("Видимость {} метров.", report.visibility),
        format!(
            "Ветер {} м/с {}.",
            report.wind_speed, report.wind_direction
        ),
        format!(
            "Восход солнца {} МСК. Закат {} МСК.",
            report.sunrise, report.sunset
        ),
    ]
    .join("\n")
}

/// Shorter report meant to be read aloud: whole numbers, words instead of units.
pub fn voice_report(place: &str, report: &WeatherReport) -> String {
    [
        format!("Населенный пункт {}.", place),
        format!("{}.", capitalize(&report.description)),
        format!(
            "Температура {} градусов цельсия.",
            round_half_even(report.temperature)
        ),
        format!(
            "Ощущается как {} градусов цельсия.",
            round_half_even(report.feels_like)
        ),
        format!(
            "Давление {} миллиметров ртутного столба.",
            round_half_even(report.pressure)
        ),
        format!("Влажность {} процентов.", round_half_even(report.humidity)),
    ]
    .join("\n")
}

/// Upper-case the first character, lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// Banker's rounding, so 2.5 reads as 2 and 3.5 as 4.
fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
