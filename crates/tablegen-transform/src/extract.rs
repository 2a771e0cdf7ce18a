//! Pure value extractors.

use chrono::{Datelike, NaiveDateTime};
use tablegen_model::CellValue;

/// Spanish month names and their three-letter abbreviations.
const MONTH_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Enero", "ene"),
    ("Febrero", "feb"),
    ("Marzo", "mar"),
    ("Abril", "abr"),
    ("Mayo", "may"),
    ("Junio", "jun"),
    ("Julio", "jul"),
    ("Agosto", "ago"),
    ("Septiembre", "sep"),
    ("Octubre", "oct"),
    ("Noviembre", "nov"),
    ("Diciembre", "dic"),
];

/// Country keywords in match priority order. Earlier entries win.
const COUNTRY_KEYWORDS: &[(&str, &str)] = &[
    ("Argentina", "Argentina"),
    ("argentina", "Argentina"),
    ("Perú", "Perú"),
    ("Peru", "Perú"),
    ("Colombia", "Colombia"),
    ("Chile", "Chile"),
    ("Bolivia", "Bolivia"),
    ("Ecuador", "Ecuador"),
    ("Brasil", "Brasil"),
    ("Paraguay", "Paraguay"),
    ("Uruguay", "Uruguay"),
    ("México", "México"),
    ("Mexico", "México"),
    ("Panamá", "Panamá"),
    ("Panama", "Panamá"),
    ("Costa Rica", "Costa Rica"),
    ("Honduras", "Honduras"),
    ("El Salvador", "El Salvador"),
    ("Guatemala", "Guatemala"),
    ("Nicaragua", "Nicaragua"),
    ("Venezuela", "Venezuela"),
    ("República Dominicana", "República Dominicana"),
];

/// Institution names that imply a country, scanned after the country table.
const ENTITY_COUNTRY_HINTS: &[(&str, &str)] = &[
    ("Nación", "Argentina"),
    ("Nacion", "Argentina"),
    ("Buenos Aires", "Argentina"),
    ("CABA", "Argentina"),
    ("Provincia de", "Argentina"),
    ("Ministerio de Seguridad", "Argentina"),
    ("Banco Hipotecario", "Argentina"),
];

/// Abbreviates a `"<Month> <Year>"` value as `"<mon>-<yy>"`.
///
/// The month is looked up case-sensitively in the Spanish month table;
/// unknown names fall back to their first three characters, lowercased.
/// Values that are not exactly two words come back unchanged.
///
/// ```
/// use tablegen_transform::convert_date;
///
/// assert_eq!(convert_date("Agosto 2021"), "ago-21");
/// assert_eq!(convert_date("Foo 99"), "foo-99");
/// assert_eq!(convert_date("not-a-date"), "not-a-date");
/// ```
pub fn convert_date(raw: &str) -> String {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    let [month, year] = parts.as_slice() else {
        return raw.to_string();
    };
    let abbreviation = MONTH_ABBREVIATIONS
        .iter()
        .find(|(name, _)| name == month)
        .map(|(_, abbr)| (*abbr).to_string())
        .unwrap_or_else(|| month.chars().take(3).collect::<String>().to_lowercase());
    let year_chars: Vec<char> = year.chars().collect();
    let short_year: String = year_chars[year_chars.len().saturating_sub(2)..]
        .iter()
        .collect();
    format!("{abbreviation}-{short_year}")
}

/// Country named in `text`, or an empty string.
///
/// Matching is a case-sensitive substring search; the first keyword in
/// table order wins, then the entity hints are tried the same way.
pub fn extract_country(text: &str) -> String {
    COUNTRY_KEYWORDS
        .iter()
        .chain(ENTITY_COUNTRY_HINTS)
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, country)| (*country).to_string())
        .unwrap_or_default()
}

/// Formats a date cell: `MM/YYYY` on the first of a month, else `DD/MM/YYYY`.
pub fn format_cell_date(value: &NaiveDateTime) -> String {
    if value.day() == 1 {
        format!("{:02}/{}", value.month(), value.year())
    } else {
        format!("{:02}/{:02}/{}", value.day(), value.month(), value.year())
    }
}

/// Text rendering of a cell, as used for header labels and text sources.
pub fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(text) => text.clone(),
        CellValue::Number(number) => number.to_string(),
        CellValue::Bool(flag) => flag.to_string(),
        CellValue::Date(date) => format_cell_date(date),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn convert_date_examples() {
        assert_snapshot!(convert_date("Agosto 2021"), @"ago-21");
        assert_snapshot!(convert_date("  Diciembre   2019 "), @"dic-19");
        assert_snapshot!(convert_date("agosto 2021"), @"ago-21");
        assert_snapshot!(convert_date("AGOSTO 2021"), @"ago-21");
        assert_snapshot!(convert_date("Ago 5"), @"ago-5");
        assert_eq!(convert_date(""), "");
        assert_eq!(convert_date("1 de agosto"), "1 de agosto");
    }

    #[test]
    fn first_country_keyword_wins() {
        assert_eq!(extract_country("Embajada de Chile en Perú"), "Perú");
        assert_eq!(extract_country("Gobierno de Panama"), "Panamá");
        assert_eq!(extract_country("Banco de la Nación Argentina"), "Argentina");
        assert_eq!(extract_country("CHILE"), "");
        assert_eq!(extract_country(""), "");
    }

    #[test]
    fn entity_hints_follow_country_table() {
        assert_eq!(
            extract_country("Ministerio de Seguridad de la Nación"),
            "Argentina"
        );
        assert_eq!(extract_country("Gobierno de CABA"), "Argentina");
        assert_eq!(extract_country("Provincia de Buenos Aires, Uruguay"), "Uruguay");
    }

    #[test]
    fn whole_month_dates_drop_the_day() {
        assert_eq!(format_cell_date(&date(2021, 8, 1)), "08/2021");
        assert_eq!(format_cell_date(&date(2021, 8, 15)), "15/08/2021");
    }

    #[test]
    fn cell_text_renders_each_kind() {
        assert_eq!(cell_text(&CellValue::Empty), "");
        assert_eq!(cell_text(&CellValue::Number(1200.0)), "1200");
        assert_eq!(cell_text(&CellValue::Number(0.25)), "0.25");
        assert_eq!(cell_text(&CellValue::Bool(true)), "true");
        assert_eq!(cell_text(&CellValue::Date(date(2020, 3, 9))), "09/03/2020");
        assert_eq!(cell_text(&"Objeto".into()), "Objeto");
    }
}
