//! Raw daily records as published in the ECDC case-distribution dataset.

use serde::{Deserialize, Deserializer, Serialize};

/// One country's report for one day.
///
/// Field names follow the upstream payload so the same struct deserializes the
/// JSON feed and the CSV export. Only `date_rep`, `country`, `cases`, `deaths`
/// and `population` are read by the engine; the rest is carried through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CovidRecord {
    /// Report date, `DD/MM/YYYY`.
    #[serde(rename = "dateRep")]
    pub date_rep: String,

    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub year: Option<String>,

    pub cases: i64,
    pub deaths: i64,

    /// Country or territory, underscores instead of spaces (`United_States_of_America`).
    #[serde(rename = "countriesAndTerritories")]
    pub country: String,

    #[serde(rename = "geoId", default)]
    pub geo_id: Option<String>,
    #[serde(rename = "countryterritoryCode", default)]
    pub country_code: Option<String>,

    /// 2019 population estimate; null, blank or garbage all read as `None`.
    #[serde(
        rename = "popData2019",
        default,
        deserialize_with = "lenient_integer"
    )]
    pub population: Option<i64>,

    #[serde(rename = "continentExp", default)]
    pub continent: Option<String>,

    #[serde(
        rename = "notification_rate_per_100000_population_14_days",
        default,
        deserialize_with = "lenient_float"
    )]
    pub notification_rate_14d: Option<f64>,
}

impl CovidRecord {
    pub fn new(
        date_rep: &str,
        country: &str,
        cases: i64,
        deaths: i64,
        population: Option<i64>,
    ) -> Self {
        CovidRecord {
            date_rep: date_rep.to_string(),
            country: country.to_string(),
            cases,
            deaths,
            population,
            ..Default::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    fn into_f64(self) -> Option<f64> {
        let value = match self {
            LenientNumber::Int(v) => v as f64,
            LenientNumber::Float(v) => v,
            LenientNumber::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn into_i64(self) -> Option<i64> {
        match self {
            LenientNumber::Int(v) => Some(v),
            LenientNumber::Text(s) if s.trim().parse::<i64>().is_ok() => s.trim().parse().ok(),
            other => other.into_f64().map(|v| v.trunc() as i64),
        }
    }
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LenientNumber> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(LenientNumber::into_i64))
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<LenientNumber> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(LenientNumber::into_f64))
}
