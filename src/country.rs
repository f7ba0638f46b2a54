use indexmap::IndexMap;
use serde::Deserialize;

/// Placeholder shown wherever an optional field is absent.
pub const NONE_LABEL: &str = "None";

/// A single country record as returned by the REST Countries v3.1 API.
///
/// Only the fields the explorer displays are decoded. Required fields fail
/// the whole decode when missing; everything else degrades to a placeholder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub cca3: String,
    pub name: CountryName,
    #[serde(default)]
    pub capital: Vec<String>,
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub currencies: Option<IndexMap<String, Currency>>,
    #[serde(default)]
    pub languages: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub borders: Option<Vec<String>>,
    #[serde(default)]
    pub timezones: Vec<String>,
    pub maps: Maps,
    pub flags: Flags,
    #[serde(default)]
    pub coat_of_arms: Option<CoatOfArms>,
    #[serde(default)]
    pub un_member: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryName {
    pub common: String,
    pub official: String,
    /// Raw per-language entries; only well-formed ones are displayed.
    #[serde(default)]
    pub native_name: Option<IndexMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maps {
    #[serde(default)]
    pub google_maps: String,
    #[serde(default)]
    pub open_street_maps: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoatOfArms {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
}

impl Country {
    pub fn capital_display(&self) -> String {
        join_or_none(&self.capital)
    }

    pub fn subregion_display(&self) -> &str {
        match self.subregion.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => NONE_LABEL,
        }
    }

    pub fn area_display(&self) -> String {
        format!("{} km²", format_decimal(self.area))
    }

    pub fn population_display(&self) -> String {
        group_thousands(&self.population.to_string())
    }

    /// First currency of the mapping as `Name (symbol)`.
    pub fn currency_display(&self) -> String {
        let first = self.currencies.as_ref().and_then(|c| c.values().next());
        match first {
            Some(Currency { name, symbol: Some(symbol) }) => format!("{} ({})", name, symbol),
            Some(Currency { name, symbol: None }) => name.clone(),
            None => NONE_LABEL.to_string(),
        }
    }

    pub fn languages_display(&self) -> String {
        match &self.languages {
            Some(langs) if !langs.is_empty() => {
                langs.values().map(String::as_str).collect::<Vec<_>>().join(", ")
            }
            _ => NONE_LABEL.to_string(),
        }
    }

    pub fn borders_display(&self) -> String {
        match &self.borders {
            Some(borders) => borders.join(", "),
            None => NONE_LABEL.to_string(),
        }
    }

    pub fn timezones_display(&self) -> String {
        self.timezones.join(", ")
    }

    pub fn un_member_label(&self) -> &'static str {
        if self.un_member { "Active" } else { "Inactive" }
    }

    pub fn flag_url(&self) -> Option<&str> {
        self.flags.svg.as_deref().or(self.flags.png.as_deref())
    }

    /// Coat of arms image, or `None` when the object is absent or empty.
    pub fn coat_of_arms_url(&self) -> Option<&str> {
        let coat = self.coat_of_arms.as_ref()?;
        coat.svg
            .as_deref()
            .or(coat.png.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// `(language, common name)` pairs for every well-formed native name entry.
    pub fn native_names(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.name
            .native_name
            .iter()
            .flat_map(|m| m.iter())
            .filter_map(|(lang, value)| {
                let common = value.as_object()?.get("common")?.as_str()?;
                Some((lang.as_str(), common))
            })
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE_LABEL.to_string()
    } else {
        items.join(", ")
    }
}

/// Insert `,` every three digits of an unsigned integer string.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Grouped integer part with up to three fractional digits, trailing zeros dropped.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, group_thousands(int_part))
    } else {
        format!("{}{}.{}", sign, group_thousands(int_part), frac)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "cca3": "ATA",
            "name": { "common": "Antarctica", "official": "Antarctica", "nativeName": {} },
            "region": "Antarctic",
            "area": 14000000,
            "population": 1000,
            "maps": {
                "googleMaps": "https://goo.gl/maps/kyBuJriu4itiXank7",
                "openStreetMaps": "https://www.openstreetmap.org/node/36966060"
            },
            "flags": { "png": "https://flagcdn.com/w320/aq.png" },
            "coatOfArms": {},
            "unMember": false
        })
    }

    #[test]
    fn test_missing_borders_renders_none() {
        let c: Country = serde_json::from_value(minimal()).unwrap();
        assert_eq!(c.borders_display(), "None");
        assert_eq!(c.languages_display(), "None");
        assert_eq!(c.currency_display(), "None");
        assert_eq!(c.capital_display(), "None");
        assert_eq!(c.subregion_display(), "None");
    }

    #[test]
    fn test_empty_coat_of_arms_has_no_image() {
        let c: Country = serde_json::from_value(minimal()).unwrap();
        assert!(c.coat_of_arms_url().is_none());

        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("coatOfArms");
        let c: Country = serde_json::from_value(raw).unwrap();
        assert!(c.coat_of_arms_url().is_none());
    }

    #[test]
    fn test_flag_falls_back_to_png() {
        let c: Country = serde_json::from_value(minimal()).unwrap();
        assert_eq!(c.flag_url(), Some("https://flagcdn.com/w320/aq.png"));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("region");
        assert!(serde_json::from_value::<Country>(raw).is_err());
    }

    #[test]
    fn test_currency_uses_first_key() {
        let mut raw = minimal();
        raw["currencies"] = json!({
            "CHF": { "name": "Swiss franc", "symbol": "Fr." },
            "EUR": { "name": "Euro", "symbol": "€" }
        });
        let c: Country = serde_json::from_value(raw).unwrap();
        assert_eq!(c.currency_display(), "Swiss franc (Fr.)");
    }

    #[test]
    fn test_currency_without_symbol() {
        let mut raw = minimal();
        raw["currencies"] = json!({ "XXX": { "name": "Token" } });
        let c: Country = serde_json::from_value(raw).unwrap();
        assert_eq!(c.currency_display(), "Token");
    }

    #[test]
    fn test_languages_joined_in_document_order() {
        let mut raw = minimal();
        raw["languages"] = json!({ "fra": "French", "deu": "German", "ita": "Italian" });
        let c: Country = serde_json::from_value(raw).unwrap();
        assert_eq!(c.languages_display(), "French, German, Italian");
    }

    #[test]
    fn test_native_names_skip_malformed_entries() {
        let mut raw = minimal();
        raw["name"]["nativeName"] = json!({
            "fra": { "official": "République française", "common": "France" },
            "bad": "just a string",
            "nocommon": { "official": "Only official" },
            "num": { "common": 42 },
            "deu": { "common": "Frankreich" }
        });
        let c: Country = serde_json::from_value(raw).unwrap();
        let names: Vec<_> = c.native_names().collect();
        assert_eq!(names, vec![("fra", "France"), ("deu", "Frankreich")]);
    }

    #[test]
    fn test_payload_key_order_survives_decoding() {
        let body = r#"{
            "cca3": "CHE",
            "name": {
                "common": "Switzerland",
                "official": "Swiss Confederation",
                "nativeName": {
                    "fra": { "official": "Confédération suisse", "common": "Suisse" },
                    "deu": { "official": "Schweizerische Eidgenossenschaft", "common": "Schweiz" }
                }
            },
            "currencies": { "EUR": { "name": "Euro", "symbol": "€" }, "CHF": { "name": "Swiss franc", "symbol": "Fr." } },
            "languages": { "fra": "French", "deu": "German" },
            "region": "Europe",
            "area": 41284,
            "population": 8654622,
            "maps": { "googleMaps": "https://goo.gl/maps/uVuZcXaxSx5jLyEC9", "openStreetMaps": "https://www.openstreetmap.org/relation/51701" },
            "flags": { "png": "https://flagcdn.com/w320/ch.png", "svg": "https://flagcdn.com/ch.svg" },
            "unMember": true
        }"#;
        let c: Country = serde_json::from_str(body).unwrap();
        assert_eq!(c.currency_display(), "Euro (€)");
        assert_eq!(c.languages_display(), "French, German");
        let names: Vec<_> = c.native_names().collect();
        assert_eq!(names, vec![("fra", "Suisse"), ("deu", "Schweiz")]);
    }

    #[test]
    fn test_native_names_absent() {
        let mut raw = minimal();
        raw["name"].as_object_mut().unwrap().remove("nativeName");
        let c: Country = serde_json::from_value(raw).unwrap();
        assert_eq!(c.native_names().count(), 0);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("83240525"), "83,240,525");
        assert_eq!(format_decimal(357114.0), "357,114");
        assert_eq!(format_decimal(0.44), "0.44");
        assert_eq!(format_decimal(1234.5), "1,234.5");
    }

    #[test]
    fn test_area_and_population_display() {
        let c: Country = serde_json::from_value(minimal()).unwrap();
        assert_eq!(c.area_display(), "14,000,000 km²");
        assert_eq!(c.population_display(), "1,000");
        assert_eq!(c.un_member_label(), "Inactive");
    }
}
