/// No-Intro / Logiqx DAT parsing.
///
/// A DAT is an XML document of the form:
///
/// ```text
/// <datafile>
///   <header>...</header>
///   <game name="Mario Kart DS (USA, Australia)">
///     <description>...</description>
///     <rom name="Mario Kart DS (USA, Australia).nds" size="..." serial="AMCE"/>
///   </game>
/// </datafile>
/// ```
///
/// Only the game `name` and each rom's `serial` attribute are used.
use super::CatalogEntry;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Datafile {
    #[serde(rename = "game", default)]
    games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct Game {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "rom", default)]
    roms: Vec<Rom>,
}

#[derive(Debug, Deserialize)]
struct Rom {
    #[serde(rename = "@serial", default)]
    serial: Option<String>,
}

/// Parse DAT text into entries, in document order.
///
/// Each game yields one entry per rom with a non-empty serial. Games without
/// any serial (BIOS sets, some homebrew) contribute nothing.
pub fn parse(xml: &str) -> Result<Vec<CatalogEntry>, quick_xml::DeError> {
    let datafile: Datafile = quick_xml::de::from_str(xml)?;

    let mut entries = Vec::with_capacity(datafile.games.len());
    for game in datafile.games {
        for rom in game.roms {
            match rom.serial.as_deref().map(str::trim) {
                Some(serial) if !serial.is_empty() => {
                    entries.push(CatalogEntry::new(game.name.clone(), serial));
                }
                _ => {}
            }
        }
    }
    Ok(entries)
}
