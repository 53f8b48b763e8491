use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Cygnar,
    Cryx,
    Menoth,
    Khador,
    Mercenaries,
    Cyriss,
    Scyrah,
    Trollbloods,
    Orboros,
    Everblight,
    Skorne,
    Minion,
}

impl Faction {
    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Cygnar => "cygnar",
            Faction::Cryx => "cryx",
            Faction::Menoth => "menoth",
            Faction::Khador => "khador",
            Faction::Mercenaries => "mercenaries",
            Faction::Cyriss => "cyriss",
            Faction::Scyrah => "scyrah",
            Faction::Trollbloods => "trollbloods",
            Faction::Orboros => "orboros",
            Faction::Everblight => "everblight",
            Faction::Skorne => "skorne",
            Faction::Minion => "minion",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known data-entry variants of caster names, mapped to the canonical form.
const CASTER_CORRECTIONS: &[(&str, &str)] = &[("vHarkevich 1", "Harkevich 1")];

use Faction::*;

const CASTERS: &[(&str, Faction)] = &[
    ("Absylonia 2", Everblight),
    ("Kallus 1", Everblight),
    ("Lylyth 1", Everblight),
    ("Lylyth 3", Everblight),
    ("Rhyas 1", Everblight),
    ("Saeryn 2 & Rhyas 2", Everblight),
    ("Thagrosh 1", Everblight),
    ("Thagrosh 2", Everblight),
    ("Vayl 1", Everblight),
    ("Vayl 2", Everblight),
    ("Agathia 1", Cryx),
    ("Asphyxious 3", Cryx),
    ("Deneghra 1", Cryx),
    ("Goreshade 1", Cryx),
    ("Goreshade 2", Cryx),
    ("Mortenebra 1", Cryx),
    ("Scaverous 1", Cryx),
    ("Skarre 1", Cryx),
    ("Skarre 2", Cryx),
    ("Terminus 1", Cryx),
    ("Venethrax 1", Cryx),
    ("Witch coven 1", Cryx),
    ("Amon 1", Menoth),
    ("Durst 1", Menoth),
    ("Harbinger 1", Menoth),
    ("High Reclaimer 1", Menoth),
    ("High Reclaimer 2", Menoth),
    ("Kreoss 1", Menoth),
    ("Kreoss 3", Menoth),
    ("Malekus 1", Menoth),
    ("Reznik 1", Menoth),
    ("Reznik 2", Menoth),
    ("Severius 1", Menoth),
    ("Severius 2", Menoth),
    ("Thyra 1", Menoth),
    ("Vindictus 1", Menoth),
    ("Arkadius 1", Minion),
    ("Barnabas 1", Minion),
    ("Carver 1", Minion),
    ("Maelok 1", Minion),
    ("Rask 1", Minion),
    ("Sturm & Drang 1", Minion),
    ("Aurora 1", Cyriss),
    ("Axis 1", Cyriss),
    ("Directrix 1", Cyriss),
    ("Iron Mother 1", Cyriss),
    ("Lucant 1", Cyriss),
    ("Baldur 1", Orboros),
    ("Baldur 2", Orboros),
    ("Grayle 1", Orboros),
    ("Kaya 2", Orboros),
    ("Kromac 1", Orboros),
    ("Kromac 2", Orboros),
    ("Krueger 1", Orboros),
    ("Tanith 1", Orboros),
    ("Wurmwood 1", Orboros),
    ("Borka 1", Trollbloods),
    ("Borka 2", Trollbloods),
    ("Calandra 1", Trollbloods),
    ("Doomshaper 1", Trollbloods),
    ("Doomshaper 2", Trollbloods),
    ("Doomshaper 3", Trollbloods),
    ("Grim 2", Trollbloods),
    ("Grissel 2", Trollbloods),
    ("Gunnbjorn 1", Trollbloods),
    ("Madrak 2", Trollbloods),
    ("Ragnor 1", Trollbloods),
    ("Skuld 1", Trollbloods),
    ("Butcher 1", Khador),
    ("Butcher 3", Khador),
    ("Vladimir 1", Khador),
    ("Vladimir 2", Khador),
    ("Vladimir 3", Khador),
    ("Harkevich 1", Khador),
    ("Irusk 2", Khador),
    ("Karchev 1", Khador),
    ("Sorscha 1", Khador),
    ("Strakhov 1", Khador),
    ("Caine 1", Cygnar),
    ("Caine 2", Cygnar),
    ("Darius 1", Cygnar),
    ("Haley 1", Cygnar),
    ("Haley 2", Cygnar),
    ("Haley 3", Cygnar),
    ("Maddox 1", Cygnar),
    ("Nemo 1", Cygnar),
    ("Nemo 3", Cygnar),
    ("Siege 1", Cygnar),
    ("Sloan 1", Cygnar),
    ("Stryker 1", Cygnar),
    ("Stryker 2", Cygnar),
    ("Cyphon 1", Mercenaries),
    ("Damiano 1", Mercenaries),
    ("Gorten 1", Mercenaries),
    ("MacBain 1", Mercenaries),
    ("Magnus 2", Mercenaries),
    ("Montador 1", Mercenaries),
    ("Thexus 1", Mercenaries),
    ("Helynna 1", Scyrah),
    ("Issyria 1", Scyrah),
    ("Kaelyssa 1", Scyrah),
    ("Ossrum 1", Scyrah),
    ("Ossyan 1", Scyrah),
    ("Rahn 1", Scyrah),
    ("Ravyn 1", Scyrah),
    ("Vyros 1", Scyrah),
    ("Vyros 2", Scyrah),
    ("Hexeris 2", Skorne),
    ("Makeda 2", Skorne),
    ("Mordikaar 1", Skorne),
    ("Morghoul 1", Skorne),
    ("Naaresh 1", Skorne),
    ("Rasheth 1", Skorne),
    ("Xerxis 1", Skorne),
    ("Zaal 1", Skorne),
];

static FACTIONS: Lazy<HashMap<&'static str, Faction>> =
    Lazy::new(|| CASTERS.iter().copied().collect());

pub fn fix_caster(caster: &str) -> &str {
    CASTER_CORRECTIONS
        .iter()
        .find(|(from, _)| *from == caster)
        .map(|(_, to)| *to)
        .unwrap_or(caster)
}

/// Faction of a caster, after applying known spelling corrections.
pub fn faction_of(caster: &str) -> Option<Faction> {
    FACTIONS.get(fix_caster(caster)).copied()
}

pub fn known_casters() -> impl Iterator<Item = &'static str> {
    CASTERS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrects_harkevich_variant() {
        assert_eq!(fix_caster("vHarkevich 1"), "Harkevich 1");
        assert_eq!(fix_caster("Caine 2"), "Caine 2");
        assert_eq!(faction_of("vHarkevich 1"), Some(Faction::Khador));
    }

    #[test]
    fn unknown_caster_has_no_faction() {
        assert_eq!(faction_of("Absylonia 2"), Some(Faction::Everblight));
        assert_eq!(faction_of("Caine 9"), None);
    }
}
