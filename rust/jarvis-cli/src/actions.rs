//! Stand-ins for the services a full assistant talks to.
//!
//! The command-line host has no weather API, encyclopedia, desktop or audio
//! mixer behind it. These handlers still validate their slots the way a
//! connected handler would, so the conversation reads the same; they just
//! say the service isn't connected instead of acting.

use jarvis_nlp::{Dispatcher, Entities, Intent, Slot, TemperatureUnit, WeatherLookup};

/// Sites opened in a browser rather than launched as applications.
pub const KNOWN_WEBSITES: &[&str] = &["google", "youtube", "wikipedia", "github", "amazon"];

/// Asked when a lookup names nothing to look up.
pub const NO_QUERY: &str = "What would you like me to search on Wikipedia?";
/// Asked when an open request names no target.
pub const NO_OPEN_TARGET: &str =
    "I'm not sure what you want me to open. Please specify an application or website.";
/// Asked when a close request names no target.
pub const NO_CLOSE_TARGET: &str =
    "I'm not sure what you want me to close. Please specify an application.";
/// Said when the volume level is missing or outside 0 to 100.
pub const BAD_VOLUME: &str = "Please specify a volume level between 0 and 100.";

/// Weather collaborator that reports the service as unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineWeather;

impl WeatherLookup for OfflineWeather {
    fn lookup(&self, location: &str, unit: TemperatureUnit) -> String {
        tracing::info!(location, %unit, "weather lookup requested while offline");
        format!("I can't reach the weather service right now, so I have no {unit} forecast for {location}.")
    }
}

/// Register the offline handlers on `dispatcher`.
pub fn install(dispatcher: &mut Dispatcher) {
    dispatcher.register(Intent::SearchWikipedia, search_wikipedia);
    dispatcher.register(Intent::OpenTarget, open_target);
    dispatcher.register(Intent::CloseTarget, close_target);
    dispatcher.register(Intent::SetVolume, set_volume);
}

fn slot(entities: &Entities, which: Slot) -> Option<&str> {
    entities.get(which).map(str::trim).filter(|value| !value.is_empty())
}

/// Encyclopedia lookup.
pub fn search_wikipedia(entities: &Entities) -> String {
    match slot(entities, Slot::Query) {
        Some(query) => format!("I can't reach Wikipedia right now, so I couldn't look up {query}."),
        None => NO_QUERY.to_string(),
    }
}

/// Launch an application or navigate to a known website.
pub fn open_target(entities: &Entities) -> String {
    let Some(target) = slot(entities, Slot::Target) else {
        return NO_OPEN_TARGET.to_string();
    };
    let site = target.trim_end_matches(".com").to_lowercase();
    if KNOWN_WEBSITES.contains(&site.as_str()) {
        format!("I'm not connected to a browser, so I can't navigate to {target}.")
    } else {
        format!("I'm not connected to the desktop, so I can't open {target}.")
    }
}

/// Close an application.
pub fn close_target(entities: &Entities) -> String {
    match slot(entities, Slot::Target) {
        Some(target) => format!("I'm not connected to the desktop, so I can't close {target}."),
        None => NO_CLOSE_TARGET.to_string(),
    }
}

/// Set the master volume to a level from 0 to 100.
pub fn set_volume(entities: &Entities) -> String {
    match slot(entities, Slot::Level).and_then(|level| level.parse::<i64>().ok()) {
        Some(level) if (0..=100).contains(&level) => {
            format!("I'm not connected to the audio mixer, so I couldn't set the volume to {level}%.")
        }
        _ => BAD_VOLUME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_slots_ask_for_them() {
        let none = Entities::new();
        assert_eq!(search_wikipedia(&none), NO_QUERY);
        assert_eq!(open_target(&none), NO_OPEN_TARGET);
        assert_eq!(close_target(&none), NO_CLOSE_TARGET);
        assert_eq!(set_volume(&none), BAD_VOLUME);
        assert_eq!(open_target(&Entities::new().with(Slot::Target, "  ")), NO_OPEN_TARGET);
    }

    #[test]
    fn websites_and_applications_differ() {
        let site = Entities::new().with(Slot::Target, "YouTube");
        assert!(open_target(&site).contains("browser"));

        let site = Entities::new().with(Slot::Target, "github.com");
        assert!(open_target(&site).contains("browser"));

        let app = Entities::new().with(Slot::Target, "calculator");
        assert!(open_target(&app).contains("desktop"));
    }

    #[test]
    fn volume_must_be_in_range() {
        let level = |value: &str| Entities::new().with(Slot::Level, value);
        assert_eq!(set_volume(&level("101")), BAD_VOLUME);
        assert_eq!(set_volume(&level("-5")), BAD_VOLUME);
        assert_eq!(set_volume(&level("loud")), BAD_VOLUME);
        assert!(set_volume(&level("0")).ends_with("0%."));
        assert!(set_volume(&level("100")).ends_with("100%."));
    }

    #[test]
    fn install_covers_service_intents() {
        let mut dispatcher = Dispatcher::with_defaults();
        install(&mut dispatcher);
        for intent in [
            Intent::SearchWikipedia,
            Intent::OpenTarget,
            Intent::CloseTarget,
            Intent::SetVolume,
        ] {
            assert!(dispatcher.handles(intent), "{intent}");
        }
    }
}
