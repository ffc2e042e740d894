//! Intent → response handlers.
//!
//! The dispatcher does not interpret what a handler says. Handlers that need
//! the outside world (encyclopedia, applications, audio) are registered by
//! the host; the built-ins here only need the clock and the calculator.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::intent::{Entities, Intent, Slot};

pub type Handler = Box<dyn Fn(&Entities) -> String>;

pub const GREETING: &str = "Hello Sir, How can I assist you today?";
pub const FAREWELL: &str = "Goodbye Sir, Have a pleasant day!";
pub const NOT_UNDERSTOOD: &str = "Sorry, I don't understand that command yet.";
pub const MODEL_UNAVAILABLE: &str =
    "My intent model isn't available right now. Please train it and try again.";
pub const NO_HANDLER: &str = "Sorry, I can't do that yet.";
pub const NO_EXPRESSION: &str = "What would you like me to calculate?";

#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<Intent, Handler>,
}

impl Dispatcher {
    /// An empty registry: every intent gets [`NO_HANDLER`].
    pub fn new() -> Self {
        Dispatcher {
            handlers: HashMap::new(),
        }
    }

    /// A registry holding the handlers that need no external service.
    pub fn with_defaults() -> Self {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Intent::Greet, |_| GREETING.to_string());
        dispatcher.register(Intent::GetTime, |_| time_reply(&Local::now()));
        dispatcher.register(Intent::GetDate, |_| {
            date_reply(Local::now().date_naive())
        });
        dispatcher.register(Intent::Exit, |_| FAREWELL.to_string());
        dispatcher.register(Intent::Unknown, |_| NOT_UNDERSTOOD.to_string());
        dispatcher.register(Intent::ModelError, |_| MODEL_UNAVAILABLE.to_string());
        dispatcher.register(Intent::Calculate, calculate_reply);
        dispatcher
    }

    /// Install `handler` for `intent`, replacing any earlier one.
    pub fn register<F>(&mut self, intent: Intent, handler: F)
    where
        F: Fn(&Entities) -> String + 'static,
    {
        self.handlers.insert(intent, Box::new(handler));
    }

    pub fn handles(&self, intent: Intent) -> bool {
        self.handlers.contains_key(&intent)
    }

    pub fn dispatch(&self, intent: Intent, entities: &Entities) -> String {
        match self.handlers.get(&intent) {
            Some(handler) => handler(entities),
            None => {
                tracing::debug!(%intent, "no handler registered");
                NO_HANDLER.to_string()
            }
        }
    }
}

pub fn time_reply<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("The current time is {}", now.format("%I:%M %p"))
}

pub fn date_reply(today: NaiveDate) -> String {
    format!("Today is {}", today.format("%A, %B %d, %Y"))
}

pub fn calculate_reply(entities: &Entities) -> String {
    match entities.get(Slot::Expression) {
        Some(expression) if !expression.trim().is_empty() => jarvis_math::answer(expression),
        _ => NO_EXPRESSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtins_answer_without_services() {
        let dispatcher = Dispatcher::with_defaults();
        let none = Entities::new();
        assert_eq!(dispatcher.dispatch(Intent::Greet, &none), GREETING);
        assert_eq!(dispatcher.dispatch(Intent::Exit, &none), FAREWELL);
        assert_eq!(dispatcher.dispatch(Intent::Unknown, &none), NOT_UNDERSTOOD);
        assert_eq!(dispatcher.dispatch(Intent::ModelError, &none), MODEL_UNAVAILABLE);
        assert!(dispatcher.dispatch(Intent::GetTime, &none).starts_with("The current time is "));
        assert!(dispatcher.dispatch(Intent::GetDate, &none).starts_with("Today is "));
    }

    #[test]
    fn unregistered_intent_falls_back() {
        let dispatcher = Dispatcher::with_defaults();
        assert!(!dispatcher.handles(Intent::SearchWikipedia));
        assert_eq!(
            dispatcher.dispatch(Intent::SearchWikipedia, &Entities::new()),
            NO_HANDLER
        );
    }

    #[test]
    fn register_replaces_handler() {
        let mut dispatcher = Dispatcher::with_defaults();
        dispatcher.register(Intent::Greet, |_| "Hi.".to_string());
        dispatcher.register(Intent::SearchWikipedia, |entities| {
            format!("Looking up {}", entities.get(Slot::Query).unwrap_or("nothing"))
        });

        assert_eq!(dispatcher.dispatch(Intent::Greet, &Entities::new()), "Hi.");
        let entities = Entities::new().with(Slot::Query, "Mars");
        assert_eq!(
            dispatcher.dispatch(Intent::SearchWikipedia, &entities),
            "Looking up Mars"
        );
    }

    #[test]
    fn clock_formats() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(time_reply(&now), "The current time is 02:05 PM");

        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_reply(today), "Today is Saturday, March 09, 2024");
    }

    #[test]
    fn calculation_reads_expression_slot() {
        let entities = Entities::new().with(Slot::Expression, "5+3");
        assert_eq!(calculate_reply(&entities), "The result is 8");

        let entities = Entities::new().with(Slot::Expression, "1/0");
        assert_eq!(calculate_reply(&entities), jarvis_math::EvalError::DivisionByZero.user_message());

        assert_eq!(calculate_reply(&Entities::new()), NO_EXPRESSION);
    }
}
