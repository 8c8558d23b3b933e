//! Command-line parser.
//!
//! Parses `/command arg1 arg2 ...` input lines into typed [`ParsedCommand`]
//! values that the event handler can act on.

use crate::catalog::SortOrder;
use chrono::NaiveDate;

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    Go { path: String },
    Home,
    Events,
    Search { text: String },
    Category { name: Option<String> },
    Date { date: Option<NaiveDate> },
    Price { min: f64, max: f64 },
    Sort { order: SortOrder },
    Page { page: usize },
    ClearFilters,
    Event { id: String },
    Create,
    Dashboard,
    Profile,
    Login,
    Register,
    Logout,
    Refresh,
    Help,
    Quit,
}

/// Parse a slash-command string into a [`ParsedCommand`].
///
/// Returns `None` if the input does not start with `/` or is not a recognized
/// command. Command names are case-insensitive.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let body = input.strip_prefix('/')?;

    let (cmd, rest) = match body.split_once(' ') {
        Some((c, r)) => (c.to_lowercase(), r.trim()),
        None => (body.to_lowercase(), ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match cmd.as_str() {
        "go" | "open" => {
            if rest.is_empty() {
                return None;
            }
            let path = if rest.starts_with('/') {
                rest.to_string()
            } else {
                format!("/{}", rest)
            };
            Some(ParsedCommand::Go { path })
        }
        "home" => Some(ParsedCommand::Home),
        "events" | "browse" => Some(ParsedCommand::Events),
        "search" | "s" => Some(ParsedCommand::Search {
            text: rest.to_string(),
        }),
        "category" | "cat" => {
            let name = match rest {
                "" | "all" => None,
                other => Some(other.to_string()),
            };
            Some(ParsedCommand::Category { name })
        }
        "date" => {
            let date = match rest {
                "" | "clear" | "any" => None,
                other => Some(NaiveDate::parse_from_str(other, "%Y-%m-%d").ok()?),
            };
            Some(ParsedCommand::Date { date })
        }
        "price" => {
            let min = args.first()?.parse().ok().filter(|p: &f64| p.is_finite())?;
            let max = args.get(1)?.parse().ok().filter(|p: &f64| p.is_finite())?;
            if min < 0.0 || max < min {
                return None;
            }
            Some(ParsedCommand::Price { min, max })
        }
        "sort" => {
            let order = SortOrder::from_key(args.first().copied().unwrap_or("date"))?;
            Some(ParsedCommand::Sort { order })
        }
        "page" | "p" => {
            let page = args.first()?.parse().ok().filter(|p: &usize| *p > 0)?;
            Some(ParsedCommand::Page { page })
        }
        "clear" | "reset" => Some(ParsedCommand::ClearFilters),
        "event" | "e" => {
            let id = args.first()?.to_string();
            Some(ParsedCommand::Event { id })
        }
        "create" | "new" => Some(ParsedCommand::Create),
        "dashboard" | "dash" => Some(ParsedCommand::Dashboard),
        "profile" => Some(ParsedCommand::Profile),
        "login" => Some(ParsedCommand::Login),
        "register" | "signup" => Some(ParsedCommand::Register),
        "logout" => Some(ParsedCommand::Logout),
        "refresh" | "r" => Some(ParsedCommand::Refresh),
        "help" | "h" => Some(ParsedCommand::Help),
        "quit" | "exit" | "q" => Some(ParsedCommand::Quit),
        _ => None,
    }
}

/// Usage line for a known command, used when its arguments don't parse.
pub fn usage(input: &str) -> Option<&'static str> {
    let body = input.trim().strip_prefix('/')?;
    let cmd = body.split_whitespace().next()?.to_lowercase();
    let line = match cmd.as_str() {
        "go" | "open" => "/go <path>",
        "date" => "/date <YYYY-MM-DD|clear>",
        "price" => "/price <min> <max>",
        "sort" => "/sort <date|date-desc|price|price-desc>",
        "page" | "p" => "/page <n>",
        "event" | "e" => "/event <id>",
        _ => return None,
    };
    Some(line)
}

/// One line per command, shown by `/help`.
pub const HELP_LINES: &[&str] = &[
    "/go <path>            open a path, e.g. /go /events/2",
    "/home  /events        switch view",
    "/search <text>        filter events by text",
    "/category <name|all>  filter by category",
    "/date <YYYY-MM-DD|clear>",
    "/price <min> <max>    price range",
    "/sort <date|date-desc|price|price-desc>",
    "/page <n>             jump to a page",
    "/clear                reset all filters",
    "/event <id>           open an event",
    "/create  /dashboard  /profile",
    "/login  /register  /logout",
    "/refresh  /help  /quit",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/bogus"), None);
    }

    #[test]
    fn test_go_adds_slash() {
        assert_eq!(
            parse_command("/go events/2"),
            Some(ParsedCommand::Go { path: "/events/2".into() })
        );
        assert_eq!(parse_command("/go"), None);
    }

    #[test]
    fn test_search_keeps_spaces() {
        assert_eq!(
            parse_command("/SEARCH  summer music "),
            Some(ParsedCommand::Search { text: "summer music".into() })
        );
        assert_eq!(parse_command("/search"), Some(ParsedCommand::Search { text: String::new() }));
    }

    #[test]
    fn test_category_all_clears() {
        assert_eq!(parse_command("/category all"), Some(ParsedCommand::Category { name: None }));
        assert_eq!(
            parse_command("/cat Music"),
            Some(ParsedCommand::Category { name: Some("Music".into()) })
        );
    }

    #[test]
    fn test_date_and_price() {
        assert_eq!(
            parse_command("/date 2025-07-20"),
            Some(ParsedCommand::Date { date: NaiveDate::from_ymd_opt(2025, 7, 20) })
        );
        assert_eq!(parse_command("/date clear"), Some(ParsedCommand::Date { date: None }));
        assert_eq!(parse_command("/date tomorrow"), None);
        assert_eq!(
            parse_command("/price 0 150"),
            Some(ParsedCommand::Price { min: 0.0, max: 150.0 })
        );
        assert_eq!(parse_command("/price 200 100"), None);
    }

    #[test]
    fn test_price_rejects_non_finite() {
        assert_eq!(parse_command("/price nan nan"), None);
        assert_eq!(parse_command("/price 0 inf"), None);
        assert_eq!(parse_command("/price -inf 10"), None);
    }

    #[test]
    fn test_usage_for_known_commands() {
        assert_eq!(usage("/price 10"), Some("/price <min> <max>"));
        assert_eq!(usage("/PAGE zero"), Some("/page <n>"));
        assert_eq!(usage("/frobnicate"), None);
        assert_eq!(usage("plain text"), None);
    }

    #[test]
    fn test_sort_and_page() {
        assert_eq!(
            parse_command("/sort price-desc"),
            Some(ParsedCommand::Sort { order: SortOrder::PriceDesc })
        );
        assert_eq!(parse_command("/sort sideways"), None);
        assert_eq!(parse_command("/page 3"), Some(ParsedCommand::Page { page: 3 }));
        assert_eq!(parse_command("/page 0"), None);
    }
}
