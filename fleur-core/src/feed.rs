/// Scripted weather feed: frame-keyed events that drive the application context
///
/// Format, one event per line:
///
/// ```text
/// # comment
/// 0    city Lyon
/// 0    wind 2.5
/// 300  reset
/// 900  clear
/// ```
use log::info;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, not_line_ending, space0, space1},
    combinator::{all_consuming, map, map_res, value, verify},
    number::complete::double,
    sequence::{preceded, terminated},
    IResult,
};
use std::fmt;
use std::path::Path;

use crate::context::AppContext;

/// A change to the application context
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherCommand {
    City(String),
    Wind(f64),
    Reset,
    Clear,
}

impl WeatherCommand {
    pub fn apply(&self, context: &mut AppContext) {
        match self {
            WeatherCommand::City(city) => context.select_city(city),
            WeatherCommand::Wind(speed) => context.set_wind_speed(*speed),
            WeatherCommand::Reset => context.request_reset(),
            WeatherCommand::Clear => context.clear_city(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherEvent {
    pub frame: u64,
    pub command: WeatherCommand,
}

/// Error while loading a weather feed
#[derive(Debug)]
pub enum FeedError {
    Io(std::io::Error),
    Parse { line: usize, message: String },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Io(e) => write!(f, "failed to read weather feed: {}", e),
            FeedError::Parse { line, message } => write!(f, "line {}: {}", line, message),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Io(e) => Some(e),
            FeedError::Parse { .. } => None,
        }
    }
}

impl From<std::io::Error> for FeedError {
    fn from(e: std::io::Error) -> Self {
        FeedError::Io(e)
    }
}

/// Events sorted by frame, consumed as the session advances
#[derive(Debug, Clone, Default)]
pub struct WeatherFeed {
    events: Vec<WeatherEvent>,
    cursor: usize,
}

impl WeatherFeed {
    pub fn new(mut events: Vec<WeatherEvent>) -> Self {
        // Stable: events on the same frame keep their file order
        events.sort_by_key(|event| event.frame);
        Self { events, cursor: 0 }
    }

    pub fn parse(input: &str) -> Result<Self, FeedError> {
        let mut events = Vec::new();
        for (index, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match all_consuming(parse_event)(line) {
                Ok((_, event)) => events.push(event),
                Err(e) => {
                    return Err(FeedError::Parse {
                        line: index + 1,
                        message: format!("invalid event {:?} ({:?})", line, e),
                    })
                }
            }
        }
        Ok(Self::new(events))
    }

    pub fn load(path: &Path) -> Result<Self, FeedError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn events(&self) -> &[WeatherEvent] {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// Apply every event scheduled at or before `frame`. Returns how many ran.
    pub fn apply_due(&mut self, frame: u64, context: &mut AppContext) -> usize {
        let start = self.cursor;
        while let Some(event) = self.events.get(self.cursor) {
            if event.frame > frame {
                break;
            }
            info!("frame {}: {:?}", frame, event.command);
            event.command.apply(context);
            self.cursor += 1;
        }
        self.cursor - start
    }
}

fn parse_event(input: &str) -> IResult<&str, WeatherEvent> {
    let (input, frame) = terminated(map_res(digit1, str::parse::<u64>), space1)(input)?;
    let (input, command) = terminated(parse_command, space0)(input)?;
    Ok((input, WeatherEvent { frame, command }))
}

fn parse_command(input: &str) -> IResult<&str, WeatherCommand> {
    alt((
        map(
            preceded(
                tag("city"),
                preceded(space1, verify(not_line_ending, |s: &str| !s.trim().is_empty())),
            ),
            |name: &str| WeatherCommand::City(name.trim().to_string()),
        ),
        map(preceded(tag("wind"), preceded(space1, double)), WeatherCommand::Wind),
        value(WeatherCommand::Reset, tag("reset")),
        value(WeatherCommand::Clear, tag("clear")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::WeatherContext;

    const SCRIPT: &str = "\
# demo feed
0 city Saint-Etienne
0 wind 2.5

120 reset
60  wind 4
900 clear
";

    #[test]
    fn test_parse_script() {
        let feed = WeatherFeed::parse(SCRIPT).unwrap();
        let frames: Vec<u64> = feed.events().iter().map(|e| e.frame).collect();
        assert_eq!(frames, vec![0, 0, 60, 120, 900]);
        assert_eq!(
            feed.events()[0].command,
            WeatherCommand::City("Saint-Etienne".to_string())
        );
        assert_eq!(feed.events()[1].command, WeatherCommand::Wind(2.5));
        assert_eq!(feed.events()[3].command, WeatherCommand::Reset);
        assert_eq!(feed.events()[4].command, WeatherCommand::Clear);
    }

    #[test]
    fn test_city_names_may_contain_spaces() {
        let feed = WeatherFeed::parse("10 city  Le Puy-en-Velay  ").unwrap();
        assert_eq!(
            feed.events()[0].command,
            WeatherCommand::City("Le Puy-en-Velay".to_string())
        );
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = WeatherFeed::parse("0 city Lyon\n\n5 gust 3\n").unwrap_err();
        match err {
            FeedError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rejects_missing_arguments() {
        assert!(WeatherFeed::parse("0 city").is_err());
        assert!(WeatherFeed::parse("0 wind fast").is_err());
        assert!(WeatherFeed::parse("reset").is_err());
        assert!(WeatherFeed::parse("3 reset now").is_err());
    }

    #[test]
    fn test_apply_due_advances_in_order() {
        let mut feed = WeatherFeed::parse(SCRIPT).unwrap();
        let mut context = AppContext::new();

        assert_eq!(feed.apply_due(0, &mut context), 2);
        assert_eq!(context.selected_city(), "Saint-Etienne");
        assert_eq!(context.wind_speed(), 2.5);
        context.clear_reset();

        assert_eq!(feed.apply_due(59, &mut context), 0);
        assert_eq!(feed.apply_due(200, &mut context), 2);
        assert_eq!(context.wind_speed(), 4.0);
        assert!(context.reset_requested());

        assert!(!feed.is_finished());
        assert_eq!(feed.apply_due(900, &mut context), 1);
        assert_eq!(context.selected_city(), "");
        assert!(feed.is_finished());
    }
}
