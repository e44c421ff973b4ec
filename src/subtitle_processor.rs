use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use ass_core::parser::ast::EventType;
use ass_core::parser::{Event, IssueCategory, IssueSeverity, Section};
use ass_core::utils::{format_ass_time, parse_ass_time};
use ass_core::Script;
use log::debug;
use crate::errors::SubtitleError;

// @module: Advanced SubStation Alpha (.ass) reading and writing

// @const: Byte order mark written by Aegisub and friends
const BOM: char = '\u{feff}';

// @const: Section holding the timed events
const EVENTS_HEADER: &str = "[Events]";

// @const: Field order used when no Format line is present
const DEFAULT_FORMAT: [&str; 10] = [
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

// @const: Largest hour count whose centiseconds still fit in a u32
const MAX_HOURS: u32 = (u32::MAX - 359_999) / 360_000;

/// Timestamp with the centisecond precision used by .ass files
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssTime(u32);

impl AssTime {
    /// Create a timestamp from centiseconds
    pub fn from_centis(centis: u32) -> Self {
        AssTime(centis)
    }

    /// Centiseconds since the start of the video
    pub fn centis(&self) -> u32 {
        self.0
    }

    /// Parse an `H:MM:SS.cc` timestamp
    ///
    /// Returns `None` for malformed input and for hour counts too large
    /// to represent.
    pub fn parse(timestamp: &str) -> Option<Self> {
        let timestamp = timestamp.trim();
        let hours: u32 = timestamp.split(':').next()?.parse().ok()?;
        if hours > MAX_HOURS {
            return None;
        }
        parse_ass_time(timestamp).ok().map(AssTime)
    }
}

impl fmt::Display for AssTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format_ass_time(self.0))
    }
}

/// Descriptor in front of an event line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Dialogue,
    Comment,
    /// Picture, Sound, Movie and Command events
    Other(String),
}

impl EventKind {
    /// Descriptor as written in the file
    pub fn descriptor(&self) -> &str {
        match self {
            Self::Dialogue => "Dialogue",
            Self::Comment => "Comment",
            Self::Other(descriptor) => descriptor,
        }
    }
}

impl From<EventType> for EventKind {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::Dialogue => Self::Dialogue,
            EventType::Comment => Self::Comment,
            other => Self::Other(other.as_str().to_string()),
        }
    }
}

// @struct: Single timed event
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEvent {
    // @field: Dialogue, Comment, ...
    pub kind: EventKind,

    // @field: Layer (or Marked for SSA v4 scripts)
    pub layer: String,

    pub start: AssTime,

    pub end: AssTime,

    // @field: Style name
    pub style: String,

    // @field: Actor name
    pub name: String,

    pub margin_l: String,

    pub margin_r: String,

    pub margin_v: String,

    pub effect: String,

    // @field: Text including override blocks, surrounding whitespace trimmed
    pub text: String,

    // @field: Line the event was read from, written back as is
    source_line: Option<String>,
}

impl SubtitleEvent {
    /// Creates an event with zero layer and margins
    pub fn new(kind: EventKind, start: AssTime, end: AssTime, style: &str, text: &str) -> Self {
        SubtitleEvent {
            kind,
            layer: "0".to_string(),
            start,
            end,
            style: style.to_string(),
            name: String::new(),
            margin_l: "0".to_string(),
            margin_r: "0".to_string(),
            margin_v: "0".to_string(),
            effect: String::new(),
            text: text.to_string(),
            source_line: None,
        }
    }

    /// Whether the event is commented out
    pub fn is_comment(&self) -> bool {
        self.kind == EventKind::Comment
    }

    /// Full event line with its descriptor, e.g. `Dialogue: 0,0:00:01.00,...`
    pub fn dump_with_type(&self) -> String {
        self.dump_with_format(&DEFAULT_FORMAT)
    }

    fn dump_with_format<S: AsRef<str>>(&self, format: &[S]) -> String {
        let fields: Vec<String> = format.iter().map(|name| self.field(name.as_ref())).collect();
        format!("{}: {}", self.kind.descriptor(), fields.join(","))
    }

    fn field(&self, name: &str) -> String {
        match name.to_ascii_lowercase().as_str() {
            "layer" | "marked" => self.layer.clone(),
            "start" => self.start.to_string(),
            "end" => self.end.to_string(),
            "style" => self.style.clone(),
            "name" | "actor" => self.name.clone(),
            "marginl" => self.margin_l.clone(),
            "marginr" => self.margin_r.clone(),
            "marginv" => self.margin_v.clone(),
            "effect" => self.effect.clone(),
            "text" => self.text.clone(),
            _ => String::new(),
        }
    }

    // @converts: Parsed ass-core event plus the line it came from
    fn from_parsed(event: &Event<'_>, source_line: &str) -> Result<Self, String> {
        let start = AssTime::parse(event.start)
            .ok_or_else(|| format!("invalid start time '{}'", event.start))?;
        let end = AssTime::parse(event.end)
            .ok_or_else(|| format!("invalid end time '{}'", event.end))?;

        Ok(SubtitleEvent {
            kind: EventKind::from(event.event_type),
            layer: event.layer.to_string(),
            start,
            end,
            style: event.style.to_string(),
            name: event.name.to_string(),
            margin_l: event.margin_l.to_string(),
            margin_r: event.margin_r.to_string(),
            margin_v: event.margin_v.to_string(),
            effect: event.effect.to_string(),
            text: event.text.to_string(),
            source_line: Some(source_line.to_string()),
        })
    }
}

impl fmt::Display for SubtitleEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.dump_with_type())
    }
}

// @returns: Event type of an `[Events]` line, None for Format, comments and anything else
fn event_type_of(line: &str) -> Option<EventType> {
    let (descriptor, _) = line.trim_start().split_once(':')?;
    if descriptor.ends_with(char::is_whitespace) {
        return None;
    }
    EventType::parse_type(descriptor)
}

/// Line of the script as it will be written back
#[derive(Debug, Clone)]
enum Line {
    Verbatim(String),
    /// Filled with the next event in the document's current order
    Event,
}

/// Parsed .ass script
///
/// Everything except the event lines is preserved verbatim, including
/// `;` comments inside `[Events]`; the events are exposed as
/// `SubtitleEvent`s and re-emitted in their current order.
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// File the document was loaded from
    pub source_file: PathBuf,

    /// Events in their current order
    pub events: Vec<SubtitleEvent>,

    format: Vec<String>,
    lines: Vec<Line>,
    // Events beyond the loaded slots are written before this line
    insert_at: usize,
    line_ending: &'static str,
    has_bom: bool,
}

impl SubtitleDocument {
    /// Create a document with an empty `[Events]` section and the default format
    pub fn new(source_file: PathBuf) -> Self {
        let format: Vec<String> = DEFAULT_FORMAT.iter().map(|name| name.to_string()).collect();
        let lines = vec![
            Line::Verbatim(EVENTS_HEADER.to_string()),
            Line::Verbatim(format!("Format: {}", format.join(", "))),
        ];

        SubtitleDocument {
            source_file,
            events: Vec::new(),
            format,
            insert_at: lines.len(),
            lines,
            line_ending: "\n",
            has_bom: true,
        }
    }

    /// Read and parse a subtitle file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SubtitleError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|e| SubtitleError::Parse {
            path: path.to_path_buf(),
            line: 0,
            message: format!("file is not valid UTF-8: {}", e),
        })?;

        Self::parse_str(&content, path)
    }

    /// Parse script content; `path` is only used for error reporting
    pub fn parse_str(content: &str, path: &Path) -> Result<Self, SubtitleError> {
        let parse_error = |line: usize, message: String| SubtitleError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        let (body, has_bom) = match content.strip_prefix(BOM) {
            Some(rest) => (rest, true),
            None => (content, false),
        };
        let line_ending = if body.contains("\r\n") { "\r\n" } else { "\n" };

        // Layout pass: remember where each event line sits so the writer can
        // refill the slots in sorted order
        let mut lines = Vec::new();
        let mut slots: Vec<(usize, &str)> = Vec::new();
        let mut format: Option<Vec<String>> = None;
        let mut events_seen = false;
        let mut in_events = false;
        let mut insert_at = 0;

        for (index, line) in body.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                in_events = trimmed == EVENTS_HEADER;
                if in_events {
                    if events_seen {
                        return Err(parse_error(line_no, "duplicate [Events] section".to_string()));
                    }
                    events_seen = true;
                    insert_at = lines.len() + 1;
                }
                lines.push(Line::Verbatim(line.to_string()));
                continue;
            }

            if in_events {
                if event_type_of(trimmed).is_some() {
                    slots.push((line_no, line));
                    lines.push(Line::Event);
                    insert_at = lines.len();
                    continue;
                }
                if let Some(names) = trimmed.strip_prefix("Format:") {
                    format = Some(names.split(',').map(|name| name.trim().to_string()).collect());
                    if slots.is_empty() {
                        insert_at = lines.len() + 1;
                    }
                }
            }

            lines.push(Line::Verbatim(line.to_string()));
        }

        if !events_seen {
            return Err(parse_error(0, "missing [Events] section".to_string()));
        }

        let script = Script::parse(content).map_err(|e| parse_error(0, e.to_string()))?;
        for issue in script.issues() {
            debug!("{:?} line {}: {}", path, issue.line, issue.message);
        }

        let parsed = script
            .sections()
            .iter()
            .find_map(|section| match section {
                Section::Events(events) => Some(events),
                _ => None,
            })
            .ok_or_else(|| parse_error(0, "missing [Events] section".to_string()))?;

        if parsed.len() != slots.len() {
            // ass-core drops malformed event lines and records why
            let issue = script
                .issues()
                .iter()
                .find(|issue| slots.iter().any(|(line_no, _)| *line_no == issue.line))
                .or_else(|| {
                    script.issues().iter().find(|issue| {
                        issue.category == IssueCategory::Format && issue.severity != IssueSeverity::Info
                    })
                });
            return Err(match issue {
                Some(issue) => parse_error(issue.line, issue.message.clone()),
                None => parse_error(0, format!("expected {} events, parsed {}", slots.len(), parsed.len())),
            });
        }

        let events = parsed
            .iter()
            .zip(&slots)
            .map(|(event, (line_no, line))| {
                SubtitleEvent::from_parsed(event, line).map_err(|message| parse_error(*line_no, message))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Parsed {} events from {:?}", events.len(), path);

        Ok(SubtitleDocument {
            source_file: path.to_path_buf(),
            events,
            format: format.unwrap_or_else(|| DEFAULT_FORMAT.iter().map(|name| name.to_string()).collect()),
            lines,
            insert_at,
            line_ending,
            has_bom,
        })
    }

    /// Stable sort of the events by start time
    pub fn sort_events_by_start(&mut self) {
        self.events.sort_by_key(|event| event.start);
    }

    /// Serialize the document back to .ass text
    pub fn to_ass_string(&self) -> String {
        let mut out = String::new();
        if self.has_bom {
            out.push(BOM);
        }

        let mut events = self.events.iter();
        for (index, line) in self.lines.iter().enumerate() {
            if index == self.insert_at {
                for event in events.by_ref() {
                    self.push_event(&mut out, event);
                }
            }
            match line {
                Line::Verbatim(text) => self.push_line(&mut out, text),
                Line::Event => {
                    if let Some(event) = events.next() {
                        self.push_event(&mut out, event);
                    }
                }
            }
        }
        for event in events {
            self.push_event(&mut out, event);
        }

        out
    }

    fn push_event(&self, out: &mut String, event: &SubtitleEvent) {
        match &event.source_line {
            Some(line) => self.push_line(out, line),
            None => self.push_line(out, &event.dump_with_format(&self.format)),
        }
    }

    fn push_line(&self, out: &mut String, line: &str) {
        out.push_str(line);
        out.push_str(self.line_ending);
    }

    /// Write the document to `path`, keeping the original BOM and line endings
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        fs::write(path, self.to_ass_string()).map_err(|source| SubtitleError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
    }
}
