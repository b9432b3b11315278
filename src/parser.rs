use crate::lexer;

/// Position of a segment inside its pipeline.
///
/// The role alone decides how the segment's standard streams are wired:
/// which pipe it reads from, which pipe it writes to, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The only segment of the line. Inherits the interpreter's streams, no pipe.
    Sole,
    /// Head of a pipeline of two or more. Writes into a fresh pipe.
    First,
    /// Between two pipes: reads the previous one, writes a fresh one.
    Intermediate,
    /// Tail of a pipeline of two or more. Reads the previous pipe, inherits stdout.
    Last,
}

impl Role {
    /// Classifies the 0-based `index` of a segment in a pipeline of `count` segments.
    pub fn assign(index: usize, count: usize) -> Role {
        debug_assert!(index < count, "segment {} out of {}", index, count);
        if count == 1 {
            Role::Sole
        } else if index == 0 {
            Role::First
        } else if index + 1 == count {
            Role::Last
        } else {
            Role::Intermediate
        }
    }

    /// Whether a segment in this role takes its stdin from the upstream pipe.
    pub fn reads_pipe(self) -> bool {
        matches!(self, Role::Intermediate | Role::Last)
    }

    /// Whether a segment in this role sends its stdout into a new pipe.
    pub fn writes_pipe(self) -> bool {
        matches!(self, Role::First | Role::Intermediate)
    }
}

/// One command of a pipeline: its argument tokens and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub role: Role,
    /// `argv[0]` is the program name. Empty when the user typed `||` or a trailing `|`.
    pub argv: Vec<String>,
}

impl Segment {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

/// Ordered commands derived from one input line.
///
/// Owned by a single iteration of the driver loop and dropped with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    segments: Vec<Segment>,
}

impl Pipeline {
    /// Tokenizes `line` and assigns a role to every segment.
    pub fn parse(line: &str) -> Pipeline {
        let parts = lexer::split_pipeline(line);
        let count = parts.len();
        let segments = parts
            .into_iter()
            .enumerate()
            .map(|(index, part)| Segment {
                index,
                role: Role::assign(index, count),
                argv: lexer::split_arguments(part)
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })
            .collect();
        Pipeline { segments }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
