//! Prompt/response contract
//!
//! A [`ResponseType`] selects the formatting instructions appended to a
//! prompt, and implicitly how the reply is used: a whole file, a bash script
//! that writes several files, or one shell command line.
//!
//! Models still wrap replies in markdown fences now and then, so [`clean`]
//! removes a single wrapping fence before the text is used.

use crate::ScribeError;

/// Delimiter models use to open and close code blocks
pub const FENCE_MARKER: &str = "```";

/// Expected shape of the model reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// Raw contents of a single file
    File,
    /// A bash script that writes one or more files
    Files,
    /// A single line of bash
    Cmd,
}

impl ResponseType {
    /// All tags, in the order they are presented to users
    pub const ALL: [ResponseType; 3] = [ResponseType::File, ResponseType::Files, ResponseType::Cmd];

    /// Formatting instructions appended to the prompt for this tag
    pub fn instructions(&self) -> &'static str {
        match self {
            ResponseType::File => {
                "IMPORTANT: Respond with ONLY raw file contents.\n\
                 No markdown, code blocks, or language indicators.\n\
                 No explanatory text, headers, or footers.\n\
                 Start and end directly with file contents."
            }
            ResponseType::Files => {
                "IMPORTANT: Respond with a bash script creating files:\n\
                 1. Start with #!/bin/bash\n\
                 2. For each file, use:\n\
                 mkdir -p \"$(dirname \"path/to/filename\")\" 2>/dev/null; cat << \"EOF\" > path/to/filename\n\
                 [file contents]\n\
                 EOF\n\
                 No markdown, code blocks, or additional text."
            }
            ResponseType::Cmd => {
                "IMPORTANT: Respond with ONLY a single line of executable bash code.\n\
                 No explanation, no markdown, no comments.\n\
                 The command should achieve the described task efficiently.\n\
                 Must be safe to pipe directly to bash."
            }
        }
    }

    /// Tag name as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::File => "file",
            ResponseType::Files => "files",
            ResponseType::Cmd => "cmd",
        }
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResponseType {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(ResponseType::File),
            "files" => Ok(ResponseType::Files),
            "cmd" => Ok(ResponseType::Cmd),
            _ => Err(ScribeError::Config(format!(
                "Invalid response type: {}. Use file, files, or cmd.",
                s
            ))),
        }
    }
}

/// Compose the final prompt: the user prompt, a blank line, then the
/// instructions for `response_type`. Without a type the prompt is unchanged.
pub fn format(prompt: &str, response_type: Option<ResponseType>) -> String {
    match response_type {
        Some(rt) => format!("{}\n\n{}", prompt, rt.instructions()),
        None => prompt.to_string(),
    }
}

/// Strip one wrapping fenced block and surrounding whitespace
///
/// The fence is removed only when the first and last non-empty lines are
/// different lines and both start with [`FENCE_MARKER`].
pub fn clean(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());

    if let (Some(first), Some(last)) = (first, last) {
        if first < last && is_fence(lines[first]) && is_fence(lines[last]) {
            return lines[first + 1..last].join("\n").trim().to_string();
        }
    }

    raw.trim().to_string()
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE_MARKER)
}
