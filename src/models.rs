use std::fmt;

use clap::ValueEnum;

/// Supported model identifiers.
///
/// Names starting with `gemini` are routed to the Gemini adapter by genai,
/// which reads its key from `GEMINI_API_KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Model {
    #[default]
    #[value(name = "gemini-2.0-flash-001")]
    Flash,
    #[value(name = "gemini-2.0-flash-thinking-exp-1219")]
    FlashThinking,
}

pub const MODELS: [Model; 2] = [Model::Flash, Model::FlashThinking];

impl Model {
    pub fn id(self) -> &'static str {
        match self {
            Model::Flash => "gemini-2.0-flash-001",
            Model::FlashThinking => "gemini-2.0-flash-thinking-exp-1219",
        }
    }

    /// The next model in [`MODELS`], wrapping around.
    pub fn next(self) -> Self {
        let index = MODELS.iter().position(|m| *m == self).unwrap_or(0);
        MODELS[(index + 1) % MODELS.len()]
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
